//! Seed context supplied when a dialogue starts, and the opening turn built from it.

use serde::{Deserialize, Serialize};
use std::fmt::Write;

use super::draft::{ClubConfigDraft, Coordinates, FleetItem, Member, MemberRole};
use super::extractor::wrap_stations;
use super::station::Station;

/// Administrator contact already known from club registration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminContact {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

/// What the caller already knows about the club.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedContext {
    #[serde(default)]
    pub club_name: Option<String>,
    #[serde(default, alias = "oaci")]
    pub icao_code: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub admin: Option<AdminContact>,
    #[serde(default)]
    pub coordinates: Option<Coordinates>,
    #[serde(default)]
    pub existing_fleet: Vec<FleetItem>,
    #[serde(default)]
    pub existing_members: Vec<Member>,
}

impl SeedContext {
    /// Coordinates usable for a station lookup.
    pub fn usable_coordinates(&self) -> Option<Coordinates> {
        self.coordinates.filter(Coordinates::is_valid)
    }

    /// The draft a new session starts from: the administrator, anything
    /// already registered, and the club position.
    pub fn initial_draft(&self) -> ClubConfigDraft {
        let mut draft = ClubConfigDraft::new();
        if let Some(admin) = &self.admin {
            draft.members.push(
                Member::new(MemberRole::Admin)
                    .with_name(admin.first_name.clone(), admin.last_name.clone())
                    .with_email(admin.email.clone()),
            );
        }
        draft.members.extend(self.existing_members.iter().cloned());
        draft.fleet_items = self.existing_fleet.clone();
        draft.coordinates = self.usable_coordinates();
        draft
    }

    /// First actor turn: a summary of the club plus nearby stations, if any.
    pub fn opening_message(&self, stations: &[Station]) -> String {
        let mut msg = String::new();
        let name = self.club_name.as_deref().unwrap_or("our club");
        match &self.icao_code {
            Some(code) => {
                let _ = writeln!(msg, "Hello! We are setting up the club \"{}\" ({}).", name, code);
            }
            None => {
                let _ = writeln!(msg, "Hello! We are setting up the club \"{}\".", name);
            }
        }
        if let Some(admin) = &self.admin {
            let _ = writeln!(
                msg,
                "The main administrator is {} {} ({}).",
                admin.first_name, admin.last_name, admin.email
            );
        }
        if let Some(address) = &self.address {
            let _ = writeln!(msg, "Location: {}", address);
        }

        if !self.existing_fleet.is_empty() {
            let _ = writeln!(msg, "\nAircraft already registered:");
            for item in &self.existing_fleet {
                let _ = writeln!(
                    msg,
                    "- {} {} ({} seats{})",
                    item.kind.as_str(),
                    item.tail_number.as_deref().unwrap_or("unregistered"),
                    item.capacity,
                    item.rate.map(|r| format!(", {:.2}/h", r)).unwrap_or_default()
                );
            }
        }

        if !self.existing_members.is_empty() {
            let _ = writeln!(msg, "\nMembers already registered:");
            for member in &self.existing_members {
                let _ = writeln!(
                    msg,
                    "- {} {} ({})",
                    member.first_name.as_deref().unwrap_or("?"),
                    member.last_name.as_deref().unwrap_or("?"),
                    member.role
                );
            }
        }

        if !stations.is_empty() {
            if let Ok(json) = serde_json::to_string(stations) {
                let _ = write!(msg, "\n{}\n", wrap_stations(&json));
            }
        }

        msg
    }
}
