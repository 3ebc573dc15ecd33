//! The accumulating club configuration built across a conversation.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use super::fragment::ConfigFragment;

/// Role a member holds in the club.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MemberRole {
    Admin,
    Instructor,
    Pilot,
    Mechanic,
}

impl MemberRole {
    pub const ALLOWED: [&'static str; 4] = ["ADMIN", "INSTRUCTOR", "PILOT", "MECHANIC"];

    pub fn as_str(&self) -> &'static str {
        match self {
            MemberRole::Admin => "ADMIN",
            MemberRole::Instructor => "INSTRUCTOR",
            MemberRole::Pilot => "PILOT",
            MemberRole::Mechanic => "MECHANIC",
        }
    }

    /// Parses a role name case-insensitively.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_uppercase().as_str() {
            "ADMIN" => Some(MemberRole::Admin),
            "INSTRUCTOR" => Some(MemberRole::Instructor),
            "PILOT" => Some(MemberRole::Pilot),
            "MECHANIC" => Some(MemberRole::Mechanic),
            _ => None,
        }
    }
}

impl fmt::Display for MemberRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A club member as described in the dialogue.
///
/// Only `role` is mandatory: the model frequently mentions a person before
/// their contact details are known.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub role: MemberRole,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl Member {
    pub fn new(role: MemberRole) -> Self {
        Self {
            role,
            first_name: None,
            last_name: None,
            email: None,
        }
    }

    pub fn with_name(mut self, first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        self.first_name = Some(first_name.into());
        self.last_name = Some(last_name.into());
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }
}

/// Aircraft category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FleetKind {
    Plane,
    Ulm,
}

impl FleetKind {
    /// Seats assumed when the dialogue does not say: 4 for a plane, 2 for a microlight.
    pub fn default_capacity(&self) -> u8 {
        match self {
            FleetKind::Plane => 4,
            FleetKind::Ulm => 2,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FleetKind::Plane => "PLANE",
            FleetKind::Ulm => "ULM",
        }
    }
}

/// Operational availability of an aircraft.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FleetStatus {
    #[default]
    Available,
    Maintenance,
    Reserved,
}

impl FleetStatus {
    pub const ALLOWED: [&'static str; 3] = ["AVAILABLE", "MAINTENANCE", "RESERVED"];

    pub fn as_str(&self) -> &'static str {
        match self {
            FleetStatus::Available => "AVAILABLE",
            FleetStatus::Maintenance => "MAINTENANCE",
            FleetStatus::Reserved => "RESERVED",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_uppercase().as_str() {
            "AVAILABLE" => Some(FleetStatus::Available),
            "MAINTENANCE" => Some(FleetStatus::Maintenance),
            "RESERVED" => Some(FleetStatus::Reserved),
            _ => None,
        }
    }
}

/// An aircraft in the club fleet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FleetItem {
    pub kind: FleetKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tail_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate: Option<f64>,
    pub capacity: u8,
    #[serde(default)]
    pub status: FleetStatus,
}

impl FleetItem {
    pub fn new(kind: FleetKind, tail_number: impl Into<String>) -> Self {
        Self {
            kind,
            tail_number: Some(tail_number.into()),
            rate: None,
            capacity: kind.default_capacity(),
            status: FleetStatus::Available,
        }
    }

    pub fn with_rate(mut self, rate: f64) -> Self {
        self.rate = Some(rate);
        self
    }
}

/// Device or club coordinates in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }
}

/// Reference station chosen for the club.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StationRef {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
}

/// Club configuration accumulated from assistant fragments.
///
/// # Merge rules
///
/// - `members` grows by concatenation
/// - every other key present in a fragment replaces the draft's value
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClubConfigDraft {
    #[serde(default)]
    pub members: Vec<Member>,
    #[serde(default)]
    pub fleet_items: Vec<FleetItem>,
    #[serde(default)]
    pub settings: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinates>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_station: Option<StationRef>,
    /// Top-level keys the fragment schema does not name, kept verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ClubConfigDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies a validated fragment in place.
    pub fn merge(&mut self, fragment: &ConfigFragment) {
        if let Some(members) = &fragment.members {
            self.members.extend(members.iter().cloned());
        }
        if let Some(fleet_items) = &fragment.fleet_items {
            self.fleet_items = fleet_items.clone();
        }
        if let Some(settings) = &fragment.settings {
            self.settings = settings.clone();
        }
        if let Some(coordinates) = fragment.coordinates {
            self.coordinates = Some(coordinates);
        }
        if let Some(station) = &fragment.selected_station {
            self.selected_station = Some(station.clone());
        }
        for (key, value) in &fragment.extra {
            self.extra.insert(key.clone(), value.clone());
        }
    }

    /// Returns the draft after applying an optional fragment.
    pub fn merged(&self, fragment: Option<&ConfigFragment>) -> Self {
        let mut next = self.clone();
        if let Some(fragment) = fragment {
            next.merge(fragment);
        }
        next
    }
}
