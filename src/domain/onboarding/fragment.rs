//! Fragment schema: the structured block an assistant turn may carry.
//!
//! Decoding is split in two steps. The JSON must first be an object; each
//! known top-level key is then decoded and checked on its own so the error
//! names the offending key. Unknown keys pass through untouched.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use super::draft::{
    Coordinates, FleetItem, FleetKind, FleetStatus, Member, MemberRole, StationRef,
};
use crate::domain::foundation::patterns;

const MEMBERS_KEY: &str = "members";
const FLEET_KEYS: [&str; 3] = ["fleetItems", "aircrafts", "aircraft"];
const SETTINGS_KEY: &str = "settings";
const COORDINATES_KEY: &str = "coordinates";
const STATION_KEY: &str = "selectedStation";

/// Why a fragment was not merged.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FragmentError {
    #[error("fragment is not valid JSON: {0}")]
    Syntax(String),

    #[error("fragment must be a JSON object")]
    NotAnObject,

    #[error("fragment key '{key}' could not be decoded: {reason}")]
    Decode { key: String, reason: String },

    #[error("fragment field '{path}' is invalid: {reason}")]
    Invalid { path: String, reason: String },
}

impl FragmentError {
    fn decode(key: &str, err: serde_json::Error) -> Self {
        FragmentError::Decode {
            key: key.to_string(),
            reason: err.to_string(),
        }
    }

    fn invalid(path: impl Into<String>, reason: impl Into<String>) -> Self {
        FragmentError::Invalid {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

/// A validated fragment, ready to merge.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigFragment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub members: Option<Vec<Member>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fleet_items: Option<Vec<FleetItem>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinates>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_station: Option<StationRef>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MemberInput {
    role: Option<String>,
    first_name: Option<String>,
    last_name: Option<String>,
    email: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FleetItemInput {
    #[serde(alias = "type")]
    kind: Option<String>,
    #[serde(alias = "registration")]
    tail_number: Option<String>,
    #[serde(alias = "hourlyRate")]
    rate: Option<f64>,
    capacity: Option<i64>,
    status: Option<String>,
}

impl ConfigFragment {
    /// Decodes and validates fragment text.
    pub fn parse(text: &str) -> Result<Self, FragmentError> {
        let value: Value =
            serde_json::from_str(text.trim()).map_err(|e| FragmentError::Syntax(e.to_string()))?;
        Self::from_value(value)
    }

    /// Validates an already-decoded JSON value against the schema.
    pub fn from_value(value: Value) -> Result<Self, FragmentError> {
        let Value::Object(mut map) = value else {
            return Err(FragmentError::NotAnObject);
        };

        let members = match map.remove(MEMBERS_KEY) {
            Some(raw) => Some(parse_members(raw)?),
            None => None,
        };

        let mut fleet_items = None;
        for key in FLEET_KEYS {
            if let Some(raw) = map.remove(key) {
                if fleet_items.is_some() {
                    return Err(FragmentError::invalid(key, "fleet listed under more than one key"));
                }
                fleet_items = Some(parse_fleet(key, raw)?);
            }
        }

        let settings = match map.remove(SETTINGS_KEY) {
            Some(raw) => Some(
                serde_json::from_value::<Map<String, Value>>(raw)
                    .map_err(|e| FragmentError::decode(SETTINGS_KEY, e))?,
            ),
            None => None,
        };

        let coordinates = match map.remove(COORDINATES_KEY) {
            Some(raw) => {
                let coordinates: Coordinates = serde_json::from_value(raw)
                    .map_err(|e| FragmentError::decode(COORDINATES_KEY, e))?;
                if !coordinates.is_valid() {
                    return Err(FragmentError::invalid(COORDINATES_KEY, "out of range"));
                }
                Some(coordinates)
            }
            None => None,
        };

        let selected_station = match map.remove(STATION_KEY) {
            Some(raw) => {
                let station: StationRef = serde_json::from_value(raw)
                    .map_err(|e| FragmentError::decode(STATION_KEY, e))?;
                if station.id.trim().is_empty() {
                    return Err(FragmentError::invalid("selectedStation.id", "must not be empty"));
                }
                Some(station)
            }
            None => None,
        };

        Ok(Self {
            members,
            fleet_items,
            settings,
            coordinates,
            selected_station,
            extra: map,
        })
    }

    /// True when the fragment names no key at all.
    pub fn is_empty(&self) -> bool {
        self.members.is_none()
            && self.fleet_items.is_none()
            && self.settings.is_none()
            && self.coordinates.is_none()
            && self.selected_station.is_none()
            && self.extra.is_empty()
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_members(raw: Value) -> Result<Vec<Member>, FragmentError> {
    let inputs: Vec<MemberInput> =
        serde_json::from_value(raw).map_err(|e| FragmentError::decode(MEMBERS_KEY, e))?;

    inputs
        .into_iter()
        .enumerate()
        .map(|(i, input)| {
            let path = |field: &str| format!("members[{}].{}", i, field);

            let role_text = non_blank(input.role)
                .ok_or_else(|| FragmentError::invalid(path("role"), "is required"))?;
            let role = MemberRole::parse(&role_text).ok_or_else(|| {
                FragmentError::invalid(
                    path("role"),
                    format!("must be one of {}", MemberRole::ALLOWED.join(", ")),
                )
            })?;

            let email = non_blank(input.email);
            if let Some(email) = &email {
                if !patterns::EMAIL.is_match(email) {
                    return Err(FragmentError::invalid(path("email"), "is not an email address"));
                }
            }

            Ok(Member {
                role,
                first_name: non_blank(input.first_name),
                last_name: non_blank(input.last_name),
                email,
            })
        })
        .collect()
}

fn parse_fleet(key: &str, raw: Value) -> Result<Vec<FleetItem>, FragmentError> {
    let inputs: Vec<FleetItemInput> =
        serde_json::from_value(raw).map_err(|e| FragmentError::decode(key, e))?;

    if inputs.is_empty() {
        return Err(FragmentError::invalid(key, "must list at least one aircraft"));
    }

    inputs
        .into_iter()
        .enumerate()
        .map(|(i, input)| {
            let path = |field: &str| format!("{}[{}].{}", key, i, field);

            let kind = match non_blank(input.kind).map(|k| k.to_ascii_uppercase()).as_deref() {
                Some("PLANE") => FleetKind::Plane,
                Some("ULM") => FleetKind::Ulm,
                Some(_) => return Err(FragmentError::invalid(path("kind"), "must be PLANE or ULM")),
                None => return Err(FragmentError::invalid(path("kind"), "is required")),
            };

            // Kept as typed; the registration pattern is enforced when the draft is imported.
            let tail_number = non_blank(input.tail_number);

            if let Some(rate) = input.rate {
                if !rate.is_finite() || rate < 0.0 {
                    return Err(FragmentError::invalid(path("rate"), "must be a non-negative amount"));
                }
            }

            let capacity = match input.capacity {
                Some(c) if (1..=99).contains(&c) => c as u8,
                Some(_) => return Err(FragmentError::invalid(path("capacity"), "must be between 1 and 99")),
                None => kind.default_capacity(),
            };

            let status = match non_blank(input.status) {
                Some(s) => FleetStatus::parse(&s).ok_or_else(|| {
                    FragmentError::invalid(
                        path("status"),
                        format!("must be one of {}", FleetStatus::ALLOWED.join(", ")),
                    )
                })?,
                None => FleetStatus::default(),
            };

            Ok(FleetItem {
                kind,
                tail_number,
                rate: input.rate,
                capacity,
                status,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn member_without_email_is_accepted() {
        let fragment = ConfigFragment::parse(r#"{"members":[{"role":"PILOT"}]}"#).unwrap();
        let members = fragment.members.unwrap();
        assert_eq!(members.len(), 1);
        assert_eq!(members[0].role, MemberRole::Pilot);
        assert!(members[0].email.is_none());
    }

    #[test]
    fn member_without_role_is_rejected() {
        let err = ConfigFragment::parse(r#"{"members":[{"firstName":"Jean"}]}"#).unwrap_err();
        assert_eq!(
            err,
            FragmentError::invalid("members[0].role", "is required")
        );
    }

    #[test]
    fn member_with_bad_email_is_rejected() {
        let err = ConfigFragment::from_value(json!({
            "members": [{"role": "PILOT", "email": "not-an-email"}]
        }))
        .unwrap_err();
        assert!(matches!(err, FragmentError::Invalid { ref path, .. } if path == "members[0].email"));
    }

    #[test]
    fn aircraft_aliases_are_understood() {
        let fragment = ConfigFragment::from_value(json!({
            "aircrafts": [{
                "type": "plane",
                "registration": "f-abcd",
                "hourlyRate": 150,
                "status": "MAINTENANCE"
            }]
        }))
        .unwrap();

        let fleet = fragment.fleet_items.unwrap();
        assert_eq!(fleet[0].kind, FleetKind::Plane);
        assert_eq!(fleet[0].tail_number.as_deref(), Some("f-abcd"));
        assert_eq!(fleet[0].rate, Some(150.0));
        assert_eq!(fleet[0].capacity, 4);
        assert_eq!(fleet[0].status, FleetStatus::Maintenance);
    }

    #[test]
    fn tail_number_is_not_pattern_checked() {
        let fragment = ConfigFragment::from_value(json!({
            "members": [{"role": "PILOT", "firstName": "Jean", "lastName": "Dupont"}],
            "fleetItems": [{"kind": "PLANE", "tailNumber": " F GABC "}]
        }))
        .unwrap();

        assert_eq!(fragment.members.unwrap().len(), 1);
        assert_eq!(fragment.fleet_items.unwrap()[0].tail_number.as_deref(), Some("F GABC"));
    }

    #[test]
    fn ulm_defaults_to_two_seats() {
        let fragment =
            ConfigFragment::from_value(json!({"fleetItems": [{"kind": "ULM"}]})).unwrap();
        assert_eq!(fragment.fleet_items.unwrap()[0].capacity, 2);
    }

    #[test]
    fn empty_fleet_is_rejected() {
        let err = ConfigFragment::from_value(json!({"fleetItems": []})).unwrap_err();
        assert!(matches!(err, FragmentError::Invalid { .. }));
    }

    #[test]
    fn fleet_under_two_keys_is_rejected() {
        let err = ConfigFragment::from_value(json!({
            "fleetItems": [{"kind": "ULM"}],
            "aircrafts": [{"kind": "PLANE"}]
        }))
        .unwrap_err();
        assert!(matches!(err, FragmentError::Invalid { .. }));
    }

    #[test]
    fn capacity_out_of_range_is_rejected() {
        let err = ConfigFragment::from_value(json!({
            "fleetItems": [{"kind": "PLANE", "capacity": 120}]
        }))
        .unwrap_err();
        assert!(matches!(err, FragmentError::Invalid { ref path, .. } if path.ends_with("capacity")));
    }

    #[test]
    fn non_object_fragment_is_rejected() {
        assert_eq!(
            ConfigFragment::parse("[1, 2, 3]").unwrap_err(),
            FragmentError::NotAnObject
        );
    }

    #[test]
    fn invalid_json_is_a_syntax_error() {
        assert!(matches!(
            ConfigFragment::parse("{ members: ").unwrap_err(),
            FragmentError::Syntax(_)
        ));
    }

    #[test]
    fn settings_must_be_an_object() {
        let err = ConfigFragment::from_value(json!({"settings": [1]})).unwrap_err();
        assert!(matches!(err, FragmentError::Decode { ref key, .. } if key == "settings"));
    }

    #[test]
    fn unknown_keys_are_kept() {
        let fragment = ConfigFragment::from_value(json!({"clubName": "Lac"})).unwrap();
        assert_eq!(fragment.extra.get("clubName"), Some(&json!("Lac")));
        assert!(!fragment.is_empty());
    }

    #[test]
    fn empty_object_is_an_empty_fragment() {
        assert!(ConfigFragment::parse("{}").unwrap().is_empty());
    }
}
