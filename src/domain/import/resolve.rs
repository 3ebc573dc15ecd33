//! Natural keys and the outcome of resolving them.

use std::fmt;

use super::errors::RecordError;
use super::query::{Filter, Table};

/// Who a record belongs to, as written by a human.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OwnerRef {
    Login(String),
    Name { first: String, last: String },
}

impl OwnerRef {
    pub fn natural_key(&self) -> NaturalKey {
        match self {
            OwnerRef::Login(login) => NaturalKey::user_login(login),
            OwnerRef::Name { first, last } => NaturalKey::user_name(first, last),
        }
    }
}

/// A human-meaningful reference, normalised so equal references share a
/// cache entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NaturalKey {
    UserLogin(String),
    UserName { first: String, last: String },
    EntryType(String),
    FlightType(String),
    Aircraft(String),
}

impl NaturalKey {
    pub fn user_login(login: &str) -> Self {
        NaturalKey::UserLogin(login.trim().to_lowercase())
    }

    pub fn user_name(first: &str, last: &str) -> Self {
        NaturalKey::UserName {
            first: first.trim().to_lowercase(),
            last: last.trim().to_lowercase(),
        }
    }

    pub fn entry_type(code: &str) -> Self {
        NaturalKey::EntryType(code.trim().to_uppercase())
    }

    pub fn flight_type(code: &str) -> Self {
        NaturalKey::FlightType(code.trim().to_uppercase())
    }

    pub fn aircraft(registration: &str) -> Self {
        NaturalKey::Aircraft(registration.trim().to_uppercase())
    }

    /// The table and filter of the single lookup for this key.
    pub fn lookup(&self) -> (Table, Filter) {
        match self {
            NaturalKey::UserLogin(login) => {
                (Table::Users, Filter::new().eq_ignore_case("login", login.as_str()))
            }
            NaturalKey::UserName { first, last } => (
                Table::Users,
                Filter::new()
                    .eq_ignore_case("first_name", first.as_str())
                    .eq_ignore_case("last_name", last.as_str()),
            ),
            NaturalKey::EntryType(code) => (
                Table::AccountEntryTypes,
                Filter::new().eq_ignore_case("code", code.as_str()),
            ),
            NaturalKey::FlightType(code) => {
                (Table::FlightTypes, Filter::new().eq_ignore_case("code", code.as_str()))
            }
            NaturalKey::Aircraft(registration) => (
                Table::Aircraft,
                Filter::new().eq_ignore_case("registration", registration.as_str()),
            ),
        }
    }
}

impl fmt::Display for NaturalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NaturalKey::UserLogin(login) => write!(f, "login '{}'", login),
            NaturalKey::UserName { first, last } => write!(f, "member '{} {}'", first, last),
            NaturalKey::EntryType(code) => write!(f, "entry type '{}'", code),
            NaturalKey::FlightType(code) => write!(f, "flight type '{}'", code),
            NaturalKey::Aircraft(reg) => write!(f, "aircraft '{}'", reg),
        }
    }
}

/// Result of looking up one natural key.
///
/// Ambiguity is never resolved by picking a candidate.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution<T> {
    Resolved(T),
    Ambiguous(usize),
    NotFound,
}

impl<T> Resolution<T> {
    pub fn from_matches(mut matches: Vec<T>) -> Self {
        match matches.len() {
            0 => Resolution::NotFound,
            1 => match matches.pop() {
                Some(only) => Resolution::Resolved(only),
                None => Resolution::NotFound,
            },
            n => Resolution::Ambiguous(n),
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, Resolution::Resolved(_))
    }
}

impl<T: Clone> Resolution<T> {
    pub fn to_result(&self, key: &NaturalKey) -> Result<T, RecordError> {
        match self {
            Resolution::Resolved(value) => Ok(value.clone()),
            Resolution::Ambiguous(matches) => Err(RecordError::ReferenceAmbiguous {
                key: key.to_string(),
                matches: *matches,
            }),
            Resolution::NotFound => Err(RecordError::ReferenceNotFound(key.to_string())),
        }
    }
}
