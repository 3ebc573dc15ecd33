//! Store-agnostic vocabulary for rows and the filters that select them.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::cmp::Ordering;
use std::fmt;

use crate::domain::foundation::RowId;

/// Logical tables the importer reads and writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Table {
    Users,
    Aircraft,
    AccountEntryTypes,
    FlightTypes,
    AccountEntries,
    Flights,
    MemberContributions,
    ClubSettings,
}

impl Table {
    pub fn as_str(&self) -> &'static str {
        match self {
            Table::Users => "users",
            Table::Aircraft => "aircraft",
            Table::AccountEntryTypes => "account_entry_types",
            Table::FlightTypes => "flight_types",
            Table::AccountEntries => "account_entries",
            Table::Flights => "flights",
            Table::MemberContributions => "member_contributions",
            Table::ClubSettings => "club_settings",
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored row: identity plus an open field map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row {
    pub id: RowId,
    pub values: Map<String, Value>,
}

impl Row {
    pub fn new(id: RowId, values: Map<String, Value>) -> Self {
        Self { id, values }
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.values.get(field)
    }

    pub fn str_field(&self, field: &str) -> Option<&str> {
        self.values.get(field).and_then(Value::as_str)
    }

    pub fn f64_field(&self, field: &str) -> Option<f64> {
        self.values.get(field).and_then(Value::as_f64)
    }

    pub fn bool_field(&self, field: &str) -> Option<bool> {
        self.values.get(field).and_then(Value::as_bool)
    }
}

/// A single predicate on one field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Condition {
    Eq { field: String, value: Value },
    EqIgnoreCase { field: String, value: String },
    Lte { field: String, value: Value },
    Gte { field: String, value: Value },
}

impl Condition {
    pub fn field(&self) -> &str {
        match self {
            Condition::Eq { field, .. }
            | Condition::EqIgnoreCase { field, .. }
            | Condition::Lte { field, .. }
            | Condition::Gte { field, .. } => field,
        }
    }

    pub fn matches(&self, values: &Map<String, Value>) -> bool {
        let actual = match values.get(self.field()) {
            Some(v) if !v.is_null() => v,
            _ => return false,
        };
        match self {
            Condition::Eq { value, .. } => values_equal(actual, value),
            Condition::EqIgnoreCase { value, .. } => actual
                .as_str()
                .map(|s| s.eq_ignore_ascii_case(value))
                .unwrap_or(false),
            Condition::Lte { value, .. } => {
                matches!(compare(actual, value), Some(Ordering::Less | Ordering::Equal))
            }
            Condition::Gte { value, .. } => {
                matches!(compare(actual, value), Some(Ordering::Greater | Ordering::Equal))
            }
        }
    }
}

/// Conjunction of conditions. An empty filter matches every row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    pub conditions: Vec<Condition>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.conditions.push(Condition::Eq {
            field: field.into(),
            value: value.into(),
        });
        self
    }

    pub fn eq_ignore_case(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.conditions.push(Condition::EqIgnoreCase {
            field: field.into(),
            value: value.into(),
        });
        self
    }

    pub fn lte(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.conditions.push(Condition::Lte {
            field: field.into(),
            value: value.into(),
        });
        self
    }

    pub fn gte(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.conditions.push(Condition::Gte {
            field: field.into(),
            value: value.into(),
        });
        self
    }

    pub fn matches(&self, values: &Map<String, Value>) -> bool {
        self.conditions.iter().all(|c| c.matches(values))
    }
}

/// Numbers compare numerically so `100` and `100.0` are equal.
fn values_equal(a: &Value, b: &Value) -> bool {
    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) => x == y,
        _ => a == b,
    }
}

fn compare(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64()?.partial_cmp(&y.as_f64()?),
        (Value::String(x), Value::String(y)) => Some(x.cmp(y)),
        _ => None,
    }
}
