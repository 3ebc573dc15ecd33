//! Import batches and the bulk documents they are read from.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use super::errors::ImportError;
use super::kind::{DuplicatePolicy, RecordKind};
use crate::domain::onboarding::{is_complete, ClubConfigDraft};

/// One submitted record, as received.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawRecord(Map<String, Value>);

impl RawRecord {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    /// First non-null value among `names`, with the name that supplied it.
    pub fn first_present<'a>(&self, names: &[&'a str]) -> Option<(&'a str, &Value)> {
        names
            .iter()
            .find_map(|name| self.0.get(*name).filter(|v| !v.is_null()).map(|v| (*name, v)))
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

impl From<Map<String, Value>> for RawRecord {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}

/// A batch handed to the reconciliation pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportBatch {
    pub kind: RecordKind,
    pub records: Vec<RawRecord>,
    pub policy: DuplicatePolicy,
}

impl ImportBatch {
    pub fn new(kind: RecordKind, records: Vec<RawRecord>, policy: DuplicatePolicy) -> Self {
        Self {
            kind,
            records,
            policy,
        }
    }

    /// Reads a bulk document holding exactly one top-level list field named
    /// for `kind`. Anything else rejects the document before PARSE.
    pub fn from_document(
        kind: RecordKind,
        document: Value,
        policy: DuplicatePolicy,
    ) -> Result<Self, ImportError> {
        let allowed = kind.list_fields();
        if allowed.is_empty() {
            return Err(ImportError::invalid_document(format!(
                "{} batches cannot be submitted as documents",
                kind
            )));
        }

        let Value::Object(mut top) = document else {
            return Err(ImportError::invalid_document("document must be a JSON object"));
        };
        if top.len() != 1 {
            return Err(ImportError::invalid_document(format!(
                "document must contain exactly one field, one of [{}]",
                allowed.join(", ")
            )));
        }

        let Some(field) = allowed.iter().copied().find(|f| top.contains_key(*f)) else {
            let found = top.keys().next().cloned().unwrap_or_default();
            return Err(ImportError::invalid_document(format!(
                "unexpected field '{}', expected one of [{}]",
                found,
                allowed.join(", ")
            )));
        };

        let Some(Value::Array(items)) = top.remove(field) else {
            return Err(ImportError::invalid_document(format!("'{}' must be a list", field)));
        };

        let records = items
            .into_iter()
            .enumerate()
            .map(|(i, item)| match item {
                Value::Object(map) => Ok(RawRecord::new(map)),
                _ => Err(ImportError::invalid_document(format!(
                    "{}[{}] must be an object",
                    field, i
                ))),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self::new(kind, records, policy))
    }

    /// Reshapes a completed draft into `fleet_item`, `member` and `setting` records.
    pub fn from_draft(draft: &ClubConfigDraft, policy: DuplicatePolicy) -> Result<Self, ImportError> {
        if !is_complete(draft) {
            return Err(ImportError::DraftIncomplete);
        }

        let mut records = Vec::with_capacity(
            draft.fleet_items.len() + draft.members.len() + draft.settings.len(),
        );

        for item in &draft.fleet_items {
            records.push(tagged(
                "fleet_item",
                json!({
                    "type": item.kind.as_str(),
                    "registration": item.tail_number,
                    "hourly_rate": item.rate,
                    "capacity": item.capacity,
                    "status": item.status.as_str(),
                }),
            ));
        }

        for member in &draft.members {
            records.push(tagged(
                "member",
                json!({
                    "first_name": member.first_name,
                    "last_name": member.last_name,
                    "email": member.email,
                    "role": member.role.as_str(),
                }),
            ));
        }

        for (name, value) in &draft.settings {
            records.push(tagged("setting", json!({"name": name, "value": value})));
        }

        Ok(Self::new(RecordKind::Draft, records, policy))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn tagged(entity: &str, body: Value) -> RawRecord {
    let mut fields = match body {
        Value::Object(map) => map,
        _ => Map::new(),
    };
    fields.insert("entity".to_string(), Value::String(entity.to_string()));
    RawRecord::new(fields)
}
