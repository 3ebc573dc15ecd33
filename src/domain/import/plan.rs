//! VALIDATE: turns a parsed record and its resolved references into the
//! write it will perform, with the natural key used to detect duplicates.

use serde_json::{json, Map, Value};
use std::collections::HashMap;

use super::errors::RecordError;
use super::query::{Filter, Row, Table};
use super::records::{
    AccountEntryRecord, BalanceRecord, ContributionRecord, EntryTypeRecord, FleetRecord,
    FlightRecord, FlightTypeRecord, MemberRecord, ParsedRecord, PaymentMethod, RefSlot,
    SettingRecord,
};
use super::rules::{apply_polarity, require_instructor, settle_hour_meters, Polarity};

/// Entities resolved for one record, by slot.
pub type ResolvedRefs = HashMap<RefSlot, Row>;

const BALANCE_DESCRIPTION: &str = "Opening balance";
const CONTRIBUTION_DESCRIPTION: &str = "Membership contribution";

/// How a non-duplicate record is written.
#[derive(Debug, Clone, PartialEq)]
pub enum WriteMode {
    Insert,
    Upsert(&'static [&'static str]),
}

/// A row written just before the main one, whose id the main row stores.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkedWrite {
    pub table: Table,
    pub values: Map<String, Value>,
    pub link_field: &'static str,
}

/// Everything COMMIT needs for one record.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedWrite {
    pub table: Table,
    pub values: Map<String, Value>,
    /// Selects an existing row with the same natural key.
    pub duplicate_key: Filter,
    /// Fields overwritten when replacing a duplicate; empty means all.
    pub replace_fields: &'static [&'static str],
    pub mode: WriteMode,
    pub linked: Option<LinkedWrite>,
    /// A duplicate flagged `is_system` fails the record instead of being
    /// skipped or replaced.
    pub guards_system_rows: bool,
}

impl PreparedWrite {
    fn new(table: Table, values: Value, duplicate_key: Filter) -> Self {
        Self {
            table,
            values: into_map(values),
            duplicate_key,
            replace_fields: &[],
            mode: WriteMode::Insert,
            linked: None,
            guards_system_rows: false,
        }
    }

    fn replacing(mut self, fields: &'static [&'static str]) -> Self {
        self.replace_fields = fields;
        self
    }

    /// Values written over an existing duplicate row.
    pub fn replacement_values(&self) -> Map<String, Value> {
        if self.replace_fields.is_empty() {
            return self.values.clone();
        }
        self.replace_fields
            .iter()
            .filter_map(|f| self.values.get(*f).map(|v| (f.to_string(), v.clone())))
            .collect()
    }
}

/// Applies the business rules of a record against its resolved references.
pub fn prepare(record: &ParsedRecord, refs: &ResolvedRefs) -> Result<PreparedWrite, RecordError> {
    match record {
        ParsedRecord::Balance(r) => prepare_balance(r, refs),
        ParsedRecord::AccountEntry(r) => prepare_entry(r, refs),
        ParsedRecord::Flight(r) => prepare_flight(r, refs),
        ParsedRecord::Contribution(r) => prepare_contribution(r, refs),
        ParsedRecord::Fleet(r) => Ok(prepare_fleet(r)),
        ParsedRecord::Member(r) => Ok(prepare_member(r)),
        ParsedRecord::EntryType(r) => Ok(prepare_entry_type(r)),
        ParsedRecord::FlightType(r) => Ok(prepare_flight_type(r)),
        ParsedRecord::Setting(r) => Ok(prepare_setting(r)),
    }
}

fn slot<'a>(refs: &'a ResolvedRefs, slot: RefSlot) -> Result<&'a Row, RecordError> {
    refs.get(&slot)
        .ok_or_else(|| RecordError::ReferenceNotFound(format!("{:?} reference", slot)))
}

fn id_of(row: &Row) -> Value {
    json!(row.id.to_string())
}

/// Balances carry their own sign; the balance type's polarity does not apply.
fn prepare_balance(r: &BalanceRecord, refs: &ResolvedRefs) -> Result<PreparedWrite, RecordError> {
    let user = id_of(slot(refs, RefSlot::Owner)?);
    let entry_type = id_of(slot(refs, RefSlot::EntryType)?);

    let key = Filter::new()
        .eq("user_id", user.clone())
        .eq("date", r.date.as_str())
        .eq("entry_type_id", entry_type.clone())
        .eq("amount", r.amount);

    Ok(PreparedWrite::new(
        Table::AccountEntries,
        json!({
            "user_id": user,
            "entry_type_id": entry_type,
            "date": r.date,
            "amount": r.amount,
            "payment_method": PaymentMethod::Account.as_str(),
            "description": r.description.as_deref().unwrap_or(BALANCE_DESCRIPTION),
        }),
        key,
    )
    .replacing(&["amount", "description"]))
}

fn prepare_entry(r: &AccountEntryRecord, refs: &ResolvedRefs) -> Result<PreparedWrite, RecordError> {
    let user = id_of(slot(refs, RefSlot::Owner)?);
    let entry_type = slot(refs, RefSlot::EntryType)?;
    let amount = apply_polarity(r.amount, Polarity::of_entry_type(entry_type))?;
    let entry_type = id_of(entry_type);

    let key = Filter::new()
        .eq("user_id", user.clone())
        .eq("entry_type_id", entry_type.clone())
        .eq("date", r.date.as_str());

    Ok(PreparedWrite::new(
        Table::AccountEntries,
        json!({
            "user_id": user,
            "entry_type_id": entry_type,
            "date": r.date,
            "amount": amount,
            "payment_method": r.payment_method.as_str(),
            "description": r.description,
        }),
        key,
    ))
}

fn prepare_flight(r: &FlightRecord, refs: &ResolvedRefs) -> Result<PreparedWrite, RecordError> {
    let user = id_of(slot(refs, RefSlot::Owner)?);
    let aircraft = slot(refs, RefSlot::Aircraft)?;
    let flight_type = id_of(slot(refs, RefSlot::FlightType)?);

    let instructor = match &r.instructor_login {
        Some(_) => {
            let row = slot(refs, RefSlot::Instructor)?;
            require_instructor(row)?;
            id_of(row)
        }
        None => Value::Null,
    };

    let (start, end) = settle_hour_meters(r.start_hour_meter, r.end_hour_meter, aircraft)?;
    let aircraft = id_of(aircraft);

    let key = Filter::new()
        .eq("user_id", user.clone())
        .eq("aircraft_id", aircraft.clone())
        .eq("date", r.date.as_str())
        .eq("start_hour_meter", start);

    Ok(PreparedWrite::new(
        Table::Flights,
        json!({
            "user_id": user,
            "aircraft_id": aircraft,
            "flight_type_id": flight_type,
            "instructor_id": instructor,
            "date": r.date,
            "duration": r.duration,
            "hourly_rate": r.hourly_rate,
            "cost": r.cost,
            "payment_method": r.payment_method.as_str(),
            "is_validated": false,
            "start_hour_meter": start,
            "end_hour_meter": end,
            "instructor_cost": r.instructor_fee,
        }),
        key,
    ))
}

/// The duplicate key matches any contribution of the same owner whose
/// validity period overlaps this one.
fn prepare_contribution(
    r: &ContributionRecord,
    refs: &ResolvedRefs,
) -> Result<PreparedWrite, RecordError> {
    let user = id_of(slot(refs, RefSlot::Owner)?);

    let linked = match &r.account_entry {
        Some(entry) => {
            let entry_type = slot(refs, RefSlot::EntryType)?;
            let amount = apply_polarity(entry.amount, Polarity::of_entry_type(entry_type))?;
            Some(LinkedWrite {
                table: Table::AccountEntries,
                values: into_map(json!({
                    "user_id": user,
                    "entry_type_id": id_of(entry_type),
                    "date": entry.date,
                    "amount": amount,
                    "payment_method": entry.payment_method.as_str(),
                    "description": CONTRIBUTION_DESCRIPTION,
                })),
                link_field: "account_entry_id",
            })
        }
        None => None,
    };

    let key = Filter::new()
        .eq("user_id", user.clone())
        .gte("valid_until", r.valid_from.as_str())
        .lte("valid_from", r.valid_until.as_str());

    let mut write = PreparedWrite::new(
        Table::MemberContributions,
        json!({
            "user_id": user,
            "valid_from": r.valid_from,
            "valid_until": r.valid_until,
            "document_url": r.document_url,
        }),
        key,
    )
    .replacing(&["valid_from", "valid_until", "document_url"]);
    write.linked = linked;
    Ok(write)
}

fn prepare_fleet(r: &FleetRecord) -> PreparedWrite {
    PreparedWrite::new(
        Table::Aircraft,
        json!({
            "name": r.name.as_deref().unwrap_or(&r.registration),
            "type": r.kind.as_str(),
            "registration": r.registration,
            "hourly_rate": r.hourly_rate,
            "capacity": r.capacity,
            "status": r.status.as_str(),
        }),
        Filter::new().eq_ignore_case("registration", r.registration.as_str()),
    )
}

fn prepare_member(r: &MemberRecord) -> PreparedWrite {
    PreparedWrite::new(
        Table::Users,
        json!({
            "first_name": r.first_name,
            "last_name": r.last_name,
            "email": r.email,
            "login": r.login,
            "role": r.role.as_str(),
            "phone": r.phone,
        }),
        Filter::new().eq_ignore_case("email", r.email.as_str()),
    )
}

/// Imported types are never system types.
fn prepare_entry_type(r: &EntryTypeRecord) -> PreparedWrite {
    let mut write = PreparedWrite::new(
        Table::AccountEntryTypes,
        json!({
            "code": r.code,
            "name": r.name,
            "is_credit": r.is_credit,
            "description": r.description,
            "is_system": false,
        }),
        Filter::new().eq_ignore_case("code", r.code.as_str()),
    )
    .replacing(&["name", "is_credit", "description"]);
    write.guards_system_rows = true;
    write
}

fn prepare_flight_type(r: &FlightTypeRecord) -> PreparedWrite {
    PreparedWrite::new(
        Table::FlightTypes,
        json!({
            "code": r.code,
            "name": r.name,
            "requires_instructor": r.requires_instructor,
            "accounting_category": r.accounting_category.as_str(),
            "description": r.description,
        }),
        Filter::new().eq_ignore_case("code", r.code.as_str()),
    )
    .replacing(&["name", "requires_instructor", "accounting_category", "description"])
}

fn prepare_setting(r: &SettingRecord) -> PreparedWrite {
    let mut write = PreparedWrite::new(
        Table::ClubSettings,
        json!({"name": r.name, "value": r.value}),
        Filter::new().eq("name", r.name.as_str()),
    );
    write.mode = WriteMode::Upsert(&["name"]);
    write
}

fn into_map(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}
