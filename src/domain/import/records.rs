//! Typed records produced by PARSE.
//!
//! PARSE is purely structural: required fields, enum membership, two-decimal
//! precision, date patterns and ordering within one record. Anything needing
//! a resolved entity waits for VALIDATE.

use serde_json::Value;
use std::fmt;

use super::batch::RawRecord;
use super::fields::Fields;
use super::kind::RecordKind;
use super::resolve::{NaturalKey, OwnerRef};
use crate::domain::foundation::patterns::{EMAIL, ENTRY_TYPE_CODE, PHONE, REGISTRATION};
use crate::domain::foundation::ValidationError;
use crate::domain::onboarding::{FleetKind, FleetStatus, MemberRole};

const LOGIN: &[&str] = &["user_login", "login"];
const FIRST_NAME: &[&str] = &["firstname", "first_name", "firstName"];
const LAST_NAME: &[&str] = &["lastname", "last_name", "lastName"];
const ENTRY_TYPE: &[&str] = &["entry_type_code", "typeCode", "type_code"];
const PAYMENT_METHOD: &[&str] = &["payment_method", "paymentMethod"];

const BALANCE_MIN: f64 = -100_000.0;

/// How a movement was paid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum PaymentMethod {
    #[default]
    Account,
    Card,
    Cash,
    Transfer,
    Check,
}

impl PaymentMethod {
    pub const ALLOWED: [&'static str; 5] = ["ACCOUNT", "CARD", "CASH", "TRANSFER", "CHECK"];

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Account => "ACCOUNT",
            PaymentMethod::Card => "CARD",
            PaymentMethod::Cash => "CASH",
            PaymentMethod::Transfer => "TRANSFER",
            PaymentMethod::Check => "CHECK",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_uppercase().as_str() {
            "ACCOUNT" => Some(PaymentMethod::Account),
            "CARD" => Some(PaymentMethod::Card),
            "CASH" => Some(PaymentMethod::Cash),
            "TRANSFER" => Some(PaymentMethod::Transfer),
            "CHECK" => Some(PaymentMethod::Check),
            _ => None,
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BalanceRecord {
    pub owner: OwnerRef,
    pub amount: f64,
    pub date: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AccountEntryRecord {
    pub owner: OwnerRef,
    pub amount: f64,
    pub date: String,
    pub type_code: String,
    pub payment_method: PaymentMethod,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FlightRecord {
    pub owner: OwnerRef,
    pub aircraft_registration: String,
    pub flight_type_code: String,
    pub date: String,
    /// Minutes.
    pub duration: u32,
    pub hourly_rate: f64,
    pub cost: f64,
    pub payment_method: PaymentMethod,
    pub instructor_login: Option<String>,
    pub instructor_fee: Option<f64>,
    pub start_hour_meter: Option<f64>,
    pub end_hour_meter: Option<f64>,
}

/// Account entry written together with a contribution.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkedEntry {
    pub amount: f64,
    pub payment_method: PaymentMethod,
    pub type_code: String,
    pub date: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ContributionRecord {
    pub owner: OwnerRef,
    pub valid_from: String,
    pub valid_until: String,
    pub document_url: Option<String>,
    pub account_entry: Option<LinkedEntry>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FleetRecord {
    pub name: Option<String>,
    pub kind: FleetKind,
    pub registration: String,
    pub hourly_rate: Option<f64>,
    pub capacity: u8,
    pub status: FleetStatus,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MemberRecord {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub login: String,
    pub role: MemberRole,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EntryTypeRecord {
    pub code: String,
    pub name: String,
    pub is_credit: bool,
    pub description: Option<String>,
}

/// Where a flight type's revenue is booked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum AccountingCategory {
    #[default]
    Local,
    Instruction,
    Travel,
}

impl AccountingCategory {
    pub const ALLOWED: [&'static str; 3] = ["LOCAL", "INSTRUCTION", "TRAVEL"];

    pub fn as_str(&self) -> &'static str {
        match self {
            AccountingCategory::Local => "LOCAL",
            AccountingCategory::Instruction => "INSTRUCTION",
            AccountingCategory::Travel => "TRAVEL",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_uppercase().as_str() {
            "LOCAL" => Some(AccountingCategory::Local),
            "INSTRUCTION" => Some(AccountingCategory::Instruction),
            "TRAVEL" => Some(AccountingCategory::Travel),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FlightTypeRecord {
    pub code: String,
    pub name: String,
    pub requires_instructor: bool,
    pub accounting_category: AccountingCategory,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SettingRecord {
    pub name: String,
    pub value: Value,
}

/// A record that passed PARSE.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedRecord {
    Balance(BalanceRecord),
    AccountEntry(AccountEntryRecord),
    Flight(FlightRecord),
    Contribution(ContributionRecord),
    Fleet(FleetRecord),
    Member(MemberRecord),
    EntryType(EntryTypeRecord),
    FlightType(FlightTypeRecord),
    Setting(SettingRecord),
}

/// The role a reference plays inside a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RefSlot {
    Owner,
    EntryType,
    FlightType,
    Aircraft,
    Instructor,
}

impl ParsedRecord {
    /// Applies the PARSE rules of `kind` to one raw record.
    pub fn parse(kind: RecordKind, record: &RawRecord) -> Result<Self, ValidationError> {
        let f = Fields::new(record);
        match kind {
            RecordKind::Balances => parse_balance(&f).map(ParsedRecord::Balance),
            RecordKind::AccountingEntries => parse_entry(&f).map(ParsedRecord::AccountEntry),
            RecordKind::Flights => parse_flight(&f).map(ParsedRecord::Flight),
            RecordKind::MemberContributions => {
                parse_contribution(&f).map(ParsedRecord::Contribution)
            }
            RecordKind::Fleet => parse_fleet(&f).map(ParsedRecord::Fleet),
            RecordKind::Members => parse_member(&f).map(ParsedRecord::Member),
            RecordKind::EntryTypes => parse_entry_type(&f).map(ParsedRecord::EntryType),
            RecordKind::FlightTypes => parse_flight_type(&f).map(ParsedRecord::FlightType),
            RecordKind::Draft => {
                let entity = f.required_str(&["entity"])?;
                match entity.as_str() {
                    "fleet_item" => parse_fleet(&f).map(ParsedRecord::Fleet),
                    "member" => parse_member(&f).map(ParsedRecord::Member),
                    "setting" => parse_setting(&f).map(ParsedRecord::Setting),
                    _ => Err(ValidationError::not_allowed(
                        "entity",
                        &["fleet_item", "member", "setting"],
                        entity,
                    )),
                }
            }
        }
    }

    /// Natural-key references to resolve before VALIDATE.
    pub fn references(&self, balance_type_code: &str) -> Vec<(RefSlot, NaturalKey)> {
        match self {
            ParsedRecord::Balance(r) => vec![
                (RefSlot::Owner, r.owner.natural_key()),
                (RefSlot::EntryType, NaturalKey::entry_type(balance_type_code)),
            ],
            ParsedRecord::AccountEntry(r) => vec![
                (RefSlot::Owner, r.owner.natural_key()),
                (RefSlot::EntryType, NaturalKey::entry_type(&r.type_code)),
            ],
            ParsedRecord::Flight(r) => {
                let mut refs = vec![
                    (RefSlot::Owner, r.owner.natural_key()),
                    (RefSlot::Aircraft, NaturalKey::aircraft(&r.aircraft_registration)),
                    (RefSlot::FlightType, NaturalKey::flight_type(&r.flight_type_code)),
                ];
                if let Some(login) = &r.instructor_login {
                    refs.push((RefSlot::Instructor, NaturalKey::user_login(login)));
                }
                refs
            }
            ParsedRecord::Contribution(r) => {
                let mut refs = vec![(RefSlot::Owner, r.owner.natural_key())];
                if let Some(entry) = &r.account_entry {
                    refs.push((RefSlot::EntryType, NaturalKey::entry_type(&entry.type_code)));
                }
                refs
            }
            ParsedRecord::Fleet(_)
            | ParsedRecord::Member(_)
            | ParsedRecord::EntryType(_)
            | ParsedRecord::FlightType(_)
            | ParsedRecord::Setting(_) => Vec::new(),
        }
    }
}

/// Login wins over names when both are given.
fn parse_owner(f: &Fields<'_>) -> Result<OwnerRef, ValidationError> {
    if let Some(login) = f.optional_str(LOGIN)? {
        return Ok(OwnerRef::Login(login));
    }
    match (f.optional_str(FIRST_NAME)?, f.optional_str(LAST_NAME)?) {
        (Some(first), Some(last)) => Ok(OwnerRef::Name { first, last }),
        (Some(_), None) => Err(ValidationError::empty_field("lastname")),
        (None, Some(_)) => Err(ValidationError::empty_field("firstname")),
        (None, None) => Err(ValidationError::empty_field("user_login")),
    }
}

fn payment_method(f: &Fields<'_>) -> Result<Option<PaymentMethod>, ValidationError> {
    f.optional_enum(PAYMENT_METHOD, &PaymentMethod::ALLOWED, PaymentMethod::parse)
}

fn parse_balance(f: &Fields<'_>) -> Result<BalanceRecord, ValidationError> {
    let owner = parse_owner(f)?;
    let amount = f.required_number(&["amount"])?;
    let amount = f.check_money(&["amount"], amount, BALANCE_MIN, f64::MAX)?;
    Ok(BalanceRecord {
        owner,
        amount,
        date: f.required_date(&["date"])?,
        description: f.optional_str(&["description"])?,
    })
}

fn parse_entry(f: &Fields<'_>) -> Result<AccountEntryRecord, ValidationError> {
    let owner = parse_owner(f)?;
    let amount = f.required_number(&["amount"])?;
    let amount = f.check_money(&["amount"], amount, f64::MIN, f64::MAX)?;
    Ok(AccountEntryRecord {
        owner,
        amount,
        date: f.required_date(&["date"])?,
        type_code: f.required_str(ENTRY_TYPE)?,
        payment_method: payment_method(f)?.unwrap_or_default(),
        description: f.optional_str(&["description"])?,
    })
}

fn parse_flight(f: &Fields<'_>) -> Result<FlightRecord, ValidationError> {
    let owner = parse_owner(f)?;
    let duration = f.required_number(&["duration"])?;
    if duration < 1.0 || duration.fract() != 0.0 || duration > f64::from(u32::MAX) {
        return Err(ValidationError::out_of_range(
            "duration",
            1.0,
            f64::from(u32::MAX),
            duration,
        ));
    }

    let start_hour_meter = f.optional_money(&["start_hour_meter"], 0.0)?;
    let end_hour_meter = f.optional_money(&["end_hour_meter"], 0.0)?;
    if let (Some(start), Some(end)) = (start_hour_meter, end_hour_meter) {
        if end < start {
            return Err(ValidationError::invalid_format(
                "end_hour_meter",
                "must not be lower than start_hour_meter",
            ));
        }
    }

    Ok(FlightRecord {
        owner,
        aircraft_registration: f.required_str(&["aircraft_registration", "registration"])?,
        flight_type_code: f.required_str(&["flight_type_code"])?,
        date: f.required_date(&["date"])?,
        duration: duration as u32,
        hourly_rate: f.required_money(&["hourly_rate"], 0.0)?,
        cost: f.required_money(&["cost"], 0.0)?,
        payment_method: payment_method(f)?
            .ok_or_else(|| ValidationError::empty_field("payment_method"))?,
        instructor_login: f.optional_str(&["instructor_login"])?,
        instructor_fee: f.optional_money(&["instructor_fee"], 0.0)?,
        start_hour_meter,
        end_hour_meter,
    })
}

fn parse_contribution(f: &Fields<'_>) -> Result<ContributionRecord, ValidationError> {
    let owner = parse_owner(f)?;
    let valid_from = f.required_date(&["valid_from"])?;
    let valid_until = f.required_date(&["valid_until"])?;
    if valid_until < valid_from {
        return Err(ValidationError::invalid_format(
            "valid_until",
            "must not be earlier than valid_from",
        ));
    }

    let account_entry = match f.object(&["account_entry"])? {
        None => None,
        Some(nested) => {
            let e = Fields::nested(&nested, "account_entry");
            Some(LinkedEntry {
                amount: e.required_money(&["amount"], 0.0)?,
                payment_method: e
                    .optional_enum(PAYMENT_METHOD, &PaymentMethod::ALLOWED, PaymentMethod::parse)?
                    .unwrap_or_default(),
                type_code: e.required_str(ENTRY_TYPE)?,
                date: e.optional_date(&["date"])?.unwrap_or_else(|| valid_from.clone()),
            })
        }
    };

    Ok(ContributionRecord {
        owner,
        valid_from,
        valid_until,
        document_url: f.optional_str(&["document_url"])?,
        account_entry,
    })
}

fn parse_fleet(f: &Fields<'_>) -> Result<FleetRecord, ValidationError> {
    let kind = f
        .optional_enum(&["type", "kind"], &["PLANE", "ULM"], |s| {
            match s.to_ascii_uppercase().as_str() {
                "PLANE" => Some(FleetKind::Plane),
                "ULM" => Some(FleetKind::Ulm),
                _ => None,
            }
        })?
        .ok_or_else(|| ValidationError::empty_field("type"))?;

    let registration = f
        .required_str(&["registration", "tailNumber", "tail_number"])?
        .to_uppercase();
    if !REGISTRATION.is_match(&registration) {
        return Err(ValidationError::invalid_format(
            "registration",
            "letters and digits with an optional hyphen",
        ));
    }

    let capacity = match f.optional_number(&["capacity"])? {
        None => kind.default_capacity(),
        Some(c) if (1.0..=99.0).contains(&c) && c.fract() == 0.0 => c as u8,
        Some(c) => return Err(ValidationError::out_of_range("capacity", 1.0, 99.0, c)),
    };

    Ok(FleetRecord {
        name: f.optional_str(&["name"])?,
        kind,
        registration,
        hourly_rate: f.optional_money(&["hourly_rate", "rate"], 0.0)?,
        capacity,
        status: f
            .optional_enum(&["status"], &FleetStatus::ALLOWED, FleetStatus::parse)?
            .unwrap_or_default(),
    })
}

fn parse_member(f: &Fields<'_>) -> Result<MemberRecord, ValidationError> {
    let first_name = f.required_str(FIRST_NAME)?;
    let last_name = f.required_str(LAST_NAME)?;
    let email = f.required_str(&["email"])?.to_lowercase();
    if !EMAIL.is_match(&email) {
        return Err(ValidationError::invalid_format("email", "not an email address"));
    }

    let login = match f.optional_str(LOGIN)? {
        Some(login) => login.to_lowercase(),
        None => email.split('@').next().unwrap_or_default().to_string(),
    };

    let phone = f.optional_str(&["phone"])?;
    if let Some(phone) = &phone {
        if !PHONE.is_match(phone) {
            return Err(ValidationError::invalid_format("phone", "not a phone number"));
        }
    }

    Ok(MemberRecord {
        first_name,
        last_name,
        email,
        login,
        role: f
            .optional_enum(&["role"], &MemberRole::ALLOWED, MemberRole::parse)?
            .unwrap_or(MemberRole::Pilot),
        phone,
    })
}

fn parse_entry_type(f: &Fields<'_>) -> Result<EntryTypeRecord, ValidationError> {
    let code = f.required_str(&["code"])?;
    if !ENTRY_TYPE_CODE.is_match(&code) {
        return Err(ValidationError::invalid_format(
            "code",
            "2 to 20 uppercase letters, digits or underscores",
        ));
    }
    Ok(EntryTypeRecord {
        code,
        name: f.required_str(&["name"])?,
        is_credit: f.required_bool(&["is_credit", "isCredit"])?,
        description: f.optional_str(&["description"])?,
    })
}

/// The code is what flight imports reference; the name defaults to it.
fn parse_flight_type(f: &Fields<'_>) -> Result<FlightTypeRecord, ValidationError> {
    let code = f.required_str(&["code", "flight_type_code"])?;
    Ok(FlightTypeRecord {
        name: f.optional_str(&["name"])?.unwrap_or_else(|| code.clone()),
        code,
        requires_instructor: f
            .optional_bool(&["requires_instructor"])?
            .unwrap_or(false),
        accounting_category: f
            .optional_enum(
                &["accounting_category"],
                &AccountingCategory::ALLOWED,
                AccountingCategory::parse,
            )?
            .unwrap_or_default(),
        description: f.optional_str(&["description"])?,
    })
}

fn parse_setting(f: &Fields<'_>) -> Result<SettingRecord, ValidationError> {
    let name = f.required_str(&["name"])?;
    let value = f
        .value(&["value"])
        .cloned()
        .ok_or_else(|| ValidationError::empty_field("value"))?;
    Ok(SettingRecord { name, value })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(v: Value) -> RawRecord {
        RawRecord::new(v.as_object().cloned().unwrap())
    }

    fn parse(kind: RecordKind, v: Value) -> Result<ParsedRecord, ValidationError> {
        ParsedRecord::parse(kind, &raw(v))
    }

    #[test]
    fn entry_accepts_type_code_alias_and_defaults_payment() {
        let parsed = parse(
            RecordKind::AccountingEntries,
            json!({"login": "jdupont", "amount": 100, "date": "2024-01-15", "typeCode": "FLIGHT_PAYMENT"}),
        )
        .unwrap();
        let ParsedRecord::AccountEntry(entry) = parsed else {
            panic!("expected an account entry");
        };
        assert_eq!(entry.owner, OwnerRef::Login("jdupont".into()));
        assert_eq!(entry.type_code, "FLIGHT_PAYMENT");
        assert_eq!(entry.payment_method, PaymentMethod::Account);
    }

    #[test]
    fn login_is_preferred_over_names() {
        let parsed = parse(
            RecordKind::Balances,
            json!({"user_login": "jdupont", "firstname": "Jean", "lastname": "Dupont", "amount": -12.5, "date": "2024-01-01"}),
        )
        .unwrap();
        let ParsedRecord::Balance(balance) = parsed else {
            panic!("expected a balance");
        };
        assert_eq!(balance.owner, OwnerRef::Login("jdupont".into()));
    }

    #[test]
    fn owner_requires_login_or_both_names() {
        let err = parse(
            RecordKind::Balances,
            json!({"firstname": "Jean", "amount": 1, "date": "2024-01-01"}),
        )
        .unwrap_err();
        assert_eq!(err.field(), "lastname");
    }

    #[test]
    fn balance_floor_and_precision() {
        assert!(parse(
            RecordKind::Balances,
            json!({"login": "a", "amount": -100001, "date": "2024-01-01"})
        )
        .is_err());
        assert!(parse(
            RecordKind::Balances,
            json!({"login": "a", "amount": 1.005, "date": "2024-01-01"})
        )
        .is_err());
    }

    fn flight() -> Value {
        json!({
            "firstname": "Jean", "lastname": "Dupont",
            "aircraft_registration": "F-ABCD", "flight_type_code": "LOCAL",
            "date": "2024-03-02", "duration": 60, "hourly_rate": 150, "cost": 150,
            "payment_method": "ACCOUNT"
        })
    }

    #[test]
    fn flight_requires_known_payment_method() {
        let mut v = flight();
        v["payment_method"] = json!("BITCOIN");
        assert!(matches!(
            parse(RecordKind::Flights, v),
            Err(ValidationError::NotAllowed { .. })
        ));
    }

    #[test]
    fn flight_hour_meters_must_be_ordered() {
        let mut v = flight();
        v["start_hour_meter"] = json!(1200.5);
        v["end_hour_meter"] = json!(1199.0);
        assert_eq!(parse(RecordKind::Flights, v).unwrap_err().field(), "end_hour_meter");
    }

    #[test]
    fn flight_duration_is_at_least_one_minute() {
        let mut v = flight();
        v["duration"] = json!(0);
        assert_eq!(parse(RecordKind::Flights, v).unwrap_err().field(), "duration");
    }

    #[test]
    fn flight_references_include_instructor() {
        let mut v = flight();
        v["instructor_login"] = json!("pmartin");
        let refs = parse(RecordKind::Flights, v).unwrap().references("BALANCE");
        assert_eq!(refs.len(), 4);
        assert_eq!(refs[3], (RefSlot::Instructor, NaturalKey::user_login("pmartin")));
    }

    #[test]
    fn contribution_period_and_linked_entry() {
        let parsed = parse(
            RecordKind::MemberContributions,
            json!({
                "firstname": "Jean", "lastname": "Dupont",
                "valid_from": "2024-01-01", "valid_until": "2024-12-31",
                "account_entry": {"amount": 150, "entry_type_code": "CONTRIBUTION"}
            }),
        )
        .unwrap();
        let ParsedRecord::Contribution(c) = &parsed else {
            panic!("expected a contribution");
        };
        let entry = c.account_entry.as_ref().unwrap();
        assert_eq!(entry.date, "2024-01-01");
        assert_eq!(parsed.references("BALANCE")[1].1, NaturalKey::entry_type("CONTRIBUTION"));

        let err = parse(
            RecordKind::MemberContributions,
            json!({"login": "a", "valid_from": "2024-06-01", "valid_until": "2024-01-01"}),
        )
        .unwrap_err();
        assert_eq!(err.field(), "valid_until");
    }

    #[test]
    fn linked_entry_amount_cannot_be_negative() {
        let err = parse(
            RecordKind::MemberContributions,
            json!({
                "login": "a", "valid_from": "2024-01-01", "valid_until": "2024-12-31",
                "account_entry": {"amount": -1, "entry_type_code": "CONTRIBUTION"}
            }),
        )
        .unwrap_err();
        assert_eq!(err.field(), "account_entry.amount");
    }

    #[test]
    fn fleet_registration_and_capacity() {
        let parsed = parse(RecordKind::Fleet, json!({"type": "ulm", "registration": "f-jxyz"})).unwrap();
        let ParsedRecord::Fleet(item) = parsed else {
            panic!("expected a fleet item");
        };
        assert_eq!(item.registration, "F-JXYZ");
        assert_eq!(item.capacity, 2);

        assert!(parse(RecordKind::Fleet, json!({"type": "PLANE", "registration": "F ABCD"})).is_err());
        assert!(parse(
            RecordKind::Fleet,
            json!({"type": "PLANE", "registration": "F-ABCD", "capacity": 120})
        )
        .is_err());
    }

    #[test]
    fn member_login_derives_from_email() {
        let parsed = parse(
            RecordKind::Members,
            json!({"first_name": "Jean", "last_name": "Dupont", "email": "Jean.Dupont@Club.example"}),
        )
        .unwrap();
        let ParsedRecord::Member(member) = parsed else {
            panic!("expected a member");
        };
        assert_eq!(member.email, "jean.dupont@club.example");
        assert_eq!(member.login, "jean.dupont");
        assert_eq!(member.role, MemberRole::Pilot);
    }

    #[test]
    fn member_email_pattern_enforced() {
        assert!(parse(
            RecordKind::Members,
            json!({"first_name": "A", "last_name": "B", "email": "not-an-email"})
        )
        .is_err());
    }

    #[test]
    fn entry_type_needs_code_pattern_and_boolean_credit() {
        let parsed = parse(
            RecordKind::EntryTypes,
            json!({"code": "FUEL", "name": "Fuel", "is_credit": false}),
        )
        .unwrap();
        assert!(parsed.references("BALANCE").is_empty());
        let ParsedRecord::EntryType(t) = parsed else {
            panic!("expected an entry type");
        };
        assert!(!t.is_credit);

        let err = parse(
            RecordKind::EntryTypes,
            json!({"code": "fuel", "name": "Fuel", "is_credit": false}),
        )
        .unwrap_err();
        assert_eq!(err.field(), "code");

        let err = parse(
            RecordKind::EntryTypes,
            json!({"code": "FUEL", "name": "Fuel", "is_credit": "yes"}),
        )
        .unwrap_err();
        assert_eq!(err.field(), "is_credit");

        let err = parse(RecordKind::EntryTypes, json!({"code": "FUEL", "is_credit": true})).unwrap_err();
        assert_eq!(err.field(), "name");
    }

    #[test]
    fn flight_type_defaults_name_and_category() {
        let parsed = parse(RecordKind::FlightTypes, json!({"code": "LOCAL"})).unwrap();
        let ParsedRecord::FlightType(t) = parsed else {
            panic!("expected a flight type");
        };
        assert_eq!(t.name, "LOCAL");
        assert_eq!(t.accounting_category, AccountingCategory::Local);
        assert!(!t.requires_instructor);

        assert!(matches!(
            parse(
                RecordKind::FlightTypes,
                json!({"code": "NAV", "accounting_category": "CARGO"})
            ),
            Err(ValidationError::NotAllowed { .. })
        ));
    }

    #[test]
    fn draft_records_dispatch_on_entity() {
        assert!(matches!(
            parse(RecordKind::Draft, json!({"entity": "setting", "name": "currency", "value": "EUR"})),
            Ok(ParsedRecord::Setting(_))
        ));
        assert!(parse(RecordKind::Draft, json!({"entity": "invoice"})).is_err());
        // A role-only draft member cannot become a user.
        assert!(parse(RecordKind::Draft, json!({"entity": "member", "role": "PILOT"})).is_err());
    }
}
