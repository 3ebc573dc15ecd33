//! Business rules that need resolved entities.

use super::errors::RecordError;
use super::query::Row;
use crate::domain::onboarding::MemberRole;

/// Direction an entry type moves a member balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    Credit,
    Debit,
}

impl Polarity {
    /// Reads `is_credit` from a resolved entry type row. Missing means debit.
    pub fn of_entry_type(row: &Row) -> Self {
        if row.bool_field("is_credit").unwrap_or(false) {
            Polarity::Credit
        } else {
            Polarity::Debit
        }
    }
}

/// Checks an amount's sign against the type polarity.
///
/// A negative credit is rejected. A positive debit is coerced to negative
/// and then checked again.
pub fn apply_polarity(amount: f64, polarity: Polarity) -> Result<f64, RecordError> {
    let checked = match polarity {
        Polarity::Credit => amount,
        Polarity::Debit if amount > 0.0 => -amount,
        Polarity::Debit => amount,
    };
    match polarity {
        Polarity::Credit if checked < 0.0 => Err(RecordError::rule(format!(
            "amount {:.2} is negative for a credit type",
            checked
        ))),
        Polarity::Debit if checked > 0.0 => Err(RecordError::rule(format!(
            "amount {:.2} is positive for a debit type",
            checked
        ))),
        _ => Ok(checked),
    }
}

/// Settles flight hour-meter readings against the aircraft's current meter.
///
/// A missing start falls back to the aircraft meter, then to zero; a missing
/// end equals the start.
pub fn settle_hour_meters(
    start: Option<f64>,
    end: Option<f64>,
    aircraft: &Row,
) -> Result<(f64, f64), RecordError> {
    let start = start
        .or_else(|| aircraft.f64_field("hour_meter"))
        .unwrap_or(0.0);
    let end = end.unwrap_or(start);
    if end < start {
        return Err(RecordError::rule(format!(
            "end hour meter {:.2} is below start {:.2}",
            end, start
        )));
    }
    Ok((start, end))
}

/// The instructor reference must point at a member holding the instructor role.
pub fn require_instructor(row: &Row) -> Result<(), RecordError> {
    let role = row.str_field("role").and_then(MemberRole::parse);
    if role == Some(MemberRole::Instructor) {
        Ok(())
    } else {
        Err(RecordError::rule(format!(
            "member {} is not an instructor",
            row.str_field("login").unwrap_or("?")
        )))
    }
}

/// Rows flagged `is_system` belong to the platform and are never
/// overwritten or shadowed by an import.
pub fn require_editable(row: &Row) -> Result<(), RecordError> {
    if row.bool_field("is_system") == Some(true) {
        Err(RecordError::rule(format!(
            "code {} is reserved by a system type",
            row.str_field("code").unwrap_or("?")
        )))
    } else {
        Ok(())
    }
}
