//! Typed field access over a raw record, failing with `ValidationError`.
//!
//! Each accessor takes a list of accepted names; the first one is the
//! canonical name reported in errors.

use serde_json::Value;

use super::batch::RawRecord;
use crate::domain::foundation::patterns::{has_precision, DATE};
use crate::domain::foundation::ValidationError;

pub(crate) struct Fields<'a> {
    record: &'a RawRecord,
    prefix: &'a str,
}

impl<'a> Fields<'a> {
    pub fn new(record: &'a RawRecord) -> Self {
        Self { record, prefix: "" }
    }

    /// Reader whose error field names are prefixed, for nested objects.
    pub fn nested(record: &'a RawRecord, prefix: &'a str) -> Self {
        Self { record, prefix }
    }

    fn name(&self, names: &[&str]) -> String {
        let base = names.first().copied().unwrap_or("field");
        if self.prefix.is_empty() {
            base.to_string()
        } else {
            format!("{}.{}", self.prefix, base)
        }
    }

    pub fn value(&self, names: &[&str]) -> Option<&'a Value> {
        self.record.first_present(names).map(|(_, v)| v)
    }

    pub fn optional_str(&self, names: &[&str]) -> Result<Option<String>, ValidationError> {
        match self.value(names) {
            None => Ok(None),
            Some(Value::String(s)) => {
                let trimmed = s.trim();
                Ok((!trimmed.is_empty()).then(|| trimmed.to_string()))
            }
            Some(Value::Number(n)) => Ok(Some(n.to_string())),
            Some(_) => Err(ValidationError::invalid_format(self.name(names), "expected a string")),
        }
    }

    pub fn required_str(&self, names: &[&str]) -> Result<String, ValidationError> {
        self.optional_str(names)?
            .ok_or_else(|| ValidationError::empty_field(self.name(names)))
    }

    pub fn optional_number(&self, names: &[&str]) -> Result<Option<f64>, ValidationError> {
        match self.value(names) {
            None => Ok(None),
            Some(Value::Number(n)) => n
                .as_f64()
                .map(Some)
                .ok_or_else(|| ValidationError::invalid_format(self.name(names), "not a finite number")),
            Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
            Some(Value::String(s)) => s
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|n| n.is_finite())
                .map(Some)
                .ok_or_else(|| ValidationError::invalid_format(self.name(names), "expected a number")),
            Some(_) => Err(ValidationError::invalid_format(self.name(names), "expected a number")),
        }
    }

    pub fn required_number(&self, names: &[&str]) -> Result<f64, ValidationError> {
        self.optional_number(names)?
            .ok_or_else(|| ValidationError::empty_field(self.name(names)))
    }

    /// Optional number with a lower bound and two-decimal precision.
    pub fn optional_money(&self, names: &[&str], min: f64) -> Result<Option<f64>, ValidationError> {
        match self.optional_number(names)? {
            None => Ok(None),
            Some(n) => self.check_money(names, n, min, f64::MAX).map(Some),
        }
    }

    pub fn required_money(&self, names: &[&str], min: f64) -> Result<f64, ValidationError> {
        let n = self.required_number(names)?;
        self.check_money(names, n, min, f64::MAX)
    }

    pub fn check_money(&self, names: &[&str], n: f64, min: f64, max: f64) -> Result<f64, ValidationError> {
        if n < min || n > max {
            return Err(ValidationError::out_of_range(self.name(names), min, max, n));
        }
        if !has_precision(n, 2) {
            return Err(ValidationError::invalid_format(
                self.name(names),
                "at most 2 decimal places",
            ));
        }
        Ok(n)
    }

    pub fn optional_date(&self, names: &[&str]) -> Result<Option<String>, ValidationError> {
        match self.optional_str(names)? {
            None => Ok(None),
            Some(date) if DATE.is_match(&date) => Ok(Some(date)),
            Some(_) => Err(ValidationError::invalid_format(
                self.name(names),
                "expected YYYY-MM-DD or YYYY-MM-DDTHH:MM:SSZ",
            )),
        }
    }

    pub fn required_date(&self, names: &[&str]) -> Result<String, ValidationError> {
        self.optional_date(names)?
            .ok_or_else(|| ValidationError::empty_field(self.name(names)))
    }

    /// Optional value parsed by `parse`, reporting `allowed` on failure.
    pub fn optional_enum<T>(
        &self,
        names: &[&str],
        allowed: &[&str],
        parse: impl Fn(&str) -> Option<T>,
    ) -> Result<Option<T>, ValidationError> {
        match self.optional_str(names)? {
            None => Ok(None),
            Some(raw) => parse(&raw)
                .map(Some)
                .ok_or_else(|| ValidationError::not_allowed(self.name(names), allowed, raw)),
        }
    }

    /// Strictly a JSON boolean; `"true"` is refused.
    pub fn optional_bool(&self, names: &[&str]) -> Result<Option<bool>, ValidationError> {
        match self.value(names) {
            None => Ok(None),
            Some(Value::Bool(b)) => Ok(Some(*b)),
            Some(_) => Err(ValidationError::invalid_format(self.name(names), "expected true or false")),
        }
    }

    pub fn required_bool(&self, names: &[&str]) -> Result<bool, ValidationError> {
        self.optional_bool(names)?
            .ok_or_else(|| ValidationError::empty_field(self.name(names)))
    }

    /// Nested object reader for sub-records such as a linked account entry.
    pub fn object(&self, names: &[&str]) -> Result<Option<RawRecord>, ValidationError> {
        match self.value(names) {
            None => Ok(None),
            Some(Value::Object(map)) => Ok(Some(RawRecord::new(map.clone()))),
            Some(_) => Err(ValidationError::invalid_format(self.name(names), "expected an object")),
        }
    }
}
