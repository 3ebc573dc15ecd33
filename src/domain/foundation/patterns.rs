//! Shared textual formats accepted across onboarding and import.

use once_cell::sync::Lazy;
use regex::Regex;

/// `YYYY-MM-DD` with an optional `THH:MM:SS(.mmm)Z` suffix.
pub static DATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d{4}-\d{2}-\d{2}(T\d{2}:\d{2}:\d{2}(\.\d{3})?Z)?$").expect("valid date pattern")
});

pub static EMAIL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email pattern"));

/// Aircraft registration such as `F-ABCD` or `N12345`.
pub static REGISTRATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9]+-?[A-Za-z0-9]+$").expect("valid registration pattern"));

/// Account entry type code such as `FLIGHT_PAYMENT`.
pub static ENTRY_TYPE_CODE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z0-9_]{2,20}$").expect("valid entry type code pattern"));

pub static PHONE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+]?[(]?[0-9]{1,4}[)]?[-\s./0-9]*$").expect("valid phone pattern")
});

/// Returns true if `value` has at most `places` decimal places.
pub fn has_precision(value: f64, places: i32) -> bool {
    let scale = 10f64.powi(places);
    let scaled = value * scale;
    (scaled - scaled.round()).abs() < 1e-6
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_accepts_plain_and_zulu_forms() {
        assert!(DATE.is_match("2024-01-15"));
        assert!(DATE.is_match("2024-01-15T10:30:00Z"));
        assert!(DATE.is_match("2024-01-15T10:30:00.123Z"));
    }

    #[test]
    fn date_rejects_other_forms() {
        assert!(!DATE.is_match("15/01/2024"));
        assert!(!DATE.is_match("2024-01-15T10:30:00+02:00"));
        assert!(!DATE.is_match("2024-1-5"));
    }

    #[test]
    fn email_requires_at_and_domain() {
        assert!(EMAIL.is_match("jean.dupont@example.com"));
        assert!(!EMAIL.is_match("jean.dupont"));
        assert!(!EMAIL.is_match("jean @example.com"));
    }

    #[test]
    fn registration_allows_single_dash() {
        assert!(REGISTRATION.is_match("F-ABCD"));
        assert!(REGISTRATION.is_match("N12345"));
        assert!(!REGISTRATION.is_match("F--ABCD"));
        assert!(!REGISTRATION.is_match("-ABCD"));
    }

    #[test]
    fn entry_type_code_is_upper_snake() {
        assert!(ENTRY_TYPE_CODE.is_match("FLIGHT_PAYMENT"));
        assert!(ENTRY_TYPE_CODE.is_match("C1"));
        assert!(!ENTRY_TYPE_CODE.is_match("fuel"));
        assert!(!ENTRY_TYPE_CODE.is_match("X"));
        assert!(!ENTRY_TYPE_CODE.is_match("FLIGHT-PAYMENT"));
    }

    #[test]
    fn precision_checks_decimal_places() {
        assert!(has_precision(180.5, 2));
        assert!(has_precision(-150.0, 2));
        assert!(has_precision(0.07, 2));
        assert!(!has_precision(10.123, 2));
    }
}
