//! Advisory field validation for the details step.
//!
//! Validation here is display-only. The messages land in
//! [`BookingState::errors`](crate::types::BookingState) for inline rendering
//! and are refreshed on every details update, but the step gates never read
//! them. A user with a malformed email and non-empty fields can still
//! proceed.

use crate::types::BookingUserInfo;
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

/// Minimum length for first and last names.
pub const MIN_NAME_LENGTH: usize = 2;

// Patterns are literals; construction cannot fail and is exercised by tests.
#[allow(clippy::unwrap_used)]
static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

#[allow(clippy::unwrap_used)]
static PHONE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\+?[1-9]\d{9,}$").unwrap());

/// Whether `email` looks like an address: something before an `@`, something
/// after it, and a dot in the domain part.
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Whether `phone` looks like a dialable number.
///
/// Spaces, dashes, and parentheses are stripped first, then the rest must be
/// an optional `+` followed by at least ten digits not starting with zero.
#[must_use]
pub fn is_valid_phone(phone: &str) -> bool {
    let stripped: String = phone
        .chars()
        .filter(|c| !matches!(c, ' ' | '\t' | '-' | '(' | ')'))
        .collect();
    PHONE_RE.is_match(&stripped)
}

/// Compute the advisory error map for the given contact details.
///
/// Empty fields produce no error; emptiness is the gate's concern, and
/// flagging untouched fields would be noise. Keys are the field names the
/// renderer attaches messages to.
#[must_use]
pub fn validate_user_info(info: &BookingUserInfo) -> HashMap<String, String> {
    let mut errors = HashMap::new();

    let first = info.first_name.trim();
    if !first.is_empty() && first.chars().count() < MIN_NAME_LENGTH {
        errors.insert(
            "first_name".to_string(),
            "First name must be at least 2 characters".to_string(),
        );
    }

    let last = info.last_name.trim();
    if !last.is_empty() && last.chars().count() < MIN_NAME_LENGTH {
        errors.insert(
            "last_name".to_string(),
            "Last name must be at least 2 characters".to_string(),
        );
    }

    let email = info.email.trim();
    if !email.is_empty() && !is_valid_email(email) {
        errors.insert(
            "email".to_string(),
            "Please enter a valid email address".to_string(),
        );
    }

    let phone = info.phone.trim();
    if !phone.is_empty() && !is_valid_phone(phone) {
        errors.insert(
            "phone".to_string(),
            "Please enter a valid phone number".to_string(),
        );
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(first: &str, last: &str, email: &str, phone: &str) -> BookingUserInfo {
        BookingUserInfo {
            first_name: first.to_string(),
            last_name: last.to_string(),
            email: email.to_string(),
            phone: phone.to_string(),
            marketing_consent: false,
        }
    }

    #[test]
    fn email_accepts_ordinary_addresses() {
        assert!(is_valid_email("jane@example.com"));
        assert!(is_valid_email("j.doe+tickets@mail.example.co.uk"));
    }

    #[test]
    fn email_rejects_missing_parts() {
        assert!(!is_valid_email("jane@example"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("jane example@mail.com"));
        assert!(!is_valid_email("jane@"));
    }

    #[test]
    fn phone_strips_formatting_characters() {
        assert!(is_valid_phone("(555) 123-4567 89"));
        assert!(is_valid_phone("+1 555 123 4567"));
        assert!(is_valid_phone("5551234567"));
    }

    #[test]
    fn phone_rejects_short_or_zero_led_numbers() {
        assert!(!is_valid_phone("555123456"));
        assert!(!is_valid_phone("0551234567"));
        assert!(!is_valid_phone("not a phone"));
    }

    #[test]
    fn short_names_are_flagged() {
        let errors = validate_user_info(&info("J", "Doe", "jane@example.com", "5551234567"));
        assert_eq!(
            errors.get("first_name").map(String::as_str),
            Some("First name must be at least 2 characters")
        );
        assert!(!errors.contains_key("last_name"));
    }

    #[test]
    fn empty_fields_produce_no_errors() {
        let errors = validate_user_info(&info("", "", "", ""));
        assert!(errors.is_empty());
    }

    #[test]
    fn malformed_email_and_phone_are_flagged() {
        let errors = validate_user_info(&info("Jane", "Doe", "nope", "123"));
        assert_eq!(
            errors.get("email").map(String::as_str),
            Some("Please enter a valid email address")
        );
        assert_eq!(
            errors.get("phone").map(String::as_str),
            Some("Please enter a valid phone number")
        );
    }

    #[test]
    fn well_formed_details_are_clean() {
        let errors = validate_user_info(&info(
            "Jane",
            "Doe",
            "jane@example.com",
            "+1 (555) 123-4567",
        ));
        assert!(errors.is_empty());
    }
}
