use regex::Regex;
use std::sync::LazyLock;

static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

static PHONE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\(\d{3}\)\s?)?\d{3}[-.\s]?\d{4}$").unwrap());

/// Loose email check: something, an @, something, a dot, something. No spaces.
pub fn validate_email(email: &str) -> bool {
    EMAIL.is_match(email)
}

/// North-American style phone numbers: `555-1234`, `(555) 123-4567`, `5551234`...
pub fn validate_phone(phone: &str) -> bool {
    PHONE.is_match(phone)
}

pub fn passwords_match(password: &str, confirmation: &str) -> bool {
    password == confirmation
}

/// Return the name of the first field whose value is blank
pub fn first_blank<'a>(fields: &[(&'a str, &str)]) -> Option<&'a str> {
    fields
        .iter()
        .find(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| *name)
}
