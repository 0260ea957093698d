//! Login identifiers: an account is addressed by email or by Turkish mobile
//! number. Phone numbers are normalized to `+90XXXXXXXXXX` before storage so
//! lookups and the unique index see one canonical form.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::errors::ServiceError;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("valid email regex")
});

// Accepted inputs: +905XXXXXXXXX, 05XXXXXXXXX, 5XXXXXXXXX
static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\+90|0)?5[0-9]{9}$").expect("valid phone regex"));

static NON_DIGIT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\D").expect("valid digit regex"));

/// A validated login identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Identifier {
    Email(String),
    Phone(String),
}

impl Identifier {
    /// Parses raw user input into a canonical identifier.
    pub fn parse(raw: &str) -> Result<Self, ServiceError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ServiceError::ValidationError(
                "Identifier must not be empty".into(),
            ));
        }

        if is_valid_email(trimmed) {
            return Ok(Identifier::Email(trimmed.to_ascii_lowercase()));
        }

        // Phones are matched on a compact form so spaced input like
        // "0532 123 45 67" is accepted.
        let compact: String = trimmed
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '(' | ')'))
            .collect();
        if is_valid_phone(&compact) {
            return Ok(Identifier::Phone(format_phone(&compact)));
        }

        Err(ServiceError::ValidationError(format!(
            "'{}' is neither a valid email nor a Turkish mobile number",
            trimmed
        )))
    }

    /// The canonical string stored in the database and used as JWT subject.
    pub fn as_str(&self) -> &str {
        match self {
            Identifier::Email(v) | Identifier::Phone(v) => v,
        }
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn is_valid_email(value: &str) -> bool {
    EMAIL_RE.is_match(value)
}

pub fn is_valid_phone(value: &str) -> bool {
    PHONE_RE.is_match(value)
}

/// Normalizes an accepted phone number to `+90XXXXXXXXXX`. Inputs that do not
/// match a known shape are returned unchanged.
pub fn format_phone(phone: &str) -> String {
    let digits = NON_DIGIT_RE.replace_all(phone, "").to_string();

    if digits.len() == 12 && digits.starts_with("90") {
        format!("+{}", digits)
    } else if digits.len() == 10 && digits.starts_with('5') {
        format!("+90{}", digits)
    } else if digits.len() == 11 && digits.starts_with("05") {
        format!("+90{}", &digits[1..])
    } else {
        phone.to_string()
    }
}
