// src/validation.rs
//
// Declarative input checks run before any store call.
//
// Violations are reported per field, in the shape the frontend already
// understands: { "loc": ["body", "email"], "msg": "...", "type": "..." }.

use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub loc: Vec<String>,
    pub msg: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl FieldError {
    pub fn new(loc: &[&str], msg: impl Into<String>, kind: &str) -> Self {
        Self {
            loc: loc.iter().map(|s| s.to_string()).collect(),
            msg: msg.into(),
            kind: kind.to_string(),
        }
    }
}

/// Typed inputs that carry field constraints beyond "present and well-typed".
pub trait Validate {
    fn validate(&self) -> Result<(), Vec<FieldError>>;
}

/// Collect the failed checks; `Ok` when every check passed.
pub fn collect<I>(checks: I) -> Result<(), Vec<FieldError>>
where
    I: IntoIterator<Item = Option<FieldError>>,
{
    let errors: Vec<FieldError> = checks.into_iter().flatten().collect();
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

pub fn non_empty(loc: &[&str], value: &str) -> Option<FieldError> {
    if value.trim().is_empty() {
        Some(FieldError::new(
            loc,
            "String should have at least 1 character",
            "string_too_short",
        ))
    } else {
        None
    }
}

pub fn email(loc: &[&str], value: &str) -> Option<FieldError> {
    if is_valid_email(value) {
        None
    } else {
        Some(FieldError::new(
            loc,
            "value is not a valid email address",
            "value_error",
        ))
    }
}

pub fn in_range(loc: &[&str], value: i64, min: i64, max: i64) -> Option<FieldError> {
    if value < min {
        Some(FieldError::new(
            loc,
            format!("Input should be greater than or equal to {}", min),
            "greater_than_equal",
        ))
    } else if value > max {
        Some(FieldError::new(
            loc,
            format!("Input should be less than or equal to {}", max),
            "less_than_equal",
        ))
    } else {
        None
    }
}

fn email_regex() -> &'static Regex {
    static EMAIL_RE: OnceLock<Regex> = OnceLock::new();
    EMAIL_RE.get_or_init(|| {
        // dot-atom local part, at least one dot in the domain, alphabetic TLD.
        // ASCII only: UTF-8 local parts (e.g. `josé@example.com`) are rejected.
        Regex::new(
            r"^[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+(\.[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+)*@([A-Za-z0-9]([A-Za-z0-9-]{0,61}[A-Za-z0-9])?\.)+[A-Za-z]{2,63}$",
        )
        .expect("email regex must compile")
    })
}

/// Syntactic address check: `local@domain.tld`, local part at most 64 chars,
/// whole address at most 254.
pub fn is_valid_email(value: &str) -> bool {
    if value.len() > 254 {
        return false;
    }
    match value.split_once('@') {
        Some((local, _)) if local.len() <= 64 => email_regex().is_match(value),
        _ => false,
    }
}
