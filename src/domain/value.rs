//! Value grammars for typed lookups.
//!
//! Each function validates one raw string and converts it, returning
//! [`DomainError::TypeValidation`] naming the variable on mismatch.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::domain::error::DomainError;

const INTEGER: &str = r"\s*[+-]?[0-9]+\s*";

static INTEGER_VALUE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!("^{INTEGER}$")).expect("integer pattern is valid"));

const TRUTHY: [&str; 7] = ["1", "on", "y", "yes", "true", "enable", "enabled"];
const FALSY: [&str; 7] = ["0", "off", "n", "no", "false", "disable", "disabled"];

/// Target type of a typed lookup, used in validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Integer,
    Boolean,
    IntegerList,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer => write!(f, "integer"),
            Self::Boolean => write!(f, "boolean"),
            Self::IntegerList => write!(f, "integer list"),
        }
    }
}

fn invalid(name: &str, expected: ValueKind) -> DomainError {
    DomainError::TypeValidation {
        name: name.to_string(),
        expected,
    }
}

/// Whether a raw value counts as "absent" for the nullable lookups.
pub fn is_blank(raw: &str) -> bool {
    raw.trim().is_empty()
}

/// `\s*[+-]?[0-9]+\s*`, cast to `i64`. Out-of-range values are rejected.
pub fn parse_int(name: &str, raw: &str) -> Result<i64, DomainError> {
    if !INTEGER_VALUE.is_match(raw) {
        return Err(invalid(name, ValueKind::Integer));
    }
    raw.trim()
        .parse::<i64>()
        .map_err(|_| invalid(name, ValueKind::Integer))
}

/// Case-insensitive boolean tokens, optionally surrounded by whitespace.
///
/// Returns `None` for an empty or whitespace-only value; callers decide
/// whether that means `false` or absent.
pub fn parse_bool(name: &str, raw: &str) -> Result<Option<bool>, DomainError> {
    let token = raw.trim();
    if token.is_empty() {
        return Ok(None);
    }
    if TRUTHY.iter().any(|t| t.eq_ignore_ascii_case(token)) {
        return Ok(Some(true));
    }
    if FALSY.iter().any(|t| t.eq_ignore_ascii_case(token)) {
        return Ok(Some(false));
    }
    Err(invalid(name, ValueKind::Boolean))
}

/// Reject an empty list delimiter.
pub fn check_delimiter(delimiter: &str) -> Result<(), DomainError> {
    if delimiter.is_empty() {
        return Err(DomainError::InvalidArgument(
            "list delimiter must not be empty".to_string(),
        ));
    }
    Ok(())
}

/// Split verbatim on `delimiter`; an empty value is an empty list.
pub fn split_list(raw: &str, delimiter: &str) -> Result<Vec<String>, DomainError> {
    check_delimiter(delimiter)?;
    if raw.is_empty() {
        return Ok(Vec::new());
    }
    Ok(raw.split(delimiter).map(str::to_string).collect())
}

/// Like [`split_list`] but every element must be an integer.
///
/// The whole value is matched against one anchored pattern first, so a
/// single bad element rejects the value as a whole.
pub fn parse_int_list(name: &str, raw: &str, delimiter: &str) -> Result<Vec<i64>, DomainError> {
    check_delimiter(delimiter)?;
    if raw.is_empty() {
        return Ok(Vec::new());
    }

    let sep = regex::escape(delimiter);
    let pattern = Regex::new(&format!("^{INTEGER}(?:{sep}{INTEGER})*$"))
        .map_err(|e| DomainError::InvalidArgument(format!("list delimiter {delimiter:?}: {e}")))?;
    if !pattern.is_match(raw) {
        return Err(invalid(name, ValueKind::IntegerList));
    }

    raw.split(delimiter)
        .map(|segment| {
            segment
                .trim()
                .parse::<i64>()
                .map_err(|_| invalid(name, ValueKind::IntegerList))
        })
        .collect()
}
