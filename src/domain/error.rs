//! Domain-level errors (no external dependencies)

use std::path::PathBuf;

use itertools::Itertools;
use thiserror::Error;

use crate::domain::value::ValueKind;

/// Domain errors represent grammar and value-grammar violations.
/// These are independent of infrastructure concerns.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("{0}")]
    Syntax(#[from] SyntaxError),

    #[error("environment variable {name} is not a valid {expected}")]
    TypeValidation { name: String, expected: ValueKind },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

/// A single grammar violation found while scanning an env file.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{}: {message}", location(.file, .line))]
pub struct ParseError {
    /// File the line came from, if it came from a file
    pub file: Option<PathBuf>,
    /// 1-based line number
    pub line: usize,
    pub message: String,
}

impl ParseError {
    pub fn new(file: Option<PathBuf>, line: usize, message: impl Into<String>) -> Self {
        Self {
            file,
            line,
            message: message.into(),
        }
    }
}

fn location(file: &Option<PathBuf>, line: &usize) -> String {
    match file {
        Some(file) => format!("{}:{}", file.display(), line),
        None => format!("line {line}"),
    }
}

/// Aggregate of every grammar violation found during one load.
#[derive(Error, Debug, Clone, PartialEq, Eq, Default)]
#[error("{}", summarize(.errors))]
pub struct SyntaxError {
    pub errors: Vec<ParseError>,
}

impl SyntaxError {
    pub fn new(errors: Vec<ParseError>) -> Self {
        Self { errors }
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Count header, then one bullet per record.
fn summarize(errors: &[ParseError]) -> String {
    let noun = if errors.len() == 1 { "error" } else { "errors" };
    let header = format!("{} syntax {} in env files", errors.len(), noun);
    if errors.is_empty() {
        return header;
    }
    format!(
        "{header}:\n{}",
        errors.iter().map(|e| format!("  - {e}")).join("\n")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_error_display_includes_file_and_line() {
        let err = ParseError::new(Some(PathBuf::from(".env")), 3, "invalid assignment");
        assert_eq!(err.to_string(), ".env:3: invalid assignment");

        let err = ParseError::new(None, 7, "invalid assignment");
        assert_eq!(err.to_string(), "line 7: invalid assignment");
    }

    #[test]
    fn syntax_error_lists_every_record() {
        let err = SyntaxError::new(vec![
            ParseError::new(Some(PathBuf::from("a.env")), 1, "bad"),
            ParseError::new(Some(PathBuf::from("b.env")), 4, "worse"),
        ]);

        let rendered = err.to_string();
        assert!(rendered.starts_with("2 syntax errors in env files:"));
        assert!(rendered.contains("  - a.env:1: bad"));
        assert!(rendered.contains("  - b.env:4: worse"));
    }

    #[test]
    fn single_or_no_errors_use_matching_wording() {
        let one = SyntaxError::new(vec![ParseError::new(None, 2, "bad")]);
        assert_eq!(one.to_string(), "1 syntax error in env files:\n  - line 2: bad");
        assert_eq!(SyntaxError::default().to_string(), "0 syntax errors in env files");
    }
}
