//! Line grammar for env files.
//!
//! A line is either blank, a comment (first character `#`), or exactly
//! `NAME=value` where value is one of:
//! - double-quoted: `"..."`, `\"`, `\$`, `` \` `` and `\\` are escapes, a raw `$` or backtick is rejected
//! - single-quoted: `'...'`, the only escape is the 4-character `'\''`
//! - bare: no whitespace, quotes, `$`, backtick or glob characters unless backslash-escaped
//!
//! Nothing is expanded. The grammar is a subset of what a POSIX shell would
//! accept as a single assignment word, so a valid file can also be sourced.

use std::borrow::Cow;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use tracing::trace;

use crate::domain::entities::Assignment;
use crate::domain::error::ParseError;

static ASSIGNMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r#"^(?P<name>[A-Za-z_][A-Za-z0-9_]*)=(?:"#,
        r#""(?P<dq>(?:[^"$`]|\\["$`])*)""#,
        r#"|'(?P<sq>(?:[^']|'\\'')*)'"#,
        r#"|(?P<bare>(?:[^\s"$'`*?\[\]]|\\.)+)"#,
        r#")$"#,
    ))
    .expect("assignment pattern is valid")
});

static NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("name pattern is valid"));

static DOUBLE_QUOTED_ESCAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\\(["$`\\])"#).expect("escape pattern is valid"));

static BARE_ESCAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\\(.)").expect("escape pattern is valid"));

const SINGLE_QUOTE_ESCAPE: &str = r"'\''";

/// Result of parsing a whole text buffer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Parsed {
    /// Assignments with their 1-based line numbers, in file order
    pub assignments: Vec<(usize, Assignment)>,
    pub errors: Vec<ParseError>,
}

/// Parse one line.
///
/// Returns `Ok(None)` for blank and comment lines.
pub fn parse_line(
    line: &str,
    line_number: usize,
    file: Option<&Path>,
) -> Result<Option<Assignment>, ParseError> {
    if line.trim().is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    // NUL cannot be stored in the process environment
    if line.contains('\0') {
        return Err(ParseError::new(
            file.map(Path::to_path_buf),
            line_number,
            "NUL byte in line",
        ));
    }

    let Some(caps) = ASSIGNMENT.captures(line) else {
        trace!(line_number, "rejected line");
        return Err(ParseError::new(
            file.map(Path::to_path_buf),
            line_number,
            diagnose(line),
        ));
    };

    let value = if let Some(dq) = caps.name("dq") {
        DOUBLE_QUOTED_ESCAPE
            .replace_all(dq.as_str(), "${1}")
            .into_owned()
    } else if let Some(sq) = caps.name("sq") {
        sq.as_str().replace(SINGLE_QUOTE_ESCAPE, "'")
    } else if let Some(bare) = caps.name("bare") {
        BARE_ESCAPE.replace_all(bare.as_str(), "${1}").into_owned()
    } else {
        String::new()
    };

    Ok(Some(Assignment::new(&caps["name"], value)))
}

/// Parse a whole text buffer, collecting every error instead of stopping at the first.
pub fn parse_str(content: &str, file: Option<&Path>) -> Parsed {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let normalized = normalize_newlines(content);

    let mut parsed = Parsed::default();
    for (idx, line) in normalized.split('\n').enumerate() {
        let line_number = idx + 1;
        match parse_line(line, line_number, file) {
            Ok(Some(assignment)) => parsed.assignments.push((line_number, assignment)),
            Ok(None) => {}
            Err(err) => parsed.errors.push(err),
        }
    }
    parsed
}

/// Render a value as a single-quoted literal that [`parse_line`] decodes back to `value`.
///
/// Returns `None` for values containing line breaks, which the grammar cannot carry.
pub fn quote(value: &str) -> Option<String> {
    if value.contains(['\n', '\r']) {
        return None;
    }
    Some(format!("'{}'", value.replace('\'', SINGLE_QUOTE_ESCAPE)))
}

/// Whether `name` is a valid variable identifier.
pub fn is_valid_name(name: &str) -> bool {
    NAME.is_match(name)
}

/// Convert `\r\n` and lone `\r` to `\n`.
pub fn normalize_newlines(input: &str) -> Cow<'_, str> {
    if !input.contains('\r') {
        return Cow::Borrowed(input);
    }
    Cow::Owned(input.replace("\r\n", "\n").replace('\r', "\n"))
}

fn diagnose(line: &str) -> String {
    let Some((name, value)) = line.split_once('=') else {
        return format!("expected NAME=value, found {line:?}");
    };
    if !is_valid_name(name) {
        return format!("invalid variable name {name:?}");
    }
    if value.is_empty() {
        return format!("missing value for {name}, use {name}=\"\" for an empty value");
    }
    format!(
        "invalid value for {name}: unescaped $, backtick, glob character, whitespace or unbalanced quote in {value:?}"
    )
}
