//! Domain layer: grammar, value types and entities
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod entities;
pub mod error;
pub mod fallback;
pub mod grammar;
pub mod value;

pub use entities::{Assignment, LoadQueue};
pub use error::{DomainError, ParseError, SyntaxError};
pub use fallback::Fallback;
pub use grammar::{is_valid_name, parse_line, parse_str, quote, Parsed};
pub use value::ValueKind;
