//! Shell-compatible `.env` files for Rust processes.
//!
//! - [`domain::grammar`] parses the restricted dotenv grammar
//! - [`application::services::LoaderService`] loads several files atomically
//! - [`application::services::EnvReader`] reads typed values
//! - [`application::services::ProcessConfigurator`] applies locale and timezone

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;

pub use application::services::{
    Configure, EnvReader, LoadReport, LoaderService, ProcessConfigurator,
};
pub use application::{ApplicationError, ApplicationResult};
pub use domain::{Assignment, DomainError, Fallback, ParseError, SyntaxError};
pub use infrastructure::{EnvironmentStore, MemoryEnvironment, ProcessEnvironment};
