//! Infrastructure layer: I/O implementations, environment store and DI container
//!
//! This layer implements I/O boundary traits and wires up services.

pub mod di;
pub mod environment;
pub mod error;
pub mod traits;

pub use environment::{EnvironmentStore, MemoryEnvironment, ProcessEnvironment};
pub use error::{InfraError, InfraResult};
