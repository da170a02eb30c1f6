//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services depend on I/O boundary traits (FileSystem, EnvironmentStore, etc.)
//! but are themselves concrete structs, not traits.

mod accessor;
mod configurator;
mod loader;

pub use accessor::EnvReader;
pub use configurator::{Configure, ProcessConfigurator};
pub use loader::{LoadReport, LoaderService, Staged};
