//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::sync::Arc;

use crate::application::services::{LoaderService, ProcessConfigurator};
use crate::config::Settings;
use crate::infrastructure::traits::{
    CommandRunner, FileSystem, LibcProcessGlobals, ProcessGlobals, RealCommandRunner,
    RealFileSystem,
};

/// Container holding all application services.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,

    /// Command runner abstraction
    pub cmd: Arc<dyn CommandRunner>,

    /// Locale/timezone abstraction
    pub globals: Arc<dyn ProcessGlobals>,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> Self {
        Self::with_deps(
            settings,
            Arc::new(RealFileSystem),
            Arc::new(RealCommandRunner),
            Arc::new(LibcProcessGlobals),
        )
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(
        settings: Settings,
        fs: Arc<dyn FileSystem>,
        cmd: Arc<dyn CommandRunner>,
        globals: Arc<dyn ProcessGlobals>,
    ) -> Self {
        let settings = Arc::new(settings);

        Self {
            settings,
            fs,
            cmd,
            globals,
        }
    }

    pub fn loader(&self) -> LoaderService {
        LoaderService::new(Arc::clone(&self.fs))
    }

    pub fn configurator(&self) -> ProcessConfigurator {
        ProcessConfigurator::new(
            Arc::clone(&self.fs),
            Arc::clone(&self.globals),
            self.settings.zoneinfo_dir.clone(),
        )
    }
}
