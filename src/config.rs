//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/shenv/shenv.toml`
//! 3. Local config: `<project_dir>/.shenv.toml`
//! 4. Environment variables: `SHENV_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;
use crate::application::services::Configure;

/// Unified configuration for shenv.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Env files loaded when no file is given on the command line
    pub files: Vec<PathBuf>,
    /// Delimiter for list lookups (default: ",")
    pub list_delimiter: String,
    /// Set the process locale from the environment before running commands
    pub locale: bool,
    /// Apply `TZ` as the process timezone before running commands
    pub timezone: bool,
    /// Root of the timezone database
    pub zoneinfo_dir: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            files: vec![PathBuf::from(".env")],
            list_delimiter: ",".into(),
            locale: false,
            timezone: false,
            zoneinfo_dir: PathBuf::from("/usr/share/zoneinfo"),
        }
    }
}

/// Raw settings for intermediate parsing (`None` → not specified, inherit).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub files: Option<Vec<PathBuf>>,
    pub list_delimiter: Option<String>,
    pub locale: Option<bool>,
    pub timezone: Option<bool>,
    pub zoneinfo_dir: Option<PathBuf>,
}

/// Get the XDG config directory for shenv.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "shenv").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("shenv.toml"))
}

/// Get the path to the local config file in a project directory.
pub fn local_config_path(project_dir: &Path) -> PathBuf {
    project_dir.join(".shenv.toml")
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

/// Expand `~`, `$VAR` and `${VAR}`, leaving the input unchanged on failure.
fn expand_path(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    shellexpand::full(raw.as_ref())
        .map(|s| PathBuf::from(s.into_owned()))
        .unwrap_or_else(|_| path.to_path_buf())
}

impl Settings {
    /// Process flags selected by `locale` / `timezone`.
    pub fn configure_flags(&self) -> Configure {
        let mut flags = Configure::empty();
        flags.set(Configure::LOCALE, self.locale);
        flags.set(Configure::TIMEZONE, self.timezone);
        flags
    }

    /// Expand shell variables and tilde in path-like fields.
    fn expand_paths(&mut self) {
        self.files = self.files.iter().map(|f| expand_path(f)).collect();
        self.zoneinfo_dir = expand_path(&self.zoneinfo_dir);
    }

    /// Overlay wins for every field it specifies.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            files: overlay.files.clone().unwrap_or_else(|| self.files.clone()),
            list_delimiter: overlay
                .list_delimiter
                .clone()
                .unwrap_or_else(|| self.list_delimiter.clone()),
            locale: overlay.locale.unwrap_or(self.locale),
            timezone: overlay.timezone.unwrap_or(self.timezone),
            zoneinfo_dir: overlay
                .zoneinfo_dir
                .clone()
                .unwrap_or_else(|| self.zoneinfo_dir.clone()),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `project_dir` - Optional directory holding a `.shenv.toml`
    pub fn load(project_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        Self::load_from(global_config_path().as_deref(), project_dir)
    }

    /// Load settings with an explicit global config path.
    pub fn load_from(
        global_path: Option<&Path>,
        project_dir: Option<&Path>,
    ) -> Result<Self, ApplicationError> {
        // 1. Start with defaults
        let mut current = Self::default();

        // 2. Global config
        if let Some(global_path) = global_path {
            if global_path.exists() {
                let raw = load_raw_settings(global_path)?;
                current = current.merge_with(&raw);
            }
        }

        // 3. Project-local config
        if let Some(dir) = project_dir {
            let local_path = local_config_path(dir);
            if local_path.exists() {
                let raw = load_raw_settings(&local_path)?;
                current = current.merge_with(&raw);
            }
        }

        // 4. Environment variables
        current = Self::apply_env_overrides(current)?;

        current.expand_paths();

        Ok(current)
    }

    /// Apply SHENV_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("SHENV")
                    .prefix_separator("_")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("files"),
            )
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get::<Vec<String>>("files") {
            settings.files = val.into_iter().map(PathBuf::from).collect();
        }
        if let Ok(val) = config.get_string("list_delimiter") {
            settings.list_delimiter = val;
        }
        if let Ok(val) = config.get_bool("locale") {
            settings.locale = val;
        }
        if let Ok(val) = config.get_bool("timezone") {
            settings.timezone = val;
        }
        if let Ok(val) = config.get_string("zoneinfo_dir") {
            settings.zoneinfo_dir = PathBuf::from(val);
        }

        Ok(settings)
    }

    /// Render as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize settings: {}", e),
        })
    }
}
