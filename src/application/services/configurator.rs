//! Applies recognized environment variables to process-global state.
//!
//! Invalid or absent values are ignored; only a failed write to the
//! environment store is reported.

use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use bitflags::bitflags;
use tracing::{debug, instrument, warn};

use crate::application::services::EnvReader;
use crate::application::ApplicationResult;
use crate::domain::Fallback;
use crate::infrastructure::environment::EnvironmentStore;
use crate::infrastructure::traits::{FileSystem, ProcessGlobals};

const TZ: &str = "TZ";
const ZONEINFO: &str = "zoneinfo/";
const TZIF_MAGIC: &[u8] = b"TZif";

bitflags! {
    /// Process settings [`ProcessConfigurator::apply`] may touch.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Configure: u8 {
        const LOCALE = 1 << 0;
        const TIMEZONE = 1 << 1;
    }
}

/// Service for applying locale and timezone variables.
pub struct ProcessConfigurator {
    fs: Arc<dyn FileSystem>,
    globals: Arc<dyn ProcessGlobals>,
    zoneinfo_dir: PathBuf,
}

impl ProcessConfigurator {
    pub fn new(
        fs: Arc<dyn FileSystem>,
        globals: Arc<dyn ProcessGlobals>,
        zoneinfo_dir: PathBuf,
    ) -> Self {
        Self {
            fs,
            globals,
            zoneinfo_dir,
        }
    }

    /// Apply the selected settings, returning the ones that took effect.
    #[instrument(level = "debug", skip(self, store))]
    pub fn apply(
        &self,
        store: &mut dyn EnvironmentStore,
        flags: Configure,
    ) -> ApplicationResult<Configure> {
        let mut applied = Configure::empty();

        if flags.contains(Configure::LOCALE) {
            match self.globals.set_locale_from_env() {
                Ok(()) => applied |= Configure::LOCALE,
                Err(e) => warn!("locale not applied: {}", e),
            }
        }

        if flags.contains(Configure::TIMEZONE) && self.apply_timezone(store)? {
            applied |= Configure::TIMEZONE;
        }

        Ok(applied)
    }

    fn apply_timezone(&self, store: &mut dyn EnvironmentStore) -> ApplicationResult<bool> {
        let raw = match EnvReader::new(&*store).get_nullable_string(TZ, Some(Fallback::Value(None))) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Ok(false),
            Err(e) => {
                debug!("timezone not applied: {}", e);
                return Ok(false);
            }
        };

        let Some(zone) = normalize_timezone(&raw) else {
            debug!("timezone not applied: nothing left of {:?}", raw);
            return Ok(false);
        };
        if !self.is_known_zone(&zone) {
            debug!("timezone not applied: unknown zone {:?}", zone);
            return Ok(false);
        }

        if zone != raw {
            store.set(TZ, &zone)?;
        }
        self.globals.reload_timezone();
        debug!("timezone set to {}", zone);
        Ok(true)
    }

    /// `UTC`, or a compiled zone file (TZif) under the zoneinfo directory.
    fn is_known_zone(&self, zone: &str) -> bool {
        if zone == "UTC" {
            return true;
        }
        let relative = Path::new(zone);
        let plain = relative
            .components()
            .all(|c| matches!(c, Component::Normal(_)));
        if !plain {
            return false;
        }
        let path = self.zoneinfo_dir.join(relative);
        self.fs.is_file(&path)
            && self
                .fs
                .read_head(&path, TZIF_MAGIC.len() as u64)
                .is_ok_and(|head| head == TZIF_MAGIC)
    }
}

/// Strip `:` and `.../zoneinfo/` prefixes; the POSIX rule `UTC0` becomes `UTC`.
///
/// Returns `None` when nothing is left.
pub fn normalize_timezone(raw: &str) -> Option<String> {
    let mut zone = raw.trim();
    zone = zone.strip_prefix(':').unwrap_or(zone);
    if let Some(idx) = zone.rfind(ZONEINFO) {
        zone = &zone[idx + ZONEINFO.len()..];
    }
    if zone == "UTC0" {
        zone = "UTC";
    }
    (!zone.is_empty()).then(|| zone.to_string())
}
