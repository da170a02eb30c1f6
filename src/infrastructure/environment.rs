//! Environment store: the single read/write surface for environment variables.
//!
//! [`ProcessEnvironment`] keeps two eagerly populated overlay maps in step with
//! the native primitive. Reads consult the overlays first, then the native
//! primitive in local and finally global scope. Writes go to all three.
//!
//! No locking is done; one writer at a time is assumed.

use std::collections::{BTreeMap, HashMap};
use std::ffi::OsString;

use tracing::{debug, trace};

use crate::infrastructure::error::{InfraError, InfraResult};
use crate::infrastructure::traits::{NativeEnv, OsEnv, Scope};

/// Case-sensitive `name -> value` environment.
pub trait EnvironmentStore {
    fn has(&self, name: &str) -> bool;

    /// `Ok(None)` when the name is unbound.
    fn get(&self, name: &str) -> InfraResult<Option<String>>;

    fn set(&mut self, name: &str, value: &str) -> InfraResult<()>;

    /// Unsetting an unbound name succeeds.
    fn unset(&mut self, name: &str) -> InfraResult<()>;
}

/// The real process environment.
#[derive(Debug, Clone)]
pub struct ProcessEnvironment<N: NativeEnv = OsEnv> {
    /// Fast lookup overlay
    primary: HashMap<String, OsString>,
    /// Second overlay, consulted after the primary one
    secondary: HashMap<String, OsString>,
    native: N,
}

impl ProcessEnvironment<OsEnv> {
    /// Snapshot the current process environment.
    pub fn new() -> Self {
        Self::with_native(OsEnv)
    }
}

impl Default for ProcessEnvironment<OsEnv> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N: NativeEnv> ProcessEnvironment<N> {
    pub fn with_native(native: N) -> Self {
        let snapshot: HashMap<String, OsString> = native.vars().into_iter().collect();
        debug!("environment snapshot: {} variables", snapshot.len());
        Self {
            primary: snapshot.clone(),
            secondary: snapshot,
            native,
        }
    }

    pub fn native(&self) -> &N {
        &self.native
    }

    fn lookup(&self, name: &str) -> Option<OsString> {
        if let Some(value) = self.primary.get(name) {
            return Some(value.clone());
        }
        if let Some(value) = self.secondary.get(name) {
            return Some(value.clone());
        }
        self.native
            .var(name, Scope::Local)
            .or_else(|| self.native.var(name, Scope::Global))
    }
}

impl<N: NativeEnv> EnvironmentStore for ProcessEnvironment<N> {
    fn has(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    fn get(&self, name: &str) -> InfraResult<Option<String>> {
        match self.lookup(name) {
            None => Ok(None),
            Some(value) => value.into_string().map(Some).map_err(|_| InfraError::NotUnicode {
                name: name.to_string(),
            }),
        }
    }

    fn set(&mut self, name: &str, value: &str) -> InfraResult<()> {
        trace!(name, "set");
        self.native
            .set_var(name, value)
            .map_err(|e| InfraError::set(name, e))?;
        self.primary.insert(name.to_string(), value.into());
        self.secondary.insert(name.to_string(), value.into());
        Ok(())
    }

    fn unset(&mut self, name: &str) -> InfraResult<()> {
        trace!(name, "unset");
        self.native
            .remove_var(name)
            .map_err(|e| InfraError::unset(name, e))?;
        self.primary.remove(name);
        self.secondary.remove(name);
        Ok(())
    }
}

/// An isolated in-memory environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryEnvironment {
    vars: BTreeMap<String, String>,
}

impl MemoryEnvironment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_map(&self) -> &BTreeMap<String, String> {
        &self.vars
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MemoryEnvironment {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl EnvironmentStore for MemoryEnvironment {
    fn has(&self, name: &str) -> bool {
        self.vars.contains_key(name)
    }

    fn get(&self, name: &str) -> InfraResult<Option<String>> {
        Ok(self.vars.get(name).cloned())
    }

    fn set(&mut self, name: &str, value: &str) -> InfraResult<()> {
        self.vars.insert(name.to_string(), value.to_string());
        Ok(())
    }

    fn unset(&mut self, name: &str) -> InfraResult<()> {
        self.vars.remove(name);
        Ok(())
    }
}
