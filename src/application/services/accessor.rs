//! Typed, validated reads from an environment store.

use tracing::trace;

use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::value::{self, is_blank};
use crate::domain::{DomainError, Fallback};
use crate::infrastructure::environment::EnvironmentStore;

/// Typed accessor over an [`EnvironmentStore`].
///
/// Every getter takes an optional [`Fallback`]. When the variable is unbound
/// the fallback is resolved (a lazy one runs exactly once); without a
/// fallback the lookup fails with [`ApplicationError::ValueNotFound`].
/// A bound variable is always validated, the fallback is never consulted.
pub struct EnvReader<'a> {
    store: &'a dyn EnvironmentStore,
}

impl<'a> EnvReader<'a> {
    pub fn new(store: &'a dyn EnvironmentStore) -> Self {
        Self { store }
    }

    pub fn has(&self, name: &str) -> bool {
        self.store.has(name)
    }

    fn resolve<T>(
        &self,
        name: &str,
        default: Option<Fallback<'_, T>>,
        convert: impl FnOnce(String) -> Result<T, DomainError>,
    ) -> ApplicationResult<T> {
        match self.store.get(name)? {
            Some(raw) => Ok(convert(raw)?),
            None => {
                trace!(name, has_default = default.is_some(), "unbound");
                default
                    .map(Fallback::resolve)
                    .ok_or_else(|| ApplicationError::ValueNotFound {
                        name: name.to_string(),
                    })
            }
        }
    }

    /// Raw string value.
    pub fn get(&self, name: &str, default: Option<Fallback<'_, String>>) -> ApplicationResult<String> {
        self.resolve(name, default, Ok)
    }

    pub fn get_int(&self, name: &str, default: Option<Fallback<'_, i64>>) -> ApplicationResult<i64> {
        self.resolve(name, default, |raw| value::parse_int(name, &raw))
    }

    /// An empty value reads as `false`.
    pub fn get_bool(&self, name: &str, default: Option<Fallback<'_, bool>>) -> ApplicationResult<bool> {
        self.resolve(name, default, |raw| {
            value::parse_bool(name, &raw).map(|b| b.unwrap_or(false))
        })
    }

    /// Split on `delimiter` verbatim. An empty delimiter is rejected before lookup.
    pub fn get_list(
        &self,
        name: &str,
        delimiter: &str,
        default: Option<Fallback<'_, Vec<String>>>,
    ) -> ApplicationResult<Vec<String>> {
        value::check_delimiter(delimiter)?;
        self.resolve(name, default, |raw| value::split_list(&raw, delimiter))
    }

    /// Integer list; one bad element rejects the whole value.
    pub fn get_int_list(
        &self,
        name: &str,
        delimiter: &str,
        default: Option<Fallback<'_, Vec<i64>>>,
    ) -> ApplicationResult<Vec<i64>> {
        value::check_delimiter(delimiter)?;
        self.resolve(name, default, |raw| {
            value::parse_int_list(name, &raw, delimiter)
        })
    }

    /// A blank value reads as `None`.
    pub fn get_nullable_string(
        &self,
        name: &str,
        default: Option<Fallback<'_, Option<String>>>,
    ) -> ApplicationResult<Option<String>> {
        self.resolve(name, default, |raw| {
            Ok(if is_blank(&raw) { None } else { Some(raw) })
        })
    }

    /// A blank value reads as `None`.
    pub fn get_nullable_int(
        &self,
        name: &str,
        default: Option<Fallback<'_, Option<i64>>>,
    ) -> ApplicationResult<Option<i64>> {
        self.resolve(name, default, |raw| {
            if is_blank(&raw) {
                return Ok(None);
            }
            value::parse_int(name, &raw).map(Some)
        })
    }

    /// A blank value reads as `None`.
    pub fn get_nullable_bool(
        &self,
        name: &str,
        default: Option<Fallback<'_, Option<bool>>>,
    ) -> ApplicationResult<Option<bool>> {
        self.resolve(name, default, |raw| value::parse_bool(name, &raw))
    }
}
