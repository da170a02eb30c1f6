//! I/O boundary traits for testability
//!
//! These traits abstract external I/O operations, allowing services
//! to be tested with mock implementations.

use std::ffi::OsString;
use std::io::{self, Read};
use std::path::Path;
use std::process::ExitStatus;

/// Filesystem abstraction for testability.
pub trait FileSystem: Send + Sync {
    /// Read file contents to string.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Check if path is a file.
    fn is_file(&self, path: &Path) -> bool;

    /// Read at most `len` bytes from the start of a file.
    fn read_head(&self, path: &Path, len: u64) -> io::Result<Vec<u8>>;
}

/// External command runner abstraction.
pub trait CommandRunner: Send + Sync {
    /// Run a command with inherited stdio and environment, waiting for it to exit.
    fn status(&self, cmd: &str, args: &[String]) -> io::Result<ExitStatus>;
}

/// Where the native environment primitive looks a name up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Values owned by this process
    Local,
    /// Values inherited from the parent process
    Global,
}

/// The OS-level get/set environment primitive.
pub trait NativeEnv: Send + Sync {
    /// Snapshot of every variable with a unicode name.
    fn vars(&self) -> Vec<(String, OsString)>;

    fn var(&self, name: &str, scope: Scope) -> Option<OsString>;

    fn set_var(&self, name: &str, value: &str) -> io::Result<()>;

    /// Removing an unbound name succeeds.
    fn remove_var(&self, name: &str) -> io::Result<()>;
}

/// Process-global state outside the environment block.
pub trait ProcessGlobals: Send + Sync {
    /// Set the process locale from `LC_ALL`, `LC_*` and `LANG`.
    fn set_locale_from_env(&self) -> io::Result<()>;

    /// Re-read `TZ` into the process default timezone.
    fn reload_timezone(&self);
}

// ============================================================
// REAL IMPLEMENTATIONS
// ============================================================

/// Real filesystem implementation.
#[derive(Debug, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn read_head(&self, path: &Path, len: u64) -> io::Result<Vec<u8>> {
        let mut head = Vec::new();
        std::fs::File::open(path)?.take(len).read_to_end(&mut head)?;
        Ok(head)
    }
}

/// Real command runner implementation.
#[derive(Debug, Default)]
pub struct RealCommandRunner;

impl CommandRunner for RealCommandRunner {
    fn status(&self, cmd: &str, args: &[String]) -> io::Result<ExitStatus> {
        std::process::Command::new(cmd).args(args).status()
    }
}

/// The process environment via `std::env`.
///
/// Rust exposes a single environment block per process, so both scopes
/// read the same table.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsEnv;

impl OsEnv {
    fn check(name: &str, value: Option<&str>) -> io::Result<()> {
        if name.is_empty() || name.contains(['=', '\0']) {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("invalid environment variable name {name:?}"),
            ));
        }
        if value.is_some_and(|v| v.contains('\0')) {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("value for {name} contains a NUL byte"),
            ));
        }
        Ok(())
    }
}

impl NativeEnv for OsEnv {
    fn vars(&self) -> Vec<(String, OsString)> {
        std::env::vars_os()
            .filter_map(|(name, value)| name.into_string().ok().map(|name| (name, value)))
            .collect()
    }

    fn var(&self, name: &str, _scope: Scope) -> Option<OsString> {
        if Self::check(name, None).is_err() {
            return None;
        }
        std::env::var_os(name)
    }

    fn set_var(&self, name: &str, value: &str) -> io::Result<()> {
        Self::check(name, Some(value))?;
        std::env::set_var(name, value);
        Ok(())
    }

    fn remove_var(&self, name: &str) -> io::Result<()> {
        Self::check(name, None)?;
        std::env::remove_var(name);
        Ok(())
    }
}

#[cfg(unix)]
extern "C" {
    // POSIX, not exported by the libc crate on unix targets
    fn tzset();
}

/// Locale and timezone via libc.
#[derive(Debug, Default, Clone, Copy)]
pub struct LibcProcessGlobals;

impl ProcessGlobals for LibcProcessGlobals {
    #[cfg(unix)]
    fn set_locale_from_env(&self) -> io::Result<()> {
        // An empty locale name tells setlocale to consult the environment.
        let result = unsafe { libc::setlocale(libc::LC_ALL, c"".as_ptr()) };
        if result.is_null() {
            return Err(io::Error::other(
                "locale requested by the environment is not available",
            ));
        }
        Ok(())
    }

    #[cfg(not(unix))]
    fn set_locale_from_env(&self) -> io::Result<()> {
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "setting the process locale is not supported on this platform",
        ))
    }

    fn reload_timezone(&self) {
        #[cfg(unix)]
        unsafe {
            tzset();
        }
    }
}
