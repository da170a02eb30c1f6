//! Env file loader service
//!
//! Scans files in order, stages assignments in a [`LoadQueue`] and commits
//! the queue to an [`EnvironmentStore`] only when no file had a syntax error.
//!
//! Precedence:
//! - a name already bound in the live environment is never overwritten
//! - among files, the last file that assigns a name wins

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, instrument, trace};

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::domain::{parse_str, DomainError, LoadQueue, ParseError, SyntaxError};
use crate::infrastructure::environment::EnvironmentStore;
use crate::infrastructure::traits::FileSystem;

/// Summary of a load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoadReport {
    pub files_read: usize,
    /// Names written to the environment
    pub loaded: usize,
    /// Assignments dropped because the name was already bound
    pub skipped_existing: usize,
}

/// Outcome of scanning files without touching the environment.
#[derive(Debug, Clone, Default)]
pub struct Staged {
    pub queue: LoadQueue,
    pub errors: Vec<ParseError>,
    pub report: LoadReport,
}

impl Staged {
    /// Fail with every collected parse error, if there are any.
    pub fn into_result(self) -> ApplicationResult<Self> {
        if self.errors.is_empty() {
            return Ok(self);
        }
        let Staged { errors, .. } = self;
        Err(DomainError::Syntax(SyntaxError::new(errors)).into())
    }
}

/// Service for loading env files into an environment store.
pub struct LoaderService {
    fs: Arc<dyn FileSystem>,
}

impl LoaderService {
    /// Create a new loader service.
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }

    /// Scan `paths` in order and build the queue, collecting all syntax errors.
    ///
    /// Only fails on I/O; syntax errors are returned in [`Staged::errors`].
    pub fn scan<I, P>(&self, store: &dyn EnvironmentStore, paths: I) -> ApplicationResult<Staged>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut staged = Staged::default();

        for path in paths {
            let path = path.as_ref();
            let content = self
                .fs
                .read_to_string(path)
                .with_path_context("read env file", path)?;
            staged.report.files_read += 1;

            let parsed = parse_str(&content, Some(path));
            debug!(
                "scan: {} assignments, {} errors in {}",
                parsed.assignments.len(),
                parsed.errors.len(),
                path.display()
            );
            staged.errors.extend(parsed.errors);

            for (line, assignment) in parsed.assignments {
                if store.has(&assignment.name) {
                    trace!(name = %assignment.name, line, "already bound, skipping");
                    staged.report.skipped_existing += 1;
                    continue;
                }
                staged.queue.insert(assignment);
            }
        }

        Ok(staged)
    }

    /// Like [`scan`](Self::scan) but fails with the aggregate syntax error.
    pub fn stage<I, P>(&self, store: &dyn EnvironmentStore, paths: I) -> ApplicationResult<Staged>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        self.scan(store, paths)?.into_result()
    }

    /// Load `paths` into `store`.
    ///
    /// Either every queued assignment is written or, on any syntax error in
    /// any file, nothing is.
    #[instrument(level = "debug", skip_all)]
    pub fn load_files<I, P>(
        &self,
        store: &mut dyn EnvironmentStore,
        paths: I,
    ) -> ApplicationResult<LoadReport>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let staged = self.stage(&*store, paths)?;
        let mut report = staged.report;

        for assignment in staged.queue {
            store
                .set(&assignment.name, &assignment.value)
                .map_err(ApplicationError::from)?;
            report.loaded += 1;
        }

        debug!(
            "load_files: {} loaded, {} skipped from {} files",
            report.loaded, report.skipped_existing, report.files_read
        );
        Ok(report)
    }
}
