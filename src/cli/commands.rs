//! Command dispatch

use std::fmt::Display;
use std::io;
use std::path::{Path, PathBuf};

use clap::CommandFactory;
use clap_complete::generate;
use tracing::{debug, instrument};

use crate::application::services::EnvReader;
use crate::application::ApplicationError;
use crate::cli::args::{Cli, Commands, ConfigCommands, ValueType};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::config::{global_config_path, local_config_path, Settings};
use crate::domain::value::{self, is_blank};
use crate::domain::{quote, DomainError, Fallback, SyntaxError};
use crate::exitcode;
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::{MemoryEnvironment, ProcessEnvironment};

/// Run the selected command, returning the process exit code.
pub fn execute_command(cli: &Cli) -> CliResult<i32> {
    let Some(command) = &cli.command else {
        let _ = Cli::command().print_help();
        return Ok(exitcode::USAGE);
    };

    let project_dir = match &cli.project_dir {
        Some(dir) => dir.clone(),
        None => std::env::current_dir().map_err(|e| ApplicationError::OperationFailed {
            context: "determine current directory".to_string(),
            source: Box::new(e),
        })?,
    };
    let settings = Settings::load(Some(project_dir.as_path()))?;
    let container = ServiceContainer::new(settings);
    let files = resolve_files(&cli.files, &container, &project_dir);

    match command {
        Commands::Check => check(&container, &files),
        Commands::Dump => dump(&container, &files),
        Commands::Get {
            name,
            kind,
            delimiter,
            default,
        } => get(
            &container,
            &files,
            name,
            *kind,
            delimiter.as_deref(),
            default.as_deref(),
        ),
        Commands::Run { command } => run(&container, &files, command),
        Commands::Config { command } => config(&container, command, &project_dir),
        Commands::Completion { shell } => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, name, &mut io::stdout());
            Ok(exitcode::OK)
        }
    }
}

/// Explicit `-f` files are used as given; configured files are taken
/// relative to the project directory and skipped when missing.
fn resolve_files(cli_files: &[PathBuf], container: &ServiceContainer, project_dir: &Path) -> Vec<PathBuf> {
    if !cli_files.is_empty() {
        return cli_files.to_vec();
    }
    container
        .settings
        .files
        .iter()
        .map(|file| project_dir.join(file))
        .filter(|file| {
            let exists = container.fs.exists(file);
            if !exists {
                debug!("skipping missing default file {}", file.display());
            }
            exists
        })
        .collect()
}

#[instrument(skip(container))]
fn check(container: &ServiceContainer, files: &[PathBuf]) -> CliResult<i32> {
    if files.is_empty() {
        output::warning("no env files to check");
        return Ok(exitcode::OK);
    }

    let staged = container.loader().scan(&MemoryEnvironment::new(), files)?;
    if staged.errors.is_empty() {
        output::success(&format!(
            "{} files, {} assignments, no syntax errors",
            staged.report.files_read,
            staged.queue.len()
        ));
        return Ok(exitcode::OK);
    }

    output::error(&SyntaxError::new(staged.errors));
    Ok(exitcode::DATAERR)
}

#[instrument(skip(container))]
fn dump(container: &ServiceContainer, files: &[PathBuf]) -> CliResult<i32> {
    let env = ProcessEnvironment::new();
    let staged = container.loader().stage(&env, files)?;

    for assignment in staged.queue.iter() {
        match quote(&assignment.value) {
            Some(quoted) => output::info(&format!("{}={}", assignment.name, quoted)),
            None => output::warning(&format!(
                "{} spans several lines and cannot be printed",
                assignment.name
            )),
        }
    }
    debug!(
        "dump: {} already set in the environment",
        staged.report.skipped_existing
    );
    Ok(exitcode::OK)
}

fn fallback<T>(
    raw: Option<&str>,
    convert: impl FnOnce(&str) -> Result<T, DomainError>,
) -> CliResult<Option<Fallback<'static, T>>> {
    raw.map(|raw| {
        convert(raw)
            .map(Fallback::Value)
            .map_err(|e| CliError::InvalidArgs(format!("--default: {e}")))
    })
    .transpose()
}

fn print_optional(value: Option<impl Display>) {
    if let Some(value) = value {
        output::info(&value);
    }
}

#[instrument(skip(container))]
fn get(
    container: &ServiceContainer,
    files: &[PathBuf],
    name: &str,
    kind: ValueType,
    delimiter: Option<&str>,
    default: Option<&str>,
) -> CliResult<i32> {
    let delimiter = delimiter.unwrap_or(container.settings.list_delimiter.as_str());
    let mut env = ProcessEnvironment::new();
    container.loader().load_files(&mut env, files)?;
    let reader = EnvReader::new(&env);
    let arg = "--default";

    match kind {
        ValueType::String => {
            let value = reader.get(name, fallback(default, |raw| Ok(raw.to_string()))?)?;
            output::info(&value);
        }
        ValueType::Int => {
            let value = reader.get_int(name, fallback(default, |raw| value::parse_int(arg, raw))?)?;
            output::info(&value);
        }
        ValueType::Bool => {
            let value = reader.get_bool(
                name,
                fallback(default, |raw| {
                    value::parse_bool(arg, raw).map(|b| b.unwrap_or(false))
                })?,
            )?;
            output::info(&value);
        }
        ValueType::List => {
            let items = reader.get_list(
                name,
                delimiter,
                fallback(default, |raw| value::split_list(raw, delimiter))?,
            )?;
            items.iter().for_each(|item| output::info(item));
        }
        ValueType::IntList => {
            let items = reader.get_int_list(
                name,
                delimiter,
                fallback(default, |raw| value::parse_int_list(arg, raw, delimiter))?,
            )?;
            items.iter().for_each(|item| output::info(item));
        }
        ValueType::NullableString => print_optional(reader.get_nullable_string(
            name,
            fallback(default, |raw| {
                Ok((!is_blank(raw)).then(|| raw.to_string()))
            })?,
        )?),
        ValueType::NullableInt => print_optional(reader.get_nullable_int(
            name,
            fallback(default, |raw| {
                if is_blank(raw) {
                    return Ok(None);
                }
                value::parse_int(arg, raw).map(Some)
            })?,
        )?),
        ValueType::NullableBool => print_optional(reader.get_nullable_bool(
            name,
            fallback(default, |raw| value::parse_bool(arg, raw))?,
        )?),
    }
    Ok(exitcode::OK)
}

#[instrument(skip(container))]
fn run(container: &ServiceContainer, files: &[PathBuf], command: &[String]) -> CliResult<i32> {
    let Some((program, args)) = command.split_first() else {
        return Err(CliError::Usage("missing command to run".to_string()));
    };

    let mut env = ProcessEnvironment::new();
    let report = container.loader().load_files(&mut env, files)?;
    debug!(
        "run: loaded {} variables, {} already set",
        report.loaded, report.skipped_existing
    );
    let applied = container
        .configurator()
        .apply(&mut env, container.settings.configure_flags())?;
    debug!("run: applied {:?}", applied);

    let status = container
        .cmd
        .status(program, args)
        .map_err(|e| ApplicationError::OperationFailed {
            context: format!("run {program}"),
            source: Box::new(e),
        })?;
    Ok(status.code().unwrap_or(exitcode::SOFTWARE))
}

fn config(
    container: &ServiceContainer,
    command: &ConfigCommands,
    project_dir: &Path,
) -> CliResult<i32> {
    match command {
        ConfigCommands::Show => output::info(&container.settings.to_toml()?),
        ConfigCommands::Path => {
            match global_config_path() {
                Some(path) => output::detail(&format!("global: {}", path.display())),
                None => output::detail("global: <no config directory>"),
            }
            output::detail(&format!(
                "local:  {}",
                local_config_path(project_dir).display()
            ));
        }
    }
    Ok(exitcode::OK)
}
