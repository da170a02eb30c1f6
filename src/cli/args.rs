//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueEnum, ValueHint};

/// Shell-compatible .env parser, atomic multi-file loader, and typed environment accessors
#[derive(Parser, Debug)]
#[command(name = "shenv")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-d info, -dd debug, -ddd trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub debug: u8,

    /// Env file to load; repeat for several, later files override earlier ones
    #[arg(short = 'f', long = "file", global = true, value_hint = ValueHint::FilePath)]
    pub files: Vec<PathBuf>,

    /// Project directory holding .shenv.toml (default: cwd)
    #[arg(short = 'C', long, global = true, value_hint = ValueHint::DirPath)]
    pub project_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Report every syntax error in the env files
    Check,

    /// Print the assignments a load would apply, as NAME='value' lines
    Dump,

    /// Load the env files and print one variable as a typed value
    Get {
        /// Variable name
        name: String,
        /// Value type to validate against
        #[arg(short = 't', long = "type", value_enum, default_value_t = ValueType::String)]
        kind: ValueType,
        /// List delimiter (default from settings)
        #[arg(long)]
        delimiter: Option<String>,
        /// Value to print when the variable is not set
        #[arg(long)]
        default: Option<String>,
    },

    /// Load the env files and run a command with the resulting environment
    Run {
        /// Command and its arguments
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        command: Vec<String>,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective settings
    Show,
    /// Show config file locations
    Path,
}

/// Types accepted by `get --type`.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    String,
    Int,
    Bool,
    List,
    IntList,
    NullableString,
    NullableInt,
    NullableBool,
}
