//! Command-line interface wiring for the `bibcite` binary.
//!
//! This module owns the clap definitions and delegates execution to
//! specialized submodules that encapsulate each command family.

use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};

pub mod common;
pub mod format;
pub mod init;
pub mod print;
pub mod style;

/// Parsed CLI entrypoint for the `bibcite` binary.
#[derive(Parser, Debug)]
#[command(
    name = "bibcite",
    version,
    about = "Format bibliographic source lists in GOST and APA styles"
)]
pub struct Cli {
    /// Top-level command to execute.
    #[command(subcommand)]
    pub command: Command,

    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Default log level when RUST_LOG is unset.
    #[arg(long, env = "LOGGING_LEVEL", default_value = "info", global = true)]
    pub log_level: String,

    /// Directory receiving `bibcite.log` in addition to stderr.
    #[arg(long, env = "LOGGING_PATH", global = true)]
    pub log_path: Option<PathBuf>,
}

/// High-level command families made available to end users.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Format the input in every built-in style and write one list per style.
    Format(format::FormatArgs),
    /// Print the list for a single style to stdout.
    Print(print::PrintArgs),
    #[command(subcommand)]
    Style(style::StyleCommand),
    /// Write empty input sheets with header rows.
    Init(init::InitArgs),
}

/// Execute the requested command.
pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Format(args) => format::handle(args),
        Command::Print(args) => print::handle(args),
        Command::Style(cmd) => style::handle(cmd),
        Command::Init(args) => init::handle(args),
    }
}

/// Open (appending) the log file inside `dir`, creating the directory if needed.
pub fn open_log_file(dir: &Path) -> Result<File> {
    fs::create_dir_all(dir)
        .with_context(|| format!("failed to create log directory {}", dir.display()))?;
    let path = dir.join("bibcite.log");
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("failed to open log file {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn log_file_is_created_and_appended() {
        let dir = tempfile::tempdir().unwrap();
        let logs = dir.path().join("logs");
        writeln!(open_log_file(&logs).unwrap(), "first").unwrap();
        writeln!(open_log_file(&logs).unwrap(), "second").unwrap();
        let content = fs::read_to_string(logs.join("bibcite.log")).unwrap();
        assert_eq!(content, "first\nsecond\n");
    }

    #[test]
    fn log_path_flag_is_parsed() {
        let cli = Cli::try_parse_from(["bibcite", "--log-path", "logs", "style", "list"]).unwrap();
        assert_eq!(cli.log_path.as_deref(), Some(Path::new("logs")));
    }
}
