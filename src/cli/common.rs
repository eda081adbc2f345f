//! Shared clap helper types for CLI commands.

use std::path::PathBuf;

use bibcite::OutputFormat;
use clap::{Args, ValueEnum};

/// Output layouts accepted by commands that write citation lists.
#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum OutputFormatArg {
    Text,
    Markdown,
    Json,
}

impl From<OutputFormatArg> for OutputFormat {
    fn from(value: OutputFormatArg) -> OutputFormat {
        match value {
            OutputFormatArg::Text => OutputFormat::Text,
            OutputFormatArg::Markdown => OutputFormat::Markdown,
            OutputFormatArg::Json => OutputFormat::Json,
        }
    }
}

/// Input location shared by the formatting commands.
#[derive(Args, Debug)]
pub struct InputArgs {
    /// Directory of CSV sheets or a .jsonl file.
    #[arg(
        short = 'i',
        long = "input",
        env = "INPUT_FILE_PATH",
        default_value = "media/input"
    )]
    pub input: PathBuf,
}
