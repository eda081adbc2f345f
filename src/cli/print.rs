//! Single-style output (`bibcite print`).

use std::path::Path;

use anyhow::Result;
use bibcite::{Renderer, format_sources_by_name};
use clap::Args;

use crate::cli::common::{InputArgs, OutputFormatArg};

/// Arguments for `bibcite print`.
#[derive(Args, Debug)]
pub struct PrintArgs {
    /// Citation style name (see `bibcite style list`).
    #[arg(short = 's', long = "style", default_value = "gost")]
    pub style: String,
    #[command(flatten)]
    pub input: InputArgs,
    /// Layout of the printed list.
    #[arg(long, default_value_t = OutputFormatArg::Text, value_enum)]
    pub format: OutputFormatArg,
}

/// Execute `bibcite print`.
pub fn handle(args: PrintArgs) -> Result<()> {
    let lists = format_sources_by_name(&args.input.input, &[args.style.as_str()])?;
    for list in &lists {
        Renderer::new(list.style.description, &list.entries)
            .render(Path::new("-"), args.format.into())?;
    }
    Ok(())
}
