//! Two-style formatting run (`bibcite format`).

use std::path::PathBuf;

use anyhow::{Result, anyhow};
use bibcite::{APA, GOST, Renderer, format_sources, write_documents};
use clap::Args;

use crate::cli::common::{InputArgs, OutputFormatArg};

/// Arguments for `bibcite format`.
#[derive(Args, Debug)]
pub struct FormatArgs {
    #[command(flatten)]
    pub input: InputArgs,
    /// Output path for the GOST list (`-` for stdout).
    #[arg(
        short = 'o',
        long = "output",
        env = "OUTPUT_FILE_PATH",
        default_value = "media/output.txt"
    )]
    pub output: PathBuf,
    /// Output path for the APA list (`-` for stdout).
    #[arg(
        long = "output-apa",
        env = "OUTPUT_FILE_PATH_APA",
        default_value = "media/output_apa.txt"
    )]
    pub output_apa: PathBuf,
    /// Layout of the written lists.
    #[arg(long, default_value_t = OutputFormatArg::Text, value_enum)]
    pub format: OutputFormatArg,
}

/// Execute `bibcite format`.
pub fn handle(args: FormatArgs) -> Result<()> {
    tracing::info!(
        input = %args.input.input.display(),
        output = %args.output.display(),
        output_apa = %args.output_apa.display(),
        "processing sources"
    );

    let lists = format_sources(&args.input.input, &[&GOST, &APA])?;

    tracing::info!("generating output files ...");
    let mut documents = Vec::with_capacity(lists.len());
    for list in &lists {
        let path = match list.style.name {
            "gost" => args.output.as_path(),
            "apa" => args.output_apa.as_path(),
            other => return Err(anyhow!("no output path configured for style '{}'", other)),
        };
        let content = Renderer::new(list.style.description, &list.entries)
            .document(args.format.into())?;
        documents.push((path, content));
    }
    write_documents(&documents)?;

    tracing::info!("done");
    Ok(())
}
