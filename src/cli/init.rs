//! Input scaffolding (`bibcite init`).

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use bibcite::{RecordKind, sheet_path};
use clap::Args;

/// Arguments for `bibcite init`.
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Directory to create the sheets in.
    #[arg(default_value = "media/input")]
    pub dir: PathBuf,
    /// Overwrite existing sheets.
    #[arg(long)]
    pub force: bool,
}

/// Execute `bibcite init`.
pub fn handle(args: InitArgs) -> Result<()> {
    fs::create_dir_all(&args.dir)
        .with_context(|| format!("failed to create {}", args.dir.display()))?;
    if !args.force {
        if let Some(existing) = RecordKind::ALL
            .into_iter()
            .map(|kind| sheet_path(&args.dir, kind))
            .find(|path| path.exists())
        {
            return Err(anyhow!(
                "{} already exists; pass --force to overwrite",
                existing.display()
            ));
        }
    }
    for kind in RecordKind::ALL {
        let path = sheet_path(&args.dir, kind);
        let mut writer = csv::Writer::from_path(&path)
            .with_context(|| format!("failed to write {}", path.display()))?;
        writer.write_record(kind.columns())?;
        writer.flush()?;
        println!("{} -> {}", kind.sheet_label(), path.display());
    }
    Ok(())
}
