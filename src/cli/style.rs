//! Style discovery commands (`bibcite style ...`).

use anyhow::{Context, Result};
use bibcite::{RecordKind, StyleRegistry};
use clap::{Args, Subcommand};

/// Style subcommands.
#[derive(Subcommand, Debug)]
pub enum StyleCommand {
    /// List all known citation styles.
    List,
    /// Show the per-kind templates of a style.
    Show(StyleShowArgs),
}

/// Arguments for `bibcite style show`.
#[derive(Args, Debug)]
pub struct StyleShowArgs {
    /// Style name to display.
    pub name: String,
}

/// Execute a style command.
pub fn handle(command: StyleCommand) -> Result<()> {
    match command {
        StyleCommand::List => list(),
        StyleCommand::Show(args) => show(args),
    }
}

fn list() -> Result<()> {
    println!("Available styles:");
    for style in StyleRegistry::builtin().list() {
        println!("  - {}: {}", style.name, style.description);
    }
    Ok(())
}

fn show(args: StyleShowArgs) -> Result<()> {
    let style = StyleRegistry::builtin()
        .get(&args.name)
        .with_context(|| format!("style '{}' not found", args.name))?;
    println!("Style: {}", style.name);
    println!("{}", style.description);
    for kind in RecordKind::ALL {
        match style.template(kind) {
            Some(text) => {
                println!("  {} ({}):", kind, kind.sheet_label());
                println!("    {}", text);
                println!("    fields: {}", style.placeholders(kind).join(", "));
            }
            None => println!("  {}: not supported", kind),
        }
    }
    Ok(())
}
