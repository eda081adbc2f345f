//! Core library for formatting bibliographic source lists.

mod error;
mod formatter;
mod models;
mod reader;
mod renderer;
mod templates;

pub use error::CitationError;
pub use formatter::{
    Citable, CitationFormatter, CitationListFormatter, FormatObserver, FormattedList,
    edition_display, format_all_styles, log_formatting, render,
};
pub use models::{
    ArticlesCollection, ArticlesNewspaper, Book, Dissertation, InternetResource, Record,
    RecordKind, Row,
};
pub use reader::{SourcesReader, sheet_path};
pub use renderer::{OutputFormat, Renderer, write_documents};
pub use templates::{APA, CitationStyle, GOST, KindTemplate, StyleRegistry};

use anyhow::Result;
use std::path::Path;

/// Reads every record from `input` and formats it under each of `styles`.
///
/// Nothing is returned unless every record renders under every style.
pub fn format_sources(
    input: &Path,
    styles: &[&'static CitationStyle],
) -> Result<Vec<FormattedList>> {
    let records = SourcesReader::open(input)?.read()?;
    tracing::info!(records = records.len(), "loaded sources");
    Ok(format_all_styles(&records, styles, Some(&log_formatting))?)
}

/// Like [`format_sources`], with styles given by name.
///
/// Every name is resolved against the built-in registry before the input is opened,
/// so an unknown style fails without reading any record.
pub fn format_sources_by_name(input: &Path, names: &[&str]) -> Result<Vec<FormattedList>> {
    let registry = StyleRegistry::builtin();
    let styles = names
        .iter()
        .map(|name| registry.get(name))
        .collect::<Result<Vec<_>, CitationError>>()?;
    format_sources(input, &styles)
}
