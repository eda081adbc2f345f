use std::fmt::Write as _;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};

/// Layout of a written citation list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// `1. <citation>` per line.
    #[default]
    Text,
    /// Heading followed by a numbered Markdown list.
    Markdown,
    /// Pretty-printed JSON array of strings.
    Json,
}

/// Writes an ordered list of formatted citations.
pub struct Renderer<'a> {
    title: &'a str,
    entries: &'a [String],
}

impl<'a> Renderer<'a> {
    pub fn new(title: &'a str, entries: &'a [String]) -> Self {
        Self { title, entries }
    }

    /// Produce the document body for `format`.
    pub fn document(&self, format: OutputFormat) -> Result<String> {
        let mut out = String::new();
        match format {
            OutputFormat::Text => {
                for (idx, entry) in self.entries.iter().enumerate() {
                    writeln!(&mut out, "{}. {}", idx + 1, entry)?;
                }
            }
            OutputFormat::Markdown => {
                writeln!(&mut out, "# {}", self.title)?;
                writeln!(&mut out)?;
                for (idx, entry) in self.entries.iter().enumerate() {
                    writeln!(&mut out, "{}. {}", idx + 1, entry)?;
                }
            }
            OutputFormat::Json => {
                out = serde_json::to_string_pretty(self.entries)
                    .context("failed to serialize citation list")?;
                out.push('\n');
            }
        }
        Ok(out)
    }

    /// Write the document to `path`, or stdout when `path` is `-`.
    pub fn render(&self, path: &Path, format: OutputFormat) -> Result<()> {
        let content = self.document(format)?;
        write_documents(&[(path, content)])
    }
}

/// Write every `(path, content)` pair, or none of the files when one fails.
///
/// Documents are staged next to their targets and only moved into place once all
/// of them are on disk. A `-` path goes to stdout after the files are in place.
pub fn write_documents(documents: &[(&Path, String)]) -> Result<()> {
    let mut staged: Vec<(PathBuf, &Path)> = Vec::with_capacity(documents.len());
    for (path, content) in documents {
        if path.as_os_str() == "-" {
            continue;
        }
        match stage(path, content) {
            Ok(tmp) => staged.push((tmp, *path)),
            Err(err) => {
                for (tmp, _) in &staged {
                    let _ = fs::remove_file(tmp);
                }
                return Err(err);
            }
        }
    }
    for (tmp, path) in &staged {
        fs::rename(tmp, path)
            .with_context(|| format!("failed to write {}", path.display()))?;
        tracing::info!(path = %path.display(), "wrote citation list");
    }
    for (path, content) in documents {
        if path.as_os_str() == "-" {
            io::stdout().write_all(content.as_bytes())?;
        }
    }
    Ok(())
}

fn stage(path: &Path, content: &str) -> Result<PathBuf> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let mut name = path
        .file_name()
        .ok_or_else(|| anyhow!("output path {} has no file name", path.display()))?
        .to_os_string();
    name.push(".tmp");
    let tmp = path.with_file_name(name);
    fs::write(&tmp, content).with_context(|| format!("failed to write {}", tmp.display()))?;
    Ok(tmp)
}
