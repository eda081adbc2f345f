use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use serde::Deserialize;
use serde_json::Value;

use crate::models::{Record, RecordKind, Row};

/// Loads source records from an input directory of CSV sheets or a JSONL file.
#[derive(Debug, Clone)]
pub struct SourcesReader {
    source: Source,
}

#[derive(Debug, Clone)]
enum Source {
    /// Directory holding one `<slug>.csv` sheet per record kind.
    Sheets(PathBuf),
    /// JSON Lines file, one tagged record per line.
    Lines(PathBuf),
}

impl SourcesReader {
    /// Inspect `path` and pick the matching input layout.
    pub fn open(path: &Path) -> Result<Self> {
        let metadata = std::fs::metadata(path)
            .with_context(|| format!("failed to open input {}", path.display()))?;
        let source = if metadata.is_dir() {
            Source::Sheets(path.to_path_buf())
        } else if path.extension().is_some_and(|ext| ext == "jsonl" || ext == "json") {
            Source::Lines(path.to_path_buf())
        } else {
            return Err(anyhow!(
                "unsupported input {}: expected a directory of CSV sheets or a .jsonl file",
                path.display()
            ));
        };
        Ok(Self { source })
    }

    /// Read every record, validating each as it is built.
    pub fn read(&self) -> Result<Vec<Record>> {
        match &self.source {
            Source::Sheets(dir) => read_sheets(dir),
            Source::Lines(path) => read_lines(path),
        }
    }
}

/// Path of the CSV sheet for `kind` inside an input directory.
pub fn sheet_path(dir: &Path, kind: RecordKind) -> PathBuf {
    dir.join(format!("{}.csv", kind.slug()))
}

fn read_sheets(dir: &Path) -> Result<Vec<Record>> {
    let mut records = Vec::new();
    for kind in RecordKind::ALL {
        let path = sheet_path(dir, kind);
        if !path.exists() {
            tracing::debug!(sheet = kind.sheet_label(), path = %path.display(), "sheet not present");
            continue;
        }
        let before = records.len();
        read_sheet(&path, kind, &mut records)?;
        tracing::info!(
            sheet = kind.sheet_label(),
            count = records.len() - before,
            "read sheet"
        );
    }
    Ok(records)
}

fn read_sheet(path: &Path, kind: RecordKind, records: &mut Vec<Record>) -> Result<()> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("failed to open sheet {}", path.display()))?;
    let headers: Vec<String> = reader
        .headers()
        .with_context(|| format!("failed to read header row of {}", path.display()))?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    for (idx, result) in reader.records().enumerate() {
        // header occupies line 1
        let line = idx + 2;
        let raw = result
            .with_context(|| format!("failed to parse row {} in {}", line, path.display()))?;
        let row: Row = headers
            .iter()
            .zip(raw.iter())
            .map(|(column, value)| (column.as_str(), value))
            .collect();
        if row.is_empty() {
            continue;
        }
        let record = Record::from_row(kind, &row)
            .with_context(|| format!("invalid row {} in {}", line, path.display()))?;
        records.push(record);
    }
    Ok(())
}

#[derive(Debug, Deserialize)]
struct SourceLine {
    kind: RecordKind,
    #[serde(flatten)]
    cells: BTreeMap<String, Value>,
}

fn read_lines(path: &Path) -> Result<Vec<Record>> {
    let file = File::open(path)
        .with_context(|| format!("failed to open input file {}", path.display()))?;
    let reader = BufReader::new(file);
    let mut records = Vec::new();
    for (idx, raw) in reader.lines().enumerate() {
        let raw = raw?;
        if raw.trim().is_empty() {
            continue;
        }
        let line: SourceLine = serde_json::from_str(&raw).with_context(|| {
            format!(
                "failed to parse source record at line {} in {}",
                idx + 1,
                path.display()
            )
        })?;
        let row: Row = line
            .cells
            .iter()
            .filter_map(|(column, value)| cell_text(value).map(|text| (column.as_str(), text)))
            .collect();
        let record = Record::from_row(line.kind, &row).with_context(|| {
            format!("invalid record at line {} in {}", idx + 1, path.display())
        })?;
        records.push(record);
    }
    tracing::info!(path = %path.display(), count = records.len(), "read source lines");
    Ok(records)
}

fn cell_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        other => Some(other.to_string()),
    }
}
