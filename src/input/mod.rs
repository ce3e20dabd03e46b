use std::path::Path;

pub mod jump;
pub mod loaded;
pub mod reader;

use reader::{read_to_string_maybe_gz, sniff_delimiter};

use crate::error::FvError;

/// Untyped table as read from disk. Headers are trimmed, cells are kept verbatim.
#[derive(Debug, Clone)]
pub struct RawTable {
    pub name: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn new(name: &str, columns: &[&str], rows: &[&[&str]]) -> Self {
        Self {
            name: name.to_string(),
            columns: columns.iter().map(|c| c.trim().to_string()).collect(),
            rows: rows
                .iter()
                .map(|r| r.iter().map(|c| c.to_string()).collect())
                .collect(),
        }
    }

    /// First column matching any alias, ignoring surrounding whitespace and ASCII case.
    pub fn column_index(&self, aliases: &[&str]) -> Option<usize> {
        for alias in aliases {
            let alias = alias.trim();
            if let Some(idx) = self
                .columns
                .iter()
                .position(|c| c.eq_ignore_ascii_case(alias))
            {
                return Some(idx);
            }
        }
        None
    }

    pub fn require_column(&self, aliases: &[&str]) -> Result<usize, FvError> {
        self.column_index(aliases).ok_or_else(|| {
            FvError::MalformedInput(format!(
                "{} table is missing required column {:?} (found: {})",
                self.name,
                aliases.first().copied().unwrap_or_default(),
                self.columns.join(", ")
            ))
        })
    }

    /// Trimmed cell text; blank and out-of-range cells are absent.
    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        let value = self.rows.get(row)?.get(col)?.trim();
        if value.is_empty() { None } else { Some(value) }
    }

    pub fn number(&self, row: usize, col: usize) -> Option<f64> {
        self.cell(row, col).and_then(parse_number)
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }
}

pub fn load_table(path: &Path, name: &str) -> Result<RawTable, FvError> {
    let content = read_to_string_maybe_gz(path)?;
    if content.trim().is_empty() {
        return Err(FvError::MalformedInput(format!(
            "{} table {} is empty",
            name,
            path.display()
        )));
    }
    let delimiter = sniff_delimiter(&content);
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(content.as_bytes());

    let columns: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        if record.iter().all(|c| c.trim().is_empty()) {
            continue;
        }
        rows.push(record.iter().map(|c| c.to_string()).collect());
    }

    tracing::info!(
        "read {} table: path={}, columns={}, rows={}",
        name,
        path.display(),
        columns.len(),
        rows.len()
    );

    Ok(RawTable {
        name: name.to_string(),
        columns,
        rows,
    })
}

/// Finite number, accepting a decimal comma when no decimal point is present.
pub fn parse_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let value = if trimmed.contains(',') && !trimmed.contains('.') {
        trimmed.replace(',', ".").parse::<f64>().ok()?
    } else {
        trimmed.parse::<f64>().ok()?
    };
    value.is_finite().then_some(value)
}

#[cfg(test)]
#[path = "../../tests/src_inline/input/tests.rs"]
mod tests;
