use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use flate2::read::GzDecoder;

use crate::error::FvError;

pub fn open_maybe_gz(path: &Path) -> Result<Box<dyn BufRead>, FvError> {
    let file = File::open(path)?;
    if path.extension().is_some_and(|ext| ext == "gz") {
        Ok(Box::new(BufReader::new(GzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

pub fn read_to_string_maybe_gz(path: &Path) -> Result<String, FvError> {
    let mut reader = open_maybe_gz(path)?;
    let mut content = String::new();
    reader.read_to_string(&mut content)?;
    if let Some(stripped) = content.strip_prefix('\u{feff}') {
        content = stripped.to_string();
    }
    Ok(content)
}

/// Spreadsheet exports use `;` or tabs in comma-decimal locales.
pub fn sniff_delimiter(content: &str) -> u8 {
    let header = content.lines().next().unwrap_or("");
    if header.contains(',') {
        b','
    } else if header.contains(';') {
        b';'
    } else if header.contains('\t') {
        b'\t'
    } else {
        b','
    }
}
