use chrono::{Datelike, NaiveDate, NaiveDateTime};

use crate::error::FvError;
use crate::input::RawTable;
use crate::model::athlete::AthleteKey;
use crate::model::config::ColumnSchema;

#[derive(Debug, Clone, PartialEq)]
pub struct JumpRecord {
    pub athlete: AthleteKey,
    pub row: usize,
    pub date: Option<NaiveDateTime>,
    pub body_weight_kg: Option<f64>,
    pub jump_height_cm: Option<f64>,
}

const DATETIME_FORMATS: &[&str] = &[
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
    "%d-%m-%Y %H:%M:%S",
    "%d-%m-%Y %H:%M",
    "%d.%m.%Y %H:%M:%S",
    "%d.%m.%Y %H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
];

const DATE_FORMATS: &[&str] = &["%d/%m/%Y", "%d-%m-%Y", "%d.%m.%Y", "%Y-%m-%d", "%Y/%m/%d"];

const SHORT_YEAR_FORMATS: &[&str] = &["%d/%m/%y", "%d-%m-%y", "%d.%m.%y"];

pub fn parse_jump_table(
    table: &RawTable,
    schema: &ColumnSchema,
) -> Result<Vec<JumpRecord>, FvError> {
    let name_col = table.require_column(schema.jump_name)?;
    let date_col = table.require_column(schema.jump_date)?;
    let weight_col = table.require_column(schema.jump_body_weight)?;
    let height_col = table.require_column(schema.jump_height_cm)?;

    let mut records = Vec::with_capacity(table.n_rows());
    for row in 0..table.n_rows() {
        let Some(athlete) = table.cell(row, name_col).and_then(AthleteKey::normalize) else {
            tracing::warn!("jump row has empty athlete name; skipping (row {})", row + 1);
            continue;
        };
        let date = table.cell(row, date_col).and_then(parse_test_date);
        if date.is_none() {
            tracing::warn!(
                "unparseable jump test date for {}; treated as oldest (row {})",
                athlete,
                row + 1
            );
        }
        records.push(JumpRecord {
            athlete,
            row,
            date,
            body_weight_kg: table.number(row, weight_col),
            jump_height_cm: table.number(row, height_col),
        });
    }
    Ok(records)
}

/// Day-first date or date-time. Date-only values resolve to midnight.
pub fn parse_test_date(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            if dt.year() >= 1000 {
                return Some(dt);
            }
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(raw, fmt) {
            if d.year() >= 1000 {
                return d.and_hms_opt(0, 0, 0);
            }
        }
    }
    for fmt in SHORT_YEAR_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(raw, fmt) {
            return d.and_hms_opt(0, 0, 0);
        }
    }
    None
}
