use std::collections::HashMap;

use crate::error::FvError;
use crate::input::RawTable;
use crate::model::athlete::AthleteKey;
use crate::model::config::{ColumnSchema, velocity_column};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoadVelocity {
    pub load_kg: u32,
    pub velocity_m_s: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoadedTestRow {
    pub athlete: AthleteKey,
    pub row: usize,
    pub body_weight_kg: Option<f64>,
    /// One entry per configured load, ascending.
    pub velocities: Vec<LoadVelocity>,
}

#[derive(Debug, Clone)]
pub struct LoadedTable {
    pub rows: Vec<LoadedTestRow>,
    /// Loads whose velocity column exists in the header.
    pub velocity_columns: Vec<u32>,
}

pub fn parse_loaded_table(
    table: &RawTable,
    schema: &ColumnSchema,
    loads_kg: &[u32],
) -> Result<LoadedTable, FvError> {
    let name_col = table.require_column(schema.loaded_name)?;
    let weight_col = table.column_index(schema.loaded_body_weight);

    let mut loads = loads_kg.to_vec();
    loads.sort_unstable();
    loads.dedup();

    let load_cols: Vec<(u32, Option<usize>)> = loads
        .iter()
        .map(|&load| (load, table.column_index(&[velocity_column(load).as_str()])))
        .collect();
    let velocity_columns: Vec<u32> = load_cols
        .iter()
        .filter(|(_, col)| col.is_some())
        .map(|(load, _)| *load)
        .collect();
    if velocity_columns.len() < loads.len() {
        tracing::debug!(
            "loaded table has velocity columns for {:?} of configured loads {:?}",
            velocity_columns,
            loads
        );
    }

    let mut index: HashMap<AthleteKey, usize> = HashMap::new();
    let mut rows: Vec<LoadedTestRow> = Vec::with_capacity(table.n_rows());
    for row in 0..table.n_rows() {
        let Some(athlete) = table.cell(row, name_col).and_then(AthleteKey::normalize) else {
            tracing::warn!("loaded row has empty athlete name; skipping (row {})", row + 1);
            continue;
        };

        let velocities: Vec<LoadVelocity> = load_cols
            .iter()
            .map(|&(load_kg, col)| {
                let velocity_m_s = col.and_then(|c| {
                    let value = table.number(row, c);
                    if value.is_none() && table.cell(row, c).is_some() {
                        tracing::debug!(
                            "non-numeric velocity for {} at {} kg; treated as absent",
                            athlete,
                            load_kg
                        );
                    }
                    value
                });
                LoadVelocity {
                    load_kg,
                    velocity_m_s,
                }
            })
            .collect();
        let body_weight_kg = weight_col.and_then(|c| table.number(row, c));

        if let Some(&idx) = index.get(&athlete) {
            tracing::warn!(
                "duplicate athlete in loaded table; merging into first row (row {}, athlete {})",
                row + 1,
                athlete
            );
            merge_into(&mut rows[idx], body_weight_kg, &velocities);
            continue;
        }

        index.insert(athlete.clone(), rows.len());
        rows.push(LoadedTestRow {
            athlete,
            row,
            body_weight_kg,
            velocities,
        });
    }

    Ok(LoadedTable {
        rows,
        velocity_columns,
    })
}

/// Later rows only fill gaps: the first row's mass and readings win.
fn merge_into(first: &mut LoadedTestRow, body_weight_kg: Option<f64>, velocities: &[LoadVelocity]) {
    if first.body_weight_kg.is_none() {
        first.body_weight_kg = body_weight_kg;
    }
    for (slot, later) in first.velocities.iter_mut().zip(velocities) {
        if slot.velocity_m_s.is_none() {
            slot.velocity_m_s = later.velocity_m_s;
        }
    }
}
