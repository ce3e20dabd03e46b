use std::collections::{HashMap, HashSet};

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::error::FvError;
use crate::input::RawTable;
use crate::input::jump::{JumpRecord, parse_jump_table};
use crate::input::loaded::{LoadVelocity, LoadedTable, parse_loaded_table};
use crate::model::athlete::AthleteKey;
use crate::model::config::EngineConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MassSource {
    Loaded,
    Jump,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReconciledAthlete {
    pub athlete: AthleteKey,
    pub body_mass_kg: Option<f64>,
    pub mass_source: Option<MassSource>,
    pub jump_matched: bool,
    pub jump_date: Option<NaiveDateTime>,
    pub jump_height_cm: Option<f64>,
    pub velocities: Vec<LoadVelocity>,
}

#[derive(Debug)]
pub struct Stage1Output {
    pub athletes: Vec<ReconciledAthlete>,
    pub velocity_columns: Vec<u32>,
    pub jump_records: usize,
    /// Jump-tested athletes with no loaded-test row; they drop out of the join.
    pub unmatched_jump: Vec<AthleteKey>,
}

pub fn run_stage1(
    jump: &RawTable,
    loaded: &RawTable,
    config: &EngineConfig,
) -> Result<Stage1Output, FvError> {
    let records = parse_jump_table(jump, &config.schema)?;
    let loaded = parse_loaded_table(loaded, &config.schema, &config.loads_kg)?;

    let jump_records = records.len();
    let latest = select_latest(records);
    let athletes = reconcile(&loaded, &latest);

    let loaded_keys: HashSet<&AthleteKey> = loaded.rows.iter().map(|r| &r.athlete).collect();
    let unmatched_jump: Vec<AthleteKey> = latest
        .iter()
        .filter(|r| !loaded_keys.contains(&r.athlete))
        .map(|r| r.athlete.clone())
        .collect();
    for athlete in &unmatched_jump {
        tracing::info!("jump-tested athlete has no loaded test row: {}", athlete);
    }

    tracing::info!(
        "reconciled athletes: loaded={}, jump_records={}, jump_athletes={}, matched={}",
        athletes.len(),
        jump_records,
        latest.len(),
        athletes.iter().filter(|a| a.jump_matched).count()
    );

    Ok(Stage1Output {
        athletes,
        velocity_columns: loaded.velocity_columns,
        jump_records,
        unmatched_jump,
    })
}

/// One record per athlete, in order of first appearance. Later dates win;
/// equal dates keep the earlier row; undated records lose to any dated one.
pub fn select_latest(records: Vec<JumpRecord>) -> Vec<JumpRecord> {
    let mut out: Vec<JumpRecord> = Vec::new();
    let mut index: HashMap<AthleteKey, usize> = HashMap::new();
    for record in records {
        match index.get(&record.athlete) {
            Some(&idx) => {
                if is_later(record.date, out[idx].date) {
                    out[idx] = record;
                }
            }
            None => {
                index.insert(record.athlete.clone(), out.len());
                out.push(record);
            }
        }
    }
    out
}

fn is_later(candidate: Option<NaiveDateTime>, current: Option<NaiveDateTime>) -> bool {
    match (candidate, current) {
        (Some(c), Some(k)) => c > k,
        (Some(_), None) => true,
        (None, _) => false,
    }
}

/// Left join on the loaded table: every loaded row survives.
pub fn reconcile(loaded: &LoadedTable, latest: &[JumpRecord]) -> Vec<ReconciledAthlete> {
    let by_key: HashMap<&AthleteKey, &JumpRecord> =
        latest.iter().map(|r| (&r.athlete, r)).collect();

    loaded
        .rows
        .iter()
        .map(|row| {
            let jump = by_key.get(&row.athlete).copied();
            let mass = resolve_mass(row.body_weight_kg, jump.and_then(|j| j.body_weight_kg));
            if mass.is_none() {
                tracing::warn!(
                    "no body mass for {} in either table; athlete contributes no points",
                    row.athlete
                );
            }
            ReconciledAthlete {
                athlete: row.athlete.clone(),
                body_mass_kg: mass.map(|(m, _)| m),
                mass_source: mass.map(|(_, s)| s),
                jump_matched: jump.is_some(),
                jump_date: jump.and_then(|j| j.date),
                jump_height_cm: jump.and_then(|j| j.jump_height_cm),
                velocities: row.velocities.clone(),
            }
        })
        .collect()
}

pub fn resolve_mass(loaded_kg: Option<f64>, jump_kg: Option<f64>) -> Option<(f64, MassSource)> {
    match (loaded_kg, jump_kg) {
        (Some(m), _) => Some((m, MassSource::Loaded)),
        (None, Some(m)) => Some((m, MassSource::Jump)),
        (None, None) => None,
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage1_reconcile.rs"]
mod tests;
