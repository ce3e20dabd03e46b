pub mod json;
pub mod text;

use std::collections::BTreeMap;

use serde::Serialize;

use crate::model::athlete::AthleteKey;
use crate::pipeline::stage3_fit::Omission;
use crate::pipeline::stage5_report::AthleteExport;

#[derive(Debug, Clone, Serialize)]
pub struct ToolMeta {
    pub name: String,
    pub version: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct InputMeta {
    pub jump: String,
    pub loaded: String,
    pub jump_records: usize,
    pub loaded_athletes: usize,
    pub velocity_columns_kg: Vec<u32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Counts {
    pub observations: usize,
    pub jump_points: usize,
    pub loaded_points: usize,
    pub profiled: usize,
    pub omitted: usize,
    pub without_mass: usize,
    pub unmatched_jump: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct RankingEntry {
    pub rank: usize,
    pub athlete: AthleteKey,
    pub value: f64,
    pub percentile: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct SummaryData {
    pub tool: ToolMeta,
    pub input: InputMeta,
    pub counts: Counts,
    pub omitted: Vec<Omission>,
    pub without_mass: Vec<AthleteKey>,
    pub unmatched_jump: Vec<AthleteKey>,
    pub rankings: BTreeMap<&'static str, Vec<RankingEntry>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub athlete: Option<AthleteExport>,
}

pub fn format_f64_2(v: f64) -> String {
    format!("{:.2}", v)
}

pub fn format_f64_6(v: f64) -> String {
    format!("{:.6}", v)
}
