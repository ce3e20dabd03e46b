pub mod stage1_reconcile;
pub mod stage2_points;
pub mod stage3_fit;
pub mod stage4_rank;
pub mod stage5_report;

use crate::error::FvError;
use crate::input::RawTable;
use crate::model::config::EngineConfig;
use stage1_reconcile::{Stage1Output, run_stage1};
use stage2_points::{Stage2Output, run_stage2};
use stage3_fit::{Omission, run_stage3};
use stage4_rank::{RankedTable, run_stage4};

/// Everything derived from one pair of input tables.
#[derive(Debug)]
pub struct PipelineOutput {
    pub stage1: Stage1Output,
    pub stage2: Stage2Output,
    pub omitted: Vec<Omission>,
    pub ranked: RankedTable,
}

pub fn run_pipeline(
    jump: &RawTable,
    loaded: &RawTable,
    config: &EngineConfig,
) -> Result<PipelineOutput, FvError> {
    let stage1 = run_stage1(jump, loaded, config)?;
    let stage2 = run_stage2(&stage1, config)?;
    let stage3 = run_stage3(&stage2.observations, config.min_points);
    let ranked = run_stage4(stage3.profiles);
    Ok(PipelineOutput {
        stage1,
        stage2,
        omitted: stage3.omitted,
        ranked,
    })
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/end_to_end.rs"]
mod tests;
