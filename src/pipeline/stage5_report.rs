use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::FvError;
use crate::model::athlete::AthleteKey;
use crate::model::config::EngineConfig;
use crate::model::observation::{Observation, Source};
use crate::model::profile::{Interpretation, Metric};
use crate::pipeline::PipelineOutput;
use crate::pipeline::stage4_rank::Rank;
use crate::report::json::render_summary_json;
use crate::report::text::{render_athlete_report, render_squad_report};
use crate::report::{Counts, InputMeta, RankingEntry, SummaryData, ToolMeta, format_f64_6};

#[derive(Debug, Clone)]
pub struct RunMeta {
    pub tool_name: String,
    pub tool_version: String,
    pub jump_input: String,
    pub loaded_input: String,
}

/// Single-athlete export consumed by document collaborators.
#[derive(Debug, Clone, Serialize)]
pub struct AthleteExport {
    pub athlete: AthleteKey,
    pub f0_n: f64,
    pub v0_m_s: f64,
    pub pmax_w: f64,
    pub f0_rel_n_kg: f64,
    pub pmax_rank: Rank,
    pub f0_rank: Rank,
    pub v0_rank: Rank,
    pub interpretation: Interpretation,
    pub observations: Vec<Observation>,
}

#[derive(Debug, Clone)]
pub struct Stage5Input<'a> {
    pub output: &'a PipelineOutput,
    /// Row order of profiles.tsv.
    pub order_by: Metric,
    pub export: Option<&'a AthleteExport>,
    pub meta: &'a RunMeta,
}

pub fn build_athlete_export(
    output: &PipelineOutput,
    athlete: &AthleteKey,
    config: &EngineConfig,
) -> Result<AthleteExport, FvError> {
    let ranked = &output.ranked;
    let pmax_rank = ranked.rank(athlete, Metric::Pmax)?;
    let f0_rank = ranked.rank(athlete, Metric::F0)?;
    let v0_rank = ranked.rank(athlete, Metric::V0)?;
    let profile = ranked.profile(athlete).ok_or_else(|| FvError::NotRanked {
        athlete: athlete.clone(),
        metric: Metric::Pmax,
    })?;

    Ok(AthleteExport {
        athlete: athlete.clone(),
        f0_n: profile.f0_n,
        v0_m_s: profile.v0_m_s,
        pmax_w: profile.pmax_w,
        f0_rel_n_kg: profile.f0_rel_n_kg,
        pmax_rank,
        f0_rank,
        v0_rank,
        interpretation: profile.interpretation(&config.interpretation),
        observations: output
            .stage2
            .observations
            .iter()
            .filter(|o| &o.athlete == athlete)
            .cloned()
            .collect(),
    })
}

pub fn build_summary(input: &Stage5Input<'_>) -> SummaryData {
    let output = input.output;
    let observations = &output.stage2.observations;
    let jump_points = observations
        .iter()
        .filter(|o| o.source == Source::Jump)
        .count();

    let mut rankings = BTreeMap::new();
    for metric in Metric::all() {
        let entries = output
            .ranked
            .ordered(metric)
            .into_iter()
            .enumerate()
            .map(|(pos, p)| {
                let rank = Rank {
                    rank: pos + 1,
                    total: output.ranked.len(),
                };
                RankingEntry {
                    rank: rank.rank,
                    athlete: p.athlete.clone(),
                    value: metric.value(p),
                    percentile: rank.percentile(),
                }
            })
            .collect::<Vec<_>>();
        rankings.insert(metric.name(), entries);
    }

    SummaryData {
        tool: ToolMeta {
            name: input.meta.tool_name.clone(),
            version: input.meta.tool_version.clone(),
        },
        input: InputMeta {
            jump: input.meta.jump_input.clone(),
            loaded: input.meta.loaded_input.clone(),
            jump_records: output.stage1.jump_records,
            loaded_athletes: output.stage1.athletes.len(),
            velocity_columns_kg: output.stage1.velocity_columns.clone(),
        },
        counts: Counts {
            observations: observations.len(),
            jump_points,
            loaded_points: observations.len() - jump_points,
            profiled: output.ranked.len(),
            omitted: output.omitted.len(),
            without_mass: output.stage2.massless.len(),
            unmatched_jump: output.stage1.unmatched_jump.len(),
        },
        omitted: output.omitted.clone(),
        without_mass: output.stage2.massless.clone(),
        unmatched_jump: output.stage1.unmatched_jump.clone(),
        rankings,
        athlete: input.export.cloned(),
    }
}

pub fn write_reports(input: &Stage5Input<'_>, out_dir: &Path) -> Result<Vec<PathBuf>, FvError> {
    fs::create_dir_all(out_dir)?;
    let mut written = Vec::new();

    let observations_path = out_dir.join("observations.tsv");
    write_observations_tsv(&input.output.stage2.observations, &observations_path)?;
    written.push(observations_path);

    let profiles_path = out_dir.join("profiles.tsv");
    write_profiles_tsv(input.output, input.order_by, &profiles_path)?;
    written.push(profiles_path);

    let summary = build_summary(input);
    let summary_path = out_dir.join("summary.json");
    fs::write(&summary_path, render_summary_json(&summary)?)?;
    written.push(summary_path);

    let report_path = out_dir.join("report.txt");
    fs::write(&report_path, render_squad_report(&summary))?;
    written.push(report_path);

    if let Some(export) = input.export {
        let athlete_path = out_dir.join(format!("athlete_{}.txt", export.athlete.slug()));
        fs::write(&athlete_path, render_athlete_report(export))?;
        written.push(athlete_path);
    }

    for path in &written {
        tracing::info!("wrote {}", path.display());
    }
    Ok(written)
}

fn tsv_writer(path: &Path) -> Result<csv::Writer<fs::File>, FvError> {
    Ok(csv::WriterBuilder::new()
        .delimiter(b'\t')
        .from_path(path)?)
}

fn write_observations_tsv(observations: &[Observation], path: &Path) -> Result<(), FvError> {
    let mut w = tsv_writer(path)?;
    w.write_record([
        "athlete",
        "source",
        "load_kg",
        "total_mass_kg",
        "force_n",
        "velocity_m_s",
    ])?;
    for obs in observations {
        w.write_record([
            obs.athlete.as_str().to_string(),
            obs.source.as_str().to_string(),
            format_f64_6(obs.load_kg),
            format_f64_6(obs.total_mass_kg),
            format_f64_6(obs.force_n),
            format_f64_6(obs.velocity_m_s),
        ])?;
    }
    w.flush()?;
    Ok(())
}

fn write_profiles_tsv(output: &PipelineOutput, order_by: Metric, path: &Path) -> Result<(), FvError> {
    let ranked = &output.ranked;
    let mut w = tsv_writer(path)?;
    let percentile_column = format!("percentile_{}", order_by.name());
    w.write_record([
        "athlete",
        "f0_n",
        "v0_m_s",
        "pmax_w",
        "f0_rel_n_kg",
        "slope",
        "body_mass_kg",
        "n_points",
        "rank_pmax",
        "rank_f0",
        "rank_v0",
        percentile_column.as_str(),
    ])?;
    for p in ranked.ordered(order_by) {
        let pmax = ranked.rank(&p.athlete, Metric::Pmax)?;
        let f0 = ranked.rank(&p.athlete, Metric::F0)?;
        let v0 = ranked.rank(&p.athlete, Metric::V0)?;
        w.write_record([
            p.athlete.as_str().to_string(),
            format_f64_6(p.f0_n),
            format_f64_6(p.v0_m_s),
            format_f64_6(p.pmax_w),
            format_f64_6(p.f0_rel_n_kg),
            format_f64_6(p.slope),
            format_f64_6(p.body_mass_kg),
            p.n_points.to_string(),
            pmax.rank.to_string(),
            f0.rank.to_string(),
            v0.rank.to_string(),
            format_f64_6(ranked.percentile(&p.athlete, order_by)?),
        ])?;
    }
    w.flush()?;
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage5_report.rs"]
mod tests;
