use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueHint};

use fv_profile::error::FvError;
use fv_profile::input::load_table;
use fv_profile::logging::init_logging;
use fv_profile::model::athlete::AthleteKey;
use fv_profile::model::config::EngineConfig;
use fv_profile::model::profile::Metric;
use fv_profile::pipeline::run_pipeline;
use fv_profile::pipeline::stage5_report::{
    RunMeta, Stage5Input, build_athlete_export, write_reports,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "Squad force-velocity profiling", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Profile a squad from a jump-test table and a loaded squat velocity table
    Run(RunArgs),
}

#[derive(Args, Debug, Clone)]
struct RunArgs {
    /// Jump-test table (CSV, optionally .gz)
    #[arg(long, value_hint = ValueHint::FilePath)]
    jump: PathBuf,

    /// Loaded squat velocity table (CSV, optionally .gz)
    #[arg(long, value_hint = ValueHint::FilePath)]
    loaded: PathBuf,

    /// Output directory
    #[arg(long, value_hint = ValueHint::DirPath)]
    out: PathBuf,

    /// Athlete for the single-athlete export
    #[arg(long)]
    athlete: Option<String>,

    /// Metric ordering profiles.tsv: pmax, f0 or v0
    #[arg(long, default_value = "pmax")]
    rank_by: Metric,

    /// External loads in kg, comma separated (default 40,50,60,70,80,90)
    #[arg(long, value_delimiter = ',')]
    loads: Option<Vec<u32>>,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,
}

/// Squad artifacts are written in both cases; exit code 2 flags a missing athlete export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RunOutcome {
    Complete,
    AthleteNotProfiled,
}

fn main() {
    let cli = Cli::parse();
    let Command::Run(args) = cli.command;
    init_logging(args.verbose);
    match run(&args) {
        Ok(RunOutcome::Complete) => {}
        Ok(RunOutcome::AthleteNotProfiled) => std::process::exit(2),
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    }
}

fn run(args: &RunArgs) -> Result<RunOutcome, FvError> {
    let config = build_config(args);

    let athlete = match &args.athlete {
        Some(raw) => Some(AthleteKey::normalize(raw).ok_or_else(|| {
            FvError::MalformedInput("--athlete must not be blank".to_string())
        })?),
        None => None,
    };

    let jump = load_table(&args.jump, "jump")?;
    let loaded = load_table(&args.loaded, "loaded")?;
    let output = run_pipeline(&jump, &loaded, &config)?;

    let mut outcome = RunOutcome::Complete;
    let export = match &athlete {
        Some(key) => match build_athlete_export(&output, key, &config) {
            Ok(export) => Some(export),
            Err(err @ FvError::NotRanked { .. }) => {
                tracing::warn!("no athlete export written: {}", err);
                outcome = RunOutcome::AthleteNotProfiled;
                None
            }
            Err(err) => return Err(err),
        },
        None => None,
    };

    let meta = RunMeta {
        tool_name: env!("CARGO_PKG_NAME").to_string(),
        tool_version: env!("CARGO_PKG_VERSION").to_string(),
        jump_input: args.jump.display().to_string(),
        loaded_input: args.loaded.display().to_string(),
    };
    let input = Stage5Input {
        output: &output,
        order_by: args.rank_by,
        export: export.as_ref(),
        meta: &meta,
    };
    write_reports(&input, &args.out)?;

    Ok(outcome)
}

fn build_config(args: &RunArgs) -> EngineConfig {
    let config = EngineConfig::default_v1();
    match &args.loads {
        Some(loads) if !loads.is_empty() => config.with_loads(loads),
        _ => config,
    }
}

#[cfg(test)]
#[path = "../tests/src_inline/main_inline.rs"]
mod tests;
