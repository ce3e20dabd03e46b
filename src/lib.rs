//! Squad force-velocity profiling: reconcile jump and loaded squat tests,
//! build force/velocity points, fit one line per athlete and rank the squad.

pub mod error;
pub mod input;
pub mod logging;
pub mod model;
pub mod pipeline;
pub mod report;

pub use error::{DegenerateReason, FvError};
pub use model::athlete::AthleteKey;
pub use model::config::EngineConfig;
pub use model::observation::{Observation, Source};
pub use model::profile::{Interpretation, Metric, Profile};
pub use pipeline::stage4_rank::{Rank, RankedTable};
pub use pipeline::{PipelineOutput, run_pipeline};
