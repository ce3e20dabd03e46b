use thiserror::Error;

use crate::model::athlete::AthleteKey;
use crate::model::profile::Metric;

#[derive(Debug, Error)]
pub enum FvError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("malformed input: {0}")]
    MalformedInput(String),
    #[error("no usable force-velocity observations: {0}")]
    NoObservations(String),
    #[error("degenerate fit for {athlete}: {reason}")]
    DegenerateFit {
        athlete: AthleteKey,
        reason: DegenerateReason,
    },
    #[error("{athlete} has no profile and is not ranked by {metric}")]
    NotRanked { athlete: AthleteKey, metric: Metric },
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Why a per-athlete line fit could not produce a profile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DegenerateReason {
    ZeroSlope,
    IdenticalVelocities,
    NonFiniteFit,
    InvalidMass(f64),
}

impl std::fmt::Display for DegenerateReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DegenerateReason::ZeroSlope => write!(f, "zero slope, V0 undefined"),
            DegenerateReason::IdenticalVelocities => {
                write!(f, "all velocities identical, line undefined")
            }
            DegenerateReason::NonFiniteFit => write!(f, "fit produced non-finite coefficients"),
            DegenerateReason::InvalidMass(mass) => {
                write!(f, "body mass {mass} kg cannot normalize F0")
            }
        }
    }
}
