use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::model::athlete::AthleteKey;
use crate::model::config::InterpretationThresholds;

/// Linear force-velocity profile of one athlete, F = slope * V + F0.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Profile {
    pub athlete: AthleteKey,
    pub f0_n: f64,
    pub v0_m_s: f64,
    pub pmax_w: f64,
    pub f0_rel_n_kg: f64,
    pub slope: f64,
    pub body_mass_kg: f64,
    pub n_points: usize,
}

impl Profile {
    pub fn force_at(&self, velocity_m_s: f64) -> f64 {
        self.slope * velocity_m_s + self.f0_n
    }

    pub fn interpretation(&self, thresholds: &InterpretationThresholds) -> Interpretation {
        Interpretation::classify(self.f0_n, self.v0_m_s, thresholds)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    Pmax,
    F0,
    V0,
}

impl Metric {
    pub fn all() -> [Metric; 3] {
        [Metric::Pmax, Metric::F0, Metric::V0]
    }

    pub fn name(self) -> &'static str {
        match self {
            Metric::Pmax => "pmax",
            Metric::F0 => "f0",
            Metric::V0 => "v0",
        }
    }

    pub fn value(self, profile: &Profile) -> f64 {
        match self {
            Metric::Pmax => profile.pmax_w,
            Metric::F0 => profile.f0_n,
            Metric::V0 => profile.v0_m_s,
        }
    }
}

impl std::fmt::Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Metric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pmax" => Ok(Metric::Pmax),
            "f0" => Ok(Metric::F0),
            "v0" => Ok(Metric::V0),
            other => Err(format!("unknown metric: {other} (use pmax|f0|v0)")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interpretation {
    VelocityOriented,
    ForceOriented,
    Balanced,
}

impl Interpretation {
    pub fn classify(f0_n: f64, v0_m_s: f64, t: &InterpretationThresholds) -> Self {
        if v0_m_s > t.velocity_oriented_v0_above && f0_n < t.velocity_oriented_f0_below {
            Interpretation::VelocityOriented
        } else if f0_n > t.force_oriented_f0_above && v0_m_s < t.force_oriented_v0_below {
            Interpretation::ForceOriented
        } else {
            Interpretation::Balanced
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Interpretation::VelocityOriented => "velocity-oriented, force deficit",
            Interpretation::ForceOriented => "force-oriented, velocity deficit",
            Interpretation::Balanced => "balanced profile",
        }
    }
}

impl Serialize for Interpretation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/model/profile.rs"]
mod tests;
