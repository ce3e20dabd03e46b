use serde::Serialize;

use crate::error::{DegenerateReason, FvError};
use crate::model::athlete::AthleteKey;
use crate::model::observation::Observation;
use crate::model::profile::Profile;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineFit {
    pub slope: f64,
    pub intercept: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum OmissionReason {
    TooFewPoints { n_points: usize, min_points: usize },
    Degenerate(DegenerateReason),
}

impl std::fmt::Display for OmissionReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OmissionReason::TooFewPoints {
                n_points,
                min_points,
            } => write!(f, "{n_points} point(s), need at least {min_points}"),
            OmissionReason::Degenerate(reason) => write!(f, "{reason}"),
        }
    }
}

impl Serialize for OmissionReason {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Omission {
    pub athlete: AthleteKey,
    pub n_points: usize,
    pub reason: OmissionReason,
}

#[derive(Debug)]
pub struct Stage3Output {
    pub profiles: Vec<Profile>,
    pub omitted: Vec<Omission>,
}

pub fn run_stage3(observations: &[Observation], min_points: usize) -> Stage3Output {
    let min_points = min_points.max(2);
    let mut profiles = Vec::new();
    let mut omitted = Vec::new();

    for (athlete, points) in group_by_athlete(observations) {
        let n_points = points.len();
        if n_points < min_points {
            tracing::info!(
                "omitting {} from profiles: {} point(s), need at least {}",
                athlete,
                n_points,
                min_points
            );
            omitted.push(Omission {
                athlete: athlete.clone(),
                n_points,
                reason: OmissionReason::TooFewPoints {
                    n_points,
                    min_points,
                },
            });
            continue;
        }
        match fit_profile(athlete, &points) {
            Ok(profile) => profiles.push(profile),
            Err(reason) => {
                let err = FvError::DegenerateFit {
                    athlete: athlete.clone(),
                    reason,
                };
                tracing::warn!("omitting from profiles: {}", err);
                omitted.push(Omission {
                    athlete: athlete.clone(),
                    n_points,
                    reason: OmissionReason::Degenerate(reason),
                });
            }
        }
    }

    tracing::info!(
        "fitted profiles: profiled={}, omitted={}",
        profiles.len(),
        omitted.len()
    );

    Stage3Output { profiles, omitted }
}

/// Groups in order of first appearance, so output order follows the loaded table.
pub fn group_by_athlete(observations: &[Observation]) -> Vec<(&AthleteKey, Vec<&Observation>)> {
    let mut groups: Vec<(&AthleteKey, Vec<&Observation>)> = Vec::new();
    let mut index: std::collections::HashMap<&AthleteKey, usize> =
        std::collections::HashMap::new();
    for obs in observations {
        match index.get(&obs.athlete) {
            Some(&idx) => groups[idx].1.push(obs),
            None => {
                index.insert(&obs.athlete, groups.len());
                groups.push((&obs.athlete, vec![obs]));
            }
        }
    }
    groups
}

pub fn fit_profile(
    athlete: &AthleteKey,
    points: &[&Observation],
) -> Result<Profile, DegenerateReason> {
    let pairs: Vec<(f64, f64)> = points.iter().map(|o| (o.velocity_m_s, o.force_n)).collect();
    let line = fit_line(&pairs)?;

    let body_mass_kg = points.first().map(|o| o.body_mass_kg).unwrap_or(0.0);
    if !body_mass_kg.is_finite() || body_mass_kg <= 0.0 {
        return Err(DegenerateReason::InvalidMass(body_mass_kg));
    }

    let f0_n = line.intercept;
    let v0_m_s = -line.intercept / line.slope;
    let pmax_w = (f0_n * v0_m_s) / 4.0;
    if !v0_m_s.is_finite() || !pmax_w.is_finite() {
        return Err(DegenerateReason::NonFiniteFit);
    }

    Ok(Profile {
        athlete: athlete.clone(),
        f0_n,
        v0_m_s,
        pmax_w,
        f0_rel_n_kg: f0_n / body_mass_kg,
        slope: line.slope,
        body_mass_kg,
        n_points: points.len(),
    })
}

/// Ordinary least squares of y on x over centred sums.
pub fn fit_line(points: &[(f64, f64)]) -> Result<LineFit, DegenerateReason> {
    let n = points.len() as f64;
    let mean_x = points.iter().map(|p| p.0).sum::<f64>() / n;
    let mean_y = points.iter().map(|p| p.1).sum::<f64>() / n;

    let mut sxx = 0.0;
    let mut sxy = 0.0;
    for &(x, y) in points {
        let dx = x - mean_x;
        sxx += dx * dx;
        sxy += dx * (y - mean_y);
    }

    if sxx == 0.0 {
        return Err(DegenerateReason::IdenticalVelocities);
    }
    let slope = sxy / sxx;
    let intercept = mean_y - slope * mean_x;
    if !slope.is_finite() || !intercept.is_finite() {
        return Err(DegenerateReason::NonFiniteFit);
    }
    if slope == 0.0 {
        return Err(DegenerateReason::ZeroSlope);
    }
    Ok(LineFit { slope, intercept })
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage3_fit.rs"]
mod tests;
