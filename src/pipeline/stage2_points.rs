use crate::error::FvError;
use crate::model::athlete::AthleteKey;
use crate::model::config::{EngineConfig, velocity_column};
use crate::model::observation::{Observation, Source};
use crate::pipeline::stage1_reconcile::{ReconciledAthlete, Stage1Output};

#[derive(Debug)]
pub struct Stage2Output {
    pub observations: Vec<Observation>,
    /// Athletes without any resolvable body mass.
    pub massless: Vec<AthleteKey>,
}

pub fn run_stage2(stage1: &Stage1Output, config: &EngineConfig) -> Result<Stage2Output, FvError> {
    let mut observations = Vec::new();
    let mut massless = Vec::new();

    for athlete in &stage1.athletes {
        let Some(mass) = athlete.body_mass_kg else {
            massless.push(athlete.athlete.clone());
            continue;
        };
        let before = observations.len();
        build_athlete_points(athlete, mass, config.gravity, &mut observations);
        tracing::debug!(
            "built {} points for {} (mass {} kg)",
            observations.len() - before,
            athlete.athlete,
            mass
        );
    }

    if observations.is_empty() {
        return Err(FvError::NoObservations(no_points_diagnostic(
            &stage1.velocity_columns,
            &config.loads_kg,
        )));
    }

    tracing::info!(
        "built observations: points={}, athletes_without_mass={}",
        observations.len(),
        massless.len()
    );

    Ok(Stage2Output {
        observations,
        massless,
    })
}

/// Jump point first, then loaded points by ascending load.
pub fn build_athlete_points(
    athlete: &ReconciledAthlete,
    mass_kg: f64,
    gravity: f64,
    out: &mut Vec<Observation>,
) {
    if let Some(height_cm) = athlete.jump_height_cm {
        let velocity = takeoff_velocity(height_cm, gravity);
        push_if_valid(out, athlete, 0.0, mass_kg, velocity, gravity, Source::Jump);
    }

    let mut velocities = athlete.velocities.clone();
    velocities.sort_by_key(|lv| lv.load_kg);
    for lv in velocities {
        if let Some(velocity) = lv.velocity_m_s {
            push_if_valid(
                out,
                athlete,
                lv.load_kg as f64,
                mass_kg,
                velocity,
                gravity,
                Source::Loaded,
            );
        }
    }
}

/// Take-off velocity from flight height: v = sqrt(2 g h), h in metres.
pub fn takeoff_velocity(height_cm: f64, gravity: f64) -> f64 {
    (2.0 * gravity * (height_cm / 100.0)).sqrt()
}

fn push_if_valid(
    out: &mut Vec<Observation>,
    athlete: &ReconciledAthlete,
    load_kg: f64,
    mass_kg: f64,
    velocity_m_s: f64,
    gravity: f64,
    source: Source,
) {
    if !velocity_m_s.is_finite() || velocity_m_s <= 0.0 {
        tracing::debug!(
            "dropping {} point for {} at {} kg: velocity {} is not positive",
            source.as_str(),
            athlete.athlete,
            load_kg,
            velocity_m_s
        );
        return;
    }
    let total_mass_kg = mass_kg + load_kg;
    out.push(Observation {
        athlete: athlete.athlete.clone(),
        load_kg,
        body_mass_kg: mass_kg,
        total_mass_kg,
        force_n: total_mass_kg * gravity,
        velocity_m_s,
        source,
    });
}

fn no_points_diagnostic(found: &[u32], expected: &[u32]) -> String {
    if found.is_empty() {
        let names: Vec<String> = expected.iter().map(|&l| velocity_column(l)).collect();
        format!(
            "no velocity columns found in the loaded-test table (expected any of: {})",
            names.join(", ")
        )
    } else {
        let names: Vec<String> = found.iter().map(|&l| velocity_column(l)).collect();
        format!(
            "velocity columns {} are present but no athlete has both a body mass and a positive reading",
            names.join(", ")
        )
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage2_points.rs"]
mod tests;
