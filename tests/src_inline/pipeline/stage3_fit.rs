use super::*;
use crate::model::observation::Source;

fn key(name: &str) -> AthleteKey {
    AthleteKey::normalize(name).unwrap()
}

fn obs(name: &str, mass: f64, load: f64, velocity: f64) -> Observation {
    let total = mass + load;
    Observation {
        athlete: key(name),
        load_kg: load,
        body_mass_kg: mass,
        total_mass_kg: total,
        force_n: total * 9.81,
        velocity_m_s: velocity,
        source: if load == 0.0 {
            Source::Jump
        } else {
            Source::Loaded
        },
    }
}

fn close(a: f64, b: f64, tol: f64) -> bool {
    (a - b).abs() <= tol * b.abs().max(1.0)
}

#[test]
fn test_worked_example() {
    let points = vec![
        obs("Juan Pérez", 80.0, 40.0, 1.2),
        obs("Juan Pérez", 80.0, 80.0, 0.6),
    ];
    let out = run_stage3(&points, 2);
    assert!(out.omitted.is_empty());
    let p = &out.profiles[0];

    assert!(close(p.slope, -654.0, 1e-9));
    assert!(close(p.f0_n, 1962.0, 1e-9));
    assert!(close(p.v0_m_s, 3.0, 1e-9));
    assert!(close(p.pmax_w, 1471.5, 1e-9));
    assert!(close(p.f0_rel_n_kg, 1962.0 / 80.0, 1e-9));
    assert_eq!(p.n_points, 2);
}

#[test]
fn test_pmax_and_line_identities() {
    let points = vec![
        obs("Ana", 62.0, 0.0, 2.6),
        obs("Ana", 62.0, 40.0, 1.15),
        obs("Ana", 62.0, 60.0, 0.93),
        obs("Ana", 62.0, 80.0, 0.71),
    ];
    let out = run_stage3(&points, 2);
    let p = &out.profiles[0];
    assert_eq!(p.pmax_w, p.f0_n * p.v0_m_s / 4.0);
    assert!(close(p.force_at(0.0), p.f0_n, 1e-12));
    assert!(p.force_at(p.v0_m_s).abs() < 1e-6);
    assert!(p.slope < 0.0);
}

#[test]
fn test_ols_matches_hand_computation() {
    let fit = fit_line(&[(1.0, 3.0), (2.0, 5.0), (3.0, 4.0)]).unwrap();
    // mean x = 2, mean y = 4, sxx = 2, sxy = 1
    assert!(close(fit.slope, 0.5, 1e-12));
    assert!(close(fit.intercept, 3.0, 1e-12));
}

#[test]
fn test_single_point_athlete_is_omitted() {
    let points = vec![
        obs("Juan", 80.0, 40.0, 1.2),
        obs("Ana", 60.0, 40.0, 1.3),
        obs("Juan", 80.0, 80.0, 0.6),
    ];
    let out = run_stage3(&points, 2);
    assert_eq!(out.profiles.len(), 1);
    assert_eq!(out.profiles[0].athlete, key("Juan"));
    assert_eq!(out.omitted.len(), 1);
    assert_eq!(out.omitted[0].athlete, key("Ana"));
    assert_eq!(
        out.omitted[0].reason,
        OmissionReason::TooFewPoints {
            n_points: 1,
            min_points: 2
        }
    );
}

#[test]
fn test_zero_slope_is_degenerate() {
    let err = fit_line(&[(1.0, 500.0), (2.0, 500.0), (3.0, 500.0)]).unwrap_err();
    assert_eq!(err, DegenerateReason::ZeroSlope);
}

#[test]
fn test_identical_velocities_are_degenerate() {
    let points = vec![
        obs("Luis", 70.0, 40.0, 1.0),
        obs("Luis", 70.0, 60.0, 1.0),
        obs("Ana", 60.0, 40.0, 1.2),
        obs("Ana", 60.0, 60.0, 0.9),
    ];
    let out = run_stage3(&points, 2);
    assert_eq!(out.profiles.len(), 1);
    assert_eq!(out.profiles[0].athlete, key("Ana"));
    assert_eq!(
        out.omitted[0].reason,
        OmissionReason::Degenerate(DegenerateReason::IdenticalVelocities)
    );
}

#[test]
fn test_zero_mass_is_degenerate() {
    let points = [obs("Zed", 0.0, 40.0, 1.2), obs("Zed", 0.0, 80.0, 0.6)];
    let refs: Vec<&Observation> = points.iter().collect();
    let err = fit_profile(&key("Zed"), &refs).unwrap_err();
    assert_eq!(err, DegenerateReason::InvalidMass(0.0));

    let out = run_stage3(&points, 2);
    assert!(out.profiles.is_empty());
    assert_eq!(
        out.omitted,
        vec![Omission {
            athlete: key("Zed"),
            n_points: 2,
            reason: OmissionReason::Degenerate(DegenerateReason::InvalidMass(0.0)),
        }]
    );
    assert_eq!(
        out.omitted[0].reason.to_string(),
        "body mass 0 kg cannot normalize F0"
    );
}

#[test]
fn test_inverted_fit_passes_through() {
    // Faster under heavier load: non-physical, but reported unfiltered.
    let points = vec![obs("Odd", 80.0, 40.0, 0.6), obs("Odd", 80.0, 80.0, 1.2)];
    let out = run_stage3(&points, 2);
    let p = &out.profiles[0];
    assert!(p.slope > 0.0);
    assert!(p.v0_m_s < 0.0);
    assert_eq!(p.pmax_w, p.f0_n * p.v0_m_s / 4.0);
}

#[test]
fn test_groups_follow_first_appearance() {
    let points = vec![
        obs("B", 80.0, 40.0, 1.2),
        obs("A", 80.0, 40.0, 1.1),
        obs("B", 80.0, 80.0, 0.6),
        obs("A", 80.0, 80.0, 0.5),
    ];
    let groups = group_by_athlete(&points);
    assert_eq!(groups[0].0, &key("B"));
    assert_eq!(groups[1].0, &key("A"));
    assert_eq!(groups[0].1.len(), 2);

    let out = run_stage3(&points, 2);
    let names: Vec<&str> = out.profiles.iter().map(|p| p.athlete.as_str()).collect();
    assert_eq!(names, vec!["B", "A"]);
}
