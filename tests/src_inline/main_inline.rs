use std::fs;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::*;

static DIR_COUNTER: AtomicUsize = AtomicUsize::new(0);

fn make_temp_dir() -> PathBuf {
    let mut dir = std::env::temp_dir();
    let id = DIR_COUNTER.fetch_add(1, Ordering::SeqCst);
    dir.push(format!("fv_profile_cli_{}_{}", std::process::id(), id));
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn write_squad_inputs(dir: &std::path::Path) -> (String, String) {
    let jump = dir.join("cmj.csv");
    let loaded = dir.join("fv.csv");
    fs::write(
        &jump,
        "Name,Date,BW [KG],Jump Height (Imp-Mom) [cm] \nAna Ruiz,01/03/2024,60,40\n",
    )
    .unwrap();
    fs::write(
        &loaded,
        "Jugador,Peso Corporal,40kg Vmed (m/s),80kg Vmed (m/s)\n\
Juan Pérez,80,1.2,0.6\n\
Ana Ruiz,,1.3,0.8\n\
Solo,70,1.0,\n",
    )
    .unwrap();
    (
        jump.display().to_string(),
        loaded.display().to_string(),
    )
}

fn parse_args(args: &[&str]) -> Result<RunArgs, clap::Error> {
    let cli = Cli::try_parse_from(std::iter::once("fv-profile").chain(args.iter().copied()))?;
    let Command::Run(run) = cli.command;
    Ok(run)
}

#[test]
fn test_parse_args_minimal() {
    let parsed = parse_args(&[
        "run", "--jump", "cmj.csv", "--loaded", "fv.csv", "--out", "out",
    ])
    .unwrap();
    assert_eq!(parsed.jump, PathBuf::from("cmj.csv"));
    assert_eq!(parsed.loaded, PathBuf::from("fv.csv"));
    assert_eq!(parsed.out, PathBuf::from("out"));
    assert!(parsed.athlete.is_none());
    assert!(!parsed.verbose);
    assert_eq!(parsed.rank_by, Metric::Pmax);
    assert_eq!(build_config(&parsed).loads_kg, vec![40, 50, 60, 70, 80, 90]);
}

#[test]
fn test_parse_args_loads_and_athlete() {
    let parsed = parse_args(&[
        "run",
        "--jump",
        "cmj.csv",
        "--loaded",
        "fv.csv",
        "--out",
        "out",
        "--athlete",
        "juan pérez",
        "--loads",
        "90,40,60",
        "--rank-by",
        "F0",
        "-v",
    ])
    .unwrap();
    assert_eq!(parsed.athlete.as_deref(), Some("juan pérez"));
    assert!(parsed.verbose);
    assert_eq!(parsed.rank_by, Metric::F0);
    assert_eq!(build_config(&parsed).loads_kg, vec![40, 60, 90]);
}

#[test]
fn test_parse_args_missing_input() {
    assert!(parse_args(&["run", "--jump", "cmj.csv", "--out", "out"]).is_err());
    assert!(parse_args(&[]).is_err());
    assert!(
        parse_args(&[
            "run", "--jump", "a.csv", "--loaded", "b.csv", "--out", "o", "--rank-by", "power",
        ])
        .is_err()
    );
}

#[test]
fn test_run_rejects_blank_athlete() {
    let parsed = parse_args(&[
        "run", "--jump", "cmj.csv", "--loaded", "fv.csv", "--out", "out", "--athlete", "  ",
    ])
    .unwrap();
    let err = run(&parsed).unwrap_err();
    assert!(matches!(err, FvError::MalformedInput(_)));
}

#[test]
fn test_run_writes_athlete_export() {
    let dir = make_temp_dir();
    let (jump, loaded) = write_squad_inputs(&dir);
    let out = dir.join("out");
    let out_str = out.display().to_string();
    let parsed = parse_args(&[
        "run", "--jump", &jump, "--loaded", &loaded, "--out", &out_str, "--athlete", "juan pérez",
    ])
    .unwrap();

    assert_eq!(run(&parsed).unwrap(), RunOutcome::Complete);
    assert!(out.join("profiles.tsv").exists());
    assert!(out.join("athlete_juan_pérez.txt").exists());
}

#[test]
fn test_run_unprofiled_athlete_still_writes_squad() {
    let dir = make_temp_dir();
    let (jump, loaded) = write_squad_inputs(&dir);
    let out = dir.join("out");
    let out_str = out.display().to_string();
    let parsed = parse_args(&[
        "run", "--jump", &jump, "--loaded", &loaded, "--out", &out_str, "--athlete", "Solo",
    ])
    .unwrap();

    assert_eq!(run(&parsed).unwrap(), RunOutcome::AthleteNotProfiled);
    for name in ["observations.tsv", "profiles.tsv", "summary.json", "report.txt"] {
        assert!(out.join(name).exists(), "missing {name}");
    }
    assert!(!out.join("athlete_solo.txt").exists());

    let summary: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(out.join("summary.json")).unwrap()).unwrap();
    assert!(summary.get("athlete").is_none());
    assert_eq!(summary["omitted"][0]["athlete"], "Solo");
}
