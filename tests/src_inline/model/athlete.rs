use super::*;

#[test]
fn test_normalize_trims_and_title_cases() {
    let key = AthleteKey::normalize("  juan PÉREZ ").unwrap();
    assert_eq!(key.as_str(), "Juan Pérez");
}

#[test]
fn test_normalize_is_idempotent() {
    for raw in ["maría  josé", "O'NEIL", "jean-luc picard", "  x  "] {
        let once = AthleteKey::normalize(raw).unwrap();
        let twice = AthleteKey::normalize(once.as_str()).unwrap();
        assert_eq!(once, twice);
    }
}

#[test]
fn test_same_athlete_across_sources() {
    let from_jump = AthleteKey::normalize("JUAN PEREZ").unwrap();
    let from_loaded = AthleteKey::normalize("juan perez ").unwrap();
    assert_eq!(from_jump, from_loaded);
}

#[test]
fn test_title_case_after_punctuation() {
    assert_eq!(title_case("o'neil"), "O'Neil");
    assert_eq!(title_case("jean-luc"), "Jean-Luc");
}

#[test]
fn test_blank_name_has_no_key() {
    assert!(AthleteKey::normalize("").is_none());
    assert!(AthleteKey::normalize("   ").is_none());
}

#[test]
fn test_slug() {
    let key = AthleteKey::normalize("Juan Pérez").unwrap();
    assert_eq!(key.slug(), "juan_pérez");
    let key = AthleteKey::normalize("  ../ Ana  ").unwrap();
    assert_eq!(key.slug(), "ana");
}
