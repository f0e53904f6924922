use std::path::PathBuf;

use mapgap_io::csv::load_candidates;
use mapgap_io::osm::load_map_entries;
use mapgap_recon::config::ReconConfig;
use mapgap_recon::engine::run;
use mapgap_recon::error::CoordinateField;
use mapgap_recon::{DropReason, MatchStatus, ReconInput, ReconOutcome, TagKeyFilter, TagMatchMode};

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn load_and_run(config_toml: &str) -> ReconOutcome {
    let dir = fixtures_dir();
    let config = ReconConfig::from_toml(config_toml).unwrap();

    let filter = TagKeyFilter::from_config(&config.matching);
    let map = load_map_entries(&dir.join(&config.sources.map), &filter).unwrap();
    let candidates = load_candidates(
        &dir.join(&config.sources.reference),
        config.sources.delimiter_byte(),
        &config.columns,
    )
    .unwrap();

    let input = ReconInput {
        map_entries: map.entries,
        candidates,
    };
    run(&config, &input).unwrap()
}

fn ids(outcome: &ReconOutcome) -> Vec<&str> {
    outcome.records.iter().map(|r| r.identifier.as_str()).collect()
}

// -------------------------------------------------------------------------
// Default (suffix) matching
// -------------------------------------------------------------------------

#[test]
fn default_config_end_to_end() {
    let outcome = load_and_run("");

    assert_eq!(outcome.summary.matched, 3);
    assert_eq!(outcome.summary.missing, 3);
    assert_eq!(outcome.summary.skipped_out_of_region, 2);
    assert_eq!(ids(&outcome), vec!["Q1", "Q2", "Q42", "Q30", "Q2", "Q7"]);
}

#[test]
fn matched_records_carry_source_ref() {
    let outcome = load_and_run("");

    for record in &outcome.records {
        match record.status {
            MatchStatus::Matched => assert!(record.source_ref.is_some()),
            MatchStatus::Missing => assert!(record.source_ref.is_none()),
        }
    }

    // Q1 appears on node/5 and way/88; the later element wins.
    assert_eq!(outcome.records[0].source_ref.as_deref(), Some("way/88"));
    // Multi-value brand tag.
    assert_eq!(outcome.records[2].source_ref.as_deref(), Some("way/77"));
    assert_eq!(outcome.records[5].source_ref.as_deref(), Some("way/77"));
}

#[test]
fn empty_label_falls_back_to_identifier() {
    let outcome = load_and_run("");
    let q7 = outcome.records.iter().find(|r| r.identifier == "Q7").unwrap();
    assert_eq!(q7.label, "Q7");
}

#[test]
fn dropped_rows_explain_themselves() {
    let outcome = load_and_run("");

    let reasons: Vec<(usize, &DropReason)> =
        outcome.dropped.iter().map(|d| (d.row, &d.reason)).collect();
    assert_eq!(reasons.len(), 4);
    assert_eq!(reasons[0], (4, &DropReason::OutOfRegion));
    assert_eq!(reasons[1], (6, &DropReason::EmptyIdentifier));
    assert_eq!(
        reasons[2],
        (
            7,
            &DropReason::UnparseableCoordinate {
                field: CoordinateField::Latitude,
                value: "not-a-number".into()
            }
        )
    );
    assert_eq!(reasons[3], (8, &DropReason::OutOfRegion));
}

#[test]
fn out_of_region_match_is_not_emitted() {
    let outcome = load_and_run("");
    // Q50 is mapped, but Innsbruck is outside the region.
    assert!(outcome.records.iter().all(|r| r.identifier != "Q50"));
}

// -------------------------------------------------------------------------
// Contains matching
// -------------------------------------------------------------------------

#[test]
fn contains_mode_matches_namespaced_keys() {
    let outcome = load_and_run("[matching]\ntag_match_mode = \"contains\"\n");

    assert_eq!(outcome.summary.matched, 4);
    assert_eq!(outcome.summary.missing, 2);
    let q30 = outcome.records.iter().find(|r| r.identifier == "Q30").unwrap();
    assert_eq!(q30.status, MatchStatus::Matched);
    assert_eq!(q30.source_ref.as_deref(), Some("relation/9"));
}

// -------------------------------------------------------------------------
// Engine options + degraded inputs
// -------------------------------------------------------------------------

#[test]
fn parallel_engine_gives_identical_outcome() {
    let sequential = load_and_run("");
    let parallel = load_and_run("[engine]\nparallel = true\nchunk_size = 2\n");
    assert_eq!(sequential, parallel);
}

#[test]
fn repeated_runs_are_identical() {
    assert_eq!(load_and_run(""), load_and_run(""));
}

#[test]
fn missing_map_source_reports_everything_missing() {
    let outcome = load_and_run("[sources]\nmap = \"does-not-exist.json\"\n");
    assert_eq!(outcome.summary.matched, 0);
    assert_eq!(outcome.summary.missing, 6);
    assert_eq!(outcome.summary.skipped_out_of_region, 2);
}

#[test]
fn custom_region_changes_scope() {
    // A box around Bolzano only.
    let toml = r#"
[region]
name = "bolzano"
vertices = [[46.45, 11.30], [46.45, 11.40], [46.55, 11.40], [46.55, 11.30]]
"#;
    let outcome = load_and_run(toml);
    assert_eq!(ids(&outcome), vec!["Q1"]);
    assert_eq!(outcome.summary.skipped_out_of_region, 7);
}

#[test]
fn filter_reports_configured_mode() {
    let config = ReconConfig::from_toml("[matching]\ntag_match_mode = \"contains\"\n").unwrap();
    assert_eq!(TagKeyFilter::from_config(&config.matching).mode(), TagMatchMode::Contains);
}
