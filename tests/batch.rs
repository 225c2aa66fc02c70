use drillkit::{run_batch, Config};
use std::fs;
use tempfile::TempDir;

const GOOD_JOB: &str = r#"{
    "name": "plate",
    "holes": [
        {"id": "H1", "x": 0.0, "y": 0.0, "diameter": 4.0},
        {"id": "H2", "x": 10.0, "y": 10.0, "diameter": 4.0},
        {"id": "H3", "x": 10.0, "y": 0.0, "diameter": 4.0},
        {"id": "H4", "x": 0.0, "y": 10.0, "diameter": 8.0, "face": "back"}
    ]
}"#;

#[test]
fn test_batch_skips_failed_file_and_continues() {
    let dir = TempDir::new().unwrap();
    let broken = dir.path().join("broken.json");
    let good = dir.path().join("plate.json");
    fs::write(&broken, "{ \"name\": ").unwrap();
    fs::write(&good, GOOD_JOB).unwrap();

    let mut config = Config::default();
    config.output.directory = dir.path().join("out");
    config.output.write_gcode = true;

    let summary = run_batch(&[broken.clone(), good.clone()], &config).unwrap();

    assert!(!summary.all_succeeded());
    assert_eq!(summary.failed.len(), 1);
    assert_eq!(summary.failed[0].0, broken);
    assert!(summary.failed[0].1.contains("broken.json"));

    assert_eq!(summary.succeeded.len(), 1);
    let outcome = &summary.succeeded[0];
    assert_eq!(outcome.job_name, "plate");
    assert_eq!(outcome.holes, 4);
    assert!(outcome.final_length <= outcome.initial_length);
    assert_eq!(outcome.written.len(), 2);

    let plan = fs::read_to_string(dir.path().join("out").join("plate.plan.json")).unwrap();
    let plan: serde_json::Value = serde_json::from_str(&plan).unwrap();
    assert_eq!(plan["job_name"], "plate");
    assert_eq!(plan["faces"][0]["face"], "front");
    assert_eq!(plan["faces"][0]["holes"][0]["id"], "H1");
    assert_eq!(plan["faces"][1]["face"], "back");

    let gcode = fs::read_to_string(dir.path().join("out").join("plate.nc")).unwrap();
    assert!(gcode.contains("; Job: plate"));
    assert!(gcode.contains("M0 ; Reposition part for back face"));
}

#[test]
fn test_batch_without_outputs_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let good = dir.path().join("plate.json");
    fs::write(&good, GOOD_JOB).unwrap();

    let mut config = Config::default();
    config.output.directory = dir.path().join("out");
    config.output.write_plan = false;

    let summary = run_batch(&[good], &config).unwrap();
    assert!(summary.all_succeeded());
    assert!(summary.succeeded[0].written.is_empty());
    assert!(!dir.path().join("out").exists());
}

#[test]
fn test_batch_rejects_invalid_config_before_writing() {
    let dir = TempDir::new().unwrap();
    let good = dir.path().join("plate.json");
    fs::write(&good, GOOD_JOB).unwrap();

    let mut config = Config::default();
    config.output.directory = dir.path().join("out");
    config.output.write_gcode = true;
    config.drilling.plunge_rate = 0.0;

    let err = run_batch(&[good], &config).unwrap_err();
    assert!(format!("{err:#}").contains("plunge_rate"));
    assert!(!dir.path().join("out").exists());
}

#[test]
fn test_batch_reports_missing_field_once() {
    let dir = TempDir::new().unwrap();
    let bad = dir.path().join("bad.json");
    fs::write(&bad, r#"{"name": "bad", "holes": [{"id": "H1", "x": 0.0}]}"#).unwrap();

    let summary = run_batch(&[bad], &Config::default()).unwrap();
    let reason = &summary.failed[0].1;
    assert_eq!(reason.matches("missing field").count(), 1, "{reason}");
}
