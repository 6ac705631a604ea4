use assert_cmd::Command;

const TEMPLATE_FCSV: &str = "tests/fixtures/tpl-MNI152NLin2009cAsym_afids.fcsv";
const TEMPLATE_JSON: &str = "tests/fixtures/tpl-MNI152NLin2009cAsym_afids.json";

#[test]
fn runs() {
    let mut cmd = Command::cargo_bin("afids").unwrap();
    cmd.assert()
        .success()
        .stdout(predicates::str::contains("afids --help"));
}

#[test]
fn outputs_tool_name() {
    let mut cmd = Command::cargo_bin("afids").unwrap();
    cmd.arg("-V");
    cmd.assert().success().stdout("afids 0.1.0\n");
}

// Validate subcommand tests

#[test]
fn validate_valid_fcsv_succeeds() {
    let mut cmd = Command::cargo_bin("afids").unwrap();
    cmd.args(["validate", TEMPLATE_FCSV]);
    cmd.assert()
        .success()
        .stdout(predicates::str::contains("Validation passed"))
        .stdout(predicates::str::contains("coordinate system: LPS"))
        .stdout(predicates::str::contains("fiducials: 32"));
}

#[test]
fn validate_valid_json_succeeds() {
    let mut cmd = Command::cargo_bin("afids").unwrap();
    cmd.args(["validate", TEMPLATE_JSON]);
    cmd.assert()
        .success()
        .stdout(predicates::str::contains("coordinate system: RAS"));
}

#[test]
fn validate_extra_fiducial_fails() {
    let mut cmd = Command::cargo_bin("afids").unwrap();
    cmd.args(["validate", "tests/fixtures/duplicate_label.fcsv"]);
    cmd.assert()
        .failure()
        .stderr(predicates::str::contains("expected 32, found 33"));
}

#[test]
fn validate_missing_file_fails() {
    let mut cmd = Command::cargo_bin("afids").unwrap();
    cmd.args(["validate", "tests/fixtures/nope.fcsv"]);
    cmd.assert()
        .failure()
        .stderr(predicates::str::contains("does not exist"));
}

#[test]
fn validate_json_output_format() {
    let mut cmd = Command::cargo_bin("afids").unwrap();
    cmd.args(["validate", TEMPLATE_FCSV, "--output", "json"]);
    cmd.assert()
        .success()
        .stdout(predicates::str::contains("\"fiducial_count\": 32"))
        .stdout(predicates::str::contains("\"coord_system\": \"LPS\""))
        .stdout(predicates::str::contains("\"format_version\": \"4.13\""));
}

// Convert subcommand tests

#[test]
fn convert_fcsv_to_json() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("afids.json");

    let mut cmd = Command::cargo_bin("afids").unwrap();
    cmd.args(["convert", TEMPLATE_FCSV, out.to_str().unwrap()]);
    cmd.assert()
        .success()
        .stdout(predicates::str::contains("Converted"));

    let text = std::fs::read_to_string(&out).unwrap();
    assert!(text.contains("\"coordinateSystem\": \"LPS\""));
}

#[test]
fn convert_changes_coordinate_system() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("afids_ras.fcsv");

    let mut cmd = Command::cargo_bin("afids").unwrap();
    cmd.args([
        "convert",
        TEMPLATE_FCSV,
        out.to_str().unwrap(),
        "--coord-system",
        "RAS",
    ]);
    cmd.assert().success().stdout(predicates::str::contains("(RAS)"));

    let text = std::fs::read_to_string(&out).unwrap();
    assert_eq!(text.lines().nth(1), Some("# CoordinateSystem = 1"));
    assert!(text.contains("vtkMRMLMarkupsFiducialNode_1,0.07,2.24,-4.25,"));
}

#[test]
fn convert_rejects_unknown_coordinate_system() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("afids.fcsv");

    let mut cmd = Command::cargo_bin("afids").unwrap();
    cmd.args([
        "convert",
        TEMPLATE_FCSV,
        out.to_str().unwrap(),
        "--coord-system",
        "XYZ",
    ]);
    cmd.assert()
        .failure()
        .stderr(predicates::str::contains("Invalid coordinate system 'XYZ'"));
    assert!(!out.exists());
}

#[test]
fn convert_rejects_unsupported_extension() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("afids.csv");

    let mut cmd = Command::cargo_bin("afids").unwrap();
    cmd.args(["convert", TEMPLATE_FCSV, out.to_str().unwrap()]);
    cmd.assert()
        .failure()
        .stderr(predicates::str::contains("Invalid file extension 'csv'"));
}

// Distance subcommand tests

#[test]
fn distance_of_template_to_itself_is_zero() {
    let mut cmd = Command::cargo_bin("afids").unwrap();
    cmd.args(["distance", TEMPLATE_FCSV, TEMPLATE_FCSV]);
    cmd.assert()
        .success()
        .stdout(predicates::str::contains("Mean distance: 0.000 mm"));
}

#[test]
fn distance_rejects_mismatched_coordinate_systems() {
    let mut cmd = Command::cargo_bin("afids").unwrap();
    cmd.args(["distance", TEMPLATE_FCSV, TEMPLATE_JSON]);
    cmd.assert()
        .failure()
        .stderr(predicates::str::contains("Mismatched coordinate systems"));
}

#[test]
fn distance_json_output_format() {
    let mut cmd = Command::cargo_bin("afids").unwrap();
    cmd.args(["distance", TEMPLATE_JSON, TEMPLATE_JSON, "--output", "json"]);
    cmd.assert()
        .success()
        .stdout(predicates::str::contains("\"mean_distance\": 0.0"))
        .stdout(predicates::str::contains("\"euclidean\": 0.0"));
}
