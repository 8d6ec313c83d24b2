use assert_cmd::Command;
use predicates::str::contains;

fn cmd() -> Command {
    Command::cargo_bin("fvtt-autopublish").unwrap()
}

#[test]
fn help_lists_the_flags() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("--username"))
        .stdout(contains("--password-source"))
        .stdout(contains("--module-id"))
        .stdout(contains("--manifest-file"))
        .stdout(contains("compatible-core-version"));
}

#[test]
fn username_and_module_id_are_required() {
    cmd()
        .args(["--module-id", "1"])
        .assert()
        .failure()
        .stderr(contains("--username"));
    cmd()
        .args(["--username", "u"])
        .assert()
        .failure()
        .stderr(contains("--module-id"));
}

#[test]
fn unknown_password_source_is_rejected() {
    cmd()
        .args(["--username", "u", "--module-id", "1", "--password-source", "carrier-pigeon"])
        .assert()
        .failure()
        .stderr(contains("environment"))
        .stderr(contains("raw-input"));
}

#[test]
fn environment_password_source_requires_the_variable() {
    cmd()
        .args(["--username", "u", "--module-id", "1", "--password-source", "environment"])
        .env_remove("FVTT_PASSWORD")
        .assert()
        .failure()
        .stderr(contains("FVTT_PASSWORD"));
}

#[test]
fn malformed_manifest_json_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let manifest = dir.path().join("module.json");
    std::fs::write(&manifest, "{oops").unwrap();

    cmd()
        .args(["--username", "u", "--module-id", "1", "--password-source", "environment"])
        .arg("--manifest-file")
        .arg(&manifest)
        .env_remove("FVTT_PASSWORD")
        .assert()
        .failure()
        .stderr(contains("not valid JSON"));
}

#[test]
fn manifest_traversal_into_a_string_is_reported_with_the_partial_path() {
    let dir = tempfile::tempdir().unwrap();
    let manifest = dir.path().join("module.json");
    std::fs::write(&manifest, r#"{"compatibility": "10"}"#).unwrap();

    cmd()
        .args(["--username", "u", "--module-id", "1", "--password-source", "environment"])
        .arg("--manifest-file")
        .arg(&manifest)
        .env_remove("FVTT_PASSWORD")
        .assert()
        .failure()
        .stderr(contains("unexpected string at \"compatibility\""))
        .stderr(contains("compatibility.minimum"));
}
