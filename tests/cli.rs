use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn aglae_convert() -> Command {
    let mut cmd = Command::cargo_bin("aglae-convert").unwrap();
    cmd.env_remove("RUST_LOG");
    cmd
}

fn bundled_config() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("config.toml")
}

fn convert_cmd(data: &TempDir, output: &TempDir) -> Command {
    let mut cmd = aglae_convert();
    cmd.arg("-d")
        .arg(data.path())
        .arg("-o")
        .arg(output.path())
        .arg("-c")
        .arg(bundled_config());
    cmd
}

#[test]
fn test_help_lists_options() {
    aglae_convert()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--extraction-types"))
        .stdout(predicate::str::contains("--data-path"))
        .stdout(predicate::str::contains("--output-path"))
        .stdout(predicate::str::contains("--config"))
        .stdout(predicate::str::contains("--log"));
}

#[test]
fn test_missing_data_path_fails() {
    let output = TempDir::new().unwrap();

    aglae_convert()
        .args(["-d", "/definitely/not/here", "-o"])
        .arg(output.path())
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("data path"));
}

#[test]
fn test_missing_output_path_fails() {
    let data = TempDir::new().unwrap();

    aglae_convert()
        .arg("-d")
        .arg(data.path())
        .args(["-o", "/definitely/not/here"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("output path"));
}

#[test]
fn test_missing_default_config_asks_for_one() {
    let data = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();

    aglae_convert()
        .arg("-d")
        .arg(data.path())
        .arg("-o")
        .arg(output.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Provide a config file"));
}

#[test]
fn test_missing_explicit_config_is_named() {
    let data = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    let missing = data.path().join("custom.toml");

    aglae_convert()
        .arg("-d")
        .arg(data.path())
        .arg("-o")
        .arg(output.path())
        .arg("-c")
        .arg(&missing)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Config file not found"))
        .stderr(predicate::str::contains("custom.toml"));
}

#[test]
fn test_config_is_not_read_from_environment() {
    let data = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();

    aglae_convert()
        .env("AGLAE_CONVERTER_CONFIG", bundled_config())
        .arg("-d")
        .arg(data.path())
        .arg("-o")
        .arg(output.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Provide a config file"));
}

#[test]
fn test_lst_conversion_reports_count() {
    let data = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    fs::write(data.path().join("scan.lst"), "header").unwrap();
    fs::write(data.path().join("scan.x0"), "spectrum").unwrap();

    convert_cmd(&data, &output)
        .args(["-e", "lst"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Reading from :"))
        .stdout(predicate::str::contains("Saving files to :"))
        .stdout(predicate::str::contains("Files processed:  1"));

    assert!(output.path().join("scan.lst.json").exists());
    assert!(!output.path().join("scan.globals.json").exists());
}

#[test]
fn test_rerun_into_same_output() {
    let data = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    fs::write(data.path().join("a.x0"), "spectrum").unwrap();

    convert_cmd(&data, &output)
        .args(["-e", "globals"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Files processed:  1"));

    fs::write(data.path().join("b.x0"), "spectrum").unwrap();

    convert_cmd(&data, &output)
        .args(["-e", "globals"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Files processed:  2"));

    assert!(output.path().join("a.globals.json").exists());
    assert!(output.path().join("b.globals.json").exists());
}

#[test]
fn test_colliding_run_names_fail() {
    let data = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    fs::write(data.path().join("run a.x0"), "spectrum").unwrap();
    fs::write(data.path().join("run_a.x0"), "spectrum").unwrap();

    convert_cmd(&data, &output)
        .args(["-e", "globals"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("'run a'"))
        .stderr(predicate::str::contains("'run_a'"));

    assert_eq!(fs::read_dir(output.path()).unwrap().count(), 0);
}

#[test]
fn test_unknown_log_level_keeps_warnings() {
    let data = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();

    convert_cmd(&data, &output)
        .args(["-e", "standards", "--log", "chatty"])
        .assert()
        .success()
        .stderr(predicate::str::contains("No standards files found"));
}

#[test]
fn test_unknown_extraction_type_is_rejected() {
    aglae_convert()
        .args(["-e", "spectra", "-d", ".", "-o", "."])
        .assert()
        .failure()
        .stderr(predicate::str::contains("spectra"));
}

#[test]
fn test_undocumented_flags_are_rejected() {
    let data = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();

    convert_cmd(&data, &output)
        .arg("--dry-run")
        .assert()
        .failure()
        .code(2);
}
