//! Argument parsing, subcommands and input-error exit codes.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;

fn cmd(dir: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("pdfproc").unwrap();
    cmd.current_dir(dir)
        .env_remove("PDFPROC_CONFIG")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn help_lists_options() {
    let dir = tempfile::tempdir().unwrap();
    cmd(dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--no-ocr"))
        .stdout(predicate::str::contains("--image-mode"))
        .stdout(predicate::str::contains("--output-dir"))
        .stdout(predicate::str::contains("--password"));
}

#[test]
fn version_subcommand() {
    let dir = tempfile::tempdir().unwrap();
    cmd(dir.path())
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn config_prints_defaults() {
    let dir = tempfile::tempdir().unwrap();
    cmd(dir.path())
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("[processing]"))
        .stdout(predicate::str::contains("enable_ocr = true"))
        .stdout(predicate::str::contains("[output]"));
}

#[test]
fn config_file_from_env() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("custom.toml");
    fs::write(&config, "[processing]\nnum_threads = 7\n").unwrap();

    cmd(dir.path())
        .env("PDFPROC_CONFIG", &config)
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("num_threads = 7"));
}

#[test]
fn default_config_file_in_working_directory() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("pdfproc.toml"), "[output]\njson_indent = 4\n").unwrap();

    cmd(dir.path())
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("json_indent = 4"));
}

#[test]
fn invalid_config_file_is_input_error() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("bad.toml");
    fs::write(&config, "[processing]\nwarp_speed = true\n").unwrap();

    cmd(dir.path())
        .args(["config", "--config"])
        .arg(&config)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Configuration error"));
}

#[test]
fn missing_config_file_is_input_error() {
    let dir = tempfile::tempdir().unwrap();
    cmd(dir.path())
        .args(["--config", "nope.toml", "input.pdf"])
        .assert()
        .code(2);
}

#[test]
fn no_input_is_input_error() {
    let dir = tempfile::tempdir().unwrap();
    cmd(dir.path())
        .assert()
        .code(2)
        .stdout(predicate::str::contains("Usage"));
}

#[test]
fn missing_file_exits_2_and_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    cmd(dir.path())
        .args(["missing.pdf", "-o", "out"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("File not found"));

    assert!(!dir.path().join("out").exists());
    assert!(!dir.path().join("processing.log").exists());
}

#[test]
fn ocr_lang_rejected_when_config_disables_ocr() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("pdfproc.toml"), "[processing]\nenable_ocr = false\n").unwrap();

    cmd(dir.path())
        .args(["input.pdf", "--ocr-lang", "de"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("OCR languages given while OCR is disabled"));

    assert!(!dir.path().join("processing.log").exists());
}

#[test]
fn unknown_format_rejected() {
    let dir = tempfile::tempdir().unwrap();
    cmd(dir.path())
        .args(["input.pdf", "-f", "docx"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("invalid value"));
}

#[test]
fn ocr_lang_with_no_ocr_rejected() {
    let dir = tempfile::tempdir().unwrap();
    cmd(dir.path())
        .args(["input.pdf", "--no-ocr", "--ocr-lang", "de", "--no-log-file"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("OCR languages"));
}

#[test]
fn image_mode_needs_picture_images() {
    let dir = tempfile::tempdir().unwrap();
    cmd(dir.path())
        .args(["input.pdf", "--simple", "--image-mode", "embedded", "--no-log-file"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("image_mode"));
}

#[test]
fn zero_threads_rejected() {
    let dir = tempfile::tempdir().unwrap();
    cmd(dir.path())
        .args(["input.pdf", "--threads", "0", "--no-log-file"])
        .assert()
        .code(2);
}
