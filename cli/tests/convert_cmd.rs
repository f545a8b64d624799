//! End-to-end runs of the default command on generated PDFs.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};

fn cmd(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("pdfproc").unwrap();
    cmd.current_dir(dir)
        .env_remove("PDFPROC_CONFIG")
        .env_remove("RUST_LOG");
    cmd
}

/// Create a PDF with one line of text per page using lopdf.
fn pdf_with_pages(texts: &[&str]) -> Vec<u8> {
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Object, Stream};

    let mut doc = lopdf::Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });

    let mut kids = Vec::new();
    for text in texts {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 12.into()]),
                Operation::new("Td", vec![72.into(), 720.into()]),
                Operation::new("Tj", vec![Object::string_literal(*text)]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            "Contents" => content_id,
            "Resources" => dictionary! {
                "Font" => dictionary! { "F1" => font_id },
            },
        });
        kids.push(Object::Reference(page_id));
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buf = Vec::new();
    doc.save_to(&mut buf).unwrap();
    buf
}

fn sample(dir: &Path) -> PathBuf {
    let path = dir.join("sample.pdf");
    fs::write(
        &path,
        pdf_with_pages(&["Hello from page one.", "Figure 2 on page two."]),
    )
    .unwrap();
    path
}

#[test]
fn writes_all_formats() {
    let dir = tempfile::tempdir().unwrap();
    sample(dir.path());

    cmd(dir.path())
        .args(["sample.pdf", "--no-log-file"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Processing complete"))
        .stdout(predicate::str::contains("sample_report.txt"));

    let out = dir.path().join("output");
    for name in [
        "sample.json",
        "sample.md",
        "sample.html",
        "sample.txt",
        "sample_report.txt",
    ] {
        let len = fs::metadata(out.join(name)).unwrap().len();
        assert!(len > 0, "{} is empty", name);
    }
    assert!(!dir.path().join("processing.log").exists());
}

#[test]
fn log_file_written_by_default() {
    let dir = tempfile::tempdir().unwrap();
    sample(dir.path());

    cmd(dir.path()).arg("sample.pdf").assert().success();

    let log = fs::read_to_string(dir.path().join("processing.log")).unwrap();
    assert!(log.contains(" - INFO - Processing: sample.pdf"));
}

#[test]
fn selected_formats_and_output_dir() {
    let dir = tempfile::tempdir().unwrap();
    sample(dir.path());

    cmd(dir.path())
        .args(["sample.pdf", "-o", "results", "-f", "json", "-f", "text"])
        .args(["--json-indent", "0", "--no-log-file", "-q"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let out = dir.path().join("results");
    let json = fs::read_to_string(out.join("sample.json")).unwrap();
    assert!(!json.contains('\n'));
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["metadata"]["num_pages"], 2);
    assert_eq!(value["statistics"]["num_figures"], 1);

    assert!(out.join("sample.txt").exists());
    assert!(!out.join("sample.md").exists());
    assert!(!out.join("sample.html").exists());
}

#[test]
fn no_ocr_recorded_in_json() {
    let dir = tempfile::tempdir().unwrap();
    sample(dir.path());

    cmd(dir.path())
        .args(["sample.pdf", "--no-ocr", "--no-tables", "-f", "json", "--no-log-file"])
        .assert()
        .success();

    let json = fs::read_to_string(dir.path().join("output/sample.json")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["metadata"]["configuration"]["ocr_enabled"], false);
    assert_eq!(value["metadata"]["configuration"]["table_extraction"], false);
}

#[test]
fn repeated_runs_give_identical_json() {
    let dir = tempfile::tempdir().unwrap();
    sample(dir.path());

    for out in ["a", "b"] {
        cmd(dir.path())
            .args(["sample.pdf", "-f", "json", "--no-log-file", "-q", "-o", out])
            .assert()
            .success();
    }

    let a = fs::read(dir.path().join("a/sample.json")).unwrap();
    let b = fs::read(dir.path().join("b/sample.json")).unwrap();
    assert_eq!(a, b);
}

#[test]
fn not_a_pdf_exits_2() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("fake.pdf"), b"just text").unwrap();

    cmd(dir.path())
        .arg("fake.pdf")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Not a valid PDF"));

    assert!(!dir.path().join("output").exists());
    assert!(!dir.path().join("processing.log").exists());
}

#[test]
fn broken_pdf_exits_1() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("broken.pdf"), b"%PDF-1.4\ngarbage without objects\n").unwrap();

    cmd(dir.path())
        .args(["broken.pdf", "-q"])
        .assert()
        .code(1);

    assert!(!dir.path().join("output").exists());
    let log = fs::read_to_string(dir.path().join("processing.log")).unwrap();
    assert!(log.contains(" - ERROR - Failed to process broken.pdf"));
}
