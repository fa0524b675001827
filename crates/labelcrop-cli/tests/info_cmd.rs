//! Integration tests for the `info` subcommand.

mod common;

use common::*;
use predicates::prelude::*;

#[test]
fn info_text_lists_pages_and_viewports() {
    let tmp = write_temp_pdf(&pdf_with_pages(&[(595, 842), (612, 792)]));
    cmd()
        .args(["info", tmp.path().to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Page 1:"))
        .stdout(predicate::str::contains("Size: 595.00 x 842.00 pt"))
        .stdout(predicate::str::contains("Viewport: 918 x 1188 px"))
        .stdout(predicate::str::contains("Pages: 2"));
}

#[test]
fn info_json_is_valid() {
    let tmp = write_temp_pdf(&pdf_with_pages(&[(400, 600)]));
    let output = cmd()
        .args([
            "info",
            tmp.path().to_str().unwrap(),
            "--format",
            "json",
            "--scale",
            "2",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["page_count"], 1);
    assert_eq!(json["pages"][0]["width"], 400.0);
    assert_eq!(json["pages"][0]["viewport"][0], 800.0);
    assert_eq!(json["pages"][0]["viewport"][1], 1200.0);
}

#[test]
fn info_missing_file() {
    cmd()
        .args(["info", "/nonexistent/label.pdf"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("file not found"));
}

#[test]
fn info_non_pdf_file() {
    let mut tmp = tempfile::NamedTempFile::new().unwrap();
    std::io::Write::write_all(&mut tmp, b"just some text").unwrap();
    cmd()
        .args(["info", tmp.path().to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a PDF"));
}

#[test]
fn info_rejects_zero_scale() {
    let tmp = write_temp_pdf(&pdf_with_pages(&[(400, 600)]));
    cmd()
        .args(["info", tmp.path().to_str().unwrap(), "--scale", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--scale"));
}
