//! Integration tests for the `split` and `split-fixed` subcommands.

mod common;

use common::*;
use predicates::prelude::*;

#[test]
fn split_at_anchor() {
    let tmp = write_temp_pdf(&pdf_with_pages(&[(600, 1000), (612, 792)]));
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("split.pdf");

    cmd()
        .args([
            "split",
            tmp.path().to_str().unwrap(),
            "-o",
            out.to_str().unwrap(),
            "--anchor",
            "60",
        ])
        .assert()
        .success();

    assert_eq!(page_count(&out), 3);
    assert_box_approx(
        box_entry(&out, 0, b"MediaBox").unwrap(),
        [0.0, 400.0, 600.0, 1000.0],
    );
    assert_box_approx(
        box_entry(&out, 1, b"MediaBox").unwrap(),
        [0.0, 0.0, 600.0, 400.0],
    );
    assert_box_approx(
        box_entry(&out, 2, b"MediaBox").unwrap(),
        [0.0, 0.0, 612.0, 792.0],
    );
}

#[test]
fn split_anchor_out_of_range() {
    let tmp = write_temp_pdf(&pdf_with_pages(&[(600, 1000)]));
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("split.pdf");

    cmd()
        .args([
            "split",
            tmp.path().to_str().unwrap(),
            "-o",
            out.to_str().unwrap(),
            "--anchor",
            "150",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("split failed"));
    assert!(!out.exists());
}

#[test]
fn split_fixed_meesho_preset() {
    let tmp = write_temp_pdf(&pdf_with_pages(&[(790, 1100), (595, 842)]));
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("meesho.pdf");

    cmd()
        .args([
            "split-fixed",
            tmp.path().to_str().unwrap(),
            "-o",
            out.to_str().unwrap(),
        ])
        .assert()
        .success();

    assert_eq!(page_count(&out), 3);
    assert_box_approx(
        box_entry(&out, 0, b"CropBox").unwrap(),
        [0.0, 616.125, 790.0, 1100.0],
    );
    assert_box_approx(
        box_entry(&out, 1, b"CropBox").unwrap(),
        [0.0, 260.625, 790.0, 616.125],
    );
}

#[test]
fn split_fixed_custom_heights() {
    let tmp = write_temp_pdf(&pdf_with_pages(&[(800, 1000)]));
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("custom.pdf");

    cmd()
        .args([
            "split-fixed",
            tmp.path().to_str().unwrap(),
            "-o",
            out.to_str().unwrap(),
            "--label-height",
            "300",
            "--invoice-height",
            "900",
        ])
        .assert()
        .success();

    // Invoice band is cut off at the bottom of the page.
    assert_box_approx(
        box_entry(&out, 0, b"MediaBox").unwrap(),
        [0.0, 700.0, 800.0, 1000.0],
    );
    assert_box_approx(
        box_entry(&out, 1, b"MediaBox").unwrap(),
        [0.0, 0.0, 800.0, 700.0],
    );
}

#[test]
fn split_fixed_label_taller_than_page() {
    let tmp = write_temp_pdf(&pdf_with_pages(&[(800, 400)]));
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("split.pdf");

    cmd()
        .args([
            "split-fixed",
            tmp.path().to_str().unwrap(),
            "-o",
            out.to_str().unwrap(),
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("fixed split failed"));
    assert!(!out.exists());
}
