//! Integration tests for the `text` subcommand.

mod common;

use common::{SINGLE_OWNER_PAGE, cmd, path_of, registry_pdf, write_temp_pdf};
use predicates::prelude::*;

#[test]
fn text_prints_linearized_rows() {
    let f = write_temp_pdf(&registry_pdf(&[SINGLE_OWNER_PAGE]));

    cmd()
        .args(["text", path_of(&f)])
        .assert()
        .success()
        .stdout(predicate::str::contains("２０２５／０６／１２　１７：４５"))
        .stdout(predicate::str::contains("┃東京都墨田区八広４丁目１２－３│田中太郎┃"));
}

#[test]
fn text_marks_page_breaks() {
    let f = write_temp_pdf(&registry_pdf(&[&["一頁目"], &["二頁目"]]));

    cmd()
        .args(["text", path_of(&f)])
        .assert()
        .success()
        .stdout(predicate::str::contains("--- ページ 2 ---"))
        .stdout(predicate::str::contains("--- ページ 1 ---").not());
}

#[test]
fn text_json_output() {
    let f = write_temp_pdf(&registry_pdf(&[SINGLE_OWNER_PAGE]));

    let output = cmd()
        .args(["text", path_of(&f), "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["pages"], 1);
    assert!(value["text"].as_str().unwrap().contains("田中太郎"));
    assert_eq!(value["warnings"].as_array().unwrap().len(), 0);
}

#[test]
fn text_unicode_norm_folds_digits() {
    let f = write_temp_pdf(&registry_pdf(&[SINGLE_OWNER_PAGE]));

    cmd()
        .args(["text", path_of(&f), "--unicode-norm", "nfkc"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2025/06/12 17:45"));
}

#[test]
fn text_missing_file_fails() {
    cmd()
        .args(["text", "/nonexistent/registry.pdf"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("file not found"));
}

#[test]
fn text_invalid_pdf_fails() {
    let f = write_temp_pdf(b"not a pdf at all");

    cmd()
        .args(["text", path_of(&f)])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("failed to open PDF"));
}
