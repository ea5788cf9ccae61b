//! Integration tests for the default detection command.

use assert_cmd::Command;
use predicates::prelude::*;

fn cmd() -> Command {
    let mut cmd = Command::cargo_bin("fieldscan").unwrap();
    cmd.env_remove("FIELDSCAN_LOG");
    cmd
}

/// A one-page US-letter PDF with the given content stream.
fn pdf_with_content(content: &[u8]) -> Vec<u8> {
    use lopdf::{Object, Stream, dictionary};

    let mut doc = lopdf::Document::with_version("1.5");
    let stream = Stream::new(dictionary! {}, content.to_vec());
    let content_id = doc.add_object(stream);

    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "MediaBox" => vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Integer(612),
            Object::Integer(792),
        ],
        "Contents" => Object::Reference(content_id),
    });
    let pages_id = doc.add_object(dictionary! {
        "Type" => "Pages",
        "Kids" => vec![Object::Reference(page_id)],
        "Count" => Object::Integer(1),
    });
    if let Ok(page_obj) = doc.get_object_mut(page_id) {
        if let Ok(dict) = page_obj.as_dict_mut() {
            dict.set("Parent", Object::Reference(pages_id));
        }
    }
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => Object::Reference(pages_id),
    });
    doc.trailer.set("Root", Object::Reference(catalog_id));

    let mut buf = Vec::new();
    doc.save_to(&mut buf).unwrap();
    buf
}

#[test]
fn nonexistent_file_prints_empty_array() {
    cmd()
        .arg("/nonexistent/path/form.pdf")
        .assert()
        .success()
        .stdout("[]\n")
        .stderr(predicate::str::contains("/nonexistent/path/form.pdf"));
}

#[test]
fn nonexistent_file_strict_fails() {
    cmd()
        .args(["/nonexistent/path/form.pdf", "--strict"])
        .assert()
        .failure()
        .code(1)
        .stdout("[]\n")
        .stderr(predicate::str::is_empty().not());
}

#[test]
fn missing_argument_prints_empty_array() {
    cmd()
        .assert()
        .success()
        .stdout("[]\n")
        .stderr(predicate::str::contains("no PDF path given"));
}

#[test]
fn garbage_file_prints_empty_array() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("junk.pdf");
    std::fs::write(&path, b"this is not a pdf at all").unwrap();
    cmd()
        .arg(&path)
        .assert()
        .stdout("[]\n")
        .stderr(predicate::str::is_empty().not());
}

#[test]
fn invalid_page_range_prints_empty_array() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("form.pdf");
    std::fs::write(&path, pdf_with_content(b"")).unwrap();
    cmd()
        .args([path.to_str().unwrap(), "--pages", "0"])
        .assert()
        .success()
        .stdout("[]\n")
        .stderr(predicate::str::contains("page 0"));
}

#[test]
fn invalid_zoom_prints_empty_array() {
    cmd()
        .args(["form.pdf", "--zoom", "0"])
        .assert()
        .success()
        .stdout("[]\n")
        .stderr(predicate::str::contains("zoom"));
}

#[test]
fn stdout_is_always_a_json_array() {
    // Whether or not pdfium is installed, stdout parses as an array.
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("box.pdf");
    std::fs::write(&path, pdf_with_content(b"2 w 100 500 300 80 re S")).unwrap();
    let output = cmd().arg(&path).output().unwrap();
    let stdout = String::from_utf8(output.stdout).unwrap();
    let value: serde_json::Value = serde_json::from_str(stdout.trim()).unwrap();
    let fields = value.as_array().unwrap();
    for field in fields {
        assert_eq!(field["type"], "text");
        assert_eq!(field["page"], 0);
        assert_eq!(field["required"], false);
        assert_eq!(field["fontSize"], 11);
        assert_eq!(field["align"], "left");
        assert!(field["name"].as_str().unwrap().starts_with("Field_"));
        assert!(field["id"].as_str().unwrap().starts_with("det_0_"));
    }
}

#[test]
fn logs_never_reach_stdout() {
    cmd()
        .args(["/nonexistent/path/form.pdf", "-vv"])
        .assert()
        .stdout("[]\n");
}

#[test]
fn huge_page_range_still_prints_empty_array() {
    cmd()
        .args(["/nonexistent/form.pdf", "--pages", "1-18446744073709551615"])
        .assert()
        .success()
        .stdout("[]\n")
        .stderr(predicate::str::contains("panicked").not());
}

#[test]
fn huge_page_range_on_real_file_is_rejected_cleanly() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("blank.pdf");
    std::fs::write(&path, pdf_with_content(b"")).unwrap();

    cmd()
        .arg(&path)
        .args(["--pages", "2-18446744073709551615", "--strict"])
        .assert()
        .failure()
        .code(1)
        .stdout("[]\n")
        .stderr(predicate::str::contains("panicked").not());
}
