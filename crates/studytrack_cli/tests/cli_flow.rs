use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};

fn studytrack(data_dir: &Path, backend: &str, args: &[&str], stdin: &str) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_studytrack"))
        .arg("--data-dir")
        .arg(data_dir)
        .args(["--backend", backend, "--log-level", "info"])
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    child
        .stdin
        .take()
        .unwrap()
        .write_all(stdin.as_bytes())
        .unwrap();
    child.wait_with_output().unwrap()
}

fn stdout(output: &Output) -> String {
    assert!(
        output.status.success(),
        "command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout.clone()).unwrap()
}

/// Extracts the id printed as `Added ... (<id>)`.
fn added_id(text: &str) -> String {
    let start = text.rfind('(').unwrap() + 1;
    let end = text.rfind(')').unwrap();
    text[start..end].to_string()
}

fn scenario(backend: &str) {
    let dir = tempfile::tempdir().unwrap();
    let data = dir.path();

    let course = added_id(&stdout(&studytrack(
        data,
        backend,
        &["course", "add", "Biology"],
        "",
    )));
    let unit = added_id(&stdout(&studytrack(
        data,
        backend,
        &["unit", "add", &course, "Cells"],
        "",
    )));
    let topic = added_id(&stdout(&studytrack(
        data,
        backend,
        &[
            "topic", "add", &course, &unit, "--name", "Mitosis", "--due", "2024-05-01", "--level",
            "2",
        ],
        "",
    )));

    let page = stdout(&studytrack(data, backend, &["course", "show", &course], ""));
    assert!(page.contains("Unit 1: Cells (1 topic)"));
    assert!(page.contains("Mitosis"));
    assert!(page.contains("Level 2/5"));

    stdout(&studytrack(
        data,
        backend,
        &["topic", "level", &course, &unit, &topic, "5"],
        "",
    ));
    let path = format!("/courses/{course}/units/{unit}/topics/{topic}");
    let page = stdout(&studytrack(data, backend, &["open", &path], ""));
    assert!(page.contains("(5/5)"));
    assert!(page.contains("Due: 2024-05-01"));

    let declined = stdout(&studytrack(
        data,
        backend,
        &["course", "delete", &course],
        "n\n",
    ));
    assert!(declined.contains("Cancelled."));

    stdout(&studytrack(data, backend, &["course", "delete", &course, "--yes"], ""));
    let page = stdout(&studytrack(data, backend, &["open", &path], ""));
    assert!(page.contains("showing / instead."));
    assert!(page.contains("No courses yet"));
}

#[test]
fn sqlite_backend_end_to_end() {
    scenario("sqlite");
}

#[test]
fn json_backend_end_to_end() {
    scenario("json");
}

#[test]
fn invalid_input_exits_non_zero() {
    let dir = tempfile::tempdir().unwrap();
    let output = studytrack(dir.path(), "json", &["course", "add", "   "], "");
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("name must not be blank"));
}
