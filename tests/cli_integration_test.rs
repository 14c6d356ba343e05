use std::fs;
use std::process::{Command, Output};
use tempfile::TempDir;

fn textnorm(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_textnorm"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

#[test]
fn test_no_target_exits_1_without_touching_files() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("a.txt");
    fs::write(&path, b"x\r\n").unwrap();

    let output = textnorm(&[path.to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    assert_eq!(fs::read(&path).unwrap(), b"x\r\n");
}

#[test]
fn test_no_paths_exits_1() {
    let output = textnorm(&["-u"]);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_unknown_flag_exits_1() {
    let output = textnorm(&["-u", "-z", "whatever"]);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_help_exits_0() {
    let output = textnorm(&["-h"]);
    assert_eq!(output.status.code(), Some(0));
    assert!(String::from_utf8_lossy(&output.stdout).contains("Usage"));
}

#[test]
fn test_per_file_errors_still_exit_0() {
    let dir = TempDir::new().unwrap();
    let text = dir.path().join("a.txt");
    let latin1 = dir.path().join("b.txt");
    fs::write(&text, b"one\r\ntwo\r\n").unwrap();
    fs::write(&latin1, b"caf\xE9\n").unwrap();

    let output = textnorm(&["-w", "-u", "-8", dir.path().to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].ends_with(
        "a.txt - converted encoding to UTF-8; converted line ending to LF"
    ));
    assert!(lines[1].ends_with("b.txt - corruption error"));
    assert_eq!(fs::read(&text).unwrap(), b"one\ntwo\n");
    assert_eq!(fs::read(&latin1).unwrap(), b"caf\xE9\n");
}

#[test]
fn test_config_file_and_json_report() {
    let dir = TempDir::new().unwrap();
    let data = dir.path().join("data");
    fs::create_dir_all(data.join("nested")).unwrap();
    fs::write(data.join("nested/a.txt"), b"x\ny\n").unwrap();

    let report = dir.path().join("report.json");
    let config = dir.path().join("textnorm.toml");
    fs::write(
        &config,
        format!(
            "[defaults]\nrecursive = true\nline_ending = \"crlf\"\n\n[report]\npath = {:?}\n",
            report.to_str().unwrap()
        ),
    )
    .unwrap();

    let output = textnorm(&[
        "--config",
        config.to_str().unwrap(),
        data.to_str().unwrap(),
    ]);

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(fs::read(data.join("nested/a.txt")).unwrap(), b"x\r\ny\r\n");

    let value: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&report).unwrap()).unwrap();
    assert_eq!(value["counts"]["converted"], 1);
    assert_eq!(value["target_line_ending"], "crlf");
    assert_eq!(value["files"].as_array().unwrap().len(), 1);
}

#[test]
fn test_invalid_config_file_exits_1() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("bad.toml");
    fs::write(&config, "[defaults]\nline_ending = \"sideways\"\n").unwrap();

    let output = textnorm(&["--config", config.to_str().unwrap(), "-u", "."]);
    assert_eq!(output.status.code(), Some(1));
}
