use std::process::Command;

#[test]
fn cli_smoke_help() {
    let exe = env!("CARGO_BIN_EXE_todolist");
    let output = Command::new(exe)
        .arg("--help")
        .output()
        .expect("failed to run todolist --help");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Usage"));
    assert!(stdout.contains("import"));
}

#[test]
fn cli_rejects_unknown_command() {
    let exe = env!("CARGO_BIN_EXE_todolist");
    let output = Command::new(exe)
        .arg("frobnicate")
        .output()
        .expect("failed to run todolist");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ERROR: invalid_input"));
}
