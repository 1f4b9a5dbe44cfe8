use std::path::PathBuf;
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

fn temp_path(file_name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("todolist-{nanos}-{file_name}"))
}

fn write_store(path: &PathBuf, tasks: serde_json::Value) {
    let content = serde_json::json!({
        "tasks": tasks,
        "theme": "light"
    });
    std::fs::write(path, serde_json::to_string_pretty(&content).unwrap()).unwrap();
}

fn read_store(path: &PathBuf) -> serde_json::Value {
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

fn todolist(store_path: &PathBuf, args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_todolist"))
        .args(args)
        .env("TODOLIST_STORE_PATH", store_path)
        .env("TODOLIST_CONFIG_PATH", temp_path("no-config.json"))
        .output()
        .expect("failed to run todolist")
}

#[test]
fn edit_command_updates_text() {
    let store_path = temp_path("cli-edit.json");
    write_store(
        &store_path,
        serde_json::json!([{ "id": 1, "text": "old", "completed": false }]),
    );

    let output = todolist(&store_path, &["edit", "1", "new text"]);
    let stored = read_store(&store_path);
    std::fs::remove_file(&store_path).ok();

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("Updated task: new text (1)"));
    assert_eq!(stored["tasks"][0]["text"], "new text");
}

#[test]
fn edit_command_keeps_text_verbatim() {
    let store_path = temp_path("cli-edit-verbatim.json");
    write_store(
        &store_path,
        serde_json::json!([{ "id": 1, "text": "old", "completed": false }]),
    );

    let output = todolist(&store_path, &["edit", "1", "  padded  "]);
    let stored = read_store(&store_path);
    std::fs::remove_file(&store_path).ok();

    assert!(output.status.success());
    assert_eq!(stored["tasks"][0]["text"], "  padded  ");
}

#[test]
fn toggle_command_flips_completion() {
    let store_path = temp_path("cli-toggle.json");
    write_store(
        &store_path,
        serde_json::json!([{ "id": 1, "text": "buy milk", "completed": false }]),
    );

    let first = todolist(&store_path, &["toggle", "1"]);
    let after_first = read_store(&store_path);
    let second = todolist(&store_path, &["toggle", "1"]);
    let after_second = read_store(&store_path);
    std::fs::remove_file(&store_path).ok();

    assert!(String::from_utf8_lossy(&first.stdout).contains("Completed task: buy milk"));
    assert_eq!(after_first["tasks"][0]["completed"], true);
    assert!(String::from_utf8_lossy(&second.stdout).contains("Reopened task: buy milk"));
    assert_eq!(after_second["tasks"][0]["completed"], false);
}

#[test]
fn delete_command_removes_task() {
    let store_path = temp_path("cli-delete.json");
    write_store(
        &store_path,
        serde_json::json!([
            { "id": 1, "text": "old", "completed": false },
            { "id": 2, "text": "keep", "completed": true }
        ]),
    );

    let output = todolist(&store_path, &["delete", "1"]);
    let stored = read_store(&store_path);
    std::fs::remove_file(&store_path).ok();

    assert!(output.status.success());
    let tasks = stored["tasks"].as_array().unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0]["id"], 2);
}

#[test]
fn unknown_ids_are_silent_no_ops() {
    let store_path = temp_path("cli-missing.json");
    write_store(
        &store_path,
        serde_json::json!([{ "id": 1, "text": "old", "completed": false }]),
    );

    for args in [
        vec!["toggle", "99"],
        vec!["delete", "99"],
        vec!["edit", "99", "nope"],
    ] {
        let output = todolist(&store_path, &args);
        assert!(output.status.success());
        assert!(output.stdout.is_empty());
    }

    let stored = read_store(&store_path);
    std::fs::remove_file(&store_path).ok();
    assert_eq!(
        stored["tasks"],
        serde_json::json!([{ "id": 1, "text": "old", "completed": false }])
    );
}

#[test]
fn non_numeric_id_is_invalid_input() {
    let store_path = temp_path("cli-bad-id.json");
    let output = todolist(&store_path, &["delete", "task-1"]);
    std::fs::remove_file(&store_path).ok();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ERROR: invalid_input"));
}
