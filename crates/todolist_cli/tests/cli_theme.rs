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

fn todolist(store_path: &PathBuf, args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_todolist"))
        .args(args)
        .env("TODOLIST_STORE_PATH", store_path)
        .env("TODOLIST_CONFIG_PATH", temp_path("no-config.json"))
        .output()
        .expect("failed to run todolist")
}

#[test]
fn theme_defaults_to_light() {
    let store_path = temp_path("cli-theme-default.json");
    let output = todolist(&store_path, &["theme", "--show"]);

    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), "Theme: light\n");
}

#[test]
fn theme_toggle_persists_across_runs() {
    let store_path = temp_path("cli-theme.json");

    let toggled = todolist(&store_path, &["theme"]);
    let shown = todolist(&store_path, &["--json", "theme", "--show"]);
    let stored: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&store_path).unwrap()).unwrap();
    let back = todolist(&store_path, &["theme"]);
    std::fs::remove_file(&store_path).ok();

    assert_eq!(String::from_utf8_lossy(&toggled.stdout), "Theme: dark\n");
    assert_eq!(String::from_utf8_lossy(&shown.stdout).trim(), r#"{"theme":"dark"}"#);
    assert_eq!(stored["theme"], "dark");
    assert_eq!(String::from_utf8_lossy(&back.stdout), "Theme: light\n");
}

#[test]
fn theme_toggle_keeps_tasks() {
    let store_path = temp_path("cli-theme-tasks.json");
    let content = serde_json::json!({
        "tasks": [{ "id": 4, "text": "keep me", "completed": true }],
        "theme": "dark"
    });
    std::fs::write(&store_path, content.to_string()).unwrap();

    let output = todolist(&store_path, &["theme"]);
    let stored: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&store_path).unwrap()).unwrap();
    std::fs::remove_file(&store_path).ok();

    assert!(output.status.success());
    assert_eq!(stored["theme"], "light");
    assert_eq!(stored["tasks"][0]["text"], "keep me");
}
