//! The `tasks.json` document exchanged by export and import: a bare JSON
//! array of `{id, text, completed}` objects.

use crate::error::AppError;
use crate::model::Task;
use serde_json::Value;
use std::collections::HashSet;

pub const EXPORT_FILE_NAME: &str = "tasks.json";

pub fn encode_tasks(tasks: &[Task]) -> Result<String, AppError> {
    serde_json::to_string(tasks).map_err(|err| AppError::invalid_data(err.to_string()))
}

pub fn decode_tasks(content: &str) -> Result<Vec<Task>, AppError> {
    let value: Value = serde_json::from_str(content)
        .map_err(|err| AppError::malformed_import(format!("invalid JSON: {err}")))?;
    tasks_from_value(value).map_err(AppError::malformed_import)
}

/// Checks every element against the task shape and rejects duplicate ids.
pub(crate) fn tasks_from_value(value: Value) -> Result<Vec<Task>, String> {
    let items = match value {
        Value::Array(items) => items,
        other => return Err(format!("expected an array of tasks, found {}", kind(&other))),
    };

    let mut seen = HashSet::with_capacity(items.len());
    let mut tasks = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        let task: Task =
            serde_json::from_value(item).map_err(|err| format!("task {index}: {err}"))?;
        if !seen.insert(task.id) {
            return Err(format!("task {index}: duplicate id {}", task.id));
        }
        tasks.push(task);
    }

    Ok(tasks)
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
