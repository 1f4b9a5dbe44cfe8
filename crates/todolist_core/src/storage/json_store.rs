use crate::error::AppError;
use crate::model::{Task, Theme};
use crate::storage::{PersistedState, StateStore};
use crate::transfer::tasks_from_value;
use serde::Serialize;
use serde_json::{Map, Value};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

const STORE_FILE_NAME: &str = "state.json";
const STORE_ENV_VAR: &str = "TODOLIST_STORE_PATH";
const TASKS_KEY: &str = "tasks";
const THEME_KEY: &str = "theme";

#[derive(Serialize)]
struct StoredState<'a> {
    tasks: &'a [Task],
    theme: Theme,
}

/// Resolves the state file: the env var wins, then the configured path,
/// then the per-user default location.
pub fn store_path(configured: Option<&Path>) -> Result<PathBuf, AppError> {
    if let Ok(path) = std::env::var(STORE_ENV_VAR)
        && !path.trim().is_empty()
    {
        return Ok(PathBuf::from(path));
    }

    if let Some(path) = configured {
        return Ok(path.to_path_buf());
    }

    if cfg!(windows) {
        let appdata =
            std::env::var("APPDATA").map_err(|_| AppError::invalid_data("APPDATA is not set"))?;
        Ok(PathBuf::from(appdata).join("todolist").join(STORE_FILE_NAME))
    } else {
        let home = std::env::var("HOME").map_err(|_| AppError::invalid_data("HOME is not set"))?;
        Ok(PathBuf::from(home)
            .join(".config")
            .join("todolist")
            .join(STORE_FILE_NAME))
    }
}

/// A JSON object file holding one entry per persisted key.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StateStore for JsonFileStore {
    #[tracing::instrument(skip(self), fields(path = %self.path.display()))]
    fn load(&self) -> Result<PersistedState, AppError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!("no stored state, starting empty");
                return Ok(PersistedState::default());
            }
            Err(err) => {
                return Err(AppError::io(format!("{}: {}", self.path.display(), err)));
            }
        };

        Ok(decode_state(&content))
    }

    #[tracing::instrument(
        skip(self, state),
        fields(path = %self.path.display(), tasks = state.tasks.len())
    )]
    fn save(&mut self, state: &PersistedState) -> Result<(), AppError> {
        let stored = StoredState {
            tasks: &state.tasks,
            theme: state.theme,
        };
        let content = serde_json::to_string_pretty(&stored)
            .map_err(|err| AppError::invalid_data(err.to_string()))?;
        write_atomic(&self.path, content.as_bytes())?;
        debug!("state saved");
        Ok(())
    }
}

fn decode_state(content: &str) -> PersistedState {
    let mut entries = match serde_json::from_str::<Value>(content) {
        Ok(Value::Object(entries)) => entries,
        Ok(_) => {
            warn!("stored state is not a JSON object, using defaults");
            return PersistedState::default();
        }
        Err(err) => {
            warn!(error = %err, "stored state is not valid JSON, using defaults");
            return PersistedState::default();
        }
    };

    PersistedState {
        tasks: decode_tasks_entry(&mut entries),
        theme: decode_theme_entry(&entries),
    }
}

fn decode_tasks_entry(entries: &mut Map<String, Value>) -> Vec<Task> {
    let Some(value) = entries.remove(TASKS_KEY) else {
        return Vec::new();
    };

    match tasks_from_value(value) {
        Ok(tasks) => tasks,
        Err(reason) => {
            warn!(%reason, "stored tasks are unreadable, starting with an empty list");
            Vec::new()
        }
    }
}

fn decode_theme_entry(entries: &Map<String, Value>) -> Theme {
    match entries.get(THEME_KEY) {
        None => Theme::default(),
        Some(Value::String(name)) => name.parse().unwrap_or_else(|err: AppError| {
            warn!(error = %err, "stored theme is unreadable, using light");
            Theme::default()
        }),
        Some(_) => {
            warn!("stored theme is not a string, using light");
            Theme::default()
        }
    }
}

fn write_atomic(path: &Path, content: &[u8]) -> Result<(), AppError> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent)
        .map_err(|err| AppError::io(format!("{}: {}", parent.display(), err)))?;

    let mut temp = NamedTempFile::new_in(parent)?;
    temp.write_all(content)?;
    temp.flush()?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let permissions = std::fs::Permissions::from_mode(0o600);
        std::fs::set_permissions(temp.path(), permissions)?;
    }

    temp.persist(path)
        .map_err(|err| AppError::io(format!("{}: {}", path.display(), err.error)))?;
    Ok(())
}
