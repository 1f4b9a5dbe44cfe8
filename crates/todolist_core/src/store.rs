use crate::error::AppError;
use crate::ids::IdGenerator;
use crate::model::{EditCursor, Filter, Task, TaskId, Theme};
use crate::storage::{PersistedState, StateStore};
use crate::transfer::{self, EXPORT_FILE_NAME};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TaskCounts {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
}

/// Owns the task list and theme plus the transient view state (filter,
/// edit cursor, draft input).
///
/// Every mutation of the list or theme is written through the backing
/// [`StateStore`] before it becomes visible; a failed save leaves the
/// in-memory state as it was.
#[derive(Debug)]
pub struct TaskStore<S: StateStore> {
    backend: S,
    tasks: Vec<Task>,
    theme: Theme,
    filter: Filter,
    edit: Option<EditCursor>,
    draft: String,
    ids: IdGenerator,
}

impl<S: StateStore> TaskStore<S> {
    pub fn open(backend: S) -> Result<Self, AppError> {
        let state = backend.load()?;
        let last_id = state.tasks.iter().map(|task| task.id).max().unwrap_or(0);
        info!(tasks = state.tasks.len(), theme = %state.theme, "task store opened");

        Ok(Self {
            backend,
            tasks: state.tasks,
            theme: state.theme,
            filter: Filter::All,
            edit: None,
            draft: String::new(),
            ids: IdGenerator::after(last_id),
        })
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn filter(&self) -> Filter {
        self.filter
    }

    pub fn edit_cursor(&self) -> Option<&EditCursor> {
        self.edit.as_ref()
    }

    pub fn is_editing(&self, id: TaskId) -> bool {
        self.edit.as_ref().is_some_and(|cursor| cursor.id == id)
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    pub fn submit_draft(&mut self) -> Result<Option<Task>, AppError> {
        let draft = self.draft.clone();
        self.add(&draft)
    }

    /// Appends a pending task with `text` as typed. Blank text is ignored
    /// without error.
    pub fn add(&mut self, text: &str) -> Result<Option<Task>, AppError> {
        if text.trim().is_empty() {
            debug!("ignoring blank task");
            return Ok(None);
        }

        let task = Task::new(self.ids.next_id()?, text);
        let mut tasks = self.tasks.clone();
        tasks.push(task.clone());
        self.commit(tasks, self.theme)?;
        self.draft.clear();

        info!(id = task.id, "task added");
        Ok(Some(task))
    }

    pub fn toggle_complete(&mut self, id: TaskId) -> Result<Option<Task>, AppError> {
        let Some(index) = self.position(id) else {
            debug!(id, "toggle on unknown task ignored");
            return Ok(None);
        };

        let mut tasks = self.tasks.clone();
        tasks[index].completed = !tasks[index].completed;
        let toggled = tasks[index].clone();
        self.commit(tasks, self.theme)?;

        info!(id, completed = toggled.completed, "task toggled");
        Ok(Some(toggled))
    }

    pub fn delete(&mut self, id: TaskId) -> Result<Option<Task>, AppError> {
        let Some(index) = self.position(id) else {
            debug!(id, "delete of unknown task ignored");
            return Ok(None);
        };

        let mut tasks = self.tasks.clone();
        let removed = tasks.remove(index);
        self.commit(tasks, self.theme)?;
        if self.is_editing(id) {
            self.edit = None;
        }

        info!(id, "task deleted");
        Ok(Some(removed))
    }

    /// Opens `id` for editing with `text` as the scratch buffer. Any edit
    /// already in progress is dropped unsaved and handed back.
    pub fn start_edit(&mut self, id: TaskId, text: impl Into<String>) -> Option<EditCursor> {
        let discarded = self.edit.replace(EditCursor {
            id,
            text: text.into(),
        });

        if let Some(previous) = discarded.as_ref()
            && previous.id != id
        {
            warn!(discarded = previous.id, id, "unsaved edit discarded");
        }
        debug!(id, "edit started");
        discarded
    }

    /// Starts editing `id` with its current text. Returns false when no
    /// such task exists.
    pub fn begin_edit(&mut self, id: TaskId) -> bool {
        match self.get(id).map(|task| task.text.clone()) {
            Some(text) => {
                self.start_edit(id, text);
                true
            }
            None => false,
        }
    }

    pub fn set_edit_text(&mut self, text: impl Into<String>) -> bool {
        match self.edit.as_mut() {
            Some(cursor) => {
                cursor.text = text.into();
                true
            }
            None => false,
        }
    }

    pub fn cancel_edit(&mut self) -> Option<EditCursor> {
        self.edit.take()
    }

    /// Writes the scratch buffer verbatim into the task under the cursor.
    pub fn save_edit(&mut self) -> Result<Option<Task>, AppError> {
        let Some(cursor) = self.edit.as_ref() else {
            return Ok(None);
        };

        let Some(index) = self.position(cursor.id) else {
            debug!(id = cursor.id, "edited task no longer exists");
            self.edit = None;
            return Ok(None);
        };

        let mut tasks = self.tasks.clone();
        tasks[index].text = cursor.text.clone();
        let updated = tasks[index].clone();
        self.commit(tasks, self.theme)?;
        self.edit = None;

        info!(id = updated.id, "task edited");
        Ok(Some(updated))
    }

    pub fn set_filter(&mut self, filter: Filter) {
        debug!(%filter, "filter changed");
        self.filter = filter;
    }

    pub fn filtered_tasks(&self) -> Vec<&Task> {
        self.tasks
            .iter()
            .filter(|task| self.filter.matches(task))
            .collect()
    }

    pub fn counts(&self) -> TaskCounts {
        let completed = self.tasks.iter().filter(|task| task.completed).count();
        TaskCounts {
            total: self.tasks.len(),
            completed,
            pending: self.tasks.len() - completed,
        }
    }

    pub fn toggle_theme(&mut self) -> Result<Theme, AppError> {
        let theme = self.theme.toggled();
        self.commit(self.tasks.clone(), theme)?;
        info!(%theme, "theme toggled");
        Ok(theme)
    }

    /// The whole list as a compact JSON array, regardless of the filter.
    pub fn export_tasks(&self) -> Result<String, AppError> {
        transfer::encode_tasks(&self.tasks)
    }

    pub fn export_to(&self, dir: &Path) -> Result<PathBuf, AppError> {
        let document = self.export_tasks()?;
        std::fs::create_dir_all(dir)
            .map_err(|err| AppError::io(format!("{}: {}", dir.display(), err)))?;
        let path = dir.join(EXPORT_FILE_NAME);
        std::fs::write(&path, document)
            .map_err(|err| AppError::io(format!("{}: {}", path.display(), err)))?;

        info!(path = %path.display(), tasks = self.tasks.len(), "tasks exported");
        Ok(path)
    }

    /// Replaces the whole list with the tasks in `contents`. Nothing changes
    /// unless every element is a well-formed task with a distinct id.
    pub fn import_tasks(&mut self, contents: &str) -> Result<usize, AppError> {
        let imported = transfer::decode_tasks(contents).inspect_err(|err| {
            warn!(error = %err, "import rejected");
        })?;
        let count = imported.len();
        let last_id = imported.iter().map(|task| task.id).max();

        self.commit(imported, self.theme)?;
        self.edit = None;
        if let Some(last_id) = last_id {
            self.ids.observe(last_id);
        }

        info!(tasks = count, "tasks imported");
        Ok(count)
    }

    pub fn import_from(&mut self, path: &Path) -> Result<usize, AppError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|err| AppError::io(format!("{}: {}", path.display(), err)))?;
        self.import_tasks(&contents)
    }

    fn position(&self, id: TaskId) -> Option<usize> {
        self.tasks.iter().position(|task| task.id == id)
    }

    fn commit(&mut self, tasks: Vec<Task>, theme: Theme) -> Result<(), AppError> {
        let state = PersistedState { tasks, theme };
        self.backend.save(&state)?;
        self.tasks = state.tasks;
        self.theme = state.theme;
        Ok(())
    }
}
