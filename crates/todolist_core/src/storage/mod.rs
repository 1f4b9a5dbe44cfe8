use crate::error::AppError;
use crate::model::{Task, Theme};

pub mod json_store;
pub mod memory;

pub use json_store::JsonFileStore;
pub use memory::MemoryStore;

/// Everything that survives a restart: the task list and the theme.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PersistedState {
    pub tasks: Vec<Task>,
    pub theme: Theme,
}

/// Persistence port of the task store.
pub trait StateStore {
    /// Absent or unreadable keys fall back to their defaults.
    fn load(&self) -> Result<PersistedState, AppError>;

    fn save(&mut self, state: &PersistedState) -> Result<(), AppError>;
}
