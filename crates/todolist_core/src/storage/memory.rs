use crate::error::AppError;
use crate::storage::{PersistedState, StateStore};

#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    state: Option<PersistedState>,
    saves: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(state: PersistedState) -> Self {
        Self {
            state: Some(state),
            saves: 0,
        }
    }

    pub fn state(&self) -> Option<&PersistedState> {
        self.state.as_ref()
    }

    pub fn saves(&self) -> usize {
        self.saves
    }
}

impl StateStore for MemoryStore {
    fn load(&self) -> Result<PersistedState, AppError> {
        Ok(self.state.clone().unwrap_or_default())
    }

    fn save(&mut self, state: &PersistedState) -> Result<(), AppError> {
        self.state = Some(state.clone());
        self.saves += 1;
        Ok(())
    }
}
