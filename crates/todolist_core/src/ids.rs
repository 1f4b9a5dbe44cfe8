use crate::error::AppError;
use crate::model::TaskId;
use time::OffsetDateTime;

/// Hands out task ids derived from the millisecond clock, bumped forward
/// whenever the clock has not advanced past the last id issued.
#[derive(Debug, Clone, Default)]
pub struct IdGenerator {
    last: TaskId,
}

impl IdGenerator {
    pub fn after(last: TaskId) -> Self {
        Self { last }
    }

    /// Never issue an id at or below `id` again.
    pub fn observe(&mut self, id: TaskId) {
        self.last = self.last.max(id);
    }

    pub fn next_id(&mut self) -> Result<TaskId, AppError> {
        self.next_at(now_millis())
    }

    /// Fails once an id at `TaskId::MAX` has been issued or observed.
    pub fn next_at(&mut self, now_millis: TaskId) -> Result<TaskId, AppError> {
        let floor = self
            .last
            .checked_add(1)
            .ok_or_else(|| AppError::invalid_data("no task ids left after the largest id"))?;
        let id = now_millis.max(floor);
        self.last = id;
        Ok(id)
    }
}

fn now_millis() -> TaskId {
    let millis = OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000;
    TaskId::try_from(millis).unwrap_or_default()
}
