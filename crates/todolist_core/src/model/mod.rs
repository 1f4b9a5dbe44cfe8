mod filter;
mod task;
mod theme;

pub use filter::Filter;
pub use task::{EditCursor, Task, TaskId};
pub use theme::Theme;
