use crate::error::AppError;
use crate::model::Task;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Filter {
    #[default]
    All,
    Completed,
    Pending,
}

impl Filter {
    pub const ALL: [Filter; 3] = [Filter::All, Filter::Completed, Filter::Pending];

    pub fn matches(self, task: &Task) -> bool {
        match self {
            Self::All => true,
            Self::Completed => task.completed,
            Self::Pending => !task.completed,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Completed => "completed",
            Self::Pending => "pending",
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Filter {
    type Err = AppError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "completed" | "done" => Ok(Self::Completed),
            "pending" | "open" => Ok(Self::Pending),
            other => Err(AppError::invalid_input(format!(
                "unknown filter '{other}' (expected all, completed or pending)"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Filter;
    use crate::model::Task;

    #[test]
    fn predicates_partition_tasks() {
        let open = Task::new(1, "open");
        let done = Task {
            completed: true,
            ..Task::new(2, "done")
        };

        assert!(Filter::All.matches(&open));
        assert!(Filter::All.matches(&done));
        assert!(Filter::Pending.matches(&open));
        assert!(!Filter::Pending.matches(&done));
        assert!(Filter::Completed.matches(&done));
        assert!(!Filter::Completed.matches(&open));
    }

    #[test]
    fn parses_names_case_insensitively() {
        assert_eq!("All".parse::<Filter>().unwrap(), Filter::All);
        assert_eq!(" COMPLETED ".parse::<Filter>().unwrap(), Filter::Completed);
        assert_eq!("pending".parse::<Filter>().unwrap(), Filter::Pending);
    }

    #[test]
    fn rejects_unknown_names() {
        let err = "someday".parse::<Filter>().unwrap_err();
        assert_eq!(err.code(), "invalid_input");
    }
}
