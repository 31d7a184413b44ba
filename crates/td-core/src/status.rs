//! Task status codes and the flags derived from them.
//!
//! The numeric codes are persisted in `Tasks.status`, so their values and
//! ordering are part of the on-disk format. `is_closed` relies on every
//! closing status ranking above [`TaskStatus::InProcess`].

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    /// Nothing has happened yet. Default for new rows.
    NeedsAction,
    /// Work has started.
    InProcess,
    /// Done.
    Completed,
    /// Abandoned.
    Cancelled,
}

impl TaskStatus {
    /// Status stored when the writer supplies none.
    pub const DEFAULT: TaskStatus = TaskStatus::NeedsAction;

    /// All statuses in ascending code order.
    pub const ALL: [TaskStatus; 4] = [
        TaskStatus::NeedsAction,
        TaskStatus::InProcess,
        TaskStatus::Completed,
        TaskStatus::Cancelled,
    ];

    /// Persisted integer code.
    pub const fn code(self) -> i64 {
        match self {
            TaskStatus::NeedsAction => 0,
            TaskStatus::InProcess => 1,
            TaskStatus::Completed => 2,
            TaskStatus::Cancelled => 3,
        }
    }

    /// Decode a persisted status code.
    pub fn from_code(code: i64) -> CoreResult<Self> {
        Self::ALL
            .into_iter()
            .find(|s| s.code() == code)
            .ok_or(CoreError::InvalidStatus { code })
    }

    /// `Tasks.is_new`: the task has not been touched.
    pub const fn is_new(self) -> bool {
        matches!(self, TaskStatus::NeedsAction)
    }

    /// `Tasks.is_closed`: every status ranked above `InProcess`.
    pub const fn is_closed(self) -> bool {
        self.code() > TaskStatus::InProcess.code()
    }
}

impl Default for TaskStatus {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskStatus::NeedsAction => write!(f, "needs-action"),
            TaskStatus::InProcess => write!(f, "in-process"),
            TaskStatus::Completed => write!(f, "completed"),
            TaskStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

#[cfg(test)]
#[path = "status_test.rs"]
mod tests;
