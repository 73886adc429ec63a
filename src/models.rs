use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Represents a single entry in the task list.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Task {
    /// Unique identifier, derived from the creation timestamp in milliseconds.
    pub id: u64,
    /// The task description. Never empty after trimming.
    pub text: String,
    /// User supplied due date, kept exactly as entered. Empty when absent.
    #[serde(default)]
    pub date: String,
    /// Whether the task has been completed.
    #[serde(default)]
    pub completed: bool,
}

impl Task {
    pub fn has_date(&self) -> bool {
        !self.date.is_empty()
    }
}

/// Display-only predicate selecting which tasks are shown.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Filter {
    #[default]
    All,
    Completed,
    Incomplete,
}

impl Filter {
    pub const ALL: [Filter; 3] = [Filter::All, Filter::Completed, Filter::Incomplete];

    /// Returns true if `task` is visible under this filter.
    pub fn matches(&self, task: &Task) -> bool {
        match self {
            Filter::All => true,
            Filter::Completed => task.completed,
            Filter::Incomplete => !task.completed,
        }
    }

    /// Cycles all -> completed -> incomplete -> all.
    pub fn next(self) -> Filter {
        match self {
            Filter::All => Filter::Completed,
            Filter::Completed => Filter::Incomplete,
            Filter::Incomplete => Filter::All,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Filter::All => "all",
            Filter::Completed => "completed",
            Filter::Incomplete => "incomplete",
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Filter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(Filter::All),
            "completed" => Ok(Filter::Completed),
            "incomplete" => Ok(Filter::Incomplete),
            other => Err(format!(
                "Unknown filter '{}'. Supported: all, completed, incomplete.",
                other
            )),
        }
    }
}
