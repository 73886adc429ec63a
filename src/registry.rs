use chrono::Utc;
use tracing::debug;

use crate::error::{TaskError, TaskResult};
use crate::models::Task;
use crate::storage::TaskStore;

/// In-memory ordered task list, kept in step with a `TaskStore`.
///
/// Every mutation writes the complete list back before returning, so the
/// store always matches `list()`.
pub struct TaskRegistry {
    tasks: Vec<Task>,
    store: TaskStore,
}

impl TaskRegistry {
    /// Creates a registry rehydrated from `store`.
    pub fn open(store: TaskStore) -> Self {
        let tasks = store.load();
        debug!(count = tasks.len(), "Rehydrated tasks");
        Self { tasks, store }
    }

    /// Re-reads the store, discarding the in-memory copy.
    pub fn reload(&mut self) {
        self.tasks = self.store.load();
    }

    /// Current contents in insertion order.
    pub fn list(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: u64) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn store(&self) -> &TaskStore {
        &self.store
    }

    /// Appends a new incomplete task.
    ///
    /// Fails with `TaskError::EmptyText` when `text` is blank; nothing is
    /// changed in that case. Text and date are stored as given.
    pub fn add(&mut self, text: &str, date: &str) -> TaskResult<Task> {
        if text.trim().is_empty() {
            return Err(TaskError::EmptyText);
        }
        let task = Task {
            id: self.next_id(),
            text: text.to_string(),
            date: date.to_string(),
            completed: false,
        };
        self.tasks.push(task.clone());
        if let Err(e) = self.store.save(&self.tasks) {
            self.tasks.pop();
            return Err(e.into());
        }
        debug!(id = task.id, "Added task");
        Ok(task)
    }

    /// Deletes the task with `id`. Returns whether anything was removed.
    ///
    /// The in-memory list is only replaced once the store accepted it.
    pub fn remove(&mut self, id: u64) -> TaskResult<bool> {
        let remaining: Vec<Task> = self.tasks.iter().filter(|t| t.id != id).cloned().collect();
        let removed = remaining.len() != self.tasks.len();
        self.store.save(&remaining)?;
        self.tasks = remaining;
        if removed {
            debug!(id, "Removed task");
        }
        Ok(removed)
    }

    /// Flips `completed` on the task with `id`.
    ///
    /// Returns the new value, or `None` when no such task exists. The flag is
    /// flipped back if the store rejects the write.
    pub fn toggle_completed(&mut self, id: u64) -> TaskResult<Option<bool>> {
        let idx = self.tasks.iter().position(|t| t.id == id);
        if let Some(i) = idx {
            self.tasks[i].completed = !self.tasks[i].completed;
        }
        if let Err(e) = self.store.save(&self.tasks) {
            if let Some(i) = idx {
                self.tasks[i].completed = !self.tasks[i].completed;
            }
            return Err(e.into());
        }
        let state = idx.map(|i| self.tasks[i].completed);
        if let Some(completed) = state {
            debug!(id, completed, "Toggled task");
        }
        Ok(state)
    }

    /// Removes every task.
    pub fn clear(&mut self) -> TaskResult<()> {
        self.store.clear()?;
        let count = self.tasks.len();
        self.tasks.clear();
        debug!(count, "Cleared all tasks");
        Ok(())
    }

    /// Millisecond timestamp, bumped past the largest existing id when the
    /// clock has not moved on.
    fn next_id(&self) -> u64 {
        let now = u64::try_from(Utc::now().timestamp_millis()).unwrap_or(0);
        match self.tasks.iter().map(|t| t.id).max() {
            Some(max) if now <= max => max + 1,
            _ => now,
        }
    }
}
