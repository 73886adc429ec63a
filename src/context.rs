use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{TaskError, TaskResult};
use crate::models::{Filter, Task};
use crate::registry::TaskRegistry;
use crate::storage::{FileStorage, TaskStore};
use crate::view::{render, RenderedList, Transitions};

/// A user intent, emitted by a control and consumed by exactly one handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Add { text: String, date: String },
    Toggle(u64),
    Delete(u64),
    /// Arms the delete-all confirmation. Deletes nothing on its own.
    RequestDeleteAll,
    ConfirmDeleteAll,
    CancelDeleteAll,
    SetFilter(Filter),
}

/// What a handler did, for the caller to report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Added(Task),
    Toggled { id: u64, completed: bool },
    Deleted(u64),
    /// Delete-all is waiting for `ConfirmDeleteAll` or `CancelDeleteAll`.
    ConfirmationRequired,
    Cleared,
    FilterChanged(Filter),
    /// A blocking notice was raised and no state changed.
    Rejected(String),
    /// Missing target or stray confirmation; silently ignored.
    Ignored,
}

/// Everything a handler needs, built once at startup and passed around.
pub struct AppContext {
    registry: TaskRegistry,
    filter: Filter,
    transitions: Transitions,
    confirm_delete_all: bool,
    notice: Option<String>,
}

impl AppContext {
    pub fn new(registry: TaskRegistry, filter: Filter, exit_frames: u8) -> Self {
        Self {
            registry,
            filter,
            transitions: Transitions::new(exit_frames),
            confirm_delete_all: false,
            notice: None,
        }
    }

    /// Opens the file-backed store described by `config` and rehydrates it.
    pub fn from_config(config: &Config) -> TaskResult<Self> {
        let path = config.storage_path();
        let backend = FileStorage::open(path)?;
        let backend_path = backend.path().display().to_string();
        let store = TaskStore::new(Box::new(backend), config.storage.key.clone());
        info!(path = %backend_path, key = %store.key(), "Opening task store");
        Ok(Self::new(
            TaskRegistry::open(store),
            config.ui.default_filter,
            config.ui.exit_frames,
        ))
    }

    /// Context over an in-memory store, without exit transitions.
    pub fn in_memory() -> Self {
        let store = TaskStore::in_memory(crate::config::DEFAULT_STORAGE_KEY);
        Self::new(TaskRegistry::open(store), Filter::All, 0)
    }

    pub fn registry(&self) -> &TaskRegistry {
        &self.registry
    }

    pub fn filter(&self) -> Filter {
        self.filter
    }

    pub fn transitions(&self) -> &Transitions {
        &self.transitions
    }

    pub fn awaiting_confirmation(&self) -> bool {
        self.confirm_delete_all
    }

    /// Pending blocking notice, if any.
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    /// Current projection of the registry under the active filter.
    pub fn view(&self) -> RenderedList {
        render(self.registry.list(), self.filter, &self.transitions)
    }

    /// Advances exit transitions by one frame.
    pub fn tick(&mut self) {
        self.transitions.tick();
    }

    /// Routes `action` to its handler.
    pub fn dispatch(&mut self, action: Action) -> TaskResult<Outcome> {
        debug!(?action, "Dispatching");
        match action {
            Action::Add { text, date } => self.on_add(&text, &date),
            Action::Toggle(id) => self.on_toggle(id),
            Action::Delete(id) => self.on_delete(id),
            Action::RequestDeleteAll => self.on_request_delete_all(),
            Action::ConfirmDeleteAll => self.on_confirm_delete_all(),
            Action::CancelDeleteAll => self.on_cancel_delete_all(),
            Action::SetFilter(filter) => self.on_set_filter(filter),
        }
    }

    fn on_add(&mut self, text: &str, date: &str) -> TaskResult<Outcome> {
        match self.registry.add(text, date) {
            Ok(task) => Ok(Outcome::Added(task)),
            Err(TaskError::EmptyText) => {
                let msg = TaskError::EmptyText.to_string();
                self.notice = Some(msg.clone());
                Ok(Outcome::Rejected(msg))
            }
            Err(e) => Err(e),
        }
    }

    fn on_toggle(&mut self, id: u64) -> TaskResult<Outcome> {
        Ok(match self.registry.toggle_completed(id)? {
            Some(completed) => Outcome::Toggled { id, completed },
            None => Outcome::Ignored,
        })
    }

    fn on_delete(&mut self, id: u64) -> TaskResult<Outcome> {
        let position = self.registry.list().iter().position(|t| t.id == id);
        let task = self.registry.get(id).cloned();
        if !self.registry.remove(id)? {
            return Ok(Outcome::Ignored);
        }
        if let (Some(task), Some(position)) = (task, position) {
            self.transitions.start(&task, position);
        }
        Ok(Outcome::Deleted(id))
    }

    fn on_request_delete_all(&mut self) -> TaskResult<Outcome> {
        self.confirm_delete_all = true;
        Ok(Outcome::ConfirmationRequired)
    }

    fn on_confirm_delete_all(&mut self) -> TaskResult<Outcome> {
        if !self.confirm_delete_all {
            warn!("Delete-all confirmed without a pending request");
            return Ok(Outcome::Ignored);
        }
        self.confirm_delete_all = false;
        self.registry.clear()?;
        self.transitions.clear();
        Ok(Outcome::Cleared)
    }

    fn on_cancel_delete_all(&mut self) -> TaskResult<Outcome> {
        if !self.confirm_delete_all {
            return Ok(Outcome::Ignored);
        }
        self.confirm_delete_all = false;
        Ok(Outcome::Ignored)
    }

    fn on_set_filter(&mut self, filter: Filter) -> TaskResult<Outcome> {
        self.filter = filter;
        Ok(Outcome::FilterChanged(filter))
    }
}
