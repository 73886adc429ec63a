//! Pure projection of the task list into displayable rows.
//!
//! Nothing here mutates tasks. The registry stays the single source of
//! truth and a `RenderedList` can be rebuilt from it at any time.

use crate::models::{Filter, Task};

/// Visual state of a rendered row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemState {
    Active,
    Completed,
    /// Already deleted from the store, still playing its exit transition.
    Leaving,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewItem {
    pub id: u64,
    pub text: String,
    /// `"Due: <date>"` when the task has a date.
    pub due_label: Option<String>,
    pub state: ItemState,
}

impl ViewItem {
    pub fn from_task(task: &Task) -> Self {
        Self {
            id: task.id,
            text: task.text.clone(),
            due_label: due_label(task),
            state: if task.completed {
                ItemState::Completed
            } else {
                ItemState::Active
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedList {
    pub filter: Filter,
    pub items: Vec<ViewItem>,
    /// Set exactly when the unfiltered task list is empty.
    pub show_empty_notice: bool,
}

impl RenderedList {
    /// Ids of rows backed by a live task.
    pub fn visible_ids(&self) -> Vec<u64> {
        self.items
            .iter()
            .filter(|i| i.state != ItemState::Leaving)
            .map(|i| i.id)
            .collect()
    }
}

pub fn due_label(task: &Task) -> Option<String> {
    if task.has_date() {
        Some(format!("Due: {}", task.date))
    } else {
        None
    }
}

/// Builds the rows for `tasks` under `filter`.
///
/// Rows still leaving are kept at their previous position, after the live
/// rows that preceded them, so the list does not jump while they animate.
/// They obey the filter like live rows.
pub fn render(tasks: &[Task], filter: Filter, transitions: &Transitions) -> RenderedList {
    let mut items: Vec<ViewItem> = Vec::with_capacity(tasks.len() + transitions.len());
    let mut leaving = transitions.iter().filter(|l| filter.matches(&l.task)).peekable();
    for (idx, task) in tasks.iter().enumerate() {
        while let Some(l) = leaving.next_if(|l| l.position <= idx) {
            items.push(l.item.clone());
        }
        if filter.matches(task) {
            items.push(ViewItem::from_task(task));
        }
    }
    items.extend(leaving.map(|l| l.item.clone()));
    RenderedList {
        filter,
        items,
        show_empty_notice: tasks.is_empty(),
    }
}

#[derive(Debug, Clone)]
pub struct Leaving {
    pub item: ViewItem,
    /// The task as it was when deleted.
    pub task: Task,
    /// Number of live tasks preceding the row.
    pub position: usize,
    pub frames_left: u8,
}

/// Rows playing their exit transition, ordered as they are drawn.
///
/// Purely cosmetic: the task is gone from the registry before it is added
/// here, and `tick` only decides when the row stops being drawn.
#[derive(Debug, Clone, Default)]
pub struct Transitions {
    frames: u8,
    leaving: Vec<Leaving>,
}

impl Transitions {
    pub fn new(frames: u8) -> Self {
        Self {
            frames,
            leaving: Vec::new(),
        }
    }

    /// Starts the exit transition for `task`, which sat at `position` in the
    /// live list before removal. With zero frames the row disappears
    /// immediately.
    ///
    /// Rows already leaving further down lose one preceding live row.
    pub fn start(&mut self, task: &Task, position: usize) {
        if self.frames == 0 {
            return;
        }
        self.leaving.retain(|l| l.item.id != task.id);
        let at = self
            .leaving
            .iter()
            .position(|l| l.position > position)
            .unwrap_or(self.leaving.len());
        for l in self.leaving[at..].iter_mut() {
            l.position -= 1;
        }
        let mut item = ViewItem::from_task(task);
        item.state = ItemState::Leaving;
        self.leaving.insert(
            at,
            Leaving {
                item,
                task: task.clone(),
                position,
                frames_left: self.frames,
            },
        );
    }

    /// Advances all transitions by one frame, dropping finished ones.
    pub fn tick(&mut self) {
        for l in self.leaving.iter_mut() {
            l.frames_left = l.frames_left.saturating_sub(1);
        }
        self.leaving.retain(|l| l.frames_left > 0);
    }

    /// Fraction of the transition still to play, 1.0 at start.
    pub fn progress(&self, id: u64) -> Option<f32> {
        self.leaving
            .iter()
            .find(|l| l.item.id == id)
            .map(|l| l.frames_left as f32 / self.frames.max(1) as f32)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Leaving> {
        self.leaving.iter()
    }

    pub fn len(&self) -> usize {
        self.leaving.len()
    }

    pub fn is_empty(&self) -> bool {
        self.leaving.is_empty()
    }

    pub fn clear(&mut self) {
        self.leaving.clear();
    }
}
