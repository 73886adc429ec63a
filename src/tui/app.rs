use ratatui::widgets::TableState;
use tracing::error;

use crate::context::{Action, AppContext, Outcome};
use crate::models::Filter;
use crate::view::{ItemState, RenderedList};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    /// Typing the task description.
    Text,
    /// Typing the optional due date.
    Date,
}

/// The add form, filled in two steps.
#[derive(Default)]
pub struct AddForm {
    pub text: String,
    pub date: String,
}

pub struct App {
    pub ctx: AppContext,
    pub view: RenderedList,
    pub state: TableState,
    pub input_mode: InputMode,
    pub form: AddForm,
    /// Last storage failure, shown in the status line.
    pub status: Option<String>,
}

impl App {
    pub fn new(ctx: AppContext) -> App {
        let view = ctx.view();
        let mut app = App {
            ctx,
            view,
            state: TableState::default(),
            input_mode: InputMode::Normal,
            form: AddForm::default(),
            status: None,
        };
        app.refresh();
        app
    }

    /// Rebuilds the projection and keeps the selection in range.
    pub fn refresh(&mut self) {
        self.view = self.ctx.view();
        let len = self.view.items.len();
        if len == 0 {
            self.state.select(None);
        } else if let Some(i) = self.state.selected() {
            if i >= len {
                self.state.select(Some(len - 1));
            }
        } else {
            self.state.select(Some(0));
        }
    }

    /// Advances animations by one frame.
    pub fn on_tick(&mut self) {
        if !self.ctx.transitions().is_empty() {
            self.ctx.tick();
            self.refresh();
        }
    }

    pub fn dispatch(&mut self, action: Action) -> Option<Outcome> {
        let outcome = match self.ctx.dispatch(action) {
            Ok(outcome) => {
                self.status = None;
                Some(outcome)
            }
            Err(e) => {
                error!(error = %e, "Action failed");
                self.status = Some(e.to_string());
                None
            }
        };
        self.refresh();
        outcome
    }

    pub fn next(&mut self) {
        if self.view.items.is_empty() { return; }
        let i = match self.state.selected() {
            Some(i) if i + 1 < self.view.items.len() => i + 1,
            _ => 0,
        };
        self.state.select(Some(i));
    }

    pub fn previous(&mut self) {
        if self.view.items.is_empty() { return; }
        let i = match self.state.selected() {
            Some(0) | None => self.view.items.len() - 1,
            Some(i) => i - 1,
        };
        self.state.select(Some(i));
    }

    /// Id of the selected row, skipping rows that are already deleted.
    pub fn selected_id(&self) -> Option<u64> {
        let item = self.view.items.get(self.state.selected()?)?;
        if item.state == ItemState::Leaving {
            return None;
        }
        Some(item.id)
    }

    pub fn toggle_selected(&mut self) {
        if let Some(id) = self.selected_id() {
            self.dispatch(Action::Toggle(id));
        }
    }

    pub fn delete_selected(&mut self) {
        if let Some(id) = self.selected_id() {
            self.dispatch(Action::Delete(id));
        }
    }

    pub fn request_delete_all(&mut self) {
        self.dispatch(Action::RequestDeleteAll);
    }

    pub fn answer_delete_all(&mut self, yes: bool) {
        if yes {
            self.dispatch(Action::ConfirmDeleteAll);
        } else {
            self.dispatch(Action::CancelDeleteAll);
        }
    }

    pub fn set_filter(&mut self, filter: Filter) {
        self.dispatch(Action::SetFilter(filter));
    }

    pub fn cycle_filter(&mut self) {
        let next = self.ctx.filter().next();
        self.set_filter(next);
    }

    pub fn start_add(&mut self) {
        self.form = AddForm::default();
        self.input_mode = InputMode::Text;
    }

    pub fn cancel_input(&mut self) {
        self.form = AddForm::default();
        self.input_mode = InputMode::Normal;
    }

    pub fn push_char(&mut self, c: char) {
        match self.input_mode {
            InputMode::Text => self.form.text.push(c),
            InputMode::Date => self.form.date.push(c),
            InputMode::Normal => {}
        }
    }

    pub fn pop_char(&mut self) {
        match self.input_mode {
            InputMode::Text => { self.form.text.pop(); }
            InputMode::Date => { self.form.date.pop(); }
            InputMode::Normal => {}
        }
    }

    /// Moves from the text step to the date step, then submits.
    ///
    /// A rejected submission keeps the form open so the text can be fixed
    /// once the notice is dismissed.
    pub fn submit_input(&mut self) {
        match self.input_mode {
            InputMode::Text => self.input_mode = InputMode::Date,
            InputMode::Date => {
                let action = Action::Add {
                    text: self.form.text.clone(),
                    date: self.form.date.clone(),
                };
                match self.dispatch(action) {
                    Some(Outcome::Rejected(_)) => self.input_mode = InputMode::Text,
                    Some(Outcome::Added(task)) => {
                        self.cancel_input();
                        if let Some(i) = self.view.items.iter().position(|v| v.id == task.id) {
                            self.state.select(Some(i));
                        }
                    }
                    _ => self.cancel_input(),
                }
            }
            InputMode::Normal => {}
        }
    }
}
