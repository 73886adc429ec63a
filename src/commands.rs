use std::io::{self, Write};

use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};

use crate::config::Config;
use crate::context::{Action, AppContext, Outcome};
use crate::error::{StorageError, TaskError, TaskResult};
use crate::models::Filter;
use crate::view::{ItemState, RenderedList};

fn open_context() -> TaskResult<AppContext> {
    AppContext::from_config(&Config::load())
}

/// Adds a new task.
///
/// Blank text is rejected with a notice and nothing is stored.
pub fn cmd_add(text: String, date: Option<String>, silent: bool) -> TaskResult<()> {
    let mut ctx = open_context()?;
    let action = Action::Add {
        text,
        date: date.unwrap_or_default(),
    };
    match ctx.dispatch(action)? {
        Outcome::Added(task) => {
            if !silent { println!("Task added (id = {})", task.id); }
            Ok(())
        }
        Outcome::Rejected(_) => Err(TaskError::EmptyText),
        _ => Ok(()),
    }
}

/// Flips the completion state of a task by ID.
pub fn cmd_toggle(id: u64, silent: bool) -> TaskResult<()> {
    let mut ctx = open_context()?;
    if let Outcome::Toggled { completed, .. } = ctx.dispatch(Action::Toggle(id))? {
        if !silent {
            let state = if completed { "complete" } else { "incomplete" };
            println!("Task {} marked as {}.", id, state);
        }
    }
    Ok(())
}

/// Removes a task by ID. Unknown IDs are ignored.
pub fn cmd_remove(id: u64, silent: bool) -> TaskResult<()> {
    let mut ctx = open_context()?;
    if let Outcome::Deleted(_) = ctx.dispatch(Action::Delete(id))? {
        if !silent { println!("Task {} removed.", id); }
    }
    Ok(())
}

/// Deletes every task after confirmation on stdin, unless `force` is set.
pub fn cmd_clear(force: bool, silent: bool) -> TaskResult<()> {
    let mut ctx = open_context()?;
    ctx.dispatch(Action::RequestDeleteAll)?;

    if !force && !confirm("Are you sure you want to delete all tasks? [y/N] ")? {
        ctx.dispatch(Action::CancelDeleteAll)?;
        if !silent { println!("Aborted."); }
        return Ok(());
    }

    if let Outcome::Cleared = ctx.dispatch(Action::ConfirmDeleteAll)? {
        if !silent { println!("All tasks deleted."); }
    }
    Ok(())
}

fn confirm(prompt: &str) -> TaskResult<bool> {
    print!("{}", prompt);
    io::stdout().flush().map_err(StorageError::from)?;
    let mut input = String::new();
    io::stdin().read_line(&mut input).map_err(StorageError::from)?;
    Ok(input.trim().eq_ignore_ascii_case("y"))
}

/// Lists tasks in a formatted table, in insertion order.
pub fn cmd_list(filter: Filter) -> TaskResult<()> {
    let mut ctx = open_context()?;
    ctx.dispatch(Action::SetFilter(filter))?;
    let view = ctx.view();
    if view.show_empty_notice {
        println!("No tasks found.");
        return Ok(());
    }
    println!("{}", list_table(&view));
    Ok(())
}

/// Builds the table printed by `list`.
pub fn list_table(view: &RenderedList) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("ID").add_attribute(Attribute::Bold),
            Cell::new("Task").add_attribute(Attribute::Bold),
            Cell::new("Due").add_attribute(Attribute::Bold),
            Cell::new("Status").add_attribute(Attribute::Bold),
        ]);

    for item in &view.items {
        let (status, color) = match item.state {
            ItemState::Completed => ("Done", Color::Green),
            _ => ("Pending", Color::Yellow),
        };
        let mut text = Cell::new(&item.text);
        if item.state == ItemState::Completed {
            text = text.add_attribute(Attribute::CrossedOut).fg(Color::Grey);
        }
        table.add_row(vec![
            Cell::new(item.id),
            text,
            Cell::new(item.due_label.clone().unwrap_or_default()),
            Cell::new(status).fg(color),
        ]);
    }
    table
}
