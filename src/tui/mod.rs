pub mod app;
pub mod ui;

use std::{error::Error, io, time::Duration};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use tracing::info;

use crate::config::Config;
use crate::context::AppContext;
use crate::models::Filter;
use app::{App, InputMode};
use ui::ui;

pub fn run_tui(config: &Config) -> Result<(), Box<dyn Error>> {
    let ctx = AppContext::from_config(config)?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(ctx);
    info!(tasks = app.ctx.registry().len(), "TUI started");

    let res = run_app(&mut terminal, &mut app, Duration::from_millis(config.ui.tick_ms.max(1)));

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    res?;
    Ok(())
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App, tick: Duration) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if !event::poll(tick)? {
            app.on_tick();
            continue;
        }
        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if handle_key(app, key) {
                return Ok(());
            }
        }
    }
}

/// Applies one key press. Returns true when the user asked to quit.
pub fn handle_key(app: &mut App, key: KeyEvent) -> bool {
    // Blocking notice swallows the next key.
    if app.ctx.notice().is_some() {
        app.ctx.dismiss_notice();
        return false;
    }
    if app.ctx.awaiting_confirmation() {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => app.answer_delete_all(true),
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => app.answer_delete_all(false),
            _ => {}
        }
        return false;
    }
    match app.input_mode {
        InputMode::Normal => match key.code {
            KeyCode::Char('q') => return true,
            KeyCode::Down | KeyCode::Char('j') => app.next(),
            KeyCode::Up | KeyCode::Char('k') => app.previous(),
            KeyCode::Char(' ') | KeyCode::Enter => app.toggle_selected(),
            KeyCode::Char('d') | KeyCode::Delete => app.delete_selected(),
            KeyCode::Char('D') => app.request_delete_all(),
            KeyCode::Char('a') => app.start_add(),
            KeyCode::Char('f') => app.cycle_filter(),
            KeyCode::Char('1') => app.set_filter(Filter::All),
            KeyCode::Char('2') => app.set_filter(Filter::Completed),
            KeyCode::Char('3') => app.set_filter(Filter::Incomplete),
            _ => {}
        },
        InputMode::Text | InputMode::Date => match key.code {
            KeyCode::Enter => app.submit_input(),
            KeyCode::Esc => app.cancel_input(),
            KeyCode::Char(c) => app.push_char(c),
            KeyCode::Backspace => app.pop_char(),
            _ => {}
        },
    }
    false
}
