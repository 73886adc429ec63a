use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Wrap},
    Frame,
};

use super::app::{App, InputMode};
use crate::models::Filter;
use crate::view::ItemState;

pub fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Filter tabs
            Constraint::Min(0),    // List
            Constraint::Length(3), // Help
        ].as_ref())
        .split(f.area());

    draw_filters(f, app, chunks[0]);

    if app.view.show_empty_notice {
        // Rows may still be leaving after the last delete.
        let parts = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(3)].as_ref())
            .split(chunks[1]);
        let (list_area, notice_area) = if app.view.items.is_empty() {
            (None, chunks[1])
        } else {
            (Some(parts[0]), parts[1])
        };
        if let Some(area) = list_area {
            draw_list(f, app, area);
        }
        let empty = Paragraph::new("No task found.")
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().borders(Borders::ALL).title("Tasklet"));
        f.render_widget(empty, notice_area);
    } else {
        draw_list(f, app, chunks[1]);
    }

    let help_text = match app.input_mode {
        InputMode::Normal => "q: Quit | a: Add | Space: Toggle Done | d: Del | D: Del All | f: Filter | 1/2/3: All/Done/Open",
        InputMode::Text => "Enter: Next | Esc: Cancel",
        InputMode::Date => "Enter: Save (date optional) | Esc: Cancel",
    };
    let help_line = match &app.status {
        Some(err) => Line::from(Span::styled(err.as_str(), Style::default().fg(Color::Red))),
        None => Line::from(help_text),
    };
    let help = Paragraph::new(help_line)
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, chunks[2]);

    match app.input_mode {
        InputMode::Text | InputMode::Date => {
            let area = centered_rect(60, 3, f.area());
            f.render_widget(Clear, area);
            let (title, buffer) = match app.input_mode {
                InputMode::Text => ("Add Task: Enter Description", app.form.text.as_str()),
                _ => ("Add Task: Enter Due Date (Optional)", app.form.date.as_str()),
            };
            let input = Paragraph::new(buffer)
                .style(Style::default().fg(Color::Yellow))
                .block(Block::default().borders(Borders::ALL).title(title));
            f.render_widget(input, area);
        }
        InputMode::Normal => {}
    }

    if app.ctx.awaiting_confirmation() {
        popup(f, "Delete All", "Are you sure you want to delete all tasks? (y/n)", Color::Red);
    }
    if let Some(notice) = app.ctx.notice() {
        popup(f, "Notice", notice, Color::Yellow);
    }
}

fn draw_filters(f: &mut Frame, app: &App, area: Rect) {
    let mut spans = Vec::new();
    for (i, filter) in Filter::ALL.iter().enumerate() {
        let style = if *filter == app.view.filter {
            Style::default().fg(Color::Black).bg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        spans.push(Span::styled(format!(" {}:{} ", i + 1, filter), style));
        spans.push(Span::raw(" "));
    }
    let tabs = Paragraph::new(Line::from(spans))
        .block(Block::default().borders(Borders::ALL).title("Filter"));
    f.render_widget(tabs, area);
}

fn draw_list(f: &mut Frame, app: &mut App, area: Rect) {
    let rows: Vec<Row> = app
        .view
        .items
        .iter()
        .map(|item| {
            let (mark, style) = match item.state {
                ItemState::Active => ("[ ]", Style::default()),
                ItemState::Completed => (
                    "[x]",
                    Style::default().fg(Color::DarkGray).add_modifier(Modifier::CROSSED_OUT),
                ),
                ItemState::Leaving => {
                    let progress = app.ctx.transitions().progress(item.id).unwrap_or(0.0);
                    let color = if progress > 0.5 { Color::Red } else { Color::DarkGray };
                    ("[-]", Style::default().fg(color).add_modifier(Modifier::DIM | Modifier::ITALIC))
                }
            };
            Row::new(vec![
                Cell::from(mark),
                Cell::from(item.text.clone()),
                Cell::from(item.due_label.clone().unwrap_or_default()),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(4),
        Constraint::Min(20),
        Constraint::Length(20),
    ];

    let title = format!("Tasklet - {} ({} total)", app.view.filter, app.ctx.registry().len());
    let table = Table::new(rows, widths)
        .block(Block::default().borders(Borders::ALL).title(title))
        .row_highlight_style(Style::default().add_modifier(Modifier::BOLD).bg(Color::DarkGray))
        .highlight_symbol(">> ");

    f.render_stateful_widget(table, area, &mut app.state);
}

fn popup(f: &mut Frame, title: &str, message: &str, color: Color) {
    let area = centered_rect(50, 5, f.area());
    f.render_widget(Clear, area);
    let body = Paragraph::new(message)
        .wrap(Wrap { trim: true })
        .alignment(Alignment::Center)
        .style(Style::default().fg(color))
        .block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(body, area);
}

fn centered_rect(percent_x: u16, height: u16, r: Rect) -> Rect {
    let margin = r.height.saturating_sub(height) / 2;
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(margin),
            Constraint::Length(height),
            Constraint::Length(margin),
        ].as_ref())
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ].as_ref())
        .split(popup_layout[1])[1]
}
