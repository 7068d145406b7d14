//! Rendering logic using Ratatui.

use super::app::App;
use crate::todo::TodoStatus;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

const MAX_TITLE_LEN: usize = 60;

/// Render the entire UI.
pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // List
            Constraint::Length(3), // Footer
        ])
        .split(frame.area());

    render_header(frame, app, chunks[0]);
    render_list(frame, app, chunks[1]);
    render_footer(frame, app, chunks[2]);
}

/// Render the header panel.
fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let count = app.snapshot.items.len();
    let title = format!(
        "Todo Poller - {} item{} ({} done)",
        count,
        if count == 1 { "" } else { "s" },
        app.snapshot.completed_count()
    );

    let (state, state_color) = if app.snapshot.in_flight {
        ("Loading...", Color::Yellow)
    } else {
        ("Ready", Color::Green)
    };

    let status_line = Line::from(vec![
        Span::styled(state, Style::default().fg(state_color)),
        Span::styled(
            format!(
                " | auto refresh: {} | filter: {} | r: refresh, a: auto, f: filter, q: quit",
                if app.auto_refresh { "on" } else { "off" },
                app.filter.as_str()
            ),
            Style::default().fg(Color::DarkGray),
        ),
    ]);

    let header = Paragraph::new(vec![
        Line::from(Span::styled(
            title,
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )),
        status_line,
    ])
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Blue)),
    );

    frame.render_widget(header, area);
}

/// Render the todo table.
fn render_list(frame: &mut Frame, app: &App, area: Rect) {
    let panel_title = format!("Todos [{}]", app.filter.as_str());
    let block = Block::default()
        .title(panel_title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));

    let todos = app.visible_todos();
    if todos.is_empty() {
        let message = if app.snapshot.in_flight {
            "Loading..."
        } else {
            "No todos"
        };
        frame.render_widget(Paragraph::new(message).block(block), area);
        return;
    }

    let header_cells = ["ID", "Title", "Status"].iter().map(|h| {
        Cell::from(*h).style(
            Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
        )
    });
    let header = Row::new(header_cells).height(1);

    let rows: Vec<Row> = todos
        .iter()
        .skip(app.scroll)
        .map(|todo| {
            let status = todo.status();
            let (row_style, badge_color) = match status {
                TodoStatus::Done => (Style::default().fg(Color::LightGreen), Color::Green),
                TodoStatus::Pending => (Style::default(), Color::Red),
            };

            Row::new(vec![
                Cell::from(todo.id.to_string()).style(Style::default().fg(Color::Cyan)),
                Cell::from(truncate(&todo.title, MAX_TITLE_LEN)),
                Cell::from(status.as_str()).style(
                    Style::default()
                        .fg(badge_color)
                        .add_modifier(Modifier::BOLD),
                ),
            ])
            .style(row_style)
            .height(1)
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(6),
            Constraint::Min(20),
            Constraint::Length(9),
        ],
    )
    .header(header)
    .block(block);

    frame.render_widget(table, area);
}

/// Render the footer with the update time and the last error.
fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
    let updated = match app.snapshot.last_updated {
        Some(at) => format!("Last updated: {}", at.format("%H:%M:%S")),
        None => "No updates yet".to_string(),
    };

    let mut spans = vec![Span::styled(updated, Style::default().fg(Color::Gray))];
    if let Some(error) = &app.last_error {
        spans.push(Span::styled(
            format!(" | Last poll failed: {}", error),
            Style::default().fg(Color::Red),
        ));
    }

    let footer = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Blue)),
    );

    frame.render_widget(footer, area);
}

/// Shorten `text` to at most `max_len` characters, ending in "...".
fn truncate(text: &str, max_len: usize) -> String {
    if text.chars().count() <= max_len {
        return text.to_string();
    }
    let kept: String = text.chars().take(max_len.saturating_sub(3)).collect();
    format!("{}...", kept)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::poller::PollEvent;
    use crate::snapshot::Snapshot;
    use crate::todo::{Todo, TodoFilter};
    use chrono::Local;
    use ratatui::{backend::TestBackend, Terminal};

    fn draw(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 20)).unwrap();
        terminal.draw(|frame| render(frame, app)).unwrap();
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    fn todo(id: u64, title: &str, completed: bool) -> Todo {
        Todo {
            user_id: 1,
            id,
            title: title.to_string(),
            completed,
        }
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a very long title", 10), "a very ...");
        assert_eq!(truncate("할 일이 없습니다", 5), "할 ...");
    }

    #[test]
    fn test_render_empty_state() {
        let app = App::new(true);
        let screen = draw(&app);
        assert!(screen.contains("No todos"));
        assert!(screen.contains("No updates yet"));
        assert!(screen.contains("auto refresh: on"));
    }

    #[test]
    fn test_render_loading_state() {
        let mut app = App::new(false);
        app.set_snapshot(Snapshot {
            in_flight: true,
            ..Default::default()
        });
        let screen = draw(&app);
        assert!(screen.contains("Loading..."));
        assert!(screen.contains("auto refresh: off"));
    }

    #[test]
    fn test_render_items_and_status() {
        let mut app = App::new(true);
        app.set_snapshot(Snapshot {
            items: vec![
                todo(1, "delectus aut autem", false),
                todo(4, "et porro tempora", true),
            ],
            last_updated: Some(Local::now()),
            in_flight: false,
        });
        let screen = draw(&app);
        assert!(screen.contains("delectus aut autem"));
        assert!(screen.contains("et porro tempora"));
        assert!(screen.contains("Pending"));
        assert!(screen.contains("Done"));
        assert!(screen.contains("Last updated:"));

        app.set_filter(TodoFilter::Done);
        let screen = draw(&app);
        assert!(!screen.contains("delectus aut autem"));
        assert!(screen.contains("et porro tempora"));
    }

    #[test]
    fn test_render_last_error() {
        let mut app = App::new(true);
        app.apply_event(&PollEvent::Failed("server responded with status 500".into()));
        let screen = draw(&app);
        assert!(screen.contains("Last poll failed: server responded with status 500"));
    }
}
