use super::app::{action_for_key, App, KEYPAD};
use super::helpers::{center_label, highlight_functions, Theme};
use crate::render_help::render_help;
use crate::state::Action;
use anyhow::Result;
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEventKind};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Wrap},
    Frame, Terminal,
};
use std::time::Duration;
use tracing::debug;

const MIN_TERMINAL_WIDTH: u16 = 40;
const MIN_TERMINAL_HEIGHT: u16 = 26;

pub fn run_ui_loop(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    loop {
        terminal.draw(|f| {
            if app.show_help {
                render_help(f, app);
            } else {
                ui(f, app);
            }
        })?;

        if app.should_quit {
            break;
        }

        if crossterm::event::poll(Duration::from_millis(50))? {
            match crossterm::event::read()? {
                Event::Key(KeyEvent { code, modifiers, kind, .. }) if kind == KeyEventKind::Press => {
                    handle_key_event(app, code, modifiers);
                }
                Event::Mouse(event) => {
                    handle_mouse_event(app, event);
                }
                _ => {}
            }
        }
    }
    Ok(())
}

fn handle_key_event(app: &mut App, code: KeyCode, modifiers: KeyModifiers) {
    if modifiers.contains(KeyModifiers::CONTROL)
        && matches!(code, KeyCode::Char('c') | KeyCode::Char('q'))
    {
        app.should_quit = true;
        return;
    }

    if app.show_help {
        match code {
            KeyCode::Down => app.scroll_help(1),
            KeyCode::Up => app.scroll_help(-1),
            KeyCode::PageDown => app.scroll_help(10),
            KeyCode::PageUp => app.scroll_help(-10),
            KeyCode::Esc | KeyCode::F(1) => {
                app.show_help = false;
                app.help_scroll = 0;
            }
            _ => {}
        }
        return;
    }

    if code == KeyCode::F(1) {
        app.show_help = true;
        app.help_scroll = 0;
        return;
    }

    if let Some(action) = action_for_key(code, modifiers) {
        debug!(?action, "key");
        app.apply(action);
    }
}

fn handle_mouse_event(app: &mut App, event: crossterm::event::MouseEvent) {
    if app.show_help {
        match event.kind {
            MouseEventKind::ScrollDown => app.scroll_help(3),
            MouseEventKind::ScrollUp => app.scroll_help(-3),
            _ => {}
        }
    } else if event.kind == MouseEventKind::Down(MouseButton::Left) {
        app.click(event.column, event.row);
    }
}

fn ui(frame: &mut Frame, app: &mut App) {
    let terminal_size = frame.size();

    app.terminal_too_small = terminal_size.width < MIN_TERMINAL_WIDTH ||
                             terminal_size.height < MIN_TERMINAL_HEIGHT;

    if app.terminal_too_small {
        app.button_areas.clear();
        render_resize_message(frame, terminal_size);
        return;
    }

    let theme = Theme::new(app.dark_mode);
    frame.render_widget(
        Block::default().style(Style::default().bg(theme.background)),
        terminal_size,
    );

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Min(18),
            Constraint::Length(1),
        ])
        .split(terminal_size);

    render_history_line(frame, app, &theme, layout[0]);
    render_display(frame, app, &theme, layout[1]);
    render_keypad(frame, app, &theme, layout[2]);
    render_status(frame, &theme, layout[3]);
}

fn render_resize_message(frame: &mut Frame, area: Rect) {
    let message = format!(
        "Terminal too small! Min size: {}x{}. Current: {}x{}",
        MIN_TERMINAL_WIDTH,
        MIN_TERMINAL_HEIGHT,
        area.width,
        area.height
    );

    let text = vec![
        Line::from(Span::styled(
            message,
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Please resize your terminal window",
            Style::default().fg(Color::Yellow)
        )),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red))
        .title(" Resize Required ")
        .title_alignment(Alignment::Center);

    let paragraph = Paragraph::new(text)
        .block(block)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });

    frame.render_widget(paragraph, area);
}

fn render_history_line(frame: &mut Frame, app: &App, theme: &Theme, area: Rect) {
    let text = app.calc.history_line().unwrap_or_default();
    let paragraph = Paragraph::new(text)
        .style(Style::default().fg(theme.muted).bg(theme.background))
        .alignment(Alignment::Right);
    frame.render_widget(paragraph, area);
}

fn render_display(frame: &mut Frame, app: &App, theme: &Theme, area: Rect) {
    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(Style::default().fg(theme.muted))
        .style(Style::default().bg(theme.background));

    let text = app.calc.display_text();
    let line = if app.calc.last_error().is_some() {
        Line::from(Span::styled(
            format!("Error: {}", text),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ))
    } else {
        let base = Style::default().fg(theme.text).add_modifier(Modifier::BOLD);
        // keep the tail visible when the expression outgrows the display
        let visible = area.width.saturating_sub(1) as usize;
        let skip = text.chars().count().saturating_sub(visible);
        let tail: String = text.chars().skip(skip).collect();
        Line::from(highlight_functions(&tail, base))
    };

    let hint = match app.calc.open_parens() {
        0 => Line::from(""),
        n => Line::from(Span::styled(format!("( ×{}", n), Style::default().fg(theme.muted))),
    };

    let paragraph = Paragraph::new(vec![hint, line])
        .block(block)
        .alignment(Alignment::Right);
    frame.render_widget(paragraph, area);
}

fn render_keypad(frame: &mut Frame, app: &mut App, theme: &Theme, area: Rect) {
    app.button_areas.clear();

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Ratio(1, KEYPAD.len() as u32); KEYPAD.len()])
        .split(area);

    for (row_keys, row_area) in KEYPAD.iter().zip(rows.iter()) {
        let cells = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(vec![Constraint::Ratio(1, row_keys.len() as u32); row_keys.len()])
            .split(*row_area);

        for (key, cell) in row_keys.iter().zip(cells.iter()) {
            let label = if key.action == Action::ToggleTheme {
                Theme::theme_label(app.dark_mode)
            } else {
                key.label
            };

            let block = Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(theme.muted))
                .style(theme.key_style(key.action));
            let inner = block.inner(*cell);
            let top_padding = inner.height.saturating_sub(1) / 2;

            let mut lines = vec![Line::from(""); top_padding as usize];
            lines.push(Line::from(center_label(label, inner.width as usize)));

            frame.render_widget(Paragraph::new(lines).block(block), *cell);
            app.button_areas.push((*cell, key.action));
        }
    }
}

fn render_status(frame: &mut Frame, theme: &Theme, area: Rect) {
    let keys = [
        ("Enter", "Calculate"),
        ("Del", "Clear"),
        ("F1", "Help"),
        ("F2", "Theme"),
        ("Ctrl+Q", "Quit"),
    ];

    let spans: Vec<Span> = keys
        .iter()
        .flat_map(|(key, desc)| {
            vec![
                Span::styled(
                    *key,
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!(" {} ", desc),
                    Style::default().fg(theme.muted),
                ),
            ]
        })
        .collect();

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(theme.background));
    frame.render_widget(paragraph, area);
}
