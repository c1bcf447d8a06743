use crate::tui_mode::app::App;
use ratatui::{
    layout::Alignment,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
    Frame,
};

pub fn render_help(frame: &mut Frame, app: &App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .border_style(Style::default().fg(Color::Yellow))
        .title(" SciCalc Help ")
        .title_alignment(Alignment::Center)
        .style(Style::default().bg(Color::Black));

    let paragraph = Paragraph::new(help_lines())
        .block(block)
        .alignment(Alignment::Left)
        .wrap(Wrap { trim: true })
        .scroll((u16::try_from(app.help_scroll).unwrap_or(u16::MAX), 0));

    frame.render_widget(Clear, frame.size());
    frame.render_widget(paragraph, frame.size());
}

/// The help overlay text, one entry per line.
pub fn help_lines() -> Vec<Line<'static>> {
    let heading = Style::default().fg(Color::Cyan).add_modifier(Modifier::UNDERLINED);

    vec![
        Line::from(Span::styled("SciCalc - Scientific Keypad Calculator", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD))),
        Line::from(""),
        Line::from(Span::styled("Keypad:", heading)),
        Line::from("  Click a button, or use the keys below."),
        Line::from(""),
        Line::from(Span::styled("Basic Operations:", heading)),
        Line::from("  0-9 .   : Digits and decimal point"),
        Line::from("  + - * / : Arithmetic (a leading - starts a negative number)"),
        Line::from("  ^       : Power        (e.g., 2^10 = 1024)"),
        Line::from("  !       : Factorial    (e.g., 5! = 120, (2+1)! = 6)"),
        Line::from("  ( or )  : Open a group, or close the open one"),
        Line::from(""),
        Line::from(Span::styled("Functions:", heading)),
        Line::from("  s : sin(x)    (x in radians)"),
        Line::from("  c : cos(x)    (x in radians)"),
        Line::from("  t : tan(x)    (x in radians)"),
        Line::from("  r : sqrt(x)   Square root"),
        Line::from("  l : log(x)    Natural logarithm (ln)"),
        Line::from("  L : log10(x)  Base-10 logarithm"),
        Line::from(""),
        Line::from(Span::styled("Constants:", heading)),
        Line::from("  p : π (3.141592653589793)"),
        Line::from("  e : Euler's number (2.718281828459045)"),
        Line::from(""),
        Line::from(Span::styled("Editing:", heading)),
        Line::from("  Enter or = : Calculate; the result seeds the next expression"),
        Line::from("  Backspace  : Delete the last character"),
        Line::from("  Del or Esc : Clear the expression"),
        Line::from("  Open groups are closed automatically on Enter."),
        Line::from(""),
        Line::from(Span::styled("Other:", heading)),
        Line::from("  F1     : Toggle this help"),
        Line::from("  F2     : Toggle dark/light theme"),
        Line::from("  Ctrl+Q : Quit"),
        Line::from(""),
        Line::from(Span::styled("Examples:", heading)),
        Line::from("  r16         -> sqrt(16) = 4"),
        Line::from("  (2+1)!      -> 6"),
        Line::from("  3.5+2.5     -> 6"),
        Line::from("  5/0         -> Error: Division by zero"),
    ]
}
