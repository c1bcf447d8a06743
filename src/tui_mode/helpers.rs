use crate::calc_engine::{CONSTANTS, FUNCTIONS};
use crate::state::Action;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Span;
use unicode_width::UnicodeWidthStr;

/// Palette for one of the two themes.
pub struct Theme {
    pub background: Color,
    pub text: Color,
    pub muted: Color,
    pub digit_key: Color,
    pub function_key: Color,
    pub operator_key: Color,
    pub key_text: Color,
}

impl Theme {
    pub fn new(dark_mode: bool) -> Self {
        if dark_mode {
            Theme {
                background: Color::Rgb(40, 40, 40),
                text: Color::White,
                muted: Color::Rgb(170, 170, 170),
                digit_key: Color::Rgb(70, 70, 70),
                function_key: Color::Rgb(55, 55, 60),
                operator_key: Color::Rgb(62, 62, 62),
                key_text: Color::White,
            }
        } else {
            Theme {
                background: Color::Rgb(240, 240, 240),
                text: Color::Black,
                muted: Color::Rgb(136, 136, 136),
                digit_key: Color::Rgb(248, 249, 250),
                function_key: Color::Rgb(224, 224, 224),
                operator_key: Color::Rgb(240, 240, 240),
                key_text: Color::Rgb(51, 51, 51),
            }
        }
    }

    pub fn key_style(&self, action: Action) -> Style {
        let (bg, fg) = match action {
            Action::Clear => (Color::Rgb(255, 107, 107), Color::White),
            Action::Evaluate => (Color::Rgb(77, 171, 247), Color::White),
            Action::Digit(_) => (self.digit_key, self.key_text),
            Action::Operator(_) | Action::Backspace | Action::ToggleTheme => {
                (self.operator_key, self.key_text)
            }
            _ => (self.function_key, self.key_text),
        };
        Style::default().bg(bg).fg(fg).add_modifier(Modifier::BOLD)
    }

    pub fn theme_label(dark_mode: bool) -> &'static str {
        if dark_mode {
            "☾"
        } else {
            "☼"
        }
    }
}

/// Pads `label` so it sits in the middle of a cell `width` columns wide.
pub fn center_label(label: &str, width: usize) -> String {
    let used = label.width();
    if used >= width {
        return label.to_string();
    }
    let left = (width - used) / 2;
    format!("{}{}", " ".repeat(left), label)
}

pub fn is_math_function(word: &str) -> bool {
    FUNCTIONS.contains(&word) || CONSTANTS.contains(&word)
}

pub fn highlight_functions(expr: &str, base_style: Style) -> Vec<Span<'static>> {
    let function_style = Style::default()
        .fg(Color::LightBlue)
        .add_modifier(Modifier::BOLD);

    let operator_style = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);

    let mut spans = Vec::new();
    let mut word = String::new();

    let flush = |word: &mut String, spans: &mut Vec<Span<'static>>| {
        if word.is_empty() {
            return;
        }
        let style = if is_math_function(word) { function_style } else { base_style };
        spans.push(Span::styled(std::mem::take(word), style));
    };

    for c in expr.chars() {
        match c {
            'a'..='z' | 'A'..='Z' => word.push(c),
            '0'..='9' if !word.is_empty() => word.push(c),
            '+' | '-' | '*' | '/' | '^' | '!' => {
                flush(&mut word, &mut spans);
                spans.push(Span::styled(c.to_string(), operator_style));
            }
            _ => {
                flush(&mut word, &mut spans);
                spans.push(Span::styled(c.to_string(), base_style));
            }
        }
    }
    flush(&mut word, &mut spans);

    spans
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn highlights_known_names_only() {
        let base = Style::default();
        let spans = highlight_functions("log10(2)+foo", base);
        assert_eq!(spans[0].content, "log10");
        assert_ne!(spans[0].style, base);
        assert_eq!(spans.last().map(|s| s.content.as_ref()), Some("foo"));
        assert_eq!(spans.last().map(|s| s.style), Some(base));
    }

    #[test]
    fn centers_wide_labels() {
        assert_eq!(center_label("sin", 7), "  sin");
        assert_eq!(center_label("√", 3), " √");
        assert_eq!(center_label("toolong", 3), "toolong");
    }
}
