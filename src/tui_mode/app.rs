use crate::config::Config;
use crate::render_help::help_lines;
use crate::state::{Action, CalculatorState, Constant, Function};
use crossterm::event::{KeyCode, KeyModifiers};
use ratatui::layout::Rect;

pub struct Key {
    pub label: &'static str,
    pub action: Action,
}

const fn key(label: &'static str, action: Action) -> Key {
    Key { label, action }
}

/// Button grid, top to bottom. The theme button's label is drawn from the
/// current theme instead of `label`.
pub const KEYPAD: [&[Key]; 6] = [
    &[
        key("theme", Action::ToggleTheme),
        key("C", Action::Clear),
        key("⌫", Action::Backspace),
        key("÷", Action::Operator('/')),
    ],
    &[
        key("sin", Action::Function(Function::Sin)),
        key("7", Action::Digit('7')),
        key("8", Action::Digit('8')),
        key("9", Action::Digit('9')),
        key("×", Action::Operator('*')),
    ],
    &[
        key("cos", Action::Function(Function::Cos)),
        key("4", Action::Digit('4')),
        key("5", Action::Digit('5')),
        key("6", Action::Digit('6')),
        key("-", Action::Operator('-')),
    ],
    &[
        key("tan", Action::Function(Function::Tan)),
        key("1", Action::Digit('1')),
        key("2", Action::Digit('2')),
        key("3", Action::Digit('3')),
        key("+", Action::Operator('+')),
    ],
    &[
        key("√", Action::Function(Function::Sqrt)),
        key("0", Action::Digit('0')),
        key(".", Action::Digit('.')),
        key("π", Action::Constant(Constant::Pi)),
        key("=", Action::Evaluate),
    ],
    &[
        key("log", Action::Function(Function::Log10)),
        key("ln", Action::Function(Function::Ln)),
        key("x^y", Action::Operator('^')),
        key("n!", Action::Factorial),
        key("( )", Action::ToggleParen),
    ],
];

pub struct App {
    pub calc: CalculatorState,
    pub dark_mode: bool,
    pub should_quit: bool,
    pub show_help: bool,
    pub help_scroll: usize,
    pub terminal_too_small: bool,
    /// Screen areas of the keypad buttons from the last draw, for mouse clicks.
    pub button_areas: Vec<(Rect, Action)>,
}

impl App {
    pub fn new(config: &Config) -> Self {
        App {
            calc: CalculatorState::with_history_limit(config.history_limit),
            dark_mode: config.dark_mode,
            should_quit: false,
            show_help: false,
            help_scroll: 0,
            terminal_too_small: false,
            button_areas: Vec::new(),
        }
    }

    pub fn apply(&mut self, action: Action) {
        if action == Action::ToggleTheme {
            self.dark_mode = !self.dark_mode;
        }
        self.calc = std::mem::take(&mut self.calc).apply(action);
    }

    /// Moves the help overlay by `delta` lines, staying within the help text.
    pub fn scroll_help(&mut self, delta: isize) {
        let last = help_lines().len().saturating_sub(1);
        self.help_scroll = self.help_scroll.saturating_add_signed(delta).min(last);
    }

    pub fn click(&mut self, column: u16, row: u16) {
        let hit = self
            .button_areas
            .iter()
            .find(|(area, _)| {
                column >= area.x
                    && column < area.x + area.width
                    && row >= area.y
                    && row < area.y + area.height
            })
            .map(|(_, action)| *action);

        if let Some(action) = hit {
            self.apply(action);
        }
    }
}

/// Keyboard shortcuts for the keypad. Keys that steer the UI itself
/// (help, quit) are handled by the event loop.
pub fn action_for_key(code: KeyCode, modifiers: KeyModifiers) -> Option<Action> {
    if modifiers.contains(KeyModifiers::CONTROL) {
        return None;
    }

    let action = match code {
        KeyCode::Char(c @ ('0'..='9' | '.')) => Action::Digit(c),
        KeyCode::Char(c @ ('+' | '-' | '*' | '/' | '^')) => Action::Operator(c),
        KeyCode::Char('!') => Action::Factorial,
        KeyCode::Char('(' | ')') => Action::ToggleParen,
        KeyCode::Char('s') => Action::Function(Function::Sin),
        KeyCode::Char('c') => Action::Function(Function::Cos),
        KeyCode::Char('t') => Action::Function(Function::Tan),
        KeyCode::Char('r') => Action::Function(Function::Sqrt),
        KeyCode::Char('l') => Action::Function(Function::Ln),
        KeyCode::Char('L') => Action::Function(Function::Log10),
        KeyCode::Char('p') => Action::Constant(Constant::Pi),
        KeyCode::Char('e') => Action::Constant(Constant::E),
        KeyCode::Char('=') | KeyCode::Enter => Action::Evaluate,
        KeyCode::Backspace => Action::Backspace,
        KeyCode::Delete | KeyCode::Esc => Action::Clear,
        KeyCode::F(2) => Action::ToggleTheme,
        _ => return None,
    };
    Some(action)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(app: &mut App, keys: &str) {
        for c in keys.chars() {
            let code = if c == '\n' { KeyCode::Enter } else { KeyCode::Char(c) };
            if let Some(action) = action_for_key(code, KeyModifiers::NONE) {
                app.apply(action);
            }
        }
    }

    #[test]
    fn typing_an_expression() {
        let mut app = App::new(&Config::default());
        press(&mut app, "r16\n");
        assert_eq!(app.calc.buffer(), "4");
        assert_eq!(app.calc.history_line().as_deref(), Some("sqrt(16) = 4"));
    }

    #[test]
    fn help_scroll_stays_within_the_text() {
        let mut app = App::new(&Config::default());
        let last = help_lines().len() - 1;

        app.scroll_help(10_000);
        assert_eq!(app.help_scroll, last);

        app.scroll_help(-3);
        assert_eq!(app.help_scroll, last - 3);

        app.scroll_help(-10_000);
        assert_eq!(app.help_scroll, 0);
    }

    #[test]
    fn shifted_symbols_are_accepted() {
        assert_eq!(action_for_key(KeyCode::Char('!'), KeyModifiers::SHIFT), Some(Action::Factorial));
        assert_eq!(action_for_key(KeyCode::Char('c'), KeyModifiers::CONTROL), None);
    }

    #[test]
    fn theme_toggle_leaves_calculator_alone() {
        let mut app = App::new(&Config::default());
        press(&mut app, "12");
        app.apply(Action::ToggleTheme);
        assert!(!app.dark_mode);
        assert_eq!(app.calc.buffer(), "12");
    }

    #[test]
    fn click_dispatches_button_under_cursor() {
        let mut app = App::new(&Config::default());
        app.button_areas = vec![
            (Rect::new(0, 0, 5, 3), Action::Digit('7')),
            (Rect::new(5, 0, 5, 3), Action::Factorial),
        ];
        app.click(2, 1);
        app.click(7, 2);
        app.click(40, 40);
        assert_eq!(app.calc.buffer(), "7!");
    }

    #[test]
    fn keypad_covers_every_function() {
        let functions: Vec<_> = KEYPAD
            .iter()
            .flat_map(|row| row.iter())
            .filter_map(|key| match key.action {
                Action::Function(f) => Some(f.name()),
                _ => None,
            })
            .collect();
        for name in ["sin", "cos", "tan", "sqrt", "log", "log10"] {
            assert!(functions.contains(&name), "{}", name);
        }
    }
}
