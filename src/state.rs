//! Calculator session state and the transitions user actions drive.
//!
//! [`CalculatorState`] is a plain value: every transition consumes it and
//! returns the next state, so a front-end keeps one instance and swaps it.

use crate::calc_engine::{evaluate_expression, format_result};
use crate::error::EvalError;
use std::f64::consts::{E, PI};
use unicode_segmentation::UnicodeSegmentation;

pub const OPERATORS: [char; 5] = ['+', '-', '*', '/', '^'];

const DEFAULT_HISTORY_LIMIT: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Function {
    Sin,
    Cos,
    Tan,
    Sqrt,
    /// Natural logarithm.
    Ln,
    Log10,
}

impl Function {
    /// Name written into the buffer, as the evaluator knows it.
    pub fn name(self) -> &'static str {
        match self {
            Function::Sin => "sin",
            Function::Cos => "cos",
            Function::Tan => "tan",
            Function::Sqrt => "sqrt",
            Function::Ln => "log",
            Function::Log10 => "log10",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constant {
    Pi,
    E,
}

impl Constant {
    pub fn literal(self) -> String {
        match self {
            Constant::Pi => PI.to_string(),
            Constant::E => E.to_string(),
        }
    }
}

/// One discrete input from the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Digit(char),
    Operator(char),
    Function(Function),
    Constant(Constant),
    Factorial,
    ToggleParen,
    Backspace,
    Clear,
    Evaluate,
    /// Handled by the front-end; the core ignores it.
    ToggleTheme,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub expression: String,
    pub result: String,
}

impl HistoryEntry {
    pub fn line(&self) -> String {
        format!("{} = {}", self.expression, self.result)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CalculatorState {
    buffer: String,
    open_parens: u32,
    history: Vec<HistoryEntry>,
    history_limit: usize,
    show_history: bool,
    last_error: Option<EvalError>,
}

impl Default for CalculatorState {
    fn default() -> Self {
        Self::new()
    }
}

impl CalculatorState {
    pub fn new() -> Self {
        Self::with_history_limit(DEFAULT_HISTORY_LIMIT)
    }

    pub fn with_history_limit(history_limit: usize) -> Self {
        CalculatorState {
            buffer: String::new(),
            open_parens: 0,
            history: Vec::new(),
            history_limit: history_limit.max(1),
            show_history: true,
            last_error: None,
        }
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    pub fn open_parens(&self) -> u32 {
        self.open_parens
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    pub fn last_error(&self) -> Option<&EvalError> {
        self.last_error.as_ref()
    }

    /// The secondary display line: the latest entry, marked with `... ` once
    /// older entries exist.
    pub fn history_line(&self) -> Option<String> {
        if !self.show_history {
            return None;
        }
        let latest = self.history.last()?;
        if self.history.len() > 1 {
            Some(format!("... {}", latest.line()))
        } else {
            Some(latest.line())
        }
    }

    /// What the main display shows: a pending error message, else the buffer.
    pub fn display_text(&self) -> String {
        match &self.last_error {
            Some(err) => err.to_string(),
            None => self.buffer.clone(),
        }
    }

    pub fn apply(self, action: Action) -> Self {
        match action {
            Action::Digit(c) => self.append_digit(c),
            Action::Operator(op) => self.append_operator(op),
            Action::Function(f) => self.append_function(f),
            Action::Constant(k) => self.append_constant(k),
            Action::Factorial => self.append_factorial(),
            Action::ToggleParen => self.toggle_paren(),
            Action::Backspace => self.backspace(),
            Action::Clear => self.clear(),
            Action::Evaluate => self.evaluate().0,
            Action::ToggleTheme => self,
        }
    }

    pub fn append_digit(mut self, c: char) -> Self {
        self.last_error = None;
        if c.is_ascii_digit() || c == '.' {
            self.buffer.push(c);
        }
        self
    }

    /// Accepts an operator after an operand, and `-` anywhere a sign may
    /// start (empty buffer or right after another operator).
    pub fn append_operator(mut self, op: char) -> Self {
        self.last_error = None;
        if !OPERATORS.contains(&op) {
            return self;
        }

        let ends_in_operator = self.buffer.chars().last().map_or(false, |c| OPERATORS.contains(&c));
        let after_operand = !self.buffer.is_empty() && !ends_in_operator;
        let signed = op == '-' && (self.buffer.is_empty() || ends_in_operator);

        if after_operand || signed {
            self.buffer.push(op);
        }
        self
    }

    pub fn append_function(mut self, function: Function) -> Self {
        self.last_error = None;
        self.buffer.push_str(function.name());
        self.buffer.push('(');
        self.open_parens += 1;
        self
    }

    pub fn append_constant(mut self, constant: Constant) -> Self {
        self.last_error = None;
        self.buffer.push_str(&constant.literal());
        self
    }

    pub fn append_factorial(mut self) -> Self {
        self.last_error = None;
        if matches!(self.buffer.chars().last(), Some(c) if c.is_ascii_digit() || c == ')') {
            self.buffer.push('!');
        }
        self
    }

    /// Opens a group when none is open (or none was ever opened), else closes
    /// one. The decision looks at the global count, not at the cursor.
    pub fn toggle_paren(mut self) -> Self {
        self.last_error = None;
        if !self.buffer.contains('(') || self.open_parens == 0 {
            self.buffer.push('(');
            self.open_parens += 1;
        } else {
            self.buffer.push(')');
            self.open_parens -= 1;
        }
        self
    }

    pub fn backspace(mut self) -> Self {
        self.last_error = None;
        let Some((idx, last)) = self.buffer.grapheme_indices(true).next_back() else {
            return self;
        };

        match last {
            "(" => self.open_parens = self.open_parens.saturating_sub(1),
            ")" => self.open_parens += 1,
            _ => {}
        }
        self.buffer.truncate(idx);
        self
    }

    pub fn clear(mut self) -> Self {
        self.buffer.clear();
        self.open_parens = 0;
        self.last_error = None;
        self.show_history = false;
        self
    }

    /// Closes open groups, evaluates the buffer and either seeds the buffer
    /// with the formatted result or clears it and holds the error.
    ///
    /// An empty buffer is left untouched and yields `None`.
    pub fn evaluate(mut self) -> (Self, Option<Result<String, EvalError>>) {
        if self.buffer.is_empty() {
            return (self, None);
        }

        for _ in 0..self.open_parens {
            self.buffer.push(')');
        }
        self.open_parens = 0;

        match evaluate_expression(&self.buffer) {
            Ok(value) => {
                let result = format_result(value);

                if self.history.len() == self.history_limit {
                    self.history.remove(0);
                }
                self.history.push(HistoryEntry {
                    expression: std::mem::take(&mut self.buffer),
                    result: result.clone(),
                });
                self.show_history = true;
                self.buffer.push_str(&result);
                self.last_error = None;
                (self, Some(Ok(result)))
            }
            Err(err) => {
                self.buffer.clear();
                self.last_error = Some(err.clone());
                (self, Some(Err(err)))
            }
        }
    }

    /// Evaluates typed text as if it had been entered key by key, deriving the
    /// open group count from the text itself.
    pub fn submit_text(mut self, text: &str) -> (Self, Option<Result<String, EvalError>>) {
        let opens = text.matches('(').count();
        let closes = text.matches(')').count();

        self.buffer = text.trim().to_string();
        self.open_parens = opens.saturating_sub(closes) as u32;
        self.last_error = None;
        self.evaluate()
    }
}
