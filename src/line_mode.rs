use crate::config::Config;
use crate::state::CalculatorState;
use anyhow::{Context, Result};
use std::io::{stdin, stdout, Stdin, Write};
use termion::{
    clear::CurrentLine as ClearLine,
    cursor::{DetectCursorPos, Goto},
    event::Key,
    input::{Keys, TermRead},
    raw::{IntoRawMode, RawTerminal},
};
use tracing::info;
use unicode_width::UnicodeWidthStr;

const PROMPT: &str = "Expression: ";

type Term = RawTerminal<std::io::Stdout>;

// Функция для преобразования позиции символа в байтовую позицию
fn char_index_to_byte_index(s: &str, char_index: usize) -> usize {
    s.char_indices()
        .nth(char_index)
        .map(|(i, _)| i)
        .unwrap_or_else(|| s.len())
}

/// Line editor front-end. The last result stays in the editor so the next
/// expression can build on it.
pub fn run_line(config: &Config) -> Result<()> {
    println!("SciCalc line mode");
    println!("Supports: + - * / ^ ! ( ), sqrt sin cos tan log log10, pi e");
    println!("Navigation: ←/→, Backspace/Delete, Home/End, ↑/↓ for previous expressions");
    println!("Commands: 'quit' to exit, 'clear' to reset, 'history' to list results\n");

    let mut stdout = stdout().into_raw_mode().context("enabling raw mode")?;
    let stdin = stdin();
    let mut keys = stdin.keys();

    let mut calc = CalculatorState::with_history_limit(config.history_limit);
    let mut recall: Vec<String> = Vec::new();

    loop {
        let seed = calc.buffer().to_string();
        let Some(expression) = read_expression(&mut stdout, &mut keys, &recall, seed)? else {
            write!(stdout, "\r\nGoodbye!\r\n")?;
            return Ok(());
        };

        let input = expression.trim();
        if input.is_empty() {
            write!(stdout, "\r\n")?;
            continue;
        }

        match input.to_lowercase().as_str() {
            "quit" | "exit" | "q" => {
                write!(stdout, "\r\nGoodbye!\r\n")?;
                return Ok(());
            }
            "clear" | "reset" => {
                calc = calc.clear();
                recall.clear();
                write!(stdout, "\r\nCleared\r\n\n")?;
                continue;
            }
            "history" => {
                write!(stdout, "\r\n{}\r\n", history_listing(&calc))?;
                continue;
            }
            _ => {}
        }

        recall.push(input.to_string());
        let (next, outcome) = calc.submit_text(input);
        calc = next;

        match outcome {
            Some(Ok(_)) => {
                let line = calc.history_line().unwrap_or_default();
                write!(stdout, "\r\n  {}\r\n\n", line)?;
            }
            Some(Err(err)) => {
                info!(expression = input, reason = err.reason(), "line mode error");
                write!(stdout, "\r\n  {} = Error: {}\r\n\n", input, err)?;
            }
            None => {}
        }
        stdout.flush()?;
    }
}

/// Reads one line with cursor editing. `None` means the user asked to leave
/// (Ctrl+C, Ctrl+D or end of input).
fn read_expression(
    stdout: &mut Term,
    keys: &mut Keys<Stdin>,
    recall: &[String],
    seed: String,
) -> Result<Option<String>> {
    let mut expression = seed;
    let mut cursor_pos = expression.chars().count(); // позиция курсора в символах
    let mut recall_index = recall.len();

    write!(stdout, "{}{}", ClearLine, PROMPT)?;
    stdout.flush()?;
    let (_, initial_y) = stdout.cursor_pos()?;

    loop {
        write!(
            stdout,
            "{}{}{}{}",
            Goto(1, initial_y),
            ClearLine,
            PROMPT,
            expression
        )?;

        let byte_pos = char_index_to_byte_index(&expression, cursor_pos);
        let column = 1 + PROMPT.len() + expression[..byte_pos].width();
        write!(stdout, "{}", Goto(column as u16, initial_y))?;
        stdout.flush()?;

        let Some(key) = keys.next() else {
            return Ok(None);
        };

        match key? {
            Key::Char('\n') => return Ok(Some(expression)),
            Key::Ctrl('c') | Key::Ctrl('d') => return Ok(None),
            Key::Char(c) => {
                let byte_idx = char_index_to_byte_index(&expression, cursor_pos);
                expression.insert(byte_idx, c);
                cursor_pos += 1;
            }
            Key::Backspace if cursor_pos > 0 => {
                cursor_pos -= 1;
                remove_char_at(&mut expression, cursor_pos);
            }
            Key::Delete if cursor_pos < expression.chars().count() => {
                remove_char_at(&mut expression, cursor_pos);
            }
            Key::Left if cursor_pos > 0 => cursor_pos -= 1,
            Key::Right if cursor_pos < expression.chars().count() => cursor_pos += 1,
            Key::Home => cursor_pos = 0,
            Key::End => cursor_pos = expression.chars().count(),
            Key::Up if recall_index > 0 => {
                recall_index -= 1;
                expression = recall[recall_index].clone();
                cursor_pos = expression.chars().count();
            }
            Key::Down => {
                if recall_index + 1 < recall.len() {
                    recall_index += 1;
                    expression = recall[recall_index].clone();
                } else {
                    recall_index = recall.len();
                    expression.clear();
                }
                cursor_pos = expression.chars().count();
            }
            _ => {}
        }
    }
}

/// Every kept history entry, oldest first, one per terminal line.
fn history_listing(calc: &CalculatorState) -> String {
    if calc.history().is_empty() {
        return "  (no history)\r\n".to_string();
    }
    calc.history()
        .iter()
        .enumerate()
        .map(|(i, entry)| format!("  {:>3}: {}\r\n", i + 1, entry.line()))
        .collect()
}

fn remove_char_at(s: &mut String, char_index: usize) {
    let byte_idx = char_index_to_byte_index(s, char_index);
    if let Some(c) = s[byte_idx..].chars().next() {
        s.drain(byte_idx..byte_idx + c.len_utf8());
    }
}
