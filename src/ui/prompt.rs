//! Interactive terminal prompts
//!
//! On a terminal, input is read in raw mode so Ctrl-C arrives as a key event
//! and becomes [`FlashError::Interrupted`] instead of killing the process.

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::terminal;
use std::io::{self, BufRead, IsTerminal, Write};

use crate::errors::{FlashError, Result};

/// Source of interactive answers from the user
pub trait Prompter {
    /// Read a secret without echoing it
    fn read_secret(&self, prompt: &str) -> Result<String>;

    /// Ask a yes/no question. Anything but `y`/`yes` is no.
    fn confirm(&self, prompt: &str) -> Result<bool>;
}

/// Prompter reading from the controlling terminal
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn read_secret(&self, prompt: &str) -> Result<String> {
        print!("{}", prompt);
        io::stdout().flush()?;
        read_line(false)
    }

    fn confirm(&self, prompt: &str) -> Result<bool> {
        print!("{} (y/n): ", prompt);
        io::stdout().flush()?;
        let answer = read_line(true)?;
        Ok(is_yes(&answer))
    }
}

fn read_line(echo: bool) -> Result<String> {
    if !io::stdin().is_terminal() {
        let mut line = String::new();
        io::stdin().lock().read_line(&mut line)?;
        return Ok(line.trim_end_matches(['\r', '\n']).to_string());
    }

    terminal::enable_raw_mode()?;
    let line = read_raw_line(echo);
    terminal::disable_raw_mode()?;
    println!();
    line
}

fn read_raw_line(echo: bool) -> Result<String> {
    let mut line = String::new();
    let mut stdout = io::stdout();
    loop {
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }
        match key.code {
            KeyCode::Enter => return Ok(line),
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                return Err(FlashError::Interrupted);
            }
            KeyCode::Esc => return Err(FlashError::Interrupted),
            KeyCode::Backspace => {
                if line.pop().is_some() && echo {
                    write!(stdout, "\u{8} \u{8}")?;
                    stdout.flush()?;
                }
            }
            KeyCode::Char(c) => {
                line.push(c);
                if echo {
                    write!(stdout, "{}", c)?;
                    stdout.flush()?;
                }
            }
            _ => {}
        }
    }
}

/// Interpret a y/n answer
pub fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_yes() {
        assert!(is_yes("y"));
        assert!(is_yes(" YES \n"));
        assert!(!is_yes(""));
        assert!(!is_yes("n"));
        assert!(!is_yes("yep"));
    }
}
