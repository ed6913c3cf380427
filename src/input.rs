// Input helpers: validated reads from a line-oriented input stream.
// Every helper keeps prompting until it gets acceptable input, so callers
// never see a validation failure. The only error that escapes is a closed
// stream (`InputClosed`) or a broken output.

use anyhow::{Context, Result};
use crossterm::style::{style, Stylize};
use regex::Regex;
use std::fmt;
use std::io::{BufRead, Write};

/// Width of the banner printed by `pretty_header`.
pub const HEADER_WIDTH: usize = 60;
const HEADER_BORDER: &str = "***";

/// Returned when the input stream reaches end-of-file while a prompt is
/// waiting for an answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputClosed;

impl fmt::Display for InputClosed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("input stream closed")
    }
}

impl std::error::Error for InputClosed {}

/// Validated prompts over any reader/writer pair. The binary wires it to
/// stdin/stdout; tests use a `Cursor` and a `Vec<u8>`.
pub struct Prompter<R, W> {
    reader: R,
    writer: W,
    color: bool,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Prompter {
            reader,
            writer,
            color: false,
        }
    }

    /// Enable red error lines. Only worth turning on when the writer is a
    /// terminal.
    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    /// Access to the output side, used by the menu to print its own text.
    pub fn writer(&mut self) -> &mut W {
        &mut self.writer
    }

    pub fn into_writer(self) -> W {
        self.writer
    }

    /// Ask until the user types at least one character.
    pub fn non_empty_string(&mut self, prompt: &str) -> Result<String> {
        loop {
            let line = self.ask(&format!("{prompt}: "))?;
            if !line.is_empty() {
                return Ok(line);
            }
        }
    }

    pub fn integer(&mut self, prompt: &str) -> Result<i64> {
        loop {
            let line = self.ask(&format!("{prompt}: "))?;
            match line.trim().parse::<i64>() {
                Ok(value) => return Ok(value),
                Err(_) => self.print_error("Invalid input. Please enter an integer.")?,
            }
        }
    }

    pub fn double(&mut self, prompt: &str) -> Result<f64> {
        loop {
            let line = self.ask(&format!("{prompt}: "))?;
            match line.trim().parse::<f64>() {
                Ok(value) => return Ok(value),
                Err(_) => self.print_error("Invalid input. Please enter a number.")?,
            }
        }
    }

    /// Integer within `[low, high]` inclusive. Non-numeric and out-of-range
    /// answers get different messages.
    pub fn ranged_int(&mut self, prompt: &str, low: i64, high: i64) -> Result<i64> {
        loop {
            let line = self.ask(&format!("{prompt} [{low} - {high}]: "))?;
            match line.trim().parse::<i64>() {
                Ok(value) if (low..=high).contains(&value) => return Ok(value),
                Ok(_) => self.print_error(&format!(
                    "Input out of range. Please enter a number between {low} and {high}."
                ))?,
                Err(_) => self.print_error("Invalid input. Please enter an integer.")?,
            }
        }
    }

    pub fn ranged_double(&mut self, prompt: &str, low: f64, high: f64) -> Result<f64> {
        loop {
            let line = self.ask(&format!("{prompt} [{low:?} - {high:?}]: "))?;
            match line.trim().parse::<f64>() {
                Ok(value) if value >= low && value <= high => return Ok(value),
                Ok(_) => self.print_error(&format!(
                    "Input out of range. Please enter a number between {low:?} and {high:?}."
                ))?,
                Err(_) => self.print_error("Invalid input. Please enter a number.")?,
            }
        }
    }

    /// `Y` or `N`, either case. Returns true for yes.
    pub fn yes_no(&mut self, prompt: &str) -> Result<bool> {
        loop {
            let line = self.ask(&format!("{prompt} [Y/N]: "))?;
            if line.eq_ignore_ascii_case("y") {
                return Ok(true);
            }
            if line.eq_ignore_ascii_case("n") {
                return Ok(false);
            }
            self.print_error("Invalid input. Please enter Y or N.")?;
        }
    }

    /// Ask until the whole line matches `pattern`.
    pub fn regex_string(&mut self, prompt: &str, pattern: &str) -> Result<String> {
        let anchored = Regex::new(&format!("^(?:{pattern})$"))
            .with_context(|| format!("invalid input pattern `{pattern}`"))?;
        loop {
            let line = self.ask(&format!("{prompt}: "))?;
            if anchored.is_match(&line) {
                return Ok(line);
            }
            self.print_error(&format!(
                "Invalid input. Please enter a string that matches the pattern: {pattern}"
            ))?;
        }
    }

    pub fn print_header(&mut self, message: &str) -> Result<()> {
        writeln!(self.writer, "{}", pretty_header(message)).context("write header")?;
        Ok(())
    }

    /// Print the prompt on a fresh line and read one line back, without its
    /// terminator.
    fn ask(&mut self, prompt: &str) -> Result<String> {
        write!(self.writer, "\n{prompt}").context("write prompt")?;
        self.writer.flush().context("flush prompt")?;

        let mut line = String::new();
        let read = self
            .reader
            .read_line(&mut line)
            .context("read from input")?;
        if read == 0 {
            return Err(InputClosed.into());
        }
        if line.ends_with('\n') {
            line.pop();
            if line.ends_with('\r') {
                line.pop();
            }
        }
        Ok(line)
    }

    /// Print an error line, red when colour is enabled.
    pub fn print_error(&mut self, message: &str) -> Result<()> {
        let written = if self.color {
            writeln!(self.writer, "{}", style(message).red())
        } else {
            writeln!(self.writer, "{message}")
        };
        written.context("write message")?;
        Ok(())
    }
}

/// Three-line banner `HEADER_WIDTH` characters wide with `message` centered
/// between `***` borders. When the padding can't be split evenly the extra
/// space goes on the left. Messages too long to pad are printed unpadded.
pub fn pretty_header(message: &str) -> String {
    let rule = "*".repeat(HEADER_WIDTH);
    let room = HEADER_WIDTH.saturating_sub(message.chars().count() + 2 * HEADER_BORDER.len());
    let right = room / 2;
    let left = room - right;
    format!(
        "{rule}\n{HEADER_BORDER}{}{message}{}{HEADER_BORDER}\n{rule}",
        " ".repeat(left),
        " ".repeat(right)
    )
}
