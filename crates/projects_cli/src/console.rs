//! Line-oriented prompt helpers over any `BufRead`/`Write` pair.
//!
//! # Invariants
//! - Input is trimmed; a blank line is reported as `None`.
//! - A line that is not UTF-8 is reported and the prompt is re-issued.
//! - Malformed numbers are reported and the same prompt is re-issued.
//! - End of input surfaces as `ShellError::InputClosed`.

use crate::shell::{ShellError, ShellResult};
use projects_core::{is_valid_difficulty, Decimal, DIFFICULTY_MAX, DIFFICULTY_MIN};
use std::fmt::Display;
use std::io::{BufRead, Write};

pub struct Console<I, O> {
    input: I,
    output: O,
}

impl<I: BufRead, O: Write> Console<I, O> {
    pub fn new(input: I, output: O) -> Self {
        Self { input, output }
    }

    #[cfg(test)]
    pub fn into_output(self) -> O {
        self.output
    }

    /// Writes one line of output.
    pub fn say(&mut self, text: impl Display) -> ShellResult<()> {
        writeln!(self.output, "{text}")?;
        Ok(())
    }

    /// Prompts for free text; blank input yields `None`.
    pub fn read_text(&mut self, prompt: &str) -> ShellResult<Option<String>> {
        loop {
            write!(self.output, "{prompt}: ")?;
            self.output.flush()?;

            let mut raw = Vec::new();
            if self.input.read_until(b'\n', &mut raw)? == 0 {
                return Err(ShellError::InputClosed);
            }

            match String::from_utf8(raw) {
                Ok(line) => {
                    let trimmed = line.trim();
                    return Ok((!trimmed.is_empty()).then(|| trimmed.to_string()));
                }
                Err(_) => self.say("Input is not valid UTF-8 text.")?,
            }
        }
    }

    /// Prompts until non-blank text is entered.
    pub fn read_required_text(&mut self, prompt: &str) -> ShellResult<String> {
        loop {
            if let Some(text) = self.read_text(prompt)? {
                return Ok(text);
            }
            self.say("A value is required.")?;
        }
    }

    /// Prompts for an integer; blank yields `None`.
    pub fn read_int(&mut self, prompt: &str) -> ShellResult<Option<i64>> {
        loop {
            let Some(text) = self.read_text(prompt)? else {
                return Ok(None);
            };
            match text.parse::<i64>() {
                Ok(value) => return Ok(Some(value)),
                Err(_) => self.say(format!("{text} is not a valid number"))?,
            }
        }
    }

    /// Prompts for a two-place decimal; blank yields `None`.
    pub fn read_decimal(&mut self, prompt: &str) -> ShellResult<Option<Decimal>> {
        loop {
            let Some(text) = self.read_text(prompt)? else {
                return Ok(None);
            };
            match text.parse::<Decimal>() {
                Ok(value) => return Ok(Some(value)),
                Err(err) => self.say(err)?,
            }
        }
    }

    /// Prompts until a difficulty within range is entered.
    pub fn read_difficulty(&mut self, prompt: &str) -> ShellResult<i32> {
        loop {
            if let Some(value) = self.read_difficulty_or_blank(prompt)? {
                return Ok(value);
            }
            self.say("A difficulty is required.")?;
        }
    }

    /// Like [`Console::read_difficulty`], but blank input yields `None`.
    pub fn read_difficulty_or_blank(&mut self, prompt: &str) -> ShellResult<Option<i32>> {
        loop {
            let Some(value) = self.read_int(prompt)? else {
                return Ok(None);
            };
            match i32::try_from(value) {
                Ok(difficulty) if is_valid_difficulty(difficulty) => return Ok(Some(difficulty)),
                _ => self.say(format!(
                    "Error, {value} is not a value between {DIFFICULTY_MIN} and {DIFFICULTY_MAX}, inclusive."
                ))?,
            }
        }
    }
}
