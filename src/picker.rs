//! Manual model selection for files the detector could not classify.
//!
//! The batch workflow asks a [`ModelPicker`] and gets back either a canonical
//! model name or [`ManualChoice::Cancelled`], which always means "skip this
//! file". Two pickers ship with the binary:
//!
//! - [`PromptPicker`]: numbered catalog menu on stderr, answer read from stdin.
//!   The operator types a number or an exact model name; an empty line or end
//!   of input cancels.
//! - [`NoPrompt`]: cancels every request, for unattended runs.

use std::io::{self, BufRead, Write};

use crate::catalog::Catalog;
use crate::types::ManualChoice;

/// Collaborator consulted when detection fails.
pub trait ModelPicker {
    fn request_model(&mut self, filename: &str, catalog: &Catalog) -> ManualChoice;
}

/// Picker for unattended runs: every undetected file is skipped.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoPrompt;

impl ModelPicker for NoPrompt {
    fn request_model(&mut self, _filename: &str, _catalog: &Catalog) -> ManualChoice {
        ManualChoice::Cancelled
    }
}

/// Result of reading one answer line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    Choice(ManualChoice),
    Invalid(String),
}

/// Interpret one line typed by the operator.
///
/// A 1-based menu number or an exact model name selects; a blank line
/// cancels; anything else is invalid.
pub fn parse_answer(line: &str, catalog: &Catalog) -> Answer {
    let answer = line.trim();
    if answer.is_empty() {
        return Answer::Choice(ManualChoice::Cancelled);
    }
    if let Ok(n) = answer.parse::<usize>() {
        return match n.checked_sub(1).and_then(|i| catalog.devices().get(i)) {
            Some(device) => Answer::Choice(ManualChoice::Selected(device.name.clone())),
            None => Answer::Invalid(format!("{n} is not in the list")),
        };
    }
    match catalog.get(answer) {
        Some(device) => Answer::Choice(ManualChoice::Selected(device.name.clone())),
        None => Answer::Invalid(format!("unknown model {answer:?}")),
    }
}

/// Menu lines shown before asking.
pub fn format_menu(filename: &str, catalog: &Catalog) -> Vec<String> {
    let mut lines = vec![format!("Could not auto-detect model for: {filename}")];
    let width = catalog.len().to_string().len();
    for (i, device) in catalog.devices().iter().enumerate() {
        lines.push(format!(
            "  {:>width$}. {} ({}cm)",
            i + 1,
            device.name,
            device.width_cm
        ));
    }
    lines
}

pub const PROMPT: &str = "Select model (number or name, empty to skip): ";

/// Interactive picker over any line reader and writer.
pub struct PromptPicker<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> PromptPicker<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn ask(&mut self, filename: &str, catalog: &Catalog) -> io::Result<ManualChoice> {
        for line in format_menu(filename, catalog) {
            writeln!(self.output, "{line}")?;
        }
        loop {
            write!(self.output, "{PROMPT}")?;
            self.output.flush()?;
            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                return Ok(ManualChoice::Cancelled);
            }
            match parse_answer(&line, catalog) {
                Answer::Choice(choice) => return Ok(choice),
                Answer::Invalid(reason) => writeln!(self.output, "  {reason}")?,
            }
        }
    }
}

impl PromptPicker<io::StdinLock<'static>, io::Stderr> {
    /// Menu on stderr so stdout stays clean for the progress lines.
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stderr())
    }
}

impl<R: BufRead, W: Write> ModelPicker for PromptPicker<R, W> {
    fn request_model(&mut self, filename: &str, catalog: &Catalog) -> ManualChoice {
        // A broken terminal is treated like the operator walking away.
        self.ask(filename, catalog)
            .unwrap_or(ManualChoice::Cancelled)
    }
}
