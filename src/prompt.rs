//! The prompt capability every step resolver talks to.
//!
//! Steps never touch the terminal directly. They describe a prompt (a list of
//! labelled, possibly disabled options, a yes/no question, or a number) and a
//! [`Prompter`] answers it. Every answer is either [`Selection::Chosen`] or
//! [`Selection::Cancelled`], so an operator backing out of a prompt is never
//! confused with a deliberate empty selection.
//!
//! Two prompters ship with the crate:
//!
//! - [`CliPrompter`]: line-based terminal prompts, reading through an
//!   [`InputManager`] so sessions can be recorded and replayed.
//! - [`ScriptedPrompter`]: answers from a script, recording every prompt it
//!   was shown. Used by tests.

use crate::input::InputManager;
use std::collections::VecDeque;
use std::io::{self, Write};
use thiserror::Error;

// ============================================================================
// Prompt Types
// ============================================================================

/// The answer to a prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection<T> {
    Chosen(T),
    /// The operator dismissed the prompt.
    Cancelled,
}

impl<T> Selection<T> {
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Selection<U> {
        match self {
            Selection::Chosen(value) => Selection::Chosen(f(value)),
            Selection::Cancelled => Selection::Cancelled,
        }
    }

    pub fn chosen(self) -> Option<T> {
        match self {
            Selection::Chosen(value) => Some(value),
            Selection::Cancelled => None,
        }
    }
}

/// One entry of a selection prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptOption {
    pub label: String,
    /// Disabled options are shown but cannot be picked.
    pub disabled: bool,
    /// Preselected in a multi-select prompt.
    pub selected: bool,
}

impl PromptOption {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            disabled: false,
            selected: false,
        }
    }
}

/// How many entries a multi-select prompt accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectBounds {
    pub min: usize,
    pub max: usize,
}

impl SelectBounds {
    pub fn new(min: usize, max: usize) -> Self {
        Self { min, max }
    }

    pub fn at_least(min: usize) -> Self {
        Self {
            min,
            max: usize::MAX,
        }
    }

    pub fn exactly(count: usize) -> Self {
        Self {
            min: count,
            max: count,
        }
    }

    pub fn contains(&self, count: usize) -> bool {
        count >= self.min && count <= self.max
    }
}

/// Status line for a multi-select prompt, computed from the picked indices.
pub type SelectStatus<'a> = &'a dyn Fn(&[usize]) -> String;

/// Status line for a number prompt, computed from the entered value.
pub type NumberStatus<'a> = &'a dyn Fn(i32) -> String;

#[derive(Debug, Error)]
pub enum PromptError {
    #[error("prompt input failed: {0}")]
    Io(#[from] io::Error),
    #[error("no scripted answer left for prompt \"{message}\"")]
    ScriptExhausted { message: String },
    #[error("scripted answer rejected by prompt \"{message}\": {reason}")]
    InvalidAnswer { message: String, reason: String },
}

/// Something that can put a question to the operator.
pub trait Prompter {
    /// Pick one enabled option by index.
    fn select_one(
        &mut self,
        message: &str,
        options: &[PromptOption],
    ) -> Result<Selection<usize>, PromptError>;

    /// Pick between `bounds.min` and `bounds.max` enabled options.
    fn select_many(
        &mut self,
        message: &str,
        options: &[PromptOption],
        bounds: SelectBounds,
        status: Option<SelectStatus<'_>>,
    ) -> Result<Selection<Vec<usize>>, PromptError>;

    fn confirm(&mut self, message: &str, default: bool) -> Result<Selection<bool>, PromptError>;

    fn enter_number(
        &mut self,
        message: &str,
        default: i32,
        status: Option<NumberStatus<'_>>,
    ) -> Result<Selection<i32>, PromptError>;

    /// Show a message that needs no answer.
    fn notify(&mut self, message: &str) -> Result<(), PromptError>;
}

// ============================================================================
// Typed Choices
// ============================================================================

/// Prompt options paired with the values they stand for.
#[derive(Debug, Clone)]
pub struct Choices<T> {
    options: Vec<PromptOption>,
    values: Vec<T>,
}

impl<T> Default for Choices<T> {
    fn default() -> Self {
        Self {
            options: Vec::new(),
            values: Vec::new(),
        }
    }
}

impl<T: Clone> Choices<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, label: impl Into<String>, value: T, disabled: bool) {
        self.options.push(PromptOption {
            label: label.into(),
            disabled,
            selected: false,
        });
        self.values.push(value);
    }

    /// Push an option that starts out picked in a multi-select prompt.
    pub fn push_selected(&mut self, label: impl Into<String>, value: T, disabled: bool) {
        self.options.push(PromptOption {
            label: label.into(),
            disabled,
            selected: true,
        });
        self.values.push(value);
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    /// Whether no option can be picked.
    pub fn all_disabled(&self) -> bool {
        self.options.iter().all(|option| option.disabled)
    }

    pub fn options(&self) -> &[PromptOption] {
        &self.options
    }

    pub fn values(&self) -> &[T] {
        &self.values
    }

    fn values_at(&self, indices: &[usize]) -> Vec<T> {
        indices
            .iter()
            .filter_map(|&index| self.values.get(index).cloned())
            .collect()
    }
}

/// Ask for one value out of `choices`.
pub fn select_value<T: Clone>(
    prompter: &mut dyn Prompter,
    message: &str,
    choices: &Choices<T>,
) -> Result<Selection<T>, PromptError> {
    let selection = prompter.select_one(message, choices.options())?;
    Ok(match selection {
        Selection::Chosen(index) => match choices.values.get(index) {
            Some(value) => Selection::Chosen(value.clone()),
            None => {
                return Err(PromptError::InvalidAnswer {
                    message: message.to_string(),
                    reason: format!("index {} out of range", index),
                });
            }
        },
        Selection::Cancelled => Selection::Cancelled,
    })
}

/// Ask for several values out of `choices`, with a status line computed from
/// the values picked so far.
pub fn select_values<T: Clone>(
    prompter: &mut dyn Prompter,
    message: &str,
    choices: &Choices<T>,
    bounds: SelectBounds,
    status: Option<&dyn Fn(&[T]) -> String>,
) -> Result<Selection<Vec<T>>, PromptError> {
    let index_status = |indices: &[usize]| match status {
        Some(status) => status(&choices.values_at(indices)),
        None => String::new(),
    };
    let index_status: Option<SelectStatus<'_>> = match status {
        Some(_) => Some(&index_status),
        None => None,
    };
    let selection = prompter.select_many(message, choices.options(), bounds, index_status)?;
    Ok(selection.map(|indices| choices.values_at(&indices)))
}

// ============================================================================
// Terminal Prompter
// ============================================================================

/// Typing this at any prompt dismisses it.
pub const BACK_COMMAND: &str = "back";

/// Line-based terminal prompter.
///
/// - select one: type an option index.
/// - select many: each line toggles the listed indices (comma separated) and
///   reprints the status line; an empty line commits.
/// - number: each line replaces the value and reprints the status line; an
///   empty line commits.
/// - confirm: `y` or `n`; an empty line takes the default.
pub struct CliPrompter<W: Write> {
    input: InputManager,
    out: W,
}

impl<W: Write> CliPrompter<W> {
    pub fn new(input: InputManager, out: W) -> Self {
        Self { input, out }
    }

    pub fn into_output(self) -> W {
        self.out
    }

    fn read_answer(&mut self) -> Result<Option<String>, PromptError> {
        write!(self.out, "> ")?;
        self.out.flush()?;
        let line = self.input.read_line()?;
        if self.input.is_replaying() {
            writeln!(self.out, "{}", line)?;
        }
        let line = line.trim().to_string();
        if line.eq_ignore_ascii_case(BACK_COMMAND) {
            return Ok(None);
        }
        Ok(Some(line))
    }

    fn print_options(&mut self, options: &[PromptOption], picked: Option<&[usize]>) -> io::Result<()> {
        for (index, option) in options.iter().enumerate() {
            let marker = match picked {
                Some(picked) if picked.contains(&index) => "[x] ",
                Some(_) => "[ ] ",
                None => "",
            };
            let disabled = if option.disabled { " [DISABLED]" } else { "" };
            writeln!(self.out, "  {}: {}{}{}", index, marker, option.label, disabled)?;
        }
        Ok(())
    }
}

impl<W: Write> Prompter for CliPrompter<W> {
    fn select_one(
        &mut self,
        message: &str,
        options: &[PromptOption],
    ) -> Result<Selection<usize>, PromptError> {
        writeln!(self.out, "{}", message)?;
        if options.is_empty() {
            writeln!(self.out, "  (nothing to select)")?;
            return Ok(Selection::Cancelled);
        }
        self.print_options(options, None)?;

        loop {
            let Some(line) = self.read_answer()? else {
                return Ok(Selection::Cancelled);
            };
            match line.parse::<usize>() {
                Ok(index) if index < options.len() && !options[index].disabled => {
                    return Ok(Selection::Chosen(index));
                }
                Ok(index) if index < options.len() => {
                    writeln!(self.out, "Option {} is disabled.", index)?;
                }
                _ => writeln!(
                    self.out,
                    "Enter an option index, or '{}' to go back.",
                    BACK_COMMAND
                )?,
            }
        }
    }

    fn select_many(
        &mut self,
        message: &str,
        options: &[PromptOption],
        bounds: SelectBounds,
        status: Option<SelectStatus<'_>>,
    ) -> Result<Selection<Vec<usize>>, PromptError> {
        writeln!(self.out, "{}", message)?;
        if options.is_empty() {
            writeln!(self.out, "  (nothing to select)")?;
            return Ok(Selection::Cancelled);
        }

        let mut picked: Vec<usize> = options
            .iter()
            .enumerate()
            .filter(|(_, option)| option.selected && !option.disabled)
            .map(|(index, _)| index)
            .collect();

        loop {
            self.print_options(options, Some(&picked))?;
            if let Some(status) = status {
                writeln!(self.out, "{}", status(&picked))?;
            }

            let Some(line) = self.read_answer()? else {
                return Ok(Selection::Cancelled);
            };

            if line.is_empty() {
                if bounds.contains(picked.len()) {
                    return Ok(Selection::Chosen(picked));
                }
                if picked.len() < bounds.min {
                    writeln!(self.out, "Select at least {} option(s).", bounds.min)?;
                } else {
                    writeln!(self.out, "Select at most {} option(s).", bounds.max)?;
                }
                continue;
            }

            for part in line.split(',') {
                let part = part.trim();
                match part.parse::<usize>() {
                    Ok(index) if index < options.len() && !options[index].disabled => {
                        if let Some(position) = picked.iter().position(|&p| p == index) {
                            picked.remove(position);
                        } else {
                            picked.push(index);
                            picked.sort_unstable();
                        }
                    }
                    Ok(index) if index < options.len() => {
                        writeln!(self.out, "Option {} is disabled.", index)?;
                    }
                    _ => writeln!(self.out, "Invalid input: {}", part)?,
                }
            }
        }
    }

    fn confirm(&mut self, message: &str, default: bool) -> Result<Selection<bool>, PromptError> {
        let hint = if default { "Y/n" } else { "y/N" };
        writeln!(self.out, "{} ({})", message, hint)?;
        loop {
            let Some(line) = self.read_answer()? else {
                return Ok(Selection::Cancelled);
            };
            match line.to_lowercase().as_str() {
                "" => return Ok(Selection::Chosen(default)),
                "y" | "yes" => return Ok(Selection::Chosen(true)),
                "n" | "no" => return Ok(Selection::Chosen(false)),
                _ => writeln!(self.out, "Please enter 'y' or 'n'.")?,
            }
        }
    }

    fn enter_number(
        &mut self,
        message: &str,
        default: i32,
        status: Option<NumberStatus<'_>>,
    ) -> Result<Selection<i32>, PromptError> {
        writeln!(self.out, "{}", message)?;
        let mut value = default;
        loop {
            match status {
                Some(status) => writeln!(self.out, "{} {}", value, status(value))?,
                None => writeln!(self.out, "{}", value)?,
            }
            let Some(line) = self.read_answer()? else {
                return Ok(Selection::Cancelled);
            };
            if line.is_empty() {
                return Ok(Selection::Chosen(value));
            }
            match line.parse::<i32>() {
                Ok(entered) => value = entered,
                Err(_) => writeln!(self.out, "Please enter a whole number.")?,
            }
        }
    }

    fn notify(&mut self, message: &str) -> Result<(), PromptError> {
        writeln!(self.out, "{}", message)?;
        Ok(())
    }
}

// ============================================================================
// Scripted Prompter
// ============================================================================

/// A scripted answer to the next prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    /// Pick one option by index.
    Pick(usize),
    /// Pick exactly these options by index.
    PickMany(Vec<usize>),
    Confirm(bool),
    Number(i32),
    /// Accept the prompt's default (confirm, number, or preselection).
    Default,
    /// Dismiss the prompt.
    Cancel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    SelectOne,
    SelectMany,
    Confirm,
    Number,
}

/// A prompt the scripted prompter was shown, with the status line computed
/// for the answer it gave.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShownPrompt {
    pub kind: PromptKind,
    pub message: String,
    pub options: Vec<PromptOption>,
    pub status: Option<String>,
}

/// Answers prompts from a fixed script and records what it was asked.
///
/// Prompts with no options are dismissed without consuming an answer, the
/// way a terminal select with nothing to pick returns immediately.
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    answers: VecDeque<Answer>,
    shown: Vec<ShownPrompt>,
    notices: Vec<String>,
}

impl ScriptedPrompter {
    pub fn new(answers: impl IntoIterator<Item = Answer>) -> Self {
        Self {
            answers: answers.into_iter().collect(),
            ..Default::default()
        }
    }

    pub fn shown(&self) -> &[ShownPrompt] {
        &self.shown
    }

    pub fn notices(&self) -> &[String] {
        &self.notices
    }

    pub fn remaining(&self) -> usize {
        self.answers.len()
    }

    fn next_answer(&mut self, message: &str) -> Result<Answer, PromptError> {
        self.answers
            .pop_front()
            .ok_or_else(|| PromptError::ScriptExhausted {
                message: message.to_string(),
            })
    }

    fn record(&mut self, kind: PromptKind, message: &str, options: &[PromptOption]) {
        self.shown.push(ShownPrompt {
            kind,
            message: message.to_string(),
            options: options.to_vec(),
            status: None,
        });
    }

    fn set_status(&mut self, status: String) {
        if let Some(last) = self.shown.last_mut() {
            last.status = Some(status);
        }
    }
}

fn rejected(message: &str, reason: impl Into<String>) -> PromptError {
    PromptError::InvalidAnswer {
        message: message.to_string(),
        reason: reason.into(),
    }
}

fn check_pickable(message: &str, options: &[PromptOption], index: usize) -> Result<(), PromptError> {
    match options.get(index) {
        None => Err(rejected(message, format!("index {} out of range", index))),
        Some(option) if option.disabled => {
            Err(rejected(message, format!("option {} is disabled", index)))
        }
        Some(_) => Ok(()),
    }
}

impl Prompter for ScriptedPrompter {
    fn select_one(
        &mut self,
        message: &str,
        options: &[PromptOption],
    ) -> Result<Selection<usize>, PromptError> {
        self.record(PromptKind::SelectOne, message, options);
        if options.is_empty() {
            return Ok(Selection::Cancelled);
        }
        match self.next_answer(message)? {
            Answer::Pick(index) => {
                check_pickable(message, options, index)?;
                Ok(Selection::Chosen(index))
            }
            Answer::Cancel => Ok(Selection::Cancelled),
            other => Err(rejected(message, format!("{:?} does not answer a select", other))),
        }
    }

    fn select_many(
        &mut self,
        message: &str,
        options: &[PromptOption],
        bounds: SelectBounds,
        status: Option<SelectStatus<'_>>,
    ) -> Result<Selection<Vec<usize>>, PromptError> {
        self.record(PromptKind::SelectMany, message, options);
        if options.is_empty() {
            return Ok(Selection::Cancelled);
        }
        let mut picked = match self.next_answer(message)? {
            Answer::PickMany(indices) => {
                for &index in &indices {
                    check_pickable(message, options, index)?;
                }
                indices
            }
            Answer::Default => options
                .iter()
                .enumerate()
                .filter(|(_, option)| option.selected && !option.disabled)
                .map(|(index, _)| index)
                .collect(),
            Answer::Cancel => return Ok(Selection::Cancelled),
            other => {
                return Err(rejected(
                    message,
                    format!("{:?} does not answer a multi-select", other),
                ));
            }
        };
        picked.sort_unstable();
        picked.dedup();
        if !bounds.contains(picked.len()) {
            return Err(rejected(
                message,
                format!(
                    "{} picks outside {}..={}",
                    picked.len(),
                    bounds.min,
                    bounds.max
                ),
            ));
        }
        if let Some(status) = status {
            self.set_status(status(&picked));
        }
        Ok(Selection::Chosen(picked))
    }

    fn confirm(&mut self, message: &str, default: bool) -> Result<Selection<bool>, PromptError> {
        self.record(PromptKind::Confirm, message, &[]);
        match self.next_answer(message)? {
            Answer::Confirm(value) => Ok(Selection::Chosen(value)),
            Answer::Default => Ok(Selection::Chosen(default)),
            Answer::Cancel => Ok(Selection::Cancelled),
            other => Err(rejected(message, format!("{:?} does not answer a confirm", other))),
        }
    }

    fn enter_number(
        &mut self,
        message: &str,
        default: i32,
        status: Option<NumberStatus<'_>>,
    ) -> Result<Selection<i32>, PromptError> {
        self.record(PromptKind::Number, message, &[]);
        let value = match self.next_answer(message)? {
            Answer::Number(value) => value,
            Answer::Default => default,
            Answer::Cancel => return Ok(Selection::Cancelled),
            other => {
                return Err(rejected(
                    message,
                    format!("{:?} does not answer a number prompt", other),
                ));
            }
        };
        if let Some(status) = status {
            self.set_status(status(value));
        }
        Ok(Selection::Chosen(value))
    }

    fn notify(&mut self, message: &str) -> Result<(), PromptError> {
        self.notices.push(message.to_string());
        Ok(())
    }
}
