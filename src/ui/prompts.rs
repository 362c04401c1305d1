//! ui::prompts
//!
//! Terminal-backed implementation of the resolver's prompt collaborator.
//!
//! # Design
//!
//! Prompts are only issued by the resolver, and only in interactive mode.
//! Secret prompts go through `rpassword`, which disables terminal echo and
//! restores it on every exit path, including interrupts.

use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

use crate::resolve::{PromptError, PromptOptions, Prompter};

/// Prompter that reads answers from the controlling terminal.
#[derive(Debug, Default)]
pub struct TerminalPrompter;

impl TerminalPrompter {
    pub fn new() -> Self {
        Self
    }
}

impl Prompter for TerminalPrompter {
    fn prompt(
        &mut self,
        message: &str,
        options: &PromptOptions<'_>,
    ) -> Result<Option<String>, PromptError> {
        if !options.echo {
            let answer = rpassword::prompt_password(format!("{}: ", message))
                .map_err(|e| PromptError::Io(e.to_string()))?;
            return Ok(Some(answer));
        }

        match options.default {
            Some(default) => print!("{} [{}]: ", message, default),
            None => print!("{}: ", message),
        }
        io::stdout()
            .flush()
            .map_err(|e| PromptError::Io(e.to_string()))?;

        let mut line = String::new();
        let read = io::stdin()
            .lock()
            .read_line(&mut line)
            .map_err(|e| PromptError::Io(e.to_string()))?;
        if read == 0 {
            // EOF: the operator closed stdin.
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }
}

/// One recorded prompt interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptRecord {
    /// The message shown to the operator.
    pub message: String,
    /// Whether the answer would have been echoed.
    pub echo: bool,
}

/// Prompter that replays canned answers and records every interaction.
///
/// Used for deterministic tests of anything that prompts. Once the canned
/// answers run out, further prompts see end-of-input.
///
/// # Example
///
/// ```
/// use stratus::resolve::{PromptOptions, Prompter};
/// use stratus::ui::prompts::ScriptedPrompter;
///
/// let mut prompter = ScriptedPrompter::new(&["staging"]);
/// let opts = PromptOptions { default: None, echo: true };
///
/// let answer = prompter.prompt("Space", &opts).unwrap();
/// assert_eq!(answer.as_deref(), Some("staging"));
///
/// // Exhausted: EOF
/// assert_eq!(prompter.prompt("Space", &opts).unwrap(), None);
/// assert_eq!(prompter.records().len(), 2);
/// ```
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    answers: VecDeque<String>,
    records: Vec<PromptRecord>,
}

impl ScriptedPrompter {
    /// Create a prompter that will answer with `answers`, in order.
    pub fn new(answers: &[&str]) -> Self {
        Self {
            answers: answers.iter().map(|s| s.to_string()).collect(),
            records: Vec::new(),
        }
    }

    /// Every prompt issued so far, in order.
    pub fn records(&self) -> &[PromptRecord] {
        &self.records
    }

    /// The messages of every prompt issued so far.
    pub fn messages(&self) -> Vec<&str> {
        self.records.iter().map(|r| r.message.as_str()).collect()
    }
}

impl Prompter for ScriptedPrompter {
    fn prompt(
        &mut self,
        message: &str,
        options: &PromptOptions<'_>,
    ) -> Result<Option<String>, PromptError> {
        self.records.push(PromptRecord {
            message: message.to_string(),
            echo: options.echo,
        });
        Ok(self.answers.pop_front())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scripted_prompter_replays_in_order() {
        let mut prompter = ScriptedPrompter::new(&["a", "b"]);
        let opts = PromptOptions {
            default: None,
            echo: true,
        };
        assert_eq!(
            prompter.prompt("First", &opts).unwrap().as_deref(),
            Some("a")
        );
        assert_eq!(
            prompter.prompt("Second", &opts).unwrap().as_deref(),
            Some("b")
        );
        assert_eq!(prompter.prompt("Third", &opts).unwrap(), None);
        assert_eq!(prompter.messages(), vec!["First", "Second", "Third"]);
    }

    #[test]
    fn scripted_prompter_records_echo_flag() {
        let mut prompter = ScriptedPrompter::new(&["hunter2"]);
        let opts = PromptOptions {
            default: None,
            echo: false,
        };
        prompter.prompt("Password", &opts).unwrap();
        assert!(!prompter.records()[0].echo);
    }
}
