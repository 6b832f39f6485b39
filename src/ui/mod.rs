//! User interface module - interaction (prompts) and formatting.
//!
//! Separates concerns:
//! - `formatter` - Pure formatting functions
//! - This module - Interactive prompts and user input handling

use std::io::{self, BufRead, Write};
use std::time::Duration;

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};

pub mod formatter;

// Re-export formatter functions for convenience
pub use formatter::{
    display_boundary_warning, display_done, display_error, display_manual_push_instruction,
    display_release_commits, display_release_summary, display_status, display_success,
};

/// Source of yes/no answers for the release workflow.
pub trait Prompter {
    /// Ask `prompt`; `default` is the answer for an empty reply.
    fn confirm(&mut self, prompt: &str, default: bool) -> Result<bool>;
}

/// Prompts on the terminal and reads answers from stdin.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn confirm(&mut self, prompt: &str, default: bool) -> Result<bool> {
        let stdin = io::stdin();
        let mut stdout = io::stdout();
        confirm_with(&mut stdin.lock(), &mut stdout, prompt, default)
    }
}

/// Transient progress indicator for a slow step.
///
/// The spinner line is cleared when the step ends; [Spinner::succeed] then
/// prints a persistent success line. Dropping an unfinished spinner (for
/// example on an early `?` return) clears it as well. Nothing is drawn when
/// stderr is not a terminal.
pub struct Spinner {
    bar: ProgressBar,
}

impl Spinner {
    /// Start spinning with `message`
    pub fn start(message: impl Into<String>) -> Self {
        let bar = ProgressBar::new_spinner();
        bar.set_style(ProgressStyle::default_spinner().tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ "));
        bar.set_message(message.into());
        bar.enable_steady_tick(Duration::from_millis(80));
        Spinner { bar }
    }

    /// Stop the spinner and print `message` as a success line
    pub fn succeed(self, message: &str) {
        self.bar.finish_and_clear();
        display_success(message);
    }

    /// Stop the spinner without printing anything
    pub fn clear(self) {
        self.bar.finish_and_clear();
    }
}

impl Drop for Spinner {
    fn drop(&mut self) {
        if !self.bar.is_finished() {
            self.bar.finish_and_clear();
        }
    }
}

/// Prompts user to confirm an action with a yes/no prompt.
///
/// Accepts "y"/"yes" and "n"/"no" (case-insensitive). Empty input, end of
/// input, or anything else yields `default`.
///
/// # Arguments
/// * `input` - Where the answer is read from
/// * `output` - Where the prompt is written to
/// * `prompt` - The prompt message (without the "(y/N): " suffix)
/// * `default` - Answer used for an empty reply
pub fn confirm_with<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    prompt: &str,
    default: bool,
) -> Result<bool> {
    let hint = if default { "(Y/n)" } else { "(y/N)" };
    write!(output, "{} {}: ", prompt, hint)?;
    output.flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;

    Ok(match answer.trim().to_lowercase().as_str() {
        "y" | "yes" => true,
        "n" | "no" => false,
        _ => default,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn answer(reply: &str, default: bool) -> (bool, String) {
        let mut input = reply.as_bytes();
        let mut output = Vec::new();
        let result = confirm_with(&mut input, &mut output, "Proceed?", default).unwrap();
        (result, String::from_utf8(output).unwrap())
    }

    #[test]
    fn test_confirm_yes() {
        assert!(answer("y\n", false).0);
        assert!(answer("YES\n", false).0);
    }

    #[test]
    fn test_confirm_no() {
        assert!(!answer("n\n", true).0);
        assert!(!answer("No\n", true).0);
    }

    #[test]
    fn test_confirm_empty_uses_default() {
        assert!(!answer("\n", false).0);
        assert!(answer("\n", true).0);
        assert!(!answer("", false).0);
    }

    #[test]
    fn test_spinner_finishes_on_every_path() {
        let spinner = Spinner::start("working");
        assert!(!spinner.bar.is_finished());
        spinner.succeed("done");

        Spinner::start("cancelled").clear();

        let dropped = Spinner::start("interrupted");
        let bar = dropped.bar.clone();
        drop(dropped);
        assert!(bar.is_finished());
    }

    #[test]
    fn test_confirm_prompt_shows_default() {
        assert_eq!(answer("\n", false).1, "Proceed? (y/N): ");
        assert_eq!(answer("\n", true).1, "Proceed? (Y/n): ");
    }
}
