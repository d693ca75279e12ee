//! Yes/no prompting on the console

use std::io::{self, IsTerminal, Write};
use tracing::{debug, warn};

/// Trait for yes/no prompting
pub trait UserPrompter: Send + Sync {
    /// Prompt for confirmation; empty input selects `default`
    fn prompt_yes_no(&self, message: &str, default: bool) -> bool;
}

/// Console prompter reading answers from stdin
///
/// When stdin is not a terminal the prompt is skipped and the default is
/// used, so scripted runs never block.
pub struct ConsolePrompter {
    auto_accept: bool,
}

impl Default for ConsolePrompter {
    fn default() -> Self {
        Self::new()
    }
}

impl ConsolePrompter {
    pub fn new() -> Self {
        Self { auto_accept: false }
    }

    pub fn auto_accept() -> Self {
        Self { auto_accept: true }
    }

    /// Format the prompt with the default answer capitalized
    pub fn format_prompt(message: &str, default: bool) -> String {
        let choices = if default { "[Y/n]" } else { "[y/N]" };
        format!("{message} {choices}: ")
    }

    fn read_line() -> io::Result<String> {
        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        Ok(input)
    }
}

impl UserPrompter for ConsolePrompter {
    fn prompt_yes_no(&self, message: &str, default: bool) -> bool {
        if self.auto_accept {
            debug!("Auto-accepting prompt: {}", message);
            return true;
        }
        if !io::stdin().is_terminal() {
            debug!("Non-interactive stdin, using default {} for: {}", default, message);
            return default;
        }

        print!("{}", Self::format_prompt(message, default));
        if let Err(e) = io::stdout().flush() {
            warn!("Failed to flush prompt: {}", e);
        }

        match Self::read_line() {
            Ok(input) => parse_yes_no(&input, default),
            Err(e) => {
                warn!("Failed to read answer, using default: {}", e);
                default
            }
        }
    }
}

/// Interpret a yes/no answer
///
/// Anything other than an explicit yes or no (including empty input)
/// selects the default.
pub fn parse_yes_no(input: &str, default: bool) -> bool {
    match input.trim().to_lowercase().as_str() {
        "y" | "yes" => true,
        "n" | "no" => false,
        _ => default,
    }
}
