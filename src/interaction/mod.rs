//! User-facing output and confirmation
//!
//! All status messages and every overwrite decision go through
//! [`UserInteraction`]; the engine never prints or reads stdin directly.

pub mod display;
pub mod prompts;

pub use display::{ConsoleDisplay, MessageDisplay};
pub use prompts::{parse_yes_no, ConsolePrompter, UserPrompter};

use std::sync::Mutex;

/// Output and confirmation port
pub trait UserInteraction: Send + Sync {
    /// Ask a yes/no question, falling back to `default` on empty input
    fn confirm(&self, message: &str, default: bool) -> bool;

    /// Display information message
    fn display_info(&self, message: &str);

    /// Display warning message
    fn display_warning(&self, message: &str);

    /// Display error message
    fn display_error(&self, message: &str);
}

/// Console implementation of user interaction
pub struct DefaultUserInteraction {
    prompter: ConsolePrompter,
    display: ConsoleDisplay,
}

impl Default for DefaultUserInteraction {
    fn default() -> Self {
        Self::new()
    }
}

impl DefaultUserInteraction {
    pub fn new() -> Self {
        Self {
            prompter: ConsolePrompter::new(),
            display: ConsoleDisplay::new(),
        }
    }

    /// Answer every confirmation with "yes" without prompting
    pub fn auto_accept() -> Self {
        Self {
            prompter: ConsolePrompter::auto_accept(),
            display: ConsoleDisplay::new(),
        }
    }
}

impl UserInteraction for DefaultUserInteraction {
    fn confirm(&self, message: &str, default: bool) -> bool {
        self.prompter.prompt_yes_no(message, default)
    }

    fn display_info(&self, message: &str) {
        self.display.info(message);
    }

    fn display_warning(&self, message: &str) {
        self.display.warning(message);
    }

    fn display_error(&self, message: &str) {
        self.display.error(message);
    }
}

/// Recording interaction for tests
///
/// Messages are captured with a `PROMPT:`, `INFO:`, `WARN:` or `ERROR:`
/// prefix. Confirmations replay scripted answers in order and fall back to
/// the prompt's default once the script runs out.
#[derive(Default)]
pub struct MockUserInteraction {
    answers: Mutex<Vec<bool>>,
    messages: Mutex<Vec<String>>,
}

impl MockUserInteraction {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an answer for the next confirmation
    pub fn add_yes_no_response(&self, response: bool) {
        self.answers.lock().unwrap().insert(0, response);
    }

    pub fn get_messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }

    /// Messages recorded with the given prefix, prefix stripped
    pub fn messages_with(&self, prefix: &str) -> Vec<String> {
        let prefix = format!("{prefix}: ");
        self.get_messages()
            .into_iter()
            .filter_map(|m| m.strip_prefix(&prefix).map(str::to_string))
            .collect()
    }

    fn record(&self, message: String) {
        self.messages.lock().unwrap().push(message);
    }
}

impl UserInteraction for MockUserInteraction {
    fn confirm(&self, message: &str, default: bool) -> bool {
        self.record(format!("PROMPT: {message}"));
        self.answers.lock().unwrap().pop().unwrap_or(default)
    }

    fn display_info(&self, message: &str) {
        self.record(format!("INFO: {message}"));
    }

    fn display_warning(&self, message: &str) {
        self.record(format!("WARN: {message}"));
    }

    fn display_error(&self, message: &str) {
        self.record(format!("ERROR: {message}"));
    }
}
