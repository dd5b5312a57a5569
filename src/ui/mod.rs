//! Operator-facing UI contract.
//!
//! Menus and progress reporters depend on the `Ui` trait only, so tests can
//! substitute a scripted implementation for the terminal.

pub mod terminal;

use crate::error::PromptError;
pub use crate::tui::progress::ProgressHandle;
pub use terminal::TerminalUi;

/// Injectable rendering and prompting interface.
pub trait Ui: Send + Sync {
    /// Render the startup logo and version line.
    fn show_logo(&self);
    fn show_info(&self, message: &str);
    fn show_success(&self, message: &str);
    fn show_error(&self, message: &str);
    /// Ask the operator to pick one of `labels`; returns its 0-based index.
    fn ask_choice(&self, message: &str, labels: &[String]) -> Result<usize, PromptError>;
    /// Ask for free text.
    fn ask_text(&self, prompt: &str) -> Result<String, PromptError>;
    /// Start a spinner; it stops when the handle is finished or dropped.
    fn spinner(&self, label: &str) -> ProgressHandle;
}

/// One labelled entry of a menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuOption<A> {
    pub label: String,
    pub action: A,
}

impl<A> MenuOption<A> {
    pub fn new(label: impl Into<String>, action: A) -> Self {
        Self {
            label: label.into(),
            action,
        }
    }
}

/// Present `options` and return the chosen action.
pub fn choose<A: Clone>(
    ui: &dyn Ui,
    message: &str,
    options: &[MenuOption<A>],
) -> Result<A, PromptError> {
    let labels = options
        .iter()
        .map(|option| option.label.clone())
        .collect::<Vec<_>>();
    let index = ui.ask_choice(message, &labels)?;
    options
        .get(index)
        .map(|option| option.action.clone())
        .ok_or(PromptError::Closed)
}
