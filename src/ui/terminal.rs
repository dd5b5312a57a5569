//! Terminal implementation of the `Ui` trait (stdout/stdin + crossterm).

use std::io::{self, Write};

use crossterm::style::Stylize;

use super::Ui;
use crate::build_info;
use crate::error::PromptError;
use crate::tui::boxes::{render_box, render_choices};
use crate::tui::input::{parse_choice, read_line};
use crate::tui::progress::{start_progress, ProgressHandle};
use crate::tui::settings;

/// Default interactive UI.
#[derive(Debug, Clone, Copy)]
pub struct TerminalUi {
    color: bool,
}

impl TerminalUi {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    fn print(&self, text: &str) {
        let mut out = io::stdout().lock();
        let _ = write!(out, "{text}");
        let _ = out.flush();
    }

    fn prompt_symbol(&self) -> String {
        if self.color {
            settings::PROMPT_SYMBOL
                .with(settings::COLOR_PROMPT_SYMBOL)
                .to_string()
        } else {
            settings::PROMPT_SYMBOL.to_string()
        }
    }
}

impl Ui for TerminalUi {
    fn show_logo(&self) {
        let meta = build_info::startup_metadata_line();
        if self.color {
            self.print(&format!(
                "{}\n{}{}\n\n",
                settings::LOGO.with(settings::COLOR_LOGO),
                settings::INDENT_1,
                meta.as_str().with(settings::COLOR_METADATA)
            ));
        } else {
            self.print(&format!("{}\n{}{meta}\n\n", settings::LOGO, settings::INDENT_1));
        }
    }

    fn show_info(&self, message: &str) {
        self.print(&render_box(
            settings::TITLE_INFO,
            message,
            settings::COLOR_INFO,
            self.color,
        ));
    }

    fn show_success(&self, message: &str) {
        self.print(&render_box(
            settings::TITLE_SUCCESS,
            message,
            settings::COLOR_SUCCESS,
            self.color,
        ));
    }

    fn show_error(&self, message: &str) {
        self.print(&render_box(
            settings::TITLE_ERROR,
            message,
            settings::COLOR_ERROR,
            self.color,
        ));
    }

    fn ask_choice(&self, message: &str, labels: &[String]) -> Result<usize, PromptError> {
        self.print(&format!("{message}\n{}", render_choices(labels, self.color)));
        let prompt = format!("{} {}", settings::PROMPT_CHOICE_HINT, self.prompt_symbol());
        loop {
            let raw = read_line(&mut io::stdin().lock(), &mut io::stdout(), &prompt)?;
            if let Some(index) = parse_choice(&raw, labels.len()) {
                return Ok(index);
            }
            self.print(&format!("{}\n", settings::PROMPT_INVALID_CHOICE));
        }
    }

    fn ask_text(&self, prompt: &str) -> Result<String, PromptError> {
        let prompt = format!("{prompt} {}", self.prompt_symbol());
        read_line(&mut io::stdin().lock(), &mut io::stdout(), &prompt)
    }

    fn spinner(&self, label: &str) -> ProgressHandle {
        start_progress(label, self.color)
    }
}
