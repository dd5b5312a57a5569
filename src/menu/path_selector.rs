//! Interactive directory browser.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use super::menu_loop::{LoopControl, MenuLoop, MenuPrompt};
use crate::error::PromptError;
use crate::ui::{choose, MenuOption, Ui};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PathAction {
    EnterPath,
    UpOne,
    DownOne,
    CreateFolder,
    Select,
    Cancel,
}

struct PathPrompt<'a> {
    ui: &'a dyn Ui,
    current: PathBuf,
    must_exist: bool,
    selected: Option<PathBuf>,
}

/// Browse from `start` and return the chosen directory, or `start` itself if
/// the operator cancels.
pub async fn select_path(
    ui: &dyn Ui,
    start: &Path,
    must_exist: bool,
) -> Result<PathBuf, PromptError> {
    let mut menu = MenuLoop::new(PathPrompt {
        ui,
        current: start.to_path_buf(),
        must_exist,
        selected: None,
    });
    menu.show_loop().await?;
    Ok(menu
        .into_inner()
        .selected
        .unwrap_or_else(|| start.to_path_buf()))
}

#[async_trait]
impl MenuPrompt for PathPrompt<'_> {
    async fn prompt(&mut self, control: &mut LoopControl) -> Result<(), PromptError> {
        self.ui.show_info(&format!(
            "Current path: [{}]\n{}",
            self.current.components().count(),
            self.current.display()
        ));

        let options = [
            MenuOption::new("Enter path", PathAction::EnterPath),
            MenuOption::new("Go up one", PathAction::UpOne),
            MenuOption::new("Go down one", PathAction::DownOne),
            MenuOption::new("Create new folder here", PathAction::CreateFolder),
            MenuOption::new("Select this path", PathAction::Select),
            MenuOption::new("Cancel", PathAction::Cancel),
        ];
        match choose(self.ui, "Select an option:", &options)? {
            PathAction::EnterPath => self.enter_path()?,
            PathAction::UpOne => self.up_one(),
            PathAction::DownOne => self.down_one()?,
            PathAction::CreateFolder => self.create_folder()?,
            PathAction::Select => {
                if self.must_exist && !self.current.is_dir() {
                    self.ui.show_error("Current path does not exist.");
                } else {
                    self.selected = Some(self.current.clone());
                    control.stop_loop();
                }
            }
            PathAction::Cancel => control.stop_loop(),
        }
        Ok(())
    }
}

impl PathPrompt<'_> {
    fn enter_path(&mut self) -> Result<(), PromptError> {
        let raw = self.ui.ask_text("Enter Path:")?;
        let raw = raw.trim();
        if raw.is_empty() {
            return Ok(());
        }
        let candidate = self.current.join(raw);
        if self.must_exist && !candidate.is_dir() {
            self.ui.show_error("The path does not exist.");
            return Ok(());
        }
        self.current = candidate;
        Ok(())
    }

    fn up_one(&mut self) {
        match self.current.parent() {
            Some(parent) if parent != self.current => self.current = parent.to_path_buf(),
            _ => self.ui.show_error("Already at the top of the path."),
        }
    }

    fn down_one(&mut self) -> Result<(), PromptError> {
        let subdirs = subdirectories(&self.current);
        if subdirs.is_empty() {
            self.ui.show_info("There are no subdirectories here.");
            return Ok(());
        }
        let index = self.ui.ask_choice("Select a subdir:", &subdirs)?;
        if let Some(name) = subdirs.get(index) {
            self.current.push(name);
        }
        Ok(())
    }

    fn create_folder(&mut self) -> Result<(), PromptError> {
        let name = self.ui.ask_text("Enter name:")?;
        let name = name.trim();
        if name.is_empty() {
            return Ok(());
        }
        if Path::new(name).components().count() != 1 {
            self.ui.show_error("Folder name must not contain path separators.");
            return Ok(());
        }
        let target = self.current.join(name);
        if let Err(err) = std::fs::create_dir_all(&target) {
            self.ui
                .show_error(&format!("Failed to create '{}': {err}", target.display()));
            return Ok(());
        }
        self.current = target;
        Ok(())
    }
}

/// Sorted names of the directories directly under `dir`.
fn subdirectories(dir: &Path) -> Vec<String> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) => {
            debug!(dir = %dir.display(), %err, "cannot list directory");
            return Vec::new();
        }
    };
    let mut names = entries
        .filter_map(Result::ok)
        .filter(|entry| entry.path().is_dir())
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .collect::<Vec<_>>();
    names.sort();
    names
}
