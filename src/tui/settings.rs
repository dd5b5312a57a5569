//! Centralized, hardcoded UI settings for the terminal interface.
//!
//! This is the single place to tweak prompt strings, glyphs, colors and
//! spinner behavior.

use crossterm::style::Color;

// ---------------------------------------------------------------------------
// Layout
// ---------------------------------------------------------------------------

pub const INDENT_1: &str = "  ";
/// Blank columns between a box border and its text.
pub const BOX_PADDING: usize = 1;

// ---------------------------------------------------------------------------
// Prompt strings
// ---------------------------------------------------------------------------

pub const PROMPT_SYMBOL: &str = "> ";
pub const PROMPT_CHOICE_HINT: &str = "Enter a number";
pub const PROMPT_INVALID_CHOICE: &str = "Please enter one of the listed numbers.";

// ---------------------------------------------------------------------------
// Boxes
// ---------------------------------------------------------------------------

pub const BOX_TOP_LEFT: char = '╭';
pub const BOX_TOP_RIGHT: char = '╮';
pub const BOX_BOTTOM_LEFT: char = '╰';
pub const BOX_BOTTOM_RIGHT: char = '╯';
pub const BOX_HORIZONTAL: char = '─';
pub const BOX_VERTICAL: char = '│';

pub const TITLE_SUCCESS: &str = "SUCCESS";
pub const TITLE_ERROR: &str = "ERROR";
pub const TITLE_INFO: &str = "INFO";

// ---------------------------------------------------------------------------
// Spinner / progress
// ---------------------------------------------------------------------------

pub const PROGRESS_FRAMES: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];
pub const PROGRESS_TICK_MS: u64 = 80;

// ---------------------------------------------------------------------------
// Colors
// ---------------------------------------------------------------------------

pub const COLOR_LOGO: Color = Color::Cyan;
pub const COLOR_SUCCESS: Color = Color::Green;
pub const COLOR_ERROR: Color = Color::Red;
pub const COLOR_INFO: Color = Color::Cyan;
pub const COLOR_PROMPT_SYMBOL: Color = Color::White;
pub const COLOR_CHOICE_NUMBER: Color = Color::DarkYellow;
pub const COLOR_CHOICE_LABEL: Color = Color::White;
pub const COLOR_METADATA: Color = Color::DarkGrey;

pub const COLOR_PROGRESS_FRAME: Color = Color::Cyan;
pub const COLOR_PROGRESS_ELAPSED: Color = Color::DarkGrey;

// ---------------------------------------------------------------------------
// Banner
// ---------------------------------------------------------------------------

pub const LOGO: &str = r"
   ____          _
  / ___|___   __| | _____  __
 | |   / _ \ / _` |/ _ \ \/ /
 | |__| (_) | (_| |  __/>  <
  \____\___/ \__,_|\___/_/\_\
      storage node manager
";
