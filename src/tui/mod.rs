//! Terminal user-interface building blocks.
//!
//! Stateless rendering helpers (boxes, choice lists), line input, and the
//! spinner thread. The `ui` module composes these behind the `Ui` trait.

pub mod boxes;
pub mod input;
pub mod progress;
pub mod settings;
