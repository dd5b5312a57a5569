//! Binary-local wiring.
//!
//! `main.rs` parses flags and dispatches; this module builds the services and
//! installs process-wide handlers.

pub(crate) mod startup;
