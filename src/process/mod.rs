//! Managed node process discovery and lifecycle.

pub mod control;
pub mod inspector;

pub use control::{filter_codex_processes, launch_args, ProcessControl, SettleIntervals, StopOutcome};
pub use inspector::{ProcessEntry, ProcessInspector, SystemProcessInspector};
