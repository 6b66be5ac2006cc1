//! Application-level orchestration.
//!
//! Owns the discovery pass lifecycle (initial pass, refresh, periodic rescan) so the
//! UI thread never blocks on the registry.

mod controller;

pub(crate) use controller::{run_controller, UiCommand};
