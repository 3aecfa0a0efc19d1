// src/engine/mod.rs
//! Probe core: classify a body, pull out details, retry, report.

pub mod classify;
pub mod extract;
pub mod probe;
pub mod retry;
pub mod types;

pub use probe::{CompiledSite, Probe};
pub use types::{AttemptResult, AttemptStatus, Outcome, OutcomeStatus};
