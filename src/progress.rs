// src/progress.rs
use crate::engine::types::Outcome;

/// Lightweight progress reporting for a multi-site run.
/// Frontends implement this to surface status to users.
pub trait Progress {
    /// Called at the start with the number of selected sites.
    fn begin(&mut self, _total: usize) {}

    /// Free-form status line for human eyes.
    fn log(&mut self, _msg: &str) {}

    /// Called once per site, probed or skipped.
    fn site_done(&mut self, _outcome: &Outcome) {}

    /// Called at the end.
    fn finish(&mut self) {}
}

/// A no-op progress sink.
pub struct NullProgress;
impl Progress for NullProgress {}
