// src/engine/types.rs
use std::fmt;

use serde::{Deserialize, Serialize};

/// Classification of one response body.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttemptStatus {
    Success,
    AuthInvalid,
    ServerError,
    Unknown,
}

impl AttemptStatus {
    /// Terminal statuses end the retry loop at once.
    pub fn is_terminal(self) -> bool {
        matches!(self, AttemptStatus::Success | AttemptStatus::AuthInvalid)
    }
}

/// Result of one HTTP call. Dropped once the probe has folded it into the
/// outcome message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttemptResult {
    /// `None` when the request itself failed (timeout, DNS, TLS, status).
    pub status: Option<AttemptStatus>,
    /// Keyword-anchored number, separators stripped.
    pub value: Option<String>,
    /// Streak/rank sentence with markup removed.
    pub streak: Option<String>,
    /// Human-readable line for this attempt.
    pub message: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OutcomeStatus {
    Success,
    AuthInvalid,
    ServerError,
    Unknown,
    ExhaustedRetries,
    /// Not probed: already signed today, or no credential for the site.
    Skipped,
}

impl OutcomeStatus {
    pub fn is_success(self) -> bool {
        self == OutcomeStatus::Success
    }
}

impl From<AttemptStatus> for OutcomeStatus {
    fn from(s: AttemptStatus) -> Self {
        match s {
            AttemptStatus::Success => OutcomeStatus::Success,
            AttemptStatus::AuthInvalid => OutcomeStatus::AuthInvalid,
            AttemptStatus::ServerError => OutcomeStatus::ServerError,
            AttemptStatus::Unknown => OutcomeStatus::Unknown,
        }
    }
}

impl fmt::Display for OutcomeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OutcomeStatus::Success => "success",
            OutcomeStatus::AuthInvalid => "auth-invalid",
            OutcomeStatus::ServerError => "server-error",
            OutcomeStatus::Unknown => "unknown",
            OutcomeStatus::ExhaustedRetries => "exhausted-retries",
            OutcomeStatus::Skipped => "skipped",
        };
        f.write_str(s)
    }
}

/// Final word on one site for one run. Produced once, consumed by the
/// notification step, never persisted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Outcome {
    pub site: String,
    pub status: OutcomeStatus,
    pub message: String,
    /// HTTP attempts made; 0 for skipped sites.
    pub attempts: u32,
    pub value: Option<String>,
}

impl Outcome {
    pub fn skipped(site: &str, message: impl Into<String>) -> Self {
        Self {
            site: s!(site),
            status: OutcomeStatus::Skipped,
            message: message.into(),
            attempts: 0,
            value: None,
        }
    }
}
