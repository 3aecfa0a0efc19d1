// src/config/options.rs
use std::path::PathBuf;
use std::time::Duration;

use super::consts::*;

/// Everything a run needs, built once before the first site is touched.
/// Nothing here is mutated after `runner::run` starts.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct AppOptions {
    pub probe: ProbeOptions,
    pub run: RunOptions,
    pub notify: NotifyOptions,
    pub log: LogOptions,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProbeOptions {
    /// Attempts per site. Clamped to at least 1: a probe always makes one
    /// request, `0` behaves like `1`.
    pub max_attempts: u32,
    pub retry_delay: Duration,
    pub request_timeout: Duration,
    /// Max chars of an unrecognised body kept in the message.
    pub body_snippet: usize,
}

impl Default for ProbeOptions {
    fn default() -> Self {
        Self {
            max_attempts: MAX_ATTEMPTS,
            retry_delay: Duration::from_secs(RETRY_DELAY_SECS),
            request_timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS),
            body_snippet: BODY_SNIPPET_CHARS,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SiteSelector {
    All,
    Names(Vec<String>),
}

impl SiteSelector {
    pub fn accepts(&self, name: &str) -> bool {
        match self {
            SiteSelector::All => true,
            SiteSelector::Names(v) => v.iter().any(|n| n.eq_ignore_ascii_case(name)),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunOptions {
    pub sites: SiteSelector,
    /// JSON file with site descriptors; built-ins when `None`.
    pub sites_file: Option<PathBuf>,
    pub site_pause: Duration,
    /// Ignore the "already signed today" marker.
    pub force: bool,
    /// Skip the bookkeeping store entirely (no reads, no writes).
    pub use_store: bool,
    pub store_dir: PathBuf,
    pub list_sites: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            sites: SiteSelector::All,
            sites_file: None,
            site_pause: Duration::from_secs(SITE_PAUSE_SECS),
            force: false,
            use_store: true,
            store_dir: PathBuf::from(STORE_DIR),
            list_sites: false,
        }
    }
}

impl RunOptions {
    pub fn store_path(&self) -> PathBuf {
        self.store_dir.join(STORE_FILE)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NotifyMode {
    /// One notification per site.
    PerSite,
    /// One Markdown table for the whole run.
    Summary,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NotifyOptions {
    pub mode: NotifyMode,
    pub webhook: Option<String>,
}

impl Default for NotifyOptions {
    fn default() -> Self {
        Self {
            mode: NotifyMode::Summary,
            webhook: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogOptions {
    pub verbose: bool,
    /// Mirror log lines into `<store_dir>/debug.log`.
    pub to_file: bool,
}

impl Default for LogOptions {
    fn default() -> Self {
        Self { verbose: false, to_file: true }
    }
}

impl AppOptions {
    /// Fill the parts that come from the environment (webhook URL).
    pub fn with_env(mut self) -> Self {
        if self.notify.webhook.is_none() {
            self.notify.webhook = std::env::var(ENV_WEBHOOK)
                .ok()
                .filter(|s| !s.trim().is_empty());
        }
        self
    }
}
