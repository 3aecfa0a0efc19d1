// src/specs/site.rs
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::consts::*;
use crate::engine::types::AttemptStatus;
use crate::error::ConfigError;

/// One classification rule: any literal in `contains`, or `pattern`, found
/// in the body yields `status`. Rules are tried in list order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSpec {
    pub status: AttemptStatus,
    #[serde(default)]
    pub contains: Vec<String>,
    #[serde(default)]
    pub pattern: Option<String>,
}

impl RuleSpec {
    pub fn contains(status: AttemptStatus, needles: &[&str]) -> Self {
        Self {
            status,
            contains: needles.iter().map(|n| s!(*n)).collect(),
            pattern: None,
        }
    }
}

/// Success, then the off-site redirect, then the 50x pages.
pub fn default_rules() -> Vec<RuleSpec> {
    vec![
        RuleSpec::contains(AttemptStatus::Success, &[SUCCESS_MARKER]),
        RuleSpec::contains(AttemptStatus::AuthInvalid, &[AUTH_REDIRECT_MARKER]),
        RuleSpec::contains(AttemptStatus::ServerError, TRANSIENT_MARKERS),
    ]
}

fn default_streak_pattern() -> Option<String> {
    Some(s!(STREAK_PATTERN))
}

fn default_strip_fragments() -> Vec<String> {
    STREAK_STRIP.iter().map(|f| s!(*f)).collect()
}

fn yes() -> bool {
    true
}

/// Static description of a check-in target. Built once (built-ins or a JSON
/// sites file) and only read afterwards.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteDescriptor {
    pub name: String,
    pub url: String,
    /// Cookie-jar lookup key; the URL host when absent.
    #[serde(default)]
    pub domain: Option<String>,
    /// Site-specific headers, applied over the common browser headers.
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    #[serde(default = "yes")]
    pub common_headers: bool,
    #[serde(default = "default_rules")]
    pub rules: Vec<RuleSpec>,
    /// e.g. `魔力值`, `G值`.
    #[serde(default)]
    pub value_keyword: Option<String>,
    #[serde(default = "default_streak_pattern")]
    pub streak_pattern: Option<String>,
    #[serde(default = "default_strip_fragments")]
    pub strip_fragments: Vec<String>,
    #[serde(default = "yes")]
    pub verify_tls: bool,
    /// Non-2xx counts as a failed request instead of being classified.
    #[serde(default)]
    pub require_http_success: bool,
}

impl SiteDescriptor {
    /// Minimal descriptor with the NexusPHP defaults filled in.
    pub fn new(name: &str, url: &str) -> Self {
        Self {
            name: s!(name),
            url: s!(url),
            domain: None,
            headers: BTreeMap::new(),
            common_headers: true,
            rules: default_rules(),
            value_keyword: None,
            streak_pattern: default_streak_pattern(),
            strip_fragments: default_strip_fragments(),
            verify_tls: true,
            require_http_success: false,
        }
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.insert(s!(name), s!(value));
        self
    }

    pub fn with_value_keyword(mut self, kw: &str) -> Self {
        self.value_keyword = Some(s!(kw));
        self
    }

    pub fn with_verify_tls(mut self, verify: bool) -> Self {
        self.verify_tls = verify;
        self
    }

    pub fn with_require_http_success(mut self, require: bool) -> Self {
        self.require_http_success = require;
        self
    }

    /// Domain used for cookie-jar lookups.
    pub fn domain(&self) -> Option<String> {
        if let Some(d) = &self.domain {
            return Some(d.trim().trim_start_matches('.').to_ascii_lowercase());
        }
        reqwest::Url::parse(&self.url)
            .ok()
            .and_then(|u| u.host_str().map(|h| h.to_ascii_lowercase()))
    }

    /// Required fields, checked before any network call.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::MissingField { site: s!("<unnamed>"), field: "name" });
        }
        let missing = |field| ConfigError::MissingField { site: self.name.clone(), field };
        if self.url.trim().is_empty() {
            return Err(missing("url"));
        }
        if reqwest::Url::parse(&self.url).is_err() {
            return Err(ConfigError::BadPattern {
                site: self.name.clone(),
                pattern: self.url.clone(),
                reason: s!("not an absolute URL"),
            });
        }
        if !self.rules.iter().any(|r| r.status == AttemptStatus::Success) {
            return Err(missing("rules[success]"));
        }
        if let Some(r) = self.rules.iter().find(|r| r.contains.is_empty() && r.pattern.is_none()) {
            return Err(ConfigError::BadPattern {
                site: self.name.clone(),
                pattern: format!("{:?}", r.status),
                reason: s!("rule has neither `contains` nor `pattern`"),
            });
        }
        Ok(())
    }
}
