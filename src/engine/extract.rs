// src/engine/extract.rs
//! Best-effort detail pulled out of a success page. A miss here never
//! changes the status, only how much the message says.

use regex::Regex;

use crate::core::{html, sanitize};
use crate::error::ConfigError;
use crate::specs::SiteDescriptor;

/// Numeric token after a keyword: digits, optional `,` groups, optional
/// decimal part. Same line only (`.` does not cross newlines).
pub fn value_pattern(keyword: &str) -> String {
    format!(r"{}.*?(\d+(?:,\d+)*(?:\.\d+)?)", regex::escape(keyword))
}

#[derive(Clone, Debug)]
pub struct Extractor {
    value: Option<(String, Regex)>,
    streak: Option<Regex>,
    strip: Vec<String>,
}

impl Extractor {
    pub fn compile(site: &SiteDescriptor) -> Result<Self, ConfigError> {
        let bad = |pattern: &str, e: regex::Error| ConfigError::BadPattern {
            site: site.name.clone(),
            pattern: s!(pattern),
            reason: e.to_string(),
        };

        let value = match site.value_keyword.as_deref().map(str::trim) {
            Some(kw) if !kw.is_empty() => {
                let p = value_pattern(kw);
                let re = Regex::new(&p).map_err(|e| bad(&p, e))?;
                Some((s!(kw), re))
            }
            _ => None,
        };

        let streak = match site.streak_pattern.as_deref() {
            Some(p) if !p.is_empty() => Some(Regex::new(p).map_err(|e| bad(p, e))?),
            _ => None,
        };

        Ok(Self { value, streak, strip: site.strip_fragments.clone() })
    }

    pub fn keyword(&self) -> Option<&str> {
        self.value.as_ref().map(|(kw, _)| kw.as_str())
    }

    /// `"魔力值: 12,345.6"` → `Some("12345.6")`.
    pub fn value(&self, body: &str) -> Option<String> {
        let (_, re) = self.value.as_ref()?;
        let caps = re.captures(body)?;
        Some(sanitize::strip_grouping(caps.get(1)?.as_str()))
    }

    /// Whole streak/rank sentence, `<b>` tags and boilerplate removed.
    pub fn streak(&self, body: &str) -> Option<String> {
        let re = self.streak.as_ref()?;
        let m = re.find(body)?;
        let text = html::strip_named_tags(m.as_str(), &["b"]);
        let text = sanitize::strip_fragments(&text, &self.strip);
        let text = sanitize::normalize_entities(&text);
        let text = text.trim();
        if text.is_empty() { None } else { Some(s!(text)) }
    }
}
