// src/engine/classify.rs
use regex::Regex;

use super::extract::Extractor;
use super::types::{AttemptResult, AttemptStatus};
use crate::core::{html, sanitize};
use crate::error::ConfigError;
use crate::specs::{RuleSpec, SiteDescriptor};

#[derive(Clone, Debug)]
enum Matcher {
    Contains(Vec<String>),
    Pattern(Regex),
    Either(Vec<String>, Regex),
}

impl Matcher {
    fn matches(&self, body: &str) -> bool {
        match self {
            Matcher::Contains(needles) => needles.iter().any(|n| body.contains(n.as_str())),
            Matcher::Pattern(re) => re.is_match(body),
            Matcher::Either(needles, re) => {
                needles.iter().any(|n| body.contains(n.as_str())) || re.is_match(body)
            }
        }
    }
}

#[derive(Clone, Debug)]
pub struct Rule {
    matcher: Matcher,
    pub status: AttemptStatus,
}

impl Rule {
    fn compile(site: &str, spec: &RuleSpec) -> Result<Self, ConfigError> {
        let needles: Vec<String> = spec.contains.iter().filter(|n| !n.is_empty()).cloned().collect();
        let re = match &spec.pattern {
            Some(p) => Some(Regex::new(p).map_err(|e| ConfigError::BadPattern {
                site: s!(site),
                pattern: p.clone(),
                reason: e.to_string(),
            })?),
            None => None,
        };
        let matcher = match (needles.is_empty(), re) {
            (false, None) => Matcher::Contains(needles),
            (true, Some(re)) => Matcher::Pattern(re),
            (false, Some(re)) => Matcher::Either(needles, re),
            (true, None) => {
                return Err(ConfigError::BadPattern {
                    site: s!(site),
                    pattern: format!("{:?}", spec.status),
                    reason: s!("empty rule"),
                });
            }
        };
        Ok(Self { matcher, status: spec.status })
    }

    pub fn matches(&self, body: &str) -> bool {
        self.matcher.matches(body)
    }
}

/// Ordered `(predicate, status)` list plus the success-page extractor.
/// First matching rule wins; no match means `Unknown`.
#[derive(Clone, Debug)]
pub struct Classifier {
    rules: Vec<Rule>,
    extractor: Extractor,
    snippet_chars: usize,
}

impl Classifier {
    pub fn compile(site: &SiteDescriptor, snippet_chars: usize) -> Result<Self, ConfigError> {
        site.validate()?;
        let rules = site
            .rules
            .iter()
            .map(|r| Rule::compile(&site.name, r))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            rules,
            extractor: Extractor::compile(site)?,
            snippet_chars,
        })
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Status only; first matching rule in precedence order.
    pub fn status_of(&self, body: &str) -> AttemptStatus {
        self.rules
            .iter()
            .find(|r| r.matches(body))
            .map(|r| r.status)
            .unwrap_or(AttemptStatus::Unknown)
    }

    /// Pure function of `body`: same input, same result.
    pub fn classify(&self, body: &str) -> AttemptResult {
        let status = self.status_of(body);
        match status {
            AttemptStatus::Success => {
                let value = self.extractor.value(body);
                let streak = self.extractor.streak(body);

                let mut msg = s!("签到成功!");
                if let (Some(kw), Some(v)) = (self.extractor.keyword(), value.as_deref()) {
                    msg.push_str(&format!(" 当前{kw}为: {v}。"));
                }
                if let Some(st) = streak.as_deref() {
                    msg.push(' ');
                    msg.push_str(st);
                }
                AttemptResult { status: Some(status), value, streak, message: msg }
            }
            AttemptStatus::AuthInvalid => AttemptResult {
                status: Some(status),
                value: None,
                streak: None,
                message: s!("Cookie值错误! 响应跳转到第三方网站, 请检查网站cookie值"),
            },
            AttemptStatus::ServerError => {
                let mut msg = s!("服务器异常 (50x)!");
                if let Some(t) = html::title(body) {
                    msg.push_str(&format!(" [{t}]"));
                }
                AttemptResult { status: Some(status), value: None, streak: None, message: msg }
            }
            AttemptStatus::Unknown => AttemptResult {
                status: Some(status),
                value: None,
                streak: None,
                message: join!(
                    "未知异常! 响应内容: ",
                    &sanitize::truncate_chars(body.trim(), self.snippet_chars)
                ),
            },
        }
    }
}
