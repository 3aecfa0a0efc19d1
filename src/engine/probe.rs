// src/engine/probe.rs
//! The check-in probe: one site, one credential, up to N GETs, one outcome.

use super::classify::Classifier;
use super::retry::{Flow, Retried, RetryPolicy, Sleeper};
use super::types::{AttemptResult, Outcome, OutcomeStatus};
use crate::config::options::ProbeOptions;
use crate::core::net::{Fetcher, Request};
use crate::credentials::Credential;
use crate::error::ConfigError;
use crate::specs::{SiteDescriptor, COMMON_HEADERS};

/// Descriptor plus its compiled rules. Compiling is where configuration
/// errors surface, so do it before the first request.
#[derive(Clone, Debug)]
pub struct CompiledSite {
    pub site: SiteDescriptor,
    classifier: Classifier,
}

impl CompiledSite {
    pub fn compile(site: &SiteDescriptor, opts: &ProbeOptions) -> Result<Self, ConfigError> {
        Ok(Self {
            site: site.clone(),
            classifier: Classifier::compile(site, opts.body_snippet)?,
        })
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }
}

/// Common headers, then the site's own (replacing same-named ones, case
/// insensitive), then the cookie.
pub fn request_headers(site: &SiteDescriptor, cred: &Credential) -> Vec<(String, String)> {
    let mut headers: Vec<(String, String)> = Vec::new();
    if site.common_headers {
        headers.extend(COMMON_HEADERS.iter().map(|(k, v)| (s!(*k), s!(*v))));
    }
    for (k, v) in &site.headers {
        headers.retain(|(name, _)| !name.eq_ignore_ascii_case(k));
        headers.push((k.clone(), v.clone()));
    }
    headers.retain(|(name, _)| !name.eq_ignore_ascii_case("cookie"));
    headers.push((s!("Cookie"), s!(cred.expose())));
    headers
}

pub struct Probe<'a> {
    fetcher: &'a dyn Fetcher,
    sleeper: &'a dyn Sleeper,
    opts: ProbeOptions,
    policy: RetryPolicy,
}

impl<'a> Probe<'a> {
    /// Retry budget and delay from `opts`, default retryable predicate.
    pub fn new(fetcher: &'a dyn Fetcher, sleeper: &'a dyn Sleeper, opts: ProbeOptions) -> Self {
        let policy = RetryPolicy::new(opts.max_attempts, opts.retry_delay);
        Self { fetcher, sleeper, opts, policy }
    }

    /// Replace the retry policy wholesale (budget, delay and predicate).
    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Validate, then probe. The only `Err` is a configuration problem found
    /// before any network call; every network-side failure is an `Outcome`.
    pub fn check_in(&self, site: &SiteDescriptor, cred: &Credential) -> Result<Outcome, ConfigError> {
        let compiled = CompiledSite::compile(site, &self.opts)?;
        if cred.is_empty() {
            return Err(ConfigError::EmptyCredential(site.name.clone()));
        }
        Ok(self.run(&compiled, cred))
    }

    /// The retry loop proper. Never fails; attempts run strictly one after
    /// another.
    pub fn run(&self, compiled: &CompiledSite, cred: &Credential) -> Outcome {
        let site = &compiled.site;
        let req = Request {
            url: site.url.clone(),
            headers: request_headers(site, cred),
            timeout: self.opts.request_timeout,
            verify_tls: site.verify_tls,
            require_success: site.require_http_success,
        };
        let policy = &self.policy;
        let max = policy.max_attempts.max(1);

        logf!("[{}] check-in start", site.name);
        let mut log_lines: Vec<String> = Vec::new();

        let retried = policy.run(self.sleeper, |n| {
            logf!("[{}] attempt {}/{}", site.name, n, max);
            let result = self.attempt(compiled, &req);
            log_lines.push(format!("第{n}次执行签到: {}", result.message));

            match result.status {
                Some(s) if s.is_terminal() => Flow::Done(result),
                _ if policy.is_retryable(result.status) => Flow::Retry(result),
                _ => Flow::Done(result),
            }
        });

        match retried {
            Retried::Finished { value, attempts } => {
                let status = value.status.map(OutcomeStatus::from).unwrap_or(OutcomeStatus::Unknown);
                match status {
                    OutcomeStatus::Success => logf!("[{}] {}", site.name, value.message),
                    _ => loge!("[{}] {}", site.name, value.message),
                }
                Outcome {
                    site: site.name.clone(),
                    status,
                    message: log_lines.join("\n"),
                    attempts,
                    value: value.value,
                }
            }
            Retried::Exhausted { attempts, .. } => {
                let tail = format!("达到最大重试次数({attempts}次)，签到失败。");
                loge!("[{}] giving up after {} attempts", site.name, attempts);
                log_lines.push(tail);
                Outcome {
                    site: site.name.clone(),
                    status: OutcomeStatus::ExhaustedRetries,
                    message: log_lines.join("\n"),
                    attempts,
                    value: None,
                }
            }
        }
    }

    fn attempt(&self, compiled: &CompiledSite, req: &Request) -> AttemptResult {
        match self.fetcher.get(req) {
            Ok(resp) => {
                let result = compiled.classifier().classify(&resp.body);
                if let Some(status) = result.status {
                    logd!("[{}] HTTP {} classified as {:?}", compiled.site.name, resp.status, status);
                }
                if result.status.is_some_and(|s| !s.is_terminal()) {
                    logw!("[{}] {}", compiled.site.name, result.message);
                }
                result
            }
            Err(e) => {
                logw!("[{}] request failed: {}", compiled.site.name, e);
                AttemptResult {
                    status: None,
                    value: None,
                    streak: None,
                    message: format!("请求失败，原因: {e}"),
                }
            }
        }
    }
}
