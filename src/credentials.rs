// src/credentials.rs
//! Where cookies come from. The probe only sees a [`Credential`]; it never
//! stores or changes one.
//!
//! Sources, in the order `from_env` chains them:
//! 1. `PT_COOKIES`: one JSON object, site name → cookie string.
//! 2. `<NAME>_COOKIE`: one variable per site (`HDtime_COOKIE`, or upper-case).
//! 3. A cookie-sync jar: domain → cookie list, fetched from a sync server
//!    (`COOKIE_SYNC_SERVER` + `COOKIE_SYNC_UUID` + `COOKIE_SYNC_PASSWORD`) or
//!    read from an exported JSON file (`COOKIE_SYNC_FILE`). Looked up by the
//!    site's domain: exact key first, then the longest matching suffix.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::config::consts::*;
use crate::error::ConfigError;
use crate::specs::SiteDescriptor;

/// Opaque session cookie. `Debug` never prints the value.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Credential(<{} bytes>)", self.0.len())
    }
}

pub trait CredentialSource {
    fn credential(&self, site: &SiteDescriptor) -> Option<Credential>;

    /// Short label for logs.
    fn describe(&self) -> &'static str;
}

/* ---------------- JSON env ---------------- */

/// One JSON object keyed by site name.
#[derive(Debug, Default)]
pub struct JsonMapSource {
    map: HashMap<String, String>,
}

impl JsonMapSource {
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let map: HashMap<String, String> = serde_json::from_str(text)
            .map_err(|e| ConfigError::CredentialSource(format!("{ENV_JSON_COOKIES} is not a JSON object of strings: {e}")))?;
        Ok(Self { map })
    }

}

impl CredentialSource for JsonMapSource {
    fn credential(&self, site: &SiteDescriptor) -> Option<Credential> {
        self.map
            .get(&site.name)
            .or_else(|| {
                self.map
                    .iter()
                    .find(|(k, _)| k.eq_ignore_ascii_case(&site.name))
                    .map(|(_, v)| v)
            })
            .map(Credential::new)
            .filter(|c| !c.is_empty())
    }

    fn describe(&self) -> &'static str {
        "json-env"
    }
}

/* ---------------- per-site env ---------------- */

pub type EnvLookup = Box<dyn Fn(&str) -> Option<String>>;

/// `<NAME>_COOKIE`, as written or upper-cased.
pub struct SiteEnvSource {
    lookup: EnvLookup,
}

impl SiteEnvSource {
    pub fn new() -> Self {
        Self::with_lookup(Box::new(|k: &str| std::env::var(k).ok()))
    }

    pub fn with_lookup(lookup: EnvLookup) -> Self {
        Self { lookup }
    }

    pub fn var_names(site: &SiteDescriptor) -> [String; 2] {
        [
            join!(&site.name, ENV_SITE_COOKIE_SUFFIX),
            join!(&site.name.to_ascii_uppercase(), ENV_SITE_COOKIE_SUFFIX),
        ]
    }

    pub fn has_any(&self, sites: &[SiteDescriptor]) -> bool {
        sites.iter().any(|s| self.credential(s).is_some())
    }
}

impl Default for SiteEnvSource {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialSource for SiteEnvSource {
    fn credential(&self, site: &SiteDescriptor) -> Option<Credential> {
        Self::var_names(site)
            .iter()
            .find_map(|k| (self.lookup)(k))
            .map(Credential::new)
            .filter(|c| !c.is_empty())
    }

    fn describe(&self) -> &'static str {
        "site-env"
    }
}

/* ---------------- cookie-sync jar ---------------- */

#[derive(Clone, Debug, Deserialize)]
pub struct JarCookie {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Deserialize)]
struct SyncPayload {
    cookie_data: HashMap<String, Vec<JarCookie>>,
}

/// Domain-keyed cookie jar.
#[derive(Debug, Default)]
pub struct CookieJarSource {
    jar: HashMap<String, Vec<JarCookie>>,
}

fn norm_domain(d: &str) -> String {
    d.trim().trim_start_matches('.').to_ascii_lowercase()
}

impl CookieJarSource {
    pub fn new(jar: HashMap<String, Vec<JarCookie>>) -> Self {
        Self { jar }
    }

    /// Accepts `{"cookie_data": {...}}` or the bare domain map.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        if let Ok(p) = serde_json::from_str::<SyncPayload>(text) {
            return Ok(Self::new(p.cookie_data));
        }
        let jar: HashMap<String, Vec<JarCookie>> = serde_json::from_str(text)
            .map_err(|e| ConfigError::CredentialSource(format!("cookie jar: {e}")))?;
        Ok(Self::new(jar))
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::CredentialSource(format!("{}: {e}", path.display())))?;
        Self::from_json(&text)
    }

    /// `POST {server}/get/{uuid}` with the password; the server answers
    /// with the decrypted jar.
    pub fn fetch(server: &str, uuid: &str, password: &str, timeout: Duration) -> Result<Self, ConfigError> {
        let url = format!("{}/get/{}", server.trim_end_matches('/'), uuid);
        let err = |e: reqwest::Error| ConfigError::CredentialSource(format!("cookie sync: {e}"));

        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(err)?;
        let text = client
            .post(&url)
            .json(&serde_json::json!({ "password": password }))
            .send()
            .and_then(|r| r.error_for_status())
            .and_then(|r| r.text())
            .map_err(err)?;
        let jar = Self::from_json(&text)?;
        logf!("cookie sync: {} domains loaded", jar.jar.len());
        Ok(jar)
    }

    /// Exact key first, then the longest key that is a dot-suffix of `domain`.
    pub fn lookup(&self, domain: &str) -> Option<&[JarCookie]> {
        let want = norm_domain(domain);
        if let Some(v) = self.jar.get(domain).or_else(|| self.jar.get(&want)) {
            return Some(v.as_slice());
        }

        let mut best: Option<(usize, &Vec<JarCookie>)> = None;
        for (key, cookies) in &self.jar {
            let k = norm_domain(key);
            if k.is_empty() {
                continue;
            }
            let hit = want == k || want.ends_with(&join!(".", &k));
            if hit && best.is_none_or(|(len, _)| k.len() > len) {
                best = Some((k.len(), cookies));
            }
        }
        best.map(|(_, v)| v.as_slice())
    }
}

/// `a=1; b=2`
pub fn cookie_header(cookies: &[JarCookie]) -> String {
    cookies
        .iter()
        .map(|c| format!("{}={}", c.name, c.value))
        .collect::<Vec<_>>()
        .join("; ")
}

impl CredentialSource for CookieJarSource {
    fn credential(&self, site: &SiteDescriptor) -> Option<Credential> {
        let domain = site.domain()?;
        let cookies = self.lookup(&domain)?;
        let c = Credential::new(cookie_header(cookies));
        if c.is_empty() { None } else { Some(c) }
    }

    fn describe(&self) -> &'static str {
        "cookie-sync"
    }
}

/* ---------------- chain ---------------- */

/// First source with an answer wins.
#[derive(Default)]
pub struct ChainSource {
    sources: Vec<Box<dyn CredentialSource>>,
}

impl ChainSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, src: Box<dyn CredentialSource>) {
        self.sources.push(src);
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }
}

impl CredentialSource for ChainSource {
    fn credential(&self, site: &SiteDescriptor) -> Option<Credential> {
        self.sources.iter().find_map(|s| {
            let c = s.credential(site)?;
            logd!("[{}] cookie from {}", site.name, s.describe());
            Some(c)
        })
    }

    fn describe(&self) -> &'static str {
        "chain"
    }
}

/// Build the chain from the process environment.
pub fn from_env(sites: &[SiteDescriptor], timeout: Duration) -> Result<ChainSource, ConfigError> {
    from_lookup(sites, timeout, |k: &str| std::env::var(k).ok())
}

/// Build the chain from any variable lookup. No usable source at all is a
/// startup error; a source that exists but lacks one site is not.
pub fn from_lookup<F>(sites: &[SiteDescriptor], timeout: Duration, lookup: F) -> Result<ChainSource, ConfigError>
where
    F: Fn(&str) -> Option<String> + Clone + 'static,
{
    let mut chain = ChainSource::new();
    let env = |k: &str| lookup(k).filter(|v| !v.trim().is_empty());

    if let Some(json) = env(ENV_JSON_COOKIES) {
        chain.push(Box::new(JsonMapSource::from_json(&json)?));
    }

    let per_site = SiteEnvSource::with_lookup(Box::new(lookup.clone()));
    if per_site.has_any(sites) {
        chain.push(Box::new(per_site));
    }

    if let (Some(server), Some(uuid), Some(pw)) = (env(ENV_SYNC_SERVER), env(ENV_SYNC_UUID), env(ENV_SYNC_PASSWORD)) {
        match CookieJarSource::fetch(&server, &uuid, &pw, timeout) {
            Ok(jar) => chain.push(Box::new(jar)),
            // other sources may still cover the sites
            Err(e) => loge!("{e}"),
        }
    } else if let Some(path) = env(ENV_SYNC_FILE) {
        chain.push(Box::new(CookieJarSource::from_file(Path::new(&path))?));
    }

    if chain.is_empty() {
        return Err(ConfigError::NoCredentials);
    }
    logd!("credentials: {} source(s)", chain.len());
    Ok(chain)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site(name: &str, url: &str) -> SiteDescriptor {
        SiteDescriptor::new(name, url)
    }

    #[test]
    fn debug_hides_cookie() {
        let c = Credential::new("c_secure_pass=secret");
        assert!(!format!("{c:?}").contains("secret"));
    }

    #[test]
    fn json_map_by_name() {
        let src = JsonMapSource::from_json(r#"{"HDtime":"a=1","GGPT":""}"#).unwrap();
        let hd = site("HDtime", "https://hdtime.org/");
        assert_eq!(src.credential(&hd).unwrap().expose(), "a=1");
        assert!(src.credential(&site("GGPT", "https://www.gamegamept.com/")).is_none());
        assert!(src.credential(&site("Piggo", "https://piggo.me/")).is_none());
    }

    #[test]
    fn json_map_rejects_non_object() {
        assert!(JsonMapSource::from_json("[1,2]").is_err());
    }

    #[test]
    fn site_env_tries_both_spellings() {
        let src = SiteEnvSource::with_lookup(Box::new(|k: &str| (k == "HDTIME_COOKIE").then(|| s!("x=1"))));
        assert_eq!(src.credential(&site("HDtime", "https://hdtime.org/")).unwrap().expose(), "x=1");
        assert!(src.credential(&site("GGPT", "https://www.gamegamept.com/")).is_none());
    }

    #[test]
    fn jar_exact_then_longest_suffix() {
        let jar = CookieJarSource::from_json(
            r#"{"cookie_data": {
                "gamegamept.com": [{"name":"a","value":"short"}],
                ".www.gamegamept.com": [{"name":"a","value":"long"}],
                "hdtime.org": [{"name":"uid","value":"1"},{"name":"pass","value":"p"}],
                "ptime.org": [{"name":"x","value":"no"}]
            }}"#,
        )
        .unwrap();

        assert_eq!(cookie_header(jar.lookup("hdtime.org").unwrap()), "uid=1; pass=p");
        assert_eq!(cookie_header(jar.lookup("www.gamegamept.com").unwrap()), "a=long");
        assert_eq!(cookie_header(jar.lookup("cdn.gamegamept.com").unwrap()), "a=short");
        // suffix must be on a label boundary
        assert!(jar.lookup("xhdtime.org").is_none());
    }

    #[test]
    fn jar_source_uses_url_host() {
        let jar = CookieJarSource::from_json(r#"{"hdtime.org":[{"name":"k","value":"v"}]}"#).unwrap();
        let c = jar.credential(&site("HDtime", "https://hdtime.org/attendance.php")).unwrap();
        assert_eq!(c.expose(), "k=v");
    }

    fn vars(pairs: &'static [(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String> + Clone + 'static {
        move |k: &str| pairs.iter().find(|(name, _)| *name == k).map(|(_, v)| s!(*v))
    }

    fn builtins() -> Vec<SiteDescriptor> {
        crate::specs::builtin_sites()
    }

    #[test]
    fn nothing_configured_is_a_startup_error() {
        let res = from_lookup(&builtins(), Duration::from_secs(1), vars(&[]));
        assert!(matches!(res, Err(ConfigError::NoCredentials)));

        // blank values count as unset
        let res = from_lookup(&builtins(), Duration::from_secs(1), vars(&[("PT_COOKIES", "  ")]));
        assert!(matches!(res, Err(ConfigError::NoCredentials)));
    }

    #[test]
    fn malformed_json_cookies_are_rejected() {
        let res = from_lookup(&builtins(), Duration::from_secs(1), vars(&[("PT_COOKIES", "not json")]));
        assert!(matches!(res, Err(ConfigError::CredentialSource(_))));
    }

    #[test]
    fn unreachable_sync_server_alone_is_no_credentials() {
        let res = from_lookup(
            &builtins(),
            Duration::from_secs(2),
            vars(&[
                ("COOKIE_SYNC_SERVER", "http://127.0.0.1:1"),
                ("COOKIE_SYNC_UUID", "u"),
                ("COOKIE_SYNC_PASSWORD", "p"),
            ]),
        );
        assert!(matches!(res, Err(ConfigError::NoCredentials)));
    }

    #[test]
    fn lookup_feeds_json_and_per_site_sources() {
        let chain = from_lookup(
            &builtins(),
            Duration::from_secs(1),
            vars(&[("PT_COOKIES", r#"{"GGPT":"g=1"}"#), ("HDTIME_COOKIE", "h=1")]),
        )
        .unwrap();
        assert_eq!(chain.len(), 2);

        let sites = builtins();
        let by_name = |n: &str| sites.iter().find(|s| s.name == n).unwrap();
        assert_eq!(chain.credential(by_name("GGPT")).unwrap().expose(), "g=1");
        assert_eq!(chain.credential(by_name("HDtime")).unwrap().expose(), "h=1");
        assert!(chain.credential(by_name("Piggo")).is_none());
    }

    #[test]
    fn chain_first_hit_wins() {
        let mut chain = ChainSource::new();
        chain.push(Box::new(JsonMapSource::from_json(r#"{"A":"first"}"#).unwrap()));
        chain.push(Box::new(SiteEnvSource::with_lookup(Box::new(|_: &str| Some(s!("second"))))));
        assert_eq!(chain.credential(&site("A", "https://a.example/")).unwrap().expose(), "first");
        assert_eq!(chain.credential(&site("B", "https://b.example/")).unwrap().expose(), "second");
    }
}
