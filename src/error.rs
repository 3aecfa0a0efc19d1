// src/error.rs
use thiserror::Error;

/// Problems found before any network call. These stop the site (or the
/// whole run, when raised at startup) instead of being retried.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("site `{site}`: missing required field `{field}`")]
    MissingField { site: String, field: &'static str },

    #[error("site `{site}`: invalid pattern `{pattern}`: {reason}")]
    BadPattern { site: String, pattern: String, reason: String },

    #[error("site `{0}`: credential is empty")]
    EmptyCredential(String),

    #[error("no credential source configured (set PT_COOKIES, <SITE>_COOKIE or COOKIE_SYNC_*)")]
    NoCredentials,

    #[error("credential source: {0}")]
    CredentialSource(String),

    #[error("sites file: {0}")]
    SitesFile(String),

    #[error("no sites selected")]
    NoSites,

    #[error("{0}")]
    Cli(String),
}

impl From<&str> for ConfigError {
    fn from(s: &str) -> Self {
        ConfigError::Cli(s.to_string())
    }
}

impl From<String> for ConfigError {
    fn from(s: String) -> Self {
        ConfigError::Cli(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_messages_convert() {
        let e: ConfigError = "Missing sites file".into();
        assert!(matches!(e, ConfigError::Cli(ref m) if m == "Missing sites file"));
        assert_eq!(ConfigError::from(s!("bad")).to_string(), "bad");
    }

    #[test]
    fn messages_name_the_site() {
        let e = ConfigError::MissingField { site: s!("HDtime"), field: "url" };
        assert_eq!(e.to_string(), "site `HDtime`: missing required field `url`");
        assert_eq!(ConfigError::EmptyCredential(s!("GGPT")).to_string(), "site `GGPT`: credential is empty");
    }
}
