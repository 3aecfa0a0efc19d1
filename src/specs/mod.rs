// src/specs/mod.rs
//! # Site "specs" module
//!
//! Each spec is a [`SiteDescriptor`]: the check-in URL, the headers the
//! site expects, and the text markers that tell a successful check-in apart
//! from an expired cookie or a 50x page.
//!
//! ## What lives here
//! - The descriptor type and its JSON shape (`site`).
//! - The built-in sites and the common browser headers (`builtin`).
//! - Loading a user-supplied sites file.
//!
//! ## What does **not** live here
//! - **Networking, retries, classification** – `engine`.
//! - **Cookies** – `credentials`; descriptors never hold one.
//! - **Bookkeeping** – `store`.
//!
//! ## Conventions & invariants
//! - Descriptors are immutable once loaded; the runner only borrows them.
//! - Rule order in `rules` *is* the precedence. The default order is
//!   success → off-site redirect (auth) → 50x text.
//! - Sites that look alike may still differ in markers or patterns; keep
//!   each one configurable rather than forcing one canonical variant.
//!
//! ## Sites file
//! ```text
//! [
//!   { "name": "HDtime",
//!     "url": "https://hdtime.org/attendance.php",
//!     "value_keyword": "魔力值",
//!     "verify_tls": false }
//! ]
//! ```
//! Missing fields take the NexusPHP defaults.
pub mod builtin;
pub mod site;

use std::{fs, path::Path};

pub use builtin::{builtin_sites, COMMON_HEADERS};
pub use site::{RuleSpec, SiteDescriptor};

use crate::config::options::SiteSelector;
use crate::error::ConfigError;

/// Parse a JSON array of descriptors and validate each.
pub fn parse_sites(json: &str) -> Result<Vec<SiteDescriptor>, ConfigError> {
    let sites: Vec<SiteDescriptor> =
        serde_json::from_str(json).map_err(|e| ConfigError::SitesFile(e.to_string()))?;
    for site in &sites {
        site.validate()?;
    }
    Ok(sites)
}

pub fn load_file(path: &Path) -> Result<Vec<SiteDescriptor>, ConfigError> {
    let text = fs::read_to_string(path)
        .map_err(|e| ConfigError::SitesFile(format!("{}: {e}", path.display())))?;
    parse_sites(&text)
}

/// Built-ins or the sites file, narrowed by the selector. Unknown names in
/// the selector are a configuration error.
pub fn resolve(file: Option<&Path>, selector: &SiteSelector) -> Result<Vec<SiteDescriptor>, ConfigError> {
    let all = match file {
        Some(p) => load_file(p)?,
        None => builtin_sites(),
    };

    if let SiteSelector::Names(names) = selector {
        if let Some(bad) = names.iter().find(|n| !all.iter().any(|s| s.name.eq_ignore_ascii_case(n))) {
            return Err(ConfigError::Cli(format!("unknown site: {bad}")));
        }
    }

    let picked: Vec<SiteDescriptor> = all.into_iter().filter(|s| selector.accepts(&s.name)).collect();
    if picked.is_empty() {
        return Err(ConfigError::NoSites);
    }
    Ok(picked)
}
