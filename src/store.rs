// src/store.rs
//! "Last successful check-in" bookkeeping.
//!
//! One text file, one `name,YYYY-MM-DD` line per site. The file is opened
//! and closed around every read or write; there is no locking, so only one
//! run should use a given store at a time.

use std::{fs, io, path::{Path, PathBuf}};

use chrono::NaiveDate;

use crate::config::consts::STORE_SEP;

const DATE_FMT: &str = "%Y-%m-%d";

#[derive(Clone, Debug)]
pub struct CheckinStore {
    path: PathBuf,
}

impl CheckinStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> io::Result<Vec<(String, NaiveDate)>> {
        let text = match fs::read_to_string(&self.path) {
            Ok(t) => t,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e),
        };
        Ok(parse(&text))
    }

    pub fn last_success(&self, site: &str) -> io::Result<Option<NaiveDate>> {
        Ok(self
            .load()?
            .into_iter()
            .find(|(name, _)| name == site)
            .map(|(_, d)| d))
    }

    /// Read errors count as "not signed": better a duplicate check-in than
    /// a silently skipped one.
    pub fn already_signed(&self, site: &str, today: NaiveDate) -> bool {
        match self.last_success(site) {
            Ok(Some(d)) => d == today,
            Ok(None) => false,
            Err(e) => {
                logw!("Store: could not read {}: {}", self.path.display(), e);
                false
            }
        }
    }

    pub fn record_success(&self, site: &str, date: NaiveDate) -> io::Result<()> {
        let mut rows = self.load()?;
        match rows.iter_mut().find(|(name, _)| name == site) {
            Some(row) => row.1 = date,
            None => rows.push((s!(site), date)),
        }

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let mut buf = s!();
        for (name, d) in &rows {
            buf.push_str(&format!("{}{}{}\n", name, STORE_SEP, d.format(DATE_FMT)));
        }
        fs::write(&self.path, buf)?;
        logd!("Store: {} → {}", site, date);
        Ok(())
    }
}

/// Malformed lines are skipped.
fn parse(text: &str) -> Vec<(String, NaiveDate)> {
    let mut out = Vec::new();
    for line in text.lines() {
        let Some((name, date)) = line.rsplit_once(STORE_SEP) else { continue };
        match NaiveDate::parse_from_str(date.trim(), DATE_FMT) {
            Ok(d) if !name.trim().is_empty() => out.push((s!(name.trim()), d)),
            _ => logw!("Store: ignoring malformed line '{}'", line),
        }
    }
    out
}
