// src/runner.rs
use chrono::NaiveDate;

use crate::{
    config::options::{AppOptions, NotifyMode},
    core::net::Fetcher,
    credentials::CredentialSource,
    engine::{
        probe::{CompiledSite, Probe},
        retry::Sleeper,
        types::{Outcome, OutcomeStatus},
    },
    error::ConfigError,
    notify::{self, Notifier},
    progress::Progress,
    report,
    specs::SiteDescriptor,
    store::CheckinStore,
};

/// The collaborators a run talks to. All borrowed; the runner owns nothing
/// but the outcomes it produces.
pub struct Services<'a> {
    pub fetcher: &'a dyn Fetcher,
    pub sleeper: &'a dyn Sleeper,
    pub credentials: &'a dyn CredentialSource,
    /// `None` disables the "already signed today" check and its writes.
    pub store: Option<&'a CheckinStore>,
    pub notifier: &'a dyn Notifier,
}

/// Summary of what happened, one outcome per selected site, in order.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub outcomes: Vec<Outcome>,
}

impl RunSummary {
    pub fn count(&self, status: OutcomeStatus) -> usize {
        self.outcomes.iter().filter(|o| o.status == status).count()
    }

    pub fn all_ok(&self) -> bool {
        self.outcomes
            .iter()
            .all(|o| matches!(o.status, OutcomeStatus::Success | OutcomeStatus::Skipped))
    }
}

/// Check in to every site, strictly one after another, pausing between
/// sites. Only descriptor problems (found before any request) abort; every
/// other failure becomes that site's outcome and the run moves on.
pub fn run(
    opts: &AppOptions,
    sites: &[SiteDescriptor],
    svc: &Services<'_>,
    today: NaiveDate,
    mut progress: Option<&mut dyn Progress>,
) -> Result<RunSummary, ConfigError> {
    let compiled = sites
        .iter()
        .map(|s| CompiledSite::compile(s, &opts.probe))
        .collect::<Result<Vec<_>, _>>()?;
    if compiled.is_empty() {
        return Err(ConfigError::NoSites);
    }

    let probe = Probe::new(svc.fetcher, svc.sleeper, opts.probe.clone());

    logf!("===== check-in run: {} site(s) =====", compiled.len());
    if let Some(p) = progress.as_deref_mut() {
        p.begin(compiled.len());
    }

    let mut summary = RunSummary::default();
    for (i, site) in compiled.iter().enumerate() {
        if i > 0 && !opts.run.site_pause.is_zero() {
            svc.sleeper.sleep(opts.run.site_pause);
        }
        if let Some(p) = progress.as_deref_mut() {
            p.log(&format!("Checking in: {}", site.site.name));
        }

        let outcome = check_site(opts, &probe, site, svc, today);

        if outcome.status.is_success() {
            if let Some(store) = svc.store {
                if let Err(e) = store.record_success(&outcome.site, today) {
                    loge!("Store: could not record {}: {}", outcome.site, e);
                }
            }
        }

        if opts.notify.mode == NotifyMode::PerSite {
            notify::deliver(svc.notifier, &report::site_title(&outcome), &outcome.message);
        }
        if let Some(p) = progress.as_deref_mut() {
            p.site_done(&outcome);
        }
        summary.outcomes.push(outcome);
    }

    if opts.notify.mode == NotifyMode::Summary {
        notify::deliver(svc.notifier, report::summary_title(), &report::markdown_table(&summary.outcomes));
    }

    if let Some(p) = progress.as_deref_mut() {
        p.finish();
    }
    logf!(
        "===== done: {} ok, {} skipped, {} failed =====",
        summary.count(OutcomeStatus::Success),
        summary.count(OutcomeStatus::Skipped),
        summary.outcomes.len()
            - summary.count(OutcomeStatus::Success)
            - summary.count(OutcomeStatus::Skipped)
    );
    Ok(summary)
}

fn check_site(
    opts: &AppOptions,
    probe: &Probe<'_>,
    site: &CompiledSite,
    svc: &Services<'_>,
    today: NaiveDate,
) -> Outcome {
    let name = &site.site.name;

    if !opts.run.force {
        if let Some(store) = svc.store {
            if store.already_signed(name, today) {
                logf!("[{}] already signed on {}, skipping", name, today);
                return Outcome::skipped(name, format!("今日({today})已签到，跳过。"));
            }
        }
    }

    match svc.credentials.credential(&site.site) {
        Some(cred) => probe.run(site, &cred),
        None => {
            logw!("[{}] no cookie configured, skipping", name);
            Outcome::skipped(name, "未在环境变量中找到Cookie配置，跳过该站点。")
        }
    }
}
