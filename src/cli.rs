// src/cli.rs
use std::{error::Error, path::PathBuf, time::Duration};

use crate::{
    config::options::{AppOptions, NotifyMode, SiteSelector},
    core::net::HttpFetcher,
    credentials,
    engine::{retry::ThreadSleeper, types::Outcome},
    error::ConfigError,
    log, notify,
    progress::Progress,
    report,
    runner::{self, RunSummary, Services},
    specs,
    store::CheckinStore,
};

pub const HELP: &str = include_str!("cli_help.txt");

pub enum Command {
    Run(AppOptions),
    Help,
}

/// Prints one line per finished site.
struct CliProgress {
    total: usize,
    done: usize,
}

impl Progress for CliProgress {
    fn begin(&mut self, total: usize) {
        self.total = total;
    }
    fn site_done(&mut self, o: &Outcome) {
        self.done += 1;
        println!("[{}/{}] {} {}", self.done, self.total, o.site, report::status_label(o.status));
    }
}

pub fn run(opts: AppOptions) -> Result<RunSummary, Box<dyn Error>> {
    let opts = opts.with_env();
    log::init(&opts.log, &opts.run);

    let sites = specs::resolve(opts.run.sites_file.as_deref(), &opts.run.sites)?;

    if opts.run.list_sites {
        for s in &sites {
            println!("{},{}", s.name, s.url);
        }
        return Ok(RunSummary::default());
    }

    let creds = credentials::from_env(&sites, opts.probe.request_timeout)?;
    let store = opts.run.use_store.then(|| CheckinStore::new(opts.run.store_path()));
    let notifier = notify::from_options(&opts.notify);
    let fetcher = HttpFetcher::new();
    let sleeper = ThreadSleeper;

    let svc = Services {
        fetcher: &fetcher,
        sleeper: &sleeper,
        credentials: &creds,
        store: store.as_ref(),
        notifier: notifier.as_ref(),
    };

    let today = chrono::Local::now().date_naive();
    let mut progress = CliProgress { total: 0, done: 0 };
    let summary = runner::run(&opts, &sites, &svc, today, Some(&mut progress))?;

    for line in report::plain_lines(&summary.outcomes) {
        println!("{line}");
    }
    Ok(summary)
}

pub fn parse_args<I>(args: I) -> Result<Command, ConfigError>
where
    I: IntoIterator<Item = String>,
{
    let mut opts = AppOptions::default();
    let mut args = args.into_iter();

    while let Some(a) = args.next() {
        match a.as_str()
        {
            "--sites" => opts.run.sites_file = Some(PathBuf::from(args.next().ok_or("Missing sites file")?)),
            "--only" => {
                let v = args.next().ok_or("Missing value for --only")?;
                opts.run.sites = SiteSelector::Names(parse_names(&v)?);}
            "--attempts" => {
                let v: u32 = parse_num(args.next(), "--attempts")?;
                if v == 0 { return Err("--attempts must be at least 1".into()); }
                opts.probe.max_attempts = v; }
            "--delay" => opts.probe.retry_delay = Duration::from_secs(parse_num(args.next(), "--delay")?),
            "--timeout" => {
                let v: u64 = parse_num(args.next(), "--timeout")?;
                if v == 0 { return Err("--timeout must be at least 1".into()); }
                opts.probe.request_timeout = Duration::from_secs(v); }
            "--pause" => opts.run.site_pause = Duration::from_secs(parse_num(args.next(), "--pause")?),
            "--store-dir" => opts.run.store_dir = PathBuf::from(args.next().ok_or("Missing store dir")?),
            "--force" => opts.run.force = true,
            "--no-store" => opts.run.use_store = false,
            "--per-site" => opts.notify.mode = NotifyMode::PerSite,
            "--summary" => opts.notify.mode = NotifyMode::Summary,
            "--webhook" => opts.notify.webhook = Some(args.next().ok_or("Missing webhook URL")?),
            "--list-sites" => opts.run.list_sites = true,
            "--no-log-file" => opts.log.to_file = false,
            "-v" | "--verbose" => opts.log.verbose = true,
            "-h" | "--help" => return Ok(Command::Help),
            _ => return Err(format!("Unknown arg: {}", a).into()),
        }
    }

    Ok(Command::Run(opts))
}

fn parse_num<T: std::str::FromStr>(v: Option<String>, flag: &str) -> Result<T, ConfigError> {
    let v = v.ok_or_else(|| format!("Missing value for {flag}"))?;
    v.trim()
        .parse()
        .map_err(|_| ConfigError::Cli(format!("Invalid number for {flag}: {v}")))
}

fn parse_names(s: &str) -> Result<Vec<String>, ConfigError> {
    let mut out: Vec<String> = Vec::new();
    for part in s.split(',') {
        let part = part.trim();
        if part.is_empty() { continue; }
        if !out.iter().any(|n| n.eq_ignore_ascii_case(part)) {
            out.push(s!(part));
        }
    }
    if out.is_empty() {
        return Err("Empty site list for --only".into());
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s!(*s)).collect()
    }

    #[test]
    fn defaults_without_args() {
        let Command::Run(o) = parse_args(args(&[])).unwrap() else { panic!("expected run") };
        assert_eq!(o, AppOptions::default());
    }

    #[test]
    fn parses_probe_and_run_flags() {
        let Command::Run(o) = parse_args(args(&[
            "--attempts", "5", "--delay", "1", "--timeout", "3", "--pause", "0",
            "--only", "HDtime, ggpt,hdtime", "--force", "--per-site",
        ]))
        .unwrap() else { panic!("expected run") };

        assert_eq!(o.probe.max_attempts, 5);
        assert_eq!(o.probe.retry_delay, Duration::from_secs(1));
        assert_eq!(o.probe.request_timeout, Duration::from_secs(3));
        assert!(o.run.site_pause.is_zero());
        assert_eq!(o.run.sites, SiteSelector::Names(vec![s!("HDtime"), s!("ggpt")]));
        assert!(o.run.force);
        assert_eq!(o.notify.mode, NotifyMode::PerSite);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(parse_args(args(&["--attempts", "0"])).is_err());
        assert!(parse_args(args(&["--attempts", "x"])).is_err());
        assert!(parse_args(args(&["--delay"])).is_err());
        assert!(parse_args(args(&["--only", " , "])).is_err());
        assert!(parse_args(args(&["--bogus"])).is_err());
    }

    #[test]
    fn help_flag() {
        assert!(matches!(parse_args(args(&["-h"])).unwrap(), Command::Help));
    }
}
