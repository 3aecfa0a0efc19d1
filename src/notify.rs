// src/notify.rs
use std::error::Error;
use std::time::Duration;

use crate::config::options::NotifyOptions;

/// Delivery channel for `(title, message)`.
pub trait Notifier {
    fn send(&self, title: &str, message: &str) -> Result<(), Box<dyn Error>>;
}

/// Send and swallow: a failed notification is logged, never raised.
pub fn deliver(n: &dyn Notifier, title: &str, message: &str) -> bool {
    match n.send(title, message) {
        Ok(()) => true,
        Err(e) => {
            loge!("Notify: '{}' not delivered: {}", title, e);
            false
        }
    }
}

/// Always available: writes the notification to the log.
#[derive(Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn send(&self, title: &str, message: &str) -> Result<(), Box<dyn Error>> {
        logf!("Notify: {}\n{}", title, message);
        Ok(())
    }
}

/// POSTs `{"title": .., "content": ..}` as JSON.
#[derive(Debug)]
pub struct WebhookNotifier {
    url: String,
    timeout: Duration,
}

impl WebhookNotifier {
    pub fn new(url: &str) -> Self {
        Self { url: s!(url), timeout: Duration::from_secs(10) }
    }
}

impl Notifier for WebhookNotifier {
    fn send(&self, title: &str, message: &str) -> Result<(), Box<dyn Error>> {
        let client = reqwest::blocking::Client::builder().timeout(self.timeout).build()?;
        client
            .post(&self.url)
            .json(&serde_json::json!({ "title": title, "content": message }))
            .send()?
            .error_for_status()?;
        logd!("Notify: webhook accepted '{}'", title);
        Ok(())
    }
}

/// Fan out to every sink; one failing does not stop the others.
#[derive(Default)]
pub struct MultiNotifier {
    sinks: Vec<Box<dyn Notifier>>,
}

impl MultiNotifier {
    pub fn new(sinks: Vec<Box<dyn Notifier>>) -> Self {
        Self { sinks }
    }
}

impl Notifier for MultiNotifier {
    fn send(&self, title: &str, message: &str) -> Result<(), Box<dyn Error>> {
        let failed = self
            .sinks
            .iter()
            .map(|sink| deliver(sink.as_ref(), title, message))
            .filter(|ok| !ok)
            .count();
        if failed > 0 {
            return Err(format!("{failed} of {} sinks failed", self.sinks.len()).into());
        }
        Ok(())
    }
}

pub fn from_options(opts: &NotifyOptions) -> Box<dyn Notifier> {
    let mut sinks: Vec<Box<dyn Notifier>> = vec![Box::new(LogNotifier)];
    if let Some(url) = &opts.webhook {
        sinks.push(Box::new(WebhookNotifier::new(url)));
    }
    Box::new(MultiNotifier::new(sinks))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    struct Failing;
    impl Notifier for Failing {
        fn send(&self, _: &str, _: &str) -> Result<(), Box<dyn Error>> {
            Err("channel down".into())
        }
    }

    #[derive(Default)]
    struct Recording(RefCell<Vec<String>>);
    impl Notifier for &Recording {
        fn send(&self, title: &str, _: &str) -> Result<(), Box<dyn Error>> {
            self.0.borrow_mut().push(s!(title));
            Ok(())
        }
    }

    #[test]
    fn deliver_swallows_errors() {
        assert!(!deliver(&Failing, "t", "m"));
        assert!(deliver(&LogNotifier, "t", "m"));
    }

    #[test]
    fn multi_keeps_going_after_failure() {
        let rec: &'static Recording = Box::leak(Box::default());
        let multi = MultiNotifier::new(vec![Box::new(Failing), Box::new(rec)]);
        assert!(multi.send("title", "m").is_err());
        assert_eq!(*rec.0.borrow(), vec![s!("title")]);
    }
}
