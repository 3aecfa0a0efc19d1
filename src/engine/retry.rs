// src/engine/retry.rs
//! Fixed-delay retry loop, shared by every site.

use std::time::Duration;

use super::types::AttemptStatus;

/// Blocking pause between attempts (and between sites). Injected so tests
/// can count delays instead of waiting for them.
pub trait Sleeper {
    fn sleep(&self, d: Duration);
}

#[derive(Debug, Default)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, d: Duration) {
        std::thread::sleep(d);
    }
}

/// What the attempt closure tells the loop.
pub enum Flow<T> {
    /// Terminal result, stop now.
    Done(T),
    /// Failed attempt; retry if budget remains.
    Retry(T),
}

#[derive(Debug, PartialEq, Eq)]
pub enum Retried<T> {
    Finished { value: T, attempts: u32 },
    Exhausted { last: T, attempts: u32 },
}

#[derive(Clone, Debug)]
pub struct RetryPolicy {
    /// `0` is treated as `1`.
    pub max_attempts: u32,
    pub delay: Duration,
    retryable: fn(Option<AttemptStatus>) -> bool,
}

/// Everything except `Success`/`AuthInvalid` is worth another try,
/// including transport failures (`None`).
pub fn default_retryable(status: Option<AttemptStatus>) -> bool {
    match status {
        Some(s) => !s.is_terminal(),
        None => true,
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self { max_attempts, delay, retryable: default_retryable }
    }

    pub fn with_retryable(mut self, f: fn(Option<AttemptStatus>) -> bool) -> Self {
        self.retryable = f;
        self
    }

    pub fn is_retryable(&self, status: Option<AttemptStatus>) -> bool {
        (self.retryable)(status)
    }

    /// Run `attempt(n)` (1-based) until it returns `Flow::Done` or the budget
    /// is spent. Sleeps `delay` between attempts, never after the last one.
    /// A zero budget still makes one attempt.
    pub fn run<T>(&self, sleeper: &dyn Sleeper, mut attempt: impl FnMut(u32) -> Flow<T>) -> Retried<T> {
        let max = self.max_attempts.max(1);
        let mut n = 0u32;
        loop {
            n += 1;
            match attempt(n) {
                Flow::Done(value) => return Retried::Finished { value, attempts: n },
                Flow::Retry(last) => {
                    if n >= max {
                        return Retried::Exhausted { last, attempts: n };
                    }
                    logd!("retry: attempt {}/{} failed, sleeping {:?}", n, max, self.delay);
                    sleeper.sleep(self.delay);
                }
            }
        }
    }
}
