// tests/common/mod.rs
//
// Scripted collaborators: no network, no real sleeping.
//
#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;
use std::error::Error;
use std::time::Duration;

use checkin::core::net::{FetchError, Fetcher, Request, Response};
use checkin::engine::retry::Sleeper;
use checkin::notify::Notifier;

/// Hands out canned responses in order; repeats the last one when the
/// script runs out.
pub struct ScriptedFetcher {
    script: RefCell<VecDeque<Result<String, String>>>,
    last: RefCell<Option<Result<String, String>>>,
    pub requests: RefCell<Vec<Request>>,
}

impl ScriptedFetcher {
    pub fn new(script: Vec<Result<&str, &str>>) -> Self {
        Self {
            script: RefCell::new(
                script
                    .into_iter()
                    .map(|r| r.map(str::to_string).map_err(str::to_string))
                    .collect(),
            ),
            last: RefCell::new(None),
            requests: RefCell::new(Vec::new()),
        }
    }

    pub fn always(body: &str) -> Self {
        Self::new(vec![Ok(body)])
    }

    pub fn calls(&self) -> usize {
        self.requests.borrow().len()
    }
}

impl Fetcher for ScriptedFetcher {
    fn get(&self, req: &Request) -> Result<Response, FetchError> {
        self.requests.borrow_mut().push(req.clone());
        let next = self.script.borrow_mut().pop_front();
        let step = match next {
            Some(s) => {
                *self.last.borrow_mut() = Some(s.clone());
                s
            }
            None => self
                .last
                .borrow()
                .clone()
                .unwrap_or_else(|| Err("empty script".to_string())),
        };
        match step {
            Ok(body) => Ok(Response { status: 200, body }),
            Err(e) => Err(FetchError::Transport(e)),
        }
    }
}

#[derive(Default)]
pub struct RecordingSleeper {
    pub sleeps: RefCell<Vec<Duration>>,
}

impl Sleeper for RecordingSleeper {
    fn sleep(&self, d: Duration) {
        self.sleeps.borrow_mut().push(d);
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    pub sent: RefCell<Vec<(String, String)>>,
}

impl Notifier for RecordingNotifier {
    fn send(&self, title: &str, message: &str) -> Result<(), Box<dyn Error>> {
        self.sent.borrow_mut().push((title.to_string(), message.to_string()));
        Ok(())
    }
}

pub const SCENARIO_A_BODY: &str =
    "<td>这是您的第 <b>7</b> 次签到，已连续签到 <b>7</b> 天。今日签到排名：<b>3</b> / <b>88</b></td>\
     <span class=\"medium\">魔力值 [使用]: 12,345.6</span>";
