// src/core/net.rs
//! HTTP GET seam. The probe only ever talks to `Fetcher`; the real client
//! is `HttpFetcher` (blocking reqwest), tests plug in scripted fakes.

use std::time::Duration;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(String),

    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },

    #[error("could not build HTTP client: {0}")]
    Client(String),
}

/// One GET, fully described. Header names are kept as given.
#[derive(Clone, Debug)]
pub struct Request {
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub timeout: Duration,
    pub verify_tls: bool,
    /// Treat a non-2xx status as a failed request.
    pub require_success: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub body: String,
}

pub trait Fetcher {
    fn get(&self, req: &Request) -> Result<Response, FetchError>;
}

/// Blocking reqwest client. A fresh client per request, because TLS
/// verification and timeout are per site.
#[derive(Debug, Default)]
pub struct HttpFetcher;

impl HttpFetcher {
    pub fn new() -> Self {
        Self
    }

    fn client(req: &Request) -> Result<reqwest::blocking::Client, FetchError> {
        reqwest::blocking::Client::builder()
            .timeout(req.timeout)
            .danger_accept_invalid_certs(!req.verify_tls)
            .gzip(true)
            .build()
            .map_err(|e| FetchError::Client(e.to_string()))
    }
}

impl Fetcher for HttpFetcher {
    fn get(&self, req: &Request) -> Result<Response, FetchError> {
        let client = Self::client(req)?;

        let mut builder = client.get(&req.url);
        for (name, value) in &req.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let resp = builder
            .send()
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let status = resp.status();
        if req.require_success && !status.is_success() {
            return Err(FetchError::Status { status: status.as_u16(), url: req.url.clone() });
        }

        let body = resp
            .text()
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        logd!("GET {} → {} ({} bytes)", req.url, status.as_u16(), body.len());
        Ok(Response { status: status.as_u16(), body })
    }
}
