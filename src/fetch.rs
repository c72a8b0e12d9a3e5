// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Retrieval of raw light-curve payloads from the catalog service.
//!
//! [`Fetch`] is the seam between validation and normalization. The shipped
//! implementation, [`HttpFetcher`], issues exactly one blocking GET per
//! call; [`RetryingFetcher`] wraps any fetcher and repeats transport
//! failures according to a [`RetryPolicy`].

use std::thread;

use reqwest::blocking::Client;
use reqwest::{StatusCode, Url};

use crate::catalog::LightCurveRequest;
use crate::config::{ClientConfig, RetryPolicy};
use crate::error::{LcrError, Result};
use crate::payload::RawPayload;

/// Query parameter selecting the light-curve endpoint of the service.
pub const REQUEST_TYPE: (&str, &str) = ("typeOfRequest", "lightCurveData");

/// Source of raw payloads for validated requests.
pub trait Fetch {
    fn fetch(&self, request: &LightCurveRequest) -> Result<RawPayload>;
}

impl<F: Fetch + ?Sized> Fetch for &F {
    fn fetch(&self, request: &LightCurveRequest) -> Result<RawPayload> {
        (**self).fetch(request)
    }
}

impl<F: Fetch + ?Sized> Fetch for Box<F> {
    fn fetch(&self, request: &LightCurveRequest) -> Result<RawPayload> {
        (**self).fetch(request)
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// HTTP
// ═══════════════════════════════════════════════════════════════════════════

/// Blocking HTTP client for the repository's query endpoint.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    base_url: Url,
}

impl HttpFetcher {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        config.validate()?;
        let base_url = Url::parse(&config.base_url).map_err(|e| LcrError::InvalidConfig {
            reason: format!("base URL '{}': {e}", config.base_url),
        })?;

        let mut builder = Client::builder().user_agent(config.user_agent.clone());
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| LcrError::InvalidConfig {
            reason: format!("could not build HTTP client: {e}"),
        })?;

        Ok(Self { client, base_url })
    }

    /// Fetcher configured from the environment, see [`ClientConfig::from_env`].
    pub fn from_env() -> Result<Self> {
        Self::new(&ClientConfig::from_env()?)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Full query URL for `request`, percent-encoded.
    pub fn request_url(&self, request: &LightCurveRequest) -> Result<Url> {
        let params = std::iter::once((REQUEST_TYPE.0, REQUEST_TYPE.1.to_string()))
            .chain(request.query_pairs());
        Url::parse_with_params(self.base_url.as_str(), params).map_err(|e| {
            LcrError::InvalidConfig {
                reason: format!("base URL '{}': {e}", self.base_url),
            }
        })
    }
}

impl Fetch for HttpFetcher {
    fn fetch(&self, request: &LightCurveRequest) -> Result<RawPayload> {
        let url = self.request_url(request)?;
        tracing::debug!(%url, "requesting light curve");

        let response = self.client.get(url).send().map_err(transport)?;
        let status = response.status();
        if !status.is_success() {
            return Err(LcrError::HttpStatus {
                code: status.as_u16(),
            });
        }

        let body = response.text().map_err(transport)?;
        let payload = RawPayload::from_json_str(&body)?;
        accept(status, payload)
    }
}

/// Success requires a 2xx status and at least one analyzed bin; the
/// service answers unknown or empty queries with `200` and an empty `ts`.
pub fn accept(status: StatusCode, payload: RawPayload) -> Result<RawPayload> {
    if status.is_success() && payload.has_bins() {
        Ok(payload)
    } else {
        Err(LcrError::HttpStatus {
            code: status.as_u16(),
        })
    }
}

fn transport(err: reqwest::Error) -> LcrError {
    LcrError::Transport {
        reason: err.to_string(),
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Retry
// ═══════════════════════════════════════════════════════════════════════════

/// Repeats [`LcrError::Transport`] failures of the inner fetcher.
///
/// Every other error, HTTP statuses included, is returned after the first
/// attempt.
#[derive(Debug, Clone)]
pub struct RetryingFetcher<F> {
    inner: F,
    policy: RetryPolicy,
}

impl<F: Fetch> RetryingFetcher<F> {
    pub fn new(inner: F, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    pub fn into_inner(self) -> F {
        self.inner
    }
}

impl RetryingFetcher<HttpFetcher> {
    /// HTTP fetcher retrying as `config.retry` says.
    pub fn http(config: &ClientConfig) -> Result<Self> {
        Ok(Self::new(HttpFetcher::new(config)?, config.retry))
    }
}

impl<F: Fetch> Fetch for RetryingFetcher<F> {
    fn fetch(&self, request: &LightCurveRequest) -> Result<RawPayload> {
        let attempts = self.policy.max_attempts.max(1);
        let mut attempt = 1;
        loop {
            match self.inner.fetch(request) {
                Err(err) if err.is_retryable() && attempt < attempts => {
                    tracing::warn!(
                        source = request.source(),
                        attempt,
                        attempts,
                        error = %err,
                        "retrying light-curve request"
                    );
                    if !self.policy.backoff.is_zero() {
                        thread::sleep(self.policy.backoff);
                    }
                    attempt += 1;
                }
                result => return result,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::SourceCatalog;
    use serde_json::json;
    use std::cell::Cell;
    use std::io::{BufRead, BufReader, Write};
    use std::net::TcpListener;
    use std::sync::mpsc;
    use std::time::Duration;

    const SRC: &str = "4FGL J0534.5+2200";

    fn request() -> LightCurveRequest {
        let registry = SourceCatalog::new([SRC]);
        LightCurveRequest::new(SRC, "weekly", "energy", "free", 3.0, &registry).unwrap()
    }

    /// Answer one connection with `status` and `body`; the request line is
    /// sent back through the returned channel.
    fn serve_once(status: &str, body: &str) -> (String, mpsc::Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}/queryDB.php", listener.local_addr().unwrap());
        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            let mut request_line = String::new();
            reader.read_line(&mut request_line).unwrap();
            let mut line = String::new();
            while reader.read_line(&mut line).unwrap() > 2 {
                line.clear();
            }
            stream.write_all(response.as_bytes()).unwrap();
            stream.flush().unwrap();
            tx.send(request_line).unwrap();
        });
        (url, rx)
    }

    fn fetcher(url: &str) -> HttpFetcher {
        let config = ClientConfig::default()
            .with_base_url(url)
            .with_timeout(Duration::from_secs(10));
        HttpFetcher::new(&config).unwrap()
    }

    #[test]
    fn query_url_is_percent_encoded() {
        let url = fetcher("https://example.org/lcr/queryDB.php")
            .request_url(&request())
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://example.org/lcr/queryDB.php?typeOfRequest=lightCurveData\
             &source_name=4FGL+J0534.5%2B2200&cadence=weekly&flux_type=energy\
             &index_type=free&ts_min=3"
        );
    }

    #[test]
    fn fetches_and_decodes() {
        let body = json!({ "ts": [[10.0, 25.0]], "flux": [] }).to_string();
        let (url, rx) = serve_once("200 OK", &body);
        let payload = fetcher(&url).fetch(&request()).unwrap();
        assert_eq!(payload.ts_len(), 1);

        let request_line = rx.recv().unwrap();
        assert!(request_line.starts_with("GET /queryDB.php?typeOfRequest=lightCurveData&"));
        assert!(request_line.contains("source_name=4FGL+J0534.5%2B2200"));
    }

    #[test]
    fn empty_ts_with_200_is_not_success() {
        let (url, _rx) = serve_once("200 OK", r#"{"ts": []}"#);
        assert_eq!(
            fetcher(&url).fetch(&request()),
            Err(LcrError::HttpStatus { code: 200 })
        );
    }

    #[test]
    fn error_status_is_reported() {
        let (url, _rx) = serve_once("503 Service Unavailable", "");
        assert_eq!(
            fetcher(&url).fetch(&request()),
            Err(LcrError::HttpStatus { code: 503 })
        );
    }

    #[test]
    fn invalid_json_is_decode_error() {
        let (url, _rx) = serve_once("200 OK", "<html>maintenance</html>");
        assert!(matches!(
            fetcher(&url).fetch(&request()),
            Err(LcrError::Decode { .. })
        ));
    }

    #[test]
    fn refused_connection_is_transport_error() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}/queryDB.php", listener.local_addr().unwrap());
        drop(listener);
        assert!(matches!(
            fetcher(&url).fetch(&request()),
            Err(LcrError::Transport { .. })
        ));
    }

    #[test]
    fn accept_rules() {
        let empty = RawPayload::from_value(json!({ "ts": [] })).unwrap();
        let full = RawPayload::from_value(json!({ "ts": [[1.0, 2.0]] })).unwrap();
        assert!(accept(StatusCode::OK, full.clone()).is_ok());
        assert_eq!(
            accept(StatusCode::OK, empty),
            Err(LcrError::HttpStatus { code: 200 })
        );
        assert_eq!(
            accept(StatusCode::NOT_FOUND, full),
            Err(LcrError::HttpStatus { code: 404 })
        );
    }

    #[test]
    fn bad_base_url_is_config_error() {
        let config = ClientConfig::default().with_base_url("queryDB.php");
        assert!(matches!(
            HttpFetcher::new(&config),
            Err(LcrError::InvalidConfig { .. })
        ));
    }

    /// Fails with `errors` in order, then succeeds.
    struct Flaky {
        errors: Vec<LcrError>,
        calls: Cell<usize>,
    }

    impl Fetch for Flaky {
        fn fetch(&self, _request: &LightCurveRequest) -> Result<RawPayload> {
            let n = self.calls.get();
            self.calls.set(n + 1);
            match self.errors.get(n) {
                Some(err) => Err(err.clone()),
                None => RawPayload::from_value(json!({ "ts": [[1.0, 2.0]] })),
            }
        }
    }

    fn flaky(errors: Vec<LcrError>) -> Flaky {
        Flaky {
            errors,
            calls: Cell::new(0),
        }
    }

    fn dns() -> LcrError {
        LcrError::Transport {
            reason: "dns lookup failed".into(),
        }
    }

    #[test]
    fn retries_transport_errors() {
        let inner = flaky(vec![dns(), dns()]);
        let fetcher = RetryingFetcher::new(&inner, RetryPolicy::attempts(3, Duration::ZERO));
        assert!(fetcher.fetch(&request()).is_ok());
        assert_eq!(inner.calls.get(), 3);
    }

    #[test]
    fn gives_up_after_max_attempts() {
        let inner = flaky(vec![dns(), dns(), dns()]);
        let fetcher = RetryingFetcher::new(&inner, RetryPolicy::attempts(2, Duration::ZERO));
        assert_eq!(fetcher.fetch(&request()), Err(dns()));
        assert_eq!(inner.calls.get(), 2);
    }

    #[test]
    fn never_retries_http_status() {
        let inner = flaky(vec![LcrError::HttpStatus { code: 500 }]);
        let fetcher = RetryingFetcher::new(&inner, RetryPolicy::attempts(5, Duration::ZERO));
        assert_eq!(
            fetcher.fetch(&request()),
            Err(LcrError::HttpStatus { code: 500 })
        );
        assert_eq!(inner.calls.get(), 1);
    }

    #[test]
    fn zero_attempts_still_tries_once() {
        let inner = flaky(vec![]);
        let fetcher = RetryingFetcher::new(&inner, RetryPolicy::attempts(0, Duration::ZERO));
        assert!(fetcher.fetch(&request()).is_ok());
        assert_eq!(inner.calls.get(), 1);
    }
}
