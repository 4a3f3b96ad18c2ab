//! HTTP infrastructure: implements `HttpProbe` with `reqwest`.
//!
//! Certificate validation is disabled: the site is expected to be probed
//! while its ACM certificate and DNS records are still propagating.

use std::error::Error as _;
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::redirect::Policy;
use tracing::debug;

use crate::application::ports::HttpProbe;
use crate::domain::{ProbeMethod, ProbeOutcome, Target, TransportFailure};

const USER_AGENT: &str = concat!("sitedeploy/", env!("CARGO_PKG_VERSION"));

/// Production readiness probe.
pub struct ReqwestProbe {
    client: reqwest::Client,
}

impl ReqwestProbe {
    /// Build a client that skips certificate checks and never follows
    /// redirects, so a 301/302 is observed as "not ready" rather than chased.
    ///
    /// # Errors
    ///
    /// Returns an error if the TLS backend cannot be initialised.
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .danger_accept_invalid_certs(true)
            .redirect(Policy::none())
            .user_agent(USER_AGENT)
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self { client })
    }
}

impl HttpProbe for ReqwestProbe {
    async fn probe(&self, target: &Target, method: ProbeMethod, timeout: Duration) -> ProbeOutcome {
        let request = match method {
            ProbeMethod::Head => self.client.head(target.url()),
            ProbeMethod::Get => self.client.get(target.url()),
        };
        match request.timeout(timeout).send().await {
            Ok(resp) => {
                let code = resp.status().as_u16();
                debug!(url = %target, code, "probe response");
                ProbeOutcome::status(code)
            }
            Err(e) => {
                let failure = classify(&e);
                debug!(url = %target, error = %e, ?failure, "probe failed");
                ProbeOutcome::transport(failure, root_cause(&e))
            }
        }
    }
}

/// Map a `reqwest` error to a transport failure category.
fn classify(err: &reqwest::Error) -> TransportFailure {
    if err.is_timeout() {
        return TransportFailure::Timeout;
    }
    let chain = error_chain(err).to_ascii_lowercase();
    if chain.contains("dns") || chain.contains("failed to lookup") || chain.contains("name or service not known") {
        TransportFailure::Dns
    } else if chain.contains("certificate") || chain.contains("tls") || chain.contains("handshake") {
        TransportFailure::Tls
    } else if err.is_connect() {
        TransportFailure::Connect
    } else {
        TransportFailure::Other
    }
}

fn error_chain(err: &reqwest::Error) -> String {
    let mut parts = vec![err.to_string()];
    let mut source = err.source();
    while let Some(e) = source {
        parts.push(e.to_string());
        source = e.source();
    }
    parts.join(": ")
}

fn root_cause(err: &reqwest::Error) -> String {
    let mut last: &dyn std::error::Error = err;
    while let Some(next) = last.source() {
        last = next;
    }
    last.to_string()
}
