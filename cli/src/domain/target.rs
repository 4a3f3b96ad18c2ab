//! Readiness targets and their validation.
//!
//! Pure functions only, no I/O.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use url::{Host, Url};

use crate::domain::error::ReadinessError;

/// Hostname label rules (RFC 1123), applied to each dot-separated label.
static DOMAIN_RE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::expect_used)] // compile-time constant pattern
    Regex::new(r"^(?:[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?\.)*[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?\.?$")
        .expect("valid regex")
});

/// A validated HTTP(S) URL to probe for readiness.
///
/// Construction goes through [`Target::parse`] or [`Target::from_domain`], so
/// a `Target` always holds a parsed URL with an `http`/`https` scheme, a host
/// and no credentials. Anything the HTTP client would refuse to send is
/// rejected here instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    url: Url,
    host: String,
}

impl Target {
    /// Parse and validate a target URL.
    ///
    /// # Errors
    ///
    /// Returns [`ReadinessError::InvalidTarget`] if the input is empty, lacks a
    /// scheme, uses a scheme other than `http`/`https`, carries credentials,
    /// or is not a well-formed URL with a valid host.
    pub fn parse(input: &str) -> Result<Self, ReadinessError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(invalid(input, "URL is empty"));
        }

        // Checked on the raw text: the URL parser would read `https:///x`
        // as host `x`, and `example.com` fails with a less useful message.
        let Some((scheme, rest)) = trimmed.split_once("://") else {
            return Err(invalid(input, "missing scheme (expected http:// or https://)"));
        };
        if !scheme.eq_ignore_ascii_case("http") && !scheme.eq_ignore_ascii_case("https") {
            return Err(invalid(input, &format!("unsupported scheme '{scheme}'")));
        }
        if rest.is_empty() || rest.starts_with(['/', '?', '#']) {
            return Err(invalid(input, "missing host"));
        }

        let url = Url::parse(trimmed).map_err(|e| invalid(input, &e.to_string()))?;
        if !url.username().is_empty() || url.password().is_some() {
            return Err(invalid(input, "credentials in URL are not supported"));
        }
        let host = match url.host() {
            None => return Err(invalid(input, "missing host")),
            Some(Host::Domain(domain)) => {
                if !validate_domain(domain) {
                    return Err(invalid(input, &format!("invalid host '{domain}'")));
                }
                domain.to_string()
            }
            Some(Host::Ipv4(addr)) => addr.to_string(),
            Some(Host::Ipv6(addr)) => addr.to_string(),
        };

        Ok(Self { url, host })
    }

    /// Build an `https://` target from a bare domain name, as read from
    /// deployment outputs.
    ///
    /// # Errors
    ///
    /// Returns [`ReadinessError::InvalidTarget`] if `domain` is not a valid
    /// hostname (for example when it already carries a scheme or a path).
    pub fn from_domain(domain: &str) -> Result<Self, ReadinessError> {
        let domain = domain.trim();
        if !validate_domain(domain) {
            return Err(invalid(domain, "not a valid domain name"));
        }
        Self::parse(&format!("https://{}", domain.trim_end_matches('.')))
    }

    /// The normalized URL, e.g. `https://example.com/`.
    #[must_use]
    pub fn url(&self) -> &str {
        self.url.as_str()
    }

    /// The lowercase host component (without port or brackets).
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.url.as_str())
    }
}

/// Returns `true` when `domain` is a syntactically valid DNS hostname.
#[must_use]
pub fn validate_domain(domain: &str) -> bool {
    !domain.is_empty() && domain.len() <= 253 && DOMAIN_RE.is_match(domain)
}

fn invalid(input: &str, reason: &str) -> ReadinessError {
    ReadinessError::InvalidTarget {
        input: input.to_string(),
        reason: reason.to_string(),
    }
}
