//! Property-based tests for target validation and config handling.
//!
//! Uses `proptest` to verify invariants across many random inputs.

#![allow(clippy::expect_used)]

use std::time::Duration;

use proptest::prelude::*;

use sitedeploy_cli::domain::config::{VALID_CONFIG_KEYS, validate_config_key};
use sitedeploy_cli::domain::readiness::{NextStep, format_elapsed};
use sitedeploy_cli::domain::{
    PollSession, ProbeOutcome, ReadinessPolicy, SessionState, SiteConfig, Target,
    apply_config_value,
};

fn label() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9]{0,10}"
}

fn hostname() -> impl Strategy<Value = String> {
    proptest::collection::vec(label(), 1..4).prop_map(|labels| labels.join("."))
}

// ============================================================================
// Target::parse
// ============================================================================

proptest! {
    /// Every http(s) URL with a valid hostname parses, and keeps its host.
    #[test]
    fn prop_valid_urls_parse(
        https in proptest::bool::ANY,
        host in hostname(),
        port in proptest::option::of(1u16..),
        path in "(/[a-z0-9]{0,8}){0,3}",
    ) {
        let scheme = if https { "https" } else { "http" };
        let url = match port {
            Some(p) => format!("{scheme}://{host}:{p}{path}"),
            None => format!("{scheme}://{host}{path}"),
        };
        let target = Target::parse(&url).expect("valid url");
        prop_assert_eq!(target.host(), host.as_str());
        prop_assert!(target.url().starts_with(scheme));
    }

    /// Input without a `://` separator is always rejected.
    #[test]
    fn prop_scheme_less_input_rejected(input in "[a-zA-Z0-9./:-]{0,40}") {
        prop_assume!(!input.contains("://"));
        prop_assert!(Target::parse(&input).is_err());
    }

    /// Schemes other than http and https are rejected.
    #[test]
    fn prop_other_schemes_rejected(scheme in "[a-z]{2,8}", host in hostname()) {
        prop_assume!(scheme != "http" && scheme != "https");
        let url = format!("{scheme}://{host}");
        prop_assert!(Target::parse(&url).is_err());
    }

    /// Scheme and host case never matter.
    #[test]
    fn prop_scheme_and_host_are_case_insensitive(host in hostname()) {
        let upper = format!("HTTPS://{}", host.to_ascii_uppercase());
        let target = Target::parse(&upper).expect("valid url");
        prop_assert_eq!(target.host(), host.as_str());
        prop_assert!(target.url().starts_with("https://"));
    }

    /// A bare domain becomes an https target for the same host.
    #[test]
    fn prop_from_domain_is_https(host in hostname()) {
        let target = Target::from_domain(&host).expect("valid domain");
        prop_assert_eq!(target.url(), format!("https://{host}/"));
    }
}

// ============================================================================
// PollSession
// ============================================================================

proptest! {
    /// A session never asks to sleep past its time budget.
    #[test]
    fn prop_sleep_never_exceeds_remaining_budget(
        interval in 1u64..600,
        max_wait in 1u64..3600,
        elapsed in 0u64..3600,
    ) {
        let policy = ReadinessPolicy {
            interval: Duration::from_secs(interval),
            max_wait: Duration::from_secs(max_wait),
            ..ReadinessPolicy::default()
        };
        let target = Target::parse("https://example.com").expect("valid");
        let mut session = PollSession::new(target, policy);

        let next = session.record(ProbeOutcome::status(503), Duration::from_secs(elapsed));

        if let NextStep::Sleep(d) = next {
            prop_assert_eq!(session.state(), SessionState::Running);
            prop_assert!(d <= Duration::from_secs(interval));
            prop_assert!(Duration::from_secs(elapsed) + d <= Duration::from_secs(max_wait));
        } else {
            prop_assert!(elapsed >= max_wait, "stopped early: {:?}", session.state());
        }
    }

    /// A probe's timeout never carries the session past `max_wait` plus one
    /// interval.
    #[test]
    fn prop_probe_timeout_stays_within_bound(
        interval in 1u64..600,
        max_wait in 1u64..3600,
        probe_timeout in 1u64..600,
        elapsed in 0u64..3600,
    ) {
        prop_assume!(elapsed <= max_wait);
        let policy = ReadinessPolicy {
            interval: Duration::from_secs(interval),
            max_wait: Duration::from_secs(max_wait),
            probe_timeout: Duration::from_secs(probe_timeout),
            ..ReadinessPolicy::default()
        };
        let session = PollSession::new(Target::parse("https://example.com").expect("valid"), policy);

        let timeout = session.probe_timeout(Duration::from_secs(elapsed));

        prop_assert!(timeout > Duration::ZERO);
        prop_assert!(timeout <= policy.probe_timeout);
        prop_assert!(Duration::from_secs(elapsed) + timeout <= policy.max_wait + policy.interval);
    }

    /// Any status other than the ready status keeps the session running
    /// while budget remains.
    #[test]
    fn prop_non_ready_status_keeps_running(code in 100u16..600) {
        prop_assume!(code != 200);
        let target = Target::parse("https://example.com").expect("valid");
        let mut session = PollSession::new(target, ReadinessPolicy::default());

        session.record(ProbeOutcome::status(code), Duration::ZERO);

        prop_assert_eq!(session.state(), SessionState::Running);
    }

    /// Elapsed formatting always ends in seconds.
    #[test]
    fn prop_format_elapsed_ends_in_seconds(secs in 0u64..1_000_000) {
        let s = format_elapsed(Duration::from_secs(secs));
        prop_assert!(s.ends_with('s'), "{}", s);
    }
}

// ============================================================================
// Config keys
// ============================================================================

proptest! {
    /// Arbitrary keys (not in whitelist) are rejected.
    #[test]
    fn prop_arbitrary_keys_rejected(key in "[a-z_]{1,20}(\\.[a-z_]{1,20})?") {
        prop_assume!(!VALID_CONFIG_KEYS.contains(&key.as_str()));
        prop_assert!(validate_config_key(&key).is_err(), "accepted invalid key: {key}");
    }

    /// Interval values round-trip through the config into the policy.
    #[test]
    fn prop_interval_reaches_policy(secs in 0u64..100_000) {
        let mut config = SiteConfig::default();
        apply_config_value(&mut config, "readiness.interval_secs", &secs.to_string())
            .expect("valid value");
        prop_assert_eq!(config.readiness.policy().interval, Duration::from_secs(secs));
    }
}

#[test]
fn test_every_valid_key_is_accepted() {
    for key in VALID_CONFIG_KEYS {
        assert!(validate_config_key(key).is_ok(), "{key}");
    }
}
