// src/health/probe.rs
use crate::statuspage::{ComponentStatus, ReportError};
use std::time::Duration;

/// Whole seconds a probe may take before it counts as slow.
pub const SLOW_THRESHOLD_SECS: u64 = 3;

/// What came back from the probed endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeResponse {
    pub status_code: u16,
    /// `None` when the body was not inspected.
    pub body_is_json: Option<bool>,
}

/// Transient result of one probe. `response` is `None` when the request
/// never completed (timeout, refused connection, TLS failure).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeResult {
    pub elapsed: Duration,
    pub response: Option<ProbeResponse>,
}

#[derive(Debug, thiserror::Error)]
pub enum CheckError {
    #[error("{target} request failed: {source}")]
    Transport {
        target: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{target} answered with HTTP {status}")]
    UnexpectedStatus { target: &'static str, status: u16 },

    #[error("{target} response body is not valid JSON")]
    MalformedBody { target: &'static str },

    #[error("{target} could not be reported")]
    Reporting {
        target: &'static str,
        #[source]
        source: ReportError,
    },
}

/// Map a probe result to the status to publish.
///
/// Severity only ever goes up: a slow answer is a performance issue, a
/// non-200 answer or an unparsable body is a major outage, and so is a
/// request that never completed.
pub fn classify(result: &ProbeResult) -> ComponentStatus {
    let Some(response) = result.response else {
        return ComponentStatus::MajorOutage;
    };

    let mut status = ComponentStatus::Operational;

    if result.elapsed.as_secs() > SLOW_THRESHOLD_SECS {
        status = status.escalate(ComponentStatus::PerformanceIssues);
    }
    if response.status_code != 200 {
        status = status.escalate(ComponentStatus::MajorOutage);
    }
    if response.body_is_json == Some(false) {
        status = status.escalate(ComponentStatus::MajorOutage);
    }

    status
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn responded(elapsed_ms: u64, status_code: u16, body_is_json: Option<bool>) -> ProbeResult {
        ProbeResult {
            elapsed: Duration::from_millis(elapsed_ms),
            response: Some(ProbeResponse {
                status_code,
                body_is_json,
            }),
        }
    }

    #[test]
    fn test_fast_ok_is_operational() {
        assert_eq!(classify(&responded(1200, 200, Some(true))), ComponentStatus::Operational);
        assert_eq!(classify(&responded(80, 200, None)), ComponentStatus::Operational);
    }

    #[test]
    fn test_slow_threshold_uses_whole_seconds() {
        assert_eq!(classify(&responded(3999, 200, None)), ComponentStatus::Operational);
        assert_eq!(
            classify(&responded(4000, 200, None)),
            ComponentStatus::PerformanceIssues
        );
    }

    #[test]
    fn test_error_status_overrides_slow() {
        assert_eq!(classify(&responded(500, 500, None)), ComponentStatus::MajorOutage);
        assert_eq!(classify(&responded(7000, 503, None)), ComponentStatus::MajorOutage);
    }

    #[test]
    fn test_malformed_body_is_major_outage() {
        assert_eq!(classify(&responded(200, 200, Some(false))), ComponentStatus::MajorOutage);
    }

    #[test]
    fn test_transport_failure_is_major_outage() {
        let result = ProbeResult {
            elapsed: Duration::from_secs(5),
            response: None,
        };
        assert_eq!(classify(&result), ComponentStatus::MajorOutage);
    }

    proptest! {
        #[test]
        fn prop_non_200_is_always_major_outage(
            elapsed_ms in 0u64..30_000,
            status_code in 100u16..600,
            body in proptest::option::of(any::<bool>()),
        ) {
            prop_assume!(status_code != 200);
            prop_assert_eq!(
                classify(&responded(elapsed_ms, status_code, body)),
                ComponentStatus::MajorOutage
            );
        }

        #[test]
        fn prop_slow_ok_is_performance_issues(elapsed_ms in 4_000u64..30_000) {
            prop_assert_eq!(
                classify(&responded(elapsed_ms, 200, Some(true))),
                ComponentStatus::PerformanceIssues
            );
        }

        #[test]
        fn prop_never_partial_outage(
            elapsed_ms in 0u64..30_000,
            status_code in 100u16..600,
            body in proptest::option::of(any::<bool>()),
        ) {
            prop_assert_ne!(
                classify(&responded(elapsed_ms, status_code, body)),
                ComponentStatus::PartialOutage
            );
        }
    }
}
