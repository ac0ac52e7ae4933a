// src/health/checker.rs
use super::probe::{classify, CheckError, ProbeResponse, ProbeResult};
use super::target::{CheckTarget, CheckTargets, TargetAuth};
use crate::statuspage::{ComponentStatus, ReportError, StatusReporter};
use crate::tracking::ErrorTracker;
use futures::FutureExt;
use reqwest::Client;
use serde_json::{json, Value};
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

pub struct HealthCheckRunner {
    targets: CheckTargets,
    reporter: StatusReporter,
    tracker: Arc<dyn ErrorTracker>,
    client: Client,
}

/// What one check decided and published.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckOutcome {
    pub target: &'static str,
    pub status: ComponentStatus,
    pub elapsed: Duration,
}

impl HealthCheckRunner {
    pub fn new(
        targets: CheckTargets,
        reporter: StatusReporter,
        tracker: Arc<dyn ErrorTracker>,
    ) -> Result<Self, reqwest::Error> {
        // Timeouts are set per request from each target.
        let client = Client::builder().build()?;

        Ok(Self {
            targets,
            reporter,
            tracker,
            client,
        })
    }

    /// Entry point for the scheduler. Never fails: an unexpected failure
    /// while running the checks is logged and forwarded, then dropped.
    pub async fn invoke(&self) -> Option<Vec<CheckOutcome>> {
        match AssertUnwindSafe(self.run()).catch_unwind().await {
            Ok(outcomes) => Some(outcomes),
            Err(panic) => {
                let err = anyhow::anyhow!(
                    "health check run aborted: {}",
                    panic_message(panic.as_ref())
                );
                error!(error = ?err, "Health check run failed");
                self.tracker.capture(&err).await;
                None
            }
        }
    }

    /// Run the three checks one after another.
    pub async fn run(&self) -> Vec<CheckOutcome> {
        let outcomes = vec![
            self.check_login().await,
            self.check_website().await,
            self.check_mongo().await,
        ];

        let failing = outcomes
            .iter()
            .filter(|o| o.status != ComponentStatus::Operational)
            .count();
        info!(
            "Health check complete: {} operational, {} degraded",
            outcomes.len() - failing,
            failing
        );

        outcomes
    }

    pub async fn check_login(&self) -> CheckOutcome {
        self.check(&self.targets.login).await
    }

    pub async fn check_website(&self) -> CheckOutcome {
        self.check(&self.targets.website).await
    }

    pub async fn check_mongo(&self) -> CheckOutcome {
        self.check(&self.targets.mongo).await
    }

    async fn check(&self, target: &CheckTarget) -> CheckOutcome {
        let (elapsed, response) = self.probe(target).await;

        let response = match response {
            Ok(response) => {
                info!(
                    check = target.name,
                    status_code = response.status_code,
                    elapsed_secs = elapsed.as_secs(),
                    "Probe answered"
                );
                if response.status_code != 200 {
                    let err = CheckError::UnexpectedStatus {
                        target: target.name,
                        status: response.status_code,
                    };
                    warn!(check = target.name, error = %err, "Unexpected status code");
                }
                if response.body_is_json == Some(false) {
                    let err = CheckError::MalformedBody {
                        target: target.name,
                    };
                    warn!(check = target.name, error = %err, "Malformed response body");
                }
                Some(response)
            }
            Err(source) => {
                let err = anyhow::Error::new(CheckError::Transport {
                    target: target.name,
                    source,
                });
                error!(check = target.name, error = ?err, "Probe failed");
                self.tracker.capture(&err).await;
                None
            }
        };

        let status = classify(&ProbeResult { elapsed, response });

        if let Some(metric_id) = &target.metric_id {
            let latency_ms = (elapsed.as_micros() / 1000) as u64;
            if let Err(source) = self.reporter.report_metric(latency_ms, metric_id).await {
                self.report_failure(target, source).await;
            }
        }

        match self
            .reporter
            .set_component_status(status, &target.component_id)
            .await
        {
            Ok(update) => debug!(check = target.name, %status, ?update, "Status published"),
            Err(source) => self.report_failure(target, source).await,
        }

        CheckOutcome {
            target: target.name,
            status,
            elapsed,
        }
    }

    /// Send one request. The elapsed time stops once the response headers
    /// arrive, so reading the body never counts towards latency.
    async fn probe(
        &self,
        target: &CheckTarget,
    ) -> (Duration, Result<ProbeResponse, reqwest::Error>) {
        let request = self
            .client
            .request(target.method.clone(), target.url.clone())
            .headers(target.headers.clone())
            .timeout(target.timeout);

        let request = match &target.auth {
            TargetAuth::None => request,
            TargetAuth::JsonCredentials { username, password } => request.json(&json!({
                "u": username,
                "p": password,
            })),
            TargetAuth::Basic { username, password } => request.basic_auth(username, Some(password)),
        };

        let start = Instant::now();
        let sent = request.send().await;
        let elapsed = start.elapsed();

        let response = match sent {
            Ok(response) => response,
            Err(e) => return (elapsed, Err(e)),
        };
        let status_code = response.status().as_u16();

        let body_is_json = if target.expect_json {
            match response.bytes().await {
                Ok(body) => Some(serde_json::from_slice::<Value>(&body).is_ok()),
                Err(e) => return (elapsed, Err(e)),
            }
        } else {
            None
        };

        (
            elapsed,
            Ok(ProbeResponse {
                status_code,
                body_is_json,
            }),
        )
    }

    async fn report_failure(&self, target: &CheckTarget, source: ReportError) {
        let err = anyhow::Error::new(CheckError::Reporting {
            target: target.name,
            source,
        });
        error!(check = target.name, error = ?err, "Status page reporting failed");
        self.tracker.capture(&err).await;
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
