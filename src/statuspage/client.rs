// src/statuspage/client.rs
use super::ComponentStatus;
use chrono::Utc;
use reqwest::header::ACCEPT;
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

const TOKEN_HEADER: &str = "X-Cachet-Token";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("Status page request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Status page returned {status} for {endpoint}")]
    Api { status: StatusCode, endpoint: String },

    /// The configured base URL cannot carry path segments (e.g. `mailto:`).
    #[error("Status page URL cannot hold a path: {0}")]
    InvalidEndpoint(String),
}

/// Outcome of [`StatusReporter::set_component_status`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusUpdate {
    /// The published status already matched; nothing was written.
    Unchanged,
    /// A write was issued. `previous` is `None` when the old value could not be read.
    Updated { previous: Option<ComponentStatus> },
}

/// Thin client for the status page REST API.
#[derive(Debug, Clone)]
pub struct StatusReporter {
    client: Client,
    base_url: Url,
    token: String,
}

impl StatusReporter {
    pub fn new(base_url: Url, token: impl Into<String>) -> Result<Self, ReportError> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;

        Ok(Self {
            client,
            base_url,
            token: token.into(),
        })
    }

    /// Push one latency sample, stamped with the current UTC time.
    pub async fn report_metric(&self, value: u64, metric_id: &str) -> Result<(), ReportError> {
        let url = self.endpoint(&["api", "v1", "metrics", metric_id, "points"])?;
        let body = json!({
            "value": value,
            "timestamp": Utc::now().timestamp(),
        });

        let response = self.request(Method::POST, url.clone()).json(&body).send().await?;
        ensure_success(response.status(), &url)?;

        debug!(metric_id, value, "Reported metric point");
        Ok(())
    }

    /// Read the currently published status of a component.
    ///
    /// Returns `Ok(None)` when the page answers but the status cannot be
    /// determined, so a caller comparing against it never sees a false match.
    pub async fn get_component_status(
        &self,
        component_id: &str,
    ) -> Result<Option<ComponentStatus>, ReportError> {
        let url = self.endpoint(&["api", "v1", "components", component_id])?;
        let response = self.request(Method::GET, url).send().await?;

        let status = response.status();
        if !status.is_success() {
            warn!(component_id, %status, "Could not read component status");
            return Ok(None);
        }

        let body: Value = match response.json().await {
            Ok(body) => body,
            Err(e) => {
                warn!(component_id, error = %e, "Component status body is not JSON");
                return Ok(None);
            }
        };

        let current = parse_component_status(&body);
        if current.is_none() {
            warn!(component_id, %body, "Component status missing or unrecognised");
        }
        Ok(current)
    }

    /// Publish `status` for a component unless it is already the published value.
    pub async fn set_component_status(
        &self,
        status: ComponentStatus,
        component_id: &str,
    ) -> Result<StatusUpdate, ReportError> {
        let previous = self.get_component_status(component_id).await?;
        if previous == Some(status) {
            debug!(component_id, %status, "Component status unchanged, skipping update");
            return Ok(StatusUpdate::Unchanged);
        }

        let url = self.endpoint(&["api", "v1", "components", component_id])?;
        let response = self
            .request(Method::PUT, url.clone())
            .json(&json!({ "status": status.code() }))
            .send()
            .await?;
        ensure_success(response.status(), &url)?;

        info!(component_id, %status, ?previous, "Updated component status");
        Ok(StatusUpdate::Updated { previous })
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.client
            .request(method, url)
            .header(TOKEN_HEADER, &self.token)
            .header(ACCEPT, "application/json")
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, ReportError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ReportError::InvalidEndpoint(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

fn ensure_success(status: StatusCode, url: &Url) -> Result<(), ReportError> {
    if status.is_success() {
        Ok(())
    } else {
        Err(ReportError::Api {
            status,
            endpoint: url.path().to_string(),
        })
    }
}

/// Extract `data.status`, accepting either a number or a numeric string.
fn parse_component_status(body: &Value) -> Option<ComponentStatus> {
    let code = match body.get("data")?.get("status")? {
        Value::Number(n) => n.as_i64()?,
        Value::String(s) => s.trim().parse().ok()?,
        _ => return None,
    };
    ComponentStatus::try_from(code).ok()
}
