// src/tracking/sentry.rs
use super::ErrorTracker;
use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde_json::{json, Value};
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;
use uuid::Uuid;

const DELIVERY_TIMEOUT: Duration = Duration::from_secs(5);
const AUTH_HEADER: &str = "X-Sentry-Auth";

#[derive(Debug, thiserror::Error)]
pub enum DsnError {
    #[error("DSN is not a valid URL: {0}")]
    Parse(#[from] url::ParseError),

    #[error("DSN has no public key")]
    MissingPublicKey,

    #[error("DSN has no host")]
    MissingHost,

    #[error("DSN has no project id")]
    MissingProjectId,
}

/// Parsed `scheme://public_key@host[:port][/prefix]/project_id` connection string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dsn {
    public_key: String,
    project_id: String,
    store_url: Url,
}

impl Dsn {
    pub fn public_key(&self) -> &str {
        &self.public_key
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    pub fn store_url(&self) -> &Url {
        &self.store_url
    }
}

impl FromStr for Dsn {
    type Err = DsnError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let url = Url::parse(s.trim())?;

        let public_key = url.username();
        if public_key.is_empty() {
            return Err(DsnError::MissingPublicKey);
        }

        let host = url.host_str().ok_or(DsnError::MissingHost)?;
        let authority = match url.port() {
            Some(port) => format!("{}:{}", host, port),
            None => host.to_string(),
        };

        let path = url.path().trim_end_matches('/');
        let (prefix, project_id) = path.rsplit_once('/').ok_or(DsnError::MissingProjectId)?;
        if project_id.is_empty() {
            return Err(DsnError::MissingProjectId);
        }

        let store_url = Url::parse(&format!(
            "{}://{}{}/api/{}/store/",
            url.scheme(),
            authority,
            prefix,
            project_id
        ))?;

        Ok(Self {
            public_key: public_key.to_string(),
            project_id: project_id.to_string(),
            store_url,
        })
    }
}

/// Sends captured errors to a Sentry-compatible store endpoint.
pub struct SentryTracker {
    client: Client,
    dsn: Dsn,
}

impl SentryTracker {
    pub fn new(dsn: Dsn) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(DELIVERY_TIMEOUT).build()?;
        Ok(Self { client, dsn })
    }

    fn auth_header(&self) -> String {
        format!(
            "Sentry sentry_version=7, sentry_client={}/{}, sentry_key={}",
            env!("CARGO_PKG_NAME"),
            env!("CARGO_PKG_VERSION"),
            self.dsn.public_key
        )
    }
}

#[async_trait]
impl ErrorTracker for SentryTracker {
    async fn capture(&self, error: &anyhow::Error) {
        let event = build_event(error);

        let result = self
            .client
            .post(self.dsn.store_url.clone())
            .header(AUTH_HEADER, self.auth_header())
            .json(&event)
            .send()
            .await;

        match result {
            Ok(response) if response.status().is_success() => {
                debug!(event_id = %event["event_id"], "Forwarded error to tracker");
            }
            Ok(response) => {
                warn!(status = %response.status(), "Error tracker rejected event");
            }
            Err(e) => {
                warn!(error = %e, "Could not deliver event to error tracker");
            }
        }
    }
}

/// Build a store-API event. Exception values run from root cause to outermost context.
fn build_event(error: &anyhow::Error) -> Value {
    let mut values: Vec<Value> = error
        .chain()
        .map(|cause| json!({ "type": "Error", "value": cause.to_string() }))
        .collect();
    values.reverse();

    json!({
        "event_id": Uuid::new_v4().simple().to_string(),
        "timestamp": Utc::now().to_rfc3339(),
        "level": "error",
        "platform": "other",
        "logger": env!("CARGO_CRATE_NAME"),
        "release": format!("{}@{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
        "message": { "formatted": format!("{:#}", error) },
        "exception": { "values": values },
    })
}
