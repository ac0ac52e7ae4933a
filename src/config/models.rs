// src/config/models.rs
use anyhow::{bail, Result};
use serde::Deserialize;
use url::Url;

use crate::tracking::Dsn;

/// Everything the probe needs, read once at startup.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    // Status page
    pub statuspage_url: Url,
    pub statuspage_token: String,

    // Login API
    pub login_url: Url,
    pub login_username: String,
    pub login_password: String,
    pub login_component_id: String,
    pub login_metric_id: String,

    // Marketing website
    pub website_url: Url,
    pub website_component_id: String,

    // Database proxy
    pub mongo_url: Url,
    pub mongo_username: String,
    pub mongo_password: String,
    pub mongo_component_id: String,

    // Error tracking
    pub sentry_dsn: String,
}

impl Settings {
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("statuspage_token", &self.statuspage_token),
            ("login_username", &self.login_username),
            ("login_password", &self.login_password),
            ("login_component_id", &self.login_component_id),
            ("login_metric_id", &self.login_metric_id),
            ("website_component_id", &self.website_component_id),
            ("mongo_username", &self.mongo_username),
            ("mongo_password", &self.mongo_password),
            ("mongo_component_id", &self.mongo_component_id),
        ];

        for (name, value) in required {
            if value.trim().is_empty() {
                bail!("Setting `{}` must not be empty", name);
            }
        }

        if let Err(e) = self.sentry_dsn.parse::<Dsn>() {
            bail!("Setting `sentry_dsn` is invalid: {}", e);
        }

        Ok(())
    }
}
