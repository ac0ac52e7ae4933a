// src/health/target.rs
use crate::config::Settings;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::Method;
use std::time::Duration;
use url::Url;

const LOGIN_TIMEOUT: Duration = Duration::from_secs(10);
const WEBSITE_TIMEOUT: Duration = Duration::from_secs(10);
const MONGO_TIMEOUT: Duration = Duration::from_secs(5);

const BROWSER_USER_AGENT: &str = "Mozilla/5.0";

#[derive(Debug, Clone)]
pub enum TargetAuth {
    None,
    /// Credentials sent as a JSON body `{"u": .., "p": ..}`.
    JsonCredentials { username: String, password: String },
    /// HTTP basic auth.
    Basic { username: String, password: String },
}

/// One endpoint to probe and where to publish its status.
#[derive(Debug, Clone)]
pub struct CheckTarget {
    pub name: &'static str,
    pub url: Url,
    pub method: Method,
    pub auth: TargetAuth,
    pub headers: HeaderMap,
    pub timeout: Duration,
    pub component_id: String,
    pub metric_id: Option<String>,
    /// Whether the response body must parse as JSON.
    pub expect_json: bool,
}

impl CheckTarget {
    pub fn login(settings: &Settings) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        Self {
            name: "login",
            url: settings.login_url.clone(),
            method: Method::POST,
            auth: TargetAuth::JsonCredentials {
                username: settings.login_username.clone(),
                password: settings.login_password.clone(),
            },
            headers,
            timeout: LOGIN_TIMEOUT,
            component_id: settings.login_component_id.clone(),
            metric_id: Some(settings.login_metric_id.clone()),
            expect_json: true,
        }
    }

    pub fn website(settings: &Settings) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));

        Self {
            name: "website",
            url: settings.website_url.clone(),
            method: Method::GET,
            auth: TargetAuth::None,
            headers,
            timeout: WEBSITE_TIMEOUT,
            component_id: settings.website_component_id.clone(),
            metric_id: None,
            expect_json: false,
        }
    }

    pub fn mongo(settings: &Settings) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));

        Self {
            name: "mongo",
            url: settings.mongo_url.clone(),
            method: Method::GET,
            auth: TargetAuth::Basic {
                username: settings.mongo_username.clone(),
                password: settings.mongo_password.clone(),
            },
            headers,
            timeout: MONGO_TIMEOUT,
            component_id: settings.mongo_component_id.clone(),
            metric_id: None,
            expect_json: false,
        }
    }
}

/// The three fixed probes, in the order they run.
#[derive(Debug, Clone)]
pub struct CheckTargets {
    pub login: CheckTarget,
    pub website: CheckTarget,
    pub mongo: CheckTarget,
}

impl CheckTargets {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            login: CheckTarget::login(settings),
            website: CheckTarget::website(settings),
            mongo: CheckTarget::mongo(settings),
        }
    }
}
