// src/config/mod.rs
mod models;

pub use models::*;

use anyhow::{Context, Result};

/// Prefix shared by every environment variable the probe reads.
pub const ENV_PREFIX: &str = "UPTIME";

/// Load settings from the process environment (plus `.env`, if present).
pub fn load_settings() -> Result<Settings> {
    dotenvy::dotenv().ok();
    load_settings_from(config::Environment::with_prefix(ENV_PREFIX))
}

/// Load settings from an explicit environment source.
pub fn load_settings_from(env: config::Environment) -> Result<Settings> {
    let settings: Settings = config::Config::builder()
        .add_source(env)
        .build()
        .context("Failed to load settings from environment")?
        .try_deserialize()
        .context("Failed to load settings from environment")?;

    settings.validate()?;
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_env() -> config::Map<String, String> {
        let mut env = config::Map::new();
        for (key, value) in [
            ("UPTIME_STATUSPAGE_URL", "https://status.example.com"),
            ("UPTIME_STATUSPAGE_TOKEN", "token"),
            ("UPTIME_LOGIN_URL", "https://api.example.com/auth/login"),
            ("UPTIME_LOGIN_USERNAME", "probe@example.com"),
            ("UPTIME_LOGIN_PASSWORD", "hunter2"),
            ("UPTIME_LOGIN_COMPONENT_ID", "1"),
            ("UPTIME_LOGIN_METRIC_ID", "7"),
            ("UPTIME_WEBSITE_URL", "https://www.example.com"),
            ("UPTIME_WEBSITE_COMPONENT_ID", "2"),
            ("UPTIME_MONGO_URL", "https://db-proxy.example.com/ping"),
            ("UPTIME_MONGO_USERNAME", "monitor"),
            ("UPTIME_MONGO_PASSWORD", "secret"),
            ("UPTIME_MONGO_COMPONENT_ID", "3"),
            ("UPTIME_SENTRY_DSN", "https://abc123@errors.example.com/42"),
        ] {
            env.insert(key.to_string(), value.to_string());
        }
        env
    }

    fn env_from(map: config::Map<String, String>) -> config::Environment {
        config::Environment::with_prefix(ENV_PREFIX).source(Some(map))
    }

    #[test]
    fn test_load_complete_environment() {
        let settings = load_settings_from(env_from(full_env())).unwrap();

        assert_eq!(settings.login_username, "probe@example.com");
        assert_eq!(settings.mongo_component_id, "3");
        assert_eq!(settings.website_url.as_str(), "https://www.example.com/");
    }

    #[test]
    fn test_missing_variable_fails() {
        let mut env = full_env();
        env.remove("UPTIME_STATUSPAGE_TOKEN");

        assert!(load_settings_from(env_from(env)).is_err());
    }

    #[test]
    fn test_blank_credential_fails_validation() {
        let mut env = full_env();
        env.insert("UPTIME_LOGIN_PASSWORD".to_string(), "  ".to_string());

        let err = load_settings_from(env_from(env)).unwrap_err();
        assert!(err.to_string().contains("login_password"));
    }

    #[test]
    fn test_malformed_dsn_fails_validation() {
        let mut env = full_env();
        env.insert("UPTIME_SENTRY_DSN".to_string(), "not a dsn".to_string());

        assert!(load_settings_from(env_from(env)).is_err());
    }
}
