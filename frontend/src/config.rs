use std::{sync::OnceLock, time::Duration};

use anyhow::{Context, Result};

// there is no process environment in the browser, the settings are baked in
const ENV_STR: &str = include_str!("../.env");

const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api";
const DEFAULT_TIMEOUT_MS: u64 = 60_000;
const DEFAULT_ALERT_LIMIT: usize = 5;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub api_base_url: String,
    pub api_timeout: Duration,
    pub dashboard_alert_limit: usize,
    pub log_level: log::Level,
    /// Values that were ignored while reading the settings. Logged once the logger is up.
    pub problems: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_owned(),
            api_timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            dashboard_alert_limit: DEFAULT_ALERT_LIMIT,
            log_level: log::Level::Info,
            problems: Vec::new(),
        }
    }
}

impl Config {
    /// Reads `KEY=value` lines. Unknown keys are ignored, unparsable values keep the default.
    pub fn from_env_str(env: &str) -> Result<Self> {
        let mut config = Config::default();

        for item in dotenvy::from_read_iter(env.as_bytes()) {
            let (key, value) = item.context("malformed line in embedded .env")?;
            match key.as_str() {
                "API_BASE_URL" => {
                    config.api_base_url = value.trim().trim_end_matches('/').to_owned();
                }
                "API_TIMEOUT_MS" => match value.trim().parse::<u64>() {
                    Ok(ms) => config.api_timeout = Duration::from_millis(ms),
                    Err(_) => config
                        .problems
                        .push(format!("API_TIMEOUT_MS={value} is not a number, using default")),
                },
                "DASHBOARD_ALERT_LIMIT" => match value.trim().parse::<usize>() {
                    Ok(limit) => config.dashboard_alert_limit = limit,
                    Err(_) => config.problems.push(format!(
                        "DASHBOARD_ALERT_LIMIT={value} is not a number, using default"
                    )),
                },
                "LOG_LEVEL" => match value.trim().parse::<log::Level>() {
                    Ok(level) => config.log_level = level,
                    Err(_) => config
                        .problems
                        .push(format!("LOG_LEVEL={value} is not a log level, using default")),
                },
                _ => {}
            }
        }

        Ok(config)
    }
}

pub fn config() -> &'static Config {
    static CONFIG: OnceLock<Config> = OnceLock::new();
    CONFIG.get_or_init(|| {
        Config::from_env_str(ENV_STR).unwrap_or_else(|err| Config {
            problems: vec![format!("{err:#}, using default settings")],
            ..Config::default()
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_env_parses() {
        let config = Config::from_env_str(ENV_STR).unwrap();
        assert!(!config.api_base_url.ends_with('/'));
    }

    #[test]
    fn overrides_and_fallbacks() {
        let config = Config::from_env_str(
            "# comment\nAPI_BASE_URL=https://monitor.example.org/api/\nAPI_TIMEOUT_MS=soon\nDASHBOARD_ALERT_LIMIT=8\nLOG_LEVEL=debug\nOTHER=1\n",
        )
        .unwrap();

        assert_eq!(config.api_base_url, "https://monitor.example.org/api");
        assert_eq!(config.api_timeout, Duration::from_millis(DEFAULT_TIMEOUT_MS));
        assert_eq!(config.dashboard_alert_limit, 8);
        assert_eq!(config.log_level, log::Level::Debug);
        assert_eq!(
            config.problems,
            vec!["API_TIMEOUT_MS=soon is not a number, using default".to_owned()]
        );
    }

    #[test]
    fn bad_log_level_is_kept_for_later() {
        let config = Config::from_env_str("LOG_LEVEL=loud
").unwrap();
        assert_eq!(config.log_level, log::Level::Info);
        assert_eq!(config.problems.len(), 1);
        assert!(config.problems[0].starts_with("LOG_LEVEL=loud"));
    }

    #[test]
    fn empty_env_is_default() {
        assert_eq!(Config::from_env_str("").unwrap(), Config::default());
    }
}
