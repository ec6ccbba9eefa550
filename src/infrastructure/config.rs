use std::env;
use std::time::Duration;

use crate::services::status_poller::PollSettings;

#[derive(Clone, Debug)]
pub struct Config {
    pub api_url: String,
    pub tenant: String,
    pub token: Option<String>,
    pub status_timeout_ms: u64,
    pub status_bail_time_ms: u64,
    pub http_timeout_secs: u64,
}

fn env_u64(name: &str, default: u64) -> u64 {
    env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .filter(|v| *v > 0)
        .unwrap_or(default)
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            api_url: env::var("QUICK_MARC_API_URL")
                .unwrap_or_else(|_| "http://localhost:9130".to_string())
                .trim_end_matches('/')
                .to_string(),
            tenant: env::var("OKAPI_TENANT").unwrap_or_else(|_| "diku".to_string()),
            token: env::var("OKAPI_TOKEN").ok().filter(|t| !t.is_empty()),
            status_timeout_ms: env_u64("QM_RECORD_STATUS_TIMEOUT_MS", 5000),
            status_bail_time_ms: env_u64("QM_RECORD_STATUS_BAIL_TIME_MS", 20000),
            http_timeout_secs: env_u64("HTTP_TIMEOUT_SECS", 10),
        }
    }

    pub fn poll_settings(&self) -> PollSettings {
        PollSettings::from_bail_time(
            Duration::from_millis(self.status_timeout_ms),
            Duration::from_millis(self.status_bail_time_ms),
        )
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}
