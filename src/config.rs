use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::warn;

/// Runtime settings, read from the environment (and `.env` when present)
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Base URL of the listings backend
    pub api_base_url: String,
    pub request_timeout: Duration,
    /// How often open admin views refresh
    pub poll_interval: Duration,
    /// Where comparison exports are written
    pub export_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8000/api".to_string(),
            request_timeout: Duration::from_secs(30),
            poll_interval: Duration::from_secs(5),
            export_dir: PathBuf::from("exports"),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unset keys keep their defaults
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let api_base_url = lookup("PROPERTY_DESK_API_URL")
            .filter(|url| !url.trim().is_empty())
            .unwrap_or(defaults.api_base_url);

        let request_timeout = seconds(&lookup, "PROPERTY_DESK_TIMEOUT_SECS")
            .unwrap_or(defaults.request_timeout);

        let poll_interval = seconds(&lookup, "PROPERTY_DESK_POLL_SECS")
            .unwrap_or(defaults.poll_interval);

        let export_dir = lookup("PROPERTY_DESK_EXPORT_DIR")
            .filter(|dir| !dir.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.export_dir);

        Self {
            api_base_url,
            request_timeout,
            poll_interval,
            export_dir,
        }
    }
}

fn seconds<F>(lookup: &F, key: &str) -> Option<Duration>
where
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(key)?;
    match u64::from_str(raw.trim()) {
        Ok(secs) if secs > 0 => Some(Duration::from_secs(secs)),
        _ => {
            warn!("Ignoring {}={:?}, using default", key, raw);
            None
        }
    }
}
