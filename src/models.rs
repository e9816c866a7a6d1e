//! Data models and structures
//!
//! Backend records, the summaries handed to callers, and client configuration.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

/// One stored image as reported by the backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ImageRecord {
    pub id: String,
    #[serde(default)]
    pub variants: Vec<String>,
}

/// Display-size bucket requested through `width`/`height` query parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Small,
    Medium,
    Large,
}

impl Resolution {
    pub const ALL: [Resolution; 3] = [Resolution::Small, Resolution::Medium, Resolution::Large];

    pub fn size(self) -> u32 {
        match self {
            Resolution::Small => 250,
            Resolution::Medium => 500,
            Resolution::Large => 750,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Resolution::Small => "250px",
            Resolution::Medium => "500px",
            Resolution::Large => "750px",
        }
    }
}

/// Caller-facing view of an image: its first variant plus resized URLs keyed by label.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ImageSummary {
    pub id: String,
    pub uri: String,
    pub resolutions: BTreeMap<String, String>,
}

/// Backend response to an upload, returned as received.
pub type UploadResult = serde_json::Value;

/// Backend response to a delete, returned as received.
pub type DeleteResult = serde_json::Value;

// Configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    pub timeout: Option<Duration>,
}

impl Config {
    /// Build a config for `api_url`, defaulting to `https://` when no scheme is given.
    pub fn new(api_url: &str) -> crate::Result<Self> {
        let trimmed = api_url.trim().trim_end_matches('/');
        if trimmed.is_empty() {
            return Err(crate::Error::Config("API URL is empty".to_string()));
        }

        let api_url = if trimmed.contains("://") {
            trimmed.to_string()
        } else {
            format!("https://{}", trimmed)
        };

        Ok(Self {
            api_url,
            timeout: None,
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn from_env() -> crate::Result<Self> {
        dotenvy::dotenv().ok();

        let api_url = std::env::var("IMAGE_API_URL")
            .map_err(|_| crate::Error::Config("IMAGE_API_URL not set".to_string()))?;
        let mut config = Self::new(&api_url)?;

        if let Ok(raw) = std::env::var("IMAGE_API_TIMEOUT_SECS") {
            config.timeout = Some(parse_timeout_secs(&raw)?);
        }

        Ok(config)
    }
}

fn parse_timeout_secs(raw: &str) -> crate::Result<Duration> {
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(crate::Error::Config(format!(
            "IMAGE_API_TIMEOUT_SECS must be a positive integer, got '{}'",
            raw
        ))),
    }
}
