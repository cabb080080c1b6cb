use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub base_url: String,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,

    // None means the platform download directory.
    pub download_dir: Option<PathBuf>,
    pub highlight: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            connect_timeout_secs: 10,
            request_timeout_secs: 60,
            download_dir: None,
            highlight: true,
        }
    }
}

impl ClientConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs.max(1))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let cfg: ClientConfig =
            serde_json::from_str(r#"{"base_url":"http://svc:8080"}"#).unwrap();
        assert_eq!(cfg.base_url, "http://svc:8080");
        assert_eq!(cfg.request_timeout_secs, 60);
        assert!(cfg.highlight);
        assert_eq!(cfg.download_dir, None);
    }

    #[test]
    fn zero_timeouts_are_clamped() {
        let cfg = ClientConfig {
            connect_timeout_secs: 0,
            request_timeout_secs: 0,
            ..Default::default()
        };
        assert_eq!(cfg.connect_timeout(), Duration::from_secs(1));
        assert_eq!(cfg.request_timeout(), Duration::from_secs(1));
    }
}
