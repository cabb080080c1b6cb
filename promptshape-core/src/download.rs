use chrono::{DateTime, Utc};

pub const DOWNLOAD_PREFIX: &str = "prompt-transformation";

/// `prefix-YYYY-MM-DDTHH-MM-SS.json`, UTC, truncated to seconds.
pub fn download_filename(prefix: &str, at: DateTime<Utc>) -> String {
    format!("{prefix}-{}.json", at.format("%Y-%m-%dT%H-%M-%S"))
}
