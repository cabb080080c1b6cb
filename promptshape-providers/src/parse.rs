use anyhow::Context;
use serde::Deserialize;
use serde_json::Value;

pub const GENERIC_TRANSFORM_ERROR: &str = "Failed to transform prompt";

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<Value>,
}

/// Pulls the `error` string out of a failure body, if there is one.
pub fn parse_error_message(body: &[u8]) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_slice(body).ok()?;
    match parsed.error? {
        Value::String(s) if !s.trim().is_empty() => Some(s),
        _ => None,
    }
}

pub fn parse_transform_result(body: &[u8]) -> anyhow::Result<Value> {
    serde_json::from_slice(body).context("response was not valid JSON")
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub service: Option<String>,
}

pub fn parse_health(body: &[u8]) -> anyhow::Result<HealthStatus> {
    serde_json::from_slice(body).context("decode health JSON")
}

#[derive(Debug, Deserialize)]
struct MessageBody {
    message: String,
}

pub fn parse_message(body: &[u8]) -> anyhow::Result<String> {
    let resp: MessageBody = serde_json::from_slice(body).context("decode message JSON")?;
    Ok(resp.message)
}
