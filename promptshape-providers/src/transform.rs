use crate::request::HttpRequest;
use anyhow::{Context, anyhow};
use promptshape_core::request::{EndpointVariant, TransformRequest};

pub fn build_transform_request(
    base_url: &str,
    req: &TransformRequest,
    variant: EndpointVariant,
) -> anyhow::Result<HttpRequest> {
    let body = serde_json::to_string(req).context("encode transform request")?;
    Ok(HttpRequest::post(join_url(base_url, variant.path())).json(body))
}

pub fn build_health_request(base_url: &str) -> HttpRequest {
    HttpRequest::get(join_url(base_url, "/health"))
}

pub fn build_clear_cache_request(base_url: &str) -> HttpRequest {
    HttpRequest::post(join_url(base_url, "/cache/clear"))
}

/// Rejects anything that is not an absolute http(s) URL.
pub fn validate_base_url(base_url: &str) -> anyhow::Result<()> {
    let parsed =
        url::Url::parse(base_url).with_context(|| format!("invalid base URL: {base_url}"))?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(anyhow!("unsupported URL scheme `{other}` in {base_url}")),
    }
}

fn join_url(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    format!("{}/{}", base, path)
}
