use crate::request::{HttpRequest, Method};
use anyhow::Context;
use promptshape_core::config::ClientConfig;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..=299).contains(&self.status)
    }
}

/// Without a request timeout a hung backend would keep the form busy forever.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpTimeouts {
    pub connect: Duration,
    pub request: Duration,
}

impl Default for HttpTimeouts {
    fn default() -> Self {
        Self::from(&ClientConfig::default())
    }
}

impl From<&ClientConfig> for HttpTimeouts {
    fn from(cfg: &ClientConfig) -> Self {
        Self {
            connect: cfg.connect_timeout(),
            request: cfg.request_timeout(),
        }
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
        }
    }
}

fn client(timeouts: HttpTimeouts) -> anyhow::Result<reqwest::Client> {
    reqwest::Client::builder()
        .connect_timeout(timeouts.connect)
        .timeout(timeouts.request)
        .build()
        .context("build http client")
}

/// Sends `req` and collects the whole response. Non-2xx statuses are returned,
/// not raised; only transport failures are errors.
pub async fn execute(req: &HttpRequest, timeouts: HttpTimeouts) -> anyhow::Result<HttpResponse> {
    let verb = req.method.as_str();
    let mut builder = client(timeouts)?.request(req.method.into(), &req.url);
    for (name, value) in &req.headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    if let Some(json) = &req.body {
        builder = builder.body(json.clone());
    }

    let resp = builder
        .send()
        .await
        .with_context(|| format!("{verb} {} failed", req.url))?;
    let status = resp.status().as_u16();
    let body = resp.bytes().await.context("read response body")?;
    log::debug!("{verb} {} -> {status}, {} bytes", req.url, body.len());

    Ok(HttpResponse {
        status,
        body: body.to_vec(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeouts_follow_client_config() {
        let cfg = ClientConfig {
            connect_timeout_secs: 3,
            request_timeout_secs: 0,
            ..Default::default()
        };
        let timeouts = HttpTimeouts::from(&cfg);
        assert_eq!(timeouts.connect, Duration::from_secs(3));
        assert_eq!(timeouts.request, Duration::from_secs(1));
        assert_eq!(HttpTimeouts::default().request, Duration::from_secs(60));
    }
}
