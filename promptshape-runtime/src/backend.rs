use anyhow::anyhow;
use promptshape_core::config::ClientConfig;
use promptshape_core::request::{EndpointVariant, TransformRequest};
use promptshape_engine::error::BackendError;
use promptshape_engine::traits::TransformBackend;
use promptshape_providers::parse::{
    GENERIC_TRANSFORM_ERROR, HealthStatus, parse_error_message, parse_health, parse_message,
    parse_transform_result,
};
use promptshape_providers::request::HttpRequest;
use promptshape_providers::runtime::{self, HttpResponse, HttpTimeouts};
use promptshape_providers::transform::{
    build_clear_cache_request, build_health_request, build_transform_request,
};
use serde_json::Value;

#[derive(Debug, Clone)]
pub struct HttpTransformBackend {
    base_url: String,
    timeouts: HttpTimeouts,
}

impl HttpTransformBackend {
    pub fn new(base_url: impl Into<String>, timeouts: HttpTimeouts) -> Self {
        Self {
            base_url: base_url.into(),
            timeouts,
        }
    }

    pub fn from_config(cfg: &ClientConfig) -> Self {
        Self::new(cfg.base_url.clone(), HttpTimeouts::from(cfg))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn health(&self) -> anyhow::Result<HealthStatus> {
        let resp = self.execute_ok(&build_health_request(&self.base_url)).await?;
        parse_health(&resp.body)
    }

    /// Returns the backend's confirmation message.
    pub async fn clear_cache(&self) -> anyhow::Result<String> {
        let resp = self
            .execute_ok(&build_clear_cache_request(&self.base_url))
            .await?;
        parse_message(&resp.body)
    }

    async fn execute_ok(&self, req: &HttpRequest) -> anyhow::Result<HttpResponse> {
        let resp = runtime::execute(req, self.timeouts).await?;
        if !resp.is_success() {
            let detail = parse_error_message(&resp.body)
                .unwrap_or_else(|| String::from_utf8_lossy(&resp.body).into_owned());
            return Err(anyhow!(
                "{} {} failed: status={} body={}",
                req.method.as_str(),
                req.url,
                resp.status,
                detail
            ));
        }
        Ok(resp)
    }
}

#[async_trait::async_trait]
impl TransformBackend for HttpTransformBackend {
    async fn submit(
        &self,
        req: &TransformRequest,
        variant: EndpointVariant,
    ) -> Result<Value, BackendError> {
        let http = build_transform_request(&self.base_url, req, variant).map_err(|e| {
            log::error!("could not build transform request: {e:#}");
            BackendError::unexpected()
        })?;

        let resp = match runtime::execute(&http, self.timeouts).await {
            Ok(resp) => resp,
            Err(e) => {
                log::error!("transform request to {} failed: {e:#}", http.url);
                return Err(BackendError::unexpected());
            }
        };

        if !resp.is_success() {
            let message = parse_error_message(&resp.body)
                .unwrap_or_else(|| GENERIC_TRANSFORM_ERROR.to_string());
            log::warn!("backend returned status {}: {message}", resp.status);
            return Err(BackendError::new(message));
        }

        parse_transform_result(&resp.body).map_err(|e| BackendError::new(format!("{e:#}")))
    }
}
