use crate::error::ValidationError;
use crate::settings::{IncludeKey, OutputStyle, Settings};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndpointVariant {
    Default,
    Custom,
}

impl EndpointVariant {
    pub fn path(self) -> &'static str {
        match self {
            EndpointVariant::Default => "/transform",
            EndpointVariant::Custom => "/transform/custom",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransformRequest {
    pub prompt: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_keys: Option<Vec<IncludeKey>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_style: Option<OutputStyle>,
}

/// Decides the request body and which endpoint it goes to.
///
/// The custom endpoint is used iff `settings` differs from its default; in that
/// case the body always carries both the checked keys and the style.
pub fn build_request(
    prompt_text: &str,
    settings: &Settings,
) -> Result<(TransformRequest, EndpointVariant), ValidationError> {
    let prompt = prompt_text.trim();
    if prompt.is_empty() {
        return Err(ValidationError::EmptyPrompt);
    }

    if settings.is_custom() {
        let req = TransformRequest {
            prompt: prompt.to_string(),
            include_keys: Some(settings.checked_keys()),
            output_style: Some(settings.output_style.clone()),
        };
        return Ok((req, EndpointVariant::Custom));
    }

    let req = TransformRequest {
        prompt: prompt.to_string(),
        include_keys: None,
        output_style: None,
    };
    Ok((req, EndpointVariant::Default))
}
