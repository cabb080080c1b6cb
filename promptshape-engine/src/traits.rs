use crate::error::{BackendError, ClipboardError};
use async_trait::async_trait;
use promptshape_core::request::{EndpointVariant, TransformRequest};
use promptshape_core::settings::Settings;
use promptshape_core::theme::{PanelState, Theme};
use serde_json::Value;
use std::path::PathBuf;

#[async_trait]
pub trait TransformBackend: Send + Sync {
    async fn submit(
        &self,
        req: &TransformRequest,
        variant: EndpointVariant,
    ) -> Result<Value, BackendError>;
}

#[async_trait]
pub trait Clipboard: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    async fn write_text(&self, text: &str) -> Result<(), ClipboardError>;
}

/// Optional capability; the controller displays plain text without one.
pub trait Highlighter: Send + Sync {
    fn highlight(&self, json: &str) -> String;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    Output,
    Error,
}

/// The display surface. Implementations must not block or panic.
pub trait View: Send + Sync {
    fn show_output(&self, text: &str);
    fn hide_output(&self);
    fn show_error(&self, message: &str);
    fn hide_error(&self);
    fn set_busy(&self, busy: bool);
    fn show_toast(&self, message: &str);
    fn hide_toast(&self);
    fn set_copy_confirmed(&self, confirmed: bool);
    fn set_theme(&self, theme: Theme);
    fn set_panel(&self, state: PanelState);
    fn set_settings(&self, settings: &Settings);
    fn scroll_into_view(&self, region: Region);

    fn resize_input(&self) {}
}

pub trait PreferenceStore: Send + Sync {
    fn load_theme(&self) -> anyhow::Result<Option<Theme>>;
    fn save_theme(&self, theme: Theme) -> anyhow::Result<()>;
}

pub trait SystemAppearance: Send + Sync {
    fn preferred_theme(&self) -> Option<Theme>;
}

pub trait DownloadSink: Send + Sync {
    /// Stores `contents` under `filename` and returns where it landed.
    fn save(&self, filename: &str, contents: &str) -> anyhow::Result<PathBuf>;
}
