use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use promptshape_core::config::ClientConfig;
use promptshape_engine::controller::{FormCapabilities, FormController};
use promptshape_engine::traits::{Highlighter, View};
use promptshape_platform::clipboard::{ClipboardMode, probe_clipboards};
use promptshape_providers::transform::validate_base_url;

use crate::backend::HttpTransformBackend;
use crate::defaults::default_download_dir;
use crate::downloads::DirectoryDownloads;
use crate::prefs_store::PreferenceFileStore;

/// Wires a controller to the HTTP backend and the platform capabilities.
///
/// The front end supplies its view, optionally a highlighter, and says whether
/// it outlives a copy.
pub fn build_controller_from_config(
    cfg: &ClientConfig,
    preferences_path: PathBuf,
    view: Arc<dyn View>,
    highlighter: Option<Arc<dyn Highlighter>>,
    clipboard_mode: ClipboardMode,
) -> anyhow::Result<FormController> {
    validate_base_url(&cfg.base_url).context("check base_url")?;

    let (clipboard, clipboard_fallback) = probe_clipboards(clipboard_mode);
    log::debug!(
        "clipboard: {} (fallback: {})",
        clipboard.name(),
        clipboard_fallback.as_ref().map(|c| c.name()).unwrap_or("none")
    );

    let download_dir = cfg.download_dir.clone().unwrap_or_else(default_download_dir);

    Ok(FormController::new(FormCapabilities {
        backend: Arc::new(HttpTransformBackend::from_config(cfg)),
        view,
        clipboard,
        clipboard_fallback,
        highlighter: highlighter.filter(|_| cfg.highlight),
        preferences: Arc::new(PreferenceFileStore::at_path(preferences_path)),
        downloads: Arc::new(DirectoryDownloads::new(download_dir)),
    }))
}
