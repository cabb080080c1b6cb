use crate::error::FormError;
use crate::events::{Action, EventTable, UiEvent};
use crate::traits::{
    Clipboard, DownloadSink, Highlighter, PreferenceStore, Region, SystemAppearance,
    TransformBackend, View,
};
use chrono::Utc;
use promptshape_core::download::{DOWNLOAD_PREFIX, download_filename};
use promptshape_core::request::build_request;
use promptshape_core::settings::{IncludeKey, OutputStyle, Settings};
use promptshape_core::theme::{PanelState, Theme, resolve_initial_theme};
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

pub const COPIED_TOAST: &str = "Copied to clipboard!";
pub const DOWNLOADED_TOAST: &str = "JSON file downloaded successfully!";

/// Everything the controller talks to outside its own state.
#[derive(Clone)]
pub struct FormCapabilities {
    pub backend: Arc<dyn TransformBackend>,
    pub view: Arc<dyn View>,
    pub clipboard: Arc<dyn Clipboard>,
    pub clipboard_fallback: Option<Arc<dyn Clipboard>>,
    pub highlighter: Option<Arc<dyn Highlighter>>,
    pub preferences: Arc<dyn PreferenceStore>,
    pub downloads: Arc<dyn DownloadSink>,
}

#[derive(Debug, Default)]
struct Inner {
    settings: Settings,
    theme: Theme,
    panel: PanelState,
    busy: bool,
    last_rendered: Option<String>,

    // Bumped on every show so a stale timer never hides a newer indicator.
    toast_generation: u64,
    copy_generation: u64,
}

/// Data an event handler reads from the control that fired it.
#[derive(Debug, Clone, Default)]
pub struct EventContext {
    pub prompt: String,
    pub value: Option<String>,
}

impl EventContext {
    pub fn prompt(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            value: None,
        }
    }

    pub fn value(value: impl Into<String>) -> Self {
        Self {
            prompt: String::new(),
            value: Some(value.into()),
        }
    }
}

#[derive(Clone)]
pub struct FormController {
    inner: Arc<Mutex<Inner>>,
    caps: Arc<FormCapabilities>,
    table: Arc<EventTable>,
}

impl FormController {
    const TOAST_TTL: Duration = Duration::from_secs(3);
    const COPY_CONFIRM_TTL: Duration = Duration::from_secs(2);

    pub fn new(caps: FormCapabilities) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner::default())),
            caps: Arc::new(caps),
            table: Arc::new(EventTable::standard()),
        }
    }

    pub fn table(&self) -> &EventTable {
        &self.table
    }

    pub async fn settings(&self) -> Settings {
        self.inner.lock().await.settings.clone()
    }

    pub async fn theme(&self) -> Theme {
        self.inner.lock().await.theme
    }

    pub async fn panel(&self) -> PanelState {
        self.inner.lock().await.panel
    }

    pub async fn is_busy(&self) -> bool {
        self.inner.lock().await.busy
    }

    pub async fn last_rendered(&self) -> Option<String> {
        self.inner.lock().await.last_rendered.clone()
    }

    /// Loads the starting theme and pushes it to the view.
    pub async fn init_theme(&self, system: &dyn SystemAppearance) -> Theme {
        let persisted = match self.caps.preferences.load_theme() {
            Ok(theme) => theme,
            Err(e) => {
                log::warn!("failed to load theme preference: {e:#}");
                None
            }
        };

        let theme = resolve_initial_theme(persisted, system.preferred_theme());
        self.inner.lock().await.theme = theme;
        self.caps.view.set_theme(theme);
        theme
    }

    /// Validates, submits and renders one prompt.
    ///
    /// Every entry point goes through here, so a keyboard shortcut cannot start
    /// a second request while one is in flight.
    pub async fn transform(&self, prompt_text: &str) -> Result<(), FormError> {
        let (req, variant) = {
            let mut inner = self.inner.lock().await;
            let built = match build_request(prompt_text, &inner.settings) {
                Ok(built) => built,
                Err(e) => {
                    drop(inner);
                    self.report_error(&e.to_string());
                    return Err(e.into());
                }
            };

            if inner.busy {
                log::debug!("transform ignored: a request is already in flight");
                return Err(FormError::Busy);
            }
            inner.busy = true;
            built
        };

        log::debug!("submitting to {:?} endpoint {}", variant, variant.path());
        let view = &self.caps.view;
        let busy = BusyGuard::new(self.inner.clone(), view.clone());
        view.set_busy(true);
        view.hide_error();
        view.hide_output();

        let result = match self.caps.backend.submit(&req, variant).await {
            Ok(value) => {
                self.render(&value).await;
                Ok(())
            }
            Err(e) => {
                log::error!("transform failed: {e}");
                self.report_error(&e.message);
                Err(FormError::Backend(e))
            }
        };

        busy.release().await;
        result
    }

    /// Displays `result` as two-space indented JSON and returns the plain text.
    pub async fn render(&self, result: &Value) -> String {
        let text = serde_json::to_string_pretty(result).unwrap_or_else(|_| result.to_string());
        self.inner.lock().await.last_rendered = Some(text.clone());

        let display = match &self.caps.highlighter {
            Some(h) => h.highlight(&text),
            None => text.clone(),
        };
        self.caps.view.show_output(&display);
        self.caps.view.scroll_into_view(Region::Output);
        text
    }

    pub fn report_error(&self, message: &str) {
        self.caps.view.show_error(message);
        self.caps.view.scroll_into_view(Region::Error);
    }

    /// Copies the last rendered text. Failures are logged, never shown.
    pub async fn copy_result(&self) -> bool {
        let text = self
            .inner
            .lock()
            .await
            .last_rendered
            .clone()
            .unwrap_or_default();

        let primary = &self.caps.clipboard;
        match primary.write_text(&text).await {
            Ok(()) => {
                self.confirm_copy().await;
                return true;
            }
            Err(e) => log::warn!("copy via {} failed: {e}", primary.name()),
        }

        let Some(fallback) = &self.caps.clipboard_fallback else {
            log::error!("copy failed and no fallback clipboard is available");
            return false;
        };

        match fallback.write_text(&text).await {
            Ok(()) => {
                self.confirm_copy().await;
                true
            }
            Err(e) => {
                log::error!("fallback copy via {} failed: {e}", fallback.name());
                false
            }
        }
    }

    pub async fn download_result(&self) -> Result<PathBuf, FormError> {
        let text = self
            .inner
            .lock()
            .await
            .last_rendered
            .clone()
            .filter(|t| !t.is_empty());

        let Some(text) = text else {
            self.report_error(&FormError::NoData.to_string());
            return Err(FormError::NoData);
        };

        let filename = download_filename(DOWNLOAD_PREFIX, Utc::now());
        match self.caps.downloads.save(&filename, &text) {
            Ok(path) => {
                log::info!("saved transformation to {}", path.display());
                self.show_toast(DOWNLOADED_TOAST).await;
                Ok(path)
            }
            Err(e) => {
                log::error!("download failed: {e:#}");
                let err = FormError::Download(format!("{e:#}"));
                self.report_error(&err.to_string());
                Err(err)
            }
        }
    }

    pub async fn toggle_theme(&self) -> Theme {
        let theme = {
            let mut inner = self.inner.lock().await;
            inner.theme = inner.theme.toggled();
            inner.theme
        };

        self.caps.view.set_theme(theme);
        if let Err(e) = self.caps.preferences.save_theme(theme) {
            log::warn!("failed to persist theme: {e:#}");
        }
        theme
    }

    pub async fn show_panel(&self) {
        self.inner.lock().await.panel = PanelState::Shown;
        self.caps.view.set_panel(PanelState::Shown);
    }

    pub async fn hide_panel(&self) {
        let mut inner = self.inner.lock().await;
        if !inner.panel.is_shown() {
            return;
        }
        inner.panel = PanelState::Hidden;
        drop(inner);
        self.caps.view.set_panel(PanelState::Hidden);
    }

    pub async fn select_style(&self, style: OutputStyle) {
        let settings = {
            let mut inner = self.inner.lock().await;
            inner.settings.select_style(style);
            inner.settings.clone()
        };
        self.caps.view.set_settings(&settings);
    }

    /// Flips one include key and returns whether it is now checked.
    pub async fn toggle_key(&self, key: IncludeKey) -> bool {
        let (checked, settings) = {
            let mut inner = self.inner.lock().await;
            let checked = inner.settings.toggle_key(key);
            (checked, inner.settings.clone())
        };
        self.caps.view.set_settings(&settings);
        checked
    }

    pub async fn replace_settings(&self, settings: Settings) {
        self.inner.lock().await.settings = settings.clone();
        self.caps.view.set_settings(&settings);
    }

    /// Runs whatever the event table binds to `event`; `Ok(None)` if nothing.
    pub async fn dispatch(
        &self,
        event: &UiEvent,
        ctx: &EventContext,
    ) -> Result<Option<Action>, FormError> {
        let Some(action) = self.table.lookup(event) else {
            return Ok(None);
        };

        match action {
            Action::Transform => self.transform(&ctx.prompt).await?,
            Action::Copy => {
                self.copy_result().await;
            }
            Action::Download => {
                self.download_result().await?;
            }
            Action::ToggleTheme => {
                self.toggle_theme().await;
            }
            Action::ShowPanel => self.show_panel().await,
            Action::HidePanel => self.hide_panel().await,
            Action::SelectStyle => match ctx.value.as_deref().map(str::trim) {
                Some(style) if !style.is_empty() => {
                    self.select_style(OutputStyle::new(style)).await
                }
                _ => log::debug!("style click without a style value"),
            },
            Action::ToggleKey => {
                let key = match ctx.value.as_deref().unwrap_or_default().parse::<IncludeKey>() {
                    Ok(key) => key,
                    Err(e) => {
                        self.report_error(&e.to_string());
                        return Err(e.into());
                    }
                };
                self.toggle_key(key).await;
            }
            Action::ResizeInput => self.caps.view.resize_input(),
        }

        Ok(Some(action))
    }

    pub async fn show_toast(&self, message: &str) {
        let generation = {
            let mut inner = self.inner.lock().await;
            inner.toast_generation += 1;
            inner.toast_generation
        };
        self.caps.view.show_toast(message);

        let inner = self.inner.clone();
        let view = self.caps.view.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Self::TOAST_TTL).await;
            if inner.lock().await.toast_generation == generation {
                view.hide_toast();
            }
        });
    }

    async fn confirm_copy(&self) {
        self.show_toast(COPIED_TOAST).await;

        let generation = {
            let mut inner = self.inner.lock().await;
            inner.copy_generation += 1;
            inner.copy_generation
        };
        self.caps.view.set_copy_confirmed(true);

        let inner = self.inner.clone();
        let view = self.caps.view.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Self::COPY_CONFIRM_TTL).await;
            if inner.lock().await.copy_generation == generation {
                view.set_copy_confirmed(false);
            }
        });
    }
}

/// Owns the in-flight flag for one transform.
///
/// Dropping the transform future mid-request (a timeout, a `select!` arm or an
/// aborted task) still clears the flag and the view's busy state.
struct BusyGuard {
    inner: Arc<Mutex<Inner>>,
    view: Arc<dyn View>,
    armed: bool,
}

impl BusyGuard {
    fn new(inner: Arc<Mutex<Inner>>, view: Arc<dyn View>) -> Self {
        Self {
            inner,
            view,
            armed: true,
        }
    }

    async fn release(mut self) {
        self.inner.lock().await.busy = false;
        self.armed = false;
        self.view.set_busy(false);
    }
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }

        log::debug!("transform cancelled before completion");
        match self.inner.try_lock() {
            Ok(mut inner) => inner.busy = false,
            Err(_) => match tokio::runtime::Handle::try_current() {
                Ok(handle) => {
                    let inner = self.inner.clone();
                    handle.spawn(async move {
                        inner.lock().await.busy = false;
                    });
                }
                Err(_) => log::warn!("no runtime to clear the busy flag"),
            },
        }
        self.view.set_busy(false);
    }
}
