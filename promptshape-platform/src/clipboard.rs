//! Clipboard capabilities.
//!
//! The native path goes through the OS clipboard. The legacy path writes an
//! OSC 52 selection sequence to the terminal, which most emulators honor even
//! over SSH where no native clipboard exists.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use promptshape_engine::error::ClipboardError;
use promptshape_engine::traits::Clipboard;
use std::io::{IsTerminal, Write};
use std::sync::{Arc, Mutex};

/// OS clipboard handle, opened once and held for the life of the process.
///
/// On X11 and Wayland the owning process serves the selection, so dropping
/// the handle after a write would take the copied text with it.
pub struct NativeClipboard {
    inner: Mutex<arboard::Clipboard>,
}

impl std::fmt::Debug for NativeClipboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NativeClipboard").finish_non_exhaustive()
    }
}

impl NativeClipboard {
    /// Fails if no OS clipboard is reachable (e.g. no display server).
    pub fn open() -> Result<Self, ClipboardError> {
        let inner =
            arboard::Clipboard::new().map_err(|e| ClipboardError::Unavailable(e.to_string()))?;
        Ok(Self {
            inner: Mutex::new(inner),
        })
    }
}

#[async_trait::async_trait]
impl Clipboard for NativeClipboard {
    fn name(&self) -> &'static str {
        "native"
    }

    async fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        let mut cb = self
            .inner
            .lock()
            .map_err(|_| ClipboardError::Failed("clipboard lock poisoned".into()))?;
        cb.set_text(text.to_string())
            .map_err(|e| ClipboardError::Failed(e.to_string()))
    }
}

pub struct Osc52Clipboard {
    out: Mutex<Box<dyn Write + Send>>,
}

impl std::fmt::Debug for Osc52Clipboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Osc52Clipboard").finish_non_exhaustive()
    }
}

impl Osc52Clipboard {
    /// Uses stderr so the sequence never ends up in piped stdout.
    pub fn for_terminal() -> Result<Self, ClipboardError> {
        if !std::io::stderr().is_terminal() {
            return Err(ClipboardError::Unavailable("stderr is not a terminal".into()));
        }
        Ok(Self::with_writer(Box::new(std::io::stderr())))
    }

    pub fn with_writer(out: Box<dyn Write + Send>) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }
}

pub fn osc52_sequence(text: &str) -> String {
    format!("\x1b]52;c;{}\x07", STANDARD.encode(text.as_bytes()))
}

#[async_trait::async_trait]
impl Clipboard for Osc52Clipboard {
    fn name(&self) -> &'static str {
        "osc52"
    }

    async fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        let mut out = self
            .out
            .lock()
            .map_err(|_| ClipboardError::Failed("terminal writer lock poisoned".into()))?;
        out.write_all(osc52_sequence(text).as_bytes())
            .and_then(|_| out.flush())
            .map_err(|e| ClipboardError::Failed(e.to_string()))
    }
}

/// How long the process lives after a copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClipboardMode {
    /// Interactive session; the process keeps serving what it copied.
    #[default]
    Session,
    /// The process exits right after copying.
    OneShot,
}

impl ClipboardMode {
    /// Where the native selection dies with its owner, a one-shot copy goes
    /// through the terminal first.
    pub fn prefers_terminal(self) -> bool {
        self == Self::OneShot && cfg!(any(target_os = "linux", target_os = "freebsd"))
    }
}

pub type ClipboardPair = (Arc<dyn Clipboard>, Option<Arc<dyn Clipboard>>);

/// Primary clipboard plus an optional fallback, chosen by probing what this
/// process can actually reach.
pub fn probe_clipboards(mode: ClipboardMode) -> ClipboardPair {
    let legacy: Option<Arc<dyn Clipboard>> = match Osc52Clipboard::for_terminal() {
        Ok(cb) => Some(Arc::new(cb)),
        Err(e) => {
            log::debug!("legacy clipboard unavailable: {e}");
            None
        }
    };

    let native: Option<Arc<dyn Clipboard>> = match NativeClipboard::open() {
        Ok(cb) => Some(Arc::new(cb)),
        Err(e) => {
            log::debug!("native clipboard unavailable: {e}");
            None
        }
    };

    arrange_clipboards(native, legacy, mode)
}

pub fn arrange_clipboards(
    native: Option<Arc<dyn Clipboard>>,
    legacy: Option<Arc<dyn Clipboard>>,
    mode: ClipboardMode,
) -> ClipboardPair {
    let (first, second) = if mode.prefers_terminal() {
        (legacy, native)
    } else {
        (native, legacy)
    };

    match (first, second) {
        (Some(primary), fallback) => (primary, fallback),
        (None, Some(only)) => (only, None),
        (None, None) => (Arc::new(UnavailableClipboard), None),
    }
}

/// Stand-in when neither capability is present; every write fails.
#[derive(Debug, Default)]
pub struct UnavailableClipboard;

#[async_trait::async_trait]
impl Clipboard for UnavailableClipboard {
    fn name(&self) -> &'static str {
        "unavailable"
    }

    async fn write_text(&self, _text: &str) -> Result<(), ClipboardError> {
        Err(ClipboardError::Unavailable("no clipboard capability".into()))
    }
}
