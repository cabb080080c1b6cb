use crate::highlight::SharedTheme;
use colored::Colorize;
use promptshape_core::settings::{IncludeKey, OutputStyle, Settings};
use promptshape_core::theme::{PanelState, Theme};
use promptshape_engine::traits::{Region, View};
use std::io::Write;
use std::sync::Mutex;

type Sink = Mutex<Box<dyn Write + Send>>;

#[derive(Debug, Default)]
struct PanelView {
    state: PanelState,
    settings: Settings,
}

/// Results go to stdout so they can be piped; everything else goes to stderr.
pub struct TerminalView {
    theme: SharedTheme,
    panel: Mutex<PanelView>,
    out: Sink,
    err: Sink,
}

impl TerminalView {
    pub fn stdio(theme: SharedTheme) -> Self {
        Self::with_writers(
            theme,
            Box::new(std::io::stdout()),
            Box::new(std::io::stderr()),
        )
    }

    pub fn with_writers(
        theme: SharedTheme,
        out: Box<dyn Write + Send>,
        err: Box<dyn Write + Send>,
    ) -> Self {
        Self {
            theme,
            panel: Mutex::new(PanelView::default()),
            out: Mutex::new(out),
            err: Mutex::new(err),
        }
    }

    fn write(sink: &Sink, line: &str) {
        if let Ok(mut w) = sink.lock() {
            let _ = writeln!(w, "{line}");
            let _ = w.flush();
        }
    }

    fn status(&self, line: &str) {
        Self::write(&self.err, line);
    }
}

/// Text rendering of the settings panel.
pub fn panel_text(settings: &Settings) -> String {
    let mut lines = vec!["Settings".bold().to_string()];

    let styles = [OutputStyle::DETAILED, OutputStyle::SHORT]
        .map(|s| {
            if s == settings.output_style.as_str() {
                format!("({s})")
            } else {
                s.to_string()
            }
        })
        .join(" ");
    lines.push(format!("  output style: {styles}"));
    if !settings.output_style.is_default()
        && settings.output_style.as_str() != OutputStyle::SHORT
    {
        lines.push(format!("  custom style: {}", settings.output_style));
    }

    for key in IncludeKey::ALL {
        let mark = if settings.is_checked(key) { "x" } else { " " };
        lines.push(format!("  [{mark}] {:<18} {}", key.as_str(), key.label()));
    }
    lines.join("\n")
}

impl View for TerminalView {
    fn show_output(&self, text: &str) {
        Self::write(&self.out, text);
    }

    fn hide_output(&self) {}

    fn show_error(&self, message: &str) {
        self.status(&format!("{} {message}", "error:".red().bold()));
    }

    fn hide_error(&self) {}

    fn set_busy(&self, busy: bool) {
        if busy {
            self.status(&"Transforming...".dimmed().to_string());
        }
    }

    fn show_toast(&self, message: &str) {
        self.status(&message.green().to_string());
    }

    fn hide_toast(&self) {}

    fn set_copy_confirmed(&self, confirmed: bool) {
        log::debug!("copy confirmation: {confirmed}");
    }

    fn set_theme(&self, theme: Theme) {
        if let Ok(mut t) = self.theme.write() {
            *t = theme;
        }
    }

    fn set_panel(&self, state: PanelState) {
        let text = {
            let Ok(mut panel) = self.panel.lock() else {
                return;
            };
            panel.state = state;
            state.is_shown().then(|| panel_text(&panel.settings))
        };
        if let Some(text) = text {
            self.status(&text);
        }
    }

    fn set_settings(&self, settings: &Settings) {
        let text = {
            let Ok(mut panel) = self.panel.lock() else {
                return;
            };
            panel.settings = settings.clone();
            panel.state.is_shown().then(|| panel_text(settings))
        };
        if let Some(text) = text {
            self.status(&text);
        }
    }

    fn scroll_into_view(&self, _region: Region) {}
}
