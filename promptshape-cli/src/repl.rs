//! Line-oriented front end. Plain lines build up the prompt; `:` commands
//! stand in for the form's buttons and shortcuts and go through the same
//! event table a graphical view would use.

use colored::Colorize;
use promptshape_core::samples::{SAMPLE_PROMPTS, sample_prompt};
use promptshape_engine::controller::{EventContext, FormController};
use promptshape_engine::events::{Action, Key, Target, UiEvent};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

pub const HELP: &str = "\
Type your prompt; lines accumulate until you submit.
  :go            transform the prompt (Ctrl+Enter)
  :copy          copy the last result
  :download      save the last result as a JSON file
  :theme         switch between light and dark
  :settings      open the settings panel
  :close, :esc   close the settings panel
  :style <name>  set the output style (detailed, short, ...)
  :key <key>     toggle an include key
  :sample <n>    load sample prompt n
  :clear         clear the prompt
  :quit          leave";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Text(String),
    Go,
    Copy,
    Download,
    Theme,
    Settings,
    Close,
    Esc,
    Style(String),
    Key(String),
    Sample(usize),
    Clear,
    Help,
    Quit,
}

pub fn parse_line(line: &str) -> Result<Command, String> {
    let line = line.trim_end_matches(['\r', '\n']);
    let Some(rest) = line.strip_prefix(':') else {
        return Ok(Command::Text(line.to_string()));
    };

    let (name, arg) = match rest.trim().split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (rest.trim(), ""),
    };
    let required = |usage: &str| {
        if arg.is_empty() {
            Err(format!("usage: {usage}"))
        } else {
            Ok(arg.to_string())
        }
    };

    match name {
        "go" => Ok(Command::Go),
        "copy" => Ok(Command::Copy),
        "download" => Ok(Command::Download),
        "theme" => Ok(Command::Theme),
        "settings" => Ok(Command::Settings),
        "close" => Ok(Command::Close),
        "esc" => Ok(Command::Esc),
        "style" => required(":style <name>").map(Command::Style),
        "key" => required(":key <key>").map(Command::Key),
        "sample" => required(":sample <n>")?
            .parse()
            .map(Command::Sample)
            .map_err(|_| format!("not a sample number: {arg}")),
        "clear" => Ok(Command::Clear),
        "help" | "h" | "?" => Ok(Command::Help),
        "quit" | "q" | "exit" => Ok(Command::Quit),
        other => Err(format!("unknown command :{other} (try :help)")),
    }
}

/// The form event a command stands for, if it is one.
pub fn ui_event(cmd: &Command, prompt: &str) -> Option<(UiEvent, EventContext)> {
    let click = |target| Some((UiEvent::Click(target), EventContext::default()));

    match cmd {
        Command::Text(_) => Some((
            UiEvent::Input(Target::PromptInput),
            EventContext::prompt(prompt),
        )),
        Command::Go => Some((
            UiEvent::KeyDown {
                target: Target::PromptInput,
                key: Key::Enter,
                ctrl_or_meta: true,
            },
            EventContext::prompt(prompt),
        )),
        Command::Copy => click(Target::CopyButton),
        Command::Download => click(Target::DownloadButton),
        Command::Theme => click(Target::ThemeToggle),
        Command::Settings => click(Target::SettingsTrigger),
        Command::Close => click(Target::PanelClose),
        Command::Esc => Some((
            UiEvent::KeyDown {
                target: Target::Document,
                key: Key::Escape,
                ctrl_or_meta: false,
            },
            EventContext::default(),
        )),
        Command::Style(style) => Some((
            UiEvent::Click(Target::StyleButton),
            EventContext::value(style.as_str()),
        )),
        Command::Key(key) => Some((
            UiEvent::Click(Target::KeyCheckbox),
            EventContext::value(key.as_str()),
        )),
        Command::Sample(_) | Command::Clear | Command::Help | Command::Quit => None,
    }
}

pub async fn run<R>(controller: &FormController, input: R) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
{
    eprintln!("{}", HELP.dimmed());
    let mut lines = input.lines();
    let mut prompt = String::new();

    while let Some(line) = lines.next_line().await? {
        let cmd = match parse_line(&line) {
            Ok(cmd) => cmd,
            Err(msg) => {
                controller.report_error(&msg);
                continue;
            }
        };

        match &cmd {
            Command::Quit => break,
            Command::Help => {
                eprintln!("{HELP}");
                continue;
            }
            Command::Clear => {
                prompt.clear();
                continue;
            }
            Command::Sample(n) => {
                match sample_prompt(*n) {
                    Some(sample) => {
                        prompt = sample.to_string();
                        eprintln!("{}", format!("prompt: {sample}").dimmed());
                    }
                    None => controller.report_error(&format!(
                        "no sample {n}; choose 1 to {}",
                        SAMPLE_PROMPTS.len()
                    )),
                }
                continue;
            }
            Command::Text(text) => {
                if !prompt.is_empty() {
                    prompt.push('\n');
                }
                prompt.push_str(text);
            }
            _ => {}
        }

        let Some((event, ctx)) = ui_event(&cmd, &prompt) else {
            continue;
        };
        match controller.dispatch(&event, &ctx).await {
            Ok(Some(Action::ToggleTheme)) => {
                eprintln!("theme: {}", controller.theme().await);
            }
            Ok(_) => {}
            // Already on the error surface.
            Err(e) => log::debug!("{cmd:?} failed: {e}"),
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use promptshape_core::request::EndpointVariant;
    use promptshape_core::settings::{IncludeKey, OutputStyle};
    use promptshape_core::theme::{PanelState, Theme};
    use promptshape_engine::controller::FormCapabilities;
    use promptshape_platform::test::{
        MemoryClipboard, MemoryDownloads, MemoryPreferences, MemoryView, ScriptedBackend,
        ViewEvent,
    };
    use serde_json::json;
    use std::sync::Arc;

    #[test]
    fn parses_commands_and_text() {
        assert_eq!(parse_line("list 5 colors"), Ok(Command::Text("list 5 colors".into())));
        assert_eq!(parse_line(":go"), Ok(Command::Go));
        assert_eq!(parse_line(":style  concise "), Ok(Command::Style("concise".into())));
        assert_eq!(parse_line(":sample 2"), Ok(Command::Sample(2)));
        assert_eq!(parse_line(":q"), Ok(Command::Quit));
        assert!(parse_line(":style").unwrap_err().starts_with("usage"));
        assert!(parse_line(":sample two").is_err());
        assert!(parse_line(":frobnicate").unwrap_err().contains(":frobnicate"));
    }

    #[test]
    fn go_is_the_submit_shortcut() {
        let (event, ctx) = ui_event(&Command::Go, "hi").unwrap();
        assert_eq!(
            event,
            UiEvent::KeyDown {
                target: Target::PromptInput,
                key: Key::Enter,
                ctrl_or_meta: true,
            }
        );
        assert_eq!(ctx.prompt, "hi");
        assert!(ui_event(&Command::Clear, "hi").is_none());
    }

    struct Session {
        controller: FormController,
        view: Arc<MemoryView>,
        backend: Arc<ScriptedBackend>,
        clipboard: Arc<MemoryClipboard>,
    }

    fn session() -> Session {
        let view = Arc::new(MemoryView::default());
        let backend = Arc::new(ScriptedBackend::ok(json!({"task": "colors"})));
        let clipboard = Arc::new(MemoryClipboard::default());
        let controller = FormController::new(FormCapabilities {
            backend: backend.clone(),
            view: view.clone(),
            clipboard: clipboard.clone(),
            clipboard_fallback: None,
            highlighter: None,
            preferences: Arc::new(MemoryPreferences::default()),
            downloads: Arc::new(MemoryDownloads::default()),
        });
        Session {
            controller,
            view,
            backend,
            clipboard,
        }
    }

    #[tokio::test]
    async fn settings_commands_shape_the_request() {
        let s = session();
        let input = "list 5\ncolors\n:style short\n:key problem\n:go\n:copy\n:quit\n:go\n";
        run(&s.controller, input.as_bytes()).await.unwrap();

        let requests = s.backend.requests();
        assert_eq!(requests.len(), 1);
        let (req, variant) = &requests[0];
        assert_eq!(*variant, EndpointVariant::Custom);
        assert_eq!(req.prompt, "list 5\ncolors");
        assert_eq!(req.output_style, Some(OutputStyle::short()));
        assert!(!req.include_keys.as_ref().unwrap().contains(&IncludeKey::Problem));

        let copied = s.clipboard.copied.lock().unwrap().clone();
        assert_eq!(copied, vec!["{\n  \"task\": \"colors\"\n}".to_string()]);
        assert!(s.view.events().contains(&ViewEvent::ResizeInput));
    }

    #[tokio::test]
    async fn panel_theme_and_samples() {
        let s = session();
        let input = ":settings\n:esc\n:esc\n:theme\n:sample 9\n:sample 1\n:go\n";
        run(&s.controller, input.as_bytes()).await.unwrap();

        let panels: Vec<_> = s
            .view
            .events()
            .into_iter()
            .filter(|e| matches!(e, ViewEvent::Panel(_)))
            .collect();
        assert_eq!(
            panels,
            vec![
                ViewEvent::Panel(PanelState::Shown),
                ViewEvent::Panel(PanelState::Hidden)
            ]
        );
        assert_eq!(s.controller.theme().await, Theme::Dark);
        assert!(s.view.last_error().unwrap().contains("no sample 9"));
        assert_eq!(s.backend.requests()[0].0.prompt, SAMPLE_PROMPTS[0]);
    }

    #[tokio::test]
    async fn empty_prompt_and_bad_key_are_reported() {
        let s = session();
        run(&s.controller, ":go\n:key colour\n".as_bytes()).await.unwrap();

        let errors: Vec<_> = s
            .view
            .events()
            .into_iter()
            .filter_map(|e| match e {
                ViewEvent::Error(m) => Some(m),
                _ => None,
            })
            .collect();
        assert_eq!(
            errors,
            vec![
                "Please enter a prompt to transform.".to_string(),
                "unknown include key: colour".to_string(),
            ]
        );
        assert!(s.backend.requests().is_empty());
    }
}
