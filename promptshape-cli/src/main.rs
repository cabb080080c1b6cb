mod highlight;
mod repl;
mod view;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use highlight::{AnsiJsonHighlighter, SharedTheme};
use promptshape_core::config::ClientConfig;
use promptshape_core::samples::SAMPLE_PROMPTS;
use promptshape_core::settings::{IncludeKey, OutputStyle, Settings};
use promptshape_core::theme::{Theme, resolve_initial_theme};
use promptshape_engine::controller::FormController;
use promptshape_engine::traits::{Highlighter, PreferenceStore, SystemAppearance};
use promptshape_platform::appearance::TerminalAppearance;
use promptshape_platform::clipboard::ClipboardMode;
use promptshape_runtime::backend::HttpTransformBackend;
use promptshape_runtime::bootstrap::build_controller_from_config;
use promptshape_runtime::config_store::ConfigStore;
use promptshape_runtime::defaults::{default_config_path, default_preferences_path};
use promptshape_runtime::prefs_store::PreferenceFileStore;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use view::TerminalView;

#[derive(Parser)]
#[command(name = "promptshape")]
#[command(about = "Turn free-form prompts into structured JSON", long_about = None)]
#[command(version)]
struct Cli {
    /// Transformation service URL
    #[arg(long, global = true, env = "PROMPTSHAPE_BASE_URL")]
    base_url: Option<String>,

    /// Config file (defaults to the user config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, short, global = true)]
    verbose: bool,

    /// Print results without colors
    #[arg(long, global = true)]
    no_highlight: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Transform one prompt and print the result
    Transform {
        prompt: String,

        /// Output style (detailed, short, or any style the service accepts)
        #[arg(long)]
        style: Option<String>,

        /// Leave a key out of the result; repeatable
        #[arg(long, value_name = "KEY")]
        exclude: Vec<IncludeKey>,

        /// Copy the result to the clipboard
        #[arg(long)]
        copy: bool,

        /// Save the result as a JSON file
        #[arg(long)]
        download: bool,
    },
    /// Interactive session
    Repl,
    /// Show or switch the color theme
    Theme {
        #[arg(value_enum, default_value_t = ThemeAction::Show)]
        action: ThemeAction,
    },
    /// List the sample prompts
    Samples,
    /// Check that the service is up
    Health,
    /// Clear the service's result cache
    ClearCache,
}

#[derive(Clone, Copy, ValueEnum)]
enum ThemeAction {
    Show,
    Toggle,
}

fn init_logging(verbose: bool) {
    let filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter)).init();
}

fn load_config(cli: &Cli) -> anyhow::Result<ClientConfig> {
    let path = cli.config.clone().unwrap_or_else(default_config_path);
    let mut cfg = ConfigStore::at_path(path).load_or_default()?;

    if let Some(url) = &cli.base_url {
        cfg.base_url = url.clone();
    }
    if cli.no_highlight {
        cfg.highlight = false;
    }
    Ok(cfg)
}

async fn build_controller(
    cfg: &ClientConfig,
    clipboard_mode: ClipboardMode,
) -> anyhow::Result<FormController> {
    let theme = SharedTheme::default();
    let view = Arc::new(TerminalView::stdio(theme.clone()));

    let highlighter = std::io::stdout()
        .is_terminal()
        .then(|| Arc::new(AnsiJsonHighlighter::new(theme)) as Arc<dyn Highlighter>);

    let controller = build_controller_from_config(
        cfg,
        default_preferences_path(),
        view,
        highlighter,
        clipboard_mode,
    )?;
    controller.init_theme(&TerminalAppearance).await;
    Ok(controller)
}

async fn transform(
    cfg: &ClientConfig,
    prompt: &str,
    style: Option<String>,
    exclude: &[IncludeKey],
    copy: bool,
    download: bool,
) -> anyhow::Result<ExitCode> {
    let controller = build_controller(cfg, ClipboardMode::OneShot).await?;

    let mut settings = Settings::default();
    if let Some(style) = style {
        settings.select_style(OutputStyle::new(style));
    }
    for key in exclude {
        settings.set_checked(*key, false);
    }
    controller.replace_settings(settings).await;

    // Failures are already on the error surface.
    if controller.transform(prompt).await.is_err() {
        return Ok(ExitCode::FAILURE);
    }

    if copy {
        controller.copy_result().await;
    }
    if download {
        match controller.download_result().await {
            Ok(path) => eprintln!("{}", path.display()),
            Err(_) => return Ok(ExitCode::FAILURE),
        }
    }
    Ok(ExitCode::SUCCESS)
}

/// Theme preference only; never touches the service or the clipboard.
fn theme_command(
    prefs: &dyn PreferenceStore,
    system: &dyn SystemAppearance,
    action: ThemeAction,
) -> anyhow::Result<Theme> {
    let persisted = prefs.load_theme().unwrap_or_else(|e| {
        log::warn!("failed to load theme preference: {e:#}");
        None
    });
    let current = resolve_initial_theme(persisted, system.preferred_theme());

    match action {
        ThemeAction::Show => Ok(current),
        ThemeAction::Toggle => {
            let next = current.toggled();
            prefs.save_theme(next)?;
            Ok(next)
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let cfg = load_config(&cli)?;
    log::debug!("using {}", cfg.base_url);

    match cli.command {
        Commands::Transform {
            prompt,
            style,
            exclude,
            copy,
            download,
        } => transform(&cfg, &prompt, style, &exclude, copy, download).await,
        Commands::Repl => {
            let controller = build_controller(&cfg, ClipboardMode::Session).await?;
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            repl::run(&controller, stdin).await?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Theme { action } => {
            let prefs = PreferenceFileStore::at_path(default_preferences_path());
            let theme = theme_command(&prefs, &TerminalAppearance, action)?;
            println!("{theme}");
            Ok(ExitCode::SUCCESS)
        }
        Commands::Samples => {
            for (i, sample) in SAMPLE_PROMPTS.iter().enumerate() {
                println!("{}. {sample}", i + 1);
            }
            Ok(ExitCode::SUCCESS)
        }
        Commands::Health => {
            let health = HttpTransformBackend::from_config(&cfg).health().await?;
            match health.service {
                Some(service) => println!("{} ({service})", health.status.green()),
                None => println!("{}", health.status.green()),
            }
            Ok(ExitCode::SUCCESS)
        }
        Commands::ClearCache => {
            let message = HttpTransformBackend::from_config(&cfg).clear_cache().await?;
            println!("{message}");
            Ok(ExitCode::SUCCESS)
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {e:#}", "error:".red().bold());
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use promptshape_platform::test::{FixedAppearance, MemoryPreferences};

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn transform_flags_parse() {
        let cli = Cli::try_parse_from([
            "promptshape",
            "transform",
            "list 5 colors",
            "--style",
            "concise",
            "--exclude",
            "problem",
            "--exclude",
            "OUTPUT_FORMAT",
            "--copy",
        ])
        .unwrap();

        let Commands::Transform {
            prompt,
            style,
            exclude,
            copy,
            download,
        } = cli.command
        else {
            panic!("expected transform");
        };
        assert_eq!(prompt, "list 5 colors");
        assert_eq!(style.as_deref(), Some("concise"));
        assert_eq!(exclude, vec![IncludeKey::Problem, IncludeKey::OutputFormat]);
        assert!(copy);
        assert!(!download);
    }

    #[test]
    fn unknown_exclude_key_is_rejected() {
        let err = Cli::try_parse_from(["promptshape", "transform", "x", "--exclude", "colour"])
            .err()
            .unwrap();
        assert!(err.to_string().contains("colour"));
    }

    #[test]
    fn flags_override_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"base_url":"http://file:1","highlight":true}"#).unwrap();

        let cli = Cli::try_parse_from([
            "promptshape",
            "--config",
            path.to_str().unwrap(),
            "--base-url",
            "http://flag:2",
            "--no-highlight",
            "samples",
        ])
        .unwrap();
        let cfg = load_config(&cli).unwrap();

        assert_eq!(cfg.base_url, "http://flag:2");
        assert!(!cfg.highlight);
        assert_eq!(cfg.request_timeout_secs, 60);
    }

    #[test]
    fn config_file_is_used_without_flags() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"base_url":"http://file:1"}"#).unwrap();

        let cli = Cli::try_parse_from([
            "promptshape",
            "samples",
            "--config",
            path.to_str().unwrap(),
        ])
        .unwrap();

        // The environment may carry a base URL of its own.
        if std::env::var_os("PROMPTSHAPE_BASE_URL").is_none() {
            assert_eq!(load_config(&cli).unwrap().base_url, "http://file:1");
        }
    }

    #[test]
    fn theme_command_needs_no_service() {
        let cli = Cli::try_parse_from([
            "promptshape",
            "--base-url",
            "not a url",
            "theme",
            "toggle",
        ])
        .unwrap();
        let Commands::Theme { action } = cli.command else {
            panic!("expected theme");
        };

        let prefs = MemoryPreferences::default();
        let system = FixedAppearance(Some(Theme::Dark));
        assert_eq!(theme_command(&prefs, &system, action).unwrap(), Theme::Light);
        assert_eq!(prefs.load_theme().unwrap(), Some(Theme::Light));
    }

    #[test]
    fn theme_show_reads_without_saving() {
        let prefs = MemoryPreferences::default();
        let system = FixedAppearance(Some(Theme::Dark));
        assert_eq!(
            theme_command(&prefs, &system, ThemeAction::Show).unwrap(),
            Theme::Dark
        );
        assert_eq!(prefs.load_theme().unwrap(), None);

        let prefs = MemoryPreferences::with_theme(Theme::Light);
        assert_eq!(
            theme_command(&prefs, &system, ThemeAction::Show).unwrap(),
            Theme::Light
        );
    }

    #[test]
    fn theme_toggle_persists_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let prefs = PreferenceFileStore::at_path(dir.path().join("preferences.json"));
        let system = FixedAppearance(None);

        let first = theme_command(&prefs, &system, ThemeAction::Toggle).unwrap();
        let second = theme_command(&prefs, &system, ThemeAction::Toggle).unwrap();
        assert_eq!(first, Theme::default().toggled());
        assert_eq!(second, Theme::default());
    }
}
