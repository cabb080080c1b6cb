use promptshape_core::theme::Theme;
use promptshape_engine::traits::SystemAppearance;

/// Reads the terminal background hint many emulators export as `COLORFGBG`.
#[derive(Debug, Default)]
pub struct TerminalAppearance;

impl SystemAppearance for TerminalAppearance {
    fn preferred_theme(&self) -> Option<Theme> {
        let raw = std::env::var("COLORFGBG").ok()?;
        parse_colorfgbg(&raw)
    }
}

/// `fg;bg` or `fg;default;bg`; only the last field matters.
pub fn parse_colorfgbg(raw: &str) -> Option<Theme> {
    let bg: u8 = raw.rsplit(';').next()?.trim().parse().ok()?;
    match bg {
        0..=6 | 8 => Some(Theme::Dark),
        7 | 9..=15 => Some(Theme::Light),
        _ => None,
    }
}
