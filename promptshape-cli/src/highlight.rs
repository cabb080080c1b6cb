use colored::{Color, Colorize};
use promptshape_core::theme::Theme;
use promptshape_engine::traits::Highlighter;
use regex::{Captures, Regex};
use std::sync::{Arc, OnceLock, RwLock};

/// Theme shared between the terminal view and the highlighter.
pub type SharedTheme = Arc<RwLock<Theme>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Palette {
    key: Color,
    string: Color,
    number: Color,
    boolean: Color,
    null: Color,
}

impl Palette {
    fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Light => Palette {
                key: Color::Blue,
                string: Color::Green,
                number: Color::Magenta,
                boolean: Color::Yellow,
                null: Color::Red,
            },
            Theme::Dark => Palette {
                key: Color::BrightBlue,
                string: Color::BrightGreen,
                number: Color::BrightMagenta,
                boolean: Color::BrightYellow,
                null: Color::BrightBlack,
            },
        }
    }
}

fn token_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        // Strings are matched first so numbers and literals inside them are left alone.
        Regex::new(
            r#""(?:\\.|[^"\\])*"(\s*:)?|\b(?:true|false)\b|\bnull\b|-?\d+(?:\.\d+)?(?:[eE][+-]?\d+)?"#,
        )
        .expect("valid json token regex")
    })
}

/// Colors JSON tokens with ANSI escapes; structure and whitespace are kept.
#[derive(Debug, Clone, Default)]
pub struct AnsiJsonHighlighter {
    theme: SharedTheme,
}

impl AnsiJsonHighlighter {
    pub fn new(theme: SharedTheme) -> Self {
        Self { theme }
    }

    fn palette(&self) -> Palette {
        let theme = self.theme.read().map(|t| *t).unwrap_or_default();
        Palette::for_theme(theme)
    }
}

impl Highlighter for AnsiJsonHighlighter {
    fn highlight(&self, json: &str) -> String {
        let palette = self.palette();
        token_regex()
            .replace_all(json, |caps: &Captures<'_>| {
                let token = &caps[0];
                if token.starts_with('"') {
                    match caps.get(1) {
                        Some(colon) => {
                            let key = &token[..token.len() - colon.as_str().len()];
                            format!("{}{}", key.color(palette.key).bold(), colon.as_str())
                        }
                        None => token.color(palette.string).to_string(),
                    }
                } else if token == "true" || token == "false" {
                    token.color(palette.boolean).to_string()
                } else if token == "null" {
                    token.color(palette.null).to_string()
                } else {
                    token.color(palette.number).to_string()
                }
            })
            .into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strip_ansi(s: &str) -> String {
        Regex::new(r"\x1b\[[0-9;]*m").unwrap().replace_all(s, "").into_owned()
    }

    fn highlighter(theme: Theme) -> AnsiJsonHighlighter {
        colored::control::set_override(true);
        AnsiJsonHighlighter::new(Arc::new(RwLock::new(theme)))
    }

    #[test]
    fn content_survives_highlighting() {
        let json = "{\n  \"name\": \"a \\\"quoted\\\" 42\",\n  \"n\": -1.5e3,\n  \"ok\": true,\n  \"none\": null\n}";
        let out = highlighter(Theme::Light).highlight(json);

        assert_ne!(out, json);
        assert_eq!(strip_ansi(&out), json);
    }

    #[test]
    fn keys_and_values_get_different_colors() {
        let out = highlighter(Theme::Light).highlight(r#"{"k": "v"}"#);
        let key = format!("{}", "\"k\"".color(Color::Blue).bold());
        let value = format!("{}", "\"v\"".color(Color::Green));

        assert!(out.contains(&key), "{out:?}");
        assert!(out.contains(&value), "{out:?}");
    }

    #[test]
    fn numbers_inside_strings_are_not_recolored() {
        let out = highlighter(Theme::Dark).highlight(r#"["list 5 colors"]"#);
        let whole = format!("{}", "\"list 5 colors\"".color(Color::BrightGreen));
        assert_eq!(out, format!("[{whole}]"));
    }

    #[test]
    fn palette_follows_shared_theme() {
        let theme = Arc::new(RwLock::new(Theme::Light));
        colored::control::set_override(true);
        let h = AnsiJsonHighlighter::new(theme.clone());

        let light = h.highlight("1");
        *theme.write().unwrap() = Theme::Dark;
        let dark = h.highlight("1");

        assert_ne!(light, dark);
        assert_eq!(strip_ansi(&dark), "1");
    }
}
