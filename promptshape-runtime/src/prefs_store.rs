use anyhow::Context;
use promptshape_core::theme::Theme;
use promptshape_engine::traits::PreferenceStore;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Default, Serialize, Deserialize)]
struct Preferences {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    theme: Option<Theme>,
}

/// Client-local key-value preferences, stored as a small JSON object.
#[derive(Debug, Clone)]
pub struct PreferenceFileStore {
    path: PathBuf,
}

impl PreferenceFileStore {
    pub fn at_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> anyhow::Result<Preferences> {
        if !self.path.exists() {
            return Ok(Preferences::default());
        }
        let raw = std::fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read preferences: {}", self.path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse preferences: {}", self.path.display()))
    }
}

impl PreferenceStore for PreferenceFileStore {
    fn load_theme(&self) -> anyhow::Result<Option<Theme>> {
        Ok(self.read()?.theme)
    }

    fn save_theme(&self, theme: Theme) -> anyhow::Result<()> {
        // A corrupt file is overwritten rather than blocking the toggle.
        let mut prefs = self.read().unwrap_or_default();
        prefs.theme = Some(theme);
        let json = serde_json::to_vec_pretty(&prefs).context("encode preferences JSON")?;
        crate::fs_util::write_atomic(&self.path, &json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_file_has_no_theme() {
        let dir = tempfile::tempdir().unwrap();
        let store = PreferenceFileStore::at_path(dir.path().join("preferences.json"));
        assert_eq!(store.load_theme().unwrap(), None);
    }

    #[test]
    fn persists_theme() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preferences.json");
        let store = PreferenceFileStore::at_path(&path);

        store.save_theme(Theme::Dark).unwrap();
        assert_eq!(store.load_theme().unwrap(), Some(Theme::Dark));
        assert_eq!(
            std::fs::read_to_string(&path).unwrap().replace(char::is_whitespace, ""),
            r#"{"theme":"dark"}"#
        );

        store.save_theme(Theme::Light).unwrap();
        assert_eq!(
            PreferenceFileStore::at_path(&path).load_theme().unwrap(),
            Some(Theme::Light)
        );
    }

    #[test]
    fn corrupt_file_errors_on_load_but_not_on_save() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preferences.json");
        std::fs::write(&path, r#"{"theme":"sepia"}"#).unwrap();
        let store = PreferenceFileStore::at_path(&path);

        assert!(store.load_theme().is_err());
        store.save_theme(Theme::Dark).unwrap();
        assert_eq!(store.load_theme().unwrap(), Some(Theme::Dark));
    }
}
