use crate::error::ValidationError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Output style sent to the custom endpoint.
///
/// The backend only interprets `detailed` and `short`, but any other value is
/// carried through unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OutputStyle(pub String);

impl OutputStyle {
    pub const DETAILED: &'static str = "detailed";
    pub const SHORT: &'static str = "short";

    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn detailed() -> Self {
        Self::new(Self::DETAILED)
    }

    pub fn short() -> Self {
        Self::new(Self::SHORT)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_default(&self) -> bool {
        self.0 == Self::DETAILED
    }
}

impl Default for OutputStyle {
    fn default() -> Self {
        Self::detailed()
    }
}

impl fmt::Display for OutputStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Sections of the transformed JSON the user can opt out of.
///
/// Declaration order is display order; `Ord` relies on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncludeKey {
    Context,
    Problem,
    ExpectedSolution,
    OutputFormat,
}

impl IncludeKey {
    pub const ALL: [IncludeKey; 4] = [
        IncludeKey::Context,
        IncludeKey::Problem,
        IncludeKey::ExpectedSolution,
        IncludeKey::OutputFormat,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            IncludeKey::Context => "context",
            IncludeKey::Problem => "problem",
            IncludeKey::ExpectedSolution => "expected_solution",
            IncludeKey::OutputFormat => "output_format",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            IncludeKey::Context => "Context",
            IncludeKey::Problem => "Problem",
            IncludeKey::ExpectedSolution => "Expected solution",
            IncludeKey::OutputFormat => "Output format",
        }
    }
}

impl fmt::Display for IncludeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IncludeKey {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        IncludeKey::ALL
            .into_iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(needle))
            .ok_or_else(|| ValidationError::UnknownKey(needle.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub output_style: OutputStyle,
    pub include_keys: BTreeSet<IncludeKey>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            output_style: OutputStyle::default(),
            include_keys: IncludeKey::ALL.into_iter().collect(),
        }
    }
}

impl Settings {
    pub fn is_checked(&self, key: IncludeKey) -> bool {
        self.include_keys.contains(&key)
    }

    pub fn set_checked(&mut self, key: IncludeKey, checked: bool) {
        if checked {
            self.include_keys.insert(key);
        } else {
            self.include_keys.remove(&key);
        }
    }

    /// Flips one checkbox and returns its new state.
    pub fn toggle_key(&mut self, key: IncludeKey) -> bool {
        let checked = !self.is_checked(key);
        self.set_checked(key, checked);
        checked
    }

    pub fn select_style(&mut self, style: OutputStyle) {
        self.output_style = style;
    }

    pub fn checked_keys(&self) -> Vec<IncludeKey> {
        self.include_keys.iter().copied().collect()
    }

    /// True when anything differs from the defaults.
    pub fn is_custom(&self) -> bool {
        let custom_style = !self.output_style.is_default();
        let custom_keys = IncludeKey::ALL.iter().any(|k| !self.is_checked(*k));
        custom_style || custom_keys
    }
}
