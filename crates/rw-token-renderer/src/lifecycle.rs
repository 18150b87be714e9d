//! Lifecycle points and render mode.

use std::fmt;
use std::str::FromStr;

use crate::error::{UnknownLifecycle, UnknownMode};

/// Point in a render pass where hooks run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum Lifecycle {
    /// Before the top-level token walk.
    BeforeRender,
    /// After the top-level token walk.
    AfterRender,
    /// Before the children of an `inline` token are rendered.
    BeforeInlineRender,
    /// After the children of an `inline` token are rendered.
    AfterInlineRender,
}

impl Lifecycle {
    /// All lifecycle points.
    pub const ALL: [Self; 4] = [
        Self::BeforeRender,
        Self::AfterRender,
        Self::BeforeInlineRender,
        Self::AfterInlineRender,
    ];

    /// Canonical name, e.g. `beforeRender`.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::BeforeRender => "beforeRender",
            Self::AfterRender => "afterRender",
            Self::BeforeInlineRender => "beforeInlineRender",
            Self::AfterInlineRender => "afterInlineRender",
        }
    }

    /// Whether this point belongs to the inline pass.
    #[must_use]
    pub fn is_inline(self) -> bool {
        matches!(self, Self::BeforeInlineRender | Self::AfterInlineRender)
    }
}

impl fmt::Display for Lifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Accepts the canonical camelCase names and their `snake_case` spelling.
impl FromStr for Lifecycle {
    type Err = UnknownLifecycle;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "beforeRender" | "before_render" => Ok(Self::BeforeRender),
            "afterRender" | "after_render" => Ok(Self::AfterRender),
            "beforeInlineRender" | "before_inline_render" => Ok(Self::BeforeInlineRender),
            "afterInlineRender" | "after_inline_render" => Ok(Self::AfterInlineRender),
            other => Err(UnknownLifecycle(other.to_owned())),
        }
    }
}

/// Render mode.
///
/// Informational only: output never depends on it. In development mode the
/// renderer reports ignored registrations at `warn` level instead of `debug`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Mode {
    /// Production mode (default).
    #[default]
    Production,
    /// Development mode.
    Development,
}

impl Mode {
    /// Lowercase name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Production => "production",
            Self::Development => "development",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = UnknownMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Ok(Self::Production),
            "development" | "dev" => Ok(Self::Development),
            _ => Err(UnknownMode(s.to_owned())),
        }
    }
}
