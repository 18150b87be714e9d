//! Configuration for the RW token renderer.
//!
//! Parses `rw-render.toml` with serde and provides auto-discovery of the file
//! in parent directories.
//!
//! ```toml
//! [renderer]
//! mode = "development"
//! ```
//!
//! Host-side settings (for example a `--dev` flag) can be applied during load
//! via [`Overrides`].
//!
//! ## Environment Variable Expansion
//!
//! `renderer.mode` supports environment variable expansion before it is parsed:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default

mod expand;

use std::path::{Path, PathBuf};

use rw_token_renderer::{Mode, RenderBackend, RendererBuilder};
use serde::Deserialize;

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "rw-render.toml";

/// Settings that override configuration file values.
///
/// Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct Overrides {
    /// Override render mode.
    pub mode: Option<Mode>,
}

/// Renderer configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Renderer section as parsed from TOML.
    renderer: RendererConfigRaw,

    /// Resolved renderer configuration (set after loading).
    #[serde(skip)]
    pub renderer_resolved: RendererConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Raw renderer section (mode as a string, before expansion).
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RendererConfigRaw {
    mode: Option<String>,
}

/// Resolved renderer configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RendererConfig {
    /// Render mode.
    pub mode: Mode,
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`renderer.mode`").
        field: String,
        /// Error message (e.g., "${`RW_MODE`} not set").
        message: String,
    },
}

impl Config {
    /// Load configuration from file with optional overrides.
    ///
    /// If `config_path` is provided, loads from that file. Otherwise, searches
    /// for `rw-render.toml` in the current directory and its parents, falling
    /// back to defaults when none is found.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails,
    /// or a value does not validate.
    pub fn load(
        config_path: Option<&Path>,
        overrides: Option<&Overrides>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            tracing::debug!("No {CONFIG_FILENAME} found, using defaults");
            Self::default()
        };

        if let Some(overrides) = overrides {
            config.apply_overrides(overrides);
        }

        Ok(config)
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns error if parsing, expansion or validation fails.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let mut config: Self = toml::from_str(content)?;
        config.resolve()?;
        Ok(config)
    }

    /// Configured render mode.
    #[must_use]
    pub fn mode(&self) -> Mode {
        self.renderer_resolved.mode
    }

    /// Start a renderer builder with the configured settings applied.
    #[must_use]
    pub fn renderer_builder<B, S>(&self) -> RendererBuilder<B, S>
    where
        B: RenderBackend,
        S: Default + 'static,
    {
        RendererBuilder::new().mode(self.mode())
    }

    /// Apply overrides to the configuration.
    fn apply_overrides(&mut self, overrides: &Overrides) {
        if let Some(mode) = overrides.mode {
            self.renderer_resolved.mode = mode;
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config = Self::from_toml_str(&content)?;
        config.config_path = Some(path.to_path_buf());
        tracing::debug!(path = %path.display(), mode = %config.mode(), "Loaded renderer config");
        Ok(config)
    }

    /// Expand and validate raw values into the resolved configuration.
    fn resolve(&mut self) -> Result<(), ConfigError> {
        let mode = match self.renderer.mode.as_deref() {
            Some(raw) => {
                let expanded = expand::expand_env(raw, "renderer.mode")?;
                expanded.parse::<Mode>().map_err(|e| {
                    ConfigError::Validation(format!(
                        "renderer.mode must be \"production\" or \"development\" ({e})"
                    ))
                })?
            }
            None => Mode::default(),
        };

        self.renderer_resolved = RendererConfig { mode };
        Ok(())
    }
}
