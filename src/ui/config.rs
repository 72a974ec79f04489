//! # Configuration Persistence
//!
//! Manages user configuration stored in `~/.config/boxmenu/config.json`.
//!
//! ## Overview
//!
//! The [`Config`] struct is serialized to / deserialized from a JSON file in
//! the user's XDG config directory. Every field has a default, so a partial
//! file (or no file at all) is fine. Unknown fields are rejected to catch
//! typos early.
//!
//! ## File Location
//!
//! ```text
//! ~/.config/boxmenu/config.json
//! ~/.config/boxmenu/menu.json     (default catalog)
//! ```
//!
//! The `directories` crate is used to resolve the platform-appropriate config
//! directory.

use crate::ui::app::EdgePolicy;
use crate::ui::render::Layout;
use crate::ui::theme::Theme;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const MIN_PAGE_SIZE: usize = 1;
pub const MAX_PAGE_SIZE: usize = 200;
pub const MIN_WIDTH: usize = 20;
pub const MAX_WIDTH: usize = 400;
pub const MAX_PREVIEW_ROWS: usize = 20;

/// Persisted user configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// The name of the selected theme (should match a built-in theme name).
    #[serde(default = "default_theme_name")]
    pub theme: String,

    /// Item rows shown at once.
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Columns inside the box border.
    #[serde(default = "default_width")]
    pub width: usize,

    #[serde(default = "default_preview_rows")]
    pub preview_rows: usize,

    #[serde(default)]
    pub edge_policy: EdgePolicy,

    /// Program and arguments that read clipboard text from stdin.
    #[serde(default = "default_clipboard_command")]
    pub clipboard_command: Vec<String>,
}

fn default_theme_name() -> String {
    "Default".to_string()
}

fn default_page_size() -> usize {
    10
}

fn default_width() -> usize {
    56
}

fn default_preview_rows() -> usize {
    3
}

fn default_clipboard_command() -> Vec<String> {
    vec!["wl-copy".to_string()]
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: default_theme_name(),
            page_size: default_page_size(),
            width: default_width(),
            preview_rows: default_preview_rows(),
            edge_policy: EdgePolicy::default(),
            clipboard_command: default_clipboard_command(),
        }
    }
}

impl Config {
    /// Load from `path`, or from the default location when `None`.
    pub fn resolve(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from(path),
            None => Self::load_from(&Self::config_path()?),
        }
    }

    /// Load configuration from a specific path. Returns `Config::default()` if
    /// the file does not exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    /// Save the current configuration to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let contents = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, contents)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Box geometry with every dimension clamped to a drawable range.
    pub fn layout(&self) -> Layout {
        Layout {
            inner_width: self.width.clamp(MIN_WIDTH, MAX_WIDTH),
            page_size: self.page_size.clamp(MIN_PAGE_SIZE, MAX_PAGE_SIZE),
            preview_rows: self.preview_rows.min(MAX_PREVIEW_ROWS),
        }
    }

    /// The configured theme, or the default one if the name is unknown.
    pub fn theme(&self) -> &'static Theme {
        Theme::by_name(&self.theme).unwrap_or_else(|| {
            log::warn!(
                "Unknown theme '{}', using '{}'",
                self.theme,
                Theme::default_theme().name
            );
            Theme::default_theme()
        })
    }

    /// Return the path to the config file.
    pub fn config_path() -> Result<PathBuf> {
        Ok(project_dirs()?.config_dir().join("config.json"))
    }

    /// Catalog used when none is given on the command line.
    pub fn default_catalog_path() -> Result<PathBuf> {
        Ok(project_dirs()?.config_dir().join("menu.json"))
    }
}

fn project_dirs() -> Result<directories::ProjectDirs> {
    directories::ProjectDirs::from("", "", "boxmenu").context("Could not determine config directory")
}
