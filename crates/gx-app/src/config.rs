//! Settings loaded from `<dir>/.gx/config.toml`
//!
//! Missing or unreadable files fall back to defaults; parsing problems are
//! logged, never fatal.

use std::path::Path;

use gx_core::prelude::*;
use gx_core::{FormatOptions, DEFAULT_ARRAY_PREVIEW_LIMIT};
use serde::{Deserialize, Serialize};

use crate::search::{Direction, SearchOptions};

pub const GX_DIR: &str = ".gx";
pub const CONFIG_FILENAME: &str = "config.toml";

/// All settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Settings {
    #[serde(default)]
    pub search: SearchSettings,

    #[serde(default)]
    pub display: DisplaySettings,
}

/// Search defaults and budget
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SearchSettings {
    #[serde(default)]
    pub case_sensitive: bool,

    #[serde(default = "default_true")]
    pub expand_while_searching: bool,

    /// Search forward by default (false = backward)
    #[serde(default = "default_true")]
    pub forward: bool,

    /// Total navigator steps per search (0 = unlimited)
    #[serde(default = "default_max_steps")]
    pub max_steps: u64,

    /// Steps per deferred slice before yielding to the event loop
    #[serde(default = "default_steps_per_slice")]
    pub steps_per_slice: usize,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            case_sensitive: false,
            expand_while_searching: true,
            forward: true,
            max_steps: default_max_steps(),
            steps_per_slice: default_steps_per_slice(),
        }
    }
}

impl SearchSettings {
    /// Search options for `text` using these defaults.
    pub fn options_for(&self, text: impl Into<String>) -> SearchOptions {
        SearchOptions::new(text)
            .case_sensitive(self.case_sensitive)
            .expand_while_searching(self.expand_while_searching)
            .direction(if self.forward {
                Direction::Forward
            } else {
                Direction::Backward
            })
    }

    /// Slice size, never zero.
    pub fn slice(&self) -> usize {
        self.steps_per_slice.max(1)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct DisplaySettings {
    /// Items shown in a primitive-array preview
    #[serde(default = "default_array_preview_limit")]
    pub array_preview_limit: usize,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            array_preview_limit: default_array_preview_limit(),
        }
    }
}

impl DisplaySettings {
    pub fn format_options(&self) -> FormatOptions {
        FormatOptions {
            array_preview_limit: self.array_preview_limit,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_max_steps() -> u64 {
    1_000_000
}

fn default_steps_per_slice() -> usize {
    512
}

fn default_array_preview_limit() -> usize {
    DEFAULT_ARRAY_PREVIEW_LIMIT
}

/// Load settings from `<dir>/.gx/config.toml`
pub fn load_settings(dir: &Path) -> Settings {
    let config_path = dir.join(GX_DIR).join(CONFIG_FILENAME);

    if !config_path.exists() {
        debug!("No config file at {:?}, using defaults", config_path);
        return Settings::default();
    }

    match std::fs::read_to_string(&config_path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(settings) => {
                debug!("Loaded settings from {:?}", config_path);
                settings
            }
            Err(e) => {
                warn!("Failed to parse {:?}: {}", config_path, e);
                Settings::default()
            }
        },
        Err(e) => {
            warn!("Failed to read {:?}: {}", config_path, e);
            Settings::default()
        }
    }
}

/// Create `<dir>/.gx/config.toml` with commented defaults if missing
pub fn init_config_dir(dir: &Path) -> Result<()> {
    let gx_dir = dir.join(GX_DIR);

    if !gx_dir.exists() {
        std::fs::create_dir_all(&gx_dir)
            .map_err(|e| Error::config(format!("Failed to create .gx dir: {}", e)))?;
        info!("Created .gx directory");
    }

    let config_path = gx_dir.join(CONFIG_FILENAME);
    if !config_path.exists() {
        std::fs::write(&config_path, generate_default_config())
            .map_err(|e| Error::config(format!("Failed to write config.toml: {}", e)))?;
        info!("Created default config.toml");
    }

    Ok(())
}

fn generate_default_config() -> String {
    format!(
        r#"# Graph Explorer Configuration

[search]
# Match case when searching
case_sensitive = false
# Load collapsed nodes while searching (released again when nothing is found)
expand_while_searching = true
# Default direction; false searches backward
forward = true
# Navigator steps before a search gives up (0 = unlimited)
max_steps = {max_steps}
# Steps per slice before yielding to the event loop
steps_per_slice = {steps_per_slice}

[display]
# Items shown in a primitive array preview
array_preview_limit = {array_preview_limit}
"#,
        max_steps = default_max_steps(),
        steps_per_slice = default_steps_per_slice(),
        array_preview_limit = default_array_preview_limit(),
    )
}
