//! Configuration persistence for evidence-sheet settings

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::domain::layout::DEFAULT_TITLE;

/// Where exported sheets are saved (Pictures or Documents)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SaveLocation {
    #[default]
    Pictures,
    Documents,
}

impl SaveLocation {
    /// Resolve to a directory, falling back to `$HOME/<name>`
    pub fn dir(self) -> Option<PathBuf> {
        match self {
            SaveLocation::Pictures => {
                dirs::picture_dir().or_else(|| dirs::home_dir().map(|h| h.join("Pictures")))
            }
            SaveLocation::Documents => {
                dirs::document_dir().or_else(|| dirs::home_dir().map(|h| h.join("Documents")))
            }
        }
    }
}

/// Application configuration persisted between sessions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetConfig {
    /// Title a new sheet starts with
    pub default_title: String,
    /// Where `compose` saves when no output path is given
    pub save_location: SaveLocation,
    /// Font for title and captions (None = search system fonts)
    pub font_path: Option<PathBuf>,
    /// Device pixels per CSS pixel in the exported PNG
    pub pixel_ratio: f32,
    /// Delay before the print page calls `window.print()`
    pub print_delay_ms: u64,
    /// Program used to open the print page
    pub opener: String,
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self {
            default_title: DEFAULT_TITLE.to_string(),
            save_location: SaveLocation::Pictures,
            font_path: None,
            pixel_ratio: 2.0,
            // Give the browser time to lay out the image before printing
            print_delay_ms: 500,
            opener: "xdg-open".to_string(),
        }
    }
}

impl SheetConfig {
    /// Directory name under the user config dir
    pub const ID: &'static str = "evidence-sheet";

    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(Self::ID).join("config.json"))
    }

    /// Load configuration from disk, or return defaults if unavailable
    pub fn load() -> Self {
        match Self::default_path() {
            Some(path) => Self::load_from(&path),
            None => {
                log::warn!("Could not determine config directory, using defaults");
                Self::default()
            }
        }
    }

    /// Load from a specific file; missing or invalid files give defaults
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match Self::read(path) {
            Ok(config) => config.sanitized(),
            Err(err) => {
                log::warn!("Error loading config, using defaults: {:?}", err);
                Self::default()
            }
        }
    }

    fn read(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    /// Save configuration to a file, creating parent directories
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }

    /// Replace out-of-range values with defaults
    fn sanitized(mut self) -> Self {
        if !(self.pixel_ratio.is_finite() && self.pixel_ratio > 0.0 && self.pixel_ratio <= 8.0) {
            log::warn!(
                "Ignoring pixel_ratio {} from config, using {}",
                self.pixel_ratio,
                Self::default().pixel_ratio
            );
            self.pixel_ratio = Self::default().pixel_ratio;
        }
        if self.opener.trim().is_empty() {
            self.opener = Self::default().opener;
        }
        self
    }
}
