//! Application configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{VantageError, VantageResult};

/// Global studio configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StudioConfig {
    /// Batch export settings.
    pub export: ExportDefaults,

    /// Rasterization settings.
    pub render: RenderDefaults,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// How the downloadable archive file is named.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ArchiveNaming {
    /// `{prefix}-{YYYYMMDD-HHMMSS}.zip`
    Timestamped,
    /// `{prefix}-{suffix}.zip`
    Fixed { suffix: String },
}

/// Batch export parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportDefaults {
    /// Leading part of the archive file name.
    pub archive_prefix: String,

    /// Archive name qualification.
    pub naming: ArchiveNaming,

    /// Leading part of every image entry inside the archive.
    pub entry_prefix: String,

    /// Progress value reported when the first canvas starts rendering.
    pub low_watermark: u8,

    /// Progress value reported once the archive is compressed.
    pub high_watermark: u8,

    /// Directory the archive is saved into.
    pub output_dir: PathBuf,
}

/// Rasterization parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderDefaults {
    /// Font used for all typography. Probed from system locations when unset.
    pub font_path: Option<PathBuf>,

    /// Whether device frames carry the glass reflection overlay.
    pub show_gloss: bool,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "vantage_render_engine=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,

    /// Optional log file path.
    pub file: Option<PathBuf>,
}

impl Default for ExportDefaults {
    fn default() -> Self {
        Self {
            archive_prefix: "app-store-screenshots".to_string(),
            naming: ArchiveNaming::Fixed {
                suffix: "export".to_string(),
            },
            entry_prefix: "screenshot".to_string(),
            low_watermark: 10,
            high_watermark: 90,
            output_dir: dirs_default_exports(),
        }
    }
}

impl Default for RenderDefaults {
    fn default() -> Self {
        Self {
            font_path: None,
            show_gloss: true,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            file: None,
        }
    }
}

impl ExportDefaults {
    /// Reject watermark combinations that would break monotonic progress.
    pub fn validate(&self) -> VantageResult<()> {
        if self.low_watermark >= self.high_watermark {
            return Err(VantageError::config(format!(
                "export low watermark ({}) must be below high watermark ({})",
                self.low_watermark, self.high_watermark
            )));
        }
        if self.high_watermark > 100 {
            return Err(VantageError::config(format!(
                "export high watermark ({}) exceeds 100",
                self.high_watermark
            )));
        }
        if self.entry_prefix.trim().is_empty() {
            return Err(VantageError::config("export entry prefix is empty"));
        }
        Ok(())
    }
}

impl StudioConfig {
    /// Load config from the standard location, falling back to defaults.
    pub fn load() -> Self {
        let config_path = config_file_path();
        if config_path.exists() {
            match std::fs::read_to_string(&config_path) {
                Ok(content) => match serde_json::from_str::<StudioConfig>(&content) {
                    Ok(config) => match config.export.validate() {
                        Ok(()) => return config,
                        Err(e) => {
                            tracing::warn!("Ignoring invalid config at {:?}: {}", config_path, e);
                        }
                    },
                    Err(e) => {
                        tracing::warn!("Failed to parse config at {:?}: {}", config_path, e);
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read config at {:?}: {}", config_path, e);
                }
            }
        }
        Self::default()
    }

    /// Save config to the standard location.
    pub fn save(&self) -> Result<(), std::io::Error> {
        let config_path = config_file_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(config_path, json)
    }
}

/// Standard config file location.
fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("vantage").join("config.json")
}

/// Default export directory.
fn dirs_default_exports() -> PathBuf {
    let base = std::env::var("XDG_DOWNLOAD_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join("Downloads")
        });
    base.join("vantage")
}
