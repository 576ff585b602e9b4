//! Process-wide settings.
//!
//! Settings are resolved once per process, in order: built-in defaults,
//! `config/default.*`, `config/local.*`, then `REPORT_SCORING__*` environment
//! variables. After the first call to [`Settings::global`] they never change.

use config::{Config as ConfigLoader, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use tracing::{debug, warn};

use crate::error::{FieldError, SettingsError};

/// Default backend origin; every API path is joined to it.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5000";

/// Default number of reports per page.
pub const DEFAULT_PAGE_SIZE: u32 = 5;

const ENV_PREFIX: &str = "REPORT_SCORING";

static GLOBAL: OnceLock<Settings> = OnceLock::new();

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Backend origin, without the `/api` prefix
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// File extensions the preview pane renders inline
    #[serde(default = "default_image_formats")]
    pub supported_image_formats: Vec<String>,

    #[serde(default = "default_page_size")]
    pub default_page_size: u32,

    #[serde(default)]
    pub score_range: ScoreRange,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            supported_image_formats: default_image_formats(),
            default_page_size: default_page_size(),
            score_range: ScoreRange::default(),
        }
    }
}

impl Settings {
    /// Load settings from the config files and the environment.
    pub fn load() -> Result<Self, SettingsError> {
        let loaded = ConfigLoader::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("supported_image_formats"),
            )
            .build()?;

        let settings: Settings = loaded.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Parse settings from an inline TOML document. Missing keys take their
    /// defaults.
    pub fn from_toml_str(source: &str) -> Result<Self, SettingsError> {
        let loaded = ConfigLoader::builder()
            .add_source(File::from_str(source, FileFormat::Toml))
            .build()?;

        let settings: Settings = loaded.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// The process-wide settings. The first call loads them; a load failure
    /// is logged and the defaults are used instead.
    pub fn global() -> &'static Settings {
        GLOBAL.get_or_init(|| match Settings::load() {
            Ok(settings) => {
                debug!(api_base_url = %settings.api_base_url, "Settings loaded");
                settings
            }
            Err(e) => {
                warn!("Falling back to default settings: {}", e);
                Settings::default()
            }
        })
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.api_base_url.trim().is_empty() {
            return Err(SettingsError::Invalid(
                "api_base_url cannot be empty".to_string(),
            ));
        }
        if self.default_page_size == 0 {
            return Err(SettingsError::Invalid(
                "default_page_size must be at least 1".to_string(),
            ));
        }
        if !(self.score_range.min <= self.score_range.max) {
            return Err(SettingsError::Invalid(format!(
                "score_range min ({}) exceeds max ({})",
                self.score_range.min, self.score_range.max
            )));
        }
        Ok(())
    }

    /// Whether `filename` has one of the configured image extensions.
    /// Matching ignores case.
    pub fn is_supported_image(&self, filename: &str) -> bool {
        let lower = filename.to_lowercase();
        self.supported_image_formats
            .iter()
            .any(|ext| lower.ends_with(&ext.to_lowercase()))
    }
}

/// Inclusive bounds for rubric scores.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreRange {
    pub min: f64,
    pub max: f64,
}

impl Default for ScoreRange {
    fn default() -> Self {
        Self {
            min: 0.0,
            max: 100.0,
        }
    }
}

impl ScoreRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// NaN is never contained.
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    pub fn check(&self, field: &str, value: f64) -> Option<FieldError> {
        if self.contains(value) {
            None
        } else {
            Some(
                FieldError::new(
                    field,
                    format!("must be between {} and {}, got {}", self.min, self.max, value),
                )
                .with_code("range"),
            )
        }
    }
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_image_formats() -> Vec<String> {
    [".jpg", ".jpeg", ".png", ".gif"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}
