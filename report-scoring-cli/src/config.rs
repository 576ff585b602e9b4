//! CLI configuration management
//!
//! Profiles and preferences live in `config.toml`; session tokens issued by
//! `auth login` live in `credentials.toml` next to it (mode 0600 on unix) or
//! in the system keyring.

use anyhow::{Context as _, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

/// Overrides the directory holding `config.toml` and `credentials.toml`
pub const CONFIG_DIR_ENV: &str = "REPORT_SCORING_CONFIG_DIR";

/// Service name used for keyring entries
pub const KEYRING_SERVICE: &str = "report-scoring-cli";

/// CLI configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CliConfig {
    /// Default profile to use
    #[serde(default)]
    pub default_profile: Option<String>,

    /// Named profiles
    #[serde(default)]
    pub profiles: BTreeMap<String, Profile>,

    /// Global settings
    #[serde(default)]
    pub settings: Settings,
}

impl CliConfig {
    /// Load configuration from the default location
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config from {:?}", path))?;
            let config: CliConfig = toml::from_str(&content)
                .with_context(|| format!("Failed to parse config from {:?}", path))?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to the default location
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory {:?}", parent))?;
        }
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(&path, content)
            .with_context(|| format!("Failed to write config to {:?}", path))?;
        Ok(())
    }

    /// Directory holding the configuration files
    pub fn config_dir() -> Result<PathBuf> {
        if let Some(dir) = std::env::var_os(CONFIG_DIR_ENV) {
            return Ok(PathBuf::from(dir));
        }
        let dirs = ProjectDirs::from("com", "report-scoring", "report-scoring-cli")
            .context("Could not determine config directory")?;
        Ok(dirs.config_dir().to_path_buf())
    }

    /// Get the configuration file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Get the credentials file path
    pub fn credentials_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("credentials.toml"))
    }

    /// Get a profile by name, or the default profile
    pub fn get_profile(&self, name: Option<&str>) -> Option<&Profile> {
        let profile_name = name.or(self.default_profile.as_deref())?;
        self.profiles.get(profile_name)
    }

    /// Get or create a profile
    pub fn get_or_create_profile(&mut self, name: &str) -> &mut Profile {
        self.profiles.entry(name.to_string()).or_default()
    }

    /// Set the default profile
    pub fn set_default_profile(&mut self, name: &str) {
        self.default_profile = Some(name.to_string());
    }
}

/// A configuration profile
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Profile {
    /// Backend origin
    #[serde(default)]
    pub api_url: Option<String>,

    /// Where the session token is kept
    #[serde(default)]
    pub auth: AuthMethod,

    /// Default output format
    #[serde(default)]
    pub output_format: Option<String>,

    /// Additional headers
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
}

impl Profile {
    /// Get the API URL, falling back to the process settings
    pub fn api_url(&self) -> &str {
        self.api_url
            .as_deref()
            .unwrap_or(&report_scoring_core::Settings::global().api_base_url)
    }
}

/// Authentication method configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AuthMethod {
    /// Not logged in
    #[default]
    None,
    /// Session token from `auth login`
    Session {
        /// Account the token was issued to
        username: String,
        /// Whether the token is stored in system keyring
        #[serde(default)]
        use_keyring: bool,
    },
}

/// Global settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Settings {
    /// Default output format
    #[serde(default = "default_output_format")]
    pub output_format: String,

    /// Enable colored output
    #[serde(default = "default_true")]
    pub color: bool,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Check scores and pagination before sending
    #[serde(default)]
    pub validate_requests: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            output_format: default_output_format(),
            color: true,
            timeout_secs: default_timeout(),
            validate_requests: false,
        }
    }
}

fn default_output_format() -> String {
    "table".to_string()
}

fn default_true() -> bool {
    true
}

fn default_timeout() -> u64 {
    10
}

/// Credential storage
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Credentials {
    /// Stored credentials by profile name
    #[serde(default)]
    pub profiles: BTreeMap<String, ProfileCredentials>,
}

impl Credentials {
    /// Load credentials from the default location
    pub fn load() -> Result<Self> {
        let path = CliConfig::credentials_path()?;
        if path.exists() {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read credentials from {:?}", path))?;
            let creds: Credentials = toml::from_str(&content)
                .with_context(|| format!("Failed to parse credentials from {:?}", path))?;
            Ok(creds)
        } else {
            Ok(Self::default())
        }
    }

    /// Save credentials to the default location
    pub fn save(&self) -> Result<()> {
        let path = CliConfig::credentials_path()?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create credentials directory {:?}", parent))?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize credentials")?;
        fs::write(&path, content)
            .with_context(|| format!("Failed to write credentials to {:?}", path))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = fs::metadata(&path)?.permissions();
            perms.set_mode(0o600);
            fs::set_permissions(&path, perms)?;
        }

        Ok(())
    }

    /// Get credentials for a profile
    pub fn get(&self, profile: &str) -> Option<&ProfileCredentials> {
        self.profiles.get(profile)
    }

    /// Set credentials for a profile
    pub fn set(&mut self, profile: &str, creds: ProfileCredentials) {
        self.profiles.insert(profile.to_string(), creds);
    }

    /// Remove credentials for a profile
    pub fn remove(&mut self, profile: &str) -> Option<ProfileCredentials> {
        self.profiles.remove(profile)
    }
}

/// Credentials for a single profile
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProfileCredentials {
    /// Session token
    pub token: String,
}

impl ProfileCredentials {
    pub fn token(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}
