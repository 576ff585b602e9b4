//! CLI execution context

use anyhow::{Context as _, Result};
use clap::ValueEnum;
use report_scoring_core::Settings;
use report_scoring_sdk::{AuthConfig, ReportScoringClient, SdkConfig};
use std::time::Duration;

use crate::cli::Cli;
use crate::config::{AuthMethod, CliConfig, Credentials, Profile, KEYRING_SERVICE};
use crate::output::{OutputFormat, OutputWriter};

/// Execution context for CLI commands
pub struct Context {
    /// CLI configuration
    pub config: CliConfig,

    /// Credentials storage
    pub credentials: Credentials,

    /// Active profile name
    pub profile_name: Option<String>,

    /// Active profile
    pub profile: Profile,

    /// Output writer
    pub output: OutputWriter,

    /// Verbose mode
    pub verbose: bool,

    /// API URL override
    pub api_url_override: Option<String>,
}

impl Context {
    /// Create a new context from CLI arguments
    pub fn new(cli: &Cli) -> Result<Self> {
        let config = CliConfig::load()?;
        let credentials = Credentials::load()?;

        let profile_name = cli
            .profile
            .clone()
            .or_else(|| config.default_profile.clone());
        let profile = config
            .get_profile(profile_name.as_deref())
            .cloned()
            .unwrap_or_default();

        let format = match cli.output {
            Some(format) => format,
            None => resolve_format(&profile, &config)?,
        };
        let no_color = cli.no_color || !config.settings.color;
        let output = OutputWriter::new(format, no_color);

        Ok(Self {
            config,
            credentials,
            profile_name,
            profile,
            output,
            verbose: cli.verbose,
            api_url_override: cli.api_url.clone(),
        })
    }

    /// Name used for credential lookups
    pub fn profile_key(&self) -> &str {
        self.profile_name.as_deref().unwrap_or("default")
    }

    /// Get the effective API URL
    pub fn api_url(&self) -> &str {
        self.api_url_override
            .as_deref()
            .unwrap_or_else(|| self.profile.api_url())
    }

    /// Output format in effect
    pub fn output_format(&self) -> OutputFormat {
        self.output.format()
    }

    /// Get the SDK authentication configuration
    pub fn get_auth_config(&self) -> Result<AuthConfig> {
        let profile_name = self.profile_key();

        if let Some(creds) = self.credentials.get(profile_name) {
            return Ok(AuthConfig::BearerToken(creds.token.clone()));
        }

        match &self.profile.auth {
            AuthMethod::None => Ok(AuthConfig::None),
            AuthMethod::Session { use_keyring, .. } => {
                if *use_keyring {
                    get_keyring_token(profile_name)
                } else {
                    Ok(AuthConfig::None)
                }
            }
        }
    }

    /// Create an SDK client
    pub fn create_client(&self) -> Result<ReportScoringClient> {
        let auth = self.get_auth_config()?;
        let timeout = Duration::from_secs(self.config.settings.timeout_secs);

        let mut config = SdkConfig::from_settings(Settings::global());
        config.base_url = self.api_url().to_string();
        config = config
            .with_auth(auth)
            .with_timeout(timeout)
            .with_validation(self.config.settings.validate_requests)
            .with_logging(self.verbose);

        for (name, value) in &self.profile.headers {
            config = config.with_header(name.clone(), value.clone());
        }

        ReportScoringClient::new(config).context("Failed to create API client")
    }

    /// Check if a session is stored for the active profile
    pub fn has_auth(&self) -> bool {
        self.credentials.get(self.profile_key()).is_some()
            || !matches!(self.profile.auth, AuthMethod::None)
    }
}

/// Output format from the profile, then the global settings
fn resolve_format(profile: &Profile, config: &CliConfig) -> Result<OutputFormat> {
    let name = profile
        .output_format
        .as_deref()
        .unwrap_or(&config.settings.output_format);
    OutputFormat::from_str(name, true)
        .map_err(|e| anyhow::anyhow!("Invalid output format '{}' in config: {}", name, e))
}

fn keyring_entry(profile: &str) -> keyring::Result<keyring::Entry> {
    keyring::Entry::new(KEYRING_SERVICE, &format!("{}-token", profile))
}

/// Get token from system keyring
fn get_keyring_token(profile: &str) -> Result<AuthConfig> {
    let entry = keyring_entry(profile).context("Failed to access keyring")?;
    let token = entry
        .get_password()
        .context("Token not found in keyring. Run 'report-scoring auth login' to log in again.")?;
    Ok(AuthConfig::BearerToken(token))
}

/// Store a session token in the system keyring
pub fn store_keyring_token(profile: &str, token: &str) -> Result<()> {
    keyring_entry(profile)
        .and_then(|entry| entry.set_password(token))
        .context("Failed to store token in keyring")
}

/// Remove a stored keyring token, ignoring a missing entry
pub fn clear_keyring_token(profile: &str) {
    let result = keyring_entry(profile).and_then(|entry| entry.delete_credential());
    if let Err(e) = ignore_missing(result) {
        tracing::warn!(profile = %profile, error = %e, "Failed to clear keyring token");
    }
}

fn ignore_missing(result: keyring::Result<()>) -> keyring::Result<()> {
    match result {
        Err(keyring::Error::NoEntry) => Ok(()),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_keyring_entry_is_not_an_error() {
        assert!(ignore_missing(Err(keyring::Error::NoEntry)).is_ok());
        assert!(ignore_missing(Ok(())).is_ok());
    }

    #[test]
    fn test_other_keyring_errors_are_kept() {
        let err = ignore_missing(Err(keyring::Error::Invalid(
            "user".to_string(),
            "empty".to_string(),
        )));
        assert!(matches!(err, Err(keyring::Error::Invalid(..))));
    }
}
