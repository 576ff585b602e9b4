//! Configuration commands

use anyhow::{Context as _, Result};
use clap::{Args, Subcommand};
use colored::Colorize;
use report_scoring_core::Settings;

use crate::config::CliConfig;
use crate::context::Context;
use crate::output::OutputFormat;

/// Configuration management commands
#[derive(Debug, Args)]
pub struct ConfigCommands {
    #[command(subcommand)]
    pub command: ConfigSubcommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigSubcommand {
    /// Show the effective configuration
    Show,

    /// Set the backend origin of the active profile
    SetUrl {
        /// Origin, e.g. http://localhost:5000
        url: String,
    },

    /// Show configuration file paths
    Path,
}

/// Execute configuration commands
pub async fn execute(ctx: &Context, cmd: ConfigCommands) -> Result<()> {
    match cmd.command {
        ConfigSubcommand::Show => show(ctx),
        ConfigSubcommand::SetUrl { url } => set_url(ctx, &url),
        ConfigSubcommand::Path => show_paths(),
    }
}

fn show(ctx: &Context) -> Result<()> {
    let settings = Settings::global();

    if matches!(ctx.output_format(), OutputFormat::Json | OutputFormat::Yaml) {
        let value = serde_json::json!({
            "profile": ctx.profile_key(),
            "api_url": ctx.api_url(),
            "app": settings,
            "cli": ctx.config,
        });
        return ctx.output.write_json(&value);
    }

    println!("{}", "Configuration".bold().underline());
    println!();
    println!("{}: {}", "Profile".cyan(), ctx.profile_key());
    println!("{}: {}", "API URL".cyan(), ctx.api_url());

    println!();
    println!("{}", "Application:".cyan());
    println!("  api_base_url: {}", settings.api_base_url);
    println!(
        "  supported_image_formats: {}",
        settings.supported_image_formats.join(", ")
    );
    println!("  default_page_size: {}", settings.default_page_size);
    println!(
        "  score_range: {} to {}",
        settings.score_range.min, settings.score_range.max
    );

    println!();
    println!("{}", "CLI:".cyan());
    println!("  output_format: {}", ctx.config.settings.output_format);
    println!("  color: {}", ctx.config.settings.color);
    println!("  timeout_secs: {}", ctx.config.settings.timeout_secs);
    println!(
        "  validate_requests: {}",
        ctx.config.settings.validate_requests
    );

    println!();
    println!("{}", "Profiles:".cyan());
    if ctx.config.profiles.is_empty() {
        println!("  No profiles configured");
    }
    for (name, p) in &ctx.config.profiles {
        let default_marker = if ctx.config.default_profile.as_deref() == Some(name) {
            " (default)".green().to_string()
        } else {
            String::new()
        };
        println!("  [{}]{}", name, default_marker);
        println!("    api_url: {}", p.api_url());
    }

    Ok(())
}

fn set_url(ctx: &Context, url: &str) -> Result<()> {
    let parsed = url::Url::parse(url).with_context(|| format!("Invalid URL: {}", url))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        anyhow::bail!("Unsupported URL scheme: {}", parsed.scheme());
    }

    let mut config = ctx.config.clone();
    let profile_name = ctx.profile_key();
    config.get_or_create_profile(profile_name).api_url = Some(url.to_string());
    if config.default_profile.is_none() {
        config.set_default_profile(profile_name);
    }
    config.save().context("Failed to save configuration")?;

    ctx.output
        .success(&format!("Profile '{}' now uses {}", profile_name, url));
    Ok(())
}

fn show_paths() -> Result<()> {
    println!("{}", "Configuration paths:".bold());
    println!();

    for (label, path) in [
        ("Config:     ", CliConfig::config_path()),
        ("Credentials:", CliConfig::credentials_path()),
    ] {
        match path {
            Ok(path) => {
                let status = if path.exists() { "✓".green() } else { "✗".red() };
                println!("  {} {} {}", label, status, path.display());
            }
            Err(e) => println!("  {} Error: {}", label, e),
        }
    }

    Ok(())
}
