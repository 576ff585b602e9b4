//! Authentication commands

use anyhow::{Context as _, Result};
use clap::{Args, Subcommand};
use dialoguer::{Input, Password};
use report_scoring_sdk::{LoginRequest, RegisterRequest};

use crate::config::{AuthMethod, ProfileCredentials};
use crate::context::{clear_keyring_token, store_keyring_token, Context};
use crate::output::finish;

/// Authentication management commands
#[derive(Debug, Args)]
pub struct AuthCommands {
    #[command(subcommand)]
    pub command: AuthSubcommand,
}

#[derive(Debug, Subcommand)]
pub enum AuthSubcommand {
    /// Create an account
    Register {
        /// Account name
        #[arg(short, long)]
        username: Option<String>,

        /// Email address
        #[arg(short, long)]
        email: Option<String>,

        /// Password (prompted when omitted)
        #[arg(long, env = "REPORT_SCORING_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// Log in and keep the session token
    Login {
        /// Account name
        #[arg(short, long)]
        username: Option<String>,

        /// Password (prompted when omitted)
        #[arg(long, env = "REPORT_SCORING_PASSWORD", hide_env_values = true)]
        password: Option<String>,

        /// Use system keyring for secure storage
        #[arg(long)]
        use_keyring: bool,
    },

    /// Forget the stored session
    Logout,

    /// Show current authentication status
    Status,
}

/// Execute authentication commands
pub async fn execute(ctx: &Context, cmd: AuthCommands) -> Result<()> {
    match cmd.command {
        AuthSubcommand::Register {
            username,
            email,
            password,
        } => register(ctx, username, email, password).await,
        AuthSubcommand::Login {
            username,
            password,
            use_keyring,
        } => login(ctx, username, password, use_keyring).await,
        AuthSubcommand::Logout => logout(ctx),
        AuthSubcommand::Status => status(ctx),
    }
}

fn prompt_text(value: Option<String>, prompt: &str) -> Result<String> {
    match value {
        Some(v) => Ok(v),
        None => Input::new()
            .with_prompt(prompt)
            .interact_text()
            .with_context(|| format!("Failed to read {}", prompt.to_lowercase())),
    }
}

fn prompt_password(value: Option<String>, confirm: bool) -> Result<String> {
    if let Some(v) = value {
        return Ok(v);
    }
    let mut prompt = Password::new().with_prompt("Password");
    if confirm {
        prompt = prompt.with_confirmation("Repeat password", "Passwords do not match");
    }
    prompt.interact().context("Failed to read password")
}

async fn register(
    ctx: &Context,
    username: Option<String>,
    email: Option<String>,
    password: Option<String>,
) -> Result<()> {
    let username = prompt_text(username, "Username")?;
    let email = prompt_text(email, "Email")?;
    let password = prompt_password(password, true)?;

    let client = ctx.create_client()?;

    let spinner = ctx.output.spinner("Registering...");
    let response = client
        .auth()
        .register(&RegisterRequest::new(&username, email, password))
        .await;
    finish(spinner);

    ctx.output.success(&response?.message);
    ctx.output
        .info(&format!("Run 'report-scoring auth login -u {}' to log in", username));
    Ok(())
}

async fn login(
    ctx: &Context,
    username: Option<String>,
    password: Option<String>,
    use_keyring: bool,
) -> Result<()> {
    let profile_name = ctx.profile_key().to_string();
    let username = prompt_text(username, "Username")?;
    let password = prompt_password(password, false)?;

    let client = ctx.create_client()?;

    let spinner = ctx.output.spinner("Logging in...");
    let response = client
        .auth()
        .login(&LoginRequest::new(&username, password))
        .await;
    finish(spinner);
    let response = response?;

    let mut config = ctx.config.clone();
    let mut credentials = ctx.credentials.clone();

    if use_keyring {
        store_keyring_token(&profile_name, &response.token)?;
        credentials.remove(&profile_name);
    } else {
        credentials.set(&profile_name, ProfileCredentials::token(&response.token));
    }

    let profile = config.get_or_create_profile(&profile_name);
    profile.auth = AuthMethod::Session {
        username: response.username.clone(),
        use_keyring,
    };
    if let Some(url) = &ctx.api_url_override {
        profile.api_url = Some(url.clone());
    }

    if config.default_profile.is_none() {
        config.set_default_profile(&profile_name);
        ctx.output
            .info(&format!("Set '{}' as default profile", profile_name));
    }

    config.save().context("Failed to save configuration")?;
    credentials.save().context("Failed to save credentials")?;

    tracing::info!(profile = %profile_name, username = %response.username, "Session stored");
    ctx.output.success(&format!(
        "{} Logged in as {}",
        response.message, response.username
    ));
    Ok(())
}

fn logout(ctx: &Context) -> Result<()> {
    let profile_name = ctx.profile_key();
    let mut credentials = ctx.credentials.clone();
    let mut config = ctx.config.clone();

    credentials.remove(profile_name);
    clear_keyring_token(profile_name);

    if let Some(p) = config.profiles.get_mut(profile_name) {
        p.auth = AuthMethod::None;
    }

    credentials.save().context("Failed to save credentials")?;
    config.save().context("Failed to save configuration")?;

    ctx.output
        .success(&format!("Logged out from profile '{}'", profile_name));
    Ok(())
}

fn status(ctx: &Context) -> Result<()> {
    let profile_name = ctx.profile_key();

    println!("Profile: {}", profile_name);
    println!("API URL: {}", ctx.api_url());

    match &ctx.profile.auth {
        AuthMethod::Session {
            username,
            use_keyring,
        } => {
            let storage = if *use_keyring { "keyring" } else { "file" };
            println!("Auth: Logged in as {} (token in {})", username, storage);
        }
        AuthMethod::None if ctx.credentials.get(profile_name).is_some() => {
            println!("Auth: Token found in credentials file");
        }
        AuthMethod::None => println!("Auth: Not logged in"),
    }

    if ctx.config.default_profile.as_deref() == Some(profile_name) {
        println!("Default: Yes");
    }

    Ok(())
}
