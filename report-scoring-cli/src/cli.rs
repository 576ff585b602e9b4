//! Command-line argument definitions

use clap::{Parser, Subcommand};

use crate::commands::{
    auth::AuthCommands, config::ConfigCommands, files::FilesCommands, reports::ReportsCommands,
    routes::RoutesCommands, scoring::ScoringCommands,
};
use crate::output::OutputFormat;

#[derive(Debug, Parser)]
#[command(
    name = "report-scoring",
    version,
    about = "Browse, download and score reports from the command line"
)]
pub struct Cli {
    /// Configuration profile to use
    #[arg(short, long, global = true, env = "REPORT_SCORING_PROFILE")]
    pub profile: Option<String>,

    /// Backend origin, overriding the profile
    #[arg(long, global = true, env = "REPORT_SCORING_API_URL")]
    pub api_url: Option<String>,

    /// Output format [default: from profile or settings, else table]
    #[arg(short, long, global = true, value_enum)]
    pub output: Option<OutputFormat>,

    /// Log requests and responses
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Upload, list and remove files
    Files(FilesCommands),

    /// Browse, download and score reports
    Reports(ReportsCommands),

    /// Overall scores given by the logged-in user
    Scoring(ScoringCommands),

    /// Register, log in and log out
    Auth(AuthCommands),

    /// Inspect the page route table
    Routes(RoutesCommands),

    /// Manage CLI configuration
    Config(ConfigCommands),
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "report-scoring",
            "routes",
            "list",
            "--output",
            "json",
            "--api-url",
            "http://lab:5000",
        ])
        .unwrap();

        assert_eq!(cli.output, Some(OutputFormat::Json));
        assert_eq!(cli.api_url.as_deref(), Some("http://lab:5000"));
    }
}
