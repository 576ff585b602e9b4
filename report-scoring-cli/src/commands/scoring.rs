//! Per-user scoring commands

use anyhow::Result;
use clap::{Args, Subcommand};
use comfy_table::Cell;
use report_scoring_sdk::{ScoreRecord, ScoreSubmission, UserScore};
use serde::Serialize;

use crate::context::Context;
use crate::output::{
    finish, print_field, print_optional_field, print_section, score_badge, TableDisplay,
};

/// Scoring commands. These need a session from `auth login`.
#[derive(Debug, Args)]
pub struct ScoringCommands {
    #[command(subcommand)]
    pub command: ScoringSubcommand,
}

#[derive(Debug, Subcommand)]
pub enum ScoringSubcommand {
    /// Give a report an overall score, replacing any earlier one
    Submit {
        /// Report ID
        report_id: String,

        /// Overall score
        score: u32,

        /// Free-text comments
        #[arg(short, long, default_value = "")]
        comments: String,
    },

    /// Show your score for a report
    Get {
        /// Report ID
        report_id: String,
    },

    /// List every score you have given
    Mine,
}

/// Execute scoring commands
pub async fn execute(ctx: &Context, cmd: ScoringCommands) -> Result<()> {
    if !ctx.has_auth() {
        anyhow::bail!("Not logged in. Run 'report-scoring auth login' first.");
    }

    match cmd.command {
        ScoringSubcommand::Submit {
            report_id,
            score,
            comments,
        } => {
            let submission = ScoreSubmission::new(report_id, score).with_comments(comments);
            submit(ctx, &submission).await
        }
        ScoringSubcommand::Get { report_id } => get(ctx, &report_id).await,
        ScoringSubcommand::Mine => mine(ctx).await,
    }
}

/// Displayable score
#[derive(Debug, Serialize)]
struct ScoreDisplay {
    report_id: String,
    score: u32,
    comments: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    updated_at: Option<String>,
}

impl From<UserScore> for ScoreDisplay {
    fn from(s: UserScore) -> Self {
        Self {
            report_id: s.report_id,
            score: s.score,
            comments: s.comments,
            updated_at: None,
        }
    }
}

impl ScoreDisplay {
    fn from_record(report_id: &str, r: ScoreRecord) -> Self {
        Self {
            report_id: report_id.to_string(),
            score: r.score,
            comments: r.comments,
            updated_at: r.updated_at.or(r.created_at),
        }
    }
}

impl TableDisplay for ScoreDisplay {
    fn to_row(&self) -> Vec<Cell> {
        vec![
            Cell::new(&self.report_id),
            Cell::new(score_badge(f64::from(self.score))),
            Cell::new(self.comments.as_deref().unwrap_or("-")),
        ]
    }

    fn display_single(&self) {
        print_section("Score");
        print_field("Report", &self.report_id);
        print_field("Score", &score_badge(f64::from(self.score)));
        print_optional_field("Comments", self.comments.as_deref());
        print_optional_field("Updated", self.updated_at.as_deref());
    }

    fn display_compact(&self) {
        println!("{}\t{}", self.report_id, self.score);
    }
}

async fn submit(ctx: &Context, submission: &ScoreSubmission) -> Result<()> {
    let client = ctx.create_client()?;

    let spinner = ctx.output.spinner("Saving score...");
    let response = client.scoring().submit(submission).await;
    finish(spinner);

    ctx.output.success(&response?.message);
    Ok(())
}

async fn get(ctx: &Context, report_id: &str) -> Result<()> {
    let client = ctx.create_client()?;

    let spinner = ctx.output.spinner("Fetching score...");
    let response = client.scoring().get(report_id).await;
    finish(spinner);

    match response {
        Ok(record) => ctx
            .output
            .write(&ScoreDisplay::from_record(report_id, record)),
        Err(e) if e.is_not_found() => {
            ctx.output
                .info(&format!("You have not scored {} yet", report_id));
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

async fn mine(ctx: &Context) -> Result<()> {
    let client = ctx.create_client()?;

    let spinner = ctx.output.spinner("Fetching scores...");
    let response = client.scoring().mine().await;
    finish(spinner);

    let scores: Vec<ScoreDisplay> = response?.into_iter().map(Into::into).collect();
    ctx.output
        .write_list(&scores, &["Report", "Score", "Comments"])
}
