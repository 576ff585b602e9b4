//! Report commands

use anyhow::{Context as _, Result};
use clap::{Args, Subcommand, ValueEnum};
use comfy_table::Cell;
use report_scoring_core::Settings;
use report_scoring_sdk::{CaseFile, CaseFiles, ReportQuery, ReportSummary, ScoreData};
use serde::Serialize;
use std::path::PathBuf;

use crate::context::Context;
use crate::output::{
    finish, format_bytes, print_field, print_list_field, print_section, score_badge, TableDisplay,
};

/// Report commands
#[derive(Debug, Args)]
pub struct ReportsCommands {
    #[command(subcommand)]
    pub command: ReportsSubcommand,
}

#[derive(Debug, Subcommand)]
pub enum ReportsSubcommand {
    /// List reports
    List {
        /// Page number, starting at 1
        #[arg(long, default_value = "1")]
        page: u32,

        /// Reports per page [default: from settings]
        #[arg(long)]
        page_size: Option<u32>,

        /// Free-text search
        #[arg(short, long)]
        search: Option<String>,

        /// Time range filter
        #[arg(short, long)]
        time_range: Option<String>,

        /// Report type filter
        #[arg(short = 'T', long = "type")]
        report_type: Option<String>,
    },

    /// Show a report
    Get {
        /// Report ID
        id: String,
    },

    /// Submit rubric scores for a report
    Score {
        /// Report ID
        id: String,

        /// Completeness score
        #[arg(long)]
        completeness: f64,

        /// Accuracy score
        #[arg(long)]
        accuracy: f64,

        /// Professionalism score
        #[arg(long)]
        professionalism: f64,

        /// Free-text comment
        #[arg(short, long, default_value = "")]
        comment: String,
    },

    /// Download a report
    Download {
        /// Report ID
        id: String,

        /// Destination path [default: <id>.pdf]
        #[arg(short = 'O', long = "out")]
        out: Option<PathBuf>,
    },

    /// List the evidence files of a report
    Files {
        /// Report ID
        id: String,
    },

    /// Fetch one evidence file of a report
    File {
        /// Report ID
        id: String,

        /// Evidence folder
        #[arg(value_enum)]
        folder: EvidenceFolder,

        /// File name as listed by `reports files`
        filename: String,

        /// Destination path [default: print records, save images as <filename>]
        #[arg(short = 'O', long = "out")]
        out: Option<PathBuf>,
    },

    /// Show the generated report document
    Document {
        /// Report ID
        id: String,
    },

    /// Save the knowledge graph of a report as an HTML document
    Graph {
        /// Report ID
        id: String,

        /// Destination path [default: <id>-graph.html]
        #[arg(short = 'O', long = "out")]
        out: Option<PathBuf>,
    },
}

/// Evidence folders served per report
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum EvidenceFolder {
    /// Scene images
    Pics,
    /// JSON records
    Records,
}

impl EvidenceFolder {
    fn as_str(self) -> &'static str {
        match self {
            Self::Pics => "pics",
            Self::Records => "records",
        }
    }
}

/// Execute report commands
pub async fn execute(ctx: &Context, cmd: ReportsCommands) -> Result<()> {
    match cmd.command {
        ReportsSubcommand::List {
            page,
            page_size,
            search,
            time_range,
            report_type,
        } => {
            let mut query = ReportQuery::new(
                page,
                page_size.unwrap_or(Settings::global().default_page_size),
            );
            if let Some(s) = search {
                query = query.with_search_query(s);
            }
            if let Some(t) = time_range {
                query = query.with_time_range(t);
            }
            if let Some(t) = report_type {
                query = query.with_report_type(t);
            }
            list(ctx, &query).await
        }
        ReportsSubcommand::Get { id } => get(ctx, &id).await,
        ReportsSubcommand::Score {
            id,
            completeness,
            accuracy,
            professionalism,
            comment,
        } => {
            let score = ScoreData::new(id, completeness, accuracy, professionalism)
                .with_comment(comment);
            submit_score(ctx, &score).await
        }
        ReportsSubcommand::Download { id, out } => {
            let dest = out.unwrap_or_else(|| PathBuf::from(format!("{}.pdf", id)));
            download(ctx, &id, dest).await
        }
        ReportsSubcommand::Files { id } => files(ctx, &id).await,
        ReportsSubcommand::File {
            id,
            folder,
            filename,
            out,
        } => file(ctx, &id, folder, &filename, out).await,
        ReportsSubcommand::Document { id } => document(ctx, &id).await,
        ReportsSubcommand::Graph { id, out } => {
            let dest = out.unwrap_or_else(|| PathBuf::from(format!("{}-graph.html", id)));
            graph(ctx, &id, dest).await
        }
    }
}

/// Displayable report list entry
#[derive(Debug, Serialize)]
struct ReportDisplay {
    id: String,
    name: String,
}

impl From<ReportSummary> for ReportDisplay {
    fn from(r: ReportSummary) -> Self {
        Self {
            id: r.id,
            name: r.name,
        }
    }
}

impl TableDisplay for ReportDisplay {
    fn to_row(&self) -> Vec<Cell> {
        vec![Cell::new(&self.id), Cell::new(&self.name)]
    }

    fn display_single(&self) {
        print_section("Report");
        print_field("ID", &self.id);
        print_field("Name", &self.name);
    }

    fn display_compact(&self) {
        println!("{}\t{}", self.id, self.name);
    }
}

/// Displayable evidence listing
#[derive(Debug, Serialize)]
struct CaseFilesDisplay {
    report_id: String,
    #[serde(flatten)]
    files: CaseFiles,
}

impl TableDisplay for CaseFilesDisplay {
    fn to_row(&self) -> Vec<Cell> {
        vec![
            Cell::new(&self.report_id),
            Cell::new(self.files.pics.len()),
            Cell::new(self.files.records.len()),
        ]
    }

    fn display_single(&self) {
        print_section(&format!("Evidence for {}", self.report_id));
        print_list_field("Images", &self.files.pics);
        print_list_field("Records", &self.files.records);
    }

    fn display_compact(&self) {
        for name in self.files.pics.iter().chain(&self.files.records) {
            println!("{}\t{}", self.report_id, name);
        }
    }
}

async fn list(ctx: &Context, query: &ReportQuery) -> Result<()> {
    let client = ctx.create_client()?;

    let spinner = ctx.output.spinner("Fetching reports...");
    let response = client.reports().list(query).await;
    finish(spinner);

    let reports: Vec<ReportDisplay> = response?.into_iter().map(Into::into).collect();
    let count = reports.len();
    ctx.output.write_list(&reports, &["ID", "Name"])?;

    if count as u32 == query.page_size {
        ctx.output.info(&format!(
            "Showing page {}. Use --page {} for more.",
            query.page,
            query.page.saturating_add(1)
        ));
    }

    Ok(())
}

async fn get(ctx: &Context, id: &str) -> Result<()> {
    let client = ctx.create_client()?;

    let spinner = ctx.output.spinner("Fetching report...");
    let report = client.reports().get(id).await;
    finish(spinner);

    ctx.output.write_json(&report?)
}

async fn submit_score(ctx: &Context, score: &ScoreData) -> Result<()> {
    let client = ctx.create_client()?;

    let spinner = ctx.output.spinner("Submitting score...");
    let response = client.reports().submit_score(score).await;
    finish(spinner);

    let response = response?;
    ctx.output.success(&format!(
        "Scored {} (average {})",
        score.report_id,
        score_badge(score.average())
    ));
    if !response.is_null() {
        ctx.output.write_json(&response)?;
    }
    Ok(())
}

async fn download(ctx: &Context, id: &str, dest: PathBuf) -> Result<()> {
    let client = ctx.create_client()?;

    let spinner = ctx.output.spinner("Downloading report...");
    let written = client.reports().download_to(id, &dest).await;
    finish(spinner);

    let written = written.with_context(|| format!("Failed to download report {}", id))?;
    ctx.output.success(&format!(
        "Saved {} ({})",
        dest.display(),
        format_bytes(written)
    ));
    Ok(())
}

async fn files(ctx: &Context, id: &str) -> Result<()> {
    let client = ctx.create_client()?;

    let spinner = ctx.output.spinner("Fetching evidence...");
    let response = client.reports().files(id).await;
    finish(spinner);

    ctx.output.write(&CaseFilesDisplay {
        report_id: id.to_string(),
        files: response?,
    })
}

async fn file(
    ctx: &Context,
    id: &str,
    folder: EvidenceFolder,
    filename: &str,
    out: Option<PathBuf>,
) -> Result<()> {
    let client = ctx.create_client()?;

    let spinner = ctx.output.spinner("Fetching evidence file...");
    let response = client.reports().file(id, folder.as_str(), filename).await;
    finish(spinner);

    let content = response?;
    let dest = match (&content, out) {
        (CaseFile::Record(value), None) => return ctx.output.write_json(value),
        (_, Some(dest)) => dest,
        (CaseFile::Binary(_), None) => default_file_dest(filename),
    };

    let bytes = content.into_bytes()?;
    tokio::fs::write(&dest, &bytes)
        .await
        .with_context(|| format!("Failed to write {}", dest.display()))?;
    ctx.output.success(&format!(
        "Saved {} ({})",
        dest.display(),
        format_bytes(bytes.len() as u64)
    ));
    Ok(())
}

/// Local file name for a served evidence file, without directory parts
fn default_file_dest(filename: &str) -> PathBuf {
    let name = std::path::Path::new(filename)
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "evidence".into());
    PathBuf::from(name)
}

async fn document(ctx: &Context, id: &str) -> Result<()> {
    let client = ctx.create_client()?;

    let spinner = ctx.output.spinner("Fetching document...");
    let response = client.reports().document(id).await;
    finish(spinner);

    ctx.output.write_json(&response?)
}

async fn graph(ctx: &Context, id: &str, dest: PathBuf) -> Result<()> {
    let client = ctx.create_client()?;

    let spinner = ctx.output.spinner("Fetching graph...");
    let response = client.reports().graph(id).await;
    finish(spinner);

    let bytes = response?;
    tokio::fs::write(&dest, &bytes)
        .await
        .with_context(|| format!("Failed to write {}", dest.display()))?;
    ctx.output.success(&format!(
        "Saved {} ({})",
        dest.display(),
        format_bytes(bytes.len() as u64)
    ));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_file_dest_strips_directories() {
        assert_eq!(default_file_dest("scene.jpg"), PathBuf::from("scene.jpg"));
        assert_eq!(default_file_dest("../../etc/x.jpg"), PathBuf::from("x.jpg"));
        assert_eq!(default_file_dest(".."), PathBuf::from("evidence"));
    }

    #[test]
    fn test_evidence_folder_names() {
        assert_eq!(EvidenceFolder::Pics.as_str(), "pics");
        assert_eq!(EvidenceFolder::Records.as_str(), "records");
    }
}
