//! File commands

use anyhow::{Context as _, Result};
use clap::{Args, Subcommand};
use comfy_table::Cell;
use report_scoring_sdk::{FileEntry, UploadedFile};
use serde::Serialize;
use std::path::PathBuf;

use crate::context::Context;
use crate::output::{
    finish, format_bytes, print_field, print_optional_field, print_section, OutputFormat,
    TableDisplay,
};

/// File management commands
#[derive(Debug, Args)]
pub struct FilesCommands {
    #[command(subcommand)]
    pub command: FilesSubcommand,
}

#[derive(Debug, Subcommand)]
pub enum FilesSubcommand {
    /// Upload one or more files
    Upload {
        /// Files to upload
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },

    /// List uploaded files
    List,

    /// Print the preview URL of a stored file
    Preview {
        /// Stored file name
        filename: String,
    },

    /// Delete an uploaded file
    Delete {
        /// File uid as shown by `files list`
        uid: String,

        /// Force deletion without confirmation
        #[arg(short, long)]
        force: bool,
    },

    /// Download a stored file
    Download {
        /// Stored file name
        filename: String,

        /// Destination path [default: the file name]
        #[arg(short = 'O', long = "out")]
        out: Option<PathBuf>,
    },
}

/// Execute file commands
pub async fn execute(ctx: &Context, cmd: FilesCommands) -> Result<()> {
    match cmd.command {
        FilesSubcommand::Upload { paths } => upload(ctx, paths).await,
        FilesSubcommand::List => list(ctx).await,
        FilesSubcommand::Preview { filename } => preview(ctx, &filename),
        FilesSubcommand::Delete { uid, force } => delete(ctx, &uid, force).await,
        FilesSubcommand::Download { filename, out } => download(ctx, &filename, out).await,
    }
}

/// Displayable file entry
#[derive(Debug, Serialize)]
struct FileDisplay {
    uid: String,
    filename: String,
    original_name: String,
    size: u64,
    content_type: String,
    upload_time: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<String>,
}

impl From<FileEntry> for FileDisplay {
    fn from(f: FileEntry) -> Self {
        Self {
            uid: f.uid,
            filename: f.filename,
            original_name: f.original_name,
            size: f.size,
            content_type: f.content_type,
            upload_time: f.upload_time,
            path: None,
        }
    }
}

impl From<UploadedFile> for FileDisplay {
    fn from(f: UploadedFile) -> Self {
        Self {
            uid: f.filename.clone(),
            filename: f.filename,
            original_name: f.original_name,
            size: f.size,
            content_type: f.content_type,
            upload_time: f.upload_time,
            path: f.path,
        }
    }
}

impl TableDisplay for FileDisplay {
    fn to_row(&self) -> Vec<Cell> {
        vec![
            Cell::new(&self.uid),
            Cell::new(&self.original_name),
            Cell::new(format_bytes(self.size)),
            Cell::new(&self.content_type),
            Cell::new(&self.upload_time),
        ]
    }

    fn display_single(&self) {
        print_section("File");
        print_field("Stored as", &self.filename);
        print_field("Original name", &self.original_name);
        print_field("Size", &format_bytes(self.size));
        print_field("Type", &self.content_type);
        print_field("Uploaded", &self.upload_time);
        print_optional_field("Path", self.path.as_deref());
    }

    fn display_compact(&self) {
        println!(
            "{}\t{}\t{}\t{}",
            self.uid, self.original_name, self.size, self.content_type
        );
    }
}

async fn upload(ctx: &Context, paths: Vec<PathBuf>) -> Result<()> {
    let client = ctx.create_client()?;
    let settings = report_scoring_core::Settings::global();

    for path in &paths {
        let name = path.file_name().and_then(|n| n.to_str()).unwrap_or_default();
        if !settings.is_supported_image(name) {
            tracing::warn!(file = %path.display(), "Not a supported image format, no preview");
        }
    }

    let progress = if paths.len() > 1 {
        ctx.output.progress_bar(paths.len() as u64, "Uploading")
    } else {
        ctx.output.spinner("Uploading file...")
    };

    let mut uploaded = Vec::with_capacity(paths.len());
    for path in &paths {
        let file = client
            .files()
            .upload(path)
            .await
            .with_context(|| format!("Failed to upload {}", path.display()))?;
        if let Some(pb) = &progress {
            pb.inc(1);
        }
        uploaded.push(FileDisplay::from(file));
    }
    finish(progress);

    if let [single] = uploaded.as_slice() {
        ctx.output.success(&format!("Uploaded {}", single.original_name));
        ctx.output.write(single)?;
    } else {
        ctx.output.success(&format!("Uploaded {} files", uploaded.len()));
        ctx.output
            .write_list(&uploaded, &["Stored as", "Name", "Size", "Type", "Uploaded"])?;
    }

    Ok(())
}

async fn list(ctx: &Context) -> Result<()> {
    let client = ctx.create_client()?;

    let spinner = ctx.output.spinner("Fetching files...");
    let response = client.files().list().await;
    finish(spinner);

    let files: Vec<FileDisplay> = response?.into_iter().map(Into::into).collect();
    ctx.output
        .write_list(&files, &["UID", "Name", "Size", "Type", "Uploaded"])
}

fn preview(ctx: &Context, filename: &str) -> Result<()> {
    let client = ctx.create_client()?;
    let url = client.files().preview_url(filename);

    match ctx.output_format() {
        OutputFormat::Json | OutputFormat::Yaml => ctx
            .output
            .write_json(&serde_json::json!({ "filename": filename, "url": url })),
        OutputFormat::Table | OutputFormat::Compact => {
            println!("{}", url);
            Ok(())
        }
    }
}

async fn delete(ctx: &Context, uid: &str, force: bool) -> Result<()> {
    if !force {
        let confirm = dialoguer::Confirm::new()
            .with_prompt(format!("Delete file {}?", uid))
            .default(false)
            .interact()
            .context("Failed to get confirmation")?;

        if !confirm {
            ctx.output.info("Cancelled");
            return Ok(());
        }
    }

    let client = ctx.create_client()?;

    let spinner = ctx.output.spinner("Deleting file...");
    let response = client.files().delete(uid).await;
    finish(spinner);

    ctx.output.success(&response?.message);
    Ok(())
}

async fn download(ctx: &Context, filename: &str, out: Option<PathBuf>) -> Result<()> {
    let client = ctx.create_client()?;
    let dest = out.unwrap_or_else(|| PathBuf::from(filename));

    let spinner = ctx.output.spinner("Downloading file...");
    let response = client.files().download(filename).await;
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
