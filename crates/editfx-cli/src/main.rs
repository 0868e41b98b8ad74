//! EditFX curation tool binary.

mod commands;
mod config;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use editfx_review::TerminalPort;

use crate::commands::ReviewOptions;
use crate::config::CurateConfig;

#[derive(Parser, Debug)]
#[command(name = "editfx", version, about = "Audit and reconcile video edit annotations")]
struct Cli {
    /// Video category used to derive default paths
    #[arg(long, global = true, env = "VIDEO_CATEGORY")]
    genre: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compare structured predictions with narrative markers
    Check {
        #[arg(long)]
        dataset: Option<PathBuf>,
    },
    /// Flag implausible field combinations and write the anomaly report
    Anomalies {
        #[arg(long)]
        dataset: Option<PathBuf>,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Interactively reconcile flagged records
    Review(ReviewArgs),
    /// Print the JSON Schema of the annotation object
    Schema,
    /// Drop rows with a repeated video id, keeping the first
    Dedupe {
        #[arg(long)]
        dataset: Option<PathBuf>,
        /// Write here instead of replacing the dataset
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Drop rows without any visual edit effect
    Prune {
        #[arg(long)]
        dataset: Option<PathBuf>,
        #[arg(long)]
        media_dir: Option<PathBuf>,
        #[arg(long)]
        backup_dir: Option<PathBuf>,
        /// Also delete media files of removed rows
        #[arg(long)]
        delete_media: bool,
    },
}

#[derive(Args, Debug)]
struct ReviewArgs {
    /// Dataset to reconcile
    #[arg(long)]
    dataset: Option<PathBuf>,
    /// Anomaly report listing the records to review
    #[arg(long)]
    anomalies: Option<PathBuf>,
    /// Folder containing the videos
    #[arg(long)]
    media_dir: Option<PathBuf>,
    /// Output CSV path (ignored with --inplace)
    #[arg(long, default_value = "updated_videos.csv")]
    out: PathBuf,
    /// Write updates back into the dataset
    #[arg(long)]
    inplace: bool,
    /// Change log path
    #[arg(long)]
    log: Option<PathBuf>,
    #[arg(long)]
    backup_dir: Option<PathBuf>,
    /// Do not launch the external video viewer
    #[arg(long)]
    no_open: bool,
}

fn init_tracing() {
    // Colored output for interactive use, JSON when requested
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("editfx=info"));

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_ansi(true)
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false),
            )
            .with(env_filter)
            .init();
    }
}

fn required(path: Option<PathBuf>, what: &str) -> Result<PathBuf> {
    path.with_context(|| format!("No {} path: set VIDEO_CATEGORY or pass it explicitly", what))
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    let config = CurateConfig::from_env().with_genre(cli.genre);
    info!(genre = ?config.genre, "Starting editfx");

    let mut stdout = std::io::stdout();

    match cli.command {
        Command::Check { dataset } => {
            let dataset = required(dataset.or_else(|| config.dataset_path()), "dataset")?;
            commands::check(&dataset, &mut stdout)?;
        }
        Command::Anomalies { dataset, out } => {
            let dataset = required(dataset.or_else(|| config.dataset_path()), "dataset")?;
            let out = required(out.or_else(|| config.anomalies_path()), "anomaly report")?;
            let (total, flagged) = commands::anomalies(&dataset, &out)?;
            println!("Total rows: {}, flagged: {}", total, flagged);
            println!("Saved anomalies: {}", out.display());
        }
        Command::Review(args) => {
            let dataset = required(args.dataset.or_else(|| config.dataset_path()), "dataset")?;
            let anomalies =
                required(args.anomalies.or_else(|| config.anomalies_path()), "anomaly report")?;
            let output = if args.inplace { dataset.clone() } else { args.out };
            let options = ReviewOptions {
                dataset,
                anomalies,
                media_dir: args.media_dir.or_else(|| config.media_dir()),
                output,
                change_log: args.log.unwrap_or_else(|| config.change_log.clone()),
                backup_dir: args.backup_dir.or_else(|| config.backup_dir()),
            };

            let port = TerminalPort::stdio(config.open_media && !args.no_open);
            let summary = commands::review(&options, port)?;
            println!(
                "Review finished: {} reconciled ({} changed), {} skipped, {} not found, {} failed{}",
                summary.reconciled,
                summary.changed,
                summary.skipped,
                summary.not_found,
                summary.failed,
                if summary.quit { ", quit early" } else { "" }
            );
            if summary.changed > 0 {
                println!("Appended change log: {}", options.change_log.display());
            }
        }
        Command::Schema => commands::schema(&mut stdout)?,
        Command::Dedupe { dataset, out } => {
            let dataset = required(dataset.or_else(|| config.dataset_path()), "dataset")?;
            let out = out.unwrap_or_else(|| dataset.clone());
            let removed = commands::dedupe(&dataset, &out, config.backup_dir().as_deref())?;
            println!("Removed duplicates: {} rows. Saved {}", removed, out.display());
        }
        Command::Prune {
            dataset,
            media_dir,
            backup_dir,
            delete_media,
        } => {
            let dataset = required(dataset.or_else(|| config.dataset_path()), "dataset")?;
            let media_dir = media_dir.or_else(|| config.media_dir());
            let backup_dir = backup_dir.or_else(|| config.backup_dir());
            let summary = commands::prune(
                &dataset,
                backup_dir.as_deref(),
                media_dir.as_deref(),
                delete_media,
            )?;
            println!(
                "Filtered CSV saved: kept {} rows, removed {} rows.",
                summary.kept, summary.removed
            );
            if let Some(media) = summary.media {
                println!(
                    "Video cleanup complete: deleted {} files, kept {} files.",
                    media.deleted, media.kept
                );
            }
        }
    }

    Ok(())
}
