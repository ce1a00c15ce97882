use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use porting_sync::handlers::{self, sync::SyncOptions};
use porting_sync::{logger, settings};

#[derive(Parser)]
#[command(name = "porting-sync")]
#[command(about = "Export original objects' groups, pivots and properties and sync them onto duplicates", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct SelectionArgs {
    /// Scene document to read objects from
    #[arg(short, long)]
    scene: PathBuf,

    /// Objects to operate on (comma-separated); defaults to the scene's selected objects
    #[arg(long, value_delimiter = ',')]
    select: Vec<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Export vertex groups, weights, pivot, order and custom properties of originals
    Export {
        #[command(flatten)]
        selection: SelectionArgs,

        /// Overwrite the existing export without asking
        #[arg(short, long)]
        yes: bool,
    },

    /// Remove extra groups, match pivot, order and custom properties on duplicates
    Sync {
        #[command(flatten)]
        selection: SelectionArgs,

        /// Write the synced scene here instead of back to --scene
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Report what would change without writing anything
        #[arg(long)]
        dry_run: bool,

        /// Print the sync report as JSON
        #[arg(long)]
        json: bool,

        /// Write a markdown sync report to this file
        #[arg(long, value_name = "PATH")]
        markdown: Option<PathBuf>,

        /// Overwrite the scene file without asking
        #[arg(short, long)]
        yes: bool,
    },

    /// Show which operations the current selection allows
    Status {
        #[command(flatten)]
        selection: SelectionArgs,
    },

    /// List the originals in the current export
    Show,

    /// Configure settings
    Config {
        /// Only consider mesh objects in a selection
        #[arg(long)]
        mesh_only: Option<bool>,

        /// Ask before overwriting files in an interactive terminal
        #[arg(long)]
        confirm_overwrite: Option<bool>,

        /// Show current configuration
        #[arg(long)]
        show: bool,
    },
}

fn main() -> Result<()> {
    logger::init_logger()?;
    logger::rotate_log_if_needed()?;

    let cli = Cli::parse();

    match cli.command {
        Commands::Export { selection, yes } => {
            handlers::handle_export(&selection.scene, &selection.select, yes)?;
        }
        Commands::Sync {
            selection,
            output,
            dry_run,
            json,
            markdown,
            yes,
        } => {
            let options = SyncOptions {
                output: output.as_deref(),
                dry_run,
                json,
                markdown: markdown.as_deref(),
                assume_yes: yes,
            };
            handlers::handle_sync(&selection.scene, &selection.select, options)?;
        }
        Commands::Status { selection } => {
            handlers::handle_status(&selection.scene, &selection.select)?;
        }
        Commands::Show => {
            handlers::handle_show()?;
        }
        Commands::Config {
            mesh_only,
            confirm_overwrite,
            show,
        } => {
            if show || (mesh_only.is_none() && confirm_overwrite.is_none()) {
                settings::show_settings()?;
            } else {
                settings::update_settings(mesh_only, confirm_overwrite)?;
            }
        }
    }

    Ok(())
}
