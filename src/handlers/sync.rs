//! Sync command handler

use anyhow::Result;
use colored::Colorize;
use std::path::Path;

use crate::batch::{check_sync, sync_duplicates};
use crate::codec::SnapshotStore;
use crate::logger::log_to_file;
use crate::scene::SceneDocument;
use crate::settings::Settings;

/// Options for the sync command
#[derive(Debug, Default)]
pub struct SyncOptions<'a> {
    /// Where to write the synced scene; defaults to the input scene file
    pub output: Option<&'a Path>,
    pub dry_run: bool,
    pub json: bool,
    /// Also write a markdown report here
    pub markdown: Option<&'a Path>,
    pub assume_yes: bool,
}

/// Handle the sync command: reconcile selected duplicates and save the scene
pub fn handle_sync(scene_path: &Path, select: &[String], options: SyncOptions<'_>) -> Result<()> {
    let settings = Settings::load()?;
    let mut scene = SceneDocument::from_file(scene_path)?;
    let store = SnapshotStore::default_location()?;

    let mut selection = scene.selection_mut(select, settings.mesh_only)?;

    let names: Vec<String> = selection.iter().map(|o| o.name.clone()).collect();
    if let Err(blocked) = check_sync(&names, &store) {
        if !options.json {
            println!("{} {}", "Sync blocked:".red().bold(), blocked);
        }
        return Err(blocked.into());
    }

    let report = sync_duplicates(&mut selection, &store)?;

    if options.json {
        println!("{}", report.to_json()?);
    } else {
        println!("{}", "Syncing duplicates...".cyan().bold());
        report.print_summary(options.dry_run);
    }

    if let Some(path) = options.markdown {
        report.write_markdown(path)?;
        if !options.json {
            println!("  {}: {}", "Report written".cyan(), path.display());
        }
    }

    if options.dry_run || report.synced_count() == 0 {
        return Ok(());
    }

    let target = options.output.unwrap_or(scene_path);
    if target.exists()
        && settings.confirm_overwrite
        && !options.assume_yes
        && !options.json
        && !super::confirm_overwrite(
            &format!("{}", target.display()),
            "The synced objects will replace their previous state in this file",
        )?
    {
        println!("\n{}", "Scene not written.".yellow());
        return Ok(());
    }

    scene.write_to_file(target)?;
    log_to_file(&report.status_line())?;

    if !options.json {
        println!("  {}: {}", "Scene written".cyan(), target.display());
    }

    Ok(())
}
