//! Export command handler

use anyhow::Result;
use colored::Colorize;
use std::path::Path;

use crate::batch::{check_export, export_originals};
use crate::codec::SnapshotStore;
use crate::logger::log_to_file;
use crate::scene::SceneDocument;
use crate::settings::Settings;

/// Handle the export command: record the selected originals
pub fn handle_export(scene_path: &Path, select: &[String], assume_yes: bool) -> Result<()> {
    let settings = Settings::load()?;
    let scene = SceneDocument::from_file(scene_path)?;
    let selection = scene.selection(select, settings.mesh_only)?;
    let store = SnapshotStore::default_location()?;

    let names: Vec<&str> = selection.iter().map(|o| o.name.as_str()).collect();
    if let Err(blocked) = check_export(&names) {
        println!("{} {}", "Export blocked:".red().bold(), blocked);
        return Err(blocked.into());
    }

    println!(
        "{} {} objects...",
        "Exporting".cyan(),
        selection.len()
    );

    if store.exists()
        && settings.confirm_overwrite
        && !assume_yes
        && !super::confirm_overwrite(
            "the existing export",
            "Originals not in this selection will be dropped from the export",
        )?
    {
        println!("\n{}", "Export cancelled.".yellow());
        return Ok(());
    }

    let report = export_originals(&selection, &store)?;
    report.print_summary();
    log_to_file(&report.status_line())?;

    Ok(())
}
