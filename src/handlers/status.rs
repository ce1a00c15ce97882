//! Status command handler
//!
//! Mirrors the side panel: shows the selection and whether each operation
//! is available, naming the reason when it is not.

use anyhow::Result;
use colored::Colorize;
use std::path::Path;

use crate::batch::{check_export, check_sync};
use crate::codec::SnapshotStore;
use crate::error::PreconditionError;
use crate::naming::is_duplicate;
use crate::scene::SceneDocument;
use crate::settings::Settings;

/// One panel section
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelSection {
    pub title: &'static str,
    pub lines: Vec<String>,
    pub alerts: Vec<String>,
    pub enabled: bool,
}

/// Build both panel sections for the given selection
pub fn panel_sections(names: &[String], store: &SnapshotStore) -> [PanelSection; 2] {
    let count_line = if names.is_empty() {
        "No mesh objects selected".to_string()
    } else {
        format!("Selected objects: {}", names.len())
    };

    let mut export_alerts = Vec::new();
    if names.iter().any(|n| is_duplicate(n)) {
        export_alerts.push("Duplicates detected! Export blocked.".to_string());
    }

    let mut sync_alerts = Vec::new();
    if !names.is_empty() {
        if names.iter().any(|n| !is_duplicate(n)) {
            sync_alerts.push("Original objects detected! Sync blocked.".to_string());
        }
        if !store.exists() {
            sync_alerts.push("Export file not found!".to_string());
        }
    }

    [
        PanelSection {
            title: "Export Originals",
            lines: vec![count_line.clone()],
            alerts: export_alerts,
            enabled: check_export(names).is_ok(),
        },
        PanelSection {
            title: "Sync Duplicates",
            lines: vec![count_line],
            alerts: sync_alerts,
            enabled: check_sync(names, store).is_ok(),
        },
    ]
}

/// Handle the status command
pub fn handle_status(scene_path: &Path, select: &[String]) -> Result<()> {
    let settings = Settings::load()?;
    let scene = SceneDocument::from_file(scene_path)?;
    let selection = scene.selection(select, settings.mesh_only)?;
    let store = SnapshotStore::default_location()?;

    let names: Vec<String> = selection.iter().map(|o| o.name.clone()).collect();

    for section in panel_sections(&names, &store) {
        println!("{}", section.title.bold().cyan());
        for line in &section.lines {
            println!("  {line}");
        }
        for alert in &section.alerts {
            println!("  {}", alert.red().bold());
        }
        let state = if section.enabled {
            "available".green()
        } else {
            "blocked".red()
        };
        println!("  {}: {}", "Command".dimmed(), state);
        println!();
    }

    if matches!(
        check_sync(&names, &store),
        Err(PreconditionError::SnapshotMissing { .. })
    ) {
        println!(
            "  {} {}",
            "Export path:".dimmed(),
            store.path().display()
        );
    }

    Ok(())
}
