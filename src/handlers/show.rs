//! Show command handler

use anyhow::Result;
use colored::Colorize;

use crate::codec::SnapshotStore;

/// Print the originals recorded in the current export
pub fn handle_show() -> Result<()> {
    let store = SnapshotStore::default_location()?;
    let snapshot = store.load()?;

    println!(
        "{} {} ({} originals)",
        "Export:".bold(),
        store.path().display(),
        snapshot.len()
    );

    for (name, record) in snapshot.iter() {
        println!(
            "  {} {} groups, {} properties{}",
            format!("{name}:").cyan(),
            record.group_order.len(),
            record.custom_properties.len(),
            if record.custom_properties.metadata.is_some() {
                ", metadata"
            } else {
                ""
            }
        );
        if !record.group_order.is_empty() {
            println!("      {}", record.group_order.join(" > ").dimmed());
        }
    }

    Ok(())
}
