use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;
use std::fs;
use std::path::Path;

use crate::engine::SyncChanges;

/// One exported original
#[derive(Debug, Clone, Serialize)]
pub struct ExportedEntity {
    pub name: String,
    pub groups: usize,
    pub properties: usize,
}

/// Result of an export run
#[derive(Debug, Serialize)]
pub struct ExportReport {
    /// RFC 3339 time the snapshot was written
    pub timestamp: String,
    pub snapshot_path: String,
    pub exported: Vec<ExportedEntity>,
}

impl ExportReport {
    pub fn status_line(&self) -> String {
        match self.exported.len() {
            1 => "Original data exported (1 object)".to_string(),
            n => format!("Original data exported ({n} objects)"),
        }
    }

    pub fn print_summary(&self) {
        println!("{}", self.status_line().green().bold());
        for entity in &self.exported {
            println!(
                "  {} {} ({} groups, {} properties)",
                "✓".green(),
                entity.name.bold(),
                entity.groups,
                entity.properties
            );
        }
        println!("  {}: {}", "Snapshot".cyan(), self.snapshot_path);
    }
}

/// What happened to one duplicate during a sync
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum EntityOutcome {
    Synced {
        name: String,
        original: String,
        changes: SyncChanges,
    },
    /// The snapshot had no record for `original`; the object was not touched
    Skipped { name: String, original: String },
}

impl EntityOutcome {
    pub fn name(&self) -> &str {
        match self {
            EntityOutcome::Synced { name, .. } | EntityOutcome::Skipped { name, .. } => name,
        }
    }

    pub fn is_synced(&self) -> bool {
        matches!(self, EntityOutcome::Synced { .. })
    }
}

/// Result of a sync run
#[derive(Debug, Serialize)]
pub struct SyncReport {
    pub timestamp: String,
    pub snapshot_path: String,
    pub outcomes: Vec<EntityOutcome>,
}

impl SyncReport {
    pub fn synced_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_synced()).count()
    }

    pub fn skipped_count(&self) -> usize {
        self.outcomes.len() - self.synced_count()
    }

    /// User-facing warning per skipped object
    pub fn warnings(&self) -> Vec<String> {
        self.outcomes
            .iter()
            .filter(|o| !o.is_synced())
            .map(|o| format!("Original not found for {}", o.name()))
            .collect()
    }

    pub fn status_line(&self) -> String {
        let synced = self.synced_count();
        let skipped = self.skipped_count();
        if skipped == 0 {
            format!("Duplicates synced successfully ({synced} synced)")
        } else {
            format!("Synced {synced} duplicates, {skipped} skipped")
        }
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize sync report")
    }

    /// Write the markdown rendering to `path`
    pub fn write_markdown(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
            }
        }
        fs::write(path, self.to_markdown())
            .with_context(|| format!("Failed to write report: {}", path.display()))
    }

    pub fn to_markdown(&self) -> String {
        let mut md = String::new();

        md.push_str("# Sync Report\n\n");
        md.push_str(&format!("**Generated:** {}\n\n", self.timestamp));
        md.push_str(&format!("**Snapshot:** `{}`\n\n", self.snapshot_path));
        md.push_str(&format!("{}\n\n", self.status_line()));

        if self.outcomes.is_empty() {
            return md;
        }

        md.push_str("| Object | Original | Result | Groups removed | Swaps | Properties removed |\n");
        md.push_str("|---|---|---|---|---|---|\n");
        for outcome in &self.outcomes {
            match outcome {
                EntityOutcome::Synced {
                    name,
                    original,
                    changes,
                } => md.push_str(&format!(
                    "| {} | {} | synced | {} | {} | {} |\n",
                    name,
                    original,
                    changes.removed_groups.len(),
                    changes.swaps,
                    changes.removed_properties.len()
                )),
                EntityOutcome::Skipped { name, original } => md.push_str(&format!(
                    "| {} | {} | skipped (no original) | - | - | - |\n",
                    name, original
                )),
            }
        }

        md
    }

    pub fn print_summary(&self, dry_run: bool) {
        if dry_run {
            println!("{}", "Dry run: no files were written".yellow());
        }

        for outcome in &self.outcomes {
            match outcome {
                EntityOutcome::Synced { name, changes, .. } => {
                    println!("  {} {}", "✓".green(), name.bold());
                    if !changes.removed_groups.is_empty() {
                        println!(
                            "      removed groups: {}",
                            changes.removed_groups.join(", ").dimmed()
                        );
                    }
                    if changes.swaps > 0 {
                        println!("      reordered with {} moves", changes.swaps);
                    }
                    if !changes.removed_properties.is_empty() {
                        println!(
                            "      removed properties: {}",
                            changes.removed_properties.join(", ").dimmed()
                        );
                    }
                }
                EntityOutcome::Skipped { .. } => {}
            }
        }

        for warning in self.warnings() {
            println!("  {} {}", "!".yellow(), warning.yellow());
        }

        let line = self.status_line();
        if self.skipped_count() == 0 {
            println!("{}", line.green().bold());
        } else {
            println!("{}", line.yellow().bold());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report() -> SyncReport {
        SyncReport {
            timestamp: "2026-01-01T00:00:00+00:00".to_string(),
            snapshot_path: "/tmp/dump.json".to_string(),
            outcomes: vec![
                EntityOutcome::Synced {
                    name: "Arm.001".into(),
                    original: "Arm".into(),
                    changes: SyncChanges {
                        removed_groups: vec!["Extra".into()],
                        swaps: 2,
                        ..Default::default()
                    },
                },
                EntityOutcome::Skipped {
                    name: "Leg.002".into(),
                    original: "Leg".into(),
                },
            ],
        }
    }

    #[test]
    fn test_counts_and_status() {
        let report = report();
        assert_eq!(report.synced_count(), 1);
        assert_eq!(report.skipped_count(), 1);
        assert_eq!(report.status_line(), "Synced 1 duplicates, 1 skipped");
        assert_eq!(report.warnings(), vec!["Original not found for Leg.002"]);
    }

    #[test]
    fn test_markdown_lists_outcomes() {
        let md = report().to_markdown();
        assert!(md.contains("# Sync Report"));
        assert!(md.contains("| Arm.001 | Arm | synced | 1 | 2 | 0 |"));
        assert!(md.contains("| Leg.002 | Leg | skipped (no original)"));
    }

    #[test]
    fn test_write_markdown_creates_file() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("reports").join("sync.md");

        report().write_markdown(&path).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert_eq!(written, report().to_markdown());
    }

    #[test]
    fn test_json_tags_status() {
        let json: serde_json::Value = serde_json::from_str(&report().to_json().unwrap()).unwrap();
        assert_eq!(json["outcomes"][0]["status"], "synced");
        assert_eq!(json["outcomes"][1]["status"], "skipped");
    }

    #[test]
    fn test_export_status_line() {
        let report = ExportReport {
            timestamp: String::new(),
            snapshot_path: String::new(),
            exported: vec![ExportedEntity {
                name: "Arm".into(),
                groups: 3,
                properties: 1,
            }],
        };
        assert_eq!(report.status_line(), "Original data exported (1 object)");
    }
}
