use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::ConfigManager;
use crate::error::PreconditionError;
use crate::host::LiveEntity;
use crate::model::{EntityRecord, Snapshot};

/// Indentation used for the snapshot file so diffs stay readable
const INDENT: &[u8] = b"    ";

/// Build the record for one original object.
///
/// Weights are copied per group in host order; only member vertices appear.
/// The metadata sidecar comes along as part of the property store.
pub fn capture_record<E: LiveEntity + ?Sized>(entity: &E) -> EntityRecord {
    let group_order = entity.group_names();
    let groups = group_order
        .iter()
        .map(|name| (name.clone(), entity.group_weights(name)))
        .collect();

    EntityRecord {
        transform: entity.transform(),
        group_order,
        groups,
        custom_properties: entity.properties().clone(),
    }
}

/// Serialize a snapshot as pretty JSON with four-space indentation
pub fn to_pretty_json(snapshot: &Snapshot) -> Result<String> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(INDENT);
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    snapshot
        .serialize(&mut serializer)
        .context("Failed to serialize snapshot")?;
    String::from_utf8(buf).context("Snapshot JSON was not valid UTF-8")
}

/// Durable home of the snapshot
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        SnapshotStore { path: path.into() }
    }

    /// The fixed per-user location under the config directory
    pub fn default_location() -> Result<Self> {
        Ok(Self::new(ConfigManager::snapshot_file_path()?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Load and validate every record.
    ///
    /// A missing file is reported as [`PreconditionError::SnapshotMissing`].
    pub fn load(&self) -> Result<Snapshot> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(PreconditionError::SnapshotMissing {
                    path: self.path.clone(),
                }
                .into());
            }
            Err(e) => {
                return Err(e).with_context(|| {
                    format!("Failed to read snapshot: {}", self.path.display())
                });
            }
        };

        let snapshot: Snapshot = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse snapshot: {}", self.path.display()))?;

        for (name, record) in snapshot.iter() {
            record
                .validate()
                .with_context(|| format!("Invalid snapshot entry for {}", name))?;
        }

        log::debug!(
            "Loaded {} records from {}",
            snapshot.len(),
            self.path.display()
        );

        Ok(snapshot)
    }

    /// Replace the stored snapshot wholesale
    pub fn save(&self, snapshot: &Snapshot) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let content = to_pretty_json(snapshot)?;
        fs::write(&self.path, content)
            .with_context(|| format!("Failed to write snapshot: {}", self.path.display()))?;

        log::debug!("Wrote {} records to {}", snapshot.len(), self.path.display());

        Ok(())
    }
}
