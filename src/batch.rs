use anyhow::{Context, Result};

use crate::codec::{capture_record, SnapshotStore};
use crate::engine::sync_entity;
use crate::error::PreconditionError;
use crate::host::LiveEntity;
use crate::model::Snapshot;
use crate::naming::{canonical_name, is_duplicate};
use crate::report::{EntityOutcome, ExportReport, ExportedEntity, SyncReport};

/// Export is allowed for a non-empty selection of originals only
pub fn check_export<S: AsRef<str>>(names: &[S]) -> Result<(), PreconditionError> {
    if names.is_empty() {
        return Err(PreconditionError::EmptySelection);
    }
    if let Some(name) = names.iter().map(|n| n.as_ref()).find(|n| is_duplicate(n)) {
        return Err(PreconditionError::DuplicateInExport {
            name: name.to_string(),
        });
    }
    Ok(())
}

/// Sync is allowed for a non-empty selection of duplicates, once a snapshot exists
pub fn check_sync<S: AsRef<str>>(names: &[S], store: &SnapshotStore) -> Result<(), PreconditionError> {
    if names.is_empty() {
        return Err(PreconditionError::EmptySelection);
    }
    if let Some(name) = names.iter().map(|n| n.as_ref()).find(|n| !is_duplicate(n)) {
        return Err(PreconditionError::OriginalInSync {
            name: name.to_string(),
        });
    }
    if !store.exists() {
        return Err(PreconditionError::SnapshotMissing {
            path: store.path().to_path_buf(),
        });
    }
    Ok(())
}

/// Record every selected original and replace the stored snapshot with them.
///
/// Nothing is written when a precondition fails. Originals recorded by an
/// earlier export but absent from `selection` are dropped.
pub fn export_originals<E: LiveEntity + ?Sized>(
    selection: &[&E],
    store: &SnapshotStore,
) -> Result<ExportReport> {
    let names: Vec<&str> = selection.iter().map(|e| e.name()).collect();
    check_export(&names)?;

    let mut snapshot = Snapshot::new();
    let mut exported = Vec::with_capacity(selection.len());

    for entity in selection {
        let record = capture_record(*entity);
        record
            .validate()
            .with_context(|| format!("Cannot export {}", entity.name()))?;

        log::debug!(
            "Captured {}: {} groups, {} properties",
            entity.name(),
            record.group_order.len(),
            record.custom_properties.len()
        );

        exported.push(ExportedEntity {
            name: entity.name().to_string(),
            groups: record.group_order.len(),
            properties: record.custom_properties.len(),
        });
        snapshot.insert(entity.name(), record);
    }

    store.save(&snapshot)?;
    log::info!(
        "Exported {} originals to {}",
        snapshot.len(),
        store.path().display()
    );

    Ok(ExportReport {
        timestamp: chrono::Utc::now().to_rfc3339(),
        snapshot_path: store.path().display().to_string(),
        exported,
    })
}

/// Reconcile every selected duplicate against the stored snapshot.
///
/// Preconditions are checked and the snapshot is loaded before any object is
/// touched. A duplicate whose original has no record is skipped with a
/// warning and the rest of the batch carries on.
pub fn sync_duplicates<E: LiveEntity + ?Sized>(
    selection: &mut [&mut E],
    store: &SnapshotStore,
) -> Result<SyncReport> {
    let names: Vec<String> = selection.iter().map(|e| e.name().to_string()).collect();
    check_sync(&names, store)?;

    let snapshot = store.load()?;
    let mut outcomes = Vec::with_capacity(selection.len());

    for entity in selection.iter_mut() {
        let name = entity.name().to_string();
        let original = canonical_name(&name);

        let Some(record) = snapshot.get(&original) else {
            log::warn!("Original not found for {}", name);
            outcomes.push(EntityOutcome::Skipped { name, original });
            continue;
        };

        let changes = sync_entity(&mut **entity, record)
            .with_context(|| format!("Failed to sync {}", name))?;

        log::info!(
            "Synced {} from {}: {} groups removed, {} moves, {} properties removed",
            name,
            original,
            changes.removed_groups.len(),
            changes.swaps,
            changes.removed_properties.len()
        );

        outcomes.push(EntityOutcome::Synced {
            name,
            original,
            changes,
        });
    }

    Ok(SyncReport {
        timestamp: chrono::Utc::now().to_rfc3339(),
        snapshot_path: store.path().display().to_string(),
        outcomes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_check_export() {
        assert_eq!(
            check_export::<&str>(&[]),
            Err(PreconditionError::EmptySelection)
        );
        assert!(check_export(&["Arm", "Leg"]).is_ok());
        assert_eq!(
            check_export(&["Arm", "Leg.001"]),
            Err(PreconditionError::DuplicateInExport {
                name: "Leg.001".into()
            })
        );
    }

    #[test]
    fn test_check_sync() {
        let temp = TempDir::new().unwrap();
        let store = SnapshotStore::new(temp.path().join("dump.json"));

        assert_eq!(
            check_sync(&["Arm.001", "Leg"], &store),
            Err(PreconditionError::OriginalInSync { name: "Leg".into() })
        );
        assert!(matches!(
            check_sync(&["Arm.001"], &store),
            Err(PreconditionError::SnapshotMissing { .. })
        ));

        store.save(&Snapshot::new()).unwrap();
        assert!(check_sync(&["Arm.001"], &store).is_ok());
    }
}
