use anyhow::{bail, Result};
use serde::Serialize;
use std::collections::HashSet;

use crate::host::LiveEntity;
use crate::model::{EntityRecord, PropertyStore};

/// What one sync changed on a duplicate
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SyncChanges {
    pub removed_groups: Vec<String>,
    pub swaps: usize,
    pub removed_properties: Vec<String>,
    pub set_properties: usize,
    pub metadata_replaced: bool,
}

/// Remove every group whose name is not in `record.group_order`.
///
/// Returns the removed names in the order they were found.
pub fn prune_groups<E: LiveEntity + ?Sized>(entity: &mut E, record: &EntityRecord) -> Vec<String> {
    let keep: HashSet<&str> = record.group_order.iter().map(String::as_str).collect();

    let doomed: Vec<String> = entity
        .group_names()
        .into_iter()
        .filter(|name| !keep.contains(name.as_str()))
        .collect();

    for name in &doomed {
        entity.remove_group(name);
    }

    doomed
}

/// Bring the entity's groups into `order` using only adjacent swaps.
///
/// Position `t` is filled by bubbling `order[t]` up one step at a time until
/// it sits at `t`. Positions `0..t` are already final and a group at index
/// `> t` never crosses them, so the placed prefix is never disturbed. Names
/// the entity lacks are skipped and do not consume a position. Groups not
/// named in `order` end up after the placed ones in their previous relative
/// order.
///
/// Returns the number of swaps performed.
pub fn reorder_groups<E: LiveEntity + ?Sized>(entity: &mut E, order: &[String]) -> Result<usize> {
    let mut swaps = 0;
    let mut target = 0;

    for name in order {
        let Some(mut index) = entity.group_index(name) else {
            log::debug!("{}: no group '{}' to place", entity.name(), name);
            continue;
        };

        while index > target {
            if !entity.move_group_up(index) {
                bail!(
                    "Host refused to move group '{}' up from index {} on {}",
                    name,
                    index,
                    entity.name()
                );
            }
            swaps += 1;

            match entity.group_index(name) {
                Some(next) if next < index => index = next,
                _ => bail!(
                    "Group '{}' on {} did not move up from index {}",
                    name,
                    entity.name(),
                    index
                ),
            }
        }

        target += 1;
    }

    Ok(swaps)
}

/// Overwrite the entity's world transform with the recorded one
pub fn restore_transform<E: LiveEntity + ?Sized>(entity: &mut E, record: &EntityRecord) {
    entity.set_transform(record.transform);
}

/// Make `target`'s properties match `source`.
///
/// Keys missing from `source` are deleted, every source value is written. The
/// metadata sidecar is replaced wholesale when `source` has one and left
/// untouched when it does not.
pub fn apply_properties(target: &mut PropertyStore, source: &PropertyStore) -> SyncChanges {
    let mut changes = SyncChanges::default();

    let stale: Vec<String> = target
        .keys()
        .filter(|key| !source.contains_key(key))
        .cloned()
        .collect();
    for key in stale {
        target.remove(&key);
        changes.removed_properties.push(key);
    }

    for (key, value) in source.iter() {
        // Keys coming out of a PropertyStore are never the reserved one
        if target.set(key.clone(), value.clone()).is_ok() {
            changes.set_properties += 1;
        }
    }

    if let Some(metadata) = &source.metadata {
        target.metadata = Some(metadata.clone());
        changes.metadata_replaced = true;
    }

    changes
}

/// Reconcile one duplicate against its original's record.
///
/// Order: prune groups, reorder groups, restore transform, overlay properties.
pub fn sync_entity<E: LiveEntity + ?Sized>(entity: &mut E, record: &EntityRecord) -> Result<SyncChanges> {
    let removed_groups = prune_groups(entity, record);
    let swaps = reorder_groups(entity, &record.group_order)?;
    restore_transform(entity, record);
    let property_changes = apply_properties(entity.properties_mut(), &record.custom_properties);

    Ok(SyncChanges {
        removed_groups,
        swaps,
        ..property_changes
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{MetadataInfo, MetadataOverlay, WeightMap, IDENTITY};
    use crate::scene::SceneObject;
    use serde_json::json;

    fn record(order: &[&str]) -> EntityRecord {
        EntityRecord {
            transform: IDENTITY,
            group_order: order.iter().map(|s| s.to_string()).collect(),
            groups: order
                .iter()
                .map(|s| (s.to_string(), WeightMap::from([(0, 1.0)])))
                .collect(),
            custom_properties: PropertyStore::default(),
        }
    }

    fn order(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_prune_removes_unrecorded_groups() {
        let mut obj = SceneObject::new("Arm.001").with_groups(["Tip", "Extra", "Root"]);
        let removed = prune_groups(&mut obj, &record(&["Root", "Tip"]));

        assert_eq!(removed, vec!["Extra"]);
        assert_eq!(obj.group_names(), vec!["Tip", "Root"]);
    }

    #[test]
    fn test_reorder_reverses() {
        let mut obj = SceneObject::new("A.001").with_groups(["D", "C", "B", "A"]);
        let swaps = reorder_groups(&mut obj, &order(&["A", "B", "C", "D"])).unwrap();

        assert_eq!(obj.group_names(), vec!["A", "B", "C", "D"]);
        assert_eq!(swaps, 6);
    }

    #[test]
    fn test_reorder_skips_missing_names() {
        let mut obj = SceneObject::new("A.001").with_groups(["Tip", "Root"]);
        reorder_groups(&mut obj, &order(&["Root", "Mid", "Tip"])).unwrap();

        assert_eq!(obj.group_names(), vec!["Root", "Tip"]);
    }

    #[test]
    fn test_reorder_leaves_unlisted_groups_after() {
        let mut obj = SceneObject::new("A.001").with_groups(["X", "B", "Y", "A"]);
        reorder_groups(&mut obj, &order(&["A", "B"])).unwrap();

        assert_eq!(obj.group_names(), vec!["A", "B", "X", "Y"]);
    }

    #[test]
    fn test_reorder_already_sorted_is_free() {
        let mut obj = SceneObject::new("A.001").with_groups(["A", "B", "C"]);
        assert_eq!(reorder_groups(&mut obj, &order(&["A", "B", "C"])).unwrap(), 0);
    }

    #[test]
    fn test_apply_properties_overlay() {
        let mut target = PropertyStore::new();
        target.set("stale", json!(1)).unwrap();
        target.set("health", json!(10)).unwrap();

        let mut source = PropertyStore::new();
        source.set("health", json!(100)).unwrap();
        source.set("armor", json!([1, 2])).unwrap();

        let changes = apply_properties(&mut target, &source);

        assert_eq!(changes.removed_properties, vec!["stale"]);
        assert_eq!(changes.set_properties, 2);
        assert!(!changes.metadata_replaced);
        assert_eq!(target, source);
    }

    #[test]
    fn test_absent_metadata_leaves_target_sidecar() {
        let overlay = MetadataOverlay::from([("stamina".to_string(), MetadataInfo::default())]);
        let mut target = PropertyStore::new();
        target.metadata = Some(overlay.clone());

        apply_properties(&mut target, &PropertyStore::new());
        assert_eq!(target.metadata, Some(overlay));
    }

    #[test]
    fn test_empty_metadata_replaces_target_sidecar() {
        let mut target = PropertyStore::new();
        target.metadata = Some(MetadataOverlay::from([(
            "stamina".to_string(),
            MetadataInfo::default(),
        )]));

        let mut source = PropertyStore::new();
        source.metadata = Some(MetadataOverlay::new());

        let changes = apply_properties(&mut target, &source);
        assert!(changes.metadata_replaced);
        assert_eq!(target.metadata, Some(MetadataOverlay::new()));
    }

    #[test]
    fn test_sync_entity_restores_transform() {
        let mut rec = record(&["Root"]);
        rec.transform[2][3] = -4.0;

        let mut obj = SceneObject::new("Arm.001").with_groups(["Root"]);
        obj.matrix_world[0][0] = 3.0;

        sync_entity(&mut obj, &rec).unwrap();
        assert_eq!(obj.matrix_world, rec.transform);
    }
}
