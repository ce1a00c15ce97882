use anyhow::{anyhow, Result};
use serde::de::{Deserializer, MapAccess, Visitor};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::error::RecordError;

/// Property key the host uses for per-property UI metadata
pub const METADATA_KEY: &str = "_RNA_UI";

/// World-space transform, row-major
pub type Transform = [[f64; 4]; 4];

pub const IDENTITY: Transform = [
    [1.0, 0.0, 0.0, 0.0],
    [0.0, 1.0, 0.0, 0.0],
    [0.0, 0.0, 1.0, 0.0],
    [0.0, 0.0, 0.0, 1.0],
];

/// Sparse vertex index -> weight map for one vertex group
///
/// Vertices that are not members of the group are absent. Integer keys are
/// written as strings in JSON.
pub type WeightMap = BTreeMap<u32, f64>;

/// UI metadata for one custom property (bounds and tooltip)
///
/// Bounds keep whatever JSON the host wrote: an integer stays an integer and
/// vector properties carry one bound per component.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetadataInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub soft_min: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub soft_max: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    // Anything else the host stores alongside (default, subtype, step, ...)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Property key -> UI metadata, stored under [`METADATA_KEY`]
pub type MetadataOverlay = BTreeMap<String, MetadataInfo>;

/// An object's generic key/value properties plus its metadata sidecar
///
/// On disk this is one flat JSON object where the sidecar sits under
/// [`METADATA_KEY`]. In memory the two are kept apart, so `data` can never
/// contain the reserved key. `metadata` is `None` when the key is absent and
/// `Some` (possibly empty) when it is present.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyStore {
    data: BTreeMap<String, Value>,
    pub metadata: Option<MetadataOverlay>,
}

impl PropertyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    /// Set a regular property. The reserved metadata key is rejected; use
    /// the `metadata` field for the sidecar.
    pub fn set(&mut self, key: impl Into<String>, value: Value) -> Result<()> {
        let key = key.into();
        if key == METADATA_KEY {
            return Err(anyhow!(
                "'{METADATA_KEY}' is reserved for property metadata"
            ));
        }
        self.data.insert(key, value);
        Ok(())
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.data.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.data.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.data.iter()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty() && self.metadata.is_none()
    }
}

impl Serialize for PropertyStore {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = self.data.len() + usize::from(self.metadata.is_some());
        let mut map = serializer.serialize_map(Some(len))?;
        for (key, value) in &self.data {
            map.serialize_entry(key, value)?;
        }
        if let Some(metadata) = &self.metadata {
            map.serialize_entry(METADATA_KEY, metadata)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for PropertyStore {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct PropertyStoreVisitor;

        impl<'de> Visitor<'de> for PropertyStoreVisitor {
            type Value = PropertyStore;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of custom properties")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<PropertyStore, A::Error> {
                let mut store = PropertyStore::default();
                while let Some(key) = access.next_key::<String>()? {
                    if key == METADATA_KEY {
                        let overlay: MetadataOverlay = access.next_value()?;
                        store.metadata = Some(overlay);
                    } else {
                        let value: Value = access.next_value()?;
                        store.data.insert(key, value);
                    }
                }
                Ok(store)
            }
        }

        deserializer.deserialize_map(PropertyStoreVisitor)
    }
}

/// Everything recorded about one original object at export time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityRecord {
    #[serde(rename = "matrix_world")]
    pub transform: Transform,

    /// Group names in the original's host order; position is the target index
    pub group_order: Vec<String>,

    pub groups: BTreeMap<String, WeightMap>,

    #[serde(default)]
    pub custom_properties: PropertyStore,
}

impl EntityRecord {
    /// Check that `group_order` and `groups` describe the same set of names,
    /// with no repeats, and that every weight lies in `[0, 1]`.
    pub fn validate(&self) -> Result<(), RecordError> {
        let mut seen = BTreeSet::new();
        for name in &self.group_order {
            if !seen.insert(name.as_str()) {
                return Err(RecordError::RepeatedGroup(name.clone()));
            }
            if !self.groups.contains_key(name) {
                return Err(RecordError::UnweightedGroup(name.clone()));
            }
        }

        for (group, weights) in &self.groups {
            if !seen.contains(group.as_str()) {
                return Err(RecordError::UnorderedGroup(group.clone()));
            }
            for (&vertex, &weight) in weights {
                if !(0.0..=1.0).contains(&weight) {
                    return Err(RecordError::WeightOutOfRange {
                        group: group.clone(),
                        vertex,
                        weight,
                    });
                }
            }
        }

        Ok(())
    }
}

/// Original object name -> record, as of the last export
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snapshot {
    records: BTreeMap<String, EntityRecord>,
}

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, record: EntityRecord) {
        self.records.insert(name.into(), record);
    }

    pub fn get(&self, name: &str) -> Option<&EntityRecord> {
        self.records.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.records.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &String> {
        self.records.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &EntityRecord)> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
