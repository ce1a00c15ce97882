use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::host::LiveEntity;
use crate::model::{PropertyStore, Transform, WeightMap, IDENTITY};

/// Object type as reported by the host
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ObjectKind {
    #[default]
    Mesh,
    Empty,
    Armature,
    Curve,
    Camera,
    Light,
    #[serde(other)]
    Other,
}

/// A named vertex group and its sparse weights
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VertexGroup {
    pub name: String,

    #[serde(default)]
    pub weights: WeightMap,
}

impl VertexGroup {
    pub fn new(name: impl Into<String>) -> Self {
        VertexGroup {
            name: name.into(),
            weights: WeightMap::new(),
        }
    }

    pub fn with_weights(name: impl Into<String>, weights: WeightMap) -> Self {
        VertexGroup {
            name: name.into(),
            weights,
        }
    }
}

/// One object in a scene document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneObject {
    pub name: String,

    #[serde(default)]
    pub kind: ObjectKind,

    #[serde(default)]
    pub selected: bool,

    #[serde(default = "identity")]
    pub matrix_world: Transform,

    /// Host order; array position is the group index
    #[serde(default)]
    pub vertex_groups: Vec<VertexGroup>,

    #[serde(default)]
    pub properties: PropertyStore,
}

fn identity() -> Transform {
    IDENTITY
}

impl SceneObject {
    pub fn new(name: impl Into<String>) -> Self {
        SceneObject {
            name: name.into(),
            kind: ObjectKind::Mesh,
            selected: false,
            matrix_world: IDENTITY,
            vertex_groups: Vec::new(),
            properties: PropertyStore::default(),
        }
    }

    pub fn with_groups<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.vertex_groups = names.into_iter().map(VertexGroup::new).collect();
        self
    }
}

impl LiveEntity for SceneObject {
    fn name(&self) -> &str {
        &self.name
    }

    fn transform(&self) -> Transform {
        self.matrix_world
    }

    fn set_transform(&mut self, transform: Transform) {
        self.matrix_world = transform;
    }

    fn group_names(&self) -> Vec<String> {
        self.vertex_groups.iter().map(|g| g.name.clone()).collect()
    }

    fn group_index(&self, name: &str) -> Option<usize> {
        self.vertex_groups.iter().position(|g| g.name == name)
    }

    fn group_weights(&self, name: &str) -> WeightMap {
        self.vertex_groups
            .iter()
            .find(|g| g.name == name)
            .map(|g| g.weights.clone())
            .unwrap_or_default()
    }

    fn remove_group(&mut self, name: &str) -> bool {
        match self.group_index(name) {
            Some(index) => {
                self.vertex_groups.remove(index);
                true
            }
            None => false,
        }
    }

    fn move_group_up(&mut self, index: usize) -> bool {
        if index == 0 || index >= self.vertex_groups.len() {
            return false;
        }
        self.vertex_groups.swap(index - 1, index);
        true
    }

    fn properties(&self) -> &PropertyStore {
        &self.properties
    }

    fn properties_mut(&mut self) -> &mut PropertyStore {
        &mut self.properties
    }
}

/// A scene file: the objects the host exposes plus their selection state
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneDocument {
    #[serde(default)]
    pub objects: Vec<SceneObject>,
}

impl SceneDocument {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read scene file: {}", path.display()))?;

        let scene: SceneDocument = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse scene file: {}", path.display()))?;

        Ok(scene)
    }

    pub fn write_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
            }
        }

        let content = serde_json::to_string_pretty(self).context("Failed to serialize scene")?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write scene file: {}", path.display()))?;

        Ok(())
    }

    pub fn find(&self, name: &str) -> Option<&SceneObject> {
        self.objects.iter().find(|o| o.name == name)
    }

    /// Objects picked by an explicit name list, or by their `selected` flag
    /// when `names` is empty. Non-mesh objects are dropped when `mesh_only`.
    pub fn selection(&self, names: &[String], mesh_only: bool) -> Result<Vec<&SceneObject>> {
        let wanted = self.resolve_names(names)?;
        Ok(self
            .objects
            .iter()
            .filter(|o| Self::is_picked(o, &wanted, mesh_only))
            .collect())
    }

    /// Mutable form of [`selection`](Self::selection).
    pub fn selection_mut(
        &mut self,
        names: &[String],
        mesh_only: bool,
    ) -> Result<Vec<&mut SceneObject>> {
        let wanted = self.resolve_names(names)?;
        Ok(self
            .objects
            .iter_mut()
            .filter(|o| Self::is_picked(o, &wanted, mesh_only))
            .collect())
    }

    fn resolve_names(&self, names: &[String]) -> Result<Option<HashSet<String>>> {
        if names.is_empty() {
            return Ok(None);
        }
        for name in names {
            if self.find(name).is_none() {
                return Err(anyhow!("Object not found in scene: {}", name));
            }
        }
        Ok(Some(names.iter().cloned().collect()))
    }

    fn is_picked(object: &SceneObject, wanted: &Option<HashSet<String>>, mesh_only: bool) -> bool {
        let picked = match wanted {
            Some(names) => names.contains(&object.name),
            None => object.selected,
        };
        picked && (!mesh_only || object.kind == ObjectKind::Mesh)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn scene() -> SceneDocument {
        let mut light = SceneObject::new("Sun");
        light.kind = ObjectKind::Light;
        light.selected = true;

        let mut arm = SceneObject::new("Arm").with_groups(["Root", "Mid"]);
        arm.selected = true;

        SceneDocument {
            objects: vec![arm, SceneObject::new("Arm.001"), light],
        }
    }

    #[test]
    fn test_move_group_up_swaps_with_predecessor() {
        let mut obj = SceneObject::new("Arm").with_groups(["A", "B", "C"]);
        assert!(obj.move_group_up(2));
        assert_eq!(obj.group_names(), vec!["A", "C", "B"]);
        assert!(!obj.move_group_up(0));
        assert!(!obj.move_group_up(3));
    }

    #[test]
    fn test_remove_group() {
        let mut obj = SceneObject::new("Arm").with_groups(["A", "B"]);
        assert!(obj.remove_group("A"));
        assert!(!obj.remove_group("A"));
        assert_eq!(obj.group_names(), vec!["B"]);
    }

    #[test]
    fn test_selection_uses_flags_and_mesh_filter() {
        let scene = scene();
        let names: Vec<_> = scene
            .selection(&[], true)
            .unwrap()
            .iter()
            .map(|o| o.name.clone())
            .collect();
        assert_eq!(names, vec!["Arm"]);

        assert_eq!(scene.selection(&[], false).unwrap().len(), 2);
    }

    #[test]
    fn test_selection_by_name() {
        let scene = scene();
        let picked = scene.selection(&["Arm.001".to_string()], true).unwrap();
        assert_eq!(picked.len(), 1);
        assert_eq!(picked[0].name, "Arm.001");

        assert!(scene.selection(&["Nope".to_string()], true).is_err());
    }

    #[test]
    fn test_parse_minimal_object() {
        let obj: SceneObject = serde_json::from_value(json!({
            "name": "Leg",
            "kind": "ARMATURE",
            "vertex_groups": [{ "name": "Hip", "weights": { "3": 0.5 } }]
        }))
        .unwrap();

        assert_eq!(obj.kind, ObjectKind::Armature);
        assert_eq!(obj.matrix_world, IDENTITY);
        assert_eq!(obj.group_weights("Hip").get(&3), Some(&0.5));
    }
}
