use crate::model::{PropertyStore, Transform, WeightMap};

/// An object owned by the host application
///
/// The host keeps vertex groups in an ordered list and only exposes
/// [`move_group_up`](LiveEntity::move_group_up) to change that order; there
/// is no way to assign an index directly.
pub trait LiveEntity {
    fn name(&self) -> &str;

    fn transform(&self) -> Transform;

    fn set_transform(&mut self, transform: Transform);

    /// Group names in current host order
    fn group_names(&self) -> Vec<String>;

    /// Current index of the named group, if the object has it
    fn group_index(&self, name: &str) -> Option<usize> {
        self.group_names().iter().position(|g| g == name)
    }

    /// Weights of every vertex that belongs to the group. Empty when the
    /// group does not exist.
    fn group_weights(&self, name: &str) -> WeightMap;

    /// Returns false when there was no such group.
    fn remove_group(&mut self, name: &str) -> bool;

    /// Swap the group at `index` with its predecessor. Returns false when
    /// nothing moved (index 0 or out of range).
    fn move_group_up(&mut self, index: usize) -> bool;

    fn properties(&self) -> &PropertyStore;

    fn properties_mut(&mut self) -> &mut PropertyStore;
}
