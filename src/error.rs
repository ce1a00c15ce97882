use std::path::PathBuf;

/// A batch precondition that blocked export or sync before anything was touched
///
/// These are raised through `anyhow`; callers that need to tell them apart
/// from I/O failures can `downcast_ref::<PreconditionError>()`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PreconditionError {
    #[error("No mesh objects selected")]
    EmptySelection,

    #[error("Duplicates detected! Export blocked. ({name} is a duplicate)")]
    DuplicateInExport { name: String },

    #[error("Original objects detected! Sync blocked. ({name} is not a duplicate)")]
    OriginalInSync { name: String },

    #[error("Export file not found: {}", path.display())]
    SnapshotMissing { path: PathBuf },
}

/// A snapshot record that breaks the group bookkeeping rules
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RecordError {
    #[error("group '{0}' appears more than once in group_order")]
    RepeatedGroup(String),

    #[error("group '{0}' is listed in group_order but has no weights entry")]
    UnweightedGroup(String),

    #[error("group '{0}' has weights but is missing from group_order")]
    UnorderedGroup(String),

    #[error("group '{group}' vertex {vertex} has weight {weight} outside [0, 1]")]
    WeightOutOfRange { group: String, vertex: u32, weight: f64 },
}
