//! # porting-sync
//!
//! Snapshot the structure of "original" objects and re-apply it to their
//! duplicates.
//!
//! ## Overview
//!
//! When a model is duplicated (`Arm` becomes `Arm.001`) and the copy is then
//! re-meshed or edited, its vertex groups, pivot and custom properties drift
//! away from the original. `porting-sync` exports the originals' world
//! transform, vertex-group order and weights, and custom properties (with
//! their UI metadata) to a JSON file, and later syncs duplicates against that
//! file: extra groups are removed, groups are put back in the original order,
//! the pivot is restored and properties are overlaid.
//!
//! ## Architecture
//!
//! - Name classification ([`naming`])
//! - Data model and snapshot file ([`model`], [`codec`])
//! - Host abstraction and scene documents ([`host`], [`scene`])
//! - Reconciliation ([`engine`]) and batch operations ([`batch`])
//! - Reporting, configuration and logging ([`report`], [`config`], [`settings`], [`logger`])
//! - CLI command handlers ([`handlers`])

/// Batch export and sync with their selection preconditions.
///
/// Export refuses an empty selection or one containing duplicates; sync
/// refuses an empty selection, one containing originals, or a missing
/// snapshot file. Per-object lookup misses during sync are skipped, not fatal.
pub mod batch;

/// Snapshot capture and the on-disk snapshot store.
pub mod codec;

/// Platform-agnostic configuration directory management.
///
/// Locates the per-user config directory (XDG on Linux, Application Support
/// on macOS, AppData on Windows) and the fixed snapshot location inside it.
pub mod config;

/// Reconciliation of one duplicate against its original's record.
///
/// Group pruning, adjacent-swap group reordering, transform restore and
/// property overlay.
pub mod engine;

/// Precondition and record validation errors.
pub mod error;

/// Command handlers used by the binary.
pub mod handlers;

/// The host object interface the engine works against.
pub mod host;

/// Logging configuration and utilities.
///
/// Console logging via `env_logger` (controlled by `RUST_LOG`) plus a
/// persistent log file in the config directory with size-based rotation.
pub mod logger;

/// Snapshot data model: records, weight maps, properties and metadata.
pub mod model;

/// Original / duplicate name classification.
pub mod naming;

/// Export and sync reports for the console, markdown and JSON.
pub mod report;

/// JSON scene documents implementing the host interface.
pub mod scene;

/// User settings stored as TOML in the config directory.
pub mod settings;

pub use error::{PreconditionError, RecordError};
pub use host::LiveEntity;
pub use model::{EntityRecord, MetadataInfo, PropertyStore, Snapshot, Transform, WeightMap};
