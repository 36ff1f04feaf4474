/// UploadSleuth Core: scanning, snapshots, and upload-frequency analysis.
///
/// This crate contains all business logic with zero rendering dependencies.
/// The pipeline runs single-threaded and synchronously:
///
/// scanner → timestamp store → snapshot (via the cache gate) → analysis.
///
/// # Modules
///
/// - [`model`]: Timestamp store and frequency series.
/// - [`scanner`]: Paginated listing traversal with progress reporting.
/// - [`snapshot`]: All-or-nothing JSON persistence of a store.
/// - [`cache`]: Reuse-or-rescan decision.
/// - [`analysis`]: Recency filter and epoch-aligned bucketing.
/// - [`config`]: Immutable run configuration and validation.
/// - [`error`]: Error type shared by every stage.
pub mod analysis;
pub mod cache;
pub mod config;
pub mod error;
pub mod model;
pub mod scanner;
pub mod snapshot;

pub use error::{Error, Result, Stage};
