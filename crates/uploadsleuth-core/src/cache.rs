/// Cache gate: reuse a persisted snapshot or run a fresh scan.
///
/// The decision is binary: an existing snapshot is reused only when the
/// operator has not asked to override it. Otherwise the scanner runs and
/// its result replaces the snapshot wholesale; old and new are never merged.
use crate::error::Result;
use crate::model::TimestampStore;
use crate::snapshot;
use std::path::Path;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheDecision {
    /// Load the existing snapshot; the scanner is not invoked.
    Reuse,
    /// Scan and overwrite the snapshot.
    Rescan,
}

/// Pure decision function.
pub fn decide(snapshot_exists: bool, override_cache: bool) -> CacheDecision {
    if snapshot_exists && !override_cache {
        CacheDecision::Reuse
    } else {
        CacheDecision::Rescan
    }
}

/// Resolve a store for `snapshot_path`, invoking `scan` only on a cache miss
/// or an explicit override.
///
/// On rescan the snapshot is persisted before the store is returned, so a
/// successful return always leaves a snapshot matching the store on disk.
pub fn load_or_scan<F>(
    snapshot_path: &Path,
    override_cache: bool,
    scan: F,
) -> Result<(TimestampStore, CacheDecision)>
where
    F: FnOnce() -> Result<TimestampStore>,
{
    let decision = decide(snapshot_path.is_file(), override_cache);
    let store = match decision {
        CacheDecision::Reuse => {
            info!("Reusing cached snapshot {}", snapshot_path.display());
            snapshot::load(snapshot_path)?
        }
        CacheDecision::Rescan => {
            if override_cache {
                info!("Cache override requested, scanning");
            } else {
                info!("No snapshot at {}, scanning", snapshot_path.display());
            }
            let store = scan()?;
            snapshot::save(&store, snapshot_path)?;
            store
        }
    };
    Ok((store, decision))
}
