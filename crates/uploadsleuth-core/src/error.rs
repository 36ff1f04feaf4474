/// Error types for the core pipeline.
///
/// Every error is fatal at the point it occurs; nothing in the core retries
/// or recovers locally. Each variant maps to the pipeline [`Stage`] that
/// produced it so the binary can tell the operator which step failed.
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Pipeline stage an error originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Configure,
    Scan,
    CacheLoad,
    Aggregate,
    Persist,
}

impl Stage {
    /// Human-readable stage name for diagnostics.
    pub fn label(self) -> &'static str {
        match self {
            Self::Configure => "configure",
            Self::Scan => "scan",
            Self::CacheLoad => "cache load",
            Self::Aggregate => "aggregate",
            Self::Persist => "persist",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Error)]
pub enum Error {
    /// The listing API call failed (network, auth, throttling).
    #[error("listing request for {root} failed: {message}")]
    Transport { root: String, message: String },

    /// A cached snapshot exists but could not be decoded.
    #[error("snapshot {} is malformed: {reason}", path.display())]
    MalformedSnapshot { path: PathBuf, reason: String },

    /// Invalid operator input, detected before any I/O.
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// The retained data would span more intervals than a series may hold.
    #[error("aggregation would produce {buckets} intervals, above the limit of {limit}")]
    TooManyBuckets { buckets: u64, limit: u64 },

    /// The store could not be encoded; the output file is not written.
    #[error("failed to serialise snapshot {}: {source}", path.display())]
    Serialization {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to read snapshot {}: {source}", path.display())]
    SnapshotRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write snapshot {}: {source}", path.display())]
    SnapshotWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// The pipeline stage this error belongs to.
    pub fn stage(&self) -> Stage {
        match self {
            Self::Transport { .. } => Stage::Scan,
            Self::MalformedSnapshot { .. } | Self::SnapshotRead { .. } => Stage::CacheLoad,
            Self::Configuration(_) => Stage::Configure,
            Self::TooManyBuckets { .. } => Stage::Aggregate,
            Self::Serialization { .. } | Self::SnapshotWrite { .. } => Stage::Persist,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
