/// Run configuration: validated once at startup, immutable afterwards.
///
/// The binary turns CLI arguments into these values before any scanning or
/// file I/O happens, so every configuration error surfaces up front.
use crate::error::{Error, Result};
use chrono::TimeDelta;
use std::fmt;
use std::path::PathBuf;

/// Bucket width used by the scan flow when none is given.
pub const DEFAULT_SCAN_BUCKET_MINUTES: i64 = 5;
/// Bucket width used by the visualize-only flow when none is given.
pub const DEFAULT_VISUALIZE_BUCKET_MINUTES: i64 = 15;
/// Recency window used when none is given.
pub const DEFAULT_WINDOW_DAYS: i64 = 30;
/// Upper bound on intervals in one series (about 9.5 years of 5-minute buckets).
pub const MAX_BUCKETS: u64 = 1_000_000;

// ── Storage root ─────────────────────────────────────────────────────────────

/// Bucket + prefix under which every object is listed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageRoot {
    pub bucket: String,
    pub prefix: String,
}

impl StorageRoot {
    /// Parse an `s3://<bucket>/<prefix>` URL.
    ///
    /// The single leading `/` of the path is dropped; the rest is used
    /// verbatim as the listing prefix (it may be empty).
    pub fn parse(url: &str) -> Result<Self> {
        let rest = url.strip_prefix("s3://").ok_or_else(|| {
            Error::Configuration(format!("storage URL {url:?} must start with s3://"))
        })?;
        let (bucket, prefix) = match rest.split_once('/') {
            Some((bucket, prefix)) => (bucket, prefix),
            None => (rest, ""),
        };
        if bucket.is_empty() {
            return Err(Error::Configuration(format!(
                "storage URL {url:?} has no bucket name"
            )));
        }
        Ok(Self {
            bucket: bucket.to_string(),
            prefix: prefix.to_string(),
        })
    }
}

impl fmt::Display for StorageRoot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "s3://{}/{}", self.bucket, self.prefix)
    }
}

// ── Aggregation parameters ───────────────────────────────────────────────────

/// Recency window and bucket width for aggregation. Both strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrequencyParams {
    window: TimeDelta,
    bucket_width: TimeDelta,
}

impl FrequencyParams {
    pub fn new(window: TimeDelta, bucket_width: TimeDelta) -> Result<Self> {
        if window <= TimeDelta::zero() {
            return Err(Error::Configuration(format!(
                "recency window must be positive, got {window}"
            )));
        }
        if bucket_width.num_milliseconds() <= 0 {
            return Err(Error::Configuration(format!(
                "bucket width must be positive, got {bucket_width}"
            )));
        }
        let buckets = window.num_milliseconds() / bucket_width.num_milliseconds();
        if buckets as u64 > MAX_BUCKETS {
            return Err(Error::Configuration(format!(
                "a {window} window in {bucket_width} buckets needs {buckets} intervals, \
                 above the limit of {MAX_BUCKETS}"
            )));
        }
        Ok(Self {
            window,
            bucket_width,
        })
    }

    pub fn window(&self) -> TimeDelta {
        self.window
    }

    pub fn bucket_width(&self) -> TimeDelta {
        self.bucket_width
    }
}

// ── Output naming ────────────────────────────────────────────────────────────

/// Chart artifact format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartFormat {
    /// Interactive HTML document.
    Html,
    /// Static PNG raster.
    Png,
    /// Plain CSV of the series.
    Csv,
}

/// Operator-supplied label from which every output name is derived.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLabel(String);

impl OutputLabel {
    pub fn new(label: &str) -> Result<Self> {
        if label.trim().is_empty() {
            return Err(Error::Configuration("output label must not be empty".into()));
        }
        if label.contains(['/', '\\']) {
            return Err(Error::Configuration(format!(
                "output label {label:?} must not contain a path separator"
            )));
        }
        Ok(Self(label.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn snapshot_file_name(&self) -> String {
        format!("{}-list-objects-out.json", self.0)
    }

    pub fn chart_file_name(&self, format: ChartFormat) -> String {
        match format {
            ChartFormat::Html => format!("{}-frequency-upload-chart.html", self.0),
            ChartFormat::Png => format!("{}-uploads-frequency.png", self.0),
            ChartFormat::Csv => format!("{}-uploads-frequency.csv", self.0),
        }
    }
}

impl fmt::Display for OutputLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ── Run configuration ────────────────────────────────────────────────────────

/// Everything one run needs, constructed once and passed by reference.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Root to scan. `None` in the visualize-only flow.
    pub storage_root: Option<StorageRoot>,
    pub label: OutputLabel,
    pub output_dir: PathBuf,
    /// Explicit snapshot path; defaults to the label-derived name in `output_dir`.
    pub snapshot_override: Option<PathBuf>,
    pub override_cache: bool,
    pub frequency: FrequencyParams,
    pub chart_format: ChartFormat,
    /// Raster size in pixels (PNG only).
    pub image_size: (u32, u32),
}

impl RunConfig {
    pub fn snapshot_path(&self) -> PathBuf {
        match &self.snapshot_override {
            Some(path) => path.clone(),
            None => self.output_dir.join(self.label.snapshot_file_name()),
        }
    }

    pub fn chart_path(&self) -> PathBuf {
        self.output_dir
            .join(self.label.chart_file_name(self.chart_format))
    }
}
