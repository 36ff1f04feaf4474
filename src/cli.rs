/// Command-line interface: parsed once, then turned into a `RunConfig`.
use chrono::TimeDelta;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use uploadsleuth_core::config::{
    ChartFormat, FrequencyParams, OutputLabel, RunConfig, StorageRoot,
    DEFAULT_SCAN_BUCKET_MINUTES, DEFAULT_VISUALIZE_BUCKET_MINUTES, DEFAULT_WINDOW_DAYS,
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Log at DEBUG level instead of INFO
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List every object under an S3 path (or reuse the cached listing) and chart upload frequency
    Scan(ScanArgs),
    /// Chart upload frequency from an existing snapshot without listing anything
    Visualize(VisualizeArgs),
}

#[derive(Args, Debug)]
pub struct ScanArgs {
    /// S3 path to scan recursively, e.g. s3://bucket/path/
    #[arg(long)]
    pub s3_url: String,

    /// Rescan even if a snapshot for this label already exists
    #[arg(long)]
    pub override_cache: bool,

    /// AWS region to use instead of the environment's default
    #[arg(long)]
    pub region: Option<String>,

    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Args, Debug)]
pub struct VisualizeArgs {
    /// Snapshot to read instead of <output-dir>/<label>-list-objects-out.json
    #[arg(long)]
    pub snapshot: Option<PathBuf>,

    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Args, Debug)]
pub struct CommonArgs {
    /// Label used to name the snapshot and chart files
    #[arg(long)]
    pub output_label: String,

    /// Directory where snapshot and chart files are written
    #[arg(long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Only count objects modified within this many days
    #[arg(long, conflicts_with = "window_hours")]
    pub window_days: Option<i64>,

    /// Only count objects modified within this many hours
    #[arg(long)]
    pub window_hours: Option<i64>,

    /// Width of each histogram interval, in minutes
    #[arg(long)]
    pub bucket_minutes: Option<i64>,

    /// Chart artifact format
    #[arg(long, value_enum)]
    pub format: Option<Format>,

    /// Width of the PNG chart in pixels
    #[arg(long, default_value_t = 1280)]
    pub width: u32,

    /// Height of the PNG chart in pixels
    #[arg(long, default_value_t = 720)]
    pub height: u32,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    /// Interactive HTML (Plotly)
    Html,
    /// Static PNG image
    Png,
    /// CSV table of intervals and counts
    Csv,
}

impl From<Format> for ChartFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Html => ChartFormat::Html,
            Format::Png => ChartFormat::Png,
            Format::Csv => ChartFormat::Csv,
        }
    }
}

/// Per-mode defaults for options the operator left out.
struct ModeDefaults {
    bucket_minutes: i64,
    format: Format,
}

const SCAN_DEFAULTS: ModeDefaults = ModeDefaults {
    bucket_minutes: DEFAULT_SCAN_BUCKET_MINUTES,
    format: Format::Html,
};

const VISUALIZE_DEFAULTS: ModeDefaults = ModeDefaults {
    bucket_minutes: DEFAULT_VISUALIZE_BUCKET_MINUTES,
    format: Format::Png,
};

impl Command {
    /// Validate arguments into the immutable run configuration.
    pub fn to_config(&self) -> uploadsleuth_core::Result<RunConfig> {
        match self {
            Command::Scan(args) => {
                let root = StorageRoot::parse(&args.s3_url)?;
                let mut config = args.common.to_config(&SCAN_DEFAULTS)?;
                config.storage_root = Some(root);
                config.override_cache = args.override_cache;
                Ok(config)
            }
            Command::Visualize(args) => {
                let mut config = args.common.to_config(&VISUALIZE_DEFAULTS)?;
                config.snapshot_override = args.snapshot.clone();
                Ok(config)
            }
        }
    }
}

impl CommonArgs {
    fn window(&self) -> TimeDelta {
        match (self.window_days, self.window_hours) {
            (_, Some(hours)) => TimeDelta::try_hours(hours).unwrap_or(TimeDelta::MAX),
            (Some(days), None) => TimeDelta::try_days(days).unwrap_or(TimeDelta::MAX),
            (None, None) => TimeDelta::days(DEFAULT_WINDOW_DAYS),
        }
    }

    fn to_config(&self, defaults: &ModeDefaults) -> uploadsleuth_core::Result<RunConfig> {
        let bucket_minutes = self.bucket_minutes.unwrap_or(defaults.bucket_minutes);
        let bucket_width = TimeDelta::try_minutes(bucket_minutes).unwrap_or(TimeDelta::MAX);
        let format = self.format.unwrap_or(defaults.format);

        Ok(RunConfig {
            storage_root: None,
            label: OutputLabel::new(&self.output_label)?,
            output_dir: self.output_dir.clone(),
            snapshot_override: None,
            override_cache: false,
            frequency: FrequencyParams::new(self.window(), bucket_width)?,
            chart_format: format.into(),
            image_size: (self.width, self.height),
        })
    }
}
