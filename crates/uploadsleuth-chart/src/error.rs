/// Renderer errors.
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("failed to write chart {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write chart data: {0}")]
    Write(#[from] std::io::Error),

    #[error("failed to encode chart image: {0}")]
    Image(#[from] image::ImageError),

    #[error("failed to write CSV rows: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to encode chart data: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid image size {width}x{height}")]
    ImageSize { width: u32, height: u32 },
}

pub type Result<T> = std::result::Result<T, ChartError>;
