use thiserror::Error;

/// Failures of the I/O edges: loading rows, reading config, writing reports.
/// The aggregation pipeline itself never fails.
#[derive(Debug, Error)]
pub enum Error {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Invalid platform selection: {0}")]
    PlatformSelection(String),
}

pub type Result<T> = std::result::Result<T, Error>;
