use thiserror::Error;

/// Errors surfaced by the data, preprocessing and model layers.
///
/// The experiment orchestrators wrap these in `Box<dyn Error>` at the top
/// level, so a failed download or a malformed CSV stops the run with a
/// readable message instead of a panic.
#[derive(Error, Debug)]
pub enum TitanicError {
    #[error("download failed: {0}")]
    Download(#[from] reqwest::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv parse error: {0}")]
    Csv(#[from] csv::Error),

    #[error("empty dataset: {0}")]
    EmptyData(String),

    #[error("dimension mismatch: {0}")]
    DimensionMismatch(String),

    #[error("not fitted: {0}")]
    NotFitted(String),

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

pub type Result<T> = std::result::Result<T, TitanicError>;
