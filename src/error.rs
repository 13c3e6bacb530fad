use thiserror::Error;

#[derive(Error, Debug)]
pub enum ForensicsError {
    #[error("Image loading error: {0}")]
    ImageLoad(#[from] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Block size must be greater than 1 (got {0})")]
    InvalidBlockSize(u32),

    #[error("Image too small for analysis (minimum: {0}x{0})")]
    ImageTooSmall(u32),

    #[error("Report error: {0}")]
    Report(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ForensicsError>;
