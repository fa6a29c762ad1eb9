use thiserror::Error;

#[derive(Debug, Error)]
pub enum TilesetPackerError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("Invalid canvas dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Nothing to pack")]
    Empty,
}

pub type Result<T> = std::result::Result<T, TilesetPackerError>;
