use thiserror::Error;

/// Errors reported by the drawing surface
#[derive(Error, Debug)]
pub enum SurfaceError {
    /// An operation needed the pixel context before `initialize()` created it
    #[error("surface has no pixel context yet")]
    SurfaceNotReady,

    /// The background image could not be read or decoded
    #[error("failed to load background image {image}: {reason}")]
    BackgroundLoad { image: String, reason: String },

    #[error("invalid surface dimensions {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("invalid line width {0}")]
    InvalidLineWidth(f32),

    #[error("invalid color {0:?}")]
    InvalidColor(String),

    #[error("unsupported export format: {0}")]
    UnsupportedFormat(String),

    #[error("failed to encode image: {0}")]
    Encode(#[from] image::ImageError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result type for surface operations
pub type SurfaceResult<T> = Result<T, SurfaceError>;
