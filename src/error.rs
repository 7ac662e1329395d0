//! Errors surfaced by detection sources

/// Errors that can occur while detecting food in an image
#[derive(thiserror::Error, Debug)]
pub enum DetectorError {
    /// The model could not be loaded; nothing can be detected until a retry succeeds
    #[error("detection model unavailable: {0}")]
    ModelUnavailable(String),

    /// The model is loaded but this inference call failed
    #[error("detection failed: {0}")]
    DetectionFailed(String),

    /// The supplied bytes are not a decodable raster image
    #[error("invalid image")]
    InvalidImage(#[from] image::ImageError),
}
