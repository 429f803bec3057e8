//! Error types for textshot

use thiserror::Error;

pub type Result<T> = std::result::Result<T, TextshotError>;

/// Main error type for textshot
#[derive(Debug, Error)]
pub enum TextshotError {
    #[error("Invalid color: {0}")]
    Color(#[from] ColorError),

    #[error("Font loading failed: {0}")]
    FontLoad(#[from] FontLoadError),

    #[error("Layout failed: {0}")]
    Layout(#[from] LayoutError),

    #[error("Rendering failed: {0}")]
    RenderingFailed(#[from] RenderError),

    #[error("Export failed: {0}")]
    ExportFailed(#[from] ExportError),

    #[error("Upload failed: {0}")]
    UploadFailed(#[from] UploadError),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Color parsing errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ColorError {
    #[error("invalid length {0}, must be 6 hex characters")]
    InvalidLength(usize),

    #[error("invalid hex digits in {0:?}")]
    InvalidHex(String),
}

/// Font loading errors
#[derive(Debug, Error)]
pub enum FontLoadError {
    #[error("Font download from {url} failed: {reason}")]
    DownloadFailed { url: String, reason: String },

    #[error("Failed to write font cache {path}: {source}")]
    CacheWrite {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read font file {path}: {source}")]
    CacheRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid font data")]
    InvalidData,
}

/// Layout errors
#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("Font has no vertical metrics")]
    MissingMetrics,

    #[error("Invalid layout parameters: {0}")]
    InvalidParams(String),
}

/// Rendering errors
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Invalid dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("Canvas of {width}x{height} pixels does not fit in memory")]
    CanvasTooLarge { width: u32, height: u32 },

    #[error("Invalid font")]
    InvalidFont,

    #[error("Glyph not found: {0}")]
    GlyphNotFound(u32),

    #[error("Outline extraction failed for glyph {0}")]
    OutlineExtractionFailed(u32),
}

/// Export errors
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Encoding failed: {0}")]
    EncodingFailed(String),

    #[error("Write to {path} failed: {source}")]
    WriteFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Upload errors
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("Missing environment variables: {}", .0.join(", "))]
    MissingEnv(Vec<&'static str>),

    #[error("Invalid endpoint URL {0:?}")]
    InvalidEndpoint(String),

    #[error("Failed to read {path}: {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Object store rejected {key} with status {status}")]
    Rejected { key: String, status: u16 },

    #[error("Transport error: {0}")]
    Transport(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_env_lists_every_name() {
        let err = UploadError::MissingEnv(vec!["AWS_REGION", "AWS_BUCKET_NAME"]);
        assert_eq!(
            err.to_string(),
            "Missing environment variables: AWS_REGION, AWS_BUCKET_NAME"
        );
    }

    #[test]
    fn test_stage_errors_convert_into_top_level() {
        let err: TextshotError = ColorError::InvalidLength(3).into();
        assert!(matches!(err, TextshotError::Color(ColorError::InvalidLength(3))));
        assert!(err.to_string().starts_with("Invalid color"));
    }
}
