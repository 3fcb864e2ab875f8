//! Image probe error types.

use thiserror::Error;

/// Reasons an image could not be measured.
#[derive(Debug, Clone, Error)]
#[allow(missing_docs)]
pub enum ProbeError {
    #[error("unsupported or invalid image url: {url}")]
    InvalidUrl { url: String },

    #[error("network error while fetching image: {message}")]
    Network { message: String },

    #[error("image request failed with HTTP {status}")]
    HttpStatus { status: u16 },

    #[error("image is too large to probe ({bytes} bytes, limit {limit})")]
    TooLarge { bytes: u64, limit: u64 },

    #[error("unsupported image format: {message}")]
    UnsupportedFormat { message: String },

    #[error("failed to read image dimensions: {message}")]
    Decode { message: String },

    #[error("io error while reading image: {message}")]
    Io { message: String },

    #[error("image request timed out")]
    Timeout,
}

impl ProbeError {
    /// Creates invalid url error.
    #[must_use]
    pub fn invalid_url(url: impl Into<String>) -> Self {
        Self::InvalidUrl { url: url.into() }
    }

    /// Creates network error.
    #[must_use]
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Creates unsupported format error.
    #[must_use]
    pub fn unsupported(message: impl Into<String>) -> Self {
        Self::UnsupportedFormat {
            message: message.into(),
        }
    }

    /// Creates decode error.
    #[must_use]
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Creates io error.
    #[must_use]
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Returns whether error is network related.
    #[must_use]
    pub const fn is_network_error(&self) -> bool {
        matches!(
            self,
            Self::Network { .. } | Self::HttpStatus { .. } | Self::Timeout
        )
    }
}

impl From<reqwest::Error> for ProbeError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout
        } else if let Some(status) = e.status() {
            Self::HttpStatus {
                status: status.as_u16(),
            }
        } else {
            Self::network(e.to_string())
        }
    }
}

impl From<std::io::Error> for ProbeError {
    fn from(e: std::io::Error) -> Self {
        Self::io(e.to_string())
    }
}

impl From<image::ImageError> for ProbeError {
    fn from(e: image::ImageError) -> Self {
        match e {
            image::ImageError::Unsupported(inner) => Self::unsupported(inner.to_string()),
            image::ImageError::IoError(inner) => Self::from(inner),
            other => Self::decode(other.to_string()),
        }
    }
}
