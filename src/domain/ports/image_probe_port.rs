//! Port for measuring an image at a URL.

use async_trait::async_trait;

use crate::domain::entities::ImageSize;
use crate::domain::errors::ProbeError;

/// Measures the pixel dimensions and format of the image behind a URL.
/// Implementations must be thread-safe.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ImageProbePort: Send + Sync {
    /// Probes the image at `url`.
    async fn probe(&self, url: &str) -> Result<ImageSize, ProbeError>;
}
