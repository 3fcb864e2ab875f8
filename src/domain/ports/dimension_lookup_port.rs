//! Port the resolver uses to look up image sizes.

use async_trait::async_trait;

use crate::domain::entities::ImageSize;

/// Best-effort size lookup for a possibly missing URL.
///
/// Lookups never fail: an absent URL, an unreachable image or an
/// undecodable one all yield `None`.
#[async_trait]
pub trait DimensionLookupPort: Send + Sync {
    /// Returns the size of the image at `url`, if it can be determined.
    async fn measure(&self, url: Option<&str>) -> Option<ImageSize>;
}
