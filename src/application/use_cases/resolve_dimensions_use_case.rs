//! Image dimension resolution use case.

use std::sync::Arc;

use futures_util::future::join_all;
use serde_json::Value;
use tracing::{debug, trace};

use crate::domain::entities::{Dimensions, ImageRef, ImageSize, Metadata, Slot};
use crate::domain::errors::MetadataError;
use crate::domain::ports::DimensionLookupPort;
use crate::domain::services::LogoPolicy;

/// Adds `dimensions` to the cover image, author image and site logo of
/// page metadata.
pub struct ResolveDimensionsUseCase {
    lookup: Arc<dyn DimensionLookupPort>,
    logo_policy: LogoPolicy,
}

impl ResolveDimensionsUseCase {
    /// Creates new use case.
    #[must_use]
    pub const fn new(lookup: Arc<dyn DimensionLookupPort>, logo_policy: LogoPolicy) -> Self {
        Self {
            lookup,
            logo_policy,
        }
    }

    /// Creates new use case with the default logo policy.
    #[must_use]
    pub fn with_default_policy(lookup: Arc<dyn DimensionLookupPort>) -> Self {
        Self::new(lookup, LogoPolicy::default())
    }

    /// Resolves dimensions in place.
    ///
    /// Slots that already carry dimensions are left alone. The others are
    /// measured concurrently; a slot whose image cannot be measured is left
    /// without dimensions. URLs are never modified.
    pub async fn resolve(&self, metadata: &mut Metadata) {
        let (cover, author, logo) = tokio::join!(
            self.measure_slot(Slot::CoverImage, metadata.slot(Slot::CoverImage)),
            self.measure_slot(Slot::AuthorImage, metadata.slot(Slot::AuthorImage)),
            self.measure_slot(Slot::Logo, metadata.slot(Slot::Logo)),
        );

        let measured = [
            (Slot::CoverImage, cover),
            (Slot::AuthorImage, author),
            (Slot::Logo, logo),
        ];
        for (slot, size) in measured {
            let Some(size) = size else { continue };
            let image = metadata.slot_mut(slot);
            let dimensions = match slot {
                Slot::Logo => self.logo_dimensions(image.url().unwrap_or_default(), &size),
                Slot::CoverImage | Slot::AuthorImage => size.dimensions(),
            };
            image.dimensions = Some(dimensions);
        }
    }

    /// Resolves dimensions and returns the metadata.
    pub async fn execute(&self, mut metadata: Metadata) -> Metadata {
        self.resolve(&mut metadata).await;
        metadata
    }

    /// Resolves dimensions of metadata given as JSON.
    ///
    /// Fields other than the image slots pass through untouched.
    ///
    /// # Errors
    /// Returns error if the value lacks the `coverImage`, `authorImage` or
    /// `blog.logo` objects, or if a slot is malformed. Nothing is probed in
    /// that case.
    pub async fn resolve_json(&self, value: Value) -> Result<Value, MetadataError> {
        check_shape(&value)?;
        let metadata: Metadata = serde_json::from_value(value)?;
        let resolved = self.execute(metadata).await;
        Ok(serde_json::to_value(resolved)?)
    }

    /// Resolves several JSON documents concurrently against the shared
    /// lookup. Each document succeeds or fails on its own; results keep the
    /// input order.
    pub async fn resolve_json_all<I>(&self, values: I) -> Vec<Result<Value, MetadataError>>
    where
        I: IntoIterator<Item = Value>,
    {
        join_all(values.into_iter().map(|value| self.resolve_json(value))).await
    }

    fn logo_dimensions(&self, url: &str, size: &ImageSize) -> Dimensions {
        let decision = self.logo_policy.decide(url, size);
        if decision.is_fallback() {
            debug!(
                probed_width = size.width,
                probed_height = size.height,
                ?decision,
                "Replacing unsuitable logo dimensions"
            );
        }
        decision.dimensions()
    }

    async fn measure_slot(&self, slot: Slot, image: &ImageRef) -> Option<ImageSize> {
        if image.has_dimensions() {
            trace!(slot = %slot, "Dimensions already set, not probing");
            return None;
        }
        let size = self.lookup.measure(image.url()).await;
        if size.is_none() {
            trace!(slot = %slot, url = ?image.url(), "No dimensions found");
        }
        size
    }
}

/// Checks that every slot is present as an object with a string or null `url`.
fn check_shape(value: &Value) -> Result<(), MetadataError> {
    let root = value.as_object().ok_or(MetadataError::NotAnObject)?;

    for slot in Slot::ALL {
        let image = match slot {
            Slot::CoverImage => root.get("coverImage"),
            Slot::AuthorImage => root.get("authorImage"),
            Slot::Logo => {
                let blog = root
                    .get("blog")
                    .ok_or(MetadataError::MissingSlot { path: "blog" })?;
                let blog = blog
                    .as_object()
                    .ok_or(MetadataError::InvalidSlot { path: "blog" })?;
                blog.get("logo")
            }
        };

        let image = image.ok_or(MetadataError::MissingSlot { path: slot.path() })?;
        let url_ok = image
            .as_object()
            .is_some_and(|obj| obj.get("url").is_none_or(|u| u.is_string() || u.is_null()));
        if !url_ok {
            return Err(MetadataError::InvalidSlot { path: slot.path() });
        }
    }

    Ok(())
}
