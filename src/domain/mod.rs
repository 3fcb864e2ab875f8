//! Domain layer with core entities, services and port definitions.

/// Entity definitions.
pub mod entities;
/// Error types.
pub mod errors;
/// Port definitions.
pub mod ports;
/// Domain services.
pub mod services;

pub use entities::{Dimensions, ImageRef, ImageSize, Metadata, Slot};
pub use errors::{MetadataError, ProbeError};
pub use ports::{DimensionLookupPort, ImageProbePort};
pub use services::LogoPolicy;
