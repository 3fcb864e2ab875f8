//! Domain error types.

mod metadata_error;
mod probe_error;

pub use metadata_error::MetadataError;
pub use probe_error::ProbeError;
