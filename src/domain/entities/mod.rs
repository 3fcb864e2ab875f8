//! Domain entity definitions.

mod dimensions;
mod metadata;

pub use dimensions::{Dimensions, ImageSize};
pub use metadata::{BlogMeta, ImageRef, Metadata, Slot};
