//! metadims - resolves image dimensions for page metadata.
//!
//! This crate annotates the cover image, author image and site logo of page
//! metadata with their pixel dimensions, probing each URL at most once and
//! guarding against logos whose literal size would be misleading.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

/// Application layer containing use cases.
pub mod application;
/// Domain layer containing entities, errors, services and port definitions.
pub mod domain;
/// Infrastructure layer containing adapters and configuration.
pub mod infrastructure;

/// Current version of the application.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name.
pub const NAME: &str = "metadims";
