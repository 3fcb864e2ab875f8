//! Image probing infrastructure.
//!
//! This module provides:
//! - A per-URL probe result cache that collapses concurrent lookups
//! - The default probe reading image headers over HTTP or from disk

pub mod probe_cache;
pub mod url_probe;

pub use probe_cache::{CacheStats, ProbeCache};
pub use url_probe::{ImageLocation, ProbeConfig, UrlImageProbe, read_size};
