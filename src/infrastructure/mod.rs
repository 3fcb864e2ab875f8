//! Infrastructure layer with external service adapters.

/// Application configuration.
pub mod config;
/// Image probing and probe result caching.
pub mod image;

pub use config::{AppConfig, CliArgs, ConfigError, ConfigLoader, LogLevel};
pub use image::{CacheStats, ProbeCache, ProbeConfig, UrlImageProbe};
