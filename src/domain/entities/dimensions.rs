//! Pixel dimension types.

use serde::{Deserialize, Serialize};

/// Width and height of an image in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dimensions {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Dimensions {
    /// Creates new dimensions.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Returns true if width equals height.
    #[must_use]
    pub const fn is_square(&self) -> bool {
        self.width == self.height
    }

    /// Returns true if either side exceeds the given limits.
    #[must_use]
    pub const fn exceeds(&self, max_width: u32, max_height: u32) -> bool {
        self.width > max_width || self.height > max_height
    }
}

impl std::fmt::Display for Dimensions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Result of probing an image: its dimensions and short format name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageSize {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Short format name, e.g. `png`, `jpg`, `ico`.
    pub format: String,
}

impl ImageSize {
    /// Creates a new probe result.
    #[must_use]
    pub fn new(width: u32, height: u32, format: impl Into<String>) -> Self {
        Self {
            width,
            height,
            format: format.into(),
        }
    }

    /// Returns the dimensions part of the result.
    #[must_use]
    pub const fn dimensions(&self) -> Dimensions {
        Dimensions::new(self.width, self.height)
    }

    /// A result is usable when both sides are non-zero.
    #[must_use]
    pub const fn is_usable(&self) -> bool {
        self.width > 0 && self.height > 0
    }
}
