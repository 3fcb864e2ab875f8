//! Decides which dimensions a site logo may publish.
//!
//! Publisher logos are expected to be small (at most 600x60). Sites often
//! point the logo at a favicon or a large square placeholder instead; the
//! literal size of such an image misrepresents the logo, so a conventional
//! small size is published in its place.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::domain::entities::{Dimensions, ImageSize};

/// Default maximum logo width.
pub const DEFAULT_MAX_WIDTH: u32 = 600;
/// Default maximum logo height.
pub const DEFAULT_MAX_HEIGHT: u32 = 60;
/// Default fallback side length.
pub const DEFAULT_FALLBACK_SIDE: u32 = 60;

/// Limits and fallback used for logos.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogoPolicy {
    /// Widest logo published as-is.
    pub max_width: u32,
    /// Tallest logo published as-is.
    pub max_height: u32,
    /// Width substituted for untrustworthy logos.
    pub fallback_width: u32,
    /// Height substituted for untrustworthy logos.
    pub fallback_height: u32,
}

impl Default for LogoPolicy {
    fn default() -> Self {
        Self {
            max_width: DEFAULT_MAX_WIDTH,
            max_height: DEFAULT_MAX_HEIGHT,
            fallback_width: DEFAULT_FALLBACK_SIDE,
            fallback_height: DEFAULT_FALLBACK_SIDE,
        }
    }
}

/// Outcome of applying the policy to a probed logo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogoDecision {
    /// Probed size is published unchanged.
    Probed(Dimensions),
    /// Oversized icon; fallback published instead.
    IconFallback(Dimensions),
    /// Oversized square image; fallback published instead.
    SquareFallback(Dimensions),
}

impl LogoDecision {
    /// Dimensions to publish.
    #[must_use]
    pub const fn dimensions(self) -> Dimensions {
        match self {
            Self::Probed(d) | Self::IconFallback(d) | Self::SquareFallback(d) => d,
        }
    }

    /// Returns true if the probed size was replaced.
    #[must_use]
    pub const fn is_fallback(self) -> bool {
        !matches!(self, Self::Probed(_))
    }
}

impl LogoPolicy {
    /// Fallback dimensions.
    #[must_use]
    pub const fn fallback(&self) -> Dimensions {
        Dimensions::new(self.fallback_width, self.fallback_height)
    }

    /// Applies the policy to a logo at `url` probed as `size`.
    ///
    /// Icon detection looks at the URL's extension, not at the decoded
    /// format reported by the probe.
    #[must_use]
    pub fn decide(&self, url: &str, size: &ImageSize) -> LogoDecision {
        let probed = size.dimensions();
        if !probed.exceeds(self.max_width, self.max_height) {
            return LogoDecision::Probed(probed);
        }
        if is_icon_url(url) {
            return LogoDecision::IconFallback(self.fallback());
        }
        if probed.is_square() {
            return LogoDecision::SquareFallback(self.fallback());
        }
        LogoDecision::Probed(probed)
    }
}

/// Returns true if the URL's path ends in `.ico`, ignoring case, query and
/// fragment. Strings that do not parse as absolute URLs are checked as-is.
#[must_use]
pub fn is_icon_url(url: &str) -> bool {
    match Url::parse(url) {
        Ok(parsed) => has_icon_extension(parsed.path()),
        Err(_) => has_icon_extension(url.split(['?', '#']).next().unwrap_or(url)),
    }
}

fn has_icon_extension(path: &str) -> bool {
    path.len() >= 4
        && path
            .get(path.len() - 4..)
            .is_some_and(|ext| ext.eq_ignore_ascii_case(".ico"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    const ICO: &str = "http://mysite.com/author/image/url/favicon.ico";
    const PNG: &str = "http://mysite.com/author/image/url/favicon.png";
    const JPG: &str = "http://mysite.com/author/image/url/logo.jpg";

    #[test_case(JPG, 50, 50, 50, 50 ; "small_square_kept")]
    #[test_case(JPG, 600, 60, 600, 60 ; "exact_limits_kept")]
    #[test_case(ICO, 48, 48, 48, 48 ; "small_icon_kept")]
    #[test_case(ICO, 480, 480, 60, 60 ; "oversized_icon_replaced")]
    #[test_case(ICO, 128, 64, 60, 60 ; "oversized_non_square_icon_replaced")]
    #[test_case(PNG, 480, 480, 60, 60 ; "oversized_square_replaced")]
    #[test_case(JPG, 80, 480, 80, 480 ; "oversized_non_square_kept")]
    #[test_case(JPG, 1200, 300, 1200, 300 ; "wide_banner_kept")]
    fn test_decide(url: &str, width: u32, height: u32, out_w: u32, out_h: u32) {
        let policy = LogoPolicy::default();
        let decision = policy.decide(url, &ImageSize::new(width, height, "jpg"));
        assert_eq!(decision.dimensions(), Dimensions::new(out_w, out_h));
    }

    #[test]
    fn test_icon_detection_ignores_probed_format() {
        let policy = LogoPolicy::default();
        let decision = policy.decide(PNG, &ImageSize::new(480, 240, "ico"));
        assert_eq!(decision, LogoDecision::Probed(Dimensions::new(480, 240)));
    }

    #[test]
    fn test_decision_kind() {
        let policy = LogoPolicy::default();
        assert!(matches!(
            policy.decide(ICO, &ImageSize::new(480, 480, "ico")),
            LogoDecision::IconFallback(_)
        ));
        assert!(matches!(
            policy.decide(PNG, &ImageSize::new(480, 480, "png")),
            LogoDecision::SquareFallback(_)
        ));
        assert!(!policy.decide(JPG, &ImageSize::new(80, 480, "jpg")).is_fallback());
    }

    #[test]
    fn test_custom_fallback() {
        let policy = LogoPolicy {
            fallback_width: 32,
            fallback_height: 32,
            ..LogoPolicy::default()
        };
        let decision = policy.decide(PNG, &ImageSize::new(512, 512, "png"));
        assert_eq!(decision.dimensions(), Dimensions::new(32, 32));
    }

    #[test_case("http://a.com/favicon.ico", true ; "plain")]
    #[test_case("http://a.com/FAVICON.ICO", true ; "upper_case")]
    #[test_case("http://a.com/favicon.ico?v=2", true ; "query")]
    #[test_case("http://a.com/favicon.ico#x", true ; "fragment")]
    #[test_case("http://a.com/favicon.png", false ; "png")]
    #[test_case("http://a.com/ico", false ; "no_dot")]
    #[test_case("ico", false ; "short")]
    #[test_case("//cdn.a.com/favicon.ico?v=1", true ; "protocol_relative")]
    #[test_case("http://a.com/favicon.ico/logo.png", false ; "ico_directory")]
    #[test_case("http://a.com/logo.png?file=favicon.ico", false ; "ico_in_query")]
    fn test_is_icon_url(url: &str, expected: bool) {
        assert_eq!(is_icon_url(url), expected);
    }
}
