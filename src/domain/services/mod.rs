//! Domain services.

mod logo_policy;

pub use logo_policy::{LogoDecision, LogoPolicy, is_icon_url};
