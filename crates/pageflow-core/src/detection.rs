//! Device class detection
//!
//! Touch gestures only drive the scroll engine on phone-class devices; tablets
//! and desktops keep native pointer behavior.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

static PHONE_UA: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)iphone|ipod|android.*mobile|windows phone|iemobile|blackberry|opera mini")
        .expect("phone user agent pattern is valid")
});

static TABLET_UA: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)ipad|android|tablet|kindle|silk").expect("tablet user agent pattern is valid")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceClass {
    Phone,
    Tablet,
    Desktop,
}

impl DeviceClass {
    /// Classify a user agent string
    pub fn from_user_agent(user_agent: &str) -> Self {
        if PHONE_UA.is_match(user_agent) {
            DeviceClass::Phone
        } else if TABLET_UA.is_match(user_agent) {
            DeviceClass::Tablet
        } else {
            DeviceClass::Desktop
        }
    }

    #[inline]
    pub fn is_phone(&self) -> bool {
        matches!(self, DeviceClass::Phone)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phone_user_agents() {
        for ua in [
            "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X)",
            "Mozilla/5.0 (Linux; Android 14; Pixel 8) AppleWebKit/537.36 Mobile Safari/537.36",
        ] {
            assert_eq!(DeviceClass::from_user_agent(ua), DeviceClass::Phone, "{ua}");
        }
    }

    #[test]
    fn test_tablet_user_agents() {
        for ua in [
            "Mozilla/5.0 (iPad; CPU OS 17_0 like Mac OS X)",
            "Mozilla/5.0 (Linux; Android 14; SM-X910) AppleWebKit/537.36 Safari/537.36",
        ] {
            assert_eq!(DeviceClass::from_user_agent(ua), DeviceClass::Tablet, "{ua}");
        }
    }

    #[test]
    fn test_desktop_fallback() {
        let ua = "Mozilla/5.0 (X11; Linux x86_64; rv:128.0) Gecko/20100101 Firefox/128.0";
        assert_eq!(DeviceClass::from_user_agent(ua), DeviceClass::Desktop);
        assert!(!DeviceClass::Desktop.is_phone());
    }
}
