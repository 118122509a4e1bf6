//! Platform flavor and detection

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PlatformError;

/// Rendering flavor selected for platform-conditional components
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// Apple platforms: iOS-style markup, opacity-based press feedback
    Ios,
    /// Everything else: base markup, ripple press feedback
    #[default]
    Base,
}

impl Platform {
    /// Stable id used in class names and config
    pub fn id(self) -> &'static str {
        match self {
            Self::Ios => "ios",
            Self::Base => "base",
        }
    }

    pub fn is_ios(self) -> bool {
        self == Self::Ios
    }

    /// Map a Telegram WebApp platform name to a rendering flavor
    ///
    /// Telegram reports `ios` and `macos` for its Apple clients; every other
    /// client (`android`, `tdesktop`, `weba`, `unknown`, ...) renders `base`.
    pub fn from_host_platform(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "ios" | "macos" => Self::Ios,
            _ => Self::Base,
        }
    }

    /// Detect the flavor from a browser user agent string
    pub fn detect_from_user_agent(user_agent: &str) -> Self {
        let ua = user_agent.to_ascii_lowercase();
        let apple = ["iphone", "ipad", "ipod", "macintosh", "mac os x"];
        if apple.iter().any(|marker| ua.contains(marker)) {
            Self::Ios
        } else {
            Self::Base
        }
    }
}

impl Display for Platform {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Platform {
    type Err = PlatformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ios" => Ok(Self::Ios),
            "base" => Ok(Self::Base),
            _ => Err(PlatformError::UnknownPlatform(s.to_string())),
        }
    }
}
