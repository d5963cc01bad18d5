//! The login record: one byte on the INPUT channel right after connect.

use std::fmt;
use std::str::FromStr;

/// Client profile announced at login. The server lays out UI and input
/// handling differently for touch devices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Platform {
    Desktop = 0,
    Mobile = 1,
}

impl Platform {
    /// Platform of the build target: mobile on Android and iOS.
    pub fn detect() -> Self {
        if cfg!(any(target_os = "android", target_os = "ios")) {
            Platform::Mobile
        } else {
            Platform::Desktop
        }
    }

    /// The one-byte login record for this platform.
    pub fn login_record(self) -> [u8; 1] {
        [self as u8]
    }

    pub fn name(self) -> &'static str {
        match self {
            Platform::Desktop => "desktop",
            Platform::Mobile => "mobile",
        }
    }
}

impl Default for Platform {
    fn default() -> Self {
        Self::detect()
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "desktop" => Ok(Platform::Desktop),
            "mobile" => Ok(Platform::Mobile),
            other => Err(format!(
                "unknown platform '{other}' (expected desktop or mobile)"
            )),
        }
    }
}
