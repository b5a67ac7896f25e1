//! Target platform identifiers.
//!
//! The identifiers match the host engine's platform names so that a
//! declaration written for the engine build rules reads the same here.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TargetError;

/// A build target platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum TargetPlatform {
    /// 64-bit Linux.
    Linux,
    /// macOS (universal).
    Mac,
    /// 64-bit Windows.
    Win64,
}

impl TargetPlatform {
    /// Every supported platform, in canonical order.
    pub const ALL: [TargetPlatform; 3] = [Self::Linux, Self::Mac, Self::Win64];

    /// Canonical identifier, as written in declarations and plans.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Linux => "Linux",
            Self::Mac => "Mac",
            Self::Win64 => "Win64",
        }
    }

    /// File extension of a static library on this platform.
    pub fn static_lib_extension(self) -> &'static str {
        match self {
            Self::Linux | Self::Mac => "a",
            Self::Win64 => "lib",
        }
    }

    /// Platform of the machine running this build, if supported.
    pub fn host() -> Option<Self> {
        if cfg!(target_os = "linux") {
            Some(Self::Linux)
        } else if cfg!(target_os = "macos") {
            Some(Self::Mac)
        } else if cfg!(all(target_os = "windows", target_pointer_width = "64")) {
            Some(Self::Win64)
        } else {
            None
        }
    }
}

impl fmt::Display for TargetPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TargetPlatform {
    type Err = TargetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "linux" => Ok(Self::Linux),
            "mac" | "macos" | "osx" => Ok(Self::Mac),
            "win64" | "windows" => Ok(Self::Win64),
            _ => Err(TargetError::UnknownPlatform {
                name: s.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for TargetPlatform {
    type Error = TargetError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_canonical_names() {
        for platform in TargetPlatform::ALL {
            assert_eq!(platform.as_str().parse::<TargetPlatform>().unwrap(), platform);
        }
    }

    #[test]
    fn parse_aliases() {
        assert_eq!("macos".parse::<TargetPlatform>().unwrap(), TargetPlatform::Mac);
        assert_eq!("OSX".parse::<TargetPlatform>().unwrap(), TargetPlatform::Mac);
        assert_eq!("windows".parse::<TargetPlatform>().unwrap(), TargetPlatform::Win64);
        assert_eq!(" linux ".parse::<TargetPlatform>().unwrap(), TargetPlatform::Linux);
    }

    #[test]
    fn reject_unknown_platform() {
        let err = "ps5".parse::<TargetPlatform>().unwrap_err();
        assert_eq!(
            err,
            TargetError::UnknownPlatform {
                name: "ps5".to_string()
            }
        );
    }

    #[test]
    fn serde_uses_canonical_names() {
        let json = serde_json::to_string(&TargetPlatform::Win64).unwrap();
        assert_eq!(json, "\"Win64\"");
        let parsed: TargetPlatform = serde_json::from_str("\"windows\"").unwrap();
        assert_eq!(parsed, TargetPlatform::Win64);
    }

    #[test]
    fn static_lib_extensions() {
        assert_eq!(TargetPlatform::Linux.static_lib_extension(), "a");
        assert_eq!(TargetPlatform::Mac.static_lib_extension(), "a");
        assert_eq!(TargetPlatform::Win64.static_lib_extension(), "lib");
    }

    #[test]
    fn host_is_supported_on_ci_platforms() {
        if cfg!(any(target_os = "linux", target_os = "macos")) {
            assert!(TargetPlatform::host().is_some());
        }
    }
}
