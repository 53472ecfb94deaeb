// Tue Jan 13 2026 - Alex

use crate::memory::Endianness;
use crate::profile::Version;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

static LINUX_BANNER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"Linux version (\d+)\.(\d+)(?:\.(\d+))?").expect("static banner pattern")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OsFamily {
    Linux,
    Windows,
    Mac,
    Unknown,
}

impl OsFamily {
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "linux" => Self::Linux,
            "windows" => Self::Windows,
            "mac" | "darwin" | "macos" => Self::Mac,
            _ => Self::Unknown,
        }
    }
}

impl fmt::Display for OsFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Linux => write!(f, "linux"),
            Self::Windows => write!(f, "windows"),
            Self::Mac => write!(f, "mac"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// Memory model of the captured system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Architecture {
    #[serde(rename = "32bit")]
    X86,
    #[serde(rename = "64bit")]
    X64,
}

impl Architecture {
    pub fn pointer_size(self) -> u64 {
        match self {
            Self::X86 => 4,
            Self::X64 => 8,
        }
    }
}

impl fmt::Display for Architecture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::X86 => write!(f, "32bit"),
            Self::X64 => write!(f, "64bit"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileMetadata {
    pub os: OsFamily,
    pub major: u32,
    pub minor: u32,
    /// Third version component (kernel patch level). Zero when unknown.
    #[serde(default)]
    pub revision: u32,
    pub architecture: Architecture,
    #[serde(default)]
    pub endianness: Endianness,
}

impl ProfileMetadata {
    pub fn new(os: OsFamily, major: u32, minor: u32, architecture: Architecture) -> Self {
        Self {
            os,
            major,
            minor,
            revision: 0,
            architecture,
            endianness: Endianness::Little,
        }
    }

    pub fn linux(major: u32, minor: u32, revision: u32, architecture: Architecture) -> Self {
        Self::new(OsFamily::Linux, major, minor, architecture).with_revision(revision)
    }

    pub fn windows(major: u32, minor: u32, architecture: Architecture) -> Self {
        Self::new(OsFamily::Windows, major, minor, architecture)
    }

    /// Builds Linux metadata from a `linux_banner` string as found in memory.
    pub fn from_linux_banner(banner: &str, architecture: Architecture) -> Option<Self> {
        let caps = LINUX_BANNER.captures(banner)?;
        let major = caps.get(1)?.as_str().parse().ok()?;
        let minor = caps.get(2)?.as_str().parse().ok()?;
        let revision = caps
            .get(3)
            .and_then(|m| m.as_str().parse().ok())
            .unwrap_or(0);
        Some(Self::linux(major, minor, revision, architecture))
    }

    pub fn with_revision(mut self, revision: u32) -> Self {
        self.revision = revision;
        self
    }

    pub fn with_endianness(mut self, endianness: Endianness) -> Self {
        self.endianness = endianness;
        self
    }

    pub fn version(&self) -> Version {
        Version::new(self.major, self.minor, self.revision)
    }

    pub fn pointer_size(&self) -> u64 {
        self.architecture.pointer_size()
    }
}

impl fmt::Display for ProfileMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.os, self.version(), self.architecture)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_banner_parsing() {
        let banner = "Linux version 2.6.32-5-amd64 (Debian 2.6.32-48squeeze1) (gcc version 4.3.5)";
        let meta = ProfileMetadata::from_linux_banner(banner, Architecture::X64).unwrap();
        assert_eq!(meta.os, OsFamily::Linux);
        assert_eq!(meta.version(), Version::new(2, 6, 32));
        assert!(ProfileMetadata::from_linux_banner("Darwin Kernel", Architecture::X64).is_none());
    }

    #[test]
    fn test_metadata_json() {
        let meta: ProfileMetadata = serde_json::from_str(
            r#"{"os": "windows", "major": 6, "minor": 1, "architecture": "64bit"}"#,
        )
        .unwrap();
        assert_eq!(meta, ProfileMetadata::windows(6, 1, Architecture::X64));
        assert_eq!(meta.pointer_size(), 8);
    }
}
