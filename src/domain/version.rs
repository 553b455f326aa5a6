// Copyright (c) 2025 - Cowboy AI, Inc.
//! Image Version Value Object with Total Ordering
//!
//! A version consists of a major, minor and patch number plus an
//! optional pre-release string (`MAJOR.MINOR.PATCH[-PRERELEASE]`).
//!
//! # Ordering
//!
//! The ordering is the sole input to promotion and rollback scope
//! selection, so it is defined precisely:
//!
//! 1. Major, minor and patch compare numerically, in that order.
//! 2. At equal `major.minor.patch`, a stable version (no pre-release)
//!    sorts strictly **above** any pre-release.
//! 3. Two pre-releases at equal `major.minor.patch` compare
//!    lexicographically (byte order).
//!
//! `1.2.3-rc1 < 1.2.3` and `1.2.3 < 1.2.4` both hold.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Version parse error
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VersionParseError {
    #[error("invalid version string: {0}")]
    Malformed(String),

    #[error("invalid version number in {0}")]
    InvalidNumber(String),
}

/// Version of an image or a package shipped with an image
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageVersion {
    /// Major version number
    pub major: u32,

    /// Minor version number
    pub minor: u32,

    /// Patch level
    pub patch: u32,

    /// Optional pre-release string; `None` denotes a stable release
    pub prerelease: Option<String>,
}

impl ImageVersion {
    /// Create a stable version
    pub fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
            prerelease: None,
        }
    }

    /// Create a pre-release version
    pub fn prerelease(
        major: u32,
        minor: u32,
        patch: u32,
        prerelease: impl Into<String>,
    ) -> Self {
        Self {
            major,
            minor,
            patch,
            prerelease: Some(prerelease.into()),
        }
    }

    /// Whether this is a stable release (no pre-release tag)
    pub fn is_stable(&self) -> bool {
        self.prerelease.is_none()
    }
}

impl Ord for ImageVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.major
            .cmp(&other.major)
            .then_with(|| self.minor.cmp(&other.minor))
            .then_with(|| self.patch.cmp(&other.patch))
            .then_with(|| match (&self.prerelease, &other.prerelease) {
                (None, None) => Ordering::Equal,
                // Stable sorts above any pre-release.
                (None, Some(_)) => Ordering::Greater,
                (Some(_), None) => Ordering::Less,
                (Some(a), Some(b)) => a.cmp(b),
            })
    }
}

impl PartialOrd for ImageVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for ImageVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.prerelease {
            Some(prerelease) => write!(
                f,
                "{}.{}.{}-{}",
                self.major, self.minor, self.patch, prerelease
            ),
            None => write!(f, "{}.{}.{}", self.major, self.minor, self.patch),
        }
    }
}

impl FromStr for ImageVersion {
    type Err = VersionParseError;

    /// Parse `MAJOR.MINOR.PATCH` or `MAJOR.MINOR.PATCH-PRERELEASE`.
    ///
    /// The pre-release part is any non-empty run of graphic (printable,
    /// non-whitespace) characters after the first hyphen.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || VersionParseError::Malformed(s.to_string());

        let (triple, prerelease) = match s.split_once('-') {
            Some((triple, prerelease)) => {
                if prerelease.is_empty() || !prerelease.chars().all(|c| c.is_ascii_graphic()) {
                    return Err(malformed());
                }
                (triple, Some(prerelease.to_string()))
            }
            None => (s, None),
        };

        let mut numbers = triple.split('.');
        let mut next_number = || -> Result<u32, VersionParseError> {
            let part = numbers.next().ok_or_else(malformed)?;
            if part.is_empty() || !part.chars().all(|c| c.is_ascii_digit()) {
                return Err(malformed());
            }
            part.parse()
                .map_err(|_| VersionParseError::InvalidNumber(s.to_string()))
        };

        let major = next_number()?;
        let minor = next_number()?;
        let patch = next_number()?;
        if numbers.next().is_some() {
            return Err(malformed());
        }

        Ok(Self {
            major,
            minor,
            patch,
            prerelease,
        })
    }
}

/// Classification of the step between an installed version and an
/// available newer version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpgradeType {
    Major,
    Minor,
    Patch,
    Prerelease,
}

impl UpgradeType {
    /// Classify the upgrade from `installed` to `available` by the first
    /// version component that differs.
    pub fn classify(installed: &ImageVersion, available: &ImageVersion) -> Self {
        if available.major != installed.major {
            UpgradeType::Major
        } else if available.minor != installed.minor {
            UpgradeType::Minor
        } else if available.patch != installed.patch {
            UpgradeType::Patch
        } else {
            UpgradeType::Prerelease
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> ImageVersion {
        s.parse().unwrap()
    }

    #[test]
    fn test_numeric_ordering() {
        assert!(v("1.2.3") < v("1.2.4"));
        assert!(v("1.2.3") < v("1.3.0"));
        assert!(v("1.9.9") < v("2.0.0"));
        assert_eq!(v("1.2.3"), v("1.2.3"));
    }

    #[test]
    fn test_stable_sorts_above_prerelease() {
        assert!(v("1.2.3-rc1") < v("1.2.3"));
        assert!(v("1.2.3") > v("1.2.3-zzz"));
        // But a prerelease of a higher patch still wins.
        assert!(v("1.2.3") < v("1.2.4-rc1"));
    }

    #[test]
    fn test_prereleases_compare_lexicographically() {
        assert!(v("1.2.3-rc1") < v("1.2.3-rc2"));
        assert!(v("2.1.0-RC0") < v("2.1.0-RC1"));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("1.2".parse::<ImageVersion>().is_err());
        assert!("1.2.3.4".parse::<ImageVersion>().is_err());
        assert!("1.2.x".parse::<ImageVersion>().is_err());
        assert!("1.2.3-".parse::<ImageVersion>().is_err());
        assert!("".parse::<ImageVersion>().is_err());
    }

    #[test]
    fn test_display_roundtrip() {
        for s in ["1.0.0", "1.1.0", "1.0.1", "2.1.0-RC0"] {
            assert_eq!(v(s).to_string(), s);
        }
    }

    #[test]
    fn test_upgrade_classification() {
        assert_eq!(
            UpgradeType::classify(&v("1.0.0"), &v("2.1.0")),
            UpgradeType::Major
        );
        assert_eq!(
            UpgradeType::classify(&v("1.0.0"), &v("1.1.0")),
            UpgradeType::Minor
        );
        assert_eq!(
            UpgradeType::classify(&v("1.0.0"), &v("1.0.1")),
            UpgradeType::Patch
        );
        assert_eq!(
            UpgradeType::classify(&v("1.0.0-rc1"), &v("1.0.0")),
            UpgradeType::Prerelease
        );
    }
}
