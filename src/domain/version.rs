use crate::error::{ReleaseError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Semantic version representation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

impl Version {
    /// Create a new version
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Version {
            major,
            minor,
            patch,
        }
    }

    /// Parse a bare `major.minor.patch` string such as a manifest's version.
    ///
    /// Surrounding whitespace is ignored. Every component must be a
    /// non-negative integer; prefixes, pre-release and build suffixes are
    /// rejected.
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        let parts: Vec<&str> = trimmed.split('.').collect();
        if parts.len() != 3 {
            return Err(ReleaseError::invalid_version(
                input,
                "expected three components (major.minor.patch)",
            ));
        }

        let component = |name: &str, raw: &str| -> Result<u64> {
            if raw.is_empty() || !raw.chars().all(|c| c.is_ascii_digit()) {
                return Err(ReleaseError::invalid_version(
                    input,
                    format!("{} component '{}' is not a non-negative integer", name, raw),
                ));
            }
            raw.parse::<u64>().map_err(|_| {
                ReleaseError::invalid_version(
                    input,
                    format!("{} component '{}' is out of range", name, raw),
                )
            })
        };

        Ok(Version {
            major: component("major", parts[0])?,
            minor: component("minor", parts[1])?,
            patch: component("patch", parts[2])?,
        })
    }

    /// Bump version according to bump type
    ///
    /// Fails with `InvalidVersion` when the bumped component is already
    /// `u64::MAX`.
    pub fn bump(&self, bump_type: VersionBump) -> Result<Self> {
        let overflow = |name: &str| {
            ReleaseError::invalid_version(
                self.to_string(),
                format!("{} component overflows when bumped", name),
            )
        };

        Ok(match bump_type {
            VersionBump::Major => Version {
                major: self.major.checked_add(1).ok_or_else(|| overflow("major"))?,
                minor: 0,
                patch: 0,
            },
            VersionBump::Minor => Version {
                major: self.major,
                minor: self.minor.checked_add(1).ok_or_else(|| overflow("minor"))?,
                patch: 0,
            },
            VersionBump::Patch => Version {
                major: self.major,
                minor: self.minor,
                patch: self.patch.checked_add(1).ok_or_else(|| overflow("patch"))?,
            },
        })
    }
}

impl FromStr for Version {
    type Err = ReleaseError;

    fn from_str(s: &str) -> Result<Self> {
        Version::parse(s)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Release significance of a change, ordered `Patch < Minor < Major`.
///
/// The overall bump of a release is the maximum over its commits.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum VersionBump {
    #[default]
    Patch = 0,
    Minor = 1,
    Major = 2,
}

impl VersionBump {
    /// Numeric level: 0 for patch, 1 for minor, 2 for major.
    pub fn level(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for VersionBump {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionBump::Patch => write!(f, "PATCH"),
            VersionBump::Minor => write!(f, "MINOR"),
            VersionBump::Major => write!(f, "MAJOR"),
        }
    }
}
