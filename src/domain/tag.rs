use crate::domain::Version;
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

/// `v<major>.<minor>.<patch>`, anchored at both ends.
static RELEASE_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^v(\d+)\.(\d+)\.(\d+)$").expect("valid release tag regex"));

/// A tag marking a prior release
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseTag {
    pub name: String,
    pub version: Version,
}

impl ReleaseTag {
    /// Parse a tag name as a release tag.
    ///
    /// Returns `None` for names that do not have the release shape, and for
    /// names that do but whose components overflow. Neither case is an error:
    /// callers keep scanning.
    pub fn parse(name: &str) -> Option<Self> {
        let captures = RELEASE_TAG.captures(name)?;
        let component = |i: usize| captures.get(i)?.as_str().parse::<u64>().ok();

        match (component(1), component(2), component(3)) {
            (Some(major), Some(minor), Some(patch)) => Some(ReleaseTag {
                name: name.to_string(),
                version: Version::new(major, minor, patch),
            }),
            _ => {
                tracing::debug!(tag = name, "skipping malformed release tag");
                None
            }
        }
    }

    /// Tag name for a version (e.g., 1.2.3 -> "v1.2.3")
    pub fn for_version(version: &Version) -> Self {
        ReleaseTag {
            name: format!("v{}", version),
            version: *version,
        }
    }
}

impl fmt::Display for ReleaseTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
