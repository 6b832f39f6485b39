use std::fmt;
use std::path::PathBuf;

/// Non-fatal conditions met at the edges of the release workflow.
/// These are reported to the user; the workflow decides whether to go on.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundaryWarning {
    /// Nothing was committed since the last release tag
    NoNewCommits { latest_tag: Option<String> },
    /// No release tag in history; the manifest supplies the baseline
    NoReleaseTag { manifest: PathBuf, version: String },
    /// Fetch operation failed due to authentication issues
    FetchAuthenticationFailed { remote: String },
    /// Fetch failed for another reason
    FetchFailed { remote: String, reason: String },
}

impl BoundaryWarning {
    /// Classify a fetch failure message.
    pub fn from_fetch_error(remote: &str, error: &str) -> Self {
        let lowered = error.to_lowercase();
        if lowered.contains("auth") || lowered.contains("permission") || lowered.contains("credential")
        {
            BoundaryWarning::FetchAuthenticationFailed {
                remote: remote.to_string(),
            }
        } else {
            BoundaryWarning::FetchFailed {
                remote: remote.to_string(),
                reason: error.to_string(),
            }
        }
    }
}

impl fmt::Display for BoundaryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundaryWarning::NoNewCommits { latest_tag } => match latest_tag {
                Some(tag) => write!(f, "No new commits since tag '{}'", tag),
                None => write!(f, "No commits in history"),
            },
            BoundaryWarning::NoReleaseTag { manifest, version } => write!(
                f,
                "No release tag found, using version {} from {}",
                version,
                manifest.display()
            ),
            BoundaryWarning::FetchAuthenticationFailed { remote } => write!(
                f,
                "Authentication failed when fetching from remote '{}'",
                remote
            ),
            BoundaryWarning::FetchFailed { remote, reason } => write!(
                f,
                "Could not fetch from remote '{}': {}. Using local data",
                remote, reason
            ),
        }
    }
}
