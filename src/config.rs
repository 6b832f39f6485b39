use crate::domain::VersionBump;
use crate::error::{ReleaseError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// File name looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "gitrelease.toml";

/// File name looked up in the user configuration directory.
pub const USER_CONFIG_FILE_NAME: &str = ".gitrelease.toml";

/// Represents the complete configuration for git-release.
///
/// Contains the commit type mapping and the release workflow settings.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub conventional_commits: ConventionalCommitsConfig,

    #[serde(default)]
    pub release: ReleaseConfig,
}

/// One entry of the commit type mapping, e.g. `{ token = "feat", level = "minor" }`.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct TypeRule {
    pub token: String,
    pub level: VersionBump,
}

impl TypeRule {
    pub fn new(token: impl Into<String>, level: VersionBump) -> Self {
        TypeRule {
            token: token.into(),
            level,
        }
    }
}

/// Returns the default commit type mapping.
fn default_commit_types() -> Vec<TypeRule> {
    vec![
        TypeRule::new("feat", VersionBump::Minor),
        TypeRule::new("fix", VersionBump::Patch),
    ]
}

/// Configuration for conventional commit analysis.
///
/// `types` is ordered; the first token that matches a message wins.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ConventionalCommitsConfig {
    #[serde(default = "default_commit_types")]
    pub types: Vec<TypeRule>,
}

impl Default for ConventionalCommitsConfig {
    fn default() -> Self {
        ConventionalCommitsConfig {
            types: default_commit_types(),
        }
    }
}

fn default_manifest() -> PathBuf {
    PathBuf::from("package.json")
}

fn default_remote() -> String {
    "origin".to_string()
}

fn default_commit_message() -> String {
    "Release v{version}".to_string()
}

/// Settings for the release commit, tag and push.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ReleaseConfig {
    /// Manifest holding the project version
    #[serde(default = "default_manifest")]
    pub manifest: PathBuf,

    /// Remote to fetch from and push to
    #[serde(default = "default_remote")]
    pub remote: String,

    /// Release commit message; `{version}` is replaced with the new version
    #[serde(default = "default_commit_message")]
    pub commit_message: String,
}

impl Default for ReleaseConfig {
    fn default() -> Self {
        ReleaseConfig {
            manifest: default_manifest(),
            remote: default_remote(),
            commit_message: default_commit_message(),
        }
    }
}

impl ReleaseConfig {
    /// Commit message for a release of `version`
    pub fn commit_message_for(&self, version: &str) -> String {
        self.commit_message.replace("{version}", version)
    }
}

impl Config {
    /// Reject configurations the workflow cannot act on.
    pub fn validate(&self) -> Result<()> {
        if self.conventional_commits.types.is_empty() {
            return Err(ReleaseError::config(
                "conventional_commits.types must declare at least one type",
            ));
        }
        for rule in &self.conventional_commits.types {
            if rule.token.is_empty() || rule.token.chars().any(char::is_whitespace) {
                return Err(ReleaseError::config(format!(
                    "invalid commit type token '{}'",
                    rule.token
                )));
            }
        }
        if self.release.remote.trim().is_empty() {
            return Err(ReleaseError::config("release.remote must not be empty"));
        }
        Ok(())
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `gitrelease.toml` in current directory
/// 3. `.gitrelease.toml` in the user config directory
/// 4. Default configuration if no file found
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If a file exists but cannot be read, parsed or validated
pub fn load_config(config_path: Option<&Path>) -> Result<Config> {
    let path = match config_path {
        Some(path) => Some(path.to_path_buf()),
        None => discover_config_file(),
    };

    let config = match path {
        Some(path) => {
            tracing::debug!(path = %path.display(), "loading configuration");
            let content = fs::read_to_string(&path).map_err(|e| {
                ReleaseError::config(format!("cannot read {}: {}", path.display(), e))
            })?;
            toml::from_str::<Config>(&content)?
        }
        None => {
            tracing::debug!("no configuration file found, using defaults");
            Config::default()
        }
    };

    config.validate()?;
    Ok(config)
}

fn discover_config_file() -> Option<PathBuf> {
    let local = Path::new(".").join(CONFIG_FILE_NAME);
    if local.exists() {
        return Some(local);
    }

    let user = dirs::config_dir()?.join(USER_CONFIG_FILE_NAME);
    user.exists().then_some(user)
}
