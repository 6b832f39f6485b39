use crate::conventional::CommitClassifier;
use crate::domain::{Commit, ReleaseTag, Version, VersionBump};
use crate::error::{ReleaseError, Result};
use std::path::PathBuf;

/// Commits not yet covered by a release, and the release they follow
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedWindow {
    /// Commits newer than the last release tag, newest first
    pub commits: Vec<Commit>,
    /// The tag that bounds the window, if one was found
    pub last_tag: Option<ReleaseTag>,
}

impl ResolvedWindow {
    /// Version of the last release tag, if any
    pub fn last_version(&self) -> Option<Version> {
        self.last_tag.as_ref().map(|tag| tag.version)
    }

    pub fn is_empty(&self) -> bool {
        self.commits.is_empty()
    }
}

/// Where the previous version of a release came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Baseline {
    /// A release tag in history
    Tag(String),
    /// The manifest's declared version, used when history has no release tag
    Manifest(PathBuf),
}

/// Fallback used when history holds no release tag
///
/// The version is kept as declared; it is parsed only when no release tag
/// supplies the baseline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FallbackVersion {
    pub manifest: PathBuf,
    pub version: Option<String>,
}

/// Everything the workflow needs to cut a release
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleasePlan {
    pub commits: Vec<Commit>,
    pub previous: Version,
    pub baseline: Baseline,
    pub bump: VersionBump,
    pub next: Version,
}

impl ReleasePlan {
    /// Tag to create for this release
    pub fn tag(&self) -> ReleaseTag {
        ReleaseTag::for_version(&self.next)
    }
}

/// Determines the unreleased window of a history and the next version
#[derive(Debug, Clone, Default)]
pub struct ReleaseResolver {
    classifier: CommitClassifier,
}

impl ReleaseResolver {
    /// Create a resolver classifying commits with `classifier`
    pub fn new(classifier: CommitClassifier) -> Self {
        ReleaseResolver { classifier }
    }

    pub fn classifier(&self) -> &CommitClassifier {
        &self.classifier
    }

    /// Split a newest-first history at the most recent release tag.
    ///
    /// The scan stops at the first commit with a release tag; that commit is
    /// excluded from the window and its first release tag becomes the
    /// baseline. Without any release tag the whole history is returned and
    /// there is no baseline.
    pub fn resolve_window<'a, I>(&self, history: I) -> ResolvedWindow
    where
        I: IntoIterator<Item = &'a Commit>,
    {
        let mut commits = Vec::new();

        for commit in history {
            if let Some(tag) = commit.tag_refs.iter().find_map(|name| ReleaseTag::parse(name)) {
                tracing::debug!(
                    tag = %tag,
                    unreleased = commits.len(),
                    "found last release tag"
                );
                return ResolvedWindow {
                    commits,
                    last_tag: Some(tag),
                };
            }
            commits.push(commit.clone());
        }

        tracing::debug!(
            commits = commits.len(),
            "no release tag in history, window covers everything"
        );
        ResolvedWindow {
            commits,
            last_tag: None,
        }
    }

    /// Reduce a window to a single bump.
    ///
    /// Non-conventional commits contribute nothing. An empty window, or one
    /// without any conventional commit, yields `Patch`.
    pub fn compute_bump(&self, commits: &[Commit]) -> VersionBump {
        commits
            .iter()
            .filter_map(|commit| self.classifier.classify(&commit.message))
            .max()
            .unwrap_or(VersionBump::Patch)
    }

    /// Resolve, reduce and bump in one pass.
    ///
    /// Returns `Ok(None)` when nothing was committed since the last release.
    /// The fallback is only consulted when history has no release tag.
    pub fn plan(&self, history: &[Commit], fallback: &FallbackVersion) -> Result<Option<ReleasePlan>> {
        let window = self.resolve_window(history);
        if window.is_empty() {
            return Ok(None);
        }

        let (previous, baseline) = match window.last_tag {
            Some(ref tag) => (tag.version, Baseline::Tag(tag.name.clone())),
            None => {
                let declared =
                    fallback
                        .version
                        .as_deref()
                        .ok_or_else(|| ReleaseError::MissingBaseline {
                            manifest: fallback.manifest.clone(),
                        })?;
                (
                    Version::parse(declared)?,
                    Baseline::Manifest(fallback.manifest.clone()),
                )
            }
        };

        let bump = self.compute_bump(&window.commits);
        let next = bump_version(previous, bump)?;
        tracing::info!(%previous, %next, %bump, commits = window.commits.len(), "planned release");

        Ok(Some(ReleasePlan {
            commits: window.commits,
            previous,
            baseline,
            bump,
            next,
        }))
    }
}

/// Bumps a version according to the specified bump type.
///
/// - **Major**: major += 1, minor = 0, patch = 0
/// - **Minor**: minor += 1, patch = 0
/// - **Patch**: patch += 1
///
/// Fails with `InvalidVersion` when the bumped component would overflow.
pub fn bump_version(previous: Version, level: VersionBump) -> Result<Version> {
    previous.bump(level)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TypeRule;
    use crate::conventional::TypeMapping;

    fn history(entries: &[(&str, &[&str])]) -> Vec<Commit> {
        entries
            .iter()
            .map(|(message, tags)| Commit::tagged(*message, tags.iter().copied()))
            .collect()
    }

    fn manifest_fallback(version: Option<&str>) -> FallbackVersion {
        FallbackVersion {
            manifest: PathBuf::from("package.json"),
            version: version.map(str::to_string),
        }
    }

    #[test]
    fn test_window_stops_at_first_release_tag() {
        let resolver = ReleaseResolver::default();
        let commits = history(&[
            ("feat: add login", &[]),
            ("fix: typo", &[]),
            ("chore: release", &["v1.2.0"]),
            ("feat: older", &["v1.1.0"]),
        ]);

        let window = resolver.resolve_window(&commits);
        assert_eq!(window.commits, commits[..2].to_vec());
        assert_eq!(window.last_version(), Some(Version::new(1, 2, 0)));
        assert_eq!(window.last_tag.unwrap().name, "v1.2.0");
    }

    #[test]
    fn test_window_without_tags_is_whole_history() {
        let resolver = ReleaseResolver::default();
        let commits = history(&[("fix: a", &[]), ("initial", &["nightly"])]);

        let window = resolver.resolve_window(&commits);
        assert_eq!(window.commits, commits);
        assert_eq!(window.last_version(), None);
    }

    #[test]
    fn test_window_empty_when_head_is_tagged() {
        let resolver = ReleaseResolver::default();
        let commits = history(&[("chore: release", &["v2.0.0"]), ("feat: x", &[])]);

        let window = resolver.resolve_window(&commits);
        assert!(window.is_empty());
        assert_eq!(window.last_version(), Some(Version::new(2, 0, 0)));
    }

    #[test]
    fn test_window_on_empty_history() {
        let resolver = ReleaseResolver::default();
        let window = resolver.resolve_window(&Vec::<Commit>::new());
        assert!(window.is_empty());
        assert!(window.last_tag.is_none());
    }

    #[test]
    fn test_window_uses_first_release_tag_on_commit() {
        let resolver = ReleaseResolver::default();
        let commits = history(&[
            ("feat: x", &[]),
            ("release", &["latest", "v1.0.0", "v9.9.9"]),
        ]);

        let window = resolver.resolve_window(&commits);
        assert_eq!(window.last_version(), Some(Version::new(1, 0, 0)));
    }

    #[test]
    fn test_window_skips_malformed_tags() {
        let resolver = ReleaseResolver::default();
        let commits = history(&[
            ("feat: x", &[]),
            ("wip", &["v1.2", "v1.2.3-rc.1", "v1.0.99999999999999999999999"]),
            ("fix: y", &[]),
            ("release", &["v0.9.0"]),
        ]);

        let window = resolver.resolve_window(&commits);
        assert_eq!(window.commits.len(), 3);
        assert_eq!(window.last_version(), Some(Version::new(0, 9, 0)));
    }

    #[test]
    fn test_bump_takes_maximum_level() {
        let resolver = ReleaseResolver::default();
        let commits = history(&[("fix: a", &[]), ("feat: b", &[]), ("chore: c", &[])]);
        assert_eq!(resolver.compute_bump(&commits), VersionBump::Minor);
    }

    #[test]
    fn test_bump_defaults_to_patch() {
        let resolver = ReleaseResolver::default();
        assert_eq!(resolver.compute_bump(&[]), VersionBump::Patch);

        let commits = history(&[("docs: readme", &[]), ("Merge branch 'x'", &[])]);
        assert_eq!(resolver.compute_bump(&commits), VersionBump::Patch);
    }

    #[test]
    fn test_bump_is_order_independent() {
        let resolver = ReleaseResolver::default();
        let mut commits = history(&[
            ("chore: a", &[]),
            ("fix: b", &[]),
            ("feat(ui): c", &[]),
            ("style: d", &[]),
        ]);

        let expected = resolver.compute_bump(&commits);
        for _ in 0..commits.len() {
            commits.rotate_left(1);
            assert_eq!(resolver.compute_bump(&commits), expected);
        }
        commits.reverse();
        assert_eq!(resolver.compute_bump(&commits), expected);
    }

    #[test]
    fn test_bump_reaches_major_only_through_custom_mapping() {
        let resolver = ReleaseResolver::new(CommitClassifier::new(TypeMapping::new(vec![
            TypeRule::new("breaking", VersionBump::Major),
            TypeRule::new("feat", VersionBump::Minor),
        ])));
        let commits = history(&[("feat: a", &[]), ("breaking: b", &[])]);
        assert_eq!(resolver.compute_bump(&commits), VersionBump::Major);
    }

    #[test]
    fn test_bump_version_arithmetic() {
        let v = Version::new(1, 2, 3);
        assert_eq!(bump_version(v, VersionBump::Patch).unwrap(), Version::new(1, 2, 4));
        assert_eq!(bump_version(v, VersionBump::Minor).unwrap(), Version::new(1, 3, 0));
        assert_eq!(bump_version(v, VersionBump::Major).unwrap(), Version::new(2, 0, 0));
    }

    #[test]
    fn test_plan_rejects_overflowing_bump() {
        let resolver = ReleaseResolver::default();
        let commits = history(&[("fix: a", &[]), ("release", &["v1.2.18446744073709551615"])]);

        let err = resolver.plan(&commits, &manifest_fallback(None)).unwrap_err();
        assert!(matches!(err, ReleaseError::InvalidVersion { .. }));
    }

    #[test]
    fn test_plan_from_tag() {
        let resolver = ReleaseResolver::default();
        let commits = history(&[
            ("feat: add login", &[]),
            ("fix: typo", &[]),
            ("chore: release", &["v1.2.0"]),
        ]);

        let plan = resolver
            .plan(&commits, &manifest_fallback(Some("9.9.9")))
            .unwrap()
            .unwrap();
        assert_eq!(plan.commits.len(), 2);
        assert_eq!(plan.previous, Version::new(1, 2, 0));
        assert_eq!(plan.baseline, Baseline::Tag("v1.2.0".to_string()));
        assert_eq!(plan.bump, VersionBump::Minor);
        assert_eq!(plan.next, Version::new(1, 3, 0));
        assert_eq!(plan.tag().name, "v1.3.0");
    }

    #[test]
    fn test_plan_from_manifest_fallback() {
        let resolver = ReleaseResolver::default();
        let commits = history(&[("fix: a", &[])]);

        let plan = resolver
            .plan(&commits, &manifest_fallback(Some("0.1.0")))
            .unwrap()
            .unwrap();
        assert_eq!(plan.baseline, Baseline::Manifest(PathBuf::from("package.json")));
        assert_eq!(plan.bump, VersionBump::Patch);
        assert_eq!(plan.next, Version::new(0, 1, 1));
    }

    #[test]
    fn test_plan_missing_baseline() {
        let resolver = ReleaseResolver::default();
        let commits = history(&[("fix: a", &[])]);

        let err = resolver.plan(&commits, &manifest_fallback(None)).unwrap_err();
        assert!(matches!(err, ReleaseError::MissingBaseline { .. }));
    }

    #[test]
    fn test_plan_empty_window_is_noop() {
        let resolver = ReleaseResolver::default();
        let commits = history(&[("chore: release", &["v1.0.0"])]);

        let plan = resolver.plan(&commits, &manifest_fallback(None)).unwrap();
        assert!(plan.is_none());
    }

    #[test]
    fn test_plan_from_tag_ignores_unparseable_manifest_version() {
        let resolver = ReleaseResolver::default();
        let commits = history(&[("feat: a", &[]), ("release", &["v1.2.0"])]);

        let plan = resolver
            .plan(&commits, &manifest_fallback(Some("1.0.0-beta.1")))
            .unwrap()
            .unwrap();
        assert_eq!(plan.next, Version::new(1, 3, 0));

        let released = history(&[("release", &["v1.2.0"])]);
        let plan = resolver
            .plan(&released, &manifest_fallback(Some("1.0.0-beta.1")))
            .unwrap();
        assert!(plan.is_none());
    }

    #[test]
    fn test_plan_rejects_unparseable_manifest_without_tag() {
        let resolver = ReleaseResolver::default();
        let commits = history(&[("fix: a", &[])]);

        let err = resolver
            .plan(&commits, &manifest_fallback(Some("1.0.0-beta.1")))
            .unwrap_err();
        assert!(matches!(err, ReleaseError::InvalidVersion { .. }));
    }
}
