//! Conventional commit classification.
//!
//! A message is classified by its first line: the first declared type token
//! `t` for which the line starts with `t:` or `t(` decides the release level.
//! Messages matching no token are non-conventional and carry no level.

use crate::config::{ConventionalCommitsConfig, TypeRule};
use crate::domain::commit::subject_line;
pub use crate::domain::{ConventionalCommit, VersionBump};

/// Ordered, immutable mapping from commit type token to release level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeMapping {
    rules: Vec<TypeRule>,
}

impl TypeMapping {
    /// Build a mapping; declaration order is match order.
    pub fn new(rules: Vec<TypeRule>) -> Self {
        TypeMapping { rules }
    }

    pub fn rules(&self) -> &[TypeRule] {
        &self.rules
    }

    /// Level mapped to `token`, if declared
    pub fn level_of(&self, token: &str) -> Option<VersionBump> {
        self.rules
            .iter()
            .find(|rule| rule.token == token)
            .map(|rule| rule.level)
    }
}

impl Default for TypeMapping {
    /// `feat` → minor, `fix` → patch
    fn default() -> Self {
        TypeMapping::new(ConventionalCommitsConfig::default().types)
    }
}

impl From<&ConventionalCommitsConfig> for TypeMapping {
    fn from(config: &ConventionalCommitsConfig) -> Self {
        TypeMapping::new(config.types.clone())
    }
}

/// Classifies commit messages against a [`TypeMapping`].
#[derive(Debug, Clone, Default)]
pub struct CommitClassifier {
    mapping: TypeMapping,
}

impl CommitClassifier {
    pub fn new(mapping: TypeMapping) -> Self {
        CommitClassifier { mapping }
    }

    pub fn mapping(&self) -> &TypeMapping {
        &self.mapping
    }

    /// The matching type rule for a message, if any
    fn matching_rule(&self, message: &str) -> Option<&TypeRule> {
        let subject = subject_line(message);
        self.mapping.rules.iter().find(|rule| {
            subject
                .strip_prefix(rule.token.as_str())
                .is_some_and(|rest| rest.starts_with(':') || rest.starts_with('('))
        })
    }

    /// Type token of a message, or `None` for non-conventional messages
    pub fn commit_type(&self, message: &str) -> Option<&str> {
        self.matching_rule(message).map(|rule| rule.token.as_str())
    }

    /// Release level of a message, or `None` for non-conventional messages
    pub fn classify(&self, message: &str) -> Option<VersionBump> {
        self.matching_rule(message).map(|rule| rule.level)
    }
}

/// Split a message into type, scope and description for display.
pub fn decompose(message: &str) -> Option<ConventionalCommit> {
    ConventionalCommit::decompose(message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_feature() {
        let classifier = CommitClassifier::default();
        assert_eq!(classifier.classify("feat: add x"), Some(VersionBump::Minor));
        assert_eq!(classifier.commit_type("feat: add x"), Some("feat"));
    }

    #[test]
    fn test_classify_scoped_fix() {
        let classifier = CommitClassifier::default();
        assert_eq!(classifier.classify("fix(core): y"), Some(VersionBump::Patch));
    }

    #[test]
    fn test_classify_unknown_type() {
        let classifier = CommitClassifier::default();
        assert_eq!(classifier.classify("chore: z"), None);
        assert_eq!(classifier.commit_type("chore: z"), None);
    }

    #[test]
    fn test_classify_is_case_sensitive() {
        let classifier = CommitClassifier::default();
        assert_eq!(classifier.classify("Feat: add x"), None);
        assert_eq!(classifier.classify("FIX: y"), None);
    }

    #[test]
    fn test_classify_requires_exact_token() {
        let classifier = CommitClassifier::default();
        assert_eq!(classifier.classify("feature: add x"), None);
        assert_eq!(classifier.classify("fixup! fix: y"), None);
        assert_eq!(classifier.classify("feat : spaced"), None);
        assert_eq!(classifier.classify("feat"), None);
    }

    #[test]
    fn test_classify_ignores_surrounding_whitespace_and_body() {
        let classifier = CommitClassifier::default();
        assert_eq!(
            classifier.classify("  feat: add x\n\nfix: mentioned in body"),
            Some(VersionBump::Minor)
        );
        assert_eq!(
            classifier.classify("docs: readme\n\nfeat: not the subject"),
            None
        );
    }

    #[test]
    fn test_first_declared_token_wins() {
        let mapping = TypeMapping::new(vec![
            TypeRule::new("fix", VersionBump::Patch),
            TypeRule::new("fix", VersionBump::Major),
        ]);
        let classifier = CommitClassifier::new(mapping);
        assert_eq!(classifier.classify("fix: a"), Some(VersionBump::Patch));
    }

    #[test]
    fn test_custom_mapping_substitution() {
        let mapping = TypeMapping::new(vec![
            TypeRule::new("breaking", VersionBump::Major),
            TypeRule::new("perf", VersionBump::Patch),
        ]);
        let classifier = CommitClassifier::new(mapping);
        assert_eq!(classifier.classify("breaking: drop v1 api"), Some(VersionBump::Major));
        assert_eq!(classifier.classify("perf(db): index"), Some(VersionBump::Patch));
        assert_eq!(classifier.classify("feat: add x"), None);
    }

    #[test]
    fn test_default_mapping_never_yields_major() {
        let mapping = TypeMapping::default();
        assert!(mapping
            .rules()
            .iter()
            .all(|rule| rule.level != VersionBump::Major));
        assert_eq!(mapping.level_of("feat"), Some(VersionBump::Minor));
        assert_eq!(mapping.level_of("chore"), None);
    }

    #[test]
    fn test_decompose_reexport() {
        let parsed = decompose("feat(auth): add OAuth").unwrap();
        assert_eq!(parsed.r#type, "feat");
        assert_eq!(parsed.scope.as_deref(), Some("auth"));
        assert_eq!(parsed.description, "add OAuth");
    }
}
