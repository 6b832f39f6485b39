use regex::Regex;
use std::sync::LazyLock;

/// `type[(scope)]: description` on a single line.
///
/// Captures: 1 = type, 2 = scope (optional, without parentheses),
/// 3 = description.
static CONVENTIONAL_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([\w-]+)(?:\(([^()]+)\))?: (.+)$").expect("valid conventional header regex")
});

/// A commit as seen by the release resolver
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    /// Full commit message; only the first line is classified
    pub message: String,
    /// Tag names attached to this commit, in the order the repository lists them
    pub tag_refs: Vec<String>,
}

impl Commit {
    /// Create an untagged commit
    pub fn new(message: impl Into<String>) -> Self {
        Commit {
            message: message.into(),
            tag_refs: Vec::new(),
        }
    }

    /// Create a commit carrying the given tags
    pub fn tagged<I, S>(message: impl Into<String>, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Commit {
            message: message.into(),
            tag_refs: tags.into_iter().map(Into::into).collect(),
        }
    }

    /// Build a commit from a `git log --decorate` style ref list.
    ///
    /// Example: `"HEAD -> main, tag: v1.2.0, origin/main"`. Only `tag: <name>`
    /// entries are kept; branch names and `HEAD` are dropped.
    pub fn from_decorations(message: impl Into<String>, refs: &str) -> Self {
        let tag_refs = refs
            .split(',')
            .map(str::trim)
            .filter_map(|r| r.strip_prefix("tag: "))
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
            .collect();

        Commit {
            message: message.into(),
            tag_refs,
        }
    }

    /// First line of the message, trimmed
    pub fn subject(&self) -> &str {
        subject_line(&self.message)
    }
}

/// First line of a commit message with surrounding whitespace removed
pub fn subject_line(message: &str) -> &str {
    message.trim_start().lines().next().unwrap_or("").trim()
}

/// Parts of a conventional commit header, for display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConventionalCommit {
    pub r#type: String,
    pub scope: Option<String>,
    pub description: String,
}

impl ConventionalCommit {
    /// Split a message's first line into type, optional scope and description.
    ///
    /// Returns `None` when the line does not have the `type[(scope)]: description`
    /// shape; such messages are shown verbatim.
    pub fn decompose(message: &str) -> Option<Self> {
        let captures = CONVENTIONAL_HEADER.captures(subject_line(message))?;

        Some(ConventionalCommit {
            r#type: captures.get(1)?.as_str().to_string(),
            scope: captures.get(2).map(|m| m.as_str().to_string()),
            description: captures.get(3)?.as_str().to_string(),
        })
    }
}
