use crate::domain::Commit;
use crate::error::{ReleaseError, Result};
use crate::git::Repository;
use std::cell::RefCell;
use std::path::{Path, PathBuf};

/// Operations recorded by [MockRepository], in call order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockOperation {
    Fetch { remote: String },
    Commit { paths: Vec<PathBuf>, message: String },
    Tag { name: String },
    Push { remote: String, tags: Vec<String> },
}

/// Mock repository for testing without actual git operations
///
/// Commits are held newest first. Mutating operations are recorded and also
/// applied to the in-memory history, so a later [Repository::history] call
/// sees the release commit and its tag.
#[derive(Debug, Default)]
pub struct MockRepository {
    history: RefCell<Vec<Commit>>,
    operations: RefCell<Vec<MockOperation>>,
    behind: bool,
    fetch_error: Option<String>,
}

impl MockRepository {
    /// Create a new empty mock repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock repository holding `history` (newest first)
    pub fn with_history(history: Vec<Commit>) -> Self {
        MockRepository {
            history: RefCell::new(history),
            ..Self::default()
        }
    }

    /// Report the current branch as behind its upstream
    pub fn behind_remote(mut self, behind: bool) -> Self {
        self.behind = behind;
        self
    }

    /// Make every fetch fail with `message`
    pub fn failing_fetch(mut self, message: impl Into<String>) -> Self {
        self.fetch_error = Some(message.into());
        self
    }

    /// Operations performed so far
    pub fn operations(&self) -> Vec<MockOperation> {
        self.operations.borrow().clone()
    }

    /// Whether any operation other than a fetch was performed
    pub fn has_writes(&self) -> bool {
        self.operations
            .borrow()
            .iter()
            .any(|op| !matches!(op, MockOperation::Fetch { .. }))
    }

    fn record(&self, operation: MockOperation) {
        self.operations.borrow_mut().push(operation);
    }
}

impl Repository for MockRepository {
    fn history(&self) -> Result<Vec<Commit>> {
        Ok(self.history.borrow().clone())
    }

    fn fetch_from_remote(&self, remote: &str) -> Result<()> {
        self.record(MockOperation::Fetch {
            remote: remote.to_string(),
        });
        match &self.fetch_error {
            Some(message) => Err(ReleaseError::remote(message.clone())),
            None => Ok(()),
        }
    }

    fn is_behind_remote(&self) -> Result<bool> {
        Ok(self.behind)
    }

    fn commit_paths(&self, paths: &[&Path], message: &str) -> Result<()> {
        self.record(MockOperation::Commit {
            paths: paths.iter().map(|p| p.to_path_buf()).collect(),
            message: message.to_string(),
        });
        self.history.borrow_mut().insert(0, Commit::new(message));
        Ok(())
    }

    fn create_tag(&self, name: &str) -> Result<()> {
        self.record(MockOperation::Tag {
            name: name.to_string(),
        });
        let mut history = self.history.borrow_mut();
        let head = history
            .first_mut()
            .ok_or_else(|| ReleaseError::remote("cannot tag an empty history"))?;
        head.tag_refs.push(name.to_string());
        Ok(())
    }

    fn push(&self, remote: &str, tags: &[&str]) -> Result<()> {
        self.record(MockOperation::Push {
            remote: remote.to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
        });
        Ok(())
    }
}
