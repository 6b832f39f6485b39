//! Git operations abstraction layer
//!
//! The release workflow depends on the [Repository] trait rather than on
//! `git2` directly. The implementations are:
//!
//! - [repository::Git2Repository]: a real repository opened through `git2`
//! - [mock::MockRepository]: an in-memory repository for tests
//!
//! ```rust
//! # use git_release::git::Repository;
//! # fn example<R: Repository>(repo: &R) -> git_release::Result<()> {
//! for commit in repo.history()? {
//!     println!("{:?} {}", commit.tag_refs, commit.subject());
//! }
//! # Ok(())
//! # }
//! ```

pub mod mock;
pub mod repository;

pub use mock::MockRepository;
pub use repository::Git2Repository;

use crate::domain::Commit;
use crate::error::Result;
use std::path::Path;

/// Version-control operations used by the release workflow
///
/// All methods return [crate::error::Result]; implementations map their
/// underlying errors (like `git2::Error`) onto [crate::error::ReleaseError].
pub trait Repository {
    /// Commits reachable from `HEAD`, newest first, with the tag names
    /// pointing at each of them.
    ///
    /// Implementations may stop after the first commit carrying a release
    /// tag, which must itself be included; older commits never affect the
    /// next release. An unborn `HEAD` yields an empty history.
    fn history(&self) -> Result<Vec<Commit>>;

    /// Fetch branches and tags from a remote
    ///
    /// Updates remote-tracking branches (`refs/remotes/<remote>/*`) and tags.
    fn fetch_from_remote(&self, remote: &str) -> Result<()>;

    /// Whether the current branch is behind its upstream
    ///
    /// Uses the remote-tracking refs as last fetched. Returns `false` when the
    /// branch has no upstream configured.
    fn is_behind_remote(&self) -> Result<bool>;

    /// Stage `paths` and commit them on `HEAD` with `message`
    fn commit_paths(&self, paths: &[&Path], message: &str) -> Result<()>;

    /// Create a lightweight tag at `HEAD`
    fn create_tag(&self, name: &str) -> Result<()>;

    /// Push the current branch and the given tags to a remote
    fn push(&self, remote: &str, tags: &[&str]) -> Result<()>;
}
