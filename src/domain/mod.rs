//! Domain logic - pure release rules independent of git operations

pub mod commit;
pub mod tag;
pub mod version;

pub use commit::{Commit, ConventionalCommit};
pub use tag::ReleaseTag;
pub use version::{Version, VersionBump};
