//! Release analysis: windowing history and deciding the next version

pub mod release_resolver;

pub use release_resolver::{
    bump_version, Baseline, FallbackVersion, ReleasePlan, ReleaseResolver, ResolvedWindow,
};
