//! Resolution of a request to a project and the version of it to serve.

pub mod project;
pub mod version;

pub use project::ProjectResolver;
pub use version::{ResolvedVersion, VersionResolver, VersionSource, VersionStrategy};
