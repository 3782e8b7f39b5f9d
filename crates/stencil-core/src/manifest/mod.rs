//! Project manifest: schema types, construction from answers, and
//! diff-friendly JSON serialization

pub mod builder;
pub mod schema;

pub use builder::build_manifest;
pub use schema::{Author, PackageDefaults, ProjectManifest, Repository};
