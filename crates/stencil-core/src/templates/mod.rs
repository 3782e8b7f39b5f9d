//! Template materialization: enumeration, variable substitution,
//! dot-file renaming, and conflict resolution

pub mod materializer;
pub mod render;

pub use materializer::{
    materialize, ConflictChoice, FileConflict, FileOutcome, MaterializedFile,
};
pub use render::render;
