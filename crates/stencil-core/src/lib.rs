//! Stencil Core - Shared library for interactive project scaffolding
//!
//! This library drives a fail-fast scaffolding pipeline: ask ordered
//! configuration questions, confirm (or revise) the answers, write a
//! `package.json` manifest, copy a parameterized template tree into
//! the destination while resolving conflicts, then run the dependency
//! install and asset build tools.
//!
//! # Architecture
//!
//! - **Core stages** - config defaults, prompt session/revise loop,
//!   manifest building, template materialization, pipeline
//!   orchestration. All usable without a terminal: the pipeline is
//!   generic over the [`session::Prompter`] terminal contract and the
//!   [`pipeline::StepRunner`] external-tool contract.
//! - **CLI/TUI interface** - Optional cliclack-based prompts
//!   (feature-gated) plus the top-level `run` entry point.
//!
//! # Feature Flags
//!
//! - `tui` (default): Enables the cliclack-based prompts module

pub mod config;
pub mod error;
pub mod manifest;
pub mod pipeline;
pub mod product;
pub mod session;
pub mod templates;

#[cfg(feature = "tui")]
pub mod tui;

// Re-export main types for convenience
pub use error::ScaffoldError;
pub use manifest::{build_manifest, Author, PackageDefaults, ProjectManifest, Repository};
pub use pipeline::{run_pipeline, CommandSpec, PipelineOptions, PipelineStatus, StepRunner};
pub use product::ProductConfig;
pub use session::{AnswerSet, Prompter, SessionOutcome};
pub use templates::{materialize, ConflictChoice, FileOutcome};

#[cfg(feature = "tui")]
pub use tui::run;
