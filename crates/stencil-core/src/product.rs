//! Product configuration trait for CLI binaries
//!
//! Each CLI product implements this trait to define its identity, its
//! bundled template location, the fixed dependency block it writes
//! into every manifest, and the external tool commands it drives.

use crate::manifest::PackageDefaults;
use crate::pipeline::CommandSpec;
use std::path::{Path, PathBuf};

/// Configuration trait for different CLI products
pub trait ProductConfig: Clone + Send + Sync + 'static {
    /// Internal product name (used for CLI command, env vars)
    fn name(&self) -> &'static str;

    /// Human-readable display name
    fn display_name(&self) -> &'static str;

    /// Environment variable name for overriding the template directory
    fn template_dir_env(&self) -> &'static str;

    /// Name of the manifest file read for defaults and written on confirm
    fn manifest_filename(&self) -> &'static str {
        "package.json"
    }

    /// The fixed dependency/build-script block present in every
    /// generated manifest
    fn package_defaults(&self) -> PackageDefaults;

    /// Command that installs the manifest's declared dependencies
    fn install_step(&self) -> CommandSpec;

    /// Command that builds the project's assets
    fn build_step(&self) -> CommandSpec;

    /// Generate the "next steps" instructions after scaffolding
    fn next_steps(&self, dir: &Path) -> Vec<String>;

    /// CLI description shown in help text
    fn cli_description(&self) -> &'static str;

    /// Where the bundled template tree lives: the override env var if
    /// set, else a `template` directory next to the executable.
    fn resolve_template_dir(&self) -> PathBuf {
        if let Ok(dir) = std::env::var(self.template_dir_env()) {
            return PathBuf::from(dir);
        }
        std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(|p| p.join("template")))
            .unwrap_or_else(|| PathBuf::from("template"))
    }
}
