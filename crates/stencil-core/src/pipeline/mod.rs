//! The scaffolding pipeline: an ordered, fail-fast sequence of
//! side-effecting stages
//!
//! Stage order: config defaults -> prompt/revise loop -> manifest
//! build -> manifest persist -> template materialization -> dependency
//! install -> asset build. The first failure stops execution and is
//! reported with its originating stage; already-written files are not
//! rolled back (partial completion is a documented outcome, not a bug
//! to mask). Running two sessions against the same destination
//! concurrently is unsupported.

pub mod external;

pub use external::{CommandSpec, ProcessRunner, StepRunner};

use crate::config::load_defaults;
use crate::manifest::{build_manifest, ProjectManifest};
use crate::product::ProductConfig;
use crate::session::{run_session, Prompter, SessionOutcome};
use crate::templates::{materialize, FileOutcome};
use anyhow::{Context, Result};
use std::path::PathBuf;

/// Where and how to scaffold
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Destination directory (the project root being scaffolded)
    pub dest: PathBuf,
    /// Template source tree
    pub template_dir: PathBuf,
    /// Skip the dependency-install step
    pub skip_install: bool,
    /// Skip the asset-build step
    pub skip_build: bool,
}

/// Terminal pipeline result. Errors short-circuit via `Result`;
/// `Aborted` is the designed clean early-exit (empty project name),
/// not a failure.
#[derive(Debug)]
pub enum PipelineStatus {
    Completed {
        manifest: ProjectManifest,
        written: usize,
        skipped_conflicts: usize,
    },
    Aborted,
}

/// Run every stage in order, short-circuiting on first failure.
pub async fn run_pipeline<C, P, S>(
    config: &C,
    opts: &PipelineOptions,
    prompter: &mut P,
    steps: &mut S,
) -> Result<PipelineStatus>
where
    C: ProductConfig,
    P: Prompter + ?Sized,
    S: StepRunner,
{
    let manifest_path = opts.dest.join(config.manifest_filename());

    // Stage: defaults from any existing manifest. A broken manifest is
    // recovered locally: warn and continue with empty defaults.
    let (defaults, config_error) = load_defaults(&manifest_path);
    if let Some(e) = config_error {
        prompter.warning(&e.to_string())?;
    }

    // Stage: prompt + revise loop
    let dir_basename = opts
        .dest
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let package_defaults = config.package_defaults();
    let outcome = run_session(prompter, &defaults, &dir_basename, |answers| {
        build_manifest(answers, &package_defaults)
            .review_summary()
            .unwrap_or_default()
    })?;

    let answers = match outcome {
        SessionOutcome::Confirmed(answers) => answers,
        SessionOutcome::Aborted => return Ok(PipelineStatus::Aborted),
    };

    // Stage: build and persist the manifest (the sole durable effect
    // of this stage)
    prompter.info("Making package.json")?;
    let manifest = build_manifest(&answers, &package_defaults);
    let json = manifest.to_json_string()?;
    tokio::fs::create_dir_all(&opts.dest)
        .await
        .with_context(|| format!("Failed to create {}", opts.dest.display()))?;
    tokio::fs::write(&manifest_path, &json)
        .await
        .with_context(|| format!("Failed to write {}", manifest_path.display()))?;

    // Stage: materialize the template tree
    prompter.info("Copying files")?;
    let results = materialize(&opts.template_dir, &opts.dest, &answers.vars(), prompter).await?;
    let written = results
        .iter()
        .filter(|r| matches!(r.outcome, FileOutcome::Written | FileOutcome::Overwritten))
        .count();
    let skipped_conflicts = results
        .iter()
        .filter(|r| r.outcome == FileOutcome::SkippedConflict)
        .count();
    prompter.success(&format!("Files copied ({} written)", written))?;
    if skipped_conflicts > 0 {
        prompter.warning(&format!(
            "{} conflicting file(s) left untouched",
            skipped_conflicts
        ))?;
    }

    // Stage: external dependency install
    if opts.skip_install {
        prompter.info("Skipping module install")?;
    } else {
        prompter.info("Installing modules")?;
        steps.run_step(&config.install_step(), &opts.dest).await?;
        prompter.success("Modules installed")?;
    }

    // Stage: external asset build
    if opts.skip_build {
        prompter.info("Skipping asset build")?;
    } else {
        prompter.info("Building assets")?;
        steps.run_step(&config.build_step(), &opts.dest).await?;
        prompter.success("Assets built")?;
    }

    Ok(PipelineStatus::Completed {
        manifest,
        written,
        skipped_conflicts,
    })
}
