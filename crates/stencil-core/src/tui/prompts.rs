//! Charm-style CLI prompts using cliclack

use crate::pipeline::{run_pipeline, PipelineOptions, PipelineStatus, ProcessRunner};
use crate::product::ProductConfig;
use crate::session::Prompter;
use crate::templates::{ConflictChoice, FileConflict};
use anyhow::Result;
use std::path::PathBuf;

/// CLI arguments for the create command
#[derive(Debug, Clone, Default)]
pub struct CreateArgs {
    /// Directory to scaffold into (defaults to the current directory)
    pub directory: Option<PathBuf>,

    /// Local directory to use as the template source instead of the
    /// bundled one
    pub template_dir: Option<PathBuf>,

    /// Skip the dependency-install step
    pub skip_install: bool,

    /// Skip the asset-build step
    pub skip_build: bool,

    /// Auto-confirm all prompts (non-interactive mode)
    pub yes: bool,
}

/// Interactive prompter backed by cliclack. With `yes` set it answers
/// every question with its default, confirms everything, and skips
/// conflicting files.
pub struct CliPrompter {
    yes: bool,
}

impl CliPrompter {
    pub fn new(yes: bool) -> Self {
        Self { yes }
    }
}

impl Prompter for CliPrompter {
    fn input(&mut self, prompt: &str, default: Option<&str>) -> Result<String> {
        if self.yes {
            return Ok(default.unwrap_or_default().to_string());
        }
        let mut input = cliclack::input(prompt).required(false);
        if let Some(default) = default {
            input = input.default_input(default);
        }
        let value: String = input.interact()?;
        Ok(value)
    }

    fn confirm(&mut self, prompt: &str, initial: bool) -> Result<bool> {
        if self.yes {
            return Ok(true);
        }
        let answer = cliclack::confirm(prompt).initial_value(initial).interact()?;
        Ok(answer)
    }

    fn note(&mut self, title: &str, body: &str) -> Result<()> {
        cliclack::note(title, body)?;
        Ok(())
    }

    fn info(&mut self, message: &str) -> Result<()> {
        cliclack::log::info(message)?;
        Ok(())
    }

    fn success(&mut self, message: &str) -> Result<()> {
        cliclack::log::success(message)?;
        Ok(())
    }

    fn warning(&mut self, message: &str) -> Result<()> {
        cliclack::log::warning(message)?;
        Ok(())
    }

    fn resolve_conflict(&mut self, conflict: &FileConflict) -> Result<ConflictChoice> {
        if self.yes {
            return Ok(ConflictChoice::Skip);
        }
        let choice: ConflictChoice =
            cliclack::select(format!("{} already exists", conflict.rel_path))
                .item(ConflictChoice::Overwrite, "Overwrite", "replace with the template version")
                .item(ConflictChoice::Skip, "Skip", "keep the existing file")
                .item(ConflictChoice::Diff, "Diff", "show the differences first")
                .interact()?;
        Ok(choice)
    }
}

/// Run the scaffolding pipeline with interactive prompts
pub async fn run<C: ProductConfig>(config: &C, args: CreateArgs) -> Result<()> {
    cliclack::intro(config.display_name())?;

    let current_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let dest = match &args.directory {
        Some(dir) if dir.is_absolute() => dir.clone(),
        Some(dir) => current_dir.join(dir),
        None => current_dir,
    };

    let template_dir = args
        .template_dir
        .clone()
        .unwrap_or_else(|| config.resolve_template_dir());
    if !template_dir.is_dir() {
        anyhow::bail!("Template directory not found: {}", template_dir.display());
    }

    let opts = PipelineOptions {
        dest: dest.clone(),
        template_dir,
        skip_install: args.skip_install,
        skip_build: args.skip_build,
    };
    let mut prompter = CliPrompter::new(args.yes);
    let mut runner = ProcessRunner;

    match run_pipeline(config, &opts, &mut prompter, &mut runner).await? {
        PipelineStatus::Completed { .. } => {
            print_next_steps(config, &dest)?;
            Ok(())
        }
        PipelineStatus::Aborted => {
            cliclack::outro("Cancelled - nothing was written.")?;
            Ok(())
        }
    }
}

fn print_next_steps<C: ProductConfig>(config: &C, project_dir: &PathBuf) -> Result<()> {
    let steps = config.next_steps(project_dir);

    if !steps.is_empty() {
        println!();
        println!("  Next steps");
        println!();

        for (i, step) in steps.iter().enumerate() {
            println!("  {}.  {}", i + 1, step);
        }
    }

    cliclack::outro("Happy coding!")?;

    Ok(())
}
