//! stencil CLI - Interactive scaffolding for gulp-built webapp projects

use anyhow::Result;
use clap::{Parser, Subcommand};
use stencil_core::pipeline::CommandSpec;
use stencil_core::tui::CreateArgs;
use stencil_core::{PackageDefaults, ProductConfig};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// stencil product configuration
#[derive(Clone)]
pub struct StencilConfig;

impl ProductConfig for StencilConfig {
    fn name(&self) -> &'static str {
        "stencil"
    }

    fn display_name(&self) -> &'static str {
        "stencil"
    }

    fn template_dir_env(&self) -> &'static str {
        "STENCIL_TEMPLATE_DIR"
    }

    fn cli_description(&self) -> &'static str {
        "CLI for scaffolding gulp-built webapp projects"
    }

    /// Every scaffolded project gets the express runtime plus the gulp
    /// and karma toolchain the bundled template is built around.
    fn package_defaults(&self) -> PackageDefaults {
        let to_map = |pairs: &[(&str, &str)]| -> BTreeMap<String, String> {
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect()
        };

        PackageDefaults {
            dependencies: to_map(&[("express", "^4.4.3")]),
            dev_dependencies: to_map(&[
                ("gulp", "~3.8.0"),
                ("gulp-concat", "~2.2.0"),
                ("gulp-sass", "~0.7.2"),
                ("gulp-templatecache", "~0.0.2"),
                ("gulp-uglify", "~0.3.0"),
                ("gulp-util", "^2.2.17"),
                ("gulp-rename", "^1.2.0"),
                ("gulp-wrap", "^0.3.0"),
                ("multipipe", "^0.1.1"),
                ("karma", "~0.12.16"),
                ("karma-coverage", "^0.2.4"),
                ("karma-jasmine", "^0.1.5"),
                ("karma-phantomjs-launcher", "^0.1.4"),
            ]),
            scripts: to_map(&[
                (
                    "test",
                    "./node_modules/karma/bin/karma start test/karma.conf.js --single-run",
                ),
                ("start", "server.js"),
            ]),
        }
    }

    fn install_step(&self) -> CommandSpec {
        CommandSpec {
            stage: "install",
            program: "npm",
            args: vec!["install"],
        }
    }

    fn build_step(&self) -> CommandSpec {
        CommandSpec {
            stage: "build",
            program: "gulp",
            args: vec!["build"],
        }
    }

    fn next_steps(&self, dir: &Path) -> Vec<String> {
        let mut steps = Vec::new();
        let current = std::env::current_dir().ok();

        if current.as_deref() != Some(dir) {
            steps.push(format!("cd {}", dir.display()));
        }

        steps.push("npm start".to_string());

        steps
    }
}

#[derive(Parser, Debug)]
#[command(name = "stencil-tools")]
#[command(about = "CLI for scaffolding gulp-built webapp projects")]
#[command(version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Scaffold a project in the target directory
    Create(CliCreateArgs),
}

#[derive(Parser, Debug)]
pub struct CliCreateArgs {
    /// Directory to scaffold into (defaults to the current directory)
    #[arg(short, long)]
    pub directory: Option<PathBuf>,

    /// Local directory to use as the template source instead of the bundled one
    #[arg(long = "template-dir")]
    pub template_dir: Option<PathBuf>,

    /// Skip the npm install step
    #[arg(long = "skip-install")]
    pub skip_install: bool,

    /// Skip the gulp build step
    #[arg(long = "skip-build")]
    pub skip_build: bool,

    /// Auto-confirm all prompts (non-interactive mode)
    #[arg(short, long)]
    pub yes: bool,
}

impl From<CliCreateArgs> for CreateArgs {
    fn from(args: CliCreateArgs) -> Self {
        CreateArgs {
            directory: args.directory,
            template_dir: args.template_dir,
            skip_install: args.skip_install,
            skip_build: args.skip_build,
            yes: args.yes,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Ensure terminal cursor is restored on panic
    let default_panic = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = console::Term::stderr().show_cursor();
        default_panic(info);
    }));

    // Handle Ctrl+C gracefully
    ctrlc::set_handler(move || {
        let _ = console::Term::stderr().show_cursor();
        std::process::exit(130);
    })
    .ok();

    let args = Args::parse();
    let config = StencilConfig;

    let create_args = match args.command {
        Some(Command::Create(create_args)) => create_args.into(),
        // No subcommand provided, default to create behavior (interactive mode)
        None => CreateArgs::default(),
    };

    let result = stencil_core::run(&config, create_args).await;

    // Ensure cursor is visible on normal exit
    let _ = console::Term::stderr().show_cursor();

    result
}
