//! External step execution: dependency install and asset build
//!
//! The pipeline only knows the contract: invoke with parameters,
//! stream diagnostics, receive success/failure. The process-backed
//! runner spawns the tool and forwards its output live; tests swap in
//! a recording runner.

use crate::error::ScaffoldError;
use async_trait::async_trait;
use colored::Colorize;
use std::path::Path;
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command as TokioCommand;

/// An external tool invocation: stage name for error reporting plus
/// the command line to run
#[derive(Debug, Clone)]
pub struct CommandSpec {
    pub stage: &'static str,
    pub program: &'static str,
    pub args: Vec<&'static str>,
}

impl CommandSpec {
    pub fn display(&self) -> String {
        let mut parts = vec![self.program];
        parts.extend(&self.args);
        parts.join(" ")
    }
}

/// Runs external steps. The pipeline is generic over this so tests can
/// observe invocations without spawning processes.
#[async_trait]
pub trait StepRunner {
    async fn run_step(&mut self, spec: &CommandSpec, dir: &Path) -> Result<(), ScaffoldError>;
}

/// Spawns the tool as a subprocess in the destination directory.
/// Stdout and stderr are forwarded line by line as they arrive; a
/// nonzero exit becomes the pipeline's failure reason. No timeout:
/// install and build tools may legitimately run for a long while.
pub struct ProcessRunner;

#[async_trait]
impl StepRunner for ProcessRunner {
    async fn run_step(&mut self, spec: &CommandSpec, dir: &Path) -> Result<(), ScaffoldError> {
        println!();
        println!("{} {}", "Running:".dimmed(), spec.display().yellow());
        println!();

        let spawn_err = |source: std::io::Error| ScaffoldError::ExternalSpawn {
            stage: spec.stage.to_string(),
            source,
        };

        let mut child = TokioCommand::new(spec.program)
            .args(&spec.args)
            .current_dir(dir)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(spawn_err)?;

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();

        if let (Some(stdout), Some(stderr)) = (stdout, stderr) {
            let mut stdout_reader = BufReader::new(stdout).lines();
            let mut stderr_reader = BufReader::new(stderr).lines();
            let mut stdout_done = false;
            let mut stderr_done = false;

            while !(stdout_done && stderr_done) {
                tokio::select! {
                    line = stdout_reader.next_line(), if !stdout_done => {
                        match line {
                            Ok(Some(line)) => println!("  {}", line),
                            Ok(None) => stdout_done = true,
                            Err(_) => stdout_done = true,
                        }
                    }
                    line = stderr_reader.next_line(), if !stderr_done => {
                        match line {
                            Ok(Some(line)) => eprintln!("  {}", line.yellow()),
                            Ok(None) => stderr_done = true,
                            Err(_) => stderr_done = true,
                        }
                    }
                }
            }
        }

        let status = child.wait().await.map_err(spawn_err)?;
        println!();

        if status.success() {
            Ok(())
        } else {
            Err(ScaffoldError::ExternalStep {
                stage: spec.stage.to_string(),
                code: status.code().unwrap_or(-1),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_display() {
        let spec = CommandSpec {
            stage: "install",
            program: "npm",
            args: vec!["install"],
        };
        assert_eq!(spec.display(), "npm install");
    }

    #[tokio::test]
    async fn test_nonzero_exit_is_an_external_step_error() {
        let spec = CommandSpec {
            stage: "build",
            program: "sh",
            args: vec!["-c", "exit 3"],
        };
        let err = ProcessRunner
            .run_step(&spec, Path::new("."))
            .await
            .unwrap_err();
        match err {
            ScaffoldError::ExternalStep { stage, code } => {
                assert_eq!(stage, "build");
                assert_eq!(code, 3);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_zero_exit_succeeds() {
        let spec = CommandSpec {
            stage: "build",
            program: "sh",
            args: vec!["-c", "echo ok"],
        };
        ProcessRunner.run_step(&spec, Path::new(".")).await.unwrap();
    }

    #[tokio::test]
    async fn test_missing_program_is_a_spawn_error() {
        let spec = CommandSpec {
            stage: "install",
            program: "definitely-not-a-real-tool",
            args: vec![],
        };
        let err = ProcessRunner
            .run_step(&spec, Path::new("."))
            .await
            .unwrap_err();
        assert!(matches!(err, ScaffoldError::ExternalSpawn { .. }));
    }
}
