//! Command trait and context for dispatching commands

use std::path::PathBuf;
use std::time::Instant;

use crate::cli::Cli;
use gradeflow_core::error::Result;
use gradeflow_core::session::GradingSession;
use gradeflow_core::workspace::Workspace;

/// Shared context for command execution
pub struct CommandContext<'a> {
    pub cli: &'a Cli,
    pub root: &'a PathBuf,
    pub start: Instant,
}

impl<'a> CommandContext<'a> {
    pub fn new(cli: &'a Cli, root: &'a PathBuf, start: Instant) -> Self {
        Self { cli, root, start }
    }

    pub fn discover_workspace(&self) -> Result<Workspace> {
        Workspace::discover(self.root)
    }

    /// Discover the workspace and load its session snapshot
    pub fn load_session(&self) -> Result<(Workspace, GradingSession)> {
        let workspace = self.discover_workspace()?;
        let session = workspace.load_session()?;
        Ok((workspace, session))
    }
}

/// Trait for commands that can be executed
pub trait Command {
    fn execute(&self, ctx: &CommandContext) -> Result<()>;
}

/// No-op command (when no subcommand is provided)
pub struct NoCommand;

impl Command for NoCommand {
    fn execute(&self, _ctx: &CommandContext) -> Result<()> {
        println!("gradeflow {}", env!("CARGO_PKG_VERSION"));
        println!();
        println!("Grade a document against a rubric, one metric at a time.");
        println!();
        println!("Run `gradeflow --help` for usage information.");
        Ok(())
    }
}
