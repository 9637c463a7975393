//! Command implementations for all gradeflow commands

use crate::cli::Commands;
use crate::commands::dispatch::command::{Command, CommandContext};
use gradeflow_core::error::Result;

impl Command for Commands {
    fn execute(&self, ctx: &CommandContext) -> Result<()> {
        dispatch_command::execute(self, ctx)
    }
}

pub(super) mod dispatch_command {
    use super::*;

    use crate::cli::commands::{FinalizeArgs, InitArgs, RateArgs, StartArgs, TextArgs};
    use crate::commands::answer::TextField;
    use crate::commands::dispatch::macros::trace_command;
    use crate::commands::navigate::Direction;
    use crate::commands::{answer, finalize, init, navigate, reset, rubric, show, start, status};

    pub(super) fn execute(cmd: &Commands, ctx: &CommandContext) -> Result<()> {
        let result = match cmd {
            Commands::Init(args) => execute_init(ctx, args),
            Commands::Rubric => execute_rubric(ctx),
            Commands::Start(args) => execute_start(ctx, args),
            Commands::Show => execute_show(ctx),
            Commands::Status => execute_status(ctx),
            Commands::Rate(args) => execute_rate(ctx, args),
            Commands::Evidence(args) => execute_text(ctx, args, TextField::Evidence),
            Commands::Notes(args) => execute_text(ctx, args, TextField::Notes),
            Commands::Next => navigate::execute(ctx, Direction::Forward),
            Commands::Back => navigate::execute(ctx, Direction::Backward),
            Commands::Finalize(args) => execute_finalize(ctx, args),
            Commands::Reset => reset::execute(ctx),
        };
        trace_command!(ctx.cli, ctx.start, "execute_command");
        result
    }

    fn execute_init(ctx: &CommandContext, args: &InitArgs) -> Result<()> {
        init::execute(ctx.cli, ctx.root, &args.rubrics, args.output_dir.clone())
    }

    fn execute_rubric(ctx: &CommandContext) -> Result<()> {
        let workspace = ctx.discover_workspace()?;
        trace_command!(ctx.cli, ctx.start, "discover_workspace");
        rubric::execute(ctx.cli, &workspace)
    }

    fn execute_start(ctx: &CommandContext, args: &StartArgs) -> Result<()> {
        start::execute(ctx, &args.grader, &args.document, args.tag.clone())
    }

    fn execute_show(ctx: &CommandContext) -> Result<()> {
        let (_, session) = ctx.load_session()?;
        trace_command!(ctx.cli, ctx.start, "load_session");
        show::execute(ctx.cli, &session)
    }

    fn execute_status(ctx: &CommandContext) -> Result<()> {
        let (_, session) = ctx.load_session()?;
        trace_command!(ctx.cli, ctx.start, "load_session");
        status::execute(ctx.cli, &session)
    }

    fn execute_rate(ctx: &CommandContext, args: &RateArgs) -> Result<()> {
        answer::execute_rate(ctx, &args.value, args.metric.as_deref())
    }

    fn execute_text(ctx: &CommandContext, args: &TextArgs, field: TextField) -> Result<()> {
        answer::execute_text(ctx, field, &args.text, args.metric.as_deref())
    }

    fn execute_finalize(ctx: &CommandContext, args: &FinalizeArgs) -> Result<()> {
        finalize::execute(ctx, args.export.as_deref())
    }
}
