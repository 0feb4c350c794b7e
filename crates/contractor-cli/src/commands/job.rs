//! `job` commands.
//!
//! Jobs are created by `do-create` and `do-destroy`; here they can be
//! inspected and steered.

use clap::Subcommand;
use contractor::models::BaseJob;

use super::{Context, IdArgs, SiteFilter};
use crate::error::CliResult;
use crate::output::{col, Column};

const COLUMNS: &[Column] = &[
    col("Id", "{{id}}"),
    col("Site", "{{short_id site}}"),
    col("Script", "{{script_name}}"),
    col("State", "{{state}}"),
    col("Message", "{{message}}"),
    col("Updated", "{{updated}}"),
];

#[derive(Subcommand, Debug)]
pub enum JobCommand {
    /// List jobs
    List(SiteFilter),
    /// Show a job
    Get(IdArgs),
    /// Pause a running job
    Pause(IdArgs),
    /// Resume a paused job
    Resume(IdArgs),
    /// Restart a failed job from its last completed step
    Reset(IdArgs),
    /// Undo the completed steps of a failed or paused job
    Rollback(IdArgs),
    /// Show the raw job runner state
    State(IdArgs),
}

/// Run a `job` command.
///
/// # Errors
/// Returns lookup and server errors.
pub async fn run(command: JobCommand, ctx: &Context) -> CliResult<String> {
    let jobs = ctx.contractor.resource::<BaseJob>();

    match command {
        JobCommand::List(filter) => {
            let items = ctx.list_in_site::<BaseJob>(filter.site.as_deref()).await?;
            ctx.renderer.table(COLUMNS, &items)
        }
        JobCommand::Get(args) => {
            let job = jobs.get(&args.id).await?;
            ctx.renderer.detail("job", &job)
        }
        JobCommand::Pause(args) => {
            jobs.pause(&jobs.new_with_id(&args.id)).await?;
            ctx.renderer.done(&format!("Paused job {}", args.id))
        }
        JobCommand::Resume(args) => {
            jobs.resume(&jobs.new_with_id(&args.id)).await?;
            ctx.renderer.done(&format!("Resumed job {}", args.id))
        }
        JobCommand::Reset(args) => {
            jobs.reset(&jobs.new_with_id(&args.id)).await?;
            ctx.renderer.done(&format!("Reset job {}", args.id))
        }
        JobCommand::Rollback(args) => {
            jobs.rollback(&jobs.new_with_id(&args.id)).await?;
            ctx.renderer.done(&format!("Rolling back job {}", args.id))
        }
        JobCommand::State(args) => {
            let state = jobs.job_runner_state(&jobs.new_with_id(&args.id)).await?;
            ctx.renderer.value(&state)
        }
    }
}
