//! `cartographer` commands.
//!
//! Cartographers register themselves, so there is no create.

use clap::{Args, Subcommand};
use contractor::models::{Cartographer, Foundation};

use super::{Context, FieldList, IdArgs};
use crate::error::{required, CliResult};
use crate::output::{col, Column};

const COLUMNS: &[Column] = &[
    col("Identifier", "{{identifier}}"),
    col("Message", "{{message}}"),
    col("Foundation", "{{short_id foundation}}"),
    col("Last Checkin", "{{last_checkin}}"),
];

#[derive(Subcommand, Debug)]
pub enum CartographerCommand {
    /// List cartographers
    List,
    /// Show a cartographer
    Get(IdArgs),
    /// Update the message shown to a cartographer
    Update(CartographerUpdateArgs),
    /// Delete a cartographer
    Delete(IdArgs),
    /// Assign the hardware of a cartographer to a foundation
    Assign(CartographerAssignArgs),
}

#[derive(Args, Debug)]
pub struct CartographerUpdateArgs {
    /// Identifier of the cartographer
    pub id: String,
    #[arg(long)]
    pub message: Option<String>,
}

#[derive(Args, Debug)]
pub struct CartographerAssignArgs {
    /// Identifier of the cartographer
    pub id: String,
    /// Locator of the foundation
    #[arg(long)]
    pub foundation: Option<String>,
}

/// Run a `cartographer` command.
///
/// # Errors
/// Returns argument, lookup and server errors.
pub async fn run(command: CartographerCommand, ctx: &Context) -> CliResult<String> {
    let cartographers = ctx.contractor.resource::<Cartographer>();

    match command {
        CartographerCommand::List => {
            let items = cartographers.list_all().await?;
            ctx.renderer.table(COLUMNS, &items)
        }
        CartographerCommand::Get(args) => {
            let cartographer = cartographers.get(&args.id).await?;
            ctx.renderer.detail("cartographer", &cartographer)
        }
        CartographerCommand::Update(args) => {
            let mut cartographer = cartographers.new_with_id(&args.id);
            let mut fields = FieldList::default();
            fields.set_text("message", &mut cartographer.message, args.message);
            cartographers.update(&mut cartographer, fields.names()).await?;
            ctx.renderer.detail("cartographer", &cartographer)
        }
        CartographerCommand::Delete(args) => {
            cartographers
                .delete(&cartographers.new_with_id(&args.id))
                .await?;
            ctx.renderer.done(&format!("Deleted cartographer {}", args.id))
        }
        CartographerCommand::Assign(args) => {
            let foundation = args.foundation.ok_or_else(|| required("--foundation"))?;
            let foundation_uri = ctx.resolve::<Foundation>(&foundation).await?;
            let cartographer = cartographers.new_with_id(&args.id);
            cartographers.assign(&cartographer, &foundation_uri).await?;
            ctx.renderer.done(&format!(
                "Assigned cartographer {} to foundation {foundation}",
                args.id
            ))
        }
    }
}
