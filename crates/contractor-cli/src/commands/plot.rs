//! `plot` commands.

use clap::{Args, Subcommand};
use contractor::models::Plot;

use super::{Context, FieldList, IdArgs};
use crate::error::{required, CliResult};
use crate::output::{col, Column};

const COLUMNS: &[Column] = &[
    col("Name", "{{name}}"),
    col("Corners", "{{corners}}"),
    col("Description", "{{description}}"),
    col("Parent", "{{short_id parent}}"),
];

#[derive(Subcommand, Debug)]
pub enum PlotCommand {
    /// List plots
    List,
    /// Show a plot
    Get(IdArgs),
    /// Create a plot
    Create(PlotCreateArgs),
    /// Update a plot
    Update(PlotUpdateArgs),
    /// Delete a plot
    Delete(IdArgs),
}

#[derive(Args, Debug)]
pub struct PlotFields {
    #[arg(long)]
    pub corners: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    /// Name of the enclosing plot
    #[arg(long)]
    pub parent: Option<String>,
}

#[derive(Args, Debug)]
pub struct PlotCreateArgs {
    /// Plot name, also its id
    #[arg(long)]
    pub name: Option<String>,
    #[command(flatten)]
    pub fields: PlotFields,
}

#[derive(Args, Debug)]
pub struct PlotUpdateArgs {
    /// Name of the plot
    pub id: String,
    #[command(flatten)]
    pub fields: PlotFields,
}

impl PlotFields {
    async fn apply(self, ctx: &Context, plot: &mut Plot) -> CliResult<FieldList> {
        let mut fields = FieldList::default();
        fields.set_text("corners", &mut plot.corners, self.corners);
        fields.set_text("description", &mut plot.description, self.description);
        ctx.set_reference::<Plot>(&mut fields, "parent", &mut plot.parent, self.parent.as_deref())
            .await?;
        Ok(fields)
    }
}

/// Run a `plot` command.
///
/// # Errors
/// Returns argument, lookup and server errors.
pub async fn run(command: PlotCommand, ctx: &Context) -> CliResult<String> {
    let plots = ctx.contractor.resource::<Plot>();

    match command {
        PlotCommand::List => {
            let items = plots.list_all().await?;
            ctx.renderer.table(COLUMNS, &items)
        }
        PlotCommand::Get(args) => {
            let plot = plots.get(&args.id).await?;
            ctx.renderer.detail("plot", &plot)
        }
        PlotCommand::Create(args) => {
            let mut plot = plots.new_object();
            plot.name = Some(args.name.ok_or_else(|| required("--name"))?);
            args.fields.apply(ctx, &mut plot).await?;
            plots.create(&mut plot).await?;
            ctx.renderer.detail("plot", &plot)
        }
        PlotCommand::Update(args) => {
            let mut plot = plots.new_with_id(&args.id);
            let fields = args.fields.apply(ctx, &mut plot).await?;
            plots.update(&mut plot, fields.names()).await?;
            ctx.renderer.detail("plot", &plot)
        }
        PlotCommand::Delete(args) => {
            plots.delete(&plots.new_with_id(&args.id)).await?;
            ctx.renderer.done(&format!("Deleted plot {}", args.id))
        }
    }
}
