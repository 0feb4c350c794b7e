//! `structure` commands (also available as `building`).

use clap::{Args, Subcommand};
use contractor::models::{Foundation, Site, Structure, StructureBluePrint};

use super::{parse_object_opt, run_lifecycle, Context, FieldList, IdArgs, Lifecycle, SiteFilter};
use crate::error::{required, CliResult};
use crate::output::{col, Column};

const COLUMNS: &[Column] = &[
    col("Id", "{{id}}"),
    col("Hostname", "{{hostname}}"),
    col("Site", "{{short_id site}}"),
    col("BluePrint", "{{short_id blueprint}}"),
    col("Foundation", "{{short_id foundation}}"),
    col("State", "{{state}}"),
];

#[derive(Subcommand, Debug)]
pub enum StructureCommand {
    /// List structures
    List(SiteFilter),
    /// Show a structure
    Get(IdArgs),
    /// Create a structure on a foundation
    Create(StructureCreateArgs),
    /// Update a structure
    Update(StructureUpdateArgs),
    /// Delete a structure
    Delete(IdArgs),
    /// Show the fully merged config values of a structure
    Config(IdArgs),
    /// Show the job currently working on a structure
    Job(IdArgs),
    /// Start building a structure
    DoCreate(IdArgs),
    /// Start tearing down a structure
    DoDestroy(IdArgs),
}

#[derive(Args, Debug)]
pub struct StructureFields {
    #[arg(long)]
    pub hostname: Option<String>,
    /// Name of the site
    #[arg(long)]
    pub site: Option<String>,
    /// Name of the structure blueprint
    #[arg(long)]
    pub blueprint: Option<String>,
    /// Config values as a JSON object
    #[arg(long)]
    pub config_values: Option<String>,
}

#[derive(Args, Debug)]
pub struct StructureCreateArgs {
    /// Locator of the foundation to build on
    #[arg(long)]
    pub foundation: Option<String>,
    #[command(flatten)]
    pub fields: StructureFields,
}

#[derive(Args, Debug)]
pub struct StructureUpdateArgs {
    /// Id of the structure
    pub id: String,
    #[command(flatten)]
    pub fields: StructureFields,
}

impl StructureFields {
    async fn apply(self, ctx: &Context, structure: &mut Structure) -> CliResult<FieldList> {
        let mut fields = FieldList::default();
        fields.set("hostname", &mut structure.hostname, self.hostname);
        let site = ctx.resolve_opt::<Site>(self.site.as_deref()).await?;
        fields.set("site", &mut structure.site, site);
        let blueprint = ctx
            .resolve_opt::<StructureBluePrint>(self.blueprint.as_deref())
            .await?;
        fields.set("blueprint", &mut structure.blueprint, blueprint);
        let config_values = parse_object_opt("--config-values", self.config_values.as_deref())?;
        fields.set("config_values", &mut structure.config_values, config_values);
        Ok(fields)
    }
}

/// Run a `structure` command.
///
/// # Errors
/// Returns argument, lookup and server errors.
pub async fn run(command: StructureCommand, ctx: &Context) -> CliResult<String> {
    let structures = ctx.contractor.resource::<Structure>();

    match command {
        StructureCommand::List(filter) => {
            let items = ctx.list_in_site::<Structure>(filter.site.as_deref()).await?;
            ctx.renderer.table(COLUMNS, &items)
        }
        StructureCommand::Get(args) => {
            let structure = structures.get(&args.id).await?;
            ctx.renderer.detail("structure", &structure)
        }
        StructureCommand::Create(args) => {
            let fields = &args.fields;
            if fields.hostname.is_none() {
                return Err(required("--hostname"));
            }
            if fields.site.is_none() {
                return Err(required("--site"));
            }
            if fields.blueprint.is_none() {
                return Err(required("--blueprint"));
            }
            let foundation = args.foundation.ok_or_else(|| required("--foundation"))?;

            let mut structure = structures.new_object();
            structure.foundation = Some(ctx.resolve::<Foundation>(&foundation).await?);
            args.fields.apply(ctx, &mut structure).await?;
            structures.create(&mut structure).await?;
            ctx.renderer.detail("structure", &structure)
        }
        StructureCommand::Update(args) => {
            let mut structure = structures.new_with_id(&args.id);
            let fields = args.fields.apply(ctx, &mut structure).await?;
            structures.update(&mut structure, fields.names()).await?;
            ctx.renderer.detail("structure", &structure)
        }
        StructureCommand::Delete(args) => {
            structures.delete(&structures.new_with_id(&args.id)).await?;
            ctx.renderer.done(&format!("Deleted structure {}", args.id))
        }
        StructureCommand::Config(args) => {
            run_lifecycle::<Structure>(ctx, Lifecycle::Config, &args.id).await
        }
        StructureCommand::Job(args) => {
            run_lifecycle::<Structure>(ctx, Lifecycle::Job, &args.id).await
        }
        StructureCommand::DoCreate(args) => {
            run_lifecycle::<Structure>(ctx, Lifecycle::DoCreate, &args.id).await
        }
        StructureCommand::DoDestroy(args) => {
            run_lifecycle::<Structure>(ctx, Lifecycle::DoDestroy, &args.id).await
        }
    }
}
