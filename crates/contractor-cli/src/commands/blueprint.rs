//! `blueprint foundation` and `blueprint structure` commands.

use clap::{Args, Subcommand};
use contractor::models::{FoundationBluePrint, StructureBluePrint};

use super::{parse_object_opt, Context, FieldList, IdArgs};
use crate::error::{required, CliResult};
use crate::output::{col, Column};

const FOUNDATION_COLUMNS: &[Column] = &[
    col("Name", "{{name}}"),
    col("Description", "{{description}}"),
    col("Parents", "{{join parent_list short=true}}"),
    col("Foundation Types", "{{join foundation_type_list}}"),
];

const STRUCTURE_COLUMNS: &[Column] = &[
    col("Name", "{{name}}"),
    col("Description", "{{description}}"),
    col("Parents", "{{join parent_list short=true}}"),
    col("Foundation BluePrints", "{{join foundation_blueprint_list short=true}}"),
];

#[derive(Subcommand, Debug)]
pub enum BlueprintCommand {
    /// Foundation blueprints
    #[command(subcommand)]
    Foundation(FoundationBluePrintCommand),
    /// Structure blueprints
    #[command(subcommand)]
    Structure(StructureBluePrintCommand),
}

#[derive(Subcommand, Debug)]
pub enum FoundationBluePrintCommand {
    /// List foundation blueprints
    List,
    /// Show a foundation blueprint
    Get(IdArgs),
    /// Create a foundation blueprint
    Create(FoundationBluePrintCreateArgs),
    /// Update a foundation blueprint
    Update(FoundationBluePrintUpdateArgs),
    /// Delete a foundation blueprint
    Delete(IdArgs),
}

#[derive(Subcommand, Debug)]
pub enum StructureBluePrintCommand {
    /// List structure blueprints
    List,
    /// Show a structure blueprint
    Get(IdArgs),
    /// Create a structure blueprint
    Create(StructureBluePrintCreateArgs),
    /// Update a structure blueprint
    Update(StructureBluePrintUpdateArgs),
    /// Delete a structure blueprint
    Delete(IdArgs),
}

#[derive(Args, Debug)]
pub struct CommonBluePrintFields {
    #[arg(long)]
    pub description: Option<String>,
    /// Names of parent blueprints
    #[arg(long = "parent", value_delimiter = ',')]
    pub parents: Option<Vec<String>>,
    /// Config values as a JSON object
    #[arg(long)]
    pub config_values: Option<String>,
}

#[derive(Args, Debug)]
pub struct FoundationBluePrintFields {
    #[command(flatten)]
    pub common: CommonBluePrintFields,
    /// Foundation types this blueprint applies to
    #[arg(long = "foundation-type", value_delimiter = ',')]
    pub foundation_types: Option<Vec<String>>,
    /// Interface names of the physical hardware
    #[arg(long = "interface-name", value_delimiter = ',')]
    pub physical_interface_names: Option<Vec<String>>,
    /// Template as a JSON object
    #[arg(long)]
    pub template: Option<String>,
}

#[derive(Args, Debug)]
pub struct FoundationBluePrintCreateArgs {
    /// Blueprint name, also its id
    #[arg(long)]
    pub name: Option<String>,
    #[command(flatten)]
    pub fields: FoundationBluePrintFields,
}

#[derive(Args, Debug)]
pub struct FoundationBluePrintUpdateArgs {
    /// Id of the blueprint
    pub id: String,
    #[command(flatten)]
    pub fields: FoundationBluePrintFields,
}

#[derive(Args, Debug)]
pub struct StructureBluePrintFields {
    #[command(flatten)]
    pub common: CommonBluePrintFields,
    /// Names of the foundation blueprints structures can be built on
    #[arg(long = "foundation-blueprint", value_delimiter = ',')]
    pub foundation_blueprints: Option<Vec<String>>,
}

#[derive(Args, Debug)]
pub struct StructureBluePrintCreateArgs {
    /// Blueprint name, also its id
    #[arg(long)]
    pub name: Option<String>,
    #[command(flatten)]
    pub fields: StructureBluePrintFields,
}

#[derive(Args, Debug)]
pub struct StructureBluePrintUpdateArgs {
    /// Id of the blueprint
    pub id: String,
    #[command(flatten)]
    pub fields: StructureBluePrintFields,
}

impl FoundationBluePrintFields {
    async fn apply(
        self,
        ctx: &Context,
        blueprint: &mut FoundationBluePrint,
    ) -> CliResult<FieldList> {
        let mut fields = FieldList::default();
        let common = self.common;
        fields.set_text("description", &mut blueprint.description, common.description);
        if let Some(parents) = common.parents {
            blueprint.parent_list = Some(ctx.resolve_all::<FoundationBluePrint>(&parents).await?);
            fields.push("parent_list");
        }
        let config_values = parse_object_opt("--config-values", common.config_values.as_deref())?;
        fields.set("config_values", &mut blueprint.config_values, config_values);
        fields.set(
            "foundation_type_list",
            &mut blueprint.foundation_type_list,
            self.foundation_types,
        );
        fields.set(
            "physical_interface_names",
            &mut blueprint.physical_interface_names,
            self.physical_interface_names,
        );
        let template = parse_object_opt("--template", self.template.as_deref())?;
        fields.set("template", &mut blueprint.template, template);
        Ok(fields)
    }
}

impl StructureBluePrintFields {
    async fn apply(
        self,
        ctx: &Context,
        blueprint: &mut StructureBluePrint,
    ) -> CliResult<FieldList> {
        let mut fields = FieldList::default();
        let common = self.common;
        fields.set_text("description", &mut blueprint.description, common.description);
        if let Some(parents) = common.parents {
            blueprint.parent_list = Some(ctx.resolve_all::<StructureBluePrint>(&parents).await?);
            fields.push("parent_list");
        }
        let config_values = parse_object_opt("--config-values", common.config_values.as_deref())?;
        fields.set("config_values", &mut blueprint.config_values, config_values);
        if let Some(names) = self.foundation_blueprints {
            blueprint.foundation_blueprint_list =
                Some(ctx.resolve_all::<FoundationBluePrint>(&names).await?);
            fields.push("foundation_blueprint_list");
        }
        Ok(fields)
    }
}

/// Run a `blueprint` command.
///
/// # Errors
/// Returns argument, lookup and server errors.
pub async fn run(command: BlueprintCommand, ctx: &Context) -> CliResult<String> {
    match command {
        BlueprintCommand::Foundation(cmd) => run_foundation(cmd, ctx).await,
        BlueprintCommand::Structure(cmd) => run_structure(cmd, ctx).await,
    }
}

async fn run_foundation(command: FoundationBluePrintCommand, ctx: &Context) -> CliResult<String> {
    let blueprints = ctx.contractor.resource::<FoundationBluePrint>();

    match command {
        FoundationBluePrintCommand::List => {
            let items = blueprints.list_all().await?;
            ctx.renderer.table(FOUNDATION_COLUMNS, &items)
        }
        FoundationBluePrintCommand::Get(args) => {
            let blueprint = blueprints.get(&args.id).await?;
            ctx.renderer.detail("foundation_blueprint", &blueprint)
        }
        FoundationBluePrintCommand::Create(args) => {
            let mut blueprint = blueprints.new_object();
            blueprint.name = Some(args.name.ok_or_else(|| required("--name"))?);
            args.fields.apply(ctx, &mut blueprint).await?;
            blueprints.create(&mut blueprint).await?;
            ctx.renderer.detail("foundation_blueprint", &blueprint)
        }
        FoundationBluePrintCommand::Update(args) => {
            let mut blueprint = blueprints.new_with_id(&args.id);
            let fields = args.fields.apply(ctx, &mut blueprint).await?;
            blueprints.update(&mut blueprint, fields.names()).await?;
            ctx.renderer.detail("foundation_blueprint", &blueprint)
        }
        FoundationBluePrintCommand::Delete(args) => {
            blueprints.delete(&blueprints.new_with_id(&args.id)).await?;
            ctx.renderer
                .done(&format!("Deleted foundation blueprint {}", args.id))
        }
    }
}

async fn run_structure(command: StructureBluePrintCommand, ctx: &Context) -> CliResult<String> {
    let blueprints = ctx.contractor.resource::<StructureBluePrint>();

    match command {
        StructureBluePrintCommand::List => {
            let items = blueprints.list_all().await?;
            ctx.renderer.table(STRUCTURE_COLUMNS, &items)
        }
        StructureBluePrintCommand::Get(args) => {
            let blueprint = blueprints.get(&args.id).await?;
            ctx.renderer.detail("structure_blueprint", &blueprint)
        }
        StructureBluePrintCommand::Create(args) => {
            let mut blueprint = blueprints.new_object();
            blueprint.name = Some(args.name.ok_or_else(|| required("--name"))?);
            args.fields.apply(ctx, &mut blueprint).await?;
            blueprints.create(&mut blueprint).await?;
            ctx.renderer.detail("structure_blueprint", &blueprint)
        }
        StructureBluePrintCommand::Update(args) => {
            let mut blueprint = blueprints.new_with_id(&args.id);
            let fields = args.fields.apply(ctx, &mut blueprint).await?;
            blueprints.update(&mut blueprint, fields.names()).await?;
            ctx.renderer.detail("structure_blueprint", &blueprint)
        }
        StructureBluePrintCommand::Delete(args) => {
            blueprints.delete(&blueprints.new_with_id(&args.id)).await?;
            ctx.renderer
                .done(&format!("Deleted structure blueprint {}", args.id))
        }
    }
}
