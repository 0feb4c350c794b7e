//! `site` commands.

use clap::{Args, Subcommand};
use contractor::models::Site;

use super::{parse_object_opt, Context, FieldList, IdArgs};
use crate::error::{required, CliResult};
use crate::output::{col, Column};

const COLUMNS: &[Column] = &[
    col("Name", "{{name}}"),
    col("Zone", "{{zone}}"),
    col("Description", "{{description}}"),
    col("Parent", "{{short_id parent}}"),
    col("Created", "{{created}}"),
];

#[derive(Subcommand, Debug)]
pub enum SiteCommand {
    /// List sites
    List,
    /// Show a site
    Get(IdArgs),
    /// Create a site
    Create(SiteArgs),
    /// Update a site
    Update(SiteUpdateArgs),
    /// Delete a site
    Delete(IdArgs),
    /// Show the fully merged config values of a site
    Config(IdArgs),
}

#[derive(Args, Debug)]
pub struct SiteArgs {
    /// Site name, also its id
    #[arg(long)]
    pub name: Option<String>,
    #[command(flatten)]
    pub fields: SiteFields,
}

#[derive(Args, Debug)]
pub struct SiteUpdateArgs {
    /// Id of the site
    pub id: String,
    #[command(flatten)]
    pub fields: SiteFields,
}

#[derive(Args, Debug)]
pub struct SiteFields {
    /// DNS zone
    #[arg(long)]
    pub zone: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    /// Name of the parent site
    #[arg(long)]
    pub parent: Option<String>,
    /// Config values as a JSON object
    #[arg(long)]
    pub config_values: Option<String>,
}

impl SiteFields {
    async fn apply(self, ctx: &Context, site: &mut Site) -> CliResult<FieldList> {
        let mut fields = FieldList::default();
        fields.set_text("zone", &mut site.zone, self.zone);
        fields.set_text("description", &mut site.description, self.description);
        ctx.set_reference::<Site>(&mut fields, "parent", &mut site.parent, self.parent.as_deref())
            .await?;
        let config_values = parse_object_opt("--config-values", self.config_values.as_deref())?;
        fields.set("config_values", &mut site.config_values, config_values);
        Ok(fields)
    }
}

/// Run a `site` command.
///
/// # Errors
/// Returns argument, lookup and server errors.
pub async fn run(command: SiteCommand, ctx: &Context) -> CliResult<String> {
    let sites = ctx.contractor.resource::<Site>();

    match command {
        SiteCommand::List => {
            let items = sites.list_all().await?;
            ctx.renderer.table(COLUMNS, &items)
        }
        SiteCommand::Get(args) => {
            let site = sites.get(&args.id).await?;
            ctx.renderer.detail("site", &site)
        }
        SiteCommand::Create(args) => {
            let mut site = sites.new_object();
            site.name = Some(args.name.ok_or_else(|| required("--name"))?);
            args.fields.apply(ctx, &mut site).await?;
            sites.create(&mut site).await?;
            ctx.renderer.detail("site", &site)
        }
        SiteCommand::Update(args) => {
            let mut site = sites.new_with_id(&args.id);
            let fields = args.fields.apply(ctx, &mut site).await?;
            sites.update(&mut site, fields.names()).await?;
            ctx.renderer.detail("site", &site)
        }
        SiteCommand::Delete(args) => {
            let site = sites.new_with_id(&args.id);
            sites.delete(&site).await?;
            ctx.renderer.done(&format!("Deleted site {}", args.id))
        }
        SiteCommand::Config(args) => {
            let site = sites.new_with_id(&args.id);
            let config = sites.get_config(&site).await?;
            ctx.renderer.value(&config.into())
        }
    }
}
