//! `network` commands.

use clap::{Args, Subcommand};
use contractor::models::{Network, Site};

use super::{Context, FieldList, IdArgs, SiteFilter};
use crate::error::{required, CliResult};
use crate::output::{col, Column};

const COLUMNS: &[Column] = &[
    col("Id", "{{id}}"),
    col("Name", "{{name}}"),
    col("Site", "{{short_id site}}"),
    col("MTU", "{{mtu}}"),
];

#[derive(Subcommand, Debug)]
pub enum NetworkCommand {
    /// List networks
    List(SiteFilter),
    /// Show a network
    Get(IdArgs),
    /// Create a network
    Create(NetworkCreateArgs),
    /// Update a network
    Update(NetworkUpdateArgs),
    /// Delete a network
    Delete(IdArgs),
}

#[derive(Args, Debug)]
pub struct NetworkFields {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub mtu: Option<i64>,
}

#[derive(Args, Debug)]
pub struct NetworkCreateArgs {
    /// Name of the site
    #[arg(long)]
    pub site: Option<String>,
    #[command(flatten)]
    pub fields: NetworkFields,
}

#[derive(Args, Debug)]
pub struct NetworkUpdateArgs {
    /// Id of the network
    pub id: String,
    #[command(flatten)]
    pub fields: NetworkFields,
}

impl NetworkFields {
    fn apply(self, network: &mut Network) -> FieldList {
        let mut fields = FieldList::default();
        fields.set("name", &mut network.name, self.name);
        fields.set("mtu", &mut network.mtu, self.mtu);
        fields
    }
}

/// Run a `network` command.
///
/// # Errors
/// Returns argument, lookup and server errors.
pub async fn run(command: NetworkCommand, ctx: &Context) -> CliResult<String> {
    let networks = ctx.contractor.resource::<Network>();

    match command {
        NetworkCommand::List(filter) => {
            let items = ctx.list_in_site::<Network>(filter.site.as_deref()).await?;
            ctx.renderer.table(COLUMNS, &items)
        }
        NetworkCommand::Get(args) => {
            let network = networks.get(&args.id).await?;
            ctx.renderer.detail("network", &network)
        }
        NetworkCommand::Create(args) => {
            if args.fields.name.is_none() {
                return Err(required("--name"));
            }
            let site = args.site.ok_or_else(|| required("--site"))?;

            let mut network = networks.new_object();
            network.site = Some(ctx.resolve::<Site>(&site).await?);
            args.fields.apply(&mut network);
            networks.create(&mut network).await?;
            ctx.renderer.detail("network", &network)
        }
        NetworkCommand::Update(args) => {
            let mut network = networks.new_with_id(&args.id);
            let fields = args.fields.apply(&mut network);
            networks.update(&mut network, fields.names()).await?;
            ctx.renderer.detail("network", &network)
        }
        NetworkCommand::Delete(args) => {
            networks.delete(&networks.new_with_id(&args.id)).await?;
            ctx.renderer.done(&format!("Deleted network {}", args.id))
        }
    }
}
