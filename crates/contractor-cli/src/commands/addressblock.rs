//! `addressblock` commands, including allocation of offsets within a block.

use clap::{Args, Subcommand};
use contractor::models::{AddressBlock, Site, Structure};

use super::{Context, FieldList, IdArgs, SiteFilter};
use crate::error::{required, CliResult};
use crate::output::{col, Column};

const COLUMNS: &[Column] = &[
    col("Id", "{{id}}"),
    col("Name", "{{name}}"),
    col("Site", "{{short_id site}}"),
    col("Subnet", "{{subnet}}/{{prefix}}"),
    col("Gateway", "{{gateway}}"),
    col("Size", "{{size}}"),
];

const ALLOCATION_COLUMNS: &[Column] = &[
    col("Offset", "{{offset}}"),
    col("Ip Address", "{{ip_address}}"),
    col("Kind", "{{kind}}"),
    col("Detail", "{{detail}}"),
];

#[derive(Subcommand, Debug)]
pub enum AddressBlockCommand {
    /// List address blocks
    List(SiteFilter),
    /// Show an address block
    Get(IdArgs),
    /// Create an address block
    Create(AddressBlockCreateArgs),
    /// Update an address block
    Update(AddressBlockUpdateArgs),
    /// Delete an address block
    Delete(IdArgs),
    /// Summarise how much of a block is in use
    Usage(IdArgs),
    /// List every used offset of a block
    Allocation(IdArgs),
    /// Hold an offset back from allocation
    Reserve(ReserveArgs),
    /// Release a reserved offset
    Dereserve(OffsetArgs),
    /// Add an offset to the DHCP pool
    Dynamic(DynamicArgs),
    /// Remove an offset from the DHCP pool
    Dedynamic(OffsetArgs),
    /// Bind an offset to an interface of a structure
    Assign(AssignArgs),
}

#[derive(Args, Debug)]
pub struct AddressBlockFields {
    #[arg(long)]
    pub name: Option<String>,
    /// Network address, e.g. 10.0.0.0
    #[arg(long)]
    pub subnet: Option<String>,
    /// Prefix length
    #[arg(long)]
    pub prefix: Option<i64>,
    /// Offset of the gateway within the block
    #[arg(long)]
    pub gateway_offset: Option<i64>,
}

impl AddressBlockFields {
    fn apply(self, block: &mut AddressBlock) -> FieldList {
        let mut fields = FieldList::default();
        fields.set("name", &mut block.name, self.name);
        fields.set("subnet", &mut block.subnet, self.subnet);
        fields.set("prefix", &mut block.prefix, self.prefix);
        fields.set("gateway_offset", &mut block.gateway_offset, self.gateway_offset);
        fields
    }
}

#[derive(Args, Debug)]
pub struct AddressBlockCreateArgs {
    /// Name of the site
    #[arg(long)]
    pub site: Option<String>,
    #[command(flatten)]
    pub fields: AddressBlockFields,
}

#[derive(Args, Debug)]
pub struct AddressBlockUpdateArgs {
    /// Id of the address block
    pub id: String,
    #[command(flatten)]
    pub fields: AddressBlockFields,
}

#[derive(Args, Debug)]
pub struct OffsetArgs {
    /// Id of the address block
    pub id: String,
    #[arg(long)]
    pub offset: Option<i64>,
}

#[derive(Args, Debug)]
pub struct ReserveArgs {
    /// Id of the address block
    pub id: String,
    #[arg(long)]
    pub offset: Option<i64>,
    /// Why the offset is held back
    #[arg(long)]
    pub reason: Option<String>,
}

#[derive(Args, Debug)]
pub struct DynamicArgs {
    /// Id of the address block
    pub id: String,
    #[arg(long)]
    pub offset: Option<i64>,
    /// URI of the PXE entry served to clients
    #[arg(long)]
    pub pxe: Option<String>,
}

#[derive(Args, Debug)]
pub struct AssignArgs {
    /// Id of the address block
    pub id: String,
    #[arg(long)]
    pub offset: Option<i64>,
    /// Id of the structure using the address
    #[arg(long)]
    pub structure: Option<String>,
    /// Interface on the structure, e.g. eth0
    #[arg(long)]
    pub interface_name: Option<String>,
    /// Make this the primary address of the structure
    #[arg(long)]
    pub primary: bool,
}

/// Run an `addressblock` command.
///
/// # Errors
/// Returns argument, lookup and server errors.
pub async fn run(command: AddressBlockCommand, ctx: &Context) -> CliResult<String> {
    let blocks = ctx.contractor.resource::<AddressBlock>();

    match command {
        AddressBlockCommand::List(filter) => {
            let items = ctx.list_in_site::<AddressBlock>(filter.site.as_deref()).await?;
            ctx.renderer.table(COLUMNS, &items)
        }
        AddressBlockCommand::Get(args) => {
            let block = blocks.get(&args.id).await?;
            ctx.renderer.detail("address_block", &block)
        }
        AddressBlockCommand::Create(args) => {
            let fields = &args.fields;
            if fields.name.is_none() {
                return Err(required("--name"));
            }
            if fields.subnet.is_none() {
                return Err(required("--subnet"));
            }
            if fields.prefix.is_none() {
                return Err(required("--prefix"));
            }
            let site = args.site.ok_or_else(|| required("--site"))?;

            let mut block = blocks.new_object();
            block.site = Some(ctx.resolve::<Site>(&site).await?);
            args.fields.apply(&mut block);
            blocks.create(&mut block).await?;
            ctx.renderer.detail("address_block", &block)
        }
        AddressBlockCommand::Update(args) => {
            let mut block = blocks.new_with_id(&args.id);
            let fields = args.fields.apply(&mut block);
            blocks.update(&mut block, fields.names()).await?;
            ctx.renderer.detail("address_block", &block)
        }
        AddressBlockCommand::Delete(args) => {
            blocks.delete(&blocks.new_with_id(&args.id)).await?;
            ctx.renderer.done(&format!("Deleted address block {}", args.id))
        }
        AddressBlockCommand::Usage(args) => {
            let usage = blocks.usage(&args.id).await?;
            ctx.renderer.detail("usage", &usage)
        }
        AddressBlockCommand::Allocation(args) => {
            let allocations = blocks.allocation(&args.id).await?;
            ctx.renderer.table(ALLOCATION_COLUMNS, &allocations)
        }
        AddressBlockCommand::Reserve(args) => {
            let offset = args.offset.ok_or_else(|| required("--offset"))?;
            let reason = args.reason.ok_or_else(|| required("--reason"))?;
            let reserved = blocks.reserve(&args.id, offset, &reason).await?;
            if ctx.renderer.is_json() {
                return ctx.renderer.detail("address", &reserved);
            }
            ctx.renderer.done(&format!(
                "Reserved offset {offset} ({}) in {}",
                reserved.ip_address.as_deref().unwrap_or("-"),
                args.id
            ))
        }
        AddressBlockCommand::Dereserve(args) => {
            let offset = args.offset.ok_or_else(|| required("--offset"))?;
            blocks.dereserve(&args.id, offset).await?;
            ctx.renderer
                .done(&format!("Released reserved offset {offset} in {}", args.id))
        }
        AddressBlockCommand::Dynamic(args) => {
            let offset = args.offset.ok_or_else(|| required("--offset"))?;
            let dynamic = blocks.dynamic(&args.id, offset, args.pxe.as_deref()).await?;
            if ctx.renderer.is_json() {
                return ctx.renderer.detail("address", &dynamic);
            }
            ctx.renderer.done(&format!(
                "Added offset {offset} ({}) in {} to the dynamic pool",
                dynamic.ip_address.as_deref().unwrap_or("-"),
                args.id
            ))
        }
        AddressBlockCommand::Dedynamic(args) => {
            let offset = args.offset.ok_or_else(|| required("--offset"))?;
            blocks.dedynamic(&args.id, offset).await?;
            ctx.renderer.done(&format!(
                "Removed offset {offset} in {} from the dynamic pool",
                args.id
            ))
        }
        AddressBlockCommand::Assign(args) => {
            let offset = args.offset.ok_or_else(|| required("--offset"))?;
            let structure = args.structure.ok_or_else(|| required("--structure"))?;
            let interface_name = args
                .interface_name
                .ok_or_else(|| required("--interface-name"))?;
            let networked = ctx.resolve::<Structure>(&structure).await?;
            let address = blocks
                .assign(&args.id, offset, &networked, &interface_name, args.primary)
                .await?;
            ctx.renderer.detail("address", &address)
        }
    }
}
