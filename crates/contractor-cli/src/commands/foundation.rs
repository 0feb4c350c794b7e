//! `foundation` commands and their provider children.
//!
//! Foundations are created through a provider (`foundation ipmi create`);
//! everything else works on any foundation through the base commands.

use clap::{Args, Subcommand};
use contractor::models::{
    AmtFoundation, AzureComplex, AzureFoundation, DockerComplex, DockerFoundation, Foundation,
    FoundationBluePrint, FoundationSubtype, IpmiFoundation, LibVirtComplex, LibVirtFoundation,
    ManualFoundation, PacketComplex, PacketFoundation, Plot, ProxmoxComplex, ProxmoxFoundation,
    Site, TestFoundation, VCenterComplex, VCenterFoundation, VirtualBoxComplex,
    VirtualBoxFoundation,
};
use contractor::Resource;

use super::{parse_object_opt, run_lifecycle, Context, FieldList, IdArgs, Lifecycle, SiteFilter};
use crate::error::{required, CliResult};
use crate::output::{col, Column};

const COLUMNS: &[Column] = &[
    col("Locator", "{{locator}}"),
    col("Type", "{{type}}"),
    col("Site", "{{short_id site}}"),
    col("BluePrint", "{{short_id blueprint}}"),
    col("State", "{{state}}"),
    col("Structure", "{{short_id structure}}"),
];

const AMT_FIELDS: &[(&str, &str)] = &[
    ("AMT Username", "amt_username"),
    ("AMT Address", "amt_ip_address"),
];

const IPMI_FIELDS: &[(&str, &str)] = &[
    ("IPMI Username", "ipmi_username"),
    ("IPMI Address", "ipmi_ip_address"),
    ("SOL Port", "ipmi_sol_port"),
    ("Plot", "plot"),
];

#[derive(Subcommand, Debug)]
pub enum FoundationCommand {
    /// List foundations of every provider
    List(SiteFilter),
    /// Show a foundation
    Get(IdArgs),
    /// Update the provider independent fields of a foundation
    Update(FoundationUpdateArgs),
    /// Delete a foundation
    Delete(IdArgs),
    /// Show the fully merged config values of a foundation
    Config(IdArgs),
    /// Show the job currently working on a foundation
    Job(IdArgs),
    /// Start building a foundation
    DoCreate(IdArgs),
    /// Start tearing down a foundation
    DoDestroy(IdArgs),
    /// Intel AMT foundations
    #[command(subcommand)]
    Amt(AmtCommand),
    /// IPMI foundations
    #[command(subcommand)]
    Ipmi(IpmiCommand),
    /// Hand managed foundations
    #[command(subcommand)]
    Manual(PlainCommand),
    /// LibVirt virtual machines
    #[command(subcommand)]
    Libvirt(VmCommand),
    /// Proxmox virtual machines
    #[command(subcommand)]
    Proxmox(ProxmoxCommand),
    /// VMware vCenter virtual machines
    #[command(subcommand)]
    Vcenter(VmCommand),
    /// VirtualBox virtual machines
    #[command(subcommand)]
    Virtualbox(VmCommand),
    /// Azure virtual machines
    #[command(subcommand)]
    Azure(VmCommand),
    /// Docker containers
    #[command(subcommand)]
    Docker(VmCommand),
    /// Packet devices
    #[command(subcommand)]
    Packet(VmCommand),
    /// Test foundations
    #[command(subcommand)]
    Test(PlainCommand),
}

// ============================================================================
// Shared provider arguments
// ============================================================================

#[derive(Args, Debug)]
pub struct FoundationCreateArgs {
    /// Locator, also the foundation id
    #[arg(long)]
    pub locator: Option<String>,
    /// Name of the site
    #[arg(long)]
    pub site: Option<String>,
    /// Name of the foundation blueprint
    #[arg(long)]
    pub blueprint: Option<String>,
}

impl FoundationCreateArgs {
    fn check(&self) -> CliResult<()> {
        if self.locator.is_none() {
            return Err(required("--locator"));
        }
        if self.site.is_none() {
            return Err(required("--site"));
        }
        if self.blueprint.is_none() {
            return Err(required("--blueprint"));
        }
        Ok(())
    }
}

#[derive(Args, Debug)]
pub struct ProviderFields {
    /// Name of the site
    #[arg(long)]
    pub site: Option<String>,
    /// Name of the foundation blueprint
    #[arg(long)]
    pub blueprint: Option<String>,
}

impl ProviderFields {
    async fn apply(self, ctx: &Context, foundation: &mut Foundation) -> CliResult<FieldList> {
        let mut fields = FieldList::default();
        let site = ctx.resolve_opt::<Site>(self.site.as_deref()).await?;
        fields.set("site", &mut foundation.site, site);
        let blueprint = ctx
            .resolve_opt::<FoundationBluePrint>(self.blueprint.as_deref())
            .await?;
        fields.set("blueprint", &mut foundation.blueprint, blueprint);
        Ok(fields)
    }
}

#[derive(Args, Debug)]
pub struct FoundationUpdateArgs {
    /// Locator of the foundation
    pub id: String,
    #[command(flatten)]
    pub fields: ProviderFields,
    /// Id map as a JSON object
    #[arg(long)]
    pub id_map: Option<String>,
}

#[derive(Args, Debug)]
pub struct ProviderUpdateArgs {
    /// Locator of the foundation
    pub id: String,
    #[command(flatten)]
    pub fields: ProviderFields,
}

/// Providers without fields of their own.
#[derive(Subcommand, Debug)]
pub enum PlainCommand {
    /// Create a foundation
    Create(FoundationCreateArgs),
    /// Update a foundation
    Update(ProviderUpdateArgs),
    /// Show a foundation
    Get(IdArgs),
}

#[derive(Args, Debug)]
pub struct VmCreateArgs {
    #[command(flatten)]
    pub base: FoundationCreateArgs,
    /// Name of the complex hosting the virtual machine
    #[arg(long)]
    pub complex: Option<String>,
}

/// Providers hosting virtual foundations on a complex.
#[derive(Subcommand, Debug)]
pub enum VmCommand {
    /// Create a virtual foundation
    Create(VmCreateArgs),
    /// Update a virtual foundation
    Update(ProviderUpdateArgs),
    /// Show a virtual foundation
    Get(IdArgs),
}

#[derive(Args, Debug)]
pub struct ProxmoxCreateArgs {
    #[command(flatten)]
    pub vm: VmCreateArgs,
    /// Proxmox VM id, assigned by Proxmox when omitted
    #[arg(long)]
    pub vmid: Option<i64>,
}

#[derive(Subcommand, Debug)]
pub enum ProxmoxCommand {
    /// Create a Proxmox virtual machine
    Create(ProxmoxCreateArgs),
    /// Update a Proxmox virtual machine
    Update(ProviderUpdateArgs),
    /// Show a Proxmox virtual machine
    Get(IdArgs),
}

// ============================================================================
// AMT / IPMI
// ============================================================================

#[derive(Args, Debug)]
pub struct AmtFields {
    #[arg(long)]
    pub amt_username: Option<String>,
    #[arg(long)]
    pub amt_password: Option<String>,
    #[arg(long)]
    pub amt_ip_address: Option<String>,
}

impl AmtFields {
    fn apply(self, foundation: &mut AmtFoundation, fields: &mut FieldList) {
        fields.set("amt_username", &mut foundation.amt_username, self.amt_username);
        fields.set("amt_password", &mut foundation.amt_password, self.amt_password);
        fields.set("amt_ip_address", &mut foundation.amt_ip_address, self.amt_ip_address);
    }
}

#[derive(Args, Debug)]
pub struct AmtCreateArgs {
    #[command(flatten)]
    pub base: FoundationCreateArgs,
    #[command(flatten)]
    pub amt: AmtFields,
}

#[derive(Args, Debug)]
pub struct AmtUpdateArgs {
    #[command(flatten)]
    pub base: ProviderUpdateArgs,
    #[command(flatten)]
    pub amt: AmtFields,
}

#[derive(Subcommand, Debug)]
pub enum AmtCommand {
    /// Create an AMT foundation
    Create(AmtCreateArgs),
    /// Update an AMT foundation
    Update(AmtUpdateArgs),
    /// Show an AMT foundation
    Get(IdArgs),
}

#[derive(Args, Debug)]
pub struct IpmiFields {
    #[arg(long)]
    pub ipmi_username: Option<String>,
    #[arg(long)]
    pub ipmi_password: Option<String>,
    #[arg(long)]
    pub ipmi_ip_address: Option<String>,
    /// Serial-over-LAN console port
    #[arg(long)]
    pub ipmi_sol_port: Option<String>,
    /// Name of the plot the hardware is in
    #[arg(long)]
    pub plot: Option<String>,
}

impl IpmiFields {
    async fn apply(
        self,
        ctx: &Context,
        foundation: &mut IpmiFoundation,
        fields: &mut FieldList,
    ) -> CliResult<()> {
        fields.set("ipmi_username", &mut foundation.ipmi_username, self.ipmi_username);
        fields.set("ipmi_password", &mut foundation.ipmi_password, self.ipmi_password);
        fields.set("ipmi_ip_address", &mut foundation.ipmi_ip_address, self.ipmi_ip_address);
        fields.set("ipmi_sol_port", &mut foundation.ipmi_sol_port, self.ipmi_sol_port);
        ctx.set_reference::<Plot>(fields, "plot", &mut foundation.plot, self.plot.as_deref())
            .await
    }
}

#[derive(Args, Debug)]
pub struct IpmiCreateArgs {
    #[command(flatten)]
    pub base: FoundationCreateArgs,
    #[command(flatten)]
    pub ipmi: IpmiFields,
}

#[derive(Args, Debug)]
pub struct IpmiUpdateArgs {
    #[command(flatten)]
    pub base: ProviderUpdateArgs,
    #[command(flatten)]
    pub ipmi: IpmiFields,
}

#[derive(Subcommand, Debug)]
pub enum IpmiCommand {
    /// Create an IPMI foundation
    Create(IpmiCreateArgs),
    /// Update an IPMI foundation
    Update(IpmiUpdateArgs),
    /// Show an IPMI foundation
    Get(IdArgs),
}

// ============================================================================
// Handlers
// ============================================================================

/// Run a `foundation` command.
///
/// # Errors
/// Returns argument, lookup and server errors.
pub async fn run(command: FoundationCommand, ctx: &Context) -> CliResult<String> {
    let foundations = ctx.contractor.resource::<Foundation>();

    match command {
        FoundationCommand::List(filter) => {
            let items = ctx.list_in_site::<Foundation>(filter.site.as_deref()).await?;
            ctx.renderer.table(COLUMNS, &items)
        }
        FoundationCommand::Get(args) => {
            let foundation = foundations.get(&args.id).await?;
            ctx.renderer.detail("foundation", &foundation)
        }
        FoundationCommand::Update(args) => {
            let mut foundation = foundations.new_with_id(&args.id);
            let mut fields = args.fields.apply(ctx, &mut foundation).await?;
            let id_map = parse_object_opt("--id-map", args.id_map.as_deref())?;
            fields.set("id_map", &mut foundation.id_map, id_map);
            foundations.update(&mut foundation, fields.names()).await?;
            ctx.renderer.detail("foundation", &foundation)
        }
        FoundationCommand::Delete(args) => {
            foundations.delete(&foundations.new_with_id(&args.id)).await?;
            ctx.renderer.done(&format!("Deleted foundation {}", args.id))
        }
        FoundationCommand::Config(args) => {
            run_lifecycle::<Foundation>(ctx, Lifecycle::Config, &args.id).await
        }
        FoundationCommand::Job(args) => {
            run_lifecycle::<Foundation>(ctx, Lifecycle::Job, &args.id).await
        }
        FoundationCommand::DoCreate(args) => {
            run_lifecycle::<Foundation>(ctx, Lifecycle::DoCreate, &args.id).await
        }
        FoundationCommand::DoDestroy(args) => {
            run_lifecycle::<Foundation>(ctx, Lifecycle::DoDestroy, &args.id).await
        }
        FoundationCommand::Amt(cmd) => run_amt(cmd, ctx).await,
        FoundationCommand::Ipmi(cmd) => run_ipmi(cmd, ctx).await,
        FoundationCommand::Manual(cmd) => run_plain::<ManualFoundation>(cmd, ctx).await,
        FoundationCommand::Test(cmd) => run_plain::<TestFoundation>(cmd, ctx).await,
        FoundationCommand::Libvirt(cmd) => {
            run_vm::<LibVirtFoundation, LibVirtComplex>(
                cmd,
                ctx,
                &[("Complex", "libvirt_complex"), ("UUID", "libvirt_uuid")],
                |f, complex| f.libvirt_complex = Some(complex),
            )
            .await
        }
        FoundationCommand::Proxmox(cmd) => run_proxmox(cmd, ctx).await,
        FoundationCommand::Vcenter(cmd) => {
            run_vm::<VCenterFoundation, VCenterComplex>(
                cmd,
                ctx,
                &[("Complex", "vcenter_complex"), ("UUID", "vcenter_uuid")],
                |f, complex| f.vcenter_complex = Some(complex),
            )
            .await
        }
        FoundationCommand::Virtualbox(cmd) => {
            run_vm::<VirtualBoxFoundation, VirtualBoxComplex>(
                cmd,
                ctx,
                &[("Complex", "virtualbox_complex"), ("UUID", "virtualbox_uuid")],
                |f, complex| f.virtualbox_complex = Some(complex),
            )
            .await
        }
        FoundationCommand::Azure(cmd) => {
            run_vm::<AzureFoundation, AzureComplex>(
                cmd,
                ctx,
                &[("Complex", "azure_complex"), ("Resource Name", "azure_resource_name")],
                |f, complex| f.azure_complex = Some(complex),
            )
            .await
        }
        FoundationCommand::Docker(cmd) => {
            run_vm::<DockerFoundation, DockerComplex>(
                cmd,
                ctx,
                &[("Complex", "docker_complex"), ("Docker Id", "docker_id")],
                |f, complex| f.docker_complex = Some(complex),
            )
            .await
        }
        FoundationCommand::Packet(cmd) => {
            run_vm::<PacketFoundation, PacketComplex>(
                cmd,
                ctx,
                &[("Complex", "packet_complex"), ("UUID", "packet_uuid")],
                |f, complex| f.packet_complex = Some(complex),
            )
            .await
        }
    }
}

/// Fill the base fields of a new subtype object and create it.
async fn create_subtype<P: FoundationSubtype>(
    ctx: &Context,
    base: FoundationCreateArgs,
    mut object: P,
) -> CliResult<P> {
    base.check()?;
    let site = ctx.resolve_opt::<Site>(base.site.as_deref()).await?;
    let blueprint = ctx
        .resolve_opt::<FoundationBluePrint>(base.blueprint.as_deref())
        .await?;

    let foundation = object.foundation_mut();
    foundation.locator = base.locator;
    foundation.site = site;
    foundation.blueprint = blueprint;

    ctx.contractor.resource::<P>().create(&mut object).await?;
    Ok(object)
}

async fn update_subtype<P: FoundationSubtype>(
    ctx: &Context,
    mut object: P,
    mut fields: FieldList,
    base: ProviderFields,
) -> CliResult<P> {
    let base_fields = base.apply(ctx, object.foundation_mut()).await?;
    for &name in base_fields.names() {
        fields.push(name);
    }
    ctx.contractor
        .resource::<P>()
        .update(&mut object, fields.names())
        .await?;
    Ok(object)
}

async fn show_subtype<P: FoundationSubtype>(
    ctx: &Context,
    id: &str,
    extra: &[(&str, &str)],
) -> CliResult<String> {
    let object = ctx.contractor.resource::<P>().get(id).await?;
    ctx.renderer.detail_with("foundation", &object, extra)
}

async fn run_plain<P: FoundationSubtype>(
    command: PlainCommand,
    ctx: &Context,
) -> CliResult<String> {
    match command {
        PlainCommand::Create(args) => {
            let object = create_subtype(ctx, args, P::default()).await?;
            ctx.renderer.detail("foundation", &object)
        }
        PlainCommand::Update(args) => {
            let object = ctx.contractor.resource::<P>().new_with_id(&args.id);
            let object = update_subtype(ctx, object, FieldList::default(), args.fields).await?;
            ctx.renderer.detail("foundation", &object)
        }
        PlainCommand::Get(args) => show_subtype::<P>(ctx, &args.id, &[]).await,
    }
}

async fn run_vm<P, C>(
    command: VmCommand,
    ctx: &Context,
    extra: &[(&str, &str)],
    set_complex: impl FnOnce(&mut P, String),
) -> CliResult<String>
where
    P: FoundationSubtype,
    C: Resource,
{
    match command {
        VmCommand::Create(args) => {
            args.base.check()?;
            let complex = args.complex.ok_or_else(|| required("--complex"))?;
            let mut object = P::default();
            set_complex(&mut object, ctx.resolve::<C>(&complex).await?);
            let object = create_subtype(ctx, args.base, object).await?;
            ctx.renderer.detail_with("foundation", &object, extra)
        }
        VmCommand::Update(args) => {
            let object = ctx.contractor.resource::<P>().new_with_id(&args.id);
            let object = update_subtype(ctx, object, FieldList::default(), args.fields).await?;
            ctx.renderer.detail_with("foundation", &object, extra)
        }
        VmCommand::Get(args) => show_subtype::<P>(ctx, &args.id, extra).await,
    }
}

async fn run_proxmox(command: ProxmoxCommand, ctx: &Context) -> CliResult<String> {
    const EXTRA: &[(&str, &str)] = &[("Complex", "proxmox_complex"), ("VM Id", "proxmox_vmid")];

    match command {
        ProxmoxCommand::Create(args) => {
            let vm = args.vm;
            vm.base.check()?;
            let complex = vm.complex.ok_or_else(|| required("--complex"))?;
            let object = ProxmoxFoundation {
                proxmox_complex: Some(ctx.resolve::<ProxmoxComplex>(&complex).await?),
                proxmox_vmid: args.vmid,
                ..ProxmoxFoundation::default()
            };
            let object = create_subtype(ctx, vm.base, object).await?;
            ctx.renderer.detail_with("foundation", &object, EXTRA)
        }
        ProxmoxCommand::Update(args) => {
            let object = ctx
                .contractor
                .resource::<ProxmoxFoundation>()
                .new_with_id(&args.id);
            let object = update_subtype(ctx, object, FieldList::default(), args.fields).await?;
            ctx.renderer.detail_with("foundation", &object, EXTRA)
        }
        ProxmoxCommand::Get(args) => show_subtype::<ProxmoxFoundation>(ctx, &args.id, EXTRA).await,
    }
}

async fn run_amt(command: AmtCommand, ctx: &Context) -> CliResult<String> {
    match command {
        AmtCommand::Create(args) => {
            let mut object = AmtFoundation::default();
            args.amt.apply(&mut object, &mut FieldList::default());
            let object = create_subtype(ctx, args.base, object).await?;
            ctx.renderer.detail_with("foundation", &object, AMT_FIELDS)
        }
        AmtCommand::Update(args) => {
            let mut object = ctx
                .contractor
                .resource::<AmtFoundation>()
                .new_with_id(&args.base.id);
            let mut fields = FieldList::default();
            args.amt.apply(&mut object, &mut fields);
            let object = update_subtype(ctx, object, fields, args.base.fields).await?;
            ctx.renderer.detail_with("foundation", &object, AMT_FIELDS)
        }
        AmtCommand::Get(args) => show_subtype::<AmtFoundation>(ctx, &args.id, AMT_FIELDS).await,
    }
}

async fn run_ipmi(command: IpmiCommand, ctx: &Context) -> CliResult<String> {
    match command {
        IpmiCommand::Create(args) => {
            args.base.check()?;
            let mut object = IpmiFoundation::default();
            args.ipmi
                .apply(ctx, &mut object, &mut FieldList::default())
                .await?;
            let object = create_subtype(ctx, args.base, object).await?;
            ctx.renderer.detail_with("foundation", &object, IPMI_FIELDS)
        }
        IpmiCommand::Update(args) => {
            let mut object = ctx
                .contractor
                .resource::<IpmiFoundation>()
                .new_with_id(&args.base.id);
            let mut fields = FieldList::default();
            args.ipmi.apply(ctx, &mut object, &mut fields).await?;
            let object = update_subtype(ctx, object, fields, args.base.fields).await?;
            ctx.renderer.detail_with("foundation", &object, IPMI_FIELDS)
        }
        IpmiCommand::Get(args) => show_subtype::<IpmiFoundation>(ctx, &args.id, IPMI_FIELDS).await,
    }
}
