//! `complex` commands and their provider children.

use clap::{Args, Subcommand};
use contractor::models::{
    AzureComplex, Complex, ComplexSubtype, DockerComplex, LibVirtComplex, ManualComplex,
    PacketComplex, ProxmoxComplex, Site, Structure, VCenterComplex, VirtualBoxComplex,
};

use super::{Context, FieldList, IdArgs, SiteFilter};
use crate::error::{required, CliResult};
use crate::output::{col, Column};

const COLUMNS: &[Column] = &[
    col("Name", "{{name}}"),
    col("Type", "{{type}}"),
    col("Site", "{{short_id site}}"),
    col("State", "{{state}}"),
    col("Built %", "{{built_percentage}}"),
    col("Members", "{{join members short=true}}"),
];

const PROXMOX_FIELDS: &[(&str, &str)] = &[("Proxmox Username", "proxmox_username")];

const VCENTER_FIELDS: &[(&str, &str)] = &[
    ("vCenter Host", "vcenter_host"),
    ("vCenter Username", "vcenter_username"),
    ("Datacenter", "vcenter_datacenter"),
    ("Cluster", "vcenter_cluster"),
];

const AZURE_FIELDS: &[(&str, &str)] = &[
    ("Subscription", "azure_subscription_id"),
    ("Location", "azure_location"),
    ("Resource Group", "azure_resource_group"),
    ("Client Id", "azure_client_id"),
    ("Tenant Id", "azure_tenant_id"),
];

const PACKET_FIELDS: &[(&str, &str)] = &[("Project", "packet_project")];

#[derive(Subcommand, Debug)]
pub enum ComplexCommand {
    /// List complexes of every provider
    List(SiteFilter),
    /// Show a complex
    Get(IdArgs),
    /// Update the provider independent fields of a complex
    Update(ComplexUpdateArgs),
    /// Delete a complex
    Delete(IdArgs),
    /// Hand managed hosts
    #[command(subcommand)]
    Manual(PlainCommand),
    /// LibVirt hypervisors
    #[command(subcommand)]
    Libvirt(PlainCommand),
    /// Proxmox cluster
    #[command(subcommand)]
    Proxmox(ProxmoxCommand),
    /// VMware vCenter cluster
    #[command(subcommand)]
    Vcenter(VCenterCommand),
    /// VirtualBox hosts
    #[command(subcommand)]
    Virtualbox(PlainCommand),
    /// Azure resource group
    #[command(subcommand)]
    Azure(AzureCommand),
    /// Docker hosts
    #[command(subcommand)]
    Docker(PlainCommand),
    /// Packet project
    #[command(subcommand)]
    Packet(PacketCommand),
}

#[derive(Args, Debug)]
pub struct ComplexFields {
    #[arg(long)]
    pub description: Option<String>,
    /// Percentage of members that must be built
    #[arg(long)]
    pub built_percentage: Option<i64>,
    /// Ids of the member structures
    #[arg(long = "member", value_delimiter = ',')]
    pub members: Option<Vec<String>>,
}

impl ComplexFields {
    async fn apply(self, ctx: &Context, complex: &mut Complex) -> CliResult<FieldList> {
        let mut fields = FieldList::default();
        fields.set_text("description", &mut complex.description, self.description);
        fields.set(
            "built_percentage",
            &mut complex.built_percentage,
            self.built_percentage,
        );
        if let Some(members) = self.members {
            complex.members = Some(ctx.resolve_all::<Structure>(&members).await?);
            fields.push("members");
        }
        Ok(fields)
    }
}

#[derive(Args, Debug)]
pub struct ComplexUpdateArgs {
    /// Name of the complex
    pub id: String,
    #[command(flatten)]
    pub fields: ComplexFields,
}

#[derive(Args, Debug)]
pub struct ComplexCreateArgs {
    /// Complex name, also its id
    #[arg(long)]
    pub name: Option<String>,
    /// Name of the site
    #[arg(long)]
    pub site: Option<String>,
    #[command(flatten)]
    pub fields: ComplexFields,
}

impl ComplexCreateArgs {
    fn check(&self) -> CliResult<()> {
        if self.name.is_none() {
            return Err(required("--name"));
        }
        if self.site.is_none() {
            return Err(required("--site"));
        }
        Ok(())
    }
}

/// Providers without fields of their own.
#[derive(Subcommand, Debug)]
pub enum PlainCommand {
    /// Create a complex
    Create(ComplexCreateArgs),
    /// Update a complex
    Update(ComplexUpdateArgs),
    /// Show a complex
    Get(IdArgs),
}

#[derive(Args, Debug)]
pub struct ProxmoxFields {
    #[arg(long)]
    pub proxmox_username: Option<String>,
    #[arg(long)]
    pub proxmox_password: Option<String>,
}

#[derive(Args, Debug)]
pub struct ProxmoxCreateArgs {
    #[command(flatten)]
    pub base: ComplexCreateArgs,
    #[command(flatten)]
    pub proxmox: ProxmoxFields,
}

#[derive(Args, Debug)]
pub struct ProxmoxUpdateArgs {
    #[command(flatten)]
    pub base: ComplexUpdateArgs,
    #[command(flatten)]
    pub proxmox: ProxmoxFields,
}

#[derive(Subcommand, Debug)]
pub enum ProxmoxCommand {
    /// Create a Proxmox complex
    Create(ProxmoxCreateArgs),
    /// Update a Proxmox complex
    Update(ProxmoxUpdateArgs),
    /// Show a Proxmox complex
    Get(IdArgs),
}

#[derive(Args, Debug)]
pub struct VCenterFields {
    /// Id of the structure running vCenter
    #[arg(long)]
    pub vcenter_host: Option<String>,
    #[arg(long)]
    pub vcenter_username: Option<String>,
    #[arg(long)]
    pub vcenter_password: Option<String>,
    #[arg(long)]
    pub vcenter_datacenter: Option<String>,
    #[arg(long)]
    pub vcenter_cluster: Option<String>,
}

#[derive(Args, Debug)]
pub struct VCenterCreateArgs {
    #[command(flatten)]
    pub base: ComplexCreateArgs,
    #[command(flatten)]
    pub vcenter: VCenterFields,
}

#[derive(Args, Debug)]
pub struct VCenterUpdateArgs {
    #[command(flatten)]
    pub base: ComplexUpdateArgs,
    #[command(flatten)]
    pub vcenter: VCenterFields,
}

#[derive(Subcommand, Debug)]
pub enum VCenterCommand {
    /// Create a vCenter complex
    Create(VCenterCreateArgs),
    /// Update a vCenter complex
    Update(VCenterUpdateArgs),
    /// Show a vCenter complex
    Get(IdArgs),
}

#[derive(Args, Debug)]
pub struct AzureFields {
    #[arg(long)]
    pub azure_client_id: Option<String>,
    #[arg(long)]
    pub azure_password: Option<String>,
    #[arg(long)]
    pub azure_tenant_id: Option<String>,
}

#[derive(Args, Debug)]
pub struct AzureCreateArgs {
    #[command(flatten)]
    pub base: ComplexCreateArgs,
    #[command(flatten)]
    pub azure: AzureFields,
    #[arg(long)]
    pub azure_subscription_id: Option<String>,
    #[arg(long)]
    pub azure_location: Option<String>,
    #[arg(long)]
    pub azure_resource_group: Option<String>,
}

#[derive(Args, Debug)]
pub struct AzureUpdateArgs {
    #[command(flatten)]
    pub base: ComplexUpdateArgs,
    #[command(flatten)]
    pub azure: AzureFields,
}

#[derive(Subcommand, Debug)]
pub enum AzureCommand {
    /// Create an Azure complex
    Create(AzureCreateArgs),
    /// Update an Azure complex
    Update(AzureUpdateArgs),
    /// Show an Azure complex
    Get(IdArgs),
}

#[derive(Args, Debug)]
pub struct PacketCreateArgs {
    #[command(flatten)]
    pub base: ComplexCreateArgs,
    #[arg(long)]
    pub packet_auth_token: Option<String>,
    #[arg(long)]
    pub packet_project: Option<String>,
}

#[derive(Args, Debug)]
pub struct PacketUpdateArgs {
    #[command(flatten)]
    pub base: ComplexUpdateArgs,
    #[arg(long)]
    pub packet_auth_token: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum PacketCommand {
    /// Create a Packet complex
    Create(PacketCreateArgs),
    /// Update a Packet complex
    Update(PacketUpdateArgs),
    /// Show a Packet complex
    Get(IdArgs),
}

/// Run a `complex` command.
///
/// # Errors
/// Returns argument, lookup and server errors.
pub async fn run(command: ComplexCommand, ctx: &Context) -> CliResult<String> {
    let complexes = ctx.contractor.resource::<Complex>();

    match command {
        ComplexCommand::List(filter) => {
            let items = ctx.list_in_site::<Complex>(filter.site.as_deref()).await?;
            ctx.renderer.table(COLUMNS, &items)
        }
        ComplexCommand::Get(args) => {
            let complex = complexes.get(&args.id).await?;
            ctx.renderer.detail("complex", &complex)
        }
        ComplexCommand::Update(args) => {
            let mut complex = complexes.new_with_id(&args.id);
            let fields = args.fields.apply(ctx, &mut complex).await?;
            complexes.update(&mut complex, fields.names()).await?;
            ctx.renderer.detail("complex", &complex)
        }
        ComplexCommand::Delete(args) => {
            complexes.delete(&complexes.new_with_id(&args.id)).await?;
            ctx.renderer.done(&format!("Deleted complex {}", args.id))
        }
        ComplexCommand::Manual(cmd) => run_plain::<ManualComplex>(cmd, ctx).await,
        ComplexCommand::Libvirt(cmd) => run_plain::<LibVirtComplex>(cmd, ctx).await,
        ComplexCommand::Virtualbox(cmd) => run_plain::<VirtualBoxComplex>(cmd, ctx).await,
        ComplexCommand::Docker(cmd) => run_plain::<DockerComplex>(cmd, ctx).await,
        ComplexCommand::Proxmox(cmd) => run_proxmox(cmd, ctx).await,
        ComplexCommand::Vcenter(cmd) => run_vcenter(cmd, ctx).await,
        ComplexCommand::Azure(cmd) => run_azure(cmd, ctx).await,
        ComplexCommand::Packet(cmd) => run_packet(cmd, ctx).await,
    }
}

async fn create_subtype<P: ComplexSubtype>(
    ctx: &Context,
    base: ComplexCreateArgs,
    mut object: P,
) -> CliResult<P> {
    base.check()?;
    let site = ctx.resolve_opt::<Site>(base.site.as_deref()).await?;
    let complex = object.complex_mut();
    complex.name = base.name;
    complex.site = site;
    base.fields.apply(ctx, complex).await?;

    ctx.contractor.resource::<P>().create(&mut object).await?;
    Ok(object)
}

async fn update_subtype<P: ComplexSubtype>(
    ctx: &Context,
    mut object: P,
    mut fields: FieldList,
    base: ComplexFields,
) -> CliResult<P> {
    let base_fields = base.apply(ctx, object.complex_mut()).await?;
    for &name in base_fields.names() {
        fields.push(name);
    }
    ctx.contractor
        .resource::<P>()
        .update(&mut object, fields.names())
        .await?;
    Ok(object)
}

async fn show_subtype<P: ComplexSubtype>(
    ctx: &Context,
    id: &str,
    extra: &[(&str, &str)],
) -> CliResult<String> {
    let object = ctx.contractor.resource::<P>().get(id).await?;
    ctx.renderer.detail_with("complex", &object, extra)
}

fn new_subtype<P: ComplexSubtype>(ctx: &Context, id: &str) -> P {
    ctx.contractor.resource::<P>().new_with_id(id)
}

async fn run_plain<P: ComplexSubtype>(command: PlainCommand, ctx: &Context) -> CliResult<String> {
    match command {
        PlainCommand::Create(args) => {
            let object = create_subtype(ctx, args, P::default()).await?;
            ctx.renderer.detail("complex", &object)
        }
        PlainCommand::Update(args) => {
            let object = new_subtype::<P>(ctx, &args.id);
            let object = update_subtype(ctx, object, FieldList::default(), args.fields).await?;
            ctx.renderer.detail("complex", &object)
        }
        PlainCommand::Get(args) => show_subtype::<P>(ctx, &args.id, &[]).await,
    }
}

impl ProxmoxFields {
    fn apply(self, complex: &mut ProxmoxComplex, fields: &mut FieldList) {
        fields.set(
            "proxmox_username",
            &mut complex.proxmox_username,
            self.proxmox_username,
        );
        fields.set(
            "proxmox_password",
            &mut complex.proxmox_password,
            self.proxmox_password,
        );
    }
}

async fn run_proxmox(command: ProxmoxCommand, ctx: &Context) -> CliResult<String> {
    match command {
        ProxmoxCommand::Create(args) => {
            let mut object = ProxmoxComplex::default();
            args.proxmox.apply(&mut object, &mut FieldList::default());
            let object = create_subtype(ctx, args.base, object).await?;
            ctx.renderer.detail_with("complex", &object, PROXMOX_FIELDS)
        }
        ProxmoxCommand::Update(args) => {
            let mut object = new_subtype::<ProxmoxComplex>(ctx, &args.base.id);
            let mut fields = FieldList::default();
            args.proxmox.apply(&mut object, &mut fields);
            let object = update_subtype(ctx, object, fields, args.base.fields).await?;
            ctx.renderer.detail_with("complex", &object, PROXMOX_FIELDS)
        }
        ProxmoxCommand::Get(args) => {
            show_subtype::<ProxmoxComplex>(ctx, &args.id, PROXMOX_FIELDS).await
        }
    }
}

impl VCenterFields {
    async fn apply(
        self,
        ctx: &Context,
        complex: &mut VCenterComplex,
        fields: &mut FieldList,
    ) -> CliResult<()> {
        let host = ctx.resolve_opt::<Structure>(self.vcenter_host.as_deref()).await?;
        fields.set("vcenter_host", &mut complex.vcenter_host, host);
        fields.set(
            "vcenter_username",
            &mut complex.vcenter_username,
            self.vcenter_username,
        );
        fields.set(
            "vcenter_password",
            &mut complex.vcenter_password,
            self.vcenter_password,
        );
        fields.set(
            "vcenter_datacenter",
            &mut complex.vcenter_datacenter,
            self.vcenter_datacenter,
        );
        fields.set(
            "vcenter_cluster",
            &mut complex.vcenter_cluster,
            self.vcenter_cluster,
        );
        Ok(())
    }
}

async fn run_vcenter(command: VCenterCommand, ctx: &Context) -> CliResult<String> {
    match command {
        VCenterCommand::Create(args) => {
            args.base.check()?;
            let mut object = VCenterComplex::default();
            args.vcenter
                .apply(ctx, &mut object, &mut FieldList::default())
                .await?;
            let object = create_subtype(ctx, args.base, object).await?;
            ctx.renderer.detail_with("complex", &object, VCENTER_FIELDS)
        }
        VCenterCommand::Update(args) => {
            let mut object = new_subtype::<VCenterComplex>(ctx, &args.base.id);
            let mut fields = FieldList::default();
            args.vcenter.apply(ctx, &mut object, &mut fields).await?;
            let object = update_subtype(ctx, object, fields, args.base.fields).await?;
            ctx.renderer.detail_with("complex", &object, VCENTER_FIELDS)
        }
        VCenterCommand::Get(args) => {
            show_subtype::<VCenterComplex>(ctx, &args.id, VCENTER_FIELDS).await
        }
    }
}

impl AzureFields {
    fn apply(self, complex: &mut AzureComplex, fields: &mut FieldList) {
        fields.set("azure_client_id", &mut complex.azure_client_id, self.azure_client_id);
        fields.set("azure_password", &mut complex.azure_password, self.azure_password);
        fields.set("azure_tenant_id", &mut complex.azure_tenant_id, self.azure_tenant_id);
    }
}

async fn run_azure(command: AzureCommand, ctx: &Context) -> CliResult<String> {
    match command {
        AzureCommand::Create(args) => {
            let mut object = AzureComplex {
                azure_subscription_id: args.azure_subscription_id,
                azure_location: args.azure_location,
                azure_resource_group: args.azure_resource_group,
                ..AzureComplex::default()
            };
            args.azure.apply(&mut object, &mut FieldList::default());
            let object = create_subtype(ctx, args.base, object).await?;
            ctx.renderer.detail_with("complex", &object, AZURE_FIELDS)
        }
        AzureCommand::Update(args) => {
            let mut object = new_subtype::<AzureComplex>(ctx, &args.base.id);
            let mut fields = FieldList::default();
            args.azure.apply(&mut object, &mut fields);
            let object = update_subtype(ctx, object, fields, args.base.fields).await?;
            ctx.renderer.detail_with("complex", &object, AZURE_FIELDS)
        }
        AzureCommand::Get(args) => show_subtype::<AzureComplex>(ctx, &args.id, AZURE_FIELDS).await,
    }
}

async fn run_packet(command: PacketCommand, ctx: &Context) -> CliResult<String> {
    match command {
        PacketCommand::Create(args) => {
            let object = PacketComplex {
                packet_auth_token: args.packet_auth_token,
                packet_project: args.packet_project,
                ..PacketComplex::default()
            };
            let object = create_subtype(ctx, args.base, object).await?;
            ctx.renderer.detail_with("complex", &object, PACKET_FIELDS)
        }
        PacketCommand::Update(args) => {
            let mut object = new_subtype::<PacketComplex>(ctx, &args.base.id);
            let mut fields = FieldList::default();
            fields.set(
                "packet_auth_token",
                &mut object.packet_auth_token,
                args.packet_auth_token,
            );
            let object = update_subtype(ctx, object, fields, args.base.fields).await?;
            ctx.renderer.detail_with("complex", &object, PACKET_FIELDS)
        }
        PacketCommand::Get(args) => {
            show_subtype::<PacketComplex>(ctx, &args.id, PACKET_FIELDS).await
        }
    }
}
