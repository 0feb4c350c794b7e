//! Command groups and the helpers they share.

use cinp::Object;
use clap::{Args, Subcommand};
use contractor::models::{BaseJob, Site};
use contractor::{Buildable, Configurable, Contractor, Resource};
use serde_json::Value;

use crate::error::{CliError, CliResult};
use crate::output::Renderer;

pub mod addressblock;
pub mod blueprint;
pub mod cartographer;
pub mod complex;
pub mod foundation;
pub mod job;
pub mod network;
pub mod plot;
pub mod site;
pub mod structure;

/// Top level command groups.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Work with sites
    #[command(subcommand, visible_alias = "sites")]
    Site(site::SiteCommand),

    /// Work with foundation and structure blueprints
    #[command(subcommand)]
    Blueprint(blueprint::BlueprintCommand),

    /// Work with structures
    #[command(subcommand, visible_alias = "building")]
    Structure(structure::StructureCommand),

    /// Work with foundations
    #[command(subcommand)]
    Foundation(foundation::FoundationCommand),

    /// Work with complexes
    #[command(subcommand)]
    Complex(complex::ComplexCommand),

    /// Work with networks
    #[command(subcommand)]
    Network(network::NetworkCommand),

    /// Work with address blocks and their addresses
    #[command(subcommand, name = "addressblock")]
    AddressBlock(addressblock::AddressBlockCommand),

    /// Work with jobs
    #[command(subcommand)]
    Job(job::JobCommand),

    /// Work with plots
    #[command(subcommand)]
    Plot(plot::PlotCommand),

    /// Work with cartographers
    #[command(subcommand)]
    Cartographer(cartographer::CartographerCommand),
}

/// Everything a command handler needs.
pub struct Context {
    pub contractor: Contractor,
    pub renderer: Renderer,
}

impl Context {
    #[must_use]
    pub fn new(contractor: Contractor, renderer: Renderer) -> Self {
        Self {
            contractor,
            renderer,
        }
    }

    /// URI of an existing object of kind `R`, checked with a Get.
    ///
    /// # Errors
    /// Fails if the object does not exist.
    pub async fn resolve<R: Resource>(&self, id: &str) -> CliResult<String> {
        Ok(self.contractor.resource::<R>().resolve(id).await?)
    }

    /// Like [`Context::resolve`] for an optional flag value.
    ///
    /// # Errors
    /// Fails if the object does not exist.
    pub async fn resolve_opt<R: Resource>(&self, id: Option<&str>) -> CliResult<Option<String>> {
        match id {
            Some(id) => Ok(Some(self.resolve::<R>(id).await?)),
            None => Ok(None),
        }
    }

    /// Set an optional reference field from a flag. An empty value clears
    /// the field without a lookup; any other value must resolve.
    ///
    /// # Errors
    /// Fails if the referenced object does not exist.
    pub async fn set_reference<R: Resource>(
        &self,
        fields: &mut FieldList,
        name: &'static str,
        slot: &mut Option<String>,
        value: Option<&str>,
    ) -> CliResult<()> {
        match value {
            None => {}
            Some("") => {
                *slot = None;
                fields.push(name);
            }
            Some(id) => {
                *slot = Some(self.resolve::<R>(id).await?);
                fields.push(name);
            }
        }
        Ok(())
    }

    /// URIs for a list of ids, each checked with a Get.
    ///
    /// # Errors
    /// Fails on the first id that does not exist.
    pub async fn resolve_all<R: Resource>(&self, ids: &[String]) -> CliResult<Vec<String>> {
        let mut uris = Vec::with_capacity(ids.len());
        for id in ids {
            uris.push(self.resolve::<R>(id).await?);
        }
        Ok(uris)
    }

    /// All objects of kind `R`, or only those in `site` when given.
    ///
    /// # Errors
    /// Fails if the site does not exist or listing fails.
    pub async fn list_in_site<R: Resource>(&self, site: Option<&str>) -> CliResult<Vec<R>> {
        let resources = self.contractor.resource::<R>();
        let Some(site) = site else {
            return Ok(resources.list_all().await?);
        };

        let site_uri = self.resolve::<Site>(site).await?;
        let mut values = Object::new();
        values.insert("site".into(), Value::String(site_uri));
        Ok(resources.list(Some("site"), values).collect().await?)
    }
}

/// Run one command.
///
/// # Errors
/// Returns the first error hit by the command.
pub async fn dispatch(command: Command, ctx: &Context) -> CliResult<String> {
    match command {
        Command::Site(cmd) => site::run(cmd, ctx).await,
        Command::Blueprint(cmd) => blueprint::run(cmd, ctx).await,
        Command::Structure(cmd) => structure::run(cmd, ctx).await,
        Command::Foundation(cmd) => foundation::run(cmd, ctx).await,
        Command::Complex(cmd) => complex::run(cmd, ctx).await,
        Command::Network(cmd) => network::run(cmd, ctx).await,
        Command::AddressBlock(cmd) => addressblock::run(cmd, ctx).await,
        Command::Job(cmd) => job::run(cmd, ctx).await,
        Command::Plot(cmd) => plot::run(cmd, ctx).await,
        Command::Cartographer(cmd) => cartographer::run(cmd, ctx).await,
    }
}

/// Positional object id.
#[derive(Args, Debug, Clone)]
pub struct IdArgs {
    /// Id of the object
    pub id: String,
}

/// Optional site filter for list commands.
#[derive(Args, Debug, Clone, Default)]
pub struct SiteFilter {
    /// Only list objects in this site
    #[arg(long)]
    pub site: Option<String>,
}

/// Collects the names of fields set from flags, in the order they were set.
#[derive(Debug, Default)]
pub struct FieldList(Vec<&'static str>);

impl FieldList {
    /// Assign `value` to `slot` when the flag was given.
    pub fn set<T>(&mut self, name: &'static str, slot: &mut Option<T>, value: Option<T>) {
        if let Some(value) = value {
            *slot = Some(value);
            self.0.push(name);
        }
    }

    /// Like [`FieldList::set`], but an empty string clears the field.
    pub fn set_text(
        &mut self,
        name: &'static str,
        slot: &mut Option<String>,
        value: Option<String>,
    ) {
        if let Some(value) = value {
            *slot = Some(value).filter(|v| !v.is_empty());
            self.0.push(name);
        }
    }

    /// Record a field assigned by the caller.
    pub fn push(&mut self, name: &'static str) {
        self.0.push(name);
    }

    #[must_use]
    pub fn names(&self) -> &[&'static str] {
        &self.0
    }
}

/// Parse a `--config-values` JSON object.
///
/// # Errors
/// Argument error if the text is not a JSON object.
pub fn parse_object(flag: &str, text: &str) -> CliResult<Object> {
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(map)) => Ok(map),
        _ => Err(argument(format!("{flag} must be a JSON object"))),
    }
}

/// Parse an optional JSON object flag.
///
/// # Errors
/// As for [`parse_object`].
pub fn parse_object_opt(flag: &str, text: Option<&str>) -> CliResult<Option<Object>> {
    text.map(|t| parse_object(flag, t)).transpose()
}

/// Lifecycle actions shared by foundations and structures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Config,
    Job,
    DoCreate,
    DoDestroy,
}

/// Run a lifecycle action on the object `id` of kind `R`.
///
/// # Errors
/// Returns lookup and action errors.
pub async fn run_lifecycle<R: Buildable + Configurable>(
    ctx: &Context,
    action: Lifecycle,
    id: &str,
) -> CliResult<String> {
    let resources = ctx.contractor.resource::<R>();
    let object = resources.new_with_id(id);
    let model = R::KIND.model;

    match action {
        Lifecycle::Config => {
            let config = resources.get_config(&object).await?;
            ctx.renderer.value(&config.into())
        }
        Lifecycle::Job => match resources.get_job(&object).await? {
            Some(job_uri) => {
                let job_id = cinp::uri::extract_id(&job_uri)
                    .ok_or_else(|| argument(format!("unusable job uri {job_uri}")))?;
                let job = ctx.contractor.resource::<BaseJob>().get(&job_id).await?;
                ctx.renderer.detail("job", &job)
            }
            None => ctx.renderer.done(&format!("No job for {model} {id}")),
        },
        Lifecycle::DoCreate => {
            let job = resources.do_create(&object).await?;
            if ctx.renderer.is_json() {
                return ctx.renderer.value(&job);
            }
            ctx.renderer.done(&format!(
                "Create job {} started for {model} {id}",
                job_label(&job)
            ))
        }
        Lifecycle::DoDestroy => {
            let job = resources.do_destroy(&object).await?;
            if ctx.renderer.is_json() {
                return ctx.renderer.value(&job);
            }
            ctx.renderer.done(&format!(
                "Destroy job {} started for {model} {id}",
                job_label(&job)
            ))
        }
    }
}

/// Job id as returned by `doCreate`/`doDestroy`, which may be a number or a URI.
fn job_label(job: &Value) -> String {
    match job {
        Value::String(s) => cinp::uri::short_id(s),
        other => other.to_string(),
    }
}

pub(crate) fn argument(message: impl Into<String>) -> CliError {
    contractor::Error::argument(message).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_list_tracks_supplied_flags() {
        let mut fields = FieldList::default();
        let mut zone = Some("east".to_string());
        let mut description = Some("old".to_string());
        let mut mtu: Option<i64> = None;

        fields.set_text("zone", &mut zone, None);
        fields.set_text("description", &mut description, Some(String::new()));
        fields.set("mtu", &mut mtu, Some(9000));

        assert_eq!(fields.names(), &["description", "mtu"]);
        assert_eq!(zone.as_deref(), Some("east"));
        assert!(description.is_none());
        assert_eq!(mtu, Some(9000));
    }

    #[test]
    fn test_job_label() {
        assert_eq!(job_label(&serde_json::json!(17)), "17");
        assert_eq!(job_label(&serde_json::json!("/api/v1/Foreman/BaseJob:23:")), "23");
        assert_eq!(job_label(&serde_json::json!("23")), "23");
    }

    #[test]
    fn test_parse_object() {
        let object = parse_object("--config-values", r#"{"dns": ["10.0.0.1"]}"#).unwrap();
        assert!(object.contains_key("dns"));
        assert!(matches!(
            parse_object("--config-values", "[1, 2]"),
            Err(CliError::Contractor(contractor::Error::Argument(_)))
        ));
    }
}
