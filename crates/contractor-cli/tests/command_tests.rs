//! Command handler tests against the in-memory transport.

use std::sync::Arc;

use cinp::memory::MemoryTransport;
use cinp::Object;
use clap::{CommandFactory, Parser};
use contractor::Contractor;
use contractor_cli::output::Renderer;
use contractor_cli::{dispatch, CliError, Cli, Command, Context};
use serde_json::{json, Value};

const SITE: &str = "/api/v1/Site/Site";
const FOUNDATION_BLUEPRINT: &str = "/api/v1/BluePrint/FoundationBluePrint";
const IPMI_FOUNDATION: &str = "/api/v1/IPMI/IPMIFoundation";
const STRUCTURE: &str = "/api/v1/Building/Structure";
const NETWORK: &str = "/api/v1/Utilities/Network";
const ADDRESS_BLOCK: &str = "/api/v1/Utilities/AddressBlock";
const RESERVED: &str = "/api/v1/Utilities/ReservedAddress";
const DYNAMIC: &str = "/api/v1/Utilities/DynamicAddress";

fn object(value: Value) -> Object {
    match value {
        Value::Object(map) => map,
        _ => Object::new(),
    }
}

fn context(transport: &MemoryTransport, json: bool) -> Context {
    Context::new(
        Contractor::new(Arc::new(transport.clone())),
        Renderer::new(json).unwrap(),
    )
}

fn parse(args: &[&str]) -> Command {
    let mut argv = vec!["contractorcli"];
    argv.extend_from_slice(args);
    Cli::try_parse_from(argv).unwrap().command
}

async fn run(transport: &MemoryTransport, args: &[&str]) -> Result<String, CliError> {
    dispatch(parse(args), &context(transport, true)).await
}

fn is_argument_error(result: &Result<String, CliError>, needle: &str) -> bool {
    matches!(
        result,
        Err(CliError::Contractor(contractor::Error::Argument(msg))) if msg.contains(needle)
    )
}

fn with_site() -> MemoryTransport {
    let transport = MemoryTransport::new().with_model(SITE, "name");
    transport.insert(SITE, "main", object(json!({"name": "main", "zone": "east"})));
    transport
}

#[test]
fn test_command_tree_is_consistent() {
    Cli::command().debug_assert();
}

#[test]
fn test_global_flags_and_aliases_parse() {
    let cli = Cli::try_parse_from(["contractorcli", "building", "get", "4", "--json"]).unwrap();
    assert!(cli.json);
    assert!(matches!(cli.command, Command::Structure(_)));

    let cli = Cli::try_parse_from(["contractorcli", "-v", "sites", "list"]).unwrap();
    assert!(cli.verbose);
    assert!(matches!(cli.command, Command::Site(_)));

    assert!(Cli::try_parse_from(["contractorcli", "foundation", "ipmi", "get"]).is_err());
}

#[tokio::test]
async fn test_reserve_requires_offset_and_reason() {
    let transport = MemoryTransport::new();

    let result = run(&transport, &["addressblock", "reserve", "1", "--reason", "gw"]).await;
    assert!(is_argument_error(&result, "--offset is required"), "{result:?}");

    let result = run(&transport, &["addressblock", "reserve", "1", "--offset", "10"]).await;
    assert!(is_argument_error(&result, "--reason is required"), "{result:?}");

    assert_eq!(transport.request_count(), 0);
}

#[tokio::test]
async fn test_structure_create_validates_before_any_request() {
    let transport = with_site();
    let result = run(
        &transport,
        &["structure", "create", "--hostname", "web1", "--site", "main", "--blueprint", "linux"],
    )
    .await;

    assert!(is_argument_error(&result, "--foundation"), "{result:?}");
    assert_eq!(transport.request_count(), 0);
}

#[tokio::test]
async fn test_site_update_sends_only_supplied_flags() {
    let transport = with_site();
    let output = run(&transport, &["site", "update", "main", "--zone", "west"])
        .await
        .unwrap();

    let update = transport.requests().pop().unwrap();
    assert_eq!(update.verb, "UPDATE");
    assert_eq!(update.uri, "/api/v1/Site/Site:main:");
    assert_eq!(update.body, Some(object(json!({"zone": "west"}))));

    let rendered: Value = serde_json::from_str(&output).unwrap();
    assert_eq!(rendered["zone"], json!("west"));
    assert_eq!(rendered["name"], json!("main"));
}

#[tokio::test]
async fn test_update_without_flags_is_an_argument_error() {
    let transport = with_site();
    let result = run(&transport, &["site", "update", "main"]).await;

    assert!(is_argument_error(&result, "no fields"), "{result:?}");
    assert_eq!(transport.request_count(), 0);
}

#[tokio::test]
async fn test_site_create_resolves_parent() {
    let transport = with_site();
    run(
        &transport,
        &["site", "create", "--name", "lab", "--parent", "main", "--description", "Lab"],
    )
    .await
    .unwrap();

    let stored = transport.object(SITE, "lab").unwrap();
    assert_eq!(stored.get("parent"), Some(&json!("/api/v1/Site/Site:main:")));
    assert_eq!(stored.get("description"), Some(&json!("Lab")));

    let result = run(&transport, &["site", "create", "--name", "x", "--parent", "nope"]).await;
    assert!(matches!(
        result,
        Err(CliError::Contractor(contractor::Error::NotFound(_)))
    ));
    assert!(transport.object(SITE, "x").is_none());
}

#[tokio::test]
async fn test_ipmi_foundation_create_uses_provider_model() {
    let transport = with_site().with_model(IPMI_FOUNDATION, "locator");
    transport.insert(
        FOUNDATION_BLUEPRINT,
        "generic-ipmi",
        object(json!({"name": "generic-ipmi"})),
    );

    let output = run(
        &transport,
        &[
            "foundation", "ipmi", "create",
            "--locator", "rack1-n4",
            "--site", "main",
            "--blueprint", "generic-ipmi",
            "--ipmi-ip-address", "10.0.0.5",
        ],
    )
    .await
    .unwrap();

    let create = transport.requests().pop().unwrap();
    assert_eq!(create.verb, "CREATE");
    assert_eq!(create.uri, IPMI_FOUNDATION);
    let body = create.body.unwrap();
    assert_eq!(body.get("locator"), Some(&json!("rack1-n4")));
    assert_eq!(body.get("site"), Some(&json!("/api/v1/Site/Site:main:")));
    assert_eq!(
        body.get("blueprint"),
        Some(&json!("/api/v1/BluePrint/FoundationBluePrint:generic-ipmi:"))
    );
    assert_eq!(body.get("ipmi_ip_address"), Some(&json!("10.0.0.5")));
    assert!(!body.contains_key("ipmi_password"));

    let rendered: Value = serde_json::from_str(&output).unwrap();
    assert_eq!(rendered["locator"], json!("rack1-n4"));
}

#[tokio::test]
async fn test_foundation_create_missing_locator() {
    let transport = with_site();
    let result = run(
        &transport,
        &["foundation", "manual", "create", "--site", "main", "--blueprint", "bp"],
    )
    .await;

    assert!(is_argument_error(&result, "--locator is required"), "{result:?}");
    assert_eq!(transport.request_count(), 0);
}

#[tokio::test]
async fn test_network_list_filters_by_site() {
    let transport = with_site();
    transport.insert(SITE, "lab", object(json!({"name": "lab"})));
    transport.insert(
        NETWORK,
        "1",
        object(json!({"name": "prod", "site": "/api/v1/Site/Site:main:", "mtu": 9000})),
    );
    transport.insert(
        NETWORK,
        "2",
        object(json!({"name": "test", "site": "/api/v1/Site/Site:lab:", "mtu": 1500})),
    );

    let output = run(&transport, &["network", "list", "--site", "main"])
        .await
        .unwrap();
    let rendered: Value = serde_json::from_str(&output).unwrap();
    assert_eq!(rendered, json!([{
        "id": "1",
        "name": "prod",
        "site": "/api/v1/Site/Site:main:",
        "mtu": 9000,
        "created": null,
        "updated": null
    }]));

    let list = transport
        .requests()
        .into_iter()
        .find(|r| r.verb == "LIST")
        .unwrap();
    assert_eq!(
        list.body,
        Some(object(json!({"site": "/api/v1/Site/Site:main:"})))
    );
}

#[tokio::test]
async fn test_addressblock_reserve_and_allocation() {
    let transport = MemoryTransport::new();
    transport.insert(
        ADDRESS_BLOCK,
        "1",
        object(json!({"name": "prod", "subnet": "10.0.0.0", "prefix": 24, "size": 254})),
    );

    run(
        &transport,
        &["addressblock", "reserve", "1", "--offset", "10", "--reason", "dhcp-excluded"],
    )
    .await
    .unwrap();
    run(&transport, &["addressblock", "dynamic", "1", "--offset", "20"])
        .await
        .unwrap();

    let reserved = transport.object(RESERVED, "1").unwrap();
    assert_eq!(
        reserved.get("address_block"),
        Some(&json!("/api/v1/Utilities/AddressBlock:1:"))
    );
    assert_eq!(reserved.get("reason"), Some(&json!("dhcp-excluded")));
    assert!(transport.object(DYNAMIC, "1").is_some());

    let output = run(&transport, &["addressblock", "allocation", "1"])
        .await
        .unwrap();
    let rendered: Value = serde_json::from_str(&output).unwrap();
    let offsets: Vec<i64> = rendered
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["offset"].as_i64().unwrap())
        .collect();
    assert_eq!(offsets, vec![10, 20]);
    assert_eq!(rendered[0]["kind"], json!("reserved"));

    let output = run(&transport, &["addressblock", "usage", "1"]).await.unwrap();
    let usage: Value = serde_json::from_str(&output).unwrap();
    assert_eq!(usage["reserved"], json!(1));
    assert_eq!(usage["dynamic"], json!(1));
    assert_eq!(usage["free"], json!(252));

    run(&transport, &["addressblock", "dereserve", "1", "--offset", "10"])
        .await
        .unwrap();
    let result = run(&transport, &["addressblock", "dereserve", "1", "--offset", "10"]).await;
    assert!(matches!(
        result,
        Err(CliError::Contractor(contractor::Error::NotFound(msg))) if msg == "Offset not found"
    ));
}

#[tokio::test]
async fn test_structure_do_create_reports_job() {
    let transport = MemoryTransport::new().with_action(STRUCTURE, "doCreate", |id, _| {
        assert_eq!(id, Some("4"));
        Ok(json!(17))
    });
    transport.insert(STRUCTURE, "4", object(json!({"hostname": "web1"})));

    let output = run(&transport, &["structure", "do-create", "4"]).await.unwrap();
    assert_eq!(output, "17");

    let ctx = context(&transport, false);
    let output = dispatch(parse(&["structure", "do-create", "4"]), &ctx)
        .await
        .unwrap();
    assert!(output.contains("Create job 17 started for Structure 4"), "{output}");
}

#[tokio::test]
async fn test_job_pause_rejected_by_server() {
    let transport = MemoryTransport::new().with_action("/api/v1/Foreman/BaseJob", "pause", |_, _| {
        Err(cinp::CinpError::InvalidRequest {
            message: "Can only pause a job if it is queued".into(),
            data: None,
        })
    });
    transport.insert("/api/v1/Foreman/BaseJob", "3", object(json!({"state": "done"})));

    let result = run(&transport, &["job", "pause", "3"]).await;
    let err = result.unwrap_err();
    assert!(
        err.to_string().contains("Can only pause a job if it is queued"),
        "{err}"
    );
}

#[tokio::test]
async fn test_cartographer_assign_resolves_foundation() {
    let transport = MemoryTransport::new().with_action(
        "/api/v1/Survey/Cartographer",
        "assign",
        |_, args| {
            assert_eq!(
                args.get("foundation"),
                Some(&json!("/api/v1/Building/Foundation:rack1-n4:"))
            );
            Ok(Value::Null)
        },
    );
    transport.insert(
        "/api/v1/Survey/Cartographer",
        "c0ffee",
        object(json!({"identifier": "c0ffee"})),
    );
    transport.insert(
        "/api/v1/Building/Foundation",
        "rack1-n4",
        object(json!({"locator": "rack1-n4"})),
    );

    let output = run(
        &transport,
        &["cartographer", "assign", "c0ffee", "--foundation", "rack1-n4"],
    )
    .await
    .unwrap();
    let rendered: Value = serde_json::from_str(&output).unwrap();
    assert!(rendered["result"]
        .as_str()
        .unwrap()
        .contains("Assigned cartographer c0ffee"));
}

#[tokio::test]
async fn test_empty_parent_clears_site_reference() {
    let transport = with_site();
    transport.insert(
        SITE,
        "lab",
        object(json!({"name": "lab", "parent": "/api/v1/Site/Site:main:"})),
    );

    run(&transport, &["site", "update", "lab", "--parent", ""])
        .await
        .unwrap();

    let requests = transport.requests();
    assert_eq!(requests.len(), 1, "{requests:?}");
    assert_eq!(requests[0].verb, "UPDATE");
    assert_eq!(requests[0].body, Some(object(json!({"parent": null}))));
    let stored = transport.object(SITE, "lab").unwrap();
    assert_eq!(stored.get("parent"), Some(&Value::Null));
}

#[tokio::test]
async fn test_empty_plot_clears_ipmi_foundation_plot() {
    let transport = MemoryTransport::new().with_model(IPMI_FOUNDATION, "locator");
    transport.insert(
        IPMI_FOUNDATION,
        "n1",
        object(json!({
            "locator": "n1",
            "plot": "/api/v1/Survey/Plot:r1:",
            "ipmi_password": "hunter2"
        })),
    );

    let output = run(&transport, &["foundation", "ipmi", "update", "n1", "--plot", ""])
        .await
        .unwrap();

    let update = transport.requests().pop().unwrap();
    assert_eq!(update.uri, "/api/v1/IPMI/IPMIFoundation:n1:");
    assert_eq!(update.body, Some(object(json!({"plot": null}))));
    assert_eq!(transport.request_count(), 1);

    let rendered: Value = serde_json::from_str(&output).unwrap();
    assert_eq!(rendered["plot"], Value::Null);
    assert!(rendered.get("ipmi_password").is_none());
}

#[tokio::test]
async fn test_do_destroy_reports_job_id_from_uri() {
    let transport = MemoryTransport::new().with_action(STRUCTURE, "doDestroy", |_, _| {
        Ok(json!("/api/v1/Foreman/StructureJob:23:"))
    });
    transport.insert(STRUCTURE, "4", object(json!({"hostname": "web1"})));

    let ctx = context(&transport, false);
    let output = dispatch(parse(&["structure", "do-destroy", "4"]), &ctx)
        .await
        .unwrap();
    assert!(output.contains("Destroy job 23 started for Structure 4"), "{output}");
}
