//! Binding contract tests against the in-memory transport.

use std::collections::HashSet;
use std::sync::Arc;

use cinp::memory::MemoryTransport;
use cinp::{CinpError, Object};
use contractor::models::{AddressBlock, BaseJob, Cartographer, Network, Site, Structure};
use contractor::{AllocationKind, Contractor, Error, Resource};
use serde_json::{json, Value};

fn object(value: Value) -> Object {
    match value {
        Value::Object(map) => map,
        _ => Object::new(),
    }
}

fn setup(transport: &MemoryTransport) -> Contractor {
    Contractor::new(Arc::new(transport.clone()))
}

#[tokio::test]
async fn test_create_then_get_returns_sent_fields() {
    let transport = MemoryTransport::new().with_model("/api/v1/Site/Site", "name");
    let sites = setup(&transport).resource::<Site>();

    let mut site = sites.new_object();
    site.name = Some("main".into());
    site.description = Some("Main datacenter".into());
    sites.create(&mut site).await.unwrap();

    assert_eq!(site.id(), Some("main"));
    assert_eq!(site.uri().as_deref(), Some("/api/v1/Site/Site:main:"));

    let fetched = sites.get("main").await.unwrap();
    assert_eq!(fetched.name.as_deref(), Some("main"));
    assert_eq!(fetched.description.as_deref(), Some("Main datacenter"));

    let create = &transport.requests()[0];
    assert_eq!(create.verb, "CREATE");
    let body = create.body.as_ref().unwrap();
    assert_eq!(body.len(), 2, "null fields must not be sent: {body:?}");
}

#[tokio::test]
async fn test_create_twice_is_rejected_locally() {
    let transport = MemoryTransport::new().with_model("/api/v1/Site/Site", "name");
    let sites = setup(&transport).resource::<Site>();

    let mut site = sites.new_with_id("main");
    let result = sites.create(&mut site).await;
    assert!(matches!(result, Err(Error::Argument(_))));
    assert_eq!(transport.request_count(), 0);
}

#[tokio::test]
async fn test_update_sends_only_selected_fields() {
    let transport = MemoryTransport::new().with_model("/api/v1/Site/Site", "name");
    transport.insert(
        "/api/v1/Site/Site",
        "main",
        object(json!({"name": "main", "zone": "east", "description": "old"})),
    );
    let sites = setup(&transport).resource::<Site>();

    let mut site = sites.get("main").await.unwrap();
    site.zone = Some("west".into());
    site.description = None;
    sites.update(&mut site, &["description"]).await.unwrap();

    let stored = transport.object("/api/v1/Site/Site", "main").unwrap();
    assert_eq!(stored.get("zone"), Some(&json!("east")));
    assert_eq!(stored.get("description"), Some(&Value::Null));

    let update = transport.requests().pop().unwrap();
    assert_eq!(update.verb, "UPDATE");
    assert_eq!(update.body, Some(object(json!({"description": null}))));

    // Refreshed from the server, so the unsent local change is gone.
    assert_eq!(site.zone.as_deref(), Some("east"));
}

#[tokio::test]
async fn test_update_rejects_ineligible_fields_without_rpc() {
    let transport = MemoryTransport::new();
    let sites = setup(&transport).resource::<Site>();

    let mut site = sites.new_with_id("main");
    site.name = Some("renamed".into());

    let err = sites.update(&mut site, &["name"]).await.unwrap_err();
    assert!(matches!(err, Error::Argument(ref msg) if msg.contains("name")));
    let err = sites.update(&mut site, &[]).await.unwrap_err();
    assert!(matches!(err, Error::Argument(_)));

    let mut unsaved = sites.new_object();
    let err = sites.update(&mut unsaved, &["zone"]).await.unwrap_err();
    assert!(matches!(err, Error::Argument(_)));

    assert_eq!(transport.request_count(), 0);
}

#[tokio::test]
async fn test_delete_then_get_is_not_found() {
    let transport = MemoryTransport::new();
    let structures = setup(&transport).resource::<Structure>();

    let mut structure = structures.new_object();
    structure.hostname = Some("web01".into());
    structures.create(&mut structure).await.unwrap();
    assert_eq!(structure.id(), Some("1"));

    structures.delete(&structure).await.unwrap();
    let err = structures.get("1").await.unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
    assert_eq!(err.to_string(), "/api/v1/Building/Structure:1: not found");
}

#[tokio::test]
async fn test_list_yields_every_object_once_across_pages() {
    let transport = MemoryTransport::new();
    for i in 1..=120 {
        transport.insert(
            "/api/v1/Utilities/Network",
            &i.to_string(),
            object(json!({"name": format!("net{i}"), "mtu": 1500})),
        );
    }
    let networks = setup(&transport).resource::<Network>();

    let all = networks.list_all().await.unwrap();
    assert_eq!(all.len(), 120);
    let ids: HashSet<_> = all.iter().filter_map(|n| n.id().map(String::from)).collect();
    assert_eq!(ids.len(), 120);
    assert_eq!(all[0].name.as_deref(), Some("net1"));
    assert_eq!(all[119].name.as_deref(), Some("net120"));

    let lists = transport
        .requests()
        .iter()
        .filter(|r| r.verb == "LIST")
        .count();
    assert_eq!(lists, 3);
}

#[tokio::test]
async fn test_list_of_empty_model_ends_immediately() {
    let transport = MemoryTransport::new();
    let networks = setup(&transport).resource::<Network>();

    let mut listing = networks.list(None, Object::new());
    assert!(listing.next().await.is_none());
}

#[tokio::test]
async fn test_address_block_reserve_and_dynamic() {
    let transport = MemoryTransport::new();
    transport.insert(
        "/api/v1/Utilities/AddressBlock",
        "1",
        object(json!({"name": "prod", "subnet": "10.0.0.0", "prefix": 24, "size": 254})),
    );
    let blocks = setup(&transport).resource::<AddressBlock>();

    let reserved = blocks.reserve("1", 10, "dhcp-excluded").await.unwrap();
    assert_eq!(
        reserved.address_block.as_deref(),
        Some("/api/v1/Utilities/AddressBlock:1:")
    );
    blocks.dynamic("1", 20, None).await.unwrap();

    let allocation = blocks.allocation("1").await.unwrap();
    let offsets: Vec<_> = allocation.iter().map(|a| (a.offset, a.kind)).collect();
    assert_eq!(
        offsets,
        vec![(10, AllocationKind::Reserved), (20, AllocationKind::Dynamic)]
    );
    assert_eq!(allocation[0].detail, "dhcp-excluded");

    let usage = blocks.usage("1").await.unwrap();
    assert_eq!(usage.reserved, 1);
    assert_eq!(usage.dynamic, 1);
    assert_eq!(usage.free, 252);

    blocks.dereserve("1", 10).await.unwrap();
    let allocation = blocks.allocation("1").await.unwrap();
    assert_eq!(allocation.len(), 1);
    assert_eq!(allocation[0].offset, 20);

    let err = blocks.dereserve("1", 10).await.unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
    assert_eq!(err.to_string(), "Offset not found");

    blocks.dedynamic("1", 20).await.unwrap();
    assert!(blocks.allocation("1").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_address_operations_on_missing_block() {
    let transport = MemoryTransport::new();
    let blocks = setup(&transport).resource::<AddressBlock>();

    let err = blocks.reserve("9", 10, "nope").await.unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
    assert!(transport.requests().iter().all(|r| r.verb != "CREATE"));
}

#[tokio::test]
async fn test_rejected_action_maps_to_action_error() {
    let transport = MemoryTransport::new().with_action("/api/v1/Foreman/BaseJob", "pause", |_, _| {
        Err(CinpError::InvalidRequest {
            message: "Can only pause a job if it is Running".into(),
            data: None,
        })
    });
    transport.insert(
        "/api/v1/Foreman/BaseJob",
        "7",
        object(json!({"state": "done"})),
    );
    let jobs = setup(&transport).resource::<BaseJob>();

    let job = jobs.get("7").await.unwrap();
    let err = jobs.pause(&job).await.unwrap_err();
    assert!(matches!(err, Error::Action { ref action, .. } if action == "pause"));
    assert_eq!(
        err.to_string(),
        "pause failed: Can only pause a job if it is Running"
    );

    let call = transport.requests().pop().unwrap();
    assert_eq!(call.uri, "/api/v1/Foreman/BaseJob:7:(pause)");
}

#[tokio::test]
async fn test_get_config_and_do_create() {
    let transport = MemoryTransport::new()
        .with_action("/api/v1/Building/Structure", "getConfig", |id, _| {
            Ok(json!({"_structure_id": id, "_hostname": "web01"}))
        })
        .with_action("/api/v1/Building/Structure", "doCreate", |_, _| Ok(json!(42)));
    transport.insert(
        "/api/v1/Building/Structure",
        "3",
        object(json!({"hostname": "web01"})),
    );
    let structures = setup(&transport).resource::<Structure>();
    let structure = structures.new_with_id("3");

    let config = structures.get_config(&structure).await.unwrap();
    assert_eq!(config.get("_hostname"), Some(&json!("web01")));
    assert_eq!(config.get("_structure_id"), Some(&json!("3")));

    let job = structures.do_create(&structure).await.unwrap();
    assert_eq!(job, json!(42));
}

#[tokio::test]
async fn test_cartographer_assign_sends_foundation() {
    let transport = MemoryTransport::new()
        .with_model("/api/v1/Survey/Cartographer", "identifier")
        .with_action("/api/v1/Survey/Cartographer", "assign", |_, _| Ok(Value::Null));
    transport.insert(
        "/api/v1/Survey/Cartographer",
        "c0ffee",
        object(json!({"identifier": "c0ffee", "message": "waiting"})),
    );
    let cartographers = setup(&transport).resource::<Cartographer>();

    let cartographer = cartographers.get("c0ffee").await.unwrap();
    cartographers
        .assign(&cartographer, "/api/v1/Building/Foundation:rack1-n4:")
        .await
        .unwrap();

    let call = transport.requests().pop().unwrap();
    assert_eq!(
        call.body,
        Some(object(json!({"foundation": "/api/v1/Building/Foundation:rack1-n4:"})))
    );
}
