//! HTTP level tests for the CInP client against a mock server.

use cinp::{CinpError, Client, ClientOptions, Object, Transport};
use serde_json::{json, Value};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn object(value: Value) -> Object {
    match value {
        Value::Object(map) => map,
        _ => panic!("expected a JSON object"),
    }
}

async fn client_for(server: &MockServer) -> Client {
    Client::new(&server.uri(), &ClientOptions::default()).expect("client")
}

#[tokio::test]
async fn test_get_sends_protocol_headers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/Site/Site:main:"))
        .and(header("CInP-Version", "1.0"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"name": "main", "zone": "dc1"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let site = client.get("/api/v1/Site/Site:main:").await.unwrap();
    assert_eq!(site.get("zone"), Some(&json!("dc1")));
}

#[tokio::test]
async fn test_error_statuses_map_to_variants() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/Site/Site:gone:"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("CREATE"))
        .and(path("/api/v1/Site/Site"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "message": "Invalid Request",
            "data": {"name": ["This field is required."]}
        })))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/v1/Site/Site:main:"))
        .respond_with(
            ResponseTemplate::new(403).set_body_json(json!({"message": "Not Authorized"})),
        )
        .mount(&server)
        .await;
    Mock::given(method("UPDATE"))
        .and(path("/api/v1/Site/Site:main:"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;
    Mock::given(method("CALL"))
        .and(path("/api/v1/Site/Site:main:(getConfig)"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"message": "boom"})))
        .mount(&server)
        .await;

    let client = client_for(&server).await;

    assert!(matches!(
        client.get("/api/v1/Site/Site:gone:").await,
        Err(CinpError::NotFound(uri)) if uri == "/api/v1/Site/Site:gone:"
    ));

    match client.create("/api/v1/Site/Site", &Object::new()).await {
        Err(CinpError::InvalidRequest { message, data }) => {
            assert_eq!(message, "Invalid Request");
            assert_eq!(data, Some(json!({"name": ["This field is required."]})));
        }
        other => panic!("unexpected result: {other:?}"),
    }

    assert!(matches!(
        client.delete("/api/v1/Site/Site:main:").await,
        Err(CinpError::NotAuthorized(message)) if message == "Not Authorized"
    ));
    assert!(matches!(
        client.update("/api/v1/Site/Site:main:", &Object::new()).await,
        Err(CinpError::InvalidSession)
    ));
    assert!(matches!(
        client.call("/api/v1/Site/Site:main:(getConfig)", &Object::new()).await,
        Err(CinpError::Server { message }) if message == "boom"
    ));
}

#[tokio::test]
async fn test_list_reads_pagination_headers() {
    let server = MockServer::start().await;
    Mock::given(method("LIST"))
        .and(path("/api/v1/Utilities/AddressBlock"))
        .and(header("Position", "50"))
        .and(header("Count", "50"))
        .and(header("Filter", "site"))
        .and(body_json(json!({"site": "/api/v1/Site/Site:main:"})))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Position", "50")
                .insert_header("Count", "2")
                .insert_header("Total", "52")
                .set_body_json(json!([
                    "/api/v1/Utilities/AddressBlock:51:",
                    "/api/v1/Utilities/AddressBlock:52:"
                ])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let page = client
        .list(
            "/api/v1/Utilities/AddressBlock",
            Some("site"),
            &object(json!({"site": "/api/v1/Site/Site:main:"})),
            50,
            50,
        )
        .await
        .unwrap();

    assert_eq!(page.position, 50);
    assert_eq!(page.count, 2);
    assert_eq!(page.total, 52);
    assert_eq!(page.uris.len(), 2);
    assert!(page.is_last());
}

#[tokio::test]
async fn test_list_without_total_header_is_protocol_error() {
    let server = MockServer::start().await;
    Mock::given(method("LIST"))
        .and(path("/api/v1/Survey/Plot"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let result = client
        .list("/api/v1/Survey/Plot", None, &Object::new(), 0, 50)
        .await;
    assert!(matches!(result, Err(CinpError::Protocol(_))));
}

#[tokio::test]
async fn test_get_multi_combines_ids() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/Utilities/Network:1:2:"))
        .and(header("Multi-Object", "True"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "/api/v1/Utilities/Network:1:": {"name": "mgmt"},
            "/api/v1/Utilities/Network:2:": {"name": "data"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let objects = client
        .get_multi(&[
            "/api/v1/Utilities/Network:1:".to_string(),
            "/api/v1/Utilities/Network:2:".to_string(),
        ])
        .await
        .unwrap();
    assert_eq!(objects.len(), 2);

    let mixed = client
        .get_multi(&[
            "/api/v1/Utilities/Network:1:".to_string(),
            "/api/v1/Site/Site:main:".to_string(),
        ])
        .await;
    assert!(matches!(mixed, Err(CinpError::InvalidUri(_))));
}

#[tokio::test]
async fn test_create_reads_object_id() {
    let server = MockServer::start().await;
    Mock::given(method("CREATE"))
        .and(path("/api/v1/Utilities/ReservedAddress"))
        .and(body_json(json!({"offset": 10, "reason": "dhcp-excluded"})))
        .respond_with(
            ResponseTemplate::new(201)
                .insert_header("Object-Id", "/api/v1/Utilities/ReservedAddress:7:")
                .set_body_json(json!({"offset": 10, "reason": "dhcp-excluded"})),
        )
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let created = client
        .create(
            "/api/v1/Utilities/ReservedAddress",
            &object(json!({"offset": 10, "reason": "dhcp-excluded"})),
        )
        .await
        .unwrap();
    assert_eq!(created.uri, "/api/v1/Utilities/ReservedAddress:7:");
    assert_eq!(created.values.get("offset"), Some(&json!(10)));
}

#[tokio::test]
async fn test_login_attaches_session_headers() {
    let server = MockServer::start().await;
    Mock::given(method("CALL"))
        .and(path("/api/v1/Auth/User(login)"))
        .and(body_json(json!({"username": "root", "password": "secret"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!("tok-123")))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/Survey/Plot:rack1:"))
        .and(header("Auth-Id", "root"))
        .and(header("Auth-Token", "tok-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"name": "rack1"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("CALL"))
        .and(path("/api/v1/Auth/User(logout)"))
        .and(body_json(json!({"username": "root", "token": "tok-123"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(null)))
        .expect(1)
        .mount(&server)
        .await;

    let mut client = client_for(&server).await;
    client.login("root", "secret").await.unwrap();
    let plot = client.get("/api/v1/Survey/Plot:rack1:").await.unwrap();
    assert_eq!(plot.get("name"), Some(&json!("rack1")));
    client.logout().await.unwrap();
}
