use std::sync::Arc;

use axum::{
    body::Body,
    http::{self, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use hydromap_server::{HydromapServer, ServerConfig};
use hydromap_store::{GraphStore, InMemoryGraphStore};

struct TestContext {
    router: Router,
    store: Arc<InMemoryGraphStore>,
}

// Helper to set up the test context with a router over an in-memory store
fn setup_test() -> TestContext {
    let config = ServerConfig {
        port: 0,
        bind_address: "127.0.0.1".to_string(),
        graph_store_url: "memory://test".to_string(),
        log_level: "debug".to_string(),
        cors_origins: vec!["http://localhost:5173".to_string()],
    };

    let store = Arc::new(InMemoryGraphStore::new());
    let server = HydromapServer::new(config, store.clone());
    let router = hydromap_server::api::build_router(Arc::new(server));

    TestContext { router, store }
}

async fn send(
    router: &Router,
    method: http::Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(http::header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, value)
}

fn node_body(id: &str, node_type: &str) -> Value {
    json!({
        "id": id,
        "type": node_type,
        "position": null,
        "properties": { "label": id },
    })
}

fn edge_body(id: &str, source: &str, target: &str) -> Value {
    json!({
        "id": id,
        "source": source,
        "target": target,
        "sourceHandle": "bottom",
        "targetHandle": "top",
    })
}

#[tokio::test]
async fn test_root_and_health() {
    let ctx = setup_test();

    let (status, body) = send(&ctx.router, http::Method::GET, "/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Hydromap Topology API");

    let (status, body) = send(&ctx.router, http::Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "UP");
    assert_eq!(body["dependencies"]["graphStore"]["status"], "UP");
}

#[tokio::test]
async fn test_graph_starts_empty() {
    let ctx = setup_test();

    let (status, body) = send(&ctx.router, http::Method::GET, "/api/graph", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "nodes": [], "edges": [] }));
}

#[tokio::test]
async fn test_replace_graph_round_trips() {
    let ctx = setup_test();

    let graph = json!({
        "nodes": [node_body("building-1", "building")],
        "edges": [],
    });

    let (status, body) = send(
        &ctx.router,
        http::Method::POST,
        "/api/graph",
        Some(graph.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Graph updated successfully");

    let (status, body) = send(&ctx.router, http::Method::GET, "/api/graph", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["nodes"][0]["id"], "building-1");
}

#[tokio::test]
async fn test_create_and_get_node() {
    let ctx = setup_test();

    let (status, body) = send(
        &ctx.router,
        http::Method::POST,
        "/api/nodes",
        Some(node_body("hwl-1", "primary-hw")),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Node created");
    assert_eq!(body["node"]["id"], "hwl-1");

    let (status, body) = send(&ctx.router, http::Method::GET, "/api/nodes/hwl-1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["type"], "primary-hw");

    let (status, body) = send(&ctx.router, http::Method::GET, "/api/nodes", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["nodes"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_duplicate_node_id_is_rejected() {
    let ctx = setup_test();

    let (status, _) = send(
        &ctx.router,
        http::Method::POST,
        "/api/nodes",
        Some(node_body("hwl-1", "primary-hw")),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        &ctx.router,
        http::Method::POST,
        "/api/nodes",
        Some(node_body("hwl-1", "secondary-hw")),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "Node ID already exists");
}

#[tokio::test]
async fn test_missing_node_returns_404() {
    let ctx = setup_test();

    let (status, body) = send(&ctx.router, http::Method::GET, "/api/nodes/ghost", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Node not found");
}

#[tokio::test]
async fn test_partial_node_update() {
    let ctx = setup_test();

    send(
        &ctx.router,
        http::Method::POST,
        "/api/nodes",
        Some(json!({
            "id": "hwl-1",
            "type": "primary-hw",
            "position": {"x": 5.0, "y": 6.0},
            "properties": {"label": "West Riser", "flow_rate": 12},
        })),
    )
    .await;

    // Update type and merge one property; position stays untouched.
    let (status, body) = send(
        &ctx.router,
        http::Method::PUT,
        "/api/nodes/hwl-1",
        Some(json!({
            "type": "secondary-hw",
            "properties": {"flow_rate": 20},
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Node updated");

    let node = &body["node"];
    assert_eq!(node["type"], "secondary-hw");
    assert_eq!(node["position"], json!({"x": 5.0, "y": 6.0}));
    assert_eq!(node["properties"]["label"], "West Riser");
    assert_eq!(node["properties"]["flow_rate"], 20);
}

#[tokio::test]
async fn test_delete_node_cascades_to_edges() {
    let ctx = setup_test();

    send(
        &ctx.router,
        http::Method::POST,
        "/api/nodes",
        Some(node_body("a", "building")),
    )
    .await;
    send(
        &ctx.router,
        http::Method::POST,
        "/api/nodes",
        Some(node_body("b", "primary-hw")),
    )
    .await;
    send(
        &ctx.router,
        http::Method::POST,
        "/api/edges",
        Some(edge_body("e-a-b", "a", "b")),
    )
    .await;

    let (status, body) = send(&ctx.router, http::Method::DELETE, "/api/nodes/a", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Node deleted");
    assert_eq!(body["id"], "a");

    let (_, body) = send(&ctx.router, http::Method::GET, "/api/edges", None).await;
    assert_eq!(body["edges"], json!([]));

    let document = ctx.store.load().await.unwrap();
    assert_eq!(document.nodes.len(), 1);
    assert!(document.edges.is_empty());
}

#[tokio::test]
async fn test_edge_with_missing_endpoint_persists_nothing() {
    let ctx = setup_test();

    send(
        &ctx.router,
        http::Method::POST,
        "/api/nodes",
        Some(node_body("a", "building")),
    )
    .await;

    let (status, body) = send(
        &ctx.router,
        http::Method::POST,
        "/api/edges",
        Some(edge_body("e-ghost-a", "ghost", "a")),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Source node ghost not found");

    let (status, body) = send(
        &ctx.router,
        http::Method::POST,
        "/api/edges",
        Some(edge_body("e-a-ghost", "a", "ghost")),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Target node ghost not found");

    // Neither failed request left anything behind.
    let document = ctx.store.load().await.unwrap();
    assert!(document.edges.is_empty());
}

#[tokio::test]
async fn test_duplicate_edge_id_is_rejected() {
    let ctx = setup_test();

    send(
        &ctx.router,
        http::Method::POST,
        "/api/nodes",
        Some(node_body("a", "building")),
    )
    .await;
    send(
        &ctx.router,
        http::Method::POST,
        "/api/nodes",
        Some(node_body("b", "primary-hw")),
    )
    .await;

    let (status, _) = send(
        &ctx.router,
        http::Method::POST,
        "/api/edges",
        Some(edge_body("e-a-b", "a", "b")),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        &ctx.router,
        http::Method::POST,
        "/api/edges",
        Some(edge_body("e-a-b", "b", "a")),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "Edge ID already exists");
}

#[tokio::test]
async fn test_delete_edge() {
    let ctx = setup_test();

    let (status, body) = send(&ctx.router, http::Method::DELETE, "/api/edges/ghost", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Edge not found");

    send(
        &ctx.router,
        http::Method::POST,
        "/api/nodes",
        Some(node_body("a", "building")),
    )
    .await;
    send(
        &ctx.router,
        http::Method::POST,
        "/api/nodes",
        Some(node_body("b", "primary-hw")),
    )
    .await;
    send(
        &ctx.router,
        http::Method::POST,
        "/api/edges",
        Some(edge_body("e-a-b", "a", "b")),
    )
    .await;

    let (status, body) = send(&ctx.router, http::Method::DELETE, "/api/edges/e-a-b", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Edge deleted");
}

#[tokio::test]
async fn test_tree_endpoint() {
    let ctx = setup_test();

    let graph = json!({
        "nodes": [
            node_body("building-1", "building"),
            node_body("hwl-1", "primary-hw"),
            node_body("hwl-2", "secondary-hw"),
        ],
        "edges": [
            edge_body("e-building-1-hwl-1", "building-1", "hwl-1"),
            edge_body("e-hwl-1-hwl-2", "hwl-1", "hwl-2"),
        ],
    });
    send(&ctx.router, http::Method::POST, "/api/graph", Some(graph)).await;

    let (status, body) = send(&ctx.router, http::Method::GET, "/api/tree", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["roots"], json!(["building-1"]));
    assert_eq!(body["tree"][0]["id"], "building-1");
    assert_eq!(body["tree"][0]["children"][0]["id"], "hwl-1");
    assert_eq!(body["tree"][0]["children"][0]["children"][0]["id"], "hwl-2");
}

const BOUNDARY: &str = "hydromap-test-boundary";

fn multipart_request(uri: &str, field_name: &str, contents: &str) -> Request<Body> {
    let body = format!(
        "--{BOUNDARY}\r\n\
         Content-Disposition: form-data; name=\"{field_name}\"; filename=\"building.yaml\"\r\n\
         Content-Type: application/x-yaml\r\n\r\n\
         {contents}\r\n\
         --{BOUNDARY}--\r\n"
    );

    Request::builder()
        .method(http::Method::POST)
        .uri(uri)
        .header(
            http::header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

async fn send_multipart(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

const SAMPLE_BUILDING_YAML: &str = "\
building:
  name: HQ
  hot_water_loops:
    - identifier: L1
      primary: true
      downstream_loops: [L2]
    - identifier: L2
      downstream_loops: []
";

#[tokio::test]
async fn test_import_yaml_upload_replaces_the_graph() {
    let ctx = setup_test();

    // Seed something the import should wipe out.
    send(
        &ctx.router,
        http::Method::POST,
        "/api/nodes",
        Some(node_body("stale", "building")),
    )
    .await;

    let request = multipart_request("/api/import/yaml", "file", SAMPLE_BUILDING_YAML);
    let (status, body) = send_multipart(&ctx.router, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "YAML imported successfully");
    assert_eq!(body["nodes_count"], 3);
    assert_eq!(body["edges_count"], 2);
    assert_eq!(body["graph"]["nodes"][0]["id"], "building-1");
    assert_eq!(body["graph"]["nodes"][1]["type"], "primary-hw");
    assert_eq!(body["graph"]["nodes"][2]["type"], "secondary-hw");

    let document = ctx.store.load().await.unwrap();
    assert_eq!(document.nodes.len(), 3);
    assert!(document.find_node("stale").is_none());
}

#[tokio::test]
async fn test_import_yaml_with_invalid_syntax_is_rejected() {
    let ctx = setup_test();

    let request = multipart_request("/api/import/yaml", "file", "building: [unclosed");
    let (status, body) = send_multipart(&ctx.router, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"].as_str().unwrap().starts_with("Invalid YAML"));
}

#[tokio::test]
async fn test_import_yaml_without_building_key_is_rejected() {
    let ctx = setup_test();

    let request = multipart_request("/api/import/yaml", "file", "site:\n  name: HQ\n");
    let (status, body) = send_multipart(&ctx.router, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "YAML must contain 'building' key");

    // The rejected import must not clobber the stored graph.
    let document = ctx.store.load().await.unwrap();
    assert!(document.nodes.is_empty());
}

#[tokio::test]
async fn test_import_yaml_without_file_field_is_rejected() {
    let ctx = setup_test();

    let request = multipart_request("/api/import/yaml", "attachment", SAMPLE_BUILDING_YAML);
    let (status, body) = send_multipart(&ctx.router, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "Missing 'file' field in upload");
}

#[tokio::test]
async fn test_import_yaml_file_from_local_path() {
    let ctx = setup_test();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("building.yaml");
    std::fs::write(&path, SAMPLE_BUILDING_YAML).unwrap();

    let uri = format!("/api/import/yaml-file?filepath={}", path.display());
    let (status, body) = send(&ctx.router, http::Method::POST, &uri, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["nodes_count"], 3);
    assert_eq!(
        body["message"],
        format!("YAML imported successfully from {}", path.display())
    );
}

#[tokio::test]
async fn test_import_yaml_file_with_missing_path_returns_404() {
    let ctx = setup_test();

    let (status, body) = send(
        &ctx.router,
        http::Method::POST,
        "/api/import/yaml-file?filepath=/no/such/file.yaml",
        None,
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "File not found: /no/such/file.yaml");
}
