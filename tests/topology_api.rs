//! Integration tests running the datasource against a live mock backend.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::sync::Mutex;

use gremlin_datasource::{
    ConnectionSettings, DataSource, GremlinQuery, ProbeResult, ProbeStatus, QueryRequest,
    ScopedVars, TimeRange, TransportFailure,
};

type SeenBodies = Arc<Mutex<Vec<Value>>>;

async fn spawn_backend(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve mock backend");
    });
    format!("http://{}", addr)
}

/// Mock topology endpoint: records every body, echoes the query back as a
/// one-element array, and rejects queries containing "explode" the way the
/// real backend rejects a bad traversal.
async fn topology(State(seen): State<SeenBodies>, Json(body): Json<Value>) -> Response {
    let query = body["GremlinQuery"].as_str().unwrap_or_default().to_string();
    seen.lock().await.push(body);
    if query.contains("explode") {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"error": {"code": 13, "message": "traversal exploded"}})),
        )
            .into_response();
    }
    Json(json!([query])).into_response()
}

async fn health() -> Json<Value> {
    Json(json!({"status": "ok"}))
}

async fn spawn_topology_backend() -> (String, SeenBodies) {
    let seen: SeenBodies = Arc::new(Mutex::new(Vec::new()));
    let app = Router::new()
        .route("/api/topology", post(topology))
        .route("/api", get(health))
        .with_state(seen.clone());
    (spawn_backend(app).await, seen)
}

fn datasource(base_url: &str) -> DataSource {
    DataSource::with_http(ConnectionSettings::new(base_url))
}

#[tokio::test]
async fn batch_round_trips_in_order_with_time_injection() {
    let (base_url, seen) = spawn_topology_backend().await;
    let request = QueryRequest {
        range: TimeRange::bounded(100, 200),
        scoped_vars: ScopedVars::new(),
        targets: vec![
            GremlinQuery::new("A", "g.V().limit(1)"),
            GremlinQuery::new("B", "g.E()").hidden(),
            GremlinQuery::new("C", "h.out('dep')"),
        ],
    };

    let results = datasource(&base_url).query(&request).await;
    assert_eq!(results.len(), 3);

    let a = results[0].as_ref().expect("panel A");
    assert_eq!(a.ref_id, "A");
    assert_eq!(a.values(), [json!("g.timeRange(200,100).V().limit(1)")]);

    let b = results[1].as_ref().expect("hidden panel B");
    assert_eq!(b.ref_id, "B");
    assert!(b.values().is_empty());

    let c = results[2].as_ref().expect("panel C");
    assert_eq!(c.values(), [json!("h.timeRange(200,100).out('dep')")]);

    assert_eq!(seen.lock().await.len(), 2, "hidden panel must not reach the backend");
}

#[tokio::test]
async fn scoped_variables_and_quotes_survive_the_wire() {
    let (base_url, seen) = spawn_topology_backend().await;
    let mut scoped_vars = ScopedVars::new();
    scoped_vars.insert("host".to_string(), "web\"1".to_string());
    let request = QueryRequest {
        range: TimeRange::unbounded(),
        scoped_vars,
        targets: vec![GremlinQuery::new("A", r#"g.V().has("host", "$host")"#)],
    };

    let results = datasource(&base_url).query(&request).await;
    assert!(results[0].is_ok());

    let seen = seen.lock().await;
    assert_eq!(
        seen[0],
        json!({ "GremlinQuery": r#"g.V().has("host", "web"1")"# })
    );
}

#[tokio::test]
async fn failed_panel_is_isolated_and_structured() {
    let (base_url, _) = spawn_topology_backend().await;
    let request = QueryRequest {
        range: TimeRange::unbounded(),
        scoped_vars: ScopedVars::new(),
        targets: vec![
            GremlinQuery::new("A", "g.V()"),
            GremlinQuery::new("B", "g.explode()"),
            GremlinQuery::new("C", "g.E()"),
        ],
    };

    let results = datasource(&base_url).query(&request).await;
    assert!(results[0].is_ok());
    assert!(results[2].is_ok());

    let err = results[1].as_ref().expect_err("panel B must fail");
    assert_eq!(err.ref_id, "B");
    assert_eq!(
        err.failure,
        TransportFailure::Structured {
            status_text: "Internal Server Error".to_string(),
            error_code: Some(13),
            error_message: Some("traversal exploded".to_string()),
        }
    );
}

#[tokio::test]
async fn probe_succeeds_against_a_healthy_backend() {
    let (base_url, _) = spawn_topology_backend().await;
    assert_eq!(datasource(&base_url).probe().await, ProbeResult::success());
}

#[tokio::test]
async fn probe_reports_not_found_without_a_health_route() {
    let app = Router::new();
    let base_url = spawn_backend(app).await;
    assert_eq!(
        datasource(&base_url).probe().await,
        ProbeResult::error("Not Found")
    );
}

#[tokio::test]
async fn probe_reports_an_unreachable_backend_as_error() {
    // Bind and drop a listener so the port is very likely closed.
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);

    let result = datasource(&format!("http://{}", addr)).probe().await;
    assert_eq!(result.status, ProbeStatus::Error);
    assert!(!result.message.is_empty());
}
