use super::*;
use std::sync::Arc;

use axum::{extract::State, http::StatusCode as AxumStatus, routing::get, Json, Router};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::Mutex};

#[derive(Clone)]
struct ServerState {
    list_status: AxumStatus,
    list_body: String,
    mark_status: AxumStatus,
    received: Arc<Mutex<Vec<Value>>>,
}

impl ServerState {
    fn new(list_body: impl Into<String>) -> Self {
        Self {
            list_status: AxumStatus::OK,
            list_body: list_body.into(),
            mark_status: AxumStatus::OK,
            received: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

async fn handle_list(State(state): State<ServerState>) -> (AxumStatus, String) {
    (state.list_status, state.list_body.clone())
}

async fn handle_mark(State(state): State<ServerState>, Json(body): Json<Value>) -> AxumStatus {
    state.received.lock().await.push(body);
    state.mark_status
}

async fn spawn_sheet_server(state: ServerState) -> Url {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    let app = Router::new()
        .route("/exec", get(handle_list).post(handle_mark))
        .with_state(state);
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Url::parse(&format!("http://{addr}/exec")).expect("url")
}

fn gateway(endpoint: Url, mutation_policy: MutationPolicy) -> HttpGateway {
    HttpGateway::new(GatewayConfig {
        endpoint,
        mutation_policy,
        request_timeout: Some(Duration::from_secs(5)),
    })
    .expect("gateway")
}

const SHEET_BODY: &str = r#"[
    {"Full Name": "Ann Lee", "Email Address": "ann@example.com", "Your Upline Director": "Dee",
     "Your Upline World Team": "North", "Your Status": "Manager", "Accredit": "", "rowNumber": 2},
    {"Full Name": "Bo Chan", "Email Address": "bo@example.com", "Accredit": "1", "rowNumber": 3}
]"#;

#[tokio::test]
async fn list_decodes_sheet_rows() {
    let endpoint = spawn_sheet_server(ServerState::new(SHEET_BODY)).await;
    let registrants = gateway(endpoint, MutationPolicy::Lenient)
        .list_registrants()
        .await
        .expect("list");

    assert_eq!(registrants.len(), 2);
    assert_eq!(registrants[0].full_name, "Ann Lee");
    assert_eq!(registrants[0].upline_world_team, "North");
    assert!(!registrants[0].is_accredited());
    assert_eq!(registrants[1].row_number, RowNumber(3));
    assert_eq!(registrants[1].status, "");
    assert!(registrants[1].is_accredited());
}

#[tokio::test]
async fn list_rejects_non_success_status() {
    let mut state = ServerState::new("[]");
    state.list_status = AxumStatus::SERVICE_UNAVAILABLE;
    let endpoint = spawn_sheet_server(state).await;

    let err = gateway(endpoint, MutationPolicy::Lenient)
        .list_registrants()
        .await
        .expect_err("status should fail");
    assert!(matches!(err, TransportError::Status(s) if s.as_u16() == 503));
}

#[tokio::test]
async fn list_rejects_undecodable_body() {
    let endpoint = spawn_sheet_server(ServerState::new("<html>quota exceeded</html>")).await;

    let err = gateway(endpoint, MutationPolicy::Lenient)
        .list_registrants()
        .await
        .expect_err("decode should fail");
    assert!(matches!(err, TransportError::Decode(_)));
}

#[tokio::test]
async fn list_reports_unreachable_endpoint() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");

    let endpoint = Url::parse(&format!("http://{addr}/exec")).expect("url");
    let err = gateway(endpoint, MutationPolicy::Lenient)
        .list_registrants()
        .await
        .expect_err("connect should fail");
    assert!(matches!(err, TransportError::Request(_)));
}

#[tokio::test]
async fn mark_reports_unreachable_endpoint_under_either_policy() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");

    let endpoint = Url::parse(&format!("http://{addr}/exec")).expect("url");
    for policy in [MutationPolicy::Lenient, MutationPolicy::RequireSuccessStatus] {
        let err = gateway(endpoint.clone(), policy)
            .mark_accredited(RowNumber(2))
            .await
            .expect_err("connect should fail");
        assert!(matches!(err, TransportError::Request(_)), "{policy:?}");
    }
}

#[tokio::test]
async fn mark_posts_row_number_body() {
    let state = ServerState::new("[]");
    let received = state.received.clone();
    let endpoint = spawn_sheet_server(state).await;

    gateway(endpoint, MutationPolicy::Lenient)
        .mark_accredited(RowNumber(42))
        .await
        .expect("mark");

    let bodies = received.lock().await;
    assert_eq!(bodies.as_slice(), &[json!({ "rowNumber": 42 })]);
}

#[tokio::test]
async fn lenient_policy_ignores_error_status() {
    let mut state = ServerState::new("[]");
    state.mark_status = AxumStatus::INTERNAL_SERVER_ERROR;
    let endpoint = spawn_sheet_server(state).await;

    gateway(endpoint, MutationPolicy::Lenient)
        .mark_accredited(RowNumber(2))
        .await
        .expect("lenient policy treats any completed request as success");
}

#[tokio::test]
async fn strict_policy_rejects_error_status() {
    let mut state = ServerState::new("[]");
    state.mark_status = AxumStatus::INTERNAL_SERVER_ERROR;
    let received = state.received.clone();
    let endpoint = spawn_sheet_server(state).await;

    let err = gateway(endpoint, MutationPolicy::RequireSuccessStatus)
        .mark_accredited(RowNumber(2))
        .await
        .expect_err("strict policy should fail");
    assert!(matches!(err, TransportError::Status(s) if s.as_u16() == 500));
    assert_eq!(received.lock().await.len(), 1);
}

#[test]
fn mutation_policy_accepts_strict_alias() {
    let policy: MutationPolicy = serde_json::from_str("\"strict\"").expect("parse");
    assert_eq!(policy, MutationPolicy::RequireSuccessStatus);
    let policy: MutationPolicy = serde_json::from_str("\"lenient\"").expect("parse");
    assert_eq!(policy, MutationPolicy::Lenient);
}
