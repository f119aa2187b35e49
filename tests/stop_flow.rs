use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use serde_json::{json, Value};

use scanctl::api::{registry, ApiClient, BodyMessageResolver, DEFAULT_FORBIDDEN_MESSAGE};
use scanctl::config::ApiConfig;
use scanctl::control::{ConfirmationFlow, FlowState, StopScanAction, StopScanCoordinator, SubmitPolicy, ViewInvalidator};
use scanctl::errors::ScanCtlError;
use scanctl::models::{ActionResult, ScanIdentifier, ScanType};

#[derive(Debug, Clone)]
struct Received {
    path: String,
    body: Value,
    authorization: Option<String>,
    user_agent: Option<String>,
}

/// Fake backend: answers per scan id, 200 with an empty body by default.
#[derive(Clone, Default)]
struct Backend {
    responses: Arc<Mutex<HashMap<String, (u16, Option<Value>)>>>,
    received: Arc<Mutex<Vec<Received>>>,
}

impl Backend {
    fn respond(&self, scan_id: &str, status: u16, body: Option<Value>) {
        self.responses.lock().unwrap().insert(scan_id.to_string(), (status, body));
    }

    fn received(&self) -> Vec<Received> {
        self.received.lock().unwrap().clone()
    }
}

async fn stop_handler(
    State(backend): State<Backend>,
    uri: Uri,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let scan_id = body["scan_id"].as_str().unwrap_or_default().to_string();
    backend.received.lock().unwrap().push(Received {
        path: uri.path().to_string(),
        body,
        authorization: headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        user_agent: headers
            .get("user-agent")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
    });

    let (status, payload) = backend
        .responses
        .lock()
        .unwrap()
        .get(&scan_id)
        .cloned()
        .unwrap_or((200, None));
    let status = StatusCode::from_u16(status).unwrap();
    match payload {
        Some(payload) => (status, Json(payload)).into_response(),
        None => status.into_response(),
    }
}

async fn spawn_backend(backend: Backend) -> String {
    let mut router = Router::new();
    for scan_type in ScanType::ALL {
        router = router.route(registry::resolve(scan_type).path, post(stop_handler));
    }
    let app = router.with_state(backend);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

fn api_config(base_url: &str) -> ApiConfig {
    ApiConfig {
        base_url: base_url.to_string(),
        api_token: Some("test-token".into()),
        timeout_secs: 5,
        ..ApiConfig::default()
    }
}

fn build_flow(base_url: &str, scan_type: ScanType, policy: SubmitPolicy) -> (ConfirmationFlow, Arc<ViewInvalidator>) {
    let client = ApiClient::new(&api_config(base_url)).unwrap();
    let invalidator = Arc::new(ViewInvalidator::default());
    let coordinator = StopScanCoordinator::new(Arc::new(client), Arc::new(BodyMessageResolver::default()));
    let action = StopScanAction::new(coordinator, invalidator.clone(), policy);
    (ConfirmationFlow::new(Arc::new(action), scan_type), invalidator)
}

fn ids(raw: &[&str]) -> Vec<ScanIdentifier> {
    raw.iter().map(|s| ScanIdentifier::from(*s)).collect()
}

#[tokio::test]
async fn test_stop_succeeds_and_invalidates_once() {
    let backend = Backend::default();
    let base_url = spawn_backend(backend.clone()).await;
    let (mut flow, invalidator) = build_flow(&base_url, ScanType::Vulnerability, SubmitPolicy::FirstOnly);
    let mut views = invalidator.subscribe();

    flow.request_cancel(ids(&["s1"])).unwrap();
    let record = flow.confirm().await.unwrap();

    assert_eq!(record, ActionResult::succeeded());
    assert_eq!(flow.state(), &FlowState::Succeeded);
    assert_eq!(invalidator.fired_count(), 1);
    let event = views.try_recv().unwrap();
    assert_eq!(event.scan_ids, ids(&["s1"]));
    assert!(views.try_recv().is_err());

    let received = backend.received();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].path, "/deepfence/scan/vulnerability/stop");
    assert_eq!(received[0].body, json!({"scan_id": "s1", "scan_type": "VulnerabilityScan"}));
    assert_eq!(received[0].authorization.as_deref(), Some("Bearer test-token"));
    assert_eq!(received[0].user_agent.as_deref(), Some(scanctl::api::client::user_agent().as_str()));
}

#[tokio::test]
async fn test_conflict_fails_with_backend_message() {
    let backend = Backend::default();
    backend.respond("s2", 409, Some(json!({"message": "scan already completed"})));
    let base_url = spawn_backend(backend.clone()).await;
    let (mut flow, invalidator) = build_flow(&base_url, ScanType::Vulnerability, SubmitPolicy::FirstOnly);

    flow.request_cancel(ids(&["s2"])).unwrap();
    let record = flow.confirm().await.unwrap();

    assert_eq!(record, ActionResult::failed("scan already completed"));
    assert!(matches!(flow.state(), FlowState::Failed { .. }));
    assert_eq!(invalidator.fired_count(), 0);
}

#[tokio::test]
async fn test_forbidden_uses_permission_message() {
    let backend = Backend::default();
    backend.respond("s3", 403, Some(json!({"message": "insufficient permissions"})));
    backend.respond("s3-bare", 403, None);
    let base_url = spawn_backend(backend.clone()).await;

    let (mut flow, invalidator) = build_flow(&base_url, ScanType::Secret, SubmitPolicy::FirstOnly);
    flow.request_cancel(ids(&["s3"])).unwrap();
    let record = flow.confirm().await.unwrap();
    assert_eq!(record, ActionResult::failed("insufficient permissions"));
    assert_eq!(invalidator.fired_count(), 0);

    let (mut flow, _) = build_flow(&base_url, ScanType::Secret, SubmitPolicy::FirstOnly);
    flow.request_cancel(ids(&["s3-bare"])).unwrap();
    let record = flow.confirm().await.unwrap();
    assert_eq!(record, ActionResult::failed(DEFAULT_FORBIDDEN_MESSAGE));
}

#[tokio::test]
async fn test_server_error_propagates() {
    let backend = Backend::default();
    backend.respond("s4", 500, Some(json!({"message": "database unavailable"})));
    let base_url = spawn_backend(backend.clone()).await;
    let (mut flow, invalidator) = build_flow(&base_url, ScanType::Malware, SubmitPolicy::FirstOnly);

    flow.request_cancel(ids(&["s4"])).unwrap();
    let err = flow.confirm().await.unwrap_err();

    match err {
        ScanCtlError::Api { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message, "database unavailable");
        }
        other => panic!("expected API error, got {:?}", other),
    }
    assert_eq!(invalidator.fired_count(), 0);
}

#[tokio::test]
async fn test_each_scan_type_hits_its_endpoint() {
    let backend = Backend::default();
    let base_url = spawn_backend(backend.clone()).await;

    for scan_type in ScanType::ALL {
        let (mut flow, _) = build_flow(&base_url, scan_type, SubmitPolicy::FirstOnly);
        flow.request_cancel(ids(&["scan"])).unwrap();
        assert!(flow.confirm().await.unwrap().success);
    }

    let received = backend.received();
    assert_eq!(received.len(), ScanType::ALL.len());
    for (req, scan_type) in received.iter().zip(ScanType::ALL) {
        assert_eq!(req.path, registry::resolve(scan_type).path);
        assert_eq!(req.body["scan_type"], scan_type.wire_name());
    }
}

#[tokio::test]
async fn test_multi_selection_submits_only_first() {
    let backend = Backend::default();
    let base_url = spawn_backend(backend.clone()).await;
    let (mut flow, _) = build_flow(&base_url, ScanType::Compliance, SubmitPolicy::FirstOnly);

    flow.request_cancel(ids(&["a", "b", "c"])).unwrap();
    flow.confirm().await.unwrap();

    let received = backend.received();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].body["scan_id"], "a");
}

#[tokio::test]
async fn test_fan_out_reports_worst_outcome() {
    let backend = Backend::default();
    backend.respond("b", 409, Some(json!({"message": "scan already completed"})));
    let base_url = spawn_backend(backend.clone()).await;
    let (mut flow, invalidator) = build_flow(&base_url, ScanType::CloudCompliance, SubmitPolicy::All);

    flow.request_cancel(ids(&["a", "b", "c"])).unwrap();
    let record = flow.confirm().await.unwrap();

    assert_eq!(record, ActionResult::failed("scan already completed"));
    assert_eq!(backend.received().len(), 3);
    assert_eq!(invalidator.fired_count(), 1);
}

#[tokio::test]
async fn test_unreachable_backend_is_network_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let (mut flow, invalidator) = build_flow(&format!("http://{}", addr), ScanType::Vulnerability, SubmitPolicy::FirstOnly);
    flow.request_cancel(ids(&["s5"])).unwrap();
    let err = flow.confirm().await.unwrap_err();

    assert!(matches!(err, ScanCtlError::Network(_)));
    assert_eq!(flow.state(), &FlowState::Idle);
    assert_eq!(invalidator.fired_count(), 0);
}

/// Serves one connection: reads the full request, then answers with `response`
/// verbatim and closes the socket.
async fn spawn_raw_backend(response: &'static str) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        loop {
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            request.extend_from_slice(&buf[..n]);
            let text = String::from_utf8_lossy(&request).to_string();
            if let Some(header_end) = text.find("\r\n\r\n") {
                let content_length = text[..header_end]
                    .lines()
                    .find_map(|line| {
                        let (name, value) = line.split_once(':')?;
                        name.eq_ignore_ascii_case("content-length")
                            .then(|| value.trim().parse::<usize>().ok())
                            .flatten()
                    })
                    .unwrap_or(0);
                if request.len() >= header_end + 4 + content_length {
                    break;
                }
            }
        }
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.ok();
    });
    format!("http://{}", addr)
}

#[tokio::test]
async fn test_truncated_conflict_body_is_still_rejected() {
    let base_url = spawn_raw_backend(
        "HTTP/1.1 409 Conflict\r\nContent-Length: 200\r\nConnection: close\r\n\r\n{\"message\":\"scan al",
    )
    .await;
    let (mut flow, invalidator) = build_flow(&base_url, ScanType::Vulnerability, SubmitPolicy::FirstOnly);

    flow.request_cancel(ids(&["s2"])).unwrap();
    let record = flow.confirm().await.unwrap();

    assert_eq!(record, ActionResult::failed("Conflict"));
    assert!(matches!(flow.state(), FlowState::Failed { .. }));
    assert_eq!(invalidator.fired_count(), 0);
}

#[tokio::test]
async fn test_truncated_forbidden_body_is_still_forbidden() {
    let base_url = spawn_raw_backend(
        "HTTP/1.1 403 Forbidden\r\nContent-Length: 100\r\nConnection: close\r\n\r\n{\"mess",
    )
    .await;
    let (mut flow, _) = build_flow(&base_url, ScanType::Secret, SubmitPolicy::FirstOnly);

    flow.request_cancel(ids(&["s3"])).unwrap();
    let record = flow.confirm().await.unwrap();

    assert_eq!(record, ActionResult::failed(DEFAULT_FORBIDDEN_MESSAGE));
}
