//! Shared test utilities: an in-process mock SUT with configurable behaviour.

#![allow(dead_code)]

use std::collections::{HashSet, VecDeque};
use std::sync::{Arc, Mutex};

use a2a_tck::client::{SseStream, SutClient, Transport};
use a2a_tck::config::SutConfig;
use a2a_tck::error::TckError;
use a2a_tck::types::JsonRpcRequest;
use a2a_tck::TckResult;
use async_trait::async_trait;
use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

/// How the mock SUT answers `message/send`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SutBehavior {
    /// Returns a task for every message, references or not.
    AcceptReferences,
    /// Rejects any message carrying `referenceTaskIds` with InvalidParams.
    RejectReferences,
    /// Rejects references to tasks it never created with TaskNotFound.
    RejectUnknownReferences,
    /// Replies with a direct message that carries a `taskId`.
    MessageReply,
    /// Fails plain messages with InternalError but accepts referencing ones.
    SetupFails,
    /// Replies to plain messages with a message that has no task id.
    NoTaskId,
    /// Echoes a wrong id on every response.
    WrongId,
    /// Correct for plain messages, wrong id when references are present.
    WrongIdOnReferences,
    /// Omits `jsonrpc` when references are present.
    MissingJsonrpcOnReferences,
    /// Sends both `result` and `error` when references are present.
    BothResultAndErrorOnReferences,
    /// Rejects references with a positive error code.
    PositiveErrorCode,
    /// Returns HTTP 500 with a plain-text body.
    PlainHttpError,
    /// Returns HTTP 400 with a JSON-RPC error body.
    JsonRpcOverHttpError,
    /// Returns HTTP 200 with a body that is not JSON.
    GarbageBody,
}

/// Shared state of a running mock SUT.
pub struct MockSut {
    pub behavior: SutBehavior,
    pub legacy_card_path: bool,
    pub created_tasks: Mutex<HashSet<String>>,
    pub requests: Mutex<Vec<Value>>,
    pub authorization: Mutex<Option<String>>,
}

impl MockSut {
    pub fn received(&self) -> Vec<Value> {
        self.requests.lock().unwrap().clone()
    }
}

/// Start a mock SUT on a random port. Returns its JSON-RPC endpoint URL.
pub async fn start_mock_sut(
    behavior: SutBehavior,
) -> (String, Arc<MockSut>, tokio::task::JoinHandle<()>) {
    start_mock_sut_with(behavior, false).await
}

/// Start a mock SUT that serves its agent card only at the legacy path.
pub async fn start_mock_sut_with(
    behavior: SutBehavior,
    legacy_card_path: bool,
) -> (String, Arc<MockSut>, tokio::task::JoinHandle<()>) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let endpoint = format!("http://{}/a2a", addr);

    let state = Arc::new(MockSut {
        behavior,
        legacy_card_path,
        created_tasks: Mutex::new(HashSet::new()),
        requests: Mutex::new(Vec::new()),
        authorization: Mutex::new(None),
    });

    let app = Router::new()
        .route("/a2a", post(handle_rpc))
        .route("/.well-known/agent-card.json", get(handle_card))
        .route("/.well-known/agent.json", get(handle_legacy_card))
        .with_state(state.clone());

    let handle = tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    // Brief wait for the server to start accepting connections.
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;

    (endpoint, state, handle)
}

/// Build a client for a mock SUT endpoint.
pub fn client_for(endpoint: &str) -> SutClient {
    SutClient::new(SutConfig::new(endpoint).unwrap()).unwrap()
}

/// An endpoint on which nothing is listening.
pub async fn dead_endpoint() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}/a2a", addr)
}

fn agent_card() -> Value {
    json!({
        "name": "Mock SUT",
        "description": "In-process SUT for conformance kit tests",
        "version": "0.0.1",
        "capabilities": {"streaming": true}
    })
}

fn record_authorization(state: &MockSut, headers: &HeaderMap) {
    *state.authorization.lock().unwrap() = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
}

async fn handle_card(State(state): State<Arc<MockSut>>, headers: HeaderMap) -> Response {
    record_authorization(&state, &headers);
    if state.legacy_card_path {
        return StatusCode::NOT_FOUND.into_response();
    }
    Json(agent_card()).into_response()
}

async fn handle_legacy_card(State(state): State<Arc<MockSut>>, headers: HeaderMap) -> Response {
    record_authorization(&state, &headers);
    if !state.legacy_card_path {
        return StatusCode::NOT_FOUND.into_response();
    }
    Json(agent_card()).into_response()
}

fn success(id: Value, result: Value) -> Value {
    json!({"jsonrpc": "2.0", "id": id, "result": result})
}

fn rpc_error(id: Value, code: i64, message: &str) -> Value {
    json!({"jsonrpc": "2.0", "id": id, "error": {"code": code, "message": message}})
}

fn new_task(state: &MockSut) -> Value {
    let task_id = uuid::Uuid::new_v4().to_string();
    state.created_tasks.lock().unwrap().insert(task_id.clone());
    json!({
        "kind": "task",
        "id": task_id,
        "contextId": "ctx-1",
        "status": {"state": "completed"}
    })
}

async fn handle_rpc(
    State(state): State<Arc<MockSut>>,
    headers: HeaderMap,
    Json(request): Json<Value>,
) -> Response {
    state.requests.lock().unwrap().push(request.clone());
    record_authorization(&state, &headers);

    let id = request.get("id").cloned().unwrap_or(Value::Null);

    if request["method"] == "message/stream" {
        let first = success(id.clone(), json!({"kind": "task", "id": "stream-task", "status": {"state": "working"}}));
        let second = success(id, json!({"kind": "status-update", "taskId": "stream-task", "final": true}));
        let body = format!(": keepalive\n\ndata: {first}\n\nevent: update\ndata: {second}\n\n");
        return ([(header::CONTENT_TYPE, "text/event-stream")], body).into_response();
    }

    let references: Option<Vec<String>> = request["params"]["message"]
        .get("referenceTaskIds")
        .and_then(|v| serde_json::from_value(v.clone()).ok());
    let has_refs = references.is_some();

    let body = match state.behavior {
        SutBehavior::AcceptReferences => success(id, new_task(&state)),
        SutBehavior::RejectReferences if has_refs => {
            rpc_error(id, -32602, "referenceTaskIds not supported")
        }
        SutBehavior::RejectReferences => success(id, new_task(&state)),
        SutBehavior::RejectUnknownReferences => {
            let known = state.created_tasks.lock().unwrap().clone();
            let unknown = references
                .unwrap_or_default()
                .into_iter()
                .any(|r| !known.contains(&r));
            if unknown {
                rpc_error(id, -32001, "Task not found")
            } else {
                success(id, new_task(&state))
            }
        }
        SutBehavior::MessageReply => success(
            id,
            json!({"kind": "message", "messageId": "reply-1", "role": "agent",
                   "parts": [{"kind": "text", "text": "ok"}], "taskId": "reply-task"}),
        ),
        SutBehavior::SetupFails if !has_refs => rpc_error(id, -32603, "Internal error"),
        SutBehavior::SetupFails => success(id, new_task(&state)),
        SutBehavior::NoTaskId if !has_refs => success(
            id,
            json!({"kind": "message", "messageId": "reply-2", "role": "agent", "parts": []}),
        ),
        SutBehavior::NoTaskId => success(id, new_task(&state)),
        SutBehavior::WrongId => success(json!("not-your-id"), new_task(&state)),
        SutBehavior::WrongIdOnReferences if has_refs => {
            success(json!("not-your-id"), new_task(&state))
        }
        SutBehavior::MissingJsonrpcOnReferences if has_refs => {
            json!({"id": id, "result": new_task(&state)})
        }
        SutBehavior::BothResultAndErrorOnReferences if has_refs => json!({
            "jsonrpc": "2.0",
            "id": id,
            "result": new_task(&state),
            "error": {"code": -32001, "message": "Task not found"}
        }),
        SutBehavior::PositiveErrorCode if has_refs => rpc_error(id, 42, "nope"),
        SutBehavior::WrongIdOnReferences
        | SutBehavior::MissingJsonrpcOnReferences
        | SutBehavior::BothResultAndErrorOnReferences
        | SutBehavior::PositiveErrorCode => success(id, new_task(&state)),
        SutBehavior::PlainHttpError => {
            return (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response();
        }
        SutBehavior::JsonRpcOverHttpError => {
            return (
                StatusCode::BAD_REQUEST,
                Json(rpc_error(id, -32602, "Invalid params")),
            )
                .into_response();
        }
        SutBehavior::GarbageBody => {
            return (StatusCode::OK, "definitely not json").into_response();
        }
    };

    Json(body).into_response()
}

// ============================================================================
// Scripted transport
// ============================================================================

/// Requests a [`ScriptedTransport`] has seen.
pub type SentRequests = Arc<Mutex<Vec<JsonRpcRequest>>>;

/// Answers each request with the next scripted `result`, echoing the
/// request id. The last result is repeated once the script runs out.
pub struct ScriptedTransport {
    results: Mutex<VecDeque<Value>>,
    sent: SentRequests,
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: &JsonRpcRequest) -> TckResult<Value> {
        self.sent.lock().unwrap().push(request.clone());
        let mut results = self.results.lock().unwrap();
        let result = if results.len() > 1 {
            results.pop_front()
        } else {
            results.front().cloned()
        }
        .ok_or_else(|| TckError::Other("script exhausted".to_string()))?;
        Ok(success(request.id.to_value(), result))
    }

    async fn send_stream(&self, _request: &JsonRpcRequest) -> TckResult<SseStream> {
        Err(TckError::Other("streaming not scripted".to_string()))
    }
}

/// A client whose JSON-RPC calls are answered from `results`.
pub fn scripted_client(results: Vec<Value>) -> (SutClient, SentRequests) {
    scripted_client_with(SutConfig::new("http://localhost:9999").unwrap(), results)
}

/// Like [`scripted_client`], with an explicit config.
pub fn scripted_client_with(config: SutConfig, results: Vec<Value>) -> (SutClient, SentRequests) {
    let (transport, sent) = scripted_transport(results);
    let client = SutClient::with_transport(config, transport).unwrap();
    (client, sent)
}

pub fn scripted_transport(results: Vec<Value>) -> (Box<dyn Transport>, SentRequests) {
    let sent = SentRequests::default();
    let transport = ScriptedTransport {
        results: Mutex::new(results.into()),
        sent: sent.clone(),
    };
    (Box::new(transport), sent)
}
