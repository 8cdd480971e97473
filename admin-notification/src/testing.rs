//! Test doubles: an in-memory scripted source and an axum mock backend.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, put};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use tokio::sync::oneshot;

use admin_shared::errors::{ClientError, ClientResult};
use admin_shared::types::ApiErrorResponse;

use crate::models::{Notification, NotificationKind, NotificationSnapshot, ReadRequest};
use crate::source::NotificationSource;

pub fn notification(id: &str, is_read: bool) -> Notification {
    let created_at: DateTime<Utc> = "2026-10-01T08:00:00Z".parse().unwrap();
    Notification {
        id: id.to_string(),
        kind: NotificationKind::Inquiry,
        title: format!("Inquiry {id}"),
        message: "A customer asked about stock".to_string(),
        created_at,
        is_read,
        read_at: is_read.then(|| "2026-10-01T09:00:00Z".parse().unwrap()),
    }
}

// ─── Scripted source ────────────────────────────────────────────────────────

enum Scripted {
    Response(Option<NotificationSnapshot>),
    Error,
    Gate(oneshot::Receiver<Option<NotificationSnapshot>>),
}

/// Replays queued responses, then falls back to the current server view.
#[derive(Default)]
pub struct ScriptedSource {
    server: Mutex<Option<NotificationSnapshot>>,
    queue: Mutex<VecDeque<Scripted>>,
    fetches: AtomicUsize,
    mark_reads: Mutex<Vec<(String, DateTime<Utc>)>>,
    mark_all_reads: AtomicUsize,
    fail_mutations: AtomicBool,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_server(snapshot: NotificationSnapshot) -> Self {
        let source = Self::new();
        *source.server.lock().unwrap() = Some(snapshot);
        source
    }

    pub fn push_response(&self, response: Option<NotificationSnapshot>) {
        self.queue.lock().unwrap().push_back(Scripted::Response(response));
    }

    pub fn push_error(&self) {
        self.queue.lock().unwrap().push_back(Scripted::Error);
    }

    /// Queue a fetch that blocks until the returned sender fires.
    pub fn push_gate(&self) -> oneshot::Sender<Option<NotificationSnapshot>> {
        let (tx, rx) = oneshot::channel();
        self.queue.lock().unwrap().push_back(Scripted::Gate(rx));
        tx
    }

    pub fn fail_mutations(&self, fail: bool) {
        self.fail_mutations.store(fail, Ordering::SeqCst);
    }

    pub fn fetch_calls(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    pub fn mark_read_calls(&self) -> Vec<(String, DateTime<Utc>)> {
        self.mark_reads.lock().unwrap().clone()
    }

    pub fn mark_all_read_calls(&self) -> usize {
        self.mark_all_reads.load(Ordering::SeqCst)
    }

    fn mutation_result(&self) -> ClientResult<()> {
        if self.fail_mutations.load(Ordering::SeqCst) {
            Err(ClientError::from_response(503, "maintenance"))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl NotificationSource for ScriptedSource {
    async fn fetch(&self, _token: &str) -> ClientResult<Option<NotificationSnapshot>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        let next = self.queue.lock().unwrap().pop_front();

        match next {
            Some(Scripted::Response(response)) => Ok(response),
            Some(Scripted::Error) => Err(ClientError::from_response(502, "bad gateway")),
            Some(Scripted::Gate(rx)) => rx
                .await
                .map_err(|_| ClientError::from_response(504, "gate dropped")),
            None => Ok(self.server.lock().unwrap().clone()),
        }
    }

    async fn mark_read(&self, _token: &str, id: &str, read_at: DateTime<Utc>) -> ClientResult<()> {
        self.mark_reads.lock().unwrap().push((id.to_string(), read_at));
        self.mutation_result()
    }

    async fn mark_all_read(&self, _token: &str, _read_at: DateTime<Utc>) -> ClientResult<()> {
        self.mark_all_reads.fetch_add(1, Ordering::SeqCst);
        self.mutation_result()
    }
}

// ─── Mock HTTP backend ──────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct RecordedMutation {
    pub path: String,
    /// Decoded `{id}` segment for single mark-read calls.
    pub id: Option<String>,
    pub read_at: DateTime<Utc>,
}

#[derive(Default)]
struct BackendState {
    list: Mutex<serde_json::Value>,
    tokens: Mutex<Vec<String>>,
    mutations: Mutex<Vec<RecordedMutation>>,
    fail_mutations: AtomicBool,
}

/// In-process stand-in for the dashboard REST backend, served under `/api`.
pub struct MockBackend {
    addr: std::net::SocketAddr,
    state: Arc<BackendState>,
}

impl MockBackend {
    pub async fn start() -> Self {
        let state = Arc::new(BackendState::default());
        *state.list.lock().unwrap() = serde_json::json!({ "success": true, "notifications": [], "unreadCount": 0 });

        let app = Router::new()
            .route("/api/notifications", get(list_handler))
            .route("/api/notifications/read-all", put(read_all_handler))
            .route("/api/notifications/:id/read", put(read_one_handler))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { addr, state }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}/api", self.addr)
    }

    pub fn set_list(&self, body: serde_json::Value) {
        *self.state.list.lock().unwrap() = body;
    }

    pub fn fail_mutations(&self, fail: bool) {
        self.state.fail_mutations.store(fail, Ordering::SeqCst);
    }

    pub fn seen_tokens(&self) -> Vec<String> {
        self.state.tokens.lock().unwrap().clone()
    }

    pub fn mutations(&self) -> Vec<RecordedMutation> {
        self.state.mutations.lock().unwrap().clone()
    }
}

fn record_token(state: &BackendState, headers: &HeaderMap) {
    if let Some(value) = headers.get("authorization").and_then(|v| v.to_str().ok()) {
        state.tokens.lock().unwrap().push(value.to_string());
    }
}

async fn list_handler(State(state): State<Arc<BackendState>>, headers: HeaderMap) -> Json<serde_json::Value> {
    record_token(&state, &headers);
    Json(state.list.lock().unwrap().clone())
}

fn record_mutation(state: &BackendState, path: String, id: Option<String>, body: ReadRequest) -> Response {
    state.mutations.lock().unwrap().push(RecordedMutation {
        path,
        id,
        read_at: body.read_at,
    });

    if state.fail_mutations.load(Ordering::SeqCst) {
        let body = ApiErrorResponse::new("E0001", "internal server error");
        return (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response();
    }
    Json(serde_json::json!({ "success": true })).into_response()
}

async fn read_all_handler(
    State(state): State<Arc<BackendState>>,
    headers: HeaderMap,
    Json(body): Json<ReadRequest>,
) -> Response {
    record_token(&state, &headers);
    record_mutation(&state, "/api/notifications/read-all".to_string(), None, body)
}

async fn read_one_handler(
    State(state): State<Arc<BackendState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<ReadRequest>,
) -> Response {
    record_token(&state, &headers);
    record_mutation(&state, format!("/api/notifications/{id}/read"), Some(id), body)
}
