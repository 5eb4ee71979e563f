//! In-process mock of the gymdesk backend.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::header::{AUTHORIZATION, COOKIE, SET_COOKIE};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{AppendHeaders, IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde_json::{Value, json};

use gymdesk_core::store::{MemoryStore, StoredCredentials};
use gymdesk_core::{ApiClient, AuthScheme, AuthSession, GymdeskConfig};

pub const REFRESH_TOKEN: &str = "refresh-1";

pub struct Backend {
    /// The only access token / session cookie currently accepted.
    pub valid_token: Mutex<String>,
    pub refresh_calls: AtomicUsize,
    pub refresh_ok: AtomicBool,
    pub refresh_delay: Mutex<Duration>,
    /// Reject every protected request, even with a fresh token.
    pub reject_all: AtomicBool,
    pub class_posts: AtomicUsize,
    pub classes: Mutex<Vec<Value>>,
    pub fail_class_date: Mutex<Option<String>>,
    issued: AtomicUsize,
}

impl Backend {
    fn new() -> Self {
        Backend {
            valid_token: Mutex::new("token-0".to_string()),
            refresh_calls: AtomicUsize::new(0),
            refresh_ok: AtomicBool::new(true),
            refresh_delay: Mutex::new(Duration::from_millis(0)),
            reject_all: AtomicBool::new(false),
            class_posts: AtomicUsize::new(0),
            classes: Mutex::new(Vec::new()),
            fail_class_date: Mutex::new(None),
            issued: AtomicUsize::new(0),
        }
    }

    pub fn refreshes(&self) -> usize {
        self.refresh_calls.load(Ordering::SeqCst)
    }

    pub fn current_token(&self) -> String {
        self.valid_token.lock().unwrap().clone()
    }

    /// Invalidate the current token, as an access-token expiry would.
    pub fn expire_token(&self) {
        self.rotate();
    }

    fn rotate(&self) -> String {
        let n = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        let token = format!("token-{}", n);
        *self.valid_token.lock().unwrap() = token.clone();
        token
    }

    fn authorized(&self, headers: &HeaderMap) -> bool {
        if self.reject_all.load(Ordering::SeqCst) {
            return false;
        }
        let valid = self.current_token();

        let bearer = headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .is_some_and(|t| t == valid);

        bearer || cookie(headers, "session").is_some_and(|c| c == valid)
    }
}

fn cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(k, _)| *k == name)
        .map(|(_, v)| v.to_string())
}

fn unauthorized() -> Response {
    (StatusCode::UNAUTHORIZED, Json(json!({"error": "Unauthorized"}))).into_response()
}

pub fn user_json() -> Value {
    json!({"id": "u1", "email": "staff@example.com", "name": "Staff", "role": "admin", "active": true})
}

pub fn member_json(id: &str) -> Value {
    json!({
        "id": id,
        "first_name": "Ada",
        "last_name": "Lovelace",
        "email": "ada@example.com",
        "membership_type": "premium",
        "status": "active",
        "join_date": "2024-01-15T00:00:00Z",
        "billing_history": null
    })
}

async fn login(State(backend): State<Arc<Backend>>) -> Response {
    let token = backend.current_token();
    let session_cookie = format!("session={}; Path=/; HttpOnly", token);
    let refresh_cookie = format!("refresh={}; Path=/; HttpOnly", REFRESH_TOKEN);

    (
        AppendHeaders([(SET_COOKIE, session_cookie), (SET_COOKIE, refresh_cookie)]),
        Json(json!({
            "user": user_json(),
            "access_token": token,
            "refresh_token": REFRESH_TOKEN,
        })),
    )
        .into_response()
}

async fn logout() -> Response {
    Json(json!({"message": "Logged out"})).into_response()
}

async fn refresh(
    State(backend): State<Arc<Backend>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    backend.refresh_calls.fetch_add(1, Ordering::SeqCst);

    let delay = *backend.refresh_delay.lock().unwrap();
    tokio::time::sleep(delay).await;

    let from_body = serde_json::from_slice::<Value>(&body)
        .ok()
        .and_then(|v| v.get("refresh_token").and_then(Value::as_str).map(str::to_string))
        .is_some_and(|t| t == REFRESH_TOKEN);
    let from_cookie = cookie(&headers, "refresh").is_some_and(|t| t == REFRESH_TOKEN);

    if !backend.refresh_ok.load(Ordering::SeqCst) || !(from_body || from_cookie) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"error": "Invalid refresh token"})),
        )
            .into_response();
    }

    let token = backend.rotate();
    (
        AppendHeaders([(SET_COOKIE, format!("session={}; Path=/; HttpOnly", token))]),
        Json(json!({"access_token": token})),
    )
        .into_response()
}

async fn list_members(State(backend): State<Arc<Backend>>, headers: HeaderMap) -> Response {
    if !backend.authorized(&headers) {
        return unauthorized();
    }
    Json(json!([member_json("m1"), member_json("m2")])).into_response()
}

async fn get_member(
    State(backend): State<Arc<Backend>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    if !backend.authorized(&headers) {
        return unauthorized();
    }
    if id == "missing" {
        return (StatusCode::NOT_FOUND, Json(json!({"error": "Member not found"}))).into_response();
    }
    Json(member_json(&id)).into_response()
}

async fn delete_member(
    State(backend): State<Arc<Backend>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    if !backend.authorized(&headers) {
        return unauthorized();
    }
    if id == "locked" {
        return (
            StatusCode::CONFLICT,
            Json(json!({"error": "Member has active bookings"})),
        )
            .into_response();
    }
    StatusCode::NO_CONTENT.into_response()
}

async fn create_class(
    State(backend): State<Arc<Backend>>,
    headers: HeaderMap,
    Json(mut class): Json<Value>,
) -> Response {
    if !backend.authorized(&headers) {
        return unauthorized();
    }
    backend.class_posts.fetch_add(1, Ordering::SeqCst);

    let date = class["date"].as_str().unwrap_or_default().to_string();
    if backend.fail_class_date.lock().unwrap().as_deref() == Some(date.as_str()) {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"error": "Database unavailable"})),
        )
            .into_response();
    }

    let mut classes = backend.classes.lock().unwrap();
    class["id"] = json!(format!("c{}", classes.len() + 1));
    class["date"] = json!(format!("{}T00:00:00Z", date));
    classes.push(class.clone());

    (StatusCode::CREATED, Json(class)).into_response()
}

async fn enroll(
    State(backend): State<Arc<Backend>>,
    headers: HeaderMap,
    Path(_class_id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    if !backend.authorized(&headers) {
        return unauthorized();
    }
    match body["member_id"].as_str() {
        Some("waiting") => {
            Json(json!({"message": "Class is full. Member added to waitlist."})).into_response()
        }
        Some("enrolled") => (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "Member already enrolled in this class"})),
        )
            .into_response(),
        _ => Json(json!({"message": "Member enrolled successfully"})).into_response(),
    }
}

async fn unenroll(
    State(backend): State<Arc<Backend>>,
    headers: HeaderMap,
    Path((_class_id, _member_id)): Path<(String, String)>,
) -> Response {
    if !backend.authorized(&headers) {
        return unauthorized();
    }
    StatusCode::NO_CONTENT.into_response()
}

async fn plain_text_error() -> Response {
    (StatusCode::BAD_GATEWAY, "upstream exploded").into_response()
}

async fn json_without_error() -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({"detail": "nope"}))).into_response()
}

/// A running mock backend. Dropping it does not stop the server; each test
/// gets its own port.
pub struct Mock {
    pub backend: Arc<Backend>,
    pub url: String,
}

impl Mock {
    pub async fn start() -> Self {
        let backend = Arc::new(Backend::new());

        let app = Router::new()
            .route("/auth/login", post(login))
            .route("/auth/logout", post(logout))
            .route("/auth/refresh", post(refresh))
            .route("/api/members", get(list_members))
            .route("/api/members/{id}", get(get_member).delete(delete_member))
            .route("/api/classes", post(create_class))
            .route("/api/classes/{id}/enroll", post(enroll))
            .route("/api/classes/{id}/unenroll/{member_id}", delete(unenroll))
            .route("/broken/plain", get(plain_text_error))
            .route("/broken/json", get(json_without_error))
            .with_state(backend.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Mock {
            backend,
            url: format!("http://{}", addr),
        }
    }

    pub fn config(&self, scheme: AuthScheme) -> GymdeskConfig {
        GymdeskConfig {
            api_url: self.url.clone(),
            auth_scheme: scheme,
            ..GymdeskConfig::default()
        }
    }

    /// Bearer client whose stored access token the backend no longer accepts.
    pub fn stale_client(&self) -> ApiClient {
        self.stale_client_with(AuthSession::new(AuthScheme::Bearer, Arc::new(stale_store())))
    }

    pub fn stale_client_with(&self, session: AuthSession) -> ApiClient {
        ApiClient::new(&self.config(AuthScheme::Bearer), session).unwrap()
    }
}

pub fn stale_store() -> MemoryStore {
    MemoryStore::with(StoredCredentials {
        access_token: Some("stale".to_string()),
        refresh_token: Some(REFRESH_TOKEN.to_string()),
        ..StoredCredentials::default()
    })
}
