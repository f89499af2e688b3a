//! In-process stand-in for the release board backend

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use axum::{
    extract::{Path, State},
    http::{HeaderMap, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, patch, post},
    Json, Router,
};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

const COLLECTIONS: [&str; 3] = ["schedules", "updates", "reviews"];

/// A request as the backend saw it
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub bearer: Option<String>,
    pub request_id: Option<String>,
    pub body: Option<Value>,
}

#[derive(Debug, Clone)]
struct MockUser {
    id: String,
    full_name: String,
    username: String,
    password: String,
}

impl MockUser {
    /// Both `_id` and the `id` virtual, the way a document with virtuals serializes
    fn profile(&self) -> Value {
        json!({
            "_id": self.id,
            "id": self.id,
            "fullName": self.full_name,
            "username": self.username
        })
    }
}

#[derive(Default)]
struct MockState {
    users: Vec<MockUser>,
    tokens: HashMap<String, String>,
    collections: HashMap<String, Vec<Value>>,
    requests: Vec<RecordedRequest>,
    next_id: u64,
    fail_deletes: bool,
    fail_lists: bool,
    fail_logout: bool,
    list_delay: Option<Duration>,
    delete_delay: Option<Duration>,
}

impl MockState {
    fn next_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{}-{}", prefix, self.next_id)
    }

    fn record(&mut self, method: Method, path: String, headers: &HeaderMap, body: Option<Value>) {
        self.requests.push(RecordedRequest {
            method,
            path,
            bearer: bearer(headers),
            request_id: headers
                .get("x-request-id")
                .and_then(|v| v.to_str().ok())
                .map(str::to_string),
            body,
        });
    }

    fn user_for(&self, headers: &HeaderMap) -> Option<MockUser> {
        let token = bearer(headers)?;
        let username = self.tokens.get(&token)?;
        self.users.iter().find(|u| &u.username == username).cloned()
    }
}

type Shared = Arc<Mutex<MockState>>;

fn bearer(headers: &HeaderMap) -> Option<String> {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::to_string)
}

fn lock(state: &Shared) -> MutexGuard<'_, MockState> {
    state.lock().unwrap_or_else(|e| e.into_inner())
}

fn data(value: Value) -> Response {
    Json(json!({ "data": value })).into_response()
}

fn failure(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

fn unauthorized() -> Response {
    failure(StatusCode::UNAUTHORIZED, "Not authorized, token failed")
}

/// Running mock backend; stops when dropped
pub struct MockBackend {
    pub base_url: String,
    state: Shared,
    handle: JoinHandle<()>,
}

impl MockBackend {
    pub async fn start() -> Self {
        let state: Shared = Arc::new(Mutex::new(MockState::default()));

        let api = Router::new()
            .route("/auth/login", post(login_handler))
            .route("/auth/register", post(register_handler))
            .route("/auth/me", get(me_handler))
            .route("/auth/logout", get(logout_handler))
            .route("/refused", get(refused_handler))
            .route("/refused-list", get(refused_list_handler))
            .route("/slow", get(slow_handler))
            .route("/schedules/{id}/notify", post(notify_handler))
            .route("/{collection}", get(list_handler).post(create_handler))
            .route(
                "/{collection}/{id}",
                patch(update_handler).put(update_handler).delete(delete_handler),
            )
            .with_state(state.clone());
        let app = Router::new().nest("/api", api);

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{}/api", addr),
            state,
            handle,
        }
    }

    pub fn add_user(&self, full_name: &str, username: &str, password: &str) {
        let mut state = lock(&self.state);
        let id = state.next_id("user");
        state.users.push(MockUser {
            id,
            full_name: full_name.to_string(),
            username: username.to_string(),
            password: password.to_string(),
        });
    }

    /// Start a backend session for `username` and return its token
    pub fn issue_token(&self, username: &str) -> String {
        let mut state = lock(&self.state);
        let token = state.next_id("token");
        state.tokens.insert(token.clone(), username.to_string());
        token
    }

    /// Register a throwaway user and start a session for it
    pub fn issue_token_for_new_user(&self) -> String {
        self.add_user("Grace Hopper", "grace", "cobol");
        self.issue_token("grace")
    }

    /// Expire every session, as a backend restart with a new secret would
    pub fn revoke_tokens(&self) {
        lock(&self.state).tokens.clear();
    }

    pub fn is_token_live(&self, token: &str) -> bool {
        lock(&self.state).tokens.contains_key(token)
    }

    /// Store a record directly and return its id
    pub fn seed(&self, collection: &str, mut record: Value) -> String {
        let mut state = lock(&self.state);
        let id = state.next_id(collection);
        record["_id"] = json!(id);
        state
            .collections
            .entry(collection.to_string())
            .or_default()
            .push(record);
        id
    }

    pub fn records(&self, collection: &str) -> Vec<Value> {
        lock(&self.state)
            .collections
            .get(collection)
            .cloned()
            .unwrap_or_default()
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        lock(&self.state).requests.clone()
    }

    /// Requests with this method whose path starts with `prefix`
    pub fn requests_to(&self, method: Method, prefix: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == method && r.path.starts_with(prefix))
            .collect()
    }

    pub fn set_fail_deletes(&self, fail: bool) {
        lock(&self.state).fail_deletes = fail;
    }

    pub fn set_fail_lists(&self, fail: bool) {
        lock(&self.state).fail_lists = fail;
    }

    pub fn set_fail_logout(&self, fail: bool) {
        lock(&self.state).fail_logout = fail;
    }

    pub fn set_list_delay(&self, delay: Option<Duration>) {
        lock(&self.state).list_delay = delay;
    }

    pub fn set_delete_delay(&self, delay: Option<Duration>) {
        lock(&self.state).delete_delay = delay;
    }
}

impl Drop for MockBackend {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn login_handler(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let mut state = lock(&state);
    state.record(Method::POST, "/auth/login".to_string(), &headers, Some(body.clone()));

    let username = body["username"].as_str().unwrap_or_default();
    let password = body["password"].as_str().unwrap_or_default();
    let user = state
        .users
        .iter()
        .find(|u| u.username == username && u.password == password)
        .cloned();

    match user {
        Some(user) => {
            let token = state.next_id("token");
            state.tokens.insert(token.clone(), user.username.clone());
            data(json!({ "token": token, "user": user.profile() }))
        }
        None => failure(StatusCode::UNAUTHORIZED, "Invalid credentials"),
    }
}

async fn register_handler(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let mut state = lock(&state);
    state.record(Method::POST, "/auth/register".to_string(), &headers, Some(body.clone()));

    let username = body["username"].as_str().unwrap_or_default().to_string();
    if state.users.iter().any(|u| u.username == username) {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "message": "User already exists" })),
        )
            .into_response();
    }

    let id = state.next_id("user");
    let user = MockUser {
        id,
        full_name: body["fullName"].as_str().unwrap_or_default().to_string(),
        username: username.clone(),
        password: body["password"].as_str().unwrap_or_default().to_string(),
    };
    state.users.push(user.clone());
    let token = state.next_id("token");
    state.tokens.insert(token.clone(), username);
    data(json!({ "token": token, "user": user.profile() }))
}

async fn me_handler(State(state): State<Shared>, headers: HeaderMap) -> Response {
    let mut state = lock(&state);
    state.record(Method::GET, "/auth/me".to_string(), &headers, None);
    match state.user_for(&headers) {
        Some(user) => data(user.profile()),
        None => unauthorized(),
    }
}

async fn logout_handler(State(state): State<Shared>, headers: HeaderMap) -> Response {
    let mut state = lock(&state);
    state.record(Method::GET, "/auth/logout".to_string(), &headers, None);
    if state.fail_logout {
        return failure(StatusCode::INTERNAL_SERVER_ERROR, "Logout failed");
    }
    if let Some(token) = bearer(&headers) {
        state.tokens.remove(&token);
    }
    data(Value::Null)
}

async fn refused_handler(State(state): State<Shared>, headers: HeaderMap) -> Response {
    lock(&state).record(Method::GET, "/refused".to_string(), &headers, None);
    Json(json!({ "success": false, "data": null, "message": "Feature disabled" })).into_response()
}

async fn refused_list_handler(State(state): State<Shared>, headers: HeaderMap) -> Response {
    lock(&state).record(Method::GET, "/refused-list".to_string(), &headers, None);
    Json(json!({ "success": false, "message": "Reports are switched off" })).into_response()
}

async fn slow_handler(State(state): State<Shared>, headers: HeaderMap) -> Response {
    lock(&state).record(Method::GET, "/slow".to_string(), &headers, None);
    tokio::time::sleep(Duration::from_secs(5)).await;
    data(Value::Null)
}

async fn list_handler(
    State(state): State<Shared>,
    Path(collection): Path<String>,
    headers: HeaderMap,
) -> Response {
    let delay = {
        let mut state = lock(&state);
        state.record(Method::GET, format!("/{}", collection), &headers, None);
        state.list_delay
    };
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }

    let state = lock(&state);
    if !COLLECTIONS.contains(&collection.as_str()) {
        return failure(StatusCode::NOT_FOUND, "Not found");
    }
    if state.user_for(&headers).is_none() {
        return unauthorized();
    }
    if state.fail_lists {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    let records = state.collections.get(&collection).cloned().unwrap_or_default();
    data(Value::Array(records))
}

async fn create_handler(
    State(state): State<Shared>,
    Path(collection): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let mut state = lock(&state);
    state.record(Method::POST, format!("/{}", collection), &headers, Some(body.clone()));
    if state.user_for(&headers).is_none() {
        return unauthorized();
    }
    if !body["appName"].as_str().is_some_and(|s| !s.is_empty()) {
        return failure(StatusCode::BAD_REQUEST, "appName is required");
    }

    let mut record = body;
    let id = state.next_id(&collection);
    record["_id"] = json!(id);
    state
        .collections
        .entry(collection)
        .or_default()
        .push(record.clone());
    (StatusCode::CREATED, Json(json!({ "data": record }))).into_response()
}

async fn update_handler(
    State(state): State<Shared>,
    method: Method,
    Path((collection, id)): Path<(String, String)>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let mut state = lock(&state);
    state.record(
        method.clone(),
        format!("/{}/{}", collection, id),
        &headers,
        Some(body.clone()),
    );
    if state.user_for(&headers).is_none() {
        return unauthorized();
    }

    let records = state.collections.entry(collection).or_default();
    let Some(record) = records.iter_mut().find(|r| r["_id"] == json!(id)) else {
        return failure(StatusCode::NOT_FOUND, "Record not found");
    };

    if method == Method::PUT {
        *record = body;
        record["_id"] = json!(id);
    } else if let (Some(target), Some(changes)) = (record.as_object_mut(), body.as_object()) {
        for (key, value) in changes {
            target.insert(key.clone(), value.clone());
        }
    }
    data(record.clone())
}

async fn delete_handler(
    State(state): State<Shared>,
    Path((collection, id)): Path<(String, String)>,
    headers: HeaderMap,
) -> Response {
    let delay = {
        let mut state = lock(&state);
        state.record(Method::DELETE, format!("/{}/{}", collection, id), &headers, None);
        state.delete_delay
    };
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }

    let mut state = lock(&state);
    if state.user_for(&headers).is_none() {
        return unauthorized();
    }
    if state.fail_deletes {
        return failure(StatusCode::INTERNAL_SERVER_ERROR, "Delete refused");
    }
    let records = state.collections.entry(collection).or_default();
    let before = records.len();
    records.retain(|r| r["_id"] != json!(id));
    if records.len() == before {
        return failure(StatusCode::NOT_FOUND, "Record not found");
    }
    data(json!({ "_id": id }))
}

async fn notify_handler(
    State(state): State<Shared>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    let mut state = lock(&state);
    state.record(Method::POST, format!("/schedules/{}/notify", id), &headers, None);
    if state.user_for(&headers).is_none() {
        return unauthorized();
    }

    let schedules = state.collections.get("schedules").cloned().unwrap_or_default();
    match schedules.iter().find(|r| r["_id"] == json!(id)) {
        Some(schedule) => data(json!({
            "sent": true,
            "recipients": schedule["developers"].clone(),
            "sentAt": "2024-03-01T09:00:00Z"
        })),
        None => failure(StatusCode::NOT_FOUND, "Schedule not found"),
    }
}
