//! In-process fake of the dashboard backend.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use dashboard_client::{
    ApiClient, AuthClient, AuthTokens, CachedUser, ClientConfig, Role, SessionRecord, TokenStore,
    WatchNavigator,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// How the fake answers `/auth/refresh`
#[allow(dead_code)]
#[derive(Clone)]
pub enum RefreshBehavior {
    Issue { access: String, refresh: String },
    Fail(StatusCode),
    /// 200 without a refresh token in the body
    Incomplete,
}

/// How protected routes reject a bad token
#[allow(dead_code)]
#[derive(Clone, Copy)]
pub enum RejectStyle {
    Status401,
    /// 403 with `{"detail": {"status_code": 401}}`
    NestedDetail,
}

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub body: String,
}

#[allow(dead_code)]
impl RecordedRequest {
    pub fn query_map(&self) -> HashMap<String, String> {
        let raw = self.query.clone().unwrap_or_default();
        reqwest::Url::parse(&format!("http://fake/?{raw}"))
            .map(|url| url.query_pairs().into_owned().collect())
            .unwrap_or_default()
    }
}

pub struct BackendState {
    pub requests: Mutex<Vec<RecordedRequest>>,
    pub refresh_calls: AtomicUsize,
    pub refresh_tokens_seen: Mutex<Vec<String>>,
    /// Bearer token protected routes accept
    pub valid_token: Mutex<String>,
    pub refresh_behavior: Mutex<RefreshBehavior>,
    pub refresh_delay: Mutex<Duration>,
    pub reject_style: Mutex<RejectStyle>,
    /// Reject every protected request regardless of token
    pub always_reject: Mutex<bool>,
    pub login_response: Mutex<(StatusCode, Value)>,
    /// Canned responses for protected routes, keyed by path
    pub routes: Mutex<HashMap<String, (StatusCode, Value)>>,
}

#[allow(dead_code)]
impl BackendState {
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests_to(&self, path: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.path == path)
            .collect()
    }

    pub fn refresh_calls(&self) -> usize {
        self.refresh_calls.load(Ordering::SeqCst)
    }

    pub fn set_valid_token(&self, token: &str) {
        *self.valid_token.lock().unwrap() = token.to_string();
    }

    pub fn set_refresh(&self, behavior: RefreshBehavior) {
        *self.refresh_behavior.lock().unwrap() = behavior;
    }

    pub fn set_refresh_delay(&self, delay: Duration) {
        *self.refresh_delay.lock().unwrap() = delay;
    }

    pub fn set_reject_style(&self, style: RejectStyle) {
        *self.reject_style.lock().unwrap() = style;
    }

    pub fn set_always_reject(&self, reject: bool) {
        *self.always_reject.lock().unwrap() = reject;
    }

    pub fn set_login_response(&self, status: StatusCode, body: Value) {
        *self.login_response.lock().unwrap() = (status, body);
    }

    pub fn set_route(&self, path: &str, status: StatusCode, body: Value) {
        self.routes
            .lock()
            .unwrap()
            .insert(path.to_string(), (status, body));
    }
}

pub struct FakeBackend {
    pub base_url: String,
    pub state: Arc<BackendState>,
}

impl FakeBackend {
    pub async fn start() -> Self {
        let state = Arc::new(BackendState {
            requests: Mutex::new(Vec::new()),
            refresh_calls: AtomicUsize::new(0),
            refresh_tokens_seen: Mutex::new(Vec::new()),
            valid_token: Mutex::new("T1".to_string()),
            refresh_behavior: Mutex::new(RefreshBehavior::Issue {
                access: "T_new".to_string(),
                refresh: "R_new".to_string(),
            }),
            refresh_delay: Mutex::new(Duration::ZERO),
            reject_style: Mutex::new(RejectStyle::Status401),
            always_reject: Mutex::new(false),
            login_response: Mutex::new((
                StatusCode::OK,
                json!({
                    "access_token": "T1",
                    "refresh_token": "R1",
                    "user": {"id": "u-1", "name": "Ana", "email": "a@b.com", "role": "unit"}
                }),
            )),
            routes: Mutex::new(HashMap::new()),
        });

        let app = Router::new()
            .route("/auth/login", post(sign_in))
            .route("/auth/register", post(sign_in))
            .route("/auth/google-login", post(sign_in))
            .route("/auth/refresh", post(refresh))
            .fallback(protected)
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind fake backend");
        let addr = listener.local_addr().expect("No local address");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Fake backend crashed");
        });

        Self {
            base_url: format!("http://{addr}"),
            state,
        }
    }

    /// Client with an empty session
    #[allow(dead_code)]
    pub fn client(&self) -> (ApiClient, Arc<WatchNavigator>) {
        self.client_with_store(TokenStore::new())
    }

    /// Client with a stored session for this backend
    #[allow(dead_code)]
    pub fn signed_in_client(
        &self,
        access: &str,
        refresh: &str,
        role: Role,
    ) -> (ApiClient, Arc<WatchNavigator>) {
        let store = TokenStore::new();
        store.store(
            &self.base_url,
            SessionRecord::new(
                AuthTokens {
                    access_token: access.to_string(),
                    refresh_token: refresh.to_string(),
                },
                CachedUser {
                    id: Some("u-1".to_string()),
                    role: Some(role),
                    ..CachedUser::default()
                },
            ),
        );
        self.client_with_store(store)
    }

    pub fn client_with_store(&self, store: TokenStore) -> (ApiClient, Arc<WatchNavigator>) {
        let navigator = WatchNavigator::new();
        let config = ClientConfig::new(&self.base_url).expect("Invalid fake backend url");
        let auth = AuthClient::with_store(config, store, navigator.clone())
            .expect("Failed to build client");
        (ApiClient::new(auth), navigator)
    }
}

fn record(state: &BackendState, method: &Method, uri: &Uri, headers: &HeaderMap, body: &Bytes) {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    state.requests.lock().unwrap().push(RecordedRequest {
        method: method.to_string(),
        path: uri.path().to_string(),
        query: uri.query().map(str::to_string),
        authorization: header("authorization"),
        content_type: header("content-type"),
        body: String::from_utf8_lossy(body).into_owned(),
    });
}

async fn sign_in(
    State(state): State<Arc<BackendState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    record(&state, &method, &uri, &headers, &body);
    let (status, body) = state.login_response.lock().unwrap().clone();
    (status, Json(body)).into_response()
}

async fn refresh(
    State(state): State<Arc<BackendState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    record(&state, &method, &uri, &headers, &body);
    state.refresh_calls.fetch_add(1, Ordering::SeqCst);

    let sent: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    if let Some(token) = sent.get("refresh_token").and_then(Value::as_str) {
        state
            .refresh_tokens_seen
            .lock()
            .unwrap()
            .push(token.to_string());
    }

    let delay = *state.refresh_delay.lock().unwrap();
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }

    let behavior = state.refresh_behavior.lock().unwrap().clone();
    match behavior {
        RefreshBehavior::Issue { access, refresh } => {
            state.set_valid_token(&access);
            Json(json!({"access_token": access, "refresh_token": refresh})).into_response()
        }
        RefreshBehavior::Fail(status) => {
            (status, Json(json!({"detail": "invalid refresh token"}))).into_response()
        }
        RefreshBehavior::Incomplete => Json(json!({"access_token": "T_half"})).into_response(),
    }
}

async fn protected(
    State(state): State<Arc<BackendState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    record(&state, &method, &uri, &headers, &body);

    let expected = format!("Bearer {}", state.valid_token.lock().unwrap());
    let presented = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    let reject = *state.always_reject.lock().unwrap() || presented != expected;

    if reject {
        return match *state.reject_style.lock().unwrap() {
            RejectStyle::Status401 => {
                (StatusCode::UNAUTHORIZED, Json(json!({"detail": "expired"}))).into_response()
            }
            RejectStyle::NestedDetail => (
                StatusCode::FORBIDDEN,
                Json(json!({"detail": {"status_code": 401, "message": "token expired"}})),
            )
                .into_response(),
        };
    }

    let canned = state.routes.lock().unwrap().get(uri.path()).cloned();
    match canned {
        Some((status, body)) => (status, Json(body)).into_response(),
        None => Json(json!({"ok": true, "path": uri.path()})).into_response(),
    }
}
