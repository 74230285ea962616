//! Authenticated request execution
//!
//! [`ApiClient::execute`] attaches the stored bearer token to a request,
//! refreshes the session once if the backend rejects the token, retries once,
//! and ends the session when that is not enough.

use crate::auth_client::AuthClient;
use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::navigation::Navigator;
use crate::resources::{
    Faces, Outlets, Photos, Pricings, Reports, TimeOperations, Transactions, Units, Users,
};
use crate::upload::MultipartUpload;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

/// Request payload
#[derive(Debug, Clone, Default)]
pub enum RequestBody {
    #[default]
    Empty,
    Json(Value),
    Multipart(MultipartUpload),
}

/// Everything needed to (re)issue one backend call
#[derive(Debug, Clone)]
pub struct RequestSpec {
    pub method: Method,
    /// Path relative to the configured base address
    pub path: String,
    pub query: Vec<(String, String)>,
    pub headers: HeaderMap,
    pub body: RequestBody,
}

impl RequestSpec {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            headers: HeaderMap::new(),
            body: RequestBody::Empty,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    /// Add a parameter only when it has a value
    pub fn query_opt(self, key: impl Into<String>, value: Option<impl ToString>) -> Self {
        match value {
            Some(value) => self.query(key, value),
            None => self,
        }
    }

    pub fn query_pairs(mut self, pairs: impl IntoIterator<Item = (String, String)>) -> Self {
        self.query.extend(pairs);
        self
    }

    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self> {
        self.body = RequestBody::Json(serde_json::to_value(body)?);
        Ok(self)
    }

    pub fn multipart(mut self, upload: MultipartUpload) -> Self {
        self.body = RequestBody::Multipart(upload);
        self
    }
}

/// Result of one attempt that did not fail outright
enum Attempt {
    Success(Value),
    /// The backend rejected the bearer token
    Rejected,
}

/// Client for the dashboard REST API
///
/// Cheap to clone; clones share the session and the connection pool.
#[derive(Clone)]
pub struct ApiClient {
    auth: Arc<AuthClient>,
}

impl ApiClient {
    pub fn new(auth: Arc<AuthClient>) -> Self {
        Self { auth }
    }

    /// Build the auth client and the API client in one go.
    pub fn connect(config: ClientConfig, navigator: Arc<dyn Navigator>) -> Result<Self> {
        Ok(Self::new(AuthClient::new(config, navigator)?))
    }

    pub fn auth(&self) -> &Arc<AuthClient> {
        &self.auth
    }

    /// Execute a request with the stored credentials.
    ///
    /// Without an access token the session is ended and the call fails with
    /// [`ClientError::NotAuthenticated`] before anything is sent. A rejected
    /// token triggers one refresh and one retry; if the refresh fails or the
    /// retry is rejected too, the session is ended and the call fails with
    /// [`ClientError::Unauthorized`]. Every other failure is returned as is.
    ///
    /// The retry re-sends the request, so a POST that reached the backend
    /// before being rejected can be applied twice.
    pub async fn execute<T: DeserializeOwned>(&self, request: &RequestSpec) -> Result<T> {
        let Some(access_token) = self.auth.access_token() else {
            warn!(path = %request.path, "No access token, ending session");
            self.auth.logout();
            return Err(ClientError::NotAuthenticated);
        };

        if let Attempt::Success(value) = self.send(request, &access_token).await? {
            return decode(value);
        }

        debug!(path = %request.path, "Access token rejected, refreshing");
        if !self.auth.refresh_after(&access_token).await {
            self.auth.logout();
            return Err(ClientError::Unauthorized);
        }

        let Some(access_token) = self.auth.access_token() else {
            self.auth.logout();
            return Err(ClientError::Unauthorized);
        };

        match self.send(request, &access_token).await? {
            Attempt::Success(value) => decode(value),
            Attempt::Rejected => {
                warn!(path = %request.path, "Access token rejected after refresh, ending session");
                self.auth.logout();
                Err(ClientError::Unauthorized)
            }
        }
    }

    async fn send(&self, request: &RequestSpec, access_token: &str) -> Result<Attempt> {
        let url = self.auth.config().url(&request.path);

        let mut headers = request.headers.clone();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        let mut bearer = HeaderValue::from_str(&format!("Bearer {access_token}"))
            .map_err(|_| {
                ClientError::InvalidRequest("stored access token is not a valid header".to_string())
            })?;
        bearer.set_sensitive(true);
        headers.insert(AUTHORIZATION, bearer);

        let mut builder = self
            .auth
            .http_client()
            .request(request.method.clone(), &url)
            .headers(headers);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        builder = match &request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(body) => builder.json(body),
            RequestBody::Multipart(upload) => builder.multipart(upload.to_form()?),
        };

        debug!(method = %request.method, path = %request.path, "Sending request");
        let response = builder.send().await?;
        let status = response.status();

        if status.is_success() {
            let bytes = response.bytes().await?;
            if bytes.iter().all(u8::is_ascii_whitespace) {
                return Ok(Attempt::Success(Value::Null));
            }
            return Ok(Attempt::Success(serde_json::from_slice(&bytes)?));
        }

        let body = response.text().await.unwrap_or_default();
        if is_auth_rejection(status, &body) {
            return Ok(Attempt::Rejected);
        }

        debug!(method = %request.method, path = %request.path, status = %status, "Backend error");
        Err(ClientError::Backend { status, body })
    }

    pub fn units(&self) -> Units<'_> {
        Units::new(self)
    }

    pub fn outlets(&self) -> Outlets<'_> {
        Outlets::new(self)
    }

    pub fn photos(&self) -> Photos<'_> {
        Photos::new(self)
    }

    pub fn pricings(&self) -> Pricings<'_> {
        Pricings::new(self)
    }

    pub fn users(&self) -> Users<'_> {
        Users::new(self)
    }

    pub fn time_operations(&self) -> TimeOperations<'_> {
        TimeOperations::new(self)
    }

    pub fn transactions(&self) -> Transactions<'_> {
        Transactions::new(self)
    }

    pub fn reports(&self) -> Reports<'_> {
        Reports::new(self)
    }

    pub fn faces(&self) -> Faces<'_> {
        Faces::new(self)
    }
}

fn decode<T: DeserializeOwned>(value: Value) -> Result<T> {
    Ok(serde_json::from_value(value)?)
}

/// A 401 status, or an error body carrying `status_code: 401` either at the
/// top level or under `detail`.
fn is_auth_rejection(status: StatusCode, body: &str) -> bool {
    if status == StatusCode::UNAUTHORIZED {
        return true;
    }
    let Ok(value) = serde_json::from_str::<Value>(body) else {
        return false;
    };
    let code = |v: Option<&Value>| v.and_then(Value::as_u64) == Some(401);
    code(value.pointer("/detail/status_code")) || code(value.get("status_code"))
}
