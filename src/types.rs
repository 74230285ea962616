//! Session type definitions: tokens, the cached user, and auth payloads

use crate::error::{ClientError, Result};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Authentication tokens (access + refresh)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthTokens {
    pub access_token: String,
    pub refresh_token: String,
}

/// Dashboard role, used to pick the landing page after login
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    Superadmin,
    Unit,
    Outlet,
    /// Any role the dashboard has no dedicated landing page for
    Other(String),
}

impl From<String> for Role {
    fn from(value: String) -> Self {
        match value.as_str() {
            "superadmin" => Role::Superadmin,
            "unit" => Role::Unit,
            "outlet" => Role::Outlet,
            _ => Role::Other(value),
        }
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        role.as_str().to_string()
    }
}

impl Role {
    pub fn as_str(&self) -> &str {
        match self {
            Role::Superadmin => "superadmin",
            Role::Unit => "unit",
            Role::Outlet => "outlet",
            Role::Other(other) => other,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Snapshot of the logged-in user as returned by the backend at login time.
///
/// Never refreshed from the server, so it may lag behind the real account.
/// Fields the client does not interpret are kept verbatim in `extra`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CachedUser {
    #[serde(default, deserialize_with = "string_or_number", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fullname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CachedUser {
    /// Name to show in the UI, preferring `name` over `fullname`.
    pub fn display_name(&self) -> Option<&str> {
        self.name.as_deref().or(self.fullname.as_deref())
    }
}

/// Everything stored for one backend origin
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SessionRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<CachedUser>,
}

impl SessionRecord {
    pub fn new(tokens: AuthTokens, user: CachedUser) -> Self {
        Self {
            access_token: Some(tokens.access_token),
            refresh_token: Some(tokens.refresh_token),
            user: Some(user),
        }
    }

    /// Copy of this record with the token pair swapped and the user kept
    pub fn with_tokens(&self, tokens: &AuthTokens) -> Self {
        Self {
            access_token: Some(tokens.access_token.clone()),
            refresh_token: Some(tokens.refresh_token.clone()),
            user: self.user.clone(),
        }
    }

    pub fn role(&self) -> Option<&Role> {
        self.user.as_ref().and_then(|u| u.role.as_ref())
    }
}

/// Body sent to `/auth/login`
#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// Body sent to `/auth/register`
#[derive(Debug, Serialize)]
pub struct RegisterRequest<'a> {
    pub fullname: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

/// Body sent to `/auth/google-login`
#[derive(Debug, Serialize)]
pub struct GoogleLoginRequest<'a> {
    pub token: &'a str,
}

/// Body sent to `/auth/refresh`
#[derive(Debug, Serialize)]
pub struct RefreshRequest<'a> {
    pub refresh_token: &'a str,
}

/// Well-formed login payload: both tokens as strings and a user object
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub user: CachedUser,
}

impl LoginResponse {
    /// Accept the body only if it has the shape of a login response.
    pub fn from_value(value: Value) -> Result<Self> {
        if !value.get("user").is_some_and(Value::is_object) {
            return Err(ClientError::InvalidResponse(
                "login response has no user object".to_string(),
            ));
        }
        let response: LoginResponse = serde_json::from_value(value)
            .map_err(|e| ClientError::InvalidResponse(format!("malformed login response: {e}")))?;
        if response.access_token.is_empty() {
            return Err(ClientError::InvalidResponse(
                "login response has an empty access token".to_string(),
            ));
        }
        Ok(response)
    }

    pub fn into_parts(self) -> (AuthTokens, CachedUser) {
        (
            AuthTokens {
                access_token: self.access_token,
                refresh_token: self.refresh_token,
            },
            self.user,
        )
    }
}

/// Body returned by `/auth/refresh`
#[derive(Debug, Deserialize)]
pub struct RefreshResponse {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

impl RefreshResponse {
    /// Both tokens must be present and non-empty for the refresh to count.
    pub fn into_tokens(self) -> Option<AuthTokens> {
        match (self.access_token, self.refresh_token) {
            (Some(access_token), Some(refresh_token))
                if !access_token.is_empty() && !refresh_token.is_empty() =>
            {
                Some(AuthTokens {
                    access_token,
                    refresh_token,
                })
            }
            _ => None,
        }
    }
}

/// Ids come back as strings from most endpoints and as numbers from a few.
pub(crate) fn string_or_number<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// Required id: string or number, empty when null
pub(crate) fn id_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(string_or_number(deserializer)?.unwrap_or_default())
}

/// `null` reads as `T::default()`
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
