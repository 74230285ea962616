//! Dashboard Client
//!
//! A Rust client library for the photo-sales and unit-management dashboard
//! backend, with persistent sessions, transparent token refresh, and
//! role-based navigation.

pub mod api_client;
pub mod auth_client;
pub mod config;
pub mod error;
pub mod models;
pub mod navigation;
pub mod resources;
pub mod token_store;
pub mod types;
pub mod upload;

pub use api_client::{ApiClient, RequestBody, RequestSpec};
pub use auth_client::{AuthClient, AuthState};
pub use config::ClientConfig;
pub use error::{ClientError, Result};
pub use models::{DateRange, ListQuery, Paginated};
pub use navigation::{Navigator, NavigatorNoop, Route, WatchNavigator};
pub use token_store::TokenStore;
pub use types::{AuthTokens, CachedUser, Role, SessionRecord};
pub use upload::UploadFile;
