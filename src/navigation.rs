//! Navigation targets, role-based redirects, and the route guard

use crate::types::{Role, SessionRecord};
use std::fmt;
use std::sync::{Arc, Mutex};
use tokio::sync::watch;

/// Pages the client may send the user to
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    AdminDashboard,
    UnitDashboard,
    OutletDashboard,
    /// Default landing page for roles without a dashboard
    Photos,
    /// Any other page, by path
    Page(String),
}

pub const LOGIN_PATH: &str = "/login";

impl Route {
    pub fn path(&self) -> &str {
        match self {
            Route::Login => LOGIN_PATH,
            Route::AdminDashboard => "/admin/dashboard",
            Route::UnitDashboard => "/units/dashboard",
            Route::OutletDashboard => "/outlets/dashboard",
            Route::Photos => "/photos",
            Route::Page(path) => path,
        }
    }

    /// Landing page for a role
    pub fn for_role(role: Option<&Role>) -> Self {
        match role {
            Some(Role::Superadmin) => Route::AdminDashboard,
            Some(Role::Unit) => Route::UnitDashboard,
            Some(Role::Outlet) => Route::OutletDashboard,
            _ => Route::Photos,
        }
    }

    /// Resolve a path to a known route, falling back to [`Route::Page`]
    pub fn from_path(path: &str) -> Self {
        let trimmed = match path.trim_end_matches('/') {
            "" => "/",
            p => p,
        };
        match trimmed {
            LOGIN_PATH => Route::Login,
            "/admin/dashboard" => Route::AdminDashboard,
            "/units/dashboard" => Route::UnitDashboard,
            "/outlets/dashboard" => Route::OutletDashboard,
            "/photos" => Route::Photos,
            other => Route::Page(other.to_string()),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Decide whether navigating to `target` must be redirected.
///
/// Signed-in users asking for the login page go to their landing page.
/// Anonymous users asking for anything else go to login. `None` means
/// the navigation proceeds as requested.
pub fn guard(session: Option<&SessionRecord>, target: &Route) -> Option<Route> {
    let has_token = session.is_some_and(|s| s.access_token.is_some());

    match (has_token, target) {
        (true, Route::Login) => session
            .and_then(|s| s.user.as_ref())
            .map(|user| Route::for_role(user.role.as_ref())),
        (false, Route::Login) => None,
        (false, _) => Some(Route::Login),
        (true, _) => None,
    }
}

/// Sink for navigation requests made by the client
pub trait Navigator: Send + Sync + 'static {
    fn navigate(&self, route: Route);
}

/// No-op navigator for headless use
pub struct NavigatorNoop {}

impl Navigator for NavigatorNoop {
    fn navigate(&self, _route: Route) {}
}

impl NavigatorNoop {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {})
    }
}

/// Navigator that publishes the latest target on a watch channel
/// and remembers every request in order.
pub struct WatchNavigator {
    current: watch::Sender<Option<Route>>,
    history: Mutex<Vec<Route>>,
}

impl WatchNavigator {
    pub fn new() -> Arc<Self> {
        let (current, _) = watch::channel(None);
        Arc::new(Self {
            current,
            history: Mutex::new(Vec::new()),
        })
    }

    /// Latest requested route
    pub fn current(&self) -> Option<Route> {
        self.current.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<Route>> {
        self.current.subscribe()
    }

    /// All requested routes, oldest first
    pub fn history(&self) -> Vec<Route> {
        self.history
            .lock()
            .map(|h| h.clone())
            .unwrap_or_default()
    }
}

impl Navigator for WatchNavigator {
    fn navigate(&self, route: Route) {
        if let Ok(mut history) = self.history.lock() {
            history.push(route.clone());
        }
        self.current.send_replace(Some(route));
    }
}
