//! Route table and role gating.
//!
//! Access depends only on the OAuth role. A connected wallet never opens a
//! gated route, and a missing one never closes a public route.

use std::fmt;

use crate::auth::{AuthState, Role};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Home,
    AddComplaint,
    OAuthRedirect,
    Dashboard,
    LowerAdmin,
    HigherAdmin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    Render(Route),
    Redirect(Route),
}

impl Route {
    pub const ALL: [Route; 6] = [
        Route::Home,
        Route::AddComplaint,
        Route::OAuthRedirect,
        Route::Dashboard,
        Route::LowerAdmin,
        Route::HigherAdmin,
    ];

    pub fn path(&self) -> &'static str {
        match self {
            Route::Home => "/",
            Route::AddComplaint => "/add-complaint",
            Route::OAuthRedirect => "/oauth-redirect",
            Route::Dashboard => "/dashboard",
            Route::LowerAdmin => "/lower-admin",
            Route::HigherAdmin => "/higher-admin",
        }
    }

    /// Match a path, ignoring any query string and trailing slash.
    pub fn from_path(path: &str) -> Option<Self> {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let trimmed = path.trim_end_matches('/');
        let normalized = if trimmed.is_empty() { "/" } else { trimmed };
        Self::ALL.into_iter().find(|r| r.path() == normalized)
    }

    /// Where a freshly signed-in user lands.
    pub fn landing_for(role: Role) -> Self {
        match role {
            Role::Student => Route::Dashboard,
            Role::LowerAdmin => Route::LowerAdmin,
            Role::HigherAdmin => Route::HigherAdmin,
        }
    }

    /// Role an authenticated user must hold; `None` for public routes.
    pub fn required_role(&self) -> Option<Role> {
        match self {
            Route::Home | Route::AddComplaint | Route::OAuthRedirect => None,
            Route::Dashboard => Some(Role::Student),
            Route::LowerAdmin => Some(Role::LowerAdmin),
            Route::HigherAdmin => Some(Role::HigherAdmin),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

pub fn resolve(route: Route, auth: &AuthState) -> Navigation {
    match route.required_role() {
        None => Navigation::Render(route),
        Some(required) if auth.role() == Some(required) => Navigation::Render(route),
        Some(_) => {
            tracing::debug!(route = %route, "access denied, redirecting home");
            Navigation::Redirect(Route::Home)
        }
    }
}

/// Resolve a raw path. Unknown paths land on Home.
pub fn navigate(path: &str, auth: &AuthState) -> Navigation {
    match Route::from_path(path) {
        Some(route) => resolve(route, auth),
        None => Navigation::Redirect(Route::Home),
    }
}
