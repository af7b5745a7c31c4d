//! OAuth-derived identity.
//!
//! The backend runs the Google OAuth dance and finishes by redirecting to
//! `/oauth-redirect?token=<opaque>&user=<url-encoded JSON>`. The token is
//! kept opaque; the user's `role` drives route gating. None of this is
//! persisted, and it is unrelated to the wallet account.

use hostel_shared::constants::GOOGLE_AUTH_PATH;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

/// Base used to parse redirect paths that arrive without scheme and host.
const RELATIVE_BASE: &str = "http://localhost/";

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Invalid redirect URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Redirect is missing the token parameter")]
    MissingToken,

    #[error("Redirect is missing the user parameter")]
    MissingUser,

    #[error("Redirect user is not valid JSON: {0}")]
    InvalidUser(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Role {
    Student,
    LowerAdmin,
    HigherAdmin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::LowerAdmin => "lowerAdmin",
            Role::HigherAdmin => "higherAdmin",
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::LowerAdmin | Role::HigherAdmin)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    #[serde(alias = "_id", default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    pub role: Role,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthState {
    pub token: Option<String>,
    pub user: Option<AuthUser>,
}

impl AuthState {
    /// Parse the OAuth completion URL. Accepts a full URL or just the path
    /// and query.
    pub fn from_redirect(redirect: &str) -> Result<Self, AuthError> {
        let url = match Url::parse(redirect) {
            Ok(url) => url,
            Err(url::ParseError::RelativeUrlWithoutBase) => {
                Url::parse(RELATIVE_BASE)?.join(redirect)?
            }
            Err(e) => return Err(e.into()),
        };

        let mut token = None;
        let mut user = None;
        for (key, value) in url.query_pairs() {
            match key.as_ref() {
                "token" if !value.is_empty() => token = Some(value.into_owned()),
                "user" if !value.is_empty() => user = Some(value.into_owned()),
                _ => {}
            }
        }

        let token = token.ok_or(AuthError::MissingToken)?;
        let user: AuthUser = serde_json::from_str(&user.ok_or(AuthError::MissingUser)?)?;

        tracing::info!(user = %user.id, role = user.role.as_str(), "OAuth login completed");
        Ok(Self {
            token: Some(token),
            user: Some(user),
        })
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// Role of an authenticated user; `None` without a token.
    pub fn role(&self) -> Option<Role> {
        if !self.is_authenticated() {
            return None;
        }
        self.user.as_ref().map(|u| u.role)
    }

    pub fn logout(&mut self) {
        self.token = None;
        self.user = None;
    }
}

/// Where the browser is sent to start the Google OAuth flow.
pub fn login_url(api_base: &str) -> String {
    format!("{}{}", api_base.trim_end_matches('/'), GOOGLE_AUTH_PATH)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_url() {
        assert_eq!(
            login_url("http://localhost:4000/"),
            "http://localhost:4000/auth/google"
        );
    }

    #[test]
    fn test_parse_redirect_path() {
        let redirect = "/oauth-redirect?token=abc.def&user=%7B%22_id%22%3A%22u1%22%2C%22name%22%3A%22Asha%22%2C%22email%22%3A%22asha%40example.com%22%2C%22role%22%3A%22lowerAdmin%22%7D";
        let auth = AuthState::from_redirect(redirect).unwrap();
        assert!(auth.is_authenticated());
        assert_eq!(auth.token.as_deref(), Some("abc.def"));
        let user = auth.user.as_ref().unwrap();
        assert_eq!(user.id, "u1");
        assert_eq!(user.email, "asha@example.com");
        assert_eq!(auth.role(), Some(Role::LowerAdmin));
    }

    #[test]
    fn test_parse_full_url() {
        let redirect = "http://localhost:3000/oauth-redirect?user=%7B%22id%22%3A%227%22%2C%22role%22%3A%22student%22%7D&token=t";
        let auth = AuthState::from_redirect(redirect).unwrap();
        assert_eq!(auth.role(), Some(Role::Student));
    }

    #[test]
    fn test_missing_parts() {
        assert!(matches!(
            AuthState::from_redirect("/oauth-redirect?user=%7B%7D"),
            Err(AuthError::MissingToken)
        ));
        assert!(matches!(
            AuthState::from_redirect("/oauth-redirect?token=t"),
            Err(AuthError::MissingUser)
        ));
        assert!(matches!(
            AuthState::from_redirect("/oauth-redirect?token=t&user=%7Bnope"),
            Err(AuthError::InvalidUser(_))
        ));
    }

    #[test]
    fn test_unknown_role_rejected() {
        let redirect = "/oauth-redirect?token=t&user=%7B%22role%22%3A%22warden%22%7D";
        assert!(matches!(
            AuthState::from_redirect(redirect),
            Err(AuthError::InvalidUser(_))
        ));
    }

    #[test]
    fn test_logout_drops_role() {
        let mut auth = AuthState::from_redirect(
            "/oauth-redirect?token=t&user=%7B%22role%22%3A%22higherAdmin%22%7D",
        )
        .unwrap();
        auth.logout();
        assert!(!auth.is_authenticated());
        assert_eq!(auth.role(), None);
    }
}
