//! Command handlers behind the shell.
//!
//! Each sub-module groups related actions by domain. Handlers take the
//! [`AppState`](crate::state::AppState) explicitly and return either a typed
//! result or a user-facing [`Notice`](crate::events::Notice).

pub mod complaints;
pub mod dashboard;
pub mod records;
pub mod session;
