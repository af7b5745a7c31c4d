//! # hostel-store
//!
//! Auxiliary storage for the Hostel Complaint System, backed by SQLite.
//!
//! Complaints themselves live on the contract. This crate keeps the records
//! that do not: one image record per complaint (with the administrator's
//! feedback) and announcements. The crate exposes a synchronous `Database`
//! handle that wraps a `rusqlite::Connection` and provides typed helpers for
//! each record kind.

pub mod announcements;
pub mod complaint_images;
pub mod database;
pub mod migrations;

mod error;

pub use database::Database;
pub use error::StoreError;
pub use hostel_shared::records::{Announcement, ComplaintImageRecord, ImagePayload};
