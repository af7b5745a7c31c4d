//! Plain-text rendering for the terminal shell.

use std::fmt::Write as _;

use hostel_shared::records::{Announcement, ComplaintImageRecord};
use hostel_shared::{Address, Complaint};

use crate::auth::AuthState;
use crate::view::ComplaintQuery;

const TEXT_WIDTH: usize = 32;

fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        return s.to_string();
    }
    let mut out: String = s.chars().take(width.saturating_sub(3)).collect();
    out.push_str("...");
    out
}

/// `0x1234...abcd`, or a prompt to connect.
pub fn account_badge(account: Option<&Address>) -> String {
    match account {
        Some(address) => address.short(),
        None => "not connected".to_string(),
    }
}

pub fn auth_badge(auth: &AuthState) -> String {
    match (&auth.user, auth.is_authenticated()) {
        (Some(user), true) => format!("{} <{}> as {}", user.name, user.email, user.role.as_str()),
        _ => "not signed in".to_string(),
    }
}

/// Dashboard table. The review column is offered only for completed
/// complaints.
pub fn complaint_table(complaints: &[Complaint], query: &ComplaintQuery) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "sorted by {} ({}){}",
        query.sort_field,
        query.sort_order,
        if query.search.is_empty() {
            String::new()
        } else {
            format!(", search \"{}\"", query.search)
        }
    );

    if complaints.is_empty() {
        out.push_str("No complaints found.\n");
        return out;
    }

    let _ = writeln!(
        out,
        "{:>4}  {:<w$}  {:<8}  {:>5}  {:<6}  {:<12}  {:<12}  {}",
        "ID", "Complaint", "Block", "Floor", "Room", "Category", "Status", "Review",
        w = TEXT_WIDTH
    );
    for c in complaints {
        let review = if c.status.is_reviewable() {
            format!("review {} yes|no", c.id)
        } else {
            String::new()
        };
        let _ = writeln!(
            out,
            "{:>4}  {:<w$}  {:<8}  {:>5}  {:<6}  {:<12}  {:<12}  {}",
            c.id,
            truncate(&c.text, TEXT_WIDTH),
            truncate(&c.block_name, 8),
            c.floor_no,
            truncate(c.room_display(), 6),
            truncate(&c.category, 12),
            c.status.label(),
            review,
            w = TEXT_WIDTH
        );
    }
    out
}

pub fn image_records(records: &[ComplaintImageRecord]) -> String {
    if records.is_empty() {
        return "No complaint images.\n".to_string();
    }
    let mut out = String::new();
    for r in records {
        let feedback = if r.admin_feedback.is_empty() {
            "-"
        } else {
            r.admin_feedback.as_str()
        };
        let _ = writeln!(
            out,
            "#{}  {}  {} ({} bytes)  feedback: {}",
            r.complaint_id,
            r.student_address.short(),
            r.image.content_type,
            r.image.data.len(),
            feedback
        );
    }
    out
}

pub fn announcements(items: &[Announcement]) -> String {
    if items.is_empty() {
        return "No announcements.\n".to_string();
    }
    let mut out = String::new();
    for a in items {
        let _ = writeln!(out, "[{}] {}", a.created_at.format("%Y-%m-%d %H:%M"), a.title);
        if !a.body.is_empty() {
            let _ = writeln!(out, "    {}", a.body);
        }
    }
    out
}
