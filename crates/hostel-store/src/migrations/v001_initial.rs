//! v001 -- Initial schema creation.
//!
//! Creates the two auxiliary tables: `complaint_images` and `announcements`.

use rusqlite::Connection;

/// SQL executed when upgrading from version 0 to version 1.
const UP_SQL: &str = r#"
-- ----------------------------------------------------------------
-- Complaint images (one per on-chain complaint)
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS complaint_images (
    complaint_id    TEXT PRIMARY KEY NOT NULL,  -- contract complaint id
    student_address TEXT NOT NULL,              -- submitting wallet, as given
    image_data      BLOB NOT NULL,
    content_type    TEXT NOT NULL,              -- MIME type
    admin_feedback  TEXT NOT NULL DEFAULT ''
);

CREATE INDEX IF NOT EXISTS idx_complaint_images_student
    ON complaint_images(lower(student_address));

-- ----------------------------------------------------------------
-- Announcements
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS announcements (
    id         TEXT PRIMARY KEY NOT NULL,       -- UUID v4
    title      TEXT NOT NULL,
    body       TEXT NOT NULL,
    author_id  TEXT NOT NULL,                   -- soft reference, unchecked
    created_at TEXT NOT NULL                    -- RFC-3339
);

CREATE INDEX IF NOT EXISTS idx_announcements_created_at
    ON announcements(created_at DESC);
"#;

/// Apply the initial migration.
pub fn up(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(UP_SQL)
}
