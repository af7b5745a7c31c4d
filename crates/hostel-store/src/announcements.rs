use chrono::{DateTime, SecondsFormat, Utc};
use hostel_shared::records::Announcement;
use rusqlite::{params, OptionalExtension};
use uuid::Uuid;

use crate::database::Database;
use crate::error::{Result, StoreError};

impl Database {
    pub fn insert_announcement(&self, announcement: &Announcement) -> Result<()> {
        self.conn().execute(
            "INSERT INTO announcements (id, title, body, author_id, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                announcement.id.to_string(),
                announcement.title,
                announcement.body,
                announcement.author_id,
                // fixed-width timestamps keep ORDER BY created_at chronological
                announcement.created_at.to_rfc3339_opts(SecondsFormat::Nanos, true),
            ],
        )?;
        Ok(())
    }

    pub fn get_announcement(&self, id: Uuid) -> Result<Announcement> {
        self.conn()
            .query_row(
                "SELECT id, title, body, author_id, created_at FROM announcements WHERE id = ?1",
                params![id.to_string()],
                row_to_announcement,
            )
            .optional()?
            .ok_or(StoreError::NotFound)
    }

    /// Newest first.
    pub fn list_announcements(&self) -> Result<Vec<Announcement>> {
        let mut stmt = self.conn().prepare(
            "SELECT id, title, body, author_id, created_at
             FROM announcements
             ORDER BY created_at DESC",
        )?;
        let rows = stmt.query_map([], row_to_announcement)?;
        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(StoreError::Sqlite)
    }
}

fn row_to_announcement(row: &rusqlite::Row<'_>) -> rusqlite::Result<Announcement> {
    let id_str: String = row.get(0)?;
    let title: String = row.get(1)?;
    let body: String = row.get(2)?;
    let author_id: String = row.get(3)?;
    let created_str: String = row.get(4)?;

    let id = Uuid::parse_str(&id_str).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
    })?;

    let created_at: DateTime<Utc> = DateTime::parse_from_rfc3339(&created_str)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(4, rusqlite::types::Type::Text, Box::new(e))
        })?;

    Ok(Announcement {
        id,
        title,
        body,
        author_id,
        created_at,
    })
}
