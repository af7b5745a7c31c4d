use hostel_shared::records::{ComplaintImageRecord, ImagePayload};
use hostel_shared::Address;
use rusqlite::{params, ErrorCode, OptionalExtension};

use crate::database::Database;
use crate::error::{Result, StoreError};

const SELECT_COLUMNS: &str =
    "SELECT complaint_id, student_address, image_data, content_type, admin_feedback
     FROM complaint_images";

impl Database {
    /// Store the image record for a complaint. One record per complaint id.
    pub fn insert_complaint_image(&self, record: &ComplaintImageRecord) -> Result<()> {
        let result = self.conn().execute(
            "INSERT INTO complaint_images
                 (complaint_id, student_address, image_data, content_type, admin_feedback)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                record.complaint_id,
                record.student_address.as_str(),
                record.image.data,
                record.image.content_type,
                record.admin_feedback,
            ],
        );

        match result {
            Ok(_) => {
                tracing::debug!(
                    complaint_id = %record.complaint_id,
                    size = record.image.data.len(),
                    "stored complaint image"
                );
                Ok(())
            }
            Err(rusqlite::Error::SqliteFailure(e, _)) if e.code == ErrorCode::ConstraintViolation => {
                Err(StoreError::Duplicate(format!(
                    "complaint image {}",
                    record.complaint_id
                )))
            }
            Err(e) => Err(e.into()),
        }
    }

    pub fn get_complaint_image(&self, complaint_id: &str) -> Result<ComplaintImageRecord> {
        self.conn()
            .query_row(
                &format!("{SELECT_COLUMNS} WHERE complaint_id = ?1"),
                params![complaint_id],
                row_to_record,
            )
            .optional()?
            .ok_or(StoreError::NotFound)
    }

    /// All image records, or only those of one student (address compared
    /// case-insensitively).
    pub fn list_complaint_images(
        &self,
        student: Option<&Address>,
    ) -> Result<Vec<ComplaintImageRecord>> {
        let records = match student {
            Some(addr) => {
                let mut stmt = self.conn().prepare(&format!(
                    "{SELECT_COLUMNS} WHERE lower(student_address) = lower(?1) ORDER BY complaint_id"
                ))?;
                let rows = stmt.query_map(params![addr.as_str()], row_to_record)?;
                rows.collect::<std::result::Result<Vec<_>, _>>()?
            }
            None => {
                let mut stmt = self
                    .conn()
                    .prepare(&format!("{SELECT_COLUMNS} ORDER BY complaint_id"))?;
                let rows = stmt.query_map([], row_to_record)?;
                rows.collect::<std::result::Result<Vec<_>, _>>()?
            }
        };
        Ok(records)
    }

    /// Overwrite the administrator feedback. Returns `false` when no record
    /// exists for the complaint.
    pub fn set_admin_feedback(&self, complaint_id: &str, feedback: &str) -> Result<bool> {
        let affected = self.conn().execute(
            "UPDATE complaint_images SET admin_feedback = ?1 WHERE complaint_id = ?2",
            params![feedback, complaint_id],
        )?;
        Ok(affected > 0)
    }
}

fn row_to_record(row: &rusqlite::Row<'_>) -> rusqlite::Result<ComplaintImageRecord> {
    let complaint_id: String = row.get(0)?;
    let address_str: String = row.get(1)?;
    let data: Vec<u8> = row.get(2)?;
    let content_type: String = row.get(3)?;
    let admin_feedback: String = row.get(4)?;

    let student_address = Address::parse(&address_str).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(1, rusqlite::types::Type::Text, Box::new(e))
    })?;

    Ok(ComplaintImageRecord {
        complaint_id,
        student_address,
        image: ImagePayload { data, content_type },
        admin_feedback,
    })
}
