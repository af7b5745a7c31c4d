//! Auxiliary records exchanged between the client and the backend.
//!
//! These live outside the contract: one image record per complaint and
//! free-standing announcements.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::Address;

/// Binary image with its MIME type. Travels as base64 in JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImagePayload {
    #[serde(with = "base64_bytes")]
    pub data: Vec<u8>,
    pub content_type: String,
}

impl ImagePayload {
    pub fn is_image(&self) -> bool {
        self.content_type
            .trim()
            .to_ascii_lowercase()
            .starts_with("image/")
    }

    /// Guess a MIME type from a file extension.
    pub fn content_type_for_extension(ext: &str) -> Option<&'static str> {
        match ext.to_ascii_lowercase().as_str() {
            "png" => Some("image/png"),
            "jpg" | "jpeg" => Some("image/jpeg"),
            "gif" => Some("image/gif"),
            "webp" => Some("image/webp"),
            _ => None,
        }
    }
}

/// Request body for creating a complaint image record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewComplaintImage {
    pub complaint_id: String,
    pub student_address: Address,
    pub image: ImagePayload,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplaintImageRecord {
    pub complaint_id: String,
    pub student_address: Address,
    pub image: ImagePayload,
    #[serde(default)]
    pub admin_feedback: String,
}

impl From<NewComplaintImage> for ComplaintImageRecord {
    fn from(new: NewComplaintImage) -> Self {
        Self {
            complaint_id: new.complaint_id,
            student_address: new.student_address,
            image: new.image,
            admin_feedback: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminFeedbackUpdate {
    pub admin_feedback: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAnnouncement {
    pub title: String,
    pub body: String,
    pub author_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Announcement {
    pub id: Uuid,
    pub title: String,
    pub body: String,
    /// Soft reference to a user record; never checked.
    pub author_id: String,
    pub created_at: DateTime<Utc>,
}

impl Announcement {
    pub fn create(new: NewAnnouncement) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: new.title,
            body: new.body,
            author_id: new.author_id,
            created_at: Utc::now(),
        }
    }
}

mod base64_bytes {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD
            .decode(encoded.as_bytes())
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_payload_json_is_base64() {
        let payload = ImagePayload {
            data: vec![0x89, b'P', b'N', b'G'],
            content_type: "image/png".into(),
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["data"], "iVBORw==");
        assert_eq!(json["contentType"], "image/png");

        let back: ImagePayload = serde_json::from_value(json).unwrap();
        assert_eq!(back.data, payload.data);
    }

    #[test]
    fn test_is_image() {
        let mut payload = ImagePayload {
            data: vec![1],
            content_type: "IMAGE/JPEG".into(),
        };
        assert!(payload.is_image());
        payload.content_type = "application/pdf".into();
        assert!(!payload.is_image());
    }

    #[test]
    fn test_new_record_starts_without_feedback() {
        let record = ComplaintImageRecord::from(NewComplaintImage {
            complaint_id: "3".into(),
            student_address: Address::parse("0x1111111111111111111111111111111111111111").unwrap(),
            image: ImagePayload {
                data: vec![1, 2, 3],
                content_type: "image/png".into(),
            },
        });
        assert!(record.admin_feedback.is_empty());
    }

    #[test]
    fn test_announcement_create_stamps_time() {
        let before = Utc::now();
        let ann = Announcement::create(NewAnnouncement {
            title: "Water outage".into(),
            body: "Block B, 10am-2pm".into(),
            author_id: "admin-1".into(),
        });
        assert!(ann.created_at >= before);
        assert_eq!(ann.title, "Water outage");
    }
}
