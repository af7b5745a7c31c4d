//! HTTP client for the backend's auxiliary records: complaint images,
//! admin feedback and announcements.

use hostel_shared::constants::{ANNOUNCEMENTS_PATH, COMPLAINT_IMAGES_PATH};
use hostel_shared::records::{
    AdminFeedbackUpdate, Announcement, ComplaintImageRecord, NewAnnouncement, NewComplaintImage,
};
use hostel_shared::Address;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use crate::error::ClientError;

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Clone)]
pub struct RecordsClient {
    http: reqwest::Client,
    base_url: String,
    admin_token: Option<String>,
}

impl RecordsClient {
    pub fn new(base_url: impl Into<String>, admin_token: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            admin_token,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn admin(&self, request: reqwest::RequestBuilder) -> Result<reqwest::RequestBuilder, ClientError> {
        let token = self
            .admin_token
            .as_deref()
            .ok_or_else(|| ClientError::NotAuthorized("no admin token configured".into()))?;
        Ok(request.bearer_auth(token))
    }

    pub async fn upload_image(&self, new: &NewComplaintImage) -> Result<ComplaintImageRecord, ClientError> {
        debug!(complaint_id = %new.complaint_id, bytes = new.image.data.len(), "uploading complaint image");
        let resp = self
            .http
            .post(self.url(COMPLAINT_IMAGES_PATH))
            .json(new)
            .send()
            .await?;
        parse(resp).await
    }

    pub async fn get_image(&self, complaint_id: &str) -> Result<ComplaintImageRecord, ClientError> {
        let resp = self
            .http
            .get(self.url(&format!("{COMPLAINT_IMAGES_PATH}/{complaint_id}")))
            .send()
            .await?;
        parse(resp).await
    }

    /// One student's records, or every record (admin token required).
    pub async fn list_images(&self, student: Option<&Address>) -> Result<Vec<ComplaintImageRecord>, ClientError> {
        let request = self.http.get(self.url(COMPLAINT_IMAGES_PATH));
        let request = match student {
            Some(student) => request.query(&[("student", student.as_str())]),
            None => self.admin(request)?,
        };
        parse(request.send().await?).await
    }

    pub async fn set_admin_feedback(
        &self,
        complaint_id: &str,
        feedback: &str,
    ) -> Result<ComplaintImageRecord, ClientError> {
        let request = self
            .http
            .put(self.url(&format!("{COMPLAINT_IMAGES_PATH}/{complaint_id}/feedback")))
            .json(&AdminFeedbackUpdate {
                admin_feedback: feedback.to_string(),
            });
        parse(self.admin(request)?.send().await?).await
    }

    pub async fn list_announcements(&self) -> Result<Vec<Announcement>, ClientError> {
        let resp = self.http.get(self.url(ANNOUNCEMENTS_PATH)).send().await?;
        parse(resp).await
    }

    pub async fn post_announcement(&self, new: &NewAnnouncement) -> Result<Announcement, ClientError> {
        let request = self.http.post(self.url(ANNOUNCEMENTS_PATH)).json(new);
        parse(self.admin(request)?.send().await?).await
    }
}

async fn parse<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, ClientError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp.json().await?);
    }

    let raw = resp.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&raw)
        .map(|b| b.error)
        .unwrap_or(raw);
    Err(ClientError::Backend {
        status: status.as_u16(),
        message,
    })
}
