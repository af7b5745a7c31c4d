use std::path::Path;

use hostel_shared::constants::MAX_IMAGE_SIZE;
use hostel_shared::records::{
    Announcement, ComplaintImageRecord, ImagePayload, NewAnnouncement, NewComplaintImage,
};
use hostel_shared::ComplaintId;
use tracing::info;

use crate::error::{ClientError, ValidationError};
use crate::state::AppState;

fn require_admin(state: &AppState) -> Result<(), ClientError> {
    match state.auth.role() {
        Some(role) if role.is_admin() => Ok(()),
        _ => Err(ClientError::NotAuthorized("admin role required".into())),
    }
}

/// Build an image payload from a file: known image extension, within the
/// size limit.
pub fn load_image(data: Vec<u8>, path: &Path) -> Result<ImagePayload, ValidationError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default();
    let content_type = ImagePayload::content_type_for_extension(ext)
        .ok_or_else(|| ValidationError::UnsupportedImage(path.display().to_string()))?;

    if data.len() > MAX_IMAGE_SIZE {
        return Err(ValidationError::ImageTooLarge {
            size: data.len(),
            max: MAX_IMAGE_SIZE,
        });
    }

    Ok(ImagePayload {
        data,
        content_type: content_type.to_string(),
    })
}

/// Upload a photo for one of the connected account's complaints.
pub async fn attach_image(
    state: &AppState,
    complaint_id: ComplaintId,
    path: &Path,
) -> Result<ComplaintImageRecord, ClientError> {
    let student = state.require_account()?;
    let data = tokio::fs::read(path).await?;
    let image = load_image(data, path)?;

    let record = state
        .records
        .upload_image(&NewComplaintImage {
            complaint_id: complaint_id.to_string(),
            student_address: student,
            image,
        })
        .await?;
    info!(complaint_id, bytes = record.image.data.len(), "complaint image attached");
    Ok(record)
}

/// Image records: every record for admins, the student's own otherwise.
pub async fn list_images(state: &AppState) -> Result<Vec<ComplaintImageRecord>, ClientError> {
    if require_admin(state).is_ok() {
        return state.records.list_images(None).await;
    }
    let student = state.require_account()?;
    state.records.list_images(Some(&student)).await
}

/// One complaint's image record. Students may only look at their own.
pub async fn show_image(
    state: &AppState,
    complaint_id: ComplaintId,
) -> Result<ComplaintImageRecord, ClientError> {
    let admin = require_admin(state).is_ok();
    let account = if admin { None } else { Some(state.require_account()?) };

    let record = state.records.get_image(&complaint_id.to_string()).await?;
    match account {
        Some(account) if record.student_address != account => Err(ClientError::NotAuthorized(
            format!("complaint #{complaint_id} belongs to another student"),
        )),
        _ => Ok(record),
    }
}

pub async fn set_admin_feedback(
    state: &AppState,
    complaint_id: ComplaintId,
    feedback: &str,
) -> Result<ComplaintImageRecord, ClientError> {
    require_admin(state)?;
    if feedback.trim().is_empty() {
        return Err(ValidationError::Required("Feedback").into());
    }
    state
        .records
        .set_admin_feedback(&complaint_id.to_string(), feedback.trim())
        .await
}

pub async fn post_announcement(
    state: &AppState,
    title: &str,
    body: &str,
) -> Result<Announcement, ClientError> {
    require_admin(state)?;
    if title.trim().is_empty() {
        return Err(ValidationError::Required("Title").into());
    }
    let author_id = state
        .auth
        .user
        .as_ref()
        .map(|u| u.id.clone())
        .unwrap_or_default();

    let announcement = state
        .records
        .post_announcement(&NewAnnouncement {
            title: title.trim().to_string(),
            body: body.trim().to_string(),
            author_id,
        })
        .await?;
    info!(id = %announcement.id, "announcement posted");
    Ok(announcement)
}

pub async fn list_announcements(state: &AppState) -> Result<Vec<Announcement>, ClientError> {
    state.records.list_announcements().await
}
