//! User input for the two write operations, validated before any call.

use hostel_shared::{Category, ComplaintId};
use serde_json::{json, Value};

use crate::error::ValidationError;

/// Raw complaint form as typed by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComplaintForm {
    pub image: String,
    pub text: String,
    pub block_name: String,
    pub floor_no: String,
    pub room_no: String,
    pub category: String,
}

/// A complaint that passed validation, ready for `raiseComplaint`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RaiseComplaint {
    pub image: String,
    pub text: String,
    pub block_name: String,
    pub floor_no: u64,
    pub room_no: String,
    pub category: Category,
}

impl ComplaintForm {
    /// Image and room are optional and travel as empty strings when blank.
    pub fn validate(&self) -> Result<RaiseComplaint, ValidationError> {
        let category = required(&self.category, "Category")?;
        let text = required(&self.text, "Complaint text")?;
        let block_name = required(&self.block_name, "Block name")?;
        let floor_raw = required(&self.floor_no, "Floor No")?;

        let floor_no = floor_raw
            .parse::<u64>()
            .map_err(|_| ValidationError::FloorNotNumeric(floor_raw.to_string()))?;
        let category = Category::parse(category)
            .ok_or_else(|| ValidationError::UnknownCategory(category.to_string()))?;

        Ok(RaiseComplaint {
            image: self.image.trim().to_string(),
            text: text.to_string(),
            block_name: block_name.to_string(),
            floor_no,
            room_no: self.room_no.trim().to_string(),
            category,
        })
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

fn required<'a>(value: &'a str, field: &'static str) -> Result<&'a str, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Required(field));
    }
    Ok(trimmed)
}

impl RaiseComplaint {
    /// Arguments in `raiseComplaint(image, text, blockName, floorNo, roomNo, category)` order.
    pub fn to_args(&self) -> Vec<Value> {
        vec![
            json!(self.image),
            json!(self.text),
            json!(self.block_name),
            json!(self.floor_no),
            json!(self.room_no),
            json!(self.category.as_str()),
        ]
    }
}

/// A satisfaction review of a completed complaint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Review {
    complaint_id: ComplaintId,
    satisfied: bool,
    feedback: String,
}

impl Review {
    /// An unsatisfied review must explain itself. A satisfied review never
    /// carries feedback.
    pub fn new(
        complaint_id: ComplaintId,
        satisfied: bool,
        feedback: Option<&str>,
    ) -> Result<Self, ValidationError> {
        let feedback = if satisfied {
            String::new()
        } else {
            match feedback.map(str::trim) {
                Some(text) if !text.is_empty() => text.to_string(),
                _ => return Err(ValidationError::FeedbackRequired),
            }
        };

        Ok(Self {
            complaint_id,
            satisfied,
            feedback,
        })
    }

    pub fn complaint_id(&self) -> ComplaintId {
        self.complaint_id
    }

    pub fn satisfied(&self) -> bool {
        self.satisfied
    }

    pub fn feedback(&self) -> &str {
        &self.feedback
    }

    /// Arguments in `submitReview(id, satisfied, feedback)` order.
    pub fn to_args(&self) -> Vec<Value> {
        vec![
            json!(self.complaint_id),
            json!(self.satisfied),
            json!(self.feedback),
        ]
    }
}
