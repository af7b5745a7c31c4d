//! The complaint record as read back from the contract.
//!
//! The contract returns each complaint as a positional tuple
//! `[id, submitter, image, text, blockName, floorNo, roomNo, category, status]`.
//! [`Complaint::from_tuple`] is the only place that knows those positions;
//! everything downstream works with named fields.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{DecodeError, SharedError};
use crate::types::{Address, ComplaintId};

/// Tuple field names in contract order.
pub const TUPLE_FIELDS: [&str; 9] = [
    "id",
    "submitter",
    "image",
    "text",
    "blockName",
    "floorNo",
    "roomNo",
    "category",
    "status",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Water,
    Electricity,
    Cleanliness,
    Internet,
    Other,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Water,
        Category::Electricity,
        Category::Cleanliness,
        Category::Internet,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Water => "Water",
            Category::Electricity => "Electricity",
            Category::Cleanliness => "Cleanliness",
            Category::Internet => "Internet",
            Category::Other => "Other",
        }
    }

    /// Case-insensitive lookup by name.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = SharedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| SharedError::UnknownCategory(s.to_string()))
    }
}

/// Complaint status as reported by the contract.
///
/// Codes outside 0..=2 are kept verbatim in `Unknown`: what the contract
/// does on reopen is its own business and is not interpreted here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "u64", into = "u64")]
pub enum ComplaintStatus {
    Pending,
    InProgress,
    Completed,
    Unknown(u64),
}

impl ComplaintStatus {
    pub fn from_code(code: u64) -> Self {
        match code {
            0 => Self::Pending,
            1 => Self::InProgress,
            2 => Self::Completed,
            other => Self::Unknown(other),
        }
    }

    pub fn code(&self) -> u64 {
        match self {
            Self::Pending => 0,
            Self::InProgress => 1,
            Self::Completed => 2,
            Self::Unknown(code) => *code,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::InProgress => "InProgress",
            Self::Completed => "Completed",
            Self::Unknown(_) => "Unknown",
        }
    }

    /// Only completed complaints can be reviewed.
    pub fn is_reviewable(&self) -> bool {
        matches!(self, Self::Completed)
    }
}

impl From<u64> for ComplaintStatus {
    fn from(code: u64) -> Self {
        Self::from_code(code)
    }
}

impl From<ComplaintStatus> for u64 {
    fn from(status: ComplaintStatus) -> Self {
        status.code()
    }
}

impl fmt::Display for ComplaintStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Complaint {
    pub id: ComplaintId,
    pub submitter: Address,
    pub image: Option<String>,
    pub text: String,
    pub block_name: String,
    pub floor_no: u64,
    pub room_no: Option<String>,
    /// Category text as stored on chain. The form only submits
    /// [`Category`] names, but other writers of the contract may not.
    pub category: String,
    pub status: ComplaintStatus,
    /// Present only when the contract exposes review feedback.
    pub feedback: Option<String>,
}

impl Complaint {
    /// Decode one contract tuple.
    ///
    /// Integers may arrive as JSON numbers or as decimal / `0x` strings
    /// (big integers are commonly serialised as strings). Text fields are
    /// kept as written; only empty image, room and feedback become `None`.
    /// An optional tenth element is read as review feedback.
    pub fn from_tuple(value: &Value) -> Result<Self, DecodeError> {
        let fields = value
            .as_array()
            .ok_or_else(|| DecodeError::NotATuple(json_kind(value).to_string()))?;

        if fields.len() < TUPLE_FIELDS.len() {
            return Err(DecodeError::Arity {
                expected: TUPLE_FIELDS.len(),
                got: fields.len(),
            });
        }

        let id = uint_at(fields, 0)?;
        let submitter =
            Address::parse(str_at(fields, 1)?).map_err(|e| field_error(1, e.to_string()))?;
        let floor_no = uint_at(fields, 5)?;

        Ok(Self {
            id,
            submitter,
            image: non_empty(str_at(fields, 2)?),
            text: str_at(fields, 3)?.to_string(),
            block_name: str_at(fields, 4)?.to_string(),
            floor_no,
            room_no: non_empty(str_at(fields, 6)?),
            category: str_at(fields, 7)?.to_string(),
            status: ComplaintStatus::from_code(uint_at(fields, 8)?),
            feedback: fields.get(9).and_then(Value::as_str).and_then(non_empty),
        })
    }

    /// Decode the full `getAllComplaints()` result.
    ///
    /// Tuples are decoded independently: one that fails lands in
    /// [`ComplaintSet::rejected`] and the rest are still returned. Only a
    /// result that is not a list at all is an error.
    pub fn decode_all(value: &Value) -> Result<ComplaintSet, DecodeError> {
        let items = value
            .as_array()
            .ok_or_else(|| DecodeError::NotATuple(json_kind(value).to_string()))?;

        let mut set = ComplaintSet::default();
        for (index, item) in items.iter().enumerate() {
            match Self::from_tuple(item) {
                Ok(complaint) => set.complaints.push(complaint),
                Err(e) => set.rejected.push((index, e)),
            }
        }
        Ok(set)
    }

    /// The recognised category, if the stored text names one.
    pub fn category_kind(&self) -> Option<Category> {
        Category::parse(&self.category)
    }

    pub fn room_display(&self) -> &str {
        self.room_no.as_deref().unwrap_or("-")
    }
}

/// Outcome of [`Complaint::decode_all`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComplaintSet {
    pub complaints: Vec<Complaint>,
    /// Position in the returned list and why the tuple was not decoded.
    pub rejected: Vec<(usize, DecodeError)>,
}

fn field_error(index: usize, reason: String) -> DecodeError {
    DecodeError::Field {
        index,
        name: TUPLE_FIELDS[index],
        reason,
    }
}

fn str_at(fields: &[Value], index: usize) -> Result<&str, DecodeError> {
    match &fields[index] {
        Value::String(s) => Ok(s),
        other => Err(field_error(
            index,
            format!("expected string, got {}", json_kind(other)),
        )),
    }
}

fn uint_at(fields: &[Value], index: usize) -> Result<u64, DecodeError> {
    match &fields[index] {
        Value::Number(n) => n
            .as_u64()
            .ok_or_else(|| field_error(index, format!("not an unsigned integer: {n}"))),
        Value::String(s) => {
            let s = s.trim();
            let parsed = match s.strip_prefix("0x") {
                Some(hex) => u64::from_str_radix(hex, 16),
                None => s.parse::<u64>(),
            };
            parsed.map_err(|e| field_error(index, format!("'{s}': {e}")))
        }
        other => Err(field_error(
            index,
            format!("expected integer, got {}", json_kind(other)),
        )),
    }
}

fn non_empty(s: &str) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
