//! Dashboard projection of the complaint set.
//!
//! Everything here is a pure function of the fetched list, the active
//! account and the query; the visible list is recomputed on every call.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use hostel_shared::{Address, Complaint};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    #[default]
    Id,
    Status,
    Text,
    BlockName,
    RoomNo,
    Category,
}

impl SortField {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::Id => "id",
            SortField::Status => "status",
            SortField::Text => "text",
            SortField::BlockName => "block",
            SortField::RoomNo => "room",
            SortField::Category => "category",
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortField {
    type Err = String;

    /// Named fields, plus the tuple positions older dashboards sorted by.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "id" => Ok(SortField::Id),
            "status" => Ok(SortField::Status),
            "text" | "3" => Ok(SortField::Text),
            "block" | "blockname" | "4" => Ok(SortField::BlockName),
            "room" | "roomno" | "6" => Ok(SortField::RoomNo),
            "category" | "7" => Ok(SortField::Category),
            other => Err(format!(
                "unknown sort field '{other}' (expected id, status, text, block, room or category)"
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn toggle(self) -> Self {
        match self {
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::Asc,
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComplaintQuery {
    pub search: String,
    pub sort_field: SortField,
    pub sort_order: SortOrder,
}

/// Complaints submitted by `account`.
pub fn filter_owned(complaints: &[Complaint], account: &Address) -> Vec<Complaint> {
    complaints
        .iter()
        .filter(|c| c.submitter == *account)
        .cloned()
        .collect()
}

/// Case-insensitive substring match on text, category or room. The query is
/// used as typed, surrounding whitespace included.
pub fn matches_search(complaint: &Complaint, query: &str) -> bool {
    let needle = query.to_lowercase();
    if needle.is_empty() {
        return true;
    }
    complaint.text.to_lowercase().contains(&needle)
        || complaint.category.to_lowercase().contains(&needle)
        || complaint
            .room_no
            .as_deref()
            .is_some_and(|room| room.to_lowercase().contains(&needle))
}

fn compare(a: &Complaint, b: &Complaint, field: SortField) -> Ordering {
    let text = |s: &str| s.to_lowercase();
    match field {
        SortField::Id => a.id.cmp(&b.id),
        SortField::Status => a.status.code().cmp(&b.status.code()),
        SortField::Text => text(&a.text).cmp(&text(&b.text)),
        SortField::BlockName => text(&a.block_name).cmp(&text(&b.block_name)),
        SortField::RoomNo => {
            let room = |c: &Complaint| text(c.room_no.as_deref().unwrap_or_default());
            room(a).cmp(&room(b))
        }
        SortField::Category => text(&a.category).cmp(&text(&b.category)),
    }
}

/// Stable sort; descending reverses the comparator, so ties keep their
/// original relative order either way.
pub fn sort_complaints(list: &mut [Complaint], field: SortField, order: SortOrder) {
    list.sort_by(|a, b| match order {
        SortOrder::Asc => compare(a, b, field),
        SortOrder::Desc => compare(b, a, field),
    });
}

/// Owned by `account`, matching the search, sorted. Nothing without an account.
pub fn derive_visible(
    complaints: &[Complaint],
    account: Option<&Address>,
    query: &ComplaintQuery,
) -> Vec<Complaint> {
    let Some(account) = account else {
        return Vec::new();
    };

    let mut visible: Vec<Complaint> = filter_owned(complaints, account)
        .into_iter()
        .filter(|c| matches_search(c, &query.search))
        .collect();
    sort_complaints(&mut visible, query.sort_field, query.sort_order);
    visible
}
