// region:    --- Imports
use crate::booking::model::Booking;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// endregion: --- Imports

/// Catalog item. Owned by exactly one user; optionally links back to the
/// item request that prompted its creation.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Item {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub available: bool,
    pub owner_id: i64,
    pub request_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct NewItem {
    pub name: String,
    pub description: String,
    pub available: bool,
    pub request_id: Option<i64>,
}

/// Owner-only partial update; blank name/description are ignored.
#[derive(Debug, Default, Deserialize)]
pub struct ItemPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub available: Option<bool>,
}

/// Item decorated with its most recent past and nearest future APPROVED
/// bookings, as seen by the owner.
#[derive(Debug, Serialize)]
pub struct ItemWithSchedule {
    #[serde(flatten)]
    pub item: Item,
    pub last_booking: Option<Booking>,
    pub next_booking: Option<Booking>,
}

/// Single-item read view: schedule decoration (owner only) plus the
/// comment trail.
#[derive(Debug, Serialize)]
pub struct ItemDetails {
    #[serde(flatten)]
    pub item: Item,
    pub last_booking: Option<Booking>,
    pub next_booking: Option<Booking>,
    pub comments: Vec<Comment>,
}

/// One review per (author, item) pair, written after a completed approved
/// rental. `author_name` is joined in for display.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Comment {
    pub id: i64,
    pub text: String,
    pub item_id: i64,
    pub author_id: i64,
    pub author_name: String,
    pub created: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct NewComment {
    pub text: String,
}
