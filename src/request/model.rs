// region:    --- Imports
use crate::item::model::Item;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// endregion: --- Imports

/// A user's open ask for an item that does not yet exist in the catalog.
/// Immutable once created; resolved by items whose `request_id` points back
/// here.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ItemRequest {
    pub id: i64,
    pub description: String,
    pub requester_id: i64,
    pub created: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct NewRequest {
    pub description: Option<String>,
}

/// Read view: the request joined with the items created to fulfill it.
#[derive(Debug, Serialize)]
pub struct RequestWithItems {
    #[serde(flatten)]
    pub request: ItemRequest,
    pub items: Vec<Item>,
}
