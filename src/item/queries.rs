// region:    --- Imports
use crate::booking::model::{Booking, BookingStatus};
use crate::database::DatabaseManager;
use crate::error::{AppError, AppResult};
use crate::item::model::{Comment, Item, ItemDetails, ItemWithSchedule};
use crate::item::schedule::split_schedule;
use crate::user::queries::find_user;
use chrono::{DateTime, Utc};
use tracing::info;

// endregion: --- Imports

// region:    --- SQL

pub const FIND_ITEM_BY_ID: &str = r#"
    SELECT id, name, description, available, owner_id, request_id
    FROM items
    WHERE id = $1
"#;

const FIND_ITEMS_BY_OWNER: &str = r#"
    SELECT id, name, description, available, owner_id, request_id
    FROM items
    WHERE owner_id = $1
    ORDER BY id ASC
    LIMIT $2 OFFSET $3
"#;

const SEARCH_ITEMS: &str = r#"
    SELECT id, name, description, available, owner_id, request_id
    FROM items
    WHERE available
      AND (name ILIKE '%' || $1 || '%' OR description ILIKE '%' || $1 || '%')
    ORDER BY id ASC
    LIMIT $2 OFFSET $3
"#;

pub const FIND_ITEMS_BY_REQUEST: &str = r#"
    SELECT id, name, description, available, owner_id, request_id
    FROM items
    WHERE request_id = $1
    ORDER BY id ASC
"#;

// APPROVED bookings of one item, oldest start first, ready for the
// last/next split.
const FIND_APPROVED_BOOKINGS_FOR_ITEM: &str = r#"
    SELECT id, start_date, end_date, item_id, booker_id, status
    FROM bookings
    WHERE item_id = $1 AND status = $2
    ORDER BY start_date ASC
"#;

const FIND_COMMENTS_FOR_ITEM: &str = r#"
    SELECT c.id, c.text, c.item_id, c.author_id, u.name AS author_name, c.created
    FROM comments c
    JOIN users u ON u.id = c.author_id
    WHERE c.item_id = $1
    ORDER BY c.created ASC
"#;

// endregion: --- SQL

// region:    --- Queries

/// Fetches an item or fails with NotFound.
pub async fn find_item(db: &DatabaseManager, item_id: i64) -> AppResult<Item> {
    sqlx::query_as::<_, Item>(FIND_ITEM_BY_ID)
        .bind(item_id)
        .fetch_optional(db.pool())
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Item {item_id} not found.")))
}

/// The caller's own items, each decorated with its last and next APPROVED
/// booking relative to `now`.
pub async fn get_items_by_owner(
    db: &DatabaseManager,
    owner_id: i64,
    now: DateTime<Utc>,
    limit: i64,
    offset: i64,
) -> AppResult<Vec<ItemWithSchedule>> {
    info!("{:<12} --> list items: owner={}", "Query", owner_id);
    find_user(db, owner_id).await?;

    let items = sqlx::query_as::<_, Item>(FIND_ITEMS_BY_OWNER)
        .bind(owner_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(db.pool())
        .await?;

    let mut decorated = Vec::with_capacity(items.len());
    for item in items {
        let bookings = approved_bookings(db, item.id).await?;
        let (last_booking, next_booking) = split_schedule(&bookings, now);
        decorated.push(ItemWithSchedule {
            item,
            last_booking,
            next_booking,
        });
    }
    Ok(decorated)
}

/// Single-item read view for any registered user. The schedule decoration
/// is only computed when the caller owns the item.
pub async fn get_item_details(
    db: &DatabaseManager,
    caller_id: i64,
    item_id: i64,
    now: DateTime<Utc>,
) -> AppResult<ItemDetails> {
    info!(
        "{:<12} --> get item: id={} caller={}",
        "Query", item_id, caller_id
    );
    find_user(db, caller_id).await?;
    let item = find_item(db, item_id).await?;

    let (last_booking, next_booking) = if item.owner_id == caller_id {
        let bookings = approved_bookings(db, item_id).await?;
        split_schedule(&bookings, now)
    } else {
        (None, None)
    };

    let comments = sqlx::query_as::<_, Comment>(FIND_COMMENTS_FOR_ITEM)
        .bind(item_id)
        .fetch_all(db.pool())
        .await?;

    Ok(ItemDetails {
        item,
        last_booking,
        next_booking,
        comments,
    })
}

/// Case-insensitive substring search over name and description, available
/// items only. A blank query returns nothing rather than the whole catalog.
pub async fn search_items(
    db: &DatabaseManager,
    caller_id: i64,
    text: &str,
    limit: i64,
    offset: i64,
) -> AppResult<Vec<Item>> {
    info!("{:<12} --> search items: text={:?}", "Query", text);
    find_user(db, caller_id).await?;

    let text = text.trim();
    if text.is_empty() {
        return Ok(Vec::new());
    }

    let items = sqlx::query_as::<_, Item>(SEARCH_ITEMS)
        .bind(text)
        .bind(limit)
        .bind(offset)
        .fetch_all(db.pool())
        .await?;
    Ok(items)
}

async fn approved_bookings(db: &DatabaseManager, item_id: i64) -> AppResult<Vec<Booking>> {
    let bookings = sqlx::query_as::<_, Booking>(FIND_APPROVED_BOOKINGS_FOR_ITEM)
        .bind(item_id)
        .bind(BookingStatus::Approved)
        .fetch_all(db.pool())
        .await?;
    Ok(bookings)
}

// endregion: --- Queries
