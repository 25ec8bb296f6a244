// region:    --- Imports
use crate::booking::model::BookingStatus;
use crate::database::DatabaseManager;
use crate::error::{AppError, AppResult};
use crate::item::model::{Comment, Item, ItemPatch, NewComment, NewItem};
use crate::item::queries::FIND_ITEM_BY_ID;
use crate::user::model::User;
use crate::user::queries::FIND_USER_BY_ID;
use chrono::{DateTime, Utc};
use tracing::info;

// endregion: --- Imports

// region:    --- SQL

const INSERT_ITEM: &str = r#"
    INSERT INTO items (name, description, available, owner_id, request_id)
    VALUES ($1, $2, $3, $4, $5)
    RETURNING id, name, description, available, owner_id, request_id
"#;

const FIND_REQUEST_ID: &str = "SELECT id FROM requests WHERE id = $1";

const LOCK_ITEM_BY_ID: &str = r#"
    SELECT id, name, description, available, owner_id, request_id
    FROM items
    WHERE id = $1
    FOR UPDATE
"#;

const UPDATE_ITEM: &str = r#"
    UPDATE items SET name = $2, description = $3, available = $4
    WHERE id = $1
    RETURNING id, name, description, available, owner_id, request_id
"#;

const FIND_COMMENT_BY_AUTHOR_AND_ITEM: &str =
    "SELECT id FROM comments WHERE author_id = $1 AND item_id = $2";

// At least one finished approved rental qualifies the author to comment.
const FIND_QUALIFYING_BOOKING: &str = r#"
    SELECT id FROM bookings
    WHERE item_id = $1 AND booker_id = $2 AND status = $3 AND end_date < $4
    LIMIT 1
"#;

const INSERT_COMMENT: &str = r#"
    WITH inserted AS (
        INSERT INTO comments (text, item_id, author_id, created)
        VALUES ($1, $2, $3, $4)
        RETURNING id, text, item_id, author_id, created
    )
    SELECT i.id, i.text, i.item_id, i.author_id, u.name AS author_name, i.created
    FROM inserted i
    JOIN users u ON u.id = i.author_id
"#;

// endregion: --- SQL

// region:    --- Commands

/// Lists an item for the caller. When `request_id` is set, the referenced
/// item request must exist; the new item then resolves that request.
pub async fn add_item(db: &DatabaseManager, owner_id: i64, new_item: NewItem) -> AppResult<Item> {
    info!(
        "{:<12} --> add item: owner={} name={:?}",
        "Item", owner_id, new_item.name
    );
    db.transaction(|tx| {
        Box::pin(async move {
            sqlx::query_as::<_, User>(FIND_USER_BY_ID)
                .bind(owner_id)
                .fetch_optional(&mut **tx)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("User {owner_id} not found.")))?;

            if let Some(request_id) = new_item.request_id {
                sqlx::query_scalar::<_, i64>(FIND_REQUEST_ID)
                    .bind(request_id)
                    .fetch_optional(&mut **tx)
                    .await?
                    .ok_or_else(|| {
                        AppError::NotFound(format!("Request {request_id} not found."))
                    })?;
            }

            let item = sqlx::query_as::<_, Item>(INSERT_ITEM)
                .bind(&new_item.name)
                .bind(&new_item.description)
                .bind(new_item.available)
                .bind(owner_id)
                .bind(new_item.request_id)
                .fetch_one(&mut **tx)
                .await?;
            Ok(item)
        })
    })
    .await
}

/// Owner-only partial update of name/description/availability. Non-owners
/// get the NotFound shape of an absent item.
pub async fn update_item(
    db: &DatabaseManager,
    caller_id: i64,
    item_id: i64,
    patch: ItemPatch,
) -> AppResult<Item> {
    info!("{:<12} --> update item: id={}", "Item", item_id);
    db.transaction(|tx| {
        Box::pin(async move {
            sqlx::query_as::<_, User>(FIND_USER_BY_ID)
                .bind(caller_id)
                .fetch_optional(&mut **tx)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("User {caller_id} not found.")))?;

            let item = sqlx::query_as::<_, Item>(LOCK_ITEM_BY_ID)
                .bind(item_id)
                .fetch_optional(&mut **tx)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("Item {item_id} not found.")))?;

            if item.owner_id != caller_id {
                return Err(AppError::NotFound(format!("Item {item_id} not found.")));
            }

            let name = match patch.name {
                Some(name) if !name.trim().is_empty() => name,
                _ => item.name,
            };
            let description = match patch.description {
                Some(description) if !description.trim().is_empty() => description,
                _ => item.description,
            };
            let available = patch.available.unwrap_or(item.available);

            let updated = sqlx::query_as::<_, Item>(UPDATE_ITEM)
                .bind(item_id)
                .bind(&name)
                .bind(&description)
                .bind(available)
                .fetch_one(&mut **tx)
                .await?;
            Ok(updated)
        })
    })
    .await
}

/// Adds the author's single comment on an item. Requires a prior APPROVED
/// booking of the item that ended before `now`; a second comment by the
/// same author is rejected.
pub async fn add_comment(
    db: &DatabaseManager,
    author_id: i64,
    item_id: i64,
    new_comment: NewComment,
    now: DateTime<Utc>,
) -> AppResult<Comment> {
    info!(
        "{:<12} --> add comment: author={} item={}",
        "Item", author_id, item_id
    );
    db.transaction(|tx| {
        Box::pin(async move {
            sqlx::query_as::<_, User>(FIND_USER_BY_ID)
                .bind(author_id)
                .fetch_optional(&mut **tx)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("User {author_id} not found.")))?;

            sqlx::query_as::<_, Item>(FIND_ITEM_BY_ID)
                .bind(item_id)
                .fetch_optional(&mut **tx)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("Item {item_id} not found.")))?;

            let existing = sqlx::query_scalar::<_, i64>(FIND_COMMENT_BY_AUTHOR_AND_ITEM)
                .bind(author_id)
                .bind(item_id)
                .fetch_optional(&mut **tx)
                .await?;
            if existing.is_some() {
                return Err(AppError::BadRequest(
                    "You already commented this item.".to_string(),
                ));
            }

            let qualifying = sqlx::query_scalar::<_, i64>(FIND_QUALIFYING_BOOKING)
                .bind(item_id)
                .bind(author_id)
                .bind(BookingStatus::Approved)
                .bind(now)
                .fetch_optional(&mut **tx)
                .await?;
            if qualifying.is_none() {
                return Err(AppError::BadRequest("You can't comment.".to_string()));
            }

            let comment = sqlx::query_as::<_, Comment>(INSERT_COMMENT)
                .bind(&new_comment.text)
                .bind(item_id)
                .bind(author_id)
                .bind(now)
                .fetch_one(&mut **tx)
                .await?;
            Ok(comment)
        })
    })
    .await
}

// endregion: --- Commands
