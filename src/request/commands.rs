// region:    --- Imports
use crate::database::DatabaseManager;
use crate::error::{AppError, AppResult};
use crate::request::model::{ItemRequest, NewRequest};
use crate::user::queries::find_user;
use chrono::{DateTime, Utc};
use tracing::info;

// endregion: --- Imports

const INSERT_REQUEST: &str = r#"
    INSERT INTO requests (description, requester_id, created)
    VALUES ($1, $2, $3)
    RETURNING id, description, requester_id, created
"#;

/// Posts a new item request, stamped with the request-time clock reading.
pub async fn add_request(
    db: &DatabaseManager,
    requester_id: i64,
    new_request: NewRequest,
    now: DateTime<Utc>,
) -> AppResult<ItemRequest> {
    info!("{:<12} --> add request: user={}", "Request", requester_id);
    let description = match new_request.description {
        Some(description) if !description.trim().is_empty() => description,
        _ => return Err(AppError::BadRequest("Wrong description.".to_string())),
    };
    find_user(db, requester_id).await?;

    let request = sqlx::query_as::<_, ItemRequest>(INSERT_REQUEST)
        .bind(&description)
        .bind(requester_id)
        .bind(now)
        .fetch_one(db.pool())
        .await?;
    Ok(request)
}
