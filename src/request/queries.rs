// region:    --- Imports
use crate::database::DatabaseManager;
use crate::error::{AppError, AppResult};
use crate::item::model::Item;
use crate::item::queries::FIND_ITEMS_BY_REQUEST;
use crate::request::model::{ItemRequest, RequestWithItems};
use crate::user::queries::find_user;
use tracing::info;

// endregion: --- Imports

// region:    --- SQL

const FIND_REQUEST_BY_ID: &str = r#"
    SELECT id, description, requester_id, created
    FROM requests
    WHERE id = $1
"#;

const FIND_REQUESTS_BY_REQUESTER: &str = r#"
    SELECT id, description, requester_id, created
    FROM requests
    WHERE requester_id = $1
    ORDER BY created ASC
"#;

const FIND_OTHERS_REQUESTS: &str = r#"
    SELECT id, description, requester_id, created
    FROM requests
    WHERE requester_id <> $1
    ORDER BY created DESC
    LIMIT $2 OFFSET $3
"#;

// endregion: --- SQL

// region:    --- Queries

/// The caller's own requests, oldest first, each with the items offered
/// against it.
pub async fn get_own_requests(
    db: &DatabaseManager,
    user_id: i64,
) -> AppResult<Vec<RequestWithItems>> {
    info!("{:<12} --> list own requests: user={}", "Query", user_id);
    find_user(db, user_id).await?;
    let requests = sqlx::query_as::<_, ItemRequest>(FIND_REQUESTS_BY_REQUESTER)
        .bind(user_id)
        .fetch_all(db.pool())
        .await?;
    join_items(db, requests).await
}

/// Other users' requests, newest first, paginated.
pub async fn get_others_requests(
    db: &DatabaseManager,
    user_id: i64,
    limit: i64,
    offset: i64,
) -> AppResult<Vec<RequestWithItems>> {
    info!("{:<12} --> list others requests: user={}", "Query", user_id);
    find_user(db, user_id).await?;
    let requests = sqlx::query_as::<_, ItemRequest>(FIND_OTHERS_REQUESTS)
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(db.pool())
        .await?;
    join_items(db, requests).await
}

pub async fn find_request(
    db: &DatabaseManager,
    user_id: i64,
    request_id: i64,
) -> AppResult<RequestWithItems> {
    info!("{:<12} --> get request: id={}", "Query", request_id);
    find_user(db, user_id).await?;
    let request = sqlx::query_as::<_, ItemRequest>(FIND_REQUEST_BY_ID)
        .bind(request_id)
        .fetch_optional(db.pool())
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Request {request_id} not found.")))?;
    let items = items_for_request(db, request.id).await?;
    Ok(RequestWithItems { request, items })
}

async fn join_items(
    db: &DatabaseManager,
    requests: Vec<ItemRequest>,
) -> AppResult<Vec<RequestWithItems>> {
    let mut out = Vec::with_capacity(requests.len());
    for request in requests {
        let items = items_for_request(db, request.id).await?;
        out.push(RequestWithItems { request, items });
    }
    Ok(out)
}

async fn items_for_request(db: &DatabaseManager, request_id: i64) -> AppResult<Vec<Item>> {
    let items = sqlx::query_as::<_, Item>(FIND_ITEMS_BY_REQUEST)
        .bind(request_id)
        .fetch_all(db.pool())
        .await?;
    Ok(items)
}

// endregion: --- Queries
