// region:    --- Imports
use crate::booking::model::{Booking, NewBooking, StateFilter};
use crate::booking::{commands as booking_commands, queries as booking_queries};
use crate::database::DatabaseManager;
use crate::error::{AppError, AppResult};
use crate::identity::SharerId;
use crate::item::model::{Comment, Item, ItemDetails, ItemPatch, ItemWithSchedule, NewComment, NewItem};
use crate::item::{commands as item_commands, queries as item_queries};
use crate::request::model::{ItemRequest, NewRequest, RequestWithItems};
use crate::request::{commands as request_commands, queries as request_queries};
use crate::user::model::{NewUser, User, UserPatch};
use crate::user::{commands as user_commands, queries as user_queries};
use axum::extract::{FromRequestParts, Path, Query, State};
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::sync::Arc;

// endregion: --- Imports

// region:    --- Query parameters

/// `Query` with the rejection mapped into `AppError`, so a missing or
/// malformed query string renders the same `{"error": ...}` body as every
/// other failure.
pub struct AppQuery<T>(pub T);

#[axum::async_trait]
impl<S, T> FromRequestParts<S> for AppQuery<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
        Ok(AppQuery(value))
    }
}

fn default_size() -> i64 {
    10
}

fn default_state() -> String {
    "ALL".to_string()
}

#[derive(Debug, Deserialize)]
pub struct PageParams {
    #[serde(default)]
    pub from: i64,
    #[serde(default = "default_size")]
    pub size: i64,
}

#[derive(Debug, Deserialize)]
pub struct BookingListParams {
    #[serde(default = "default_state")]
    pub state: String,
    #[serde(default)]
    pub from: i64,
    #[serde(default = "default_size")]
    pub size: i64,
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub from: i64,
    #[serde(default = "default_size")]
    pub size: i64,
}

#[derive(Debug, Deserialize)]
pub struct ApproveParams {
    pub approved: bool,
}

/// Turns `from`/`size` into a (limit, offset) pair. `from` is a plain
/// zero-based element offset handed straight to SQL OFFSET.
fn page(from: i64, size: i64) -> AppResult<(i64, i64)> {
    if from < 0 || size <= 0 {
        return Err(AppError::BadRequest(
            "Invalid pagination parameters.".to_string(),
        ));
    }
    Ok((size, from))
}

// endregion: --- Query parameters

// region:    --- User handlers

pub async fn get_users(State(db): State<Arc<DatabaseManager>>) -> AppResult<Json<Vec<User>>> {
    user_queries::get_users(&db).await.map(Json)
}

pub async fn get_user(
    State(db): State<Arc<DatabaseManager>>,
    Path(user_id): Path<i64>,
) -> AppResult<Json<User>> {
    user_queries::find_user(&db, user_id).await.map(Json)
}

pub async fn create_user(
    State(db): State<Arc<DatabaseManager>>,
    Json(new_user): Json<NewUser>,
) -> AppResult<Json<User>> {
    user_commands::add_user(&db, new_user).await.map(Json)
}

pub async fn update_user(
    State(db): State<Arc<DatabaseManager>>,
    Path(user_id): Path<i64>,
    Json(patch): Json<UserPatch>,
) -> AppResult<Json<User>> {
    user_commands::update_user(&db, user_id, patch).await.map(Json)
}

pub async fn delete_user(
    State(db): State<Arc<DatabaseManager>>,
    Path(user_id): Path<i64>,
) -> AppResult<StatusCode> {
    user_commands::delete_user(&db, user_id).await?;
    Ok(StatusCode::OK)
}

// endregion: --- User handlers

// region:    --- Item handlers

pub async fn get_items(
    SharerId(owner_id): SharerId,
    State(db): State<Arc<DatabaseManager>>,
    AppQuery(params): AppQuery<PageParams>,
) -> AppResult<Json<Vec<ItemWithSchedule>>> {
    let (limit, offset) = page(params.from, params.size)?;
    let now = Utc::now();
    item_queries::get_items_by_owner(&db, owner_id, now, limit, offset)
        .await
        .map(Json)
}

pub async fn get_item(
    SharerId(caller_id): SharerId,
    State(db): State<Arc<DatabaseManager>>,
    Path(item_id): Path<i64>,
) -> AppResult<Json<ItemDetails>> {
    let now = Utc::now();
    item_queries::get_item_details(&db, caller_id, item_id, now)
        .await
        .map(Json)
}

pub async fn search_items(
    SharerId(caller_id): SharerId,
    State(db): State<Arc<DatabaseManager>>,
    AppQuery(params): AppQuery<SearchParams>,
) -> AppResult<Json<Vec<Item>>> {
    let (limit, offset) = page(params.from, params.size)?;
    item_queries::search_items(&db, caller_id, &params.text, limit, offset)
        .await
        .map(Json)
}

pub async fn create_item(
    SharerId(owner_id): SharerId,
    State(db): State<Arc<DatabaseManager>>,
    Json(new_item): Json<NewItem>,
) -> AppResult<Json<Item>> {
    item_commands::add_item(&db, owner_id, new_item).await.map(Json)
}

pub async fn update_item(
    SharerId(caller_id): SharerId,
    State(db): State<Arc<DatabaseManager>>,
    Path(item_id): Path<i64>,
    Json(patch): Json<ItemPatch>,
) -> AppResult<Json<Item>> {
    item_commands::update_item(&db, caller_id, item_id, patch)
        .await
        .map(Json)
}

pub async fn add_comment(
    SharerId(author_id): SharerId,
    State(db): State<Arc<DatabaseManager>>,
    Path(item_id): Path<i64>,
    Json(new_comment): Json<NewComment>,
) -> AppResult<Json<Comment>> {
    let now = Utc::now();
    item_commands::add_comment(&db, author_id, item_id, new_comment, now)
        .await
        .map(Json)
}

// endregion: --- Item handlers

// region:    --- Booking handlers

pub async fn create_booking(
    SharerId(booker_id): SharerId,
    State(db): State<Arc<DatabaseManager>>,
    Json(new_booking): Json<NewBooking>,
) -> AppResult<Json<Booking>> {
    booking_commands::create_booking(&db, booker_id, new_booking)
        .await
        .map(Json)
}

pub async fn approve_booking(
    SharerId(owner_id): SharerId,
    State(db): State<Arc<DatabaseManager>>,
    Path(booking_id): Path<i64>,
    AppQuery(params): AppQuery<ApproveParams>,
) -> AppResult<Json<Booking>> {
    booking_commands::approve_booking(&db, owner_id, booking_id, params.approved)
        .await
        .map(Json)
}

pub async fn get_booking(
    SharerId(caller_id): SharerId,
    State(db): State<Arc<DatabaseManager>>,
    Path(booking_id): Path<i64>,
) -> AppResult<Json<Booking>> {
    booking_queries::find_booking_visible(&db, caller_id, booking_id)
        .await
        .map(Json)
}

pub async fn get_bookings(
    SharerId(booker_id): SharerId,
    State(db): State<Arc<DatabaseManager>>,
    AppQuery(params): AppQuery<BookingListParams>,
) -> AppResult<Json<Vec<Booking>>> {
    // Parse the keyword at the boundary; unknown values fail fast.
    let state: StateFilter = params.state.parse()?;
    let (limit, offset) = page(params.from, params.size)?;
    let now = Utc::now();
    booking_queries::bookings_for_booker(&db, booker_id, state, now, limit, offset)
        .await
        .map(Json)
}

pub async fn get_owner_bookings(
    SharerId(owner_id): SharerId,
    State(db): State<Arc<DatabaseManager>>,
    AppQuery(params): AppQuery<BookingListParams>,
) -> AppResult<Json<Vec<Booking>>> {
    let state: StateFilter = params.state.parse()?;
    let (limit, offset) = page(params.from, params.size)?;
    let now = Utc::now();
    booking_queries::bookings_for_owner(&db, owner_id, state, now, limit, offset)
        .await
        .map(Json)
}

// endregion: --- Booking handlers

// region:    --- Request handlers

pub async fn create_request(
    SharerId(requester_id): SharerId,
    State(db): State<Arc<DatabaseManager>>,
    Json(new_request): Json<NewRequest>,
) -> AppResult<Json<ItemRequest>> {
    let now = Utc::now();
    request_commands::add_request(&db, requester_id, new_request, now)
        .await
        .map(Json)
}

pub async fn get_own_requests(
    SharerId(user_id): SharerId,
    State(db): State<Arc<DatabaseManager>>,
) -> AppResult<Json<Vec<RequestWithItems>>> {
    request_queries::get_own_requests(&db, user_id).await.map(Json)
}

pub async fn get_other_requests(
    SharerId(user_id): SharerId,
    State(db): State<Arc<DatabaseManager>>,
    AppQuery(params): AppQuery<PageParams>,
) -> AppResult<Json<Vec<RequestWithItems>>> {
    let (limit, offset) = page(params.from, params.size)?;
    request_queries::get_others_requests(&db, user_id, limit, offset)
        .await
        .map(Json)
}

pub async fn get_request(
    SharerId(user_id): SharerId,
    State(db): State<Arc<DatabaseManager>>,
    Path(request_id): Path<i64>,
) -> AppResult<Json<RequestWithItems>> {
    request_queries::find_request(&db, user_id, request_id)
        .await
        .map(Json)
}

// endregion: --- Request handlers

// region:    --- Tests

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_passes_from_through_as_offset() {
        assert_eq!(page(0, 10).unwrap(), (10, 0));
        assert_eq!(page(7, 10).unwrap(), (10, 7));
        assert_eq!(page(20, 5).unwrap(), (5, 20));
    }

    #[test]
    fn page_rejects_negative_offset() {
        assert!(page(-1, 10).is_err());
    }

    #[test]
    fn page_rejects_non_positive_size() {
        assert!(page(0, 0).is_err());
        assert!(page(0, -5).is_err());
    }
}

// endregion: --- Tests
