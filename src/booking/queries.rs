// region:    --- Imports
use crate::booking::model::{Booking, BookingStatus, StateFilter};
use crate::database::DatabaseManager;
use crate::error::{AppError, AppResult};
use crate::user::queries::find_user;
use chrono::{DateTime, Utc};
use tracing::info;

// endregion: --- Imports

// region:    --- SQL

const FIND_BOOKING_BY_ID: &str = r#"
    SELECT id, start_date, end_date, item_id, booker_id, status
    FROM bookings
    WHERE id = $1
"#;

const BOOKER_ALL: &str = r#"
    SELECT id, start_date, end_date, item_id, booker_id, status
    FROM bookings
    WHERE booker_id = $1
    ORDER BY start_date DESC
    LIMIT $2 OFFSET $3
"#;

const BOOKER_BY_STATUS: &str = r#"
    SELECT id, start_date, end_date, item_id, booker_id, status
    FROM bookings
    WHERE booker_id = $1 AND status = $2
    ORDER BY start_date DESC
    LIMIT $3 OFFSET $4
"#;

const BOOKER_CURRENT: &str = r#"
    SELECT id, start_date, end_date, item_id, booker_id, status
    FROM bookings
    WHERE booker_id = $1 AND start_date < $2 AND end_date > $2
    ORDER BY id ASC
    LIMIT $3 OFFSET $4
"#;

const BOOKER_FUTURE: &str = r#"
    SELECT id, start_date, end_date, item_id, booker_id, status
    FROM bookings
    WHERE booker_id = $1 AND start_date > $2
    ORDER BY start_date DESC
    LIMIT $3 OFFSET $4
"#;

const BOOKER_PAST: &str = r#"
    SELECT id, start_date, end_date, item_id, booker_id, status
    FROM bookings
    WHERE booker_id = $1 AND end_date < $2
    ORDER BY start_date DESC
    LIMIT $3 OFFSET $4
"#;

const OWNER_ALL: &str = r#"
    SELECT b.id, b.start_date, b.end_date, b.item_id, b.booker_id, b.status
    FROM bookings b
    JOIN items i ON i.id = b.item_id
    WHERE i.owner_id = $1
    ORDER BY b.start_date DESC
    LIMIT $2 OFFSET $3
"#;

const OWNER_BY_STATUS: &str = r#"
    SELECT b.id, b.start_date, b.end_date, b.item_id, b.booker_id, b.status
    FROM bookings b
    JOIN items i ON i.id = b.item_id
    WHERE i.owner_id = $1 AND b.status = $2
    ORDER BY b.start_date DESC
    LIMIT $3 OFFSET $4
"#;

const OWNER_CURRENT: &str = r#"
    SELECT b.id, b.start_date, b.end_date, b.item_id, b.booker_id, b.status
    FROM bookings b
    JOIN items i ON i.id = b.item_id
    WHERE i.owner_id = $1 AND b.start_date < $2 AND b.end_date > $2
    ORDER BY b.id ASC
    LIMIT $3 OFFSET $4
"#;

const OWNER_FUTURE: &str = r#"
    SELECT b.id, b.start_date, b.end_date, b.item_id, b.booker_id, b.status
    FROM bookings b
    JOIN items i ON i.id = b.item_id
    WHERE i.owner_id = $1 AND b.start_date > $2
    ORDER BY b.start_date DESC
    LIMIT $3 OFFSET $4
"#;

const OWNER_PAST: &str = r#"
    SELECT b.id, b.start_date, b.end_date, b.item_id, b.booker_id, b.status
    FROM bookings b
    JOIN items i ON i.id = b.item_id
    WHERE i.owner_id = $1 AND b.end_date < $2
    ORDER BY b.start_date DESC
    LIMIT $3 OFFSET $4
"#;

const FIND_ITEM_OWNER: &str = "SELECT owner_id FROM items WHERE id = $1";

// endregion: --- SQL

// region:    --- Queries

/// Fetches a booking by id for the given caller. Only the booker and the
/// item's owner may see it; everyone else gets the same NotFound as for an
/// absent id, so existence never leaks.
pub async fn find_booking_visible(
    db: &DatabaseManager,
    caller_id: i64,
    booking_id: i64,
) -> AppResult<Booking> {
    find_user(db, caller_id).await?;
    let booking = sqlx::query_as::<_, Booking>(FIND_BOOKING_BY_ID)
        .bind(booking_id)
        .fetch_optional(db.pool())
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Booking {booking_id} not found.")))?;

    let owner_id = sqlx::query_scalar::<_, i64>(FIND_ITEM_OWNER)
        .bind(booking.item_id)
        .fetch_one(db.pool())
        .await?;

    if booking.booker_id == caller_id || owner_id == caller_id {
        Ok(booking)
    } else {
        Err(AppError::NotFound(format!("Booking {booking_id} not found.")))
    }
}

/// State-filtered listing of the user's own bookings. `now` is read once by
/// the caller so every time comparison in the request sees the same instant.
pub async fn bookings_for_booker(
    db: &DatabaseManager,
    booker_id: i64,
    state: StateFilter,
    now: DateTime<Utc>,
    limit: i64,
    offset: i64,
) -> AppResult<Vec<Booking>> {
    info!(
        "{:<12} --> list bookings: booker={} state={:?}",
        "Query", booker_id, state
    );
    find_user(db, booker_id).await?;
    list_bookings(db, BookingSide::Booker, booker_id, state, now, limit, offset).await
}

/// Symmetric listing over all bookings of the user's items.
pub async fn bookings_for_owner(
    db: &DatabaseManager,
    owner_id: i64,
    state: StateFilter,
    now: DateTime<Utc>,
    limit: i64,
    offset: i64,
) -> AppResult<Vec<Booking>> {
    info!(
        "{:<12} --> list bookings: owner={} state={:?}",
        "Query", owner_id, state
    );
    find_user(db, owner_id).await?;
    list_bookings(db, BookingSide::Owner, owner_id, state, now, limit, offset).await
}

enum BookingSide {
    Booker,
    Owner,
}

async fn list_bookings(
    db: &DatabaseManager,
    side: BookingSide,
    subject_id: i64,
    state: StateFilter,
    now: DateTime<Utc>,
    limit: i64,
    offset: i64,
) -> AppResult<Vec<Booking>> {
    let (all, by_status, current, future, past) = match side {
        BookingSide::Booker => (
            BOOKER_ALL,
            BOOKER_BY_STATUS,
            BOOKER_CURRENT,
            BOOKER_FUTURE,
            BOOKER_PAST,
        ),
        BookingSide::Owner => (
            OWNER_ALL,
            OWNER_BY_STATUS,
            OWNER_CURRENT,
            OWNER_FUTURE,
            OWNER_PAST,
        ),
    };

    let rows = match state {
        StateFilter::All => {
            sqlx::query_as::<_, Booking>(all)
                .bind(subject_id)
                .bind(limit)
                .bind(offset)
                .fetch_all(db.pool())
                .await?
        }
        StateFilter::Waiting | StateFilter::Rejected | StateFilter::Canceled => {
            let status = match state {
                StateFilter::Waiting => BookingStatus::Waiting,
                StateFilter::Rejected => BookingStatus::Rejected,
                _ => BookingStatus::Canceled,
            };
            sqlx::query_as::<_, Booking>(by_status)
                .bind(subject_id)
                .bind(status)
                .bind(limit)
                .bind(offset)
                .fetch_all(db.pool())
                .await?
        }
        StateFilter::Current => {
            sqlx::query_as::<_, Booking>(current)
                .bind(subject_id)
                .bind(now)
                .bind(limit)
                .bind(offset)
                .fetch_all(db.pool())
                .await?
        }
        StateFilter::Future => {
            sqlx::query_as::<_, Booking>(future)
                .bind(subject_id)
                .bind(now)
                .bind(limit)
                .bind(offset)
                .fetch_all(db.pool())
                .await?
        }
        StateFilter::Past => {
            sqlx::query_as::<_, Booking>(past)
                .bind(subject_id)
                .bind(now)
                .bind(limit)
                .bind(offset)
                .fetch_all(db.pool())
                .await?
        }
    };
    Ok(rows)
}

// endregion: --- Queries
