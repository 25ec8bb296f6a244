// region:    --- Imports
use crate::booking::model::{validate_window, Booking, BookingStatus, NewBooking};
use crate::database::DatabaseManager;
use crate::error::{AppError, AppResult};
use crate::item::model::Item;
use crate::user::model::User;
use crate::user::queries::FIND_USER_BY_ID;
use tracing::info;

// endregion: --- Imports

// region:    --- SQL

const INSERT_BOOKING: &str = r#"
    INSERT INTO bookings (start_date, end_date, item_id, booker_id, status)
    VALUES ($1, $2, $3, $4, $5)
    RETURNING id, start_date, end_date, item_id, booker_id, status
"#;

const FIND_ITEM_BY_ID: &str = r#"
    SELECT id, name, description, available, owner_id, request_id
    FROM items
    WHERE id = $1
"#;

// Row lock so a racing decision on the same booking serializes behind us.
const LOCK_BOOKING_BY_ID: &str = r#"
    SELECT id, start_date, end_date, item_id, booker_id, status
    FROM bookings
    WHERE id = $1
    FOR UPDATE
"#;

const FIND_ITEM_OWNER: &str = "SELECT owner_id FROM items WHERE id = $1";

const UPDATE_BOOKING_STATUS: &str = r#"
    UPDATE bookings SET status = $2
    WHERE id = $1
    RETURNING id, start_date, end_date, item_id, booker_id, status
"#;

// endregion: --- SQL

// region:    --- Commands

/// Creates a booking in WAITING state. Checks run in order: booker exists,
/// item exists and is available, the window is well-formed, and the booker
/// is not the item's owner. The owner check fails with the same NotFound
/// shape as an absent item so ownership never leaks.
pub async fn create_booking(
    db: &DatabaseManager,
    booker_id: i64,
    new_booking: NewBooking,
) -> AppResult<Booking> {
    info!(
        "{:<12} --> create booking: booker={} item={}",
        "Booking", booker_id, new_booking.item_id
    );
    db.transaction(|tx| {
        Box::pin(async move {
            sqlx::query_as::<_, User>(FIND_USER_BY_ID)
                .bind(booker_id)
                .fetch_optional(&mut **tx)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("User {booker_id} not found.")))?;

            let item_id = new_booking.item_id;
            let item = sqlx::query_as::<_, Item>(FIND_ITEM_BY_ID)
                .bind(item_id)
                .fetch_optional(&mut **tx)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("Item {item_id} not found.")))?;

            if !item.available {
                return Err(AppError::BadRequest("Item is not available.".to_string()));
            }

            let (start, end) = validate_window(new_booking.start, new_booking.end)?;

            if item.owner_id == booker_id {
                // Same shape as an absent item; owners get no confirmation
                // that the item is theirs.
                return Err(AppError::NotFound(format!("Item {item_id} not found.")));
            }

            let booking = sqlx::query_as::<_, Booking>(INSERT_BOOKING)
                .bind(start)
                .bind(end)
                .bind(item_id)
                .bind(booker_id)
                .bind(BookingStatus::Waiting)
                .fetch_one(&mut **tx)
                .await?;
            Ok(booking)
        })
    })
    .await
}

/// Owner decision on a WAITING booking: `approved = true` sets APPROVED,
/// `false` sets REJECTED. A booking that is already APPROVED cannot be
/// decided again. Non-owners receive the NotFound shape of an absent
/// booking.
pub async fn approve_booking(
    db: &DatabaseManager,
    owner_id: i64,
    booking_id: i64,
    approved: bool,
) -> AppResult<Booking> {
    info!(
        "{:<12} --> decide booking: owner={} booking={} approved={}",
        "Booking", owner_id, booking_id, approved
    );
    db.transaction(|tx| {
        Box::pin(async move {
            sqlx::query_as::<_, User>(FIND_USER_BY_ID)
                .bind(owner_id)
                .fetch_optional(&mut **tx)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("User {owner_id} not found.")))?;

            let booking = sqlx::query_as::<_, Booking>(LOCK_BOOKING_BY_ID)
                .bind(booking_id)
                .fetch_optional(&mut **tx)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("Booking {booking_id} not found.")))?;

            let item_owner = sqlx::query_scalar::<_, i64>(FIND_ITEM_OWNER)
                .bind(booking.item_id)
                .fetch_one(&mut **tx)
                .await?;
            if item_owner != owner_id {
                return Err(AppError::NotFound(format!("Booking {booking_id} not found.")));
            }

            if booking.status == BookingStatus::Approved {
                return Err(AppError::BadRequest("Booking is already approved.".to_string()));
            }

            let status = if approved {
                BookingStatus::Approved
            } else {
                BookingStatus::Rejected
            };
            let updated = sqlx::query_as::<_, Booking>(UPDATE_BOOKING_STATUS)
                .bind(booking_id)
                .bind(status)
                .fetch_one(&mut **tx)
                .await?;
            Ok(updated)
        })
    })
    .await
}

// endregion: --- Commands
