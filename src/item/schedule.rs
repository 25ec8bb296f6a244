// region:    --- Imports
use crate::booking::model::Booking;
use chrono::{DateTime, Utc};

// endregion: --- Imports

/// Splits an item's bookings (ordered by start ascending) at `now`,
/// returning the most recent one that has already ended and the nearest one
/// that has not yet started. A booking currently in progress belongs to
/// neither side.
pub fn split_schedule(
    bookings: &[Booking],
    now: DateTime<Utc>,
) -> (Option<Booking>, Option<Booking>) {
    let mut last_booking = None;
    let mut next_booking = None;
    for booking in bookings {
        if booking.end_date < now {
            last_booking = Some(booking.clone());
        } else if booking.start_date > now {
            next_booking = Some(booking.clone());
            break;
        }
    }
    (last_booking, next_booking)
}

// region:    --- Tests

#[cfg(test)]
mod tests {
    use super::*;
    use crate::booking::model::BookingStatus;
    use chrono::TimeZone;

    fn day(d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, d, 12, 0, 0).unwrap()
    }

    fn booking(id: i64, start: DateTime<Utc>, end: DateTime<Utc>) -> Booking {
        Booking {
            id,
            start_date: start,
            end_date: end,
            item_id: 1,
            booker_id: 2,
            status: BookingStatus::Approved,
        }
    }

    #[test]
    fn empty_schedule_has_neither_side() {
        let (last, next) = split_schedule(&[], day(10));
        assert!(last.is_none());
        assert!(next.is_none());
    }

    #[test]
    fn picks_most_recent_past_and_nearest_future() {
        let bookings = vec![
            booking(1, day(1), day(2)),
            booking(2, day(3), day(4)),
            booking(3, day(12), day(13)),
            booking(4, day(20), day(21)),
        ];
        let (last, next) = split_schedule(&bookings, day(10));
        assert_eq!(last.unwrap().id, 2);
        assert_eq!(next.unwrap().id, 3);
    }

    #[test]
    fn booking_in_progress_is_neither_last_nor_next() {
        let bookings = vec![booking(1, day(9), day(11))];
        let (last, next) = split_schedule(&bookings, day(10));
        assert!(last.is_none());
        assert!(next.is_none());
    }

    #[test]
    fn all_past_yields_only_last() {
        let bookings = vec![booking(1, day(1), day(2)), booking(2, day(3), day(4))];
        let (last, next) = split_schedule(&bookings, day(10));
        assert_eq!(last.unwrap().id, 2);
        assert!(next.is_none());
    }

    #[test]
    fn all_future_yields_only_next() {
        let bookings = vec![booking(1, day(12), day(13)), booking(2, day(14), day(15))];
        let (last, next) = split_schedule(&bookings, day(10));
        assert!(last.is_none());
        assert_eq!(next.unwrap().id, 1);
    }
}

// endregion: --- Tests
