//! Utility functions for `roomdesk`

use crate::types::{Booking, BookingStatus, Room, RoomId};
use std::borrow::Cow;

/// Shown in place of a status history that has no entries
pub const NO_HISTORY_TEXT: &str = "Tidak ada catatan.";

/// Name of the room with the given id, or a `Ruang #<id>` placeholder when
/// the room is not (or no longer) in the collection
pub fn room_label(rooms: &[Room], room_id: RoomId) -> Cow<'_, str> {
    rooms
        .iter()
        .find(|room| room.id == room_id)
        .map_or_else(
            || Cow::Owned(format!("Ruang #{room_id}")),
            |room| Cow::Borrowed(room.name.as_str()),
        )
}

/// Latest history entry of a booking, or [`NO_HISTORY_TEXT`]
pub fn last_history_entry(booking: &Booking) -> &str {
    booking
        .status_history
        .last_line()
        .unwrap_or(NO_HISTORY_TEXT)
}

/// Number of bookings with the given status
pub fn count_with_status(bookings: &[Booking], status: BookingStatus) -> usize {
    bookings.iter().filter(|b| b.status == status).count()
}

/// Shorten `text` to at most `max` characters, marking the cut with `…`
#[must_use]
pub fn truncate_chars(text: &str, max: usize) -> Cow<'_, str> {
    if text.chars().count() <= max {
        return Cow::Borrowed(text);
    }
    let kept: String = text.chars().take(max.saturating_sub(1)).collect();
    Cow::Owned(format!("{kept}…"))
}
