//! Display rows derived from [`AppState`]
//!
//! Views own their text so they can be rendered as tables or serialised to
//! JSON without borrowing from the state.

use crate::state::AppState;
use roomdesk_core::{
    Booking, BookingId, BookingStatus, Page, Room, RoomId, SortDirection,
    utils::{count_with_status, last_history_entry, room_label},
};
use serde::Serialize;

/// Headline numbers for the dashboard
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    /// Rooms loaded
    pub total_rooms: usize,
    /// Bookings loaded
    pub total_bookings: usize,
    /// Bookings awaiting a decision
    pub pending_bookings: usize,
    /// Approved bookings
    pub approved_bookings: usize,
    /// Rejected bookings
    pub rejected_bookings: usize,
    /// Bookings carrying any history entry
    pub bookings_with_history: usize,
}

/// A page of rows plus the navigation around it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListView<R> {
    /// Visible rows
    pub rows: Vec<R>,
    /// Requested page
    pub page: usize,
    /// Total pages, never below one
    pub total_pages: usize,
    /// Rows per page
    pub page_size: usize,
    /// Records that passed the search
    pub filtered_count: usize,
    /// Search text in effect
    pub search: String,
    /// Sort direction in effect
    pub direction: SortDirection,
    /// Whether a previous page exists
    pub has_prev: bool,
    /// Whether a next page exists
    pub has_next: bool,
}

/// Room table row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomRow {
    /// Room id
    pub id: RoomId,
    /// Name
    pub name: String,
    /// Capacity
    pub capacity: u32,
    /// Description
    pub description: String,
}

/// Booking table row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRow {
    /// Booking id
    pub id: BookingId,
    /// Room name or placeholder
    pub room: String,
    /// Borrower
    pub borrower: String,
    /// Start, `dd/mm/yyyy HH:MM`
    pub start: String,
    /// End, `dd/mm/yyyy HH:MM`
    pub end: String,
    /// Status
    pub status: BookingStatus,
    /// Whether approve/reject are offered
    pub actionable: bool,
}

/// History tab row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryRow {
    /// Booking id
    pub id: BookingId,
    /// Borrower
    pub borrower: String,
    /// Room name or placeholder
    pub room: String,
    /// Status
    pub status: BookingStatus,
    /// Most recent history line
    pub last_entry: String,
}

/// Full status history of one booking
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryDetail {
    /// Booking id
    pub booking_id: BookingId,
    /// Borrower
    pub borrower: String,
    /// Room name or placeholder
    pub room: String,
    /// Status
    pub status: BookingStatus,
    /// Every history line, oldest first
    pub entries: Vec<String>,
}

fn list_view<'a, T, R>(state: &AppState, page: &Page<'a, T>, row: impl Fn(&'a T) -> R) -> ListView<R> {
    ListView {
        rows: page.items.iter().copied().map(row).collect(),
        page: page.page,
        total_pages: page.display_total_pages(),
        page_size: page.page_size,
        filtered_count: page.filtered_count,
        search: state.query.search.clone(),
        direction: state.query.direction,
        has_prev: page.has_prev(),
        has_next: page.has_next(),
    }
}

impl RoomRow {
    fn from_room(room: &Room) -> Self {
        Self {
            id: room.id,
            name: room.name.clone(),
            capacity: room.capacity,
            description: room.description.clone(),
        }
    }
}

impl BookingRow {
    fn from_booking(rooms: &[Room], booking: &Booking) -> Self {
        Self {
            id: booking.id,
            room: room_label(rooms, booking.room_id).into_owned(),
            borrower: booking.borrower_name.clone(),
            start: booking.booking_date.to_display(),
            end: booking.end_time.to_display(),
            status: booking.status,
            actionable: booking.is_pending(),
        }
    }
}

impl HistoryRow {
    fn from_booking(rooms: &[Room], booking: &Booking) -> Self {
        Self {
            id: booking.id,
            borrower: booking.borrower_name.clone(),
            room: room_label(rooms, booking.room_id).into_owned(),
            status: booking.status,
            last_entry: last_history_entry(booking).to_string(),
        }
    }
}

impl AppState {
    /// Dashboard numbers over the loaded collections
    pub fn dashboard(&self) -> DashboardStats {
        DashboardStats {
            total_rooms: self.rooms.len(),
            total_bookings: self.bookings.len(),
            pending_bookings: count_with_status(&self.bookings, BookingStatus::Pending),
            approved_bookings: count_with_status(&self.bookings, BookingStatus::Approved),
            rejected_bookings: count_with_status(&self.bookings, BookingStatus::Rejected),
            bookings_with_history: self
                .bookings
                .iter()
                .filter(|b| !b.status_history.is_empty())
                .count(),
        }
    }

    /// Visible page of the room table
    pub fn rooms_view(&self) -> ListView<RoomRow> {
        list_view(self, &self.room_page(), RoomRow::from_room)
    }

    /// Visible page of the booking table
    pub fn bookings_view(&self) -> ListView<BookingRow> {
        list_view(self, &self.booking_page(), |booking| {
            BookingRow::from_booking(&self.rooms, booking)
        })
    }

    /// Visible page of the history table
    pub fn history_view_rows(&self) -> ListView<HistoryRow> {
        list_view(self, &self.booking_page(), |booking| {
            HistoryRow::from_booking(&self.rooms, booking)
        })
    }

    /// Open history detail, if a booking is selected and still loaded
    pub fn history_detail(&self) -> Option<HistoryDetail> {
        let booking = self.booking(self.history_view?)?;
        Some(HistoryDetail {
            booking_id: booking.id,
            borrower: booking.borrower_name.clone(),
            room: room_label(&self.rooms, booking.room_id).into_owned(),
            status: booking.status,
            entries: booking
                .status_history
                .lines()
                .map(ToString::to_string)
                .collect(),
        })
    }
}
