//! The gateway contract shared by every backend

use crate::ClientResult;
use async_trait::async_trait;
use roomdesk_core::{
    Booking, BookingId, BookingRequest, BookingStatus, Room, RoomId, RoomRequest,
};

/// Both collections as fetched together
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    /// All rooms
    pub rooms: Vec<Room>,
    /// All bookings
    pub bookings: Vec<Booking>,
}

/// Operations offered by the booking API
///
/// Success of a write is judged by the API status alone. Create and update
/// return the echoed record when the API sends one that decodes; callers are
/// expected to [`reload`](Gateway::reload) afterwards rather than patch their
/// copies.
#[async_trait]
pub trait Gateway: Send + Sync {
    /// `GET /api/Rooms`
    async fn list_rooms(&self) -> ClientResult<Vec<Room>>;

    /// `GET /api/Bookings`
    async fn list_bookings(&self) -> ClientResult<Vec<Booking>>;

    /// `POST /api/Rooms`
    async fn create_room(&self, request: &RoomRequest) -> ClientResult<Option<Room>>;

    /// `PUT /api/Rooms/{id}`
    async fn update_room(&self, id: RoomId, request: &RoomRequest) -> ClientResult<Option<Room>>;

    /// `DELETE /api/Rooms/{id}`
    async fn delete_room(&self, id: RoomId) -> ClientResult<()>;

    /// `POST /api/Bookings`
    async fn create_booking(&self, request: &BookingRequest) -> ClientResult<Option<Booking>>;

    /// `PUT /api/Bookings/{id}`
    async fn update_booking(
        &self,
        id: BookingId,
        request: &BookingRequest,
    ) -> ClientResult<Option<Booking>>;

    /// `PUT /api/Bookings/{id}/status`
    async fn set_booking_status(&self, id: BookingId, status: BookingStatus) -> ClientResult<()>;

    /// `DELETE /api/Bookings/{id}`
    async fn delete_booking(&self, id: BookingId) -> ClientResult<()>;

    /// Fetch both collections; the invalidate-and-reload step after any write
    async fn reload(&self) -> ClientResult<Snapshot> {
        let (rooms, bookings) = tokio::try_join!(self.list_rooms(), self.list_bookings())?;
        Ok(Snapshot { rooms, bookings })
    }
}
