//! In-process gateway used by `--demo` mode and tests
//!
//! Behaves like the booking API: new bookings start `Pending`, status changes
//! append a history line, unknown ids answer 404 and deleting a room leaves
//! its bookings in place.

use crate::{ClientError, ClientResult, Gateway};
use async_trait::async_trait;
use chrono::Local;
use parking_lot::Mutex;
use roomdesk_core::{
    Booking, BookingId, BookingRequest, BookingStatus, Room, RoomId, RoomRequest, StatusHistory,
};
use tracing::debug;

#[derive(Debug, Default)]
struct State {
    rooms: Vec<Room>,
    bookings: Vec<Booking>,
    next_room_id: RoomId,
    next_booking_id: BookingId,
    reads: usize,
    writes: usize,
    failure: Option<u16>,
}

impl State {
    fn check(&self, operation: &'static str) -> ClientResult<()> {
        match self.failure {
            Some(status) => Err(ClientError::rejected(operation, status, "simulated failure")),
            None => Ok(()),
        }
    }

    fn check_room(&self, operation: &'static str, room_id: RoomId) -> ClientResult<()> {
        if self.rooms.iter().any(|r| r.id == room_id) {
            Ok(())
        } else {
            Err(ClientError::rejected(
                operation,
                400,
                format!("room {room_id} does not exist"),
            ))
        }
    }
}

/// Gateway keeping both collections in memory
#[derive(Debug)]
pub struct InMemoryGateway {
    state: Mutex<State>,
}

impl Default for InMemoryGateway {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryGateway {
    /// Create an empty gateway
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State {
                next_room_id: 1,
                next_booking_id: 1,
                ..State::default()
            }),
        }
    }

    /// Create a gateway holding the given records
    pub fn with_records(rooms: Vec<Room>, bookings: Vec<Booking>) -> Self {
        let next_room_id = rooms.iter().map(|r| r.id).max().unwrap_or(0) + 1;
        let next_booking_id = bookings.iter().map(|b| b.id).max().unwrap_or(0) + 1;
        Self {
            state: Mutex::new(State {
                rooms,
                bookings,
                next_room_id,
                next_booking_id,
                ..State::default()
            }),
        }
    }

    /// Small campus data set for demo mode
    pub fn demo() -> Self {
        let room = |id, name: &str, capacity| Room {
            id,
            name: name.to_string(),
            description: roomdesk_core::types::DEFAULT_ROOM_DESCRIPTION.to_string(),
            capacity,
        };
        let rooms = vec![
            room(1, "Aula Utama", 200),
            room(2, "Lab Komputer", 40),
            room(3, "Ruang Rapat A", 12),
            room(4, "Ruang Kelas 101", 35),
        ];

        let now = Local::now().naive_local();
        let start = |days: i64, hour: u32| {
            (now.date() + chrono::Duration::days(days))
                .and_hms_opt(hour, 0, 0)
                .map(roomdesk_core::Timestamp::new)
        };
        let bookings = [
            (1, 1, "Andi", 1, 8, BookingStatus::Pending),
            (2, 2, "Citra", 2, 10, BookingStatus::Approved),
            (3, 3, "Budi", 3, 13, BookingStatus::Rejected),
            (4, 1, "Dewi", 4, 9, BookingStatus::Pending),
        ]
        .into_iter()
        .filter_map(|(id, room_id, name, days, hour, status)| {
            let booking_date = start(days, hour)?;
            let end_time = start(days, hour + 2)?;
            let mut history = StatusHistory::default();
            history.push(&history_line("Created with status Pending"));
            if status != BookingStatus::Pending {
                history.push(&history_line(&format!(
                    "Status changed from Pending to {status}"
                )));
            }
            Some(Booking {
                id,
                room_id,
                borrower_name: name.to_string(),
                booking_date,
                end_time,
                status,
                status_history: history,
            })
        })
        .collect();

        Self::with_records(rooms, bookings)
    }

    /// Make every following call fail with the given HTTP status
    pub fn fail_with(&self, status: u16) {
        self.state.lock().failure = Some(status);
    }

    /// Stop simulating failures
    pub fn recover(&self) {
        self.state.lock().failure = None;
    }

    /// Number of list calls served
    pub fn read_count(&self) -> usize {
        self.state.lock().reads
    }

    /// Number of successful writes
    pub fn write_count(&self) -> usize {
        self.state.lock().writes
    }

    /// Copy of the stored rooms
    pub fn rooms(&self) -> Vec<Room> {
        self.state.lock().rooms.clone()
    }

    /// Copy of the stored bookings
    pub fn bookings(&self) -> Vec<Booking> {
        self.state.lock().bookings.clone()
    }
}

fn history_line(text: &str) -> String {
    format!("[{}] {text}", Local::now().format("%Y-%m-%d %H:%M:%S"))
}

fn not_found(operation: &'static str, kind: &str, id: i64) -> ClientError {
    ClientError::rejected(operation, 404, format!("{kind} {id} not found"))
}

#[async_trait]
impl Gateway for InMemoryGateway {
    async fn list_rooms(&self) -> ClientResult<Vec<Room>> {
        let mut state = self.state.lock();
        state.check("list rooms")?;
        state.reads += 1;
        Ok(state.rooms.clone())
    }

    async fn list_bookings(&self) -> ClientResult<Vec<Booking>> {
        let mut state = self.state.lock();
        state.check("list bookings")?;
        state.reads += 1;
        Ok(state.bookings.clone())
    }

    async fn create_room(&self, request: &RoomRequest) -> ClientResult<Option<Room>> {
        let mut state = self.state.lock();
        state.check("create room")?;

        let room = Room {
            id: state.next_room_id,
            name: request.name.clone(),
            description: request.description.clone(),
            capacity: request.capacity,
        };
        state.next_room_id += 1;
        state.rooms.push(room.clone());
        state.writes += 1;
        debug!(room_id = room.id, "room created");
        Ok(Some(room))
    }

    async fn update_room(&self, id: RoomId, request: &RoomRequest) -> ClientResult<Option<Room>> {
        let mut state = self.state.lock();
        state.check("update room")?;

        let room = state
            .rooms
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| not_found("update room", "room", id))?;
        room.name.clone_from(&request.name);
        room.description.clone_from(&request.description);
        room.capacity = request.capacity;
        let updated = room.clone();
        state.writes += 1;
        Ok(Some(updated))
    }

    async fn delete_room(&self, id: RoomId) -> ClientResult<()> {
        let mut state = self.state.lock();
        state.check("delete room")?;

        let before = state.rooms.len();
        state.rooms.retain(|r| r.id != id);
        if state.rooms.len() == before {
            return Err(not_found("delete room", "room", id));
        }
        state.writes += 1;
        Ok(())
    }

    async fn create_booking(&self, request: &BookingRequest) -> ClientResult<Option<Booking>> {
        let mut state = self.state.lock();
        state.check("create booking")?;
        state.check_room("create booking", request.room_id)?;

        let mut history = StatusHistory::default();
        history.push(&history_line("Created with status Pending"));
        let booking = Booking {
            id: state.next_booking_id,
            room_id: request.room_id,
            borrower_name: request.borrower_name.clone(),
            booking_date: request.booking_date,
            end_time: request.end_time,
            status: BookingStatus::Pending,
            status_history: history,
        };
        state.next_booking_id += 1;
        state.bookings.push(booking.clone());
        state.writes += 1;
        debug!(booking_id = booking.id, "booking created");
        Ok(Some(booking))
    }

    async fn update_booking(
        &self,
        id: BookingId,
        request: &BookingRequest,
    ) -> ClientResult<Option<Booking>> {
        let mut state = self.state.lock();
        state.check("update booking")?;
        if !state.bookings.iter().any(|b| b.id == id) {
            return Err(not_found("update booking", "booking", id));
        }
        state.check_room("update booking", request.room_id)?;

        let booking = state
            .bookings
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or_else(|| not_found("update booking", "booking", id))?;
        booking.room_id = request.room_id;
        booking.borrower_name.clone_from(&request.borrower_name);
        booking.booking_date = request.booking_date;
        booking.end_time = request.end_time;
        let updated = booking.clone();
        state.writes += 1;
        Ok(Some(updated))
    }

    async fn set_booking_status(&self, id: BookingId, status: BookingStatus) -> ClientResult<()> {
        let mut state = self.state.lock();
        state.check("set booking status")?;

        let booking = state
            .bookings
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or_else(|| not_found("set booking status", "booking", id))?;
        let line = history_line(&format!(
            "Status changed from {} to {status}",
            booking.status
        ));
        booking.status = status;
        booking.status_history.push(&line);
        state.writes += 1;
        Ok(())
    }

    async fn delete_booking(&self, id: BookingId) -> ClientResult<()> {
        let mut state = self.state.lock();
        state.check("delete booking")?;

        let before = state.bookings.len();
        state.bookings.retain(|b| b.id != id);
        if state.bookings.len() == before {
            return Err(not_found("delete booking", "booking", id));
        }
        state.writes += 1;
        Ok(())
    }
}
