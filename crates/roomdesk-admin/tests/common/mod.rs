//! Common fixtures for front-end flow tests

#![allow(dead_code, clippy::unwrap_used)]

use roomdesk_admin::{AppState, Event, update};
use roomdesk_client::InMemoryGateway;
use roomdesk_core::{Booking, BookingStatus, Room, StatusHistory, Timestamp};
use std::sync::Once;

static INIT_LOGGER: Once = Once::new();

/// Initialize test logging (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("debug")
            .with_test_writer()
            .try_init();
    });
}

/// Room fixture
pub fn room(id: i64, name: &str) -> Room {
    Room {
        id,
        name: name.to_string(),
        description: "Ruangan Kampus".to_string(),
        capacity: 30,
    }
}

/// Pending booking fixture starting `day` days into January 2025
pub fn booking(id: i64, room_id: i64, borrower: &str, day: u32) -> Booking {
    let start = format!("2025-01-{day:02}T09:00");
    let end = format!("2025-01-{day:02}T11:00");
    Booking {
        id,
        room_id,
        borrower_name: borrower.to_string(),
        booking_date: Timestamp::parse(&start).unwrap(),
        end_time: Timestamp::parse(&end).unwrap(),
        status: BookingStatus::Pending,
        status_history: StatusHistory::new("Created with status Pending"),
    }
}

/// Three rooms and bookings 7 and 9, booking 9 in room 3
pub fn campus() -> InMemoryGateway {
    InMemoryGateway::with_records(
        vec![room(1, "Aula"), room(2, "Lab Komputer"), room(3, "Ruang Rapat")],
        vec![booking(7, 1, "Andi", 10), booking(9, 3, "Budi", 12)],
    )
}

/// Fresh state loaded from the gateway
pub async fn loaded_state(gateway: &InMemoryGateway) -> AppState {
    init_test_logging();
    let mut state = AppState::default();
    update(&mut state, gateway, Event::Refresh).await.unwrap();
    state
}
