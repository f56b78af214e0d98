//! Common test utilities and fixtures for gateway tests

#![allow(dead_code, clippy::unwrap_used)]

use roomdesk_client::HttpGateway;
use serde_json::{Value, json};
use std::sync::Once;
use wiremock::MockServer;

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

/// Start a mock API and a gateway pointed at it
pub async fn start_api() -> (MockServer, HttpGateway) {
    init_test_logging();
    let server = MockServer::start().await;
    let gateway = HttpGateway::new(server.uri());
    (server, gateway)
}

/// Room as the API serialises it
pub fn room_json(id: i64, name: &str, capacity: u32) -> Value {
    json!({
        "id": id,
        "name": name,
        "description": "Ruangan Kampus",
        "capacity": capacity
    })
}

/// Booking as the API serialises it
pub fn booking_json(id: i64, room_id: i64, status: &str, history: Option<&str>) -> Value {
    json!({
        "id": id,
        "roomId": room_id,
        "borrowerName": "Andi",
        "bookingDate": "2025-01-10T09:00:00.1230000",
        "endTime": "2025-01-10T11:00:00",
        "status": status,
        "statusHistory": history
    })
}
