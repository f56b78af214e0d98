//! HTTP gateway for communicating with the booking API

use crate::{ClientError, ClientResult, Gateway};
use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response};
use roomdesk_core::{
    Booking, BookingId, BookingRequest, BookingStatus, Room, RoomId, RoomRequest, StatusRequest,
    config::ApiConfig,
};
use serde::{Serialize, de::DeserializeOwned};
use std::time::Duration;
use tracing::{debug, warn};

/// Gateway for making HTTP requests to the booking API
#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl HttpGateway {
    /// Create a gateway with default client settings (no timeout)
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: normalize_base_url(base_url.into()),
            api_key: None,
        }
    }

    /// Create a gateway from the `[api]` configuration section
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn from_config(config: &ApiConfig) -> ClientResult<Self> {
        let mut builder = Client::builder();
        if let Some(seconds) = config.timeout_seconds {
            builder = builder.timeout(Duration::from_secs(seconds));
        }
        let client = builder.build().map_err(|source| ClientError::Transport {
            operation: "build HTTP client",
            source,
        })?;

        Ok(Self {
            client,
            base_url: normalize_base_url(config.base_url.clone()),
            api_key: config.api_key.clone(),
        })
    }

    /// Set the API key for authentication
    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Base URL requests are sent to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{path}", self.base_url);
        debug!(%method, %url, "sending request");

        let mut request = self.client.request(method, url);
        if let Some(ref api_key) = self.api_key {
            request = request.header("X-API-Key", api_key);
        }
        request
    }

    async fn send(&self, operation: &'static str, request: RequestBuilder) -> ClientResult<Response> {
        let response = request
            .send()
            .await
            .map_err(|source| ClientError::Transport { operation, source })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        warn!(operation, status = status.as_u16(), "API rejected request");
        Err(ClientError::rejected(operation, status.as_u16(), body))
    }

    async fn fetch_list<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        path: &str,
    ) -> ClientResult<Vec<T>> {
        let response = self.send(operation, self.request(Method::GET, path)).await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|source| ClientError::Transport { operation, source })?;

        serde_json::from_slice(&bytes).map_err(|source| ClientError::Decode { operation, source })
    }

    /// Send a JSON body; decode the echoed record when there is one
    async fn write<B, T>(
        &self,
        operation: &'static str,
        method: Method,
        path: &str,
        body: &B,
    ) -> ClientResult<Option<T>>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .send(operation, self.request(method, path).json(body))
            .await?;

        // Success is already decided by the status; the body is a bonus.
        let bytes = response.bytes().await.unwrap_or_default();
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }
        match serde_json::from_slice(&bytes) {
            Ok(record) => Ok(Some(record)),
            Err(e) => {
                debug!(operation, error = %e, "ignoring undecodable write response");
                Ok(None)
            }
        }
    }

    async fn delete(&self, operation: &'static str, path: &str) -> ClientResult<()> {
        self.send(operation, self.request(Method::DELETE, path))
            .await
            .map(drop)
    }
}

fn normalize_base_url(mut base_url: String) -> String {
    while base_url.ends_with('/') {
        base_url.pop();
    }
    base_url
}

#[async_trait]
impl Gateway for HttpGateway {
    async fn list_rooms(&self) -> ClientResult<Vec<Room>> {
        self.fetch_list("list rooms", "/api/Rooms").await
    }

    async fn list_bookings(&self) -> ClientResult<Vec<Booking>> {
        self.fetch_list("list bookings", "/api/Bookings").await
    }

    async fn create_room(&self, request: &RoomRequest) -> ClientResult<Option<Room>> {
        self.write("create room", Method::POST, "/api/Rooms", request)
            .await
    }

    async fn update_room(&self, id: RoomId, request: &RoomRequest) -> ClientResult<Option<Room>> {
        self.write("update room", Method::PUT, &format!("/api/Rooms/{id}"), request)
            .await
    }

    async fn delete_room(&self, id: RoomId) -> ClientResult<()> {
        self.delete("delete room", &format!("/api/Rooms/{id}")).await
    }

    async fn create_booking(&self, request: &BookingRequest) -> ClientResult<Option<Booking>> {
        self.write("create booking", Method::POST, "/api/Bookings", request)
            .await
    }

    async fn update_booking(
        &self,
        id: BookingId,
        request: &BookingRequest,
    ) -> ClientResult<Option<Booking>> {
        self.write(
            "update booking",
            Method::PUT,
            &format!("/api/Bookings/{id}"),
            request,
        )
        .await
    }

    async fn set_booking_status(&self, id: BookingId, status: BookingStatus) -> ClientResult<()> {
        self.write::<_, serde_json::Value>(
            "set booking status",
            Method::PUT,
            &format!("/api/Bookings/{id}/status"),
            &StatusRequest { status },
        )
        .await
        .map(drop)
    }

    async fn delete_booking(&self, id: BookingId) -> ClientResult<()> {
        self.delete("delete booking", &format!("/api/Bookings/{id}"))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_base_url_trailing_slashes_are_dropped() {
        let gateway = HttpGateway::new("http://localhost:5157//");
        assert_eq!(gateway.base_url(), "http://localhost:5157");
    }

    #[test]
    fn test_from_config_copies_settings() {
        let config = ApiConfig {
            base_url: "http://rooms.test/".to_string(),
            timeout_seconds: Some(5),
            api_key: Some("secret".to_string()),
        };
        let gateway = HttpGateway::from_config(&config).unwrap();

        assert_eq!(gateway.base_url(), "http://rooms.test");
        assert_eq!(gateway.api_key.as_deref(), Some("secret"));
    }

    #[test]
    fn test_with_api_key() {
        let gateway = HttpGateway::new("http://x").with_api_key("k");
        assert_eq!(gateway.api_key.as_deref(), Some("k"));
    }
}
