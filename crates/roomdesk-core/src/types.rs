//! Core data types exchanged with the booking API

use crate::{Error, Result};
use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::{fmt, str::FromStr};
use validator::Validate;

/// Room identifier type
pub type RoomId = i64;

/// Booking identifier type
pub type BookingId = i64;

/// Fallback text used as a room description when the operator gives none
pub const DEFAULT_ROOM_DESCRIPTION: &str = "Ruangan Kampus";

/// Accepted naive date-time layouts, tried in order after RFC 3339.
const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// A booking instant as exchanged with the API
///
/// The API sends local wall-clock times without an offset, sometimes with a
/// fractional-second suffix. Values carrying an offset keep their wall-clock
/// time; the offset itself is dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(NaiveDateTime);

impl Timestamp {
    /// Wrap a naive date-time
    pub const fn new(value: NaiveDateTime) -> Self {
        Self(value)
    }

    /// The underlying naive date-time
    pub const fn as_naive(&self) -> NaiveDateTime {
        self.0
    }

    /// Parse an API or operator supplied date-time
    ///
    /// # Errors
    ///
    /// Returns a validation error if none of the accepted layouts match.
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();

        if let Ok(with_offset) = DateTime::parse_from_rfc3339(trimmed) {
            return Ok(Self(with_offset.naive_local()));
        }

        NAIVE_FORMATS
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
            .map(Self)
            .ok_or_else(|| {
                Error::validation(
                    "timestamp",
                    format!("'{trimmed}' is not a date-time like 2025-01-10T09:00"),
                )
            })
    }

    /// Text form used in edit fields and request bodies (sub-second part dropped)
    pub fn to_editable(&self) -> String {
        self.0.format("%Y-%m-%dT%H:%M:%S").to_string()
    }

    /// Short form used in tables
    pub fn to_display(&self) -> String {
        self.0.format("%d/%m/%Y %H:%M").to_string()
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_editable())
    }
}

impl FromStr for Timestamp {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_editable())
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// Approval status of a booking
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum BookingStatus {
    /// Awaiting a decision
    Pending,
    /// Accepted by an operator
    Approved,
    /// Declined by an operator
    Rejected,
}

impl BookingStatus {
    /// All statuses in display order
    pub const ALL: [Self; 3] = [Self::Pending, Self::Approved, Self::Rejected];

    /// Whether no further transition is possible
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Pending)
    }

    /// Whether an operator may move a booking from `self` to `next`
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Approved | Self::Rejected)
        )
    }

    /// Check a requested transition
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidTransition`] for anything but `Pending -> Approved`
    /// or `Pending -> Rejected`.
    pub fn transition_to(self, next: Self) -> Result<Self> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(Error::InvalidTransition {
                from: self,
                to: next,
            })
        }
    }

    /// Wire name of the status
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Approved => "Approved",
            Self::Rejected => "Rejected",
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookingStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                Error::validation("status", format!("'{s}' is not Pending, Approved or Rejected"))
            })
    }
}

/// Server-maintained, newline-delimited log of status changes
///
/// A `null` or missing history on the wire decodes to an empty one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct StatusHistory(String);

impl StatusHistory {
    /// Wrap raw history text
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Raw newline-joined text
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Non-blank entries, oldest first
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.0
            .split('\n')
            .map(|line| line.trim_end_matches('\r'))
            .filter(|line| !line.trim().is_empty())
    }

    /// Most recent entry
    pub fn last_line(&self) -> Option<&str> {
        self.lines().last()
    }

    /// Whether the log carries no entries
    pub fn is_empty(&self) -> bool {
        self.lines().next().is_none()
    }

    /// Append an entry (used by the in-process server stand-in)
    pub fn push(&mut self, entry: &str) {
        if !self.0.is_empty() {
            self.0.push('\n');
        }
        self.0.push_str(entry);
    }
}

impl Serialize for StatusHistory {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for StatusHistory {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        Ok(Self(Option::<String>::deserialize(deserializer)?.unwrap_or_default()))
    }
}

/// A bookable physical space
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    /// Identifier assigned by the API
    pub id: RoomId,
    /// Display name
    pub name: String,
    /// Free-form description; `null` on the wire decodes to empty
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
    /// Number of people the room holds
    pub capacity: u32,
}

fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// A request to use a room for an interval
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    /// Identifier assigned by the API
    pub id: BookingId,
    /// Referenced room; may point at a deleted room
    pub room_id: RoomId,
    /// Person who asked for the room
    pub borrower_name: String,
    /// Start of the booked interval
    pub booking_date: Timestamp,
    /// End of the booked interval
    pub end_time: Timestamp,
    /// Approval status
    pub status: BookingStatus,
    /// Status change log
    #[serde(default)]
    pub status_history: StatusHistory,
}

impl Booking {
    /// Whether the booking still awaits a decision
    pub const fn is_pending(&self) -> bool {
        matches!(self.status, BookingStatus::Pending)
    }
}

/// Body of `POST /api/Rooms` and `PUT /api/Rooms/{id}`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RoomRequest {
    /// Display name
    #[validate(length(min = 1, max = 200, message = "must not be empty"))]
    pub name: String,
    /// Number of people the room holds
    #[validate(range(min = 1, message = "must be at least 1"))]
    pub capacity: u32,
    /// Free-form description
    #[validate(length(max = 1000))]
    pub description: String,
}

/// Body of `POST /api/Bookings` and `PUT /api/Bookings/{id}`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    /// Referenced room
    pub room_id: RoomId,
    /// Person who asks for the room
    #[validate(length(min = 1, max = 200, message = "must not be empty"))]
    pub borrower_name: String,
    /// Start of the interval
    pub booking_date: Timestamp,
    /// End of the interval
    pub end_time: Timestamp,
}

impl BookingRequest {
    /// Validate field rules and the interval ordering
    ///
    /// # Errors
    ///
    /// Returns a validation error naming the first offending field.
    pub fn check(&self) -> Result<()> {
        self.validate()?;
        if self.end_time <= self.booking_date {
            return Err(Error::validation("endTime", "must be after the start time"));
        }
        Ok(())
    }
}

/// Body of `PUT /api/Bookings/{id}/status`
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatusRequest {
    /// Requested status
    pub status: BookingStatus,
}
