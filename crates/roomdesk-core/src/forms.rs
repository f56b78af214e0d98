//! Edit state for the room and booking forms
//!
//! Each form is either creating a new record or editing an existing one. The
//! fields are kept as the text the operator typed; they are only parsed when
//! a request is built, so a failed submit leaves them exactly as entered.

use crate::{
    Error, Result,
    types::{Booking, BookingId, BookingRequest, Room, RoomId, RoomRequest, Timestamp},
};
use validator::Validate;

/// Whether a form creates a record or edits the one with the given id
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FormMode<Id> {
    /// No identifier; submit creates
    #[default]
    Creating,
    /// Identifier set; submit updates
    Editing(Id),
}

impl<Id: Copy> FormMode<Id> {
    /// Identifier being edited, if any
    pub const fn id(&self) -> Option<Id> {
        match self {
            Self::Creating => None,
            Self::Editing(id) => Some(*id),
        }
    }
}

/// Editable fields of the room form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomField {
    /// Room name
    Name,
    /// Capacity, as typed
    Capacity,
    /// Description
    Description,
}

/// Room create/edit form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoomForm {
    mode: FormMode<RoomId>,
    open: bool,
    /// Room name
    pub name: String,
    /// Capacity as typed
    pub capacity: String,
    /// Description; blank means the configured default
    pub description: String,
}

impl RoomForm {
    /// Open a blank form for a new room
    pub fn open_new(&mut self) {
        *self = Self {
            open: true,
            ..Self::default()
        };
    }

    /// Open the form pre-filled from an existing room
    pub fn open_edit(&mut self, room: &Room) {
        *self = Self {
            mode: FormMode::Editing(room.id),
            open: true,
            name: room.name.clone(),
            capacity: room.capacity.to_string(),
            description: room.description.clone(),
        };
    }

    /// Replace one field
    pub fn set(&mut self, field: RoomField, value: impl Into<String>) {
        let value = value.into();
        match field {
            RoomField::Name => self.name = value,
            RoomField::Capacity => self.capacity = value,
            RoomField::Description => self.description = value,
        }
    }

    /// Hide the form without touching its fields
    pub const fn close(&mut self) {
        self.open = false;
    }

    /// Reset to a closed, blank creating form (after a successful submit)
    pub fn finish(&mut self) {
        *self = Self::default();
    }

    /// Current mode
    pub const fn mode(&self) -> FormMode<RoomId> {
        self.mode
    }

    /// Whether the editing surface is shown
    pub const fn is_open(&self) -> bool {
        self.open
    }

    /// Build the request body
    ///
    /// # Errors
    ///
    /// Returns a validation error for a blank name or a capacity that is not a
    /// positive whole number.
    pub fn to_request(&self, default_description: &str) -> Result<RoomRequest> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(Error::validation("name", "must not be empty"));
        }

        let capacity = self
            .capacity
            .trim()
            .parse::<u32>()
            .ok()
            .filter(|c| *c > 0)
            .ok_or_else(|| {
                Error::validation(
                    "capacity",
                    format!("'{}' is not a positive whole number", self.capacity.trim()),
                )
            })?;

        let description = match self.description.trim() {
            "" => default_description.to_string(),
            text => text.to_string(),
        };

        let request = RoomRequest {
            name: name.to_string(),
            capacity,
            description,
        };
        request.validate()?;
        Ok(request)
    }
}

/// Editable fields of the booking form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingField {
    /// Room identifier, as typed or picked
    RoomId,
    /// Borrower name
    BorrowerName,
    /// Start date-time
    BookingDate,
    /// End date-time
    EndTime,
}

/// Booking create/edit form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookingForm {
    mode: FormMode<BookingId>,
    open: bool,
    /// Room identifier as typed
    pub room_id: String,
    /// Borrower name
    pub borrower_name: String,
    /// Start date-time as typed
    pub booking_date: String,
    /// End date-time as typed
    pub end_time: String,
}

impl BookingForm {
    /// Open a blank form for a new booking
    pub fn open_new(&mut self) {
        *self = Self {
            open: true,
            ..Self::default()
        };
    }

    /// Open the form pre-filled from an existing booking
    pub fn open_edit(&mut self, booking: &Booking) {
        *self = Self {
            mode: FormMode::Editing(booking.id),
            open: true,
            room_id: booking.room_id.to_string(),
            borrower_name: booking.borrower_name.clone(),
            booking_date: booking.booking_date.to_editable(),
            end_time: booking.end_time.to_editable(),
        };
    }

    /// Replace one field
    pub fn set(&mut self, field: BookingField, value: impl Into<String>) {
        let value = value.into();
        match field {
            BookingField::RoomId => self.room_id = value,
            BookingField::BorrowerName => self.borrower_name = value,
            BookingField::BookingDate => self.booking_date = value,
            BookingField::EndTime => self.end_time = value,
        }
    }

    /// Hide the form without touching its fields
    pub const fn close(&mut self) {
        self.open = false;
    }

    /// Reset to a closed, blank creating form (after a successful submit)
    pub fn finish(&mut self) {
        *self = Self::default();
    }

    /// Current mode
    pub const fn mode(&self) -> FormMode<BookingId> {
        self.mode
    }

    /// Whether the editing surface is shown
    pub const fn is_open(&self) -> bool {
        self.open
    }

    /// Build the request body
    ///
    /// # Errors
    ///
    /// Returns a validation error naming the first field that does not parse,
    /// or `endTime` when the interval is empty or reversed.
    pub fn to_request(&self) -> Result<BookingRequest> {
        let room_id = self.room_id.trim().parse::<RoomId>().map_err(|_| {
            Error::validation(
                "roomId",
                format!("'{}' is not a room number", self.room_id.trim()),
            )
        })?;

        let borrower_name = self.borrower_name.trim();
        if borrower_name.is_empty() {
            return Err(Error::validation("borrowerName", "must not be empty"));
        }

        let booking_date = parse_field("bookingDate", &self.booking_date)?;
        let end_time = parse_field("endTime", &self.end_time)?;

        let request = BookingRequest {
            room_id,
            borrower_name: borrower_name.to_string(),
            booking_date,
            end_time,
        };
        request.check()?;
        Ok(request)
    }
}

fn parse_field(field: &str, raw: &str) -> Result<Timestamp> {
    Timestamp::parse(raw).map_err(|e| match e {
        Error::Validation { message, .. } => Error::validation(field, message),
        other => other,
    })
}
