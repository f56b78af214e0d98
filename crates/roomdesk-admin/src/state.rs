//! Application state driven by [`update`](crate::update)

use crate::{AppError, AppResult, error::Notice};
use roomdesk_client::Snapshot;
use roomdesk_core::{
    Booking, BookingForm, BookingId, Config, ListQuery, Page, Room, RoomForm, RoomId,
    SortDirection, paginate,
};
use serde::Serialize;
use std::{fmt, num::NonZeroUsize, str::FromStr};

/// Top-level screens
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tab {
    /// Summary statistics
    #[default]
    Dashboard,
    /// Room list
    Rooms,
    /// Booking list with approve/reject
    Bookings,
    /// Last status change per booking
    History,
}

impl Tab {
    /// All tabs in display order
    pub const ALL: [Self; 4] = [Self::Dashboard, Self::Rooms, Self::Bookings, Self::History];

    /// Sort direction a tab opens with
    pub const fn default_direction(self) -> SortDirection {
        match self {
            Self::Rooms => SortDirection::Ascending,
            Self::Dashboard | Self::Bookings | Self::History => SortDirection::Descending,
        }
    }

    /// Short name
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Dashboard => "dashboard",
            Self::Rooms => "rooms",
            Self::Bookings => "bookings",
            Self::History => "history",
        }
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tab {
    type Err = roomdesk_core::Error;

    fn from_str(s: &str) -> roomdesk_core::Result<Self> {
        Self::ALL
            .into_iter()
            .find(|tab| tab.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| roomdesk_core::Error::validation("tab", format!("unknown tab '{s}'")))
    }
}

/// Record awaiting delete confirmation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "id", rename_all = "lowercase")]
pub enum DeleteTarget {
    /// A room
    Room(RoomId),
    /// A booking
    Booking(BookingId),
}

/// Values taken from configuration once at start-up
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Rows per page for a fresh session
    pub page_size: NonZeroUsize,
    /// Page sizes the operator may choose
    pub page_size_options: Vec<NonZeroUsize>,
    /// Description used for rooms submitted without one
    pub default_room_description: String,
}

impl Settings {
    /// Derive settings from configuration
    ///
    /// # Errors
    ///
    /// Returns a configuration error when the page size is zero.
    pub fn from_config(config: &Config) -> AppResult<Self> {
        let page_size = NonZeroUsize::new(config.listing.page_size).ok_or_else(|| {
            roomdesk_core::Error::Configuration {
                message: "listing.page_size must be greater than zero".to_string(),
            }
        })?;
        let mut page_size_options: Vec<_> = config
            .listing
            .page_size_options
            .iter()
            .copied()
            .filter_map(NonZeroUsize::new)
            .collect();
        if !page_size_options.contains(&page_size) {
            page_size_options.push(page_size);
        }
        page_size_options.sort_unstable();
        page_size_options.dedup();

        Ok(Self {
            page_size,
            page_size_options,
            default_room_description: config.forms.default_room_description.clone(),
        })
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::from_config(&Config::default()).unwrap_or_else(|_| Self {
            page_size: NonZeroUsize::MIN,
            page_size_options: vec![NonZeroUsize::MIN],
            default_room_description: roomdesk_core::types::DEFAULT_ROOM_DESCRIPTION.to_string(),
        })
    }
}

/// Everything the front-end shows, owned in one place
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    /// Current screen
    pub tab: Tab,
    /// Rooms as last fetched
    pub rooms: Vec<Room>,
    /// Bookings as last fetched
    pub bookings: Vec<Booking>,
    /// Search, sort and page shared by the list tabs
    pub query: ListQuery,
    /// Room form
    pub room_form: RoomForm,
    /// Booking form
    pub booking_form: BookingForm,
    /// Booking whose full history is open
    pub history_view: Option<BookingId>,
    /// Delete waiting for confirmation
    pub pending_delete: Option<DeleteTarget>,
    /// Error raised by the last event, if any
    pub last_error: Option<Notice>,
    /// Start-up settings
    pub settings: Settings,
}

impl Default for AppState {
    fn default() -> Self {
        Self::with_settings(Settings::default())
    }
}

impl AppState {
    /// Empty state on the dashboard
    pub fn with_settings(settings: Settings) -> Self {
        let tab = Tab::default();
        Self {
            tab,
            rooms: Vec::new(),
            bookings: Vec::new(),
            query: ListQuery::new(tab.default_direction(), settings.page_size),
            room_form: RoomForm::default(),
            booking_form: BookingForm::default(),
            history_view: None,
            pending_delete: None,
            last_error: None,
            settings,
        }
    }

    /// Empty state using configured defaults
    ///
    /// # Errors
    ///
    /// Returns a configuration error when listing settings are unusable.
    pub fn new(config: &Config) -> AppResult<Self> {
        Ok(Self::with_settings(Settings::from_config(config)?))
    }

    /// Replace both collections with a fresh fetch
    pub fn apply_snapshot(&mut self, snapshot: Snapshot) {
        self.rooms = snapshot.rooms;
        self.bookings = snapshot.bookings;
    }

    /// Look up a loaded room
    pub fn room(&self, id: RoomId) -> Option<&Room> {
        self.rooms.iter().find(|room| room.id == id)
    }

    /// Look up a loaded booking
    pub fn booking(&self, id: BookingId) -> Option<&Booking> {
        self.bookings.iter().find(|booking| booking.id == id)
    }

    pub(crate) fn require_room(&self, id: RoomId) -> AppResult<&Room> {
        self.room(id).ok_or_else(|| AppError::unknown_room(id))
    }

    pub(crate) fn require_booking(&self, id: BookingId) -> AppResult<&Booking> {
        self.booking(id).ok_or_else(|| AppError::unknown_booking(id))
    }

    /// Current page of rooms
    pub fn room_page(&self) -> Page<'_, Room> {
        paginate(&self.rooms, &self.query)
    }

    /// Current page of bookings (also used by the history tab)
    pub fn booking_page(&self) -> Page<'_, Booking> {
        paginate(&self.bookings, &self.query)
    }

    /// Total pages of the list the current tab shows, if it shows one
    pub fn current_total_pages(&self) -> Option<usize> {
        match self.tab {
            Tab::Dashboard => None,
            Tab::Rooms => Some(self.room_page().total_pages),
            Tab::Bookings | Tab::History => Some(self.booking_page().total_pages),
        }
    }
}
