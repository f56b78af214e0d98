//! Operator events and the single function that applies them
//!
//! Every mutation goes through the gateway and, when it succeeds, is followed
//! by a full reload of both collections. A failed event leaves the
//! collections and the forms exactly as they were and records the error in
//! [`AppState::last_error`].

use crate::{
    AppError, AppResult,
    error::Notice,
    state::{AppState, DeleteTarget, Tab},
};
use roomdesk_client::Gateway;
use roomdesk_core::{
    BookingId, BookingStatus, FormMode, ListQuery, RoomId, SortDirection,
    forms::{BookingField, RoomField},
};
use std::num::NonZeroUsize;
use tracing::{debug, info};

/// Something the operator did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Open another tab; resets search, page and sort
    SwitchTab(Tab),
    /// Replace the search text; resets page
    Search(String),
    /// Flip the sort direction; keeps page
    ToggleSort,
    /// Set the sort direction; keeps page
    SetSort(SortDirection),
    /// Pick a page size from the configured options; resets page
    SetPageSize(usize),
    /// Go forward one page when there is one
    NextPage,
    /// Go back one page when there is one
    PrevPage,
    /// Jump to a page; out-of-range pages show nothing
    GoToPage(usize),
    /// Fetch both collections again
    Refresh,

    /// Open a blank room form
    NewRoom,
    /// Open the room form on an existing room
    EditRoom(RoomId),
    /// Type into the room form
    SetRoomField(RoomField, String),
    /// Create or update the room
    SubmitRoom,
    /// Hide the room form
    CloseRoomForm,

    /// Open a blank booking form
    NewBooking,
    /// Open the booking form on an existing booking
    EditBooking(BookingId),
    /// Type into the booking form
    SetBookingField(BookingField, String),
    /// Create or update the booking
    SubmitBooking,
    /// Hide the booking form
    CloseBookingForm,

    /// Ask to delete a record
    RequestDelete(DeleteTarget),
    /// Delete the record asked for
    ConfirmDelete,
    /// Forget the delete request
    CancelDelete,

    /// Approve or reject a pending booking
    ChangeStatus(BookingId, BookingStatus),

    /// Open the full status history of a booking
    ShowHistory(BookingId),
    /// Close the history view
    CloseHistory,
}

/// Apply one event
///
/// # Errors
///
/// Returns the error that stopped the event; it is also kept in
/// `state.last_error`.
pub async fn update<G>(state: &mut AppState, gateway: &G, event: Event) -> AppResult<()>
where
    G: Gateway + ?Sized,
{
    debug!(?event, "applying event");
    state.last_error = None;

    let result = apply(state, gateway, event).await;
    if let Err(ref error) = result {
        state.last_error = Some(Notice::from(error));
    }
    result
}

async fn apply<G>(state: &mut AppState, gateway: &G, event: Event) -> AppResult<()>
where
    G: Gateway + ?Sized,
{
    match event {
        Event::SwitchTab(tab) => {
            switch_tab(state, tab);
            Ok(())
        }
        Event::Search(text) => {
            state.query.set_search(text);
            Ok(())
        }
        Event::ToggleSort => {
            state.query.direction = state.query.direction.toggled();
            Ok(())
        }
        Event::SetSort(direction) => {
            state.query.direction = direction;
            Ok(())
        }
        Event::SetPageSize(size) => set_page_size(state, size),
        Event::NextPage => {
            if state
                .current_total_pages()
                .is_some_and(|total| state.query.page < total)
            {
                state.query.page += 1;
            }
            Ok(())
        }
        Event::PrevPage => {
            if state.query.page > 1 {
                state.query.page -= 1;
            }
            Ok(())
        }
        Event::GoToPage(page) => {
            state.query.page = page;
            Ok(())
        }
        Event::Refresh => reload(state, gateway).await,

        Event::NewRoom => {
            state.room_form.open_new();
            Ok(())
        }
        Event::EditRoom(id) => {
            let room = state.require_room(id)?.clone();
            state.room_form.open_edit(&room);
            Ok(())
        }
        Event::SetRoomField(field, value) => {
            state.room_form.set(field, value);
            Ok(())
        }
        Event::SubmitRoom => submit_room(state, gateway).await,
        Event::CloseRoomForm => {
            state.room_form.close();
            Ok(())
        }

        Event::NewBooking => {
            state.booking_form.open_new();
            Ok(())
        }
        Event::EditBooking(id) => {
            let booking = state.require_booking(id)?.clone();
            state.booking_form.open_edit(&booking);
            Ok(())
        }
        Event::SetBookingField(field, value) => {
            state.booking_form.set(field, value);
            Ok(())
        }
        Event::SubmitBooking => submit_booking(state, gateway).await,
        Event::CloseBookingForm => {
            state.booking_form.close();
            Ok(())
        }

        Event::RequestDelete(target) => {
            match target {
                DeleteTarget::Room(id) => {
                    state.require_room(id)?;
                }
                DeleteTarget::Booking(id) => {
                    state.require_booking(id)?;
                }
            }
            state.pending_delete = Some(target);
            Ok(())
        }
        Event::ConfirmDelete => confirm_delete(state, gateway).await,
        Event::CancelDelete => {
            state.pending_delete = None;
            Ok(())
        }

        Event::ChangeStatus(id, status) => change_status(state, gateway, id, status).await,

        Event::ShowHistory(id) => {
            state.require_booking(id)?;
            state.history_view = Some(id);
            Ok(())
        }
        Event::CloseHistory => {
            state.history_view = None;
            Ok(())
        }
    }
}

fn switch_tab(state: &mut AppState, tab: Tab) {
    state.tab = tab;
    state.query = ListQuery::new(tab.default_direction(), state.query.page_size);
}

fn set_page_size(state: &mut AppState, size: usize) -> AppResult<()> {
    let allowed = NonZeroUsize::new(size)
        .filter(|size| state.settings.page_size_options.contains(size))
        .ok_or_else(|| {
            let options: Vec<String> = state
                .settings
                .page_size_options
                .iter()
                .map(ToString::to_string)
                .collect();
            roomdesk_core::Error::validation(
                "pageSize",
                format!("{size} is not one of {}", options.join(", ")),
            )
        })?;
    state.query.set_page_size(allowed);
    Ok(())
}

async fn reload<G>(state: &mut AppState, gateway: &G) -> AppResult<()>
where
    G: Gateway + ?Sized,
{
    let snapshot = gateway.reload().await?;
    debug!(
        rooms = snapshot.rooms.len(),
        bookings = snapshot.bookings.len(),
        "collections reloaded"
    );
    state.apply_snapshot(snapshot);
    Ok(())
}

async fn submit_room<G>(state: &mut AppState, gateway: &G) -> AppResult<()>
where
    G: Gateway + ?Sized,
{
    let request = state
        .room_form
        .to_request(&state.settings.default_room_description)?;

    match state.room_form.mode() {
        FormMode::Creating => {
            gateway.create_room(&request).await?;
            info!(name = %request.name, "room created");
        }
        FormMode::Editing(id) => {
            gateway.update_room(id, &request).await?;
            info!(room_id = id, "room updated");
        }
    }

    state.room_form.finish();
    reload(state, gateway).await
}

async fn submit_booking<G>(state: &mut AppState, gateway: &G) -> AppResult<()>
where
    G: Gateway + ?Sized,
{
    let request = state.booking_form.to_request()?;

    match state.booking_form.mode() {
        FormMode::Creating => {
            gateway.create_booking(&request).await?;
            info!(room_id = request.room_id, "booking created");
        }
        FormMode::Editing(id) => {
            gateway.update_booking(id, &request).await?;
            info!(booking_id = id, "booking updated");
        }
    }

    state.booking_form.finish();
    if state.tab == Tab::Dashboard {
        switch_tab(state, Tab::Bookings);
    }
    reload(state, gateway).await
}

async fn confirm_delete<G>(state: &mut AppState, gateway: &G) -> AppResult<()>
where
    G: Gateway + ?Sized,
{
    let target = state.pending_delete.ok_or(AppError::Cancelled)?;

    match target {
        DeleteTarget::Room(id) => {
            gateway.delete_room(id).await?;
            info!(room_id = id, "room deleted");
        }
        DeleteTarget::Booking(id) => {
            gateway.delete_booking(id).await?;
            if state.history_view == Some(id) {
                state.history_view = None;
            }
            info!(booking_id = id, "booking deleted");
        }
    }

    state.pending_delete = None;
    reload(state, gateway).await
}

async fn change_status<G>(
    state: &mut AppState,
    gateway: &G,
    id: BookingId,
    status: BookingStatus,
) -> AppResult<()>
where
    G: Gateway + ?Sized,
{
    let current = state.require_booking(id)?.status;
    let next = current.transition_to(status)?;

    gateway.set_booking_status(id, next).await?;
    info!(booking_id = id, from = %current, to = %next, "booking status changed");

    reload(state, gateway).await
}
