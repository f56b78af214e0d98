//! End-to-end front-end flows against the in-process gateway

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

mod common;

use common::{booking, campus, loaded_state, room};
use pretty_assertions::assert_eq;
use roomdesk_admin::{AppState, DeleteTarget, ErrorClass, Event, Tab, update};
use roomdesk_client::{Gateway, InMemoryGateway};
use roomdesk_core::{
    BookingStatus, FormMode, SortDirection,
    forms::{BookingField, RoomField},
};

#[tokio::test]
async fn test_approve_booking_shows_new_status_and_history() {
    let gateway = campus();
    let mut state = loaded_state(&gateway).await;

    update(&mut state, &gateway, Event::ChangeStatus(7, BookingStatus::Approved))
        .await
        .unwrap();

    let booking = state.booking(7).unwrap();
    assert_eq!(booking.status, BookingStatus::Approved);
    assert!(!booking.status_history.is_empty());
    assert!(
        booking
            .status_history
            .last_line()
            .unwrap()
            .contains("Approved")
    );
}

#[tokio::test]
async fn test_terminal_status_is_rejected_before_network() {
    let gateway = campus();
    let mut state = loaded_state(&gateway).await;
    update(&mut state, &gateway, Event::ChangeStatus(7, BookingStatus::Rejected))
        .await
        .unwrap();
    let writes = gateway.write_count();

    let err = update(&mut state, &gateway, Event::ChangeStatus(7, BookingStatus::Approved))
        .await
        .unwrap_err();

    assert_eq!(err.class(), ErrorClass::InvalidInput);
    assert_eq!(gateway.write_count(), writes);
    assert_eq!(state.booking(7).unwrap().status, BookingStatus::Rejected);
    assert_eq!(
        state.last_error.as_ref().map(|n| n.class),
        Some(ErrorClass::InvalidInput)
    );
}

#[tokio::test]
async fn test_deleted_room_leaves_booking_with_placeholder_label() {
    let gateway = campus();
    let mut state = loaded_state(&gateway).await;

    update(&mut state, &gateway, Event::RequestDelete(DeleteTarget::Room(3)))
        .await
        .unwrap();
    update(&mut state, &gateway, Event::ConfirmDelete).await.unwrap();

    assert!(state.room(3).is_none());
    let rows = state.bookings_view().rows;
    let row = rows.iter().find(|r| r.id == 9).unwrap();
    assert_eq!(row.room, "Ruang #3");
    assert_eq!(state.pending_delete, None);
}

#[tokio::test]
async fn test_cancelled_delete_keeps_record() {
    let gateway = campus();
    let mut state = loaded_state(&gateway).await;

    update(&mut state, &gateway, Event::RequestDelete(DeleteTarget::Booking(9)))
        .await
        .unwrap();
    update(&mut state, &gateway, Event::CancelDelete).await.unwrap();

    let err = update(&mut state, &gateway, Event::ConfirmDelete)
        .await
        .unwrap_err();
    assert_eq!(err.class(), ErrorClass::Cancelled);
    assert_eq!(gateway.bookings().len(), 2);
}

#[tokio::test]
async fn test_reload_without_mutation_is_idempotent() {
    let gateway = campus();
    let mut state = loaded_state(&gateway).await;
    let before = state.clone();

    update(&mut state, &gateway, Event::Refresh).await.unwrap();

    assert_eq!(state, before);
}

#[tokio::test]
async fn test_failed_submit_keeps_form_open_and_collections_intact() {
    let gateway = campus();
    let mut state = loaded_state(&gateway).await;

    update(&mut state, &gateway, Event::NewRoom).await.unwrap();
    update(
        &mut state,
        &gateway,
        Event::SetRoomField(RoomField::Name, "Studio".to_string()),
    )
    .await
    .unwrap();
    update(
        &mut state,
        &gateway,
        Event::SetRoomField(RoomField::Capacity, "25".to_string()),
    )
    .await
    .unwrap();

    gateway.fail_with(500);
    let err = update(&mut state, &gateway, Event::SubmitRoom)
        .await
        .unwrap_err();

    assert_eq!(err.class(), ErrorClass::Rejected);
    assert!(state.room_form.is_open());
    assert_eq!(state.room_form.name, "Studio");
    assert_eq!(state.rooms.len(), 3);

    gateway.recover();
    update(&mut state, &gateway, Event::SubmitRoom).await.unwrap();
    assert!(!state.room_form.is_open());
    assert_eq!(state.room_form.mode(), FormMode::Creating);
    assert!(state.rooms.iter().any(|r| r.name == "Studio"));
    assert_eq!(state.last_error, None);
}

#[tokio::test]
async fn test_invalid_capacity_never_reaches_gateway() {
    let gateway = campus();
    let mut state = loaded_state(&gateway).await;

    update(&mut state, &gateway, Event::EditRoom(2)).await.unwrap();
    update(
        &mut state,
        &gateway,
        Event::SetRoomField(RoomField::Capacity, "banyak".to_string()),
    )
    .await
    .unwrap();

    let err = update(&mut state, &gateway, Event::SubmitRoom)
        .await
        .unwrap_err();
    assert_eq!(err.class(), ErrorClass::InvalidInput);
    assert_eq!(gateway.write_count(), 0);
    assert_eq!(state.room_form.mode(), FormMode::Editing(2));
}

#[tokio::test]
async fn test_edit_booking_round_trips_through_gateway() {
    let gateway = campus();
    let mut state = loaded_state(&gateway).await;
    state.tab = Tab::Bookings;

    update(&mut state, &gateway, Event::EditBooking(9)).await.unwrap();
    assert_eq!(state.booking_form.booking_date, "2025-01-12T09:00:00");

    update(
        &mut state,
        &gateway,
        Event::SetBookingField(BookingField::BorrowerName, "Budi Santoso".to_string()),
    )
    .await
    .unwrap();
    update(&mut state, &gateway, Event::SubmitBooking).await.unwrap();

    assert_eq!(state.booking(9).unwrap().borrower_name, "Budi Santoso");
    assert_eq!(state.tab, Tab::Bookings);
}

#[tokio::test]
async fn test_booking_created_from_dashboard_opens_bookings_tab() {
    let gateway = campus();
    let mut state = loaded_state(&gateway).await;
    assert_eq!(state.tab, Tab::Dashboard);

    update(&mut state, &gateway, Event::NewBooking).await.unwrap();
    for (field, value) in [
        (BookingField::RoomId, "2"),
        (BookingField::BorrowerName, "Citra"),
        (BookingField::BookingDate, "2025-02-01T13:00"),
        (BookingField::EndTime, "2025-02-01T15:00"),
    ] {
        update(
            &mut state,
            &gateway,
            Event::SetBookingField(field, value.to_string()),
        )
        .await
        .unwrap();
    }
    update(&mut state, &gateway, Event::SubmitBooking).await.unwrap();

    assert_eq!(state.tab, Tab::Bookings);
    assert_eq!(state.bookings.len(), 3);
    let newest = &state.bookings_view().rows[0];
    assert_eq!(newest.borrower, "Citra");
    assert_eq!(newest.status, BookingStatus::Pending);
}

#[tokio::test]
async fn test_tab_switch_resets_search_page_and_sort() {
    let gateway = campus();
    let mut state = loaded_state(&gateway).await;

    update(&mut state, &gateway, Event::SwitchTab(Tab::Bookings)).await.unwrap();
    update(&mut state, &gateway, Event::Search("budi".to_string())).await.unwrap();
    update(&mut state, &gateway, Event::ToggleSort).await.unwrap();
    update(&mut state, &gateway, Event::GoToPage(4)).await.unwrap();

    update(&mut state, &gateway, Event::SwitchTab(Tab::Rooms)).await.unwrap();

    assert_eq!(state.query.search, "");
    assert_eq!(state.query.page, 1);
    assert_eq!(state.query.direction, SortDirection::Ascending);
}

#[tokio::test]
async fn test_twelve_bookings_paginate_into_three_pages() {
    let bookings = (1..=12)
        .map(|i| booking(i, 1, &format!("Peminjam {i}"), u32::try_from(i).unwrap()))
        .collect();
    let gateway = InMemoryGateway::with_records(vec![room(1, "Aula")], bookings);
    let mut state = loaded_state(&gateway).await;

    update(&mut state, &gateway, Event::SwitchTab(Tab::Bookings)).await.unwrap();
    update(&mut state, &gateway, Event::NextPage).await.unwrap();
    update(&mut state, &gateway, Event::NextPage).await.unwrap();
    update(&mut state, &gateway, Event::NextPage).await.unwrap();

    let view = state.bookings_view();
    assert_eq!(view.page, 3);
    assert_eq!(view.total_pages, 3);
    assert_eq!(view.rows.len(), 2);
    assert!(!view.has_next);

    // Page size change goes back to page 1.
    update(&mut state, &gateway, Event::SetPageSize(10)).await.unwrap();
    assert_eq!(state.query.page, 1);
    assert_eq!(state.bookings_view().total_pages, 2);
}

#[tokio::test]
async fn test_page_size_outside_options_is_invalid() {
    let gateway = campus();
    let mut state = loaded_state(&gateway).await;

    let err = update(&mut state, &gateway, Event::SetPageSize(7))
        .await
        .unwrap_err();
    assert_eq!(err.class(), ErrorClass::InvalidInput);
    assert_eq!(state.query.page_size.get(), 5);
}

#[tokio::test]
async fn test_stale_page_after_search_shows_nothing_until_reset() {
    let gateway = campus();
    let mut state = loaded_state(&gateway).await;
    update(&mut state, &gateway, Event::SwitchTab(Tab::Rooms)).await.unwrap();

    update(&mut state, &gateway, Event::GoToPage(3)).await.unwrap();
    assert!(state.rooms_view().rows.is_empty());

    update(&mut state, &gateway, Event::Search("lab".to_string())).await.unwrap();
    let names: Vec<String> = state.rooms_view().rows.into_iter().map(|r| r.name).collect();
    assert_eq!(names, vec!["Lab Komputer".to_string()]);
}

#[tokio::test]
async fn test_history_view_lists_every_entry() {
    let gateway = campus();
    let mut state = loaded_state(&gateway).await;
    update(&mut state, &gateway, Event::ChangeStatus(9, BookingStatus::Rejected))
        .await
        .unwrap();

    update(&mut state, &gateway, Event::ShowHistory(9)).await.unwrap();
    let detail = state.history_detail().unwrap();
    assert_eq!(detail.room, "Ruang Rapat");
    assert_eq!(detail.entries.len(), 2);

    update(&mut state, &gateway, Event::CloseHistory).await.unwrap();
    assert_eq!(state.history_detail(), None);
}

#[tokio::test]
async fn test_unknown_records_are_invalid_input() {
    let gateway = campus();
    let mut state = loaded_state(&gateway).await;

    for event in [
        Event::EditRoom(99),
        Event::EditBooking(99),
        Event::ShowHistory(99),
        Event::ChangeStatus(99, BookingStatus::Approved),
        Event::RequestDelete(DeleteTarget::Room(99)),
    ] {
        let err = update(&mut state, &gateway, event).await.unwrap_err();
        assert_eq!(err.class(), ErrorClass::InvalidInput);
    }
    assert_eq!(gateway.write_count(), 0);
}

#[tokio::test]
async fn test_failed_reload_keeps_previous_collections() {
    let gateway = campus();
    let mut state = loaded_state(&gateway).await;

    gateway.fail_with(503);
    let err = update(&mut state, &gateway, Event::Refresh).await.unwrap_err();

    assert_eq!(err.class(), ErrorClass::Rejected);
    assert_eq!(state.rooms.len(), 3);
    assert_eq!(state.bookings.len(), 2);
}

#[tokio::test]
async fn test_update_accepts_trait_objects() {
    let gateway: Box<dyn Gateway> = Box::new(campus());
    let mut state = AppState::default();

    update(&mut state, gateway.as_ref(), Event::Refresh).await.unwrap();
    assert_eq!(state.dashboard().total_rooms, 3);
    assert_eq!(state.dashboard().pending_bookings, 2);
}
