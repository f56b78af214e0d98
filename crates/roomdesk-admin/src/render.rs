//! Text and JSON rendering of views

use crate::views::{BookingRow, DashboardStats, HistoryDetail, HistoryRow, ListView, RoomRow};
use roomdesk_core::utils::truncate_chars;
use serde::Serialize;

/// Widest a history cell gets in the table
const HISTORY_CELL_WIDTH: usize = 60;

/// Output format for command results
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Aligned text table
    #[default]
    Table,
    /// Pretty-printed JSON
    Json,
}

/// Render any serialisable view as pretty JSON
///
/// # Errors
///
/// Returns an error if serialisation fails.
pub fn json<T: Serialize>(value: &T) -> roomdesk_core::Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Lay out rows under a header with space-padded columns
pub fn table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    let header: Vec<String> = headers.iter().map(ToString::to_string).collect();
    push_line(&mut out, &widths, &header);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    push_line(&mut out, &widths, &rule);
    for row in rows {
        push_line(&mut out, &widths, row);
    }
    out
}

fn push_line(out: &mut String, widths: &[usize], cells: &[String]) {
    let line: Vec<String> = widths
        .iter()
        .zip(cells)
        .map(|(width, cell)| format!("{cell:<width$}"))
        .collect();
    out.push_str(line.join("  ").trim_end());
    out.push('\n');
}

fn footer<R>(view: &ListView<R>) -> String {
    let mut line = format!(
        "Page {} of {} ({} matching, {} per page, {})",
        view.page, view.total_pages, view.filtered_count, view.page_size, view.direction
    );
    if !view.search.is_empty() {
        line.push_str(&format!(", search \"{}\"", view.search));
    }
    line
}

/// Dashboard as a two-column table
pub fn dashboard(stats: &DashboardStats) -> String {
    let rows = [
        ("Total rooms", stats.total_rooms),
        ("Total bookings", stats.total_bookings),
        ("Pending", stats.pending_bookings),
        ("Approved", stats.approved_bookings),
        ("Rejected", stats.rejected_bookings),
        ("With history", stats.bookings_with_history),
    ]
    .map(|(label, value)| vec![label.to_string(), value.to_string()]);
    table(&["Statistic", "Value"], &rows)
}

/// Room list
pub fn rooms(view: &ListView<RoomRow>) -> String {
    let rows: Vec<Vec<String>> = view
        .rows
        .iter()
        .map(|r| {
            vec![
                r.id.to_string(),
                r.name.clone(),
                r.capacity.to_string(),
                r.description.clone(),
            ]
        })
        .collect();
    format!(
        "{}{}\n",
        table(&["ID", "Name", "Capacity", "Description"], &rows),
        footer(view)
    )
}

/// Booking list
pub fn bookings(view: &ListView<BookingRow>) -> String {
    let rows: Vec<Vec<String>> = view
        .rows
        .iter()
        .map(|r| {
            vec![
                r.id.to_string(),
                r.borrower.clone(),
                r.room.clone(),
                r.start.clone(),
                r.end.clone(),
                r.status.to_string(),
            ]
        })
        .collect();
    format!(
        "{}{}\n",
        table(&["ID", "Borrower", "Room", "Start", "End", "Status"], &rows),
        footer(view)
    )
}

/// History list
pub fn history(view: &ListView<HistoryRow>) -> String {
    let rows: Vec<Vec<String>> = view
        .rows
        .iter()
        .map(|r| {
            vec![
                r.id.to_string(),
                r.borrower.clone(),
                r.room.clone(),
                r.status.to_string(),
                truncate_chars(&r.last_entry, HISTORY_CELL_WIDTH).into_owned(),
            ]
        })
        .collect();
    format!(
        "{}{}\n",
        table(&["ID", "Borrower", "Room", "Status", "Last entry"], &rows),
        footer(view)
    )
}

/// Full history of one booking
pub fn history_detail(detail: &HistoryDetail) -> String {
    let mut out = format!(
        "Booking #{} - {} ({}) - {}\n",
        detail.booking_id, detail.borrower, detail.room, detail.status
    );
    if detail.entries.is_empty() {
        out.push_str("  ");
        out.push_str(roomdesk_core::utils::NO_HISTORY_TEXT);
        out.push('\n');
    }
    for entry in &detail.entries {
        out.push_str("  ");
        out.push_str(entry);
        out.push('\n');
    }
    out
}
