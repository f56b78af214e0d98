//! List pipeline: filter, sort and paginate an in-memory collection
//!
//! The same pipeline serves rooms and bookings; each entity decides which
//! text field the search looks at and how two records compare through
//! [`Listable`]. Nothing here owns data: a [`Page`] borrows from the
//! collection it was cut from.

use crate::types::{Booking, Room};
use serde::{Deserialize, Serialize};
use std::{cmp::Ordering, fmt, num::NonZeroUsize, str::FromStr};

/// A record that can be searched and ordered by the list pipeline
pub trait Listable {
    /// Text the search query is matched against
    fn search_text(&self) -> &str;

    /// Ascending order of two records
    fn natural_cmp(&self, other: &Self) -> Ordering;
}

impl Listable for Room {
    fn search_text(&self) -> &str {
        &self.name
    }

    fn natural_cmp(&self, other: &Self) -> Ordering {
        self.name
            .to_lowercase()
            .cmp(&other.name.to_lowercase())
            .then_with(|| self.name.cmp(&other.name))
    }
}

impl Listable for Booking {
    fn search_text(&self) -> &str {
        &self.borrower_name
    }

    fn natural_cmp(&self, other: &Self) -> Ordering {
        self.booking_date.cmp(&other.booking_date)
    }
}

/// Sort direction shared by every list
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Smallest first (A to Z, oldest first)
    Ascending,
    /// Largest first (Z to A, newest first)
    #[default]
    Descending,
}

impl SortDirection {
    /// The other direction
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }

    /// Orient an ascending comparison result
    pub const fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Self::Ascending => ordering,
            Self::Descending => ordering.reverse(),
        }
    }

    /// Short name used on the command line and in JSON
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ascending => "asc",
            Self::Descending => "desc",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortDirection {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(Self::Ascending),
            "desc" | "descending" => Ok(Self::Descending),
            other => Err(crate::Error::validation(
                "sort",
                format!("'{other}' is not asc or desc"),
            )),
        }
    }
}

/// Search, order and window applied to a list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListQuery {
    /// Case-insensitive substring filter; empty matches everything
    pub search: String,
    /// Sort direction
    pub direction: SortDirection,
    /// Page number (1-based); not clamped
    pub page: usize,
    /// Rows per page
    pub page_size: NonZeroUsize,
}

impl ListQuery {
    /// First page, no search, given direction and size
    pub const fn new(direction: SortDirection, page_size: NonZeroUsize) -> Self {
        Self {
            search: String::new(),
            direction,
            page: 1,
            page_size,
        }
    }

    /// Replace the search text and go back to the first page
    pub fn set_search(&mut self, search: impl Into<String>) {
        self.search = search.into();
        self.page = 1;
    }

    /// Replace the page size and go back to the first page
    pub const fn set_page_size(&mut self, page_size: NonZeroUsize) {
        self.page_size = page_size;
        self.page = 1;
    }
}

/// One page cut from a filtered and sorted collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<'a, T> {
    /// Records visible on this page, in display order
    pub items: Vec<&'a T>,
    /// Page number the page was requested for
    pub page: usize,
    /// Rows per page
    pub page_size: usize,
    /// Number of records that passed the filter
    pub filtered_count: usize,
    /// `ceil(filtered_count / page_size)`, zero when nothing matched
    pub total_pages: usize,
}

impl<T> Page<'_, T> {
    /// Total pages as shown to the operator (never below one)
    pub fn display_total_pages(&self) -> usize {
        self.total_pages.max(1)
    }

    /// Whether a previous page can be requested
    pub const fn has_prev(&self) -> bool {
        self.page > 1
    }

    /// Whether a next page can be requested
    pub const fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    /// Position of the first visible row among the filtered records (0-based)
    pub const fn offset(&self) -> usize {
        self.page.saturating_sub(1).saturating_mul(self.page_size)
    }

    /// Whether the page shows nothing
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Keep records whose search text contains `query`, ignoring case
pub fn filter<'a, T: Listable>(items: &'a [T], query: &str) -> Vec<&'a T> {
    let needle = query.to_lowercase();
    if needle.is_empty() {
        return items.iter().collect();
    }
    items
        .iter()
        .filter(|item| item.search_text().to_lowercase().contains(&needle))
        .collect()
}

/// Stable sort by the records' natural order in the given direction
pub fn sort<T: Listable>(items: &mut [&T], direction: SortDirection) {
    items.sort_by(|a, b| direction.apply(a.natural_cmp(b)));
}

/// `ceil(count / page_size)`
pub const fn total_pages(count: usize, page_size: NonZeroUsize) -> usize {
    count.div_ceil(page_size.get())
}

/// Run filter, sort and paginate over `items`
///
/// A page number past the end (or zero) yields an empty page rather than an
/// error; the caller decides whether to reset it.
pub fn paginate<'a, T: Listable>(items: &'a [T], query: &ListQuery) -> Page<'a, T> {
    let mut matched = filter(items, &query.search);
    sort(&mut matched, query.direction);

    let page_size = query.page_size.get();
    let filtered_count = matched.len();
    let total_pages = total_pages(filtered_count, query.page_size);

    let visible = match query.page.checked_sub(1) {
        Some(index) => {
            let start = index.saturating_mul(page_size);
            matched
                .into_iter()
                .skip(start)
                .take(page_size)
                .collect()
        }
        None => Vec::new(),
    };

    Page {
        items: visible,
        page: query.page,
        page_size,
        filtered_count,
        total_pages,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BookingStatus, StatusHistory, Timestamp};
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use rstest::rstest;

    fn room(id: i64, name: &str) -> Room {
        Room {
            id,
            name: name.to_string(),
            description: String::new(),
            capacity: 10,
        }
    }

    fn booking(id: i64, borrower: &str, day: u32) -> Booking {
        let start = Timestamp::parse(&format!("2025-01-{day:02}T09:00")).unwrap();
        let end = Timestamp::parse(&format!("2025-01-{day:02}T10:00")).unwrap();
        Booking {
            id,
            room_id: 1,
            borrower_name: borrower.to_string(),
            booking_date: start,
            end_time: end,
            status: BookingStatus::Pending,
            status_history: StatusHistory::default(),
        }
    }

    fn size(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    fn query(search: &str, direction: SortDirection, page: usize, page_size: usize) -> ListQuery {
        ListQuery {
            search: search.to_string(),
            direction,
            page,
            page_size: size(page_size),
        }
    }

    fn names<'a>(page: &Page<'a, Room>) -> Vec<&'a str> {
        page.items.iter().map(|r| r.name.as_str()).collect()
    }

    #[test]
    fn test_search_is_case_insensitive_substring() {
        let rooms = vec![room(1, "Room A"), room(2, "room b"), room(3, "Auditorium")];

        let page = paginate(&rooms, &query("room a", SortDirection::Ascending, 1, 5));

        assert_eq!(names(&page), vec!["Room A"]);
        assert_eq!(page.filtered_count, 1);
    }

    #[test]
    fn test_empty_search_keeps_everything_in_order() {
        let rooms = vec![room(1, "Lab"), room(2, "Aula"), room(3, "Studio")];
        let kept: Vec<_> = filter(&rooms, "").into_iter().map(|r| r.id).collect();
        assert_eq!(kept, vec![1, 2, 3]);
    }

    #[test]
    fn test_rooms_sort_by_name() {
        let rooms = vec![room(1, "lab"), room(2, "Aula"), room(3, "Studio")];

        let asc = paginate(&rooms, &query("", SortDirection::Ascending, 1, 5));
        assert_eq!(names(&asc), vec!["Aula", "lab", "Studio"]);

        let desc = paginate(&rooms, &query("", SortDirection::Descending, 1, 5));
        assert_eq!(names(&desc), vec!["Studio", "lab", "Aula"]);
    }

    #[test]
    fn test_bookings_sort_by_start_time() {
        let bookings = vec![booking(1, "A", 3), booking(2, "B", 1), booking(3, "C", 2)];

        let desc = paginate(&bookings, &query("", SortDirection::Descending, 1, 5));
        let ids: Vec<_> = desc.items.iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![1, 3, 2]);

        let asc = paginate(&bookings, &query("", SortDirection::Ascending, 1, 5));
        let ids: Vec<_> = asc.items.iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }

    #[test]
    fn test_twelve_bookings_third_page() {
        let bookings: Vec<_> = (1..=12).map(|d| booking(i64::from(d), "X", d)).collect();

        let page = paginate(&bookings, &query("", SortDirection::Descending, 3, 5));

        assert_eq!(page.items.len(), 2);
        assert_eq!(page.total_pages, 3);
        assert!(page.has_prev());
        assert!(!page.has_next());
        assert_eq!(page.offset(), 10);
    }

    #[rstest]
    #[case(0, 5, 0, 1)]
    #[case(1, 5, 1, 1)]
    #[case(5, 5, 1, 1)]
    #[case(6, 5, 2, 2)]
    #[case(15, 10, 2, 2)]
    fn test_total_pages(
        #[case] count: usize,
        #[case] page_size: usize,
        #[case] expected: usize,
        #[case] displayed: usize,
    ) {
        let rooms: Vec<_> = (0..count).map(|i| room(i as i64, "r")).collect();
        let page = paginate(&rooms, &query("", SortDirection::Ascending, 1, page_size));
        assert_eq!(page.total_pages, expected);
        assert_eq!(page.display_total_pages(), displayed);
    }

    #[test]
    fn test_stale_page_after_filter_shrinks_is_empty() {
        let rooms: Vec<_> = (0..12).map(|i| room(i, &format!("Room {i}"))).collect();
        let mut list = query("", SortDirection::Ascending, 3, 5);
        assert_eq!(paginate(&rooms, &list).items.len(), 2);

        // Filter changed without resetting the page.
        list.search = "room 1".to_string();
        let page = paginate(&rooms, &list);
        assert_eq!(page.filtered_count, 3); // Room 1, Room 10, Room 11
        assert_eq!(page.total_pages, 1);
        assert!(page.is_empty());
        assert!(!page.has_next());
    }

    #[test]
    fn test_set_search_resets_page() {
        let mut list = query("", SortDirection::Ascending, 4, 5);
        list.set_search("aula");
        assert_eq!(list.page, 1);
        assert_eq!(list.search, "aula");

        list.page = 3;
        list.set_page_size(size(10));
        assert_eq!(list.page, 1);
        assert_eq!(list.page_size.get(), 10);
    }

    #[test]
    fn test_page_zero_is_empty() {
        let rooms = vec![room(1, "Aula")];
        let page = paginate(&rooms, &query("", SortDirection::Ascending, 0, 5));
        assert!(page.is_empty());
        assert!(!page.has_prev());
        assert_eq!(page.total_pages, 1);
    }

    #[test]
    fn test_direction_parse_and_toggle() {
        assert_eq!("ASC".parse::<SortDirection>().unwrap(), SortDirection::Ascending);
        assert_eq!("descending".parse::<SortDirection>().unwrap(), SortDirection::Descending);
        assert!("sideways".parse::<SortDirection>().is_err());
        assert_eq!(SortDirection::Ascending.toggled(), SortDirection::Descending);
        assert_eq!(SortDirection::default(), SortDirection::Descending);
    }

    proptest! {
        #[test]
        fn prop_filter_is_subset_and_matches(
            names in proptest::collection::vec("[a-zA-Z ]{0,8}", 0..40),
            needle in "[a-zA-Z]{0,3}",
        ) {
            let rooms: Vec<_> = names.iter().enumerate().map(|(i, n)| room(i as i64, n)).collect();
            let kept = filter(&rooms, &needle);

            prop_assert!(kept.len() <= rooms.len());
            for r in &kept {
                prop_assert!(r.name.to_lowercase().contains(&needle.to_lowercase()));
            }
            let expected = rooms
                .iter()
                .filter(|r| r.name.to_lowercase().contains(&needle.to_lowercase()))
                .count();
            prop_assert_eq!(kept.len(), expected);
        }

        #[test]
        fn prop_sort_direction_is_involutive(days in proptest::collection::btree_set(1u32..=28, 0..28)) {
            let bookings: Vec<_> = days.iter().map(|d| booking(i64::from(*d), "x", *d)).collect();

            let mut once: Vec<_> = bookings.iter().collect();
            sort(&mut once, SortDirection::Descending);

            let mut twice: Vec<_> = bookings.iter().collect();
            sort(&mut twice, SortDirection::Ascending);
            sort(&mut twice, SortDirection::Descending);

            prop_assert_eq!(once, twice);
        }

        #[test]
        fn prop_pages_partition_the_filtered_list(count in 0usize..60, page_size in 1usize..16) {
            let rooms: Vec<_> = (0..count).map(|i| room(i as i64, &format!("r{i:03}"))).collect();
            let first = paginate(&rooms, &query("", SortDirection::Ascending, 1, page_size));

            prop_assert_eq!(first.total_pages, count.div_ceil(page_size));

            let mut seen = 0;
            for page_no in 1..=first.total_pages {
                let page = paginate(&rooms, &query("", SortDirection::Ascending, page_no, page_size));
                if page_no == first.total_pages {
                    prop_assert_eq!(page.items.len(), count - (first.total_pages - 1) * page_size);
                    prop_assert!(!page.items.is_empty());
                } else {
                    prop_assert_eq!(page.items.len(), page_size);
                }
                seen += page.items.len();
            }
            prop_assert_eq!(seen, count);

            let past = paginate(&rooms, &query("", SortDirection::Ascending, first.total_pages + 1, page_size));
            prop_assert!(past.items.is_empty());
        }
    }
}
