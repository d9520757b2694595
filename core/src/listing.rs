//! The model behind a listing: the rows the server returned, and how the user is looking at them.
//!
//! Sorting, filtering, and paging only ever change the order in which row indices are presented;
//! the rows themselves stay in the order the server gave them, so "server order" is always one
//! step away.

use std::sync::Arc;

use serde_json::Value;

use crate::{entity::ColumnDescriptor, field};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// A user-requested sort on one column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortKey {
    pub column: usize,
    pub direction: SortDirection,
}

#[derive(Debug, Clone)]
pub struct Listing {
    columns: Vec<ColumnDescriptor>,
    rows: Arc<[Value]>,
    sort: Option<SortKey>,
    filter: String,
    page: usize,
    page_size: usize,
}

impl Listing {
    #[must_use]
    pub fn new(columns: Vec<ColumnDescriptor>, page_size: usize) -> Self {
        Self {
            columns,
            rows: Arc::from([]),
            sort: None,
            filter: String::new(),
            page: 0,
            page_size: page_size.max(1),
        }
    }

    #[must_use]
    pub fn columns(&self) -> &[ColumnDescriptor] {
        &self.columns
    }

    #[must_use]
    pub fn rows(&self) -> &[Value] {
        &self.rows
    }

    /// Replace the row set wholesale, e.g. with a fresh server response.
    ///
    /// Sort and filter are kept, the page is reset.
    pub fn set_rows(&mut self, rows: Arc<[Value]>) {
        self.rows = rows;
        self.page = 0;
    }

    #[must_use]
    pub const fn sort(&self) -> Option<SortKey> {
        self.sort
    }

    #[must_use]
    pub fn filter(&self) -> &str {
        &self.filter
    }

    pub fn set_filter(&mut self, filter: impl Into<String>) {
        self.filter = filter.into();
        self.page = 0;
    }

    /// Step through the sorts: each column ascending then descending, then back to server order.
    pub fn cycle_sort(&mut self) {
        if self.columns.is_empty() {
            return;
        }
        self.sort = match self.sort {
            None => Some(SortKey {
                column: 0,
                direction: SortDirection::Ascending,
            }),
            Some(SortKey {
                column,
                direction: SortDirection::Ascending,
            }) => Some(SortKey {
                column,
                direction: SortDirection::Descending,
            }),
            Some(SortKey {
                column,
                direction: SortDirection::Descending,
            }) if column + 1 < self.columns.len() => Some(SortKey {
                column: column + 1,
                direction: SortDirection::Ascending,
            }),
            Some(_) => None,
        };
        self.page = 0;
    }

    /// Drop any user sort and present rows in the order the server returned them.
    pub fn restore_order(&mut self) {
        self.sort = None;
        self.page = 0;
    }

    /// Indices into [`Self::rows`] of every row that passes the filter, in presentation order.
    #[must_use]
    pub fn visible(&self) -> Vec<usize> {
        let needle = self.filter.trim().to_lowercase();
        let mut indices = (0..self.rows.len())
            .filter(|&i| {
                needle.is_empty()
                    || self.columns.iter().any(|c| {
                        field::cell(&self.rows[i], &c.key)
                            .to_lowercase()
                            .contains(&needle)
                    })
            })
            .collect::<Vec<_>>();

        if let Some(SortKey { column, direction }) = self.sort {
            if let Some(column) = self.columns.get(column) {
                // stable, so ties keep server order
                indices.sort_by_cached_key(|&i| {
                    field::cell(&self.rows[i], &column.key).to_lowercase()
                });
                if direction == SortDirection::Descending {
                    indices.reverse();
                }
            }
        }

        indices
    }

    #[must_use]
    pub fn page_count(&self) -> usize {
        self.visible().len().div_ceil(self.page_size).max(1)
    }

    #[must_use]
    pub const fn page(&self) -> usize {
        self.page
    }

    pub fn next_page(&mut self) {
        if self.page + 1 < self.page_count() {
            self.page += 1;
        }
    }

    pub fn prev_page(&mut self) {
        self.page = self.page.saturating_sub(1);
    }

    /// The rows on the current page, in presentation order.
    #[must_use]
    pub fn page_rows(&self) -> Vec<&Value> {
        self.visible()
            .into_iter()
            .skip(self.page * self.page_size)
            .take(self.page_size)
            .map(|i| &self.rows[i])
            .collect()
    }

    /// The rendered cells of a row, one per column.
    #[must_use]
    pub fn cells(&self, row: &Value) -> Vec<String> {
        self.columns
            .iter()
            .map(|c| field::cell(row, &c.key))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::EntityKind;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn songs() -> Arc<[Value]> {
        Arc::from(vec![
            json!({"id": 1, "title": "Time", "album": {"title": "The Dark Side of the Moon"}, "created_at": "2024-01-03"}),
            json!({"id": 2, "title": "Echoes", "album": {"title": "Meddle"}, "created_at": "2024-01-01"}),
            json!({"id": 3, "title": "Dogs", "album": null, "created_at": "2024-01-02"}),
        ])
    }

    fn titles(listing: &Listing) -> Vec<String> {
        listing
            .page_rows()
            .into_iter()
            .map(|row| field::cell(row, "title"))
            .collect()
    }

    #[test]
    fn test_server_order_by_default() {
        let mut listing = Listing::new(EntityKind::Song.columns(), 10);
        listing.set_rows(songs());
        assert_eq!(titles(&listing), vec!["Time", "Echoes", "Dogs"]);
        assert_eq!(
            listing.cells(&listing.rows()[2]),
            vec!["Dogs", "", "2024-01-02"]
        );
    }

    #[test]
    fn test_sort_is_restorable() {
        let mut listing = Listing::new(EntityKind::Song.columns(), 10);
        listing.set_rows(songs());

        listing.cycle_sort();
        assert_eq!(titles(&listing), vec!["Dogs", "Echoes", "Time"]);
        listing.cycle_sort();
        assert_eq!(titles(&listing), vec!["Time", "Echoes", "Dogs"]);
        // album column, missing albums sort first
        listing.cycle_sort();
        assert_eq!(titles(&listing), vec!["Dogs", "Echoes", "Time"]);

        listing.restore_order();
        assert_eq!(titles(&listing), vec!["Time", "Echoes", "Dogs"]);
        // the row set itself was never reordered
        assert_eq!(field::cell(&listing.rows()[0], "title"), "Time");
    }

    #[test]
    fn test_cycle_sort_wraps_back_to_server_order() {
        let mut listing = Listing::new(EntityKind::Album.columns(), 10);
        for _ in 0..5 {
            listing.cycle_sort();
        }
        assert_eq!(listing.sort(), None);
    }

    #[test]
    fn test_filter() {
        let mut listing = Listing::new(EntityKind::Song.columns(), 10);
        listing.set_rows(songs());
        listing.set_filter("MEDDLE");
        assert_eq!(titles(&listing), vec!["Echoes"]);
        listing.set_filter("");
        assert_eq!(listing.visible().len(), 3);
    }

    #[test]
    fn test_paging() {
        let mut listing = Listing::new(EntityKind::Song.columns(), 2);
        listing.set_rows(songs());
        assert_eq!(listing.page_count(), 2);
        assert_eq!(titles(&listing), vec!["Time", "Echoes"]);
        listing.next_page();
        assert_eq!(titles(&listing), vec!["Dogs"]);
        listing.next_page();
        assert_eq!(listing.page(), 1);
        listing.prev_page();
        listing.prev_page();
        assert_eq!(listing.page(), 0);
    }

    #[test]
    fn test_set_rows_replaces_everything() {
        let mut listing = Listing::new(EntityKind::Song.columns(), 10);
        listing.set_rows(songs());
        listing.set_rows(Arc::from(vec![json!({"title": "Only"})]));
        assert_eq!(titles(&listing), vec!["Only"]);
        assert_eq!(listing.page_count(), 1);
    }

    #[test]
    fn test_empty_listing_has_one_page() {
        let listing = Listing::new(vec![], 0);
        assert_eq!(listing.page_count(), 1);
        assert!(listing.page_rows().is_empty());
    }
}
