//! Generic searchable, paginated grid over caller-supplied records.
//!
//! The grid holds a shared snapshot of the records (`Arc<[T]>`) and never
//! mutates it. Refreshes replace the snapshot wholesale through
//! [`DataGrid::set_records`].

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value as JsonValue;

use super::paging::{PageWindow, DEFAULT_ITEMS_PER_PAGE};
use super::search::record_matches;
use super::view::{
    EmptyState, GridBody, GridCell, GridRow, GridView, HeaderCell, PaginationFooter,
    ACTIONS_HEADER, DEFAULT_EMPTY_MESSAGE,
};
use super::{ColumnDescriptor, GridState, Renderable};

pub type KeyExtractor<T> = Arc<dyn Fn(&T) -> String + Send + Sync>;
pub type SearchCallback = Arc<dyn Fn(&str) + Send + Sync>;
pub type RowClickCallback<T> = Arc<dyn Fn(&T) + Send + Sync>;
pub type ActionsRenderer<T> = Arc<dyn Fn(&T) -> Renderable + Send + Sync>;

/// Searchable, paginated table engine.
///
/// # Caller contract
///
/// `key_extractor` must return keys unique within the current record set
/// and header labels should be unique. Neither is validated; duplicates
/// only make row identity ambiguous for `click_row`.
///
/// # Example
///
/// ```ignore
/// let grid = DataGrid::new(tickets, columns, |t: &Ticket| t.id.clone())
///     .with_items_per_page(25)
///     .with_row_click(|t| open_ticket(t));
/// let view = grid.render();
/// ```
pub struct DataGrid<T> {
    records: Arc<[T]>,
    columns: Vec<ColumnDescriptor<T>>,
    key_extractor: KeyExtractor<T>,
    state: GridState,
    /// Indices into `records` that pass the current search.
    matches: Vec<usize>,
    on_search: Option<SearchCallback>,
    on_row_click: Option<RowClickCallback<T>>,
    actions: Option<ActionsRenderer<T>>,
    empty_message: String,
}

impl<T: Serialize> DataGrid<T> {
    /// Creates a grid over the full, unfiltered record set.
    ///
    /// Empty record sets are valid and render the empty state.
    pub fn new<K>(
        records: impl Into<Arc<[T]>>,
        columns: Vec<ColumnDescriptor<T>>,
        key_extractor: K,
    ) -> Self
    where
        K: Fn(&T) -> String + Send + Sync + 'static,
    {
        let mut grid = Self {
            records: records.into(),
            columns,
            key_extractor: Arc::new(key_extractor),
            state: GridState::new(DEFAULT_ITEMS_PER_PAGE),
            matches: Vec::new(),
            on_search: None,
            on_row_click: None,
            actions: None,
            empty_message: DEFAULT_EMPTY_MESSAGE.to_string(),
        };
        grid.recompute_matches();
        grid
    }

    /// Sets the page size.
    ///
    /// A page size of zero is accepted and paginates to zero pages.
    pub fn with_items_per_page(mut self, items_per_page: usize) -> Self {
        if items_per_page == 0 {
            tracing::warn!("Grid configured with zero items per page; nothing will be shown");
        }
        self.state.items_per_page = items_per_page;
        self.clamp_current_page();
        self
    }

    /// Delegates filtering to the caller.
    ///
    /// With a callback installed the grid treats its record input as
    /// already filtered and only reports term changes.
    pub fn with_search_callback<F>(mut self, on_search: F) -> Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.on_search = Some(Arc::new(on_search));
        self.recompute_matches();
        self
    }

    pub fn with_row_click<F>(mut self, on_row_click: F) -> Self
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        self.on_row_click = Some(Arc::new(on_row_click));
        self
    }

    /// Adds a trailing actions cell to every row.
    pub fn with_actions<F>(mut self, actions: F) -> Self
    where
        F: Fn(&T) -> Renderable + Send + Sync + 'static,
    {
        self.actions = Some(Arc::new(actions));
        self
    }

    pub fn with_empty_message(mut self, message: impl Into<String>) -> Self {
        self.empty_message = message.into();
        self
    }

    pub fn state(&self) -> &GridState {
        &self.state
    }

    pub fn records(&self) -> &Arc<[T]> {
        &self.records
    }

    pub fn columns(&self) -> &[ColumnDescriptor<T>] {
        &self.columns
    }

    /// Number of records that pass the current search.
    pub fn filtered_count(&self) -> usize {
        self.matches.len()
    }

    pub fn total_pages(&self) -> usize {
        self.window().total_pages
    }

    /// Replaces the record set wholesale and re-derives the page.
    pub fn set_records(&mut self, records: impl Into<Arc<[T]>>) {
        self.records = records.into();
        self.recompute_matches();
        self.clamp_current_page();
    }

    /// Sets the search term and resets to page 1.
    pub fn set_search_term(&mut self, term: impl Into<String>) {
        let term = term.into();
        tracing::debug!(term = %term, "Grid search term changed");
        self.state.search_term = term;
        self.state.current_page = 1;

        if let Some(on_search) = &self.on_search {
            on_search(&self.state.search_term);
        }
        self.recompute_matches();
    }

    /// Jumps to page `n`, clamped into `[1, total_pages]`.
    pub fn set_page(&mut self, n: usize) {
        self.state.current_page = PageWindow::compute(
            self.matches.len(),
            self.state.items_per_page,
            n,
        )
        .page;
    }

    pub fn next_page(&mut self) {
        self.set_page(self.state.current_page.saturating_add(1));
    }

    pub fn previous_page(&mut self) {
        self.set_page(self.state.current_page.saturating_sub(1));
    }

    /// Records on the current page, in order.
    pub fn page_records(&self) -> Vec<&T> {
        let window = self.window();
        self.matches[window.start..window.end]
            .iter()
            .map(|&i| &self.records[i])
            .collect()
    }

    /// Invokes the row click handler for the visible row with `key`.
    ///
    /// Returns true if a handler ran.
    pub fn click_row(&self, key: &str) -> bool {
        let Some(on_row_click) = &self.on_row_click else {
            return false;
        };
        match self
            .page_records()
            .into_iter()
            .find(|record| (self.key_extractor)(record) == key)
        {
            Some(record) => {
                on_row_click(record);
                true
            }
            None => {
                tracing::debug!(key = %key, "Row click for key not on current page ignored");
                false
            }
        }
    }

    /// Produces the header row, the visible body slice and the footer.
    pub fn render(&self) -> GridView {
        let window = self.window();

        let mut headers: Vec<HeaderCell> = self
            .columns
            .iter()
            .map(|c| HeaderCell {
                label: c.header.clone(),
                class_name: c.class_name.clone(),
            })
            .collect();
        if self.actions.is_some() {
            headers.push(HeaderCell {
                label: ACTIONS_HEADER.to_string(),
                class_name: None,
            });
        }

        let body = if window.is_empty() {
            GridBody::Empty(EmptyState {
                message: self.empty_message.clone(),
                colspan: headers.len(),
            })
        } else {
            GridBody::Rows {
                rows: self.matches[window.start..window.end]
                    .iter()
                    .map(|&i| self.render_row(&self.records[i]))
                    .collect(),
            }
        };

        let footer = (window.total_pages > 1).then(|| {
            PaginationFooter::new(
                window.page,
                window.total_pages,
                window.start,
                window.end,
                self.matches.len(),
            )
        });

        GridView {
            headers,
            body,
            footer,
            search_term: self.state.search_term.clone(),
        }
    }

    fn render_row(&self, record: &T) -> GridRow {
        let needs_json = self.columns.iter().any(|c| c.accessor.is_field());
        let serialized: Option<JsonValue> = if needs_json {
            match serde_json::to_value(record) {
                Ok(value) => Some(value),
                Err(e) => {
                    tracing::warn!("Record could not be serialized for rendering: {}", e);
                    None
                }
            }
        } else {
            None
        };

        GridRow {
            key: (self.key_extractor)(record),
            cells: self
                .columns
                .iter()
                .map(|c| GridCell {
                    value: c.accessor.resolve(record, serialized.as_ref()),
                    class_name: c.class_name.clone(),
                })
                .collect(),
            actions: self.actions.as_ref().map(|actions| actions(record)),
            clickable: self.on_row_click.is_some(),
        }
    }

    fn window(&self) -> PageWindow {
        PageWindow::compute(
            self.matches.len(),
            self.state.items_per_page,
            self.state.current_page,
        )
    }

    fn clamp_current_page(&mut self) {
        self.state.current_page = self.window().page;
    }

    fn recompute_matches(&mut self) {
        let term = self.state.search_term.as_str();
        self.matches = if self.on_search.is_some() || term.is_empty() {
            (0..self.records.len()).collect()
        } else {
            self.records
                .iter()
                .enumerate()
                .filter(|(_, record)| record_matches(*record, term))
                .map(|(i, _)| i)
                .collect()
        };
    }
}

impl<T> fmt::Debug for DataGrid<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataGrid")
            .field("records", &self.records.len())
            .field("columns", &self.columns)
            .field("state", &self.state)
            .field("matches", &self.matches.len())
            .finish()
    }
}
