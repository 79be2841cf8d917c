//! Data grid - generic search, pagination and column rendering.
//!
//! Every dashboard table goes through [`DataGrid`]: callers supply records,
//! column descriptors and a key extractor; the grid owns only the search
//! term and current page.

mod column;
mod data_grid;
mod paging;
mod renderable;
mod search;
mod view;

pub use column::{Accessor, CellFn, ColumnDescriptor};
pub use data_grid::{ActionsRenderer, DataGrid, KeyExtractor, RowClickCallback, SearchCallback};
pub use paging::{clamp_page, total_pages, GridState, PageWindow, DEFAULT_ITEMS_PER_PAGE};
pub use renderable::Renderable;
pub use search::{matches_term, record_matches};
pub use view::{
    EmptyState, GridBody, GridCell, GridRow, GridView, HeaderCell, PageControl,
    PaginationFooter, ACTIONS_HEADER, DEFAULT_EMPTY_MESSAGE,
};
