//! Render output of the data grid.
//!
//! A `GridView` is a plain value: the calling view maps it onto whatever
//! widgets it draws with. Two renders with no state change in between
//! produce equal views.

use std::fmt;

use serde::Serialize;

use super::Renderable;

/// Default message shown when the visible slice is empty.
pub const DEFAULT_EMPTY_MESSAGE: &str = "No records found";

/// Header label used for the trailing actions column.
pub const ACTIONS_HEADER: &str = "Actions";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridView {
    pub headers: Vec<HeaderCell>,
    pub body: GridBody,
    /// Present only when there is more than one page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer: Option<PaginationFooter>,
    pub search_term: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeaderCell {
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum GridBody {
    Rows { rows: Vec<GridRow> },
    Empty(EmptyState),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridRow {
    pub key: String,
    pub cells: Vec<GridCell>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actions: Option<Renderable>,
    pub clickable: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridCell {
    pub value: Renderable,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
}

/// Single row spanning every column.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmptyState {
    pub message: String,
    pub colspan: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationFooter {
    pub current_page: usize,
    pub total_pages: usize,
    /// 1-based index of the first visible record.
    pub first_index: usize,
    /// 1-based index of the last visible record.
    pub last_index: usize,
    pub total: usize,
    pub summary: String,
    pub has_previous: bool,
    pub has_next: bool,
    /// Every page from 1 to `total_pages`, no windowing.
    pub pages: Vec<PageControl>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageControl {
    pub number: usize,
    pub active: bool,
}

impl PaginationFooter {
    pub fn new(current_page: usize, total_pages: usize, start: usize, end: usize, total: usize) -> Self {
        let first_index = start + 1;
        let last_index = end;
        Self {
            current_page,
            total_pages,
            first_index,
            last_index,
            total,
            summary: format!(
                "Showing {} to {} of {} records",
                first_index, last_index, total
            ),
            has_previous: current_page > 1,
            has_next: current_page < total_pages,
            pages: (1..=total_pages)
                .map(|number| PageControl {
                    number,
                    active: number == current_page,
                })
                .collect(),
        }
    }
}

impl GridView {
    pub fn rows(&self) -> &[GridRow] {
        match &self.body {
            GridBody::Rows { rows } => rows,
            GridBody::Empty(_) => &[],
        }
    }

    pub fn empty_state(&self) -> Option<&EmptyState> {
        match &self.body {
            GridBody::Empty(state) => Some(state),
            GridBody::Rows { .. } => None,
        }
    }

    pub fn row_keys(&self) -> Vec<&str> {
        self.rows().iter().map(|row| row.key.as_str()).collect()
    }
}

impl fmt::Display for GridView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let header = self
            .headers
            .iter()
            .map(|h| h.label.as_str())
            .collect::<Vec<_>>()
            .join(" | ");
        writeln!(f, "{}", header)?;
        writeln!(f, "{}", "-".repeat(header.chars().count()))?;

        match &self.body {
            GridBody::Empty(state) => writeln!(f, "{}", state.message)?,
            GridBody::Rows { rows } => {
                for row in rows {
                    let mut cells: Vec<String> =
                        row.cells.iter().map(|c| c.value.plain_text()).collect();
                    if let Some(actions) = &row.actions {
                        cells.push(actions.plain_text());
                    }
                    writeln!(f, "{}", cells.join(" | "))?;
                }
            }
        }

        if let Some(footer) = &self.footer {
            let pages = footer
                .pages
                .iter()
                .map(|p| {
                    if p.active {
                        format!("[{}]", p.number)
                    } else {
                        p.number.to_string()
                    }
                })
                .collect::<Vec<_>>()
                .join(" ");
            writeln!(f, "{}  {}", footer.summary, pages)?;
        }
        Ok(())
    }
}
