//! Data grid defaults

use serde::{Deserialize, Serialize};

use super::error::ValidationError;
use crate::domain::grid::{DataGrid, DEFAULT_ITEMS_PER_PAGE};

/// Upper bound on page size; larger pages defeat the point of paginating.
pub const MAX_ITEMS_PER_PAGE: usize = 500;

/// Grid configuration
#[derive(Debug, Clone, Deserialize)]
pub struct GridConfig {
    /// Rows per page for grids that don't pick their own
    #[serde(default = "default_items_per_page")]
    pub items_per_page: usize,
}

impl GridConfig {
    /// Validate grid configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.items_per_page == 0 || self.items_per_page > MAX_ITEMS_PER_PAGE {
            return Err(ValidationError::InvalidItemsPerPage {
                max: MAX_ITEMS_PER_PAGE,
            });
        }
        Ok(())
    }

    /// Apply the configured page size to a grid.
    pub fn apply<T: Serialize>(&self, grid: DataGrid<T>) -> DataGrid<T> {
        grid.with_items_per_page(self.items_per_page)
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            items_per_page: default_items_per_page(),
        }
    }
}

fn default_items_per_page() -> usize {
    DEFAULT_ITEMS_PER_PAGE
}
