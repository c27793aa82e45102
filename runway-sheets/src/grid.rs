//! Header + rows grids and the header-name lookup used for cross-tab joins.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cell::Cell;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LookupError {
    #[error("tab is empty")]
    Empty,
    #[error("required column not found: {0}")]
    MissingColumn(String),
    #[error("no row with key '{0}'")]
    MissingKey(String),
}

/// Rows of cells, header first. Rows may be ragged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    rows: Vec<Vec<Cell>>,
}

impl Grid {
    pub fn new(rows: Vec<Vec<Cell>>) -> Self {
        Self { rows }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn header(&self) -> Option<&[Cell]> {
        self.rows.first().map(Vec::as_slice)
    }

    pub fn data_rows(&self) -> &[Vec<Cell>] {
        self.rows.get(1..).unwrap_or(&[])
    }

    pub fn column_index(&self, header: &str) -> Option<usize> {
        self.header()?.iter().position(|c| c.matches_key(header))
    }

    /// Value in `value_header` on the first data row whose `key_header` cell equals `key`.
    pub fn lookup(
        &self,
        key: &str,
        key_header: &str,
        value_header: &str,
    ) -> Result<&Cell, LookupError> {
        if self.is_empty() {
            return Err(LookupError::Empty);
        }
        let key_col = self
            .column_index(key_header)
            .ok_or_else(|| LookupError::MissingColumn(key_header.to_string()))?;
        let value_col = self
            .column_index(value_header)
            .ok_or_else(|| LookupError::MissingColumn(value_header.to_string()))?;

        static EMPTY: Cell = Cell::Empty;
        self.data_rows()
            .iter()
            .find(|row| row.get(key_col).is_some_and(|c| c.matches_key(key)))
            .map(|row| row.get(value_col).unwrap_or(&EMPTY))
            .ok_or_else(|| LookupError::MissingKey(key.to_string()))
    }
}
