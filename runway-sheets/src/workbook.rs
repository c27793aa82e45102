//! Workbook backends: each tab is fully cleared and rewritten on write.

use anyhow::{bail, Result};
use runway_core::RunwayError;
use std::collections::BTreeMap;

use crate::cell::{Cell, ColumnFormat};
use crate::grid::Grid;
use crate::schema::TabSchema;

pub trait Workbook {
    /// `None` when the tab does not exist.
    fn read_tab(&self, name: &str) -> Result<Option<Grid>>;

    /// Replace a tab's contents with `grid` (header included).
    fn write_grid(&mut self, schema: &TabSchema, grid: &Grid) -> Result<()>;

    /// Write data rows under the schema's header.
    fn write_tab(&mut self, schema: &TabSchema, rows: Vec<Vec<Cell>>) -> Result<()> {
        let mut all = Vec::with_capacity(rows.len() + 1);
        all.push(schema.headers().map(Cell::from).collect::<Vec<_>>());
        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != schema.width() {
                bail!(
                    "row {} of '{}' has {} cells, expected {}",
                    i + 1,
                    schema.name,
                    row.len(),
                    schema.width()
                );
            }
            all.push(row);
        }
        self.write_grid(schema, &Grid::new(all))
    }

    /// Header-name lookup across tabs, e.g. the "Cash" row of "Accounts By Type".
    fn lookup_cell(
        &self,
        tab: &str,
        key: &str,
        key_header: &str,
        value_header: &str,
    ) -> Result<Cell> {
        let not_found = |detail: String| RunwayError::LookupNotFound {
            tab: tab.to_string(),
            detail,
        };
        let grid = self
            .read_tab(tab)?
            .ok_or_else(|| not_found("tab not found".to_string()))?;
        let cell = grid
            .lookup(key, key_header, value_header)
            .map_err(|e| not_found(e.to_string()))?;
        Ok(cell.clone())
    }
}

#[derive(Debug, Clone, PartialEq)]
struct StoredTab {
    grid: Grid,
    formats: Vec<ColumnFormat>,
}

/// Keeps native cell values, like a spreadsheet does.
#[derive(Debug, Clone, Default)]
pub struct MemoryWorkbook {
    tabs: BTreeMap<String, StoredTab>,
}

impl MemoryWorkbook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a tab directly, bypassing any schema.
    pub fn insert(&mut self, name: &str, grid: Grid) {
        self.tabs.insert(
            name.to_string(),
            StoredTab {
                grid,
                formats: Vec::new(),
            },
        );
    }

    pub fn tab_names(&self) -> Vec<&str> {
        self.tabs.keys().map(String::as_str).collect()
    }

    /// A tab as text, with column formats applied to data rows.
    pub fn rendered(&self, name: &str) -> Option<Vec<Vec<String>>> {
        self.tabs.get(name).map(|t| render_grid(&t.grid, &t.formats))
    }
}

impl Workbook for MemoryWorkbook {
    fn read_tab(&self, name: &str) -> Result<Option<Grid>> {
        Ok(self.tabs.get(name).map(|t| t.grid.clone()))
    }

    fn write_grid(&mut self, schema: &TabSchema, grid: &Grid) -> Result<()> {
        self.tabs.insert(
            schema.name.to_string(),
            StoredTab {
                grid: grid.clone(),
                formats: schema.formats(),
            },
        );
        Ok(())
    }
}

/// Render every cell; formats apply from the second row on.
pub(crate) fn render_grid(grid: &Grid, formats: &[ColumnFormat]) -> Vec<Vec<String>> {
    grid.rows()
        .iter()
        .enumerate()
        .map(|(i, row)| {
            row.iter()
                .enumerate()
                .map(|(c, cell)| {
                    let format = if i == 0 {
                        ColumnFormat::General
                    } else {
                        formats.get(c).copied().unwrap_or(ColumnFormat::General)
                    };
                    cell.render(format)
                })
                .collect()
        })
        .collect()
}
