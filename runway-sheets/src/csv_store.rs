//! Directory-backed workbook: one `<tab name>.csv` per tab.
//!
//! Everything is stored as text with column formats already applied, so reads
//! return `Cell::Text` (or `Cell::Empty` for blank fields).

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::cell::Cell;
use crate::grid::Grid;
use crate::schema::TabSchema;
use crate::workbook::{render_grid, Workbook};

const TMP_SUFFIX: &str = "tmp";

#[derive(Debug, Clone)]
pub struct CsvWorkbook {
    dir: PathBuf,
}

impl CsvWorkbook {
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn tab_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.csv"))
    }
}

impl Workbook for CsvWorkbook {
    fn read_tab(&self, name: &str) -> Result<Option<Grid>> {
        let path = self.tab_path(name);
        if !path.exists() {
            return Ok(None);
        }

        let mut rdr = csv::ReaderBuilder::new()
            .flexible(true)
            .has_headers(false)
            .from_path(&path)
            .with_context(|| format!("opening {}", path.display()))?;

        let mut rows = Vec::new();
        for result in rdr.records() {
            let record = result.with_context(|| format!("reading {}", path.display()))?;
            rows.push(record.iter().map(Cell::text).collect());
        }
        Ok(Some(Grid::new(rows)))
    }

    fn write_grid(&mut self, schema: &TabSchema, grid: &Grid) -> Result<()> {
        let path = self.tab_path(schema.name);
        let tmp = path.with_extension(format!("csv.{TMP_SUFFIX}"));

        {
            let mut wtr = csv::WriterBuilder::new()
                .flexible(true)
                .from_path(&tmp)
                .with_context(|| format!("create {}", tmp.display()))?;
            for row in render_grid(grid, &schema.formats()) {
                wtr.write_record(&row)?;
            }
            wtr.flush().with_context(|| format!("write {}", tmp.display()))?;
        }

        fs::rename(&tmp, &path).with_context(|| format!("replace {}", path.display()))?;
        debug!(tab = schema.name, rows = grid.rows().len(), "wrote tab");
        Ok(())
    }
}
