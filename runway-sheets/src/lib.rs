//! runway-sheets: the workbook the pipeline writes its tabs into.
//!
//! Tabs are declared as typed schemas; header-name lookups happen only here.

pub mod cell;
pub mod csv_store;
pub mod grid;
pub mod schema;
pub mod tabs;
pub mod workbook;

pub use cell::{Cell, ColumnFormat};
pub use csv_store::CsvWorkbook;
pub use grid::{Grid, LookupError};
pub use schema::TabSchema;
pub use workbook::{MemoryWorkbook, Workbook};
