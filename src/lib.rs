//! rowbook - typed row marshalling for spreadsheet workbooks
//!
//! Maps row records to and from tabular spreadsheet documents:
//! - Write: sheet/workbook assembly from anything implementing
//!   [`RowSource`], with per-cell type dispatch and style deduplication
//! - Read: sheet resolution, lazy row iteration, pluggable per-row
//!   extraction, whole-document aggregation
//! - Edit: in-place row mutation of an existing workbook
//!
//! The spreadsheet encoding itself lives behind the [`engine::Engine`]
//! trait; [`engine::memory::MemoryEngine`] is the bundled reference
//! implementation.
//!
//! # Usage
//!
//! ```
//! use rowbook::engine::memory::MemoryEngine;
//! use rowbook::engine::Engine;
//! use rowbook::{reader, writer, CellValue, RowSource, TableReader, WorkbookFlavor};
//!
//! struct Expense {
//!     label: String,
//!     amount: f64,
//! }
//!
//! impl RowSource for Expense {
//!     fn to_cells(&self) -> Vec<Option<CellValue>> {
//!         vec![Self::cell(self.label.as_str()), Self::cell(self.amount)]
//!     }
//! }
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut engine = MemoryEngine::new();
//! let records = vec![
//!     Expense { label: "travel".to_string(), amount: 120.50 },
//!     Expense { label: "meals".to_string(), amount: 42.00 },
//! ];
//! let workbook = writer::build_workbook(
//!     &mut engine,
//!     WorkbookFlavor::Packaged,
//!     "Expenses",
//!     None,
//!     &records,
//! )?;
//!
//! let dir = tempfile::tempdir()?;
//! let path = writer::persist(&mut engine, workbook, &dir.path().join("expenses.xlsx"))?;
//!
//! let reader = TableReader::open(
//!     &mut engine,
//!     &path,
//!     |engine: &MemoryEngine, row| -> rowbook::Result<Option<String>> {
//!         let cells = engine.cells(row)?;
//!         Ok(Some(reader::cell_as_string(engine, cells.first().copied())))
//!     },
//! )?;
//! let by_sheet = reader.read_document(false);
//! assert_eq!(by_sheet["Expenses"], vec!["travel", "meals"]);
//! # Ok(())
//! # }
//! ```

pub mod editor;
pub mod engine;
pub mod error;
pub mod flavor;
pub mod format;
pub mod reader;
pub mod row;
pub mod settings;
pub mod value;
pub mod writer;

pub use editor::{SheetSelector, TableEditor};
pub use error::{Result, RowbookError};
pub use flavor::WorkbookFlavor;
pub use format::{FormatCategory, NumberFormat};
pub use reader::{ConfiguredTableReader, SheetResultMap, TableReader};
pub use row::RowSource;
pub use settings::Settings;
pub use value::{CellValue, HorizontalAlign, Scalar};
pub use writer::SheetHeaders;
