//! The collaborator contract: an abstract spreadsheet engine.
//!
//! The marshalling layer never touches bytes or XML itself. Everything it
//! needs from a spreadsheet library is captured by the [`Engine`] trait:
//! workbook allocation and opening, sheet/row/cell creation and iteration,
//! typed scalar access, a minimal style surface, and byte persistence.
//!
//! Handles ([`WorkbookId`], [`SheetId`], [`RowId`], [`CellId`],
//! [`StyleId`]) are positional tokens owned by the engine that issued them.
//! The core never retains a handle beyond a single open document; an engine
//! answers a foreign or stale handle with
//! [`RowbookError::InvariantViolation`](crate::RowbookError::InvariantViolation).

pub mod memory;

use std::io::Write;

use chrono::NaiveDateTime;

use crate::error::Result;
use crate::flavor::WorkbookFlavor;
use crate::value::Scalar;

/// Handle to one open workbook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WorkbookId {
    index: usize,
}

impl WorkbookId {
    /// Build a workbook handle. Meaningful only to the issuing engine.
    #[must_use]
    pub const fn new(index: usize) -> Self {
        Self { index }
    }

    /// The engine-internal workbook slot.
    #[must_use]
    pub const fn index(self) -> usize {
        self.index
    }
}

/// Handle to a sheet within a workbook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SheetId {
    workbook: WorkbookId,
    index: usize,
}

impl SheetId {
    /// Build a sheet handle for the given workbook position.
    #[must_use]
    pub const fn new(workbook: WorkbookId, index: usize) -> Self {
        Self { workbook, index }
    }

    /// The owning workbook.
    #[must_use]
    pub const fn workbook(self) -> WorkbookId {
        self.workbook
    }

    /// Zero-based sheet position in workbook order.
    #[must_use]
    pub const fn index(self) -> usize {
        self.index
    }
}

/// Handle to a physical row within a sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RowId {
    sheet: SheetId,
    index: u32,
}

impl RowId {
    /// Build a row handle for the given sheet position.
    #[must_use]
    pub const fn new(sheet: SheetId, index: u32) -> Self {
        Self { sheet, index }
    }

    /// The owning sheet.
    #[must_use]
    pub const fn sheet(self) -> SheetId {
        self.sheet
    }

    /// Zero-based physical row index.
    #[must_use]
    pub const fn index(self) -> u32 {
        self.index
    }
}

/// Handle to a cell within a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellId {
    row: RowId,
    column: u32,
}

impl CellId {
    /// Build a cell handle for the given row position.
    #[must_use]
    pub const fn new(row: RowId, column: u32) -> Self {
        Self { row, column }
    }

    /// The owning row.
    #[must_use]
    pub const fn row(self) -> RowId {
        self.row
    }

    /// Zero-based column index.
    #[must_use]
    pub const fn column(self) -> u32 {
        self.column
    }
}

/// Handle to a style registered with a workbook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StyleId {
    workbook: WorkbookId,
    index: usize,
}

impl StyleId {
    /// Build a style handle for the given workbook slot.
    #[must_use]
    pub const fn new(workbook: WorkbookId, index: usize) -> Self {
        Self { workbook, index }
    }

    /// The owning workbook.
    #[must_use]
    pub const fn workbook(self) -> WorkbookId {
        self.workbook
    }

    /// Engine-internal style slot.
    #[must_use]
    pub const fn index(self) -> usize {
        self.index
    }
}

/// The capability set the marshalling layer consumes.
///
/// All operations are synchronous and assume exclusive ownership of the
/// engine for the duration of a call; the trait performs no locking.
pub trait Engine {
    /// Allocate a fresh workbook of the given flavor.
    fn new_workbook(&mut self, flavor: WorkbookFlavor) -> WorkbookId;

    /// Decode a workbook from bytes previously produced by
    /// [`write_bytes`](Self::write_bytes).
    ///
    /// # Errors
    /// [`RowbookError::Corrupted`](crate::RowbookError::Corrupted) if the
    /// bytes do not decode.
    fn open_workbook(&mut self, bytes: &[u8], flavor: WorkbookFlavor) -> Result<WorkbookId>;

    /// Release a workbook. The handle (and every handle derived from it)
    /// is invalid afterwards.
    fn close_workbook(&mut self, workbook: WorkbookId);

    /// The flavor a workbook was allocated or opened with.
    fn flavor(&self, workbook: WorkbookId) -> Result<WorkbookFlavor>;

    /// Append a new sheet with the given name.
    fn create_sheet(&mut self, workbook: WorkbookId, name: &str) -> Result<SheetId>;

    /// Number of sheets, in workbook order.
    fn sheet_count(&self, workbook: WorkbookId) -> Result<usize>;

    /// The sheet at `index`, or `None` if out of range.
    fn sheet_at(&self, workbook: WorkbookId, index: usize) -> Result<Option<SheetId>>;

    /// A sheet's name.
    fn sheet_name(&self, sheet: SheetId) -> Result<String>;

    /// Index of the first visible tab, or `None` for an empty workbook.
    fn first_visible_tab(&self, workbook: WorkbookId) -> Result<Option<usize>>;

    /// Create (or replace) the physical row at `index`.
    fn create_row(&mut self, sheet: SheetId, index: u32) -> Result<RowId>;

    /// All physical rows, in row order.
    fn rows(&self, sheet: SheetId) -> Result<Vec<RowId>>;

    /// Create (or replace) the cell at `column` in a row.
    fn create_cell(&mut self, row: RowId, column: u32) -> Result<CellId>;

    /// All present cells of a row, in column order.
    fn cells(&self, row: RowId) -> Result<Vec<CellId>>;

    /// Set a text value.
    fn set_string(&mut self, cell: CellId, value: &str) -> Result<()>;

    /// Set a numeric value.
    fn set_number(&mut self, cell: CellId, value: f64) -> Result<()>;

    /// Set a boolean value.
    fn set_boolean(&mut self, cell: CellId, value: bool) -> Result<()>;

    /// Set a calendar date-time value.
    fn set_date(&mut self, cell: CellId, value: NaiveDateTime) -> Result<()>;

    /// The cell's typed scalar, or `None` for an empty cell.
    fn scalar(&self, cell: CellId) -> Result<Option<Scalar>>;

    /// The cell's value read numerically, or `None` when a numeric read
    /// is not applicable.
    fn numeric_value(&self, cell: CellId) -> Result<Option<f64>>;

    /// The cell's value as a display string (empty for an empty cell).
    fn display_value(&self, cell: CellId) -> Result<String>;

    /// Register a new (blank) style with a workbook.
    fn new_style(&mut self, workbook: WorkbookId) -> Result<StyleId>;

    /// Set a style's number-format pattern.
    fn set_style_pattern(&mut self, style: StyleId, pattern: &str) -> Result<()>;

    /// Set a style's wrap-text flag.
    fn set_style_wrap(&mut self, style: StyleId, wrap: bool) -> Result<()>;

    /// Apply a registered style to a cell. The style must belong to the
    /// cell's workbook.
    fn apply_style(&mut self, cell: CellId, style: StyleId) -> Result<()>;

    /// Persist a workbook's bytes to a sink.
    fn write_bytes(&mut self, workbook: WorkbookId, sink: &mut dyn Write) -> Result<()>;
}
