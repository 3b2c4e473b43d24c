//! In-memory reference implementation of the engine contract.
//!
//! `MemoryEngine` keeps workbooks as sparse row/cell grids and persists
//! them as a JSON snapshot of that model. It is a reference collaborator,
//! not a spreadsheet codec: the snapshot format is private to this engine,
//! and deployments targeting real `.xls`/`.xlsx` files plug a codec-backed
//! [`Engine`] into the same trait.
//!
//! Every handle is validated on use; a foreign or stale handle is answered
//! with [`RowbookError::InvariantViolation`].

use std::collections::BTreeMap;
use std::io::Write;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::engine::{CellId, Engine, RowId, SheetId, StyleId, WorkbookId};
use crate::error::{Result, RowbookError};
use crate::flavor::WorkbookFlavor;
use crate::value::Scalar;

#[derive(Debug, Default, Serialize, Deserialize)]
struct MemStyle {
    pattern: String,
    wrap: bool,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct MemCell {
    value: Option<Scalar>,
    style: Option<usize>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct MemRow {
    cells: BTreeMap<u32, MemCell>,
}

#[derive(Debug, Serialize, Deserialize)]
struct MemSheet {
    name: String,
    rows: BTreeMap<u32, MemRow>,
}

/// The persisted portion of a workbook (everything but the flavor, which
/// is decided by whoever opens the bytes).
#[derive(Debug, Default, Serialize, Deserialize)]
struct Book {
    first_visible_tab: usize,
    sheets: Vec<MemSheet>,
    styles: Vec<MemStyle>,
}

#[derive(Debug)]
struct MemWorkbook {
    flavor: WorkbookFlavor,
    book: Book,
}

/// An engine holding all of its workbooks in memory.
///
/// Closed workbook slots are retired, never reused, so a stale handle can
/// never silently alias a newer workbook.
#[derive(Debug, Default)]
pub struct MemoryEngine {
    workbooks: Vec<Option<MemWorkbook>>,
}

impl MemoryEngine {
    /// Create an engine with no open workbooks.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of styles registered with a workbook.
    ///
    /// # Errors
    /// [`RowbookError::InvariantViolation`] for a stale handle.
    pub fn style_count(&self, workbook: WorkbookId) -> Result<usize> {
        Ok(self.book(workbook)?.styles.len())
    }

    /// Point the first visible tab at the given sheet index.
    ///
    /// # Errors
    /// [`RowbookError::InvariantViolation`] for a stale handle.
    pub fn set_first_visible_tab(&mut self, workbook: WorkbookId, index: usize) -> Result<()> {
        self.book_mut(workbook)?.first_visible_tab = index;
        Ok(())
    }

    fn stale<T>(handle: &str) -> Result<T> {
        Err(RowbookError::InvariantViolation(format!(
            "{handle} handle is foreign, unknown, or closed"
        )))
    }

    fn book(&self, workbook: WorkbookId) -> Result<&Book> {
        match self.workbooks.get(workbook.index()) {
            Some(Some(wb)) => Ok(&wb.book),
            _ => Self::stale("workbook"),
        }
    }

    fn book_mut(&mut self, workbook: WorkbookId) -> Result<&mut Book> {
        match self.workbooks.get_mut(workbook.index()) {
            Some(Some(wb)) => Ok(&mut wb.book),
            _ => Self::stale("workbook"),
        }
    }

    fn mem_sheet(&self, sheet: SheetId) -> Result<&MemSheet> {
        match self.book(sheet.workbook())?.sheets.get(sheet.index()) {
            Some(s) => Ok(s),
            None => Self::stale("sheet"),
        }
    }

    fn mem_sheet_mut(&mut self, sheet: SheetId) -> Result<&mut MemSheet> {
        match self.book_mut(sheet.workbook())?.sheets.get_mut(sheet.index()) {
            Some(s) => Ok(s),
            None => Self::stale("sheet"),
        }
    }

    fn mem_row(&self, row: RowId) -> Result<&MemRow> {
        match self.mem_sheet(row.sheet())?.rows.get(&row.index()) {
            Some(r) => Ok(r),
            None => Self::stale("row"),
        }
    }

    fn mem_row_mut(&mut self, row: RowId) -> Result<&mut MemRow> {
        match self.mem_sheet_mut(row.sheet())?.rows.get_mut(&row.index()) {
            Some(r) => Ok(r),
            None => Self::stale("row"),
        }
    }

    fn mem_cell(&self, cell: CellId) -> Result<&MemCell> {
        match self.mem_row(cell.row())?.cells.get(&cell.column()) {
            Some(c) => Ok(c),
            None => Self::stale("cell"),
        }
    }

    fn mem_cell_mut(&mut self, cell: CellId) -> Result<&mut MemCell> {
        match self.mem_row_mut(cell.row())?.cells.get_mut(&cell.column()) {
            Some(c) => Ok(c),
            None => Self::stale("cell"),
        }
    }
}

impl Engine for MemoryEngine {
    fn new_workbook(&mut self, flavor: WorkbookFlavor) -> WorkbookId {
        let id = WorkbookId::new(self.workbooks.len());
        self.workbooks.push(Some(MemWorkbook {
            flavor,
            book: Book::default(),
        }));
        id
    }

    fn open_workbook(&mut self, bytes: &[u8], flavor: WorkbookFlavor) -> Result<WorkbookId> {
        let book: Book = serde_json::from_slice(bytes)
            .map_err(|e| RowbookError::Corrupted(e.to_string()))?;
        let id = WorkbookId::new(self.workbooks.len());
        self.workbooks.push(Some(MemWorkbook { flavor, book }));
        Ok(id)
    }

    fn close_workbook(&mut self, workbook: WorkbookId) {
        if let Some(slot) = self.workbooks.get_mut(workbook.index()) {
            *slot = None;
        }
    }

    fn flavor(&self, workbook: WorkbookId) -> Result<WorkbookFlavor> {
        match self.workbooks.get(workbook.index()) {
            Some(Some(wb)) => Ok(wb.flavor),
            _ => Self::stale("workbook"),
        }
    }

    fn create_sheet(&mut self, workbook: WorkbookId, name: &str) -> Result<SheetId> {
        let book = self.book_mut(workbook)?;
        book.sheets.push(MemSheet {
            name: name.to_string(),
            rows: BTreeMap::new(),
        });
        Ok(SheetId::new(workbook, book.sheets.len() - 1))
    }

    fn sheet_count(&self, workbook: WorkbookId) -> Result<usize> {
        Ok(self.book(workbook)?.sheets.len())
    }

    fn sheet_at(&self, workbook: WorkbookId, index: usize) -> Result<Option<SheetId>> {
        let book = self.book(workbook)?;
        Ok(book.sheets.get(index).map(|_| SheetId::new(workbook, index)))
    }

    fn sheet_name(&self, sheet: SheetId) -> Result<String> {
        Ok(self.mem_sheet(sheet)?.name.clone())
    }

    fn first_visible_tab(&self, workbook: WorkbookId) -> Result<Option<usize>> {
        let book = self.book(workbook)?;
        if book.sheets.is_empty() {
            Ok(None)
        } else {
            Ok(Some(book.first_visible_tab))
        }
    }

    fn create_row(&mut self, sheet: SheetId, index: u32) -> Result<RowId> {
        self.mem_sheet_mut(sheet)?.rows.insert(index, MemRow::default());
        Ok(RowId::new(sheet, index))
    }

    fn rows(&self, sheet: SheetId) -> Result<Vec<RowId>> {
        Ok(self
            .mem_sheet(sheet)?
            .rows
            .keys()
            .map(|&index| RowId::new(sheet, index))
            .collect())
    }

    fn create_cell(&mut self, row: RowId, column: u32) -> Result<CellId> {
        self.mem_row_mut(row)?.cells.insert(column, MemCell::default());
        Ok(CellId::new(row, column))
    }

    fn cells(&self, row: RowId) -> Result<Vec<CellId>> {
        Ok(self
            .mem_row(row)?
            .cells
            .keys()
            .map(|&column| CellId::new(row, column))
            .collect())
    }

    fn set_string(&mut self, cell: CellId, value: &str) -> Result<()> {
        self.mem_cell_mut(cell)?.value = Some(Scalar::Text(value.to_string()));
        Ok(())
    }

    fn set_number(&mut self, cell: CellId, value: f64) -> Result<()> {
        self.mem_cell_mut(cell)?.value = Some(Scalar::Real(value));
        Ok(())
    }

    fn set_boolean(&mut self, cell: CellId, value: bool) -> Result<()> {
        self.mem_cell_mut(cell)?.value = Some(Scalar::Boolean(value));
        Ok(())
    }

    fn set_date(&mut self, cell: CellId, value: NaiveDateTime) -> Result<()> {
        self.mem_cell_mut(cell)?.value = Some(Scalar::Date(value));
        Ok(())
    }

    fn scalar(&self, cell: CellId) -> Result<Option<Scalar>> {
        Ok(self.mem_cell(cell)?.value.clone())
    }

    #[allow(clippy::cast_precision_loss)]
    fn numeric_value(&self, cell: CellId) -> Result<Option<f64>> {
        Ok(match self.mem_cell(cell)?.value {
            Some(Scalar::Real(v)) => Some(v),
            Some(Scalar::Integer(v)) => Some(v as f64),
            _ => None,
        })
    }

    fn display_value(&self, cell: CellId) -> Result<String> {
        Ok(match &self.mem_cell(cell)?.value {
            None => String::new(),
            Some(Scalar::Text(s)) => s.clone(),
            Some(Scalar::Integer(v)) => v.to_string(),
            Some(Scalar::Real(v)) => format!("{v}"),
            Some(Scalar::Boolean(b)) => if *b { "TRUE" } else { "FALSE" }.to_string(),
            Some(Scalar::Date(d)) => d.format("%Y-%m-%d %H:%M:%S").to_string(),
        })
    }

    fn new_style(&mut self, workbook: WorkbookId) -> Result<StyleId> {
        let book = self.book_mut(workbook)?;
        book.styles.push(MemStyle::default());
        Ok(StyleId::new(workbook, book.styles.len() - 1))
    }

    fn set_style_pattern(&mut self, style: StyleId, pattern: &str) -> Result<()> {
        match self.book_mut(style.workbook())?.styles.get_mut(style.index()) {
            Some(s) => {
                s.pattern = pattern.to_string();
                Ok(())
            }
            None => Self::stale("style"),
        }
    }

    fn set_style_wrap(&mut self, style: StyleId, wrap: bool) -> Result<()> {
        match self.book_mut(style.workbook())?.styles.get_mut(style.index()) {
            Some(s) => {
                s.wrap = wrap;
                Ok(())
            }
            None => Self::stale("style"),
        }
    }

    fn apply_style(&mut self, cell: CellId, style: StyleId) -> Result<()> {
        if style.workbook() != cell.row().sheet().workbook() {
            return Self::stale("style");
        }
        if self.book(style.workbook())?.styles.get(style.index()).is_none() {
            return Self::stale("style");
        }
        self.mem_cell_mut(cell)?.style = Some(style.index());
        Ok(())
    }

    fn write_bytes(&mut self, workbook: WorkbookId, sink: &mut dyn Write) -> Result<()> {
        let book = self.book(workbook)?;
        serde_json::to_writer(&mut *sink, book)
            .map_err(|e| RowbookError::Io(std::io::Error::other(e)))?;
        sink.flush()?;
        Ok(())
    }
}
