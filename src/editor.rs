//! In-place row mutation of existing workbooks.
//!
//! A [`TableEditor`] opens a workbook, applies a caller-supplied mutation
//! to each row of a chosen sheet, and re-persists. All side effects happen
//! on the shared in-memory workbook; nothing is collected or returned per
//! row.

use std::fs::File;
use std::path::Path;

use crate::engine::{Engine, RowId, SheetId, WorkbookId};
use crate::error::Result;
use crate::flavor::WorkbookFlavor;
use crate::reader::{sheet_at_index, sheet_containing};

/// How [`TableEditor::edit_sheet`] picks its sheet.
#[derive(Debug, Clone, Copy)]
pub enum SheetSelector<'a> {
    /// First sheet whose name contains the string, case-sensitive.
    Name(&'a str),
    /// The sheet at this index.
    Index(usize),
}

/// Edits one open workbook in place.
#[derive(Debug)]
pub struct TableEditor<'e, E: Engine> {
    engine: &'e mut E,
    workbook: WorkbookId,
}

impl<'e, E: Engine> TableEditor<'e, E> {
    /// Open the workbook at `path` for editing.
    ///
    /// # Errors
    /// [`RowbookError::UnsupportedFormat`](crate::RowbookError::UnsupportedFormat)
    /// for an unrecognized extension,
    /// [`RowbookError::Corrupted`](crate::RowbookError::Corrupted) if the
    /// engine cannot decode the bytes, or an I/O error reading the file.
    pub fn open(engine: &'e mut E, path: &Path) -> Result<Self> {
        let flavor = WorkbookFlavor::from_path(path)?;
        let bytes = std::fs::read(path)?;
        let workbook = engine.open_workbook(&bytes, flavor)?;
        Ok(Self { engine, workbook })
    }

    /// The workbook being edited.
    #[must_use]
    pub fn workbook(&self) -> WorkbookId {
        self.workbook
    }

    /// Apply `mutate` to every row of the selected sheet, in row order,
    /// skipping the first row when `has_header` is set.
    ///
    /// # Errors
    /// [`RowbookError::SheetNotFound`](crate::RowbookError::SheetNotFound)
    /// if the selector resolves nothing; the first `mutate` error aborts
    /// the pass with rows mutated so far left in place.
    pub fn edit_sheet<M>(
        &mut self,
        selector: SheetSelector<'_>,
        has_header: bool,
        mut mutate: M,
    ) -> Result<()>
    where
        M: FnMut(&mut E, RowId) -> Result<()>,
    {
        let sheet = self.resolve(selector)?;
        let mut rows = self.engine.rows(sheet)?.into_iter();
        if has_header {
            rows.next();
        }
        for row in rows {
            mutate(self.engine, row)?;
        }
        Ok(())
    }

    /// Persist the current in-memory workbook verbatim to `path`.
    ///
    /// Unlike [`crate::writer::persist`], the extension is NOT corrected:
    /// editing is in-place and must not move the caller's file. The sink
    /// is closed on every exit path, and the workbook stays open so
    /// further edits and saves are possible.
    ///
    /// # Errors
    /// I/O failures creating or writing the file.
    pub fn save(&mut self, path: &Path) -> Result<()> {
        let mut file = File::create(path)?;
        let written = self.engine.write_bytes(self.workbook, &mut file);
        drop(file);
        written
    }

    fn resolve(&self, selector: SheetSelector<'_>) -> Result<SheetId> {
        match selector {
            SheetSelector::Name(name) => sheet_containing(&*self.engine, self.workbook, name),
            SheetSelector::Index(index) => sheet_at_index(&*self.engine, self.workbook, index),
        }
    }
}

impl<'e, E: Engine> Drop for TableEditor<'e, E> {
    fn drop(&mut self) {
        self.engine.close_workbook(self.workbook);
    }
}
