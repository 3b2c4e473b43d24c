//! Typed extraction of rows from workbook documents.
//!
//! A [`TableReader`] binds to exactly one workbook opened from exactly one
//! byte source and is read-only for its whole lifetime. Per-row extraction
//! is a pluggable hook: `Fn(&E, RowId) -> Result<Option<T>>`, where
//! `Ok(None)` drops the row and `Err` fails the sheet. Whole-document
//! aggregation treats a failed sheet as a logged skip, never an abort.

use std::collections::BTreeMap;
use std::marker::PhantomData;
use std::path::Path;
use std::rc::Rc;

use crate::engine::{CellId, Engine, RowId, SheetId, WorkbookId};
use crate::error::{Result, RowbookError};
use crate::flavor::WorkbookFlavor;
use crate::settings::Settings;

/// Whole-document extraction result: sheet name → extracted records,
/// ordered by sheet name ascending.
pub type SheetResultMap<T> = BTreeMap<String, Vec<T>>;

/// First sheet whose name contains `name`, case-sensitive.
pub(crate) fn sheet_containing<E: Engine>(
    engine: &E,
    workbook: WorkbookId,
    name: &str,
) -> Result<SheetId> {
    let count = engine.sheet_count(workbook)?;
    for index in 0..count {
        if let Some(sheet) = engine.sheet_at(workbook, index)? {
            if engine.sheet_name(sheet)?.contains(name) {
                return Ok(sheet);
            }
        }
    }
    Err(RowbookError::SheetNotFound(name.to_string()))
}

/// Sheet at `index`, or `SheetNotFound`.
pub(crate) fn sheet_at_index<E: Engine>(
    engine: &E,
    workbook: WorkbookId,
    index: usize,
) -> Result<SheetId> {
    engine
        .sheet_at(workbook, index)?
        .ok_or_else(|| RowbookError::SheetNotFound(format!("index {index}")))
}

/// Reads typed records out of one workbook document.
pub struct TableReader<'e, E, T, X>
where
    E: Engine,
    X: Fn(&E, RowId) -> Result<Option<T>>,
{
    engine: &'e mut E,
    workbook: WorkbookId,
    extract: X,
    _records: PhantomData<fn() -> T>,
}

impl<'e, E, T, X> std::fmt::Debug for TableReader<'e, E, T, X>
where
    E: Engine,
    X: Fn(&E, RowId) -> Result<Option<T>>,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TableReader")
            .field("workbook", &self.workbook)
            .field("extract", &"<fn>")
            .finish()
    }
}

impl<'e, E, T, X> TableReader<'e, E, T, X>
where
    E: Engine,
    X: Fn(&E, RowId) -> Result<Option<T>>,
{
    /// Open the workbook at `path` and bind this reader to it.
    ///
    /// The reader holds the engine exclusively until dropped; dropping it
    /// releases the workbook. The input file is closed before this
    /// function returns, on success and on failure alike.
    ///
    /// # Errors
    /// [`RowbookError::UnsupportedFormat`] for an unrecognized extension,
    /// [`RowbookError::Corrupted`] if the engine cannot decode the bytes,
    /// or an I/O error reading the file.
    pub fn open(engine: &'e mut E, path: &Path, extract: X) -> Result<Self> {
        let flavor = WorkbookFlavor::from_path(path)?;
        let bytes = std::fs::read(path)?;
        let workbook = engine.open_workbook(&bytes, flavor)?;
        Ok(Self {
            engine,
            workbook,
            extract,
            _records: PhantomData,
        })
    }

    /// The bound workbook handle.
    #[must_use]
    pub fn workbook(&self) -> WorkbookId {
        self.workbook
    }

    /// First sheet whose name contains `name` (case-sensitive).
    ///
    /// # Errors
    /// [`RowbookError::SheetNotFound`] if no sheet name matches.
    pub fn sheet_by_name(&self, name: &str) -> Result<SheetId> {
        sheet_containing(&*self.engine, self.workbook, name)
    }

    /// The sheet at `index`.
    ///
    /// # Errors
    /// [`RowbookError::SheetNotFound`] if the index is out of range.
    pub fn sheet_at(&self, index: usize) -> Result<SheetId> {
        sheet_at_index(&*self.engine, self.workbook, index)
    }

    /// The first row's cell values as display strings. Empty when the
    /// sheet has no rows.
    ///
    /// # Errors
    /// Propagates engine failures.
    pub fn header_row(&self, sheet: SheetId) -> Result<Vec<String>> {
        let rows = self.engine.rows(sheet)?;
        let Some(first) = rows.first() else {
            return Ok(Vec::new());
        };
        self.engine
            .cells(*first)?
            .into_iter()
            .map(|cell| self.engine.display_value(cell))
            .collect()
    }

    /// Lazily extract records from a sheet's physical rows in row order.
    ///
    /// When `has_header` is set, the first row is consumed and discarded
    /// without extraction. The returned iterator is finite and
    /// non-restartable.
    ///
    /// # Errors
    /// Propagates engine failures enumerating the sheet's rows.
    pub fn read_sheet(&self, sheet: SheetId, has_header: bool) -> Result<Rows<'_, E, T, X>> {
        let mut ids = self.engine.rows(sheet)?.into_iter();
        if has_header {
            ids.next();
        }
        Ok(Rows {
            engine: &*self.engine,
            extract: &self.extract,
            ids,
        })
    }

    /// [`read_sheet`](Self::read_sheet), collected. The first extraction
    /// error aborts the sheet.
    ///
    /// # Errors
    /// Propagates engine and extraction failures.
    pub fn read_sheet_vec(&self, sheet: SheetId, has_header: bool) -> Result<Vec<T>> {
        self.read_sheet(sheet, has_header)?.collect()
    }

    /// Extract every sheet of the document into a name-keyed map.
    ///
    /// Best-effort aggregation: a sheet whose resolution or extraction
    /// fails is logged and omitted; one bad sheet never aborts the
    /// document.
    pub fn read_document(&self, has_header: bool) -> SheetResultMap<T> {
        let mut results = SheetResultMap::new();
        let count = match self.engine.sheet_count(self.workbook) {
            Ok(count) => count,
            Err(e) => {
                log::warn!("cannot enumerate sheets: {e}");
                return results;
            }
        };
        for index in 0..count {
            let extracted = self.sheet_at(index).and_then(|sheet| {
                let name = self.engine.sheet_name(sheet)?;
                let records = self.read_sheet_vec(sheet, has_header)?;
                Ok((name, records))
            });
            match extracted {
                Ok((name, records)) => {
                    results.insert(name, records);
                }
                Err(e) => log::warn!("skipping sheet {index}: {e}"),
            }
        }
        results
    }

    /// All non-empty sheet names, in workbook order.
    ///
    /// # Errors
    /// Propagates engine failures.
    pub fn sheet_names(&self) -> Result<Vec<String>> {
        let count = self.engine.sheet_count(self.workbook)?;
        let mut names = Vec::new();
        for index in 0..count {
            if let Some(sheet) = self.engine.sheet_at(self.workbook, index)? {
                let name = self.engine.sheet_name(sheet)?;
                if !name.is_empty() {
                    names.push(name);
                }
            }
        }
        Ok(names)
    }

    /// Index of the first sheet the engine resolves, or `None`.
    #[must_use]
    pub fn first_sheet_index(&self) -> Option<usize> {
        let count = self.engine.sheet_count(self.workbook).ok()?;
        (0..count).find(|&index| {
            matches!(self.engine.sheet_at(self.workbook, index), Ok(Some(_)))
        })
    }

    /// Index of the first sheet the engine marks visible, or `None`.
    #[must_use]
    pub fn first_visible_sheet_index(&self) -> Option<usize> {
        self.engine.first_visible_tab(self.workbook).ok().flatten()
    }

    /// Index of the first sheet whose name contains `text` under the
    /// requested case sensitivity, or `None`.
    #[must_use]
    pub fn find_sheet_index(&self, text: &str, case_sensitive: bool) -> Option<usize> {
        let count = self.engine.sheet_count(self.workbook).ok()?;
        let needle = if case_sensitive {
            text.to_string()
        } else {
            text.to_lowercase()
        };
        (0..count).find(|&index| {
            let Ok(Some(sheet)) = self.engine.sheet_at(self.workbook, index) else {
                return false;
            };
            let Ok(name) = self.engine.sheet_name(sheet) else {
                return false;
            };
            let name = if case_sensitive {
                name
            } else {
                name.to_lowercase()
            };
            name.contains(&needle)
        })
    }
}

impl<'e, E, T, X> Drop for TableReader<'e, E, T, X>
where
    E: Engine,
    X: Fn(&E, RowId) -> Result<Option<T>>,
{
    fn drop(&mut self) {
        self.engine.close_workbook(self.workbook);
    }
}

/// Lazy record iterator over one sheet's rows. See
/// [`TableReader::read_sheet`].
pub struct Rows<'r, E, T, X>
where
    E: Engine,
    X: Fn(&E, RowId) -> Result<Option<T>>,
{
    engine: &'r E,
    extract: &'r X,
    ids: std::vec::IntoIter<RowId>,
}

impl<'r, E, T, X> Iterator for Rows<'r, E, T, X>
where
    E: Engine,
    X: Fn(&E, RowId) -> Result<Option<T>>,
{
    type Item = Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let row = self.ids.next()?;
            match (self.extract)(self.engine, row) {
                Ok(Some(record)) => return Some(Ok(record)),
                Ok(None) => {}
                Err(e) => return Some(Err(e)),
            }
        }
    }
}

/// Collapse a whole-document result map into a single record list, in
/// sheet-name order.
#[must_use]
pub fn flatten<T>(results: SheetResultMap<T>) -> Vec<T> {
    results.into_values().flatten().collect()
}

/// A cell's value as a string, for callers that treat every column as
/// text.
///
/// Absent cells produce `""`. A numeric read is attempted first: integral
/// values render with no fractional part (`3`), non-integral values keep
/// their fraction (`3.7`). Cells with no numeric reading fall back to
/// their display string.
#[must_use]
pub fn cell_as_string<E: Engine>(engine: &E, cell: Option<CellId>) -> String {
    let Some(cell) = cell else {
        return String::new();
    };
    match engine.numeric_value(cell) {
        Ok(Some(value)) => format!("{value}"),
        _ => engine.display_value(cell).unwrap_or_default(),
    }
}

/// Boxed per-row extraction hook used by [`ConfiguredTableReader`].
type ConfiguredExtract<'e, E, T> = Box<dyn Fn(&E, RowId) -> Result<Option<T>> + 'e>;

/// A [`TableReader`] whose extraction hook receives an externally loaded
/// key/value [`Settings`] object alongside each row.
pub struct ConfiguredTableReader<'e, E, T>
where
    E: Engine,
{
    settings: Rc<Settings>,
    reader: TableReader<'e, E, T, ConfiguredExtract<'e, E, T>>,
}

impl<'e, E, T> ConfiguredTableReader<'e, E, T>
where
    E: Engine,
{
    /// Load settings from `config_path`, open the workbook at `data_path`,
    /// and bind the extraction function to both.
    ///
    /// A configuration-load failure is logged and degrades to empty
    /// settings; the reader stays usable. A data-file failure is fatal.
    ///
    /// # Errors
    /// As [`TableReader::open`] for the data file.
    pub fn open<F>(
        engine: &'e mut E,
        config_path: &Path,
        data_path: &Path,
        extract: F,
    ) -> Result<Self>
    where
        F: Fn(&E, RowId, &Settings) -> Result<Option<T>> + 'e,
    {
        let settings = Rc::new(match Settings::load(config_path) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("configuration load failed, continuing with empty settings: {e}");
                Settings::default()
            }
        });
        let hook_settings = Rc::clone(&settings);
        let hook: ConfiguredExtract<'e, E, T> =
            Box::new(move |engine, row| extract(engine, row, &hook_settings));
        Ok(Self {
            settings,
            reader: TableReader::open(engine, data_path, hook)?,
        })
    }

    /// The settings this reader was configured with.
    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// The underlying reader.
    #[must_use]
    pub fn reader(&self) -> &TableReader<'e, E, T, ConfiguredExtract<'e, E, T>> {
        &self.reader
    }
}
