//! Sheet and workbook assembly from row records.
//!
//! One [`StyleCache`] lives for exactly one sheet-writing pass: styles are
//! deduplicated by their `(pattern, wrap)` fingerprint, so the number of
//! style objects registered with the engine is bounded by the number of
//! distinct combinations actually used, never by the number of cells.
//! Unchecked style growth is a documented failure mode of the underlying
//! file formats.

use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::path::{Path, PathBuf};

use crate::engine::{CellId, Engine, SheetId, StyleId, WorkbookId};
use crate::error::{Result, RowbookError};
use crate::flavor::WorkbookFlavor;
use crate::format::style_key;
use crate::row::RowSource;
use crate::value::Scalar;

/// Sheet name used when the caller supplies an empty one.
pub const DEFAULT_SHEET_NAME: &str = "Sheet1";

/// Header policy for multi-sheet writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SheetHeaders {
    /// No header rows.
    None,
    /// One header list reused for every sheet.
    Shared(Vec<String>),
    /// Per-sheet headers. The key set must equal the data map's key set.
    PerSheet(BTreeMap<String, Vec<String>>),
}

/// Per-write-pass style arena keyed by `(pattern, wrap)`.
///
/// Scoped to one sheet-writing pass; never shared across sheets, workbooks,
/// or threads.
#[derive(Debug, Default)]
struct StyleCache {
    styles: HashMap<(String, bool), StyleId>,
}

impl StyleCache {
    /// Resolve the style handle for a cell value, registering a new style
    /// with the engine only on the first sighting of its fingerprint.
    fn resolve<E: Engine>(
        &mut self,
        engine: &mut E,
        workbook: WorkbookId,
        key: (String, bool),
    ) -> Result<StyleId> {
        if let Some(&style) = self.styles.get(&key) {
            return Ok(style);
        }
        let style = engine.new_style(workbook)?;
        engine.set_style_pattern(style, &key.0)?;
        engine.set_style_wrap(style, key.1)?;
        self.styles.insert(key, style);
        Ok(style)
    }
}

/// Write records (optionally under a header row) to a new sheet.
///
/// An empty `sheet_name` falls back to [`DEFAULT_SHEET_NAME`]. Header
/// cells are plain text with no style. Each record becomes one row at
/// `header offset + record index`; absent positional entries leave their
/// cell empty.
///
/// # Errors
/// Propagates engine failures; see [`crate::RowbookError`].
pub fn write_sheet<E: Engine, R: RowSource>(
    engine: &mut E,
    workbook: WorkbookId,
    sheet_name: &str,
    headers: Option<&[String]>,
    records: &[R],
) -> Result<SheetId> {
    let name = if sheet_name.is_empty() {
        DEFAULT_SHEET_NAME
    } else {
        sheet_name
    };
    let sheet = engine.create_sheet(workbook, name)?;
    let mut next_row = 0_u32;

    if let Some(headers) = headers {
        if !headers.is_empty() {
            let row = engine.create_row(sheet, next_row)?;
            next_row += 1;
            let mut column = 0_u32;
            for header in headers {
                let cell = engine.create_cell(row, column)?;
                engine.set_string(cell, header)?;
                column += 1;
            }
        }
    }

    let mut cache = StyleCache::default();
    for record in records {
        let row = engine.create_row(sheet, next_row)?;
        next_row += 1;
        let mut column = 0_u32;
        for entry in record.to_cells() {
            let cell = engine.create_cell(row, column)?;
            column += 1;
            let Some(value) = entry else {
                continue;
            };
            let style = cache.resolve(engine, workbook, style_key(&value))?;
            engine.apply_style(cell, style)?;
            set_scalar(engine, cell, value.scalar())?;
        }
    }

    log::debug!("wrote {} records to sheet {name:?}", records.len());
    Ok(sheet)
}

/// Write a sheet-name-keyed map of record lists, one sheet per entry in
/// key order.
///
/// # Errors
/// [`RowbookError::ConfigurationMismatch`] if per-sheet headers do not
/// cover exactly the data map's keys; raised before any sheet is created,
/// so a mismatch leaves the workbook untouched.
pub fn write_workbook<E: Engine, R: RowSource>(
    engine: &mut E,
    workbook: WorkbookId,
    data: &BTreeMap<String, Vec<R>>,
    headers: &SheetHeaders,
) -> Result<()> {
    if let SheetHeaders::PerSheet(map) = headers {
        if map.len() != data.len() {
            return Err(RowbookError::ConfigurationMismatch(format!(
                "{} header entries for {} data sheets",
                map.len(),
                data.len()
            )));
        }
        if !map.keys().eq(data.keys()) {
            return Err(RowbookError::ConfigurationMismatch(
                "header keys differ from data sheet names".to_string(),
            ));
        }
    }

    for (name, records) in data {
        let sheet_headers = match headers {
            SheetHeaders::None => None,
            SheetHeaders::Shared(list) => Some(list.as_slice()),
            SheetHeaders::PerSheet(map) => map.get(name).map(Vec::as_slice),
        };
        write_sheet(engine, workbook, name, sheet_headers, records.as_slice())?;
    }
    Ok(())
}

/// Allocate a new workbook of the requested flavor and write one sheet
/// into it.
///
/// # Errors
/// [`RowbookError::EmptyInput`] if `records` is empty (checked before the
/// workbook is allocated).
pub fn build_workbook<E: Engine, R: RowSource>(
    engine: &mut E,
    flavor: WorkbookFlavor,
    sheet_name: &str,
    headers: Option<&[String]>,
    records: &[R],
) -> Result<WorkbookId> {
    if records.is_empty() {
        return Err(RowbookError::EmptyInput);
    }
    let workbook = engine.new_workbook(flavor);
    write_sheet(engine, workbook, sheet_name, headers, records)?;
    Ok(workbook)
}

/// Persist a workbook to disk and close it.
///
/// The path's extension is corrected to the workbook flavor's persisted
/// extension first (plain → `.xls`; packaged and streaming → `.xlsx`); the
/// corrected path is returned. The output sink is closed on every exit
/// path; the workbook handle is released only on success and must not be
/// reused afterwards.
///
/// # Errors
/// I/O failures creating or writing the file, with the sink closed before
/// the error propagates.
pub fn persist<E: Engine>(engine: &mut E, workbook: WorkbookId, path: &Path) -> Result<PathBuf> {
    let flavor = engine.flavor(workbook)?;
    let target = flavor.corrected_path(path);
    let mut file = File::create(&target)?;
    let written = engine.write_bytes(workbook, &mut file);
    drop(file);
    written?;
    engine.close_workbook(workbook);
    log::debug!("persisted workbook to {}", target.display());
    Ok(target)
}

fn set_scalar<E: Engine>(engine: &mut E, cell: CellId, scalar: &Scalar) -> Result<()> {
    match scalar {
        Scalar::Date(value) => engine.set_date(cell, *value),
        Scalar::Boolean(value) => engine.set_boolean(cell, *value),
        Scalar::Text(value) => engine.set_string(cell, value),
        #[allow(clippy::cast_precision_loss)]
        Scalar::Integer(value) => engine.set_number(cell, *value as f64),
        Scalar::Real(value) => engine.set_number(cell, *value),
    }
}
