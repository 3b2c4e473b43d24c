//! Common test fixtures and helpers.
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::cast_possible_truncation
)]

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use rowbook::engine::memory::MemoryEngine;
use rowbook::engine::{CellId, Engine, RowId};
use rowbook::{writer, CellValue, FormatCategory, Result, RowSource, Scalar, WorkbookFlavor};

// ============================================================================
// Fixture record types
// ============================================================================

/// A typed record exercising every scalar kind.
#[derive(Debug, Clone, PartialEq)]
pub struct Ledger {
    pub label: String,
    pub units: i64,
    pub price: f64,
    pub settled: bool,
    pub booked: NaiveDateTime,
}

impl Ledger {
    pub fn new(label: &str, units: i64, price: f64, settled: bool) -> Self {
        Self {
            label: label.to_string(),
            units,
            price,
            settled,
            booked: NaiveDate::from_ymd_opt(2017, 2, 2)
                .unwrap()
                .and_time(NaiveTime::MIN),
        }
    }
}

impl RowSource for Ledger {
    fn to_cells(&self) -> Vec<Option<CellValue>> {
        vec![
            Self::cell(self.label.as_str()),
            Self::cell(self.units),
            Self::formatted_cell(self.price, FormatCategory::Currency),
            Self::cell(self.settled),
            Self::cell(self.booked),
        ]
    }
}

/// Single-column record whose one cell always shares the same style
/// fingerprint (currency, no wrap).
pub struct Price(pub f64);

impl RowSource for Price {
    fn to_cells(&self) -> Vec<Option<CellValue>> {
        vec![Self::formatted_cell(self.0, FormatCategory::Currency)]
    }
}

/// Record with an absent middle entry.
pub struct Gapped(pub i64, pub i64);

impl RowSource for Gapped {
    fn to_cells(&self) -> Vec<Option<CellValue>> {
        vec![Self::cell(self.0), None, Self::cell(self.1)]
    }
}

pub fn sample_ledger() -> Vec<Ledger> {
    vec![
        Ledger::new("travel", 3, 120.50, true),
        Ledger::new("meals", 1, 42.00, false),
        Ledger::new("lodging", 2, 310.75, true),
    ]
}

pub fn ledger_headers() -> Vec<String> {
    ["Label", "Units", "Price", "Settled", "Booked"]
        .iter()
        .map(ToString::to_string)
        .collect()
}

// ============================================================================
// Extraction hooks
// ============================================================================

fn scalar_at(engine: &MemoryEngine, cells: &[CellId], index: usize) -> Result<Option<Scalar>> {
    match cells.get(index) {
        Some(cell) => engine.scalar(*cell),
        None => Ok(None),
    }
}

/// Schema-aware inverse of `Ledger::to_cells`. Integers come back from the
/// engine as reals (the write path coerces them) and are converted here.
pub fn extract_ledger(engine: &MemoryEngine, row: RowId) -> Result<Option<Ledger>> {
    let cells = engine.cells(row)?;
    let Some(Scalar::Text(label)) = scalar_at(engine, &cells, 0)? else {
        return Ok(None);
    };
    let Some(Scalar::Real(units)) = scalar_at(engine, &cells, 1)? else {
        return Ok(None);
    };
    let Some(Scalar::Real(price)) = scalar_at(engine, &cells, 2)? else {
        return Ok(None);
    };
    let Some(Scalar::Boolean(settled)) = scalar_at(engine, &cells, 3)? else {
        return Ok(None);
    };
    let Some(Scalar::Date(booked)) = scalar_at(engine, &cells, 4)? else {
        return Ok(None);
    };
    Ok(Some(Ledger {
        label,
        units: units as i64,
        price,
        settled,
        booked,
    }))
}

// ============================================================================
// Workbook fixture files
// ============================================================================

/// Write one ledger sheet to a file under `dir`; returns the persisted
/// path.
pub fn ledger_file(
    engine: &mut MemoryEngine,
    dir: &Path,
    file_name: &str,
    headers: Option<&[String]>,
    records: &[Ledger],
) -> PathBuf {
    let workbook = engine.new_workbook(WorkbookFlavor::Packaged);
    writer::write_sheet(engine, workbook, "Ledger", headers, records).unwrap();
    writer::persist(engine, workbook, &dir.join(file_name)).unwrap()
}

/// Write one sheet per `(name, records)` pair to a file under `dir`.
pub fn multi_sheet_file(
    engine: &mut MemoryEngine,
    dir: &Path,
    file_name: &str,
    sheets: Vec<(&str, Vec<Ledger>)>,
) -> PathBuf {
    let data: BTreeMap<String, Vec<Ledger>> = sheets
        .into_iter()
        .map(|(name, records)| (name.to_string(), records))
        .collect();
    let workbook = engine.new_workbook(WorkbookFlavor::Packaged);
    writer::write_workbook(engine, workbook, &data, &rowbook::SheetHeaders::None).unwrap();
    writer::persist(engine, workbook, &dir.join(file_name)).unwrap()
}
