//! Read-path tests: sheet resolution, typed extraction, whole-document
//! aggregation, string coercion.
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic, clippy::indexing_slicing)]

mod common;

use test_case::test_case;

use common::{extract_ledger, ledger_file, ledger_headers, multi_sheet_file, sample_ledger, Ledger};
use rowbook::engine::memory::MemoryEngine;
use rowbook::engine::Engine;
use rowbook::{reader, RowbookError, TableReader, WorkbookFlavor};

// ============================================================================
// Open / state machine
// ============================================================================

#[test]
fn open_rejects_unrecognized_extension() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data.csv");
    std::fs::write(&path, b"a,b,c").unwrap();
    let mut engine = MemoryEngine::new();

    let err = TableReader::open(&mut engine, &path, extract_ledger).unwrap_err();

    assert!(matches!(err, RowbookError::UnsupportedFormat { .. }));
}

#[test]
fn open_fails_on_undecodable_bytes() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data.xlsx");
    std::fs::write(&path, b"definitely not a workbook").unwrap();
    let mut engine = MemoryEngine::new();

    let err = TableReader::open(&mut engine, &path, extract_ledger).unwrap_err();

    assert!(matches!(err, RowbookError::Corrupted(_)));
}

#[test]
fn dropping_the_reader_releases_the_workbook() {
    let dir = tempfile::tempdir().unwrap();
    let mut engine = MemoryEngine::new();
    let path = ledger_file(&mut engine, dir.path(), "data.xlsx", None, &sample_ledger());

    let workbook = {
        let reader = TableReader::open(&mut engine, &path, extract_ledger).unwrap();
        reader.workbook()
    };

    let err = engine.sheet_count(workbook).unwrap_err();
    assert!(matches!(err, RowbookError::InvariantViolation(_)));
}

// ============================================================================
// Round-trip
// ============================================================================

#[test_case(None; "without header row")]
#[test_case(Some(ledger_headers()); "with header row")]
fn written_records_read_back_equal(headers: Option<Vec<String>>) {
    let dir = tempfile::tempdir().unwrap();
    let mut engine = MemoryEngine::new();
    let records = sample_ledger();
    let path = ledger_file(
        &mut engine,
        dir.path(),
        "data.xlsx",
        headers.as_deref(),
        &records,
    );
    let has_header = headers.is_some();

    let reader = TableReader::open(&mut engine, &path, extract_ledger).unwrap();
    let sheet = reader.sheet_by_name("Ledger").unwrap();
    let read_back = reader.read_sheet_vec(sheet, has_header).unwrap();

    assert_eq!(read_back, records);
}

#[test]
fn first_extracted_record_comes_from_row_one_under_headers() {
    let dir = tempfile::tempdir().unwrap();
    let mut engine = MemoryEngine::new();
    let records = sample_ledger();
    let headers = ledger_headers();
    let path = ledger_file(&mut engine, dir.path(), "data.xlsx", Some(headers.as_slice()), &records);

    // Extractor that tags each record with its physical row index.
    let reader = TableReader::open(&mut engine, &path, |engine: &MemoryEngine, row| {
        Ok(extract_ledger(engine, row)?.map(|ledger| (row.index(), ledger)))
    })
    .unwrap();
    let sheet = reader.sheet_by_name("Ledger").unwrap();
    let read_back = reader.read_sheet_vec(sheet, true).unwrap();

    // Row 0 is the header row and must never be extracted.
    assert_eq!(read_back.len(), records.len());
    assert_eq!(read_back[0].0, 1);
    assert_eq!(read_back[0].1, records[0]);
}

// ============================================================================
// Extraction hook behavior
// ============================================================================

#[test]
fn extractor_absent_drops_the_row() {
    let dir = tempfile::tempdir().unwrap();
    let mut engine = MemoryEngine::new();
    let records = sample_ledger();
    let path = ledger_file(&mut engine, dir.path(), "data.xlsx", None, &records);

    let reader = TableReader::open(&mut engine, &path, |engine: &MemoryEngine, row| {
        Ok(extract_ledger(engine, row)?.filter(|ledger| ledger.settled))
    })
    .unwrap();
    let sheet = reader.sheet_by_name("Ledger").unwrap();
    let read_back = reader.read_sheet_vec(sheet, false).unwrap();

    assert_eq!(read_back.len(), 2);
    assert!(read_back.iter().all(|ledger| ledger.settled));
}

#[test]
fn read_sheet_is_lazy_and_ordered() {
    let dir = tempfile::tempdir().unwrap();
    let mut engine = MemoryEngine::new();
    let records = sample_ledger();
    let path = ledger_file(&mut engine, dir.path(), "data.xlsx", None, &records);

    let reader = TableReader::open(&mut engine, &path, extract_ledger).unwrap();
    let sheet = reader.sheet_by_name("Ledger").unwrap();
    let mut rows = reader.read_sheet(sheet, false).unwrap();

    let first = rows.next().unwrap().unwrap();
    assert_eq!(first, records[0]);
    let rest: Vec<Ledger> = rows.map(Result::unwrap).collect();
    assert_eq!(rest, records[1..]);
}

// ============================================================================
// Whole-document aggregation
// ============================================================================

#[test]
fn read_document_aggregates_by_sheet_name() {
    let dir = tempfile::tempdir().unwrap();
    let mut engine = MemoryEngine::new();
    let path = multi_sheet_file(
        &mut engine,
        dir.path(),
        "data.xlsx",
        vec![
            ("west", vec![Ledger::new("w", 1, 1.0, true)]),
            ("east", vec![Ledger::new("e", 2, 2.0, false)]),
        ],
    );

    let reader = TableReader::open(&mut engine, &path, extract_ledger).unwrap();
    let results = reader.read_document(false);

    let names: Vec<&str> = results.keys().map(String::as_str).collect();
    assert_eq!(names, vec!["east", "west"]);
    assert_eq!(results["west"][0].label, "w");
    assert_eq!(results["east"][0].label, "e");
}

#[test]
fn one_failing_sheet_is_skipped_not_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let mut engine = MemoryEngine::new();
    let path = multi_sheet_file(
        &mut engine,
        dir.path(),
        "data.xlsx",
        vec![
            ("s1", vec![Ledger::new("one", 1, 1.0, true)]),
            ("s2", vec![Ledger::new("explode", 2, 2.0, true)]),
            ("s3", vec![Ledger::new("three", 3, 3.0, true)]),
        ],
    );

    let reader = TableReader::open(&mut engine, &path, |engine: &MemoryEngine, row| {
        let record = extract_ledger(engine, row)?;
        if let Some(ledger) = &record {
            if ledger.label == "explode" {
                return Err(RowbookError::Corrupted("explosive row".to_string()));
            }
        }
        Ok(record)
    })
    .unwrap();
    let results = reader.read_document(false);

    assert_eq!(results.len(), 2);
    assert!(results.contains_key("s1"));
    assert!(!results.contains_key("s2"));
    assert!(results.contains_key("s3"));
}

#[test]
fn flatten_collapses_in_sheet_name_order() {
    let dir = tempfile::tempdir().unwrap();
    let mut engine = MemoryEngine::new();
    let path = multi_sheet_file(
        &mut engine,
        dir.path(),
        "data.xlsx",
        vec![
            ("b", vec![Ledger::new("second", 2, 2.0, true)]),
            ("a", vec![Ledger::new("first", 1, 1.0, true)]),
        ],
    );

    let reader = TableReader::open(&mut engine, &path, extract_ledger).unwrap();
    let flat = reader::flatten(reader.read_document(false));

    let labels: Vec<&str> = flat.iter().map(|l| l.label.as_str()).collect();
    assert_eq!(labels, vec!["first", "second"]);
}

// ============================================================================
// Sheet resolution and queries
// ============================================================================

#[test]
fn sheet_by_name_matches_substring_case_sensitively() {
    let dir = tempfile::tempdir().unwrap();
    let mut engine = MemoryEngine::new();
    let path = multi_sheet_file(
        &mut engine,
        dir.path(),
        "data.xlsx",
        vec![("alpha", Vec::new()), ("beta-data", Vec::new())],
    );

    let reader = TableReader::open(&mut engine, &path, extract_ledger).unwrap();

    let sheet = reader.sheet_by_name("ta-da").unwrap();
    assert_eq!(sheet.index(), 1);
    let err = reader.sheet_by_name("BETA").unwrap_err();
    assert!(matches!(err, RowbookError::SheetNotFound(_)));
}

#[test]
fn sheet_at_out_of_range_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let mut engine = MemoryEngine::new();
    let path = ledger_file(&mut engine, dir.path(), "data.xlsx", None, &sample_ledger());

    let reader = TableReader::open(&mut engine, &path, extract_ledger).unwrap();

    assert!(reader.sheet_at(0).is_ok());
    let err = reader.sheet_at(5).unwrap_err();
    assert!(matches!(err, RowbookError::SheetNotFound(_)));
}

#[test]
fn header_row_returns_display_strings() {
    let dir = tempfile::tempdir().unwrap();
    let mut engine = MemoryEngine::new();
    let headers = ledger_headers();
    let path = ledger_file(
        &mut engine,
        dir.path(),
        "data.xlsx",
        Some(headers.as_slice()),
        &sample_ledger(),
    );

    let reader = TableReader::open(&mut engine, &path, extract_ledger).unwrap();
    let sheet = reader.sheet_by_name("Ledger").unwrap();

    assert_eq!(reader.header_row(sheet).unwrap(), headers);
}

#[test]
fn sheet_names_skips_empty_names() {
    let dir = tempfile::tempdir().unwrap();
    let mut engine = MemoryEngine::new();
    let workbook = engine.new_workbook(WorkbookFlavor::Packaged);
    engine.create_sheet(workbook, "").unwrap();
    engine.create_sheet(workbook, "data").unwrap();
    let path = rowbook::writer::persist(&mut engine, workbook, &dir.path().join("data.xlsx"))
        .unwrap();

    let reader = TableReader::open(&mut engine, &path, extract_ledger).unwrap();

    assert_eq!(reader.sheet_names().unwrap(), vec!["data".to_string()]);
    assert_eq!(reader.first_sheet_index(), Some(0));
}

#[test]
fn first_visible_sheet_index_follows_the_engine_tab() {
    let dir = tempfile::tempdir().unwrap();
    let mut engine = MemoryEngine::new();
    let workbook = engine.new_workbook(WorkbookFlavor::Packaged);
    engine.create_sheet(workbook, "hidden").unwrap();
    engine.create_sheet(workbook, "shown").unwrap();
    engine.set_first_visible_tab(workbook, 1).unwrap();
    let path = rowbook::writer::persist(&mut engine, workbook, &dir.path().join("data.xlsx"))
        .unwrap();

    let reader = TableReader::open(&mut engine, &path, extract_ledger).unwrap();

    assert_eq!(reader.first_visible_sheet_index(), Some(1));
}

#[test_case("beta", false, Some(1); "case insensitive hit")]
#[test_case("BETA", true, None; "case sensitive miss")]
#[test_case("missing", false, None; "absent name")]
fn find_sheet_index_honors_case_flag(text: &str, case_sensitive: bool, expected: Option<usize>) {
    let dir = tempfile::tempdir().unwrap();
    let mut engine = MemoryEngine::new();
    let path = multi_sheet_file(
        &mut engine,
        dir.path(),
        "data.xlsx",
        vec![("alpha", Vec::new()), ("Beta", Vec::new())],
    );

    let reader = TableReader::open(&mut engine, &path, extract_ledger).unwrap();

    assert_eq!(reader.find_sheet_index(text, case_sensitive), expected);
}

// ============================================================================
// cell_as_string
// ============================================================================

#[test]
fn cell_as_string_handles_absent_and_typed_cells() {
    let mut engine = MemoryEngine::new();
    let workbook = engine.new_workbook(WorkbookFlavor::Packaged);
    let sheet = engine.create_sheet(workbook, "S").unwrap();
    let row = engine.create_row(sheet, 0).unwrap();

    let text = engine.create_cell(row, 0).unwrap();
    engine.set_string(text, "plain").unwrap();
    let whole = engine.create_cell(row, 1).unwrap();
    engine.set_number(whole, 3.0).unwrap();
    let fractional = engine.create_cell(row, 2).unwrap();
    engine.set_number(fractional, 3.7).unwrap();
    let flag = engine.create_cell(row, 3).unwrap();
    engine.set_boolean(flag, true).unwrap();

    assert_eq!(reader::cell_as_string(&engine, None), "");
    assert_eq!(reader::cell_as_string(&engine, Some(text)), "plain");
    // Integral numerics render with no fractional part.
    assert_eq!(reader::cell_as_string(&engine, Some(whole)), "3");
    // Non-integral numerics keep their fraction (no silent truncation).
    assert_eq!(reader::cell_as_string(&engine, Some(fractional)), "3.7");
    assert_eq!(reader::cell_as_string(&engine, Some(flag)), "TRUE");
}
