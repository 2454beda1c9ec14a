use sheet_invoicer::core::run::{RunLogic, RunOptions};
use sheet_invoicer::errors::AppError;
use sheet_invoicer::models::invoice::{InvoiceTotals, format_amount};
use sheet_invoicer::render::{compose, render_row};
use sheet_invoicer::sheets::{MemoryWorksheet, Worksheet};
use std::fs;

mod common;
use common::{HEADER, config_for, row, worksheet};

#[test]
fn every_unsent_row_gets_one_document_and_one_update() {
    let tmp = tempfile::tempdir().unwrap();
    let cfg = config_for(tmp.path());
    let mut ws = worksheet(&[
        row("N", "1001", "10", "450"),
        row("Y", "1002", "8", "450"),
        row("N", "1003", "3.5", "600"),
        row("n", "1004", "1", "1"),
        row("", "1005", "1", "1"),
    ]);

    let summary = RunLogic::process(&cfg, &mut ws, RunOptions::default()).unwrap();
    assert_eq!(summary.generated, vec!["1001", "1003"]);

    let mut files: Vec<String> = fs::read_dir(tmp.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    files.sort();
    assert_eq!(files, vec!["Faktura-1001.pdf", "Faktura-1003.pdf"]);

    // n-th record (0-based) → sheet row n + 2, Sent is column 1
    let targets: Vec<(u32, u32, &str)> = ws
        .updates()
        .iter()
        .map(|u| (u.row, u.col, u.value.as_str()))
        .collect();
    assert_eq!(targets, vec![(2, 1, "Y"), (4, 1, "Y")]);
}

#[test]
fn flags_written_back_are_seen_by_the_next_read() {
    let tmp = tempfile::tempdir().unwrap();
    let cfg = config_for(tmp.path());
    let mut ws = worksheet(&[row("N", "7", "1", "100")]);

    RunLogic::process(&cfg, &mut ws, RunOptions::default()).unwrap();

    let rows = ws.read_all_records().unwrap();
    assert_eq!(rows[0].record.get("Sent").unwrap().to_string(), "Y");
}

#[test]
fn totals_match_worked_examples() {
    for (hours, rate, sub, tax, total) in [
        (10.0, 450.0, "4500.00", "1125.00", "5625.00"),
        (3.5, 600.0, "2100.00", "525.00", "2625.00"),
    ] {
        let t = InvoiceTotals::compute(hours, rate);
        assert_eq!(format_amount(t.subtotal), sub);
        assert_eq!(format_amount(t.tax), tax);
        assert_eq!(format_amount(t.total), total);
    }
}

#[test]
fn rendered_document_is_deterministic_and_carries_totals() {
    let tmp = tempfile::tempdir().unwrap();
    let cfg = config_for(tmp.path());
    let ws = worksheet(&[row("N", "1001", "10", "450")]);
    let rows = ws.read_all_records().unwrap();

    let (invoice, first) = render_row(&rows[0], &cfg).unwrap();
    let (_, second) = render_row(&rows[0], &cfg).unwrap();
    assert_eq!(first, second);

    let texts: Vec<String> = compose(&invoice, &cfg)
        .iter()
        .flat_map(|p| p.texts().into_iter().map(str::to_string).collect::<Vec<_>>())
        .collect();
    assert!(texts.contains(&"Subtotal: 4500.00 DKK".to_string()));
    assert!(texts.contains(&"Moms (25,00%): 1125.00 DKK".to_string()));
    assert!(texts.contains(&"Total: 5625.00 DKK".to_string()));
}

#[test]
fn missing_column_creates_no_document() {
    let tmp = tempfile::tempdir().unwrap();
    let cfg = config_for(tmp.path());
    let header: Vec<&str> = HEADER.iter().copied().filter(|h| *h != "Due Date").collect();
    let mut broken = row("N", "1001", "10", "450");
    broken.remove(3);
    let cells: Vec<&str> = broken.iter().map(String::as_str).collect();
    let mut ws = MemoryWorksheet::new("2024", &header).with_row(&cells);

    let err = RunLogic::process(&cfg, &mut ws, RunOptions::default()).unwrap_err();
    assert!(matches!(err, AppError::FieldMissing { ref field, .. } if field == "Due Date"));
    assert_eq!(fs::read_dir(tmp.path()).unwrap().count(), 0);
    assert!(ws.updates().is_empty());
}

#[test]
fn blank_text_cell_does_not_block_later_rows() {
    let tmp = tempfile::tempdir().unwrap();
    let cfg = config_for(tmp.path());
    let mut blank = row("N", "1001", "10", "450");
    blank[7] = String::new();
    let mut ws = worksheet(&[blank, row("N", "1002", "8", "450")]);

    let summary = RunLogic::process(&cfg, &mut ws, RunOptions::default()).unwrap();

    assert_eq!(summary.generated, vec!["1001", "1002"]);
    assert!(tmp.path().join("Faktura-1001.pdf").is_file());
    assert!(tmp.path().join("Faktura-1002.pdf").is_file());
    assert_eq!(ws.updates().len(), 2);
}
