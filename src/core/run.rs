use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::models::record::{SentStatus, SheetRow, columns};
use crate::render::render_row;
use crate::sheets::{Worksheet, authenticate, open_worksheet};
use crate::ui::messages::{error, info, success, warning};
use std::fs;
use std::path::Path;

/// Switches that change how a run treats failures and the sheet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Write documents but leave the `Sent` column untouched.
    pub dry_run: bool,
    /// Report a failing record and continue with the next one.
    pub keep_going: bool,
    /// Abort on a `Sent` value other than `Y`/`N` instead of skipping it.
    pub strict_status: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSummary {
    /// Invoice numbers written, in sheet order.
    pub generated: Vec<String>,
    pub already_sent: usize,
    /// Rows skipped because their `Sent` value was not recognised.
    pub unrecognized: Vec<u32>,
    /// Sheet row and error message of every record that failed.
    pub failed: Vec<(u32, String)>,
}

impl RunSummary {
    pub fn attempted(&self) -> usize {
        self.generated.len() + self.failed.len()
    }
}

/// High-level logic of one invoicing run.
pub struct RunLogic;

impl RunLogic {
    /// Connect to the configured worksheet and process it.
    pub fn run(config: &Config, opts: RunOptions) -> AppResult<RunSummary> {
        let target = &config.google_sheet;
        info(format!(
            "Opening worksheet '{}' of '{}'",
            target.work_sheet, target.file
        ));

        let session = authenticate(
            &config.key_file_path(),
            &config.google_sheets.scope.as_vec(),
        )?;
        let mut worksheet = open_worksheet(&session, &target.file, &target.work_sheet)?;
        log::debug!(
            "spreadsheet {} sheet {}, token valid until {:?}",
            worksheet.spreadsheet_id(),
            worksheet.sheet_id(),
            session.expires_at()
        );

        Self::process(config, &mut worksheet, opts)
    }

    /// Generate an invoice for every unsent row of `sheet` and flag it as sent.
    ///
    /// Rows are handled one at a time: the document is written, then the
    /// row's `Sent` cell is set to `Y`. Without `keep_going` the first error
    /// ends the run; earlier rows keep their document and flag.
    pub fn process<W: Worksheet + ?Sized>(
        config: &Config,
        sheet: &mut W,
        opts: RunOptions,
    ) -> AppResult<RunSummary> {
        let rows = sheet.read_all_records()?;
        let out_dir = config.invoice_dir();
        let mut summary = RunSummary::default();

        log::info!("{} record(s) in '{}'", rows.len(), sheet.title());

        for row in &rows {
            match row.sent_status() {
                Ok(SentStatus::Sent) => {
                    log::debug!("row {}: already sent", row.row);
                    summary.already_sent += 1;
                    continue;
                }
                Ok(SentStatus::Unsent) => {}
                Err(e) if opts.strict_status => return Err(e),
                Err(e) => {
                    warning(format!("Skipping row {}: {e}", row.row));
                    summary.unrecognized.push(row.row);
                    continue;
                }
            }

            match Self::process_row(config, sheet, row, &out_dir, opts) {
                Ok(number) => summary.generated.push(number),
                Err(e) if opts.keep_going => {
                    error(format!("Row {} failed: {e}", row.row));
                    summary.failed.push((row.row, e.to_string()));
                }
                Err(e) => return Err(e),
            }
        }

        Ok(summary)
    }

    fn process_row<W: Worksheet + ?Sized>(
        config: &Config,
        sheet: &mut W,
        row: &SheetRow,
        out_dir: &Path,
        opts: RunOptions,
    ) -> AppResult<String> {
        let sent_col =
            row.record
                .column_index(columns::SENT)
                .ok_or_else(|| AppError::FieldMissing {
                    field: columns::SENT.to_string(),
                    row: row.row,
                })?;

        let (invoice, bytes) = render_row(row, config)?;
        let path = out_dir.join(invoice.file_name());

        fs::write(&path, &bytes)
            .map_err(|e| AppError::Render(format!("cannot write {}: {e}", path.display())))?;
        success(format!("Invoice saved as {}", path.display()));

        if opts.dry_run {
            info(format!(
                "Dry run: 'Sent' left unchanged for Invoice Number: {}",
                invoice.invoice_number
            ));
            return Ok(invoice.invoice_number);
        }

        sheet.update_cell(row.row, sent_col, SentStatus::Sent.as_str())?;
        success(format!(
            "Updated 'Sent' status for Invoice Number: {}",
            invoice.invoice_number
        ));

        Ok(invoice.invoice_number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::tests::sample_config;
    use crate::sheets::{CellUpdate, MemoryWorksheet};

    const HEADER: [&str; 10] = [
        "Sent",
        "Invoice Number",
        "Date",
        "Due Date",
        "Week",
        "Place",
        "Description",
        "Case Number",
        "Hours Worked",
        "Hourly Rate",
    ];

    fn config_in(dir: &Path) -> Config {
        let mut cfg = sample_config();
        cfg.invoice_directory = dir.to_string_lossy().to_string();
        cfg
    }

    fn record(sent: &str, number: &str) -> Vec<String> {
        [
            sent,
            number,
            "01-05-2024",
            "16-05-2024",
            "18",
            "Aarhus",
            "Facade",
            "C-77",
            "10",
            "450",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect()
    }

    fn sheet(rows: &[Vec<String>]) -> MemoryWorksheet {
        let mut ws = MemoryWorksheet::new("2024", &HEADER);
        for r in rows {
            let cells: Vec<&str> = r.iter().map(String::as_str).collect();
            ws.push_row(&cells);
        }
        ws
    }

    #[test]
    fn only_unsent_rows_are_invoiced() {
        let tmp = tempfile::tempdir().unwrap();
        let cfg = config_in(tmp.path());
        let mut ws = sheet(&[
            record("Y", "1"),
            record("N", "2"),
            record("n", "3"),
            record("", "4"),
            record("N", "5"),
        ]);

        let summary = RunLogic::process(&cfg, &mut ws, RunOptions::default()).unwrap();

        assert_eq!(summary.generated, vec!["2", "5"]);
        assert_eq!(summary.already_sent, 1);
        assert_eq!(summary.unrecognized, vec![4, 5]);
        assert_eq!(
            ws.updates(),
            &[
                CellUpdate {
                    row: 3,
                    col: 1,
                    value: "Y".into()
                },
                CellUpdate {
                    row: 6,
                    col: 1,
                    value: "Y".into()
                },
            ]
        );
        assert!(tmp.path().join("Faktura-2.pdf").is_file());
        assert!(tmp.path().join("Faktura-5.pdf").is_file());
        assert!(!tmp.path().join("Faktura-3.pdf").exists());
        assert!(!tmp.path().join("Faktura-1.pdf").exists());
    }

    #[test]
    fn second_run_does_nothing() {
        let tmp = tempfile::tempdir().unwrap();
        let cfg = config_in(tmp.path());
        let mut ws = sheet(&[record("N", "10")]);

        RunLogic::process(&cfg, &mut ws, RunOptions::default()).unwrap();
        let again = RunLogic::process(&cfg, &mut ws, RunOptions::default()).unwrap();

        assert!(again.generated.is_empty());
        assert_eq!(again.already_sent, 1);
        assert_eq!(ws.updates().len(), 1);
    }

    #[test]
    fn strict_status_aborts_on_unknown_flag() {
        let tmp = tempfile::tempdir().unwrap();
        let cfg = config_in(tmp.path());
        let mut ws = sheet(&[record("maybe", "1"), record("N", "2")]);
        let opts = RunOptions {
            strict_status: true,
            ..Default::default()
        };

        let err = RunLogic::process(&cfg, &mut ws, opts).unwrap_err();
        assert!(matches!(err, AppError::InvalidSentStatus { row: 2, .. }));
        assert!(ws.updates().is_empty());
    }

    #[test]
    fn first_error_stops_the_run() {
        let tmp = tempfile::tempdir().unwrap();
        let cfg = config_in(tmp.path());
        let mut broken = record("N", "2");
        broken[8] = String::new();
        let mut ws = sheet(&[record("N", "1"), broken, record("N", "3")]);

        let err = RunLogic::process(&cfg, &mut ws, RunOptions::default()).unwrap_err();

        assert!(matches!(err, AppError::InvalidField { ref field, row: 3, .. } if field == "Hours Worked"));
        assert!(tmp.path().join("Faktura-1.pdf").is_file());
        assert!(!tmp.path().join("Faktura-2.pdf").exists());
        assert!(!tmp.path().join("Faktura-3.pdf").exists());
        assert_eq!(ws.updates().len(), 1);
    }

    #[test]
    fn blank_case_number_still_produces_invoice() {
        let tmp = tempfile::tempdir().unwrap();
        let cfg = config_in(tmp.path());
        let mut blank = record("N", "1001");
        blank[7] = String::new();
        let mut ws = sheet(&[blank, record("N", "1002")]);

        let summary = RunLogic::process(&cfg, &mut ws, RunOptions::default()).unwrap();

        assert_eq!(summary.generated, vec!["1001", "1002"]);
        assert!(tmp.path().join("Faktura-1001.pdf").is_file());
        assert!(tmp.path().join("Faktura-1002.pdf").is_file());
        assert_eq!(ws.updates().len(), 2);
    }

    #[test]
    fn keep_going_isolates_failures() {
        let tmp = tempfile::tempdir().unwrap();
        let cfg = config_in(tmp.path());
        let mut ws = sheet(&[record("N", "1"), record("N", "2"), record("N", "3")]);
        ws.fail_updates_on_row(3);
        let opts = RunOptions {
            keep_going: true,
            ..Default::default()
        };

        let summary = RunLogic::process(&cfg, &mut ws, opts).unwrap();

        assert_eq!(summary.generated, vec!["1", "3"]);
        assert_eq!(summary.failed.len(), 1);
        assert_eq!(summary.failed[0].0, 3);
        assert_eq!(summary.attempted(), 3);
        // the document of the failed update stays on disk
        assert!(tmp.path().join("Faktura-2.pdf").is_file());
        assert_eq!(ws.cell(3, 1), "N");
    }

    #[test]
    fn dry_run_leaves_sheet_untouched() {
        let tmp = tempfile::tempdir().unwrap();
        let cfg = config_in(tmp.path());
        let mut ws = sheet(&[record("N", "1")]);
        let opts = RunOptions {
            dry_run: true,
            ..Default::default()
        };

        let summary = RunLogic::process(&cfg, &mut ws, opts).unwrap();
        assert_eq!(summary.generated, vec!["1"]);
        assert!(ws.updates().is_empty());
        assert!(tmp.path().join("Faktura-1.pdf").is_file());
    }

    #[test]
    fn unwritable_directory_is_render_error() {
        let tmp = tempfile::tempdir().unwrap();
        let cfg = config_in(&tmp.path().join("missing"));
        let mut ws = sheet(&[record("N", "1")]);

        let err = RunLogic::process(&cfg, &mut ws, RunOptions::default()).unwrap_err();
        assert!(matches!(err, AppError::Render(_)));
        assert!(ws.updates().is_empty());
    }

    #[test]
    fn sent_column_position_follows_header() {
        let tmp = tempfile::tempdir().unwrap();
        let cfg = config_in(tmp.path());
        let mut header: Vec<&str> = HEADER[1..].to_vec();
        header.push("Sent");
        let mut ws = MemoryWorksheet::new("2024", &header);
        let mut row = record("N", "9");
        let sent = row.remove(0);
        row.push(sent);
        let cells: Vec<&str> = row.iter().map(String::as_str).collect();
        ws.push_row(&cells);

        RunLogic::process(&cfg, &mut ws, RunOptions::default()).unwrap();
        assert_eq!(ws.updates()[0].col, 10);
        assert_eq!(ws.updates()[0].row, 2);
    }
}
