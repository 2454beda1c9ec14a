use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::run::{RunLogic, RunOptions, RunSummary};
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{header, info, success, warning};

/// Handle the `run` command (also used when no command is given)
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Run {
        dry_run,
        keep_going,
        strict_status,
    } = cmd
    {
        let opts = RunOptions {
            dry_run: *dry_run,
            keep_going: *keep_going,
            strict_status: *strict_status,
        };

        let summary = RunLogic::run(cfg, opts)?;
        print_summary(&summary);

        if !summary.failed.is_empty() {
            return Err(AppError::RunFailed {
                failed: summary.failed.len(),
                attempted: summary.attempted(),
            });
        }
    }
    Ok(())
}

fn print_summary(summary: &RunSummary) {
    header("Run summary");

    if summary.generated.is_empty() {
        info("No unsent invoices found.");
    } else {
        success(format!(
            "{} invoice(s) generated: {}",
            summary.generated.len(),
            summary.generated.join(", ")
        ));
    }

    info(format!("{} row(s) already sent", summary.already_sent));

    if !summary.unrecognized.is_empty() {
        let rows: Vec<String> = summary.unrecognized.iter().map(u32::to_string).collect();
        warning(format!(
            "{} row(s) skipped with an unrecognized Sent value (rows {})",
            summary.unrecognized.len(),
            rows.join(", ")
        ));
    }

    for (row, message) in &summary.failed {
        warning(format!("Row {row}: {message}"));
    }
}
