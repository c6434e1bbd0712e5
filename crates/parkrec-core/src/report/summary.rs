//! Plain text processing summary.

use std::fmt::{self, Write as _};
use std::path::Path;

use crate::error::Result;
use crate::models::receipt::ProcessingResult;
use crate::receipt::rules::format_currency;

const RULE_WIDTH: usize = 50;

/// Render the summary report for a processing result.
///
/// The output is deterministic: duplicates and receipts are both listed in
/// ascending ticket order.
pub fn render_summary(result: &ProcessingResult) -> String {
    let mut out = String::new();
    // fmt::Write for String never fails
    let _ = write_report(&mut out, result);
    out
}

fn write_report(out: &mut String, result: &ProcessingResult) -> fmt::Result {
    let summary = result.summary();
    let heavy_rule = "═".repeat(RULE_WIDTH);
    let light_rule = "-".repeat(RULE_WIDTH);

    writeln!(out, "{heavy_rule}")?;
    writeln!(out, "       PARKING RECEIPT PROCESSING SUMMARY")?;
    writeln!(out, "{heavy_rule}")?;
    writeln!(out)?;

    writeln!(out, "Original receipts:    {}", summary.total_receipts)?;
    writeln!(out, "Unique receipts:      {}", summary.unique_receipts)?;
    writeln!(out, "Duplicates removed:   {}", summary.duplicate_count)?;
    writeln!(out)?;

    if !summary.duplicates.is_empty() {
        writeln!(out, "Duplicate ticket numbers:")?;
        for (ticket, count) in summary.duplicates.iter() {
            writeln!(out, "  - {ticket} ({count} instances)")?;
        }
        writeln!(out)?;
    }

    writeln!(out, "Total Amount:         {}", summary.formatted_amount)?;
    writeln!(out)?;
    writeln!(out, "{heavy_rule}")?;

    writeln!(out)?;
    writeln!(out, "Processed Receipts (sorted by ticket number):")?;
    writeln!(out, "{light_rule}")?;
    for record in result.records() {
        write!(
            out,
            "Ticket: {} | Amount: {}",
            record.ticket_number,
            format_currency(record.amount)
        )?;
        if let Some(date) = &record.date {
            write!(out, " | Date: {date}")?;
        }
        writeln!(out)?;
    }

    Ok(())
}

/// Render the summary and write it to `path` as UTF-8.
pub fn write_summary(result: &ProcessingResult, path: &Path) -> Result<()> {
    std::fs::write(path, render_summary(result))?;
    Ok(())
}
