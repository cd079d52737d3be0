//! CSV export of amortization tables

use std::io;

use super::schedule::AmortizationSchedule;
use crate::error::{LoanError, LoanResult};

/// Column headers for schedule exports
pub const SCHEDULE_CSV_HEADERS: [&str; 8] = [
    "Payment #",
    "Payment Date",
    "Payment Amount",
    "Principal",
    "Interest",
    "Remaining Balance",
    "Cumulative Principal",
    "Cumulative Interest",
];

/// Write a schedule as CSV, currency values to 2 decimals
pub fn write_schedule_csv<W: io::Write>(
    schedule: &AmortizationSchedule,
    writer: W,
) -> LoanResult<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(SCHEDULE_CSV_HEADERS)?;

    for row in &schedule.schedule {
        wtr.write_record([
            row.payment_number.to_string(),
            row.payment_date.format("%Y-%m-%d").to_string(),
            format!("{:.2}", row.payment_amount),
            format!("{:.2}", row.principal_amount),
            format!("{:.2}", row.interest_amount),
            format!("{:.2}", row.remaining_balance),
            format!("{:.2}", row.cumulative_principal),
            format!("{:.2}", row.cumulative_interest),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Render a schedule as a CSV string
pub fn schedule_to_csv_string(schedule: &AmortizationSchedule) -> LoanResult<String> {
    let mut buffer = Vec::new();
    write_schedule_csv(schedule, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| LoanError::Io(io::Error::new(io::ErrorKind::InvalidData, e)))
}
