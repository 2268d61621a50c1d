// src/ingest.rs - Tabular I/O for the weekly batch and the sent-records
// ledger. The batch is the caller's hand-off and is validated strictly; the
// ledger is historical data and always degrades to "no history" on failure.

use anyhow::{bail, Context, Result};
use csv::{ReaderBuilder, Trim};
use log::warn;
use std::io::Read;
use std::path::Path;

use crate::models::records::{HistoricalRecord, Request};

const REQUIRED_BATCH_COLUMNS: [&str; 3] = ["Name", "Phone", "Address"];

/// Loads an uploaded batch. Missing required columns or unreadable rows are
/// hard errors; this file is fresh user input and silently dropping rows
/// would hide requesters.
pub fn load_requests(path: &Path) -> Result<Vec<Request>> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open batch file {}", path.display()))?;
    read_requests(file).with_context(|| format!("Failed to parse batch file {}", path.display()))
}

pub fn read_requests<R: Read>(reader: R) -> Result<Vec<Request>> {
    let mut csv_reader = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers = csv_reader.headers().context("Batch file has no header row")?;
    for required in REQUIRED_BATCH_COLUMNS {
        if !headers.iter().any(|h| h == required) {
            bail!("Batch file is missing required column '{}'", required);
        }
    }

    let mut requests = Vec::new();
    for (row_number, row) in csv_reader.deserialize::<Request>().enumerate() {
        let request = row.with_context(|| format!("Invalid batch row {}", row_number + 2))?;
        requests.push(request);
    }
    Ok(requests)
}

/// Loads the historical ledger. A missing or corrupt file is logged and
/// treated as an empty ledger; detection then simply finds no duplicates,
/// which is the conservative outcome.
pub fn load_ledger(path: &Path) -> Vec<HistoricalRecord> {
    let file = match std::fs::File::open(path) {
        Ok(file) => file,
        Err(error) => {
            warn!(
                "Ledger file {} unavailable, continuing without historical data: {}",
                path.display(),
                error
            );
            return Vec::new();
        }
    };
    read_ledger(file)
}

pub fn read_ledger<R: Read>(reader: R) -> Vec<HistoricalRecord> {
    let mut csv_reader = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_reader(reader);

    let mut records = Vec::new();
    for (row_number, row) in csv_reader.deserialize::<HistoricalRecord>().enumerate() {
        match row {
            Ok(record) => records.push(record),
            Err(error) => {
                // Schema drift in old campaign rows; skip the row, keep the pass.
                warn!("Skipping unreadable ledger row {}: {}", row_number + 2, error);
            }
        }
    }
    records
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batch_rows_deserialize_with_optional_columns_defaulted() {
        let data = "Name,Phone,Address\nJohn Smith,2065044242,123 Main St\n";
        let requests = read_requests(data.as_bytes()).expect("valid batch");
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].name, "John Smith");
        assert_eq!(requests[0].book, "");
        assert_eq!(requests[0].language, "");
    }

    #[test]
    fn batch_missing_required_column_is_an_error() {
        let data = "Name,Address\nJohn Smith,123 Main St\n";
        let error = read_requests(data.as_bytes()).unwrap_err();
        assert!(error.to_string().contains("Phone"));
    }

    #[test]
    fn ledger_reads_full_schema() {
        let data = "Name,Phone,Address,Book,Language,Sent_Date,Message_Type,Status\n\
                    John Smith,12065044242,123 Main St,GG,Hindi,2025-10-05,WhatsApp,Sent\n";
        let records = read_ledger(data.as_bytes());
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].book, "GG");
        assert_eq!(records[0].sent_date, "2025-10-05");
    }

    #[test]
    fn missing_ledger_file_degrades_to_empty() {
        let records = load_ledger(Path::new("/nonexistent/All_Sent_Records.csv"));
        assert!(records.is_empty());
    }
}
