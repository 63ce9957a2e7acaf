//! CSV decoding of raw site tables and encoding of enriched tables.

use std::io::{Read, Write};

use crate::error::{Result, SiteError};
use crate::models::{EnrichedTable, RawTable};

/// Decode a comma-delimited CSV with a header row.
///
/// Records may be shorter or longer than the header; missing trailing cells
/// read as blank.
pub fn read_csv<R: Read>(reader: R) -> Result<RawTable> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();
    if headers.is_empty() || headers.iter().all(|h| h.is_empty()) {
        return Err(SiteError::Csv("CSV file contains no header row".to_string()));
    }

    let mut table = RawTable::new(headers);
    for record in reader.records() {
        let record = record?;
        table.push_row(record.iter().map(|cell| cell.to_string()).collect());
    }

    tracing::debug!(columns = table.headers.len(), rows = table.len(), "Decoded CSV table");

    Ok(table)
}

/// Decode CSV from an in-memory buffer
pub fn read_csv_bytes(bytes: &[u8]) -> Result<RawTable> {
    read_csv(bytes)
}

/// Encode an enriched table as CSV, header row first
pub fn write_csv<W: Write>(table: &EnrichedTable, writer: W) -> Result<()> {
    let mut writer = csv::Writer::from_writer(writer);

    writer.write_record(table.headers())?;
    for row in table.rows() {
        writer.write_record(&row)?;
    }
    writer.flush()?;

    Ok(())
}

/// Encode an enriched table into a byte buffer
pub fn to_csv_bytes(table: &EnrichedTable) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    write_csv(table, &mut buffer)?;
    Ok(buffer)
}
