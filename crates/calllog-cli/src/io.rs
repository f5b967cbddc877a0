//! CSV input, processed CSV output and the sync log file.

use anyhow::{Context, Result};
use calllog_domain::{ExtendedRow, FieldSchema, Row};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Rows of a CSV file along with its header, in file order.
#[derive(Debug, Clone, Default)]
pub struct CsvInput {
    /// Column names as they appear in the header
    pub headers: Vec<String>,
    /// One map per data row
    pub rows: Vec<Row>,
}

/// Read a CSV file with a header row.
///
/// Short rows are accepted; their missing columns read as empty cells.
pub fn read_rows(path: &Path) -> Result<CsvInput> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Failed to open CSV file: {}", path.display()))?;

    let headers: Vec<String> = reader
        .headers()
        .with_context(|| format!("Failed to read CSV header: {}", path.display()))?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').to_string())
        .collect();

    let mut rows = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        // Header is line 1
        let record = result.with_context(|| format!("Failed to read CSV line {}", idx + 2))?;
        let row: Row = headers
            .iter()
            .enumerate()
            .map(|(i, h)| (h.clone(), record.get(i).unwrap_or("").to_string()))
            .collect();
        rows.push(row);
    }

    Ok(CsvInput { headers, rows })
}

/// Input columns followed by schema fields that are not already columns.
pub fn processed_headers(headers: &[String], schema: &FieldSchema) -> Vec<String> {
    let mut columns = headers.to_vec();
    for name in schema.names() {
        if !columns.iter().any(|c| c == name) {
            columns.push(name.to_string());
        }
    }
    columns
}

/// Write processed rows: every input column plus the extracted fields.
pub fn write_processed(
    path: &Path,
    headers: &[String],
    schema: &FieldSchema,
    rows: &[ExtendedRow],
) -> Result<()> {
    let columns = processed_headers(headers, schema);
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create CSV file: {}", path.display()))?;

    writer.write_record(&columns)?;
    for row in rows {
        writer.write_record(columns.iter().map(|c| row.get(c).unwrap_or("")))?;
    }
    writer
        .flush()
        .with_context(|| format!("Failed to write CSV file: {}", path.display()))?;
    Ok(())
}

/// Write the sync log, one line per entry.
pub fn write_sync_log(path: &Path, lines: &[String]) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create log file: {}", path.display()))?;
    let mut out = BufWriter::new(file);
    for line in lines {
        writeln!(out, "{}", line)?;
    }
    out.flush()
        .with_context(|| format!("Failed to write log file: {}", path.display()))?;
    Ok(())
}
