//! CSV export for chain records.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::chain::record::{Payload, Record};

/// Column header for CSV chain export.
const HEADER: &str = "index,timestamp,solar_kw,load_kw,soc_pct,status,\
                      grid_kw,digest,prev_digest,tampered";

/// Exports a record chain to a CSV file at the given path.
///
/// Writes a header row followed by one data row per record. Produces
/// deterministic output for identical inputs.
///
/// # Arguments
///
/// * `records` - Complete record chain
/// * `path` - Output file path
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_csv(records: &[Record], path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_csv(records, buf)
}

/// Writes a record chain as CSV to any writer.
///
/// Snapshot payloads fill the physics columns; injected raw payloads leave
/// them empty so the digest columns still line up.
///
/// # Arguments
///
/// * `records` - Complete record chain
/// * `writer` - Destination implementing `Write`
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_csv(records: &[Record], writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    // Header
    wtr.write_record(HEADER.split(',').map(str::trim))?;

    // Data rows
    for r in records {
        let (solar, load, soc, status, grid) = match &r.payload {
            Payload::Snapshot(s) => (
                format!("{:.2}", s.solar_kw),
                format!("{:.2}", s.load_kw),
                format!("{:.1}", s.battery.soc),
                s.battery.status.to_string(),
                format!("{:.2}", s.grid_kw),
            ),
            Payload::Raw(_) => (
                String::new(),
                String::new(),
                String::new(),
                String::new(),
                String::new(),
            ),
        };
        wtr.write_record(&[
            r.index.to_string(),
            r.timestamp.clone(),
            solar,
            load,
            soc,
            status,
            grid,
            r.digest.clone(),
            r.prev_digest.clone(),
            r.tampered.to_string(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
