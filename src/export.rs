//! Feed serialization.
//!
//! Writes the generated rows to a `;`-delimited CSV file, the format the
//! downstream PIM import expects:
//!
//! ```text
//! Item No;Product;Frame;Options;Image URL;Match
//! 10-4401;ATLAS-SOFA;1;TEXTILE:LN-2034;https://content.cylindo.com/...;matched
//! ;ATLAS-SOFA;1;LEATHER:AN-07;https://content.cylindo.com/...;unresolved
//! ```
//!
//! Rows are written in the order the pipeline produced them — the ordering
//! contract lives upstream, this module only serializes. The `Item No` cell
//! is empty for unresolved rows; the `Match` column carries the per-row
//! diagnostic so ambiguous picks can be audited in the feed itself.

use crate::types::GeneratedRow;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

const HEADER: &[&str] = &["Item No", "Product", "Frame", "Options", "Image URL", "Match"];

/// Serialize rows to any writer as `;`-delimited CSV.
pub fn write_feed<W: Write>(writer: W, rows: &[GeneratedRow]) -> Result<(), ExportError> {
    let mut csv_writer = csv::WriterBuilder::new()
        .delimiter(b';')
        .from_writer(writer);

    csv_writer.write_record(HEADER)?;
    for row in rows {
        let angle = row.angle.to_string();
        let options = row.combination.render();
        let status = row.match_status.to_string();
        csv_writer.write_record([
            row.item_no.as_deref().unwrap_or(""),
            row.product_code.as_str(),
            angle.as_str(),
            options.as_str(),
            row.url.as_str(),
            status.as_str(),
        ])?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Write the feed to `path`, creating or truncating the file.
pub fn write_feed_file(path: &Path, rows: &[GeneratedRow]) -> Result<(), ExportError> {
    write_feed(File::create(path)?, rows)
}
