//! Internal catalog table loading.
//!
//! The internal product catalog arrives as a delimited export from the PIM
//! with one row per sellable item. Four columns matter to the matcher:
//!
//! ```text
//! Item No;Item Name;Base Color;Color (lookup InRiver)
//! 10-4401;3-Seater Sofa;Green Collection;ln2034
//! ```
//!
//! Extra columns are ignored. Missing required columns are a load-time error
//! naming every absent header, since no matching is possible without them.
//! Records are loaded once per run and held read-only.

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RecordsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("catalog table is missing required column(s): {0}")]
    MissingColumns(String),
}

/// Columns the matcher depends on. The loader rejects tables without them.
pub const REQUIRED_COLUMNS: &[&str] = &[
    "Item No",
    "Item Name",
    "Base Color",
    "Color (lookup InRiver)",
];

/// One internal catalog row. Immutable after load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogRecord {
    #[serde(rename = "Item No")]
    pub item_no: String,
    #[serde(rename = "Item Name")]
    pub item_name: String,
    #[serde(rename = "Base Color")]
    pub base_color: String,
    #[serde(rename = "Color (lookup InRiver)")]
    pub color_lookup_code: String,
}

/// Load the catalog table from a `;`- or `,`-delimited file.
///
/// The delimiter is sniffed from the header line, since PIM exports in the
/// wild use either.
pub fn load_catalog(path: &Path) -> Result<Vec<CatalogRecord>, RecordsError> {
    let mut content = String::new();
    File::open(path)?.read_to_string(&mut content)?;
    read_catalog(content.as_bytes())
}

/// Parse catalog records from any reader. See [`load_catalog`].
pub fn read_catalog<R: Read>(reader: R) -> Result<Vec<CatalogRecord>, RecordsError> {
    let mut content = Vec::new();
    let mut reader = reader;
    reader.read_to_end(&mut content)?;

    let delimiter = sniff_delimiter(&content);
    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(content.as_slice());

    let headers = csv_reader.headers()?.clone();
    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .filter(|required| !headers.iter().any(|h| h.trim() == **required))
        .copied()
        .collect();
    if !missing.is_empty() {
        return Err(RecordsError::MissingColumns(missing.join(", ")));
    }

    let mut records = Vec::new();
    for row in csv_reader.deserialize() {
        records.push(row?);
    }
    Ok(records)
}

/// Pick `;` when the header line contains one, `,` otherwise.
fn sniff_delimiter(content: &[u8]) -> u8 {
    let header = content.split(|&b| b == b'\n').next().unwrap_or_default();
    if header.contains(&b';') { b';' } else { b',' }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_semicolon_delimited() {
        let data = "Item No;Item Name;Base Color;Color (lookup InRiver)\n\
                    10-4401;3-Seater Sofa;Green Collection;ln2034\n\
                    10-4402;2-Seater Sofa;Sand Collection;ln2048\n";

        let records = read_catalog(data.as_bytes()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].item_no, "10-4401");
        assert_eq!(records[0].item_name, "3-Seater Sofa");
        assert_eq!(records[0].base_color, "Green Collection");
        assert_eq!(records[0].color_lookup_code, "ln2034");
    }

    #[test]
    fn load_comma_delimited() {
        let data = "Item No,Item Name,Base Color,Color (lookup InRiver)\n\
                    10-4401,3-Seater Sofa,Green Collection,ln2034\n";

        let records = read_catalog(data.as_bytes()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].color_lookup_code, "ln2034");
    }

    #[test]
    fn extra_columns_are_ignored() {
        let data = "Item No;Item Name;Base Color;Color (lookup InRiver);Price\n\
                    10-4401;3-Seater Sofa;Green Collection;ln2034;999\n";

        let records = read_catalog(data.as_bytes()).unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn missing_columns_are_named() {
        let data = "Item No;Item Name\n10-4401;3-Seater Sofa\n";

        let err = read_catalog(data.as_bytes()).unwrap_err();
        match err {
            RecordsError::MissingColumns(cols) => {
                assert_eq!(cols, "Base Color, Color (lookup InRiver)");
            }
            other => panic!("expected MissingColumns, got {other:?}"),
        }
    }

    #[test]
    fn empty_table_yields_no_records() {
        let data = "Item No;Item Name;Base Color;Color (lookup InRiver)\n";
        let records = read_catalog(data.as_bytes()).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.csv");
        std::fs::write(
            &path,
            "Item No;Item Name;Base Color;Color (lookup InRiver)\n\
             10-4401;3-Seater Sofa;Green Collection;ln2034\n",
        )
        .unwrap();

        let records = load_catalog(&path).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].item_no, "10-4401");
    }
}
