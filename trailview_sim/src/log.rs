//! Reading recorded logs into raw rows.
//!
//! Rows are kept as strings; interpretation (header, widths, parsing) belongs
//! to the tables in `trailview_core`.

use crate::error::SimError;
use csv::{ReaderBuilder, Trim};
use std::io::Read;
use std::path::Path;

/// Reads every record of a comma-separated log, header included.
///
/// One line is one row and quotes have no meaning. Rows may have any number
/// of fields and surrounding whitespace is trimmed. Bytes that are not UTF-8
/// are replaced, so a damaged field fails to parse later and only its own row
/// is dropped.
pub fn read_rows<R: Read>(reader: R) -> Result<Vec<Vec<String>>, csv::Error> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .trim(Trim::All)
        .from_reader(reader);

    let mut rows = Vec::new();
    for record in reader.byte_records() {
        let record = record?;
        rows.push(
            record
                .iter()
                .map(|field| String::from_utf8_lossy(field).into_owned())
                .collect(),
        );
    }
    Ok(rows)
}

/// Reads a log file from disk.
pub fn read_rows_from_path(path: impl AsRef<Path>) -> Result<Vec<Vec<String>>, SimError> {
    let path = path.as_ref();
    let file = std::fs::File::open(path)?;
    read_rows(file).map_err(|source| SimError::Csv {
        path: path.to_path_buf(),
        source,
    })
}
