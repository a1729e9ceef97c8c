// Pipeline ingestion: reading the delimited source file into an untyped table

use csv::ReaderBuilder;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info, instrument};

use crate::error::Result;

/// Source table exactly as read: every column, every row, source order,
/// cells as text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Open `path` and read it as a delimited table with a header row.
///
/// An unreadable path is an I/O error; text that is not validly delimited
/// (ragged rows, invalid UTF-8) is a parse error. Neither is recovered.
#[instrument(skip_all, fields(path = %path.display()))]
pub fn load_table(path: &Path, delimiter: u8) -> Result<RawTable> {
    let file = File::open(path)?;
    let table = read_table(file, delimiter)?;
    info!(rows = table.len(), columns = table.headers.len(), "Loaded source table");
    Ok(table)
}

/// Read a delimited table from any reader.
pub fn read_table<R: Read>(reader: R, delimiter: u8) -> Result<RawTable> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .delimiter(delimiter)
        .flexible(false)
        .from_reader(reader);

    let headers: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();
    debug!(?headers, "Read header row");

    let mut rows = Vec::new();
    for record in rdr.records() {
        let record = record?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    Ok(RawTable { headers, rows })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ChartError;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_read_table_preserves_columns_and_order() {
        let data = "System,Domain,Extra\nPerceptron,Vision,x\nGPT-3,Language,y\n";
        let table = read_table(data.as_bytes(), b',').unwrap();

        assert_eq!(table.headers, vec!["System", "Domain", "Extra"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows[0], vec!["Perceptron", "Vision", "x"]);
        assert_eq!(table.rows[1][0], "GPT-3");
    }

    #[test]
    fn test_read_table_handles_quoted_delimiters() {
        let data = "System,Domain\n\"Theseus, the mouse\",Other\n";
        let table = read_table(data.as_bytes(), b',').unwrap();
        assert_eq!(table.rows[0][0], "Theseus, the mouse");
    }

    #[test]
    fn test_read_table_custom_delimiter() {
        let data = "System;Domain\nAlexNet;Vision\n";
        let table = read_table(data.as_bytes(), b';').unwrap();
        assert_eq!(table.headers, vec!["System", "Domain"]);
        assert_eq!(table.rows[0], vec!["AlexNet", "Vision"]);
    }

    #[test]
    fn test_ragged_rows_are_parse_errors() {
        let data = "System,Domain\nAlexNet,Vision,extra\n";
        let err = read_table(data.as_bytes(), b',').unwrap_err();
        assert!(matches!(err, ChartError::Parse(_)));
    }

    #[test]
    fn test_invalid_utf8_is_parse_error() {
        let mut data = b"System,Domain\n".to_vec();
        data.extend_from_slice(&[0xff, 0xfe, b',', b'V', b'\n']);
        let err = read_table(data.as_slice(), b',').unwrap_err();
        assert!(matches!(err, ChartError::Parse(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_table(Path::new("/definitely/not/here.csv"), b',').unwrap_err();
        assert!(matches!(err, ChartError::Io(_)));
    }

    #[test]
    fn test_load_table_from_disk() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "System,Domain").unwrap();
        writeln!(file, "AlphaGo,Games").unwrap();

        let table = load_table(file.path(), b',').unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.rows[0], vec!["AlphaGo", "Games"]);
    }
}
