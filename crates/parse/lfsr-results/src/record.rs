//! CSV row reader.
//!
//! Decodes an input file and yields one [`RawRecord`] per data row, keyed by
//! the (whitespace-trimmed) header names.

use std::collections::HashMap;
use std::io::Cursor;
use std::path::Path;

use csv::{ReaderBuilder, StringRecordsIntoIter, Trim};

use crate::encoding::{self, Encoding, EncodingChoice};
use crate::error::{Result, ResultsError};

/// One CSV data row as a column-name to value mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    row: usize,
    fields: HashMap<String, String>,
}

impl RawRecord {
    /// Builds a record from `(column, value)` pairs.
    pub fn new<K, V>(row: usize, fields: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            row,
            fields: fields
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// 1-based data row number (the header is row 0).
    #[must_use]
    pub fn row(&self) -> usize {
        self.row
    }

    /// Value of `column`, if the row has one.
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields.get(column).map(String::as_str)
    }

    /// Number of fields present in this row.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if the row carries no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Single-pass iterator over the data rows of a decoded CSV file.
pub struct RecordReader {
    encoding: Encoding,
    headers: Vec<String>,
    rows: StringRecordsIntoIter<Cursor<String>>,
    row: usize,
}

impl RecordReader {
    /// Reads and decodes `path`, then positions the reader after the header.
    ///
    /// The whole file is read into memory and the handle closed before the
    /// first row is parsed.
    ///
    /// # Errors
    ///
    /// Returns [`ResultsError::Io`], [`ResultsError::Decode`] or
    /// [`ResultsError::NoHeader`].
    pub fn open(path: &Path, choice: EncodingChoice) -> Result<Self> {
        let (encoding, text) = encoding::read_decoded(path, choice)?;
        Self::new(text, encoding)
    }

    /// Builds a reader over already-decoded text.
    ///
    /// # Errors
    ///
    /// Returns [`ResultsError::NoHeader`] if `text` has no header row, or
    /// [`ResultsError::Csv`] if the header cannot be read.
    pub fn new(text: String, encoding: Encoding) -> Result<Self> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(Trim::Headers)
            .from_reader(Cursor::new(text));

        let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
        if headers.iter().all(String::is_empty) {
            return Err(ResultsError::NoHeader);
        }
        tracing::debug!(?headers, "read CSV header");

        Ok(Self {
            encoding,
            headers,
            rows: reader.into_records(),
            row: 0,
        })
    }

    /// Encoding the input was decoded with.
    #[must_use]
    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    /// Trimmed header names, in column order.
    #[must_use]
    pub fn headers(&self) -> &[String] {
        &self.headers
    }
}

impl Iterator for RecordReader {
    type Item = Result<RawRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        let record = match self.rows.next()? {
            Ok(record) => record,
            Err(e) => return Some(Err(e.into())),
        };
        self.row += 1;

        // Short rows leave trailing columns absent; extra fields are dropped.
        let fields = self
            .headers
            .iter()
            .map(String::as_str)
            .zip(record.iter());
        Some(Ok(RawRecord::new(self.row, fields)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reader(text: &str) -> RecordReader {
        RecordReader::new(text.to_string(), Encoding::Utf8).unwrap()
    }

    #[test]
    fn headers_are_trimmed() {
        let reader = reader("name , real_time,  cpu_time\nA,1,2\n");
        assert_eq!(reader.headers(), ["name", "real_time", "cpu_time"]);

        let rows: Vec<RawRecord> = reader.map(Result::unwrap).collect();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].row(), 1);
        assert_eq!(rows[0].get("name"), Some("A"));
        assert_eq!(rows[0].get("cpu_time"), Some("2"));
    }

    #[test]
    fn short_and_long_rows() {
        let rows: Vec<RawRecord> = reader("name,real_time,cpu_time\nA,1\nB,1,2,3,4\n")
            .map(Result::unwrap)
            .collect();
        assert_eq!(rows[0].get("real_time"), Some("1"));
        assert_eq!(rows[0].get("cpu_time"), None);
        assert_eq!(rows[1].len(), 3);
        assert_eq!(rows[1].get("cpu_time"), Some("2"));
    }

    #[test]
    fn quoted_names_keep_commas() {
        let rows: Vec<RawRecord> =
            reader("name,real_time\n\"LFSR_Galois<Degree_5>/a,b\",12.5\n")
                .map(Result::unwrap)
                .collect();
        assert_eq!(rows[0].get("name"), Some("LFSR_Galois<Degree_5>/a,b"));
    }

    #[test]
    fn empty_input_has_no_header() {
        let err = RecordReader::new(String::new(), Encoding::Utf8).err().unwrap();
        assert!(matches!(err, ResultsError::NoHeader));
    }

    #[test]
    fn header_only_yields_nothing() {
        assert_eq!(reader("name,real_time,cpu_time\n").count(), 0);
    }

    #[test]
    fn open_reads_utf16_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.csv");
        let mut bytes = vec![0xFF, 0xFE];
        for unit in "name,real_time\r\nA,1\r\n".encode_utf16() {
            bytes.extend_from_slice(&unit.to_le_bytes());
        }
        std::fs::write(&path, bytes).unwrap();

        let reader = RecordReader::open(&path, EncodingChoice::Auto).unwrap();
        assert_eq!(reader.encoding(), Encoding::Utf16);
        let rows: Vec<RawRecord> = reader.map(Result::unwrap).collect();
        assert_eq!(rows[0].get("real_time"), Some("1"));
    }

    #[test]
    fn fixed_encoding_matches_sniffed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.csv");
        std::fs::write(&path, "name,real_time\nLFSR_Galois<Degree_5>,1.5\n").unwrap();

        let names = |choice| {
            RecordReader::open(&path, choice)
                .unwrap()
                .map(|r| r.unwrap().get("name").map(str::to_string))
                .collect::<Vec<_>>()
        };
        assert_eq!(
            names(EncodingChoice::Auto),
            names(EncodingChoice::Fixed(Encoding::Utf8))
        );
    }
}
