//! CSV/TSV loader with delimiter detection.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use sha2::{Digest, Sha256};

use super::source::{Row, RowId, SourceMetadata, Table, Value};
use crate::error::{Result, SieveError};

/// Delimiters to try when auto-detecting.
const DELIMITERS: &[u8] = &[b'\t', b',', b';', b'|'];

/// Lines inspected when sniffing the delimiter.
const SNIFF_LINES: usize = 10;

/// Parser configuration.
#[derive(Debug, Clone)]
pub struct ParserConfig {
    /// Delimiter to use (None = auto-detect).
    pub delimiter: Option<u8>,
    /// Whether the file has a header row.
    pub has_header: bool,
    /// Maximum rows to read (None = all).
    pub max_rows: Option<usize>,
    /// Quote character.
    pub quote: u8,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            delimiter: None,
            has_header: true,
            max_rows: None,
            quote: b'"',
        }
    }
}

/// Loads delimited text files into tables.
pub struct Parser {
    config: ParserConfig,
}

impl Parser {
    /// Create a new parser with default configuration.
    pub fn new() -> Self {
        Self {
            config: ParserConfig::default(),
        }
    }

    /// Create a parser with custom configuration.
    pub fn with_config(config: ParserConfig) -> Self {
        Self { config }
    }

    /// Parse a file into a table named after the file stem.
    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<(Table, SourceMetadata)> {
        let path = path.as_ref();
        let io_err = |source| SieveError::Io {
            path: path.to_path_buf(),
            source,
        };

        let mut file = File::open(path).map_err(io_err)?;
        let size_bytes = file.metadata().map_err(io_err)?.len();

        let mut contents = Vec::new();
        file.read_to_end(&mut contents).map_err(io_err)?;

        let mut hasher = Sha256::new();
        hasher.update(&contents);
        let hash = format!("sha256:{:x}", hasher.finalize());

        let delimiter = match self.config.delimiter {
            Some(d) => d,
            None => detect_delimiter(&contents, self.config.quote)?,
        };

        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "table".to_string());

        let table = self.parse_bytes(&name, &contents, delimiter)?;

        let format = match delimiter {
            b'\t' => "tsv",
            b',' => "csv",
            b';' => "csv-semicolon",
            b'|' => "psv",
            _ => "delimited",
        }
        .to_string();

        tracing::debug!(
            table = %table.name,
            rows = table.row_count(),
            columns = table.column_count(),
            format = %format,
            "loaded table"
        );

        let source = SourceMetadata::new(
            path.to_path_buf(),
            hash,
            size_bytes,
            format,
            table.row_count(),
            table.column_count(),
        );

        Ok((table, source))
    }

    /// Parse bytes directly into a named table.
    pub fn parse_bytes(&self, name: &str, bytes: &[u8], delimiter: u8) -> Result<Table> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(self.config.has_header)
            .quote(self.config.quote)
            .flexible(true)
            .from_reader(bytes);

        let headers: Vec<String> = if self.config.has_header {
            reader.headers()?.iter().map(|s| s.trim().to_string()).collect()
        } else {
            Vec::new()
        };

        let mut records: Vec<csv::StringRecord> = Vec::new();
        for (row_idx, result) in reader.records().enumerate() {
            if self.config.max_rows.is_some_and(|max| row_idx >= max) {
                break;
            }
            records.push(result?);
        }

        let headers = if self.config.has_header {
            headers
        } else {
            let width = records.iter().map(|r| r.len()).max().unwrap_or(0);
            (0..width).map(|i| format!("column_{}", i + 1)).collect()
        };

        if headers.is_empty() || headers.iter().all(|h| h.is_empty()) {
            return Err(SieveError::EmptyData("No columns found".to_string()));
        }
        if records.is_empty() {
            return Err(SieveError::EmptyData("No data rows found".to_string()));
        }

        let expected_cols = headers.len();
        let rows = records
            .iter()
            .enumerate()
            .map(|(i, record)| {
                let values = record
                    .iter()
                    .take(expected_cols)
                    .map(Value::parse_cell)
                    .collect();
                Row::new(RowId(i), values)
            })
            .collect();

        Table::new(name, headers, rows)
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

/// Pick the delimiter whose separator count is most stable over the first
/// lines. Ties go to more fields, then to tab, then to `DELIMITERS` order.
fn detect_delimiter(bytes: &[u8], quote: u8) -> Result<u8> {
    let lines: Vec<&[u8]> = bytes
        .split(|&b| b == b'\n')
        .filter(|line| !line.trim_ascii().is_empty())
        .take(SNIFF_LINES)
        .collect();

    if lines.is_empty() {
        return Err(SieveError::EmptyData("No lines to analyze".to_string()));
    }

    let mut best: Option<((usize, usize, bool), u8)> = None;
    for &delimiter in DELIMITERS {
        let header = separators(lines[0], delimiter, quote);
        if header == 0 {
            continue;
        }
        let agreeing = lines
            .iter()
            .filter(|line| separators(line, delimiter, quote) == header)
            .count();
        let rank = (agreeing, header, delimiter == b'\t');
        if best.is_none_or(|(top, _)| rank > top) {
            best = Some((rank, delimiter));
        }
    }

    Ok(best.map_or(b',', |(_, delimiter)| delimiter))
}

/// Unquoted occurrences of `delimiter` in one line.
fn separators(line: &[u8], delimiter: u8, quote: u8) -> usize {
    let (count, _) = line.iter().fold((0, false), |(count, quoted), &b| {
        if b == quote {
            (count, !quoted)
        } else if b == delimiter && !quoted {
            (count + 1, quoted)
        } else {
            (count, quoted)
        }
    });
    count
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_delimiter_csv() {
        let data = b"a,b,c\n1,2,3\n4,5,6";
        assert_eq!(detect_delimiter(data, b'"').unwrap(), b',');
    }

    #[test]
    fn test_detect_delimiter_tsv() {
        let data = b"a\tb\tc\n1\t2\t3\n4\t5\t6";
        assert_eq!(detect_delimiter(data, b'"').unwrap(), b'\t');
    }

    #[test]
    fn test_detect_delimiter_ignores_quoted() {
        let data = b"name;note\n\"Smith, J\";\"a, b, c\"\nLee;x";
        assert_eq!(detect_delimiter(data, b'"').unwrap(), b';');
    }

    #[test]
    fn test_detect_delimiter_prefers_stable_counts() {
        // Commas appear only in the free-text line; pipes separate every line.
        let data = b"a|b|c\n1|2|3\nx, y, z, w|5|6";
        assert_eq!(detect_delimiter(data, b'"').unwrap(), b'|');
    }

    #[test]
    fn test_detect_delimiter_blank_input() {
        assert!(matches!(
            detect_delimiter(b"\n  \n", b'"'),
            Err(SieveError::EmptyData(_))
        ));
    }

    #[test]
    fn test_parse_typed_cells() {
        let parser = Parser::new();
        let data = b"name,age,city\nAlice,30,NYC\nBob,,LA";
        let table = parser.parse_bytes("people", data, b',').unwrap();

        assert_eq!(table.name, "people");
        assert_eq!(table.columns, vec!["name", "age", "city"]);
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.rows[0].get(0), &Value::from("Alice"));
        assert_eq!(table.rows[0].get(1), &Value::Number(30.0));
        assert_eq!(table.rows[1].get(1), &Value::Missing);
    }

    #[test]
    fn test_short_rows_pad_with_missing() {
        let parser = Parser::new();
        let data = b"a,b,c\n1,2\n4,5,6,7";
        let table = parser.parse_bytes("t", data, b',').unwrap();

        assert_eq!(table.rows[0].get(2), &Value::Missing);
        assert_eq!(table.rows[1].values.len(), 3);
    }

    #[test]
    fn test_headerless_columns_are_generated() {
        let parser = Parser::with_config(ParserConfig {
            has_header: false,
            ..ParserConfig::default()
        });
        let table = parser.parse_bytes("t", b"1,2\n3,4", b',').unwrap();

        assert_eq!(table.columns, vec!["column_1", "column_2"]);
        assert_eq!(table.row_count(), 2);
    }

    #[test]
    fn test_header_only_is_empty() {
        let parser = Parser::new();
        let err = parser.parse_bytes("t", b"a,b\n", b',').unwrap_err();
        assert!(matches!(err, SieveError::EmptyData(_)));
    }

    #[test]
    fn test_max_rows() {
        let parser = Parser::with_config(ParserConfig {
            max_rows: Some(1),
            ..ParserConfig::default()
        });
        let table = parser.parse_bytes("t", b"a\n1\n2\n3", b',').unwrap();
        assert_eq!(table.row_count(), 1);
    }
}
