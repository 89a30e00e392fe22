use crate::error::{ProwlerError, Result};
use crate::network::{InteractionRecord, NetworkTable};
use crate::parser::NetworkParser;
use calamine::Reader;
use std::io::{Cursor, Read};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Source {
    Delimited(u8),
    /// Named worksheet of an `.xls`/`.xlsx`/`.ods` workbook.
    Sheet(String),
}

/// Any interaction table with a header row, either delimited text or one
/// worksheet of a spreadsheet. The two named ORF columns are required; all
/// other columns are kept as they are.
#[derive(Debug, Clone)]
pub struct AnyNetworkParser {
    source: Source,
    query_column: String,
    array_column: String,
}

impl AnyNetworkParser {
    pub fn new(query_column: impl Into<String>, array_column: impl Into<String>) -> Self {
        Self {
            source: Source::Delimited(b','),
            query_column: query_column.into(),
            array_column: array_column.into(),
        }
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.source = Source::Delimited(delimiter);
        self
    }

    /// Reads the input as a workbook and takes the rows of `name`.
    pub fn with_sheet(mut self, name: impl Into<String>) -> Self {
        self.source = Source::Sheet(name.into());
        self
    }

    fn sheet_rows(source: &mut dyn Read, name: &str) -> Result<Vec<Vec<String>>> {
        let mut bytes = vec![];
        source.read_to_end(&mut bytes)?;
        let mut workbook = calamine::open_workbook_auto_from_rs(Cursor::new(bytes))?;
        if !workbook.sheet_names().iter().any(|s| s == name) {
            return Err(ProwlerError::MissingSheet(name.to_string()));
        }
        let range = workbook.worksheet_range(name)?;
        Ok(range
            .rows()
            .map(|row| row.iter().map(|cell| cell.to_string()).collect())
            .collect())
    }

    fn delimited_rows(source: &mut dyn Read, delimiter: u8) -> Result<Vec<Vec<String>>> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(false)
            .flexible(true)
            .from_reader(source);
        reader
            .records()
            .map(|record| -> Result<Vec<String>> {
                Ok(record?.iter().map(str::to_string).collect())
            })
            .collect()
    }

    fn build_table(&self, mut rows: impl Iterator<Item = Vec<String>>) -> Result<NetworkTable> {
        let headers = rows.next().unwrap_or_default();
        let position = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim() == name)
                .ok_or_else(|| ProwlerError::MissingColumn(name.to_string()))
        };
        let query_index = position(&self.query_column)?;
        let array_index = position(&self.array_column)?;
        let keep = |i: &usize| *i != query_index && *i != array_index;

        let columns = headers
            .iter()
            .enumerate()
            .filter(|(i, _)| keep(i))
            .map(|(_, h)| h.trim().to_string())
            .collect::<Vec<_>>();
        let width = headers.len();
        let mut table = NetworkTable::new(columns);

        for (i, mut record) in rows.enumerate() {
            // Header is line 1.
            let line = i + 2;
            if record.len() > width {
                return Err(ProwlerError::parse(
                    line,
                    format!("expected {width} fields, got {}", record.len()),
                ));
            }
            record.resize(width, String::new());
            let orf_query = record[query_index].trim().to_string();
            let orf_array = record[array_index].trim().to_string();
            if orf_query.is_empty() || orf_array.is_empty() {
                tracing::warn!(line, "skipping interaction without both ORFs");
                continue;
            }
            let fields = record
                .into_iter()
                .enumerate()
                .filter(|(i, _)| keep(i))
                .map(|(_, v)| v)
                .collect();
            table.push(InteractionRecord::new(orf_query, orf_array, fields))?;
        }
        Ok(table)
    }
}

impl NetworkParser for AnyNetworkParser {
    fn parse(&self, source: &mut dyn Read) -> Result<NetworkTable> {
        let rows = match &self.source {
            Source::Delimited(delimiter) => Self::delimited_rows(source, *delimiter)?,
            Source::Sheet(name) => Self::sheet_rows(source, name)?,
        };
        self.build_table(rows.into_iter())
    }
}
