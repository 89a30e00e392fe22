//! SGA v2 genetic-interaction files: tab-separated, no header, 13 fixed
//! columns.

use crate::error::{ProwlerError, Result};
use crate::network::{InteractionRecord, NetworkTable, ORF_ARRAY_COLUMN, ORF_QUERY_COLUMN};
use crate::parser::NetworkParser;
use std::io::Read;

pub const SGA2_COLUMNS: [&str; 13] = [
    ORF_QUERY_COLUMN,
    "GENE_Q",
    ORF_ARRAY_COLUMN,
    "GENE_A",
    "GIS",
    "GIS_SD",
    "GIS_P",
    "SMF_Q",
    "SMF_Q_SD",
    "SMF_A",
    "SMF_A_SD",
    "DMF",
    "DMF_SD",
];

const QUERY_INDEX: usize = 0;
const ARRAY_INDEX: usize = 2;
const FIRST_NUMERIC_INDEX: usize = 4;

#[derive(Debug, Clone, Copy, Default)]
pub struct Sga2Parser;

impl Sga2Parser {
    pub fn new() -> Self {
        Self
    }

    fn check_numeric(value: &str, column: &str, line: usize) -> Result<()> {
        let value = value.trim();
        if value.is_empty() || value.parse::<f64>().is_ok() {
            return Ok(());
        }
        Err(ProwlerError::parse(
            line,
            format!("column {column}: '{value}' is not a number"),
        ))
    }
}

impl NetworkParser for Sga2Parser {
    fn parse(&self, source: &mut dyn Read) -> Result<NetworkTable> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(false)
            .flexible(true)
            .from_reader(source);

        let columns = SGA2_COLUMNS
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != QUERY_INDEX && *i != ARRAY_INDEX)
            .map(|(_, c)| c.to_string())
            .collect();
        let mut table = NetworkTable::new(columns);

        for (i, record) in reader.records().enumerate() {
            let line = i + 1;
            let record = record?;
            if record.len() != SGA2_COLUMNS.len() {
                return Err(ProwlerError::parse(
                    line,
                    format!("expected {} columns, got {}", SGA2_COLUMNS.len(), record.len()),
                ));
            }
            for (value, column) in record.iter().zip(SGA2_COLUMNS).skip(FIRST_NUMERIC_INDEX) {
                Self::check_numeric(value, column, line)?;
            }
            let fields = record
                .iter()
                .enumerate()
                .filter(|(i, _)| *i != QUERY_INDEX && *i != ARRAY_INDEX)
                .map(|(_, v)| v.trim().to_string())
                .collect();
            table.push(InteractionRecord::new(
                record[QUERY_INDEX].trim(),
                record[ARRAY_INDEX].trim(),
                fields,
            ))?;
        }
        Ok(table)
    }
}
