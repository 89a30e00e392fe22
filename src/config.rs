use crate::apis::DEFAULT_KEGG_REST_URL;
use crate::error::Result;
use crate::profile::{Symbols, DEFAULT_NEGATIVE_SYMBOL, DEFAULT_POSITIVE_SYMBOL};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const DEFAULT_CONFIG_PATH: &str = "prowler.json";

/// Reference organisms profiles are built against, by KEGG name or code.
pub const DEFAULT_REFERENCE_SPECIES: [&str; 10] = [
    "Haemophilus influenzae",
    "Mycoplasma genitalium",
    "Methanocaldococcus jannaschii",
    "Synechocystis sp",
    "Saccharomyces cerevisiae",
    "Mycoplasma pneumoniae",
    "Escherichia coli",
    "Helicobacter pylori",
    "Methanothermobacter thermautotrophicus",
    "Bacillus subtilis",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub reference_species: Vec<String>,
    pub pss_threshold: usize,
    pub positive_symbol: char,
    pub negative_symbol: char,
    pub query_column: String,
    pub array_column: String,
    pub delimiter: char,
    /// Worksheet to read when the generic network is a spreadsheet.
    pub sheet_name: Option<String>,
    pub kegg_rest_url: String,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            reference_species: DEFAULT_REFERENCE_SPECIES.iter().map(|s| s.to_string()).collect(),
            pss_threshold: 0,
            positive_symbol: DEFAULT_POSITIVE_SYMBOL,
            negative_symbol: DEFAULT_NEGATIVE_SYMBOL,
            query_column: "ORF_Q".to_string(),
            array_column: "ORF_A".to_string(),
            delimiter: ',',
            sheet_name: None,
            kegg_rest_url: DEFAULT_KEGG_REST_URL.to_string(),
        }
    }
}

impl AnalysisConfig {
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    pub fn save_to_path(&self, path: impl AsRef<Path>) -> Result<()> {
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn symbols(&self) -> Result<Symbols> {
        Symbols::new(self.positive_symbol, self.negative_symbol)
    }

    /// Single-byte delimiter for the CSV reader; `\t` is accepted as written.
    pub fn delimiter_byte(&self) -> u8 {
        if self.delimiter.is_ascii() {
            self.delimiter as u8
        } else {
            tracing::warn!(delimiter = %self.delimiter, "non-ASCII delimiter, using ','");
            b','
        }
    }
}
