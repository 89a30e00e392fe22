//! Parsers for KEGG REST and flat-file outputs: the organism list, ORF to
//! orthology cross-references, and orthology database entries.

use crate::error::{ProwlerError, Result};
use crate::species::SpeciesUniverse;
use itertools::Itertools;
use regex::Regex;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;
use std::sync::{Arc, LazyLock};

const RECORD_SEPARATOR: &str = "///";

static GENE_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([^()]+)(?:\(.*\))?$").expect("valid gene token regex"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeggOrganism {
    pub t_number: String,
    pub code: String,
    pub name: String,
    pub lineage: String,
}

/// The `list/organism` table.
#[derive(Debug, Clone, Default)]
pub struct KeggOrganisms {
    organisms: Vec<KeggOrganism>,
}

impl KeggOrganisms {
    pub fn parse(text: &str) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(false)
            .flexible(true)
            .from_reader(text.as_bytes());
        let mut organisms = vec![];
        for (line, record) in reader.records().enumerate() {
            let record = record?;
            if record.len() < 3 {
                return Err(ProwlerError::parse(
                    line + 1,
                    format!("expected at least 3 columns, got {}", record.len()),
                ));
            }
            organisms.push(KeggOrganism {
                t_number: record[0].trim().to_string(),
                code: record[1].trim().to_string(),
                name: record[2].trim().to_string(),
                lineage: record.get(3).unwrap_or("").trim().to_string(),
            });
        }
        Ok(Self { organisms })
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        Self::parse(&fs::read_to_string(path)?)
    }

    pub fn organisms(&self) -> &[KeggOrganism] {
        &self.organisms
    }

    pub fn len(&self) -> usize {
        self.organisms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.organisms.is_empty()
    }

    pub fn by_code(&self, code: &str) -> Option<&KeggOrganism> {
        self.organisms.iter().find(|o| o.code == code)
    }

    /// KEGG code of the first organism whose name is, or begins with, the
    /// given biological name (case-insensitive, whole words only).
    pub fn name_to_code(&self, name: &str) -> Option<&str> {
        let wanted = name.trim().to_lowercase();
        if wanted.is_empty() {
            return None;
        }
        self.organisms
            .iter()
            .find(|o| {
                let full = o.name.to_lowercase();
                full.strip_prefix(&wanted)
                    .is_some_and(|rest| rest.chars().next().is_none_or(|c| !c.is_alphanumeric()))
            })
            .map(|o| o.code.as_str())
    }

    /// Builds a universe from KEGG codes or organism names, in the given order.
    /// Entries that resolve to nothing are skipped.
    pub fn resolve_universe<I, S>(&self, names_or_codes: I) -> Result<Arc<SpeciesUniverse>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut codes = vec![];
        for item in names_or_codes {
            let item = item.as_ref();
            let code = match self.by_code(item) {
                Some(organism) => Some(organism.code.as_str()),
                None => self.name_to_code(item),
            };
            match code {
                Some(code) => codes.push(code.to_string()),
                None => tracing::warn!(species = item, "no KEGG organism found, skipping"),
            }
        }
        SpeciesUniverse::build(codes)
    }
}

/// One `link` line, with database prefixes removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XrefEntry {
    pub orf_id: String,
    pub kegg_id: String,
}

fn strip_db_prefix(id: &str) -> &str {
    id.split_once(':').map_or(id, |(_, rest)| rest).trim()
}

pub fn parse_xref(text: &str) -> Result<Vec<XrefEntry>> {
    let mut ret = vec![];
    for (line_num, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let (orf, kegg) = line
            .split_once('\t')
            .ok_or_else(|| {
                ProwlerError::parse(line_num + 1, "expected two tab-separated columns")
            })?;
        ret.push(XrefEntry {
            orf_id: strip_db_prefix(orf).to_string(),
            kegg_id: strip_db_prefix(kegg).to_string(),
        });
    }
    Ok(ret)
}

pub fn parse_xref_path(path: impl AsRef<Path>) -> Result<Vec<XrefEntry>> {
    parse_xref(&fs::read_to_string(path)?)
}

/// ORF to orthology ids; an ORF keeps every id it links to, in input order.
pub fn xref_map(entries: &[XrefEntry]) -> HashMap<String, Vec<String>> {
    entries
        .iter()
        .map(|e| (e.orf_id.clone(), e.kegg_id.clone()))
        .into_group_map()
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrthologyEntry {
    pub entry: String,
    pub name: String,
    pub definition: String,
    /// Lower-case organism code to gene ids.
    pub genes: BTreeMap<String, Vec<String>>,
}

impl OrthologyEntry {
    pub fn organisms(&self) -> impl Iterator<Item = &str> {
        self.genes.keys().map(String::as_str)
    }
}

#[derive(Debug, Clone, Default)]
pub struct KeggDatabase {
    entries: Vec<OrthologyEntry>,
    index: HashMap<String, usize>,
}

impl KeggDatabase {
    pub fn parse(text: &str) -> Result<Self> {
        let mut ret = Self::default();
        let mut current = OrthologyEntry::default();
        let mut section = String::new();
        let mut record_start = 1;

        for (line_num, line) in text.lines().enumerate() {
            let line_num = line_num + 1;
            if line.trim_end() == RECORD_SEPARATOR {
                if current.entry.is_empty() {
                    return Err(ProwlerError::parse(record_start, "record without ENTRY"));
                }
                ret.insert(std::mem::take(&mut current));
                section.clear();
                record_start = line_num + 1;
                continue;
            }
            if line.trim().is_empty() {
                continue;
            }

            let content = if line.starts_with(char::is_whitespace) {
                line.trim()
            } else {
                let (keyword, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
                section = keyword.to_string();
                rest.trim()
            };

            match section.as_str() {
                "ENTRY" => {
                    current.entry = content.split_whitespace().next().unwrap_or("").to_string();
                }
                "NAME" => append_text(&mut current.name, content),
                "DEFINITION" => append_text(&mut current.definition, content),
                "GENES" => Self::parse_genes_line(content, line_num, &mut current.genes)?,
                _ => {}
            }
        }

        if !current.entry.is_empty() {
            ret.insert(current);
        }
        tracing::debug!(entries = ret.entries.len(), "parsed KEGG orthology database");
        Ok(ret)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        Self::parse(&fs::read_to_string(path)?)
    }

    fn insert(&mut self, entry: OrthologyEntry) {
        if self.index.contains_key(&entry.entry) {
            tracing::warn!(entry = %entry.entry, "duplicate KEGG entry, keeping the first");
            return;
        }
        self.index.insert(entry.entry.clone(), self.entries.len());
        self.entries.push(entry);
    }

    fn parse_genes_line(
        content: &str,
        line_num: usize,
        genes: &mut BTreeMap<String, Vec<String>>,
    ) -> Result<()> {
        let (organism, ids) = content
            .split_once(':')
            .ok_or_else(|| {
                ProwlerError::parse(line_num, format!("malformed GENES line '{content}'"))
            })?;
        let ids = ids
            .split_whitespace()
            .filter_map(|token| GENE_TOKEN.captures(token))
            .filter_map(|caps| caps.get(1))
            .map(|m| m.as_str().to_string());
        genes
            .entry(organism.trim().to_lowercase())
            .or_default()
            .extend(ids);
        Ok(())
    }

    pub fn entries(&self) -> &[OrthologyEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, entry: &str) -> Option<&OrthologyEntry> {
        self.index.get(entry).map(|&i| &self.entries[i])
    }
}

fn append_text(target: &mut String, content: &str) {
    if !target.is_empty() {
        target.push(' ');
    }
    target.push_str(content);
}
