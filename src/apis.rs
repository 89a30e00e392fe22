//! KEGG REST access and the Costanzo SGA downloads. The HTTP transport is
//! injected through [`Fetch`], so everything above it can be exercised
//! without a network.

use crate::error::Result;
use crate::kegg::{parse_xref, KeggDatabase, KeggOrganisms, XrefEntry};
use crate::network::NetworkTable;
use crate::parser::NetworkParser;
use crate::sga::Sga2Parser;
use flate2::read::GzDecoder;
use itertools::Itertools;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

pub const DEFAULT_KEGG_REST_URL: &str = "https://rest.kegg.jp";

/// KEGG `get` accepts at most this many entries per request.
pub const KEGG_GET_BATCH: usize = 10;

/// Costanzo et al. (2009) genetic-interaction release.
pub const DEFAULT_COSTANZO_URL: &str = "http://drygin.ccbr.utoronto.ca/~costanzo2009";

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

pub trait Fetch {
    fn fetch_text(&self, url: &str) -> Result<String>;

    fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>> {
        self.fetch_text(url).map(String::into_bytes)
    }
}

#[derive(Debug, Clone, Default)]
pub struct HttpFetch;

impl Fetch for HttpFetch {
    fn fetch_text(&self, url: &str) -> Result<String> {
        tracing::debug!(url, "GET");
        let text = reqwest::blocking::get(url)?.error_for_status()?.text()?;
        Ok(text)
    }

    fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>> {
        tracing::debug!(url, "GET");
        let bytes = reqwest::blocking::get(url)?.error_for_status()?.bytes()?;
        Ok(bytes.to_vec())
    }
}

#[derive(Debug, Clone)]
pub struct KeggApi<F: Fetch> {
    fetcher: F,
    base_url: String,
}

impl KeggApi<HttpFetch> {
    pub fn new() -> Self {
        Self::with_fetcher(HttpFetch, DEFAULT_KEGG_REST_URL)
    }
}

impl Default for KeggApi<HttpFetch> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: Fetch> KeggApi<F> {
    pub fn with_fetcher(fetcher: F, base_url: &str) -> Self {
        Self {
            fetcher,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn list_organisms_text(&self) -> Result<String> {
        self.fetcher
            .fetch_text(&format!("{}/list/organism", self.base_url))
    }

    pub fn list_organisms(&self) -> Result<KeggOrganisms> {
        KeggOrganisms::parse(&self.list_organisms_text()?)
    }

    /// ORF to KO links of one organism, e.g. `sce`.
    pub fn link_orthology_text(&self, organism_code: &str) -> Result<String> {
        self.fetcher
            .fetch_text(&format!("{}/link/ko/{organism_code}", self.base_url))
    }

    pub fn link_orthology(&self, organism_code: &str) -> Result<Vec<XrefEntry>> {
        parse_xref(&self.link_orthology_text(organism_code)?)
    }

    /// Raw flat-file text of the given entries, fetched in batches.
    pub fn get_entries_text<S: AsRef<str>>(&self, ids: &[S]) -> Result<String> {
        let mut ret = String::new();
        for chunk in &ids.iter().chunks(KEGG_GET_BATCH) {
            let query = chunk.map(|id| AsRef::<str>::as_ref(id)).join("+");
            let text = self
                .fetcher
                .fetch_text(&format!("{}/get/{query}", self.base_url))?;
            ret.push_str(&text);
            if !ret.ends_with('\n') {
                ret.push('\n');
            }
        }
        Ok(ret)
    }

    pub fn get_entries<S: AsRef<str>>(&self, ids: &[S]) -> Result<KeggDatabase> {
        KeggDatabase::parse(&self.get_entries_text(ids)?)
    }
}

/// Interaction datasets of the Costanzo release. All are SGA v2 tables,
/// served gzip-compressed.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum CostanzoDataset {
    Raw,
    LenientCutoff,
    IntermediateCutoff,
    StringentCutoff,
}

impl CostanzoDataset {
    pub const ALL: [CostanzoDataset; 4] = [
        CostanzoDataset::Raw,
        CostanzoDataset::LenientCutoff,
        CostanzoDataset::IntermediateCutoff,
        CostanzoDataset::StringentCutoff,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            CostanzoDataset::Raw => "raw",
            CostanzoDataset::LenientCutoff => "lenient_cutoff",
            CostanzoDataset::IntermediateCutoff => "intermediate_cutoff",
            CostanzoDataset::StringentCutoff => "stringent_cutoff",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.name() == name)
    }

    pub fn file_name(&self) -> &'static str {
        match self {
            CostanzoDataset::Raw => "sgadata_costanzo2009_rawdata_101120.txt.gz",
            CostanzoDataset::LenientCutoff => "sgadata_costanzo2009_lenientCutoff_101120.txt.gz",
            CostanzoDataset::IntermediateCutoff => {
                "sgadata_costanzo2009_intermediateCutoff_101120.txt.gz"
            }
            CostanzoDataset::StringentCutoff => {
                "sgadata_costanzo2009_stringentCutoff_101120.txt.gz"
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct CostanzoApi<F: Fetch> {
    fetcher: F,
    base_url: String,
}

impl CostanzoApi<HttpFetch> {
    pub fn new() -> Self {
        Self::with_fetcher(HttpFetch, DEFAULT_COSTANZO_URL)
    }
}

impl Default for CostanzoApi<HttpFetch> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: Fetch> CostanzoApi<F> {
    pub fn with_fetcher(fetcher: F, base_url: &str) -> Self {
        Self {
            fetcher,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn url(&self, dataset: CostanzoDataset) -> String {
        format!("{}/{}", self.base_url, dataset.file_name())
    }

    /// Dataset contents, decompressed when the server sends gzip.
    pub fn fetch_text(&self, dataset: CostanzoDataset) -> Result<String> {
        let bytes = self.fetcher.fetch_bytes(&self.url(dataset))?;
        let mut text = String::new();
        if bytes.starts_with(&GZIP_MAGIC) {
            GzDecoder::new(&bytes[..]).read_to_string(&mut text)?;
        } else {
            text = String::from_utf8_lossy(&bytes).into_owned();
        }
        Ok(text)
    }

    pub fn fetch_network(&self, dataset: CostanzoDataset) -> Result<NetworkTable> {
        let table = Sga2Parser::new().parse(&mut self.fetch_text(dataset)?.as_bytes())?;
        tracing::info!(dataset = dataset.name(), rows = table.len(), "fetched SGA dataset");
        Ok(table)
    }

    /// Writes the decompressed dataset into `dir` and returns its path.
    pub fn download(&self, dataset: CostanzoDataset, dir: &Path) -> Result<PathBuf> {
        let file_name = dataset.file_name().trim_end_matches(".gz");
        let path = dir.join(file_name);
        fs::write(&path, self.fetch_text(dataset)?)?;
        Ok(path)
    }
}
