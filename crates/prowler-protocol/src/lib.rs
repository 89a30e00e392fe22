use serde::{Deserialize, Serialize};

pub const NETWORK_SUMMARY_SCHEMA: &str = "prowler.network_summary.v1";

/// Row counts of the profile selectors for one side of an interaction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SideSummary {
    pub flat_plu: usize,
    pub flat_min: usize,
    pub no_flat_plu: usize,
    pub no_flat_min: usize,
    pub informative: usize,
}

/// Machine-readable summary of a profiled interaction network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkSummary {
    pub schema: String,
    pub rows: usize,
    pub universe_length: Option<usize>,
    pub pss_threshold: usize,
    pub query: SideSummary,
    pub array: SideSummary,
    pub both_informative: usize,
    pub similar: usize,
    pub mean_pss: Option<f64>,
}

impl NetworkSummary {
    pub fn new(rows: usize, universe_length: Option<usize>, pss_threshold: usize) -> Self {
        Self {
            schema: NETWORK_SUMMARY_SCHEMA.to_string(),
            rows,
            universe_length,
            pss_threshold,
            query: SideSummary::default(),
            array: SideSummary::default(),
            both_informative: 0,
            similar: 0,
            mean_pss: None,
        }
    }
}
