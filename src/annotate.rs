use crate::kegg::KeggDatabase;
use crate::network::{NetworkTable, Side};
use crate::profile::Profile;
use crate::species::SpeciesUniverse;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnnotationReport {
    /// Distinct ORFs a profile was built for.
    pub profiled_orfs: usize,
    /// ORFs with no orthology entry at all; they get an all-absent profile.
    pub orfs_without_orthology: Vec<String>,
}

impl AnnotationReport {
    /// Human-readable list of the ORFs without orthology, if there are any.
    pub fn missing_orthology_message(&self) -> Option<String> {
        if self.orfs_without_orthology.is_empty() {
            return None;
        }
        Some(format!(
            "no KEGG orthology, profiled as absent everywhere: {}",
            self.orfs_without_orthology.join(", ")
        ))
    }
}

/// Organism codes holding an ortholog of `orf`, over every KO it links to.
pub fn ortholog_species<'a>(
    orf: &str,
    xref: &HashMap<String, Vec<String>>,
    db: &'a KeggDatabase,
) -> Option<BTreeSet<&'a str>> {
    let entries: Vec<_> = xref
        .get(orf)?
        .iter()
        .filter_map(|ko| db.get(ko))
        .collect();
    if entries.is_empty() {
        return None;
    }
    Some(entries.into_iter().flat_map(|e| e.organisms()).collect())
}

/// Attaches a query and array profile to every row. Each distinct ORF is
/// profiled once.
pub fn attach_profiles(
    table: &mut NetworkTable,
    universe: &Arc<SpeciesUniverse>,
    xref: &HashMap<String, Vec<String>>,
    db: &KeggDatabase,
) -> AnnotationReport {
    let mut cache: HashMap<String, Profile> = HashMap::new();
    let mut report = AnnotationReport::default();

    for row in table.rows_mut() {
        for side in Side::ALL {
            let orf = row.orf(side).to_string();
            let profile = cache
                .entry(orf)
                .or_insert_with_key(|orf| match ortholog_species(orf, xref, db) {
                    Some(species) => Profile::from_membership(universe, species),
                    None => {
                        report.orfs_without_orthology.push(orf.clone());
                        Profile::from_membership(universe, Vec::<&str>::new())
                    }
                })
                .clone();
            row.set_profile(side, profile);
        }
    }

    report.profiled_orfs = cache.len();
    report.orfs_without_orthology.sort();
    tracing::info!(
        orfs = report.profiled_orfs,
        without_orthology = report.orfs_without_orthology.len(),
        "attached phylogenetic profiles"
    );
    report
}
