//! Row selectors over a profiled interaction network.
//!
//! [`NetworkStats`] takes ownership of a [`NetworkTable`] and computes every
//! selector once, at construction. Edits made to a copy of the table afterwards
//! are not seen by the selectors; build a new engine to recompute them.

use crate::error::{ProwlerError, Result};
use crate::network::{NetworkTable, Side};
use crate::profile::Profile;
use prowler_protocol::{NetworkSummary, SideSummary};
use std::ops::{BitAnd, BitOr, Not};
use std::sync::Arc;

/// One boolean per table row, in row order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selector(Vec<bool>);

impl Selector {
    pub fn new(mask: Vec<bool>) -> Self {
        Self(mask)
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, row: usize) -> Option<bool> {
        self.0.get(row).copied()
    }

    /// Number of selected rows.
    pub fn count(&self) -> usize {
        self.0.iter().filter(|&&b| b).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        self.0.iter().copied()
    }

    pub fn as_slice(&self) -> &[bool] {
        &self.0
    }

    pub fn all(&self) -> bool {
        self.0.iter().all(|&b| b)
    }

    pub fn none(&self) -> bool {
        !self.0.iter().any(|&b| b)
    }

    /// Materializes the selected rows. Rows past the end of the mask are dropped.
    pub fn apply(&self, table: &NetworkTable) -> NetworkTable {
        table.filtered(|i, _| self.get(i).unwrap_or(false))
    }

    fn zip_with(&self, other: &Selector, op: impl Fn(bool, bool) -> bool) -> Selector {
        debug_assert_eq!(self.len(), other.len(), "selector lengths differ");
        Selector(self.iter().zip(other.iter()).map(|(a, b)| op(a, b)).collect())
    }
}

/// Both masks must cover the same rows. Release builds truncate to the
/// shorter one.
impl BitAnd for &Selector {
    type Output = Selector;

    fn bitand(self, rhs: &Selector) -> Selector {
        self.zip_with(rhs, |a, b| a && b)
    }
}

/// Same length rule as `&`.
impl BitOr for &Selector {
    type Output = Selector;

    fn bitor(self, rhs: &Selector) -> Selector {
        self.zip_with(rhs, |a, b| a || b)
    }
}

impl Not for &Selector {
    type Output = Selector;

    fn not(self) -> Selector {
        Selector(self.iter().map(|b| !b).collect())
    }
}

impl Not for Selector {
    type Output = Selector;

    fn not(self) -> Selector {
        !&self
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum SelectorKind {
    /// Every position present.
    FlatPlu,
    /// Every position absent.
    FlatMin,
    NoFlatPlu,
    NoFlatMin,
    /// Neither flat-present nor flat-absent.
    Informative,
}

impl SelectorKind {
    pub const ALL: [SelectorKind; 5] = [
        SelectorKind::FlatPlu,
        SelectorKind::FlatMin,
        SelectorKind::NoFlatPlu,
        SelectorKind::NoFlatMin,
        SelectorKind::Informative,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            SelectorKind::FlatPlu => "flat_plu",
            SelectorKind::FlatMin => "flat_min",
            SelectorKind::NoFlatPlu => "no_flat_plu",
            SelectorKind::NoFlatMin => "no_flat_min",
            SelectorKind::Informative => "informative",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }
}

#[derive(Debug, Clone, Default)]
struct SideSelectors {
    flat_plu: Selector,
    flat_min: Selector,
    no_flat_plu: Selector,
    no_flat_min: Selector,
    informative: Selector,
}

impl SideSelectors {
    fn compute(profiles: &[&Profile]) -> Self {
        let flat_plu = Selector(profiles.iter().map(|p| p.is_flat_present()).collect());
        let flat_min = Selector(profiles.iter().map(|p| p.is_flat_absent()).collect());
        let informative = !(&flat_plu | &flat_min);
        Self {
            no_flat_plu: !&flat_plu,
            no_flat_min: !&flat_min,
            flat_plu,
            flat_min,
            informative,
        }
    }

    fn get(&self, kind: SelectorKind) -> &Selector {
        match kind {
            SelectorKind::FlatPlu => &self.flat_plu,
            SelectorKind::FlatMin => &self.flat_min,
            SelectorKind::NoFlatPlu => &self.no_flat_plu,
            SelectorKind::NoFlatMin => &self.no_flat_min,
            SelectorKind::Informative => &self.informative,
        }
    }

    fn summary(&self) -> SideSummary {
        SideSummary {
            flat_plu: self.flat_plu.count(),
            flat_min: self.flat_min.count(),
            no_flat_plu: self.no_flat_plu.count(),
            no_flat_min: self.no_flat_min.count(),
            informative: self.informative.count(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct NetworkStats {
    table: NetworkTable,
    pss_threshold: usize,
    universe_length: Option<usize>,
    query: SideSelectors,
    array: SideSelectors,
    pss: Vec<usize>,
    similar: Selector,
}

impl NetworkStats {
    /// Every row must carry a profile on both sides, all built over the same
    /// universe. `pss_threshold` must not exceed the universe length; it is
    /// only checked when the table holds at least one profile.
    pub fn new(table: NetworkTable, pss_threshold: usize) -> Result<Self> {
        let universe = table
            .rows()
            .iter()
            .flat_map(|row| Side::ALL.into_iter().filter_map(move |side| row.profile(side)))
            .map(|profile| profile.universe().clone())
            .next();

        if let Some(universe) = &universe {
            if pss_threshold > universe.len() {
                return Err(ProwlerError::InvalidThreshold {
                    threshold: pss_threshold,
                    universe_length: universe.len(),
                });
            }
        }

        let mut query = Vec::with_capacity(table.len());
        let mut array = Vec::with_capacity(table.len());
        for (i, row) in table.rows().iter().enumerate() {
            for side in Side::ALL {
                let profile = row.profile(side).ok_or(ProwlerError::MissingProfile {
                    row: i,
                    side: side.as_str(),
                })?;
                if let Some(universe) = &universe {
                    if !Arc::ptr_eq(profile.universe(), universe)
                        && **profile.universe() != **universe
                    {
                        return Err(ProwlerError::IncompatibleUniverse {
                            left: universe.len(),
                            right: profile.universe().len(),
                        });
                    }
                }
                match side {
                    Side::Query => query.push(profile),
                    Side::Array => array.push(profile),
                }
            }
        }

        let pss = query
            .iter()
            .zip(array.iter())
            .map(|(q, a)| q.similarity(a))
            .collect::<Result<Vec<_>>>()?;
        let similar = Selector(pss.iter().map(|&s| s >= pss_threshold).collect());
        let query = SideSelectors::compute(&query);
        let array = SideSelectors::compute(&array);

        tracing::debug!(
            rows = table.len(),
            universe_length = universe.as_ref().map(|u| u.len()),
            pss_threshold,
            "computed network selectors"
        );

        Ok(Self {
            universe_length: universe.map(|u| u.len()),
            table,
            pss_threshold,
            query,
            array,
            pss,
            similar,
        })
    }

    #[inline(always)]
    pub fn table(&self) -> &NetworkTable {
        &self.table
    }

    pub fn into_table(self) -> NetworkTable {
        self.table
    }

    #[inline(always)]
    pub fn pss_threshold(&self) -> usize {
        self.pss_threshold
    }

    /// Length of the shared species universe, `None` for a table without rows.
    #[inline(always)]
    pub fn universe_length(&self) -> Option<usize> {
        self.universe_length
    }

    fn side(&self, side: Side) -> &SideSelectors {
        match side {
            Side::Query => &self.query,
            Side::Array => &self.array,
        }
    }

    pub fn selector(&self, kind: SelectorKind, side: Side) -> &Selector {
        self.side(side).get(kind)
    }

    /// Looks a selector up by name, e.g. `"no_flat_plu"`.
    pub fn selector_by_name(&self, name: &str, side: Side) -> Option<&Selector> {
        SelectorKind::from_name(name).map(|kind| self.selector(kind, side))
    }

    pub fn flat_plu(&self, side: Side) -> &Selector {
        self.selector(SelectorKind::FlatPlu, side)
    }

    pub fn flat_min(&self, side: Side) -> &Selector {
        self.selector(SelectorKind::FlatMin, side)
    }

    pub fn no_flat_plu(&self, side: Side) -> &Selector {
        self.selector(SelectorKind::NoFlatPlu, side)
    }

    pub fn no_flat_min(&self, side: Side) -> &Selector {
        self.selector(SelectorKind::NoFlatMin, side)
    }

    pub fn informative(&self, side: Side) -> &Selector {
        self.selector(SelectorKind::Informative, side)
    }

    /// PSS of the query profile against the array profile, per row.
    pub fn pss_scores(&self) -> &[usize] {
        &self.pss
    }

    /// Rows whose PSS reaches the configured threshold.
    pub fn similar(&self) -> &Selector {
        &self.similar
    }

    pub fn summary(&self) -> NetworkSummary {
        let mut ret =
            NetworkSummary::new(self.table.len(), self.universe_length, self.pss_threshold);
        ret.query = self.query.summary();
        ret.array = self.array.summary();
        ret.both_informative =
            (self.informative(Side::Query) & self.informative(Side::Array)).count();
        ret.similar = self.similar.count();
        if !self.pss.is_empty() {
            ret.mean_pss = Some(self.pss.iter().sum::<usize>() as f64 / self.pss.len() as f64);
        }
        ret
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::InteractionRecord;
    use crate::species::SpeciesUniverse;

    fn universe() -> Arc<SpeciesUniverse> {
        SpeciesUniverse::build(["hin", "mge", "sce", "eco"]).unwrap()
    }

    fn table(profiles: &[(&[&str], &[&str])]) -> NetworkTable {
        let universe = universe();
        let mut table = NetworkTable::new(vec!["GIS".to_string()]);
        for (i, (q, a)) in profiles.iter().enumerate() {
            let mut record =
                InteractionRecord::new(format!("Q{i}"), format!("A{i}"), vec![format!("0.{i}")]);
            record.set_profile(Side::Query, Profile::from_membership(&universe, q.iter()));
            record.set_profile(Side::Array, Profile::from_membership(&universe, a.iter()));
            table.push(record).unwrap();
        }
        table
    }

    const ALL: &[&str] = &["hin", "mge", "sce", "eco"];
    const NONE: &[&str] = &[];
    const SOME: &[&str] = &["sce"];

    #[test]
    fn test_all_positive_query_side() {
        let stats = NetworkStats::new(table(&[(ALL, SOME), (ALL, NONE), (ALL, ALL)]), 2).unwrap();
        assert!(stats.flat_plu(Side::Query).all());
        assert!(stats.informative(Side::Query).none());
        assert!(stats.no_flat_plu(Side::Query).none());
        assert_eq!(!stats.flat_plu(Side::Query), *stats.no_flat_plu(Side::Query));
    }

    #[test]
    fn test_selectors_per_side() {
        let stats = NetworkStats::new(table(&[(ALL, SOME), (NONE, NONE), (SOME, ALL)]), 0).unwrap();
        assert_eq!(stats.flat_plu(Side::Query).as_slice(), &[true, false, false]);
        assert_eq!(stats.flat_min(Side::Query).as_slice(), &[false, true, false]);
        assert_eq!(stats.no_flat_min(Side::Query).as_slice(), &[true, false, true]);
        assert_eq!(stats.informative(Side::Query).as_slice(), &[false, false, true]);
        assert_eq!(stats.flat_plu(Side::Array).as_slice(), &[false, false, true]);
        assert_eq!(stats.flat_min(Side::Array).as_slice(), &[false, true, false]);
        assert_eq!(stats.informative(Side::Array).as_slice(), &[true, false, false]);

        let flat = stats.flat_plu(Side::Query) | stats.flat_min(Side::Query);
        assert_eq!(!&flat, *stats.informative(Side::Query));
        assert_eq!(
            &(stats.no_flat_plu(Side::Query) & stats.no_flat_min(Side::Query)),
            stats.informative(Side::Query)
        );
    }

    #[test]
    fn test_selector_by_name() {
        let stats = NetworkStats::new(table(&[(ALL, SOME)]), 0).unwrap();
        for side in Side::ALL {
            for kind in SelectorKind::ALL {
                assert_eq!(
                    stats.selector_by_name(kind.name(), side),
                    Some(stats.selector(kind, side))
                );
            }
        }
        assert_eq!(stats.selector_by_name("flat", Side::Query), None);
    }

    #[test]
    fn test_apply_filters_rows() {
        let stats =
            NetworkStats::new(table(&[(ALL, SOME), (SOME, SOME), (SOME, NONE)]), 0).unwrap();
        let both = stats.informative(Side::Query) & stats.informative(Side::Array);
        let filtered = both.apply(stats.table());
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered.rows()[0].orf_query, "Q1");
        assert_eq!(filtered.field(0, "GIS"), Some("0.1"));
    }

    #[test]
    fn test_pss_and_similar() {
        let stats = NetworkStats::new(table(&[(ALL, ALL), (ALL, NONE), (SOME, NONE)]), 3).unwrap();
        assert_eq!(stats.pss_scores(), &[4, 0, 3]);
        assert_eq!(stats.similar().as_slice(), &[true, false, true]);
        let summary = stats.summary();
        assert_eq!(summary.rows, 3);
        assert_eq!(summary.universe_length, Some(4));
        assert_eq!(summary.query.flat_plu, 2);
        assert_eq!(summary.array.flat_min, 2);
        assert_eq!(summary.both_informative, 0);
        assert_eq!(summary.similar, 2);
        assert_eq!(summary.mean_pss, Some(7.0 / 3.0));
    }

    #[test]
    fn test_threshold_validated_against_universe() {
        assert!(NetworkStats::new(table(&[(ALL, SOME)]), 4).is_ok());
        assert!(matches!(
            NetworkStats::new(table(&[(ALL, SOME)]), 5),
            Err(ProwlerError::InvalidThreshold {
                threshold: 5,
                universe_length: 4
            })
        ));
        // Nothing to validate against yet.
        let empty = NetworkStats::new(NetworkTable::default(), 99).unwrap();
        assert_eq!(empty.universe_length(), None);
        assert!(empty.flat_plu(Side::Query).is_empty());
        assert_eq!(empty.summary().mean_pss, None);
    }

    #[test]
    fn test_missing_profile() {
        let mut table = table(&[(ALL, SOME)]);
        table.rows_mut()[0].profile_array = None;
        assert!(matches!(
            NetworkStats::new(table, 0),
            Err(ProwlerError::MissingProfile { row: 0, side: "array" })
        ));
    }

    #[test]
    fn test_mixed_universes_rejected() {
        let mut table = table(&[(ALL, SOME)]);
        let other = SpeciesUniverse::build(["hin", "mge"]).unwrap();
        table.rows_mut()[0].set_profile(Side::Array, Profile::from_membership(&other, ["hin"]));
        assert!(matches!(
            NetworkStats::new(table, 0),
            Err(ProwlerError::IncompatibleUniverse { left: 4, right: 2 })
        ));
    }

    #[test]
    fn test_reordered_universe_rejected() {
        let mut table = table(&[(ALL, SOME)]);
        let reordered = SpeciesUniverse::build(["eco", "sce", "mge", "hin"]).unwrap();
        table.rows_mut()[0].set_profile(Side::Array, Profile::from_membership(&reordered, SOME));
        assert!(matches!(
            NetworkStats::new(table, 0),
            Err(ProwlerError::IncompatibleUniverse { left: 4, right: 4 })
        ));
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "selector lengths differ")]
    fn test_combining_unequal_selectors_panics() {
        let _ = &Selector::new(vec![true, false, true]) & &Selector::new(vec![true]);
    }

    #[test]
    fn test_selectors_are_a_snapshot() {
        let original = table(&[(ALL, SOME)]);
        let stats = NetworkStats::new(original.clone(), 0).unwrap();
        let mut edited = original;
        edited.rows_mut()[0].set_profile(Side::Query, Profile::from_membership(&universe(), SOME));
        assert!(stats.flat_plu(Side::Query).all());
        assert_eq!(stats.table().rows()[0].profile_query.as_ref().unwrap().to_text(), "++++");
    }

    #[test]
    fn test_zero_length_universe_is_flat_both_ways() {
        let empty = SpeciesUniverse::build(Vec::<String>::new()).unwrap();
        let mut table = NetworkTable::new(vec![]);
        let mut record = InteractionRecord::new("Q", "A", vec![]);
        record.set_profile(Side::Query, Profile::from_membership(&empty, ["hin"]));
        record.set_profile(Side::Array, Profile::from_membership(&empty, NONE));
        table.push(record).unwrap();
        let stats = NetworkStats::new(table, 0).unwrap();
        assert!(stats.flat_plu(Side::Query).all());
        assert!(stats.flat_min(Side::Query).all());
        assert!(stats.informative(Side::Query).none());
        assert_eq!(stats.pss_scores(), &[0]);
    }
}
