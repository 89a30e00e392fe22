//! Phylogenetic profiles: presence/absence of a gene's orthologs across a
//! [`SpeciesUniverse`].
//!
//! The stored state is always the canonical [`Presence`] vector. Symbols such
//! as `+`/`-` only exist at render time, so every `to_*` conversion is pure and
//! can be called with any [`Symbols`] pair without touching the profile.

use crate::error::{ProwlerError, Result};
use crate::species::SpeciesUniverse;
use std::fmt;
use std::sync::Arc;

pub const DEFAULT_POSITIVE_SYMBOL: char = '+';
pub const DEFAULT_NEGATIVE_SYMBOL: char = '-';

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Presence {
    Present,
    Absent,
}

impl Presence {
    #[inline(always)]
    pub fn is_present(self) -> bool {
        self == Presence::Present
    }

    #[inline(always)]
    pub fn flip(self) -> Self {
        match self {
            Presence::Present => Presence::Absent,
            Presence::Absent => Presence::Present,
        }
    }
}

/// A pair of rendering symbols for [`Presence::Present`] and [`Presence::Absent`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Symbols {
    positive: char,
    negative: char,
}

impl Default for Symbols {
    fn default() -> Self {
        Self {
            positive: DEFAULT_POSITIVE_SYMBOL,
            negative: DEFAULT_NEGATIVE_SYMBOL,
        }
    }
}

impl Symbols {
    pub fn new(positive: char, negative: char) -> Result<Self> {
        if positive == negative {
            return Err(ProwlerError::InvalidSymbol(positive));
        }
        Ok(Self { positive, negative })
    }

    #[inline(always)]
    pub fn positive(&self) -> char {
        self.positive
    }

    #[inline(always)]
    pub fn negative(&self) -> char {
        self.negative
    }

    #[inline(always)]
    pub fn render(&self, state: Presence) -> char {
        match state {
            Presence::Present => self.positive,
            Presence::Absent => self.negative,
        }
    }

    pub fn parse(&self, symbol: char) -> Result<Presence> {
        if symbol == self.positive {
            Ok(Presence::Present)
        } else if symbol == self.negative {
            Ok(Presence::Absent)
        } else {
            Err(ProwlerError::InvalidSymbol(symbol))
        }
    }
}

#[derive(Debug, Clone)]
pub struct Profile {
    universe: Arc<SpeciesUniverse>,
    states: Vec<Presence>,
}

impl Profile {
    /// Marks every universe member found in `present` as [`Presence::Present`].
    /// Identifiers outside the universe are ignored.
    pub fn from_membership<I, S>(universe: &Arc<SpeciesUniverse>, present: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut states = vec![Presence::Absent; universe.len()];
        for id in present {
            if let Ok(position) = universe.index_of(id.as_ref()) {
                states[position] = Presence::Present;
            }
        }
        Self {
            universe: universe.clone(),
            states,
        }
    }

    /// Reads a rendered profile back into canonical states.
    pub fn from_symbols<I>(
        universe: &Arc<SpeciesUniverse>,
        rendered: I,
        symbols: &Symbols,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = char>,
    {
        let states = rendered
            .into_iter()
            .map(|c| symbols.parse(c))
            .collect::<Result<Vec<_>>>()?;
        if states.len() != universe.len() {
            return Err(ProwlerError::LengthMismatch {
                expected: universe.len(),
                actual: states.len(),
            });
        }
        Ok(Self {
            universe: universe.clone(),
            states,
        })
    }

    #[inline(always)]
    pub fn universe(&self) -> &Arc<SpeciesUniverse> {
        &self.universe
    }

    #[inline(always)]
    pub fn states(&self) -> &[Presence] {
        &self.states
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.states.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn state_of(&self, species: &str) -> Result<Presence> {
        Ok(self.states[self.universe.index_of(species)?])
    }

    pub fn present_count(&self) -> usize {
        self.states.iter().filter(|s| s.is_present()).count()
    }

    /// Every listed species carries an ortholog. Unknown species are an error,
    /// never a silent `false`.
    pub fn is_all_present<I, S>(&self, species: I) -> Result<bool>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let positions = self.positions(species)?;
        Ok(positions.iter().all(|&i| self.states[i].is_present()))
    }

    pub fn is_any_present<I, S>(&self, species: I) -> Result<bool>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let positions = self.positions(species)?;
        Ok(positions.iter().any(|&i| self.states[i].is_present()))
    }

    fn positions<I, S>(&self, species: I) -> Result<Vec<usize>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        species
            .into_iter()
            .map(|id| self.universe.index_of(id.as_ref()))
            .collect()
    }

    // Zero-length profiles are both flat-present and flat-absent.
    pub fn is_flat_present(&self) -> bool {
        self.states.iter().all(|s| s.is_present())
    }

    pub fn is_flat_absent(&self) -> bool {
        self.states.iter().all(|s| !s.is_present())
    }

    pub fn is_informative(&self) -> bool {
        !(self.is_flat_present() || self.is_flat_absent())
    }

    pub fn complement(&self) -> Self {
        Self {
            universe: self.universe.clone(),
            states: self.states.iter().map(|s| s.flip()).collect(),
        }
    }

    pub fn is_comparable(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.universe, &other.universe) || self.universe == other.universe
    }

    /// Profile Similarity Score: number of positions in which both profiles
    /// agree, i.e. `|universe| - hamming_distance`.
    pub fn similarity(&self, other: &Self) -> Result<usize> {
        if !self.is_comparable(other) {
            return Err(ProwlerError::IncompatibleUniverse {
                left: self.universe.len(),
                right: other.universe.len(),
            });
        }
        Ok(self
            .states
            .iter()
            .zip(other.states.iter())
            .filter(|(a, b)| a == b)
            .count())
    }

    fn rendered(&self, symbols: Symbols) -> impl Iterator<Item = char> + '_ {
        self.states.iter().map(move |&s| symbols.render(s))
    }

    pub fn to_text(&self) -> String {
        self.to_text_with(&Symbols::default())
    }

    pub fn to_text_with(&self, symbols: &Symbols) -> String {
        self.rendered(*symbols).collect()
    }

    pub fn to_sequence(&self) -> Vec<char> {
        self.to_sequence_with(&Symbols::default())
    }

    pub fn to_sequence_with(&self, symbols: &Symbols) -> Vec<char> {
        self.rendered(*symbols).collect()
    }

    pub fn to_tuple(&self) -> Box<[char]> {
        self.to_tuple_with(&Symbols::default())
    }

    pub fn to_tuple_with(&self, symbols: &Symbols) -> Box<[char]> {
        self.rendered(*symbols).collect()
    }

    /// Fixed-size rendering; `N` must equal the universe length.
    pub fn to_array<const N: usize>(&self) -> Result<[char; N]> {
        self.to_array_with(&Symbols::default())
    }

    pub fn to_array_with<const N: usize>(&self, symbols: &Symbols) -> Result<[char; N]> {
        let mut ret = [symbols.negative(); N];
        if self.states.len() != N {
            return Err(ProwlerError::LengthMismatch {
                expected: self.states.len(),
                actual: N,
            });
        }
        for (cell, symbol) in ret.iter_mut().zip(self.rendered(*symbols)) {
            *cell = symbol;
        }
        Ok(ret)
    }

    /// Symbols labelled with the species they belong to, in universe order.
    pub fn to_aligned_series(&self) -> Vec<(&str, char)> {
        self.to_aligned_series_with(&Symbols::default())
    }

    pub fn to_aligned_series_with(&self, symbols: &Symbols) -> Vec<(&str, char)> {
        self.universe.iter().zip(self.rendered(*symbols)).collect()
    }
}

impl PartialEq for Profile {
    fn eq(&self, other: &Self) -> bool {
        self.is_comparable(other) && self.states == other.states
    }
}

impl Eq for Profile {}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(s: &str) -> Vec<String> {
        s.chars().map(|c| c.to_string()).collect()
    }

    struct Fixture {
        profile: Profile,
        present: Vec<String>,
        absent: Vec<String>,
    }

    fn fixture() -> Fixture {
        let universe_ids = chars("acdfhiklostuz");
        let orthologs = chars("bcefghijklmnprstuwxy");
        let universe = SpeciesUniverse::build(universe_ids.clone()).unwrap();
        let mut present: Vec<String> = universe_ids
            .iter()
            .filter(|id| orthologs.contains(id))
            .cloned()
            .collect();
        let mut absent: Vec<String> = universe_ids
            .iter()
            .filter(|id| !orthologs.contains(id))
            .cloned()
            .collect();
        present.sort();
        absent.sort();
        Fixture {
            profile: Profile::from_membership(&universe, &orthologs),
            present,
            absent,
        }
    }

    #[test]
    fn test_to_text() {
        let f = fixture();
        assert_eq!(f.profile.to_text(), "-+-+++++-+++-");
        assert_eq!(f.profile.to_string(), "-+-+++++-+++-");
        let alt = Symbols::new('$', '#').unwrap();
        assert_eq!(f.profile.to_text_with(&alt), "#$#$$$$$#$$$#");
    }

    #[test]
    fn test_to_sequence_and_tuple() {
        let f = fixture();
        let alt = Symbols::new('$', '#').unwrap();
        assert_eq!(f.profile.to_sequence(), "-+-+++++-+++-".chars().collect::<Vec<_>>());
        assert_eq!(
            f.profile.to_sequence_with(&alt),
            "#$#$$$$$#$$$#".chars().collect::<Vec<_>>()
        );
        assert_eq!(
            &*f.profile.to_tuple(),
            &"-+-+++++-+++-".chars().collect::<Vec<_>>()[..]
        );
        assert_eq!(
            &*f.profile.to_tuple_with(&alt),
            &"#$#$$$$$#$$$#".chars().collect::<Vec<_>>()[..]
        );
    }

    #[test]
    fn test_to_array() {
        let f = fixture();
        let array: [char; 13] = f.profile.to_array().unwrap();
        assert_eq!(array.iter().collect::<String>(), "-+-+++++-+++-");
        assert!(matches!(
            f.profile.to_array::<5>(),
            Err(ProwlerError::LengthMismatch { expected: 13, actual: 5 })
        ));
    }

    #[test]
    fn test_to_aligned_series() {
        let f = fixture();
        let series = f.profile.to_aligned_series();
        assert_eq!(series.len(), 13);
        assert_eq!(series[0], ("a", '-'));
        assert_eq!(series[1], ("c", '+'));
        assert_eq!(series[12], ("z", '-'));
    }

    #[test]
    fn test_isall() {
        let f = fixture();
        assert!(f.profile.is_all_present(&f.present).unwrap());
        assert!(!f.profile.is_all_present(&f.absent).unwrap());
    }

    #[test]
    fn test_isany() {
        let f = fixture();
        let mut mixed = f.present[..1].to_vec();
        mixed.extend(f.absent.iter().cloned());
        assert!(f.profile.is_any_present(&mixed).unwrap());
        assert!(!f.profile.is_any_present(&f.absent).unwrap());
    }

    #[test]
    fn test_unknown_species_is_not_silently_absent() {
        let f = fixture();
        assert!(matches!(
            f.profile.is_all_present(["c", "b"]),
            Err(ProwlerError::UnknownSpecies(ref id)) if id == "b"
        ));
        assert!(f.profile.is_any_present(["q"]).is_err());
    }

    #[test]
    fn test_self_similarity_is_universe_length() {
        let f = fixture();
        assert_eq!(f.profile.similarity(&f.profile).unwrap(), 13);
        assert_eq!(f.profile.similarity(&f.profile.complement()).unwrap(), 0);
    }

    #[test]
    fn test_similarity_requires_same_universe() {
        let f = fixture();
        let other = SpeciesUniverse::build(["a", "c"]).unwrap();
        let other = Profile::from_membership(&other, ["a"]);
        assert!(matches!(
            f.profile.similarity(&other),
            Err(ProwlerError::IncompatibleUniverse { left: 13, right: 2 })
        ));

        // Same ids, separately built: still comparable.
        let u1 = SpeciesUniverse::build(["x", "y", "z"]).unwrap();
        let u2 = SpeciesUniverse::build(["x", "y", "z"]).unwrap();
        let a = Profile::from_membership(&u1, ["x"]);
        let b = Profile::from_membership(&u2, ["x", "z"]);
        assert_eq!(a.similarity(&b).unwrap(), 2);
    }

    #[test]
    fn test_similarity_requires_same_order() {
        let ab = SpeciesUniverse::build(["a", "b"]).unwrap();
        let ba = SpeciesUniverse::build(["b", "a"]).unwrap();
        let left = Profile::from_membership(&ab, ["a"]);
        let right = Profile::from_membership(&ba, ["a"]);
        assert!(matches!(
            left.similarity(&right),
            Err(ProwlerError::IncompatibleUniverse { left: 2, right: 2 })
        ));
    }

    #[test]
    fn test_flat_profiles() {
        let universe = SpeciesUniverse::build(["a", "b", "c"]).unwrap();
        let none = Profile::from_membership(&universe, Vec::<&str>::new());
        let all = Profile::from_membership(&universe, ["a", "b", "c", "d"]);
        assert_eq!(none.to_text(), "---");
        assert_eq!(all.to_text(), "+++");
        assert!(none.is_flat_absent() && !none.is_flat_present());
        assert!(all.is_flat_present() && !all.is_flat_absent());
        assert!(!all.is_informative());
        assert!(Profile::from_membership(&universe, ["b"]).is_informative());
    }

    #[test]
    fn test_empty_universe_is_vacuously_flat() {
        let universe = SpeciesUniverse::build(Vec::<String>::new()).unwrap();
        let profile = Profile::from_membership(&universe, ["a"]);
        assert!(profile.is_empty());
        assert!(profile.is_flat_present());
        assert!(profile.is_flat_absent());
        assert!(!profile.is_informative());
        assert_eq!(profile.to_text(), "");
    }

    #[test]
    fn test_round_trip_through_symbols() {
        let f = fixture();
        let universe = f.profile.universe().clone();
        for symbols in [Symbols::default(), Symbols::new('$', '#').unwrap()] {
            let rendered = f.profile.to_sequence_with(&symbols);
            let back = Profile::from_symbols(&universe, rendered, &symbols).unwrap();
            assert_eq!(back.states(), f.profile.states());
        }
    }

    #[test]
    fn test_from_symbols_rejects_bad_input() {
        let universe = SpeciesUniverse::build(["a", "b"]).unwrap();
        let symbols = Symbols::default();
        assert!(matches!(
            Profile::from_symbols(&universe, "+x".chars(), &symbols),
            Err(ProwlerError::InvalidSymbol('x'))
        ));
        assert!(matches!(
            Profile::from_symbols(&universe, "+".chars(), &symbols),
            Err(ProwlerError::LengthMismatch { expected: 2, actual: 1 })
        ));
        assert!(Symbols::new('+', '+').is_err());
    }

    #[test]
    fn test_state_of() {
        let f = fixture();
        assert_eq!(f.profile.state_of("c").unwrap(), Presence::Present);
        assert_eq!(f.profile.state_of("a").unwrap(), Presence::Absent);
        assert_eq!(f.profile.present_count(), 9);
    }
}
