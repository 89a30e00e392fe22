use crate::error::{ProwlerError, Result};
use std::collections::HashMap;
use std::sync::Arc;

/// Ordered, duplicate-free list of reference species. Position `i` of every
/// profile built against this universe refers to `self.get(i)`.
#[derive(Debug, Clone, Default)]
pub struct SpeciesUniverse {
    ids: Vec<String>,
    index: HashMap<String, usize>,
}

impl SpeciesUniverse {
    pub fn build<I, S>(ids: I) -> Result<Arc<Self>>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut ret = Self::default();
        for id in ids {
            let id: String = id.into();
            if ret.index.contains_key(&id) {
                return Err(ProwlerError::DuplicateSpecies(id));
            }
            ret.index.insert(id.clone(), ret.ids.len());
            ret.ids.push(id);
        }
        Ok(Arc::new(ret))
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn index_of(&self, id: &str) -> Result<usize> {
        self.index
            .get(id)
            .copied()
            .ok_or_else(|| ProwlerError::UnknownSpecies(id.to_string()))
    }

    #[inline(always)]
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn get(&self, position: usize) -> Option<&str> {
        self.ids.get(position).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }
}

impl PartialEq for SpeciesUniverse {
    fn eq(&self, other: &Self) -> bool {
        self.ids == other.ids
    }
}

impl Eq for SpeciesUniverse {}
