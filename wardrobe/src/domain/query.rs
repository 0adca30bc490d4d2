// wardrobe/src/domain/query.rs
use std::collections::BTreeMap;

use crate::domain::entity::TaggedEntity;
use crate::domain::facet::{Facet, TagSet};
use crate::domain::tags::FacetTags;

/// Criteria a collection can be narrowed by.
///
/// Values within one facet are alternatives, facets combine with AND.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagFilter<F: Facet> {
    pub facets: BTreeMap<F, TagSet>,
    /// Case-insensitive substring of the description
    pub text: Option<String>,
}

impl<F: Facet> Default for TagFilter<F> {
    fn default() -> Self {
        Self {
            facets: BTreeMap::new(),
            text: None,
        }
    }
}

impl<F: Facet> TagFilter<F> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value<S: Into<String>>(mut self, facet: F, value: S) -> Self {
        self.facets.entry(facet).or_default().insert(value.into());
        self
    }

    pub fn with_text<S: Into<String>>(mut self, text: S) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_none() && self.facets.values().all(TagSet::is_empty)
    }

    pub fn matches<T>(&self, entity: &TaggedEntity<T>) -> bool
    where
        T: FacetTags<Facet = F>,
    {
        let facets_match = self.facets.iter().all(|(facet, wanted)| {
            wanted.is_empty() || !entity.tags.values(*facet).is_disjoint(wanted)
        });
        let text_match = self.text.as_ref().map_or(true, |text| {
            entity
                .description
                .to_lowercase()
                .contains(&text.to_lowercase())
        });
        facets_match && text_match
    }
}
