// wardrobe/src/domain/draft.rs
//! Working copy of an entity while it is being created or edited.
//!
//! A draft is what a form holds: defaults come from the entity under edit (or
//! are empty for a new one), tag pickers toggle values through [`Draft::toggle`]
//! and receive the full resulting selection after every change. Nothing is
//! persisted until the draft is handed to a store.

use crate::domain::entity::{EntityId, EntityPatch, TaggedEntity};
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::facet::{Facet, TagSet};
use crate::domain::tags::{ClothingTags, FacetTags, OutfitTags};
use crate::domain::vocabulary::TagVocabulary;

#[derive(Debug, Clone, PartialEq)]
pub struct Draft<T: FacetTags> {
    /// Set when editing an existing entity
    pub editing: Option<EntityId>,
    pub image: Option<String>,
    pub description: String,
    pub tags: T,
}

pub type ClothingDraft = Draft<ClothingTags>;
pub type OutfitDraft = Draft<OutfitTags>;

impl<T: FacetTags> Default for Draft<T> {
    fn default() -> Self {
        Self {
            editing: None,
            image: None,
            description: String::new(),
            tags: T::default(),
        }
    }
}

impl<T: FacetTags> Draft<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entity(entity: &TaggedEntity<T>) -> Self {
        Self {
            editing: entity.id.clone(),
            image: Some(entity.image.clone()),
            description: entity.description.clone(),
            tags: entity.tags.clone(),
        }
    }

    pub fn set_image<S: Into<String>>(&mut self, image: S) {
        self.image = Some(image.into());
    }

    pub fn set_description<S: Into<String>>(&mut self, description: S) {
        self.description = description.into();
    }

    /// Toggle a legal value of `facet`, returning the whole selection afterwards
    pub fn toggle(
        &mut self,
        vocabulary: &TagVocabulary<T::Facet>,
        facet: T::Facet,
        value: &str,
    ) -> DomainResult<TagSet> {
        if !vocabulary.contains(facet, value) {
            return Err(DomainError::InvalidTag {
                facet: facet.to_string(),
                value: value.to_string(),
            });
        }
        self.tags.toggle(facet, value)
    }

    pub fn selected(&self, facet: T::Facet) -> TagSet {
        self.tags.values(facet)
    }

    fn require_image(&self) -> DomainResult<String> {
        self.image
            .as_deref()
            .map(str::trim)
            .filter(|image| !image.is_empty())
            .map(ToString::to_string)
            .ok_or_else(|| DomainError::Validation("Please add an image.".to_string()))
    }

    /// Entity to pass to a store's add operation
    pub fn into_entity(self) -> DomainResult<TaggedEntity<T>> {
        let image = self.require_image()?;
        Ok(TaggedEntity::new(image, self.description, self.tags))
    }

    /// Patch carrying every field of the draft, for a store's edit operation
    pub fn to_patch(&self) -> DomainResult<EntityPatch<T::Facet>> {
        let image = self.require_image()?;
        let seed = EntityPatch::new()
            .image(image)
            .description(self.description.clone());
        let patch = T::Facet::all()
            .iter()
            .fold(seed, |patch, facet| patch.facet(*facet, self.tags.values(*facet)));
        Ok(patch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::facet::{ClothingFacet, OutfitFacet};

    #[test]
    fn given_clothing_draft_when_selecting_m_then_l_then_size_holds_only_l() {
        let vocabulary = TagVocabulary::default();
        let mut draft = ClothingDraft::new();

        draft.toggle(&vocabulary, ClothingFacet::Size, "M").unwrap();
        let selected = draft.toggle(&vocabulary, ClothingFacet::Size, "L").unwrap();

        assert_eq!(selected.into_iter().collect::<Vec<_>>(), vec!["L"]);
        assert_eq!(draft.tags.size.as_deref(), Some("L"));
    }

    #[test]
    fn given_value_outside_vocabulary_when_toggle_then_rejected_and_unchanged() {
        let vocabulary = TagVocabulary::default();
        let mut draft = OutfitDraft::new();

        let result = draft.toggle(&vocabulary, OutfitFacet::Weather, "Hail");

        assert!(matches!(result, Err(DomainError::InvalidTag { .. })));
        assert!(draft.selected(OutfitFacet::Weather).is_empty());
    }

    #[test]
    fn given_draft_without_image_when_into_entity_then_validation_error() {
        let mut draft = OutfitDraft::new();
        draft.set_description("x");
        assert!(matches!(draft.clone().into_entity(), Err(DomainError::Validation(_))));
        assert!(draft.to_patch().is_err());

        draft.set_image("file:///photo.jpg");
        let entity = draft.into_entity().unwrap();
        assert_eq!(entity.image, "file:///photo.jpg");
        assert_eq!(entity.description, "x");
        assert!(entity.id.is_none());
    }

    #[test]
    fn given_existing_entity_when_draft_to_patch_then_patch_covers_every_facet() {
        let vocabulary = TagVocabulary::default();
        let mut entity = TaggedEntity::new("img", "coat", ClothingTags::default());
        entity.id = Some(EntityId::new("1"));

        let mut draft = ClothingDraft::from_entity(&entity);
        draft.toggle(&vocabulary, ClothingFacet::Color, "Black").unwrap();
        let patch = draft.to_patch().unwrap();

        assert_eq!(draft.editing, Some(EntityId::new("1")));
        assert_eq!(patch.tags.len(), ClothingFacet::all().len());
        assert_eq!(patch.description.as_deref(), Some("coat"));

        entity.apply(patch).unwrap();
        assert!(entity.tags.color.contains("Black"));
    }
}
