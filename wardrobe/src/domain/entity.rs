// wardrobe/src/domain/entity.rs
use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use derive_builder::Builder;
use serde::{Deserialize, Serialize};

use crate::domain::error::{DomainError, DomainResult};
use crate::domain::facet::{Facet, TagSet};
use crate::domain::tags::{ClothingTags, FacetTags, OutfitTags};
use crate::domain::vocabulary::TagVocabulary;

/// Identifier of an entity, unique within its store
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    pub fn new<S: Into<String>>(id: S) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for EntityId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for EntityId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Clothing,
    Outfit,
}

impl EntityKind {
    /// Key the collection of this kind is persisted under
    pub fn storage_key(&self) -> &'static str {
        match self {
            EntityKind::Clothing => "clothing",
            EntityKind::Outfit => "outfits",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Clothing => write!(f, "clothing"),
            EntityKind::Outfit => write!(f, "outfit"),
        }
    }
}

/// A photographed item tagged along the facets of its kind
#[derive(Builder, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[builder(setter(into))]
#[serde(bound = "")]
pub struct TaggedEntity<T: FacetTags> {
    #[builder(setter(strip_option), default)]
    pub id: Option<EntityId>,
    /// Opaque reference to the photo, never interpreted
    pub image: String,
    #[builder(default)]
    #[serde(default)]
    pub description: String,
    #[builder(default)]
    #[serde(default)]
    pub tags: T,
    #[builder(default = "Utc::now()")]
    pub created_at: DateTime<Utc>,
    #[builder(default = "Utc::now()")]
    pub updated_at: DateTime<Utc>,
}

pub type ClothingItem = TaggedEntity<ClothingTags>;
pub type OutfitItem = TaggedEntity<OutfitTags>;
pub type ClothingItemBuilder = TaggedEntityBuilder<ClothingTags>;
pub type OutfitItemBuilder = TaggedEntityBuilder<OutfitTags>;

impl<T: FacetTags> TaggedEntity<T> {
    pub fn new<S: Into<String>>(image: S, description: S, tags: T) -> Self {
        let now = Utc::now();
        Self {
            id: None,
            image: image.into(),
            description: description.into(),
            tags,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn kind(&self) -> EntityKind {
        T::KIND
    }

    /// Image present and every tag legal for its facet
    pub fn validate(&self, vocabulary: &TagVocabulary<T::Facet>) -> DomainResult<()> {
        if self.image.trim().is_empty() {
            return Err(DomainError::Validation("an image is required".to_string()));
        }
        self.tags.validate(vocabulary)
    }

    /// Overwrite the fields present in `patch`, leaving the rest untouched
    pub fn apply(&mut self, patch: EntityPatch<T::Facet>) -> DomainResult<()> {
        if let Some(image) = patch.image {
            self.image = image;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        for (facet, values) in patch.tags {
            self.tags.replace(facet, values)?;
        }
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Equality ignoring store-assigned fields and timestamps
    pub fn same_content(&self, other: &Self) -> bool {
        self.image == other.image && self.description == other.description && self.tags == other.tags
    }
}

/// Partial update of an entity; absent fields stay as they are.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityPatch<F: Facet> {
    pub image: Option<String>,
    pub description: Option<String>,
    /// Facets listed here have their whole selection replaced
    pub tags: BTreeMap<F, TagSet>,
}

impl<F: Facet> Default for EntityPatch<F> {
    fn default() -> Self {
        Self {
            image: None,
            description: None,
            tags: BTreeMap::new(),
        }
    }
}

impl<F: Facet> EntityPatch<F> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn image<S: Into<String>>(mut self, image: S) -> Self {
        self.image = Some(image.into());
        self
    }

    pub fn description<S: Into<String>>(mut self, description: S) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn facet<I, S>(mut self, facet: F, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags
            .insert(facet, values.into_iter().map(Into::into).collect());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.image.is_none() && self.description.is_none() && self.tags.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::facet::{ClothingFacet, OutfitFacet};

    fn clothing(image: &str) -> ClothingItem {
        let mut tags = ClothingTags::default();
        tags.color.insert("Red".to_string());
        ClothingItemBuilder::default()
            .image(image)
            .description("red scarf")
            .tags(tags)
            .build()
            .unwrap()
    }

    #[test]
    fn given_builder_without_image_when_build_then_validation_error() {
        let result: DomainResult<OutfitItem> = OutfitItemBuilder::default()
            .description("no picture")
            .build()
            .map_err(DomainError::from);
        assert!(matches!(result, Err(DomainError::Validation(msg)) if msg.contains("image")));
    }

    #[test]
    fn given_blank_image_when_validate_then_validation_error() {
        let item = clothing("  ");
        let result = item.validate(&TagVocabulary::default());
        assert!(matches!(result, Err(DomainError::Validation(_))));
        assert!(clothing("img1").validate(&TagVocabulary::default()).is_ok());
    }

    #[test]
    fn given_description_patch_when_apply_then_keeps_tags_and_image() {
        let mut item = clothing("img1");
        let before = item.clone();

        item.apply(EntityPatch::new().description("D2")).unwrap();

        assert_eq!(item.description, "D2");
        assert_eq!(item.tags, before.tags);
        assert_eq!(item.image, before.image);
        assert!(item.updated_at >= before.updated_at);
    }

    #[test]
    fn given_facet_patch_when_apply_then_replaces_only_that_facet() {
        let mut item = OutfitItem::new("img", "", OutfitTags::default());
        item.tags.style.insert("Casual".to_string());

        item.apply(EntityPatch::new().facet(OutfitFacet::Weather, ["Rain", "Wind"]))
            .unwrap();

        assert_eq!(item.tags.style.len(), 1);
        assert_eq!(item.tags.weather.len(), 2);
    }

    #[test]
    fn given_patch_with_two_sizes_when_apply_then_fails() {
        let mut item = clothing("img1");
        let result = item.apply(EntityPatch::new().facet(ClothingFacet::Size, ["S", "M"]));
        assert!(result.is_err());
    }

    #[test]
    fn given_entity_id_when_serialized_then_plain_string() {
        let id = EntityId::new("7");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"7\"");
        assert_eq!(EntityKind::Outfit.storage_key(), "outfits");
    }

    #[test]
    fn given_stored_json_when_deserialized_then_generic_entity_restored() {
        let json = r#"{
            "id": "3",
            "image": "file:///scarf.jpg",
            "tags": {"color": ["Red"], "size": "M"},
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-01-01T00:00:00Z"
        }"#;

        let item: ClothingItem = serde_json::from_str(json).unwrap();

        assert_eq!(item.id, Some(EntityId::new("3")));
        assert_eq!(item.description, "");
        assert!(item.tags.color.contains("Red"));
        assert_eq!(item.tags.size.as_deref(), Some("M"));
    }
}
