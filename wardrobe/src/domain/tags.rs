// wardrobe/src/domain/tags.rs
use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::domain::entity::EntityKind;
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::facet::{ClothingFacet, Facet, OutfitFacet, TagSet};
use crate::domain::vocabulary::TagVocabulary;

/// Tag values of one entity, one slot per facet of its kind
pub trait FacetTags:
    Clone + Default + PartialEq + fmt::Debug + Serialize + DeserializeOwned + Send + Sync + 'static
{
    type Facet: Facet;

    const KIND: EntityKind;

    /// Current selection of a facet
    fn values(&self, facet: Self::Facet) -> TagSet;

    /// Replace the selection of a facet
    ///
    /// Exclusive facets reject more than one value.
    fn replace(&mut self, facet: Self::Facet, values: TagSet) -> DomainResult<()>;

    /// Flip membership of `value` and return the resulting selection.
    ///
    /// On an exclusive facet selecting a value deselects the previous one.
    fn toggle(&mut self, facet: Self::Facet, value: &str) -> DomainResult<TagSet> {
        let mut selected = self.values(facet);
        if !selected.remove(value) {
            if facet.is_exclusive() {
                selected.clear();
            }
            selected.insert(value.to_string());
        }
        self.replace(facet, selected.clone())?;
        Ok(selected)
    }

    fn validate(&self, vocabulary: &TagVocabulary<Self::Facet>) -> DomainResult<()> {
        for facet in Self::Facet::all() {
            let values = self.values(*facet);
            vocabulary.check(*facet, values.iter().map(String::as_str))?;
        }
        Ok(())
    }

    fn is_empty(&self) -> bool {
        Self::Facet::all()
            .iter()
            .all(|facet| self.values(*facet).is_empty())
    }
}

fn single_value(facet: ClothingFacet, values: TagSet) -> DomainResult<Option<String>> {
    if values.len() > 1 {
        return Err(DomainError::Validation(format!(
            "Facet {} accepts at most one value, got {}",
            facet,
            values.len()
        )));
    }
    Ok(values.into_iter().next())
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClothingTags {
    #[serde(rename = "type", default)]
    pub kind: TagSet,
    #[serde(default)]
    pub color: TagSet,
    #[serde(default)]
    pub material: TagSet,
    #[serde(default)]
    pub status: TagSet,
    #[serde(default)]
    pub size: Option<String>,
}

impl FacetTags for ClothingTags {
    type Facet = ClothingFacet;

    const KIND: EntityKind = EntityKind::Clothing;

    fn values(&self, facet: ClothingFacet) -> TagSet {
        match facet {
            ClothingFacet::Type => self.kind.clone(),
            ClothingFacet::Color => self.color.clone(),
            ClothingFacet::Material => self.material.clone(),
            ClothingFacet::Status => self.status.clone(),
            ClothingFacet::Size => self.size.iter().cloned().collect(),
        }
    }

    fn replace(&mut self, facet: ClothingFacet, values: TagSet) -> DomainResult<()> {
        match facet {
            ClothingFacet::Type => self.kind = values,
            ClothingFacet::Color => self.color = values,
            ClothingFacet::Material => self.material = values,
            ClothingFacet::Status => self.status = values,
            ClothingFacet::Size => self.size = single_value(facet, values)?,
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutfitTags {
    #[serde(default)]
    pub style: TagSet,
    #[serde(default)]
    pub occasion: TagSet,
    #[serde(default)]
    pub temperature: TagSet,
    #[serde(default)]
    pub weather: TagSet,
}

impl FacetTags for OutfitTags {
    type Facet = OutfitFacet;

    const KIND: EntityKind = EntityKind::Outfit;

    fn values(&self, facet: OutfitFacet) -> TagSet {
        match facet {
            OutfitFacet::Style => self.style.clone(),
            OutfitFacet::Occasion => self.occasion.clone(),
            OutfitFacet::Temperature => self.temperature.clone(),
            OutfitFacet::Weather => self.weather.clone(),
        }
    }

    fn replace(&mut self, facet: OutfitFacet, values: TagSet) -> DomainResult<()> {
        match facet {
            OutfitFacet::Style => self.style = values,
            OutfitFacet::Occasion => self.occasion = values,
            OutfitFacet::Temperature => self.temperature = values,
            OutfitFacet::Weather => self.weather = values,
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(values: &[&str]) -> TagSet {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn given_size_selected_when_toggle_other_size_then_only_new_size_remains() {
        let mut tags = ClothingTags::default();
        tags.toggle(ClothingFacet::Size, "M").unwrap();
        let selected = tags.toggle(ClothingFacet::Size, "L").unwrap();

        assert_eq!(selected, set(&["L"]));
        assert_eq!(tags.size.as_deref(), Some("L"));
    }

    #[test]
    fn given_selected_value_when_toggle_again_then_deselects() {
        let mut tags = ClothingTags::default();
        tags.toggle(ClothingFacet::Size, "M").unwrap();
        assert!(tags.toggle(ClothingFacet::Size, "M").unwrap().is_empty());
        assert_eq!(tags.size, None);

        tags.toggle(ClothingFacet::Color, "Red").unwrap();
        tags.toggle(ClothingFacet::Color, "Blue").unwrap();
        let selected = tags.toggle(ClothingFacet::Color, "Red").unwrap();
        assert_eq!(selected, set(&["Blue"]));
    }

    #[test]
    fn given_multi_select_facet_when_toggle_values_then_accumulates() {
        let mut tags = OutfitTags::default();
        tags.toggle(OutfitFacet::Weather, "Rain").unwrap();
        let selected = tags.toggle(OutfitFacet::Weather, "Wind").unwrap();
        assert_eq!(selected, set(&["Rain", "Wind"]));
        assert_eq!(tags.weather, selected);
    }

    #[test]
    fn given_two_sizes_when_replace_then_fails_and_keeps_previous() {
        let mut tags = ClothingTags {
            size: Some("S".to_string()),
            ..Default::default()
        };
        let result = tags.replace(ClothingFacet::Size, set(&["M", "L"]));
        assert!(matches!(result, Err(DomainError::Validation(_))));
        assert_eq!(tags.size.as_deref(), Some("S"));
    }

    #[test]
    fn given_tags_when_validate_then_checks_every_facet() {
        let vocabulary = TagVocabulary::<ClothingFacet>::default();
        let mut tags = ClothingTags::default();
        assert!(tags.validate(&vocabulary).is_ok());

        tags.size = Some("XXXL".to_string());
        assert!(matches!(
            tags.validate(&vocabulary),
            Err(DomainError::InvalidTag { facet, .. }) if facet == "Size"
        ));
    }

    #[test]
    fn given_clothing_tags_when_serialized_then_uses_facet_field_names() {
        let mut tags = ClothingTags::default();
        tags.toggle(ClothingFacet::Type, "Coat").unwrap();
        let json = serde_json::to_value(&tags).unwrap();
        assert_eq!(json["type"], serde_json::json!(["Coat"]));
        assert_eq!(json["size"], serde_json::Value::Null);

        let parsed: ClothingTags = serde_json::from_str(r#"{"color":["Red"]}"#).unwrap();
        assert_eq!(parsed.color, set(&["Red"]));
        assert!(parsed.kind.is_empty());
    }
}
