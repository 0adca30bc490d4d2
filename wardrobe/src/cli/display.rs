// src/cli/display.rs
use crossterm::style::Stylize;
use itertools::Itertools;

use crate::domain::entity::TaggedEntity;
use crate::domain::facet::Facet;
use crate::domain::tags::FacetTags;
use crate::domain::vocabulary::TagVocabulary;

/// Multi-line, human readable rendering of one entity
pub fn format_entity<T: FacetTags>(entity: &TaggedEntity<T>, color: bool) -> String {
    let id = entity
        .id
        .as_ref()
        .map_or_else(|| "-".to_string(), ToString::to_string);
    let description = if entity.description.is_empty() {
        "(no description)".to_string()
    } else {
        entity.description.clone()
    };

    let mut lines = vec![if color {
        format!("{}: {}", id.green(), description.bold())
    } else {
        format!("{}: {}", id, description)
    }];
    lines.push(format!("    image: {}", entity.image));

    for facet in T::Facet::all() {
        let values = entity.tags.values(*facet);
        if values.is_empty() {
            continue;
        }
        let joined = values.iter().join(", ");
        lines.push(if color {
            format!("    {}: {}", facet.name().yellow(), joined)
        } else {
            format!("    {}: {}", facet.name(), joined)
        });
    }
    lines.join("\n")
}

pub fn format_vocabulary<F: Facet>(vocabulary: &TagVocabulary<F>) -> String {
    F::all()
        .iter()
        .map(|facet| {
            let marker = if facet.is_exclusive() { " (one of)" } else { "" };
            format!(
                "{}{}: {}",
                facet.name(),
                marker,
                vocabulary.values(*facet).iter().join(", ")
            )
        })
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::{ClothingItem, EntityId};
    use crate::domain::facet::ClothingFacet;
    use crate::domain::tags::ClothingTags;

    #[test]
    fn given_entity_when_format_without_color_then_lists_non_empty_facets() {
        let mut item = ClothingItem::new("img1", "wool coat", ClothingTags::default());
        item.id = Some(EntityId::new("3"));
        item.tags.toggle(ClothingFacet::Color, "Gray").unwrap();
        item.tags.toggle(ClothingFacet::Size, "M").unwrap();

        let text = format_entity(&item, false);

        assert_eq!(
            text,
            "3: wool coat\n    image: img1\n    Color: Gray\n    Size: M"
        );
    }

    #[test]
    fn given_vocabulary_when_format_then_marks_exclusive_facet() {
        let text = format_vocabulary(&TagVocabulary::<ClothingFacet>::default());
        assert!(text.contains("Size (one of): XS, S, M, L, XL, XXL"));
        assert!(text.starts_with("Type: "));
    }
}
