// wardrobe/src/domain/vocabulary.rs
use std::collections::BTreeMap;

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::domain::error::{DomainError, DomainResult};
use crate::domain::facet::{parse_facet, ClothingFacet, Facet, OutfitFacet};

const CLOTHING_TYPES: &[&str] = &[
    "T-Shirt", "Shirt", "Sweater", "Hoodie", "Jacket", "Coat", "Jeans", "Trousers", "Shorts",
    "Skirt", "Dress", "Shoes", "Accessory",
];
const CLOTHING_COLORS: &[&str] = &[
    "Black", "White", "Gray", "Red", "Blue", "Green", "Yellow", "Brown", "Beige", "Pink",
    "Purple", "Orange",
];
const CLOTHING_MATERIALS: &[&str] = &[
    "Cotton", "Wool", "Linen", "Silk", "Denim", "Leather", "Polyester", "Cashmere",
];
const CLOTHING_STATUSES: &[&str] = &["Clean", "Dirty", "In Laundry", "Needs Repair", "Lent Out"];
const CLOTHING_SIZES: &[&str] = &["XS", "S", "M", "L", "XL", "XXL"];

const OUTFIT_STYLES: &[&str] = &["Casual", "Formal", "Sport", "Party"];
const OUTFIT_OCCASIONS: &[&str] = &["Work", "Date", "Wedding", "Birthday"];
const OUTFIT_TEMPERATURES: &[&str] = &[
    "Below 0°C (Freezing)",
    "0°C to 10°C (Cold)",
    "10°C to 15°C (Cool)",
    "15°C to 20°C (Mild)",
    "20°C to 25°C (Warm)",
    "25°C to 30°C (Hot)",
    "Above 30°C (Very Hot)",
];
const OUTFIT_WEATHER: &[&str] = &["Rain", "Snow", "Wind"];

/// Legal tag values per facet for one entity kind.
///
/// Loaded once and treated as immutable for the rest of the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagVocabulary<F: Facet> {
    values: BTreeMap<F, Vec<String>>,
}

impl<F: Facet> TagVocabulary<F> {
    pub fn new<I, S>(entries: impl IntoIterator<Item = (F, I)>) -> DomainResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut values = BTreeMap::new();
        for (facet, facet_values) in entries {
            values.insert(facet, Self::normalize(facet, facet_values)?);
        }
        Ok(Self { values })
    }

    fn normalize<I, S>(facet: F, values: I) -> DomainResult<Vec<String>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let values: Vec<String> = values
            .into_iter()
            .map(|v| v.as_ref().trim().to_string())
            .unique()
            .collect();
        if values.iter().any(|v| v.is_empty()) {
            return Err(DomainError::Validation(format!(
                "Vocabulary for facet {} contains an empty value",
                facet
            )));
        }
        Ok(values)
    }

    /// Legal values of a facet in display order; empty if the facet has none
    pub fn values(&self, facet: F) -> &[String] {
        self.values.get(&facet).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains(&self, facet: F, value: &str) -> bool {
        self.values(facet).iter().any(|v| v == value)
    }

    /// Fails with `InvalidTag` on the first value not legal for `facet`
    pub fn check<'a>(&self, facet: F, values: impl IntoIterator<Item = &'a str>) -> DomainResult<()> {
        for value in values {
            if !self.contains(facet, value) {
                return Err(DomainError::InvalidTag {
                    facet: facet.to_string(),
                    value: value.to_string(),
                });
            }
        }
        Ok(())
    }

    /// Replace the values of the named facets, keeping every other facet as is
    #[instrument(skip(self, overrides), level = "debug")]
    pub fn with_overrides(mut self, overrides: &BTreeMap<String, Vec<String>>) -> DomainResult<Self> {
        for (name, values) in overrides {
            let facet: F = parse_facet(name)?;
            debug!("Overriding vocabulary for facet {} with {} values", facet, values.len());
            self.values.insert(facet, Self::normalize(facet, values)?);
        }
        Ok(self)
    }

    fn from_static(entries: &[(F, &[&str])]) -> Self {
        Self {
            values: entries
                .iter()
                .map(|(facet, values)| (*facet, values.iter().map(|v| v.to_string()).collect()))
                .collect(),
        }
    }
}

impl Default for TagVocabulary<ClothingFacet> {
    fn default() -> Self {
        Self::from_static(&[
            (ClothingFacet::Type, CLOTHING_TYPES),
            (ClothingFacet::Color, CLOTHING_COLORS),
            (ClothingFacet::Material, CLOTHING_MATERIALS),
            (ClothingFacet::Status, CLOTHING_STATUSES),
            (ClothingFacet::Size, CLOTHING_SIZES),
        ])
    }
}

impl Default for TagVocabulary<OutfitFacet> {
    fn default() -> Self {
        Self::from_static(&[
            (OutfitFacet::Style, OUTFIT_STYLES),
            (OutfitFacet::Occasion, OUTFIT_OCCASIONS),
            (OutfitFacet::Temperature, OUTFIT_TEMPERATURES),
            (OutfitFacet::Weather, OUTFIT_WEATHER),
        ])
    }
}

/// Vocabulary file layout:
///
/// ```toml
/// [clothing]
/// Color = ["Red", "Blue"]
///
/// [outfit]
/// Weather = ["Rain", "Sun"]
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct VocabularyOverrides {
    #[serde(default)]
    pub clothing: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub outfit: BTreeMap<String, Vec<String>>,
}

impl VocabularyOverrides {
    pub fn from_toml(text: &str) -> DomainResult<Self> {
        toml::from_str(text)
            .map_err(|e| DomainError::Validation(format!("Invalid vocabulary file: {}", e)))
    }

    pub fn clothing_vocabulary(&self) -> DomainResult<TagVocabulary<ClothingFacet>> {
        TagVocabulary::default().with_overrides(&self.clothing)
    }

    pub fn outfit_vocabulary(&self) -> DomainResult<TagVocabulary<OutfitFacet>> {
        TagVocabulary::default().with_overrides(&self.outfit)
    }
}
