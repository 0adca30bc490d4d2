// wardrobe/src/domain/facet.rs
use std::collections::BTreeSet;
use std::fmt;
use std::hash::Hash;
use std::str::FromStr;

use crate::domain::error::{DomainError, DomainResult};

/// Selected values of one facet. Ordered and duplicate free.
pub type TagSet = BTreeSet<String>;

/// A closed set of tagging dimensions for one entity kind
pub trait Facet:
    Copy
    + Eq
    + Ord
    + Hash
    + fmt::Debug
    + fmt::Display
    + FromStr<Err = DomainError>
    + Send
    + Sync
    + 'static
{
    /// All facets in display order
    fn all() -> &'static [Self];

    fn name(&self) -> &'static str;

    /// Exclusive facets hold at most one value
    fn is_exclusive(&self) -> bool {
        false
    }
}

/// Case-insensitive lookup of a facet by its name
pub fn parse_facet<F: Facet>(name: &str) -> DomainResult<F> {
    let name = name.trim();
    F::all()
        .iter()
        .copied()
        .find(|f| f.name().eq_ignore_ascii_case(name))
        .ok_or_else(|| DomainError::UnknownFacet(name.to_string()))
}

/// Parse a `Facet=Value` assignment, e.g. `Color=Red`
pub fn parse_assignment<F: Facet>(s: &str) -> DomainResult<(F, String)> {
    let (facet, value) = s.split_once('=').ok_or_else(|| {
        DomainError::Validation(format!("Expected Facet=Value, got '{}'", s))
    })?;
    let value = value.trim();
    if value.is_empty() {
        return Err(DomainError::Validation(format!(
            "Empty value for facet '{}'",
            facet.trim()
        )));
    }
    Ok((parse_facet(facet)?, value.to_string()))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ClothingFacet {
    Type,
    Color,
    Material,
    Status,
    Size,
}

impl Facet for ClothingFacet {
    fn all() -> &'static [Self] {
        &[
            ClothingFacet::Type,
            ClothingFacet::Color,
            ClothingFacet::Material,
            ClothingFacet::Status,
            ClothingFacet::Size,
        ]
    }

    fn name(&self) -> &'static str {
        match self {
            ClothingFacet::Type => "Type",
            ClothingFacet::Color => "Color",
            ClothingFacet::Material => "Material",
            ClothingFacet::Status => "Status",
            ClothingFacet::Size => "Size",
        }
    }

    fn is_exclusive(&self) -> bool {
        matches!(self, ClothingFacet::Size)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OutfitFacet {
    Style,
    Occasion,
    Temperature,
    Weather,
}

impl Facet for OutfitFacet {
    fn all() -> &'static [Self] {
        &[
            OutfitFacet::Style,
            OutfitFacet::Occasion,
            OutfitFacet::Temperature,
            OutfitFacet::Weather,
        ]
    }

    fn name(&self) -> &'static str {
        match self {
            OutfitFacet::Style => "Style",
            OutfitFacet::Occasion => "Occasion",
            OutfitFacet::Temperature => "Temperature",
            OutfitFacet::Weather => "Weather",
        }
    }
}

macro_rules! impl_facet_traits {
    ($($facet:ty),*) => {
        $(
            impl fmt::Display for $facet {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    write!(f, "{}", self.name())
                }
            }

            impl FromStr for $facet {
                type Err = DomainError;

                fn from_str(s: &str) -> Result<Self, Self::Err> {
                    parse_facet(s)
                }
            }
        )*
    };
}

impl_facet_traits!(ClothingFacet, OutfitFacet);
