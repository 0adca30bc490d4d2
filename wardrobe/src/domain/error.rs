// wardrobe/src/domain/error.rs
use crate::domain::entity::{EntityId, TaggedEntityBuilderError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Invalid tag '{value}' for facet {facet}")]
    InvalidTag { facet: String, value: String },

    #[error("Unknown facet: {0}")]
    UnknownFacet(String),

    #[error("Duplicate entity id: {0}")]
    DuplicateId(EntityId),

    #[error("Persistence failed: {0}")]
    Persistence(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Other error: {0}")]
    Other(String),
}

impl DomainError {
    pub fn context<C: Into<String>>(self, context: C) -> Self {
        match self {
            DomainError::Validation(msg) => {
                DomainError::Validation(format!("{}: {}", context.into(), msg))
            }
            DomainError::Persistence(msg) => {
                DomainError::Persistence(format!("{}: {}", context.into(), msg))
            }
            DomainError::Other(msg) => DomainError::Other(format!("{}: {}", context.into(), msg)),
            err => err,
        }
    }
}

pub type DomainResult<T> = Result<T, DomainError>;

impl From<TaggedEntityBuilderError> for DomainError {
    fn from(e: TaggedEntityBuilderError) -> Self {
        match e {
            TaggedEntityBuilderError::UninitializedField(field) => {
                DomainError::Validation(format!("{} is required", field))
            }
            TaggedEntityBuilderError::ValidationError(msg) => DomainError::Validation(msg),
        }
    }
}
