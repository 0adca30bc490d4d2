// wardrobe/src/application/error.rs
use crate::domain::entity::EntityId;
use crate::domain::error::DomainError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    #[error("Entity not found with ID {0}")]
    NotFound(EntityId),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Persistence failed: {0}")]
    Persistence(String),

    #[error("{0}")]
    Other(String),
}

impl ApplicationError {
    pub fn context<C: Into<String>>(self, context: C) -> Self {
        match self {
            ApplicationError::Other(msg) => {
                ApplicationError::Other(format!("{}: {}", context.into(), msg))
            }
            ApplicationError::Domain(err) => ApplicationError::Domain(err.context(context)),
            ApplicationError::Validation(msg) => {
                ApplicationError::Validation(format!("{}: {}", context.into(), msg))
            }
            ApplicationError::Persistence(msg) => {
                ApplicationError::Persistence(format!("{}: {}", context.into(), msg))
            }
            err => err,
        }
    }

    /// Missing image, illegal tag or malformed input
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            ApplicationError::Validation(_)
                | ApplicationError::Domain(
                    DomainError::Validation(_)
                        | DomainError::InvalidTag { .. }
                        | DomainError::UnknownFacet(_)
                        | DomainError::DuplicateId(_)
                )
        )
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ApplicationError::NotFound(_))
    }

    /// Durable storage could not be read or written
    pub fn is_persistence(&self) -> bool {
        matches!(
            self,
            ApplicationError::Persistence(_)
                | ApplicationError::Domain(DomainError::Persistence(_) | DomainError::Io(_))
        )
    }
}

impl From<std::io::Error> for ApplicationError {
    fn from(err: std::io::Error) -> Self {
        ApplicationError::Domain(DomainError::Io(err))
    }
}

pub type ApplicationResult<T> = Result<T, ApplicationError>;
