use crate::domain::error::DomainError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum InfrastructureError {
    #[error("File system error: {0}")]
    FileSystem(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),
}

impl From<InfrastructureError> for DomainError {
    fn from(error: InfrastructureError) -> Self {
        match error {
            InfrastructureError::FileSystem(msg) => DomainError::Persistence(msg),
            InfrastructureError::InvalidKey(key) => {
                DomainError::Persistence(format!("invalid storage key '{}'", key))
            }
        }
    }
}
