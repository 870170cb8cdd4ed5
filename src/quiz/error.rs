use thiserror::Error;

use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum QuizError {
    #[error("invalid {kind} id: {value:?}")]
    InvalidId { kind: &'static str, value: String },
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("not found: entity={entity}, key={key}")]
    NotFound { entity: &'static str, key: String },
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl QuizError {
    pub fn not_found(entity: &'static str, key: &str) -> Self {
        Self::NotFound {
            entity,
            key: key.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::NotFound { .. } | Self::Store(StoreError::NotFound { .. })
        )
    }
}
