use crate::store::StoreError;
use crate::types::DbId;
use crate::validator::FieldErrors;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed for {} field(s)", .0.len())]
    FailedValidation(FieldErrors),

    #[error("Edit conflict: record was modified by another writer")]
    EditConflict,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    pub fn movie_not_found(id: DbId) -> Self {
        CoreError::NotFound { entity: "Movie", id }
    }
}

/// Storage outcomes map 1:1 onto the domain taxonomy; anything the store
/// could not classify becomes [`CoreError::Internal`].
impl From<StoreError> for CoreError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { id } => CoreError::movie_not_found(id),
            StoreError::EditConflict => CoreError::EditConflict,
            StoreError::Backend(source) => CoreError::Internal(source.to_string()),
        }
    }
}
