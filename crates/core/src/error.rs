use crate::lifecycle::LifecycleError;
use crate::slugs::SlugError;
use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<LifecycleError> for CoreError {
    fn from(err: LifecycleError) -> Self {
        match err {
            LifecycleError::AlreadyPublished
            | LifecycleError::VersionConflict { .. }
            | LifecycleError::ReadOnly { .. } => CoreError::Conflict(err.to_string()),
            LifecycleError::EmptyStructure
            | LifecycleError::InvalidTransition { .. }
            | LifecycleError::LockedReference { .. }
            | LifecycleError::UnpublishedReference { .. } => {
                CoreError::Validation(err.to_string())
            }
        }
    }
}

impl From<SlugError> for CoreError {
    fn from(err: SlugError) -> Self {
        match err {
            SlugError::Invalid(_) => CoreError::Validation(err.to_string()),
            SlugError::Conflict { .. } | SlugError::RetiredConflict { .. } => {
                CoreError::Conflict(err.to_string())
            }
        }
    }
}
