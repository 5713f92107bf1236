// ABOUTME: Errors surfaced by cached reads and mutations
// ABOUTME: Cloneable so one coalesced failure can be handed to every waiter

use std::sync::Arc;
use storyloom_services::ServiceError;
use thiserror::Error;

pub type QueryResult<T> = Result<T, QueryError>;

#[derive(Debug, Clone, Error)]
pub enum QueryError {
    #[error("{0}")]
    Failed(Arc<ServiceError>),

    #[error("Request was cancelled")]
    Cancelled,

    #[error("Cached value for {0} has an unexpected type")]
    TypeMismatch(String),
}

impl QueryError {
    pub fn service_error(&self) -> Option<&ServiceError> {
        match self {
            Self::Failed(err) => Some(err.as_ref()),
            _ => None,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

impl From<ServiceError> for QueryError {
    fn from(err: ServiceError) -> Self {
        Self::Failed(Arc::new(err))
    }
}
