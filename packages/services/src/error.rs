// ABOUTME: Service error taxonomy carrying the failed operation's context
// ABOUTME: Displays as "<context>: <detail>" and keeps the client error as its source

use storyloom_client::ClientError;
use storyloom_core::{FieldError, PaginationError, UploadError};
use thiserror::Error;

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{context}: {message}")]
    Authentication {
        context: &'static str,
        message: String,
    },

    #[error("{context}: {message}")]
    Validation {
        context: &'static str,
        message: String,
        details: Vec<FieldError>,
    },

    #[error("{context}: {message}")]
    NotFound {
        context: &'static str,
        message: String,
    },

    #[error("{context}: {source}")]
    Transport {
        context: &'static str,
        #[source]
        source: ClientError,
    },
}

impl ServiceError {
    pub fn authentication(context: &'static str, message: impl Into<String>) -> Self {
        Self::Authentication {
            context,
            message: message.into(),
        }
    }

    pub fn validation(
        context: &'static str,
        message: impl Into<String>,
        details: Vec<FieldError>,
    ) -> Self {
        Self::Validation {
            context,
            message: message.into(),
            details,
        }
    }

    /// Validation failure on a single field, raised before any request is made
    pub fn invalid_field(context: &'static str, field: &str, message: &str) -> Self {
        Self::validation(
            context,
            message,
            vec![FieldError::new(field, message, "value_error")],
        )
    }

    /// Classify a client error under an operation context
    pub fn from_client(context: &'static str, err: ClientError) -> Self {
        match err {
            ClientError::Unauthorized(message) => Self::Authentication { context, message },
            ClientError::NotFound(message) => Self::NotFound { context, message },
            ClientError::Validation { message, details } => Self::Validation {
                context,
                message,
                details,
            },
            source => Self::Transport { context, source },
        }
    }

    pub fn from_upload(context: &'static str, err: UploadError) -> Self {
        Self::invalid_field(context, "brd_document", &err.to_string())
    }

    pub fn from_pagination(context: &'static str, err: PaginationError) -> Self {
        Self::invalid_field(context, "limit", &err.to_string())
    }

    /// Operation prefix, e.g. "Failed to fetch projects"
    pub fn context(&self) -> &'static str {
        match self {
            Self::Authentication { context, .. }
            | Self::Validation { context, .. }
            | Self::NotFound { context, .. }
            | Self::Transport { context, .. } => context,
        }
    }

    pub fn details(&self) -> &[FieldError] {
        match self {
            Self::Validation { details, .. } => details,
            _ => &[],
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    pub fn is_authentication(&self) -> bool {
        matches!(self, Self::Authentication { .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Attach an operation context to client results
pub trait Context<T> {
    fn context(self, context: &'static str) -> ServiceResult<T>;
}

impl<T> Context<T> for Result<T, ClientError> {
    fn context(self, context: &'static str) -> ServiceResult<T> {
        self.map_err(|err| ServiceError::from_client(context, err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_display_has_context_prefix() {
        let err = ServiceError::from_client(
            "Failed to fetch projects",
            ClientError::Network("connection refused".to_string()),
        );
        assert_eq!(
            err.to_string(),
            "Failed to fetch projects: Network error: connection refused"
        );
        assert_eq!(err.context(), "Failed to fetch projects");
    }

    #[rstest]
    #[case(ClientError::Unauthorized("x".into()), "authentication")]
    #[case(ClientError::NotFound("x".into()), "not_found")]
    #[case(ClientError::Validation { message: "x".into(), details: vec![] }, "validation")]
    #[case(ClientError::Http { status: 500, message: "x".into() }, "transport")]
    #[case(ClientError::InvalidResponse("x".into()), "transport")]
    fn test_classification(#[case] err: ClientError, #[case] expected: &str) {
        let kind = match ServiceError::from_client("ctx", err) {
            ServiceError::Authentication { .. } => "authentication",
            ServiceError::NotFound { .. } => "not_found",
            ServiceError::Validation { .. } => "validation",
            ServiceError::Transport { .. } => "transport",
        };
        assert_eq!(kind, expected);
    }

    #[test]
    fn test_transport_keeps_source() {
        use std::error::Error;
        let err = ServiceError::from_client("Login failed", ClientError::Io("broken pipe".into()));
        assert!(err.source().is_some());
    }
}
