use serde::Serialize;

/// Error type shared by all services.
///
/// Two caller-facing conditions are deliberately NOT errors: an unresolved
/// active lot is `Option::None` from the resolver, and a trace query that
/// matches nothing yields a well-formed empty report.
#[derive(Debug, thiserror::Error, Serialize)]
pub enum ServiceError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}
