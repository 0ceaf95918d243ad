use thiserror::Error;

/// Application-level error type.
///
/// Only two variants ever reach the user: `Validation` (bad upload type,
/// rejected before any network call) and `Extraction` (the assistant could
/// not read an uploaded file). Everything else is caught and degraded at
/// the boundary where it occurs.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Extraction failed: {0}")]
    Extraction(String),

    #[error("Unknown template: {0}")]
    UnknownTemplate(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}
