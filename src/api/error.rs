use thiserror::Error;

/// Failure of a backend call. The user only ever sees the generic text;
/// the source is kept for logs.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Failed to fetch schools")]
    FetchFailed(#[source] anyhow::Error),
    #[error("Failed to add school")]
    SubmitFailed(#[source] anyhow::Error),
}
