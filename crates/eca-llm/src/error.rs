//! Failures surfaced by predictors.

use thiserror::Error;

/// Result type alias for prediction calls.
pub type PredictionResult<T> = Result<T, PredictionError>;

/// Why a predictor could not produce a binary answer.
#[derive(Debug, Error)]
pub enum PredictionError {
    /// At least one resolver is needed to build a model-backed predictor.
    #[error("at least one resolver required")]
    NoResolvers,

    /// The request never produced an HTTP response.
    #[error("llm transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The endpoint answered with a non-success status.
    #[error("llm http error {status}: {body}")]
    Http { status: u16, body: String },

    /// The model answered, but not with something we can read as 0/1.
    #[error("malformed llm response: {detail} (raw: {raw:?})")]
    MalformedResponse { detail: String, raw: String },

    /// Resolver configuration could not be loaded.
    #[error("resolver config error: {0}")]
    Config(String),
}

impl PredictionError {
    pub(crate) fn malformed(detail: impl Into<String>, raw: impl Into<String>) -> Self {
        Self::MalformedResponse {
            detail: detail.into(),
            raw: raw.into(),
        }
    }
}
