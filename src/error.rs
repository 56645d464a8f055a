//! Crate error type
//!
//! Nothing inside a simulation tick returns an error; degraded references are
//! logged and tolerated. Errors surface only from loading and persistence.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RunnerError {
    /// A collaborator the component depends on was not supplied
    #[error("missing reference: {0}")]
    MissingReference(&'static str),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed json: {0}")]
    Json(#[from] serde_json::Error),
}
