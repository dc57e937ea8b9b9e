//! Error kinds for a resolution run
//!
//! Every error is terminal for the run: there is no partial result and no
//! retry inside the core. The binary reports the failure and exits non-zero.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChangePlanError {
    /// The project map could not be read, parsed, or fails schema validation.
    #[error("invalid project configuration: {reason}")]
    Configuration { reason: String },

    /// The changed-file list could not be retrieved (GitHub API or local git).
    #[error("failed to retrieve changed files: {reason}")]
    Retrieval { reason: String },

    /// A dependency cycle exists among the affected projects.
    #[error("circular dependency detected involving '{project}'")]
    CircularDependency { project: String },
}

impl ChangePlanError {
    pub fn configuration(reason: impl Into<String>) -> Self {
        Self::Configuration {
            reason: reason.into(),
        }
    }

    pub fn retrieval(reason: impl Into<String>) -> Self {
        Self::Retrieval {
            reason: reason.into(),
        }
    }
}

impl From<git2::Error> for ChangePlanError {
    fn from(e: git2::Error) -> Self {
        Self::retrieval(e.message().to_string())
    }
}

impl From<reqwest::Error> for ChangePlanError {
    fn from(e: reqwest::Error) -> Self {
        Self::retrieval(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ChangePlanError>;
