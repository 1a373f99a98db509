//! Domain error types.

use crate::domain::security::TableError;

/// Raised when a selection policy cannot rank the table it was given.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SelectionError {
    #[error("{policy}: missing required column '{column}'")]
    MissingColumn { policy: String, column: String },
}

/// Top-level error type for samrecommend.
#[derive(Debug, thiserror::Error)]
pub enum RecommendError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("universe error: {reason}")]
    Universe { reason: String },

    #[error(transparent)]
    Table(#[from] TableError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&RecommendError> for std::process::ExitCode {
    fn from(err: &RecommendError) -> Self {
        let code: u8 = match err {
            RecommendError::Io(_) => 1,
            RecommendError::ConfigParse { .. }
            | RecommendError::ConfigMissing { .. }
            | RecommendError::ConfigInvalid { .. } => 2,
            RecommendError::Universe { .. } | RecommendError::Table(_) => 3,
        };
        std::process::ExitCode::from(code)
    }
}
