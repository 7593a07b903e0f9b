use thiserror::Error;

#[derive(Error, Debug)]
pub enum CalcError {
    #[error("Invalid input: {reason}")]
    InvalidInput { reason: String },

    #[error("Insufficient input: {reason}")]
    InsufficientInput { reason: String },

    #[error("Run '{run_id}' not found")]
    RunNotFound { run_id: String },

    #[error("User '{user}' may not delete run '{run_id}' (created by '{creator}')")]
    PermissionDenied {
        run_id:  String,
        user:    String,
        creator: String,
    },

    #[error("Unknown resource '{name}' (expected spice|stravidium|titanium|plastanium)")]
    UnknownResource { name: String },

    #[error("Unknown run kind '{name}' (expected spice|stravidium|plastanium)")]
    UnknownRunKind { name: String },

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CalcError {
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidInput { reason: reason.into() }
    }

    pub fn insufficient(reason: impl Into<String>) -> Self {
        Self::InsufficientInput { reason: reason.into() }
    }
}

pub type CalcResult<T> = Result<T, CalcError>;
