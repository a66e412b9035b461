use thiserror::Error;

#[derive(Debug, Error)]
pub enum QpError {
    /// The backend cannot handle this problem shape. Never retried.
    #[error("Not implemented: {0}")]
    NotImplemented(String),

    #[error("Invalid problem: {0}")]
    InvalidProblem(String),

    #[error("Unknown solver: {0}")]
    UnknownSolver(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

pub type Result<T> = std::result::Result<T, QpError>;
