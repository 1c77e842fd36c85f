use crate::domain::tts::SynthesisError;

/// Main application error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Missing credentials, bad invocation, unusable cache directory.
    /// Fatal before any synthesis work starts.
    #[error("{0}")]
    Config(String),

    #[error("Cache I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Synthesis(#[from] SynthesisError),
}

/// Custom result type for the application
pub type AppResult<T> = Result<T, AppError>;
