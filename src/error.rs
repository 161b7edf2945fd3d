use thiserror::Error;

#[derive(Error, Debug)]
pub enum BlottoError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Empty strategy space: {0}")]
    EmptyStrategySpace(String),

    #[error("Strategy space for budget {budget} has more than {limit} allocations")]
    StrategySpaceTooLarge { budget: u32, limit: u64 },

    #[error("Dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

pub type BlottoResult<T> = Result<T, BlottoError>;
