use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Failure of a single spin request
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpinError {
    #[error("Конфигурация рангов отсутствует")]
    EmptyConfig,
}

/// Invalid rank configuration, detected at startup
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("duplicate rank key: {0}")]
    DuplicateKey(String),

    #[error("invalid draw weights: {0}")]
    Weights(#[from] rand::distributions::WeightedError),
}

/// Failures while collecting or persisting spin metrics
#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("failed to create histogram: {0}")]
    Create(#[from] hdrhistogram::CreationError),

    #[error("failed to serialize histogram: {0}")]
    Serialize(#[from] hdrhistogram::serialization::V2SerializeError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Top-level error for the binary
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Metrics(#[from] MetricsError),

    #[error(transparent)]
    Spin(#[from] SpinError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
