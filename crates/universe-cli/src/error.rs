use thiserror::Error;

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Validation(#[from] universe_core::ValidationError),

    #[error(transparent)]
    Config(#[from] universe_core::ConfigError),

    #[error("{0}")]
    Rejected(String),

    #[error("universe {0} not found")]
    UnknownUniverse(u64),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Logging(#[from] universe_core::observability::LoggingInitError),
}

impl CliError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Validation(_) => 2,
            Self::Config(_) => 2,
            Self::Rejected(_) => 2,
            Self::UnknownUniverse(_) => 2,
            Self::Serialization(_) => 4,
            Self::Io(_) => 10,
            Self::Logging(_) => 10,
        }
    }
}
