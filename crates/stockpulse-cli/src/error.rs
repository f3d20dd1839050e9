use thiserror::Error;

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Validation(#[from] stockpulse_core::ValidationError),

    #[error(transparent)]
    Api(#[from] stockpulse_core::ApiError),

    #[error(transparent)]
    Core(#[from] stockpulse_core::CoreError),

    #[error("command error: {0}")]
    Command(String),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error("{path}: {source}")]
    File {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Validation(_) => 2,
            Self::Command(_) => 2,
            Self::Api(_) => 3,
            Self::Core(_) => 4,
            Self::Serialization(_) => 4,
            Self::File { .. } => 10,
            Self::Io(_) => 10,
        }
    }
}
