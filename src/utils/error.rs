use thiserror::Error;

#[derive(Error, Debug)]
pub enum IndexerError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration parse error: {message}")]
    ConfigParseError { message: String },

    #[error("Invalid value for '{field}' ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid input: {message}")]
    InvalidInputError { message: String },
}

impl IndexerError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInputError {
            message: message.into(),
        }
    }

    /// 給 CLI 使用的修復建議
    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::HttpError(_) => "Check network connectivity and the API endpoint",
            Self::CsvError(_) => "Make sure the URL list is a valid CSV or plain-text file",
            Self::IoError(_) => "Check that the file exists and is readable",
            Self::ConfigParseError { .. } => "Check the TOML syntax of the configuration file",
            Self::InvalidConfigValueError { .. } => "Fix the configuration value and retry",
            Self::MissingConfigError { .. } => {
                "Set the value in the config file or via environment variable"
            }
            Self::InvalidInputError { .. } => "Check the domain or day count you entered",
        }
    }

    /// Invalid-input and config problems are rejected before any network activity.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::ConfigParseError { .. }
                | Self::InvalidConfigValueError { .. }
                | Self::MissingConfigError { .. }
                | Self::InvalidInputError { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, IndexerError>;
