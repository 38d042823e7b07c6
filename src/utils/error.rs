use thiserror::Error;

#[derive(Error, Debug)]
pub enum FinderError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParseError(#[from] toml::de::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid configuration value for {field}: '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Upstream feed returned HTTP {status} for {url}")]
    UpstreamFetchError { status: u16, url: String },

    #[error("Record store error: {message}")]
    StoreError { message: String },

    #[error("Intent with name {name} not supported")]
    UnsupportedIntent { name: String },

    #[error("Invocation source {invocation_source} not supported")]
    UnsupportedInvocationSource { invocation_source: String },

    #[error("Slot {slot} is required for fulfillment")]
    MissingSlot { slot: String },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Storage,
    Configuration,
    Dialog,
    Data,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl FinderError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            FinderError::ApiError(_) | FinderError::UpstreamFetchError { .. } => {
                ErrorCategory::Network
            }
            FinderError::IoError(_) | FinderError::StoreError { .. } => ErrorCategory::Storage,
            FinderError::TomlParseError(_)
            | FinderError::ConfigError { .. }
            | FinderError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            FinderError::UnsupportedIntent { .. }
            | FinderError::UnsupportedInvocationSource { .. }
            | FinderError::MissingSlot { .. } => ErrorCategory::Dialog,
            FinderError::SerializationError(_) | FinderError::ProcessingError { .. } => {
                ErrorCategory::Data
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            // 網路與儲存錯誤通常可以整批重跑
            ErrorCategory::Network | ErrorCategory::Storage => ErrorSeverity::Medium,
            ErrorCategory::Data | ErrorCategory::Dialog => ErrorSeverity::High,
            ErrorCategory::Configuration => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            FinderError::ApiError(_) | FinderError::UpstreamFetchError { .. } => {
                "Check network connectivity and that the provider feed URL is reachable, then re-run the scrape"
            }
            FinderError::IoError(_) => "Check that the file path exists and is writable",
            FinderError::StoreError { .. } => {
                "Check the record store table name, region and credentials"
            }
            FinderError::SerializationError(_) => {
                "Check that the input is valid JSON in the expected shape"
            }
            FinderError::TomlParseError(_) => "Fix the TOML syntax in the configuration file",
            FinderError::ConfigError { .. }
            | FinderError::InvalidConfigValueError { .. } => {
                "Review the configuration values and environment variables"
            }
            FinderError::UnsupportedIntent { .. } => {
                "Only the FindService intent is handled by this function"
            }
            FinderError::UnsupportedInvocationSource { .. } => {
                "Configure the bot to invoke this function as a dialog or fulfillment code hook"
            }
            FinderError::MissingSlot { .. } => {
                "Mark Service, Gender, Age and Location as required slots on the intent"
            }
            FinderError::ProcessingError { .. } => "Inspect the upstream data for unexpected shapes",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Network => format!("Could not download provider data: {}", self),
            ErrorCategory::Storage => format!("Could not access provider records: {}", self),
            ErrorCategory::Configuration => format!("Invalid configuration: {}", self),
            ErrorCategory::Dialog => format!("Could not handle the conversation turn: {}", self),
            ErrorCategory::Data => format!("Could not process provider data: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, FinderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_intent_is_dialog_error() {
        let err = FinderError::UnsupportedIntent {
            name: "BookHotel".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Dialog);
        assert_eq!(err.to_string(), "Intent with name BookHotel not supported");
    }

    #[test]
    fn test_severity_ordering() {
        let network = FinderError::UpstreamFetchError {
            status: 503,
            url: "http://feed".to_string(),
        };
        let config = FinderError::InvalidConfigValueError {
            field: "table_name".to_string(),
            value: "a".to_string(),
            reason: "too short".to_string(),
        };
        assert!(network.severity() < config.severity());
    }
}
