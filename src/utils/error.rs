use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("{source_name} is unavailable: HTTP status {status}")]
    SourceUnavailable { source_name: String, status: u16 },

    #[error("Unexpected response from {source_name}: {message}")]
    UnexpectedResponse {
        source_name: String,
        message: String,
    },

    #[error("Missing required field: {field}")]
    MissingField { field: String },

    #[error("Invalid value for field '{field}': {reason}")]
    InvalidField { field: String, reason: String },

    #[error("Stored data for '{keyword}' is corrupt: {message}")]
    CorruptData { keyword: String, message: String },

    #[error("Failed to persist '{path}': {source}")]
    Persistence {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("No saved vacancies for keyword '{keyword}'")]
    NotFound { keyword: String },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid configuration value for '{field}' ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Data,
    Storage,
    Configuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl EtlError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::SourceUnavailable { .. } | Self::UnexpectedResponse { .. } | Self::Http(_) => {
                ErrorCategory::Network
            }
            Self::MissingField { .. }
            | Self::InvalidField { .. }
            | Self::CorruptData { .. }
            | Self::SerializationError(_) => ErrorCategory::Data,
            Self::Persistence { .. } | Self::NotFound { .. } | Self::IoError(_) => {
                ErrorCategory::Storage
            }
            Self::ConfigError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::NotFound { .. } => ErrorSeverity::Low,
            Self::SourceUnavailable { .. } | Self::UnexpectedResponse { .. } | Self::Http(_) => {
                ErrorSeverity::Medium
            }
            Self::MissingField { .. }
            | Self::InvalidField { .. }
            | Self::CorruptData { .. }
            | Self::SerializationError(_)
            | Self::ConfigError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => ErrorSeverity::High,
            Self::Persistence { .. } | Self::IoError(_) => ErrorSeverity::Critical,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::SourceUnavailable { source_name, status } => {
                format!("Could not reach {} (status {})", source_name, status)
            }
            Self::NotFound { keyword } => {
                format!("Nothing has been saved for '{}' yet", keyword)
            }
            Self::CorruptData { keyword, .. } => {
                format!("The saved vacancies for '{}' could not be read", keyword)
            }
            Self::Persistence { path, .. } => format!("Could not write {}", path),
            Self::InvalidConfigValueError { field, reason, .. } => {
                format!("Invalid setting '{}': {}", field, reason)
            }
            Self::MissingConfigError { field } => format!("Missing setting '{}'", field),
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Network => "Check your network connection and the board endpoints",
            ErrorCategory::Data => "Run a new search for this keyword to refresh the data",
            ErrorCategory::Storage => match self {
                Self::NotFound { .. } => "Run `search <keyword>` first",
                _ => "Check permissions and free space in the data directory",
            },
            ErrorCategory::Configuration => "Fix the configuration file or command-line flags",
        }
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_unavailable_is_network_error() {
        let err = EtlError::SourceUnavailable {
            source_name: "hh.ru".to_string(),
            status: 500,
        };
        assert_eq!(err.category(), ErrorCategory::Network);
        assert_eq!(err.severity(), ErrorSeverity::Medium);
        assert!(err.to_string().contains("500"));
    }

    #[test]
    fn test_not_found_suggests_search() {
        let err = EtlError::NotFound {
            keyword: "rust".to_string(),
        };
        assert_eq!(err.severity(), ErrorSeverity::Low);
        assert!(err.recovery_suggestion().contains("search"));
        assert!(err.user_friendly_message().contains("rust"));
    }
}
