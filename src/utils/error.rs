use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("HTTP request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("Cannot fetch page count for filter \"{filter}\"")]
    PageCountUnavailable { filter: String },

    #[error("Invalid selector '{selector}': {message}")]
    SelectorError { selector: String, message: String },

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration '{field}'")]
    MissingConfigError { field: String },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Parsing,
    Configuration,
    Storage,
    Processing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ErrorSeverity {
    /// 依嚴重程度對應的程序退出碼
    pub fn exit_code(self) -> i32 {
        match self {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

impl EtlError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            EtlError::ApiError(_) => ErrorCategory::Network,
            EtlError::PageCountUnavailable { .. } => ErrorCategory::Parsing,
            EtlError::SelectorError { .. }
            | EtlError::ConfigValidationError { .. }
            | EtlError::InvalidConfigValueError { .. }
            | EtlError::MissingConfigError { .. } => ErrorCategory::Configuration,
            EtlError::IoError(_) => ErrorCategory::Storage,
            EtlError::CsvError(_)
            | EtlError::SerializationError(_)
            | EtlError::ProcessingError { .. } => ErrorCategory::Processing,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            // 網路錯誤通常重跑即可
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Parsing | ErrorCategory::Processing => ErrorSeverity::High,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Storage => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            EtlError::ApiError(_) => {
                "Check network connectivity and that the endpoint is reachable, then rerun"
            }
            EtlError::PageCountUnavailable { .. } => {
                "The session cookie has probably expired or the filter is unknown; \
                 log in again and refresh the cookie"
            }
            EtlError::SelectorError { .. } => {
                "Fix the CSS selector in the [extract.selectors] section"
            }
            EtlError::MissingConfigError { .. }
            | EtlError::ConfigValidationError { .. }
            | EtlError::InvalidConfigValueError { .. } => {
                "Review the command line flags or the TOML configuration file"
            }
            EtlError::IoError(_) => "Check that the output directory exists and is writable",
            EtlError::CsvError(_) | EtlError::SerializationError(_) => {
                "Rerun with --verbose and inspect the scraped records"
            }
            EtlError::ProcessingError { .. } => "Rerun with --verbose for more details",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            EtlError::ApiError(e) => match e.status() {
                Some(status) => format!("The order history page answered with HTTP {}", status),
                None => format!("Could not reach the order history page: {}", e),
            },
            EtlError::PageCountUnavailable { filter } => format!(
                "Could not find the order count for filter \"{}\"; is the cookie still valid?",
                filter
            ),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_count_error_is_high_severity_parsing() {
        let err = EtlError::PageCountUnavailable {
            filter: "year-2020".to_string(),
        };

        assert_eq!(err.category(), ErrorCategory::Parsing);
        assert_eq!(err.severity(), ErrorSeverity::High);
        assert!(err.to_string().contains("year-2020"));
        assert!(err.user_friendly_message().contains("cookie"));
    }

    #[test]
    fn test_config_errors_share_category() {
        let missing = EtlError::MissingConfigError {
            field: "cookie".to_string(),
        };
        let invalid = EtlError::InvalidConfigValueError {
            field: "page_size".to_string(),
            value: "0".to_string(),
            reason: "Value must be at least 1".to_string(),
        };

        assert_eq!(missing.category(), ErrorCategory::Configuration);
        assert_eq!(invalid.category(), ErrorCategory::Configuration);
        assert_eq!(
            invalid.to_string(),
            "Invalid value '0' for 'page_size': Value must be at least 1"
        );
    }

    #[test]
    fn test_io_error_is_critical() {
        let err: EtlError =
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied").into();
        assert_eq!(err.severity(), ErrorSeverity::Critical);
        assert_eq!(err.severity().exit_code(), 3);
    }

    #[test]
    fn test_exit_code_by_severity() {
        let page_count = EtlError::PageCountUnavailable {
            filter: "year-2020".to_string(),
        };
        let processing = EtlError::ProcessingError {
            message: "boom".to_string(),
        };

        assert_eq!(page_count.severity().exit_code(), 1);
        assert_eq!(processing.severity().exit_code(), 1);
        assert_eq!(ErrorSeverity::Medium.exit_code(), 2);
        assert_eq!(ErrorSeverity::Low.exit_code(), 0);
    }
}
