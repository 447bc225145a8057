use serde::Serialize;
use thiserror::Error;

/// IFA PPN 結構錯誤：輸入不是可解析的資料矩陣內容
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FormatError {
    #[error("The text is not a valid IFA PPN code (text is too short).")]
    TooShort,

    #[error("The text is not a valid IFA PPN code (prefix mismatch).")]
    PrefixMismatch,

    #[error("The text is not a valid IFA PPN code (missing terminator).")]
    MissingTerminator,

    #[error("The text is not a valid IFA PPN code (not IFA PPN scheme).")]
    NotIfaPpnScheme,
}

impl FormatError {
    /// 簡短原因，用於 CSV/TSV 輸出欄位
    pub fn reason(&self) -> &'static str {
        match self {
            FormatError::TooShort => "too short",
            FormatError::PrefixMismatch => "prefix mismatch",
            FormatError::MissingTerminator => "missing terminator",
            FormatError::NotIfaPpnScheme => "not IFA PPN scheme",
        }
    }
}

#[derive(Error, Debug)]
pub enum BatchError {
    #[error("Invalid drug code: {0}")]
    FormatError(#[from] FormatError),

    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
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

impl BatchError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            BatchError::FormatError(_) => ErrorCategory::Input,
            BatchError::ConfigError { .. }
            | BatchError::ConfigValidationError { .. }
            | BatchError::InvalidConfigValueError { .. }
            | BatchError::MissingConfigError { .. } => ErrorCategory::Configuration,
            BatchError::IoError(_) | BatchError::ZipError(_) => ErrorCategory::Storage,
            BatchError::CsvError(_)
            | BatchError::SerializationError(_)
            | BatchError::ProcessingError { .. } => ErrorCategory::Processing,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // 單筆條碼錯誤不影響整批處理
            BatchError::FormatError(_) => ErrorSeverity::Low,
            BatchError::IoError(_) => ErrorSeverity::Medium,
            BatchError::ConfigError { .. }
            | BatchError::ConfigValidationError { .. }
            | BatchError::InvalidConfigValueError { .. }
            | BatchError::MissingConfigError { .. }
            | BatchError::CsvError(_)
            | BatchError::SerializationError(_)
            | BatchError::ProcessingError { .. } => ErrorSeverity::High,
            BatchError::ZipError(_) => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Input => {
                "Check that the scanner emits the [)> RS 06 GS ... RS EOT envelope"
            }
            ErrorCategory::Configuration => {
                "Review the command line arguments or the TOML configuration file"
            }
            ErrorCategory::Storage => {
                "Make sure the input file exists and the output directory is writable"
            }
            ErrorCategory::Processing => {
                "Re-run with --verbose and inspect the offending input line"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            BatchError::FormatError(e) => format!("Drug code rejected: {}", e.reason()),
            BatchError::IoError(e) => format!("Could not access a file: {}", e),
            BatchError::ConfigError { message } => format!("Invalid configuration: {}", message),
            BatchError::ConfigValidationError { field, message } => {
                format!("Invalid configuration in '{}': {}", field, message)
            }
            BatchError::InvalidConfigValueError { field, reason, .. } => {
                format!("Invalid value for '{}': {}", field, reason)
            }
            BatchError::MissingConfigError { field } => {
                format!("Missing required setting '{}'", field)
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, BatchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_error_messages_name_the_cause() {
        assert!(FormatError::TooShort.to_string().contains("too short"));
        assert!(FormatError::PrefixMismatch.to_string().contains("prefix mismatch"));
        assert!(FormatError::MissingTerminator
            .to_string()
            .contains("missing terminator"));
        assert_eq!(FormatError::NotIfaPpnScheme.reason(), "not IFA PPN scheme");
    }

    #[test]
    fn test_format_error_converts_into_batch_error() {
        let err: BatchError = FormatError::TooShort.into();
        assert_eq!(err.category(), ErrorCategory::Input);
        assert_eq!(err.severity(), ErrorSeverity::Low);
        assert_eq!(err.user_friendly_message(), "Drug code rejected: too short");
    }

    #[test]
    fn test_config_errors_are_high_severity() {
        let err = BatchError::MissingConfigError {
            field: "input.path".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Configuration);
        assert_eq!(err.severity(), ErrorSeverity::High);
        assert!(err.user_friendly_message().contains("input.path"));
    }
}
