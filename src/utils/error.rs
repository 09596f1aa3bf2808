use thiserror::Error;

#[derive(Error, Debug)]
pub enum PnrError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("CSV export error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Invalid birth date '{input}': {reason}")]
    InvalidDate { input: String, reason: String },

    #[error("Invalid gender '{input}': expected 'm' or 'f'")]
    InvalidGender { input: String },

    #[error("Invalid identity number '{input}': {reason}")]
    InvalidNumber { input: String, reason: String },

    #[error("Storage error for key '{key}': {message}")]
    StorageError { key: String, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Io,
    Configuration,
    Input,
    Storage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl PnrError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            PnrError::IoError(_) => ErrorCategory::Io,
            PnrError::SerializationError(_) | PnrError::StorageError { .. } => {
                ErrorCategory::Storage
            }
            PnrError::CsvError(_) => ErrorCategory::Io,
            PnrError::ConfigError { .. }
            | PnrError::ConfigValidationError { .. }
            | PnrError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            PnrError::InvalidDate { .. }
            | PnrError::InvalidGender { .. }
            | PnrError::InvalidNumber { .. } => ErrorCategory::Input,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Input => ErrorSeverity::High,
            ErrorCategory::Configuration => ErrorSeverity::High,
            // 狀態檔損毀不影響號碼產生
            ErrorCategory::Storage => ErrorSeverity::Medium,
            ErrorCategory::Io => ErrorSeverity::Critical,
        }
    }

    /// 給終端使用者看的簡短訊息
    pub fn user_friendly_message(&self) -> String {
        match self {
            PnrError::IoError(e) => format!("Could not read or write a file: {}", e),
            PnrError::SerializationError(_) => "Saved state could not be decoded".to_string(),
            PnrError::CsvError(_) => "Could not write the export".to_string(),
            PnrError::ConfigError { message } => format!("Configuration problem: {}", message),
            PnrError::ConfigValidationError { field, message } => {
                format!("Configuration field '{}' is invalid: {}", field, message)
            }
            PnrError::InvalidConfigValueError { field, value, .. } => {
                format!("'{}' is not an accepted value for '{}'", value, field)
            }
            PnrError::InvalidDate { input, .. } => {
                format!("'{}' is not a date in YYYY-MM-DD form", input)
            }
            PnrError::InvalidGender { input } => {
                format!("'{}' is not a gender, use 'm' or 'f'", input)
            }
            PnrError::InvalidNumber { input, reason } => {
                format!("{} is not a valid identity number ({})", input, reason)
            }
            PnrError::StorageError { key, .. } => format!("Saved state '{}' is unusable", key),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Io => "Check that the path exists and is writable",
            ErrorCategory::Configuration => {
                "Review the TOML configuration file against the documented sections"
            }
            ErrorCategory::Input => "Pass the date as YYYY-MM-DD and the gender as 'm' or 'f'",
            ErrorCategory::Storage => "Remove the corrupt file from the state directory",
        }
    }
}

pub type Result<T> = std::result::Result<T, PnrError>;
