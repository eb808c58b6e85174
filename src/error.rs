use content_picker::PickerError;
use std::fmt;

/// Central error types for the Storage Playground app
#[derive(Debug)]
pub enum AppError {
    /// Database error (rusqlite)
    Database(rusqlite::Error),
    /// Filesystem error
    Filesystem(std::io::Error),
    /// Configuration file could not be parsed
    Config(String),
    /// The local media index could not be opened or enumerated
    QueryFailure(String),
    /// Permission denied (e.g. storage access)
    PermissionDenied(String),
    /// The requested picker is not available here
    Unsupported(String),
    /// General error
    Other(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::Database(e) => write!(f, "Database error: {}", e),
            AppError::Filesystem(e) => write!(f, "Filesystem error: {}", e),
            AppError::Config(msg) => write!(f, "Configuration error: {}", msg),
            AppError::QueryFailure(msg) => write!(f, "Media query failed: {}", msg),
            AppError::PermissionDenied(msg) => write!(f, "Permission denied: {}", msg),
            AppError::Unsupported(msg) => write!(f, "Not supported: {}", msg),
            AppError::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for AppError {}

// Conversions from other error types
impl From<rusqlite::Error> for AppError {
    fn from(e: rusqlite::Error) -> Self {
        AppError::Database(e)
    }
}

impl From<std::io::Error> for AppError {
    fn from(e: std::io::Error) -> Self {
        AppError::Filesystem(e)
    }
}

impl From<toml::de::Error> for AppError {
    fn from(e: toml::de::Error) -> Self {
        AppError::Config(e.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self {
        AppError::Other(format!("JSON error: {}", e))
    }
}

impl From<PickerError> for AppError {
    fn from(e: PickerError) -> Self {
        match e {
            PickerError::QueryFailure(msg) => AppError::QueryFailure(msg),
            PickerError::PermissionDenied(msg) => AppError::PermissionDenied(msg),
            PickerError::Timeout(msg) => AppError::Other(format!("Picker timed out: {}", msg)),
            PickerError::PlatformNotSupported(msg) => AppError::Unsupported(msg),
            PickerError::UnsupportedFilter(filter) => {
                AppError::Unsupported(format!("filter '{}'", filter))
            }
            PickerError::Other(msg) => AppError::Other(msg),
        }
    }
}

/// User-friendly error messages for UI
impl AppError {
    pub fn user_message(&self) -> String {
        match self {
            AppError::Database(_) => "A database error occurred. Please try again.".to_string(),
            AppError::Filesystem(_) => {
                "Error accessing files. Please check app permissions.".to_string()
            }
            AppError::Config(msg) => format!("The configuration file is invalid: {}", msg),
            AppError::QueryFailure(_) => {
                "Local media could not be read. Please check storage permissions.".to_string()
            }
            AppError::PermissionDenied(msg) => format!("Permission required: {}", msg),
            AppError::Unsupported(msg) => format!("Not available on this device: {}", msg),
            AppError::Other(msg) => msg.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use content_picker::TypeFilter;

    #[test]
    fn test_query_failure_stays_distinct() {
        let err: AppError = PickerError::QueryFailure("no index".to_string()).into();
        assert!(matches!(err, AppError::QueryFailure(_)));
        assert!(err.user_message().contains("storage permissions"));
    }

    #[test]
    fn test_unsupported_filter_message() {
        let err: AppError = PickerError::UnsupportedFilter(TypeFilter::Zip).into();
        assert_eq!(err.to_string(), "Not supported: filter 'ZIP'");
    }
}
