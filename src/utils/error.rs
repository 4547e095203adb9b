use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("Missing configuration value: {field}")]
    MissingConfiguration { field: String },

    #[error("Invalid configuration value for {field} ({value}): {reason}")]
    InvalidConfigValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration error in {field}: {message}")]
    ConfigValidation { field: String, message: String },

    #[error("API request failed: {0}")]
    Api(#[from] reqwest::Error),

    #[error("Backend responded with {status}: {message}")]
    Status { status: u16, message: String },

    #[error("{resource} not found: {id}")]
    NotFound { resource: String, id: String },

    #[error("Unexpected backend response: {message}")]
    UnexpectedResponse { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Validation error: {message}")]
    Validation { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl BackendError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn missing(field: impl Into<String>) -> Self {
        Self::MissingConfiguration {
            field: field.into(),
        }
    }

    /// 配置錯誤屬於啟動失敗，無法在執行期恢復
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::MissingConfiguration { .. }
            | Self::InvalidConfigValue { .. }
            | Self::ConfigValidation { .. } => ErrorSeverity::Critical,
            Self::Status { .. } => ErrorSeverity::Medium,
            Self::NotFound { .. } => ErrorSeverity::Low,
            Self::Api(_)
            | Self::UnexpectedResponse { .. }
            | Self::Io(_)
            | Self::Serialization(_)
            | Self::Validation { .. } => ErrorSeverity::High,
        }
    }

    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            Self::MissingConfiguration { .. }
                | Self::InvalidConfigValue { .. }
                | Self::ConfigValidation { .. }
        )
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            Self::MissingConfiguration { field } => format!(
                "Set {} in the environment or in a .env file before starting",
                field
            ),
            Self::InvalidConfigValue { field, .. } => {
                format!("Check the value configured for {}", field)
            }
            Self::ConfigValidation { .. } => "Fix the configuration file syntax".to_string(),
            Self::Api(_) => "Check network connectivity and the backend URL".to_string(),
            Self::Status { status, .. } if *status == 401 || *status == 403 => {
                "Check that the anon key belongs to this project".to_string()
            }
            Self::Status { .. } => "Inspect the backend logs for the failed request".to_string(),
            Self::NotFound { .. } => "Verify the identifier and try again".to_string(),
            Self::UnexpectedResponse { .. } => {
                "Check that the table schema matches the Booking record".to_string()
            }
            Self::Io(_) => "Check file paths and permissions".to_string(),
            Self::Serialization(_) => "Check that the input is valid booking JSON".to_string(),
            Self::Validation { .. } => "Correct the booking fields and retry".to_string(),
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::MissingConfiguration { field } => {
                format!("Backend configuration is incomplete: {} is not set", field)
            }
            Self::Status { status, message } => {
                format!("The backend rejected the request ({}): {}", status, message)
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, BackendError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_configuration_is_critical() {
        let err = BackendError::missing("SUPABASE_URL");
        assert_eq!(err.severity(), ErrorSeverity::Critical);
        assert!(err.is_configuration_error());
        assert_eq!(err.to_string(), "Missing configuration value: SUPABASE_URL");
        assert!(err.recovery_suggestion().contains("SUPABASE_URL"));
    }

    #[test]
    fn test_status_error_message() {
        let err = BackendError::Status {
            status: 401,
            message: "Invalid API key".to_string(),
        };
        assert_eq!(err.severity(), ErrorSeverity::Medium);
        assert!(!err.is_configuration_error());
        assert!(err.user_friendly_message().contains("401"));
        assert!(err.recovery_suggestion().contains("anon key"));
    }

    #[test]
    fn test_bad_booking_json_is_serialization_error() {
        let err: BackendError = serde_json::from_str::<crate::domain::model::Booking>("{\"name\": 1}")
            .unwrap_err()
            .into();
        assert!(matches!(err, BackendError::Serialization(_)));
        assert_eq!(err.severity(), ErrorSeverity::High);
        assert!(!err.is_configuration_error());
    }
}
