use thiserror::Error;

#[derive(Error, Debug)]
pub enum LeadError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Webhook responded with status {status}")]
    UpstreamError { status: u16 },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Missing configuration value: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Upstream,
    Configuration,
    Data,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl LeadError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            LeadError::HttpError(_) => ErrorCategory::Network,
            LeadError::UpstreamError { .. } => ErrorCategory::Upstream,
            LeadError::IoError(_) => ErrorCategory::System,
            LeadError::SerializationError(_) => ErrorCategory::Data,
            LeadError::MissingConfigError { .. }
            | LeadError::InvalidConfigValueError { .. }
            | LeadError::ConfigValidationError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Data => ErrorSeverity::Low,
            ErrorCategory::Network | ErrorCategory::Upstream => ErrorSeverity::Medium,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    /// Whether the error came from talking to the webhook, as opposed to local setup.
    pub fn is_delivery_failure(&self) -> bool {
        matches!(
            self.category(),
            ErrorCategory::Network | ErrorCategory::Upstream
        )
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            LeadError::HttpError(e) if e.is_timeout() => {
                "The webhook did not answer in time".to_string()
            }
            LeadError::HttpError(_) => "Could not reach the webhook".to_string(),
            LeadError::UpstreamError { status } => {
                format!("The webhook rejected the submission (HTTP {})", status)
            }
            LeadError::IoError(e) => format!("File system error: {}", e),
            LeadError::SerializationError(_) => "The submission could not be encoded".to_string(),
            LeadError::MissingConfigError { field } => {
                format!("Required setting '{}' is not set", field)
            }
            LeadError::InvalidConfigValueError { field, reason, .. } => {
                format!("Setting '{}' is invalid: {}", field, reason)
            }
            LeadError::ConfigValidationError { field, message } => {
                format!("Setting '{}' is invalid: {}", field, message)
            }
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            LeadError::HttpError(_) => "Check network connectivity and the webhook URL",
            LeadError::UpstreamError { .. } => {
                "Check that the webhook is active and accepts JSON POST requests"
            }
            LeadError::IoError(_) => "Check file paths and permissions",
            LeadError::SerializationError(_) => "Check the submitted data for invalid values",
            LeadError::MissingConfigError { .. } => {
                "Set --webhook-url (or WEBHOOK_URL), or pass --demo-mode to run without a webhook"
            }
            LeadError::InvalidConfigValueError { .. }
            | LeadError::ConfigValidationError { .. } => {
                "Review the configuration file and command line flags"
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, LeadError>;
