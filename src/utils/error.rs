use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimError {
    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value for {field}: '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Simulation error: {message}")]
    ProcessingError { message: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Configuration,
    Computation,
    Output,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl SimError {
    pub fn validation(message: impl Into<String>) -> Self {
        SimError::ValidationError {
            message: message.into(),
        }
    }

    pub fn processing(message: impl Into<String>) -> Self {
        SimError::ProcessingError {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            SimError::ValidationError { .. } => ErrorCategory::Input,
            SimError::ConfigValidationError { .. }
            | SimError::InvalidConfigValueError { .. }
            | SimError::MissingConfigError { .. } => ErrorCategory::Configuration,
            SimError::ProcessingError { .. } => ErrorCategory::Computation,
            SimError::ZipError(_)
            | SimError::CsvError(_)
            | SimError::IoError(_)
            | SimError::SerializationError(_) => ErrorCategory::Output,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Input | ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Computation => ErrorSeverity::Medium,
            ErrorCategory::Output => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            SimError::ValidationError { .. } => {
                "Check that doses are non-negative numbers and patient values are within range"
            }
            SimError::ConfigValidationError { .. } => {
                "Make sure the experiment file is valid TOML with all required sections"
            }
            SimError::InvalidConfigValueError { .. } => {
                "Correct the highlighted field and run again"
            }
            SimError::MissingConfigError { .. } => "Add the missing field to the experiment file",
            SimError::ProcessingError { .. } => {
                "Check the curve parameters (Max, EC50, n) and antagonist settings"
            }
            SimError::IoError(_) => "Check that the output directory exists and is writable",
            SimError::CsvError(_) | SimError::SerializationError(_) | SimError::ZipError(_) => {
                "Try a different output format or disable the zip bundle"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            SimError::ValidationError { message } => format!("Invalid input: {}", message),
            SimError::InvalidConfigValueError { field, reason, .. } => {
                format!("Setting '{}' is not valid: {}", field, reason)
            }
            SimError::MissingConfigError { field } => {
                format!("Setting '{}' is required but was not provided", field)
            }
            SimError::ConfigValidationError { message, .. } => {
                format!("Could not read configuration: {}", message)
            }
            SimError::ProcessingError { message } => format!("Simulation failed: {}", message),
            other => format!("Could not write results: {}", other),
        }
    }
}

pub type Result<T> = std::result::Result<T, SimError>;
