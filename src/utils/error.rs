use thiserror::Error;

#[derive(Error, Debug)]
pub enum SynthError {
    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Configuration error in '{field}': {message}")]
    ConfigError { field: String, message: String },

    #[error("Missing configuration value: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Invariant violated for {subject}: {message}")]
    InvariantViolation { subject: String, message: String },

    #[error("Partition lost files: expected {expected}, buckets hold {actual}")]
    PartitionMismatch { expected: usize, actual: usize },

    #[error("Sampling for {subject} gave up after {attempts} attempts")]
    SamplingExhausted { subject: String, attempts: usize },

    #[error("Invalid distribution parameters: {message}")]
    DistributionError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Invariant,
    Sampling,
    Output,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl SynthError {
    pub fn invariant(subject: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvariantViolation {
            subject: subject.into(),
            message: message.into(),
        }
    }

    pub fn distribution(message: impl std::fmt::Display) -> Self {
        Self::DistributionError {
            message: message.to_string(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ConfigError { .. }
            | Self::MissingConfigError { .. }
            | Self::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            Self::InvariantViolation { .. } | Self::PartitionMismatch { .. } => {
                ErrorCategory::Invariant
            }
            Self::SamplingExhausted { .. } | Self::DistributionError { .. } => {
                ErrorCategory::Sampling
            }
            Self::ZipError(_)
            | Self::CsvError(_)
            | Self::IoError(_)
            | Self::JsonError(_)
            | Self::YamlError(_) => ErrorCategory::Output,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Sampling => ErrorSeverity::Medium,
            ErrorCategory::Output => ErrorSeverity::High,
            // 代表程式內部的計算錯誤
            ErrorCategory::Invariant => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::InvariantViolation { .. } | Self::PartitionMismatch { .. } => {
                "This is an internal bookkeeping error; rerun with --verbose and report the seed"
            }
            Self::SamplingExhausted { .. } => {
                "Try another seed or relax the cohesion probabilities in the configuration"
            }
            Self::DistributionError { .. } => {
                "Check that every lambda in the configuration is a positive, finite number"
            }
            Self::ConfigError { .. } => "Make sure the configuration file is valid TOML or YAML",
            Self::IoError(_)
            | Self::ZipError(_)
            | Self::CsvError(_)
            | Self::JsonError(_)
            | Self::YamlError(_) => {
                "Check that the output and dump directories are writable"
            }
            _ => "Fix the configuration value named in the error and run again",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
            ErrorCategory::Invariant => format!("Generated graph failed validation: {}", self),
            ErrorCategory::Sampling => format!("Random sampling failed: {}", self),
            ErrorCategory::Output => format!("Could not write results: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, SynthError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invariant_errors_are_critical() {
        let err = SynthError::invariant("!File File_1", "row sums to 0.9");
        assert_eq!(err.category(), ErrorCategory::Invariant);
        assert_eq!(err.severity(), ErrorSeverity::Critical);
        assert!(err.to_string().contains("!File File_1"));
    }

    #[test]
    fn test_config_errors_are_high() {
        let err = SynthError::MissingConfigError {
            field: "Files.number".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Configuration);
        assert_eq!(err.severity(), ErrorSeverity::High);
        assert!(err.user_friendly_message().starts_with("Configuration problem"));
    }

    #[test]
    fn test_sampling_errors_are_medium() {
        let err = SynthError::SamplingExhausted {
            subject: "FileGroup0".to_string(),
            attempts: 3,
        };
        assert_eq!(err.category(), ErrorCategory::Sampling);
        assert_eq!(err.severity(), ErrorSeverity::Medium);
        assert!(err.severity() < ErrorSeverity::Critical);
    }
}
