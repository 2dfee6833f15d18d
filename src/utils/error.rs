use thiserror::Error;

#[derive(Error, Debug)]
pub enum SubwayError {
    #[error("Insufficient section length: existing section is {existing}, new section is {requested}")]
    InsufficientSplitDistance { existing: u32, requested: u32 },

    #[error("First section of the line could not be found")]
    FirstSectionNotFound,

    #[error("Cannot delete a station from a line with only one section")]
    SingleSectionDeletionDenied,

    #[error("No section found for station {station}")]
    SectionNotFound { station: String },

    #[error("Section chain loops back to station {station}")]
    CycleDetected { station: String },

    #[error("Section distance must be positive, got {value}")]
    InvalidDistance { value: i64 },

    #[error("Section cannot start and end at the same station {station}")]
    IdenticalEndpoints { station: String },

    #[error("Merged section distance overflows")]
    DistanceOverflow,

    #[error("Line not found: {line}")]
    LineNotFound { line: String },

    #[error("Station not found: {station}")]
    StationNotFound { station: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("CSV output error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Configuration error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The requested mutation would break the section chain.
    Chain,
    /// A referenced line or station does not exist.
    Lookup,
    Config,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl SubwayError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            SubwayError::InsufficientSplitDistance { .. }
            | SubwayError::FirstSectionNotFound
            | SubwayError::SingleSectionDeletionDenied
            | SubwayError::SectionNotFound { .. }
            | SubwayError::CycleDetected { .. }
            | SubwayError::InvalidDistance { .. }
            | SubwayError::IdenticalEndpoints { .. }
            | SubwayError::DistanceOverflow => ErrorCategory::Chain,
            SubwayError::LineNotFound { .. } | SubwayError::StationNotFound { .. } => {
                ErrorCategory::Lookup
            }
            SubwayError::TomlError(_)
            | SubwayError::ConfigValidationError { .. }
            | SubwayError::InvalidConfigValueError { .. }
            | SubwayError::MissingConfigError { .. } => ErrorCategory::Config,
            SubwayError::IoError(_)
            | SubwayError::SerializationError(_)
            | SubwayError::CsvError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // A malformed chain means stored data is already corrupt.
            SubwayError::FirstSectionNotFound | SubwayError::CycleDetected { .. } => {
                ErrorSeverity::Critical
            }
            SubwayError::IoError(_)
            | SubwayError::SerializationError(_)
            | SubwayError::CsvError(_) => ErrorSeverity::Critical,
            _ => match self.category() {
                ErrorCategory::Chain | ErrorCategory::Lookup => ErrorSeverity::Medium,
                ErrorCategory::Config => ErrorSeverity::High,
                ErrorCategory::System => ErrorSeverity::Critical,
            },
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            SubwayError::InsufficientSplitDistance { existing, requested } => format!(
                "The new section ({}) must be shorter than the section it splits ({})",
                requested, existing
            ),
            SubwayError::SingleSectionDeletionDenied => {
                "A line needs at least one section; delete the whole line instead".to_string()
            }
            SubwayError::SectionNotFound { station } => {
                format!("Station {} is not on this line", station)
            }
            SubwayError::FirstSectionNotFound | SubwayError::CycleDetected { .. } => {
                format!("The stored line is inconsistent: {}", self)
            }
            _ => self.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Chain => match self {
                SubwayError::InsufficientSplitDistance { .. } => {
                    "Use a distance smaller than the existing section"
                }
                SubwayError::FirstSectionNotFound | SubwayError::CycleDetected { .. } => {
                    "Reload the line's sections from storage and check them for loops"
                }
                _ => "Check the stations and distance of the requested section",
            },
            ErrorCategory::Lookup => "Make sure the line and stations are registered first",
            ErrorCategory::Config => "Fix the scenario file and run again",
            ErrorCategory::System => "Check file permissions and available disk space",
        }
    }
}

pub type Result<T> = std::result::Result<T, SubwayError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_errors_are_retryable_requests() {
        let err = SubwayError::InsufficientSplitDistance {
            existing: 5,
            requested: 7,
        };
        assert_eq!(err.category(), ErrorCategory::Chain);
        assert_eq!(err.severity(), ErrorSeverity::Medium);
        assert!(err.user_friendly_message().contains("(7)"));
    }

    #[test]
    fn test_malformed_chain_is_critical() {
        assert_eq!(
            SubwayError::FirstSectionNotFound.severity(),
            ErrorSeverity::Critical
        );
        let missing = SubwayError::MissingConfigError {
            field: "line.name".to_string(),
        };
        assert_eq!(missing.category(), ErrorCategory::Config);
        assert_eq!(missing.severity(), ErrorSeverity::High);
    }
}
