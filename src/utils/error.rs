use thiserror::Error;

#[derive(Error, Debug)]
pub enum MapperError {
    #[error("Source cannot be null: {context}")]
    NullInput { context: String },

    #[error("Type mismatch on field '{field}': cannot map from {source_type} to {destination_type}")]
    TypeMismatch {
        field: String,
        source_type: String,
        destination_type: String,
    },

    #[error("Maximum mapping depth ({max_depth}) exceeded while mapping {shape}")]
    DepthExceeded { max_depth: usize, shape: String },

    #[error("Field '{field}' on {shape} is not writable")]
    FieldNotWritable { shape: String, field: String },

    #[error("Unknown field '{field}' on {shape}")]
    UnknownField { shape: String, field: String },

    #[error("Value conversion failed: expected {expected}, found {found}")]
    ValueConversion { expected: String, found: String },

    #[error("Source object {shape} is mutably borrowed elsewhere")]
    SourceBorrowed { shape: String },

    #[error("Custom mapping failed: {message}")]
    CustomMapping { message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for configuration field '{field}': {value} ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Mapping,
    Configuration,
    System,
}

impl MapperError {
    pub fn type_mismatch(
        field: &str,
        source_type: impl ToString,
        destination_type: impl ToString,
    ) -> Self {
        MapperError::TypeMismatch {
            field: field.to_string(),
            source_type: source_type.to_string(),
            destination_type: destination_type.to_string(),
        }
    }

    pub fn custom(message: impl Into<String>) -> Self {
        MapperError::CustomMapping {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            MapperError::NullInput { .. } | MapperError::SourceBorrowed { .. } => {
                ErrorCategory::Input
            }
            MapperError::TypeMismatch { .. }
            | MapperError::DepthExceeded { .. }
            | MapperError::FieldNotWritable { .. }
            | MapperError::UnknownField { .. }
            | MapperError::ValueConversion { .. }
            | MapperError::CustomMapping { .. } => ErrorCategory::Mapping,
            MapperError::ConfigError { .. } | MapperError::InvalidConfigValueError { .. } => {
                ErrorCategory::Configuration
            }
            MapperError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            MapperError::NullInput { .. } => "Pass a present source object or sequence",
            MapperError::TypeMismatch { .. } => {
                "Align the declared field types or rename one side so the fields no longer match"
            }
            MapperError::DepthExceeded { .. } => {
                "Enable handle_circular_references or raise max_depth"
            }
            MapperError::FieldNotWritable { .. } | MapperError::UnknownField { .. } => {
                "Check the shape's field table"
            }
            MapperError::ValueConversion { .. } => {
                "Check that the shape's declared field type matches its Rust field type"
            }
            MapperError::SourceBorrowed { .. } => {
                "Release mutable borrows of the source graph before mapping"
            }
            MapperError::CustomMapping { .. } => "Inspect the custom mapping callback",
            MapperError::ConfigError { .. } | MapperError::InvalidConfigValueError { .. } => {
                "Fix the configuration file and retry"
            }
            MapperError::IoError(_) => "Check file paths and permissions",
        }
    }
}

pub type Result<T> = std::result::Result<T, MapperError>;
