use thiserror::Error;

#[derive(Error, Debug)]
pub enum DestructorError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Parse error in {source_name}: {message}")]
    ParseError {
        source_name: String,
        message: String,
    },

    #[error("Struct '{name}' is not defined")]
    UnknownStructError { name: String },

    #[error("Initializer has {found} values, struct '{struct_name}' expects {expected}")]
    ShapeMismatchError {
        struct_name: String,
        expected: usize,
        found: usize,
    },

    #[error("No initialization declaration found for struct '{struct_name}'")]
    DeclarationNotFoundError { struct_name: String },

    #[error("Unsupported initializer syntax: {message}")]
    UnsupportedInitializerError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Input,
    Processing,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl DestructorError {
    pub fn parse(source_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ParseError {
            source_name: source_name.into(),
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ConfigError { .. }
            | Self::MissingConfigError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::ConfigValidationError { .. } => ErrorCategory::Configuration,
            Self::ParseError { .. }
            | Self::UnknownStructError { .. }
            | Self::DeclarationNotFoundError { .. }
            | Self::UnsupportedInitializerError { .. } => ErrorCategory::Input,
            Self::ShapeMismatchError { .. } | Self::SerializationError(_) => {
                ErrorCategory::Processing
            }
            Self::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // 找不到宣告時沒有任何輸出，但也沒有損壞任何東西
            Self::DeclarationNotFoundError { .. } => ErrorSeverity::Low,
            Self::ShapeMismatchError { .. } => ErrorSeverity::Medium,
            Self::IoError(_) => ErrorSeverity::Critical,
            _ => ErrorSeverity::High,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::IoError(_) => "Check that the input files exist and the output directory is writable",
            Self::SerializationError(_) => "Re-run with --verbose to inspect the parsed structures",
            Self::ConfigError { .. } | Self::ConfigValidationError { .. } => {
                "Review the job file or command line arguments"
            }
            Self::MissingConfigError { .. } => "Provide the missing argument or add it to the job file",
            Self::InvalidConfigValueError { .. } => "Correct the highlighted value and try again",
            Self::ParseError { .. } => "Make sure the file only contains plain `typedef struct` definitions and brace initializers",
            Self::UnknownStructError { .. } => "Check the --struct / --target-view names against the header files",
            Self::ShapeMismatchError { .. } => "Make sure the initializer provides a value for every field of the full struct",
            Self::DeclarationNotFoundError { .. } => "Check that the init file declares a variable of the target struct type",
            Self::UnsupportedInitializerError { .. } => "Rewrite designated initializers as positional ones",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::IoError(e) => format!("File access failed: {}", e),
            Self::ShapeMismatchError {
                struct_name,
                expected,
                found,
            } => format!(
                "The initializer for '{}' is too short ({} of {} values)",
                struct_name, found, expected
            ),
            other => other.to_string(),
        }
    }

    /// 依嚴重程度對應的程序結束碼
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

pub type Result<T> = std::result::Result<T, DestructorError>;
