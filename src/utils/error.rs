use thiserror::Error;

#[derive(Error, Debug)]
pub enum FrameGridError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Frame batch is empty")]
    EmptyBatch,

    #[error("Frame '{identifier}' does not follow the {expected} naming convention of its batch")]
    MixedConventions {
        expected: String,
        identifier: String,
    },

    #[error("No grid layout is available for the {convention} naming convention")]
    UnsupportedConvention { convention: String },

    #[error("Malformed frame name '{identifier}': {reason}")]
    MalformedIdentifier { identifier: String, reason: String },

    #[error("Block '{block}' has no frames in the sheet export")]
    BlockNotFound { block: String },

    #[error("Acquisition batch '{id}' not found")]
    BatchNotFound { id: String },

    #[error("Frame file already exists at destination: {path}")]
    FrameAlreadyExists { path: String },

    #[error("Frame file not found: {path}")]
    FrameNotFound { path: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Io,
    Configuration,
    Data,
    Layout,
    Storage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl FrameGridError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::IoError(_) => ErrorCategory::Io,
            Self::CsvError(_) | Self::SerializationError(_) => ErrorCategory::Data,
            Self::TomlError(_)
            | Self::ConfigError { .. }
            | Self::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            Self::EmptyBatch
            | Self::MixedConventions { .. }
            | Self::MalformedIdentifier { .. }
            | Self::BlockNotFound { .. } => ErrorCategory::Data,
            Self::UnsupportedConvention { .. } => ErrorCategory::Layout,
            Self::BatchNotFound { .. }
            | Self::FrameAlreadyExists { .. }
            | Self::FrameNotFound { .. } => ErrorCategory::Storage,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // 無法排版時退回清單顯示
            Self::UnsupportedConvention { .. } => ErrorSeverity::Low,
            Self::FrameAlreadyExists { .. } | Self::BatchNotFound { .. } => ErrorSeverity::Medium,
            Self::IoError(_) => ErrorSeverity::Critical,
            _ => ErrorSeverity::High,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Io => "Check that the paths exist and that you have permission to access them",
            ErrorCategory::Configuration => "Review the configuration file and command line flags",
            ErrorCategory::Data => {
                "Check the sheet export: every frame of a block must use the same naming convention"
            }
            ErrorCategory::Layout => "The frames will be listed without a grid layout",
            ErrorCategory::Storage => "Check the destination folder and the batch store file",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::UnsupportedConvention { convention } => {
                format!("Frames named with the {} convention cannot be laid out as a grid", convention)
            }
            Self::BlockNotFound { block } => format!("Block {} was not found in the sheet", block),
            Self::FrameAlreadyExists { path } => format!("{} has already been downloaded", path),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, FrameGridError>;
