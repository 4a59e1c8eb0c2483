use thiserror::Error;

#[derive(Error, Debug)]
pub enum RegressionError {
    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("Dataset download failed: {0}")]
    DownloadError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Column '{column}' not found in dataset")]
    ColumnNotFound { column: String },

    #[error("Cannot parse '{value}' in column '{column}' (row {row}) as a number")]
    ParseError {
        row: usize,
        column: String,
        value: String,
    },

    #[error("Dataset is empty: {message}")]
    EmptyDataset { message: String },

    #[error("Shape mismatch: {message}")]
    ShapeMismatch { message: String },

    #[error("Design matrix is rank deficient (rank {rank} < {features} features)")]
    RankDeficient { rank: usize, features: usize },

    #[error("Lasso selected no features (alpha = {alpha:e})")]
    NoFeaturesSelected { alpha: f64 },

    #[error("Solver failed: {message}")]
    SolverError { message: String },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Data,
    Numerical,
    Network,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ErrorSeverity {
    /// 根據錯誤嚴重程度決定退出碼
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Low => 0,      // 警告，但成功
            Self::Medium => 2,   // 可重試
            Self::High => 1,     // 處理錯誤
            Self::Critical => 3, // 系統錯誤
        }
    }
}

impl RegressionError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => ErrorCategory::Configuration,
            Self::CsvError(_)
            | Self::ColumnNotFound { .. }
            | Self::ParseError { .. }
            | Self::EmptyDataset { .. } => ErrorCategory::Data,
            Self::ShapeMismatch { .. }
            | Self::RankDeficient { .. }
            | Self::NoFeaturesSelected { .. }
            | Self::SolverError { .. } => ErrorCategory::Numerical,
            Self::DownloadError(_) => ErrorCategory::Network,
            Self::ZipError(_)
            | Self::IoError(_)
            | Self::SerializationError(_)
            | Self::ProcessingError { .. } => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Configuration | ErrorCategory::Data | ErrorCategory::Numerical => {
                ErrorSeverity::High
            }
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    /// 給終端使用者看的簡短訊息
    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::DownloadError(_) => "Could not download the dataset".to_string(),
            Self::IoError(e) => format!("File access failed: {}", e),
            Self::ColumnNotFound { column } => {
                format!("The dataset has no column named '{}'", column)
            }
            Self::ParseError { row, column, value } => format!(
                "Row {} has a non-numeric value '{}' in column '{}'",
                row, value, column
            ),
            Self::NoFeaturesSelected { .. } => {
                "No column carries signal for the target, nothing to fit".to_string()
            }
            Self::RankDeficient { .. } => {
                "The selected columns are linearly dependent".to_string()
            }
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => "Check the command line flags or the TOML file",
            Self::DownloadError(_) => "Check the data URL and your network connection, then retry",
            Self::CsvError(_) => "Check the delimiter setting and that every row has the same number of fields",
            Self::ColumnNotFound { .. } => "Check --target and --drop-columns against the CSV header",
            Self::ParseError { .. } => {
                "Check the decimal separator, or drop the non-numeric column with --drop-columns"
            }
            Self::EmptyDataset { .. } => "Provide a file with a header and at least a few data rows",
            Self::ShapeMismatch { .. } | Self::RankDeficient { .. } => {
                "Remove duplicated or constant columns, or provide more rows"
            }
            Self::SolverError { .. } => "Raise --max-iter or loosen --tol, then retry",
            Self::NoFeaturesSelected { .. } => {
                "Check that the target varies and lower --eps to widen the penalty grid"
            }
            Self::ZipError(_) | Self::IoError(_) => "Check that the output directory is writable",
            Self::SerializationError(_) | Self::ProcessingError { .. } => {
                "Re-run with --verbose and report the log"
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, RegressionError>;
