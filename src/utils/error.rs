use thiserror::Error;

#[derive(Error, Debug)]
pub enum MapError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Unexpected HTTP status {status} from {url}")]
    HttpStatusError { status: u16, url: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Invalid map geometry: {message}")]
    GeometryError { message: String },

    #[error("Render error: {message}")]
    RenderError { message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Data,
    Rendering,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl ErrorSeverity {
    /// Process exit code for a run that failed with this severity. Never zero.
    pub fn exit_code(&self) -> i32 {
        match self {
            ErrorSeverity::High => 1,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::Critical => 3,
        }
    }
}

impl MapError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            MapError::HttpError(_) | MapError::HttpStatusError { .. } => ErrorCategory::Network,
            MapError::SerializationError(_) | MapError::GeometryError { .. } => ErrorCategory::Data,
            MapError::RenderError { .. } => ErrorCategory::Rendering,
            MapError::ConfigError { .. }
            | MapError::ConfigValidationError { .. }
            | MapError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            MapError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            // 網路問題通常重試即可
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Data | ErrorCategory::Rendering | ErrorCategory::Configuration => {
                ErrorSeverity::High
            }
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            MapError::HttpError(_) => "Check your network connection and the geometry URL",
            MapError::HttpStatusError { .. } => "Verify that the URL exists and is publicly reachable",
            MapError::IoError(_) => "Check file permissions and that the output directory is writable",
            MapError::SerializationError(_) => "Make sure the file contains valid JSON",
            MapError::GeometryError { .. } => {
                "Point --geometry-url at a GeoJSON FeatureCollection usable by ECharts registerMap"
            }
            MapError::RenderError { .. } => "Initialize the map before rendering or publishing it",
            MapError::ConfigError { .. }
            | MapError::ConfigValidationError { .. }
            | MapError::InvalidConfigValueError { .. } => {
                "Review the command line flags or the TOML config file"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Network => format!("無法取得遠端資料: {}", self),
            ErrorCategory::Data => format!("資料格式不正確: {}", self),
            ErrorCategory::Rendering => format!("地圖渲染失敗: {}", self),
            ErrorCategory::Configuration => format!("配置錯誤: {}", self),
            ErrorCategory::System => format!("系統錯誤: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, MapError>;
