use crate::config::{
    DEFAULT_CONTAINER_ID, DEFAULT_GEOMETRY_URL, DEFAULT_MAP_NAME, DEFAULT_OUTPUT_FILE,
};
use crate::domain::ports::ConfigProvider;
use crate::domain::settings::RenderSettings;
use crate::utils::error::{MapError, Result};
use crate::utils::validation::{
    validate_container_id, validate_dataset_location, validate_non_empty_string, validate_path,
    validate_range, validate_url, Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub source: SourceConfig,
    #[serde(default)]
    pub map: MapConfig,
    #[serde(default)]
    pub render: RenderSettings,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    pub dataset: String,
    #[serde(default = "default_geometry_url")]
    pub geometry_url: String,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    pub container_id: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub path: String,
    #[serde(default = "default_output_file")]
    pub file: String,
}

fn default_geometry_url() -> String {
    DEFAULT_GEOMETRY_URL.to_string()
}

fn default_output_file() -> String {
    DEFAULT_OUTPUT_FILE.to_string()
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            container_id: DEFAULT_CONTAINER_ID.to_string(),
            name: DEFAULT_MAP_NAME.to_string(),
        }
    }
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(MapError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| MapError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${FRIENDS_URL})，未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| MapError::ConfigError {
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }
}

impl ConfigProvider for TomlConfig {
    fn dataset_location(&self) -> &str {
        &self.source.dataset
    }

    fn geometry_url(&self) -> &str {
        &self.source.geometry_url
    }

    fn container_id(&self) -> &str {
        &self.map.container_id
    }

    fn map_name(&self) -> &str {
        &self.map.name
    }

    fn output_path(&self) -> &str {
        &self.output.path
    }

    fn output_file(&self) -> &str {
        &self.output.file
    }

    fn request_timeout_secs(&self) -> Option<u64> {
        self.source.timeout_seconds
    }

    fn render_settings(&self) -> RenderSettings {
        self.render.clone()
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validate_dataset_location("source.dataset", &self.source.dataset)?;
        validate_url("source.geometry_url", &self.source.geometry_url)?;
        if let Some(secs) = self.source.timeout_seconds {
            validate_range("source.timeout_seconds", secs, 1, 3600)?;
        }
        validate_container_id("map.container_id", &self.map.container_id)?;
        validate_non_empty_string("map.name", &self.map.name)?;
        validate_path("output.path", &self.output.path)?;
        validate_path("output.file", &self.output.file)?;
        self.render.validate()
    }
}
