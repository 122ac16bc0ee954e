use crate::config::{
    DEFAULT_CONTAINER_ID, DEFAULT_DATASET, DEFAULT_GEOMETRY_URL, DEFAULT_MAP_NAME,
    DEFAULT_OUTPUT_FILE, DEFAULT_OUTPUT_PATH,
};
use crate::domain::ports::ConfigProvider;
use crate::domain::settings::RenderSettings;
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_container_id, validate_dataset_location, validate_non_empty_string, validate_path,
    validate_range, validate_url, Validate,
};
use clap::Parser;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "meal-map")]
#[command(about = "Render friends' cities as scatter points on a map")]
pub struct CliConfig {
    /// Dataset file, or an http(s) URL serving it
    #[arg(long, default_value = DEFAULT_DATASET)]
    pub dataset: String,

    #[arg(long, default_value = DEFAULT_GEOMETRY_URL)]
    pub geometry_url: String,

    #[arg(long, default_value = DEFAULT_CONTAINER_ID)]
    pub container_id: String,

    #[arg(long, default_value = DEFAULT_MAP_NAME)]
    pub map_name: String,

    #[arg(long, default_value = DEFAULT_OUTPUT_PATH)]
    pub output_path: String,

    #[arg(long, default_value = DEFAULT_OUTPUT_FILE)]
    pub output_file: String,

    /// Give up on a request after this many seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Load settings from a TOML file instead of the flags above
    #[arg(short, long)]
    pub config: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub log_json: bool,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            dataset: DEFAULT_DATASET.to_string(),
            geometry_url: DEFAULT_GEOMETRY_URL.to_string(),
            container_id: DEFAULT_CONTAINER_ID.to_string(),
            map_name: DEFAULT_MAP_NAME.to_string(),
            output_path: DEFAULT_OUTPUT_PATH.to_string(),
            output_file: DEFAULT_OUTPUT_FILE.to_string(),
            timeout_secs: None,
            config: None,
            verbose: false,
            log_json: false,
        }
    }
}

impl ConfigProvider for CliConfig {
    fn dataset_location(&self) -> &str {
        &self.dataset
    }

    fn geometry_url(&self) -> &str {
        &self.geometry_url
    }

    fn container_id(&self) -> &str {
        &self.container_id
    }

    fn map_name(&self) -> &str {
        &self.map_name
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn output_file(&self) -> &str {
        &self.output_file
    }

    fn request_timeout_secs(&self) -> Option<u64> {
        self.timeout_secs
    }

    fn render_settings(&self) -> RenderSettings {
        RenderSettings::default()
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_dataset_location("dataset", &self.dataset)?;
        validate_url("geometry_url", &self.geometry_url)?;
        validate_container_id("container_id", &self.container_id)?;
        validate_non_empty_string("map_name", &self.map_name)?;
        validate_path("output_path", &self.output_path)?;
        validate_path("output_file", &self.output_file)?;
        if let Some(secs) = self.timeout_secs {
            validate_range("timeout_secs", secs, 1, 3600)?;
        }
        Ok(())
    }
}
