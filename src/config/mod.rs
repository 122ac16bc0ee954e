#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

pub const DEFAULT_DATASET: &str = "friends_data.json";
pub const DEFAULT_GEOMETRY_URL: &str = "https://cdn.jsdelivr.net/npm/echarts/map/json/china.json";
pub const DEFAULT_CONTAINER_ID: &str = "mapContainer";
pub const DEFAULT_MAP_NAME: &str = "china";
pub const DEFAULT_OUTPUT_PATH: &str = "./output";
pub const DEFAULT_OUTPUT_FILE: &str = "meal_map.html";
