use crate::domain::model::{FriendRecord, MapGeometry};
use crate::domain::settings::RenderSettings;
use crate::utils::error::Result;
use async_trait::async_trait;
use serde_json::Value;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn dataset_location(&self) -> &str;
    fn geometry_url(&self) -> &str;
    fn container_id(&self) -> &str;
    fn map_name(&self) -> &str;
    fn output_path(&self) -> &str;
    fn output_file(&self) -> &str;
    fn request_timeout_secs(&self) -> Option<u64>;
    fn render_settings(&self) -> RenderSettings;
}

/// Where the map's inputs come from.
#[async_trait]
pub trait MapDataSource: Send + Sync {
    /// Never fails: an unreachable or malformed dataset yields no records.
    async fn load_dataset(&self) -> Vec<FriendRecord>;
    async fn load_map_geometry(&self) -> Result<MapGeometry>;
}

/// The charting engine, seen only through the capabilities the map needs.
pub trait RenderPort: Send {
    fn bind(&mut self, container_id: &str) -> Result<()>;
    fn register_map(&mut self, name: &str, geometry: &MapGeometry) -> Result<()>;
    fn set_option(&mut self, option: &Value) -> Result<()>;
    fn subscribe_resize(&mut self) -> Result<()>;
    fn resize(&mut self) -> Result<()>;
}
