use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::domain::model::{FriendRecord, MapGeometry};
use crate::domain::ports::{ConfigProvider, MapDataSource, Storage};
use crate::utils::error::{MapError, Result};
use crate::utils::validation::is_remote;

pub struct DataLoader<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    client: Client,
}

impl<S: Storage, C: ConfigProvider> DataLoader<S, C> {
    pub fn new(storage: S, config: C) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(secs) = config.request_timeout_secs() {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build()?;

        Ok(Self {
            storage,
            config,
            client,
        })
    }

    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>> {
        tracing::debug!("GET {}", url);
        let response = self.client.get(url).send().await?;
        tracing::debug!("Response status from {}: {}", url, response.status());

        if !response.status().is_success() {
            return Err(MapError::HttpStatusError {
                status: response.status().as_u16(),
                url: url.to_string(),
            });
        }

        Ok(response.bytes().await?.to_vec())
    }

    async fn try_load_dataset(&self) -> Result<Vec<FriendRecord>> {
        let location = self.config.dataset_location();
        let bytes = if is_remote(location) {
            self.fetch_bytes(location).await?
        } else {
            self.storage.read_file(location).await?
        };

        let records: Vec<FriendRecord> = serde_json::from_slice(&bytes)?;
        Ok(records)
    }
}

#[async_trait]
impl<S: Storage, C: ConfigProvider> MapDataSource for DataLoader<S, C> {
    async fn load_dataset(&self) -> Vec<FriendRecord> {
        let location = self.config.dataset_location();
        tracing::info!("📥 Loading dataset from {}", location);

        match self.try_load_dataset().await {
            Ok(records) => {
                tracing::info!("Loaded {} friend records", records.len());
                records
            }
            Err(e) => {
                // 資料集是選用的，失敗時仍然繪製空白地圖
                tracing::error!("❌ Failed to load dataset {}: {}", location, e);
                tracing::warn!("💡 Check that {} exists and is a JSON array of records", location);
                Vec::new()
            }
        }
    }

    async fn load_map_geometry(&self) -> Result<MapGeometry> {
        let url = self.config.geometry_url();
        tracing::info!("🗺️ Loading map geometry from {}", url);

        let geometry = async {
            let bytes = self.fetch_bytes(url).await?;
            let value: serde_json::Value = serde_json::from_slice(&bytes)?;
            MapGeometry::from_value(value)
        }
        .await;

        match geometry {
            Ok(geometry) => {
                tracing::info!("Map geometry loaded ({} features)", geometry.feature_count());
                Ok(geometry)
            }
            Err(e) => {
                tracing::error!("❌ Failed to load map geometry from {}: {}", url, e);
                Err(e)
            }
        }
    }
}
