use crate::core::renderer::MapRenderer;
use crate::core::resolver::resolve_points;
use crate::domain::ports::{MapDataSource, RenderPort};
use crate::domain::settings::RenderSettings;
use crate::utils::error::Result;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderSummary {
    pub records_loaded: usize,
    pub points_resolved: usize,
    pub fields_skipped: usize,
    pub points_displayed: usize,
}

/// Drives the startup sequence: map first, then data, then the final render.
pub struct MapEngine<D: MapDataSource> {
    source: D,
    container_id: String,
    map_name: String,
    settings: RenderSettings,
}

impl<D: MapDataSource> MapEngine<D> {
    pub fn new(source: D, container_id: &str, map_name: &str, settings: RenderSettings) -> Self {
        Self {
            source,
            container_id: container_id.to_string(),
            map_name: map_name.to_string(),
            settings,
        }
    }

    /// Fetches the geometry and brings up an empty map on `port`.
    pub async fn initialize_map<R: RenderPort>(&self, port: R) -> Result<MapRenderer<R>> {
        let geometry = self.source.load_map_geometry().await?;
        let renderer = MapRenderer::initialize(
            port,
            &self.container_id,
            &self.map_name,
            &geometry,
            self.settings.clone(),
        )?;
        tracing::info!("Map initialized in #{}", self.container_id);
        Ok(renderer)
    }

    pub async fn run<R: RenderPort>(&self, port: R) -> Result<(MapRenderer<R>, RenderSummary)> {
        tracing::info!("Starting map rendering...");

        let mut renderer = self.initialize_map(port).await?;

        let records = self.source.load_dataset().await;
        if records.is_empty() {
            tracing::warn!("No friend records loaded, only diagnostic points will be shown");
        }

        let resolution = resolve_points(&records);
        tracing::info!(
            "Resolved {} points from {} records ({} fields rejected)",
            resolution.points.len(),
            records.len(),
            resolution.skipped.rejected()
        );

        let points_displayed = renderer.render(&resolution.points)?;

        let summary = RenderSummary {
            records_loaded: records.len(),
            points_resolved: resolution.points.len(),
            fields_skipped: resolution.skipped.rejected(),
            points_displayed,
        };
        Ok((renderer, summary))
    }
}
