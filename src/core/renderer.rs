use serde_json::{json, Value};

use crate::domain::model::{DisplayPoint, LngLat, MapGeometry, PointCategory};
use crate::domain::ports::RenderPort;
use crate::domain::settings::RenderSettings;
use crate::utils::error::{MapError, Result};

/// Anchors appended to every render so an empty dataset still shows something.
pub fn diagnostic_points() -> Vec<DisplayPoint> {
    [
        ("测试点1", 116.4074, 39.9042, "北京"),
        ("测试点2", 121.4737, 31.2304, "上海"),
    ]
    .into_iter()
    .filter_map(|(name, lng, lat, city)| {
        Some(DisplayPoint {
            name: name.to_string(),
            position: LngLat::new(lng, lat)?,
            city: city.to_string(),
            category: PointCategory::Diagnostic,
        })
    })
    .collect()
}

/// A chart bound to a container with its base map registered.
///
/// Only [`MapRenderer::initialize`] creates one, so a renderer in hand is
/// always ready to render.
pub struct MapRenderer<R: RenderPort> {
    port: R,
    map_name: String,
    settings: RenderSettings,
    render_count: usize,
}

impl<R: RenderPort> MapRenderer<R> {
    pub fn initialize(
        mut port: R,
        container_id: &str,
        map_name: &str,
        geometry: &MapGeometry,
        settings: RenderSettings,
    ) -> Result<Self> {
        port.bind(container_id)?;
        port.register_map(map_name, geometry)?;
        tracing::debug!(
            "Registered map '{}' with {} features in #{}",
            map_name,
            geometry.feature_count(),
            container_id
        );

        let mut renderer = Self {
            port,
            map_name: map_name.to_string(),
            settings,
            render_count: 0,
        };

        let empty = renderer.build_option(&[])?;
        renderer.port.set_option(&empty)?;
        let animation = renderer.animation_option();
        renderer.port.set_option(&animation)?;
        renderer.port.subscribe_resize()?;

        Ok(renderer)
    }

    /// Replaces the displayed points with `points` plus the diagnostic anchors.
    pub fn render(&mut self, points: &[DisplayPoint]) -> Result<usize> {
        let mut all_points = points.to_vec();
        all_points.extend(diagnostic_points());

        tracing::info!(
            "Rendering {} points ({} from data, {} diagnostic)",
            all_points.len(),
            points.len(),
            all_points.len() - points.len()
        );

        let option = self.build_option(&all_points)?;
        self.port.set_option(&option)?;
        self.render_count += 1;
        Ok(all_points.len())
    }

    pub fn handle_resize(&mut self) -> Result<()> {
        self.port.resize()
    }

    pub fn render_count(&self) -> usize {
        self.render_count
    }

    pub fn port(&self) -> &R {
        &self.port
    }

    pub fn into_port(self) -> R {
        self.port
    }

    fn build_option(&self, points: &[DisplayPoint]) -> Result<Value> {
        let s = &self.settings;
        let data = points.iter().map(data_item).collect::<Result<Vec<_>>>()?;

        Ok(json!({
            "backgroundColor": s.background_color,
            "title": {
                "text": s.title,
                "left": 20,
                "top": 20,
                "textStyle": { "color": s.title_color, "fontSize": s.title_font_size }
            },
            "tooltip": { "trigger": "item" },
            "geo": {
                "map": self.map_name,
                "roam": s.roam,
                "center": s.center,
                "zoom": s.zoom,
                "label": { "show": s.show_region_labels },
                "itemStyle": { "areaColor": s.area_color, "borderColor": s.border_color }
            },
            "series": [{
                "name": s.series_name,
                "type": "scatter",
                "coordinateSystem": "geo",
                "data": data,
                "symbolSize": s.symbol_size,
                "symbol": s.symbol,
                "itemStyle": { "color": s.point_color, "shadowBlur": s.shadow_blur }
            }]
        }))
    }

    fn animation_option(&self) -> Value {
        let a = &self.settings.animation;
        json!({
            "animation": a.enabled,
            "animationDuration": a.duration_ms,
            "animationEasing": a.easing,
            "animationDelayStep": a.stagger_ms
        })
    }
}

/// Tooltip body shown when hovering a point.
pub fn tooltip_text(point: &DisplayPoint) -> String {
    format!(
        "姓名: {}<br/>城市: {}<br/>类型: {}",
        escape_html(&point.name),
        escape_html(&point.city),
        point.category.label()
    )
}

fn data_item(point: &DisplayPoint) -> Result<Value> {
    let mut item = serde_json::to_value(point)?;
    let obj = item.as_object_mut().ok_or_else(|| MapError::RenderError {
        message: "display point did not serialize to an object".to_string(),
    })?;
    obj.insert("tooltip".to_string(), json!({ "formatter": tooltip_text(point) }));
    Ok(item)
}

fn escape_html(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct RecordingPort {
        bound: Option<String>,
        maps: Vec<String>,
        options: Vec<Value>,
        resize_subscribed: bool,
        resizes: usize,
    }

    impl RenderPort for RecordingPort {
        fn bind(&mut self, container_id: &str) -> Result<()> {
            self.bound = Some(container_id.to_string());
            Ok(())
        }

        fn register_map(&mut self, name: &str, _geometry: &MapGeometry) -> Result<()> {
            self.maps.push(name.to_string());
            Ok(())
        }

        fn set_option(&mut self, option: &Value) -> Result<()> {
            self.options.push(option.clone());
            Ok(())
        }

        fn subscribe_resize(&mut self) -> Result<()> {
            self.resize_subscribed = true;
            Ok(())
        }

        fn resize(&mut self) -> Result<()> {
            self.resizes += 1;
            Ok(())
        }
    }

    fn geometry() -> MapGeometry {
        MapGeometry::from_value(json!({"type": "FeatureCollection", "features": []})).unwrap()
    }

    fn renderer() -> MapRenderer<RecordingPort> {
        MapRenderer::initialize(
            RecordingPort::default(),
            "mapContainer",
            "china",
            &geometry(),
            RenderSettings::default(),
        )
        .unwrap()
    }

    fn series_data(option: &Value) -> &Vec<Value> {
        option["series"][0]["data"].as_array().unwrap()
    }

    fn point(name: &str, lng: f64, lat: f64) -> DisplayPoint {
        DisplayPoint {
            name: name.to_string(),
            position: LngLat::new(lng, lat).unwrap(),
            city: "广州".to_string(),
            category: PointCategory::Primary,
        }
    }

    #[test]
    fn test_initialize_sets_up_port() {
        let renderer = renderer();
        let port = renderer.port();

        assert_eq!(port.bound.as_deref(), Some("mapContainer"));
        assert_eq!(port.maps, vec!["china"]);
        assert!(port.resize_subscribed);
        assert_eq!(port.options.len(), 2);
        assert!(series_data(&port.options[0]).is_empty());
        assert_eq!(port.options[1]["animationEasing"], "elasticOut");
        assert_eq!(port.options[1]["animationDuration"], 2000);
        assert_eq!(renderer.render_count(), 0);
    }

    #[test]
    fn test_empty_render_shows_diagnostic_points() {
        let mut renderer = renderer();
        assert_eq!(renderer.render(&[]).unwrap(), 2);

        let option = renderer.port().options.last().unwrap();
        let data = series_data(option);
        assert_eq!(data.len(), 2);
        assert_eq!(data[0]["name"], "测试点1");
        assert_eq!(data[0]["value"], json!([116.4074, 39.9042]));
        assert_eq!(data[1]["city"], "上海");
        assert_eq!(data[1]["type"], "测试点");
    }

    #[test]
    fn test_render_puts_data_before_diagnostics() {
        let mut renderer = renderer();
        renderer.render(&[point("小明", 113.2644, 23.1291)]).unwrap();

        let option = renderer.port().options.last().unwrap();
        let data = series_data(option);
        assert_eq!(data.len(), 3);
        assert_eq!(data[0]["name"], "小明");
        assert_eq!(
            data[0]["tooltip"]["formatter"],
            "姓名: 小明<br/>城市: 广州<br/>类型: 主要城市"
        );
        assert_eq!(option["geo"]["map"], "china");
        assert_eq!(option["series"][0]["coordinateSystem"], "geo");
        assert_eq!(option["title"]["text"], "约饭地图");
    }

    #[test]
    fn test_rerender_replaces_points() {
        let mut renderer = renderer();
        renderer
            .render(&[point("a", 100.0, 30.0), point("b", 101.0, 31.0)])
            .unwrap();
        renderer.render(&[point("c", 102.0, 32.0)]).unwrap();

        let option = renderer.port().options.last().unwrap();
        let names: Vec<&str> = series_data(option)
            .iter()
            .map(|d| d["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["c", "测试点1", "测试点2"]);
        assert_eq!(renderer.render_count(), 2);
    }

    #[test]
    fn test_resize_is_forwarded() {
        let mut renderer = renderer();
        renderer.handle_resize().unwrap();
        renderer.handle_resize().unwrap();
        assert_eq!(renderer.into_port().resizes, 2);
    }

    #[test]
    fn test_tooltip_escapes_markup() {
        let mut p = point("<b>x</b>", 100.0, 30.0);
        p.city = "A&B".to_string();
        assert_eq!(
            tooltip_text(&p),
            "姓名: &lt;b&gt;x&lt;/b&gt;<br/>城市: A&amp;B<br/>类型: 主要城市"
        );
    }
}
