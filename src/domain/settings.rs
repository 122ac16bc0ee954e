use serde::{Deserialize, Serialize};

use crate::utils::error::Result;
use crate::utils::validation::{validate_non_empty_string, validate_range, Validate};

/// Look and feel of the rendered map. Every field has a default, so a TOML
/// `[render]` table only needs the keys it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    pub title: String,
    pub title_color: String,
    pub title_font_size: u32,
    pub background_color: String,
    pub center: [f64; 2],
    pub zoom: f64,
    pub roam: bool,
    pub show_region_labels: bool,
    pub area_color: String,
    pub border_color: String,
    pub series_name: String,
    pub symbol: String,
    pub symbol_size: u32,
    pub point_color: String,
    pub shadow_blur: u32,
    pub animation: AnimationSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationSettings {
    pub enabled: bool,
    pub duration_ms: u64,
    pub easing: String,
    /// Extra delay per data index, giving the points a staggered entrance.
    pub stagger_ms: u64,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            title: "约饭地图".to_string(),
            title_color: "#38bdf8".to_string(),
            title_font_size: 16,
            background_color: "transparent".to_string(),
            center: [104.195, 35.861],
            zoom: 3.5,
            roam: true,
            show_region_labels: true,
            area_color: "#1e3a8a".to_string(),
            border_color: "#38bdf8".to_string(),
            series_name: "朋友位置".to_string(),
            symbol: "circle".to_string(),
            symbol_size: 20,
            point_color: "#ff6b6b".to_string(),
            shadow_blur: 10,
            animation: AnimationSettings::default(),
        }
    }
}

impl Default for AnimationSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            duration_ms: 2000,
            easing: "elasticOut".to_string(),
            stagger_ms: 100,
        }
    }
}

impl Validate for RenderSettings {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("render.series_name", &self.series_name)?;
        validate_non_empty_string("render.symbol", &self.symbol)?;
        validate_range("render.center[0]", self.center[0], -180.0, 180.0)?;
        validate_range("render.center[1]", self.center[1], -90.0, 90.0)?;
        validate_range("render.zoom", self.zoom, 0.1, 100.0)?;
        validate_range("render.symbol_size", self.symbol_size, 1, 200)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(RenderSettings::default().validate().is_ok());
    }

    #[test]
    fn test_partial_table_keeps_defaults() {
        let settings: RenderSettings = toml::from_str(
            r#"
title = "Friends"
zoom = 5.0

[animation]
stagger_ms = 0
"#,
        )
        .unwrap();

        assert_eq!(settings.title, "Friends");
        assert_eq!(settings.zoom, 5.0);
        assert_eq!(settings.symbol_size, 20);
        assert_eq!(settings.animation.stagger_ms, 0);
        assert_eq!(settings.animation.duration_ms, 2000);
    }

    #[test]
    fn test_out_of_range_center_is_rejected() {
        let settings = RenderSettings {
            center: [200.0, 35.0],
            ..RenderSettings::default()
        };
        assert!(settings.validate().is_err());
    }
}
