use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::utils::error::{MapError, Result};

/// One acquaintance as it appears in the dataset file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FriendRecord {
    #[serde(rename = "Name", default)]
    pub name: String,
    #[serde(rename = "Location1", default)]
    pub location1: Option<String>,
    #[serde(rename = "Location2", default)]
    pub location2: Option<String>,
    #[serde(default)]
    pub city1: Option<String>,
    #[serde(default)]
    pub city2: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointCategory {
    Primary,
    Secondary,
    Diagnostic,
}

impl PointCategory {
    pub fn label(&self) -> &'static str {
        match self {
            PointCategory::Primary => "主要城市",
            PointCategory::Secondary => "次要城市",
            PointCategory::Diagnostic => "测试点",
        }
    }
}

impl Serialize for PointCategory {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

pub const MIN_LNG: f64 = -180.0;
pub const MAX_LNG: f64 = 180.0;
pub const MIN_LAT: f64 = -90.0;
pub const MAX_LAT: f64 = 90.0;

/// A longitude/latitude pair that is known to be inside the valid ranges.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LngLat {
    lng: f64,
    lat: f64,
}

impl LngLat {
    pub fn new(lng: f64, lat: f64) -> Option<Self> {
        if (MIN_LNG..=MAX_LNG).contains(&lng) && (MIN_LAT..=MAX_LAT).contains(&lat) {
            Some(Self { lng, lat })
        } else {
            None
        }
    }

    pub fn lng(&self) -> f64 {
        self.lng
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }
}

impl Serialize for LngLat {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        [self.lng, self.lat].serialize(serializer)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayPoint {
    pub name: String,
    #[serde(rename = "value")]
    pub position: LngLat,
    pub city: String,
    #[serde(rename = "type")]
    pub category: PointCategory,
}

/// Boundary data handed to the chart's map registry.
#[derive(Debug, Clone, PartialEq)]
pub struct MapGeometry(Value);

impl MapGeometry {
    pub fn from_value(value: Value) -> Result<Self> {
        let features = value
            .as_object()
            .ok_or_else(|| MapError::GeometryError {
                message: "expected a JSON object".to_string(),
            })?
            .get("features")
            .ok_or_else(|| MapError::GeometryError {
                message: "missing 'features'".to_string(),
            })?;

        if !features.is_array() {
            return Err(MapError::GeometryError {
                message: "'features' must be an array".to_string(),
            });
        }

        Ok(Self(value))
    }

    pub fn feature_count(&self) -> usize {
        self.0["features"].as_array().map_or(0, Vec::len)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_friend_record_uses_dataset_keys() {
        let record: FriendRecord = serde_json::from_value(json!({
            "Name": "小明",
            "Location1": "116.4074,39.9042",
            "city1": "北京",
            "city2": ""
        }))
        .unwrap();

        assert_eq!(record.name, "小明");
        assert_eq!(record.location1.as_deref(), Some("116.4074,39.9042"));
        assert_eq!(record.location2, None);
        assert_eq!(record.city1.as_deref(), Some("北京"));
    }

    #[test]
    fn test_friend_record_without_name() {
        let record: FriendRecord = serde_json::from_value(json!({})).unwrap();
        assert_eq!(record, FriendRecord::default());
    }

    #[test]
    fn test_lnglat_bounds_are_inclusive() {
        assert!(LngLat::new(180.0, 90.0).is_some());
        assert!(LngLat::new(-180.0, -90.0).is_some());
        assert!(LngLat::new(180.1, 0.0).is_none());
        assert!(LngLat::new(0.0, -90.5).is_none());
        assert!(LngLat::new(f64::NAN, 0.0).is_none());
    }

    #[test]
    fn test_display_point_serializes_as_chart_data_item() {
        let point = DisplayPoint {
            name: "小明".to_string(),
            position: LngLat::new(116.4074, 39.9042).unwrap(),
            city: "北京".to_string(),
            category: PointCategory::Primary,
        };

        let value = serde_json::to_value(&point).unwrap();
        assert_eq!(
            value,
            json!({"name": "小明", "value": [116.4074, 39.9042], "city": "北京", "type": "主要城市"})
        );
    }

    #[test]
    fn test_map_geometry_requires_features() {
        assert!(MapGeometry::from_value(json!({"type": "FeatureCollection", "features": []})).is_ok());
        assert!(MapGeometry::from_value(json!({"type": "FeatureCollection"})).is_err());
        assert!(MapGeometry::from_value(json!({"features": {}})).is_err());
        assert!(MapGeometry::from_value(json!([1, 2])).is_err());
    }
}
