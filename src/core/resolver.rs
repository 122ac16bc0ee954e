//! Turns dataset records into display points.
//!
//! Location strings in the dataset do not say which axis comes first, so each
//! pair is tried as `lng,lat` and then as `lat,lng`. The first ordering that
//! lands inside the valid ranges wins; a pair valid both ways is always read
//! as `lng,lat`.

use crate::domain::model::{DisplayPoint, FriendRecord, LngLat, PointCategory};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    Missing,
    Malformed,
    OutOfRange,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SkipCounts {
    pub missing: usize,
    pub malformed: usize,
    pub out_of_range: usize,
}

impl SkipCounts {
    fn record(&mut self, reason: SkipReason) {
        match reason {
            SkipReason::Missing => self.missing += 1,
            SkipReason::Malformed => self.malformed += 1,
            SkipReason::OutOfRange => self.out_of_range += 1,
        }
    }

    /// Fields that were present but could not be placed on the map.
    pub fn rejected(&self) -> usize {
        self.malformed + self.out_of_range
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Resolution {
    pub points: Vec<DisplayPoint>,
    pub skipped: SkipCounts,
}

/// Splits `"a,b"` into two finite numbers.
pub fn parse_location(raw: &str) -> Option<(f64, f64)> {
    let mut parts = raw.split(',');
    let a = parse_component(parts.next()?)?;
    let b = parse_component(parts.next()?)?;

    if parts.next().is_some() {
        return None;
    }

    Some((a, b))
}

fn parse_component(token: &str) -> Option<f64> {
    let token = token.trim();
    if token.is_empty() {
        return None;
    }
    token.parse::<f64>().ok().filter(|v| v.is_finite())
}

pub fn disambiguate(a: f64, b: f64) -> Option<LngLat> {
    LngLat::new(a, b).or_else(|| LngLat::new(b, a))
}

pub fn resolve_location(raw: &str) -> Result<LngLat, SkipReason> {
    let (a, b) = parse_location(raw).ok_or(SkipReason::Malformed)?;
    disambiguate(a, b).ok_or(SkipReason::OutOfRange)
}

pub fn resolve_points(records: &[FriendRecord]) -> Resolution {
    let mut resolution = Resolution::default();
    tracing::debug!("Resolving points for {} records", records.len());

    for record in records {
        tracing::debug!(
            "Processing {}: city1={:?}, city2={:?}",
            record.name,
            record.city1,
            record.city2
        );

        let fields = [
            (&record.location1, &record.city1, PointCategory::Primary, "Location1"),
            (&record.location2, &record.city2, PointCategory::Secondary, "Location2"),
        ];

        // 兩個欄位各自處理，第一個失敗不影響第二個
        for (location, city, category, field) in fields {
            let Some(raw) = location.as_deref().filter(|s| !s.is_empty()) else {
                tracing::debug!("  {} has no {}", record.name, field);
                resolution.skipped.record(SkipReason::Missing);
                continue;
            };

            match resolve_location(raw) {
                Ok(position) => {
                    tracing::debug!(
                        "  {} resolved to lng={}, lat={}",
                        field,
                        position.lng(),
                        position.lat()
                    );
                    resolution.points.push(DisplayPoint {
                        name: record.name.clone(),
                        position,
                        city: city.clone().unwrap_or_default(),
                        category,
                    });
                }
                Err(reason) => {
                    tracing::warn!(
                        "  Skipping {} of {} ({:?}): {:?}",
                        field,
                        record.name,
                        reason,
                        raw
                    );
                    resolution.skipped.record(reason);
                }
            }
        }
    }

    tracing::debug!("Resolved {} points", resolution.points.len());
    resolution
}
