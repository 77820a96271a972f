// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Workout route models: raw store records and the reconstructed route.

use chrono::{DateTime, Utc};
use geo::LineString;
use serde::{Deserialize, Serialize};

/// Route record as stored, associated with a workout by predicate match.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteSample {
    pub id: String,
    pub workout_id: String,
    /// Cross-device dedup metadata, passed through verbatim
    #[serde(default)]
    pub sync_identifier: Option<String>,
    #[serde(default)]
    pub sync_version: Option<i64>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
}

/// A single GPS fix as the store delivers it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteLocation {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub altitude: f64,
    #[serde(default)]
    pub horizontal_accuracy: f64,
    #[serde(default)]
    pub vertical_accuracy: f64,
    /// Degrees from true north, negative when unknown
    #[serde(default)]
    pub course: f64,
    #[serde(default)]
    pub course_accuracy: f64,
    /// Metres per second, negative when unknown
    #[serde(default)]
    pub speed: f64,
    #[serde(default)]
    pub speed_accuracy: f64,
    pub timestamp: DateTime<Utc>,
}

impl RouteLocation {
    /// A fix with only position and time known.
    pub fn new(latitude: f64, longitude: f64, timestamp: DateTime<Utc>) -> Self {
        Self {
            latitude,
            longitude,
            altitude: 0.0,
            horizontal_accuracy: 0.0,
            vertical_accuracy: 0.0,
            course: -1.0,
            course_accuracy: -1.0,
            speed: -1.0,
            speed_accuracy: -1.0,
            timestamp,
        }
    }

    /// Check if the fix has usable coordinates.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }

    pub fn point(&self) -> geo::Point<f64> {
        geo::Point::new(self.longitude, self.latitude)
    }
}

/// A location annotated with the distance travelled since the previous one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationSample {
    #[serde(flatten)]
    pub location: RouteLocation,
    /// Metres from the preceding sample; `None` for the first one
    pub distance: Option<f64>,
}

/// A workout route reconstructed from the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Route {
    pub workout_id: String,
    pub sync_identifier: Option<String>,
    pub sync_version: Option<i64>,
    pub locations: Vec<LocationSample>,
}

impl Route {
    /// Sum of all per-sample distances, in metres.
    pub fn total_distance(&self) -> f64 {
        self.locations.iter().filter_map(|l| l.distance).sum()
    }

    /// Route geometry as (longitude, latitude) line.
    pub fn line_string(&self) -> LineString<f64> {
        self.locations
            .iter()
            .map(|l| (l.location.longitude, l.location.latitude))
            .collect::<Vec<_>>()
            .into()
    }

    /// Export as a GeoJSON LineString feature.
    pub fn to_geojson_feature(&self) -> geojson::Feature {
        let mut properties = serde_json::Map::new();
        properties.insert("workout_id".to_string(), self.workout_id.clone().into());
        properties.insert(
            "sync_identifier".to_string(),
            serde_json::to_value(&self.sync_identifier).unwrap_or_default(),
        );
        properties.insert(
            "sync_version".to_string(),
            serde_json::to_value(self.sync_version).unwrap_or_default(),
        );
        properties.insert("location_count".to_string(), self.locations.len().into());
        properties.insert(
            "total_distance_meters".to_string(),
            serde_json::to_value(self.total_distance()).unwrap_or_default(),
        );

        let geometry = geojson::Geometry::new(geojson::Value::from(&self.line_string()));

        geojson::Feature {
            bbox: None,
            geometry: Some(geometry),
            id: None,
            properties: Some(properties),
            foreign_members: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(1_717_225_200 + secs, 0).unwrap()
    }

    fn sample(lat: f64, lng: f64, secs: i64, distance: Option<f64>) -> LocationSample {
        LocationSample {
            location: RouteLocation::new(lat, lng, ts(secs)),
            distance,
        }
    }

    #[test]
    fn test_is_valid() {
        assert!(RouteLocation::new(37.4, -122.1, ts(0)).is_valid());
        assert!(!RouteLocation::new(91.0, -122.1, ts(0)).is_valid());
        assert!(!RouteLocation::new(37.4, f64::NAN, ts(0)).is_valid());
    }

    #[test]
    fn test_total_distance_skips_first() {
        let route = Route {
            workout_id: "w".to_string(),
            sync_identifier: None,
            sync_version: None,
            locations: vec![
                sample(37.0, -122.0, 0, None),
                sample(37.001, -122.0, 5, Some(110.0)),
                sample(37.002, -122.0, 10, Some(111.5)),
            ],
        };
        assert_eq!(route.total_distance(), 221.5);
    }

    #[test]
    fn test_geojson_feature_uses_lng_lat_order() {
        let route = Route {
            workout_id: "w".to_string(),
            sync_identifier: Some("sync-1".to_string()),
            sync_version: Some(2),
            locations: vec![sample(37.0, -122.0, 0, None), sample(37.5, -122.5, 5, Some(1.0))],
        };

        let feature = route.to_geojson_feature();
        let json = serde_json::to_value(&feature).unwrap();

        assert_eq!(json["geometry"]["type"], "LineString");
        assert_eq!(json["geometry"]["coordinates"][0][0], -122.0);
        assert_eq!(json["geometry"]["coordinates"][0][1], 37.0);
        assert_eq!(json["properties"]["sync_identifier"], "sync-1");
        assert_eq!(json["properties"]["location_count"], 2);
    }

    #[test]
    fn test_location_sample_flattens() {
        let json = serde_json::to_value(sample(1.0, 2.0, 0, None)).unwrap();
        assert_eq!(json["latitude"], 1.0);
        assert!(json["distance"].is_null());
    }
}
