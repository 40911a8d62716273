//! Minimal GeoJSON output model.
//!
//! Just enough of RFC 7946 to emit analysis results: a feature collection of
//! polygons (viewshed regions) or line strings (terrain profiles), with
//! numeric properties. Coordinates are written as given; callers decide the
//! reference frame.

use std::collections::BTreeMap;

use analysis::cross_section::ProfileSample;
use analysis::viewshed::VisibleRegion;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum Geometry {
    Polygon { coordinates: Vec<Vec<[f64; 2]>> },
    LineString { coordinates: Vec<[f64; 3]> },
}

#[derive(Debug, Clone, Serialize)]
pub struct Feature {
    #[serde(rename = "type")]
    kind: &'static str,
    /// Keyed in a `BTreeMap` for stable serialization order.
    pub properties: BTreeMap<String, serde_json::Value>,
    pub geometry: Geometry,
}

impl Feature {
    pub fn new(geometry: Geometry) -> Self {
        Self {
            kind: "Feature",
            properties: BTreeMap::new(),
            geometry,
        }
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FeatureCollection {
    #[serde(rename = "type")]
    kind: &'static str,
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    pub fn new(features: Vec<Feature>) -> Self {
        Self {
            kind: "FeatureCollection",
            features,
        }
    }
}

/// A viewshed region as a polygon feature tagged with its sightline and ring
/// span.
pub fn viewshed_feature(region: &VisibleRegion) -> Feature {
    let ring = region.ring.iter().map(|p| [p.x, p.y]).collect();
    Feature::new(Geometry::Polygon {
        coordinates: vec![ring],
    })
    .with_property("line_id", region.line_id as u64)
    .with_property("circle_start", region.circle_start as u64)
    .with_property("circle_end", region.circle_end as u64)
}

/// A profile segment as a line string with per-vertex heights.
pub fn profile_feature(segment_id: usize, segment: &[ProfileSample]) -> Feature {
    let coordinates = segment
        .iter()
        .map(|s| [s.position.x, s.position.y, s.height_m])
        .collect();
    Feature::new(Geometry::LineString { coordinates }).with_property("segment_id", segment_id as u64)
}
