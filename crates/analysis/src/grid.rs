//! Polar sampling grid for viewshed analysis.
//!
//! The grid is a disc around the viewpoint: concentric rings every
//! `radial_step_m`, each ring discretized every `azimuth_step_deg`. Vertices
//! of adjacent rings form quadrilateral cells tagged with a sightline index
//! (`line_id`) and ring index (`circle_id`); the visibility pass works on
//! those tags, never on raw coordinates.

use foundation::math::{
    LonLat, destination, mercator_to_lon_lat, normalize_degrees, round_places, spherical_mean,
};

use crate::request::{CENTROID_DECIMAL_PLACES, ViewshedRequest};

/// One ring vertex of the sampling grid. Immutable once generated.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SamplePoint {
    pub position: LonLat,
    /// Sightline slot within the ring.
    pub line_id: usize,
    /// Ring index, counted outward from the viewpoint.
    pub circle_id: usize,
    pub id: usize,
}

/// Quadrilateral between two adjacent sightlines and two adjacent rings.
///
/// Corner order: inner-left, inner-right, outer-right, outer-left.
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub id: usize,
    pub line_id: usize,
    pub circle_id: usize,
    pub corners: [LonLat; 4],
    /// Geographic centroid, rounded so repeated runs sample identical
    /// positions.
    pub centroid: LonLat,
    /// Terrain height at the centroid; assigned by the sampling pass.
    pub elevation_m: f64,
    /// Assigned by the visibility pass.
    pub visible: bool,
}

/// The discretized sampling disc for one viewshed request.
#[derive(Debug, Clone)]
pub struct PolarGrid {
    pub cells: Vec<Cell>,
    /// Ring vertices per ring (sightline slots plus the closing vertex).
    pub slots_per_ring: usize,
    /// Number of ring pairs, i.e. cells per full sightline.
    pub ring_count: usize,
    /// Seam slot skipped when the azimuth range wraps through north.
    pub clip_line: Option<usize>,
}

/// Build the sampling grid for a request.
pub fn build_grid(request: &ViewshedRequest) -> PolarGrid {
    let center_geo = mercator_to_lon_lat(request.center);
    let (bearings, clip_line) = azimuth_steps(
        request.azimuth_left_deg,
        request.azimuth_right_deg,
        request.azimuth_step_deg,
    );
    let ring_count = (request.radial_range_max_m / request.radial_step_m).ceil() as usize;

    let mut next_point_id = 0;
    let mut rings: Vec<Vec<SamplePoint>> = Vec::with_capacity(ring_count + 1);
    for circle_id in 0..=ring_count {
        let radius_m = circle_id as f64 * request.radial_step_m;
        let ring = bearings
            .iter()
            .enumerate()
            .map(|(slot, bearing)| {
                let id = next_point_id;
                next_point_id += 1;
                SamplePoint {
                    position: destination(center_geo, *bearing, radius_m),
                    line_id: slot,
                    circle_id,
                    id,
                }
            })
            .collect();
        rings.push(ring);
    }

    let mut cells = Vec::new();
    for circle_id in 0..ring_count {
        let inner = &rings[circle_id];
        let outer = &rings[circle_id + 1];
        for slot in 0..bearings.len().saturating_sub(1) {
            if clip_line == Some(slot) {
                // Seam between the two arcs of a wrapped range; the vertices
                // on either side are not angular neighbours.
                continue;
            }
            let corners = [
                inner[slot].position,
                inner[slot + 1].position,
                outer[slot + 1].position,
                outer[slot].position,
            ];
            cells.push(Cell {
                id: cells.len(),
                line_id: slot,
                circle_id,
                centroid: cell_centroid(&corners),
                corners,
                elevation_m: 0.0,
                visible: false,
            });
        }
    }

    PolarGrid {
        cells,
        slots_per_ring: bearings.len(),
        ring_count,
        clip_line,
    }
}

/// Bearings (degrees clockwise from north) kept by the azimuth range filter,
/// plus the seam slot when the range wraps through north.
///
/// Equal bounds mean a full sweep; the ring then carries a closing vertex so
/// the last cell reaches back to north. A wrapped range (left > right) keeps
/// two arcs of the full sweep and records the slot where they join.
fn azimuth_steps(left_deg: f64, right_deg: f64, step_deg: f64) -> (Vec<f64>, Option<usize>) {
    let left = normalize_degrees(left_deg);
    let right = normalize_degrees(right_deg);
    let full_steps = (360.0 / step_deg).floor() as usize;

    if left == right {
        let bearings = (0..=full_steps).map(|s| s as f64 * step_deg).collect();
        (bearings, None)
    } else if left < right {
        let start = (left / step_deg).ceil() as usize;
        let end = (right / step_deg).floor() as usize;
        let bearings = (start..=end).map(|s| s as f64 * step_deg).collect();
        (bearings, None)
    } else {
        let first_end = (right / step_deg).floor() as usize;
        let second_start = (left / step_deg).ceil() as usize;
        let bearings = (0..=first_end)
            .chain(second_start..=full_steps)
            .map(|s| s as f64 * step_deg)
            .collect();
        (bearings, Some(first_end))
    }
}

fn cell_centroid(corners: &[LonLat; 4]) -> LonLat {
    let mean = spherical_mean(corners).unwrap_or(corners[0]);
    LonLat::new(
        round_places(mean.lon_deg, CENTROID_DECIMAL_PLACES),
        round_places(mean.lat_deg, CENTROID_DECIMAL_PLACES),
    )
}
