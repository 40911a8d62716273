//! Cross-section analysis: a terrain height profile along a projected path.

use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use foundation::math::{
    LonLat, ProjectedXY, haversine_distance_m, lon_lat_to_mercator, mercator_to_lon_lat,
};
use futures_util::future::try_join_all;
use terrain::TerrainSampler;
use tracing::{debug, warn};

use crate::error::AnalysisError;
use crate::gate::AnalysisGate;
use crate::request::CrossSectionRequest;

static CROSS_SECTION_BUSY: AtomicBool = AtomicBool::new(false);

/// One profile sample: projected position plus terrain height.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ProfileSample {
    pub position: ProjectedXY,
    pub height_m: f64,
}

/// Terrain profile analyzer.
///
/// Shares the viewshed analyzer's single-flight discipline, with its own
/// process-wide gate: a cross-section request never blocks a viewshed
/// request and vice versa.
pub struct CrossSectionAnalyzer {
    terrain: Arc<dyn TerrainSampler>,
    gate: AnalysisGate,
}

impl CrossSectionAnalyzer {
    pub fn new(terrain: Arc<dyn TerrainSampler>) -> Self {
        Self {
            terrain,
            gate: AnalysisGate::new(&CROSS_SECTION_BUSY),
        }
    }

    /// Whether any cross-section analysis is currently running, on any
    /// instance.
    pub fn is_processing() -> bool {
        AnalysisGate::new(&CROSS_SECTION_BUSY).is_busy()
    }

    /// Run one cross-section analysis.
    ///
    /// Returns one ordered sample list per path segment, in segment order.
    /// Segments are sampled concurrently; heights are matched to points by
    /// position, so completion order does not matter. The first sampler
    /// failure fails the whole request.
    pub async fn analyze(
        &self,
        request: &CrossSectionRequest,
    ) -> Result<Vec<Vec<ProfileSample>>, AnalysisError> {
        let _guard = self.gate.try_acquire().ok_or(AnalysisError::Busy {
            analyzer: "CrossSectionAnalyzer",
        })?;

        let mut waypoints = Vec::with_capacity(request.via.len() + 2);
        waypoints.push(request.start);
        waypoints.extend(request.via.iter().copied());
        waypoints.push(request.end);

        let segments: Vec<Vec<LonLat>> = waypoints
            .windows(2)
            .map(|pair| subdivide(pair[0], pair[1], request.resolution_m))
            .collect();
        debug!(
            segments = segments.len(),
            samples = segments.iter().map(Vec::len).sum::<usize>(),
            "cross-section sampling plan"
        );

        let pending = segments
            .iter()
            .map(|points| self.terrain.sample_heights(points.clone(), request.terrain_level));
        let resolved = try_join_all(pending).await.map_err(|err| {
            warn!("terrain sampling failed: {err}");
            AnalysisError::Terrain(err)
        })?;

        let mut altitudes = Vec::with_capacity(segments.len());
        for (points, samples) in segments.iter().zip(resolved) {
            if samples.len() != points.len() {
                return Err(AnalysisError::Misaligned {
                    requested: points.len(),
                    returned: samples.len(),
                });
            }
            altitudes.push(
                samples
                    .into_iter()
                    .map(|s| ProfileSample {
                        position: lon_lat_to_mercator(s.position),
                        height_m: s.height_m,
                    })
                    .collect(),
            );
        }
        Ok(altitudes)
    }
}

/// Evenly spaced geodetic samples along a projected segment.
///
/// The segment's own end point is excluded; it becomes the start of the next
/// segment, or terminates the path. A segment shorter than half the
/// resolution produces no samples.
fn subdivide(start: ProjectedXY, end: ProjectedXY, resolution_m: f64) -> Vec<LonLat> {
    let length_m = haversine_distance_m(mercator_to_lon_lat(start), mercator_to_lon_lat(end));
    let parts = (length_m / resolution_m).round() as usize;
    (0..parts)
        .map(|i| {
            let t = i as f64 / parts as f64;
            mercator_to_lon_lat(ProjectedXY::new(
                start.x + (end.x - start.x) * t,
                start.y + (end.y - start.y) * t,
            ))
        })
        .collect()
}
