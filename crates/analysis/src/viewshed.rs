//! Viewshed analysis: which parts of the surrounding disc are visible from
//! a viewpoint, accounting for terrain occlusion along each sightline.

use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use foundation::math::{ProjectedXY, lon_lat_to_mercator};
use terrain::TerrainSampler;
use tracing::{debug, warn};

use crate::error::AnalysisError;
use crate::gate::AnalysisGate;
use crate::grid::build_grid;
use crate::merge::{clip_inner, merge_visible};
use crate::request::ViewshedRequest;
use crate::sightline::assign_visibility;

static VIEWSHED_BUSY: AtomicBool = AtomicBool::new(false);

/// A merged visible region in projected (Web Mercator) coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct VisibleRegion {
    pub line_id: usize,
    /// First and last ring covered by the region.
    pub circle_start: usize,
    pub circle_end: usize,
    /// Closed polygon ring.
    pub ring: Vec<ProjectedXY>,
}

/// Terrain-visibility analyzer.
///
/// At most one viewshed analysis is in flight per process, across every
/// instance; a request made while one is running fails immediately, without
/// touching the terrain sampler. All grid state is per request and dropped
/// when the result is returned.
pub struct ViewshedAnalyzer {
    terrain: Arc<dyn TerrainSampler>,
    gate: AnalysisGate,
}

impl ViewshedAnalyzer {
    pub fn new(terrain: Arc<dyn TerrainSampler>) -> Self {
        Self {
            terrain,
            gate: AnalysisGate::new(&VIEWSHED_BUSY),
        }
    }

    /// Whether any viewshed analysis is currently running, on any instance.
    pub fn is_processing() -> bool {
        AnalysisGate::new(&VIEWSHED_BUSY).is_busy()
    }

    /// Run one viewshed analysis.
    ///
    /// An empty region list is a valid outcome (a fully occluded viewpoint),
    /// not an error.
    pub async fn analyze(
        &self,
        request: &ViewshedRequest,
    ) -> Result<Vec<VisibleRegion>, AnalysisError> {
        let _guard = self.gate.try_acquire().ok_or(AnalysisError::Busy {
            analyzer: "ViewshedAnalyzer",
        })?;

        let mut grid = build_grid(request);
        debug!(
            cells = grid.cells.len(),
            rings = grid.ring_count,
            "viewshed grid generated"
        );

        let centroids: Vec<_> = grid.cells.iter().map(|c| c.centroid).collect();
        let requested = centroids.len();
        let samples = self
            .terrain
            .sample_heights(centroids, request.terrain_level)
            .await
            .map_err(|err| {
                warn!("terrain sampling failed: {err}");
                AnalysisError::Terrain(err)
            })?;
        if samples.len() != requested {
            return Err(AnalysisError::Misaligned {
                requested,
                returned: samples.len(),
            });
        }
        for (cell, sample) in grid.cells.iter_mut().zip(&samples) {
            cell.elevation_m = sample.height_m;
        }

        assign_visibility(&mut grid.cells, request.eye_height_m);
        let clipped = clip_inner(&grid.cells, request.radial_range_min_m, request.radial_step_m);
        let merged = merge_visible(&clipped);
        debug!(regions = merged.len(), "viewshed merge complete");

        Ok(merged
            .into_iter()
            .map(|run| VisibleRegion {
                line_id: run.line_id,
                circle_start: run.circle_start,
                circle_end: run.circle_end,
                ring: run.ring.iter().map(|p| lon_lat_to_mercator(*p)).collect(),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::{VIEWSHED_BUSY, ViewshedAnalyzer};
    use crate::gate::AnalysisGate;
    use crate::request::ViewshedRequest;
    use foundation::math::{LonLat, ProjectedXY, haversine_distance_m};
    use std::sync::{Arc, Mutex, MutexGuard};
    use terrain::synthetic::{FailingTerrain, FlatTerrain, FnTerrain};
    use terrain::{BoxFuture, HeightSample, TerrainError, TerrainSampler};

    // The viewshed gate is process-wide, so tests touching it must not
    // overlap.
    static GATE_LOCK: Mutex<()> = Mutex::new(());

    fn serial() -> MutexGuard<'static, ()> {
        GATE_LOCK
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn equator_request() -> ViewshedRequest {
        ViewshedRequest::new(ProjectedXY::new(0.0, 0.0), 1000.0, 100.0, 90.0)
    }

    #[tokio::test]
    async fn flat_terrain_yields_one_region_per_sightline() {
        let _serial = serial();
        let analyzer = ViewshedAnalyzer::new(Arc::new(FlatTerrain::new(5.0)));
        let mut regions = analyzer.analyze(&equator_request()).await.unwrap();
        regions.sort_by_key(|r| r.line_id);

        assert_eq!(regions.len(), 4);
        for region in &regions {
            assert_eq!(region.circle_start, 0);
            assert_eq!(region.circle_end, 9);
            assert_eq!(region.ring.len(), 5);
            assert_eq!(region.ring[0], region.ring[4]);
        }
        let lines: Vec<usize> = regions.iter().map(|r| r.line_id).collect();
        assert_eq!(lines, vec![0, 1, 2, 3]);
    }

    #[tokio::test]
    async fn terrain_spike_blinds_one_sightline_beyond_it() {
        let _serial = serial();
        // A 10 km wall under the third ring of centroids, northeast quadrant
        // only: the line-0 sightline loses everything behind it.
        let center = LonLat::new(0.0, 0.0);
        let terrain = FnTerrain::new(move |p: LonLat| {
            let d = haversine_distance_m(center, p);
            if p.lon_deg > 0.0 && p.lat_deg > 0.0 && (150.0..200.0).contains(&d) {
                10_000.0
            } else {
                0.0
            }
        });
        let analyzer = ViewshedAnalyzer::new(Arc::new(terrain));
        let mut regions = analyzer.analyze(&equator_request()).await.unwrap();
        regions.sort_by_key(|r| r.line_id);

        assert_eq!(regions.len(), 4);
        assert_eq!(regions[0].line_id, 0);
        assert_eq!(regions[0].circle_start, 0);
        assert_eq!(regions[0].circle_end, 2);
        for region in &regions[1..] {
            assert_eq!(region.circle_end, 9);
        }
    }

    #[tokio::test]
    async fn inner_range_clips_near_rings() {
        let _serial = serial();
        let analyzer = ViewshedAnalyzer::new(Arc::new(FlatTerrain::new(0.0)));
        let request = equator_request().with_radial_range_min(300.0);
        let regions = analyzer.analyze(&request).await.unwrap();
        assert_eq!(regions.len(), 4);
        for region in &regions {
            assert_eq!(region.circle_start, 3);
            assert_eq!(region.circle_end, 9);
        }
    }

    #[tokio::test]
    async fn busy_gate_rejects_second_request_without_sampling() {
        let _serial = serial();
        let analyzer = ViewshedAnalyzer::new(Arc::new(FnTerrain::new(|_| -> f64 {
            panic!("sampler must not be called while busy")
        })));

        let held = AnalysisGate::new(&VIEWSHED_BUSY).try_acquire().unwrap();
        assert!(ViewshedAnalyzer::is_processing());

        let err = analyzer.analyze(&equator_request()).await.unwrap_err();
        assert_eq!(err.to_string(), "ViewshedAnalyzer is already processing.");

        drop(held);
        assert!(!ViewshedAnalyzer::is_processing());
    }

    #[tokio::test]
    async fn sampler_failure_surfaces_message_and_releases_gate() {
        let _serial = serial();
        let failing = ViewshedAnalyzer::new(Arc::new(FailingTerrain::new("service unavailable")));
        let err = failing.analyze(&equator_request()).await.unwrap_err();
        assert_eq!(err.to_string(), "service unavailable");
        assert!(!ViewshedAnalyzer::is_processing());

        let recovered = ViewshedAnalyzer::new(Arc::new(FlatTerrain::new(0.0)));
        assert!(recovered.analyze(&equator_request()).await.is_ok());
    }

    struct TruncatingTerrain;

    impl TerrainSampler for TruncatingTerrain {
        fn sample_heights(
            &self,
            points: Vec<LonLat>,
            _level: u32,
        ) -> BoxFuture<'_, Result<Vec<HeightSample>, TerrainError>> {
            Box::pin(async move {
                Ok(points
                    .into_iter()
                    .skip(1)
                    .map(|p| HeightSample::new(p, 0.0))
                    .collect())
            })
        }
    }

    #[tokio::test]
    async fn misaligned_sampler_response_fails_the_request() {
        let _serial = serial();
        let analyzer = ViewshedAnalyzer::new(Arc::new(TruncatingTerrain));
        let err = analyzer.analyze(&equator_request()).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "terrain sampler returned 39 heights for 40 points"
        );
        assert!(!ViewshedAnalyzer::is_processing());
    }
}
