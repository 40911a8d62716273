//! Deterministic in-process terrain sources.
//!
//! These exist so analyses can run without a terrain service: fixed-height
//! terrain for tests and demos, closure-backed terrain for synthetic relief,
//! and an always-failing source for exercising error paths.

use foundation::math::LonLat;

use crate::sampler::{BoxFuture, HeightSample, TerrainError, TerrainSampler};

/// Terrain with the same height everywhere.
#[derive(Debug, Copy, Clone)]
pub struct FlatTerrain {
    height_m: f64,
}

impl FlatTerrain {
    pub fn new(height_m: f64) -> Self {
        Self { height_m }
    }
}

impl TerrainSampler for FlatTerrain {
    fn sample_heights(
        &self,
        points: Vec<LonLat>,
        _level: u32,
    ) -> BoxFuture<'_, Result<Vec<HeightSample>, TerrainError>> {
        let height_m = self.height_m;
        Box::pin(async move {
            Ok(points
                .into_iter()
                .map(|p| HeightSample::new(p, height_m))
                .collect())
        })
    }
}

/// Terrain with height computed from the sample position.
pub struct FnTerrain<F> {
    f: F,
}

impl<F> FnTerrain<F>
where
    F: Fn(LonLat) -> f64 + Send + Sync,
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> TerrainSampler for FnTerrain<F>
where
    F: Fn(LonLat) -> f64 + Send + Sync,
{
    fn sample_heights(
        &self,
        points: Vec<LonLat>,
        _level: u32,
    ) -> BoxFuture<'_, Result<Vec<HeightSample>, TerrainError>> {
        Box::pin(async move {
            Ok(points
                .into_iter()
                .map(|p| HeightSample::new(p, (self.f)(p)))
                .collect())
        })
    }
}

/// Terrain source that rejects every request with a fixed message.
#[derive(Debug, Clone)]
pub struct FailingTerrain {
    message: String,
}

impl FailingTerrain {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl TerrainSampler for FailingTerrain {
    fn sample_heights(
        &self,
        _points: Vec<LonLat>,
        _level: u32,
    ) -> BoxFuture<'_, Result<Vec<HeightSample>, TerrainError>> {
        let message = self.message.clone();
        Box::pin(async move { Err(TerrainError::new(message)) })
    }
}
