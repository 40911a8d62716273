//! HTTP-backed terrain sampler.
//!
//! Speaks a small JSON batch protocol:
//! - request: `POST {endpoint}` with `{"level": u32, "points": [[lon, lat], …]}`
//! - response: `{"heights": [f64, …]}`, positionally aligned with the request.

use foundation::math::LonLat;
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::sampler::{BoxFuture, HeightSample, TerrainError, TerrainSampler};

#[derive(Debug, Serialize)]
struct HeightBatchRequest {
    level: u32,
    points: Vec<[f64; 2]>,
}

#[derive(Debug, Deserialize)]
struct HeightBatchResponse {
    heights: Vec<f64>,
}

/// Terrain heights served by a remote height endpoint.
pub struct HttpTerrainSource {
    endpoint: String,
    http: reqwest::Client,
}

impl HttpTerrainSource {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            http: reqwest::Client::new(),
        }
    }

    pub fn with_client(endpoint: impl Into<String>, http: reqwest::Client) -> Self {
        Self {
            endpoint: endpoint.into(),
            http,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl TerrainSampler for HttpTerrainSource {
    fn sample_heights(
        &self,
        points: Vec<LonLat>,
        level: u32,
    ) -> BoxFuture<'_, Result<Vec<HeightSample>, TerrainError>> {
        Box::pin(async move {
            let body = HeightBatchRequest {
                level,
                points: points.iter().map(|p| [p.lon_deg, p.lat_deg]).collect(),
            };

            let resp = self
                .http
                .post(&self.endpoint)
                .json(&body)
                .send()
                .await
                .map_err(|err| {
                    error!("terrain request failed: {err}");
                    TerrainError::with_source("terrain service unreachable", err)
                })?;

            let resp = resp.error_for_status().map_err(|err| {
                error!("terrain service error: {err}");
                TerrainError::with_source("terrain service returned an error status", err)
            })?;

            let parsed: HeightBatchResponse = resp.json().await.map_err(|err| {
                error!("terrain response decode failed: {err}");
                TerrainError::with_source("terrain response was not valid JSON", err)
            })?;

            if parsed.heights.len() != points.len() {
                return Err(TerrainError::new(format!(
                    "terrain service returned {} heights for {} points",
                    parsed.heights.len(),
                    points.len()
                )));
            }

            Ok(points
                .into_iter()
                .zip(parsed.heights)
                .map(|(position, height_m)| HeightSample::new(position, height_m))
                .collect())
        })
    }
}
