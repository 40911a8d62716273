//! Terrain height sampling abstraction.
//!
//! The analysis crates only ever talk to terrain through `TerrainSampler`:
//! a batched, asynchronous height lookup for geodetic points at an integer
//! detail level. New providers can be added by implementing the trait.

use std::future::Future;
use std::pin::Pin;

use foundation::math::LonLat;

/// Error type for terrain sampling operations.
#[derive(Debug)]
pub struct TerrainError {
    pub message: String,
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl std::fmt::Display for TerrainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for TerrainError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source.as_ref().map(|e| e.as_ref() as _)
    }
}

impl TerrainError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

/// A resolved terrain height for one requested point.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct HeightSample {
    pub position: LonLat,
    pub height_m: f64,
}

impl HeightSample {
    pub fn new(position: LonLat, height_m: f64) -> Self {
        Self {
            position,
            height_m,
        }
    }
}

/// Type alias for a boxed future that can be sent between threads.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Trait for terrain height providers.
///
/// Implementations must be `Send + Sync` for use across async tasks.
/// Methods return boxed futures for dyn-compatibility.
///
/// Contract: the result is positionally aligned with `points`: one
/// `HeightSample` per requested point, in request order. Callers match
/// heights to points by index, never by arrival order.
pub trait TerrainSampler: Send + Sync {
    /// Resolve a terrain height for every point, at the given detail level.
    fn sample_heights(
        &self,
        points: Vec<LonLat>,
        level: u32,
    ) -> BoxFuture<'_, Result<Vec<HeightSample>, TerrainError>>;
}

#[cfg(test)]
mod tests {
    use super::TerrainError;

    #[test]
    fn error_display_is_message_only() {
        let err = TerrainError::new("terrain service unavailable");
        assert_eq!(err.to_string(), "terrain service unavailable");
    }

    #[test]
    fn error_keeps_source_chain() {
        let inner = std::io::Error::new(std::io::ErrorKind::Other, "socket closed");
        let err = TerrainError::with_source("terrain request failed", inner);
        assert_eq!(err.to_string(), "terrain request failed");
        assert!(std::error::Error::source(&err).is_some());
    }
}
