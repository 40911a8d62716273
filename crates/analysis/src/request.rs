use foundation::math::ProjectedXY;

/// Documented hard cap on the radial analysis range (meters).
///
/// Callers are expected to clamp `radial_range_max_m` to this value; the
/// analyzers rely on the cap but do not enforce it.
pub const MAX_RADIAL_RANGE_M: f64 = 50_000.0;

/// Default eye height above ground at the viewpoint (meters).
pub const DEFAULT_EYE_HEIGHT_M: f64 = 2.0;

/// Default terrain detail level passed to the sampler.
pub const DEFAULT_TERRAIN_LEVEL: u32 = 8;

/// Decimal places used when rounding derived cell centroids, so repeated
/// runs produce identical sampling positions.
pub const CENTROID_DECIMAL_PLACES: u32 = 10;

/// Parameters for one viewshed analysis.
///
/// Azimuths are degrees clockwise from north. Equal left/right bounds mean a
/// full 360° sweep; left greater than right means the range wraps through
/// north.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewshedRequest {
    /// Viewpoint in projected (Web Mercator) meters.
    pub center: ProjectedXY,
    /// Eye height above ground at the viewpoint (meters).
    pub eye_height_m: f64,
    /// Inner radius (meters); cells closer than this are clipped from the
    /// output.
    pub radial_range_min_m: f64,
    /// Outer radius (meters). See `MAX_RADIAL_RANGE_M`.
    pub radial_range_max_m: f64,
    pub azimuth_left_deg: f64,
    pub azimuth_right_deg: f64,
    /// Step between concentric sampling rings (meters).
    pub radial_step_m: f64,
    /// Step between sightlines (degrees).
    pub azimuth_step_deg: f64,
    pub terrain_level: u32,
}

impl ViewshedRequest {
    pub fn new(
        center: ProjectedXY,
        radial_range_max_m: f64,
        radial_step_m: f64,
        azimuth_step_deg: f64,
    ) -> Self {
        Self {
            center,
            eye_height_m: DEFAULT_EYE_HEIGHT_M,
            radial_range_min_m: 0.0,
            radial_range_max_m,
            azimuth_left_deg: 0.0,
            azimuth_right_deg: 360.0,
            radial_step_m,
            azimuth_step_deg,
            terrain_level: DEFAULT_TERRAIN_LEVEL,
        }
    }

    pub fn with_eye_height(mut self, eye_height_m: f64) -> Self {
        self.eye_height_m = eye_height_m;
        self
    }

    pub fn with_radial_range_min(mut self, radial_range_min_m: f64) -> Self {
        self.radial_range_min_m = radial_range_min_m;
        self
    }

    pub fn with_azimuth_range(mut self, left_deg: f64, right_deg: f64) -> Self {
        self.azimuth_left_deg = left_deg;
        self.azimuth_right_deg = right_deg;
        self
    }

    pub fn with_terrain_level(mut self, terrain_level: u32) -> Self {
        self.terrain_level = terrain_level;
        self
    }
}

/// Parameters for one cross-section (terrain profile) analysis.
#[derive(Debug, Clone, PartialEq)]
pub struct CrossSectionRequest {
    /// Path start in projected (Web Mercator) meters.
    pub start: ProjectedXY,
    /// Path end in projected meters.
    pub end: ProjectedXY,
    /// Ordered intermediate waypoints.
    pub via: Vec<ProjectedXY>,
    /// Spacing between profile samples (meters).
    pub resolution_m: f64,
    pub terrain_level: u32,
}

impl CrossSectionRequest {
    pub fn new(start: ProjectedXY, end: ProjectedXY, resolution_m: f64) -> Self {
        Self {
            start,
            end,
            via: Vec::new(),
            resolution_m,
            terrain_level: DEFAULT_TERRAIN_LEVEL,
        }
    }

    pub fn with_via(mut self, via: Vec<ProjectedXY>) -> Self {
        self.via = via;
        self
    }

    pub fn with_terrain_level(mut self, terrain_level: u32) -> Self {
        self.terrain_level = terrain_level;
        self
    }
}
