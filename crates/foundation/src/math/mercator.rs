use super::geodesy::{EARTH_RADIUS_M, LonLat};

/// Planar Web Mercator coordinates (meters).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ProjectedXY {
    pub x: f64,
    pub y: f64,
}

impl ProjectedXY {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

pub fn lon_lat_to_mercator(geo: LonLat) -> ProjectedXY {
    let x = EARTH_RADIUS_M * geo.lon_deg.to_radians();
    let lat = geo.lat_deg.to_radians();
    let y = EARTH_RADIUS_M * (std::f64::consts::FRAC_PI_4 + lat / 2.0).tan().ln();
    ProjectedXY::new(x, y)
}

pub fn mercator_to_lon_lat(p: ProjectedXY) -> LonLat {
    let lon = (p.x / EARTH_RADIUS_M).to_degrees();
    let lat = (2.0 * (p.y / EARTH_RADIUS_M).exp().atan() - std::f64::consts::FRAC_PI_2).to_degrees();
    LonLat::new(lon, lat)
}

#[cfg(test)]
mod tests {
    use super::{ProjectedXY, lon_lat_to_mercator, mercator_to_lon_lat};
    use crate::math::LonLat;

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    #[test]
    fn origin_maps_to_origin() {
        let p = lon_lat_to_mercator(LonLat::new(0.0, 0.0));
        assert_close(p.x, 0.0, 1e-9);
        assert_close(p.y, 0.0, 1e-9);
    }

    #[test]
    fn one_eighty_maps_to_half_circumference() {
        let p = lon_lat_to_mercator(LonLat::new(180.0, 0.0));
        assert_close(p.x, 20_037_508.342_789_244, 1e-6);
    }

    #[test]
    fn round_trip_geodetic_mercator() {
        let geo = LonLat::new(139.767, 35.681);
        let rt = mercator_to_lon_lat(lon_lat_to_mercator(geo));
        assert_close(rt.lon_deg, geo.lon_deg, 1e-9);
        assert_close(rt.lat_deg, geo.lat_deg, 1e-9);
    }

    #[test]
    fn round_trip_projected_geodetic() {
        let p = ProjectedXY::new(15_550_408.0, 4_257_415.0);
        let rt = lon_lat_to_mercator(mercator_to_lon_lat(p));
        assert_close(rt.x, p.x, 1e-6);
        assert_close(rt.y, p.y, 1e-6);
    }
}
