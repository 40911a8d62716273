/// WGS84 semi-major axis (meters), used as the spherical earth radius by the
/// analysis routines.
pub const EARTH_RADIUS_M: f64 = 6_378_137.0;

/// Geodetic coordinates in degrees.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LonLat {
    pub lon_deg: f64,
    pub lat_deg: f64,
}

impl LonLat {
    pub fn new(lon_deg: f64, lat_deg: f64) -> Self {
        Self { lon_deg, lat_deg }
    }
}

/// Great-circle distance between two geodetic points (meters).
pub fn haversine_distance_m(a: LonLat, b: LonLat) -> f64 {
    let lat_a = a.lat_deg.to_radians();
    let lat_b = b.lat_deg.to_radians();
    let d_lat = (b.lat_deg - a.lat_deg).to_radians();
    let d_lon = (b.lon_deg - a.lon_deg).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat_a.cos() * lat_b.cos() * (d_lon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * h.sqrt().asin()
}

/// Destination point on the sphere, starting at `origin` and travelling
/// `distance_m` along `bearing_deg` (clockwise from north).
pub fn destination(origin: LonLat, bearing_deg: f64, distance_m: f64) -> LonLat {
    let lat1 = origin.lat_deg.to_radians();
    let lon1 = origin.lon_deg.to_radians();
    let bearing = bearing_deg.to_radians();
    let delta = distance_m / EARTH_RADIUS_M;

    let sin_lat2 = lat1.sin() * delta.cos() + lat1.cos() * delta.sin() * bearing.cos();
    let lat2 = sin_lat2.asin();
    let y = bearing.sin() * delta.sin() * lat1.cos();
    let x = delta.cos() - lat1.sin() * sin_lat2;
    let lon2 = lon1 + y.atan2(x);

    LonLat::new(lon2.to_degrees(), lat2.to_degrees())
}

/// Spherical mean of a set of geodetic points.
///
/// Points are averaged as unit vectors and renormalized, so the result stays
/// on the sphere and is independent of the antimeridian.
pub fn spherical_mean(points: &[LonLat]) -> Option<LonLat> {
    if points.is_empty() {
        return None;
    }

    let mut x = 0.0;
    let mut y = 0.0;
    let mut z = 0.0;
    for p in points {
        let lat = p.lat_deg.to_radians();
        let lon = p.lon_deg.to_radians();
        x += lat.cos() * lon.cos();
        y += lat.cos() * lon.sin();
        z += lat.sin();
    }

    let norm = (x * x + y * y + z * z).sqrt();
    if norm == 0.0 {
        return None;
    }

    let lat = (z / norm).asin();
    let lon = y.atan2(x);
    Some(LonLat::new(lon.to_degrees(), lat.to_degrees()))
}

#[cfg(test)]
mod tests {
    use super::{EARTH_RADIUS_M, LonLat, destination, haversine_distance_m, spherical_mean};

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    #[test]
    fn haversine_one_degree_of_longitude_at_equator() {
        let a = LonLat::new(0.0, 0.0);
        let b = LonLat::new(1.0, 0.0);
        let expected = EARTH_RADIUS_M * 1.0_f64.to_radians();
        assert_close(haversine_distance_m(a, b), expected, 1e-6);
    }

    #[test]
    fn haversine_is_symmetric() {
        let a = LonLat::new(139.767, 35.681);
        let b = LonLat::new(135.495, 34.702);
        assert_close(
            haversine_distance_m(a, b),
            haversine_distance_m(b, a),
            1e-9,
        );
    }

    #[test]
    fn destination_due_north_increases_latitude_only() {
        let p = destination(LonLat::new(10.0, 0.0), 0.0, 10_000.0);
        assert_close(p.lon_deg, 10.0, 1e-9);
        assert!(p.lat_deg > 0.0);
        assert_close(
            haversine_distance_m(LonLat::new(10.0, 0.0), p),
            10_000.0,
            1e-3,
        );
    }

    #[test]
    fn destination_due_east_at_equator_increases_longitude_only() {
        let p = destination(LonLat::new(0.0, 0.0), 90.0, 10_000.0);
        assert_close(p.lat_deg, 0.0, 1e-9);
        assert!(p.lon_deg > 0.0);
    }

    #[test]
    fn destination_round_trips_distance() {
        let origin = LonLat::new(-3.7, 40.4);
        for bearing in [0.0, 45.0, 133.0, 270.0] {
            let p = destination(origin, bearing, 25_000.0);
            assert_close(haversine_distance_m(origin, p), 25_000.0, 1e-2);
        }
    }

    #[test]
    fn spherical_mean_of_symmetric_points_is_center() {
        let pts = [
            LonLat::new(1.0, 0.0),
            LonLat::new(-1.0, 0.0),
            LonLat::new(0.0, 1.0),
            LonLat::new(0.0, -1.0),
        ];
        let m = spherical_mean(&pts).unwrap();
        assert_close(m.lon_deg, 0.0, 1e-9);
        assert_close(m.lat_deg, 0.0, 1e-9);
    }

    #[test]
    fn spherical_mean_of_empty_is_none() {
        assert!(spherical_mean(&[]).is_none());
    }
}
