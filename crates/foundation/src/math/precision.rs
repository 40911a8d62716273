//! Precision policies.
//!
//! Deterministic float handling for analysis outputs: fixed-decimal rounding
//! keeps derived coordinates reproducible across runs, and degree
//! normalization keeps azimuth arithmetic in a single range.

/// Round `v` to `places` decimal places (half away from zero).
pub fn round_places(v: f64, places: u32) -> f64 {
    let scale = 10f64.powi(places as i32);
    (v * scale).round() / scale
}

/// Normalize a degree value into `0.0 <= deg < 360.0`.
pub fn normalize_degrees(v: f64) -> f64 {
    let d = v % 360.0;
    if d < 0.0 { d + 360.0 } else { d }
}

#[cfg(test)]
mod tests {
    use super::{normalize_degrees, round_places};

    #[test]
    fn rounds_to_requested_places() {
        assert_eq!(round_places(1.23456789, 4), 1.2346);
        assert_eq!(round_places(-1.25, 1), -1.3);
        assert_eq!(round_places(139.76701234567891, 10), 139.7670123457);
    }

    #[test]
    fn rounding_is_idempotent() {
        let v = round_places(35.68123456789012, 10);
        assert_eq!(round_places(v, 10), v);
    }

    #[test]
    fn normalizes_degrees_into_range() {
        assert_eq!(normalize_degrees(0.0), 0.0);
        assert_eq!(normalize_degrees(360.0), 0.0);
        assert_eq!(normalize_degrees(-90.0), 270.0);
        assert_eq!(normalize_degrees(725.0), 5.0);
    }
}
