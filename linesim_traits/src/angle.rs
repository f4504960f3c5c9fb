//! Bearing helpers shared by the sensor array, the controllers and the robot driver.

use glam::DVec2;
use std::f64::consts::{PI, TAU};

/// Signed shortest rotation from `b` to `a`, in `(-PI, PI]`.
#[inline]
pub fn angle_diff(a: f64, b: f64) -> f64 {
    let mut d = (a - b).rem_euclid(TAU);
    if d > PI {
        d -= TAU;
    }
    d
}

/// Map any bearing into `[0, 2PI)`.
#[inline]
pub fn wrap_bearing(b: f64) -> f64 {
    let w = b.rem_euclid(TAU);
    // rem_euclid can round up to TAU for tiny negative inputs
    if w >= TAU { 0.0 } else { w }
}

/// Rotate `v` by `bearing` radians using the standard 2D rotation matrix.
#[inline]
pub fn rotate(v: DVec2, bearing: f64) -> DVec2 {
    DVec2::from_angle(bearing).rotate(v)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0.1, 0.0, 0.1)]
    #[case(0.0, 0.1, -0.1)]
    #[case(0.05, TAU - 0.05, 0.1)]
    #[case(TAU - 0.05, 0.05, -0.1)]
    #[case(PI, 0.0, PI)]
    fn diff_takes_short_way_round(#[case] a: f64, #[case] b: f64, #[case] expect: f64) {
        assert!((angle_diff(a, b) - expect).abs() < 1e-12);
    }

    #[test]
    fn wrap_stays_in_range() {
        for b in [-7.0, -0.0, 0.0, 3.0, TAU, 13.0] {
            let w = wrap_bearing(b);
            assert!((0.0..TAU).contains(&w), "{b} -> {w}");
        }
        assert!((wrap_bearing(-0.5) - (TAU - 0.5)).abs() < 1e-12);
    }

    #[test]
    fn rotate_quarter_turn() {
        let r = rotate(DVec2::new(1.0, 0.0), PI / 2.0);
        assert!((r - DVec2::new(0.0, 1.0)).length() < 1e-12);
    }
}
