/*
 * Vector Helpers
 *
 * Small additions on top of the 2D vector type nannou re-exports.
 * Everything else (add, subtract, scale, normalize, distance) comes
 * straight from the prelude types.
 */

use nannou::prelude::*;

// Cap a vector's magnitude without changing its direction
pub fn limit(v: Vec2, max: f32) -> Vec2 {
    if v.length() > max {
        v.normalize() * max
    } else {
        v
    }
}

// Unit vector pointing at the given angle (radians, counter-clockwise from +x)
pub fn from_angle(angle: f32) -> Vec2 {
    vec2(angle.cos(), angle.sin())
}

// Rotate a vector by the given angle
pub fn rotate(v: Vec2, angle: f32) -> Vec2 {
    let ca = angle.cos();
    let sa = angle.sin();
    vec2(v.x * ca - v.y * sa, v.x * sa + v.y * ca)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_limit_caps_long_vectors() {
        let v = limit(vec2(10.0, 0.0), 2.0);
        assert!((v.length() - 2.0).abs() < 1e-5);
        assert!(v.x > 0.0);
    }

    #[test]
    fn test_limit_leaves_short_vectors() {
        let v = limit(vec2(0.5, 0.5), 2.0);
        assert_eq!(v, vec2(0.5, 0.5));
    }

    #[test]
    fn test_limit_zero_vector() {
        assert_eq!(limit(Vec2::ZERO, 1.0), Vec2::ZERO);
    }

    #[test]
    fn test_rotate_quarter_turn() {
        let v = rotate(vec2(1.0, 0.0), FRAC_PI_2);
        assert!(v.x.abs() < 1e-6);
        assert!((v.y - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_from_angle_matches_rotate() {
        let a = 0.73;
        let v = rotate(vec2(1.0, 0.0), a);
        let w = from_angle(a);
        assert!((v - w).length() < 1e-6);
    }
}
