//! Easing helpers for menu and HUD animation
//!
//! Pure functions of an explicit elapsed-time parameter; the caller owns
//! the clock. `t` is normalized animation time, usually produced by
//! [`map_value`].

use std::f32::consts::TAU;

/// Linear interpolation from `from` to `to` at normalized time `t`
#[inline]
pub fn lerp(from: f32, to: f32, t: f32) -> f32 {
    (1.0 - t) * from + t * to
}

/// Quintic ease-in: slow start, fast finish
pub fn ease_in(from: f32, to: f32, t: f32) -> f32 {
    let tv = t * t * t * t * t;
    (1.0 - tv) * from + tv * to
}

/// Elastic ease-out: overshoots, then settles on `to` as `t` reaches 1
pub fn ease_out_elastic(from: f32, to: f32, t: f32) -> f32 {
    let p = 0.3;
    let s = p / 4.0;
    let diff = to - from;
    from + diff + diff * 2.0_f32.powf(-10.0 * t) * ((t - s) * TAU / p).sin()
}

/// Remap `value` from `[src_min, src_max]` into `[dst_min, dst_max]`,
/// clamped to the destination range
pub fn map_value(value: f32, src_min: f32, src_max: f32, dst_min: f32, dst_max: f32) -> f32 {
    let mapped = dst_min + (value - src_min) / (src_max - src_min) * (dst_max - dst_min);
    mapped.max(dst_min).min(dst_max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lerp_endpoints() {
        assert_eq!(lerp(2.0, 10.0, 0.0), 2.0);
        assert_eq!(lerp(2.0, 10.0, 1.0), 10.0);
        assert_eq!(lerp(2.0, 10.0, 0.5), 6.0);
    }

    #[test]
    fn test_ease_in_endpoints_and_shape() {
        assert_eq!(ease_in(0.0, 8.0, 0.0), 0.0);
        assert_eq!(ease_in(0.0, 8.0, 1.0), 8.0);
        // Quintic: far behind linear at the midpoint
        assert!(ease_in(0.0, 8.0, 0.5) < lerp(0.0, 8.0, 0.5));
    }

    #[test]
    fn test_ease_out_elastic_settles() {
        let settled = ease_out_elastic(0.0, 5.0, 1.0);
        assert!((settled - 5.0).abs() < 0.05);
        // Early in the curve the spring is still swinging wide
        let early = ease_out_elastic(0.0, 5.0, 0.1);
        assert!((early - 5.0).abs() > 0.5);
    }

    #[test]
    fn test_map_value_remaps_and_clamps() {
        assert_eq!(map_value(5.0, 0.0, 10.0, 0.0, 1.0), 0.5);
        assert_eq!(map_value(-3.0, 0.0, 10.0, 0.0, 1.0), 0.0);
        assert_eq!(map_value(42.0, 0.0, 10.0, 0.0, 1.0), 1.0);
        assert_eq!(map_value(7.5, 5.0, 10.0, 2.0, 4.0), 3.0);
    }
}
