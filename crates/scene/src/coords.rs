//! Mapping from 2D board coordinates onto the hemisphere shell around the viewer.
//!
//! Entities carry a normalized `position2d` in [0,100]². The mapper places them
//! on a sphere of the scene radius, sweeping a bounded arc so markers stay in
//! front of the viewer rather than wrapping the full 360°, and raises the whole
//! shell to eye height. The function is pure and deterministic; marker position
//! stability across re-renders depends on that.

use bevy::prelude::*;
use std::f32::consts::PI;

/// Default shell radius markers are placed on.
pub const SHELL_RADIUS: f32 = 14.0;

/// Total horizontal sweep: 0.6π centered straight ahead (x = 50).
pub const HORIZONTAL_SWEEP: f32 = 0.6 * PI;

/// Total vertical sweep, smaller than the horizontal one. y = 0 maps up.
pub const VERTICAL_SWEEP: f32 = 0.35 * PI;

/// Camera eye height; the shell is raised by this so markers sit near eye
/// level instead of around the world origin.
pub const EYE_HEIGHT: f32 = 1.6;

/// Clamp a board coordinate into [0,100]; non-finite values (a malformed
/// entity record) fall back to the center so one bad record never breaks
/// the scene.
fn sanitize(v: f32) -> f32 {
    if v.is_finite() {
        v.clamp(0.0, 100.0)
    } else {
        50.0
    }
}

/// Map a 2D board position to a point on the shell of the given radius.
///
/// `x` sweeps the horizontal arc left-to-right, `y` sweeps the vertical arc
/// top-to-bottom (y = 0 is up). (50, 50) lands dead ahead of the viewer at
/// eye height, at distance `radius` along -Z.
pub fn map_to_shell(x: f32, y: f32, radius: f32) -> Vec3 {
    let x = sanitize(x);
    let y = sanitize(y);
    let radius = if radius.is_finite() && radius > 0.0 {
        radius
    } else {
        SHELL_RADIUS
    };

    let azimuth = (x / 100.0 - 0.5) * HORIZONTAL_SWEEP;
    let elevation = (0.5 - y / 100.0) * VERTICAL_SWEEP;

    let (sin_az, cos_az) = azimuth.sin_cos();
    let (sin_el, cos_el) = elevation.sin_cos();

    Vec3::new(
        radius * cos_el * sin_az,
        radius * sin_el + EYE_HEIGHT,
        -radius * cos_el * cos_az,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_inputs_map_to_identical_outputs() {
        let samples = [
            (0.0, 0.0, 10.0),
            (50.0, 50.0, 14.0),
            (100.0, 100.0, 3.5),
            (12.25, 87.5, 200.0),
        ];
        for (x, y, r) in samples {
            let a = map_to_shell(x, y, r);
            let b = map_to_shell(x, y, r);
            // Bit-for-bit: same inputs, same float path, same result.
            assert_eq!(a.x.to_bits(), b.x.to_bits());
            assert_eq!(a.y.to_bits(), b.y.to_bits());
            assert_eq!(a.z.to_bits(), b.z.to_bits());
        }
    }

    #[test]
    fn out_of_range_inputs_are_clamped() {
        assert_eq!(map_to_shell(-40.0, 30.0, 14.0), map_to_shell(0.0, 30.0, 14.0));
        assert_eq!(
            map_to_shell(250.0, 30.0, 14.0),
            map_to_shell(100.0, 30.0, 14.0)
        );
        assert_eq!(
            map_to_shell(30.0, -1.0, 14.0),
            map_to_shell(30.0, 0.0, 14.0)
        );
    }

    #[test]
    fn no_nan_or_infinity_escapes() {
        let weird = [f32::NAN, f32::INFINITY, f32::NEG_INFINITY, -1e30, 1e30];
        for &x in &weird {
            for &y in &weird {
                for &r in &[f32::NAN, -5.0, 0.0, 14.0] {
                    let p = map_to_shell(x, y, r);
                    assert!(p.x.is_finite() && p.y.is_finite() && p.z.is_finite());
                }
            }
        }
    }

    #[test]
    fn non_finite_coordinates_default_to_center() {
        let center = map_to_shell(50.0, 50.0, 14.0);
        assert_eq!(map_to_shell(f32::NAN, 50.0, 14.0), center);
        assert_eq!(map_to_shell(50.0, f32::INFINITY, 14.0), center);
    }

    #[test]
    fn center_maps_directly_ahead_at_eye_height() {
        for radius in [5.0, 14.0, 60.0] {
            let p = map_to_shell(50.0, 50.0, radius);
            assert!(p.x.abs() < 1e-4);
            assert!((p.y - EYE_HEIGHT).abs() < 1e-4);
            assert!((p.z + radius).abs() < 1e-3);
        }
    }

    #[test]
    fn y_zero_maps_above_eye_height() {
        let up = map_to_shell(50.0, 0.0, 14.0);
        let down = map_to_shell(50.0, 100.0, 14.0);
        assert!(up.y > EYE_HEIGHT);
        assert!(down.y < EYE_HEIGHT);
    }

    #[test]
    fn horizontal_sweep_stays_in_front_of_viewer() {
        // Even at the extremes, markers are in the -Z half space.
        let left = map_to_shell(0.0, 50.0, 14.0);
        let right = map_to_shell(100.0, 50.0, 14.0);
        assert!(left.z < 0.0);
        assert!(right.z < 0.0);
        assert!(left.x < 0.0);
        assert!(right.x > 0.0);
    }
}
