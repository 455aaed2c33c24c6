//! Navigation geometry: heading/velocity conversion, bearings, rates, range.
//!
//! # Conventions
//! - Frame: local tangent plane, x = East, y = North (meters).
//! - Headings and bearings: degrees, 0° = North, clockwise positive.
//! - Compass bearing of a vector (dx, dy) is `atan2(dx, dy)`.
//!
//! Every function here is pure.

use crate::{
    error::{ColregsError, Result},
    types::{Position, Velocity},
};

/// Range below which a bearing is undefined (m).
pub const MIN_RANGE: f64 = 1e-6;

/// Normalize an angle to [-180, 180).
pub fn normalize_angle(angle: f64) -> f64 {
    (angle + 180.0).rem_euclid(360.0) - 180.0
}

/// Normalize an angle to [0, 360).
pub fn normalize_angle_360(angle: f64) -> f64 {
    let a = angle.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if a >= 360.0 {
        0.0
    } else {
        a
    }
}

fn check_speed(speed: f64) -> Result<()> {
    if !speed.is_finite() || speed < 0.0 {
        return Err(ColregsError::input(format!(
            "speed must be finite and >= 0, got {speed}"
        )));
    }
    Ok(())
}

/// Convert heading (deg) and speed (m/s) to a velocity vector.
///
/// `vx = speed·sin(heading)`, `vy = speed·cos(heading)`.
pub fn heading_to_velocity(heading_deg: f64, speed: f64) -> Result<Velocity> {
    check_speed(speed)?;
    if !heading_deg.is_finite() {
        return Err(ColregsError::input(format!(
            "heading must be finite, got {heading_deg}"
        )));
    }
    let h = heading_deg.to_radians();
    Ok(Velocity::new(speed * h.sin(), speed * h.cos()))
}

/// Inverse of [`heading_to_velocity`]: returns `(heading_deg, speed)`.
/// A zero vector yields heading 0.
pub fn velocity_to_heading_speed(velocity: &Velocity) -> (f64, f64) {
    let speed = velocity.norm();
    let heading = velocity.x.atan2(velocity.y).to_degrees();
    (normalize_angle_360(heading), speed)
}

/// Compass bearing (deg, [0,360)) of the vector from `from` to `to`.
fn compass_bearing(from: &Position, to: &Position) -> f64 {
    let d = to - from;
    normalize_angle_360(d.x.atan2(d.y).to_degrees())
}

/// Bearing of the target measured clockwise from own-ship's bow, [0, 360).
pub fn relative_bearing(os_position: &Position, os_heading: f64, ts_position: &Position) -> f64 {
    normalize_angle_360(compass_bearing(os_position, ts_position) - os_heading)
}

/// Target heading relative to own heading, [0, 360). 180° = reciprocal.
pub fn relative_course(os_heading: f64, ts_heading: f64) -> f64 {
    normalize_angle_360(ts_heading - os_heading)
}

/// Bearing of own-ship as seen from the target's bow, [0, 360).
pub fn aspect_angle(ts_heading: f64, os_position: &Position, ts_position: &Position) -> f64 {
    relative_bearing(ts_position, ts_heading, os_position)
}

/// Signed bearing rate (deg/s) from two bearing samples `dt` seconds apart.
///
/// The difference is wrapped to [-180, 180) so a pass through 0°/360° reads
/// as a small change, not a jump of ~360°.
pub fn bearing_rate(bearing_t0: f64, bearing_t1: f64, dt: f64) -> Result<f64> {
    if !(dt.is_finite() && dt > 0.0) {
        return Err(ColregsError::input(format!(
            "bearing sample interval must be > 0, got {dt}"
        )));
    }
    Ok(normalize_angle(bearing_t1 - bearing_t0) / dt)
}

/// Instantaneous bearing rate (deg/s) from relative motion:
/// `(r × v_rel) / |r|²`, sign flipped so that positive means the bearing is
/// increasing clockwise. Returns 0 when the range is ~0.
pub fn bearing_rate_from_motion(
    os_position: &Position,
    os_velocity: &Velocity,
    ts_position: &Position,
    ts_velocity: &Velocity,
) -> f64 {
    let r = ts_position - os_position;
    let range_sq = r.norm_squared();
    if range_sq < MIN_RANGE {
        return 0.0;
    }
    let v = relative_velocity(os_velocity, ts_velocity);
    let cross = r.x * v.y - r.y * v.x;
    // Compass bearings increase clockwise, the cross product counter-clockwise
    (-cross / range_sq).to_degrees()
}

/// Velocity of the target relative to own-ship.
pub fn relative_velocity(os_velocity: &Velocity, ts_velocity: &Velocity) -> Velocity {
    ts_velocity - os_velocity
}

/// Euclidean distance (m).
pub fn distance(p1: &Position, p2: &Position) -> f64 {
    (p2 - p1).norm()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn normalization_ranges() {
        assert_abs_diff_eq!(normalize_angle_360(-10.0), 350.0, epsilon = 1e-12);
        assert_abs_diff_eq!(normalize_angle_360(720.0), 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(normalize_angle(190.0), -170.0, epsilon = 1e-12);
        assert_abs_diff_eq!(normalize_angle(-180.0), -180.0, epsilon = 1e-12);
        assert!(normalize_angle_360(-1e-18) < 360.0);
    }

    #[test]
    fn heading_to_velocity_cardinal_points() {
        let v = heading_to_velocity(0.0, 10.0).unwrap();
        assert_abs_diff_eq!(v.x, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(v.y, 10.0, epsilon = 1e-9);

        let v = heading_to_velocity(90.0, 10.0).unwrap();
        assert_abs_diff_eq!(v.x, 10.0, epsilon = 1e-9);
        assert_abs_diff_eq!(v.y, 0.0, epsilon = 1e-9);

        let v = heading_to_velocity(270.0, 5.0).unwrap();
        assert_abs_diff_eq!(v.x, -5.0, epsilon = 1e-9);
    }

    #[test]
    fn negative_speed_is_rejected() {
        assert!(matches!(
            heading_to_velocity(0.0, -1.0),
            Err(ColregsError::InvalidInput(_))
        ));
        assert!(heading_to_velocity(0.0, f64::NAN).is_err());
    }

    #[test]
    fn velocity_heading_inverse() {
        let v = heading_to_velocity(237.0, 7.5).unwrap();
        let (h, s) = velocity_to_heading_speed(&v);
        assert_abs_diff_eq!(h, 237.0, epsilon = 1e-9);
        assert_abs_diff_eq!(s, 7.5, epsilon = 1e-9);
    }

    #[test]
    fn relative_bearing_rotates_by_heading() {
        let os = Position::new(0.0, 0.0);
        // Target due east
        let ts = Position::new(1000.0, 0.0);
        assert_abs_diff_eq!(relative_bearing(&os, 0.0, &ts), 90.0, epsilon = 1e-9);
        assert_abs_diff_eq!(relative_bearing(&os, 90.0, &ts), 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(relative_bearing(&os, 180.0, &ts), 270.0, epsilon = 1e-9);
    }

    #[test]
    fn scenario_bearing_and_range() {
        let os = Position::new(0.0, 0.0);
        let ts = Position::new(1000.0, 500.0);
        assert_abs_diff_eq!(relative_bearing(&os, 0.0, &ts), 63.4349, epsilon = 1e-3);
        assert_abs_diff_eq!(distance(&os, &ts), 1118.034, epsilon = 1e-3);
    }

    #[test]
    fn relative_course_and_aspect() {
        assert_abs_diff_eq!(relative_course(350.0, 170.0), 180.0, epsilon = 1e-12);
        assert_abs_diff_eq!(relative_course(10.0, 0.0), 350.0, epsilon = 1e-12);

        // Own-ship south of a north-bound target: dead astern of it
        let os = Position::new(0.0, 0.0);
        let ts = Position::new(0.0, 1000.0);
        assert_abs_diff_eq!(aspect_angle(0.0, &os, &ts), 180.0, epsilon = 1e-9);
    }

    #[test]
    fn bearing_rate_wraps_through_north() {
        let rate = bearing_rate(359.0, 1.0, 2.0).unwrap();
        assert_abs_diff_eq!(rate, 1.0, epsilon = 1e-12);
        let rate = bearing_rate(1.0, 359.0, 1.0).unwrap();
        assert_abs_diff_eq!(rate, -2.0, epsilon = 1e-12);
        assert!(bearing_rate(0.0, 1.0, 0.0).is_err());
    }

    #[test]
    fn kinematic_bearing_rate() {
        let os = Position::new(0.0, 0.0);
        let os_v = heading_to_velocity(0.0, 10.0).unwrap();
        // Reciprocal course, dead ahead: bearing never changes
        let ts = Position::new(0.0, 1000.0);
        let ts_v = heading_to_velocity(180.0, 10.0).unwrap();
        assert_abs_diff_eq!(bearing_rate_from_motion(&os, &os_v, &ts, &ts_v), 0.0, epsilon = 1e-12);

        // Stationary target to starboard of a north-bound own-ship draws aft
        let ts = Position::new(100.0, 0.0);
        let still = Velocity::zeros();
        let rate = bearing_rate_from_motion(&os, &os_v, &ts, &still);
        assert!(rate > 0.0, "bearing 90° should increase, got {rate}");

        // Finite difference agrees
        let dt = 0.01;
        let b0 = relative_bearing(&os, 0.0, &ts);
        let b1 = relative_bearing(&(os + os_v * dt), 0.0, &ts);
        assert_abs_diff_eq!(rate, bearing_rate(b0, b1, dt).unwrap(), epsilon = 1e-2);

        assert_eq!(bearing_rate_from_motion(&os, &os_v, &os, &ts_v), 0.0);
    }
}
