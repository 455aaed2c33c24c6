//! Closest point of approach under constant-velocity extrapolation.
//!
//! # Relative motion
//! r = p_ts − p_os,  v = v_ts − v_os
//! TCPA = −(r·v) / |v|²
//! DCPA = |r + v·TCPA|
//!
//! Closed form, no iteration. A negative TCPA is returned as-is: the CPA
//! already happened and the vessels are opening.

use crate::types::{Position, Velocity};
use serde::{Deserialize, Serialize};

/// Relative speed (m/s) below which the vessels are treated as holding range.
pub const MIN_RELATIVE_SPEED: f64 = 1e-6;

/// Output of [`calculate_cpa_tcpa`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CpaResult {
    /// Distance at closest approach (m, >= 0)
    pub dcpa: f64,
    /// Time to closest approach (s). `f64::INFINITY` when relative speed is ~0.
    #[serde(with = "crate::types::serde_tcpa")]
    pub tcpa: f64,
}

impl CpaResult {
    /// True when the range is currently decreasing.
    pub fn is_closing(&self) -> bool {
        self.tcpa.is_finite() && self.tcpa > 0.0
    }

    /// True when the CPA lies in the past.
    pub fn is_past(&self) -> bool {
        self.tcpa < 0.0
    }
}

/// Compute DCPA/TCPA for own-ship and target position/velocity pairs.
///
/// With |v_rel| below [`MIN_RELATIVE_SPEED`] the range never changes, so the
/// current range is the DCPA and the TCPA is infinite (never reached).
pub fn calculate_cpa_tcpa(
    os_position: &Position,
    os_velocity: &Velocity,
    ts_position: &Position,
    ts_velocity: &Velocity,
) -> CpaResult {
    let r = ts_position - os_position;
    let v = ts_velocity - os_velocity;

    let v_sq = v.norm_squared();
    if v_sq.sqrt() < MIN_RELATIVE_SPEED {
        return CpaResult {
            dcpa: r.norm(),
            tcpa: f64::INFINITY,
        };
    }

    let tcpa = -r.dot(&v) / v_sq;
    let dcpa = (r + v * tcpa).norm();

    CpaResult { dcpa, tcpa }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
