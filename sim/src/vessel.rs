//! Vessel motion models and state propagation.
//!
//! Each vessel carries a heading/speed snapshot and a `MotionSpec` describing
//! how it moves. The environment steps every vessel forward in time.

use colregs_core::{geometry::normalize_angle_360, Position, VesselState};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Maximum number of past positions kept per vessel.
const HISTORY_LEN: usize = 500;

/// Describes how a vessel moves between steps.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum MotionSpec {
    /// Hold heading and speed.
    ConstantVelocity,
    /// Turn at a steady rate (deg/s, positive = to starboard) at constant speed.
    ConstantTurn { rate: f64 },
}

/// A simulated vessel with ground-truth state.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Vessel {
    pub id: u64,
    pub name: String,
    pub state: VesselState,
    pub motion: MotionSpec,
    /// Past positions, most recent first
    #[serde(skip)]
    pub history: VecDeque<Position>,
}

impl Vessel {
    pub fn new(id: u64, name: impl Into<String>, state: VesselState) -> Self {
        Self {
            id,
            name: name.into(),
            state,
            motion: MotionSpec::ConstantVelocity,
            history: VecDeque::new(),
        }
    }

    pub fn with_motion(mut self, motion: MotionSpec) -> Self {
        self.motion = motion;
        self
    }

    /// Propagate the state by `dt` seconds.
    pub fn step(&mut self, dt: f64) {
        self.history.push_front(self.state.position);
        if self.history.len() > HISTORY_LEN {
            self.history.pop_back();
        }

        let s = &mut self.state;
        match self.motion {
            MotionSpec::ConstantVelocity => {
                let h = s.heading.to_radians();
                s.position += Position::new(h.sin(), h.cos()) * (s.speed * dt);
            }
            MotionSpec::ConstantTurn { rate } => {
                // Advance along the mean heading of the step
                let mid = (s.heading + 0.5 * rate * dt).to_radians();
                s.position += Position::new(mid.sin(), mid.cos()) * (s.speed * dt);
                s.heading = normalize_angle_360(s.heading + rate * dt);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn constant_velocity_moves_along_heading() {
        let mut v = Vessel::new(0, "OS", VesselState::new(0.0, 0.0, 90.0, 10.0));
        v.step(2.0);
        assert_abs_diff_eq!(v.state.position.x, 20.0, epsilon = 1e-9);
        assert_abs_diff_eq!(v.state.position.y, 0.0, epsilon = 1e-9);
        assert_eq!(v.history.len(), 1);
    }

    #[test]
    fn constant_turn_changes_heading() {
        let mut v = Vessel::new(0, "OS", VesselState::new(0.0, 0.0, 350.0, 5.0))
            .with_motion(MotionSpec::ConstantTurn { rate: 3.0 });
        for _ in 0..10 {
            v.step(1.0);
        }
        assert_abs_diff_eq!(v.state.heading, 20.0, epsilon = 1e-9);
        assert_abs_diff_eq!(v.state.speed, 5.0, epsilon = 1e-12);
    }

    #[test]
    fn history_is_bounded() {
        let mut v = Vessel::new(0, "OS", VesselState::new(0.0, 0.0, 0.0, 1.0));
        for _ in 0..(HISTORY_LEN + 20) {
            v.step(1.0);
        }
        assert_eq!(v.history.len(), HISTORY_LEN);
    }
}
