//! Fundamental types used across the entire workspace.

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Vector types: local tangent plane, x = East, y = North, f64 throughout.
// ---------------------------------------------------------------------------

/// 2-D position [east, north] in meters
pub type Position = Vector2<f64>;

/// 2-D velocity [v_east, v_north] in m/s
pub type Velocity = Vector2<f64>;

// ---------------------------------------------------------------------------
// Identifier types
// ---------------------------------------------------------------------------

#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct TargetId(pub u64);

impl fmt::Display for TargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TS-{:02}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Kinematic snapshots
// ---------------------------------------------------------------------------

/// Snapshot of one vessel as supplied by the caller for a single evaluation.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct VesselState {
    pub position: Position,
    /// Heading in degrees, 0 = North, clockwise
    pub heading: f64,
    /// Speed over ground (m/s, >= 0)
    pub speed: f64,
}

impl VesselState {
    pub fn new(x: f64, y: f64, heading: f64, speed: f64) -> Self {
        Self {
            position: Position::new(x, y),
            heading,
            speed,
        }
    }

    /// Velocity vector derived from heading and speed.
    pub fn velocity(&self) -> crate::Result<Velocity> {
        crate::geometry::heading_to_velocity(self.heading, self.speed)
    }
}

/// Position/velocity pair for one target, as consumed by ranking.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TargetKinematics {
    pub id: TargetId,
    pub position: Position,
    pub velocity: Velocity,
}

// ---------------------------------------------------------------------------
// Encounter classification
// ---------------------------------------------------------------------------

/// Encounter category from own-ship's point of view.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EncounterType {
    /// Rule 14: reciprocal courses, target dead ahead
    HeadOn,
    /// Rule 15: target on the starboard bow, own-ship keeps out of the way
    CrossingGiveWay,
    /// Rule 15/17: target on the port bow, own-ship holds course and speed
    CrossingStandOn,
    /// Rule 13: own-ship is the overtaking vessel
    Overtaking,
    /// Rule 13: own-ship is being overtaken
    Overtaken,
    /// Out of range, or no defined encounter
    Safe,
}

impl EncounterType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EncounterType::HeadOn => "head_on",
            EncounterType::CrossingGiveWay => "crossing_give_way",
            EncounterType::CrossingStandOn => "crossing_stand_on",
            EncounterType::Overtaking => "overtaking",
            EncounterType::Overtaken => "overtaken",
            EncounterType::Safe => "safe",
        }
    }

    /// True if own-ship carries the obligation to manoeuvre.
    pub fn is_give_way(&self) -> bool {
        matches!(
            self,
            EncounterType::HeadOn | EncounterType::CrossingGiveWay | EncounterType::Overtaking
        )
    }
}

impl fmt::Display for EncounterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of a classification. Computed fresh per call.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EncounterSituation {
    pub encounter_type: EncounterType,
    /// Bearing of the target from own-ship's bow, [0, 360)
    pub relative_bearing: f64,
    /// Target heading minus own heading, [0, 360)
    pub relative_course: f64,
    /// Current range (m)
    pub distance: f64,
    /// Bearing of own-ship from the target's bow, [0, 360)
    pub aspect_angle: f64,
}

// ---------------------------------------------------------------------------
// Risk
// ---------------------------------------------------------------------------

/// TCPA is infinite when the range never changes; JSON has no infinity, so
/// it is written as `null` and read back as `f64::INFINITY`.
pub(crate) mod serde_tcpa {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(tcpa: &f64, s: S) -> Result<S::Ok, S::Error> {
        if tcpa.is_finite() {
            s.serialize_some(tcpa)
        } else {
            s.serialize_none()
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
        Ok(Option::<f64>::deserialize(d)?.unwrap_or(f64::INFINITY))
    }
}

/// Graded collision risk. Ordering is SAFE < LOW < MEDIUM < HIGH < CRITICAL.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    Safe,
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Safe => "SAFE",
            RiskLevel::Low => "LOW",
            RiskLevel::Medium => "MEDIUM",
            RiskLevel::High => "HIGH",
            RiskLevel::Critical => "CRITICAL",
        }
    }

    /// Fixed operator guidance for each level.
    pub fn urgency(&self) -> &'static str {
        match self {
            RiskLevel::Safe => "no action required",
            RiskLevel::Low => "monitor the target",
            RiskLevel::Medium => "prepare to manoeuvre",
            RiskLevel::High => "take avoiding action early",
            RiskLevel::Critical => "take immediate avoiding action",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of a risk assessment for one (own-ship, target) pair.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessmentResult {
    /// Distance at closest point of approach (m, >= 0)
    pub dcpa: f64,
    /// Time to CPA (s). Negative: CPA already passed. Infinite: not closing.
    #[serde(with = "serde_tcpa")]
    pub tcpa: f64,
    /// Current range (m)
    pub distance: f64,
    /// Bearing rate used for CBDR detection (deg/s), if one was available
    pub bearing_rate: Option<f64>,
    pub risk_level: RiskLevel,
    pub risk_score: f64,
    pub requires_action: bool,
    pub constant_bearing: bool,
}

impl RiskAssessmentResult {
    pub fn is_dangerous(&self) -> bool {
        self.risk_level >= RiskLevel::High
    }
}

/// One entry of a ranked target list.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RankedTarget {
    pub id: TargetId,
    pub assessment: RiskAssessmentResult,
}
