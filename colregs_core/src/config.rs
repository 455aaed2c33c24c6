//! Threshold configuration for classification and risk assessment.
//!
//! Configurations are immutable values carried by each classifier/assessor
//! instance. Defaults reproduce the COLREGs angular definitions and the
//! standard DCPA/TCPA bands.

use crate::{
    error::{ColregsError, Result},
    geometry::normalize_angle_360,
    types::RiskLevel,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Tolerance for angular boundary comparisons (deg).
pub const ANGLE_EPSILON: f64 = 1e-9;

// ---------------------------------------------------------------------------
// Sector
// ---------------------------------------------------------------------------

/// Angular sector of relative bearings, measured clockwise from `from` to `to`.
///
/// If `from > to` the sector wraps through 0°/360°.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Sector {
    pub from: f64,
    pub to: f64,
    pub from_inclusive: bool,
    pub to_inclusive: bool,
}

impl Sector {
    pub const fn closed(from: f64, to: f64) -> Self {
        Self {
            from,
            to,
            from_inclusive: true,
            to_inclusive: true,
        }
    }

    pub const fn open(from: f64, to: f64) -> Self {
        Self {
            from,
            to,
            from_inclusive: false,
            to_inclusive: false,
        }
    }

    /// Closed sector of ±`half_width` around `center`.
    pub fn centered(center: f64, half_width: f64) -> Self {
        Self::closed(
            normalize_angle_360(center - half_width),
            normalize_angle_360(center + half_width),
        )
    }

    pub fn wraps(&self) -> bool {
        self.from > self.to
    }

    fn above_from(&self, b: f64) -> bool {
        if self.from_inclusive {
            b >= self.from - ANGLE_EPSILON
        } else {
            b > self.from + ANGLE_EPSILON
        }
    }

    fn below_to(&self, b: f64) -> bool {
        if self.to_inclusive {
            b <= self.to + ANGLE_EPSILON
        } else {
            b < self.to - ANGLE_EPSILON
        }
    }

    /// Membership test for a bearing (normalized to [0, 360) first).
    pub fn contains(&self, bearing: f64) -> bool {
        let b = normalize_angle_360(bearing);
        if self.wraps() {
            self.above_from(b) || self.below_to(b)
        } else {
            self.above_from(b) && self.below_to(b)
        }
    }

    /// True if some bearing lies in both sectors. Only defined for
    /// non-wrapping sectors, which is what validation admits.
    fn overlaps(&self, other: &Sector) -> bool {
        let lo = self.from.max(other.from);
        let hi = self.to.min(other.to);
        if lo < hi - ANGLE_EPSILON {
            true
        } else if (lo - hi).abs() <= ANGLE_EPSILON {
            self.contains(lo) && other.contains(lo)
        } else {
            false
        }
    }

    fn validate(&self, field: &'static str) -> Result<()> {
        for v in [self.from, self.to] {
            if !v.is_finite() || !(0.0..=360.0).contains(&v) {
                return Err(ColregsError::config(
                    field,
                    format!("bound {v} outside [0, 360]"),
                ));
            }
        }
        if self.from >= self.to {
            return Err(ColregsError::config(
                field,
                format!("inverted or empty sector ({}, {})", self.from, self.to),
            ));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Warnings
// ---------------------------------------------------------------------------

/// Non-fatal configuration finding.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum ConfigWarning {
    /// Two encounter sectors share bearings; evaluation order decides.
    SectorOverlap {
        first: &'static str,
        second: &'static str,
    },
}

impl fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigWarning::SectorOverlap { first, second } => write!(
                f,
                "sectors `{first}` and `{second}` overlap; `{first}` takes priority"
            ),
        }
    }
}

// ---------------------------------------------------------------------------
// Encounter classification config
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncounterConfig {
    /// Beyond this range (m) no encounter is reported
    pub safe_distance: f64,
    /// Half-angle of the dead-ahead sector used for head-on (deg)
    pub dead_ahead_half_width: f64,
    /// Max deviation of relative course from 180° for head-on (deg)
    pub reciprocal_course_tolerance: f64,
    /// Overtaking sector (Rule 13: more than 22.5° abaft the beam)
    pub stern_sector: Sector,
    /// Give-way crossing sector
    pub starboard_bow: Sector,
    /// Stand-on crossing sector
    pub port_bow: Sector,
    /// Also evaluate the target's frame to report OVERTAKEN
    pub infer_overtaken: bool,
}

impl Default for EncounterConfig {
    fn default() -> Self {
        Self {
            safe_distance: 2000.0,
            dead_ahead_half_width: 6.0,
            reciprocal_course_tolerance: 12.0,
            stern_sector: Sector::closed(112.5, 247.5),
            starboard_bow: Sector::open(5.0, 112.5),
            port_bow: Sector::open(247.5, 355.0),
            infer_overtaken: false,
        }
    }
}

impl EncounterConfig {
    pub fn with_safe_distance(mut self, safe_distance: f64) -> Self {
        self.safe_distance = safe_distance;
        self
    }

    pub fn dead_ahead_sector(&self) -> Sector {
        Sector::centered(0.0, self.dead_ahead_half_width)
    }

    /// Reject malformed bounds; report sector overlaps as warnings.
    pub fn validate(&self) -> Result<Vec<ConfigWarning>> {
        if !(self.safe_distance.is_finite() && self.safe_distance > 0.0) {
            return Err(ColregsError::config(
                "safe_distance",
                format!("must be > 0, got {}", self.safe_distance),
            ));
        }
        if !(self.dead_ahead_half_width > 0.0 && self.dead_ahead_half_width < 90.0) {
            return Err(ColregsError::config(
                "dead_ahead_half_width",
                format!("must be in (0, 90), got {}", self.dead_ahead_half_width),
            ));
        }
        if !(self.reciprocal_course_tolerance >= 0.0 && self.reciprocal_course_tolerance < 90.0) {
            return Err(ColregsError::config(
                "reciprocal_course_tolerance",
                format!("must be in [0, 90), got {}", self.reciprocal_course_tolerance),
            ));
        }
        self.stern_sector.validate("stern_sector")?;
        self.starboard_bow.validate("starboard_bow")?;
        self.port_bow.validate("port_bow")?;

        // The dead-ahead sector wraps through 0°; test its two halves.
        // Its overlap with the bow sectors at 5-6° and 354-355° is expected.
        let w = self.dead_ahead_half_width;
        let dead_ahead_stern = [Sector::closed(360.0 - w, 360.0), Sector::closed(0.0, w)]
            .iter()
            .any(|half| half.overlaps(&self.stern_sector));

        // Pairs listed in evaluation order
        let pairs = [
            ("stern_sector", &self.stern_sector, "starboard_bow", &self.starboard_bow),
            ("stern_sector", &self.stern_sector, "port_bow", &self.port_bow),
            ("starboard_bow", &self.starboard_bow, "port_bow", &self.port_bow),
        ];
        let overlapping = dead_ahead_stern
            .then_some(("dead_ahead", "stern_sector"))
            .into_iter()
            .chain(
                pairs
                    .into_iter()
                    .filter(|(_, a, _, b)| a.overlaps(b))
                    .map(|(first, _, second, _)| (first, second)),
            );

        let mut warnings = Vec::new();
        for (first, second) in overlapping {
            let w = ConfigWarning::SectorOverlap { first, second };
            tracing::warn!(%w, "encounter configuration");
            warnings.push(w);
        }
        Ok(warnings)
    }
}

// ---------------------------------------------------------------------------
// Risk assessment config
// ---------------------------------------------------------------------------

/// Score thresholds mapping a risk score to a [`RiskLevel`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LevelCutoffs {
    pub low: f64,
    pub medium: f64,
    pub high: f64,
    pub critical: f64,
}

impl Default for LevelCutoffs {
    fn default() -> Self {
        Self {
            low: 1.0,
            medium: 2.0,
            high: 3.0,
            critical: 4.0,
        }
    }
}

impl LevelCutoffs {
    pub fn level(&self, score: f64) -> RiskLevel {
        if score >= self.critical {
            RiskLevel::Critical
        } else if score >= self.high {
            RiskLevel::High
        } else if score >= self.medium {
            RiskLevel::Medium
        } else if score >= self.low {
            RiskLevel::Low
        } else {
            RiskLevel::Safe
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskConfig {
    /// Ascending DCPA cutoffs (m) scoring 4, 3, 2, 1 below each; 0 beyond
    pub dcpa_bands: [f64; 4],
    /// Ascending TCPA cutoffs (s) scoring 4, 3, 2, 1 below each; 0 beyond
    pub tcpa_bands: [f64; 4],
    /// |bearing rate| below this (deg/s) counts as constant bearing
    pub cbdr_bearing_rate_threshold: f64,
    /// Score multiplier applied under constant bearing
    pub cbdr_amplification: f64,
    pub risk_level_cutoffs: LevelCutoffs,
    /// Lowest level that sets `requires_action`
    pub action_threshold: RiskLevel,
    /// Derive the bearing rate from the kinematics when none is supplied
    pub derive_bearing_rate: bool,
    /// Count the TCPA band only when the DCPA falls inside the DCPA bands
    pub tcpa_requires_dcpa_band: bool,
    /// Count the TCPA band only while the range is decreasing (TCPA > 0)
    pub tcpa_requires_closing: bool,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            dcpa_bands: [200.0, 500.0, 1000.0, 2000.0],
            tcpa_bands: [300.0, 600.0, 1200.0, 1800.0],
            cbdr_bearing_rate_threshold: 0.1,
            cbdr_amplification: 1.2,
            risk_level_cutoffs: LevelCutoffs::default(),
            action_threshold: RiskLevel::Medium,
            derive_bearing_rate: true,
            tcpa_requires_dcpa_band: true,
            tcpa_requires_closing: true,
        }
    }
}

fn validate_bands(field: &'static str, bands: &[f64; 4]) -> Result<()> {
    if bands.iter().any(|b| !b.is_finite() || *b <= 0.0) {
        return Err(ColregsError::config(field, "bands must be finite and > 0"));
    }
    if bands.windows(2).any(|w| w[0] >= w[1]) {
        return Err(ColregsError::config(field, "bands must be strictly ascending"));
    }
    Ok(())
}

impl RiskConfig {
    pub fn validate(&self) -> Result<()> {
        validate_bands("dcpa_bands", &self.dcpa_bands)?;
        validate_bands("tcpa_bands", &self.tcpa_bands)?;
        let c = &self.risk_level_cutoffs;
        validate_bands("risk_level_cutoffs", &[c.low, c.medium, c.high, c.critical])?;
        if !(self.cbdr_bearing_rate_threshold.is_finite() && self.cbdr_bearing_rate_threshold > 0.0)
        {
            return Err(ColregsError::config(
                "cbdr_bearing_rate_threshold",
                format!("must be > 0, got {}", self.cbdr_bearing_rate_threshold),
            ));
        }
        if !(self.cbdr_amplification.is_finite() && self.cbdr_amplification >= 1.0) {
            return Err(ColregsError::config(
                "cbdr_amplification",
                format!("must be >= 1, got {}", self.cbdr_amplification),
            ));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Bundle
// ---------------------------------------------------------------------------

/// Complete configuration, loadable from a partial JSON document.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColregsConfig {
    pub encounter: EncounterConfig,
    pub risk: RiskConfig,
}

impl ColregsConfig {
    pub fn validate(&self) -> Result<Vec<ConfigWarning>> {
        self.risk.validate()?;
        self.encounter.validate()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
