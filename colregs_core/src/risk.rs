//! Collision-risk assessment from CPA kinematics, and target ranking.
//!
//! # Scoring
//! score = dcpa_band + tcpa_band          (each 0..=4)
//! score ×= cbdr_amplification            if constant bearing, decreasing range
//! level  = cutoffs(score)
//!
//! A TCPA that is negative (CPA passed) or infinite (range constant) falls in
//! the lowest time band. The time band also only counts while the DCPA lies
//! inside the outermost distance band, unless `tcpa_requires_dcpa_band` is off.
//!
//! # Ranking
//! Targets are ordered by (risk level desc, DCPA asc, TCPA asc, id asc).

use crate::{
    config::RiskConfig,
    cpa::calculate_cpa_tcpa,
    error::{ColregsError, Result},
    geometry::{bearing_rate_from_motion, distance},
    types::{
        EncounterType, Position, RankedTarget, RiskAssessmentResult, RiskLevel, TargetId,
        TargetKinematics, Velocity,
    },
};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

// ---------------------------------------------------------------------------
// Recommended actions
// ---------------------------------------------------------------------------

/// Fixed action class for each encounter type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionClass {
    AlterCourseToStarboard,
    GiveWay,
    StandOn,
    KeepClear,
    MaintainWatch,
}

impl ActionClass {
    pub fn description(&self) -> &'static str {
        match self {
            ActionClass::AlterCourseToStarboard => {
                "alter course to starboard so that both vessels pass port to port"
            }
            ActionClass::GiveWay => {
                "alter course to starboard or reduce speed; avoid crossing ahead of the target"
            }
            ActionClass::StandOn => {
                "maintain course and speed; act alone if the give-way vessel does not"
            }
            ActionClass::KeepClear => {
                "keep out of the way of the vessel being overtaken until finally past and clear"
            }
            ActionClass::MaintainWatch => "no obligation; maintain a proper lookout",
        }
    }

    /// COLREGs rule(s) the action derives from.
    pub fn rule(&self) -> &'static str {
        match self {
            ActionClass::AlterCourseToStarboard => "Rule 14",
            ActionClass::GiveWay => "Rules 15, 16",
            ActionClass::StandOn => "Rule 17",
            ActionClass::KeepClear => "Rule 13",
            ActionClass::MaintainWatch => "Rule 5",
        }
    }
}

/// Look up the action class for an encounter type.
pub fn recommended_action(encounter_type: EncounterType) -> ActionClass {
    match encounter_type {
        EncounterType::HeadOn => ActionClass::AlterCourseToStarboard,
        EncounterType::CrossingGiveWay => ActionClass::GiveWay,
        EncounterType::CrossingStandOn => ActionClass::StandOn,
        EncounterType::Overtaking => ActionClass::KeepClear,
        EncounterType::Overtaken => ActionClass::StandOn,
        EncounterType::Safe => ActionClass::MaintainWatch,
    }
}

// ---------------------------------------------------------------------------
// Assessor
// ---------------------------------------------------------------------------

/// Score 4, 3, 2, 1 for values below each ascending cutoff; 0 beyond.
fn band_score(value: f64, bands: &[f64; 4]) -> f64 {
    if !value.is_finite() || value < 0.0 {
        return 0.0;
    }
    bands
        .iter()
        .position(|b| value < *b)
        .map_or(0.0, |i| (bands.len() - i) as f64)
}

fn check_finite(what: &str, v: &Position) -> Result<()> {
    if v.x.is_finite() && v.y.is_finite() {
        Ok(())
    } else {
        Err(ColregsError::input(format!("{what} must be finite")))
    }
}

/// Total order used for ranking: level desc, DCPA asc, TCPA asc, id asc.
pub fn rank_order(
    a_id: TargetId,
    a: &RiskAssessmentResult,
    b_id: TargetId,
    b: &RiskAssessmentResult,
) -> Ordering {
    b.risk_level
        .cmp(&a.risk_level)
        .then(a.dcpa.total_cmp(&b.dcpa))
        .then(a.tcpa.total_cmp(&b.tcpa))
        .then(a_id.cmp(&b_id))
}

/// Stateless risk engine carrying its own thresholds.
#[derive(Clone, Debug, Default)]
pub struct RiskAssessor {
    config: RiskConfig,
}

impl RiskAssessor {
    pub fn new(config: RiskConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &RiskConfig {
        &self.config
    }

    pub fn dcpa_score(&self, dcpa: f64) -> f64 {
        band_score(dcpa, &self.config.dcpa_bands)
    }

    pub fn tcpa_score(&self, tcpa: f64) -> f64 {
        band_score(tcpa, &self.config.tcpa_bands)
    }

    /// Risk score for given CPA figures. Pure in its arguments and config.
    ///
    /// The TCPA band is dropped when the CPA lies outside the DCPA bands or,
    /// with `tcpa_requires_closing`, when the range is not decreasing
    /// (`tcpa <= 0`). With both flags off this is the plain band sum.
    pub fn score(&self, dcpa: f64, tcpa: f64, constant_bearing: bool) -> f64 {
        let d = self.dcpa_score(dcpa);
        let gated = (self.config.tcpa_requires_dcpa_band && d == 0.0)
            || (self.config.tcpa_requires_closing && (tcpa <= 0.0 || tcpa.is_nan()));
        let t = if gated { 0.0 } else { self.tcpa_score(tcpa) };
        let base = d + t;
        if constant_bearing {
            base * self.config.cbdr_amplification
        } else {
            base
        }
    }

    pub fn level(&self, dcpa: f64, tcpa: f64, constant_bearing: bool) -> RiskLevel {
        self.config
            .risk_level_cutoffs
            .level(self.score(dcpa, tcpa, constant_bearing))
    }

    /// Assess one target. The bearing rate is re-derived from the kinematics
    /// when `derive_bearing_rate` is set, otherwise CBDR is not evaluated.
    pub fn assess(
        &self,
        os_position: &Position,
        os_velocity: &Velocity,
        ts_position: &Position,
        ts_velocity: &Velocity,
    ) -> Result<RiskAssessmentResult> {
        let rate = self.config.derive_bearing_rate.then(|| {
            bearing_rate_from_motion(os_position, os_velocity, ts_position, ts_velocity)
        });
        self.assess_with_bearing_rate(os_position, os_velocity, ts_position, ts_velocity, rate)
    }

    /// Assess one target using a caller-supplied bearing rate (deg/s), e.g.
    /// from [`crate::geometry::bearing_rate`] over two observed bearings.
    /// `None` skips CBDR amplification.
    pub fn assess_with_bearing_rate(
        &self,
        os_position: &Position,
        os_velocity: &Velocity,
        ts_position: &Position,
        ts_velocity: &Velocity,
        bearing_rate: Option<f64>,
    ) -> Result<RiskAssessmentResult> {
        check_finite("own-ship position", os_position)?;
        check_finite("own-ship velocity", os_velocity)?;
        check_finite("target position", ts_position)?;
        check_finite("target velocity", ts_velocity)?;
        if bearing_rate.is_some_and(|r| !r.is_finite()) {
            return Err(ColregsError::input("bearing rate must be finite"));
        }

        let cpa = calculate_cpa_tcpa(os_position, os_velocity, ts_position, ts_velocity);
        let range = distance(os_position, ts_position);

        let constant_bearing = bearing_rate
            .is_some_and(|r| r.abs() < self.config.cbdr_bearing_rate_threshold)
            && cpa.is_closing();

        let risk_score = self.score(cpa.dcpa, cpa.tcpa, constant_bearing);
        let risk_level = self.config.risk_level_cutoffs.level(risk_score);
        let requires_action = risk_level >= self.config.action_threshold;

        tracing::debug!(
            dcpa = cpa.dcpa,
            tcpa = cpa.tcpa,
            risk_score,
            %risk_level,
            constant_bearing,
            "assessed target"
        );

        Ok(RiskAssessmentResult {
            dcpa: cpa.dcpa,
            tcpa: cpa.tcpa,
            distance: range,
            bearing_rate,
            risk_level,
            risk_score,
            requires_action,
            constant_bearing,
        })
    }

    /// Assess every target and order them most dangerous first.
    pub fn rank(
        &self,
        os_position: &Position,
        os_velocity: &Velocity,
        targets: &[TargetKinematics],
    ) -> Result<Vec<RankedTarget>> {
        let mut ranked = targets
            .par_iter()
            .map(|t| {
                self.assess(os_position, os_velocity, &t.position, &t.velocity)
                    .map(|assessment| RankedTarget {
                        id: t.id,
                        assessment,
                    })
            })
            .collect::<Result<Vec<_>>>()?;
        ranked.sort_by(|a, b| rank_order(a.id, &a.assessment, b.id, &b.assessment));
        Ok(ranked)
    }

    /// Top-ranked target, if it requires action.
    pub fn most_dangerous(
        &self,
        os_position: &Position,
        os_velocity: &Velocity,
        targets: &[TargetKinematics],
    ) -> Result<Option<RankedTarget>> {
        let ranked = self.rank(os_position, os_velocity, targets)?;
        Ok(ranked
            .into_iter()
            .next()
            .filter(|r| r.assessment.requires_action))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
