//! Combined per-target analysis: encounter type, collision risk, action.
//!
//! The two analyses stay independent; this only runs both with one
//! configuration and orders the reports the way [`RiskAssessor::rank`] does.

use crate::{
    config::{ColregsConfig, ConfigWarning},
    encounter::EncounterClassifier,
    error::Result,
    risk::{rank_order, recommended_action, ActionClass, RiskAssessor},
    types::{EncounterSituation, RiskAssessmentResult, TargetId, VesselState},
};
use serde::{Deserialize, Serialize};

/// Everything known about one target after a single evaluation.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EncounterReport {
    pub target_id: TargetId,
    pub situation: EncounterSituation,
    pub risk: RiskAssessmentResult,
    pub action: ActionClass,
}

#[derive(Clone, Debug, Default)]
pub struct ColregsAnalyzer {
    pub classifier: EncounterClassifier,
    pub assessor: RiskAssessor,
    warnings: Vec<ConfigWarning>,
}

impl ColregsAnalyzer {
    /// Each half of the configuration is validated exactly once.
    pub fn new(config: ColregsConfig) -> Result<Self> {
        let assessor = RiskAssessor::new(config.risk)?;
        let (classifier, warnings) = EncounterClassifier::with_warnings(config.encounter)?;
        Ok(Self {
            classifier,
            assessor,
            warnings,
        })
    }

    /// Findings from configuration validation (empty at defaults).
    pub fn warnings(&self) -> &[ConfigWarning] {
        &self.warnings
    }

    pub fn analyze(
        &self,
        own: &VesselState,
        target_id: TargetId,
        target: &VesselState,
    ) -> Result<EncounterReport> {
        let situation = self.classifier.classify(own, target)?;
        let risk = self.assessor.assess(
            &own.position,
            &own.velocity()?,
            &target.position,
            &target.velocity()?,
        )?;
        Ok(EncounterReport {
            target_id,
            situation,
            risk,
            action: recommended_action(situation.encounter_type),
        })
    }

    /// Analyze all targets, most dangerous first.
    pub fn analyze_all(
        &self,
        own: &VesselState,
        targets: &[(TargetId, VesselState)],
    ) -> Result<Vec<EncounterReport>> {
        let mut reports = targets
            .iter()
            .map(|(id, t)| self.analyze(own, *id, t))
            .collect::<Result<Vec<_>>>()?;
        reports.sort_by(|a, b| rank_order(a.target_id, &a.risk, b.target_id, &b.risk));
        Ok(reports)
    }
}
