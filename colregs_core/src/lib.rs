//! `colregs_core`: COLREGs encounter classification and collision-risk
//! assessment for two-vessel encounters.
//!
//! # Module layout
//! - [`types`]: Vectors, vessel snapshots, encounter and risk results
//! - [`error`]: Error type
//! - [`config`]: Sector and band thresholds, validation
//! - [`geometry`]: Bearings, courses, bearing rate, range
//! - [`cpa`]: DCPA / TCPA under constant velocity
//! - [`encounter`]: Encounter classifier (Rules 13–15)
//! - [`risk`]: Risk scoring, CBDR, ranking, action lookup
//! - [`analyzer`]: Both analyses per target with one configuration
//!
//! All operations are pure: no state is kept between calls, so every
//! classifier and assessor can be shared freely across threads.

pub mod analyzer;
pub mod config;
pub mod cpa;
pub mod encounter;
pub mod error;
pub mod geometry;
pub mod risk;
pub mod types;

pub use analyzer::{ColregsAnalyzer, EncounterReport};
pub use config::{ColregsConfig, ConfigWarning, EncounterConfig, RiskConfig, Sector};
pub use cpa::{calculate_cpa_tcpa, CpaResult};
pub use encounter::EncounterClassifier;
pub use error::{ColregsError, Result};
pub use risk::{recommended_action, ActionClass, RiskAssessor};
pub use types::{
    EncounterSituation, EncounterType, Position, RankedTarget, RiskAssessmentResult, RiskLevel,
    TargetId, TargetKinematics, Velocity, VesselState,
};
