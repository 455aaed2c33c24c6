//! `sim`: Encounter simulator: vessel motion, named scenarios, replay.

pub mod env;
pub mod replay;
pub mod scenarios;
pub mod vessel;

pub use env::{NavigationEnv, Observation, TargetObservation};
pub use replay::{load_replay, save_replay, ReplayLog};
pub use scenarios::{Scenario, ScenarioKind};
pub use vessel::{MotionSpec, Vessel};
