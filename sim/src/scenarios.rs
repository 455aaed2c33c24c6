//! Scenario definitions.
//!
//! Each scenario is a named own-ship/target arrangement reproducing one
//! encounter type. All scenarios are deterministic.

use crate::{
    env::NavigationEnv,
    vessel::{MotionSpec, Vessel},
};
use colregs_core::{ColregsAnalyzer, ColregsConfig, Result, VesselState};
use serde::{Deserialize, Serialize};

/// Which pre-defined scenario to load.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ScenarioKind {
    /// Reciprocal courses, 2 km apart
    HeadOn,
    /// Target crossing from the starboard bow
    CrossingGiveWay,
    /// Target crossing from the port bow
    CrossingStandOn,
    /// Faster own-ship with a slower target astern on the same course
    Overtaking,
    /// Head-on, two crossers and one distant target at once
    MultiTarget,
    /// Converging courses; the picture changes as the vessels close
    Dynamic,
    /// Target turning across own-ship's bow
    Turning,
}

/// A fully configured scenario.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    pub dt: f64,
    pub steps: u64,
    pub own: Vessel,
    pub targets: Vec<Vessel>,
}

fn own(x: f64, y: f64, heading: f64, speed: f64) -> Vessel {
    Vessel::new(0, "OS", VesselState::new(x, y, heading, speed))
}

fn ts(id: u64, x: f64, y: f64, heading: f64, speed: f64) -> Vessel {
    Vessel::new(id, format!("TS-{id:02}"), VesselState::new(x, y, heading, speed))
}

impl Scenario {
    pub fn build(kind: ScenarioKind) -> Self {
        let (name, own, targets, steps) = match kind {
            ScenarioKind::HeadOn => (
                "head-on",
                own(0.0, 0.0, 0.0, 10.0),
                vec![ts(1, 0.0, 2000.0, 180.0, 10.0)],
                10,
            ),
            ScenarioKind::CrossingGiveWay => (
                "crossing-give-way",
                own(0.0, 0.0, 0.0, 10.0),
                vec![ts(2, 1000.0, 1000.0, 270.0, 12.0)],
                15,
            ),
            ScenarioKind::CrossingStandOn => (
                "crossing-stand-on",
                own(0.0, 0.0, 0.0, 10.0),
                vec![ts(3, -1000.0, 1000.0, 90.0, 12.0)],
                15,
            ),
            ScenarioKind::Overtaking => (
                "overtaking",
                own(0.0, 1000.0, 0.0, 15.0),
                vec![ts(4, 0.0, 0.0, 0.0, 8.0)],
                20,
            ),
            ScenarioKind::MultiTarget => (
                "multi-target",
                own(0.0, 0.0, 0.0, 10.0),
                vec![
                    ts(1, 0.0, 1500.0, 180.0, 10.0),
                    ts(2, 1200.0, 1200.0, 270.0, 12.0),
                    ts(3, -1000.0, 1000.0, 90.0, 11.0),
                    ts(4, 3000.0, 0.0, 180.0, 9.0),
                ],
                10,
            ),
            ScenarioKind::Dynamic => (
                "dynamic",
                own(0.0, 0.0, 45.0, 10.0),
                vec![ts(5, 2000.0, 0.0, 315.0, 10.0)],
                30,
            ),
            ScenarioKind::Turning => (
                "turning",
                own(0.0, 0.0, 0.0, 8.0),
                vec![ts(6, -1200.0, 1500.0, 120.0, 10.0)
                    .with_motion(MotionSpec::ConstantTurn { rate: -0.5 })],
                60,
            ),
        };

        Scenario {
            name: name.into(),
            dt: 1.0,
            steps,
            own,
            targets,
        }
    }

    /// Default configuration for scenarios: a 2.5 km classification range.
    pub fn default_config() -> ColregsConfig {
        let mut config = ColregsConfig::default();
        config.encounter.safe_distance = 2500.0;
        config
    }

    pub fn into_env(self, config: ColregsConfig) -> Result<NavigationEnv> {
        let analyzer = ColregsAnalyzer::new(config)?;
        let mut env = NavigationEnv::new(analyzer, self.own, self.dt);
        for t in self.targets {
            env.add_target(t);
        }
        Ok(env)
    }
}
