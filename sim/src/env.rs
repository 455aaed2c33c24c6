//! Stepping navigation environment: own-ship plus targets, analysed each step.

use crate::vessel::Vessel;
use colregs_core::{
    risk::rank_order, ColregsAnalyzer, EncounterReport, Result, TargetId, VesselState,
};
use serde::{Deserialize, Serialize};

/// One target as seen at a given step.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TargetObservation {
    pub name: String,
    pub state: VesselState,
    pub report: EncounterReport,
}

/// Snapshot of the whole picture at one step.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Observation {
    pub step: u64,
    pub time: f64,
    pub own: VesselState,
    /// In the order the targets were added
    pub targets: Vec<TargetObservation>,
}

impl Observation {
    /// Highest-ranked target that requires action, if any.
    pub fn most_dangerous(&self) -> Option<&TargetObservation> {
        self.targets
            .iter()
            .filter(|t| t.report.risk.requires_action)
            .min_by(|a, b| {
                rank_order(
                    a.report.target_id,
                    &a.report.risk,
                    b.report.target_id,
                    &b.report.risk,
                )
            })
    }

    pub fn requiring_action(&self) -> usize {
        self.targets
            .iter()
            .filter(|t| t.report.risk.requires_action)
            .count()
    }
}

/// Upper bound on frames reserved up front; longer runs grow as they go.
const PREALLOC_FRAMES: u64 = 4096;

fn frame_capacity(steps: u64) -> usize {
    // Bounded by PREALLOC_FRAMES + 1, so the cast cannot truncate
    steps.min(PREALLOC_FRAMES) as usize + 1
}

pub struct NavigationEnv {
    pub analyzer: ColregsAnalyzer,
    pub own: Vessel,
    pub targets: Vec<Vessel>,
    pub dt: f64,
    step: u64,
}

impl NavigationEnv {
    pub fn new(analyzer: ColregsAnalyzer, own: Vessel, dt: f64) -> Self {
        Self {
            analyzer,
            own,
            targets: Vec::new(),
            dt,
            step: 0,
        }
    }

    pub fn add_target(&mut self, target: Vessel) {
        self.targets.push(target);
    }

    pub fn time(&self) -> f64 {
        self.step as f64 * self.dt
    }

    /// Classify and assess every target at the current step.
    pub fn observe(&self) -> Result<Observation> {
        let targets = self
            .targets
            .iter()
            .map(|t| {
                let report = self
                    .analyzer
                    .analyze(&self.own.state, TargetId(t.id), &t.state)?;
                Ok(TargetObservation {
                    name: t.name.clone(),
                    state: t.state,
                    report,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Observation {
            step: self.step,
            time: self.time(),
            own: self.own.state,
            targets,
        })
    }

    /// Advance all vessels by `dt` and observe.
    pub fn step(&mut self) -> Result<Observation> {
        self.own.step(self.dt);
        for t in &mut self.targets {
            t.step(self.dt);
        }
        self.step += 1;
        let obs = self.observe()?;
        if let Some(top) = obs.most_dangerous() {
            tracing::debug!(
                step = obs.step,
                target = %top.name,
                level = %top.report.risk.risk_level,
                "most dangerous target"
            );
        }
        Ok(obs)
    }

    /// Observe the initial state, then step `steps` times.
    pub fn run(&mut self, steps: u64) -> Result<Vec<Observation>> {
        let mut frames = Vec::with_capacity(frame_capacity(steps));
        frames.push(self.observe()?);
        for _ in 0..steps {
            frames.push(self.step()?);
        }
        Ok(frames)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
