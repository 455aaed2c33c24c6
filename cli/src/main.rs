//! `colregs` CLI: one-shot encounter analysis and scenario runs.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colregs_core::{ColregsAnalyzer, ColregsConfig, TargetId, VesselState};
use sim::replay::{save_replay, ReplayLog};
use sim::scenarios::{Scenario, ScenarioKind};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "colregs", about = "COLREGs encounter classification and collision risk")]
struct Cli {
    /// JSON configuration file; missing fields take their defaults
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify the encounter between own-ship and one target.
    Classify {
        /// Own-ship as x,y,heading,speed (m, m, deg, m/s)
        #[arg(long, value_parser = parse_vessel, allow_hyphen_values = true)]
        own: VesselState,
        /// Target as x,y,heading,speed
        #[arg(long, value_parser = parse_vessel, allow_hyphen_values = true)]
        target: VesselState,
    },
    /// Assess collision risk against one or more targets, most dangerous first.
    Assess {
        #[arg(long, value_parser = parse_vessel, allow_hyphen_values = true)]
        own: VesselState,
        /// Repeat for each target
        #[arg(long, value_parser = parse_vessel, allow_hyphen_values = true, required = true)]
        target: Vec<VesselState>,
        /// Observed bearing rate (deg/s) for the first target, overriding the derived one
        #[arg(long, allow_hyphen_values = true)]
        bearing_rate: Option<f64>,
    },
    /// Run a named scenario and print the per-step picture.
    RunScenario {
        #[arg(value_enum)]
        scenario: ScenarioKind,
        /// Override the number of steps
        #[arg(long)]
        steps: Option<u64>,
        /// Override the step length (s)
        #[arg(long)]
        dt: Option<f64>,
        /// Save the full replay log
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

fn parse_vessel(s: &str) -> std::result::Result<VesselState, String> {
    let fields = s
        .split(',')
        .map(|f| f.trim().parse::<f64>().map_err(|e| format!("{f:?}: {e}")))
        .collect::<std::result::Result<Vec<_>, _>>()?;
    match fields.as_slice() {
        [x, y, heading, speed] => Ok(VesselState::new(*x, *y, *heading, *speed)),
        _ => Err(format!("expected x,y,heading,speed, got {} values", fields.len())),
    }
}

/// Longest run the CLI accepts; every step is kept in memory.
const MAX_STEPS: u64 = 1_000_000;

fn check_steps(steps: u64) -> Result<u64> {
    if steps > MAX_STEPS {
        bail!("--steps must be at most {MAX_STEPS}, got {steps}");
    }
    Ok(steps)
}

fn load_config(path: Option<&Path>) -> Result<Option<ColregsConfig>> {
    let Some(path) = path else {
        return Ok(None);
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    let config: ColregsConfig = serde_json::from_str(&text)
        .with_context(|| format!("parsing config {}", path.display()))?;
    Ok(Some(config))
}

fn report_warnings(analyzer: &ColregsAnalyzer) {
    for w in analyzer.warnings() {
        eprintln!("warning: {w}");
    }
}

fn build_analyzer(config: ColregsConfig) -> Result<ColregsAnalyzer> {
    let analyzer = ColregsAnalyzer::new(config)?;
    report_warnings(&analyzer);
    Ok(analyzer)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Classify { own, target } => {
            let analyzer = build_analyzer(config.unwrap_or_default())?;
            let situation = analyzer.classifier.classify(&own, &target)?;
            println!("{}", serde_json::to_string_pretty(&situation)?);
        }
        Commands::Assess {
            own,
            target,
            bearing_rate,
        } => {
            run_assess(config.unwrap_or_default(), &own, &target, bearing_rate)?;
        }
        Commands::RunScenario {
            scenario,
            steps,
            dt,
            output,
        } => {
            let config = config.unwrap_or_else(Scenario::default_config);
            run_scenario(config, scenario, steps, dt, output.as_deref())?;
        }
    }

    Ok(())
}

fn run_assess(
    config: ColregsConfig,
    own: &VesselState,
    targets: &[VesselState],
    bearing_rate: Option<f64>,
) -> Result<()> {
    let analyzer = build_analyzer(config)?;
    let targets: Vec<(TargetId, VesselState)> = targets
        .iter()
        .enumerate()
        .map(|(i, t)| (TargetId(i as u64 + 1), *t))
        .collect();
    let mut reports = analyzer.analyze_all(own, &targets)?;

    if let Some(rate) = bearing_rate {
        let first = targets[0].1;
        let risk = analyzer.assessor.assess_with_bearing_rate(
            &own.position,
            &own.velocity()?,
            &first.position,
            &first.velocity()?,
            Some(rate),
        )?;
        if let Some(r) = reports.iter_mut().find(|r| r.target_id == TargetId(1)) {
            r.risk = risk;
        }
        reports.sort_by(|a, b| {
            colregs_core::risk::rank_order(a.target_id, &a.risk, b.target_id, &b.risk)
        });
    }

    let out: Vec<_> = reports
        .iter()
        .map(|r| {
            serde_json::json!({
                "target": r.target_id.to_string(),
                "encounter": r.situation,
                "risk": r.risk,
                "urgency": r.risk.risk_level.urgency(),
                "action": r.action.description(),
                "rule": r.action.rule(),
            })
        })
        .collect();
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}

fn run_scenario(
    config: ColregsConfig,
    kind: ScenarioKind,
    steps: Option<u64>,
    dt: Option<f64>,
    output_path: Option<&Path>,
) -> Result<()> {
    let mut scenario = Scenario::build(kind);
    if let Some(dt) = dt {
        if !(dt.is_finite() && dt > 0.0) {
            bail!("--dt must be positive, got {dt}");
        }
        scenario.dt = dt;
    }
    let steps = check_steps(steps.unwrap_or(scenario.steps))?;
    let name = scenario.name.clone();
    let dt = scenario.dt;

    println!("Running scenario '{name}' ({steps} steps, dt={dt}s)...");
    let mut env = scenario.into_env(config)?;
    report_warnings(&env.analyzer);
    let frames = env.run(steps)?;

    for f in &frames {
        let line = f
            .targets
            .iter()
            .map(|t| {
                format!(
                    "{} {} {} dcpa={:.0} tcpa={:.0}",
                    t.name,
                    t.report.situation.encounter_type,
                    t.report.risk.risk_level,
                    t.report.risk.dcpa,
                    t.report.risk.tcpa,
                )
            })
            .collect::<Vec<_>>()
            .join(" | ");
        println!("t={:>6.1}s  {line}", f.time);
    }

    if let Some(top) = frames.last().and_then(|f| f.most_dangerous()) {
        println!(
            "Most dangerous at end: {} ({}, {})",
            top.name,
            top.report.risk.risk_level,
            top.report.action.description()
        );
    }

    if let Some(path) = output_path {
        let log = ReplayLog {
            scenario_name: name,
            dt,
            frames,
        };
        save_replay(&log, path)?;
        println!("Replay saved to {}", path.display());
    }

    Ok(())
}
