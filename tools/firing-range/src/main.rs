//! firing-range: headless driver for the GEMFIRE emitter simulation.
//!
//! Usage:
//!   firing-range run --ticks 600 --targets 8
//!   firing-range run --config tuning.json --script drill.json --seed 7
//!   firing-range catalogue > tuning.json
//!   firing-range validate --config tuning.json

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use glam::DVec2;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use gemfire_core::commands::{InputFrame, SimCommand};
use gemfire_core::config::Tuning;
use gemfire_core::events::SimEvent;
use gemfire_core::state::{EmitterView, FrameSnapshot};
use gemfire_sim::engine::SimConfig;
use gemfire_sim::SimulationEngine;

#[derive(Parser)]
#[command(name = "firing-range")]
#[command(about = "Run scripted firing drills against the GEMFIRE simulation")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run a drill and print a JSON summary.
    Run {
        /// Tuning file (JSON). Defaults to the built-in catalogue.
        #[arg(long)]
        config: Option<PathBuf>,
        /// Drill script (JSON). Defaults to holding fire toward +x.
        #[arg(long)]
        script: Option<PathBuf>,
        /// Ticks to run when no script is given.
        #[arg(long, default_value_t = 600)]
        ticks: u64,
        #[arg(long, default_value_t = 42)]
        seed: u64,
        /// Enemies scattered inside the detection region at start.
        #[arg(long, default_value_t = 0)]
        targets: usize,
        /// Bullet type selected at start.
        #[arg(long, default_value_t = 0)]
        bullet_type: usize,
    },
    /// Print the built-in tuning as JSON.
    Catalogue,
    /// Check a tuning file and report the first problem found.
    Validate {
        #[arg(long)]
        config: PathBuf,
    },
}

/// A drill: steps run in order, each holding one input frame.
#[derive(Debug, Deserialize)]
struct Script {
    steps: Vec<Step>,
}

#[derive(Debug, Deserialize)]
struct Step {
    /// Ticks to hold `input` for.
    ticks: u64,
    #[serde(default)]
    input: InputFrame,
    /// Commands queued before the first tick of the step.
    #[serde(default)]
    commands: Vec<SimCommand>,
}

#[derive(Debug, Default, Serialize)]
struct Summary {
    ticks: u64,
    elapsed_secs: f64,
    shots: u32,
    alt_shots: u32,
    alt_rejections: u32,
    hits: u32,
    targets_destroyed: u32,
    sub_projectiles: u32,
    resolutions: BTreeMap<String, u32>,
    emitter: EmitterView,
}

impl Summary {
    fn record(&mut self, snap: &FrameSnapshot) {
        for event in &snap.events {
            match event {
                SimEvent::ShotFired { alt: false, .. } => self.shots += 1,
                SimEvent::ShotFired { alt: true, .. } => self.alt_shots += 1,
                SimEvent::AltFireRejected { .. } => self.alt_rejections += 1,
                SimEvent::Damage { .. } => self.hits += 1,
                SimEvent::TargetDestroyed { .. } => self.targets_destroyed += 1,
                SimEvent::SubProjectilesSpawned { count, .. } => self.sub_projectiles += count,
                SimEvent::ProjectileResolved { cause, .. } => {
                    *self.resolutions.entry(format!("{cause:?}")).or_default() += 1;
                }
                _ => {}
            }
        }
        self.ticks = snap.time.tick;
        self.elapsed_secs = snap.time.elapsed_secs;
        self.emitter = snap.emitter.clone();
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::filter::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    match args.command {
        Command::Run {
            config,
            script,
            ticks,
            seed,
            targets,
            bullet_type,
        } => {
            let tuning = load_tuning(config.as_deref())?;
            let script = match script {
                Some(path) => load_script(&path)?,
                None => default_script(ticks),
            };
            let summary = run_drill(tuning, &script, seed, targets, bullet_type);
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        Command::Catalogue => {
            println!("{}", serde_json::to_string_pretty(&Tuning::default())?);
        }
        Command::Validate { config } => {
            let tuning = load_tuning(Some(&config))?;
            println!(
                "{}: ok ({} bullet types)",
                config.display(),
                tuning.bullet_types.len()
            );
        }
    }
    Ok(())
}

fn load_tuning(path: Option<&Path>) -> Result<Tuning> {
    let tuning = match path {
        Some(path) => Tuning::from_json_file(path)
            .with_context(|| format!("failed to load tuning from {}", path.display()))?,
        None => {
            let tuning = Tuning::default();
            tuning.validate().context("invalid default tuning")?;
            tuning
        }
    };
    Ok(tuning)
}

fn load_script(path: &Path) -> Result<Script> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read script {}", path.display()))?;
    let script: Script = serde_json::from_str(&text)
        .with_context(|| format!("failed to parse script {}", path.display()))?;
    if script.steps.is_empty() {
        bail!("script {} has no steps", path.display());
    }
    Ok(script)
}

fn default_script(ticks: u64) -> Script {
    Script {
        steps: vec![Step {
            ticks,
            input: InputFrame {
                fire: true,
                alt_fire: false,
                aim: DVec2::new(10.0, 0.0),
            },
            commands: Vec::new(),
        }],
    }
}

fn run_drill(
    tuning: Tuning,
    script: &Script,
    seed: u64,
    targets: usize,
    bullet_type: usize,
) -> Summary {
    let mut engine = SimulationEngine::new(SimConfig { seed, tuning });
    engine.queue_command(SimCommand::StartSession);
    if bullet_type != 0 {
        engine.queue_command(SimCommand::SelectBulletType { index: bullet_type });
    }
    let mut summary = Summary::default();
    // Select first so the targets land inside the final detection region.
    summary.record(&engine.tick());
    engine.spawn_range_targets(targets);
    info!(seed, targets, steps = script.steps.len(), "drill started");

    for (i, step) in script.steps.iter().enumerate() {
        debug!(step = i, ticks = step.ticks, input = ?step.input, "step");
        engine.queue_commands(step.commands.iter().cloned());
        engine.set_input(step.input);
        for _ in 0..step.ticks {
            let snap = engine.tick();
            summary.record(&snap);
        }
    }

    info!(ticks = summary.ticks, hits = summary.hits, "drill finished");
    summary
}
