//! `warden` command line driver: runs a headless defence simulation.

use std::f32::consts::TAU;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use glam::Vec3;
use log::info;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use warden::{init_logging, DifficultyLevel, EntityType, Simulation, WardenConfig};

/// Guard an objective against a wave of attackers
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Number of steps to run
    #[arg(long, default_value_t = 600)]
    ticks: u64,
    /// Seconds per step
    #[arg(long, default_value_t = 1.0 / 30.0)]
    dt: f32,
    /// Difficulty level (1 to 5)
    #[arg(short, long)]
    difficulty: Option<i32>,
    /// Attackers in the wave
    #[arg(short, long, default_value_t = 12)]
    attackers: u32,
    /// Seed for the wave layout and patrol points
    #[arg(long, default_value_t = 7)]
    seed: u64,
}

const OBJECTIVE: Vec3 = Vec3::new(25.0, 0.0, 25.0);
const WAVE_RADIUS: f32 = 18.0;

fn spawn_wave(sim: &mut Simulation, count: u32, rng: &mut StdRng) {
    let types = EntityType::CANDIDATES.iter().copied().cycle();
    for entity_type in types.take(usize::try_from(count).unwrap_or(usize::MAX)) {
        let angle = rng.gen_range(0.0..TAU);
        let distance = WAVE_RADIUS * rng.gen_range(0.8..1.2);
        let position = OBJECTIVE + Vec3::new(angle.cos() * distance, 0.0, angle.sin() * distance);
        sim.spawn_unit(entity_type, position);
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = args.config.as_deref().map_or_else(
        || Ok(WardenConfig::default()),
        |path| {
            WardenConfig::from_path(path)
                .with_context(|| format!("loading configuration from {}", path.display()))
        },
    )?;
    let mut sim = Simulation::new(&config, OBJECTIVE, args.seed).context("building simulation")?;
    if let Some(level) = args.difficulty {
        sim.set_difficulty(DifficultyLevel::new(level));
    }
    let mut rng = StdRng::seed_from_u64(args.seed);
    spawn_wave(&mut sim, args.attackers, &mut rng);
    info!("spawned {} attackers around {OBJECTIVE}", sim.unit_count());

    for _ in 0..args.ticks {
        sim.step(args.dt);
        let tick = sim.ticks();
        for event in sim.drain_events() {
            info!("tick {tick}: {event:?}");
        }
        if sim.unit_count() == 0 {
            break;
        }
    }
    info!("{}", sim.summary());
    Ok(())
}
