//! Headless driver for the 2D DEM particle simulation
//!
//! Spawns a population, steps it frame by frame and publishes a snapshot per
//! frame the way a renderer would consume it. Throughput is logged once per
//! wall-clock second.

mod scenario;

use clap::Parser;
use particle_simulation::{diagnostics, ParticleInstance, SimulationState};
use scenario::Scenario;
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(about = "Headless 2D discrete-element particle simulation")]
struct Args {
    /// Scenario YAML file, reference values are used when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Frames to simulate
    #[arg(short, long, default_value_t = 600)]
    frames: u64,

    /// Override the spawned particle count
    #[arg(short, long)]
    particles: Option<usize>,

    /// Override the spawn seed
    #[arg(short, long)]
    seed: Option<u64>,
}

/// Frames per second over the last wall-clock second, plus a running average
struct FpsCounter {
    last_report: Instant,
    frames: u32,
    sum_fps: f64,
    reports: u32,
}

impl FpsCounter {
    fn new() -> Self {
        Self {
            last_report: Instant::now(),
            frames: 0,
            sum_fps: 0.0,
            reports: 0,
        }
    }

    /// Count a frame; returns `(fps, average_fps)` once a second has passed
    fn tick(&mut self) -> Option<(f64, f64)> {
        self.frames += 1;
        let elapsed = self.last_report.elapsed().as_secs_f64();
        if elapsed <= 1.0 {
            return None;
        }

        let fps = f64::from(self.frames) / elapsed;
        self.sum_fps += fps;
        self.reports += 1;
        self.frames = 0;
        self.last_report = Instant::now();
        Some((fps, self.sum_fps / f64::from(self.reports)))
    }
}

fn main() -> anyhow::Result<()> {
    // Initialize logger (RUST_LOG=debug for verbose output)
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let mut scenario = match &args.config {
        Some(path) => Scenario::load(path)?,
        None => Scenario::default(),
    };
    if let Some(count) = args.particles {
        scenario.spawn.count = count;
    }
    if let Some(seed) = args.seed {
        scenario.spawn.seed = seed;
    }

    log::info!("Starting DEM particle simulation...");

    let (particles, colors) = scenario.spawn.populate()?;
    let mut state = SimulationState::new(particles, scenario.physics.clone(), scenario.grid())?;

    let mut snapshot: Vec<ParticleInstance> = Vec::with_capacity(state.particles().len());
    let mut fps = FpsCounter::new();
    let started = Instant::now();

    for _ in 0..args.frames {
        let report = state.step_frame();
        state.snapshot(&colors, &mut snapshot);

        if !report.is_finite() {
            log::warn!(
                "frame {}: {} particles with non-finite state",
                state.frames(),
                report.non_finite.len()
            );
        }

        if let Some((current, average)) = fps.tick() {
            log::info!(
                "FPS: {:.1} - Ave-FPS: {:.1} - {} contacts last frame",
                current,
                average,
                report.contacts
            );
        }
    }

    let wall = started.elapsed().as_secs_f64();
    log::info!(
        "✓ {} frames ({} sub-steps, {:.3}s simulated) in {:.2}s",
        state.frames(),
        state.sub_steps(),
        state.elapsed(),
        wall
    );
    log::info!(
        "  kinetic energy {:.4}, momentum {:.4}, {} occupied cells",
        diagnostics::kinetic_energy(state.particles()),
        diagnostics::momentum(state.particles()),
        state.grid().occupied_cells()
    );
    if let Some(first) = snapshot.first() {
        log::debug!(
            "  first instance at ({:.4}, {:.4}) r={:.4} color={:#010x}",
            first.position[0],
            first.position[1],
            first.radius,
            first.color
        );
    }

    Ok(())
}
