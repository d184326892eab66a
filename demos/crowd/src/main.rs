//! `crowd` — walk a procedural crowd between waypoint zones under any of the
//! five execution strategies.
//!
//! Agents start on unique random cells of the grid and loop through four
//! zones placed on an ellipse.  With `--timing-mode` the same crowd is first
//! run sequentially as a reference and the chosen strategy's speedup is
//! reported.
//!
//! Run with:
//!   cargo run -p crowd --release -- --mode omp --agents 4000 --ticks 500
//!   cargo run -p crowd --release -- --mode simd --timing-mode
//!   RUST_LOG=cs_sim=debug cargo run -p crowd -- --config crowd.json

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use std::collections::HashSet;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use cs_agent::{CrowdScenario, PositionStore};
use cs_core::{Cell, ExecutionMode, SimConfig, Tick};
use cs_sim::{SimBuilder, SimObserver, TickStats};

// ── Command line ──────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "crowd", version, about = "Grid crowd tick engine demo")]
struct Args {
    /// Execution strategy: seq, cthreads, omp, simd, cuda (or sequential,
    /// thread-pool, region-parallel, vector-batch, offload-batch).
    #[arg(short, long)]
    mode: Option<ExecutionMode>,

    /// Worker threads for the thread-pool strategy.
    #[arg(long)]
    threads: Option<usize>,

    /// Ticks to simulate.
    #[arg(long)]
    ticks: Option<u64>,

    /// Agents in the generated crowd.
    #[arg(short, long, default_value_t = 1_000)]
    agents: usize,

    /// Scenario seed.
    #[arg(long)]
    seed: Option<u64>,

    /// Print a progress line every N ticks (0 disables).
    #[arg(long)]
    report_every: Option<u64>,

    /// JSON `SimConfig` to start from; flags override its fields.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Run a sequential reference first and report the speedup.
    #[arg(long)]
    timing_mode: bool,
}

impl Args {
    fn sim_config(&self) -> Result<SimConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let file = File::open(path)
                    .with_context(|| format!("opening config {}", path.display()))?;
                serde_json::from_reader(BufReader::new(file))
                    .with_context(|| format!("parsing config {}", path.display()))?
            }
            None => SimConfig { total_ticks: 500, ..SimConfig::default() },
        };

        if let Some(mode) = self.mode {
            config.mode = mode;
        }
        if let Some(threads) = self.threads {
            config.num_threads = threads;
        }
        if let Some(ticks) = self.ticks {
            config.total_ticks = ticks;
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(every) = self.report_every {
            config.snapshot_interval_ticks = every;
        }
        Ok(config)
    }
}

// ── Progress observer ─────────────────────────────────────────────────────────

/// Sums tick statistics and prints a line at every snapshot.
#[derive(Default)]
struct Progress {
    totals: TickStats,
    ticks:  u64,
    quiet:  bool,
}

impl SimObserver for Progress {
    fn on_tick_end(&mut self, _tick: Tick, stats: &TickStats) {
        self.totals = TickStats {
            agents:     stats.agents,
            advanced:   self.totals.advanced + stats.advanced,
            backed_off: self.totals.backed_off + stats.backed_off,
            stayed:     self.totals.stayed + stats.stayed,
            reached:    self.totals.reached + stats.reached,
            regions:    stats.regions,
        };
        self.ticks += 1;
    }

    fn on_snapshot(&mut self, tick: Tick, positions: &dyn PositionStore) {
        if self.quiet {
            return;
        }
        println!(
            "  tick {:>6}  stacked cells={:>5}  regions={:>3}",
            tick.0,
            stacked_cells(&positions.positions_by_id()),
            self.totals.regions,
        );
    }
}

/// Cells holding more than one agent.
fn stacked_cells(positions: &[Cell]) -> usize {
    let mut seen = HashSet::with_capacity(positions.len());
    let mut stacked = HashSet::new();
    for &cell in positions {
        if !seen.insert(cell) {
            stacked.insert(cell);
        }
    }
    stacked.len()
}

// ── Runs ──────────────────────────────────────────────────────────────────────

struct RunReport {
    elapsed:   Duration,
    progress:  Progress,
    positions: Vec<Cell>,
}

fn run(config: SimConfig, agents: usize, quiet: bool) -> Result<RunReport> {
    let (store, waypoints) = CrowdScenario::new(agents, config.grid, config.seed)
        .build()
        .context("generating scenario")?;
    let mut sim = SimBuilder::new(config, store, waypoints)
        .build()
        .context("building simulation")?;

    let mut progress = Progress { quiet, ..Progress::default() };
    let start = Instant::now();
    sim.run(&mut progress)?;
    let elapsed = start.elapsed();

    Ok(RunReport { elapsed, progress, positions: sim.positions() })
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();
    let config = args.sim_config()?;

    println!("=== rust_crowd — {} agents, {} ===", args.agents, config.mode);
    println!(
        "Grid: {}x{}  |  Ticks: {}  |  Seed: {}  |  Threads: {}",
        config.grid.width, config.grid.height, config.total_ticks, config.seed, config.num_threads,
    );
    println!();

    let reference = if args.timing_mode && config.mode != ExecutionMode::Sequential {
        info!("running sequential reference");
        let seq = SimConfig { mode: ExecutionMode::Sequential, ..config.clone() };
        Some(run(seq, args.agents, true)?)
    } else {
        None
    };

    let report = run(config.clone(), args.agents, false)?;
    let secs = report.elapsed.as_secs_f64();
    let totals = report.progress.totals;

    println!();
    println!("Simulation complete in {secs:.3}s  ({} ticks)", report.progress.ticks);
    println!(
        "Throughput:     {:.2} M agent-ticks/s",
        (args.agents as f64 * report.progress.ticks as f64) / secs.max(f64::EPSILON) / 1e6,
    );
    if config.mode.uses_lane_arrays() {
        println!("Zones reached:  {}", totals.reached);
    } else {
        println!(
            "Moves:          {} advanced, {} backed off, {} stayed",
            totals.advanced, totals.backed_off, totals.stayed,
        );
    }
    println!("Stacked cells:  {}", stacked_cells(&report.positions));

    if let Some(reference) = reference {
        let base = reference.elapsed.as_secs_f64();
        println!();
        println!("Sequential reference: {base:.3}s");
        println!("Speedup ({}):   {:.2}x", config.mode, base / secs.max(f64::EPSILON));
    }

    Ok(())
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}
