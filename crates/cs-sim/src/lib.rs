//! `cs-sim` — tick dispatcher for the rust_crowd engine.
//!
//! # Strategies
//!
//! | `ExecutionMode`   | Scheduling                                    | Per-agent update                       |
//! |-------------------|-----------------------------------------------|----------------------------------------|
//! | `Sequential`      | caller thread, array order                    | desired cell + collision resolver      |
//! | `ThreadPool`      | fixed rayon pool, static chunks               | desired cell, written straight back    |
//! | `RegionParallel`  | one task per x-region, pool sized to regions  | desired cell + seam-claiming resolver  |
//! | `VectorBatch`     | caller thread, 4 lanes at a time              | lane step over flattened arrays        |
//! | `OffloadBatch`    | whole array handed to a `BatchKernel`         | lane step, host rotates routes         |
//!
//! # Tick loop
//!
//! ```text
//! for tick in 0..config.total_ticks:
//!   observer.on_tick_start
//!   engine.tick              (full barrier: every agent has moved on return)
//!   observer.on_tick_end     (TickStats)
//!   observer.on_snapshot     (every snapshot_interval_ticks)
//! observer.on_sim_end
//! ```
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use cs_agent::CrowdScenario;
//! use cs_core::{ExecutionMode, SimConfig};
//! use cs_sim::{NoopObserver, SimBuilder};
//!
//! let config = SimConfig { mode: ExecutionMode::RegionParallel, ..SimConfig::default() };
//! let (agents, waypoints) = CrowdScenario::new(2_000, config.grid, config.seed).build()?;
//! let mut sim = SimBuilder::new(config, agents, waypoints).build()?;
//! sim.run(&mut NoopObserver)?;
//! ```

pub mod builder;
pub mod error;
pub mod observer;
pub mod sim;

mod engine;

#[cfg(test)]
mod tests;

pub use builder::SimBuilder;
pub use error::{SimError, SimResult};
pub use observer::{NoopObserver, SimObserver, TickStats};
pub use sim::Sim;
