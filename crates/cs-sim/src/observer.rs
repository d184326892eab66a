//! Simulation observer trait and per-tick statistics.

use cs_agent::PositionStore;
use cs_core::Tick;
use cs_movement::Outcome;

/// What one tick did.
///
/// The resolver counters (`advanced`, `backed_off`, `stayed`) are filled by
/// the collision-checked strategies, `reached` by the batch strategies.
/// Thread-pool ticks count an agent as `advanced` when its cell changed and
/// as `stayed` otherwise.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct TickStats {
    pub agents:     usize,
    pub advanced:   usize,
    pub backed_off: usize,
    pub stayed:     usize,
    pub reached:    usize,
    /// Regions the tick ran on (region-parallel only).
    pub regions:    usize,
}

impl TickStats {
    #[inline]
    pub(crate) fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Forward(_) => self.advanced += 1,
            Outcome::BackedOff => self.backed_off += 1,
            Outcome::Stayed => self.stayed += 1,
        }
    }

    pub(crate) fn merge(mut self, other: TickStats) -> TickStats {
        self.agents += other.agents;
        self.advanced += other.advanced;
        self.backed_off += other.backed_off;
        self.stayed += other.stayed;
        self.reached += other.reached;
        self.regions += other.regions;
        self
    }
}

/// Callbacks invoked by [`Sim::run`][crate::Sim::run] at key points in the
/// tick loop.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
///
/// # Example — progress printer
///
/// ```rust,ignore
/// struct ProgressPrinter { interval: u64 }
///
/// impl SimObserver for ProgressPrinter {
///     fn on_tick_end(&mut self, tick: Tick, stats: &TickStats) {
///         if tick.is_every(self.interval) {
///             println!("tick {tick}: {} backed off", stats.backed_off);
///         }
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called at the very start of each tick, before any agent moves.
    fn on_tick_start(&mut self, _tick: Tick) {}

    /// Called once every agent has moved for `tick`.
    fn on_tick_end(&mut self, _tick: Tick, _stats: &TickStats) {}

    /// Called every `config.snapshot_interval_ticks` ticks with the
    /// authoritative positions, whichever representation holds them.
    fn on_snapshot(&mut self, _tick: Tick, _positions: &dyn PositionStore) {}

    /// Called once after the final tick completes.
    fn on_sim_end(&mut self, _final_tick: Tick) {}
}

/// A [`SimObserver`] that does nothing.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
