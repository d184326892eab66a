//! The `Sim` struct and its tick loop.

use cs_agent::{AgentStore, PositionStore, WaypointSet};
use cs_core::{Cell, ExecutionMode, SimConfig, Tick};
use cs_spatial::Partition;
use tracing::debug;

use crate::engine::Engine;
use crate::{SimObserver, SimResult, TickStats};

/// The tick dispatcher.
///
/// Holds the agents, the shared waypoint set and the execution strategy
/// chosen at build time.  Every tick is a full barrier: all agents have moved
/// before the next tick starts or an observer hook runs.
///
/// Create via [`SimBuilder`][crate::SimBuilder].
pub struct Sim {
    /// Run configuration.  Changing it after build has no effect on the
    /// strategy already set up.
    pub config: SimConfig,

    pub(crate) tick:      Tick,
    pub(crate) agents:    AgentStore,
    pub(crate) waypoints: WaypointSet,
    pub(crate) engine:    Engine,
}

impl Sim {
    // ── Public API ────────────────────────────────────────────────────────

    /// Run from the current tick to `config.end_tick()`.
    ///
    /// Calls observer hooks at every tick boundary.  Use
    /// [`NoopObserver`][crate::NoopObserver] if you don't need callbacks.
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        while self.tick < self.config.end_tick() {
            self.observed_tick(observer)?;
        }
        observer.on_sim_end(self.tick);
        Ok(())
    }

    /// Run exactly `n` ticks from the current position (ignores `end_tick`).
    pub fn run_ticks<O: SimObserver>(&mut self, n: u64, observer: &mut O) -> SimResult<()> {
        for _ in 0..n {
            self.observed_tick(observer)?;
        }
        Ok(())
    }

    /// Advance one tick without any observer.
    pub fn step(&mut self) -> SimResult<TickStats> {
        let stats = self.engine.tick(&mut self.agents.agents, &self.waypoints, &self.config)?;
        debug!(tick = %self.tick, ?stats, "tick done");
        self.tick = self.tick.next();
        Ok(stats)
    }

    /// The next tick to be simulated.
    #[inline]
    pub fn current_tick(&self) -> Tick {
        self.tick
    }

    pub fn mode(&self) -> ExecutionMode {
        self.engine.mode()
    }

    /// Agent objects.  Under the batch modes their `pos` is the setup
    /// position; use [`positions`](Self::positions) for where they are now.
    pub fn agents(&self) -> &AgentStore {
        &self.agents
    }

    pub fn waypoints(&self) -> &WaypointSet {
        &self.waypoints
    }

    /// The authoritative position representation for this run.
    pub fn position_store(&self) -> &dyn PositionStore {
        match self.engine.lanes() {
            Some(lanes) => lanes as &dyn PositionStore,
            None => &self.agents,
        }
    }

    /// Current cell of every agent, indexed by `AgentId`.
    pub fn positions(&self) -> Vec<Cell> {
        self.position_store().positions_by_id()
    }

    /// Regions and seams of the most recent region-parallel tick.  `None`
    /// under every other mode.
    pub fn last_partition(&self) -> Option<&Partition> {
        self.engine.last_partition()
    }

    // ── Tick loop ─────────────────────────────────────────────────────────

    fn observed_tick<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        let now = self.tick;
        observer.on_tick_start(now);
        let stats = self.step()?;
        observer.on_tick_end(now, &stats);
        if now.is_every(self.config.snapshot_interval_ticks) {
            observer.on_snapshot(now, self.position_store());
        }
        Ok(())
    }
}
