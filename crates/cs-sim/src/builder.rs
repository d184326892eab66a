//! Fluent builder for constructing a [`Sim`].

use cs_agent::{AgentError, AgentStore, WaypointSet};
use cs_batch::{BatchKernel, LANES, LaneArrays, RayonKernel};
use cs_core::{CoreError, ExecutionMode, SimConfig, Tick};
use tracing::info;

use crate::engine::{Engine, RegionState, build_pool};
use crate::{Sim, SimResult};

/// Fluent builder for [`Sim`].
///
/// # Required inputs
///
/// - [`SimConfig`]: mode, thread count, region fraction, grid, ticks
/// - [`AgentStore`] + [`WaypointSet`], from [`cs_agent::AgentStoreBuilder`]
///   or [`cs_agent::CrowdScenario`]
///
/// # Optional inputs
///
/// | Method          | Default        | Used by          |
/// |-----------------|----------------|------------------|
/// | `.kernel(k)`    | `RayonKernel`  | `OffloadBatch`   |
///
/// # Example
///
/// ```rust,ignore
/// let (agents, waypoints) = CrowdScenario::new(1_000, config.grid, config.seed).build()?;
/// let mut sim = SimBuilder::new(config, agents, waypoints)
///     .kernel(ScalarKernel)
///     .build()?;
/// sim.run(&mut NoopObserver)?;
/// ```
pub struct SimBuilder {
    config:    SimConfig,
    agents:    AgentStore,
    waypoints: WaypointSet,
    kernel:    Option<Box<dyn BatchKernel>>,
}

impl SimBuilder {
    pub fn new(config: SimConfig, agents: AgentStore, waypoints: WaypointSet) -> Self {
        Self { config, agents, waypoints, kernel: None }
    }

    /// Kernel for `OffloadBatch` runs.  Ignored by every other mode.
    pub fn kernel(mut self, kernel: impl BatchKernel + 'static) -> Self {
        self.kernel = Some(Box::new(kernel));
        self
    }

    /// Validate inputs, set up the strategy's state and return a ready-to-run
    /// [`Sim`].
    ///
    /// For the batch modes this is where every agent picks its first
    /// destination and the lane arrays are filled.
    pub fn build(self) -> SimResult<Sim> {
        let Self { config, mut agents, waypoints, kernel } = self;
        config.validate()?;
        check_agents(&agents, &waypoints)?;

        let engine = match config.mode {
            ExecutionMode::Sequential => Engine::Sequential,
            ExecutionMode::ThreadPool => Engine::ThreadPool {
                pool: build_pool(config.num_threads, "crowd-worker")?,
            },
            ExecutionMode::RegionParallel => Engine::RegionParallel(RegionState::new(&config)),
            ExecutionMode::VectorBatch => Engine::VectorBatch {
                lanes: LaneArrays::from_agents(&mut agents.agents, &waypoints, LANES),
            },
            ExecutionMode::OffloadBatch => Engine::OffloadBatch {
                lanes:  LaneArrays::from_agents(
                    &mut agents.agents,
                    &waypoints,
                    config.kernel_group_size,
                ),
                kernel: kernel.unwrap_or_else(|| Box::new(RayonKernel)),
            },
        };

        info!(
            mode = %config.mode,
            agents = agents.len(),
            waypoints = waypoints.len(),
            threads = config.num_threads,
            ticks = config.total_ticks,
            "simulation ready"
        );

        Ok(Sim {
            config,
            tick: Tick::ZERO,
            agents,
            waypoints,
            engine,
        })
    }
}

/// Agent ids must be exactly `0..n` and every destination must exist.
fn check_agents(agents: &AgentStore, waypoints: &WaypointSet) -> SimResult<()> {
    let n = agents.len();
    let mut seen = vec![false; n];
    for agent in agents.iter() {
        let idx = agent.id.index();
        if idx >= n || std::mem::replace(&mut seen[idx], true) {
            let msg = format!("agent ids must be unique and dense, found {}", agent.id);
            return Err(CoreError::Config(msg).into());
        }
        let unknown = agent
            .destination
            .into_iter()
            .chain(agent.route())
            .find(|&w| !waypoints.contains(w));
        if let Some(waypoint) = unknown {
            return Err(AgentError::UnknownWaypoint { agent: agent.id, waypoint }.into());
        }
    }
    Ok(())
}
