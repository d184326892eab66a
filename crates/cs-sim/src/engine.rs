//! Per-strategy tick bodies.
//!
//! [`Engine`] carries whatever state its strategy keeps between ticks and is
//! matched exactly once per tick; every hot loop below is monomorphic.

use std::ops::Range;
use std::sync::atomic::{AtomicUsize, Ordering};

use cs_agent::{Agent, PositionStore, WaypointSet};
use cs_batch::{BatchKernel, LaneArrays, advance_offload, advance_vector};
use cs_core::{ExecutionMode, SimConfig};
use cs_movement::{move_agent, move_agent_atomic};
use cs_spatial::{AtomicCells, BoundaryTable, Partition, partition};
use rayon::prelude::*;
use tracing::{debug, trace};

use crate::{SimResult, TickStats};

pub(crate) enum Engine {
    Sequential,
    ThreadPool { pool: rayon::ThreadPool },
    RegionParallel(RegionState),
    VectorBatch { lanes: LaneArrays },
    OffloadBatch { lanes: LaneArrays, kernel: Box<dyn BatchKernel> },
}

/// Region-parallel state reused across ticks.
pub(crate) struct RegionState {
    /// Sized to the region count of the tick that built it.
    pool:      Option<rayon::ThreadPool>,
    table:     BoundaryTable,
    mirror:    AtomicCells,
    partition: Partition,
}

impl RegionState {
    pub(crate) fn new(config: &SimConfig) -> Self {
        Self {
            pool:      None,
            table:     BoundaryTable::new(config.grid.height),
            mirror:    AtomicCells::new(),
            partition: Partition::default(),
        }
    }
}

impl Engine {
    pub(crate) fn mode(&self) -> ExecutionMode {
        match self {
            Engine::Sequential => ExecutionMode::Sequential,
            Engine::ThreadPool { .. } => ExecutionMode::ThreadPool,
            Engine::RegionParallel(_) => ExecutionMode::RegionParallel,
            Engine::VectorBatch { .. } => ExecutionMode::VectorBatch,
            Engine::OffloadBatch { .. } => ExecutionMode::OffloadBatch,
        }
    }

    /// Lane arrays, for the batch strategies.
    pub(crate) fn lanes(&self) -> Option<&LaneArrays> {
        match self {
            Engine::VectorBatch { lanes } | Engine::OffloadBatch { lanes, .. } => Some(lanes),
            _ => None,
        }
    }

    pub(crate) fn last_partition(&self) -> Option<&Partition> {
        match self {
            Engine::RegionParallel(state) => Some(&state.partition),
            _ => None,
        }
    }

    /// Advance every agent by one tick.
    pub(crate) fn tick(
        &mut self,
        agents: &mut [Agent],
        waypoints: &WaypointSet,
        config: &SimConfig,
    ) -> SimResult<TickStats> {
        let stats = match self {
            Engine::Sequential => tick_sequential(agents, waypoints, config),
            Engine::ThreadPool { pool } => tick_thread_pool(pool, agents, waypoints),
            Engine::RegionParallel(state) => tick_regions(state, agents, waypoints, config)?,
            Engine::VectorBatch { lanes } => TickStats {
                agents:  lanes.agent_count(),
                reached: advance_vector(lanes, agents, waypoints),
                ..TickStats::default()
            },
            Engine::OffloadBatch { lanes, kernel } => TickStats {
                agents:  lanes.agent_count(),
                reached: advance_offload(
                    kernel.as_ref(),
                    lanes,
                    agents,
                    waypoints,
                    config.kernel_group_size,
                )?,
                ..TickStats::default()
            },
        };
        Ok(stats)
    }
}

// ── Sequential ────────────────────────────────────────────────────────────────

fn tick_sequential(agents: &mut [Agent], waypoints: &WaypointSet, config: &SimConfig) -> TickStats {
    let mut stats = TickStats { agents: agents.len(), ..TickStats::default() };
    for slot in 0..agents.len() {
        agents[slot].compute_next_desired_position(waypoints);
        stats.record(move_agent(agents, slot, config.grid));
    }
    stats
}

// ── Thread pool ───────────────────────────────────────────────────────────────

/// Static chunk layout: `workers` runs of `n / workers` slots, the last one
/// stretched to absorb the remainder.
pub(crate) fn static_chunks(n: usize, workers: usize) -> Vec<Range<usize>> {
    let workers = workers.max(1);
    let chunk = n / workers;
    (0..workers)
        .map(|w| {
            let start = w * chunk;
            let end = if w + 1 == workers { n } else { start + chunk };
            start..end
        })
        .collect()
}

fn tick_thread_pool(pool: &rayon::ThreadPool, agents: &mut [Agent], waypoints: &WaypointSet) -> TickStats {
    let n = agents.len();
    let moved = AtomicUsize::new(0);

    pool.scope(|s| {
        let mut rest = agents;
        for range in static_chunks(n, pool.current_num_threads()) {
            let (chunk, tail) = std::mem::take(&mut rest).split_at_mut(range.len());
            rest = tail;
            let moved = &moved;
            s.spawn(move |_| {
                let mut local = 0;
                for agent in chunk {
                    agent.compute_next_desired_position(waypoints);
                    if agent.pos != agent.desired {
                        agent.pos = agent.desired;
                        local += 1;
                    }
                }
                moved.fetch_add(local, Ordering::Relaxed);
            });
        }
    });

    let advanced = moved.into_inner();
    TickStats {
        agents: n,
        advanced,
        stayed: n - advanced,
        ..TickStats::default()
    }
}

// ── Region parallel ───────────────────────────────────────────────────────────

fn tick_regions(
    state: &mut RegionState,
    agents: &mut [Agent],
    waypoints: &WaypointSet,
    config: &SimConfig,
) -> SimResult<TickStats> {
    let RegionState { pool, table, mirror, partition: layout } = state;

    *layout = partition(agents, config.max_region_fraction);
    table.rebuild(&layout.seams, agents);
    mirror.load_from(agents);

    let regions = layout.region_count();
    if regions == 0 {
        return Ok(TickStats::default());
    }
    trace!(
        regions,
        seams = layout.seams.len(),
        largest = layout.max_region_len(),
        "partitioned agents"
    );

    let pool = match pool.take() {
        Some(p) if p.current_num_threads() == regions => pool.insert(p),
        _ => {
            debug!(workers = regions, "rebuilding region pool");
            pool.insert(build_pool(regions, "crowd-region")?)
        }
    };

    let mut tasks = Vec::with_capacity(regions);
    let mut rest = agents;
    for region in &layout.regions {
        let (slice, tail) = std::mem::take(&mut rest).split_at_mut(region.len());
        rest = tail;
        tasks.push((region.slots.start, slice));
    }

    let table = &*table;
    let mirror = &*mirror;
    let grid = config.grid;

    let stats = pool.install(|| {
        tasks
            .into_par_iter()
            .map(|(offset, slice)| {
                let mut stats = TickStats { agents: slice.len(), ..TickStats::default() };
                for (i, agent) in slice.iter_mut().enumerate() {
                    agent.compute_next_desired_position(waypoints);
                    stats.record(move_agent_atomic(agent, offset + i, mirror, table, grid));
                }
                stats
            })
            .reduce(TickStats::default, TickStats::merge)
    });

    Ok(TickStats { regions, ..stats })
}

pub(crate) fn build_pool(workers: usize, name: &'static str) -> SimResult<rayon::ThreadPool> {
    Ok(rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(move |i| format!("{name}-{i}"))
        .build()?)
}
