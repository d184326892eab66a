//! Integration tests for cs-sim.

use std::collections::HashSet;

use cs_agent::{AgentStoreBuilder, CrowdScenario};
use cs_core::{Cell, ExecutionMode, SimConfig, Tick};

use crate::{NoopObserver, Sim, SimBuilder, SimError, SimObserver, TickStats};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn test_config(mode: ExecutionMode, total_ticks: u64) -> SimConfig {
    SimConfig {
        mode,
        num_threads: 3,
        total_ticks,
        ..SimConfig::default()
    }
}

fn crowd_sim(mode: ExecutionMode, n: usize, seed: u64) -> Sim {
    let config = SimConfig { seed, ..test_config(mode, 50) };
    let (agents, waypoints) = CrowdScenario::new(n, config.grid, seed).build().unwrap();
    SimBuilder::new(config, agents, waypoints).build().unwrap()
}

/// Three agents far enough apart that no resolver ever intervenes during
/// the first 30 ticks: a diagonal, a horizontal and a vertical walker.
fn lone_walkers(mode: ExecutionMode) -> Sim {
    let mut b = AgentStoreBuilder::new();
    let diag = b.add_waypoint(100.0, 100.0, 1.0);
    let east = b.add_waypoint(110.0, 70.0, 1.0);
    let north = b.add_waypoint(60.0, 75.0, 1.0);
    b.add_agent(Cell::new(10, 10), [diag])
        .add_agent(Cell::new(20, 70), [east])
        .add_agent(Cell::new(60, 5), [north]);
    let (agents, waypoints) = b.build().unwrap();
    SimBuilder::new(test_config(mode, 30), agents, waypoints).build().unwrap()
}

fn assert_unique(positions: &[Cell], context: &str) {
    let unique: HashSet<_> = positions.iter().collect();
    assert_eq!(unique.len(), positions.len(), "{context}: two agents share a cell");
}

// ── SimBuilder validation ─────────────────────────────────────────────────────

#[cfg(test)]
mod builder_tests {
    use cs_agent::{Agent, AgentError};
    use cs_batch::ScalarKernel;
    use cs_core::{AgentId, WaypointId};

    use super::*;

    #[test]
    fn builds_every_mode() {
        for mode in ExecutionMode::ALL {
            let sim = crowd_sim(mode, 20, 1);
            assert_eq!(sim.mode(), mode);
            assert_eq!(sim.current_tick(), Tick::ZERO);
            assert_eq!(sim.positions().len(), 20);
            assert_eq!(sim.last_partition().is_some(), mode == ExecutionMode::RegionParallel);
        }
    }

    #[test]
    fn zero_threads_is_rejected() {
        let config = SimConfig { num_threads: 0, ..test_config(ExecutionMode::ThreadPool, 1) };
        let (agents, waypoints) = CrowdScenario::new(5, config.grid, 1).build().unwrap();
        let err = SimBuilder::new(config, agents, waypoints).build().err().unwrap();
        assert!(matches!(err, SimError::Core(_)));
    }

    #[test]
    fn zero_threads_is_fine_outside_thread_pool_mode() {
        let config = SimConfig { num_threads: 0, ..test_config(ExecutionMode::Sequential, 1) };
        let (agents, waypoints) = CrowdScenario::new(5, config.grid, 1).build().unwrap();
        assert!(SimBuilder::new(config, agents, waypoints).build().is_ok());
    }

    #[test]
    fn bad_region_fraction_is_rejected() {
        for fraction in [0.0, -0.5, 1.5, f32::NAN] {
            let config = SimConfig {
                max_region_fraction: fraction,
                ..test_config(ExecutionMode::RegionParallel, 1)
            };
            let (agents, waypoints) = CrowdScenario::new(5, config.grid, 1).build().unwrap();
            assert!(SimBuilder::new(config, agents, waypoints).build().is_err(), "{fraction}");
        }
    }

    #[test]
    fn unknown_destination_is_rejected() {
        let (mut agents, waypoints) = CrowdScenario::new(3, Default::default(), 1).build().unwrap();
        agents.agents[1].destination = Some(WaypointId(99));
        let err = SimBuilder::new(test_config(ExecutionMode::Sequential, 1), agents, waypoints)
            .build()
            .err()
            .unwrap();
        assert!(matches!(
            err,
            SimError::Agent(AgentError::UnknownWaypoint { agent: AgentId(1), waypoint: WaypointId(99) })
        ));
    }

    #[test]
    fn unknown_route_waypoint_is_rejected() {
        let mut b = AgentStoreBuilder::new();
        let home = b.add_waypoint(30.0, 30.0, 2.0);
        b.add_agent(Cell::new(5, 5), [home]).add_agent(Cell::new(9, 9), [home]);
        let (mut agents, waypoints) = b.build().unwrap();
        agents.agents[0] = Agent::new(AgentId(0), Cell::new(5, 5), [home, WaypointId(7)]);
        let err = SimBuilder::new(test_config(ExecutionMode::VectorBatch, 1), agents, waypoints)
            .build()
            .err()
            .unwrap();
        assert!(matches!(
            err,
            SimError::Agent(AgentError::UnknownWaypoint { agent: AgentId(0), waypoint: WaypointId(7) })
        ));
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let (mut agents, waypoints) = CrowdScenario::new(3, Default::default(), 1).build().unwrap();
        agents.agents[2].id = AgentId(0);
        let result = SimBuilder::new(test_config(ExecutionMode::Sequential, 1), agents, waypoints).build();
        assert!(matches!(result, Err(SimError::Core(_))));
    }

    #[test]
    fn custom_kernel_is_used_for_offload() {
        let config = test_config(ExecutionMode::OffloadBatch, 40);
        let (agents, waypoints) = CrowdScenario::new(90, config.grid, 6).build().unwrap();
        let mut scalar = SimBuilder::new(config.clone(), agents.clone(), waypoints.clone())
            .kernel(ScalarKernel)
            .build()
            .unwrap();
        let mut rayon = SimBuilder::new(config, agents, waypoints).build().unwrap();

        scalar.run(&mut NoopObserver).unwrap();
        rayon.run(&mut NoopObserver).unwrap();
        assert_eq!(scalar.positions(), rayon.positions());
    }
}

// ── Tick loop ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod run_loop {
    use cs_agent::PositionStore;

    use super::*;

    #[derive(Default)]
    struct Recorder {
        starts:    Vec<Tick>,
        ends:      Vec<(Tick, TickStats)>,
        snapshots: Vec<(Tick, usize)>,
        final_tick: Option<Tick>,
    }

    impl SimObserver for Recorder {
        fn on_tick_start(&mut self, tick: Tick) {
            self.starts.push(tick);
        }
        fn on_tick_end(&mut self, tick: Tick, stats: &TickStats) {
            self.ends.push((tick, *stats));
        }
        fn on_snapshot(&mut self, tick: Tick, positions: &dyn PositionStore) {
            self.snapshots.push((tick, positions.agent_count()));
        }
        fn on_sim_end(&mut self, final_tick: Tick) {
            self.final_tick = Some(final_tick);
        }
    }

    #[test]
    fn hooks_fire_in_order() {
        let mut sim = crowd_sim(ExecutionMode::Sequential, 15, 2);
        sim.config.total_ticks = 10;
        sim.config.snapshot_interval_ticks = 3;

        let mut rec = Recorder::default();
        sim.run(&mut rec).unwrap();

        assert_eq!(rec.starts, (0..10).map(Tick).collect::<Vec<_>>());
        assert_eq!(rec.ends.len(), 10);
        let snaps: Vec<_> = rec.snapshots.iter().map(|&(t, _)| t.0).collect();
        assert_eq!(snaps, vec![0, 3, 6, 9]);
        assert!(rec.snapshots.iter().all(|&(_, n)| n == 15));
        assert_eq!(rec.final_tick, Some(Tick(10)));
        assert_eq!(sim.current_tick(), Tick(10));
    }

    #[test]
    fn run_ticks_ignores_end_tick() {
        let mut sim = crowd_sim(ExecutionMode::VectorBatch, 10, 2);
        sim.config.total_ticks = 2;
        sim.run_ticks(7, &mut NoopObserver).unwrap();
        assert_eq!(sim.current_tick(), Tick(7));
        sim.run(&mut NoopObserver).unwrap();
        assert_eq!(sim.current_tick(), Tick(7));
    }

    #[test]
    fn resolver_stats_account_for_every_agent() {
        for mode in [ExecutionMode::Sequential, ExecutionMode::RegionParallel, ExecutionMode::ThreadPool] {
            let mut sim = crowd_sim(mode, 120, 4);
            for _ in 0..20 {
                let s = sim.step().unwrap();
                assert_eq!(s.agents, 120, "{mode}");
                assert_eq!(s.advanced + s.backed_off + s.stayed, 120, "{mode}");
            }
        }
    }

    #[test]
    fn region_stats_match_partition() {
        let mut sim = crowd_sim(ExecutionMode::RegionParallel, 200, 9);
        for _ in 0..10 {
            let stats = sim.step().unwrap();
            let layout = sim.last_partition().unwrap();
            assert_eq!(stats.regions, layout.region_count());
            assert_eq!(layout.seams.len(), layout.region_count() - 1);
            assert!(layout.region_count() <= 5);
        }
    }

    #[test]
    fn empty_crowd_runs_in_every_mode() {
        for mode in ExecutionMode::ALL {
            let (agents, waypoints) = AgentStoreBuilder::new().build().unwrap();
            let mut sim = SimBuilder::new(test_config(mode, 5), agents, waypoints).build().unwrap();
            sim.run(&mut NoopObserver).unwrap();
            assert!(sim.positions().is_empty());
        }
    }
}

// ── Strategy semantics ────────────────────────────────────────────────────────

#[cfg(test)]
mod strategies {
    use cs_core::AgentId;

    use super::*;
    use crate::engine::static_chunks;

    #[test]
    fn agent_count_is_preserved() {
        for mode in ExecutionMode::ALL {
            let mut sim = crowd_sim(mode, 250, 12);
            sim.run(&mut NoopObserver).unwrap();
            assert_eq!(sim.positions().len(), 250, "{mode}");
            let ids: HashSet<AgentId> = sim.agents().iter().map(|a| a.id).collect();
            assert_eq!(ids.len(), 250, "{mode}");
        }
    }

    #[test]
    fn collision_checked_modes_never_stack_agents() {
        for mode in [ExecutionMode::Sequential, ExecutionMode::RegionParallel] {
            let mut sim = crowd_sim(mode, 600, 31);
            assert_unique(&sim.positions(), "setup");
            for tick in 0..60 {
                sim.step().unwrap();
                assert_unique(&sim.positions(), &format!("{mode} tick {tick}"));
            }
        }
    }

    #[test]
    fn seam_cells_hold_at_most_one_agent() {
        let mut sim = crowd_sim(ExecutionMode::RegionParallel, 800, 77);
        for _ in 0..40 {
            sim.step().unwrap();
            let layout = sim.last_partition().unwrap().clone();
            let mut seen = HashSet::new();
            for agent in sim.agents().iter() {
                if layout.seams.iter().any(|s| s.touches(agent.pos.x)) {
                    assert!(seen.insert(agent.pos), "seam cell {} taken twice", agent.pos);
                }
            }
        }
    }

    #[test]
    fn isolated_agents_walk_identically_in_every_mode() {
        let mut reference = lone_walkers(ExecutionMode::Sequential);
        reference.run(&mut NoopObserver).unwrap();
        let expected = reference.positions();
        assert_eq!(expected, vec![Cell::new(40, 40), Cell::new(50, 70), Cell::new(60, 35)]);

        for mode in ExecutionMode::ALL {
            let mut sim = lone_walkers(mode);
            sim.run(&mut NoopObserver).unwrap();
            assert_eq!(sim.positions(), expected, "{mode}");
        }
    }

    #[test]
    fn batch_modes_agree() {
        let mut vector = crowd_sim(ExecutionMode::VectorBatch, 333, 5);
        let mut offload = crowd_sim(ExecutionMode::OffloadBatch, 333, 5);
        for tick in 0..50 {
            let a = vector.step().unwrap();
            let b = offload.step().unwrap();
            assert_eq!(a.reached, b.reached, "tick {tick}");
            assert_eq!(vector.positions(), offload.positions(), "tick {tick}");
        }
    }

    #[test]
    fn thread_pool_overwrites_with_desired_cell() {
        let mut sim = crowd_sim(ExecutionMode::ThreadPool, 101, 8);
        let mut expected = sim.agents().agents.clone();
        let waypoints = sim.waypoints().clone();

        for _ in 0..25 {
            sim.step().unwrap();
            for agent in &mut expected {
                agent.compute_next_desired_position(&waypoints);
                agent.pos = agent.desired;
            }
            assert_eq!(sim.agents().agents, expected);
        }
    }

    #[test]
    fn static_chunks_cover_every_agent() {
        assert_eq!(static_chunks(10, 3), vec![0..3, 3..6, 6..10]);
        assert_eq!(static_chunks(2, 4), vec![0..0, 0..0, 0..0, 0..2]);
        assert_eq!(static_chunks(0, 2), vec![0..0, 0..0]);

        for n in 0..50 {
            for workers in 1..9 {
                let chunks = static_chunks(n, workers);
                assert_eq!(chunks.len(), workers);
                let mut next = 0;
                for c in &chunks {
                    assert_eq!(c.start, next);
                    next = c.end;
                }
                assert_eq!(next, n, "n={n} workers={workers}");
            }
        }
    }
}
