//! Unit tests for cs-batch.

use cs_agent::{Agent, AgentStoreBuilder, CrowdScenario, WaypointSet};
use cs_core::{Cell, GridBounds};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn crowd(n: usize, seed: u64) -> (Vec<Agent>, WaypointSet) {
    let (store, waypoints) = CrowdScenario::new(n, GridBounds::default(), seed)
        .build()
        .unwrap();
    (store.agents, waypoints)
}

fn positions(lanes: &crate::LaneArrays) -> Vec<(i32, i32)> {
    (0..lanes.len()).map(|i| (lanes.x[i], lanes.y[i])).collect()
}

fn destinations(agents: &[Agent]) -> Vec<Option<cs_core::WaypointId>> {
    agents.iter().map(|a| a.destination).collect()
}

// ── Lane step ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod lane_step {
    use crate::step_lane;

    #[test]
    fn unit_step_towards_destination() {
        assert_eq!(step_lane(0, 0, 10.0, 0.0, 1.0), (1, 0, false));
        assert_eq!(step_lane(5, 5, 5.0, 0.0, 1.0), (5, 4, false));
        // Diagonal: 1/sqrt(2) ≈ 0.707 rounds up on both axes.
        assert_eq!(step_lane(0, 0, 10.0, 10.0, 1.0), (1, 1, false));
    }

    #[test]
    fn reached_is_strict_and_judged_before_the_step() {
        assert_eq!(step_lane(0, 0, 0.5, 0.0, 1.0), (1, 0, true));
        assert_eq!(step_lane(0, 0, 1.0, 0.0, 1.0), (1, 0, false));
    }

    #[test]
    fn zero_radius_is_never_reached_away_from_center() {
        assert!(!step_lane(0, 0, 0.25, 0.0, 0.0).2);
        assert!(!step_lane(4, 4, 40.0, 4.0, 0.0).2);
    }

    #[test]
    fn zero_length_stays_put() {
        assert_eq!(step_lane(3, 3, 3.0, 3.0, 0.0), (3, 3, false));
        assert_eq!(step_lane(3, 3, 3.0, 3.0, 0.5), (3, 3, true));
    }
}

// ── Lane arrays ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod lane_arrays {
    use cs_agent::PositionStore;
    use cs_core::AgentId;

    use super::*;
    use crate::LaneArrays;

    #[test]
    fn padding_and_initial_destinations() {
        let mut b = AgentStoreBuilder::new();
        let a = b.add_waypoint(10.0, 20.0, 2.0);
        let c = b.add_waypoint(30.0, 40.0, 3.0);
        b.add_agent(Cell::new(1, 2), [a, c])
            .add_agent(Cell::new(3, 4), [c])
            .add_agent(Cell::new(5, 6), std::iter::empty());
        let (store, waypoints) = b.build().unwrap();
        let mut agents = store.agents;

        let lanes = LaneArrays::from_agents(&mut agents, &waypoints, 4);
        assert_eq!(lanes.len(), 3);
        assert_eq!(lanes.padded_len(), 4);
        assert_eq!(lanes.reached.len(), 4);

        assert_eq!(agents[0].destination, Some(a));
        assert_eq!((lanes.dest_x[0], lanes.dest_y[0], lanes.dest_r[0]), (10.0, 20.0, 2.0));
        assert_eq!(agents[1].destination, Some(c));
        assert_eq!(lanes.dest_r[1], 3.0);

        // No route: parked on its own cell.
        assert_eq!(agents[2].destination, None);
        assert_eq!((lanes.dest_x[2], lanes.dest_y[2], lanes.dest_r[2]), (5.0, 6.0, 0.0));

        // Padding lane.
        assert_eq!((lanes.x[3], lanes.y[3], lanes.dest_r[3]), (0, 0, 0.0));
    }

    #[test]
    fn pads_to_group_size() {
        let (mut agents, waypoints) = crowd(130, 3);
        let lanes = LaneArrays::from_agents(&mut agents, &waypoints, 64);
        assert_eq!(lanes.padded_len(), 192);
        let lanes = LaneArrays::from_agents(&mut agents, &waypoints, 1);
        assert_eq!(lanes.padded_len(), 130);
    }

    #[test]
    fn position_store_reports_by_id() {
        let (mut agents, waypoints) = crowd(10, 1);
        agents.reverse();
        let mut lanes = LaneArrays::from_agents(&mut agents, &waypoints, 4);
        assert_eq!(lanes.agent_id(0), agents[0].id);

        lanes.set_position(0, Cell::new(77, 33));
        let by_id = lanes.positions_by_id();
        assert_eq!(by_id.len(), 10);
        assert_eq!(by_id[agents[0].id.index()], Cell::new(77, 33));
        assert_eq!(by_id[AgentId(0).index()], lanes.position(9));
    }
}

// ── Vector path ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod vector_path {
    use super::*;
    use crate::{LaneArrays, advance_vector, step_lane};

    /// Lane-by-lane reference for `advance_vector`.
    fn advance_scalar(lanes: &mut LaneArrays, agents: &mut [Agent], waypoints: &WaypointSet) {
        for slot in 0..lanes.len() {
            let (x, y, hit) = step_lane(
                lanes.x[slot],
                lanes.y[slot],
                lanes.dest_x[slot],
                lanes.dest_y[slot],
                lanes.dest_r[slot],
            );
            lanes.x[slot] = x;
            lanes.y[slot] = y;
            if hit {
                lanes.advance_route(slot, &mut agents[slot], waypoints);
            }
        }
    }

    #[test]
    fn matches_scalar_lane_math() {
        let (mut agents_v, waypoints) = crowd(37, 11);
        let mut agents_s = agents_v.clone();
        let mut lanes_v = LaneArrays::from_agents(&mut agents_v, &waypoints, 4);
        let mut lanes_s = LaneArrays::from_agents(&mut agents_s, &waypoints, 4);

        for tick in 0..200 {
            advance_vector(&mut lanes_v, &mut agents_v, &waypoints);
            advance_scalar(&mut lanes_s, &mut agents_s, &waypoints);
            assert_eq!(positions(&lanes_v), positions(&lanes_s), "tick {tick}");
        }
        assert_eq!(destinations(&agents_v), destinations(&agents_s));
    }

    #[test]
    fn reached_agent_moves_on_to_next_waypoint() {
        let mut b = AgentStoreBuilder::new();
        let near = b.add_waypoint(2.0, 0.0, 1.5);
        let far = b.add_waypoint(10.0, 0.0, 1.0);
        b.add_agent(Cell::new(0, 0), [near, far]);
        let (store, waypoints) = b.build().unwrap();
        let mut agents = store.agents;
        let mut lanes = LaneArrays::from_agents(&mut agents, &waypoints, 4);

        assert_eq!(advance_vector(&mut lanes, &mut agents, &waypoints), 0);
        assert_eq!((lanes.x[0], lanes.y[0]), (1, 0));

        assert_eq!(advance_vector(&mut lanes, &mut agents, &waypoints), 1);
        assert_eq!((lanes.x[0], lanes.y[0]), (2, 0));
        assert_eq!(agents[0].destination, Some(far));
        assert_eq!(lanes.dest_x[0], 10.0);

        advance_vector(&mut lanes, &mut agents, &waypoints);
        assert_eq!((lanes.x[0], lanes.y[0]), (3, 0));
    }

    #[test]
    fn parked_and_padding_lanes_never_move() {
        let mut b = AgentStoreBuilder::new();
        b.add_agent(Cell::new(9, 9), std::iter::empty());
        let (store, waypoints) = b.build().unwrap();
        let mut agents = store.agents;
        let mut lanes = LaneArrays::from_agents(&mut agents, &waypoints, 4);

        for _ in 0..5 {
            assert_eq!(advance_vector(&mut lanes, &mut agents, &waypoints), 0);
        }
        assert_eq!(lanes.x, vec![9, 0, 0, 0]);
        assert_eq!(lanes.y, vec![9, 0, 0, 0]);
    }

    #[test]
    fn odd_padding_uses_scalar_tail() {
        let (mut agents_a, waypoints) = crowd(21, 5);
        let mut agents_b = agents_a.clone();
        let mut lanes_a = LaneArrays::from_agents(&mut agents_a, &waypoints, 4);
        let mut lanes_b = LaneArrays::from_agents(&mut agents_b, &waypoints, 7);
        assert_eq!(lanes_b.padded_len(), 21);

        for _ in 0..50 {
            advance_vector(&mut lanes_a, &mut agents_a, &waypoints);
            advance_vector(&mut lanes_b, &mut agents_b, &waypoints);
        }
        assert_eq!(positions(&lanes_a), positions(&lanes_b));
    }
}

// ── Kernels ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod kernels {
    use super::*;
    use crate::{
        BatchKernel, KernelBuffers, KernelError, LaneArrays, LaunchConfig, RayonKernel,
        ScalarKernel, advance_offload, advance_vector,
    };

    #[test]
    fn launch_geometry() {
        let l = LaunchConfig::for_agents(130, 64);
        assert_eq!(l, LaunchConfig { group_size: 64, groups: 3 });
        assert_eq!(l.lanes(), 192);
        assert_eq!(LaunchConfig::for_agents(128, 64).groups, 2);
        assert_eq!(LaunchConfig::for_agents(0, 64).groups, 0);
    }

    #[test]
    fn rayon_matches_scalar() {
        let (mut agents_r, waypoints) = crowd(300, 21);
        let mut agents_s = agents_r.clone();
        let mut lanes_r = LaneArrays::from_agents(&mut agents_r, &waypoints, 64);
        let mut lanes_s = LaneArrays::from_agents(&mut agents_s, &waypoints, 64);

        for tick in 0..100 {
            let hr = advance_offload(&RayonKernel, &mut lanes_r, &mut agents_r, &waypoints, 64).unwrap();
            let hs = advance_offload(&ScalarKernel, &mut lanes_s, &mut agents_s, &waypoints, 64).unwrap();
            assert_eq!(hr, hs, "tick {tick}");
            assert_eq!(positions(&lanes_r), positions(&lanes_s), "tick {tick}");
        }
        assert_eq!(destinations(&agents_r), destinations(&agents_s));
    }

    #[test]
    fn offload_matches_vector_path() {
        let (mut agents_o, waypoints) = crowd(70, 8);
        let mut agents_v = agents_o.clone();
        let mut lanes_o = LaneArrays::from_agents(&mut agents_o, &waypoints, 64);
        let mut lanes_v = LaneArrays::from_agents(&mut agents_v, &waypoints, 4);

        for _ in 0..100 {
            advance_offload(&RayonKernel, &mut lanes_o, &mut agents_o, &waypoints, 64).unwrap();
            advance_vector(&mut lanes_v, &mut agents_v, &waypoints);
        }
        assert_eq!(positions(&lanes_o), positions(&lanes_v));
        assert_eq!(destinations(&agents_o), destinations(&agents_v));
    }

    #[test]
    fn padding_flags_are_cleared() {
        let (mut agents, waypoints) = crowd(5, 2);
        let mut lanes = LaneArrays::from_agents(&mut agents, &waypoints, 64);
        lanes.reached.iter_mut().for_each(|r| *r = true);
        advance_offload(&ScalarKernel, &mut lanes, &mut agents, &waypoints, 64).unwrap();
        assert!(lanes.reached[5..].iter().all(|&r| !r));
    }

    #[test]
    fn mismatched_buffers_are_rejected() {
        let (mut agents, waypoints) = crowd(10, 4);
        let mut lanes = LaneArrays::from_agents(&mut agents, &waypoints, 4);
        let launch = LaunchConfig::for_agents(10, 8);

        let err = RayonKernel
            .batch_advance(KernelBuffers::from_lanes(&mut lanes), launch)
            .unwrap_err();
        assert!(matches!(
            err,
            KernelError::BufferLength { buffer: "x", expected: 16, actual: 12 }
        ));

        let err = ScalarKernel
            .batch_advance(
                KernelBuffers::from_lanes(&mut lanes),
                LaunchConfig { group_size: 0, groups: 3 },
            )
            .unwrap_err();
        assert!(matches!(err, KernelError::EmptyGroup));
    }

    #[test]
    fn kernels_are_object_safe() {
        let kernels: Vec<Box<dyn BatchKernel>> = vec![Box::new(RayonKernel), Box::new(ScalarKernel)];
        let names: Vec<_> = kernels.iter().map(|k| k.name()).collect();
        assert_eq!(names, vec!["rayon", "scalar"]);
    }
}
