//! Seeded procedural crowds.
//!
//! Scenario files are not part of the engine; this generator stands in for
//! them in the demo, the benchmarks and the tests.  It lays out a ring of
//! destination zones around the grid and scatters agents over distinct
//! cells, each looping through the zones starting from a random one.

use rand::rngs::SmallRng;
use rand::seq::index;
use rand::{Rng, SeedableRng};

use cs_core::{Cell, GridBounds};

use crate::{AgentError, AgentResult, AgentStore, AgentStoreBuilder, WaypointSet};

/// Parameters for a generated crowd.
#[derive(Clone, Debug)]
pub struct CrowdScenario {
    pub agent_count: usize,
    pub grid:        GridBounds,
    pub seed:        u64,
    /// Number of destination zones placed around the grid border.
    pub waypoint_count: usize,
    /// Radius of every generated zone.
    pub waypoint_radius: f64,
}

impl CrowdScenario {
    pub fn new(agent_count: usize, grid: GridBounds, seed: u64) -> Self {
        Self {
            agent_count,
            grid,
            seed,
            waypoint_count:  4,
            waypoint_radius: 3.0,
        }
    }

    /// Generate agents on unique cells with looping routes.
    pub fn build(&self) -> AgentResult<(AgentStore, WaypointSet)> {
        let w = self.grid.width.max(0) as usize;
        let h = self.grid.height.max(0) as usize;
        if self.agent_count > w * h {
            return Err(AgentError::Scenario(format!(
                "{} agents do not fit on a {}x{} grid",
                self.agent_count, w, h
            )));
        }
        if self.agent_count > 0 && self.waypoint_count == 0 {
            return Err(AgentError::Scenario("a crowd needs at least one waypoint".into()));
        }

        let mut rng = SmallRng::seed_from_u64(self.seed);
        let mut builder = AgentStoreBuilder::new();

        let zones: Vec<_> = (0..self.waypoint_count)
            .map(|k| {
                let (x, y) = self.zone_center(k);
                builder.add_waypoint(x, y, self.waypoint_radius)
            })
            .collect();

        let cells = index::sample(&mut rng, w * h, self.agent_count);
        for cell in cells.iter() {
            let pos = Cell::new((cell % w) as i32, (cell / w) as i32);
            let start = rng.gen_range(0..zones.len());
            let route = zones.iter().cycle().skip(start).take(zones.len()).copied();
            builder.add_agent(pos, route);
        }

        builder.build()
    }

    /// Centers spread evenly on an ellipse inset from the grid border.
    fn zone_center(&self, k: usize) -> (f64, f64) {
        let cx = self.grid.width as f64 / 2.0;
        let cy = self.grid.height as f64 / 2.0;
        let angle = std::f64::consts::TAU * k as f64 / self.waypoint_count as f64;
        ((cx + 0.8 * cx * angle.cos()).round(), (cy + 0.8 * cy * angle.sin()).round())
    }
}
