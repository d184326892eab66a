//! Fluent builder for constructing an `AgentStore` + `WaypointSet` in one step.
//!
//! # Usage
//!
//! ```rust
//! use cs_agent::AgentStoreBuilder;
//! use cs_core::Cell;
//!
//! let mut builder = AgentStoreBuilder::new();
//! let north = builder.add_waypoint(60.0, 5.0, 3.0);
//! let south = builder.add_waypoint(60.0, 75.0, 3.0);
//! builder.add_agent(Cell::new(10, 40), [north, south]);
//!
//! let (store, waypoints) = builder.build().unwrap();
//! assert_eq!(store.len(), 1);
//! assert_eq!(waypoints.len(), 2);
//! ```

use cs_core::{AgentId, Cell, WaypointId};

use crate::{Agent, AgentError, AgentResult, AgentStore, WaypointSet};

/// Fluent builder for [`AgentStore`] + [`WaypointSet`].
///
/// Agent ids are handed out densely in insertion order.  Routes are only
/// checked against the waypoint set in [`build`](Self::build), so agents and
/// waypoints may be added in any order.
#[derive(Default)]
pub struct AgentStoreBuilder {
    waypoints: WaypointSet,
    agents:    Vec<(Cell, Vec<WaypointId>)>,
}

impl AgentStoreBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a destination zone and return its id.
    pub fn add_waypoint(&mut self, x: f64, y: f64, r: f64) -> WaypointId {
        self.waypoints.push(x, y, r)
    }

    /// Queue an agent starting on `pos` that loops through `route`.
    pub fn add_agent(
        &mut self,
        pos:   Cell,
        route: impl IntoIterator<Item = WaypointId>,
    ) -> &mut Self {
        self.agents.push((pos, route.into_iter().collect()));
        self
    }

    pub fn agent_count(&self) -> usize {
        self.agents.len()
    }

    /// Validate routes and construct the store.
    pub fn build(self) -> AgentResult<(AgentStore, WaypointSet)> {
        if u32::try_from(self.agents.len()).is_err() {
            return Err(AgentError::TooManyAgents(self.agents.len()));
        }

        let mut agents = Vec::with_capacity(self.agents.len());
        for (i, (pos, route)) in self.agents.into_iter().enumerate() {
            let id = AgentId(i as u32);
            if let Some(&bad) = route.iter().find(|&&w| !self.waypoints.contains(w)) {
                return Err(AgentError::UnknownWaypoint { agent: id, waypoint: bad });
            }
            agents.push(Agent::new(id, pos, route));
        }

        Ok((AgentStore::new(agents), self.waypoints))
    }
}
