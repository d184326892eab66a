//! A single pedestrian: where it is, where it wants to step next, and the
//! loop of destinations it walks.

use std::collections::VecDeque;

use cs_core::{AgentId, Cell, WaypointId};

use crate::WaypointSet;

/// One mobile agent.
///
/// `pos` is authoritative only under the object-backed strategies
/// (sequential, thread-pool, region-parallel).  Under the batch strategies
/// the lane arrays own the coordinates and `pos` keeps its setup value.
#[derive(Clone, Debug, PartialEq)]
pub struct Agent {
    pub id: AgentId,

    /// Current cell.
    pub pos: Cell,

    /// Cell the agent would like to occupy after this tick.  Recomputed by
    /// [`compute_next_desired_position`](Self::compute_next_desired_position)
    /// every tick; starts equal to `pos`.
    pub desired: Cell,

    /// Zone currently being walked towards.
    pub destination: Option<WaypointId>,

    /// Remaining zones, front first.  Reached destinations are re-queued at
    /// the back, so a route loops forever.
    route: VecDeque<WaypointId>,
}

impl Agent {
    pub fn new(id: AgentId, pos: Cell, route: impl IntoIterator<Item = WaypointId>) -> Self {
        Self {
            id,
            pos,
            desired: pos,
            destination: None,
            route: route.into_iter().collect(),
        }
    }

    /// Queued zones after the active destination.
    pub fn route(&self) -> impl ExactSizeIterator<Item = WaypointId> + '_ {
        self.route.iter().copied()
    }

    /// Advance the destination if the current one has been reached.
    ///
    /// With no active destination, or once the active one is reached, the
    /// front of the route becomes the destination and the old destination is
    /// re-queued at the back.  An empty route keeps whatever is active.
    pub fn next_destination(&mut self, waypoints: &WaypointSet) -> Option<WaypointId> {
        let reached = match self.destination {
            Some(id) => waypoints.get(id).is_reached_from(self.pos),
            None     => true,
        };
        if reached && !self.route.is_empty() {
            self.rotate_route();
        }
        self.destination
    }

    /// Advance the destination unconditionally.
    ///
    /// Used by the batch strategies, which have already decided the
    /// destination was reached using their own lane arithmetic.
    pub fn next_destination_special(&mut self) -> Option<WaypointId> {
        self.rotate_route();
        self.destination
    }

    fn rotate_route(&mut self) {
        if let Some(current) = self.destination {
            self.route.push_back(current);
        }
        if let Some(next) = self.route.pop_front() {
            self.destination = Some(next);
        }
    }

    /// Refresh the destination and set `desired` to the cell one unit step
    /// towards it, rounded to the nearest cell.
    ///
    /// Without any destination the desired cell is left untouched.  When the
    /// agent stands exactly on the zone center it wants to stay where it is.
    pub fn compute_next_desired_position(&mut self, waypoints: &WaypointSet) {
        let Some(dest) = self.next_destination(waypoints) else {
            return;
        };
        let wp = waypoints.get(dest);

        let x = self.pos.x as f64;
        let y = self.pos.y as f64;
        let diff_x = wp.x - x;
        let diff_y = wp.y - y;
        let len = diff_x.hypot(diff_y);

        self.desired = if len == 0.0 {
            self.pos
        } else {
            Cell::new((x + diff_x / len).round() as i32, (y + diff_y / len).round() as i32)
        };
    }
}
