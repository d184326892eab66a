//! Flattened per-agent arrays.
//!
//! Slot `i` of every array belongs to the agent in slot `i` of the agent
//! array the lanes were built from.  Arrays are padded past the agent count
//! to a multiple of the requested group width; padding lanes sit at the
//! origin with a zero-radius destination on their own cell, so they never
//! move and never report reached.

use cs_agent::{Agent, PositionStore, Waypoint, WaypointSet};
use cs_core::{AgentId, Cell};

#[derive(Clone, Debug, Default)]
pub struct LaneArrays {
    pub x: Vec<i32>,
    pub y: Vec<i32>,
    pub dest_x: Vec<f32>,
    pub dest_y: Vec<f32>,
    pub dest_r: Vec<f32>,
    /// Per-lane reached flag written by offload kernels.
    pub reached: Vec<bool>,
    ids: Vec<AgentId>,
}

impl LaneArrays {
    /// Flatten `agents`, padding every array to a multiple of `pad_to`.
    ///
    /// Each agent first picks its destination with
    /// [`Agent::next_destination`].  Agents still without one get their own
    /// cell and radius 0, so they stay put for the whole run.
    pub fn from_agents(agents: &mut [Agent], waypoints: &WaypointSet, pad_to: usize) -> Self {
        let n = agents.len();
        let padded = n.next_multiple_of(pad_to.max(1));

        let mut lanes = Self {
            x: vec![0; padded],
            y: vec![0; padded],
            dest_x: vec![0.0; padded],
            dest_y: vec![0.0; padded],
            dest_r: vec![0.0; padded],
            reached: vec![false; padded],
            ids: Vec::with_capacity(n),
        };

        for (slot, agent) in agents.iter_mut().enumerate() {
            lanes.ids.push(agent.id);
            lanes.x[slot] = agent.pos.x;
            lanes.y[slot] = agent.pos.y;
            match agent.next_destination(waypoints) {
                Some(id) => lanes.set_destination(slot, waypoints.get(id)),
                None => lanes.park(slot),
            }
        }
        lanes
    }

    /// Number of real agents.
    #[inline]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Array length including padding.
    #[inline]
    pub fn padded_len(&self) -> usize {
        self.x.len()
    }

    /// Copy `wp` into the destination lanes of `slot`.
    #[inline]
    pub fn set_destination(&mut self, slot: usize, wp: &Waypoint) {
        self.dest_x[slot] = wp.x as f32;
        self.dest_y[slot] = wp.y as f32;
        self.dest_r[slot] = wp.r as f32;
    }

    /// Point `slot` at its own cell with radius 0.
    fn park(&mut self, slot: usize) {
        self.dest_x[slot] = self.x[slot] as f32;
        self.dest_y[slot] = self.y[slot] as f32;
        self.dest_r[slot] = 0.0;
    }

    /// Rotate the route of the agent in `slot` and refresh its lanes.
    pub(crate) fn advance_route(&mut self, slot: usize, agent: &mut Agent, waypoints: &WaypointSet) {
        debug_assert_eq!(agent.id, self.ids[slot]);
        if let Some(id) = agent.next_destination_special() {
            self.set_destination(slot, waypoints.get(id));
        }
    }
}

impl PositionStore for LaneArrays {
    #[inline]
    fn agent_count(&self) -> usize {
        self.ids.len()
    }

    #[inline]
    fn agent_id(&self, slot: usize) -> AgentId {
        self.ids[slot]
    }

    #[inline]
    fn position(&self, slot: usize) -> Cell {
        Cell::new(self.x[slot], self.y[slot])
    }

    #[inline]
    fn set_position(&mut self, slot: usize, cell: Cell) {
        self.x[slot] = cell.x;
        self.y[slot] = cell.y;
    }
}

/// One lane of the batch step, in plain `f32`.
///
/// Returns the new cell and whether the destination was reached from the
/// old one.  Rounds half to even, like the hardware lane rounding the
/// vector path uses.
#[inline]
pub fn step_lane(x: i32, y: i32, dest_x: f32, dest_y: f32, dest_r: f32) -> (i32, i32, bool) {
    let fx = x as f32;
    let fy = y as f32;
    let diff_x = dest_x - fx;
    let diff_y = dest_y - fy;
    let len = (diff_x * diff_x + diff_y * diff_y).sqrt();
    let reached = len < dest_r;

    if len > 0.0 {
        let nx = (fx + diff_x / len).round_ties_even() as i32;
        let ny = (fy + diff_y / len).round_ties_even() as i32;
        (nx, ny, reached)
    } else {
        (x, y, reached)
    }
}
