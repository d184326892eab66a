//! Destination zones.

use cs_core::{Cell, WaypointId};

/// A circular target zone an agent walks towards.
///
/// Geometry is kept in `f64`; the batch strategies cache it as `f32` lanes.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Waypoint {
    pub id: WaypointId,
    pub x:  f64,
    pub y:  f64,
    /// Zone radius.  An agent has reached the zone when its distance to the
    /// center is *strictly* less than this.
    pub r:  f64,
}

impl Waypoint {
    /// Euclidean distance from the zone center to `cell`.
    #[inline]
    pub fn distance_from(&self, cell: Cell) -> f64 {
        (self.x - cell.x as f64).hypot(self.y - cell.y as f64)
    }

    /// `distance < r`.  A zero radius is never reached.
    #[inline]
    pub fn is_reached_from(&self, cell: Cell) -> bool {
        self.distance_from(cell) < self.r
    }
}

/// All waypoints of a scenario, indexed by `WaypointId`.
#[derive(Clone, Debug, Default)]
pub struct WaypointSet {
    inner: Vec<Waypoint>,
}

impl WaypointSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a zone and return its id.
    pub fn push(&mut self, x: f64, y: f64, r: f64) -> WaypointId {
        let id = WaypointId(self.inner.len() as u32);
        self.inner.push(Waypoint { id, x, y, r });
        id
    }

    /// The zone for `id`.
    ///
    /// # Panics
    /// Panics if `id` is not part of this set; `AgentStoreBuilder::build`
    /// rejects routes through unknown ids, so agents never hold one.
    #[inline]
    pub fn get(&self, id: WaypointId) -> &Waypoint {
        &self.inner[id.index()]
    }

    #[inline]
    pub fn contains(&self, id: WaypointId) -> bool {
        id.index() < self.inner.len()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Waypoint> + '_ {
        self.inner.iter()
    }
}
