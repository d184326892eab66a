//! Agent storage and the position-store capability.
//!
//! # Two representations
//!
//! The object-backed strategies keep each agent's coordinates inside its
//! [`Agent`].  The batch strategies move them into flattened parallel arrays
//! (see `cs_batch::LaneArrays`) so whole lanes load with one instruction.
//! Both sides implement [`PositionStore`]; the simulation picks one backing
//! when it is built and never consults the other for positions afterwards.
//!
//! # Slots vs identity
//!
//! A *slot* is an index into the backing array.  Region-parallel ticks sort
//! the agent array by x, so a slot says nothing about which agent sits in
//! it; use [`PositionStore::agent_id`] to recover identity.

use cs_core::{AgentId, Cell};

use crate::Agent;

/// Read/write access to agent coordinates, whatever holds them.
pub trait PositionStore {
    /// Number of agents (padding lanes excluded).
    fn agent_count(&self) -> usize;

    /// Identity of the agent in `slot`.
    fn agent_id(&self, slot: usize) -> AgentId;

    /// Authoritative position of the agent in `slot`.
    fn position(&self, slot: usize) -> Cell;

    fn set_position(&mut self, slot: usize, cell: Cell);

    /// Every agent's position, indexed by `AgentId` rather than slot.
    fn positions_by_id(&self) -> Vec<Cell> {
        let mut out = vec![Cell::default(); self.agent_count()];
        for slot in 0..self.agent_count() {
            out[self.agent_id(slot).index()] = self.position(slot);
        }
        out
    }
}

/// Object-backed agent storage.
///
/// `AgentId`s are dense (`0..count`) but the slot order is free to change.
#[derive(Clone, Debug, Default)]
pub struct AgentStore {
    pub agents: Vec<Agent>,
}

impl AgentStore {
    pub(crate) fn new(agents: Vec<Agent>) -> Self {
        Self { agents }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.agents.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// Iterator over agents in slot order.
    pub fn iter(&self) -> impl Iterator<Item = &Agent> + '_ {
        self.agents.iter()
    }

    /// Slot currently holding `id`, by linear scan.  Meant for tests and
    /// tooling, not the tick loop.
    pub fn slot_of(&self, id: AgentId) -> Option<usize> {
        self.agents.iter().position(|a| a.id == id)
    }
}

impl PositionStore for AgentStore {
    #[inline]
    fn agent_count(&self) -> usize {
        self.agents.len()
    }

    #[inline]
    fn agent_id(&self, slot: usize) -> AgentId {
        self.agents[slot].id
    }

    #[inline]
    fn position(&self, slot: usize) -> Cell {
        self.agents[slot].pos
    }

    #[inline]
    fn set_position(&mut self, slot: usize, cell: Cell) {
        self.agents[slot].pos = cell;
    }
}
