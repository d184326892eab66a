//! Collision-avoiding moves.
//!
//! Nothing here fails: an agent with no free candidate simply stays where it
//! is, and cells beyond the grid are never validated beyond the back-off
//! bounds.

use cs_agent::Agent;
use cs_core::{Cell, GridBounds};
use cs_spatial::{AtomicCells, BoundaryTable, occupied_cells};

use crate::{CellClaim, Unguarded, backoffs, forward_candidates};

/// Half-width of the square searched for occupied cells.
pub const NEIGHBOR_DIST: i32 = 2;

/// What the resolver did with one agent.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Took forward candidate `rank` (0 = desired cell).
    Forward(u8),
    /// No forward candidate was free; took a back-off cell.
    BackedOff,
    /// Nothing was free.
    Stayed,
}

/// Pick the cell an agent at `current` wanting `desired` ends up on.
///
/// A candidate is usable when it is not in `taken` and `claim` accepts it.
/// Rejected candidates are never retried.
pub fn resolve<C: CellClaim + ?Sized>(
    current: Cell,
    desired: Cell,
    taken: &[Cell],
    grid: GridBounds,
    claim: &C,
) -> (Cell, Outcome) {
    let usable = |cell: &Cell| !taken.contains(cell) && claim.try_claim(*cell);

    for (rank, cell) in forward_candidates(current, desired).into_iter().enumerate() {
        if usable(&cell) {
            return (cell, Outcome::Forward(rank as u8));
        }
    }
    match backoffs(current, grid).find(usable) {
        Some(cell) => (cell, Outcome::BackedOff),
        None => (current, Outcome::Stayed),
    }
}

/// Move the agent in `slot`, reading neighbors straight from `agents`.
///
/// Single-writer only: later agents in the same tick see this agent's new
/// cell.
pub fn move_agent(agents: &mut [Agent], slot: usize, grid: GridBounds) -> Outcome {
    let (pos, desired) = (agents[slot].pos, agents[slot].desired);
    let taken = occupied_cells(&*agents, pos, NEIGHBOR_DIST);
    let (cell, outcome) = resolve(pos, desired, &taken, grid, &Unguarded);
    agents[slot].pos = cell;
    outcome
}

/// Move `agent`, which sits in `slot` of the mirror, while other region tasks
/// do the same.
///
/// Neighbors come from `mirror`; every committed cell must also be claimed
/// through `table`.  The new position is written to both the agent and its
/// mirror slot.
pub fn move_agent_atomic(
    agent: &mut Agent,
    slot: usize,
    mirror: &AtomicCells,
    table: &BoundaryTable,
    grid: GridBounds,
) -> Outcome {
    let taken = occupied_cells(mirror, agent.pos, NEIGHBOR_DIST);
    let (cell, outcome) = resolve(agent.pos, agent.desired, &taken, grid, table);
    if cell != agent.pos {
        agent.pos = cell;
        mirror.store(slot, cell);
    }
    outcome
}
