//! Square-neighborhood queries over the full agent set.
//!
//! Queries scan every agent; crowds in this engine are a few thousand
//! agents on a grid of ~10⁴ cells, and the scan touches nothing but a dense
//! array of positions.

use std::sync::atomic::{AtomicU64, Ordering};

use cs_agent::Agent;
use cs_core::Cell;

/// Anything that can report the current cell of every agent slot.
///
/// Implementations must return an untorn `(x, y)` pair for each slot.
pub trait OccupancySource {
    fn slot_count(&self) -> usize;
    fn cell_at(&self, slot: usize) -> Cell;
}

impl OccupancySource for [Agent] {
    #[inline]
    fn slot_count(&self) -> usize {
        self.len()
    }

    #[inline]
    fn cell_at(&self, slot: usize) -> Cell {
        self[slot].pos
    }
}

/// Slots of every agent with `|a.x − at.x| < dist && |a.y − at.y| < dist`.
///
/// The agent standing on `at` (usually the caller) is included.
pub fn neighbors<S: OccupancySource + ?Sized>(source: &S, at: Cell, dist: i32) -> Vec<usize> {
    (0..source.slot_count())
        .filter(|&slot| at.within(source.cell_at(slot), dist))
        .collect()
}

/// Cells taken by the agents [`neighbors`] would return.
pub fn occupied_cells<S: OccupancySource + ?Sized>(source: &S, at: Cell, dist: i32) -> Vec<Cell> {
    (0..source.slot_count())
        .map(|slot| source.cell_at(slot))
        .filter(|&cell| at.within(cell, dist))
        .collect()
}

// ── AtomicCells ───────────────────────────────────────────────────────────────

/// Per-slot positions published as single `AtomicU64` words.
///
/// Region tasks read every agent's position from here while other tasks are
/// writing theirs.  Packing both coordinates into one word means a reader
/// sees either the old or the new cell of an agent, never a mix.  Each slot
/// has exactly one writer (the task that owns the agent), so `Relaxed` is
/// enough: the only cross-task agreement that matters goes through the
/// boundary table's compare-and-set.
#[derive(Default)]
pub struct AtomicCells {
    slots: Vec<AtomicU64>,
}

impl AtomicCells {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite the mirror with the current slot order of `agents`,
    /// reusing the allocation.
    pub fn load_from(&mut self, agents: &[Agent]) {
        self.slots.clear();
        self.slots
            .extend(agents.iter().map(|a| AtomicU64::new(a.pos.pack())));
    }

    #[inline]
    pub fn load(&self, slot: usize) -> Cell {
        Cell::unpack(self.slots[slot].load(Ordering::Relaxed))
    }

    #[inline]
    pub fn store(&self, slot: usize, cell: Cell) {
        self.slots[slot].store(cell.pack(), Ordering::Relaxed);
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl OccupancySource for AtomicCells {
    #[inline]
    fn slot_count(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    fn cell_at(&self, slot: usize) -> Cell {
        self.load(slot)
    }
}
