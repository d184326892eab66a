//! The gate a free candidate must pass before it is committed.

use cs_core::Cell;
use cs_spatial::BoundaryTable;

/// Decides whether a free cell may be committed this tick.
///
/// A successful claim is final for the tick; there is no release.
pub trait CellClaim {
    fn try_claim(&self, cell: Cell) -> bool;
}

/// Accepts every cell.  Used when only one task moves agents.
#[derive(Copy, Clone, Debug, Default)]
pub struct Unguarded;

impl CellClaim for Unguarded {
    #[inline(always)]
    fn try_claim(&self, _cell: Cell) -> bool {
        true
    }
}

impl CellClaim for BoundaryTable {
    #[inline]
    fn try_claim(&self, cell: Cell) -> bool {
        BoundaryTable::try_claim(self, cell)
    }
}
