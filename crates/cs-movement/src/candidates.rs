//! Candidate cells, highest priority first.

use cs_core::{Cell, GridBounds};

/// The desired cell followed by its two alternates.
///
/// An orthogonal step `(dx, dy)` (one component zero) yields the two cells
/// beside the desired one, `desired ± (dy, dx)`.  A diagonal step yields the
/// two orthogonal steps that share one coordinate with the desired cell and
/// the other with `current`.
///
/// A zero step (`desired == current`) counts as orthogonal, so all three
/// candidates are `current` itself.
pub fn forward_candidates(current: Cell, desired: Cell) -> [Cell; 3] {
    let dx = desired.x - current.x;
    let dy = desired.y - current.y;

    if dx == 0 || dy == 0 {
        [desired, desired.offset(dy, dx), desired.offset(-dy, -dx)]
    } else {
        [desired, Cell::new(desired.x, current.y), Cell::new(current.x, desired.y)]
    }
}

/// Back-off cells permitted from `current`, in the order they are tried.
///
/// `(x-1, y-1)` needs `x > 0 && y > 0`; `(x+1, y+1)` needs the grid's upper
/// bound check to pass.  Both are judged from `current`, never from each
/// other.
pub fn backoffs(current: Cell, grid: GridBounds) -> impl Iterator<Item = Cell> {
    let back = (current.x > 0 && current.y > 0).then(|| current.offset(-1, -1));
    let fwd = grid.allows_forward_backoff(current).then(|| current.offset(1, 1));
    back.into_iter().chain(fwd)
}
