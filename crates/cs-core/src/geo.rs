//! Integer grid geometry.
//!
//! Agents live on whole cells.  Distances used by the movement core are
//! Chebyshev (square neighborhoods); the only Euclidean distance in the
//! engine is the destination-reached test, which works in floating point on
//! the waypoint side.

/// One cell of the simulation grid.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Cell displaced by `(dx, dy)`.
    #[inline]
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self { x: self.x + dx, y: self.y + dy }
    }

    /// `true` if `other` lies strictly inside the square of half-width
    /// `dist` around `self` (`|dx| < dist && |dy| < dist`).
    #[inline]
    pub fn within(self, other: Cell, dist: i32) -> bool {
        (other.x - self.x).abs() < dist && (other.y - self.y).abs() < dist
    }

    /// Pack both coordinates into one word so they can be published
    /// atomically.  `unpack(pack(c)) == c` for every `Cell`.
    #[inline]
    pub const fn pack(self) -> u64 {
        ((self.x as u32 as u64) << 32) | (self.y as u32 as u64)
    }

    #[inline]
    pub const fn unpack(word: u64) -> Self {
        Self {
            x: (word >> 32) as u32 as i32,
            y: word as u32 as i32,
        }
    }
}

impl std::fmt::Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Upper grid bounds used by the back-off bound check and to size the
/// boundary conflict columns.
///
/// The lower bound is always 0.  Bounds are exclusive for the purpose of the
/// `(+1, +1)` back-off test: a back-off is only attempted from a cell with
/// `x < width && y < height`, so agents can end up on `x == width` or
/// `y == height` but never beyond.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridBounds {
    pub width: i32,
    pub height: i32,
}

impl GridBounds {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// `true` if a `(+1, +1)` back-off from `cell` is permitted.
    #[inline]
    pub fn allows_forward_backoff(self, cell: Cell) -> bool {
        cell.x < self.width && cell.y < self.height
    }
}

impl Default for GridBounds {
    /// The 120 × 80 grid the demo scenarios are drawn on.
    fn default() -> Self {
        Self { width: 120, height: 80 }
    }
}
