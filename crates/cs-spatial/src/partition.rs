//! Dynamic x-range partitioning of the agent array.
//!
//! # Algorithm
//!
//! ```text
//! sort agents by x
//! target = max(1, floor(N * max_fraction))
//! start  = 0
//! while start < N:
//!     end = min(start + target, N)
//!     while end < N and x[end] == x[end - 1]:   never split an x column
//!         end += 1
//!     push region start..end
//!     if end < N: push seam (x[end - 1], x[end - 1] + 1)
//!     start = end
//! ```
//!
//! Because the agent array itself is sorted, every region is a contiguous
//! run of slots.  The region-parallel tick exploits that to hand each task a
//! disjoint `&mut [Agent]`.

use std::ops::Range;

use cs_agent::Agent;

/// A contiguous run of slots in the x-sorted agent array.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Region {
    /// Slots owned by this region.
    pub slots: Range<usize>,
    /// Smallest x in the region at partition time.
    pub lo_x: i32,
    /// One past the largest x in the region at partition time.
    pub hi_x: i32,
}

impl Region {
    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

/// The one-column gap between two adjacent regions.  `right_x == left_x + 1`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Seam {
    pub left_x:  i32,
    pub right_x: i32,
}

impl Seam {
    #[inline]
    pub fn after(last_x: i32) -> Self {
        Self { left_x: last_x, right_x: last_x + 1 }
    }

    /// `true` if column `x` is one of this seam's two columns.
    #[inline]
    pub fn touches(self, x: i32) -> bool {
        x == self.left_x || x == self.right_x
    }
}

/// Result of one partition pass.
///
/// Invariants: regions are non-empty, disjoint, ordered by x, cover every
/// slot exactly once; `seams.len() == regions.len() - 1` (or both empty).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Partition {
    pub regions: Vec<Region>,
    pub seams:   Vec<Seam>,
}

impl Partition {
    pub fn region_count(&self) -> usize {
        self.regions.len()
    }

    /// Largest region, in agents.
    pub fn max_region_len(&self) -> usize {
        self.regions.iter().map(Region::len).max().unwrap_or(0)
    }
}

/// Sort `agents` by x in place and cut them into regions of at most
/// `floor(N * max_fraction)` agents, widened so no x column is split.
pub fn partition(agents: &mut [Agent], max_fraction: f32) -> Partition {
    let n = agents.len();
    let mut out = Partition::default();
    if n == 0 {
        return out;
    }

    agents.sort_unstable_by_key(|a| a.pos.x);

    let target = ((n as f64 * max_fraction as f64).floor() as usize).max(1);

    let mut start = 0;
    while start < n {
        let mut end = (start + target).min(n);
        let last_x = agents[end - 1].pos.x;
        while end < n && agents[end].pos.x == last_x {
            end += 1;
        }

        out.regions.push(Region {
            slots: start..end,
            lo_x:  agents[start].pos.x,
            hi_x:  last_x + 1,
        });
        if end < n {
            out.seams.push(Seam::after(last_x));
        }
        start = end;
    }

    out
}
