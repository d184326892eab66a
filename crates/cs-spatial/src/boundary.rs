//! Seam claim flags.
//!
//! Each seam owns two columns of `AtomicBool`, one for `left_x` and one for
//! `right_x`, indexed by y.  A region task that wants to step onto a seam
//! cell must flip that cell's flag from `false` to `true`; whoever loses the
//! compare-and-set picks its next candidate instead.  Cells off every seam
//! need no claim: region disjointness already keeps them single-writer.

use std::sync::atomic::{AtomicBool, Ordering};

use cs_agent::Agent;
use cs_core::Cell;

use crate::Seam;

struct SeamColumns {
    seam:  Seam,
    left:  Box<[AtomicBool]>,
    right: Box<[AtomicBool]>,
}

impl SeamColumns {
    fn column(&self, x: i32) -> Option<&[AtomicBool]> {
        if x == self.seam.left_x {
            Some(&self.left)
        } else if x == self.seam.right_x {
            Some(&self.right)
        } else {
            None
        }
    }
}

fn column(len: usize) -> Box<[AtomicBool]> {
    (0..len).map(|_| AtomicBool::new(false)).collect()
}

/// Tick-scoped table of seam claim flags.
///
/// Owned by the dispatcher and rebuilt at the start of every region-parallel
/// tick; region tasks only ever see `&BoundaryTable`.
#[derive(Default)]
pub struct BoundaryTable {
    columns: Vec<SeamColumns>,
    height:  usize,
}

impl BoundaryTable {
    /// Empty table whose columns will hold `y` in `0..=grid_height`.
    pub fn new(grid_height: i32) -> Self {
        Self {
            columns: Vec::new(),
            height:  grid_height.max(0) as usize + 1,
        }
    }

    /// Discard every flag and lay out fresh, cleared columns for `seams`.
    ///
    /// Seam cells occupied by an agent right now are marked claimed, so no
    /// agent from the neighboring region can step onto them this tick.
    pub fn rebuild(&mut self, seams: &[Seam], agents: &[Agent]) {
        self.columns.clear();
        self.columns.extend(seams.iter().map(|&seam| SeamColumns {
            seam,
            left:  column(self.height),
            right: column(self.height),
        }));

        for agent in agents {
            for cols in &self.columns {
                if let Some(flag) = self.flag(cols, agent.pos) {
                    flag.store(true, Ordering::Relaxed);
                }
            }
        }
    }

    /// `true` if column `x` belongs to any seam.
    pub fn is_seam_column(&self, x: i32) -> bool {
        self.columns.iter().any(|c| c.seam.touches(x))
    }

    /// Claim `cell` for the current tick.
    ///
    /// Off-seam cells always succeed.  A seam cell needs a successful
    /// `false → true` swap on every seam column it lies on (adjacent seams
    /// can share a column); if any swap fails, the ones already won for this
    /// cell are released and the claim fails.  Seam cells outside the
    /// table's y range cannot be claimed.
    pub fn try_claim(&self, cell: Cell) -> bool {
        let mut won: [Option<&AtomicBool>; 2] = [None, None];
        let mut n_won = 0;

        for cols in &self.columns {
            if cols.column(cell.x).is_none() {
                continue;
            }
            let Some(flag) = self.flag(cols, cell) else {
                self.release(&won[..n_won]);
                return false;
            };
            if flag
                .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
                .is_err()
            {
                self.release(&won[..n_won]);
                return false;
            }
            // A column lies on at most two seams (the right column of one
            // and the left column of the next).
            debug_assert!(n_won < won.len());
            won[n_won] = Some(flag);
            n_won += 1;
        }
        true
    }

    /// `true` if some agent holds `cell` this tick.  Off-seam cells are
    /// never tracked and report `false`.
    pub fn is_claimed(&self, cell: Cell) -> bool {
        self.columns
            .iter()
            .filter_map(|cols| self.flag(cols, cell))
            .any(|flag| flag.load(Ordering::Acquire))
    }

    pub fn seam_count(&self) -> usize {
        self.columns.len()
    }

    fn flag<'a>(&self, cols: &'a SeamColumns, cell: Cell) -> Option<&'a AtomicBool> {
        let y = usize::try_from(cell.y).ok()?;
        cols.column(cell.x)?.get(y)
    }

    fn release(&self, flags: &[Option<&AtomicBool>]) {
        for flag in flags.iter().flatten() {
            flag.store(false, Ordering::Release);
        }
    }
}
