//! Offloaded batch execution.
//!
//! The host flattens the crowd once, hands the whole lane arrays to a
//! [`BatchKernel`] every tick, and afterwards walks the reached flags to
//! rotate routes.  The kernel sees nothing but numbers.
//!
//! # Launch geometry
//!
//! ```text
//! groups = ceil(n / group_size)
//! lanes  = groups * group_size        every buffer must be exactly this long
//! ```
//!
//! Lanes past the agent count are padding; the host ignores their flags.

use cs_agent::{Agent, WaypointSet};
use rayon::prelude::*;

use crate::{KernelError, KernelResult, LaneArrays, step_lane};

/// Work-group geometry of one launch.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct LaunchConfig {
    pub group_size: usize,
    pub groups:     usize,
}

impl LaunchConfig {
    /// Enough groups of `group_size` lanes to cover `agents`.
    pub fn for_agents(agents: usize, group_size: usize) -> Self {
        Self {
            group_size,
            groups: agents.div_ceil(group_size.max(1)),
        }
    }

    /// Total lanes launched.
    #[inline]
    pub fn lanes(&self) -> usize {
        self.groups * self.group_size
    }
}

/// The lane arrays a kernel reads and writes for one launch.
pub struct KernelBuffers<'a> {
    pub x:       &'a mut [i32],
    pub y:       &'a mut [i32],
    pub dest_x:  &'a [f32],
    pub dest_y:  &'a [f32],
    pub dest_r:  &'a [f32],
    pub reached: &'a mut [bool],
}

impl<'a> KernelBuffers<'a> {
    /// Borrow every array of `lanes`.
    pub fn from_lanes(lanes: &'a mut LaneArrays) -> Self {
        Self {
            x:       &mut lanes.x,
            y:       &mut lanes.y,
            dest_x:  &lanes.dest_x,
            dest_y:  &lanes.dest_y,
            dest_r:  &lanes.dest_r,
            reached: &mut lanes.reached,
        }
    }

    /// Check that `launch` is non-empty and every buffer matches its lane
    /// count.
    pub fn check(&self, launch: LaunchConfig) -> KernelResult<()> {
        if launch.group_size == 0 {
            return Err(KernelError::EmptyGroup);
        }
        let expected = launch.lanes();
        let lengths = [
            ("x", self.x.len()),
            ("y", self.y.len()),
            ("dest_x", self.dest_x.len()),
            ("dest_y", self.dest_y.len()),
            ("dest_r", self.dest_r.len()),
            ("reached", self.reached.len()),
        ];
        for (buffer, actual) in lengths {
            if actual != expected {
                return Err(KernelError::BufferLength { buffer, expected, actual });
            }
        }
        Ok(())
    }
}

/// A device (or device stand-in) that runs the lane step over whole buffers.
///
/// Implementations write the new positions into `x`/`y` and set `reached`
/// for every lane; they never touch agents or waypoints.
pub trait BatchKernel: Send + Sync {
    fn name(&self) -> &'static str;

    fn batch_advance(&self, buffers: KernelBuffers<'_>, launch: LaunchConfig) -> KernelResult<()>;
}

// ── RayonKernel ───────────────────────────────────────────────────────────────

/// Runs groups in parallel on the global rayon pool.
#[derive(Copy, Clone, Debug, Default)]
pub struct RayonKernel;

impl BatchKernel for RayonKernel {
    fn name(&self) -> &'static str {
        "rayon"
    }

    fn batch_advance(&self, buffers: KernelBuffers<'_>, launch: LaunchConfig) -> KernelResult<()> {
        buffers.check(launch)?;
        let KernelBuffers { x, y, dest_x, dest_y, dest_r, reached } = buffers;
        let g = launch.group_size;

        x.par_chunks_mut(g)
            .zip(y.par_chunks_mut(g))
            .zip(reached.par_chunks_mut(g))
            .enumerate()
            .for_each(|(group, ((xs, ys), hits))| {
                run_group(group * g, xs, ys, hits, dest_x, dest_y, dest_r);
            });
        Ok(())
    }
}

// ── ScalarKernel ──────────────────────────────────────────────────────────────

/// Runs groups one after another on the calling thread.  Reference
/// implementation for the parallel kernels.
#[derive(Copy, Clone, Debug, Default)]
pub struct ScalarKernel;

impl BatchKernel for ScalarKernel {
    fn name(&self) -> &'static str {
        "scalar"
    }

    fn batch_advance(&self, buffers: KernelBuffers<'_>, launch: LaunchConfig) -> KernelResult<()> {
        buffers.check(launch)?;
        let KernelBuffers { x, y, dest_x, dest_y, dest_r, reached } = buffers;
        let g = launch.group_size;

        for (group, ((xs, ys), hits)) in x
            .chunks_mut(g)
            .zip(y.chunks_mut(g))
            .zip(reached.chunks_mut(g))
            .enumerate()
        {
            run_group(group * g, xs, ys, hits, dest_x, dest_y, dest_r);
        }
        Ok(())
    }
}

#[inline]
fn run_group(
    base: usize,
    xs: &mut [i32],
    ys: &mut [i32],
    hits: &mut [bool],
    dest_x: &[f32],
    dest_y: &[f32],
    dest_r: &[f32],
) {
    for lane in 0..xs.len() {
        let i = base + lane;
        let (nx, ny, hit) = step_lane(xs[lane], ys[lane], dest_x[i], dest_y[i], dest_r[i]);
        xs[lane] = nx;
        ys[lane] = ny;
        hits[lane] = hit;
    }
}

// ── Host side ─────────────────────────────────────────────────────────────────

/// One offloaded tick: launch `kernel` over `lanes`, then rotate the route
/// of every agent whose lane reported reached.  Returns the reached count.
///
/// `lanes` must have been padded to a multiple of `group_size`.
pub fn advance_offload<K: BatchKernel + ?Sized>(
    kernel: &K,
    lanes: &mut LaneArrays,
    agents: &mut [Agent],
    waypoints: &WaypointSet,
    group_size: usize,
) -> KernelResult<usize> {
    let launch = LaunchConfig::for_agents(lanes.len(), group_size);
    kernel.batch_advance(KernelBuffers::from_lanes(lanes), launch)?;

    let mut reached_count = 0;
    for slot in 0..lanes.len() {
        if lanes.reached[slot] {
            lanes.advance_route(slot, &mut agents[slot], waypoints);
            reached_count += 1;
        }
    }
    Ok(reached_count)
}
