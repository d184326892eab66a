//! The vector-lane batch tick.
//!
//! Lanes are processed four at a time with `wide::f32x4`, front to back.  A
//! reached lane rotates its agent's route and reloads its destination
//! lanes immediately, so a later group never sees a stale destination.

use cs_agent::{Agent, WaypointSet};
use wide::{CmpGt, CmpLt, f32x4};

use crate::{LaneArrays, step_lane};

/// Lanes per vector group.
pub const LANES: usize = 4;

/// Advance every lane one step.  Returns how many agents reached their
/// destination.
///
/// `agents` must be the slice `lanes` was built from, in the same slot
/// order.  Any lanes past the last full group run through [`step_lane`].
pub fn advance_vector(lanes: &mut LaneArrays, agents: &mut [Agent], waypoints: &WaypointSet) -> usize {
    debug_assert_eq!(agents.len(), lanes.len());
    let n = lanes.len();
    let full = lanes.padded_len() / LANES * LANES;
    let mut reached_count = 0;

    for base in (0..full).step_by(LANES) {
        let mask = step_group(lanes, base);
        if mask == 0 {
            continue;
        }
        for lane in 0..LANES {
            let slot = base + lane;
            if mask & (1 << lane) != 0 && slot < n {
                lanes.advance_route(slot, &mut agents[slot], waypoints);
                reached_count += 1;
            }
        }
    }

    for slot in full..lanes.padded_len() {
        let (x, y, hit) = step_lane(
            lanes.x[slot],
            lanes.y[slot],
            lanes.dest_x[slot],
            lanes.dest_y[slot],
            lanes.dest_r[slot],
        );
        lanes.x[slot] = x;
        lanes.y[slot] = y;
        if hit && slot < n {
            lanes.advance_route(slot, &mut agents[slot], waypoints);
            reached_count += 1;
        }
    }

    reached_count
}

/// Step lanes `base..base + 4` and return their reached bits.
#[inline]
fn step_group(lanes: &mut LaneArrays, base: usize) -> i32 {
    let group = base..base + LANES;

    let x = load_i32(&lanes.x[group.clone()]);
    let y = load_i32(&lanes.y[group.clone()]);
    let dest_x = load_f32(&lanes.dest_x[group.clone()]);
    let dest_y = load_f32(&lanes.dest_y[group.clone()]);
    let dest_r = load_f32(&lanes.dest_r[group.clone()]);

    let diff_x = dest_x - x;
    let diff_y = dest_y - y;
    let len = (diff_x * diff_x + diff_y * diff_y).sqrt();
    let reached = len.cmp_lt(dest_r);

    // Zero-length lanes would divide by zero; they keep their cell.
    let moving = len.cmp_gt(f32x4::ZERO);
    let new_x = moving.blend((x + diff_x / len).round(), x);
    let new_y = moving.blend((y + diff_y / len).round(), y);

    store_i32(&mut lanes.x[group.clone()], new_x);
    store_i32(&mut lanes.y[group], new_y);

    reached.move_mask()
}

#[inline(always)]
fn load_i32(src: &[i32]) -> f32x4 {
    f32x4::new([src[0] as f32, src[1] as f32, src[2] as f32, src[3] as f32])
}

#[inline(always)]
fn load_f32(src: &[f32]) -> f32x4 {
    f32x4::new([src[0], src[1], src[2], src[3]])
}

#[inline(always)]
fn store_i32(dst: &mut [i32], values: f32x4) {
    for (d, v) in dst.iter_mut().zip(values.to_array()) {
        *d = v as i32;
    }
}
