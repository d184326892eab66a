//! `cs-batch` — the two batch strategies, which trade collision avoidance for
//! arithmetic throughput.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                         |
//! |--------------|------------------------------------------------------------------|
//! | [`lanes`]    | `LaneArrays` (flattened SoA positions + destinations), `step_lane` |
//! | [`vector`]   | `advance_vector` — groups of 4 lanes through `wide::f32x4`       |
//! | [`kernel`]   | `BatchKernel`, `LaunchConfig`, `KernelBuffers`, `RayonKernel`, `ScalarKernel`, `advance_offload` |
//! | [`error`]    | `KernelError`, `KernelResult<T>`                                 |
//!
//! # Lane step
//!
//! Every lane runs the same arithmetic:
//!
//! ```text
//! diff    = dest - pos
//! len     = sqrt(diff.x² + diff.y²)
//! reached = len < r
//! pos     = round(pos + diff / len)      (unless len == 0)
//! ```
//!
//! No neighbor is consulted, so agents may end up sharing a cell.  Reached
//! lanes hand control back to the host, which rotates the agent's route and
//! refreshes that lane's destination before the next group (vector) or the
//! next tick (offload).

pub mod error;
pub mod kernel;
pub mod lanes;
pub mod vector;

#[cfg(test)]
mod tests;

pub use error::{KernelError, KernelResult};
pub use kernel::{
    BatchKernel, KernelBuffers, LaunchConfig, RayonKernel, ScalarKernel, advance_offload,
};
pub use lanes::{LaneArrays, step_lane};
pub use vector::{LANES, advance_vector};
