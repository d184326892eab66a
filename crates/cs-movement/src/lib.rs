//! `cs-movement` — turn an agent's desired cell into the cell it actually
//! takes.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                  |
//! |-----------------|-----------------------------------------------------------|
//! | [`candidates`]  | Forward candidates in priority order, back-off cells      |
//! | [`claim`]       | `CellClaim` — gate on committing a cell (`Unguarded`, `BoundaryTable`) |
//! | [`resolver`]    | `move_agent`, `move_agent_atomic`, `Outcome`              |
//!
//! # Resolution order
//!
//! ```text
//! taken = cells of every agent within distance 2 (the mover included)
//! for c in [desired, alt1, alt2]:
//!     if c not in taken and claim(c): commit c
//! if x > 0 and y > 0:            try (x-1, y-1) the same way
//! if x < width and y < height:   try (x+1, y+1) the same way
//! otherwise stay put
//! ```
//!
//! The sequential resolver claims through [`Unguarded`], which always
//! agrees.  The region-parallel resolver claims through the tick's
//! [`BoundaryTable`](cs_spatial::BoundaryTable), which only lets one region
//! take any given seam cell.

pub mod candidates;
pub mod claim;
pub mod resolver;


pub use candidates::{backoffs, forward_candidates};
pub use claim::{CellClaim, Unguarded};
pub use resolver::{NEIGHBOR_DIST, Outcome, move_agent, move_agent_atomic, resolve};
