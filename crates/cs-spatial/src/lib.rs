//! `cs-spatial` — who is near whom, and who owns which columns.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                   |
//! |-----------------|------------------------------------------------------------|
//! | [`neighbors`]   | `OccupancySource`, `AtomicCells` mirror, square queries    |
//! | [`partition`]   | `partition()` → `Partition { regions, seams }`             |
//! | [`boundary`]    | `BoundaryTable` — per-seam atomic claim flags              |
//!
//! # Region-parallel data flow
//!
//! ```text
//! partition(&mut agents)        sort by x, cut into regions, record seams
//! BoundaryTable::rebuild(..)    clear flags, pre-claim occupied seam cells
//! AtomicCells::load_from(..)    publish every position as one u64
//! per region (parallel):        query neighbors from the mirror,
//!                               claim seam cells through the table
//! ```

pub mod boundary;
pub mod neighbors;
pub mod partition;


pub use boundary::BoundaryTable;
pub use neighbors::{AtomicCells, OccupancySource, neighbors, occupied_cells};
pub use partition::{Partition, Region, Seam, partition};
