//! `cs-core` — foundational types for the `rust_crowd` tick engine.
//!
//! This crate is a dependency of every other `cs-*` crate.  It has no `cs-*`
//! dependencies and only `thiserror` (plus optional `serde`) from outside.
//!
//! # What lives here
//!
//! | Module      | Contents                                                  |
//! |-------------|-----------------------------------------------------------|
//! | [`ids`]     | `AgentId`, `WaypointId`                                   |
//! | [`geo`]     | `Cell` (integer grid cell), `GridBounds`                  |
//! | [`time`]    | `Tick`                                                    |
//! | [`mode`]    | `ExecutionMode` — the five tick strategies                |
//! | [`config`]  | `SimConfig`                                               |
//! | [`error`]   | `CoreError`, `CoreResult`                                 |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod config;
pub mod error;
pub mod geo;
pub mod ids;
pub mod mode;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::SimConfig;
pub use error::{CoreError, CoreResult};
pub use geo::{Cell, GridBounds};
pub use ids::{AgentId, WaypointId};
pub use mode::ExecutionMode;
pub use time::Tick;
