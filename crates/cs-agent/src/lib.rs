//! `cs-agent` — agent state and storage for the `rust_crowd` tick engine.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                    |
//! |---------------|-------------------------------------------------------------|
//! | [`waypoint`]  | `Waypoint`, `WaypointSet` — shared destination zones        |
//! | [`agent`]     | `Agent` — position, desired cell, destination queue         |
//! | [`store`]     | `AgentStore`, the `PositionStore` capability                |
//! | [`builder`]   | `AgentStoreBuilder` (fluent construction + validation)      |
//! | [`scenario`]  | `CrowdScenario` — seeded procedural crowds                  |
//! | [`error`]     | `AgentError`, `AgentResult<T>`                              |
//!
//! Agents hold destinations by [`WaypointId`](cs_core::WaypointId); the
//! waypoints themselves live in a separate [`WaypointSet`] so a tick can hold
//! `&mut [Agent]` and `&WaypointSet` at the same time.

pub mod agent;
pub mod builder;
pub mod error;
pub mod scenario;
pub mod store;
pub mod waypoint;


pub use agent::Agent;
pub use builder::AgentStoreBuilder;
pub use error::{AgentError, AgentResult};
pub use scenario::CrowdScenario;
pub use store::{AgentStore, PositionStore};
pub use waypoint::{Waypoint, WaypointSet};
