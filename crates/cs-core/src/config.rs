//! Run configuration.

use crate::{CoreError, CoreResult, ExecutionMode, GridBounds, Tick};

/// Default cap on the share of agents a single region may hold.
pub const DEFAULT_MAX_REGION_FRACTION: f32 = 0.20;

/// Default offload group (block) size.
pub const DEFAULT_KERNEL_GROUP_SIZE: usize = 64;

/// Top-level simulation configuration.
///
/// Typically built in code or loaded from JSON by the application crate and
/// handed to `SimBuilder`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SimConfig {
    /// Execution strategy, fixed for the run.
    pub mode: ExecutionMode,

    /// Worker count for `ThreadPool` mode.  Ignored by the other modes.
    pub num_threads: usize,

    /// Maximum fraction of all agents one region may hold
    /// (`RegionParallel` only).  Must be in `(0, 1]`.
    pub max_region_fraction: f32,

    /// Grid extent used by the back-off bound check and the seam columns.
    pub grid: GridBounds,

    /// Total ticks `Sim::run` simulates.
    pub total_ticks: u64,

    /// Call the observer's snapshot hook every N ticks.  0 disables it.
    pub snapshot_interval_ticks: u64,

    /// Master seed for scenario generation.
    pub seed: u64,

    /// Agents per group handed to the offload kernel.
    pub kernel_group_size: usize,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            mode:                    ExecutionMode::Sequential,
            num_threads:             2,
            max_region_fraction:     DEFAULT_MAX_REGION_FRACTION,
            grid:                    GridBounds::default(),
            total_ticks:             1_000,
            snapshot_interval_ticks: 0,
            seed:                    42,
            kernel_group_size:       DEFAULT_KERNEL_GROUP_SIZE,
        }
    }
}

impl SimConfig {
    /// The tick at which the simulation ends (exclusive upper bound).
    #[inline]
    pub fn end_tick(&self) -> Tick {
        Tick(self.total_ticks)
    }

    /// Reject values no strategy can run with.
    pub fn validate(&self) -> CoreResult<()> {
        if self.mode == ExecutionMode::ThreadPool && self.num_threads == 0 {
            return Err(CoreError::Config("thread-pool mode needs at least one thread".into()));
        }
        if !(self.max_region_fraction > 0.0 && self.max_region_fraction <= 1.0) {
            return Err(CoreError::Config(format!(
                "max_region_fraction must be in (0, 1], got {}",
                self.max_region_fraction
            )));
        }
        if self.grid.width <= 0 || self.grid.height <= 0 {
            return Err(CoreError::Config(format!(
                "grid must be non-empty, got {}x{}",
                self.grid.width, self.grid.height
            )));
        }
        if self.kernel_group_size == 0 {
            return Err(CoreError::Config("kernel_group_size must be positive".into()));
        }
        Ok(())
    }
}
