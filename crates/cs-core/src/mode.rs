//! The execution strategies a run can be driven with.
//!
//! The mode is picked once when the simulation is built and never changes
//! for the life of the run; it also decides which position representation
//! (agent objects or flattened lane arrays) is authoritative.

use std::str::FromStr;

use crate::CoreError;

/// How a tick is scheduled across the agent set.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum ExecutionMode {
    /// Caller thread, collision-checked resolver, array order.
    #[default]
    Sequential,
    /// Fixed worker pool over static chunks; direct overwrite, no collision
    /// check.
    ThreadPool,
    /// Re-partition into x-regions every tick; one task per region with the
    /// seam-guarded resolver.
    RegionParallel,
    /// Caller thread, four lanes at a time over flattened arrays.
    VectorBatch,
    /// Whole flattened array handed to a batch kernel.
    OffloadBatch,
}

impl ExecutionMode {
    pub const ALL: [ExecutionMode; 5] = [
        ExecutionMode::Sequential,
        ExecutionMode::ThreadPool,
        ExecutionMode::RegionParallel,
        ExecutionMode::VectorBatch,
        ExecutionMode::OffloadBatch,
    ];

    /// `true` for the two strategies whose authoritative positions live in
    /// flattened lane arrays rather than in the agent objects.
    #[inline]
    pub fn uses_lane_arrays(self) -> bool {
        matches!(self, ExecutionMode::VectorBatch | ExecutionMode::OffloadBatch)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ExecutionMode::Sequential     => "sequential",
            ExecutionMode::ThreadPool     => "thread-pool",
            ExecutionMode::RegionParallel => "region-parallel",
            ExecutionMode::VectorBatch    => "vector-batch",
            ExecutionMode::OffloadBatch   => "offload-batch",
        }
    }
}

impl std::fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExecutionMode {
    type Err = CoreError;

    /// Accepts the long names plus the short aliases the timing scripts use
    /// (`seq`, `cthreads`, `omp`, `simd`, `cuda`), case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "seq" | "sequential"                    => Ok(ExecutionMode::Sequential),
            "cthreads" | "threads" | "thread-pool"  => Ok(ExecutionMode::ThreadPool),
            "omp" | "regions" | "region-parallel"   => Ok(ExecutionMode::RegionParallel),
            "simd" | "vector" | "vector-batch"      => Ok(ExecutionMode::VectorBatch),
            "cuda" | "offload" | "offload-batch"    => Ok(ExecutionMode::OffloadBatch),
            other => Err(CoreError::Parse(format!(
                "unknown execution mode {other:?}; expected one of seq | cthreads | omp | simd | cuda"
            ))),
        }
    }
}
