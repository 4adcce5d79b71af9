//! `simcore` simulates five classical OS resource-management
//! policy families: CPU scheduling, deadlock safety (Banker's
//! algorithm), page replacement, disk-head scheduling, and
//! contiguous memory allocation.
//!
//! Each module exposes one entry point which consumes a workload
//! description and returns the *complete* step trace together with
//! summary statistics. Computation is eager: by the time a result is
//! handed back, there is nothing left to run, so a presentation layer
//! may replay the trace at whatever pace it likes without ever
//! touching the engine again. No module depends on another, no call
//! mutates its input, and identical inputs produce identical results.

pub mod cpu;
pub mod deadlock;
pub mod disk;
pub mod memory;
pub mod paging;

use thiserror::Error;

/// The unit for measuring logical time. One tick is one unit of CPU
/// burst; nothing in the engine assumes a wall-clock meaning.
pub type Ticks = usize;

/// Disk positions are cylinder numbers in `0..disk_size`.
pub type Cylinder = usize;

/// Rejected workload descriptions. Every variant names the offending
/// field so the caller can point back at the exact input control,
/// instead of the engine propagating NaN or a garbage trace.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("process {id}: burst time must be positive")]
    NonPositiveBurst { id: String },
    #[error("duplicate process id {id}")]
    DuplicateProcessId { id: String },
    #[error("round robin quantum must be positive")]
    NonPositiveQuantum,
    #[error("allocation matrix row {process} has {got} entries, expected {expected}")]
    BadAllocationRow { process: usize, got: usize, expected: usize },
    #[error("maximum matrix row {process} has {got} entries, expected {expected}")]
    BadMaximumRow { process: usize, got: usize, expected: usize },
    #[error("process {process}, resource {resource}: allocation exceeds maximum demand")]
    AllocationExceedsMaximum { process: usize, resource: usize },
    #[error("frame capacity must be at least 1")]
    ZeroFrames,
    #[error("disk size must be at least 1")]
    ZeroDiskSize,
    #[error("head position {head} is outside the disk (size {disk_size})")]
    HeadOffDisk { head: Cylinder, disk_size: usize },
    #[error("request {index} targets cylinder {cylinder}, outside the disk (size {disk_size})")]
    RequestOffDisk { index: usize, cylinder: Cylinder, disk_size: usize },
    #[error("memory block {index} has zero size")]
    ZeroBlockSize { index: usize },
    #[error("memory request {index} has zero size")]
    ZeroRequestSize { index: usize },
}
