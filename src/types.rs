//! Core types used throughout the resolver.

/// Zero-based identifier of a worker task within the fleet.
pub type TaskId = i64;

/// Number of tasks configured for the workload.
pub type FleetSize = i64;

/// Position of an object within a stable enumeration.
pub type PartitionId = i64;
