//! Partitioning module for distributing objects across tasks.
//!
//! Every task evaluates the same rule locally, so no coordination traffic is
//! needed to decide ownership:
//!
//! ```text
//!   max_tasks = 4
//!
//!   partition:  0   1   2   3 │ 4   5   6   7 │ 8 ...
//!   owner:      0   1   2   3 │ 0   1   2   3 │ 0 ...
//!               └─ identity ─┘ └──── partition_id % max_tasks ────
//! ```
//!
//! # Example
//!
//! ```rust
//! use task_distribution::partitioning::{owned_by, owner_of};
//!
//! assert_eq!(owner_of(3, 5).unwrap(), 2);
//! assert!(owned_by(2, 3, 5).unwrap());
//! assert!(!owned_by(0, 3, 5).unwrap());
//! ```

mod ownership;

pub use ownership::{
    check_fleet_size, check_partition_id, check_task_id, owned_by, owned_by_with, owner_of,
    ownership_changes, task_matches_modulo, task_matches_partition, IdentityMatcher,
    OwnershipChange, TaskMatcher,
};
