//! Coordination-free partition ownership for fleets of worker tasks.
//!
//! Each task in a connector fleet runs its own [`DistributionResolver`] and
//! decides locally which objects (files, tables, topic-partitions) it is
//! responsible for. No messages are exchanged: every task evaluates the same
//! pure rule over its own id, the current fleet size, and a partition id
//! derived from the object.
//!
//! # Features
//!
//! - Total coverage: every partition is owned by exactly one task
//! - Identity assignment while partitions fit in the fleet, round-robin after
//! - Atomic reconfiguration of fleet size and descriptor format
//! - Pluggable partition id extraction (file-name templates or hashing)
//!
//! # Example
//!
//! ```rust
//! use task_distribution::{DistributionConfig, DistributionResolver};
//!
//! # fn main() -> Result<(), task_distribution::Error> {
//! let config = DistributionConfig::new(3)
//!     .with_expected_format("{{topic}}-{{partition}}-{{start_offset}}");
//! let resolver = DistributionResolver::new(&config)?;
//!
//! // Partition 5 in a fleet of 3 belongs to task 5 % 3 = 2.
//! assert!(resolver.is_part_of_task(2, "orders-5-000120")?);
//! assert!(!resolver.is_part_of_task(0, "orders-5-000120")?);
//!
//! // The fleet grows; ownership follows immediately.
//! resolver.reconfigure(6, "{{topic}}-{{partition}}-{{start_offset}}")?;
//! assert!(resolver.is_part_of_task(5, "orders-5-000120")?);
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │              Task runtime (host)             │
//! └──────────────────────────────────────────────┘
//!        │ reconfigure()          │ is_part_of_task()
//!        ▼                        ▼
//! ┌──────────────────────────────────────────────┐
//! │            DistributionResolver              │
//! │  RwLock<Arc<DistributionSnapshot>>           │
//! │    max_tasks · expected_format · generation  │
//! └──────────────────────────────────────────────┘
//!        │ extract()              │ owned_by()
//!        ▼                        ▼
//! ┌────────────────────┐  ┌──────────────────────┐
//! │ PartitionExtractor │  │ partitioning         │
//! │  pattern · hash    │  │  identity · modulo   │
//! └────────────────────┘  └──────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod extract;
pub mod metrics;
pub mod partitioning;
pub mod resolver;
pub mod testing;
pub mod types;

// Re-export main types for convenience
pub use config::{DistributionConfig, DistributionType, DEFAULT_EXPECTED_FORMAT};
pub use error::{Error, Result};
pub use resolver::{DistributionResolver, DistributionSnapshot};
pub use types::{FleetSize, PartitionId, TaskId};

// Re-export extraction types
pub use extract::{
    extractor_for, DescriptorFields, HashExtractor, PartitionExtractor, PatternExtractor,
};

// Re-export partitioning types
pub use partitioning::{
    owned_by, owned_by_with, owner_of, ownership_changes, IdentityMatcher, OwnershipChange,
    TaskMatcher,
};

// Re-export metrics types
pub use metrics::{Counter, ResolverMetrics, ResolverMetricsSnapshot};
