//! The per-task distribution resolver.
//!
//! One resolver lives in each task process. It holds the current fleet size
//! and descriptor format as a single immutable [`DistributionSnapshot`] and
//! answers "does task T own object O?" against it.
//!
//! # Locking Strategy
//!
//! - Queries clone the snapshot `Arc` under a brief read lock and evaluate
//!   against that clone, so one call never mixes two generations.
//! - Reconfiguration validates first, then swaps in a new snapshot under the
//!   write lock. A rejected reconfiguration leaves the old snapshot in place.

use crate::config::DistributionConfig;
use crate::error::Result;
use crate::extract::{extractor_for, PartitionExtractor};
use crate::metrics::ResolverMetrics;
use crate::partitioning::{check_fleet_size, check_task_id, owned_by, owner_of};
use crate::types::{FleetSize, PartitionId, TaskId};
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{debug, info, trace, warn};

/// One generation of resolver configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistributionSnapshot {
    /// Number of tasks in the fleet. Always positive.
    pub max_tasks: FleetSize,

    /// Format handed to the extractor.
    pub expected_format: String,

    /// Incremented on every successful reconfiguration, starting at 1.
    pub generation: u64,
}

/// Decides which objects belong to which task.
pub struct DistributionResolver {
    /// Current configuration. Replaced wholesale, never mutated in place.
    state: RwLock<Arc<DistributionSnapshot>>,

    /// Derives partition ids from descriptors.
    extractor: Arc<dyn PartitionExtractor>,

    metrics: ResolverMetrics,
}

impl DistributionResolver {
    /// Create a resolver from host configuration.
    ///
    /// The extractor is selected by `config.distribution_type`.
    pub fn new(config: &DistributionConfig) -> Result<Self> {
        Self::with_extractor(
            config.max_tasks,
            config.expected_format.clone(),
            extractor_for(config),
        )
    }

    /// Create a resolver with a caller-supplied extractor.
    pub fn with_extractor(
        max_tasks: FleetSize,
        expected_format: impl Into<String>,
        extractor: Arc<dyn PartitionExtractor>,
    ) -> Result<Self> {
        let expected_format = expected_format.into();
        check_fleet_size(max_tasks)?;
        extractor.validate_format(&expected_format)?;

        info!(
            max_tasks,
            expected_format = %expected_format,
            extractor = extractor.name(),
            "Created distribution resolver"
        );

        Ok(Self {
            state: RwLock::new(Arc::new(DistributionSnapshot {
                max_tasks,
                expected_format,
                generation: 1,
            })),
            extractor,
            metrics: ResolverMetrics::new(),
        })
    }

    /// Replace the fleet size and descriptor format together.
    ///
    /// Must be called whenever the fleet is resized or the naming convention
    /// changes. Every query that starts after this returns observes the new
    /// configuration.
    ///
    /// # Errors
    ///
    /// [`crate::Error::InvalidConfiguration`] if `max_tasks <= 0` or the extractor
    /// rejects the format. The previous configuration stays in effect.
    pub fn reconfigure(&self, max_tasks: FleetSize, expected_format: impl Into<String>) -> Result<()> {
        let expected_format = expected_format.into();

        let validated = check_fleet_size(max_tasks)
            .and_then(|()| self.extractor.validate_format(&expected_format));
        if let Err(e) = validated {
            self.metrics.rejected_reconfigurations.inc();
            warn!(
                max_tasks,
                expected_format = %expected_format,
                error = %e,
                "Rejected distribution reconfiguration"
            );
            return Err(e);
        }

        let generation = {
            let mut state = self.state.write();
            let generation = state.generation + 1;
            *state = Arc::new(DistributionSnapshot {
                max_tasks,
                expected_format: expected_format.clone(),
                generation,
            });
            generation
        };
        self.metrics.reconfigurations.inc();

        info!(
            max_tasks,
            expected_format = %expected_format,
            generation,
            "Reconfigured distribution"
        );
        Ok(())
    }

    /// Check whether `task_id` owns the object named by `descriptor`.
    ///
    /// # Errors
    ///
    /// - [`crate::Error::InvalidInput`] if `task_id` is negative
    /// - [`crate::Error::UnparsableDescriptor`] if the descriptor does not match the
    ///   current format; the caller should skip or defer the object
    pub fn is_part_of_task(&self, task_id: TaskId, descriptor: &str) -> Result<bool> {
        check_task_id(task_id)?;
        let snapshot = self.snapshot();
        self.evaluate(&snapshot, task_id, descriptor)
    }

    /// The task that owns `descriptor` under the current configuration.
    pub fn owner_of_descriptor(&self, descriptor: &str) -> Result<TaskId> {
        let snapshot = self.snapshot();
        let partition_id = self.extract(&snapshot, descriptor)?;
        owner_of(snapshot.max_tasks, partition_id)
    }

    /// Keep the descriptors from a batch that `task_id` owns.
    ///
    /// The whole batch is evaluated against one snapshot. Unparsable
    /// descriptors are logged and skipped; any other error aborts the batch.
    pub fn filter_owned<'a, I>(&self, task_id: TaskId, descriptors: I) -> Result<Vec<&'a str>>
    where
        I: IntoIterator<Item = &'a str>,
    {
        check_task_id(task_id)?;
        let snapshot = self.snapshot();

        let mut owned = Vec::new();
        for descriptor in descriptors {
            match self.evaluate(&snapshot, task_id, descriptor) {
                Ok(true) => owned.push(descriptor),
                Ok(false) => {}
                Err(e) if e.is_skippable() => {
                    warn!(task_id, descriptor, error = %e, "Skipping unparsable descriptor");
                }
                Err(e) => return Err(e),
            }
        }

        debug!(
            task_id,
            owned = owned.len(),
            generation = snapshot.generation,
            "Filtered descriptor batch"
        );
        Ok(owned)
    }

    /// Get the current configuration snapshot.
    pub fn snapshot(&self) -> Arc<DistributionSnapshot> {
        Arc::clone(&*self.state.read())
    }

    /// Get the current fleet size.
    pub fn max_tasks(&self) -> FleetSize {
        self.state.read().max_tasks
    }

    /// Get the current descriptor format.
    pub fn expected_format(&self) -> String {
        self.state.read().expected_format.clone()
    }

    /// Get the current configuration generation.
    pub fn generation(&self) -> u64 {
        self.state.read().generation
    }

    /// Get the extractor in use.
    pub fn extractor(&self) -> &Arc<dyn PartitionExtractor> {
        &self.extractor
    }

    /// Get the activity counters.
    pub fn metrics(&self) -> &ResolverMetrics {
        &self.metrics
    }

    fn extract(&self, snapshot: &DistributionSnapshot, descriptor: &str) -> Result<PartitionId> {
        self.extractor
            .extract(descriptor, &snapshot.expected_format)
            .inspect_err(|e| {
                if e.is_skippable() {
                    self.metrics.unparsable.inc();
                }
            })
    }

    fn evaluate(&self, snapshot: &DistributionSnapshot, task_id: TaskId, descriptor: &str) -> Result<bool> {
        let partition_id = self.extract(snapshot, descriptor)?;
        let owned = owned_by(task_id, snapshot.max_tasks, partition_id)?;

        self.metrics.queries.inc();
        if owned {
            self.metrics.owned.inc();
        }

        trace!(
            task_id,
            partition_id,
            max_tasks = snapshot.max_tasks,
            generation = snapshot.generation,
            owned,
            "Evaluated ownership"
        );
        Ok(owned)
    }
}

impl std::fmt::Debug for DistributionResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let snapshot = self.snapshot();
        f.debug_struct("DistributionResolver")
            .field("max_tasks", &snapshot.max_tasks)
            .field("expected_format", &snapshot.expected_format)
            .field("generation", &snapshot.generation)
            .field("extractor", &self.extractor.name())
            .finish()
    }
}
