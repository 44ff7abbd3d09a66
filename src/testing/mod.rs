//! Testing utilities for distribution strategies.
//!
//! [`TaskFleet`] stands up one resolver per task, the way a real connector
//! would run them in separate processes, and answers fleet-wide questions
//! such as "how many tasks claim this object?". Since no resolver talks to
//! another, coverage and uniqueness can only be checked from outside.
//!
//! # Example
//!
//! ```rust
//! use task_distribution::testing::TaskFleet;
//! use task_distribution::DistributionConfig;
//!
//! let fleet = TaskFleet::new(&DistributionConfig::new(3)).unwrap();
//! assert_eq!(fleet.owners("orders-5-000").unwrap(), vec![2]);
//!
//! fleet.reconfigure_all(4, "{{topic}}-{{partition}}-{{start_offset}}").unwrap();
//! assert_eq!(fleet.owners("orders-5-000").unwrap(), vec![1]);
//! ```


use crate::config::DistributionConfig;
use crate::error::{Error, Result};
use crate::extract::extractor_for;
use crate::resolver::DistributionResolver;
use crate::types::{FleetSize, TaskId};
use std::collections::BTreeMap;

/// A simulated fleet of independently configured tasks.
#[derive(Debug)]
pub struct TaskFleet {
    /// Resolver for each task, indexed by task id.
    tasks: Vec<DistributionResolver>,

    /// Configuration the extractors were built from.
    config: DistributionConfig,
}

impl TaskFleet {
    /// Create one resolver per task in `0..config.max_tasks`.
    pub fn new(config: &DistributionConfig) -> Result<Self> {
        config.validate()?;
        let tasks = (0..config.max_tasks)
            .map(|_| DistributionResolver::new(config))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            tasks,
            config: config.clone(),
        })
    }

    /// Number of tasks currently running.
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Whether the fleet has no tasks.
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Get the resolver of a single task.
    pub fn task(&self, task_id: TaskId) -> Option<&DistributionResolver> {
        usize::try_from(task_id).ok().and_then(|idx| self.tasks.get(idx))
    }

    /// Reconfigure every running task.
    ///
    /// Tasks are reconfigured in id order; a rejected configuration is
    /// rejected by the first task and leaves the whole fleet unchanged.
    pub fn reconfigure_all(&self, max_tasks: FleetSize, expected_format: &str) -> Result<()> {
        for resolver in &self.tasks {
            resolver.reconfigure(max_tasks, expected_format)?;
        }
        Ok(())
    }

    /// Resize the fleet, starting or stopping tasks as needed, and
    /// reconfigure the survivors.
    ///
    /// A change of distribution type or hash seed restarts every task so the
    /// whole fleet runs the same extractor. The new configuration is fully
    /// validated before any task is touched; on error the fleet is unchanged.
    pub fn resize(&mut self, config: &DistributionConfig) -> Result<()> {
        config.validate()?;
        let target = usize::try_from(config.max_tasks)
            .map_err(|_| Error::InvalidConfiguration(format!("fleet too large: {}", config.max_tasks)))?;

        let extractor = extractor_for(config);
        extractor.validate_format(&config.expected_format)?;

        let same_extractor = self.config.distribution_type == config.distribution_type
            && self.config.hash_seed == config.hash_seed;

        if same_extractor {
            self.tasks.truncate(target);
            self.reconfigure_all(config.max_tasks, &config.expected_format)?;
            while self.tasks.len() < target {
                self.tasks.push(DistributionResolver::new(config)?);
            }
        } else {
            self.tasks = (0..target)
                .map(|_| DistributionResolver::new(config))
                .collect::<Result<Vec<_>>>()?;
        }

        self.config = config.clone();
        Ok(())
    }

    /// Configuration the fleet was last built or resized with.
    pub fn config(&self) -> &DistributionConfig {
        &self.config
    }

    /// Every task that claims `descriptor`, in id order.
    pub fn owners(&self, descriptor: &str) -> Result<Vec<TaskId>> {
        let mut owners = Vec::new();
        for (task_id, resolver) in (0..).zip(&self.tasks) {
            if resolver.is_part_of_task(task_id, descriptor)? {
                owners.push(task_id);
            }
        }
        Ok(owners)
    }

    /// Group descriptors by the tasks that claim them.
    ///
    /// A correctly configured fleet lists every parsable descriptor under
    /// exactly one task.
    pub fn assignments<'a, I>(&self, descriptors: I) -> Result<BTreeMap<TaskId, Vec<&'a str>>>
    where
        I: IntoIterator<Item = &'a str>,
        I::IntoIter: Clone,
    {
        let descriptors = descriptors.into_iter();
        let mut assignments = BTreeMap::new();
        for (task_id, resolver) in (0..).zip(&self.tasks) {
            let owned = resolver.filter_owned(task_id, descriptors.clone())?;
            assignments.insert(task_id, owned);
        }
        Ok(assignments)
    }
}
