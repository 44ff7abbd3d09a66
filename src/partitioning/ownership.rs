//! Partition ownership calculation.
//!
//! These are the pure decision functions behind the resolver. Given a fleet
//! of `max_tasks` tasks, every partition id maps to exactly one owning task:
//!
//! - partitions below the fleet size are owned by the task with the same id
//! - larger partitions wrap around with `partition_id % max_tasks`
//!
//! Both branches agree wherever they overlap, so the composed rule is a plain
//! function of `(task_id, max_tasks, partition_id)` with no hidden state.

use crate::error::{Error, Result};
use crate::types::{FleetSize, PartitionId, TaskId};

/// Low-level comparison between a task and the partition slot it is tested
/// against.
///
/// [`owned_by_with`] routes both the identity and the modulo branch through
/// this trait, so a variant only needs to redefine the comparison to change
/// how slots are matched (for example, a fleet whose task ids start at 1).
pub trait TaskMatcher {
    /// Whether `task_id` is the task for the given partition slot.
    fn matches(&self, task_id: TaskId, slot: PartitionId) -> bool;
}

/// Matches a task to the slot with the same zero-based id.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IdentityMatcher;

impl TaskMatcher for IdentityMatcher {
    fn matches(&self, task_id: TaskId, slot: PartitionId) -> bool {
        task_matches_partition(task_id, slot)
    }
}

/// A single partition whose owner differs between two fleet sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OwnershipChange {
    /// The partition being reassigned.
    pub partition_id: PartitionId,
    /// Owner under the previous fleet size.
    pub from_task: TaskId,
    /// Owner under the new fleet size.
    pub to_task: TaskId,
}

/// Check if the task is responsible for the partition by identity.
///
/// Task ids and partition ids are both zero-based.
pub fn task_matches_partition(task_id: TaskId, partition_id: PartitionId) -> bool {
    task_id == partition_id
}

/// Check if the task owns the partition's residue modulo the fleet size.
///
/// Returns `false` rather than dividing by zero when `max_tasks` is zero.
pub fn task_matches_modulo(task_id: TaskId, max_tasks: FleetSize, partition_id: PartitionId) -> bool {
    partition_id
        .checked_rem(max_tasks)
        .is_some_and(|slot| task_matches_partition(task_id, slot))
}

/// Decide whether `task_id` owns `partition_id` in a fleet of `max_tasks`.
///
/// # Errors
///
/// - [`Error::InvalidConfiguration`] if `max_tasks <= 0`
/// - [`Error::InvalidInput`] if `task_id` or `partition_id` is negative
pub fn owned_by(task_id: TaskId, max_tasks: FleetSize, partition_id: PartitionId) -> Result<bool> {
    owned_by_with(&IdentityMatcher, task_id, max_tasks, partition_id)
}

/// Same as [`owned_by`], with a custom slot comparison.
pub fn owned_by_with<M>(
    matcher: &M,
    task_id: TaskId,
    max_tasks: FleetSize,
    partition_id: PartitionId,
) -> Result<bool>
where
    M: TaskMatcher + ?Sized,
{
    check_fleet_size(max_tasks)?;
    check_task_id(task_id)?;
    let slot = slot_for(max_tasks, partition_id)?;
    Ok(matcher.matches(task_id, slot))
}

/// The unique task that owns `partition_id` in a fleet of `max_tasks`.
pub fn owner_of(max_tasks: FleetSize, partition_id: PartitionId) -> Result<TaskId> {
    check_fleet_size(max_tasks)?;
    slot_for(max_tasks, partition_id)
}

/// Calculate which partitions change owner when the fleet is resized.
///
/// Partitions whose owner is the same under both sizes are omitted.
pub fn ownership_changes<I>(
    old_max_tasks: FleetSize,
    new_max_tasks: FleetSize,
    partitions: I,
) -> Result<Vec<OwnershipChange>>
where
    I: IntoIterator<Item = PartitionId>,
{
    check_fleet_size(old_max_tasks)?;
    check_fleet_size(new_max_tasks)?;

    let mut changes = Vec::new();
    for partition_id in partitions {
        let from_task = slot_for(old_max_tasks, partition_id)?;
        let to_task = slot_for(new_max_tasks, partition_id)?;
        if from_task != to_task {
            changes.push(OwnershipChange {
                partition_id,
                from_task,
                to_task,
            });
        }
    }

    Ok(changes)
}

/// Reject fleet sizes that leave ownership undefined.
pub fn check_fleet_size(max_tasks: FleetSize) -> Result<()> {
    if max_tasks <= 0 {
        return Err(Error::InvalidConfiguration(format!(
            "max_tasks must be positive, got {max_tasks}"
        )));
    }
    Ok(())
}

/// Reject negative task ids.
pub fn check_task_id(task_id: TaskId) -> Result<()> {
    if task_id < 0 {
        return Err(Error::InvalidInput(format!(
            "task_id must be non-negative, got {task_id}"
        )));
    }
    Ok(())
}

/// Reject negative partition ids.
pub fn check_partition_id(partition_id: PartitionId) -> Result<()> {
    if partition_id < 0 {
        return Err(Error::InvalidInput(format!(
            "partition_id must be non-negative, got {partition_id}"
        )));
    }
    Ok(())
}

// Caller has already checked max_tasks > 0.
fn slot_for(max_tasks: FleetSize, partition_id: PartitionId) -> Result<PartitionId> {
    check_partition_id(partition_id)?;
    if partition_id < max_tasks {
        Ok(partition_id)
    } else {
        Ok(partition_id % max_tasks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owners(max_tasks: FleetSize, partition_id: PartitionId) -> Vec<TaskId> {
        (0..max_tasks)
            .filter(|&task_id| owned_by(task_id, max_tasks, partition_id).unwrap())
            .collect()
    }

    #[test]
    fn test_identity_branch() {
        assert!(owned_by(2, 3, 2).unwrap());
        assert!(!owned_by(0, 3, 2).unwrap());
        assert!(!owned_by(1, 3, 2).unwrap());
        assert_eq!(owner_of(3, 2).unwrap(), 2);
    }

    #[test]
    fn test_modulo_branch() {
        assert!(owned_by(2, 3, 5).unwrap());
        assert_eq!(owner_of(3, 5).unwrap(), 2);
    }

    #[test]
    fn test_single_task_owns_everything() {
        assert!(owned_by(0, 1, 100).unwrap());
        assert_eq!(owner_of(1, 100).unwrap(), 0);
        assert_eq!(owners(1, 0), vec![0]);
    }

    #[test]
    fn test_round_robin_over_four_tasks() {
        let expected = [0, 1, 2, 3, 0, 1, 2, 3];
        for (partition_id, owner) in expected.iter().enumerate() {
            assert_eq!(owner_of(4, partition_id as PartitionId).unwrap(), *owner);
            assert_eq!(owners(4, partition_id as PartitionId), vec![*owner]);
        }
    }

    #[test]
    fn test_exactly_one_owner() {
        for max_tasks in 1..=16 {
            for partition_id in 0..100 {
                assert_eq!(
                    owners(max_tasks, partition_id).len(),
                    1,
                    "max_tasks={max_tasks} partition_id={partition_id}"
                );
            }
        }
    }

    #[test]
    fn test_branches_agree_at_boundary() {
        for max_tasks in 1..=64 {
            let last = max_tasks - 1;
            assert_eq!(last % max_tasks, last);
            assert_eq!(
                task_matches_partition(last, last),
                task_matches_modulo(last, max_tasks, last)
            );
            assert_eq!(owner_of(max_tasks, max_tasks).unwrap(), 0);
        }
    }

    #[test]
    fn test_task_outside_fleet_owns_nothing() {
        for partition_id in 0..20 {
            assert!(!owned_by(5, 5, partition_id).unwrap());
        }
    }

    #[test]
    fn test_modulo_by_zero_is_false() {
        assert!(!task_matches_modulo(0, 0, 7));
    }

    #[test]
    fn test_invalid_fleet_size() {
        assert!(matches!(owned_by(0, 0, 1), Err(Error::InvalidConfiguration(_))));
        assert!(matches!(owned_by(0, -1, 1), Err(Error::InvalidConfiguration(_))));
        assert!(matches!(owner_of(0, 1), Err(Error::InvalidConfiguration(_))));
    }

    #[test]
    fn test_negative_ids_rejected() {
        assert!(matches!(owned_by(-1, 3, 1), Err(Error::InvalidInput(_))));
        assert!(matches!(owned_by(0, 3, -1), Err(Error::InvalidInput(_))));
        assert!(matches!(owner_of(3, -7), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_custom_matcher() {
        // Fleet whose task ids start at 1.
        struct OneBased;
        impl TaskMatcher for OneBased {
            fn matches(&self, task_id: TaskId, slot: PartitionId) -> bool {
                task_id == slot + 1
            }
        }

        assert!(owned_by_with(&OneBased, 1, 3, 0).unwrap());
        assert!(owned_by_with(&OneBased, 3, 3, 5).unwrap());
        assert!(!owned_by_with(&OneBased, 0, 3, 0).unwrap());
    }

    #[test]
    fn test_growing_fleet_keeps_identity_owners() {
        let changes = ownership_changes(4, 5, 0..20).unwrap();

        // Partitions 0..4 were identity-assigned and stay put.
        assert!(changes.iter().all(|c| c.partition_id >= 4));

        // Partition 4 moves from task 0 to the new task 4.
        assert!(changes.contains(&OwnershipChange {
            partition_id: 4,
            from_task: 0,
            to_task: 4,
        }));

        for change in &changes {
            assert_eq!(change.from_task, change.partition_id % 4);
            assert_eq!(change.to_task, change.partition_id % 5);
        }
    }

    #[test]
    fn test_same_size_has_no_changes() {
        assert!(ownership_changes(7, 7, 0..1000).unwrap().is_empty());
    }

    #[test]
    fn test_ownership_changes_validation() {
        assert!(matches!(
            ownership_changes(0, 3, 0..3),
            Err(Error::InvalidConfiguration(_))
        ));
        assert!(matches!(
            ownership_changes(2, 3, [1, -1]),
            Err(Error::InvalidInput(_))
        ));
    }
}
