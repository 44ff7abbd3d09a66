//! Partition ids from a stable hash of the descriptor.

use super::PartitionExtractor;
use crate::error::{Error, Result};
use crate::types::PartitionId;
use std::hash::Hasher;
use twox_hash::XxHash64;

/// Hashes the whole descriptor with XxHash64.
///
/// Useful when descriptors carry no partition number of their own. The hash
/// depends only on the descriptor bytes and the seed, so every task computes
/// the same id.
#[derive(Debug, Clone, Copy, Default)]
pub struct HashExtractor {
    seed: u64,
}

impl HashExtractor {
    /// Create an extractor with seed 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an extractor with a custom seed.
    pub fn with_seed(seed: u64) -> Self {
        Self { seed }
    }

    /// The hash seed.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    fn hash(&self, descriptor: &str) -> u64 {
        let mut hasher = XxHash64::with_seed(self.seed);
        hasher.write(descriptor.as_bytes());
        hasher.finish()
    }
}

impl PartitionExtractor for HashExtractor {
    fn name(&self) -> &'static str {
        "object_hash"
    }

    fn extract(&self, descriptor: &str, expected_format: &str) -> Result<PartitionId> {
        if descriptor.is_empty() {
            return Err(Error::unparsable(descriptor, expected_format));
        }
        // Top bit cleared so the id is a non-negative i64.
        Ok((self.hash(descriptor) >> 1) as PartitionId)
    }
}
