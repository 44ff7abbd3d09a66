//! Partition id extraction from object descriptors.
//!
//! The resolver never interprets descriptors itself. It hands each one,
//! together with the currently configured format, to a [`PartitionExtractor`]
//! chosen by [`DistributionType`]:
//!
//! - [`PatternExtractor`] reads the partition out of a file-name template
//!   such as `{{topic}}-{{partition}}-{{start_offset}}`
//! - [`HashExtractor`] hashes the whole descriptor

mod hash;
mod pattern;

pub use hash::HashExtractor;
pub use pattern::{DescriptorFields, PatternExtractor};

use crate::config::{DistributionConfig, DistributionType};
use crate::error::Result;
use crate::types::PartitionId;
use std::fmt::Debug;
use std::sync::Arc;

/// Derives a partition id from an object descriptor.
pub trait PartitionExtractor: Send + Sync + Debug {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Extract the partition id of `descriptor` under `expected_format`.
    ///
    /// Returns [`crate::Error::UnparsableDescriptor`] when the descriptor
    /// does not match. The returned id is never negative.
    fn extract(&self, descriptor: &str, expected_format: &str) -> Result<PartitionId>;

    /// Check a format before it is installed by reconfiguration.
    fn validate_format(&self, _expected_format: &str) -> Result<()> {
        Ok(())
    }
}

/// Build the extractor selected by the configuration.
pub fn extractor_for(config: &DistributionConfig) -> Arc<dyn PartitionExtractor> {
    match config.distribution_type {
        DistributionType::Partition => Arc::new(PatternExtractor::new()),
        DistributionType::ObjectHash => Arc::new(HashExtractor::with_seed(config.hash_seed)),
    }
}
