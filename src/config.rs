//! Configuration types for the distribution resolver.

use crate::error::{Error, Result};
use crate::partitioning::check_fleet_size;
use crate::types::FleetSize;
use serde::{Deserialize, Serialize};

/// Default descriptor template used by the `partition` distribution type.
pub const DEFAULT_EXPECTED_FORMAT: &str = "{{topic}}-{{partition}}-{{start_offset}}";

/// How partition ids are derived from object descriptors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistributionType {
    /// Parse the partition id out of the descriptor using the expected format.
    #[default]
    Partition,

    /// Hash the whole descriptor; the expected format is ignored.
    ObjectHash,
}

impl DistributionType {
    /// Configuration name of this distribution type.
    pub fn as_str(&self) -> &'static str {
        match self {
            DistributionType::Partition => "partition",
            DistributionType::ObjectHash => "object_hash",
        }
    }
}

impl std::fmt::Display for DistributionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for DistributionType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "partition" => Ok(DistributionType::Partition),
            "object_hash" => Ok(DistributionType::ObjectHash),
            other => Err(Error::InvalidConfiguration(format!(
                "unknown distribution type: {other}"
            ))),
        }
    }
}

/// Main configuration for a task's distribution resolver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DistributionConfig {
    /// Number of tasks configured for the connector.
    pub max_tasks: FleetSize,

    /// Descriptor format handed to the extractor.
    pub expected_format: String,

    /// Which extractor derives partition ids.
    pub distribution_type: DistributionType,

    /// Seed for the `object_hash` extractor.
    pub hash_seed: u64,
}

impl Default for DistributionConfig {
    fn default() -> Self {
        Self {
            max_tasks: 1,
            expected_format: DEFAULT_EXPECTED_FORMAT.to_string(),
            distribution_type: DistributionType::default(),
            hash_seed: 0,
        }
    }
}

impl DistributionConfig {
    /// Create a new configuration for a fleet of `max_tasks` tasks.
    pub fn new(max_tasks: FleetSize) -> Self {
        Self {
            max_tasks,
            ..Default::default()
        }
    }

    /// Set the expected descriptor format.
    pub fn with_expected_format(mut self, expected_format: impl Into<String>) -> Self {
        self.expected_format = expected_format.into();
        self
    }

    /// Set the distribution type.
    pub fn with_distribution_type(mut self, distribution_type: DistributionType) -> Self {
        self.distribution_type = distribution_type;
        self
    }

    /// Set the hash seed.
    pub fn with_hash_seed(mut self, seed: u64) -> Self {
        self.hash_seed = seed;
        self
    }

    /// Validate the parts of the configuration that do not depend on the
    /// extractor.
    pub fn validate(&self) -> Result<()> {
        check_fleet_size(self.max_tasks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DistributionConfig::default();
        assert_eq!(config.max_tasks, 1);
        assert_eq!(config.expected_format, DEFAULT_EXPECTED_FORMAT);
        assert_eq!(config.distribution_type, DistributionType::Partition);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = DistributionConfig::new(8)
            .with_expected_format("{{partition}}.parquet")
            .with_distribution_type(DistributionType::ObjectHash)
            .with_hash_seed(42);

        assert_eq!(config.max_tasks, 8);
        assert_eq!(config.expected_format, "{{partition}}.parquet");
        assert_eq!(config.distribution_type, DistributionType::ObjectHash);
        assert_eq!(config.hash_seed, 42);
    }

    #[test]
    fn test_validate_rejects_non_positive_fleet() {
        assert!(matches!(
            DistributionConfig::new(0).validate(),
            Err(Error::InvalidConfiguration(_))
        ));
        assert!(matches!(
            DistributionConfig::new(-3).validate(),
            Err(Error::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let config: DistributionConfig =
            serde_json::from_str(r#"{"max_tasks": 4, "distribution_type": "object_hash"}"#).unwrap();

        assert_eq!(config.max_tasks, 4);
        assert_eq!(config.distribution_type, DistributionType::ObjectHash);
        assert_eq!(config.expected_format, DEFAULT_EXPECTED_FORMAT);
        assert_eq!(config.hash_seed, 0);
    }

    #[test]
    fn test_distribution_type_parse() {
        assert_eq!(
            "partition".parse::<DistributionType>().unwrap(),
            DistributionType::Partition
        );
        assert_eq!(
            " OBJECT_HASH ".parse::<DistributionType>().unwrap(),
            DistributionType::ObjectHash
        );
        assert!("round_robin".parse::<DistributionType>().is_err());
        assert_eq!(DistributionType::ObjectHash.to_string(), "object_hash");
    }
}
