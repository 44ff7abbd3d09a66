//! Partition ids parsed from descriptor templates.
//!
//! A template is literal text with `{{placeholder}}` markers:
//!
//! | Placeholder        | Matches                 |
//! |--------------------|-------------------------|
//! | `{{topic}}`        | `[a-zA-Z0-9\-_.]+`      |
//! | `{{partition}}`    | `[0-9]+` (required)     |
//! | `{{start_offset}}` | `[0-9]+`                |
//! | `{{timestamp}}`    | `[a-zA-Z0-9\-_.]+`      |
//!
//! The whole descriptor must match the template.

use super::PartitionExtractor;
use crate::error::{Error, Result};
use crate::types::PartitionId;
use parking_lot::RwLock;
use regex::Regex;
use std::collections::HashMap;

const TOPIC: &str = "topic";
const PARTITION: &str = "partition";
const START_OFFSET: &str = "start_offset";
const TIMESTAMP: &str = "timestamp";

/// Upper bound on cached templates. Formats only change on reconfiguration,
/// so this is rarely reached.
const MAX_CACHED_TEMPLATES: usize = 64;

/// Fields recovered from a descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescriptorFields {
    /// Topic name, if the template has `{{topic}}`.
    pub topic: Option<String>,

    /// Partition id.
    pub partition: PartitionId,

    /// Start offset, if the template has `{{start_offset}}`.
    pub start_offset: Option<u64>,

    /// Raw timestamp text, if the template has `{{timestamp}}`.
    pub timestamp: Option<String>,
}

/// Extracts partition ids from descriptors using a placeholder template.
#[derive(Debug, Default)]
pub struct PatternExtractor {
    /// Compiled templates keyed by format string.
    templates: RwLock<HashMap<String, Regex>>,
}

impl PatternExtractor {
    /// Create a new extractor with an empty template cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse every field the template exposes.
    pub fn parse(&self, descriptor: &str, expected_format: &str) -> Result<DescriptorFields> {
        let template = self.template(expected_format)?;
        let captures = template
            .captures(descriptor)
            .ok_or_else(|| Error::unparsable(descriptor, expected_format))?;

        let partition = captures
            .name(PARTITION)
            .and_then(|m| m.as_str().parse::<PartitionId>().ok())
            .ok_or_else(|| Error::unparsable(descriptor, expected_format))?;

        let start_offset = match captures.name(START_OFFSET) {
            Some(m) => Some(
                m.as_str()
                    .parse::<u64>()
                    .map_err(|_| Error::unparsable(descriptor, expected_format))?,
            ),
            None => None,
        };

        Ok(DescriptorFields {
            topic: captures.name(TOPIC).map(|m| m.as_str().to_string()),
            partition,
            start_offset,
            timestamp: captures.name(TIMESTAMP).map(|m| m.as_str().to_string()),
        })
    }

    /// Number of compiled templates currently cached.
    pub fn cached_templates(&self) -> usize {
        self.templates.read().len()
    }

    fn template(&self, expected_format: &str) -> Result<Regex> {
        if let Some(template) = self.templates.read().get(expected_format) {
            return Ok(template.clone());
        }

        let template = compile_template(expected_format)?;

        let mut templates = self.templates.write();
        if templates.len() >= MAX_CACHED_TEMPLATES {
            templates.clear();
        }
        templates.insert(expected_format.to_string(), template.clone());

        Ok(template)
    }
}

impl PartitionExtractor for PatternExtractor {
    fn name(&self) -> &'static str {
        "partition"
    }

    fn extract(&self, descriptor: &str, expected_format: &str) -> Result<PartitionId> {
        self.parse(descriptor, expected_format).map(|fields| fields.partition)
    }

    fn validate_format(&self, expected_format: &str) -> Result<()> {
        self.template(expected_format).map(|_| ())
    }
}

/// Turn a placeholder template into an anchored regex.
fn compile_template(expected_format: &str) -> Result<Regex> {
    let invalid = |reason: String| {
        Error::InvalidConfiguration(format!("format {expected_format:?}: {reason}"))
    };

    let mut pattern = String::from("^");
    let mut seen: Vec<&str> = Vec::new();
    let mut rest = expected_format;

    while let Some(start) = rest.find("{{") {
        pattern.push_str(&regex::escape(&rest[..start]));

        let after = &rest[start + 2..];
        let end = after
            .find("}}")
            .ok_or_else(|| invalid("unterminated placeholder".to_string()))?;
        let name = after[..end].trim();

        let group = match name {
            TOPIC => r"(?P<topic>[a-zA-Z0-9\-_.]+)",
            PARTITION => r"(?P<partition>[0-9]+)",
            START_OFFSET => r"(?P<start_offset>[0-9]+)",
            TIMESTAMP => r"(?P<timestamp>[a-zA-Z0-9\-_.]+)",
            other => return Err(invalid(format!("unknown placeholder {{{{{other}}}}}"))),
        };
        if seen.contains(&name) {
            return Err(invalid(format!("placeholder {{{{{name}}}}} appears more than once")));
        }
        seen.push(name);
        pattern.push_str(group);

        rest = &after[end + 2..];
    }
    pattern.push_str(&regex::escape(rest));
    pattern.push('$');

    if !seen.contains(&PARTITION) {
        return Err(invalid("missing {{partition}} placeholder".to_string()));
    }

    Regex::new(&pattern).map_err(|e| invalid(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const FORMAT: &str = "{{topic}}-{{partition}}-{{start_offset}}";

    #[test]
    fn test_extract_partition() {
        let extractor = PatternExtractor::new();
        assert_eq!(extractor.extract("orders-3-00012", FORMAT).unwrap(), 3);
        assert_eq!(extractor.extract("orders-17-0", FORMAT).unwrap(), 17);
    }

    #[test]
    fn test_topic_with_dashes() {
        let extractor = PatternExtractor::new();
        let fields = extractor.parse("my-topic.v2-5-100", FORMAT).unwrap();

        assert_eq!(fields.topic.as_deref(), Some("my-topic.v2"));
        assert_eq!(fields.partition, 5);
        assert_eq!(fields.start_offset, Some(100));
        assert_eq!(fields.timestamp, None);
    }

    #[test]
    fn test_literal_text_is_escaped() {
        let extractor = PatternExtractor::new();
        let format = "logs/{{partition}}.json";

        assert_eq!(extractor.extract("logs/4.json", format).unwrap(), 4);
        // '.' is literal, not a wildcard.
        assert!(extractor.extract("logs/4xjson", format).is_err());
    }

    #[test]
    fn test_timestamp_placeholder() {
        let extractor = PatternExtractor::new();
        let fields = extractor
            .parse("2024-06-01_events_9", "{{timestamp}}_events_{{partition}}")
            .unwrap();

        assert_eq!(fields.timestamp.as_deref(), Some("2024-06-01"));
        assert_eq!(fields.partition, 9);
    }

    #[test]
    fn test_mismatch_is_unparsable() {
        let extractor = PatternExtractor::new();
        for descriptor in ["orders", "orders-x-1", "orders-1-2.gz", "", "prefix/orders-1-2"] {
            let err = extractor.extract(descriptor, FORMAT).unwrap_err();
            assert!(
                matches!(err, Error::UnparsableDescriptor { .. }),
                "{descriptor}: {err:?}"
            );
        }
    }

    #[test]
    fn test_partition_overflow_is_unparsable() {
        let extractor = PatternExtractor::new();
        let err = extractor
            .extract("99999999999999999999999", "{{partition}}")
            .unwrap_err();
        assert!(err.is_skippable());
    }

    #[test]
    fn test_invalid_formats() {
        let extractor = PatternExtractor::new();
        for format in [
            "{{topic}}-{{start_offset}}",
            "{{partition}}-{{shard}}",
            "{{partition}}-{{partition}}",
            "{{partition",
            "plain.txt",
        ] {
            assert!(
                matches!(
                    extractor.validate_format(format),
                    Err(Error::InvalidConfiguration(_))
                ),
                "{format}"
            );
        }
        assert!(extractor.validate_format(FORMAT).is_ok());
    }

    #[test]
    fn test_template_cache() {
        let extractor = PatternExtractor::new();
        extractor.extract("a-1-1", FORMAT).unwrap();
        extractor.extract("b-2-2", FORMAT).unwrap();
        assert_eq!(extractor.cached_templates(), 1);

        extractor.extract("7", "{{partition}}").unwrap();
        assert_eq!(extractor.cached_templates(), 2);
    }
}
