//! # Registry Configuration
//!
//! Knobs that change the shape of generated fragments without changing
//! the composition rules. A configuration can be embedded in a
//! declaration manifest under the `config` key.

use serde::{Deserialize, Serialize};

use schemata_core::PrimitiveMapper;

/// Extra keyword forced onto date-time leaves next to `format`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateTimeMarker {
    /// Keyword name (default `datetime`).
    pub key: String,
    /// Keyword value (default `ISO8601`).
    pub value: String,
}

/// Configuration for a [`Registry`](crate::Registry).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// `format` value of `Date` leaves.
    pub date_time_format: String,
    /// Extra marker keyword on `Date` leaves; `None` disables it.
    pub date_time_marker: Option<DateTimeMarker>,
    /// Default a root's `title` and `description` to the type name.
    pub default_title_from_name: bool,
    /// Type `enum`/`const` fragments by their values' JSON type instead
    /// of always writing `string`.
    pub infer_value_type: bool,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            date_time_format: "date-time".to_string(),
            date_time_marker: Some(DateTimeMarker {
                key: "datetime".to_string(),
                value: "ISO8601".to_string(),
            }),
            default_title_from_name: true,
            infer_value_type: false,
        }
    }
}

impl RegistryConfig {
    /// Build the primitive mapper described by this configuration.
    pub fn mapper(&self) -> PrimitiveMapper {
        PrimitiveMapper {
            date_time_format: self.date_time_format.clone(),
            date_time_marker: self
                .date_time_marker
                .as_ref()
                .map(|m| (m.key.clone(), m.value.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_default_mapper() {
        assert_eq!(RegistryConfig::default().mapper(), PrimitiveMapper::default());
    }

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let config: RegistryConfig = serde_yaml::from_str("date_time_marker: null\n").unwrap();
        assert_eq!(config.date_time_format, "date-time");
        assert!(config.date_time_marker.is_none());
        assert!(config.default_title_from_name);
        assert!(config.mapper().date_time_marker.is_none());
        assert!(!config.infer_value_type);
    }

    #[test]
    fn test_infer_value_type_opt_in() {
        let config: RegistryConfig = serde_yaml::from_str("infer_value_type: true\n").unwrap();
        assert!(config.infer_value_type);
        assert!(config.default_title_from_name);
    }
}
