//! Organism configuration
//!
//! Everything besides the genome and the instruction set that decides how an
//! organism behaves. Deserializable so drivers can keep it next to their own
//! run configuration.

use serde::{Deserialize, Serialize};

use crate::environment::{Environment, EnvironmentKind};
use crate::io::InputSource;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrganismConfig {
    /// Whether `sense-react-*` instructions do anything.
    pub sensors_enabled: bool,
    /// Environment the organism is placed in.
    pub environment: EnvironmentKind,
    /// Source of the three per-episode inputs.
    pub inputs: InputSource,
}

impl OrganismConfig {
    pub fn new(sensors_enabled: bool, in_env_a: bool) -> Self {
        let environment = if in_env_a { EnvironmentKind::A } else { EnvironmentKind::B };
        Self { sensors_enabled, environment, inputs: InputSource::Random }
    }

    pub fn with_inputs(mut self, inputs: InputSource) -> Self {
        self.inputs = inputs;
        self
    }

    pub fn environment(&self) -> Environment {
        Environment::new(self.sensors_enabled, self.environment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = OrganismConfig::default();
        assert!(!config.sensors_enabled);
        assert_eq!(config.environment, EnvironmentKind::A);
        assert_eq!(config.inputs, InputSource::Random);
    }

    #[test]
    fn test_from_flags() {
        let config = OrganismConfig::new(true, false).with_inputs(InputSource::Seeded(3));
        assert_eq!(config.environment(), Environment::from_flags(true, false));
        assert_eq!(config.inputs, InputSource::Seeded(3));
    }

    #[test]
    fn test_deserialize_json() {
        let config: OrganismConfig = serde_json::from_str(
            r#"{ "sensors_enabled": true, "environment": "B", "inputs": { "fixed": [1, 2, 3] } }"#,
        )
        .unwrap();
        assert!(config.sensors_enabled);
        assert_eq!(config.environment, EnvironmentKind::B);
        assert_eq!(config.inputs, InputSource::Fixed([1, 2, 3]));

        let partial: OrganismConfig = serde_json::from_str(r#"{ "inputs": { "seeded": 9 } }"#).unwrap();
        assert_eq!(partial, OrganismConfig::default().with_inputs(InputSource::Seeded(9)));
    }

    #[test]
    fn test_serialize_roundtrip() {
        let config = OrganismConfig::new(true, true).with_inputs(InputSource::Fixed([5, 6, 7]));
        let text = serde_json::to_string(&config).unwrap();
        let back: OrganismConfig = serde_json::from_str(&text).unwrap();
        assert_eq!(back, config);
    }
}
