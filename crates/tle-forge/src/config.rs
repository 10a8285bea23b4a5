//! Forger configuration

use serde::{Deserialize, Serialize};

/// How the forger treats inputs the TLE columns cannot represent
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationPolicy {
    /// Encode whatever comes in; only a line that misses 68 columns fails
    #[default]
    Permissive,
    /// Reject non-finite numbers, eccentricity outside [0, 1), scientific
    /// fields needing a two-digit exponent and oversized identities
    Strict,
}

impl ValidationPolicy {
    pub fn is_strict(&self) -> bool {
        matches!(self, Self::Strict)
    }
}

/// Drag-related terms of line 1
///
/// Synthetic records leave all three at zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DragTerms {
    /// First derivative of mean motion / 2 (rev/day²)
    pub mean_motion_dot: f64,
    /// Second derivative of mean motion / 6 (rev/day³)
    pub mean_motion_ddot: f64,
    /// B* drag term (1/earth radii)
    pub bstar: f64,
}

/// Forger configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ForgeConfig {
    #[serde(default)]
    pub validation: ValidationPolicy,
    #[serde(default)]
    pub drag: DragTerms,
}

impl ForgeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration with the strict validation policy
    pub fn strict() -> Self {
        Self::default().validation(ValidationPolicy::Strict)
    }

    pub fn validation(mut self, policy: ValidationPolicy) -> Self {
        self.validation = policy;
        self
    }

    pub fn drag(mut self, drag: DragTerms) -> Self {
        self.drag = drag;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_reference_forger() {
        let config = ForgeConfig::default();
        assert_eq!(config.validation, ValidationPolicy::Permissive);
        assert_eq!(config.drag, DragTerms::default());
        assert_eq!(config.drag.bstar, 0.0);
    }

    #[test]
    fn test_builder() {
        let drag = DragTerms {
            bstar: 2.8098e-5,
            ..DragTerms::default()
        };
        let config = ForgeConfig::strict().drag(drag);
        assert!(config.validation.is_strict());
        assert_eq!(config.drag.bstar, 2.8098e-5);
    }

    #[test]
    fn test_partial_json() {
        let config: ForgeConfig = serde_json::from_str(r#"{"validation": "strict"}"#).unwrap();
        assert_eq!(config, ForgeConfig::strict());

        let config: ForgeConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, ForgeConfig::default());
    }
}
