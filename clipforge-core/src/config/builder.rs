// ============================================================================
// clipforge-core/src/config/builder.rs
// ============================================================================
//
// CONFIGURATION BUILDER: Builder Pattern for CoreConfig
//
// This module implements the builder pattern for the CoreConfig structure,
// providing a fluent API for creating CoreConfig instances with defaults for
// every field that is not set explicitly.
//
// AI-ASSISTANT-INFO: Builder pattern implementation for CoreConfig

// ---- Standard library imports ----
use std::path::PathBuf;

// ---- Internal crate imports ----
use super::{CoreConfig, DeliveryStrategy};

/// Builder for creating CoreConfig instances.
///
/// # Examples
///
/// ```rust
/// use clipforge_core::config::CoreConfigBuilder;
/// use std::path::PathBuf;
///
/// let config = CoreConfigBuilder::new()
///     .output_dir(PathBuf::from("exports"))
///     .build();
/// assert_eq!(config.output_dir, PathBuf::from("exports"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct CoreConfigBuilder {
    output_dir: Option<PathBuf>,
    temp_dir: Option<PathBuf>,
    delivery: DeliveryStrategy,
}

impl CoreConfigBuilder {
    /// Creates a new CoreConfigBuilder with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the directory where delivered artifacts are saved.
    pub fn output_dir(mut self, output_dir: PathBuf) -> Self {
        self.output_dir = Some(output_dir);
        self
    }

    /// Sets the base directory for the engine workspace.
    pub fn temp_dir(mut self, temp_dir: PathBuf) -> Self {
        self.temp_dir = Some(temp_dir);
        self
    }

    /// Sets the base directory for the engine workspace if one is given.
    pub fn maybe_temp_dir(mut self, temp_dir: Option<PathBuf>) -> Self {
        self.temp_dir = temp_dir;
        self
    }

    /// Sets the delivery strategy.
    pub fn delivery(mut self, delivery: DeliveryStrategy) -> Self {
        self.delivery = delivery;
        self
    }

    /// Builds the CoreConfig instance.
    pub fn build(self) -> CoreConfig {
        let defaults = CoreConfig::default();
        CoreConfig {
            output_dir: self.output_dir.unwrap_or(defaults.output_dir),
            temp_dir: self.temp_dir,
            delivery: self.delivery,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults_match_config_defaults() {
        let config = CoreConfigBuilder::new().build();
        let defaults = CoreConfig::default();
        assert_eq!(config.output_dir, defaults.output_dir);
        assert_eq!(config.temp_dir, defaults.temp_dir);
        assert_eq!(config.delivery, defaults.delivery);
    }

    #[test]
    fn test_builder_overrides() {
        let config = CoreConfigBuilder::new()
            .output_dir(PathBuf::from("/out"))
            .maybe_temp_dir(Some(PathBuf::from("/scratch")))
            .delivery(DeliveryStrategy::DataUrl)
            .build();
        assert_eq!(config.output_dir, PathBuf::from("/out"));
        assert_eq!(config.temp_dir, Some(PathBuf::from("/scratch")));
        assert_eq!(config.delivery, DeliveryStrategy::DataUrl);
        assert_eq!(config.workspace_base(), PathBuf::from("/scratch"));
    }
}
