//! Export configuration, loadable from TOML.
//!
//! Every field has a default, so a configuration file only needs to list the
//! values it changes:
//!
//! ```toml
//! n_filled_in_theta = 19
//!
//! [grid]
//! n_spec_phi = 73
//! ```

use base::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Grid used when a BRDF is resampled into specular coordinates for export.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportGrid {
    /// Incoming polar samples over `[0, π/2]`.
    pub n_in_theta: usize,
    /// Incoming azimuth samples over `[0, 2π]`.
    pub n_in_phi: usize,
    /// Specular polar samples over `[0, π/2]`.
    pub n_spec_theta: usize,
    /// Specular azimuth samples over `[0, 2π]`.
    pub n_spec_phi: usize,
}

impl Default for ExportGrid {
    fn default() -> Self {
        Self {
            n_in_theta: 10,
            n_in_phi: 1,
            n_spec_theta: 181,
            n_spec_phi: 37,
        }
    }
}

impl ExportGrid {
    /// Sample counts in axis order.
    pub fn counts(&self) -> [usize; 4] {
        [
            self.n_in_theta,
            self.n_in_phi,
            self.n_spec_theta,
            self.n_spec_phi,
        ]
    }
}

/// Resolution of the midpoint quadrature over the outgoing hemisphere.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntegratorConfig {
    /// Polar subdivisions over `[0, π/2]`.
    pub n_theta: usize,
    /// Azimuth subdivisions over `[0, 2π]`.
    pub n_phi: usize,
}

impl Default for IntegratorConfig {
    fn default() -> Self {
        Self {
            n_theta: 90,
            n_phi: 180,
        }
    }
}

/// Grid on which analytic models are sampled, in spherical or specular
/// coordinates.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerateGrid {
    /// Incoming polar samples over `[0, π/2]`.
    pub n_in_theta: usize,
    /// Incoming azimuth samples over `[0, 2π]`; 1 means `[0]`.
    pub n_in_phi: usize,
    /// Outgoing polar samples over `[0, π/2]`.
    pub n_out_theta: usize,
    /// Outgoing azimuth samples over `[0, 2π]`.
    pub n_out_phi: usize,
}

impl Default for GenerateGrid {
    fn default() -> Self {
        Self {
            n_in_theta: 19,
            n_in_phi: 1,
            n_out_theta: 91,
            n_out_phi: 73,
        }
    }
}

impl GenerateGrid {
    /// Sample counts in axis order.
    pub fn counts(&self) -> [usize; 4] {
        [
            self.n_in_theta,
            self.n_in_phi,
            self.n_out_theta,
            self.n_out_phi,
        ]
    }
}

/// Settings of the export pipeline.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Default resampling grid.
    pub grid: ExportGrid,
    /// Incoming polar samples created when the source has a single one.
    pub n_filled_in_theta: usize,
    /// Quadrature used by the energy-conservation correction.
    pub integrator: IntegratorConfig,
    /// Grid used to sample analytic models.
    pub generate: GenerateGrid,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            grid: ExportGrid::default(),
            n_filled_in_theta: 10,
            integrator: IntegratorConfig::default(),
            generate: GenerateGrid::default(),
        }
    }
}

impl ExportConfig {
    /// Loads the configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&content)?;
        log::debug!("loaded export configuration from {}", path.display());
        Ok(config)
    }

    /// Parses and validates a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialises the configuration to TOML.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|err| ConfigError::Parse(err.to_string()))
    }

    /// Checks that every count is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let checks: [(&'static str, usize, usize); 11] = [
            ("grid.n_in_theta", self.grid.n_in_theta, 1),
            ("grid.n_in_phi", self.grid.n_in_phi, 1),
            ("grid.n_spec_theta", self.grid.n_spec_theta, 2),
            ("grid.n_spec_phi", self.grid.n_spec_phi, 1),
            ("n_filled_in_theta", self.n_filled_in_theta, 2),
            ("integrator.n_theta", self.integrator.n_theta, 1),
            ("integrator.n_phi", self.integrator.n_phi, 1),
            ("generate.n_in_theta", self.generate.n_in_theta, 1),
            ("generate.n_in_phi", self.generate.n_in_phi, 1),
            ("generate.n_out_theta", self.generate.n_out_theta, 2),
            ("generate.n_out_phi", self.generate.n_out_phi, 1),
        ];
        for (field, value, min) in checks {
            if value < min {
                return Err(ConfigError::Invalid {
                    field,
                    reason: if min == 1 {
                        "must be at least 1"
                    } else {
                        "must be at least 2"
                    },
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = ExportConfig::default();
        assert_eq!(config.grid.counts(), [10, 1, 181, 37]);
        assert_eq!(config.n_filled_in_theta, 10);
        assert_eq!(config.integrator.n_theta, 90);
        assert_eq!(config.generate.counts(), [19, 1, 91, 73]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_override() {
        let config = ExportConfig::from_toml_str(
            r#"
            n_filled_in_theta = 19

            [grid]
            n_spec_phi = 73
            "#,
        )
        .unwrap();
        assert_eq!(config.n_filled_in_theta, 19);
        assert_eq!(config.grid.n_spec_phi, 73);
        assert_eq!(config.grid.n_spec_theta, 181);
        assert_eq!(config.integrator, IntegratorConfig::default());
    }

    #[test]
    fn omitted_fields_keep_their_defaults() {
        let config = ExportConfig::from_toml_str("[integrator]\nn_theta = 30\n").unwrap();
        assert_eq!(config.n_filled_in_theta, 10);
        assert_eq!(config.integrator.n_theta, 30);
        assert_eq!(config.integrator.n_phi, 180);
        assert_eq!(config.grid, ExportGrid::default());
        assert_eq!(ExportConfig::from_toml_str("").unwrap(), ExportConfig::default());
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(
            ExportConfig::from_toml_str("[grid]\nn_in_theta = 0\n"),
            Err(ConfigError::Invalid {
                field: "grid.n_in_theta",
                ..
            })
        ));
        assert!(matches!(
            ExportConfig::from_toml_str("[grid]\nn_in_theta = \"ten\"\n"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn toml_round_trip() {
        let mut config = ExportConfig::default();
        config.integrator.n_phi = 360;
        let text = config.to_toml_string().unwrap();
        assert_eq!(ExportConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn missing_file() {
        let path = std::env::temp_dir().join("bsdfio-config-that-does-not-exist.toml");
        assert!(matches!(
            ExportConfig::load(&path),
            Err(ConfigError::Io { .. })
        ));
    }
}
