use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::Path;

use crate::error::{GeosketchError, Result};
use crate::models::{CoordinateDims, GeometryType};

/// Configuration source for tracking where values come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Default value
    Default,
    /// Loaded from config file
    File,
    /// Loaded from environment variable
    Environment,
    /// Provided by the host application
    Host,
}

impl ConfigSource {
    /// Returns the precedence level (higher = higher priority)
    pub fn precedence(&self) -> u8 {
        match self {
            ConfigSource::Default => 0,
            ConfigSource::File => 1,
            ConfigSource::Environment => 2,
            ConfigSource::Host => 3,
        }
    }
}

/// A configuration value with its source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }

    /// Update the value if the new source has higher precedence
    pub fn update(&mut self, value: T, source: ConfigSource) {
        if source.precedence() > self.source.precedence() {
            self.value = value;
            self.source = source;
        }
    }
}

/// Layered digitizing defaults: built-in defaults, then a TOML file, then
/// `GEOSKETCH_*` environment variables, then host overrides.
#[derive(Debug, Clone)]
pub struct DigitizingConfig {
    /// EPSG code of the CRS new sketches are captured in
    pub crs: ConfigValue<u32>,
    /// Geometry type new sketches start with
    pub geometry_type: ConfigValue<GeometryType>,
    /// Coordinate components captured per vertex
    pub dimensions: ConfigValue<CoordinateDims>,
}

impl DigitizingConfig {
    /// Create a new configuration with default values
    pub fn with_defaults() -> Self {
        Self {
            crs: ConfigValue::new(4326, ConfigSource::Default),
            geometry_type: ConfigValue::new(GeometryType::Line, ConfigSource::Default),
            dimensions: ConfigValue::new(CoordinateDims::Xy, ConfigSource::Default),
        }
    }

    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self> {
        let content =
            fs::read_to_string(path.as_ref()).map_err(|e| GeosketchError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to read config file: {}", e),
            })?;

        let file_config: FileConfig =
            toml::from_str(&content).map_err(|e| GeosketchError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to parse TOML: {}", e),
            })?;

        if let Some(crs) = file_config.crs {
            self.crs.update(crs, ConfigSource::File);
        }

        if let Some(geometry_type) = file_config.geometry_type {
            self.geometry_type.update(geometry_type, ConfigSource::File);
        }

        if let Some(dimensions) = file_config.dimensions {
            self.dimensions.update(dimensions, ConfigSource::File);
        }

        Ok(self)
    }

    /// Load configuration from environment variables
    pub fn load_from_env(mut self) -> Self {
        // GEOSKETCH_CRS
        if let Ok(crs_str) = env::var("GEOSKETCH_CRS") {
            match crs_str.parse::<u32>() {
                Ok(crs) => self.crs.update(crs, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid GEOSKETCH_CRS value '{}': expected integer EPSG code",
                    crs_str
                ),
            }
        }

        // GEOSKETCH_GEOMETRY_TYPE
        if let Ok(type_str) = env::var("GEOSKETCH_GEOMETRY_TYPE") {
            match parse_geometry_type(&type_str) {
                Ok(geometry_type) => {
                    self.geometry_type.update(geometry_type, ConfigSource::Environment)
                }
                Err(_) => tracing::warn!(
                    "Invalid GEOSKETCH_GEOMETRY_TYPE value '{}': expected point, line, or polygon",
                    type_str
                ),
            }
        }

        // GEOSKETCH_DIMENSIONS
        if let Ok(dims_str) = env::var("GEOSKETCH_DIMENSIONS") {
            match parse_dimensions(&dims_str) {
                Ok(dimensions) => self.dimensions.update(dimensions, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid GEOSKETCH_DIMENSIONS value '{}': expected xy, xyz, xym, or xyzm",
                    dims_str
                ),
            }
        }

        self
    }

    /// Apply host-application overrides
    pub fn update_from_host(&mut self, overrides: HostConfigOverrides) {
        if let Some(crs) = overrides.crs {
            self.crs.update(crs, ConfigSource::Host);
        }

        if let Some(geometry_type) = overrides.geometry_type {
            self.geometry_type.update(geometry_type, ConfigSource::Host);
        }

        if let Some(dimensions) = overrides.dimensions {
            self.dimensions.update(dimensions, ConfigSource::Host);
        }
    }

    /// Get all configuration values as a map for inspection
    pub fn to_inspection_map(&self) -> HashMap<String, (String, ConfigSource)> {
        let mut map = HashMap::new();

        map.insert("crs".to_string(), (format!("EPSG:{}", self.crs.value), self.crs.source));

        map.insert(
            "geometry_type".to_string(),
            (format!("{:?}", self.geometry_type.value), self.geometry_type.source),
        );

        map.insert(
            "dimensions".to_string(),
            (format!("{:?}", self.dimensions.value), self.dimensions.source),
        );

        map
    }
}

/// Configuration loaded from TOML file
#[derive(Debug, Deserialize, Serialize)]
struct FileConfig {
    crs: Option<u32>,
    geometry_type: Option<GeometryType>,
    dimensions: Option<CoordinateDims>,
}

/// Host-application configuration overrides
#[derive(Debug, Default)]
pub struct HostConfigOverrides {
    pub crs: Option<u32>,
    pub geometry_type: Option<GeometryType>,
    pub dimensions: Option<CoordinateDims>,
}

/// Parse geometry type from string
pub fn parse_geometry_type(s: &str) -> Result<GeometryType> {
    match s.to_lowercase().as_str() {
        "point" => Ok(GeometryType::Point),
        "line" | "linestring" => Ok(GeometryType::Line),
        "polygon" => Ok(GeometryType::Polygon),
        _ => Err(GeosketchError::ConfigInvalid {
            key: "geometry_type".to_string(),
            reason: format!("Invalid geometry type: {}. Use point, line, or polygon", s),
        }),
    }
}

/// Parse coordinate dimensions from string
pub fn parse_dimensions(s: &str) -> Result<CoordinateDims> {
    match s.to_lowercase().as_str() {
        "xy" => Ok(CoordinateDims::Xy),
        "xyz" => Ok(CoordinateDims::Xyz),
        "xym" => Ok(CoordinateDims::Xym),
        "xyzm" => Ok(CoordinateDims::Xyzm),
        _ => Err(GeosketchError::ConfigInvalid {
            key: "dimensions".to_string(),
            reason: format!("Invalid dimensions: {}. Use xy, xyz, xym, or xyzm", s),
        }),
    }
}
