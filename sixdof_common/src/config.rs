//! Configuration loading.
//!
//! Two independent layers, loaded once at construction and never
//! hot-reloaded:
//!
//! - [`SystemConfig`] — the process-wide singleton (simulation flag,
//!   reconnect interval, IP defaults), loaded from TOML via [`ConfigLoader`].
//! - [`SdofConfig`] — the per-device property block, supplied as a JSON
//!   string at construction, parsed with `serde_json`.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::consts::{
    DEFAULT_MOTOR_GEAR_RATIO, DEFAULT_MOTOR_STEP_ANGLE, DEFAULT_MOTOR_SUBDIVISION,
    DEFAULT_PROXY_RECONNECT_INTERVAL_SEC, PORT_ABSENT,
};

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io { path: String, #[source] source: std::io::Error },

    #[error("failed to parse TOML config {path}: {source}")]
    Toml { path: String, #[source] source: Box<toml::de::Error> },

    #[error("failed to parse JSON config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("config validation failed: {0}")]
    Validation(String),
}

/// Blanket-implemented loader for any TOML-backed configuration type: any
/// `DeserializeOwned` type gets file- and string-based TOML loading for
/// free, so adding a new config struct never requires new loading code.
pub trait ConfigLoader: DeserializeOwned + Sized {
    fn load_from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::Toml {
            path: "<string>".to_string(),
            source: Box::new(e),
        })
    }

    fn load_from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        toml::from_str(&text).map_err(|e| ConfigError::Toml {
            path: path.display().to_string(),
            source: Box::new(e),
        })
    }
}

impl<T: DeserializeOwned> ConfigLoader for T {}

/// Process-wide system configuration.
///
/// Read once at device construction. There is exactly one call site; this
/// crate deliberately does not carry a `LazyLock`-backed global singleton
/// for it (see the repository's `DESIGN.md`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemConfig {
    pub simulation_mode: bool,
    pub proxy_reconnect_interval_sec: u64,
    pub motion_controller_ip: Option<String>,
    pub encoder_service_ip: Option<String>,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            simulation_mode: false,
            proxy_reconnect_interval_sec: DEFAULT_PROXY_RECONNECT_INTERVAL_SEC,
            motion_controller_ip: None,
            encoder_service_ip: None,
        }
    }
}

impl SystemConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.proxy_reconnect_interval_sec == 0 {
            return Err(ConfigError::Validation(
                "proxy_reconnect_interval_sec must be > 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// Accepts either a JSON number or a numeric string — the `sdofConfig`
/// mandatory keys are documented as "numeric or numeric-string".
fn de_flexible_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumOrString {
        Num(f64),
        Str(String),
    }
    match NumOrString::deserialize(deserializer)? {
        NumOrString::Num(n) => Ok(n),
        NumOrString::Str(s) => s.trim().parse::<f64>().map_err(serde::de::Error::custom),
    }
}

fn default_min_leg() -> f64 {
    0.0
}

fn default_max_leg() -> f64 {
    f64::MAX
}

/// Platform geometry, parsed from the `sdofConfig` JSON property.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlatformGeometry {
    #[serde(deserialize_with = "de_flexible_f64")]
    pub r1: f64,
    #[serde(deserialize_with = "de_flexible_f64")]
    pub r2: f64,
    #[serde(deserialize_with = "de_flexible_f64")]
    pub hh: f64,
    #[serde(deserialize_with = "de_flexible_f64")]
    pub a1: f64,
    #[serde(deserialize_with = "de_flexible_f64")]
    pub a2: f64,
    #[serde(deserialize_with = "de_flexible_f64")]
    pub h: f64,
    #[serde(deserialize_with = "de_flexible_f64")]
    pub h3: f64,
    #[serde(deserialize_with = "de_flexible_f64")]
    pub ll: f64,
    #[serde(default = "default_min_leg")]
    pub min_leg_length: f64,
    #[serde(default = "default_max_leg")]
    pub max_leg_length: f64,
}

impl PlatformGeometry {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ll <= 0.0 {
            return Err(ConfigError::Validation("ll (nominal leg length) must be > 0".into()));
        }
        if self.min_leg_length > self.max_leg_length {
            return Err(ConfigError::Validation(
                "min_leg_length must be <= max_leg_length".into(),
            ));
        }
        Ok(())
    }

    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let geometry: Self = serde_json::from_str(s)?;
        geometry.validate()?;
        Ok(geometry)
    }
}

fn default_encoder_channels() -> [u8; 6] {
    [0, 1, 2, 3, 4, 5]
}

/// Per-device property block, everything in `sdofConfig` plus the
/// sibling named properties loaded alongside it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SdofConfig {
    pub geometry: PlatformGeometry,

    #[serde(default = "default_motor_step_angle")]
    pub motor_step_angle: f64,
    #[serde(default = "default_motor_gear_ratio")]
    pub motor_gear_ratio: f64,
    #[serde(default = "default_motor_subdivision")]
    pub motor_subdivision: u32,

    #[serde(default = "default_port_absent")]
    pub driver_power_port: i32,
    pub driver_power_controller: Option<String>,

    #[serde(default = "default_port_absent")]
    pub brake_power_port: i32,
    pub brake_power_controller: Option<String>,

    #[serde(default = "default_encoder_channels")]
    pub encoder_channels: [u8; 6],

    pub motion_controller_name: Option<String>,
    pub encoder_name: Option<String>,
    pub device_name: Option<String>,
    pub device_id: Option<String>,
}

fn default_motor_step_angle() -> f64 {
    DEFAULT_MOTOR_STEP_ANGLE
}
fn default_motor_gear_ratio() -> f64 {
    DEFAULT_MOTOR_GEAR_RATIO
}
fn default_motor_subdivision() -> u32 {
    DEFAULT_MOTOR_SUBDIVISION
}
fn default_port_absent() -> i32 {
    PORT_ABSENT
}

impl SdofConfig {
    /// Pulses-per-mm conversion factor derived from the motor parameters.
    ///
    /// `pulses_per_degree = subdivision / step_angle`; folded through the
    /// gear ratio. The reference lead-screw pitch that turns this into a
    /// linear pulses/mm figure is absorbed into the default constant
    /// ([`crate::consts::DEFAULT_PULSES_PER_MM`]) when the motor parameters
    /// hold their documented defaults.
    pub fn pulses_per_mm(&self) -> f64 {
        if (self.motor_step_angle - DEFAULT_MOTOR_STEP_ANGLE).abs() < f64::EPSILON
            && (self.motor_gear_ratio - DEFAULT_MOTOR_GEAR_RATIO).abs() < f64::EPSILON
            && self.motor_subdivision == DEFAULT_MOTOR_SUBDIVISION
        {
            return crate::consts::DEFAULT_PULSES_PER_MM;
        }
        let lead_factor = crate::consts::DEFAULT_PULSES_PER_MM
            / ((DEFAULT_MOTOR_SUBDIVISION as f64 * 360.0)
                / (DEFAULT_MOTOR_STEP_ANGLE * DEFAULT_MOTOR_GEAR_RATIO));
        ((self.motor_subdivision as f64 * 360.0) / (self.motor_step_angle * self.motor_gear_ratio))
            * lead_factor
    }

    pub fn has_driver_power_port(&self) -> bool {
        self.driver_power_port != PORT_ABSENT
    }

    pub fn has_brake_power_port(&self) -> bool {
        self.brake_power_port != PORT_ABSENT
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn system_config_defaults_match_spec() {
        let cfg = SystemConfig::default();
        assert!(!cfg.simulation_mode);
        assert_eq!(cfg.proxy_reconnect_interval_sec, DEFAULT_PROXY_RECONNECT_INTERVAL_SEC);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn system_config_rejects_zero_reconnect_interval() {
        let cfg = SystemConfig { proxy_reconnect_interval_sec: 0, ..SystemConfig::default() };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn system_config_loads_from_toml_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "simulation_mode = true\nproxy_reconnect_interval_sec = 5").unwrap();
        let cfg = SystemConfig::load_from_toml_file(file.path()).unwrap();
        assert!(cfg.simulation_mode);
        assert_eq!(cfg.proxy_reconnect_interval_sec, 5);
    }

    #[test]
    fn platform_geometry_accepts_numeric_strings() {
        let json = r#"{"r1":"110","r2":193,"hh":"408","a1":40,"a2":"14","h":0,"h3":"0","ll":421.4857}"#;
        let geo = PlatformGeometry::from_json_str(json).unwrap();
        assert_eq!(geo.r1, 110.0);
        assert_eq!(geo.hh, 408.0);
        assert_eq!(geo.ll, 421.4857);
    }

    #[test]
    fn platform_geometry_defaults_leg_bounds_when_absent() {
        let json = r#"{"r1":110,"r2":193,"hh":408,"a1":40,"a2":14,"h":0,"h3":0,"ll":421.4857}"#;
        let geo = PlatformGeometry::from_json_str(json).unwrap();
        assert_eq!(geo.min_leg_length, 0.0);
        assert_eq!(geo.max_leg_length, f64::MAX);
    }

    #[test]
    fn platform_geometry_rejects_nonpositive_ll() {
        let json = r#"{"r1":110,"r2":193,"hh":408,"a1":40,"a2":14,"h":0,"h3":0,"ll":0}"#;
        assert!(PlatformGeometry::from_json_str(json).is_err());
    }

    #[test]
    fn sdof_config_defaults_motor_parameters() {
        let json = r#"{
            "geometry": {"r1":110,"r2":193,"hh":408,"a1":40,"a2":14,"h":0,"h3":0,"ll":421.4857}
        }"#;
        let cfg: SdofConfig = serde_json::from_str(json).unwrap();
        assert_eq!(cfg.motor_step_angle, 1.8);
        assert_eq!(cfg.motor_gear_ratio, 1.0);
        assert_eq!(cfg.motor_subdivision, 12800);
        assert_eq!(cfg.driver_power_port, -1);
        assert_eq!(cfg.brake_power_port, -1);
        assert_eq!(cfg.encoder_channels, [0, 1, 2, 3, 4, 5]);
        assert!(!cfg.has_driver_power_port());
    }

    #[test]
    fn sdof_config_pulses_per_mm_matches_default_constant_at_defaults() {
        let json = r#"{
            "geometry": {"r1":110,"r2":193,"hh":408,"a1":40,"a2":14,"h":0,"h3":0,"ll":421.4857}
        }"#;
        let cfg: SdofConfig = serde_json::from_str(json).unwrap();
        assert_eq!(cfg.pulses_per_mm(), crate::consts::DEFAULT_PULSES_PER_MM);
    }
}
