use std::env;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};

use tracing::{info, warn};

use crate::packing::EngineConfig;

/// Complete application configuration, loaded from environment variables or default values.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub engine: EngineSettings,
}

impl AppConfig {
    /// Creates a configuration from the currently available environment variables.
    pub fn from_env() -> Self {
        Self {
            api: ApiConfig::from_env(),
            engine: EngineSettings::from_env(),
        }
    }
}

/// Configuration for the API server.
#[derive(Clone, Debug)]
pub struct ApiConfig {
    bind_ip: IpAddr,
    display_host: String,
    port: u16,
}

impl ApiConfig {
    const DEFAULT_HOST: &'static str = "0.0.0.0";
    const DEFAULT_PORT: u16 = 8080;
    const HOST_VAR: &'static str = "CORNER_PACK_API_HOST";
    const PORT_VAR: &'static str = "CORNER_PACK_API_PORT";

    fn from_env() -> Self {
        Self::from_values(env_string(Self::HOST_VAR), env_string(Self::PORT_VAR))
    }

    fn from_values(host: Option<String>, port: Option<String>) -> Self {
        let host_value = host.unwrap_or_else(|| Self::DEFAULT_HOST.to_string());
        let (bind_ip, display_host) = match host_value.parse::<IpAddr>() {
            Ok(ip) => (ip, host_value),
            Err(err) => {
                warn!(
                    "Could not parse {} ('{}'): {}. Using {}.",
                    Self::HOST_VAR,
                    host_value,
                    err,
                    Self::DEFAULT_HOST
                );
                (
                    IpAddr::V4(Ipv4Addr::UNSPECIFIED),
                    Self::DEFAULT_HOST.to_string(),
                )
            }
        };

        let port = match port {
            Some(raw) => match raw.parse::<u16>() {
                Ok(value) if value != 0 => value,
                Ok(_) => {
                    warn!(
                        "{} must not be 0. Using {}.",
                        Self::PORT_VAR,
                        Self::DEFAULT_PORT
                    );
                    Self::DEFAULT_PORT
                }
                Err(err) => {
                    warn!(
                        "Could not parse {} ('{}'): {}. Using {}.",
                        Self::PORT_VAR,
                        raw,
                        err,
                        Self::DEFAULT_PORT
                    );
                    Self::DEFAULT_PORT
                }
            },
            None => Self::DEFAULT_PORT,
        };

        Self {
            bind_ip,
            display_host,
            port,
        }
    }

    /// Socket address to bind the server to.
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_ip, self.port)
    }

    /// Visible hostname for logging and hints.
    pub fn display_host(&self) -> &str {
        &self.display_host
    }

    /// Configured port.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Indicates whether binding to all interfaces.
    pub fn binds_to_all_interfaces(&self) -> bool {
        match self.bind_ip {
            IpAddr::V4(addr) => addr == Ipv4Addr::UNSPECIFIED,
            IpAddr::V6(addr) => addr == Ipv6Addr::UNSPECIFIED,
        }
    }

    /// Checks whether the hostname matches the default value.
    pub fn uses_default_host(&self) -> bool {
        self.display_host == Self::DEFAULT_HOST
    }
}

/// Engine tolerances and defaults for the candidate engine.
#[derive(Clone, Debug)]
pub struct EngineSettings {
    engine: EngineConfig,
}

impl EngineSettings {
    const CORNER_EPSILON_VAR: &'static str = "CORNER_PACK_CORNER_EPSILON";
    const GENERAL_EPSILON_VAR: &'static str = "CORNER_PACK_GENERAL_EPSILON";
    const ALLOW_ROTATION_VAR: &'static str = "CORNER_PACK_ALLOW_ROTATIONS";

    fn from_env() -> Self {
        let corner_epsilon = load_f64_with_warning(
            Self::CORNER_EPSILON_VAR,
            EngineConfig::DEFAULT_CORNER_EPSILON,
            |value| value > 0.0 && value.is_finite(),
            "must be greater than 0",
            "Adjusted corner probe offset must stay below the smallest item dimension",
        );

        let general_epsilon = load_f64_with_warning(
            Self::GENERAL_EPSILON_VAR,
            EngineConfig::DEFAULT_GENERAL_EPSILON,
            |value| value > 0.0 && value.is_finite(),
            "must be greater than 0",
            "Adjusted tolerances may cause numerical instabilities",
        );

        let allow_rotation = env_string(Self::ALLOW_ROTATION_VAR)
            .and_then(|raw| parse_bool(&raw, Self::ALLOW_ROTATION_VAR))
            .unwrap_or(EngineConfig::DEFAULT_ALLOW_ROTATION);

        Self::from_values(corner_epsilon, general_epsilon, allow_rotation)
    }

    fn from_values(corner_epsilon: f64, general_epsilon: f64, allow_rotation: bool) -> Self {
        // the probe offset has to reach past the overlap tolerance
        let (corner_epsilon, general_epsilon) = if general_epsilon >= corner_epsilon {
            warn!(
                "{} ({}) must be smaller than {} ({}). Using defaults {} and {}.",
                Self::GENERAL_EPSILON_VAR,
                general_epsilon,
                Self::CORNER_EPSILON_VAR,
                corner_epsilon,
                EngineConfig::DEFAULT_GENERAL_EPSILON,
                EngineConfig::DEFAULT_CORNER_EPSILON
            );
            (
                EngineConfig::DEFAULT_CORNER_EPSILON,
                EngineConfig::DEFAULT_GENERAL_EPSILON,
            )
        } else {
            (corner_epsilon, general_epsilon)
        };

        let engine = EngineConfig::builder()
            .corner_epsilon(corner_epsilon)
            .general_epsilon(general_epsilon)
            .allow_rotation(allow_rotation)
            .build();

        Self { engine }
    }

    /// Returns the configured EngineConfig.
    pub fn engine_config(&self) -> EngineConfig {
        self.engine
    }
}

fn env_string(name: &str) -> Option<String> {
    match env::var(name) {
        Ok(value) => {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_owned())
            }
        }
        Err(env::VarError::NotPresent) => None,
        Err(err) => {
            warn!("Access to {} failed: {}. Using default value.", name, err);
            None
        }
    }
}

fn parse_bool(raw: &str, var_name: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" | "on" => Some(true),
        "0" | "false" | "no" | "n" | "off" => Some(false),
        other => {
            warn!(
                "Could not interpret {} ('{}') as boolean value. Using default value.",
                var_name, other
            );
            None
        }
    }
}

fn load_f64_with_warning(
    var_name: &str,
    default: f64,
    validator: impl Fn(f64) -> bool,
    invalid_hint: &str,
    notice: &str,
) -> f64 {
    match env_string(var_name) {
        Some(raw) => {
            parse_f64_with_warning(&raw, var_name, default, validator, invalid_hint, notice)
        }
        None => default,
    }
}

fn parse_f64_with_warning(
    raw: &str,
    var_name: &str,
    default: f64,
    validator: impl Fn(f64) -> bool,
    invalid_hint: &str,
    notice: &str,
) -> f64 {
    match raw.parse::<f64>() {
        Ok(value) => {
            if !validator(value) {
                warn!(
                    "{} contains invalid value '{}': {}. Using {}.",
                    var_name, raw, invalid_hint, default
                );
                default
            } else {
                let tolerance = default.abs().max(f64::MIN_POSITIVE) * 1e-9;
                if (value - default).abs() > tolerance {
                    info!("{} ({} = {}).", notice, var_name, value);
                }
                value
            }
        }
        Err(err) => {
            warn!(
                "Could not parse {} ('{}') as number: {}. Using {}.",
                var_name, raw, err, default
            );
            default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bool_true_values() {
        for raw in ["1", "true", "yes", "y", "on", "TRUE", "Yes", " on ", "  1  "] {
            assert_eq!(parse_bool(raw, "TEST_VAR"), Some(true), "input {raw:?}");
        }
    }

    #[test]
    fn test_parse_bool_false_values() {
        for raw in ["0", "false", "no", "n", "off", "FALSE", "No", " off ", "  0  "] {
            assert_eq!(parse_bool(raw, "TEST_VAR"), Some(false), "input {raw:?}");
        }
    }

    #[test]
    fn test_parse_bool_invalid_values() {
        assert_eq!(parse_bool("invalid", "TEST_VAR"), None);
        assert_eq!(parse_bool("2", "TEST_VAR"), None);
        assert_eq!(parse_bool("", "TEST_VAR"), None);
    }

    #[test]
    fn test_parse_f64_falls_back_on_invalid_input() {
        let positive = |v: f64| v > 0.0;
        assert_eq!(parse_f64_with_warning("0.01", "V", 0.001, positive, "", ""), 0.01);
        assert_eq!(parse_f64_with_warning("-1", "V", 0.001, positive, "", ""), 0.001);
        assert_eq!(parse_f64_with_warning("abc", "V", 0.001, positive, "", ""), 0.001);
    }

    #[test]
    fn test_api_config_defaults_and_fallbacks() {
        let config = ApiConfig::from_values(None, None);
        assert_eq!(config.port(), 8080);
        assert!(config.binds_to_all_interfaces());
        assert!(config.uses_default_host());

        let config = ApiConfig::from_values(Some("127.0.0.1".into()), Some("9000".into()));
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:9000");
        assert!(!config.binds_to_all_interfaces());

        let config = ApiConfig::from_values(Some("not-an-ip".into()), Some("0".into()));
        assert_eq!(config.display_host(), "0.0.0.0");
        assert_eq!(config.port(), 8080);
    }

    #[test]
    fn test_engine_settings_reject_inverted_tolerances() {
        let settings = EngineSettings::from_values(1e-6, 1e-3, false);
        let engine = settings.engine_config();
        assert_eq!(engine.corner_epsilon, EngineConfig::DEFAULT_CORNER_EPSILON);
        assert_eq!(engine.general_epsilon, EngineConfig::DEFAULT_GENERAL_EPSILON);
        assert!(!engine.allow_rotation);

        let engine = EngineSettings::from_values(0.01, 1e-7, true).engine_config();
        assert_eq!(engine.corner_epsilon, 0.01);
        assert_eq!(engine.general_epsilon, 1e-7);
    }
}
