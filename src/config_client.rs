use crate::error::{CheckError, Result};
use crate::model::*;
use serde::de::DeserializeOwned;
use std::env;
use std::fmt::Display;
use std::fs;
use std::str::FromStr;
use tracing::{debug, info};

pub trait SetDefaults {
    fn set_defaults(&mut self);
}

/// Reads a required value, failing with [`CheckError::ConfigMissing`] when it is absent or empty.
pub fn required<F>(lookup: &F, name: &str) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    optional(lookup, name).ok_or_else(|| CheckError::ConfigMissing(name.to_string()))
}

/// Empty values count as unset.
pub fn optional<F>(lookup: &F, name: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name).filter(|v| !v.trim().is_empty())
}

pub fn parse_or<F, T>(lookup: &F, name: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: Display,
{
    match optional(lookup, name) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|e: T::Err| CheckError::ConfigInvalid {
                name: name.to_string(),
                value,
                reason: e.to_string(),
            }),
        None => Ok(default),
    }
}

/// Request timeout in whole seconds; zero is rejected since it would fail every request.
pub fn timeout_seconds_or<F>(lookup: &F, name: &str, default: u64) -> Result<u64>
where
    F: Fn(&str) -> Option<String>,
{
    match parse_or(lookup, name, default)? {
        0 => Err(CheckError::ConfigInvalid {
            name: name.to_string(),
            value: "0".to_string(),
            reason: "timeout must be at least one second".to_string(),
        }),
        seconds => Ok(seconds),
    }
}

/// Parses a duration such as `30s`, `5m`, `1h30m` or a plain number of seconds.
pub fn parse_duration_seconds(value: &str) -> std::result::Result<u64, String> {
    let value = value.trim();
    if value.is_empty() {
        return Err("empty duration".to_string());
    }
    if let Ok(seconds) = value.parse::<u64>() {
        return Ok(seconds);
    }

    let mut total: u64 = 0;
    let mut digits = String::new();
    for c in value.chars() {
        if c.is_ascii_digit() {
            digits.push(c);
            continue;
        }

        let unit = match c {
            's' => 1,
            'm' => 60,
            'h' => 3600,
            _ => return Err(format!("unknown duration unit {:?}", c)),
        };
        let amount: u64 = digits
            .parse()
            .map_err(|_| format!("missing amount before unit {:?}", c))?;
        total = amount
            .checked_mul(unit)
            .and_then(|seconds| total.checked_add(seconds))
            .ok_or_else(|| format!("duration {} is too large", value))?;
        digits.clear();
    }

    if !digits.is_empty() {
        return Err(format!("missing unit after {}", digits));
    }

    Ok(total)
}

/// Builds the check definition from environment style key lookups.
pub fn check_config_from_lookup<F>(lookup: F) -> Result<CheckConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = CheckConfig::new(&required(&lookup, "METRIC")?, &required(&lookup, "CLUSTER")?);

    config.pod_name = optional(&lookup, "POD_NAME");
    config.cpu = optional(&lookup, "CPU");
    config.threshold = parse_or(&lookup, "THRESHOLD", DEFAULT_THRESHOLD)?;

    if let Some(window) = optional(&lookup, "TIME_WINDOW") {
        config.time_window_seconds =
            parse_duration_seconds(&window).map_err(|reason| CheckError::ConfigInvalid {
                name: "TIME_WINDOW".to_string(),
                value: window.clone(),
                reason,
            })?;
    }

    if let Some(granularity) = optional(&lookup, "GRANULARITY") {
        config.granularity = Some(granularity.parse::<Granularity>().map_err(|reason| {
            CheckError::ConfigInvalid {
                name: "GRANULARITY".to_string(),
                value: granularity.clone(),
                reason,
            }
        })?);
    }

    if let Some(selection) = optional(&lookup, "SERIES_SELECTION") {
        let normalized = selection.trim().to_ascii_lowercase();
        config.series_selection = match normalized.as_str() {
            "tag" => SeriesSelection::Tag,
            "first" => SeriesSelection::First,
            _ => {
                return Err(CheckError::ConfigInvalid {
                    name: "SERIES_SELECTION".to_string(),
                    value: selection,
                    reason: "expected tag or first".to_string(),
                })
            }
        };
    }

    if let Some(alert_file) = optional(&lookup, "ALERT_FILE") {
        config.alert_file = alert_file;
    }

    config.set_defaults();
    config.validate()?;

    Ok(config)
}

pub struct ConfigClientConfig {
    config_path: Option<String>,
}

impl ConfigClientConfig {
    pub fn new(config_path: Option<String>) -> Result<Self> {
        debug!("ConfigClientConfig::new(config_path: {:?})", config_path);
        Ok(Self { config_path })
    }

    pub fn from_env() -> Result<Self> {
        let config_path = env::var("CONFIG_PATH").ok().filter(|p| !p.is_empty());

        Self::new(config_path)
    }
}

pub struct ConfigClient {
    config: ConfigClientConfig,
}

impl ConfigClient {
    pub fn new(config: ConfigClientConfig) -> Self {
        Self { config }
    }

    /// Loads the check from the YAML file at `CONFIG_PATH` when set, from the environment otherwise.
    pub fn read_check_config(&self) -> Result<CheckConfig> {
        match &self.config.config_path {
            Some(path) => {
                let config: CheckConfig = self.read_config_from_file(path)?;
                config.validate()?;
                Ok(config)
            }
            None => {
                let config = check_config_from_lookup(|name| env::var(name).ok())?;
                info!("Loaded check config for {} from environment", config.metric);
                Ok(config)
            }
        }
    }

    pub fn read_config_from_file<T>(&self, path: &str) -> Result<T>
    where
        T: DeserializeOwned + SetDefaults,
    {
        let config_file_error = |reason: String| CheckError::ConfigFile {
            path: path.to_string(),
            reason,
        };

        let config_file_contents =
            fs::read_to_string(path).map_err(|e| config_file_error(e.to_string()))?;
        let mut config: T = serde_yaml::from_str(&config_file_contents)
            .map_err(|e| config_file_error(e.to_string()))?;

        config.set_defaults();

        info!("Loaded config from {}", path);

        Ok(config)
    }
}
