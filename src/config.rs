// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Compute service configuration

use crate::lattice::{FlexureSettings, FragmentPolicy, DEFAULT_MAX_STRUTS};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Default config file picked up from the working directory
pub const DEFAULT_CONFIG_FILE: &str = "compute.toml";

const DEFAULT_BASE_URL: &str = "http://localhost:6500/";
const DEFAULT_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("API key not found! Set RHINO_COMPUTE_API_KEY in your environment.")]
    MissingApiKey,

    #[error("Invalid compute URL: {0}")]
    InvalidUrl(String),

    #[error("Timeout must be at least one second")]
    ZeroTimeout,
}

/// Connection and output settings passed explicitly to the client and service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComputeConfig {
    /// Base URL of the compute server
    pub base_url: String,
    /// Value sent in the `RhinoComputeKey` header
    pub api_key: Option<String>,
    /// Per-request timeout
    pub timeout_secs: u64,
    /// Directory receiving OBJ and scene files
    pub output_dir: PathBuf,
    /// Which split fragment receives the lattice
    pub fragment_policy: FragmentPolicy,
    /// Regions needing more struts than this are skipped
    pub max_struts_per_region: usize,
}

impl Default for ComputeConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            output_dir: PathBuf::from("."),
            fragment_policy: FragmentPolicy::default(),
            max_struts_per_region: DEFAULT_MAX_STRUTS,
        }
    }
}

impl ComputeConfig {
    /// Load configuration from file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;
        let config: ComputeConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path.as_ref()))?;
        Ok(config)
    }

    /// Load from `path` (or `compute.toml` if present), then apply environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => Self::from_file(DEFAULT_CONFIG_FILE)?,
            None => Self::default(),
        };
        config.apply_env_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Apply `RHINO_COMPUTE_*` and `POLYFRAME_*` overrides from `lookup`
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup("RHINO_COMPUTE_URL") {
            self.base_url = url;
        }

        if let Some(key) = lookup("RHINO_COMPUTE_API_KEY") {
            self.api_key = Some(key);
        }

        if let Some(timeout) = lookup("RHINO_COMPUTE_TIMEOUT_SECS") {
            match timeout.parse() {
                Ok(secs) => self.timeout_secs = secs,
                Err(_) => tracing::warn!(value = %timeout, "ignoring unparsable RHINO_COMPUTE_TIMEOUT_SECS"),
            }
        }

        if let Some(dir) = lookup("POLYFRAME_OUTPUT_DIR") {
            self.output_dir = PathBuf::from(dir);
        }

        if let Some(limit) = lookup("POLYFRAME_MAX_STRUTS") {
            match limit.parse() {
                Ok(limit) => self.max_struts_per_region = limit,
                Err(_) => tracing::warn!(value = %limit, "ignoring unparsable POLYFRAME_MAX_STRUTS"),
            }
        }
    }

    /// Flexure settings carried by this configuration
    pub fn flexure_settings(&self) -> FlexureSettings {
        FlexureSettings {
            fragment_policy: self.fragment_policy,
            max_struts: self.max_struts_per_region,
        }
    }

    /// Check the settings required to talk to a real compute server
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.api_key.as_deref().map_or(true, |k| k.trim().is_empty()) {
            return Err(ConfigError::MissingApiKey);
        }
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(ConfigError::InvalidUrl(self.base_url.clone()));
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Save configuration to file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path.as_ref(), content)
            .with_context(|| format!("Failed to write config file: {:?}", path.as_ref()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = ComputeConfig::default();
        assert_eq!(config.base_url, "http://localhost:6500/");
        assert_eq!(config.timeout(), Duration::from_secs(120));
        assert_eq!(config.fragment_policy, FragmentPolicy::First);
        assert_eq!(config.max_struts_per_region, DEFAULT_MAX_STRUTS);
        assert_eq!(config.validate(), Err(ConfigError::MissingApiKey));
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("RHINO_COMPUTE_URL", "https://compute.example.com"),
            ("RHINO_COMPUTE_API_KEY", "secret"),
            ("RHINO_COMPUTE_TIMEOUT_SECS", "30"),
            ("POLYFRAME_OUTPUT_DIR", "/tmp/out"),
            ("POLYFRAME_MAX_STRUTS", "500"),
        ]
        .into_iter()
        .collect();

        let mut config = ComputeConfig::default();
        config.apply_env_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.base_url, "https://compute.example.com");
        assert_eq!(config.api_key.as_deref(), Some("secret"));
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.output_dir, PathBuf::from("/tmp/out"));
        assert_eq!(config.flexure_settings().max_struts, 500);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_bad_timeout_is_ignored() {
        let mut config = ComputeConfig::default();
        config.apply_env_overrides(|key| {
            (key == "RHINO_COMPUTE_TIMEOUT_SECS").then(|| "soon".to_string())
        });
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn test_toml_roundtrip() -> Result<()> {
        let file = NamedTempFile::with_suffix(".toml")?;
        std::fs::write(
            file.path(),
            "base_url = \"http://kernel:6500/\"\napi_key = \"k\"\nfragment_policy = \"contained_in_region\"\n",
        )?;

        let config = ComputeConfig::from_file(file.path())?;
        assert_eq!(config.base_url, "http://kernel:6500/");
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert_eq!(config.fragment_policy, FragmentPolicy::ContainedInRegion);

        config.save(file.path())?;
        assert_eq!(ComputeConfig::from_file(file.path())?, config);
        Ok(())
    }

    #[test]
    fn test_rejects_non_http_url() {
        let config = ComputeConfig {
            base_url: "localhost:6500".into(),
            api_key: Some("k".into()),
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidUrl("localhost:6500".into()))
        );
    }
}
