use crate::{CliError, GlobalArgs, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use subnetter_core::{AddressPool, BaseNetwork};
use subnetter_utils::parse_base_network;
use thiserror::Error;

/// Configuration-specific errors that can occur during config operations
///
/// # Variants
/// * `UnknownKey` - The key is not one of the supported `section.field` keys
/// * `InvalidValue` - A configuration value is invalid for its field
/// * `DirectoryCreationFailed` - Failed to create the config directory
/// * `TomlError` - Error parsing or serializing TOML data
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Unknown config key: {0} (expected one of {keys})", keys = Config::KEYS.join(", "))]
    UnknownKey(String),

    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },

    #[error("Config directory creation failed: {0}")]
    DirectoryCreationFailed(String),

    #[error("TOML parsing error: {0}")]
    TomlError(String),
}

/// AWS configuration section
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct AwsConfig {
    pub region: Option<String>,
}

/// Network configuration section
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct NetworkConfig {
    pub base_network: Option<BaseNetwork>,
}

/// Cluster configuration section
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct ClusterConfig {
    pub name: Option<String>,
}

/// Main configuration structure containing all configuration sections
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct ConfigData {
    pub aws: Option<AwsConfig>,
    pub network: Option<NetworkConfig>,
    pub cluster: Option<ClusterConfig>,
}

/// Lets the CloudFormation client pick up the configured region
impl subnetter_api::ProviderConfig for Config {
    type Error = CliError;

    fn get_region(&self) -> std::result::Result<Option<String>, Self::Error> {
        Ok(self.region())
    }
}

/// Configuration manager that handles loading, saving, and accessing configuration
///
/// # Fields
/// * `config_path` - Path to the configuration file
/// * `data` - The configuration data structure
#[derive(Debug, Clone)]
pub struct Config {
    pub config_path: PathBuf,
    pub data: ConfigData,
}

impl Config {
    pub const KEYS: [&'static str; 3] = ["aws.region", "network.base_network", "cluster.name"];

    /// Load `~/.subnetter/config.toml`, or defaults when it does not exist yet
    pub fn new() -> Result<Self> {
        Self::load(get_config_dir()?.join("config.toml"))
    }

    /// Load configuration from an explicit path
    pub fn load(config_path: PathBuf) -> Result<Self> {
        let data = if config_path.exists() {
            let content = fs::read_to_string(&config_path)?;
            toml::from_str(&content).map_err(|e| ConfigError::TomlError(e.to_string()))?
        } else {
            ConfigData::default()
        };

        Ok(Config { config_path, data })
    }

    /// Save the configuration to file with an atomic write
    ///
    /// # Errors
    /// * `ConfigError::TomlError` - If TOML serialization fails
    /// * `ConfigError::DirectoryCreationFailed` - If directory creation fails
    /// * `CliError::Io` - If file operations fail
    pub fn save(&self) -> Result<()> {
        let content = toml::to_string_pretty(&self.data)
            .map_err(|e| ConfigError::TomlError(e.to_string()))?;

        if let Some(parent) = self.config_path.parent() {
            ensure_dir(parent)?;
        }

        // Write to a temporary file first, then rename
        let temp_path = self.config_path.with_extension("tmp");
        fs::write(&temp_path, &content)?;
        fs::rename(&temp_path, &self.config_path)?;

        Ok(())
    }

    /// A copy with command-line (or environment) values layered on top
    pub fn with_overrides(&self, args: &GlobalArgs) -> Result<Self> {
        let mut config = self.clone();

        if let Some(region) = &args.region {
            config.set("aws.region", region)?;
        }
        if let Some(base_network) = &args.base_network {
            config.set("network.base_network", base_network)?;
        }
        if let Some(cluster) = &args.cluster {
            config.set("cluster.name", cluster)?;
        }

        Ok(config)
    }

    pub fn region(&self) -> Option<String> {
        self.data.aws.as_ref().and_then(|aws| aws.region.clone())
    }

    pub fn base_network(&self) -> BaseNetwork {
        self.data
            .network
            .as_ref()
            .and_then(|network| network.base_network)
            .unwrap_or_default()
    }

    pub fn cluster_name(&self) -> Option<String> {
        self.data
            .cluster
            .as_ref()
            .and_then(|cluster| cluster.name.clone())
    }

    pub fn address_pool(&self) -> AddressPool {
        AddressPool::new(self.base_network())
    }

    /// Read a value by `section.field` key
    pub fn get(&self, key: &str) -> Result<Option<String>> {
        match key {
            "aws.region" => Ok(self.region()),
            "network.base_network" => Ok(self
                .data
                .network
                .as_ref()
                .and_then(|network| network.base_network)
                .map(|base| base.to_string())),
            "cluster.name" => Ok(self.cluster_name()),
            _ => Err(ConfigError::UnknownKey(key.to_string()).into()),
        }
    }

    /// Set a value by `section.field` key, validating it first
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let value = value.trim();
        if value.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: key.to_string(),
                value: value.to_string(),
            }
            .into());
        }

        match key {
            "aws.region" => {
                self.data.aws.get_or_insert_with(Default::default).region = Some(value.to_string())
            }
            "network.base_network" => {
                let base = parse_base_network(value).map_err(|_| ConfigError::InvalidValue {
                    field: key.to_string(),
                    value: value.to_string(),
                })?;
                self.data
                    .network
                    .get_or_insert_with(Default::default)
                    .base_network = Some(base);
            }
            "cluster.name" => {
                self.data.cluster.get_or_insert_with(Default::default).name =
                    Some(value.to_string())
            }
            _ => return Err(ConfigError::UnknownKey(key.to_string()).into()),
        }

        Ok(())
    }

    /// Remove a value by `section.field` key
    pub fn unset(&mut self, key: &str) -> Result<()> {
        match key {
            "aws.region" => {
                if let Some(aws) = self.data.aws.as_mut() {
                    aws.region = None;
                }
            }
            "network.base_network" => {
                if let Some(network) = self.data.network.as_mut() {
                    network.base_network = None;
                }
            }
            "cluster.name" => {
                if let Some(cluster) = self.data.cluster.as_mut() {
                    cluster.name = None;
                }
            }
            _ => return Err(ConfigError::UnknownKey(key.to_string()).into()),
        }

        Ok(())
    }

    /// The configuration rendered as TOML
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(&self.data).map_err(|e| ConfigError::TomlError(e.to_string()))?)
    }
}

fn ensure_dir(dir: &Path) -> Result<()> {
    if !dir.exists() {
        fs::create_dir_all(dir).map_err(|e| ConfigError::DirectoryCreationFailed(e.to_string()))?;
    }
    Ok(())
}

/// Gets the configuration directory path, `~/.subnetter`.
///
/// # Errors
/// * `ConfigError::DirectoryCreationFailed` - If the home directory cannot be found
pub fn get_config_dir() -> Result<PathBuf> {
    let home_dir = home::home_dir().ok_or_else(|| {
        ConfigError::DirectoryCreationFailed("Could not find home directory".to_string())
    })?;

    Ok(home_dir.join(".subnetter"))
}
