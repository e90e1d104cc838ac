//! Configuration management for porkbun-ddns.

use crate::error::{DdnsError, Result};
use crate::publicip::{self, Settings};
use crate::record::{RecordType, APEX_OWNER, DEFAULT_TTL};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Per-request HTTP timeout in seconds (default: 20).
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// The record to keep in sync.
    pub record: RecordConfig,

    /// Public IP echo sources.
    #[serde(default)]
    pub public_ip: PublicIpConfig,
}

fn default_request_timeout() -> u64 {
    20
}

/// Upper bound for `request_timeout_secs`.
pub const MAX_REQUEST_TIMEOUT_SECS: u64 = 3600;

/// Porkbun record configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordConfig {
    /// Domain name.
    pub domain: String,
    /// Owner (subdomain, @ for root, * for wildcard).
    #[serde(default = "default_owner")]
    pub owner: String,
    /// TTL in seconds (default: 600).
    #[serde(default = "default_ttl")]
    pub ttl: u32,
    /// API key (or environment variable name if prefixed with $).
    pub api_key: String,
    /// Secret API key (or environment variable name if prefixed with $).
    pub secret_api_key: String,
    /// Address family to publish.
    #[serde(default)]
    pub ip_version: IpVersion,
}

fn default_owner() -> String {
    APEX_OWNER.to_string()
}

fn default_ttl() -> u32 {
    DEFAULT_TTL
}

/// Address family of the published record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IpVersion {
    #[default]
    Ipv4,
    Ipv6,
}

impl IpVersion {
    pub fn record_type(&self) -> RecordType {
        match self {
            IpVersion::Ipv4 => RecordType::A,
            IpVersion::Ipv6 => RecordType::Aaaa,
        }
    }
}

/// Public IP echo source configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicIpConfig {
    /// Echo providers by name; queried in canonical order, not file order.
    #[serde(default = "default_ip_providers")]
    pub providers: Vec<String>,
    /// Lookup timeout in milliseconds.
    #[serde(default = "default_ip_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_ip_providers() -> Vec<String> {
    Settings::default()
        .providers()
        .iter()
        .map(|p| p.to_string())
        .collect()
}

fn default_ip_timeout_ms() -> u64 {
    publicip::DEFAULT_TIMEOUT.as_millis() as u64
}

impl Default for PublicIpConfig {
    fn default() -> Self {
        Self {
            providers: default_ip_providers(),
            timeout_ms: default_ip_timeout_ms(),
        }
    }
}

impl PublicIpConfig {
    /// Build frozen public IP settings from this section.
    pub fn settings(&self) -> Result<Settings> {
        let mut options = Vec::with_capacity(2);
        if let Some((first, rest)) = self.providers.split_first() {
            options.push(publicip::set_providers(first.clone(), rest.iter().cloned()));
        }
        options.push(publicip::set_timeout(Duration::from_millis(self.timeout_ms)));
        Settings::new(options)
    }
}

impl Config {
    /// Get the default config file path.
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| DdnsError::Config("Could not find config directory".to_string()))?;

        Ok(config_dir.join("porkbun-ddns").join("config.toml"))
    }

    /// Load configuration from a specific path.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(DdnsError::Config(format!(
                "config file {} not found, run `porkbun-ddns init` first",
                path.display()
            )));
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Check fields that serde cannot.
    pub fn validate(&self) -> Result<()> {
        if self.record.domain.trim().is_empty() {
            return Err(DdnsError::Config("record.domain is empty".to_string()));
        }
        if self.record.owner.trim().is_empty() {
            return Err(DdnsError::Config(
                "record.owner is empty, use \"@\" for the apex".to_string(),
            ));
        }
        if self.request_timeout_secs == 0 {
            return Err(DdnsError::Config(
                "request_timeout_secs must be positive".to_string(),
            ));
        }
        if self.request_timeout_secs > MAX_REQUEST_TIMEOUT_SECS {
            return Err(DdnsError::Config(format!(
                "request_timeout_secs must be at most {}",
                MAX_REQUEST_TIMEOUT_SECS
            )));
        }
        Ok(())
    }

    /// Build frozen public IP settings.
    pub fn settings(&self) -> Result<Settings> {
        self.public_ip.settings()
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Generate example configuration.
    pub fn example() -> Self {
        Self {
            request_timeout_secs: default_request_timeout(),
            record: RecordConfig {
                domain: "example.com".to_string(),
                owner: "vpn".to_string(),
                ttl: DEFAULT_TTL,
                api_key: "$PORKBUN_API_KEY".to_string(),
                secret_api_key: "$PORKBUN_SECRET_API_KEY".to_string(),
                ip_version: IpVersion::Ipv4,
            },
            public_ip: PublicIpConfig::default(),
        }
    }
}
