//! Configuration Management Module
//!
//! This module handles loading and managing the chain table used by status lookups.
//! Each chain entry carries its CCIP router address, its chain selector and the RPC
//! endpoint (inline or through an environment variable).

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashSet;
use std::time::Duration;
use tracing::info;

use crate::error::StatusError;

// ============================================================================
// CONFIGURATION STRUCTURES
// ============================================================================

/// Main configuration structure.
///
/// This structure holds:
/// - The table of known chains (router, selector, RPC endpoint)
/// - The per-request RPC timeout
/// - Log query settings (start block and optional pagination)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Timeout for each JSON-RPC request in milliseconds
    #[serde(default = "default_rpc_timeout_ms")]
    pub rpc_timeout_ms: u64,
    /// Log query settings shared by on-ramp and off-ramp scans
    #[serde(default)]
    pub log_query: LogQueryConfig,
    /// Known chains, looked up by name
    pub chains: Vec<ChainConfig>,
}

/// Configuration for one chain reachable through CCIP.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainConfig {
    /// Chain name used on the command line (e.g., "ethereumSepolia")
    pub name: String,
    /// Address of the CCIP router contract on this chain
    pub router: String,
    /// CCIP chain selector. Serialized as a decimal string since selectors exceed
    /// TOML's signed 64-bit integer range.
    #[serde(with = "selector_format")]
    pub chain_selector: u64,
    /// RPC endpoint URL (takes precedence over `rpc_url_env`)
    #[serde(default)]
    pub rpc_url: Option<String>,
    /// Environment variable name holding the RPC endpoint URL
    #[serde(default)]
    pub rpc_url_env: Option<String>,
}

/// Log query settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogQueryConfig {
    /// First block scanned
    #[serde(default)]
    pub from_block: u64,
    /// Block window per eth_getLogs request. Unset means one request up to "latest".
    #[serde(default)]
    pub page_size: Option<u64>,
}

impl Default for LogQueryConfig {
    fn default() -> Self {
        Self {
            from_block: 0,
            page_size: None,
        }
    }
}

fn default_rpc_timeout_ms() -> u64 {
    30_000
}

mod selector_format {
    use super::*;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Selector {
        Number(u64),
        Text(String),
    }

    pub fn serialize<S: Serializer>(value: &u64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
        match Selector::deserialize(deserializer)? {
            Selector::Number(value) => Ok(value),
            Selector::Text(text) => text.trim().parse().map_err(|_| {
                serde::de::Error::custom(format!("invalid chain selector '{}'", text))
            }),
        }
    }
}

impl ChainConfig {
    /// Resolves the RPC endpoint URL.
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - Inline `rpc_url`, or the value of `rpc_url_env`
    /// * `Err(StatusError::MissingRpcUrl)` - Neither source yields a URL
    pub fn get_rpc_url(&self) -> Result<String, StatusError> {
        if let Some(url) = self.rpc_url.as_ref().filter(|url| !url.is_empty()) {
            return Ok(url.clone());
        }

        let env_name = self
            .rpc_url_env
            .as_ref()
            .ok_or_else(|| StatusError::MissingRpcUrl {
                chain: self.name.clone(),
                reason: "neither rpc_url nor rpc_url_env is set".to_string(),
            })?;

        match std::env::var(env_name) {
            Ok(url) if !url.is_empty() => Ok(url),
            _ => Err(StatusError::MissingRpcUrl {
                chain: self.name.clone(),
                reason: format!("environment variable '{}' is not set", env_name),
            }),
        }
    }
}

// ============================================================================
// CONFIGURATION LOADING AND MANAGEMENT
// ============================================================================

impl Config {
    /// Looks up a chain by its command-line name.
    pub fn get_chain(&self, name: &str) -> Result<&ChainConfig, StatusError> {
        self.chains
            .iter()
            .find(|chain| chain.name == name)
            .ok_or_else(|| StatusError::UnknownChain(name.to_string()))
    }

    /// Per-request timeout for JSON-RPC calls
    pub fn rpc_timeout(&self) -> Duration {
        Duration::from_millis(self.rpc_timeout_ms)
    }

    /// Validates the chain table.
    ///
    /// This function ensures that:
    /// - Chain names are unique
    /// - Chain selectors are unique
    /// - Router addresses are set
    /// - The log page size, if set, is non-zero
    ///
    /// # Returns
    ///
    /// - `Ok(())` - Configuration is valid
    /// - `Err(anyhow::Error)` - Validation failed
    pub fn validate(&self) -> anyhow::Result<()> {
        let mut names = HashSet::new();
        let mut selectors = HashSet::new();

        for chain in &self.chains {
            if !names.insert(chain.name.as_str()) {
                return Err(anyhow::anyhow!(
                    "Configuration error: Chain name '{}' is listed more than once. Each chain must have a unique name.",
                    chain.name
                ));
            }
            if !selectors.insert(chain.chain_selector) {
                return Err(anyhow::anyhow!(
                    "Configuration error: Chain '{}' reuses chain selector {}. Each chain must have a unique selector.",
                    chain.name,
                    chain.chain_selector
                ));
            }
            if chain.router.trim().is_empty() {
                return Err(anyhow::anyhow!(
                    "Configuration error: Chain '{}' has no router address.",
                    chain.name
                ));
            }
        }

        if self.log_query.page_size == Some(0) {
            return Err(anyhow::anyhow!(
                "Configuration error: log_query.page_size must be greater than zero."
            ));
        }

        Ok(())
    }

    /// Loads configuration from the TOML file.
    ///
    /// This function:
    /// 1. Checks if config/ccip-status.toml (or CCIP_STATUS_CONFIG_PATH) exists
    /// 2. If it exists, loads, parses and validates the configuration
    /// 3. If it doesn't exist, falls back to the built-in testnet table
    ///
    /// # Returns
    ///
    /// - `Ok(Config)` - Successfully loaded and validated configuration
    /// - `Err(anyhow::Error)` - Failed to read, parse or validate the file
    pub fn load() -> anyhow::Result<Self> {
        // Check for custom config path via environment variable (for tests)
        let config_path = std::env::var("CCIP_STATUS_CONFIG_PATH")
            .unwrap_or_else(|_| "config/ccip-status.toml".to_string());

        if std::path::Path::new(&config_path).exists() {
            info!("Loading configuration from {}", config_path);
            Self::from_file(&config_path)
        } else {
            info!(
                "Configuration file '{}' not found, using built-in testnet chains",
                config_path
            );
            Ok(Self::default())
        }
    }

    /// Reads, parses and validates a TOML configuration file.
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read configuration file '{}': {}", path, e))?;
        Self::from_toml(&content)
            .map_err(|e| anyhow::anyhow!("Invalid configuration file '{}': {}", path, e))
    }

    /// Parses and validates a TOML configuration document.
    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }
}

impl Default for Config {
    /// Built-in CCIP testnet table.
    ///
    /// RPC endpoints are read from `<CHAIN>_RPC_URL` environment variables.
    fn default() -> Self {
        let chain = |name: &str, router: &str, chain_selector: u64, rpc_url_env: &str| ChainConfig {
            name: name.to_string(),
            router: router.to_string(),
            chain_selector,
            rpc_url: None,
            rpc_url_env: Some(rpc_url_env.to_string()),
        };

        Self {
            rpc_timeout_ms: default_rpc_timeout_ms(),
            log_query: LogQueryConfig::default(),
            chains: vec![
                chain(
                    "ethereumSepolia",
                    "0x0BF3dE8c5D3e8A2B34D2BEeB17ABfCeBaf363A59",
                    16015286601757825753,
                    "ETHEREUM_SEPOLIA_RPC_URL",
                ),
                chain(
                    "avalancheFuji",
                    "0xF694E193200268f9a4868e4Aa017A0118C9a8177",
                    14767482510784806043,
                    "AVALANCHE_FUJI_RPC_URL",
                ),
                chain(
                    "polygonAmoy",
                    "0x9C32fCB86BF0f4a1A8921a9Fe46de3198bb884B2",
                    16281711391670634445,
                    "POLYGON_AMOY_RPC_URL",
                ),
                chain(
                    "arbitrumSepolia",
                    "0x2a9C5afB0d0e4BAb2BCdaE109EC4b0c4Be15a165",
                    3478487238524512106,
                    "ARBITRUM_SEPOLIA_RPC_URL",
                ),
                chain(
                    "optimismSepolia",
                    "0x114A20A10b43D4115e5aeef7345a1A71d2a60C57",
                    5224473277236331295,
                    "OPTIMISM_SEPOLIA_RPC_URL",
                ),
                chain(
                    "baseSepolia",
                    "0xD3b06cEbF099CE7DA4AcCf578aaebFDBd6e88a93",
                    10344971235874465080,
                    "BASE_SEPOLIA_RPC_URL",
                ),
                chain(
                    "bnbChainTestnet",
                    "0xE1053aE1857476f36A3C62580FF9b016E8EE8F6f",
                    13264668187771770619,
                    "BNB_CHAIN_TESTNET_RPC_URL",
                ),
            ],
        }
    }
}
