//! App Configuration - env vars, `.env` file and builder overrides
//!
//! | Variable | Default |
//! |----------|---------|
//! | `OFFCHAIN_APP` | `offchain` |
//! | `OFFCHAIN_NETWORK` | `preprod` |
//! | `OFFCHAIN_ADDRESS` | demo key address |
//! | `OFFCHAIN_PORT` | `8080` |
//! | `OFFCHAIN_FUNDS` | 100 000 ADA (lovelace) |
//! | `OFFCHAIN_FEE` | 0.2 ADA (lovelace) |

use anyhow::{anyhow, Context, Result};
use std::env;
use std::path::Path;

use crate::core::Network;
use crate::emulator::{EmulatorConfig, DEFAULT_FEE, DEFAULT_FUNDS};

pub const DEFAULT_PORT: u16 = 8080;

/// Enterprise key address for the key hash `0011…aabb`, only ever backed by emulator funds.
pub const DEMO_ADDRESS: &str = "addr_test1vqqpzg3ng32kvaugnx4thnxaamlsqyfzxdz92enh3zv64wcu79rm4";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub app: String,
    pub network: Network,
    pub address: String,
    pub port: u16,
    pub funds: i128,
    pub fee: i128,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            app: "offchain".into(),
            network: Network::default(),
            address: DEMO_ADDRESS.into(),
            port: DEFAULT_PORT,
            funds: DEFAULT_FUNDS,
            fee: DEFAULT_FEE,
        }
    }
}

impl AppConfig {
    pub fn new(app: impl Into<String>) -> Self {
        Self { app: app.into(), ..Default::default() }
    }
    pub fn with_network(mut self, network: Network) -> Self { self.network = network; self }
    pub fn with_address(mut self, address: impl Into<String>) -> Self { self.address = address.into(); self }
    pub fn with_port(mut self, port: u16) -> Self { self.port = port; self }
    pub fn with_funds(mut self, funds: i128) -> Self { self.funds = funds; self }
    pub fn with_fee(mut self, fee: i128) -> Self { self.fee = fee; self }

    /// Read `OFFCHAIN_*` variables over the defaults. Empty values count as unset.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        if let Some(app) = var("OFFCHAIN_APP") {
            config.app = app;
        }
        if let Some(network) = var("OFFCHAIN_NETWORK") {
            config.network = Network::parse(&network).map_err(|e| anyhow!("OFFCHAIN_NETWORK: {}", e))?;
        }
        if let Some(address) = var("OFFCHAIN_ADDRESS") {
            config.address = address;
        }
        if let Some(port) = var("OFFCHAIN_PORT") {
            config.port = port.parse().with_context(|| format!("OFFCHAIN_PORT: invalid port {}", port))?;
        }
        if let Some(funds) = var("OFFCHAIN_FUNDS") {
            config.funds = funds.parse().with_context(|| format!("OFFCHAIN_FUNDS: invalid amount {}", funds))?;
        }
        if let Some(fee) = var("OFFCHAIN_FEE") {
            config.fee = fee.parse().with_context(|| format!("OFFCHAIN_FEE: invalid amount {}", fee))?;
        }
        config.validate()?;
        Ok(config)
    }

    /// Reject funds and fees the emulator cannot balance with.
    pub fn validate(&self) -> Result<()> {
        if self.funds <= 0 {
            return Err(anyhow!("OFFCHAIN_FUNDS: must be positive, got {}", self.funds));
        }
        if self.fee < 0 {
            return Err(anyhow!("OFFCHAIN_FEE: must not be negative, got {}", self.fee));
        }
        Ok(())
    }

    pub fn emulator(&self) -> EmulatorConfig {
        EmulatorConfig::new(self.network).with_funds(self.funds).with_fee(self.fee)
    }
}

fn var(key: &str) -> Option<String> {
    env::var(key).ok().map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// Load `KEY=value` lines from a `.env` file without overriding variables
/// already set. A missing file loads nothing. Returns how many were set.
pub fn load_dotenv(path: impl AsRef<Path>) -> Result<usize> {
    let path = path.as_ref();
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
        Err(e) => return Err(e).with_context(|| format!("reading {}", path.display())),
    };
    let mut loaded = 0;
    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let line = line.strip_prefix("export ").unwrap_or(line);
        if let Some((key, value)) = line.split_once('=') {
            let key = key.trim();
            let value = value.trim().trim_matches('"').trim_matches('\'');
            if !key.is_empty() && !value.is_empty() && env::var(key).is_err() {
                env::set_var(key, value);
                loaded += 1;
            }
        }
    }
    Ok(loaded)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let config = AppConfig::new("demo").with_network(Network::Mainnet).with_port(9000).with_fee(1);
        assert_eq!(config.app, "demo");
        assert_eq!(config.port, 9000);
        assert_eq!(config.address, DEMO_ADDRESS);
        let emulator = config.emulator();
        assert_eq!(emulator.network, Network::Mainnet);
        assert_eq!(emulator.fee, 1);
        assert_eq!(emulator.funds, DEFAULT_FUNDS);
    }

    #[test]
    fn test_validate_rejects_negative_amounts() {
        assert!(AppConfig::default().validate().is_ok());
        assert!(AppConfig::default().with_fee(0).validate().is_ok());
        assert!(AppConfig::default().with_fee(-1).validate().is_err());
        assert!(AppConfig::default().with_funds(0).validate().is_err());
        assert!(AppConfig::default().with_funds(-5).validate().is_err());
    }
}
