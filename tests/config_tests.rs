//! Configuration tests: env vars and `.env` loading
//!
//! Run with: cargo test --test config_tests

#![cfg(all(feature = "native", not(target_arch = "wasm32")))]

use offchain::config::{DEFAULT_PORT, DEMO_ADDRESS};
use offchain::{load_dotenv, AppConfig, Network};
use once_cell::sync::Lazy;
use std::env;
use std::sync::Mutex;
use tempfile::TempDir;

static ENV_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

const VARS: [&str; 6] = [
    "OFFCHAIN_APP",
    "OFFCHAIN_NETWORK",
    "OFFCHAIN_ADDRESS",
    "OFFCHAIN_PORT",
    "OFFCHAIN_FUNDS",
    "OFFCHAIN_FEE",
];

fn lock_env() -> std::sync::MutexGuard<'static, ()> {
    let guard = ENV_LOCK.lock().unwrap_or_else(|p| p.into_inner());
    for var in VARS {
        env::remove_var(var);
    }
    guard
}

#[test]
fn test_defaults_without_env() {
    let _guard = lock_env();
    let config = AppConfig::from_env().unwrap();
    assert_eq!(config, AppConfig::default());
    assert_eq!(config.port, DEFAULT_PORT);
    assert_eq!(config.address, DEMO_ADDRESS);
    assert_eq!(config.network, Network::Preprod);
}

#[test]
fn test_env_overrides() {
    let _guard = lock_env();
    env::set_var("OFFCHAIN_APP", "demo");
    env::set_var("OFFCHAIN_NETWORK", "Mainnet");
    env::set_var("OFFCHAIN_PORT", "9090");
    env::set_var("OFFCHAIN_FUNDS", "5000000");
    env::set_var("OFFCHAIN_FEE", "");

    let config = AppConfig::from_env().unwrap();
    assert_eq!(config.app, "demo");
    assert_eq!(config.network, Network::Mainnet);
    assert_eq!(config.port, 9090);
    assert_eq!(config.funds, 5_000_000);
    assert_eq!(config.fee, AppConfig::default().fee);
}

#[test]
fn test_invalid_values_rejected() {
    let _guard = lock_env();
    env::set_var("OFFCHAIN_PORT", "eighty");
    let err = AppConfig::from_env().unwrap_err();
    assert!(err.to_string().contains("OFFCHAIN_PORT"));

    env::remove_var("OFFCHAIN_PORT");
    env::set_var("OFFCHAIN_NETWORK", "testnet-9");
    assert!(AppConfig::from_env().is_err());
}

#[test]
fn test_negative_fee_and_funds_rejected() {
    let _guard = lock_env();
    env::set_var("OFFCHAIN_FEE", "-5000000000");
    let err = AppConfig::from_env().unwrap_err();
    assert!(err.to_string().contains("OFFCHAIN_FEE"));

    env::remove_var("OFFCHAIN_FEE");
    env::set_var("OFFCHAIN_FUNDS", "-1");
    let err = AppConfig::from_env().unwrap_err();
    assert!(err.to_string().contains("OFFCHAIN_FUNDS"));

    env::set_var("OFFCHAIN_FUNDS", "0");
    assert!(AppConfig::from_env().is_err());
}

#[test]
fn test_dotenv_does_not_override() {
    let _guard = lock_env();
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join(".env");
    std::fs::write(
        &path,
        "# local settings\nOFFCHAIN_APP=\"from-file\"\n\nexport OFFCHAIN_PORT=7070\nOFFCHAIN_NETWORK=preview\nOFFCHAIN_FEE=\n",
    )
    .unwrap();
    env::set_var("OFFCHAIN_NETWORK", "mainnet");

    let loaded = load_dotenv(&path).unwrap();
    assert_eq!(loaded, 2);

    let config = AppConfig::from_env().unwrap();
    assert_eq!(config.app, "from-file");
    assert_eq!(config.port, 7070);
    assert_eq!(config.network, Network::Mainnet);
}

#[test]
fn test_missing_dotenv_is_empty() {
    let _guard = lock_env();
    let dir = TempDir::new().expect("tempdir");
    assert_eq!(load_dotenv(dir.path().join("absent.env")).unwrap(), 0);
}
