//! Address - Shelley addresses, payment credentials and script addresses
//!
//! Header byte layout: `tttt nnnn`, type nibble then network id. Even types
//! carry a key-hash payment part, odd types a script-hash one. Types above 7
//! (Byron, reward) have no payment credential.

use bech32::{Bech32, Hrp};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::hash::HASH_224_LEN;
use super::script::Script;

const ENTERPRISE_KEY: u8 = 0b0110_0000;
const ENTERPRISE_SCRIPT: u8 = 0b0111_0000;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AddressError {
    #[error("bech32: {0}")]
    Bech32(String),
    #[error("unexpected address prefix: {0}")]
    Prefix(String),
    #[error("address payload too short: {0} bytes")]
    Length(usize),
    #[error("address type {0:#04x} has no payment credential")]
    Unsupported(u8),
    #[error("unknown network: {0}")]
    Network(String),
    #[error("network id {id} does not match prefix {prefix}")]
    NetworkMismatch { prefix: String, id: u8 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Network {
    Mainnet,
    #[default]
    Preprod,
    Preview,
    Custom,
}

impl Network {
    pub fn as_str(&self) -> &'static str {
        match self {
            Network::Mainnet => "Mainnet",
            Network::Preprod => "Preprod",
            Network::Preview => "Preview",
            Network::Custom => "Custom",
        }
    }

    pub fn parse(value: &str) -> Result<Self, AddressError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "mainnet" => Ok(Network::Mainnet),
            "preprod" => Ok(Network::Preprod),
            "preview" => Ok(Network::Preview),
            "custom" | "emulator" => Ok(Network::Custom),
            _ => Err(AddressError::Network(value.to_string())),
        }
    }

    pub fn id(&self) -> u8 {
        match self {
            Network::Mainnet => 1,
            _ => 0,
        }
    }

    pub fn address_prefix(&self) -> &'static str {
        match self {
            Network::Mainnet => "addr",
            _ => "addr_test",
        }
    }
}

/// Payment part of an address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Credential {
    Key([u8; HASH_224_LEN]),
    Script([u8; HASH_224_LEN]),
}

impl Credential {
    pub fn hash(&self) -> &[u8; HASH_224_LEN] {
        match self {
            Credential::Key(hash) | Credential::Script(hash) => hash,
        }
    }

    pub fn hash_hex(&self) -> String {
        hex::encode(self.hash())
    }

    pub fn is_script(&self) -> bool {
        matches!(self, Credential::Script(_))
    }
}

pub fn payment_credential_of(address: &str) -> Result<Credential, AddressError> {
    let (hrp, bytes) = bech32::decode(address).map_err(|e| AddressError::Bech32(e.to_string()))?;
    if hrp.as_str() != "addr" && hrp.as_str() != "addr_test" {
        return Err(AddressError::Prefix(hrp.to_string()));
    }
    let header = *bytes.first().ok_or(AddressError::Length(0))?;
    if header >> 4 > 7 {
        return Err(AddressError::Unsupported(header));
    }
    let id = header & 0b0000_1111;
    if (id == Network::Mainnet.id()) != (hrp.as_str() == Network::Mainnet.address_prefix()) {
        return Err(AddressError::NetworkMismatch { prefix: hrp.to_string(), id });
    }
    if bytes.len() < 1 + HASH_224_LEN {
        return Err(AddressError::Length(bytes.len()));
    }
    let mut hash = [0u8; HASH_224_LEN];
    hash.copy_from_slice(&bytes[1..1 + HASH_224_LEN]);
    Ok(if header & 0b0001_0000 == 0 { Credential::Key(hash) } else { Credential::Script(hash) })
}

/// Enterprise address (no stake part) for a payment credential.
pub fn credential_to_address(network: Network, credential: &Credential) -> Result<String, AddressError> {
    let header = match credential {
        Credential::Key(_) => ENTERPRISE_KEY,
        Credential::Script(_) => ENTERPRISE_SCRIPT,
    } | network.id();
    let mut payload = Vec::with_capacity(1 + HASH_224_LEN);
    payload.push(header);
    payload.extend_from_slice(credential.hash());
    let hrp = Hrp::parse(network.address_prefix()).map_err(|e| AddressError::Bech32(e.to_string()))?;
    bech32::encode::<Bech32>(hrp, &payload).map_err(|e| AddressError::Bech32(e.to_string()))
}

pub fn validator_to_address(network: Network, validator: &Script) -> Result<String, AddressError> {
    credential_to_address(network, &Credential::Script(validator.hash().0))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PKH: &str = "00112233445566778899aabbccddeeff00112233445566778899aabb";
    const USER_ADDRESS: &str = "addr_test1vqqpzg3ng32kvaugnx4thnxaamlsqyfzxdz92enh3zv64wcu79rm4";

    fn pkh() -> [u8; HASH_224_LEN] {
        let mut out = [0u8; HASH_224_LEN];
        out.copy_from_slice(&hex::decode(PKH).unwrap());
        out
    }

    #[test]
    fn test_enterprise_key_address() {
        let address = credential_to_address(Network::Preprod, &Credential::Key(pkh())).unwrap();
        assert_eq!(address, USER_ADDRESS);
    }

    #[test]
    fn test_payment_credential_roundtrip() {
        let credential = payment_credential_of(USER_ADDRESS).unwrap();
        assert_eq!(credential, Credential::Key(pkh()));
        assert_eq!(credential.hash_hex(), PKH);
        assert!(!credential.is_script());
    }

    #[test]
    fn test_base_address_credential() {
        let mut payload = vec![0x01];
        payload.extend_from_slice(&pkh());
        payload.extend_from_slice(&[0x22; 28]);
        let address = bech32::encode::<Bech32>(Hrp::parse("addr").unwrap(), &payload).unwrap();
        assert_eq!(payment_credential_of(&address).unwrap(), Credential::Key(pkh()));
    }

    #[test]
    fn test_script_address_mainnet_prefix() {
        let address = credential_to_address(Network::Mainnet, &Credential::Script([0x33; 28])).unwrap();
        assert!(address.starts_with("addr1w"));
        assert!(payment_credential_of(&address).unwrap().is_script());
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(matches!(payment_credential_of("not an address"), Err(AddressError::Bech32(_))));
    }

    #[test]
    fn test_rejects_reward_address() {
        let mut payload = vec![0xe0];
        payload.extend_from_slice(&pkh());
        let address = bech32::encode::<Bech32>(Hrp::parse("stake_test").unwrap(), &payload).unwrap();
        assert!(matches!(payment_credential_of(&address), Err(AddressError::Prefix(_))));
    }

    #[test]
    fn test_rejects_header_from_other_network() {
        let mut payload = vec![ENTERPRISE_KEY | Network::Mainnet.id()];
        payload.extend_from_slice(&[0x11; 28]);
        let address = bech32::encode::<Bech32>(Hrp::parse("addr_test").unwrap(), &payload).unwrap();
        assert_eq!(
            payment_credential_of(&address),
            Err(AddressError::NetworkMismatch { prefix: "addr_test".into(), id: 1 })
        );

        let mut payload = vec![ENTERPRISE_SCRIPT];
        payload.extend_from_slice(&[0x11; 28]);
        let address = bech32::encode::<Bech32>(Hrp::parse("addr").unwrap(), &payload).unwrap();
        assert!(matches!(payment_credential_of(&address), Err(AddressError::NetworkMismatch { .. })));
    }

    #[test]
    fn test_network_parse() {
        assert_eq!(Network::parse("MAINNET").unwrap(), Network::Mainnet);
        assert_eq!(Network::parse(" preview ").unwrap().id(), 0);
        assert!(Network::parse("testnet-9").is_err());
    }
}
