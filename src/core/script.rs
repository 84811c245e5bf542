//! Script - compiled Plutus V3 scripts, hashes and parameter application
//!
//! A script is kept in its single-CBOR form (a byte string wrapping the flat
//! program), which is what the ledger hashes. Inputs may arrive raw, single
//! or double encoded; `apply_double_cbor_encoding` normalizes any of them.

use ciborium::value::Value;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::data::{DataError, PlutusData};
use super::flat::{self, FlatError};
use super::hash::blake2b_224;

/// Ledger namespace byte prefixed to a Plutus V3 script before hashing.
const PLUTUS_V3_TAG: u8 = 0x03;

pub use super::hash::HASH_224_LEN as SCRIPT_HASH_LEN;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ScriptError {
    #[error("invalid script hex: {0}")]
    Hex(String),
    #[error("script is not a CBOR byte string")]
    NotByteString,
    #[error("CBOR encode: {0}")]
    Cbor(String),
    #[error(transparent)]
    Flat(#[from] FlatError),
    #[error(transparent)]
    Data(#[from] DataError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    PlutusV3,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::PlutusV3 => "PlutusV3",
        }
    }
}

/// Blake2b-224 script hash. For a minting policy this is the policy id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScriptHash(pub [u8; SCRIPT_HASH_LEN]);

impl ScriptHash {
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl std::fmt::Display for ScriptHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Compiled script. Serializes as `{"type": "PlutusV3", "script": <double-cbor hex>}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Script {
    #[serde(rename = "type")]
    pub language: Language,
    #[serde(rename = "script", with = "double_cbor_hex")]
    compiled: Vec<u8>,
}

impl Script {
    /// Accepts raw flat, single or double CBOR encoded hex.
    pub fn plutus_v3(script_hex: &str) -> Result<Self, ScriptError> {
        let double = hex::decode(apply_double_cbor_encoding(script_hex)?).map_err(|e| ScriptError::Hex(e.to_string()))?;
        let compiled = unwrap_bytes(&double).ok_or(ScriptError::NotByteString)?;
        Ok(Self { language: Language::PlutusV3, compiled })
    }

    /// Single-CBOR bytes (the blueprint `compiledCode`).
    pub fn compiled_code(&self) -> &[u8] {
        &self.compiled
    }

    /// Flat program inside the CBOR wrapper.
    pub fn program(&self) -> Result<Vec<u8>, ScriptError> {
        unwrap_bytes(&self.compiled).ok_or(ScriptError::NotByteString)
    }

    pub fn to_double_cbor_hex(&self) -> Result<String, ScriptError> {
        wrap_bytes(&self.compiled).map(hex::encode)
    }

    pub fn hash(&self) -> ScriptHash {
        ScriptHash(blake2b_224(&[&[PLUTUS_V3_TAG][..], self.compiled.as_slice()]))
    }

    /// Policy id of a minting policy, as hex.
    pub fn policy_id(&self) -> String {
        self.hash().to_hex()
    }

    /// Apply data parameters in order: `((program p0) p1) ...`.
    pub fn apply_params(&self, params: &[PlutusData]) -> Result<Script, ScriptError> {
        let mut program = self.program()?;
        for param in params {
            program = flat::apply_data(&program, &param.to_cbor()?)?;
        }
        Ok(Self { language: self.language, compiled: wrap_bytes(&program)? })
    }
}

/// Double-CBOR encode a script given as hex, leaving already double-encoded input untouched.
pub fn apply_double_cbor_encoding(script_hex: &str) -> Result<String, ScriptError> {
    let bytes = hex::decode(script_hex).map_err(|e| ScriptError::Hex(e.to_string()))?;
    let double = match unwrap_bytes(&bytes) {
        Some(inner) if unwrap_bytes(&inner).is_some() => bytes,
        Some(_) => wrap_bytes(&bytes)?,
        None => wrap_bytes(&wrap_bytes(&bytes)?)?,
    };
    Ok(hex::encode(double))
}

/// Contents of `bytes` if it is exactly one CBOR byte string.
fn unwrap_bytes(bytes: &[u8]) -> Option<Vec<u8>> {
    let mut rest = bytes;
    match ciborium::de::from_reader::<Value, _>(&mut rest) {
        Ok(Value::Bytes(inner)) if rest.is_empty() => Some(inner),
        _ => None,
    }
}

fn wrap_bytes(bytes: &[u8]) -> Result<Vec<u8>, ScriptError> {
    let mut out = Vec::with_capacity(bytes.len() + 3);
    ciborium::ser::into_writer(&Value::Bytes(bytes.to_vec()), &mut out).map_err(|e| ScriptError::Cbor(e.to_string()))?;
    Ok(out)
}

mod double_cbor_hex {
    use super::{unwrap_bytes, wrap_bytes};
    use serde::{de, ser, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(compiled: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        let double = wrap_bytes(compiled).map_err(ser::Error::custom)?;
        serializer.serialize_str(&hex::encode(double))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let script_hex = String::deserialize(deserializer)?;
        let normalized = super::apply_double_cbor_encoding(&script_hex).map_err(de::Error::custom)?;
        let double = hex::decode(normalized).map_err(de::Error::custom)?;
        unwrap_bytes(&double).ok_or_else(|| de::Error::custom("script is not a CBOR byte string"))
    }
}
