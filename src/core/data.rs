//! Plutus data - redeemers, datums and script parameters
//!
//! Encoded as CBOR the way the ledger tooling writes it: constructors use tags
//! 121..=127, 1280..=1400 or the general form 102, non-empty lists and
//! constructor fields are indefinite-length (`9f … ff`), maps are definite and
//! byte strings longer than 64 bytes are split into 64-byte chunks. Script
//! hashes depend on these exact bytes once data is applied as a parameter.
//! In JSON a value travels as its CBOR hex string.

use ciborium::value::Value;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Plutus caps a single byte string chunk at 64 bytes.
const MAX_BYTES_CHUNK: usize = 64;

const MAJOR_UNSIGNED: u8 = 0;
const MAJOR_NEGATIVE: u8 = 1;
const MAJOR_BYTES: u8 = 2;
const MAJOR_ARRAY: u8 = 4;
const MAJOR_MAP: u8 = 5;
const MAJOR_TAG: u8 = 6;
const INDEFINITE_BYTES: u8 = 0x5f;
const INDEFINITE_ARRAY: u8 = 0x9f;
const BREAK: u8 = 0xff;
const TAG_BIGNUM_POS: u64 = 2;
const TAG_BIGNUM_NEG: u64 = 3;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DataError {
    #[error("CBOR decode: {0}")]
    Decode(String),
    #[error("invalid hex: {0}")]
    Hex(String),
    #[error("unsupported plutus data: {0}")]
    Unsupported(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlutusData {
    Constr { tag: u64, fields: Vec<PlutusData> },
    Map(Vec<(PlutusData, PlutusData)>),
    List(Vec<PlutusData>),
    Int(i128),
    Bytes(Vec<u8>),
}

impl PlutusData {
    /// `Constr 0 []`, the unit redeemer/datum.
    pub fn void() -> Self {
        PlutusData::Constr { tag: 0, fields: Vec::new() }
    }

    pub fn bytes(bytes: impl Into<Vec<u8>>) -> Self {
        PlutusData::Bytes(bytes.into())
    }

    pub fn to_cbor(&self) -> Result<Vec<u8>, DataError> {
        let mut out = Vec::new();
        self.encode(&mut out);
        Ok(out)
    }

    pub fn to_cbor_hex(&self) -> Result<String, DataError> {
        self.to_cbor().map(hex::encode)
    }

    pub fn from_cbor(bytes: &[u8]) -> Result<Self, DataError> {
        let value: Value = ciborium::de::from_reader(bytes)
            .map_err(|e| DataError::Decode(e.to_string()))?;
        Self::from_value(value)
    }

    pub fn from_cbor_hex(cbor_hex: &str) -> Result<Self, DataError> {
        let bytes = hex::decode(cbor_hex).map_err(|e| DataError::Hex(e.to_string()))?;
        Self::from_cbor(&bytes)
    }

    fn encode(&self, out: &mut Vec<u8>) {
        match self {
            PlutusData::Constr { tag, fields } => {
                match *tag {
                    0..=6 => head(out, MAJOR_TAG, 121 + tag),
                    7..=127 => head(out, MAJOR_TAG, 1280 + tag - 7),
                    _ => {
                        head(out, MAJOR_TAG, 102);
                        head(out, MAJOR_ARRAY, 2);
                        head(out, MAJOR_UNSIGNED, *tag);
                    }
                }
                encode_list(fields, out);
            }
            PlutusData::Map(entries) => {
                head(out, MAJOR_MAP, entries.len() as u64);
                for (key, value) in entries {
                    key.encode(out);
                    value.encode(out);
                }
            }
            PlutusData::List(items) => encode_list(items, out),
            PlutusData::Int(n) => encode_int(*n, out),
            PlutusData::Bytes(bytes) => encode_bytes(bytes, out),
        }
    }

    fn from_value(value: Value) -> Result<Self, DataError> {
        Ok(match value {
            Value::Tag(tag @ 121..=127, inner) => PlutusData::Constr { tag: tag - 121, fields: Self::fields(*inner)? },
            Value::Tag(tag @ 1280..=1400, inner) => PlutusData::Constr { tag: tag - 1280 + 7, fields: Self::fields(*inner)? },
            Value::Tag(102, inner) => match *inner {
                Value::Array(mut parts) if parts.len() == 2 => {
                    let fields = Self::fields(parts.pop().unwrap_or(Value::Null))?;
                    let tag = match parts.pop() {
                        Some(Value::Integer(i)) => u64::try_from(i).map_err(|_| DataError::Unsupported("constructor tag".into()))?,
                        _ => return Err(DataError::Unsupported("constructor tag".into())),
                    };
                    PlutusData::Constr { tag, fields }
                }
                other => return Err(DataError::Unsupported(format!("tag 102 body {:?}", other))),
            },
            Value::Tag(tag @ (TAG_BIGNUM_POS | TAG_BIGNUM_NEG), inner) => match *inner {
                Value::Bytes(bytes) => PlutusData::Int(bignum(tag, &bytes)?),
                other => return Err(DataError::Unsupported(format!("bignum body {:?}", other))),
            },
            Value::Map(entries) => PlutusData::Map(
                entries
                    .into_iter()
                    .map(|(k, v)| Ok((Self::from_value(k)?, Self::from_value(v)?)))
                    .collect::<Result<_, DataError>>()?,
            ),
            Value::Array(items) => PlutusData::List(items.into_iter().map(Self::from_value).collect::<Result<_, _>>()?),
            Value::Integer(i) => PlutusData::Int(i128::from(i)),
            Value::Bytes(bytes) => PlutusData::Bytes(bytes),
            other => return Err(DataError::Unsupported(format!("{:?}", other))),
        })
    }

    fn fields(value: Value) -> Result<Vec<PlutusData>, DataError> {
        match value {
            Value::Array(items) => items.into_iter().map(Self::from_value).collect(),
            other => Err(DataError::Unsupported(format!("constructor fields {:?}", other))),
        }
    }
}

/// Major type and argument, in the shortest form.
fn head(out: &mut Vec<u8>, major: u8, value: u64) {
    let major = major << 5;
    match value {
        0..=23 => out.push(major | value as u8),
        24..=0xff => out.extend_from_slice(&[major | 24, value as u8]),
        0x100..=0xffff => {
            out.push(major | 25);
            out.extend_from_slice(&(value as u16).to_be_bytes());
        }
        0x1_0000..=0xffff_ffff => {
            out.push(major | 26);
            out.extend_from_slice(&(value as u32).to_be_bytes());
        }
        _ => {
            out.push(major | 27);
            out.extend_from_slice(&value.to_be_bytes());
        }
    }
}

fn encode_list(items: &[PlutusData], out: &mut Vec<u8>) {
    if items.is_empty() {
        head(out, MAJOR_ARRAY, 0);
        return;
    }
    out.push(INDEFINITE_ARRAY);
    for item in items {
        item.encode(out);
    }
    out.push(BREAK);
}

fn encode_bytes(bytes: &[u8], out: &mut Vec<u8>) {
    if bytes.len() <= MAX_BYTES_CHUNK {
        head(out, MAJOR_BYTES, bytes.len() as u64);
        out.extend_from_slice(bytes);
        return;
    }
    out.push(INDEFINITE_BYTES);
    for chunk in bytes.chunks(MAX_BYTES_CHUNK) {
        head(out, MAJOR_BYTES, chunk.len() as u64);
        out.extend_from_slice(chunk);
    }
    out.push(BREAK);
}

fn encode_int(n: i128, out: &mut Vec<u8>) {
    // Negative n is stored as -1 - n
    let (major, tag, magnitude) = if n >= 0 {
        (MAJOR_UNSIGNED, TAG_BIGNUM_POS, n as u128)
    } else {
        (MAJOR_NEGATIVE, TAG_BIGNUM_NEG, (-1 - n) as u128)
    };
    match u64::try_from(magnitude) {
        Ok(small) => head(out, major, small),
        Err(_) => {
            head(out, MAJOR_TAG, tag);
            let be = magnitude.to_be_bytes();
            let first = be.iter().position(|b| *b != 0).unwrap_or(be.len());
            encode_bytes(&be[first..], out);
        }
    }
}

fn bignum(tag: u64, bytes: &[u8]) -> Result<i128, DataError> {
    let significant: Vec<u8> = bytes.iter().copied().skip_while(|b| *b == 0).collect();
    if significant.len() > 16 {
        return Err(DataError::Unsupported(format!("{}-byte bignum", significant.len())));
    }
    let mut be = [0u8; 16];
    be[16 - significant.len()..].copy_from_slice(&significant);
    let magnitude = i128::try_from(u128::from_be_bytes(be))
        .map_err(|_| DataError::Unsupported("bignum beyond 128 bits".into()))?;
    Ok(if tag == TAG_BIGNUM_NEG { -1 - magnitude } else { magnitude })
}

impl Serialize for PlutusData {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let cbor_hex = self.to_cbor_hex().map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&cbor_hex)
    }
}

impl<'de> Deserialize<'de> for PlutusData {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let cbor_hex = String::deserialize(deserializer)?;
        PlutusData::from_cbor_hex(&cbor_hex).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_void_encoding() {
        assert_eq!(PlutusData::void().to_cbor_hex().unwrap(), "d87980");
    }

    #[test]
    fn test_key_hash_param_encoding() {
        let pkh = [0x11u8; 28];
        let cbor = PlutusData::bytes(pkh.to_vec()).to_cbor().unwrap();
        assert_eq!(&cbor[..2], &[0x58, 0x1c]);
        assert_eq!(&cbor[2..], &pkh);
    }

    #[test]
    fn test_high_constructor_tags() {
        let seventh = PlutusData::Constr { tag: 7, fields: vec![] };
        assert_eq!(seventh.to_cbor_hex().unwrap(), "d9050080");
        let general = PlutusData::Constr { tag: 200, fields: vec![PlutusData::Int(-1)] };
        let decoded = PlutusData::from_cbor(&general.to_cbor().unwrap()).unwrap();
        assert_eq!(decoded, general);
    }

    #[test]
    fn test_decode_nested() {
        let data = PlutusData::Constr {
            tag: 1,
            fields: vec![
                PlutusData::List(vec![PlutusData::Int(42), PlutusData::bytes(vec![0xde, 0xad])]),
                PlutusData::Map(vec![(PlutusData::Int(1), PlutusData::void())]),
            ],
        };
        let hex = data.to_cbor_hex().unwrap();
        assert_eq!(PlutusData::from_cbor_hex(&hex).unwrap(), data);
    }

    #[test]
    fn test_non_empty_lists_are_indefinite() {
        assert_eq!(PlutusData::List(vec![]).to_cbor_hex().unwrap(), "80");
        assert_eq!(PlutusData::List(vec![PlutusData::Int(1), PlutusData::Int(2)]).to_cbor_hex().unwrap(), "9f0102ff");
        let constr = PlutusData::Constr { tag: 0, fields: vec![PlutusData::Int(1)] };
        assert_eq!(constr.to_cbor_hex().unwrap(), "d8799f01ff");
        let general = PlutusData::Constr { tag: 200, fields: vec![PlutusData::Int(-1)] };
        assert_eq!(general.to_cbor_hex().unwrap(), "d8668218c89f20ff");
        let map = PlutusData::Map(vec![(PlutusData::Int(1), PlutusData::void())]);
        assert_eq!(map.to_cbor_hex().unwrap(), "a101d87980");
    }

    #[test]
    fn test_long_bytes_are_chunked() {
        let cbor = PlutusData::bytes(vec![0xabu8; 65]).to_cbor().unwrap();
        assert_eq!(cbor.len(), 1 + 2 + 64 + 1 + 1 + 1);
        assert_eq!(&cbor[..3], &[0x5f, 0x58, 0x40]);
        assert_eq!(&cbor[67..], &[0x41, 0xab, 0xff]);
    }

    #[test]
    fn test_integer_widths() {
        assert_eq!(PlutusData::Int(23).to_cbor_hex().unwrap(), "17");
        assert_eq!(PlutusData::Int(1_000).to_cbor_hex().unwrap(), "1903e8");
        assert_eq!(PlutusData::Int(-1_000).to_cbor_hex().unwrap(), "3903e7");
        let big = PlutusData::Int(u64::MAX as i128 + 1);
        assert_eq!(big.to_cbor_hex().unwrap(), "c249010000000000000000");
        assert_eq!(bignum(TAG_BIGNUM_POS, &[0x01, 0, 0, 0, 0, 0, 0, 0, 0]).unwrap(), u64::MAX as i128 + 1);
        assert_eq!(bignum(TAG_BIGNUM_NEG, &[0x01, 0, 0, 0, 0, 0, 0, 0, 0]).unwrap(), -(u64::MAX as i128) - 2);
    }

    #[test]
    fn test_json_form_is_cbor_hex() {
        let json = serde_json::to_value(PlutusData::void()).unwrap();
        assert_eq!(json, serde_json::json!("d87980"));
        let back: PlutusData = serde_json::from_value(json).unwrap();
        assert_eq!(back, PlutusData::void());
    }
}
