//! Transaction requests - what an action asks the session to build
//!
//! `TxRequest` is a plain value accumulated with chained calls and handed to
//! `Session::complete`. It never touches shared state; balancing, fees and
//! coin selection belong to the session.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

use super::asset::Assets;
use super::data::PlutusData;
use super::script::Script;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TxHash(pub String);

impl TxHash {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for TxHash {
    fn from(value: String) -> Self {
        TxHash(value)
    }
}

/// Reference to an output of a previous transaction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutRef {
    pub tx_hash: TxHash,
    pub output_index: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Utxo {
    pub tx_hash: TxHash,
    pub output_index: u32,
    pub address: String,
    pub assets: Assets,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datum: Option<PlutusData>,
}

impl Utxo {
    pub fn out_ref(&self) -> OutRef {
        OutRef { tx_hash: self.tx_hash.clone(), output_index: self.output_index }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TxOutput {
    pub address: String,
    pub assets: Assets,
    /// Inline datum
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datum: Option<PlutusData>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectedInput {
    pub utxo: Utxo,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redeemer: Option<PlutusData>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TxRequest {
    pub mint: Assets,
    /// Redeemer per minting policy id
    pub mint_redeemers: BTreeMap<String, PlutusData>,
    pub minting_policies: Vec<Script>,
    pub spending_validators: Vec<Script>,
    pub inputs: Vec<CollectedInput>,
    pub outputs: Vec<TxOutput>,
    pub metadata: BTreeMap<u64, Value>,
    /// Addresses whose payment key must sign
    pub required_signers: Vec<String>,
}

impl TxRequest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mint (positive) or burn (negative) `assets`; every policy touched gets `redeemer`.
    pub fn mint_assets(mut self, assets: Assets, redeemer: PlutusData) -> Self {
        for policy in assets.policies() {
            self.mint_redeemers.insert(policy, redeemer.clone());
        }
        self.mint.add(&assets);
        self
    }

    pub fn attach_minting_policy(mut self, policy: Script) -> Self {
        if !self.minting_policies.contains(&policy) {
            self.minting_policies.push(policy);
        }
        self
    }

    pub fn attach_spending_validator(mut self, validator: Script) -> Self {
        if !self.spending_validators.contains(&validator) {
            self.spending_validators.push(validator);
        }
        self
    }

    pub fn attach_metadata(mut self, label: u64, metadata: Value) -> Self {
        self.metadata.insert(label, metadata);
        self
    }

    pub fn collect_from(mut self, utxos: Vec<Utxo>, redeemer: Option<PlutusData>) -> Self {
        for utxo in utxos {
            if self.inputs.iter().all(|input| input.utxo.out_ref() != utxo.out_ref()) {
                self.inputs.push(CollectedInput { utxo, redeemer: redeemer.clone() });
            }
        }
        self
    }

    /// Pay to a script address with an inline datum.
    pub fn pay_to_contract(mut self, address: impl Into<String>, datum: PlutusData, assets: Assets) -> Self {
        self.outputs.push(TxOutput { address: address.into(), assets, datum: Some(datum) });
        self
    }

    pub fn add_signer(mut self, address: impl Into<String>) -> Self {
        let address = address.into();
        if !self.required_signers.contains(&address) {
            self.required_signers.push(address);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::asset::Unit;

    const POLICY: &str = "d79aca76195850a184e04c8d406918ab2dcbf0e83875e8ab952cb902";

    fn utxo(index: u32) -> Utxo {
        Utxo {
            tx_hash: TxHash("aa".repeat(32)),
            output_index: index,
            address: "addr_test1".into(),
            assets: Assets::lovelace(5_000_000),
            datum: None,
        }
    }

    #[test]
    fn test_mint_then_burn_nets_out() {
        let unit = Unit::new(POLICY, "Always True Token");
        let request = TxRequest::new()
            .mint_assets(Assets::single(unit.clone(), 1_000), PlutusData::void())
            .mint_assets(Assets::single(unit.clone(), -1_000), PlutusData::void());
        assert_eq!(request.mint.get(&unit), 0);
        assert_eq!(request.mint_redeemers.get(POLICY), Some(&PlutusData::void()));
    }

    #[test]
    fn test_collect_from_skips_duplicates() {
        let request = TxRequest::new()
            .collect_from(vec![utxo(0), utxo(1)], None)
            .collect_from(vec![utxo(1)], Some(PlutusData::void()));
        assert_eq!(request.inputs.len(), 2);
        assert!(request.inputs.iter().all(|i| i.redeemer.is_none()));
    }

    #[test]
    fn test_signers_dedup() {
        let request = TxRequest::new().add_signer("addr_a").add_signer("addr_a").add_signer("addr_b");
        assert_eq!(request.required_signers, vec!["addr_a", "addr_b"]);
    }

    #[test]
    fn test_json_uses_camel_case() {
        let request = TxRequest::new().pay_to_contract("addr_test1w", PlutusData::void(), Assets::lovelace(1));
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["outputs"][0]["datum"], "d87980");
        assert!(json.get("requiredSigners").is_some());
        assert!(json.get("mintRedeemers").is_some());
    }
}
