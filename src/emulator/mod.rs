//! Emulator: in-memory ledger behind the `Session` seam
//!
//! Holds a UTxO set, one wallet key and a flat fee. `complete` checks the
//! request against the scripts it carries, tops up min-ada, selects wallet
//! coins and returns change; `submit` applies the transaction or rejects it
//! when an input is already gone.
//!
//! ```text
//! TxRequest ─▶ complete ─▶ UnsignedTx ─▶ sign_with_wallet ─▶ SignedTx ─▶ submit ─▶ TxHash
//!                 │                              │                          │
//!          scripts, balance              required signers           inputs unspent?
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, info};

use crate::core::address::Credential;
use crate::core::consts::ledger::MIN_UTXO_LOVELACE;
use crate::core::hash::blake2b_256;
use crate::core::tx::{OutRef, TxOutput};
use crate::core::{payment_credential_of, Assets, Network, TxHash, TxRequest, Unit, Utxo};
use crate::dispatch::{ActionError, Session};

pub const DEFAULT_FUNDS: i128 = 100_000_000_000;
pub const DEFAULT_FEE: i128 = 200_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmulatorConfig {
    pub network: Network,
    /// Lovelace in the wallet's genesis output
    pub funds: i128,
    pub fee: i128,
}

impl Default for EmulatorConfig {
    fn default() -> Self {
        Self { network: Network::Custom, funds: DEFAULT_FUNDS, fee: DEFAULT_FEE }
    }
}

impl EmulatorConfig {
    pub fn new(network: Network) -> Self {
        Self { network, ..Default::default() }
    }
    pub fn with_funds(mut self, funds: i128) -> Self { self.funds = funds; self }
    pub fn with_fee(mut self, fee: i128) -> Self { self.fee = fee; self }

    /// Genesis funds must be positive and the fee non-negative.
    pub fn validate(&self) -> Result<(), ActionError> {
        if self.funds <= 0 {
            return Err(ActionError::Build(format!("genesis funds must be positive, got {}", self.funds)));
        }
        if self.fee < 0 {
            return Err(ActionError::Build(format!("fee must not be negative, got {}", self.fee)));
        }
        Ok(())
    }
}

/// Balanced transaction awaiting the wallet's signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnsignedTx {
    pub hash: TxHash,
    pub inputs: Vec<OutRef>,
    pub outputs: Vec<TxOutput>,
    pub mint: Assets,
    pub fee: i128,
    pub metadata: BTreeMap<u64, Value>,
    /// Addresses whose payment key must witness the transaction
    pub signers: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedTx {
    pub tx: UnsignedTx,
    /// Key hashes (hex) that signed
    pub witnesses: Vec<String>,
}

#[derive(Debug, Serialize)]
struct TxBody<'a> {
    inputs: &'a [OutRef],
    outputs: &'a [TxOutput],
    mint: &'a Assets,
    fee: i128,
    metadata: &'a BTreeMap<u64, Value>,
    signers: &'a [String],
}

#[derive(Debug, Default)]
struct Ledger {
    utxos: BTreeMap<OutRef, Utxo>,
    connected: bool,
    reject_signing: bool,
    submitted: usize,
}

pub struct Emulator {
    config: EmulatorConfig,
    wallet: String,
    wallet_key: [u8; 28],
    ledger: Mutex<Ledger>,
}

impl Emulator {
    /// Ledger with one genesis output of `config.funds` lovelace at `wallet`.
    pub fn new(wallet: impl Into<String>, config: EmulatorConfig) -> Result<Self, ActionError> {
        let wallet = wallet.into();
        config.validate()?;
        let wallet_key = match payment_credential_of(&wallet)? {
            Credential::Key(hash) => hash,
            Credential::Script(_) => {
                return Err(ActionError::Signing(format!("wallet address {} is not key-locked", wallet)))
            }
        };
        let mut ledger = Ledger { connected: true, ..Default::default() };
        let genesis = Utxo {
            tx_hash: TxHash(hex::encode(blake2b_256(&[&b"genesis"[..], wallet.as_bytes()]))),
            output_index: 0,
            address: wallet.clone(),
            assets: Assets::lovelace(config.funds),
            datum: None,
        };
        ledger.utxos.insert(genesis.out_ref(), genesis);
        info!(wallet = %wallet, funds = config.funds, network = config.network.as_str(), "emulator ready");
        Ok(Self { config, wallet, wallet_key, ledger: Mutex::new(ledger) })
    }

    pub fn wallet_address(&self) -> &str {
        &self.wallet
    }

    pub fn config(&self) -> &EmulatorConfig {
        &self.config
    }

    pub fn utxos_at(&self, address: &str) -> Vec<Utxo> {
        self.ledger
            .lock()
            .map(|l| l.utxos.values().filter(|u| u.address == address).cloned().collect())
            .unwrap_or_default()
    }

    pub fn balance_of(&self, address: &str) -> Assets {
        let mut total = Assets::new();
        for utxo in self.utxos_at(address) {
            total.add(&utxo.assets);
        }
        total
    }

    pub fn submitted(&self) -> usize {
        self.ledger.lock().map(|l| l.submitted).unwrap_or(0)
    }

    /// Every later call fails with `Disconnected` until `reconnect`.
    pub fn disconnect(&self) {
        if let Ok(mut ledger) = self.ledger.lock() {
            ledger.connected = false;
        }
    }

    pub fn reconnect(&self) {
        if let Ok(mut ledger) = self.ledger.lock() {
            ledger.connected = true;
        }
    }

    /// Make the wallet decline every signature request.
    pub fn reject_signing(&self, reject: bool) {
        if let Ok(mut ledger) = self.ledger.lock() {
            ledger.reject_signing = reject;
        }
    }

    fn connected(&self) -> Result<MutexGuard<'_, Ledger>, ActionError> {
        let ledger = self.ledger.lock().map_err(|_| ActionError::Lookup("ledger lock".into()))?;
        if !ledger.connected {
            return Err(ActionError::Disconnected);
        }
        Ok(ledger)
    }

    fn build(&self, ledger: &Ledger, request: TxRequest) -> Result<UnsignedTx, ActionError> {
        for policy in request.mint.policies() {
            if !request.minting_policies.iter().any(|p| p.policy_id() == policy) {
                return Err(ActionError::Build(format!("no minting policy attached for {}", policy)));
            }
            if !request.mint_redeemers.contains_key(&policy) {
                return Err(ActionError::Build(format!("no redeemer for policy {}", policy)));
            }
        }

        let mut selected = Vec::with_capacity(request.inputs.len());
        let mut signers: Vec<String> = Vec::new();
        for input in &request.inputs {
            let out_ref = input.utxo.out_ref();
            let utxo = ledger.utxos.get(&out_ref).ok_or_else(|| {
                ActionError::Build(format!("input {}#{} is not in the UTxO set", out_ref.tx_hash, out_ref.output_index))
            })?;
            match payment_credential_of(&utxo.address)? {
                Credential::Script(hash) => {
                    if input.redeemer.is_none() {
                        return Err(ActionError::Build(format!("script input {}#{} has no redeemer", out_ref.tx_hash, out_ref.output_index)));
                    }
                    if !request.spending_validators.iter().any(|v| v.hash().0 == hash) {
                        return Err(ActionError::Build(format!("no validator attached for {}", utxo.address)));
                    }
                }
                Credential::Key(_) => push_unique(&mut signers, &utxo.address),
            }
            selected.push(utxo.clone());
        }
        for signer in &request.required_signers {
            push_unique(&mut signers, signer);
        }

        let mut outputs = request.outputs;
        for output in &mut outputs {
            if output.assets.lovelace_amount() < MIN_UTXO_LOVELACE {
                output.assets.insert(Unit::lovelace(), MIN_UTXO_LOVELACE);
            }
        }

        let fee = self.config.fee;
        let mut spent = Assets::lovelace(fee);
        for output in &outputs {
            spent.add(&output.assets);
        }

        // Largest wallet coins first
        let mut candidates: Vec<&Utxo> = ledger
            .utxos
            .values()
            .filter(|u| u.address == self.wallet && !selected.iter().any(|s| s.out_ref() == u.out_ref()))
            .collect();
        candidates.sort_by(|a, b| b.assets.lovelace_amount().cmp(&a.assets.lovelace_amount()));
        let mut candidates = candidates.into_iter();

        let change = loop {
            let mut balance = request.mint.clone();
            for utxo in &selected {
                balance.add(&utxo.assets);
            }
            balance.sub(&spent);
            let short = balance.has_negative() || (!balance.is_empty() && balance.lovelace_amount() < MIN_UTXO_LOVELACE);
            if !short {
                break balance;
            }
            match candidates.next() {
                Some(utxo) => {
                    push_unique(&mut signers, &utxo.address);
                    selected.push(utxo.clone());
                }
                None => return Err(ActionError::Build(format!("insufficient funds, balance {:?}", balance))),
            }
        };
        if !change.is_empty() {
            outputs.push(TxOutput { address: self.wallet.clone(), assets: change, datum: None });
        }

        let inputs: Vec<OutRef> = selected.iter().map(Utxo::out_ref).collect();
        let body = TxBody {
            inputs: &inputs,
            outputs: &outputs,
            mint: &request.mint,
            fee,
            metadata: &request.metadata,
            signers: &signers,
        };
        let bytes = serde_json::to_vec(&body).map_err(|e| ActionError::Build(e.to_string()))?;
        let hash = TxHash(hex::encode(blake2b_256(&[bytes.as_slice()])));
        Ok(UnsignedTx { hash, inputs, outputs, mint: request.mint, fee, metadata: request.metadata, signers })
    }
}

fn push_unique(list: &mut Vec<String>, address: &str) {
    if !list.iter().any(|a| a == address) {
        list.push(address.to_string());
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl Session for Emulator {
    type Unsigned = UnsignedTx;
    type Signed = SignedTx;

    fn network(&self) -> Result<Network, ActionError> {
        self.connected()?;
        Ok(self.config.network)
    }

    async fn utxos_at_with_unit(&self, address: &str, unit: &Unit) -> Result<Vec<Utxo>, ActionError> {
        let ledger = self.connected()?;
        Ok(ledger
            .utxos
            .values()
            .filter(|u| u.address == address && u.assets.get(unit) > 0)
            .cloned()
            .collect())
    }

    async fn complete(&self, request: TxRequest) -> Result<UnsignedTx, ActionError> {
        let ledger = self.connected()?;
        let tx = self.build(&ledger, request)?;
        debug!(tx_hash = %tx.hash, inputs = tx.inputs.len(), outputs = tx.outputs.len(), fee = tx.fee, "balanced");
        Ok(tx)
    }

    async fn sign_with_wallet(&self, tx: UnsignedTx) -> Result<SignedTx, ActionError> {
        let ledger = self.connected()?;
        if ledger.reject_signing {
            return Err(ActionError::Signing("user declined to sign".into()));
        }
        for signer in &tx.signers {
            match payment_credential_of(signer)? {
                Credential::Key(hash) if hash == self.wallet_key => {}
                _ => return Err(ActionError::Signing(format!("wallet cannot sign for {}", signer))),
            }
        }
        Ok(SignedTx { tx, witnesses: vec![hex::encode(self.wallet_key)] })
    }

    async fn submit(&self, signed: SignedTx) -> Result<TxHash, ActionError> {
        let mut ledger = self.connected()?;
        let tx = signed.tx;
        if let Some(missing) = tx.inputs.iter().find(|i| !ledger.utxos.contains_key(*i)) {
            return Err(ActionError::Submit(format!(
                "input {}#{} already spent",
                missing.tx_hash, missing.output_index
            )));
        }
        let witnessed: BTreeSet<&str> = signed.witnesses.iter().map(String::as_str).collect();
        for signer in &tx.signers {
            let key = payment_credential_of(signer)?.hash_hex();
            if !witnessed.contains(key.as_str()) {
                return Err(ActionError::Submit(format!("missing signature for {}", signer)));
            }
        }
        for input in &tx.inputs {
            ledger.utxos.remove(input);
        }
        for (index, output) in tx.outputs.into_iter().enumerate() {
            let utxo = Utxo {
                tx_hash: tx.hash.clone(),
                output_index: index as u32,
                address: output.address,
                assets: output.assets,
                datum: output.datum,
            };
            ledger.utxos.insert(utxo.out_ref(), utxo);
        }
        ledger.submitted += 1;
        info!(tx_hash = %tx.hash, "transaction applied");
        Ok(tx.hash)
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;
    use crate::core::address::credential_to_address;
    use crate::core::consts::scripts;
    use crate::core::{PlutusData, Script};

    const WALLET: &str = "addr_test1vqqpzg3ng32kvaugnx4thnxaamlsqyfzxdz92enh3zv64wcu79rm4";

    fn emulator() -> Emulator {
        Emulator::new(WALLET, EmulatorConfig::default()).unwrap()
    }

    fn mint_request(quantity: i128) -> (TxRequest, Unit) {
        let policy = Script::plutus_v3(scripts::MINT).unwrap();
        let unit = Unit::new(&policy.policy_id(), "t");
        let request = TxRequest::new()
            .mint_assets(Assets::single(unit.clone(), quantity), PlutusData::void())
            .attach_minting_policy(policy);
        (request, unit)
    }

    #[tokio::test]
    async fn test_mint_lands_in_wallet_with_change() {
        let emulator = emulator();
        let (request, unit) = mint_request(10);
        let tx = emulator.complete(request).await.unwrap();
        assert_eq!(tx.fee, DEFAULT_FEE);
        let signed = emulator.sign_with_wallet(tx).await.unwrap();
        emulator.submit(signed).await.unwrap();
        let balance = emulator.balance_of(WALLET);
        assert_eq!(balance.get(&unit), 10);
        assert_eq!(balance.lovelace_amount(), DEFAULT_FUNDS - DEFAULT_FEE);
    }

    #[test]
    fn test_rejects_negative_fee_and_empty_funds() {
        let err = Emulator::new(WALLET, EmulatorConfig::default().with_fee(-5_000_000_000)).err();
        assert!(matches!(err, Some(ActionError::Build(_))));
        let err = Emulator::new(WALLET, EmulatorConfig::default().with_funds(0)).err();
        assert!(matches!(err, Some(ActionError::Build(_))));
        assert!(Emulator::new(WALLET, EmulatorConfig::default().with_fee(0)).is_ok());
    }

    #[tokio::test]
    async fn test_mint_without_policy_fails() {
        let emulator = emulator();
        let (mut request, _) = mint_request(10);
        request.minting_policies.clear();
        let err = emulator.complete(request).await.unwrap_err();
        assert!(matches!(err, ActionError::Build(_)));
    }

    #[tokio::test]
    async fn test_insufficient_funds() {
        let emulator = Emulator::new(WALLET, EmulatorConfig::default().with_funds(100_000)).unwrap();
        let (request, _) = mint_request(1);
        assert!(matches!(emulator.complete(request).await, Err(ActionError::Build(_))));
    }

    #[tokio::test]
    async fn test_contract_output_gets_min_ada() {
        let emulator = emulator();
        let contract = credential_to_address(Network::Custom, &Credential::Script([7; 28])).unwrap();
        let request = TxRequest::new().pay_to_contract(contract.clone(), PlutusData::void(), Assets::new());
        let tx = emulator.complete(request).await.unwrap();
        let out = tx.outputs.iter().find(|o| o.address == contract).unwrap();
        assert_eq!(out.assets.lovelace_amount(), MIN_UTXO_LOVELACE);
        assert_eq!(out.datum, Some(PlutusData::void()));
    }

    #[tokio::test]
    async fn test_foreign_signer_rejected() {
        let emulator = emulator();
        let other = credential_to_address(Network::Custom, &Credential::Key([9; 28])).unwrap();
        let tx = emulator.complete(TxRequest::new().add_signer(other)).await.unwrap();
        assert!(matches!(emulator.sign_with_wallet(tx).await, Err(ActionError::Signing(_))));
    }

    #[tokio::test]
    async fn test_disconnected() {
        let emulator = emulator();
        emulator.disconnect();
        assert_eq!(emulator.network(), Err(ActionError::Disconnected));
        emulator.reconnect();
        assert_eq!(emulator.network(), Ok(Network::Custom));
    }

    #[test]
    fn test_script_wallet_rejected() {
        let contract = credential_to_address(Network::Custom, &Credential::Script([7; 28])).unwrap();
        assert!(Emulator::new(contract, EmulatorConfig::default()).is_err());
    }
}
