//! Dispatcher - the four actions over a connected session
//!
//! Every action follows the same path:
//!
//! ```text
//! derive (policy id / contract address) ─▶ TxRequest ─▶ complete ─▶ sign ─▶ submit
//!                                                                         │
//!                                       Reporter::on_result / on_error ◀──┘
//! ```
//!
//! Derivations are recomputed per action from the script bytes; nothing is
//! cached between calls.

use std::future::Future;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::{Action, ActionError, Reporter, Session};
use crate::core::asset::cip25_metadata;
use crate::core::consts::{asset, metadata, scripts};
use crate::core::{payment_credential_of, validator_to_address, Assets, PlutusData, Script, TxHash, TxRequest, Unit};

/// Script hex the dispatcher derives everything from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scripts {
    pub mint: String,
    pub spend: String,
}

impl Scripts {
    pub fn bundled() -> Self {
        Self { mint: scripts::MINT.to_string(), spend: scripts::SPEND.to_string() }
    }
}

impl Default for Scripts {
    fn default() -> Self {
        Self::bundled()
    }
}

pub struct Dispatcher<S, R> {
    session: Arc<S>,
    address: String,
    scripts: Scripts,
    reporter: R,
}

impl<S: Session, R: Reporter> Dispatcher<S, R> {
    pub fn new(session: Arc<S>, address: impl Into<String>, reporter: R) -> Self {
        Self { session, address: address.into(), scripts: Scripts::bundled(), reporter }
    }

    pub fn with_scripts(mut self, scripts: Scripts) -> Self {
        self.scripts = scripts;
        self
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn session(&self) -> &Arc<S> {
        &self.session
    }

    pub fn reporter(&self) -> &R {
        &self.reporter
    }

    // -------------------------------------------------------------------------
    // Derivations
    // -------------------------------------------------------------------------

    fn minting_policy(&self) -> Result<Script, ActionError> {
        Ok(Script::plutus_v3(&self.scripts.mint)?)
    }

    /// Spend script with the user's payment key hash applied.
    fn spending_validator(&self) -> Result<Script, ActionError> {
        let credential = payment_credential_of(&self.address)?;
        let spend = Script::plutus_v3(&self.scripts.spend)?;
        Ok(spend.apply_params(&[PlutusData::bytes(credential.hash().to_vec())])?)
    }

    pub fn policy_id(&self) -> Result<String, ActionError> {
        Ok(self.minting_policy()?.policy_id())
    }

    pub fn asset_unit(&self) -> Result<Unit, ActionError> {
        Ok(Unit::new(&self.policy_id()?, asset::NAME))
    }

    pub fn contract_address(&self) -> Result<String, ActionError> {
        let network = self.session.network()?;
        Ok(validator_to_address(network, &self.spending_validator()?)?)
    }

    // -------------------------------------------------------------------------
    // Requests
    // -------------------------------------------------------------------------

    pub fn mint_request(&self) -> Result<TxRequest, ActionError> {
        let policy = self.minting_policy()?;
        let policy_id = policy.policy_id();
        let unit = Unit::new(&policy_id, asset::NAME);
        Ok(TxRequest::new()
            .mint_assets(Assets::single(unit, asset::QUANTITY), PlutusData::void())
            .attach_minting_policy(policy)
            .attach_metadata(metadata::CIP25_LABEL, cip25_metadata(&policy_id, asset::NAME, asset::IMAGE)))
    }

    pub async fn burn_request(&self) -> Result<TxRequest, ActionError> {
        let policy = self.minting_policy()?;
        let unit = Unit::new(&policy.policy_id(), asset::NAME);
        let utxos = self.session.utxos_at_with_unit(&self.address, &unit).await?;
        if utxos.is_empty() {
            return Err(ActionError::NoUtxos { address: self.address.clone(), unit: unit.to_string() });
        }
        Ok(TxRequest::new()
            .collect_from(utxos, None)
            .mint_assets(Assets::single(unit, -asset::QUANTITY), PlutusData::void())
            .attach_minting_policy(policy))
    }

    pub fn deposit_request(&self) -> Result<TxRequest, ActionError> {
        let unit = self.asset_unit()?;
        let contract = self.contract_address()?;
        Ok(TxRequest::new().pay_to_contract(contract, PlutusData::void(), Assets::single(unit, asset::QUANTITY)))
    }

    pub async fn withdraw_request(&self) -> Result<TxRequest, ActionError> {
        let unit = self.asset_unit()?;
        let network = self.session.network()?;
        let validator = self.spending_validator()?;
        let contract = validator_to_address(network, &validator)?;
        let utxos = self.session.utxos_at_with_unit(&contract, &unit).await?;
        if utxos.is_empty() {
            return Err(ActionError::NoUtxos { address: contract, unit: unit.to_string() });
        }
        Ok(TxRequest::new()
            .collect_from(utxos, Some(PlutusData::void()))
            .attach_spending_validator(validator)
            .add_signer(self.address.clone()))
    }

    // -------------------------------------------------------------------------
    // Actions
    // -------------------------------------------------------------------------

    pub async fn try_mint(&self) -> Result<TxHash, ActionError> {
        let request = self.mint_request()?;
        self.submit(request).await
    }

    pub async fn try_burn(&self) -> Result<TxHash, ActionError> {
        let request = self.burn_request().await?;
        self.submit(request).await
    }

    pub async fn try_deposit(&self) -> Result<TxHash, ActionError> {
        let request = self.deposit_request()?;
        self.submit(request).await
    }

    pub async fn try_withdraw(&self) -> Result<TxHash, ActionError> {
        let request = self.withdraw_request().await?;
        self.submit(request).await
    }

    pub async fn mint(&self) {
        self.run(Action::Mint, self.try_mint()).await
    }

    pub async fn burn(&self) {
        self.run(Action::Burn, self.try_burn()).await
    }

    pub async fn deposit(&self) {
        self.run(Action::Deposit, self.try_deposit()).await
    }

    pub async fn withdraw(&self) {
        self.run(Action::Withdraw, self.try_withdraw()).await
    }

    pub async fn dispatch(&self, action: Action) {
        match action {
            Action::Mint => self.mint().await,
            Action::Burn => self.burn().await,
            Action::Deposit => self.deposit().await,
            Action::Withdraw => self.withdraw().await,
        }
    }

    /// Await `fut` and hand its outcome to the reporter.
    pub async fn run<F>(&self, action: Action, fut: F)
    where
        F: Future<Output = Result<TxHash, ActionError>>,
    {
        match fut.await {
            Ok(tx_hash) => {
                info!(action = %action, tx_hash = %tx_hash, "action submitted");
                self.reporter.on_result(action, &tx_hash);
            }
            Err(err) => {
                warn!(action = %action, error = %err, "action failed");
                self.reporter.on_error(action, &err);
            }
        }
    }

    async fn submit(&self, request: TxRequest) -> Result<TxHash, ActionError> {
        debug!(
            inputs = request.inputs.len(),
            outputs = request.outputs.len(),
            mints = request.mint.iter().count(),
            "completing request"
        );
        let unsigned = self.session.complete(request).await?;
        let signed = self.session.sign_with_wallet(unsigned).await?;
        self.session.submit(signed).await
    }
}
