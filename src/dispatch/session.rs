//! Session - the connected wallet + provider the dispatcher drives
//!
//! The dispatcher never builds, signs or submits a transaction itself. It
//! describes what it wants as a `TxRequest` and hands it across this seam.
//! Implementations: `Emulator` (in-memory ledger) and, in the browser, a
//! session backed by a JS object.

use async_trait::async_trait;

use super::ActionError;
use crate::core::{Network, TxHash, TxRequest, Unit, Utxo};

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait Session {
    /// Balanced, ready-to-sign transaction.
    type Unsigned;
    type Signed;

    fn network(&self) -> Result<Network, ActionError>;

    async fn utxos_at_with_unit(&self, address: &str, unit: &Unit) -> Result<Vec<Utxo>, ActionError>;

    async fn complete(&self, request: TxRequest) -> Result<Self::Unsigned, ActionError>;

    async fn sign_with_wallet(&self, tx: Self::Unsigned) -> Result<Self::Signed, ActionError>;

    async fn submit(&self, tx: Self::Signed) -> Result<TxHash, ActionError>;
}

