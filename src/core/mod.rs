//! Core: chain-facing values shared by every target
//!
//! # Components
//!
//! - **consts**: bundled scripts, token name and quantities
//! - **data / flat / script**: Plutus data, UPLC flat splicing, script hashes
//! - **address**: networks, payment credentials, script addresses
//! - **asset / tx**: units, value bags and transaction requests
//!
//! # Derivation
//!
//! ```text
//! MINT  ──blake2b-224(0x03 ‖ cbor)──▶ policy id ──‖ hex(name)──▶ unit
//! SPEND ──apply(pkh)──▶ applied ──blake2b-224──▶ script hash ──▶ addr_test1w…
//! ```

pub mod address;
pub mod asset;
pub mod consts;
pub mod data;
pub mod flat;
pub mod hash;
pub mod script;
pub mod tx;

pub use address::{payment_credential_of, validator_to_address, AddressError, Credential, Network};
pub use asset::{Assets, Unit};
pub use data::{DataError, PlutusData};
pub use script::{apply_double_cbor_encoding, Script, ScriptError, ScriptHash};
pub use tx::{TxHash, TxRequest, Utxo};
