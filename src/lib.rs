//! Offchain: mint, burn, deposit and withdraw against two fixed Plutus V3 scripts.
//!
//! # Architecture
//!
//! ```text
//! Dispatcher (entry point)
//!   │
//!   ├── core (pure, compiles everywhere)
//!   │     ├── script: policy id = blake2b-224(0x03 ‖ mint script)
//!   │     ├── flat: spend script ← apply(user key hash)
//!   │     └── address: enterprise script address of the applied validator
//!   │
//!   ├── Session (wallet + provider, consumed)
//!   │     ├── Emulator (in-memory ledger)
//!   │     └── JsSession (browser wallet, feature `wasm`)
//!   │
//!   └── Reporter (on_result / on_error)
//! ```
//!
//! # Actions
//!
//! | Action | Method | Description |
//! |--------|--------|-------------|
//! | mint | `dispatcher.mint()` | Mint 1000 tokens with CIP-25 metadata |
//! | burn | `dispatcher.burn()` | Burn 1000 tokens held by the wallet |
//! | deposit | `dispatcher.deposit()` | Lock 1000 tokens at the contract |
//! | withdraw | `dispatcher.withdraw()` | Unlock everything at the contract |
//!
//! # Features
//!
//! - `native` - HTTP server, CLI, log subscriber
//! - `wasm` - browser bindings (`Dashboard`, JS-backed session), wasm32 targets only
//!
//! # Usage
//!
//! ```ignore
//! use offchain::{Callbacks, Dispatcher, Emulator, EmulatorConfig};
//! use std::sync::Arc;
//!
//! let session = Arc::new(Emulator::new(address, EmulatorConfig::default())?);
//! let dispatcher = Dispatcher::new(session, address, Callbacks::new(
//!     |action, hash| println!("{action}: {hash}"),
//!     |action, err| eprintln!("{action} failed: {err}"),
//! ));
//! dispatcher.mint().await;
//! ```

// =============================================================================
// Shared modules (compile everywhere)
// =============================================================================
pub mod core;
pub mod dispatch;
pub mod emulator;
pub mod ui;

// =============================================================================
// Native-only modules (server, CLI, tokio)
// =============================================================================
#[cfg(feature = "native")]
pub mod config;
#[cfg(feature = "native")]
pub mod logging;
#[cfg(feature = "native")]
pub mod runtime;
#[cfg(feature = "native")]
pub mod server;

// =============================================================================
// WASM-only modules (browser, wasm-bindgen)
// =============================================================================
#[cfg(all(feature = "wasm", target_arch = "wasm32"))]
pub mod wasm;

// =============================================================================
// Re-exports: Shared
// =============================================================================
pub use crate::core::{Assets, Network, PlutusData, Script, TxHash, TxRequest, Unit, Utxo};
pub use dispatch::{Action, ActionError, Callbacks, Dispatcher, Outcome, Recorder, Reporter, Session};
pub use emulator::{Emulator, EmulatorConfig};

// =============================================================================
// Re-exports: Native
// =============================================================================
#[cfg(feature = "native")]
pub use config::{load_dotenv, AppConfig};
#[cfg(feature = "native")]
pub use runtime::shutdown_signal;
#[cfg(feature = "native")]
pub use server::{create_router, create_router_with_name};

// =============================================================================
// Re-exports: WASM
// =============================================================================
#[cfg(all(feature = "wasm", target_arch = "wasm32"))]
pub use wasm::{Dashboard, JsSession};
