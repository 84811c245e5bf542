//! WASM module: the dashboard in the browser
//!
//! The wallet session lives in JS (wallet extension + transaction builder).
//! Rust derives scripts, addresses and requests and drives the session.
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │          Dashboard (JS API)             │
//! │  mint, burn, deposit, withdraw, layout  │
//! └─────────────────┬───────────────────────┘
//!                   │
//! ┌─────────────────▼───────────────────────┐
//! │              Dispatcher                 │
//! │  policy id, contract address, requests  │
//! └─────────────────┬───────────────────────┘
//!                   │
//! ┌─────────────────▼───────────────────────┐
//! │          JsSession (JS object)          │
//! │  complete, signWithWallet, submit       │
//! └─────────────────────────────────────────┘
//! ```

mod dashboard;
mod session;

pub use dashboard::{Dashboard, JsReporter};
pub use session::JsSession;

use wasm_bindgen::prelude::*;

/// Initialize WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// Log to browser console
pub fn console_log(s: &str) {
    web_sys::console::log_1(&JsValue::from_str(s));
}

macro_rules! log {
    ($($t:tt)*) => {
        crate::wasm::console_log(&format!($($t)*))
    }
}

pub(crate) use log;
