//! Dashboard: the four actions as a JS class
//!
//! ```js
//! const dashboard = new Dashboard(session, address, (action, txHash) => …, (action, err) => …);
//! await dashboard.mint();
//! ```

use js_sys::{Function, Object, Reflect};
use wasm_bindgen::prelude::*;

use super::log;
use super::session::{to_js, JsSession};
use crate::core::TxHash;
use crate::dispatch::{Action, ActionError, Dispatcher, Reporter};
use crate::ui;
use std::sync::Arc;

/// Forwards outcomes to two JS callbacks. Errors arrive as `{kind, message}`.
pub struct JsReporter {
    on_result: Function,
    on_error: Function,
}

impl Reporter for JsReporter {
    fn on_result(&self, action: Action, tx_hash: &TxHash) {
        let _ = self.on_result.call2(&JsValue::NULL, &JsValue::from_str(action.as_str()), &JsValue::from_str(tx_hash.as_str()));
    }

    fn on_error(&self, action: Action, error: &ActionError) {
        let payload = Object::new();
        let _ = Reflect::set(&payload, &JsValue::from_str("kind"), &JsValue::from_str(error.kind()));
        let _ = Reflect::set(&payload, &JsValue::from_str("message"), &JsValue::from_str(&error.to_string()));
        let _ = self.on_error.call2(&JsValue::NULL, &JsValue::from_str(action.as_str()), &payload);
    }
}

#[wasm_bindgen]
pub struct Dashboard {
    dispatcher: Dispatcher<JsSession, JsReporter>,
}

#[wasm_bindgen]
impl Dashboard {
    #[wasm_bindgen(constructor)]
    pub fn new(session: JsValue, address: String, on_result: Function, on_error: Function) -> Dashboard {
        log!("[Dashboard] address {}", address);
        let reporter = JsReporter { on_result, on_error };
        Self { dispatcher: Dispatcher::new(Arc::new(JsSession::new(session)), address, reporter) }
    }

    #[wasm_bindgen]
    pub async fn mint(&self) -> Result<(), JsValue> {
        self.dispatcher.mint().await;
        Ok(())
    }

    #[wasm_bindgen]
    pub async fn burn(&self) -> Result<(), JsValue> {
        self.dispatcher.burn().await;
        Ok(())
    }

    #[wasm_bindgen]
    pub async fn deposit(&self) -> Result<(), JsValue> {
        self.dispatcher.deposit().await;
        Ok(())
    }

    #[wasm_bindgen]
    pub async fn withdraw(&self) -> Result<(), JsValue> {
        self.dispatcher.withdraw().await;
        Ok(())
    }

    /// `[{title, buttons: [{action, label}]}]`
    #[wasm_bindgen]
    pub fn layout(&self) -> Result<JsValue, JsValue> {
        to_js(&ui::layout()).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    #[wasm_bindgen(js_name = "assetUnit")]
    pub fn asset_unit(&self) -> Result<String, JsValue> {
        self.dispatcher.asset_unit().map(|u| u.to_string()).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    #[wasm_bindgen(js_name = "policyId")]
    pub fn policy_id(&self) -> Result<String, JsValue> {
        self.dispatcher.policy_id().map_err(|e| JsValue::from_str(&e.to_string()))
    }

    #[wasm_bindgen(js_name = "contractAddress")]
    pub fn contract_address(&self) -> Result<String, JsValue> {
        self.dispatcher.contract_address().map_err(|e| JsValue::from_str(&e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use js_sys::Array;
    use wasm_bindgen_test::wasm_bindgen_test;

    const WALLET: &str = "addr_test1vqqpzg3ng32kvaugnx4thnxaamlsqyfzxdz92enh3zv64wcu79rm4";
    const POLICY_ID: &str = "d79aca76195850a184e04c8d406918ab2dcbf0e83875e8ab952cb902";
    const CONTRACT: &str = "addr_test1wzvlfrhy6z7qrx0cnx4wrgcuactz6uhhwuleypu96vepg4scrjp4y";

    fn session(methods: &[(&str, &str)]) -> JsValue {
        let object = Object::new();
        for (name, body) in methods {
            let _ = Reflect::set(&object, &JsValue::from_str(name), &Function::new_no_args(body));
        }
        object.into()
    }

    /// Callback that stores `action:detail` under `globalThis[key]`.
    fn recorder(key: &str, detail: &str) -> Function {
        Function::new_with_args("action, value", &format!("globalThis.{} = action + ':' + {};", key, detail))
    }

    fn noop() -> Function {
        Function::new_no_args("")
    }

    fn global(key: &str) -> Option<String> {
        Reflect::get(&js_sys::global(), &JsValue::from_str(key)).ok().and_then(|v| v.as_string())
    }

    #[wasm_bindgen_test]
    fn test_derivations() {
        let dashboard = Dashboard::new(session(&[("network", "return 'Preprod';")]), WALLET.into(), noop(), noop());
        assert_eq!(dashboard.policy_id().unwrap(), POLICY_ID);
        assert!(dashboard.asset_unit().unwrap().starts_with(POLICY_ID));
        assert_eq!(dashboard.contract_address().unwrap(), CONTRACT);
        let layout = dashboard.layout().unwrap();
        assert!(Array::is_array(&layout));
        assert_eq!(Array::from(&layout).length(), 2);
    }

    #[wasm_bindgen_test]
    async fn test_mint_reaches_result_callback() {
        let session = session(&[
            ("network", "return 'Preprod';"),
            ("complete", "return { unsigned: true };"),
            ("signWithWallet", "return Promise.resolve(arguments[0]);"),
            ("submit", "return Promise.resolve('ff'.repeat(32));"),
        ]);
        let dashboard = Dashboard::new(session, WALLET.into(), recorder("lastDashboardResult", "value"), noop());
        dashboard.mint().await.unwrap();
        assert_eq!(global("lastDashboardResult"), Some(format!("mint:{}", "ff".repeat(32))));
    }

    #[wasm_bindgen_test]
    async fn test_disconnected_wallet_reaches_error_callback() {
        let dashboard =
            Dashboard::new(session(&[]), WALLET.into(), noop(), recorder("lastDashboardError", "value.kind"));
        dashboard.withdraw().await.unwrap();
        assert_eq!(global("lastDashboardError"), Some("withdraw:disconnected".to_string()));
    }
}
