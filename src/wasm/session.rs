//! JsSession: a `Session` backed by a JS object
//!
//! The object is expected to expose `network()`, `utxosAtWithUnit(address,
//! unit)`, `complete(request)`, `signWithWallet(tx)` and `submit(tx)`. Any of
//! them may return a promise. Missing methods mean the wallet is not
//! connected.

use async_trait::async_trait;
use js_sys::{Array, Function, Promise, Reflect};
use serde::Serialize;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;

use crate::core::{Network, TxHash, TxRequest, Unit, Utxo};
use crate::dispatch::{ActionError, Session};

pub struct JsSession {
    inner: JsValue,
}

impl JsSession {
    pub fn new(inner: JsValue) -> Self {
        Self { inner }
    }

    fn method(&self, name: &str) -> Result<Function, ActionError> {
        if self.inner.is_undefined() || self.inner.is_null() {
            return Err(ActionError::Disconnected);
        }
        let method = Reflect::get(&self.inner, &JsValue::from_str(name)).map_err(|_| ActionError::Disconnected)?;
        method.dyn_into::<Function>().map_err(|_| ActionError::Disconnected)
    }

    /// Call `name` and await the result when it is a promise.
    async fn call(&self, name: &str, args: &[JsValue]) -> Result<JsValue, JsValue> {
        let function = self.method(name).map_err(|e| JsValue::from_str(&e.to_string()))?;
        let result = function.apply(&self.inner, &Array::from_iter(args.iter()))?;
        if result.has_type::<Promise>() {
            JsFuture::from(Promise::from(result)).await
        } else {
            Ok(result)
        }
    }

    async fn call_with<F>(&self, name: &str, args: &[JsValue], wrap: F) -> Result<JsValue, ActionError>
    where
        F: Fn(String) -> ActionError,
    {
        self.method(name)?;
        self.call(name, args).await.map_err(|e| wrap(js_error(&e)))
    }
}

/// Message of a thrown value: a string, an `Error`'s message, or its debug form.
pub(crate) fn js_error(value: &JsValue) -> String {
    value
        .as_string()
        .or_else(|| Reflect::get(value, &JsValue::from_str("message")).ok().and_then(|m| m.as_string()))
        .unwrap_or_else(|| format!("{:?}", value))
}

pub(crate) fn to_js<T: Serialize>(value: &T) -> Result<JsValue, ActionError> {
    let serializer = serde_wasm_bindgen::Serializer::new().serialize_maps_as_objects(true);
    value.serialize(&serializer).map_err(|e| ActionError::Build(e.to_string()))
}

#[async_trait(?Send)]
impl Session for JsSession {
    type Unsigned = JsValue;
    type Signed = JsValue;

    fn network(&self) -> Result<Network, ActionError> {
        let value = self.method("network")?.call0(&self.inner).map_err(|e| ActionError::Lookup(js_error(&e)))?;
        let name = value.as_string().ok_or_else(|| ActionError::Lookup("network() did not return a string".into()))?;
        Ok(Network::parse(&name)?)
    }

    async fn utxos_at_with_unit(&self, address: &str, unit: &Unit) -> Result<Vec<Utxo>, ActionError> {
        let args = [JsValue::from_str(address), JsValue::from_str(unit.as_str())];
        let value = self.call_with("utxosAtWithUnit", &args, ActionError::Lookup).await?;
        serde_wasm_bindgen::from_value(value).map_err(|e| ActionError::Lookup(e.to_string()))
    }

    async fn complete(&self, request: TxRequest) -> Result<JsValue, ActionError> {
        let request = to_js(&request)?;
        self.call_with("complete", &[request], ActionError::Build).await
    }

    async fn sign_with_wallet(&self, tx: JsValue) -> Result<JsValue, ActionError> {
        self.call_with("signWithWallet", &[tx], ActionError::Signing).await
    }

    async fn submit(&self, tx: JsValue) -> Result<TxHash, ActionError> {
        let value = self.call_with("submit", &[tx], ActionError::Submit).await?;
        value
            .as_string()
            .map(TxHash)
            .ok_or_else(|| ActionError::Submit("submit() did not return a hash".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use js_sys::Object;
    use wasm_bindgen_test::wasm_bindgen_test;

    const WALLET: &str = "addr_test1vqqpzg3ng32kvaugnx4thnxaamlsqyfzxdz92enh3zv64wcu79rm4";
    const UNIT: &str = "d79aca76195850a184e04c8d406918ab2dcbf0e83875e8ab952cb902416c77617973205472756520546f6b656e";

    /// JS object whose methods have the given bodies.
    fn session_with(methods: &[(&str, &str)]) -> JsSession {
        let object = Object::new();
        for (name, body) in methods {
            let _ = Reflect::set(&object, &JsValue::from_str(name), &Function::new_no_args(body));
        }
        JsSession::new(object.into())
    }

    #[wasm_bindgen_test]
    async fn test_missing_methods_mean_disconnected() {
        let session = session_with(&[]);
        assert_eq!(session.network(), Err(ActionError::Disconnected));
        let unit = Unit::from(UNIT);
        assert_eq!(session.utxos_at_with_unit(WALLET, &unit).await, Err(ActionError::Disconnected));
        assert_eq!(session.complete(TxRequest::new()).await.err(), Some(ActionError::Disconnected));

        let absent = JsSession::new(JsValue::UNDEFINED);
        assert_eq!(absent.submit(JsValue::NULL).await, Err(ActionError::Disconnected));
    }

    #[wasm_bindgen_test]
    async fn test_rejections_map_to_their_step() {
        let session = session_with(&[
            ("network", "return 'Preprod';"),
            ("complete", "return Promise.reject('bad inputs');"),
            ("signWithWallet", "return Promise.reject(new Error('user declined'));"),
            ("submit", "throw new Error('offline');"),
        ]);
        assert_eq!(session.network(), Ok(Network::Preprod));
        assert_eq!(session.complete(TxRequest::new()).await.err(), Some(ActionError::Build("bad inputs".into())));

        let err = session.sign_with_wallet(JsValue::NULL).await.unwrap_err();
        assert_eq!(err, ActionError::Signing("user declined".into()));
        assert_eq!(err.kind(), "signing");

        assert_eq!(session.submit(JsValue::NULL).await, Err(ActionError::Submit("offline".into())));
    }

    #[wasm_bindgen_test]
    async fn test_utxos_with_bigint_assets() {
        let session = session_with(&[(
            "utxosAtWithUnit",
            "return Promise.resolve([{ \
                txHash: 'ab'.repeat(32), outputIndex: 1, address: arguments[0], \
                assets: { lovelace: 2000000n, [arguments[1]]: 1000n }, \
                datumHash: null, datum: null, scriptRef: null }]);",
        )]);
        let unit = Unit::from(UNIT);
        let utxos = session.utxos_at_with_unit(WALLET, &unit).await.unwrap();
        assert_eq!(utxos.len(), 1);
        assert_eq!(utxos[0].tx_hash.as_str(), "ab".repeat(32));
        assert_eq!(utxos[0].output_index, 1);
        assert_eq!(utxos[0].address, WALLET);
        assert_eq!(utxos[0].assets.get(&unit), 1_000);
        assert_eq!(utxos[0].assets.lovelace_amount(), 2_000_000);
        assert_eq!(utxos[0].datum, None);
    }

    #[wasm_bindgen_test]
    async fn test_submit_needs_a_hash() {
        let session = session_with(&[("submit", "return 42;")]);
        assert!(matches!(session.submit(JsValue::NULL).await, Err(ActionError::Submit(_))));
    }
}
