//! Action errors - everything an action can hand to the error callback

use thiserror::Error;

use crate::core::{AddressError, DataError, ScriptError};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ActionError {
    #[error("script: {0}")]
    Script(#[from] ScriptError),
    #[error("address: {0}")]
    Address(#[from] AddressError),
    #[error("data: {0}")]
    Data(#[from] DataError),
    #[error("no UTxOs holding {unit} at {address}")]
    NoUtxos { address: String, unit: String },
    #[error("lookup failed: {0}")]
    Lookup(String),
    #[error("build failed: {0}")]
    Build(String),
    #[error("signing failed: {0}")]
    Signing(String),
    #[error("submit failed: {0}")]
    Submit(String),
    #[error("session disconnected")]
    Disconnected,
}

impl ActionError {
    /// Stable short name, used in JSON error bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            ActionError::Script(_) => "script",
            ActionError::Address(_) => "address",
            ActionError::Data(_) => "data",
            ActionError::NoUtxos { .. } => "no_utxos",
            ActionError::Lookup(_) => "lookup",
            ActionError::Build(_) => "build",
            ActionError::Signing(_) => "signing",
            ActionError::Submit(_) => "submit",
            ActionError::Disconnected => "disconnected",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_module_errors() {
        let err: ActionError = AddressError::Prefix("stake".into()).into();
        assert_eq!(err.kind(), "address");
        assert_eq!(err.to_string(), "address: unexpected address prefix: stake");
    }

    #[test]
    fn test_no_utxos_message() {
        let err = ActionError::NoUtxos { address: "addr_test1".into(), unit: "abcd".into() };
        assert_eq!(err.to_string(), "no UTxOs holding abcd at addr_test1");
    }
}
